//! # In-Memory Canvas
//!
//! The [`Backend`] the planner renders onto. Each page surface records the
//! text runs, stroked lines and link annotations drawn on it; the PDF writer
//! serializes them afterwards. Keeping the drawing as data also lets tests
//! inspect exactly what a layout call produced.

use crate::backend::{AnnotationId, Backend, DestinationId, FontId, SurfaceId};
use crate::font::{FontContext, StandardFont};
use crate::geometry::Rect;

/// Default page size used until `set_page_size` is called (US Letter).
const DEFAULT_WIDTH: f64 = 612.0;
const DEFAULT_HEIGHT: f64 = 792.0;

/// A point in PDF space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// One `show_text` call, resolved to its font and position.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub font: FontId,
    pub size: f64,
    pub origin: Point,
    pub text: String,
}

/// One stroked segment.
#[derive(Debug, Clone, PartialEq)]
pub struct LineSegment {
    pub width: f64,
    pub from: Point,
    pub to: Point,
}

/// A drawing operation recorded on a page, in paint order.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Text(TextRun),
    Line(LineSegment),
}

/// A clickable rectangle (PDF space) that jumps to a destination.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinkAnnotation {
    pub rect: Rect,
    pub destination: DestinationId,
}

#[derive(Debug, Clone, Default)]
struct GraphicsState {
    font: Option<(FontId, f64)>,
    line_width: f64,
    in_text: bool,
    text_pos: Point,
    current_point: Option<Point>,
    path: Vec<(Point, Point)>,
}

/// A single page: its size plus everything drawn on it.
#[derive(Debug, Clone)]
pub struct PageSurface {
    pub width: f64,
    pub height: f64,
    pub ops: Vec<DrawOp>,
    pub links: Vec<LinkAnnotation>,
    state: GraphicsState,
}

impl PageSurface {
    fn new() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            ops: Vec::new(),
            links: Vec::new(),
            state: GraphicsState {
                line_width: 1.0,
                ..Default::default()
            },
        }
    }

    pub fn text_runs(&self) -> impl Iterator<Item = &TextRun> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text(run) => Some(run),
            DrawOp::Line(_) => None,
        })
    }

    pub fn lines(&self) -> impl Iterator<Item = &LineSegment> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Line(line) => Some(line),
            DrawOp::Text(_) => None,
        })
    }

    /// Number of stroked segments drawn with exactly `width`.
    pub fn count_lines_with_width(&self, width: f64) -> usize {
        self.lines()
            .filter(|l| (l.width - width).abs() < f64::EPSILON)
            .count()
    }

    /// First text run whose content equals `text`.
    pub fn find_text(&self, text: &str) -> Option<&TextRun> {
        self.text_runs().find(|run| run.text == text)
    }

    pub fn is_blank(&self) -> bool {
        self.ops.is_empty() && self.links.is_empty()
    }
}

/// An in-memory document: pages, fonts and destinations.
pub struct Canvas {
    pages: Vec<PageSurface>,
    fonts: Vec<StandardFont>,
    destinations: Vec<SurfaceId>,
    font_context: FontContext,
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new()
    }
}

impl Canvas {
    pub fn new() -> Self {
        Self {
            pages: Vec::new(),
            fonts: Vec::new(),
            destinations: Vec::new(),
            font_context: FontContext::new(),
        }
    }

    pub fn pages(&self) -> &[PageSurface] {
        &self.pages
    }

    pub fn page(&self, surface: SurfaceId) -> Option<&PageSurface> {
        self.pages.get(surface.0)
    }

    /// Fonts in registration order; `FontId(i)` indexes this slice.
    pub fn fonts(&self) -> &[StandardFont] {
        &self.fonts
    }

    /// The surface a destination jumps to.
    pub fn destination_target(&self, destination: DestinationId) -> Option<SurfaceId> {
        self.destinations.get(destination.0).copied()
    }

    fn page_mut(&mut self, surface: SurfaceId) -> Option<&mut PageSurface> {
        let page = self.pages.get_mut(surface.0);
        if page.is_none() {
            log::warn!("drawing on unknown surface {}", surface.0);
        }
        page
    }
}

impl Backend for Canvas {
    fn add_page(&mut self) -> SurfaceId {
        self.pages.push(PageSurface::new());
        SurfaceId(self.pages.len() - 1)
    }

    fn set_page_size(&mut self, surface: SurfaceId, height: f64, width: f64) {
        if let Some(page) = self.page_mut(surface) {
            page.height = height;
            page.width = width;
        }
    }

    fn font(&mut self, name: &str) -> FontId {
        let font = self.font_context.resolve(name);
        if let Some(idx) = self.fonts.iter().position(|f| *f == font) {
            return FontId(idx);
        }
        self.fonts.push(font);
        FontId(self.fonts.len() - 1)
    }

    fn set_font_and_size(&mut self, surface: SurfaceId, font: FontId, size: f64) {
        if let Some(page) = self.page_mut(surface) {
            page.state.font = Some((font, size));
        }
    }

    fn text_width(&self, surface: SurfaceId, text: &str) -> f64 {
        let Some((font, size)) = self.pages.get(surface.0).and_then(|p| p.state.font) else {
            return 0.0;
        };
        let font = self.fonts.get(font.0).copied().unwrap_or(StandardFont::Helvetica);
        self.font_context.measure_string(text, font, size)
    }

    fn begin_text(&mut self, surface: SurfaceId) {
        if let Some(page) = self.page_mut(surface) {
            page.state.in_text = true;
            page.state.text_pos = Point::default();
        }
    }

    fn move_text_pos(&mut self, surface: SurfaceId, x: f64, y: f64) {
        if let Some(page) = self.page_mut(surface) {
            // Td is relative to the start of the current line.
            page.state.text_pos.x += x;
            page.state.text_pos.y += y;
        }
    }

    fn show_text(&mut self, surface: SurfaceId, text: &str) {
        if let Some(page) = self.page_mut(surface) {
            if !page.state.in_text {
                log::debug!("show_text outside a text object on surface {}", surface.0);
            }
            let (font, size) = page.state.font.unwrap_or((FontId(0), 12.0));
            page.ops.push(DrawOp::Text(TextRun {
                font,
                size,
                origin: page.state.text_pos,
                text: text.to_string(),
            }));
        }
    }

    fn end_text(&mut self, surface: SurfaceId) {
        if let Some(page) = self.page_mut(surface) {
            page.state.in_text = false;
        }
    }

    fn set_line_width(&mut self, surface: SurfaceId, width: f64) {
        if let Some(page) = self.page_mut(surface) {
            page.state.line_width = width;
        }
    }

    fn move_to(&mut self, surface: SurfaceId, x: f64, y: f64) {
        if let Some(page) = self.page_mut(surface) {
            page.state.current_point = Some(Point { x, y });
        }
    }

    fn line_to(&mut self, surface: SurfaceId, x: f64, y: f64) {
        if let Some(page) = self.page_mut(surface) {
            let to = Point { x, y };
            if let Some(from) = page.state.current_point {
                page.state.path.push((from, to));
            }
            page.state.current_point = Some(to);
        }
    }

    fn stroke(&mut self, surface: SurfaceId) {
        if let Some(page) = self.page_mut(surface) {
            let width = page.state.line_width;
            for (from, to) in page.state.path.drain(..) {
                page.ops.push(DrawOp::Line(LineSegment { width, from, to }));
            }
            page.state.current_point = None;
        }
    }

    fn create_destination(&mut self, target: SurfaceId) -> DestinationId {
        self.destinations.push(target);
        DestinationId(self.destinations.len() - 1)
    }

    fn create_link_annotation(
        &mut self,
        surface: SurfaceId,
        rect: Rect,
        destination: DestinationId,
    ) -> AnnotationId {
        match self.page_mut(surface) {
            Some(page) => {
                page.links.push(LinkAnnotation { rect, destination });
                AnnotationId(page.links.len() - 1)
            }
            None => AnnotationId(usize::MAX),
        }
    }
}
