//! Notes section: a vertical divider splitting the page by the node's notes
//! ratio, a "Notes" label, and a fixed rule near the left margin.
//!
//! The dotted background is off by default. Every dot is its own stroked
//! path, which grows the output far more than the texture is worth; enable
//! it with [`NotesSectionLayout::with_dot_fill`].

use crate::backend::{Backend, SurfaceId};
use crate::error::PlannerError;
use crate::geometry::{centered_text_x, Rect};
use crate::page::{validate_ratio, PageArena, PageId};

use super::{DEFAULT_FONT, TITLE_FONT_SIZE};

const DOT_LINE_WIDTH: f64 = 0.7;
/// Smallest dot spacing accepted in either direction.
pub const MIN_DOT_SPACING: f64 = 1.0;

/// Spacing of the optional dot background.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DotFill {
    pub spacing_x: f64,
    pub spacing_y: f64,
}

impl Default for DotFill {
    fn default() -> Self {
        Self {
            spacing_x: 20.0,
            spacing_y: 20.0,
        }
    }
}

/// What [`NotesSectionLayout::apply`] drew.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NotesSection {
    pub divider_x: f64,
    pub dots: usize,
}

#[derive(Debug, Clone)]
pub struct NotesSectionLayout {
    pub font: String,
    pub title_size: f64,
    pub label: String,
    pub label_size: f64,
    /// X of the rule delineating the margin strip. Independent of the divider.
    pub margin_rule_x: f64,
    /// Space kept between the top of the divider and the title.
    pub divider_gap: f64,
    pub dot_fill: Option<DotFill>,
    /// Left edge of the dotted area.
    pub dot_fill_x_start: f64,
}

impl Default for NotesSectionLayout {
    fn default() -> Self {
        Self {
            font: DEFAULT_FONT.to_string(),
            title_size: TITLE_FONT_SIZE,
            label: "Notes".to_string(),
            label_size: 35.0,
            margin_rule_x: 120.0,
            divider_gap: 20.0,
            dot_fill: None,
            dot_fill_x_start: 95.0,
        }
    }
}

/// X of the notes divider for a page of `page_width`.
pub fn divider_x(page_width: f64, ratio: f64) -> Result<f64, PlannerError> {
    validate_ratio(ratio)?;
    Ok(page_width * ratio)
}

impl NotesSectionLayout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dot_fill(mut self, fill: DotFill) -> Self {
        self.dot_fill = Some(fill);
        self
    }

    /// Draw the notes section of `page` using its notes split ratio.
    pub fn apply(
        &self,
        backend: &mut dyn Backend,
        arena: &PageArena,
        page: PageId,
    ) -> Result<NotesSection, PlannerError> {
        let node = arena.node(page)?;
        self.apply_with_ratio(backend, arena, page, node.notes_split_ratio())
    }

    /// Draw the notes section of `page` split at `ratio`.
    pub fn apply_with_ratio(
        &self,
        backend: &mut dyn Backend,
        arena: &PageArena,
        page: PageId,
        ratio: f64,
    ) -> Result<NotesSection, PlannerError> {
        let node = arena.node(page)?;
        let surface = node.require_surface()?;
        let divider = divider_x(node.width(), ratio)?;
        if let Some(fill) = self.dot_fill {
            validate_spacing(fill)?;
        }
        let page_height = node.height();

        let font = backend.font(&self.font);
        backend.set_font_and_size(surface, font, self.label_size);

        backend.draw_line(
            surface,
            1.0,
            (divider, 0.0),
            (divider, page_height - self.title_size - self.divider_gap),
        );

        let label_x = centered_text_x(backend, surface, &self.label, 0.0, divider);
        backend.draw_text(
            surface,
            label_x,
            page_height - self.title_size - self.label_size - 10.0,
            &self.label,
        );

        backend.draw_line(
            surface,
            1.0,
            (self.margin_rule_x, 0.0),
            (self.margin_rule_x, page_height),
        );

        let dots = match self.dot_fill {
            Some(fill) => fill_with_dots(
                backend,
                surface,
                page_height,
                Rect::new(self.dot_fill_x_start, 0.0, divider, page_height),
                fill,
            ),
            None => 0,
        };

        Ok(NotesSection {
            divider_x: divider,
            dots,
        })
    }
}

pub(crate) fn validate_spacing(fill: DotFill) -> Result<(), PlannerError> {
    let valid = |spacing: f64| spacing.is_finite() && spacing >= MIN_DOT_SPACING;
    if valid(fill.spacing_x) && valid(fill.spacing_y) {
        Ok(())
    } else {
        Err(PlannerError::config(format!(
            "dot spacing must be at least {}, got {}x{}",
            MIN_DOT_SPACING, fill.spacing_x, fill.spacing_y
        )))
    }
}

/// Cover `area` (top-down) with small diagonal ticks. Returns the dot count.
pub(crate) fn fill_with_dots(
    backend: &mut dyn Backend,
    surface: SurfaceId,
    page_height: f64,
    area: Rect,
    fill: DotFill,
) -> usize {
    if validate_spacing(fill).is_err() {
        return 0;
    }
    let mut dots = 0;
    let mut x = area.x_start;
    while x < area.x_stop {
        let mut y = area.y_start;
        while y < area.y_stop {
            backend.draw_line(
                surface,
                DOT_LINE_WIDTH,
                (x, page_height - y),
                (x + 1.0, page_height - y + 1.0),
            );
            dots += 1;
            y += fill.spacing_y;
        }
        x += fill.spacing_x;
    }
    dots
}
