//! # Rendering Backend
//!
//! The primitives the planner engine draws with. The engine never builds PDF
//! bytes itself: it places text, strokes lines and creates link annotations
//! through this trait, and a backend decides what those calls produce.
//!
//! Coordinates passed to the backend are PDF user-space coordinates: the
//! origin is the bottom-left corner of the page and y grows upward.

use crate::geometry::Rect;

/// Handle to one page surface owned by a backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SurfaceId(pub usize);

/// Handle to a font registered with a backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FontId(pub usize);

/// Handle to a destination (a target page a link jumps to).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DestinationId(pub usize);

/// Handle to a link annotation placed on a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AnnotationId(pub usize);

/// Drawing primitives used by the planner layout components.
///
/// Backends are not expected to be reentrant; all calls for a document come
/// from a single thread, in order.
pub trait Backend {
    /// Allocate a new page surface.
    fn add_page(&mut self) -> SurfaceId;

    fn set_page_size(&mut self, surface: SurfaceId, height: f64, width: f64);

    /// Look up a font by name, registering it with the document if needed.
    fn font(&mut self, name: &str) -> FontId;

    fn set_font_and_size(&mut self, surface: SurfaceId, font: FontId, size: f64);

    /// Width of `text` in the surface's current font and size.
    fn text_width(&self, surface: SurfaceId, text: &str) -> f64;

    fn begin_text(&mut self, surface: SurfaceId);
    fn move_text_pos(&mut self, surface: SurfaceId, x: f64, y: f64);
    fn show_text(&mut self, surface: SurfaceId, text: &str);
    fn end_text(&mut self, surface: SurfaceId);

    fn set_line_width(&mut self, surface: SurfaceId, width: f64);
    fn move_to(&mut self, surface: SurfaceId, x: f64, y: f64);
    fn line_to(&mut self, surface: SurfaceId, x: f64, y: f64);
    fn stroke(&mut self, surface: SurfaceId);

    /// Create a destination that jumps to `target`.
    fn create_destination(&mut self, target: SurfaceId) -> DestinationId;

    /// Place a clickable rectangle on `surface` bound to `destination`.
    fn create_link_annotation(
        &mut self,
        surface: SurfaceId,
        rect: Rect,
        destination: DestinationId,
    ) -> AnnotationId;

    /// Text placed at a single position, wrapped in its own text object.
    fn draw_text(&mut self, surface: SurfaceId, x: f64, y: f64, text: &str) {
        self.begin_text(surface);
        self.move_text_pos(surface, x, y);
        self.show_text(surface, text);
        self.end_text(surface);
    }

    /// A single stroked segment.
    fn draw_line(&mut self, surface: SurfaceId, width: f64, from: (f64, f64), to: (f64, f64)) {
        self.set_line_width(surface, width);
        self.move_to(surface, from.0, from.1);
        self.line_to(surface, to.0, to.1);
        self.stroke(surface);
    }

    /// Destination plus link annotation in one call.
    fn link_to(&mut self, surface: SurfaceId, rect: Rect, target: SurfaceId) -> AnnotationId {
        let destination = self.create_destination(target);
        self.create_link_annotation(surface, rect, destination)
    }
}
