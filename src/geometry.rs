//! Shared geometry helpers.
//!
//! Layout math is expressed top-down (y grows toward the bottom of the page),
//! while the backend works in PDF space (y grows upward from the bottom).
//! [`Rect::flip`] converts between the two.

use serde::{Deserialize, Serialize};

use crate::backend::{Backend, SurfaceId};

/// An axis-aligned rectangle given by its start and stop edges.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rect {
    pub x_start: f64,
    pub y_start: f64,
    pub x_stop: f64,
    pub y_stop: f64,
}

impl Rect {
    pub fn new(x_start: f64, y_start: f64, x_stop: f64, y_stop: f64) -> Self {
        Self {
            x_start,
            y_start,
            x_stop,
            y_stop,
        }
    }

    pub fn width(&self) -> f64 {
        self.x_stop - self.x_start
    }

    pub fn height(&self) -> f64 {
        self.y_stop - self.y_start
    }

    /// True when the rectangle has no positive area.
    pub fn is_degenerate(&self) -> bool {
        !(self.width() > 0.0 && self.height() > 0.0)
    }

    /// Shrink every edge inward by `amount`.
    pub fn shrink(&self, amount: f64) -> Rect {
        Rect::new(
            self.x_start + amount,
            self.y_start + amount,
            self.x_stop - amount,
            self.y_stop - amount,
        )
    }

    /// Mirror vertically within a page of `page_height`, keeping
    /// `y_start <= y_stop`.
    pub fn flip(&self, page_height: f64) -> Rect {
        Rect::new(
            self.x_start,
            page_height - self.y_stop,
            self.x_stop,
            page_height - self.y_start,
        )
    }

    /// True when the interiors of the two rectangles intersect.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x_start < other.x_stop
            && other.x_start < self.x_stop
            && self.y_start < other.y_stop
            && other.y_start < self.y_stop
    }
}

/// X position that centers `text` between `span_start` and `span_stop`,
/// measured in the surface's current font.
pub fn centered_text_x(
    backend: &dyn Backend,
    surface: SurfaceId,
    text: &str,
    span_start: f64,
    span_stop: f64,
) -> f64 {
    let width = backend.text_width(surface, text);
    span_start + (span_stop - span_start - width) / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::Canvas;

    #[test]
    fn test_shrink() {
        let r = Rect::new(0.0, 0.0, 200.0, 100.0).shrink(10.0);
        assert_eq!(r, Rect::new(10.0, 10.0, 190.0, 90.0));
    }

    #[test]
    fn test_flip_keeps_order() {
        let r = Rect::new(10.0, 20.0, 50.0, 70.0).flip(100.0);
        assert_eq!(r, Rect::new(10.0, 30.0, 50.0, 80.0));
        assert!(r.y_start <= r.y_stop);
    }

    #[test]
    fn test_degenerate() {
        assert!(Rect::new(0.0, 0.0, 0.0, 10.0).is_degenerate());
        assert!(Rect::new(5.0, 5.0, 1.0, 10.0).is_degenerate());
        assert!(!Rect::new(0.0, 0.0, 1.0, 1.0).is_degenerate());
    }

    #[test]
    fn test_overlaps_touching_edges() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(10.0, 0.0, 20.0, 10.0);
        let c = Rect::new(5.0, 5.0, 15.0, 15.0);
        assert!(!a.overlaps(&b));
        assert!(a.overlaps(&c));
    }

    #[test]
    fn test_centered_text_x() {
        let mut canvas = Canvas::new();
        let surface = canvas.add_page();
        let font = canvas.font("Courier");
        canvas.set_font_and_size(surface, font, 10.0);
        // "abcd" in Courier 10 is 24pt wide
        let x = centered_text_x(&canvas, surface, "abcd", 100.0, 200.0);
        assert!((x - 138.0).abs() < 0.001);
    }
}
