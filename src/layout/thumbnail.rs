//! Grid cell previews.
//!
//! When a grid is drawn with thumbnails, each child page draws a small
//! preview of itself in its cell, below the label. What the preview looks
//! like depends on the child's [`PageKind`].

use crate::backend::{Backend, SurfaceId};
use crate::geometry::Rect;
use crate::page::PageKind;

use super::grid::THUMBNAIL_LABEL_BAND;
use super::notes::{fill_with_dots, DotFill};

const PREVIEW_INSET: f64 = 5.0;
const PREVIEW_LINE_WIDTH: f64 = 0.5;

/// Something that can draw a preview of a page into a cell.
pub trait Thumbnail {
    /// Draw into `area`, given in top-down page coordinates.
    fn draw_thumbnail(
        &self,
        backend: &mut dyn Backend,
        surface: SurfaceId,
        page_height: f64,
        area: Rect,
    );
}

/// Evenly spaced horizontal rules.
#[derive(Debug, Clone, Copy)]
pub struct RuledPreview {
    pub lines: usize,
}

/// Dot grid.
#[derive(Debug, Clone, Copy)]
pub struct DottedPreview {
    pub spacing: f64,
}

/// Outline of a rows × cols grid.
#[derive(Debug, Clone, Copy)]
pub struct GridPreview {
    pub rows: usize,
    pub cols: usize,
}

impl PageKind {
    /// The preview renderer for this kind of page, if it has one.
    pub fn thumbnail(&self) -> Option<Box<dyn Thumbnail>> {
        match *self {
            PageKind::Plain => None,
            PageKind::Ruled { lines } => Some(Box::new(RuledPreview { lines })),
            PageKind::Dotted { spacing } => Some(Box::new(DottedPreview { spacing })),
            PageKind::Container { rows, cols } => Some(Box::new(GridPreview { rows, cols })),
        }
    }
}

/// The part of a padded cell left for a preview once the label band is
/// taken off the top. `None` when nothing usable remains.
pub fn preview_area(padded_cell: Rect) -> Option<Rect> {
    let area = Rect::new(
        padded_cell.x_start,
        padded_cell.y_start + THUMBNAIL_LABEL_BAND,
        padded_cell.x_stop,
        padded_cell.y_stop,
    )
    .shrink(PREVIEW_INSET);
    (!area.is_degenerate()).then_some(area)
}

fn stroke(
    backend: &mut dyn Backend,
    surface: SurfaceId,
    page_height: f64,
    from: (f64, f64),
    to: (f64, f64),
) {
    backend.draw_line(
        surface,
        PREVIEW_LINE_WIDTH,
        (from.0, page_height - from.1),
        (to.0, page_height - to.1),
    );
}

impl Thumbnail for RuledPreview {
    fn draw_thumbnail(
        &self,
        backend: &mut dyn Backend,
        surface: SurfaceId,
        page_height: f64,
        area: Rect,
    ) {
        let step = area.height() / self.lines.saturating_add(1) as f64;
        for i in 1..=self.lines {
            let y = area.y_start + step * i as f64;
            stroke(backend, surface, page_height, (area.x_start, y), (area.x_stop, y));
        }
    }
}

impl Thumbnail for DottedPreview {
    fn draw_thumbnail(
        &self,
        backend: &mut dyn Backend,
        surface: SurfaceId,
        page_height: f64,
        area: Rect,
    ) {
        let fill = DotFill {
            spacing_x: self.spacing,
            spacing_y: self.spacing,
        };
        fill_with_dots(backend, surface, page_height, area, fill);
    }
}

impl Thumbnail for GridPreview {
    fn draw_thumbnail(
        &self,
        backend: &mut dyn Backend,
        surface: SurfaceId,
        page_height: f64,
        area: Rect,
    ) {
        if self.rows == 0 || self.cols == 0 {
            return;
        }
        let x_step = area.width() / self.cols as f64;
        let y_step = area.height() / self.rows as f64;
        for row in 0..=self.rows {
            let y = area.y_start + y_step * row as f64;
            stroke(backend, surface, page_height, (area.x_start, y), (area.x_stop, y));
        }
        for col in 0..=self.cols {
            let x = area.x_start + x_step * col as f64;
            stroke(backend, surface, page_height, (x, area.y_start), (x, area.y_stop));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::Canvas;

    fn draw(kind: PageKind, area: Rect) -> Canvas {
        let mut canvas = Canvas::new();
        let s = canvas.add_page();
        if let Some(thumb) = kind.thumbnail() {
            thumb.draw_thumbnail(&mut canvas, s, 1000.0, area);
        }
        canvas
    }

    #[test]
    fn test_plain_has_no_thumbnail() {
        assert!(PageKind::Plain.thumbnail().is_none());
    }

    #[test]
    fn test_ruled_preview_line_count() {
        let canvas = draw(PageKind::Ruled { lines: 4 }, Rect::new(0.0, 0.0, 100.0, 100.0));
        let page = &canvas.pages()[0];
        assert_eq!(page.count_lines_with_width(PREVIEW_LINE_WIDTH), 4);
        // first rule at 20pt below the top, flipped into PDF space
        let first = page.lines().next().unwrap();
        assert!((first.from.y - 980.0).abs() < 1e-9);
    }

    #[test]
    fn test_grid_preview_draws_outline_and_interior() {
        let canvas = draw(
            PageKind::Container { rows: 2, cols: 3 },
            Rect::new(0.0, 0.0, 90.0, 60.0),
        );
        // 3 horizontal + 4 vertical
        assert_eq!(canvas.pages()[0].lines().count(), 7);
    }

    #[test]
    fn test_dotted_preview() {
        let canvas = draw(PageKind::Dotted { spacing: 10.0 }, Rect::new(0.0, 0.0, 30.0, 20.0));
        assert_eq!(canvas.pages()[0].lines().count(), 6);
    }

    #[test]
    fn test_preview_area_below_label_band() {
        let area = preview_area(Rect::new(10.0, 10.0, 190.0, 190.0)).unwrap();
        assert_eq!(area, Rect::new(15.0, 65.0, 185.0, 185.0));
        assert!(preview_area(Rect::new(0.0, 0.0, 100.0, 55.0)).is_none());
    }
}
