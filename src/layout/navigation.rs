//! Page title and sibling arrows.
//!
//! The title is centered across the full page width. Clicking it jumps to the
//! parent page; the `<` and `>` glyphs beside it jump to the left and right
//! siblings. Each clickable area spans the glyph's measured width and runs
//! from the top of the page down to twice the title font size.

use crate::backend::{Backend, SurfaceId};
use crate::error::PlannerError;
use crate::geometry::{centered_text_x, Rect};
use crate::page::{PageArena, PageId};

use super::{DEFAULT_FONT, TITLE_FONT_SIZE};

/// Link rectangles (PDF space) created for one page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NavigationLinks {
    pub title: Option<Rect>,
    pub left: Option<Rect>,
    pub right: Option<Rect>,
}

impl NavigationLinks {
    pub fn count(&self) -> usize {
        [self.title, self.left, self.right].iter().flatten().count()
    }
}

/// Draws titles and neighbor links.
#[derive(Debug, Clone)]
pub struct NavigationLinker {
    pub font: String,
    pub title_size: f64,
    /// Gap between the title and each arrow glyph.
    pub arrow_gap: f64,
    /// Distance of the title baseline below the title font size.
    pub title_margin: f64,
    pub left_glyph: String,
    pub right_glyph: String,
}

impl Default for NavigationLinker {
    fn default() -> Self {
        Self {
            font: DEFAULT_FONT.to_string(),
            title_size: TITLE_FONT_SIZE,
            arrow_gap: 100.0,
            title_margin: 10.0,
            left_glyph: "<".to_string(),
            right_glyph: ">".to_string(),
        }
    }
}

impl NavigationLinker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw the title and arrows of `page`.
    ///
    /// Every neighbor's surface is resolved before anything is drawn, so a
    /// dangling neighbor leaves the page untouched. Call once per page:
    /// a second call draws the title and links again.
    pub fn apply(
        &self,
        backend: &mut dyn Backend,
        arena: &PageArena,
        page: PageId,
    ) -> Result<NavigationLinks, PlannerError> {
        let node = arena.node(page)?;
        let surface = node.require_surface()?;
        let parent = node.parent().map(|id| arena.surface_of(id)).transpose()?;
        let left = node.left().map(|id| arena.surface_of(id)).transpose()?;
        let right = node.right().map(|id| arena.surface_of(id)).transpose()?;

        let page_width = node.width();
        let page_height = node.height();
        let baseline = page_height - self.title_size - self.title_margin;

        let font = backend.font(&self.font);
        backend.set_font_and_size(surface, font, self.title_size);
        backend.set_line_width(surface, 1.0);

        let title = node.title();
        let title_x = centered_text_x(backend, surface, title, 0.0, page_width);
        let title_width = backend.text_width(surface, title);

        let mut links = NavigationLinks::default();

        backend.begin_text(surface);
        backend.move_text_pos(surface, title_x, baseline);
        if let Some(target) = parent {
            let rect = self.link_rect(title_x, title_width, page_height);
            backend.link_to(surface, rect, target);
            links.title = Some(rect);
        }
        backend.show_text(surface, title);
        backend.end_text(surface);

        if let Some(target) = left {
            let x = title_x - self.arrow_gap;
            links.left = Some(self.arrow(backend, surface, &self.left_glyph, x, page_height, target));
        }

        if let Some(target) = right {
            let x = title_x + title_width + self.arrow_gap;
            links.right = Some(self.arrow(backend, surface, &self.right_glyph, x, page_height, target));
        }

        log::debug!(
            "navigation for '{}': {} link(s)",
            node.key(),
            links.count()
        );
        Ok(links)
    }

    fn arrow(
        &self,
        backend: &mut dyn Backend,
        surface: SurfaceId,
        glyph: &str,
        x: f64,
        page_height: f64,
        target: SurfaceId,
    ) -> Rect {
        let baseline = page_height - self.title_size - self.title_margin;
        let width = backend.text_width(surface, glyph);
        let rect = self.link_rect(x, width, page_height);

        backend.begin_text(surface);
        backend.move_text_pos(surface, x, baseline);
        backend.link_to(surface, rect, target);
        backend.show_text(surface, glyph);
        backend.end_text(surface);
        rect
    }

    fn link_rect(&self, x: f64, width: f64, page_height: f64) -> Rect {
        Rect::new(x, page_height - self.title_size * 2.0, x + width, page_height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::Canvas;
    use crate::page::Neighbors;

    fn setup(keys: &[&str]) -> (Canvas, PageArena, Vec<PageId>) {
        let mut canvas = Canvas::new();
        let mut arena = PageArena::new();
        let ids: Vec<PageId> = keys.iter().map(|k| arena.add(*k, *k)).collect();
        for &id in &ids {
            arena.create_surface(&mut canvas, id, 1000.0, 800.0).unwrap();
        }
        (canvas, arena, ids)
    }

    #[test]
    fn test_title_only_without_neighbors() {
        let (mut canvas, arena, ids) = setup(&["Week 12"]);
        let links = NavigationLinker::new().apply(&mut canvas, &arena, ids[0]).unwrap();
        assert_eq!(links.count(), 0);

        let page = canvas.page(arena.surface_of(ids[0]).unwrap()).unwrap();
        assert!(page.links.is_empty());
        let title = page.find_text("Week 12").unwrap();
        assert_eq!(title.size, TITLE_FONT_SIZE);
        assert!((title.origin.y - (1000.0 - 45.0 - 10.0)).abs() < 0.001);
    }

    #[test]
    fn test_parent_only_gives_one_title_link() {
        let (mut canvas, mut arena, ids) = setup(&["2026", "March"]);
        arena
            .set_neighbors(ids[1], Neighbors { parent: Some(ids[0]), ..Default::default() })
            .unwrap();

        let links = NavigationLinker::new().apply(&mut canvas, &arena, ids[1]).unwrap();
        assert_eq!(links.count(), 1);
        assert!(links.left.is_none() && links.right.is_none());

        let surface = arena.surface_of(ids[1]).unwrap();
        let page = canvas.page(surface).unwrap();
        assert_eq!(page.links.len(), 1);
        assert_eq!(page.text_runs().count(), 1, "no arrow glyphs");
        assert_eq!(
            canvas.destination_target(page.links[0].destination),
            Some(arena.surface_of(ids[0]).unwrap())
        );

        // The title link spans the title's measured width.
        let title = page.find_text("March").unwrap();
        let rect = links.title.unwrap();
        assert!((rect.x_start - title.origin.x).abs() < 0.001);
        let width = canvas.text_width(surface, "March");
        assert!((rect.width() - width).abs() < 0.001);
        assert!((rect.y_stop - 1000.0).abs() < 0.001);
        assert!((rect.y_start - (1000.0 - 90.0)).abs() < 0.001);
    }

    #[test]
    fn test_left_and_right_arrows_do_not_overlap() {
        let (mut canvas, mut arena, ids) = setup(&["Mon", "Tue", "Wed"]);
        arena
            .set_neighbors(
                ids[1],
                Neighbors { parent: None, left: Some(ids[0]), right: Some(ids[2]) },
            )
            .unwrap();

        let links = NavigationLinker::new().apply(&mut canvas, &arena, ids[1]).unwrap();
        let left = links.left.unwrap();
        let right = links.right.unwrap();
        assert!(!left.overlaps(&right));
        assert!(links.title.is_none());

        let page = canvas.page(arena.surface_of(ids[1]).unwrap()).unwrap();
        assert_eq!(page.links.len(), 2);
        assert!(page.find_text("<").is_some());
        assert!(page.find_text(">").is_some());

        let title = page.find_text("Tue").unwrap();
        let lt = page.find_text("<").unwrap();
        assert!((title.origin.x - lt.origin.x - 100.0).abs() < 0.001);
    }

    #[test]
    fn test_dangling_neighbor_draws_nothing() {
        let mut canvas = Canvas::new();
        let mut arena = PageArena::new();
        let a = arena.add("a", "A");
        let b = arena.add("b", "B");
        arena.create_surface(&mut canvas, a, 1000.0, 800.0).unwrap();
        arena
            .set_neighbors(a, Neighbors { right: Some(b), ..Default::default() })
            .unwrap();

        let result = NavigationLinker::new().apply(&mut canvas, &arena, a);
        assert!(matches!(result, Err(PlannerError::DanglingReference { ref page }) if page == "b"));
        assert!(canvas.page(arena.surface_of(a).unwrap()).unwrap().is_blank());
    }
}
