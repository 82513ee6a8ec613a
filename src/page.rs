//! # Page Nodes
//!
//! Every planner page is a [`PageNode`] stored in a [`PageArena`]. Nodes refer
//! to each other by [`PageId`] (an index into the arena), never by ownership,
//! so the parent/left/right graph can contain cycles without leaking or
//! borrowing trouble.
//!
//! A node's render surface is created once, before anything links to it:
//! links resolve to the surface handle at the moment they are emitted.

use serde::{Deserialize, Serialize};

use crate::backend::{Backend, SurfaceId};
use crate::error::PlannerError;
use crate::layout::grid::MAX_GRID_CELLS;
use crate::layout::notes::{validate_spacing, DotFill};

/// Default share of the page width given to the primary (left) region.
pub const DEFAULT_NOTES_SPLIT_RATIO: f64 = 0.5;

/// Stable identifier of a page inside its arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PageId(pub usize);

/// What a page looks like when previewed as a grid thumbnail.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum PageKind {
    /// No preview.
    #[default]
    Plain,
    /// Evenly spaced horizontal rules.
    Ruled { lines: usize },
    /// A dot grid.
    Dotted { spacing: f64 },
    /// A miniature of the page's own child grid.
    Container { rows: usize, cols: usize },
}

/// Most rules a ruled page may have.
pub const MAX_RULED_LINES: usize = 1_000;

impl PageKind {
    /// Reject kinds whose previews could not be drawn in bounded time.
    pub fn validate(&self) -> Result<(), PlannerError> {
        match *self {
            PageKind::Plain => Ok(()),
            PageKind::Ruled { lines } if lines > MAX_RULED_LINES => Err(PlannerError::config(
                format!("ruled page has {} lines, at most {} allowed", lines, MAX_RULED_LINES),
            )),
            PageKind::Ruled { .. } => Ok(()),
            PageKind::Dotted { spacing } => validate_spacing(DotFill {
                spacing_x: spacing,
                spacing_y: spacing,
            }),
            PageKind::Container { rows, cols } => match rows.checked_mul(cols) {
                Some(cells) if cells <= MAX_GRID_CELLS => Ok(()),
                _ => Err(PlannerError::config(format!(
                    "container preview of {}x{} exceeds {} cells",
                    rows, cols, MAX_GRID_CELLS
                ))),
            },
        }
    }
}

/// Navigation neighbors of a page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Neighbors {
    pub parent: Option<PageId>,
    pub left: Option<PageId>,
    pub right: Option<PageId>,
}

/// A navigable planner page.
#[derive(Debug, Clone)]
pub struct PageNode {
    id: PageId,
    key: String,
    title: String,
    grid_label: String,
    notes_split_ratio: f64,
    kind: PageKind,
    surface: Option<SurfaceId>,
    width: f64,
    height: f64,
    neighbors: Neighbors,
}

impl PageNode {
    pub fn id(&self) -> PageId {
        self.id
    }

    /// The key this page was registered under.
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Label shown when this page is a cell in a parent's grid.
    pub fn grid_label(&self) -> &str {
        &self.grid_label
    }

    pub fn notes_split_ratio(&self) -> f64 {
        self.notes_split_ratio
    }

    pub fn kind(&self) -> PageKind {
        self.kind
    }

    /// The surface handle, if it has been created.
    pub fn surface(&self) -> Option<SurfaceId> {
        self.surface
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn neighbors(&self) -> Neighbors {
        self.neighbors
    }

    pub fn parent(&self) -> Option<PageId> {
        self.neighbors.parent
    }

    pub fn left(&self) -> Option<PageId> {
        self.neighbors.left
    }

    pub fn right(&self) -> Option<PageId> {
        self.neighbors.right
    }

    /// The surface handle, or a dangling-reference error naming this page.
    pub fn require_surface(&self) -> Result<SurfaceId, PlannerError> {
        self.surface.ok_or_else(|| PlannerError::DanglingReference {
            page: self.key.clone(),
        })
    }
}

/// Owner of every page node in a document.
#[derive(Debug, Default)]
pub struct PageArena {
    nodes: Vec<PageNode>,
}

impl PageArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a page; its grid label defaults to the title.
    pub fn add(&mut self, key: impl Into<String>, title: impl Into<String>) -> PageId {
        let title = title.into();
        let id = PageId(self.nodes.len());
        self.nodes.push(PageNode {
            id,
            key: key.into(),
            grid_label: title.clone(),
            title,
            notes_split_ratio: DEFAULT_NOTES_SPLIT_RATIO,
            kind: PageKind::Plain,
            surface: None,
            width: 0.0,
            height: 0.0,
            neighbors: Neighbors::default(),
        });
        id
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, id: PageId) -> Option<&PageNode> {
        self.nodes.get(id.0)
    }

    /// Look up a node, treating an unknown id as a dangling reference.
    pub fn node(&self, id: PageId) -> Result<&PageNode, PlannerError> {
        self.nodes.get(id.0).ok_or_else(|| PlannerError::DanglingReference {
            page: format!("#{}", id.0),
        })
    }

    fn node_mut(&mut self, id: PageId) -> Result<&mut PageNode, PlannerError> {
        self.nodes
            .get_mut(id.0)
            .ok_or_else(|| PlannerError::DanglingReference {
                page: format!("#{}", id.0),
            })
    }

    /// Find a page by the key it was added under.
    pub fn find(&self, key: &str) -> Option<PageId> {
        self.nodes.iter().find(|n| n.key == key).map(|n| n.id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PageNode> {
        self.nodes.iter()
    }

    /// Surface handle of `id`, failing if the node is unknown or its surface
    /// hasn't been created.
    pub fn surface_of(&self, id: PageId) -> Result<SurfaceId, PlannerError> {
        self.node(id)?.require_surface()
    }

    pub fn set_grid_label(
        &mut self,
        id: PageId,
        label: impl Into<String>,
    ) -> Result<(), PlannerError> {
        self.node_mut(id)?.grid_label = label.into();
        Ok(())
    }

    pub fn set_kind(&mut self, id: PageId, kind: PageKind) -> Result<(), PlannerError> {
        kind.validate()?;
        self.node_mut(id)?.kind = kind;
        Ok(())
    }

    /// Set the notes split ratio; it must lie strictly between 0 and 1.
    pub fn set_notes_split_ratio(&mut self, id: PageId, ratio: f64) -> Result<(), PlannerError> {
        validate_ratio(ratio)?;
        self.node_mut(id)?.notes_split_ratio = ratio;
        Ok(())
    }

    /// Allocate the page's surface on `backend` and record its size.
    ///
    /// A page owns exactly one surface: a second call is rejected instead of
    /// orphaning the first surface.
    pub fn create_surface(
        &mut self,
        backend: &mut dyn Backend,
        id: PageId,
        height: f64,
        width: f64,
    ) -> Result<SurfaceId, PlannerError> {
        if !(height > 0.0 && width > 0.0) {
            return Err(PlannerError::config(format!(
                "page size must be positive, got {}x{}",
                width, height
            )));
        }
        let node = self.node_mut(id)?;
        if node.surface.is_some() {
            return Err(PlannerError::config(format!(
                "surface for page '{}' already created",
                node.key
            )));
        }
        let surface = backend.add_page();
        backend.set_page_size(surface, height, width);
        node.surface = Some(surface);
        node.height = height;
        node.width = width;
        Ok(surface)
    }

    /// Wire navigation neighbors. Every referenced page must exist in the
    /// arena; surfaces are checked later, when links are emitted.
    pub fn set_neighbors(&mut self, id: PageId, neighbors: Neighbors) -> Result<(), PlannerError> {
        for other in [neighbors.parent, neighbors.left, neighbors.right]
            .into_iter()
            .flatten()
        {
            self.node(other)?;
        }
        self.node_mut(id)?.neighbors = neighbors;
        Ok(())
    }

    /// Link `pages` left-to-right in order. Neighbors that are already set
    /// are kept.
    pub fn chain(&mut self, pages: &[PageId]) -> Result<(), PlannerError> {
        for (i, &id) in pages.iter().enumerate() {
            let mut neighbors = self.node(id)?.neighbors;
            if neighbors.left.is_none() {
                neighbors.left = i.checked_sub(1).map(|j| pages[j]);
            }
            if neighbors.right.is_none() {
                neighbors.right = pages.get(i + 1).copied();
            }
            self.set_neighbors(id, neighbors)?;
        }
        Ok(())
    }
}

pub(crate) fn validate_ratio(ratio: f64) -> Result<(), PlannerError> {
    if ratio > 0.0 && ratio < 1.0 {
        Ok(())
    } else {
        Err(PlannerError::config(format!(
            "notes split ratio must be between 0 and 1 (exclusive), got {}",
            ratio
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::Canvas;

    #[test]
    fn test_add_defaults() {
        let mut arena = PageArena::new();
        let id = arena.add("jan", "January");
        let node = arena.get(id).unwrap();
        assert_eq!(node.title(), "January");
        assert_eq!(node.grid_label(), "January");
        assert_eq!(node.notes_split_ratio(), DEFAULT_NOTES_SPLIT_RATIO);
        assert!(node.surface().is_none());
        assert_eq!(arena.find("jan"), Some(id));
    }

    #[test]
    fn test_create_surface_once() {
        let mut canvas = Canvas::new();
        let mut arena = PageArena::new();
        let id = arena.add("p", "Page");
        let surface = arena.create_surface(&mut canvas, id, 800.0, 600.0).unwrap();
        assert_eq!(arena.surface_of(id).unwrap(), surface);
        assert_eq!(canvas.page(surface).unwrap().width, 600.0);

        let again = arena.create_surface(&mut canvas, id, 800.0, 600.0);
        assert!(matches!(again, Err(PlannerError::Configuration(_))));
        assert_eq!(canvas.pages().len(), 1);
    }

    #[test]
    fn test_surface_of_before_creation_is_dangling() {
        let mut arena = PageArena::new();
        let id = arena.add("later", "Later");
        match arena.surface_of(id) {
            Err(PlannerError::DanglingReference { page }) => assert_eq!(page, "later"),
            other => panic!("expected dangling reference, got {:?}", other),
        }
    }

    #[test]
    fn test_ratio_bounds() {
        let mut arena = PageArena::new();
        let id = arena.add("p", "Page");
        assert!(arena.set_notes_split_ratio(id, 0.0).is_err());
        assert!(arena.set_notes_split_ratio(id, 1.0).is_err());
        assert!(arena.set_notes_split_ratio(id, f64::NAN).is_err());
        arena.set_notes_split_ratio(id, 0.3).unwrap();
        assert_eq!(arena.get(id).unwrap().notes_split_ratio(), 0.3);
    }

    #[test]
    fn test_set_neighbors_rejects_unknown_page() {
        let mut arena = PageArena::new();
        let id = arena.add("p", "Page");
        let result = arena.set_neighbors(
            id,
            Neighbors {
                parent: Some(PageId(7)),
                ..Default::default()
            },
        );
        assert!(matches!(result, Err(PlannerError::DanglingReference { .. })));
    }

    #[test]
    fn test_chain_keeps_parent() {
        let mut arena = PageArena::new();
        let year = arena.add("year", "2026");
        let months: Vec<PageId> = ["jan", "feb", "mar"]
            .iter()
            .map(|k| arena.add(*k, *k))
            .collect();
        for &m in &months {
            arena
                .set_neighbors(
                    m,
                    Neighbors {
                        parent: Some(year),
                        ..Default::default()
                    },
                )
                .unwrap();
        }
        arena.chain(&months).unwrap();

        let feb = arena.get(months[1]).unwrap();
        assert_eq!(feb.parent(), Some(year));
        assert_eq!(feb.left(), Some(months[0]));
        assert_eq!(feb.right(), Some(months[2]));
        assert_eq!(arena.get(months[0]).unwrap().left(), None);
        assert_eq!(arena.get(months[2]).unwrap().right(), None);
    }

    #[test]
    fn test_chain_keeps_explicit_neighbors() {
        let mut arena = PageArena::new();
        let a = arena.add("a", "A");
        let b = arena.add("b", "B");
        let c = arena.add("c", "C");
        arena
            .set_neighbors(b, Neighbors { right: Some(a), ..Default::default() })
            .unwrap();
        arena.chain(&[a, b, c]).unwrap();
        assert_eq!(arena.get(b).unwrap().left(), Some(a));
        assert_eq!(arena.get(b).unwrap().right(), Some(a));
        assert_eq!(arena.get(c).unwrap().left(), Some(b));
    }

    #[test]
    fn test_set_kind_rejects_unbounded_previews() {
        let mut arena = PageArena::new();
        let id = arena.add("p", "P");
        let bad = [
            PageKind::Ruled { lines: usize::MAX },
            PageKind::Dotted { spacing: 1e-300 },
            PageKind::Dotted { spacing: f64::NAN },
            PageKind::Container { rows: 1 << 33, cols: 1 << 33 },
        ];
        for kind in bad {
            assert!(
                matches!(arena.set_kind(id, kind), Err(PlannerError::Configuration(_))),
                "{:?} accepted",
                kind
            );
        }
        assert_eq!(arena.get(id).unwrap().kind(), PageKind::Plain);

        arena.set_kind(id, PageKind::Ruled { lines: MAX_RULED_LINES }).unwrap();
        arena.set_kind(id, PageKind::Dotted { spacing: 12.0 }).unwrap();
    }
}
