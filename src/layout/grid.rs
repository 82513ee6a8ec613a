//! # Grid Layout Engine
//!
//! Places a window of child pages into a uniform rows × cols grid on a
//! container page. Every placed child gets its grid label centered in its
//! cell, and optionally a link to the child's page and a thumbnail preview.
//! Separator lines are drawn whether or not any child was placed.
//!
//! ## Pagination
//!
//! The engine knows nothing about other pages. A long list of children is
//! spread over several container pages by calling [`GridLayoutEngine::place`]
//! once per page with a different window of children, and with
//! `first_entry_offset` leaving leading cells empty where the previous page's
//! window ended mid-grid (see [`super::paginate`]).
//!
//! Cells are visited row-major. The first `first_entry_offset` cells are
//! skipped, then children fill the following cells in order, and any cells
//! left over stay empty.
//!
//! ## Validation
//!
//! A window that asks for more cells than the grid has is rejected whole with
//! [`PlannerError::Capacity`]: no labels, links or lines are drawn. The same
//! holds for degenerate geometry and for children whose surfaces don't exist.

use crate::backend::Backend;
use crate::error::PlannerError;
use crate::geometry::{centered_text_x, Rect};
use crate::page::{PageArena, PageId};

use super::thumbnail::preview_area;
use super::DEFAULT_FONT;

pub const LABEL_FONT_SIZE: f64 = 25.0;
/// Distance from the top of a padded cell down to the label baseline.
pub const LABEL_BASELINE_OFFSET: f64 = 30.0;
/// Height reserved for the label above a thumbnail. Cell links stop here
/// when thumbnails are drawn.
pub const THUMBNAIL_LABEL_BAND: f64 = 50.0;
/// Row separators are heavier than column separators.
pub const ROW_SEPARATOR_WIDTH: f64 = 2.0;
pub const COLUMN_SEPARATOR_WIDTH: f64 = 1.0;
/// Largest rows × cols a grid may have.
pub const MAX_GRID_CELLS: usize = 10_000;

/// Number of cells in a rows × cols grid, rejecting empty and oversized
/// grids.
pub(crate) fn grid_capacity(rows: usize, cols: usize) -> Result<usize, PlannerError> {
    if rows == 0 || cols == 0 {
        return Err(PlannerError::config(format!(
            "grid needs at least one row and column, got {}x{}",
            rows, cols
        )));
    }
    match rows.checked_mul(cols) {
        Some(cells) if cells <= MAX_GRID_CELLS => Ok(cells),
        _ => Err(PlannerError::config(format!(
            "grid of {}x{} exceeds {} cells",
            rows, cols, MAX_GRID_CELLS
        ))),
    }
}

/// One grid placement request.
///
/// `region` is in top-down page coordinates.
#[derive(Debug, Clone)]
pub struct GridWindow<'a> {
    pub region: Rect,
    pub rows: usize,
    pub cols: usize,
    pub children: &'a [PageId],
    /// Cells to leave empty before the first child.
    pub first_entry_offset: usize,
    pub padding: f64,
    pub create_annotations: bool,
    pub create_thumbnail: bool,
}

/// A child assigned to a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridSlot {
    pub row: usize,
    pub col: usize,
    pub child: PageId,
}

impl<'a> GridWindow<'a> {
    /// A window with no offset, no padding, links on and thumbnails off.
    pub fn new(region: Rect, rows: usize, cols: usize, children: &'a [PageId]) -> Self {
        Self {
            region,
            rows,
            cols,
            children,
            first_entry_offset: 0,
            padding: 0.0,
            create_annotations: true,
            create_thumbnail: false,
        }
    }

    pub fn with_offset(mut self, offset: usize) -> Self {
        self.first_entry_offset = offset;
        self
    }

    pub fn with_padding(mut self, padding: f64) -> Self {
        self.padding = padding;
        self
    }

    pub fn with_annotations(mut self, enabled: bool) -> Self {
        self.create_annotations = enabled;
        self
    }

    pub fn with_thumbnails(mut self, enabled: bool) -> Self {
        self.create_thumbnail = enabled;
        self
    }

    pub fn capacity(&self) -> usize {
        self.rows.saturating_mul(self.cols)
    }

    pub fn x_step(&self) -> f64 {
        self.region.width() / self.cols as f64
    }

    pub fn y_step(&self) -> f64 {
        self.region.height() / self.rows as f64
    }

    /// Check geometry, then capacity.
    pub fn validate(&self) -> Result<(), PlannerError> {
        let capacity = grid_capacity(self.rows, self.cols)?;
        if self.region.is_degenerate() {
            return Err(PlannerError::config(format!(
                "grid region {:?} has no area",
                self.region
            )));
        }
        if self.padding.is_nan()
            || self.padding < 0.0
            || self.padding * 2.0 >= self.x_step()
            || self.padding * 2.0 >= self.y_step()
        {
            return Err(PlannerError::config(format!(
                "padding {} collapses a {:.2}x{:.2} cell",
                self.padding,
                self.x_step(),
                self.y_step()
            )));
        }
        let needed = self.first_entry_offset.checked_add(self.children.len());
        if needed.map_or(true, |n| n > capacity) {
            return Err(PlannerError::Capacity {
                rows: self.rows,
                cols: self.cols,
                offset: self.first_entry_offset,
                children: self.children.len(),
            });
        }
        Ok(())
    }

    /// Unpadded rectangle of a cell.
    pub fn cell(&self, row: usize, col: usize) -> Rect {
        let x = self.region.x_start + self.x_step() * col as f64;
        let y = self.region.y_start + self.y_step() * row as f64;
        Rect::new(x, y, x + self.x_step(), y + self.y_step())
    }

    /// Cell rectangle with every edge pulled in by the padding.
    pub fn padded_cell(&self, row: usize, col: usize) -> Rect {
        self.cell(row, col).shrink(self.padding)
    }

    /// Which child lands in which cell. Pure; assumes a valid window.
    pub fn slots(&self) -> Vec<GridSlot> {
        let mut slots = Vec::with_capacity(self.children.len());
        let mut skip = self.first_entry_offset;
        let mut object_index = 0;

        for row in 0..self.rows {
            for col in 0..self.cols {
                if skip > 0 {
                    skip -= 1;
                    continue;
                }
                if object_index < self.children.len() {
                    slots.push(GridSlot {
                        row,
                        col,
                        child: self.children[object_index],
                    });
                    object_index += 1;
                }
            }
        }
        slots
    }
}

/// A child drawn into a cell.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedCell {
    pub child: PageId,
    pub row: usize,
    pub col: usize,
    /// Padded cell, top-down.
    pub padded: Rect,
    /// Label baseline origin, PDF space.
    pub label_x: f64,
    pub label_y: f64,
    /// Link rectangle, PDF space.
    pub link: Option<Rect>,
}

/// Result of a successful placement.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GridPlacement {
    pub cells: Vec<PlacedCell>,
    pub row_separators: usize,
    pub column_separators: usize,
}

impl GridPlacement {
    pub fn cell_at(&self, row: usize, col: usize) -> Option<&PlacedCell> {
        self.cells.iter().find(|c| c.row == row && c.col == col)
    }
}

#[derive(Debug, Clone)]
pub struct GridLayoutEngine {
    pub font: String,
    pub label_size: f64,
}

impl Default for GridLayoutEngine {
    fn default() -> Self {
        Self {
            font: DEFAULT_FONT.to_string(),
            label_size: LABEL_FONT_SIZE,
        }
    }
}

impl GridLayoutEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw `window` onto the surface of `page`.
    pub fn place(
        &self,
        backend: &mut dyn Backend,
        arena: &PageArena,
        page: PageId,
        window: &GridWindow<'_>,
    ) -> Result<GridPlacement, PlannerError> {
        let node = arena.node(page)?;
        let surface = node.require_surface()?;
        let page_height = node.height();

        if let Err(err) = window.validate() {
            log::warn!("grid on '{}' rejected: {}", node.key(), err);
            return Err(err);
        }

        // Resolve every child up front so a bad reference draws nothing.
        let mut targets = Vec::with_capacity(window.children.len());
        for &child in window.children {
            let child_node = arena.node(child)?;
            let target = if window.create_annotations {
                match child_node.require_surface() {
                    Ok(s) => Some(s),
                    Err(err) => {
                        log::warn!("grid on '{}' rejected: {}", node.key(), err);
                        return Err(err);
                    }
                }
            } else {
                None
            };
            targets.push((child_node, target));
        }

        let font = backend.font(&self.font);
        backend.set_font_and_size(surface, font, self.label_size);

        let mut placement = GridPlacement::default();
        for (slot, (child, target)) in window.slots().into_iter().zip(targets) {
            let padded = window.padded_cell(slot.row, slot.col);
            let label = child.grid_label();
            let label_x = centered_text_x(backend, surface, label, padded.x_start, padded.x_stop);
            let label_y = page_height - padded.y_start - LABEL_BASELINE_OFFSET;

            backend.begin_text(surface);
            backend.move_text_pos(surface, label_x, label_y);

            let link = target.map(|target| {
                // with a thumbnail only the label band is clickable
                let area = if window.create_thumbnail {
                    Rect {
                        y_stop: padded.y_start + THUMBNAIL_LABEL_BAND,
                        ..padded
                    }
                } else {
                    padded
                };
                let rect = area.flip(page_height);
                backend.link_to(surface, rect, target);
                rect
            });

            backend.show_text(surface, label);
            backend.end_text(surface);

            if window.create_thumbnail {
                if let (Some(thumbnail), Some(area)) = (child.kind().thumbnail(), preview_area(padded)) {
                    thumbnail.draw_thumbnail(backend, surface, page_height, area);
                }
            }

            placement.cells.push(PlacedCell {
                child: slot.child,
                row: slot.row,
                col: slot.col,
                padded,
                label_x,
                label_y,
                link,
            });
        }

        let region = window.region;
        for row in 0..window.rows {
            let y = page_height - (region.y_start + window.y_step() * row as f64);
            backend.draw_line(surface, ROW_SEPARATOR_WIDTH, (region.x_start, y), (region.x_stop, y));
            placement.row_separators += 1;
        }
        for col in 1..window.cols {
            let x = region.x_start + window.x_step() * col as f64;
            backend.draw_line(
                surface,
                COLUMN_SEPARATOR_WIDTH,
                (x, page_height - region.y_start),
                (x, page_height - region.y_stop),
            );
            placement.column_separators += 1;
        }

        log::debug!(
            "grid on '{}': {} of {} cells filled (offset {})",
            node.key(),
            placement.cells.len(),
            window.capacity(),
            window.first_entry_offset
        );
        Ok(placement)
    }
}
