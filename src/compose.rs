//! # Planner Composition
//!
//! Turns a [`Planner`] description into drawn pages in two passes:
//!
//! 1. Build the page arena, resolve every key, and create every page's
//!    surface. Links resolve to surfaces when they are emitted, so all
//!    surfaces must exist before any page is drawn.
//! 2. Draw each page: navigation, then the notes section, then any grid
//!    windows assigned to it.
//!
//! Description errors (duplicate or unknown keys, a bad page size) fail the
//! whole composition. Drawing errors stay local: the failing step is skipped,
//! recorded as a [`PageFailure`], and composition carries on with the next
//! step and the next page.

use std::fmt;

use crate::backend::Backend;
use crate::canvas::Canvas;
use crate::error::PlannerError;
use crate::geometry::Rect;
use crate::layout::{
    paginate, DotFill, GridLayoutEngine, GridPlacement, GridWindow, NavigationLinker,
    NotesSectionLayout,
};
use crate::model::{PageConfig, Planner};
use crate::page::{Neighbors, PageArena, PageId};

/// The drawing step a failure happened in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Navigation,
    Notes,
    Grid,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Navigation => write!(f, "navigation"),
            Stage::Notes => write!(f, "notes"),
            Stage::Grid => write!(f, "grid"),
        }
    }
}

/// A drawing step that was skipped on one page.
#[derive(Debug)]
pub struct PageFailure {
    pub page: String,
    pub stage: Stage,
    pub error: PlannerError,
}

/// A grid window assigned to a page.
#[derive(Debug, Clone)]
struct GridJob {
    region: Rect,
    rows: usize,
    cols: usize,
    children: Vec<PageId>,
    offset: usize,
    padding: f64,
    links: bool,
    thumbnails: bool,
}

/// The composed planner: drawn pages plus what went wrong.
pub struct Composition {
    canvas: Canvas,
    arena: PageArena,
    grids: Vec<(PageId, GridPlacement)>,
    failures: Vec<PageFailure>,
}

impl Composition {
    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn arena(&self) -> &PageArena {
        &self.arena
    }

    pub fn failures(&self) -> &[PageFailure] {
        &self.failures
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    /// Grid placements drawn on `page`, in drawing order.
    pub fn grids_on(&self, page: PageId) -> impl Iterator<Item = &GridPlacement> {
        self.grids
            .iter()
            .filter(move |(id, _)| *id == page)
            .map(|(_, placement)| placement)
    }

    pub fn page_id(&self, key: &str) -> Option<PageId> {
        self.arena.find(key)
    }

    pub fn into_canvas(self) -> Canvas {
        self.canvas
    }
}

/// The layout components used to draw every page.
#[derive(Debug, Clone, Default)]
pub struct Composer {
    pub navigation: NavigationLinker,
    pub notes: NotesSectionLayout,
    pub grid: GridLayoutEngine,
}

impl Composer {
    /// Components configured from the planner's page settings.
    pub fn from_config(config: &PageConfig) -> Self {
        let mut composer = Composer::default();
        composer.navigation.font = config.font.clone();
        composer.notes.font = config.font.clone();
        composer.grid.font = config.font.clone();
        composer.notes.dot_fill = config.dot_fill.map(|d| DotFill {
            spacing_x: d.x,
            spacing_y: d.y,
        });
        composer
    }

    pub fn compose(&self, planner: &Planner) -> Result<Composition, PlannerError> {
        let config = &planner.page;
        let mut arena = PageArena::new();
        let mut failures = Vec::new();

        for spec in &planner.pages {
            if arena.find(&spec.key).is_some() {
                return Err(PlannerError::config(format!(
                    "duplicate page key '{}'",
                    spec.key
                )));
            }
            let id = arena.add(spec.key.clone(), spec.title.clone());
            if let Some(label) = &spec.grid_label {
                arena.set_grid_label(id, label.clone())?;
            }
            arena.set_kind(id, spec.kind)?;
        }

        let resolve = |arena: &PageArena, key: &str, from: &str| {
            arena.find(key).ok_or_else(|| {
                PlannerError::config(format!(
                    "page '{}' references unknown page '{}'",
                    from, key
                ))
            })
        };

        let mut notes_enabled = vec![false; planner.pages.len()];
        for (idx, spec) in planner.pages.iter().enumerate() {
            let id = PageId(idx);
            let neighbors = Neighbors {
                parent: spec.parent.as_deref().map(|k| resolve(&arena, k, &spec.key)).transpose()?,
                left: spec.left.as_deref().map(|k| resolve(&arena, k, &spec.key)).transpose()?,
                right: spec.right.as_deref().map(|k| resolve(&arena, k, &spec.key)).transpose()?,
            };
            arena.set_neighbors(id, neighbors)?;

            if spec.notes {
                let ratio = spec.notes_ratio.unwrap_or(config.notes_ratio);
                match arena.set_notes_split_ratio(id, ratio) {
                    Ok(()) => notes_enabled[idx] = true,
                    Err(error) => record(&mut failures, &spec.key, Stage::Notes, error),
                }
            }
        }

        for chain in &planner.chains {
            let ids = chain
                .iter()
                .map(|k| resolve(&arena, k, "chains"))
                .collect::<Result<Vec<_>, _>>()?;
            arena.chain(&ids)?;
        }

        let mut jobs: Vec<Vec<GridJob>> = vec![Vec::new(); planner.pages.len()];
        for (idx, spec) in planner.pages.iter().enumerate() {
            let Some(grid) = &spec.grid else { continue };
            let children = grid
                .children
                .iter()
                .map(|k| resolve(&arena, k, &spec.key))
                .collect::<Result<Vec<_>, _>>()?;
            let continuations = grid
                .continuations
                .iter()
                .map(|k| resolve(&arena, k, &spec.key))
                .collect::<Result<Vec<_>, _>>()?;

            let job = |children: &[PageId], offset: usize| GridJob {
                region: grid.region,
                rows: grid.rows,
                cols: grid.cols,
                children: children.to_vec(),
                offset,
                padding: grid.padding,
                links: grid.links,
                thumbnails: grid.thumbnails,
            };

            if continuations.is_empty() {
                jobs[idx].push(job(&children, grid.offset));
                continue;
            }

            let windows = match paginate(children.len(), grid.rows, grid.cols, grid.offset) {
                Ok(windows) => windows,
                Err(error) => {
                    record(&mut failures, &spec.key, Stage::Grid, error);
                    continue;
                }
            };
            if windows.len() > continuations.len() + 1 {
                let error = PlannerError::Capacity {
                    rows: grid.rows,
                    cols: grid.cols,
                    offset: grid.offset,
                    children: children.len(),
                };
                log::warn!(
                    "grid on '{}' needs {} pages but has {}: {}",
                    spec.key,
                    windows.len(),
                    continuations.len() + 1,
                    error
                );
                record(&mut failures, &spec.key, Stage::Grid, error);
                continue;
            }

            let pages = std::iter::once(PageId(idx)).chain(continuations.iter().copied());
            for (i, page) in pages.enumerate() {
                let assigned = match windows.get(i) {
                    Some(window) => job(window.slice(&children), window.offset),
                    None => job(&[], 0),
                };
                jobs[page.0].push(assigned);
            }
        }

        // Pass one: every surface exists before anything links to it.
        let mut canvas = Canvas::new();
        for idx in 0..planner.pages.len() {
            arena.create_surface(&mut canvas, PageId(idx), config.height, config.width)?;
        }

        // Pass two: draw.
        let mut grids = Vec::new();
        for (idx, spec) in planner.pages.iter().enumerate() {
            let id = PageId(idx);
            log::debug!("composing page '{}'", spec.key);

            if let Err(error) = self.navigation.apply(&mut canvas, &arena, id) {
                record(&mut failures, &spec.key, Stage::Navigation, error);
            }

            if notes_enabled[idx] {
                if let Err(error) = self.notes.apply(&mut canvas, &arena, id) {
                    record(&mut failures, &spec.key, Stage::Notes, error);
                }
            }

            for job in &jobs[idx] {
                let window = GridWindow::new(job.region, job.rows, job.cols, &job.children)
                    .with_offset(job.offset)
                    .with_padding(job.padding)
                    .with_annotations(job.links)
                    .with_thumbnails(job.thumbnails);
                match self.grid.place(&mut canvas, &arena, id, &window) {
                    Ok(placement) => grids.push((id, placement)),
                    Err(error) => record(&mut failures, &spec.key, Stage::Grid, error),
                }
            }
        }

        log::debug!(
            "composed {} page(s), {} failure(s)",
            canvas.pages().len(),
            failures.len()
        );

        Ok(Composition {
            canvas,
            arena,
            grids,
            failures,
        })
    }
}

fn record(failures: &mut Vec<PageFailure>, page: &str, stage: Stage, error: PlannerError) {
    if stage != Stage::Grid {
        // the grid engine logs its own rejections
        log::warn!("page '{}': {} skipped: {}", page, stage, error);
    }
    failures.push(PageFailure {
        page: page.to_string(),
        stage,
        error,
    });
}

/// Compose `planner` with components configured from its page settings.
pub fn compose(planner: &Planner) -> Result<Composition, PlannerError> {
    Composer::from_config(&planner.page).compose(planner)
}
