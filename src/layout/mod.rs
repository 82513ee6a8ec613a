//! # Planner Page Layout
//!
//! The components that draw a planner page, in the order the composer runs
//! them:
//!
//! 1. [`navigation`]: the title (linking to the parent) and the left/right
//!    arrows (linking to siblings).
//! 2. [`notes`]: the notes divider, its label and the margin rule.
//! 3. [`grid`]: a window of child pages as a grid of labelled, clickable
//!    cells, optionally with [`thumbnail`] previews.
//!
//! [`paginate`] splits a long child list into one grid window per container
//! page. The grid engine itself only ever sees one window.
//!
//! Layout math is top-down; everything handed to the backend is flipped into
//! PDF space first.

pub mod grid;
pub mod navigation;
pub mod notes;
pub mod paginate;
pub mod thumbnail;

pub use grid::{GridLayoutEngine, GridPlacement, GridWindow, PlacedCell};
pub use navigation::{NavigationLinker, NavigationLinks};
pub use notes::{DotFill, NotesSection, NotesSectionLayout};
pub use paginate::{paginate, WindowRange};
pub use thumbnail::Thumbnail;

/// Font every planner component draws with.
pub const DEFAULT_FONT: &str = "Helvetica";

/// Font size of page titles. The notes divider and label are placed below it.
pub const TITLE_FONT_SIZE: f64 = 45.0;
