//! # Almanac
//!
//! A hyperlinked PDF planner composer.
//!
//! A planner is a set of pages arranged as a tree. Each page shows its title
//! (linking to its parent), arrows to its left and right siblings, an
//! optional notes section, and optionally a grid of its children, where every
//! cell links to the child page. Long child lists are paginated over
//! continuation pages.
//!
//! ## Architecture
//!
//! ```text
//! Input (JSON)
//!       ↓
//!   [model]    Planner description: pages, neighbors, grids
//!       ↓
//!   [compose]  Build the page arena, create surfaces, draw every page
//!       ↓          via [layout] onto a [backend::Backend] ([canvas])
//!   [pdf]      Serialize the canvas to PDF bytes
//! ```

pub mod backend;
pub mod canvas;
pub mod compose;
pub mod error;
pub mod font;
pub mod geometry;
pub mod layout;
pub mod model;
pub mod page;
pub mod pdf;

pub use compose::{compose, Composition, PageFailure};
pub use error::PlannerError;
pub use model::Planner;

use pdf::PdfWriter;

/// Render a planner to PDF bytes.
///
/// Per-page drawing failures are logged and the affected parts left blank;
/// use [`compose`] to inspect them.
pub fn render(planner: &Planner) -> Result<Vec<u8>, PlannerError> {
    let composition = compose(planner)?;
    Ok(PdfWriter::new().write(composition.canvas(), &planner.metadata))
}

/// Render a planner described as JSON to PDF bytes.
pub fn render_json(json: &str) -> Result<Vec<u8>, PlannerError> {
    let planner = Planner::from_json(json)?;
    render(&planner)
}
