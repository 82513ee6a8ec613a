//! # Planner Description
//!
//! The input representation for the composer: every page of the planner,
//! how the pages link to each other, and which pages show a grid of
//! children. It is designed to be produced by whatever generates the page
//! list (a calendar script, a template, hand-written JSON).
//!
//! Pages reference each other by `key`. Keys are resolved when the planner
//! is composed; an unknown key is a configuration error.

use serde::{Deserialize, Serialize};

use crate::error::PlannerError;
use crate::geometry::Rect;
use crate::page::{PageKind, DEFAULT_NOTES_SPLIT_RATIO};

/// A complete planner ready for composition.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Planner {
    /// Document metadata (title, author, etc.)
    #[serde(default)]
    pub metadata: Metadata,

    /// Page size and defaults shared by every page.
    #[serde(default)]
    pub page: PageConfig,

    /// Every page, in output order.
    pub pages: Vec<PageSpec>,

    /// Ordered runs of page keys whose left/right arrows link them in
    /// sequence. An explicit `left`/`right` on a page wins.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub chains: Vec<Vec<String>>,
}

/// Document metadata embedded in the PDF.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Metadata {
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
}

/// Page size and per-page defaults, in points.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageConfig {
    #[serde(default = "default_width")]
    pub width: f64,

    #[serde(default = "default_height")]
    pub height: f64,

    /// Notes split ratio for pages that don't set their own.
    #[serde(default = "default_notes_ratio")]
    pub notes_ratio: f64,

    #[serde(default = "default_font")]
    pub font: String,

    /// Dotted notes background. Off unless set: it inflates the file a lot.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dot_fill: Option<DotSpacing>,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            notes_ratio: default_notes_ratio(),
            font: default_font(),
            dot_fill: None,
        }
    }
}

/// Dot spacing of the notes background.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DotSpacing {
    pub x: f64,
    pub y: f64,
}

/// One page of the planner.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSpec {
    pub key: String,
    pub title: String,

    /// Label used in a parent's grid. Defaults to the title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grid_label: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes_ratio: Option<f64>,

    /// Whether to draw the notes section.
    #[serde(default = "default_true")]
    pub notes: bool,

    #[serde(default)]
    pub kind: PageKind,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grid: Option<GridSpec>,
}

impl PageSpec {
    pub fn new(key: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            title: title.into(),
            grid_label: None,
            notes_ratio: None,
            notes: true,
            kind: PageKind::Plain,
            parent: None,
            left: None,
            right: None,
            grid: None,
        }
    }
}

/// A grid of child pages drawn on a container page.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridSpec {
    /// Grid area, top-down page coordinates.
    pub region: Rect,
    pub rows: usize,
    pub cols: usize,

    /// Keys of the child pages, in placement order.
    #[serde(default)]
    pub children: Vec<String>,

    /// Leading cells left empty on the first page.
    #[serde(default)]
    pub offset: usize,

    #[serde(default)]
    pub padding: f64,

    /// Make each cell a link to its child.
    #[serde(default = "default_true")]
    pub links: bool,

    #[serde(default)]
    pub thumbnails: bool,

    /// Container pages that take the children that don't fit here.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub continuations: Vec<String>,
}

impl GridSpec {
    pub fn new(region: Rect, rows: usize, cols: usize, children: Vec<String>) -> Self {
        Self {
            region,
            rows,
            cols,
            children,
            offset: 0,
            padding: 0.0,
            links: true,
            thumbnails: false,
            continuations: Vec::new(),
        }
    }
}

fn default_width() -> f64 {
    1404.0
}

fn default_height() -> f64 {
    1872.0
}

fn default_notes_ratio() -> f64 {
    DEFAULT_NOTES_SPLIT_RATIO
}

fn default_font() -> String {
    "Helvetica".to_string()
}

fn default_true() -> bool {
    true
}

impl Planner {
    pub fn from_json(json: &str) -> Result<Self, PlannerError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json_pretty(&self) -> Result<String, PlannerError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn page(&self, key: &str) -> Option<&PageSpec> {
        self.pages.iter().find(|p| p.key == key)
    }

    /// A small sample planner: an index, a year of months, and eight note
    /// pages paginated over two collection pages.
    pub fn sample() -> Self {
        const MONTHS: [&str; 12] = [
            "January", "February", "March", "April", "May", "June", "July",
            "August", "September", "October", "November", "December",
        ];
        let grid_region = Rect::new(140.0, 130.0, 1384.0, 1850.0);
        let mut pages = Vec::new();

        let mut index = PageSpec::new("index", "Index");
        index.notes = false;
        index.grid = Some(GridSpec {
            padding: 20.0,
            ..GridSpec::new(
                Rect::new(140.0, 130.0, 1384.0, 530.0),
                1,
                2,
                vec!["2026".to_string(), "notes-1".to_string()],
            )
        });
        pages.push(index);

        let month_keys: Vec<String> = (1..=12).map(|m| format!("2026-{:02}", m)).collect();
        let mut year = PageSpec::new("2026", "2026");
        year.notes = false;
        year.parent = Some("index".to_string());
        year.kind = PageKind::Container { rows: 4, cols: 3 };
        year.grid = Some(GridSpec {
            padding: 10.0,
            thumbnails: true,
            ..GridSpec::new(grid_region, 4, 3, month_keys.clone())
        });
        pages.push(year);

        for (key, name) in month_keys.iter().zip(MONTHS) {
            let mut month = PageSpec::new(key.clone(), format!("{} 2026", name));
            month.grid_label = Some(name.to_string());
            month.kind = PageKind::Ruled { lines: 6 };
            month.parent = Some("2026".to_string());
            pages.push(month);
        }

        let note_keys: Vec<String> = (1..=8).map(|n| format!("note-{}", n)).collect();
        for (i, collection) in ["notes-1", "notes-2"].iter().enumerate() {
            let mut page = PageSpec::new(*collection, format!("Notes {}", "I".repeat(i + 1)));
            page.notes = false;
            page.parent = Some("index".to_string());
            page.kind = PageKind::Container { rows: 3, cols: 2 };
            if i == 0 {
                page.grid = Some(GridSpec {
                    padding: 15.0,
                    thumbnails: true,
                    continuations: vec!["notes-2".to_string()],
                    ..GridSpec::new(grid_region, 3, 2, note_keys.clone())
                });
            }
            pages.push(page);
        }
        for (i, key) in note_keys.iter().enumerate() {
            let mut note = PageSpec::new(key.clone(), format!("Note {}", i + 1));
            note.kind = PageKind::Dotted { spacing: 12.0 };
            note.notes_ratio = Some(0.3);
            note.parent = Some(if i < 6 { "notes-1" } else { "notes-2" }.to_string());
            pages.push(note);
        }

        Planner {
            metadata: Metadata {
                title: Some("Planner 2026".to_string()),
                author: None,
                subject: None,
            },
            page: PageConfig::default(),
            pages,
            chains: vec![
                month_keys,
                note_keys,
                vec!["notes-1".to_string(), "notes-2".to_string()],
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_json_uses_defaults() {
        let planner = Planner::from_json(r#"{ "pages": [ { "key": "a", "title": "A" } ] }"#).unwrap();
        assert_eq!(planner.page.width, 1404.0);
        assert_eq!(planner.page.height, 1872.0);
        assert_eq!(planner.page.notes_ratio, 0.5);
        assert!(planner.page.dot_fill.is_none());
        let a = planner.page("a").unwrap();
        assert!(a.notes);
        assert_eq!(a.kind, PageKind::Plain);
        assert!(a.grid.is_none());
    }

    #[test]
    fn test_grid_and_kind_fields() {
        let json = r#"{
            "pages": [{
                "key": "year",
                "title": "2026",
                "kind": { "type": "container", "rows": 4, "cols": 3 },
                "grid": {
                    "region": { "xStart": 0, "yStart": 100, "xStop": 600, "yStop": 900 },
                    "rows": 4,
                    "cols": 3,
                    "children": ["jan", "feb"],
                    "offset": 2,
                    "padding": 10,
                    "thumbnails": true
                }
            }]
        }"#;
        let planner = Planner::from_json(json).unwrap();
        let year = planner.page("year").unwrap();
        assert_eq!(year.kind, PageKind::Container { rows: 4, cols: 3 });
        let grid = year.grid.as_ref().unwrap();
        assert_eq!(grid.region, Rect::new(0.0, 100.0, 600.0, 900.0));
        assert_eq!(grid.offset, 2);
        assert!(grid.links);
        assert!(grid.thumbnails);
        assert!(grid.continuations.is_empty());
    }

    #[test]
    fn test_missing_pages_is_a_parse_error() {
        let err = Planner::from_json(r#"{ "page": {} }"#).unwrap_err();
        assert!(matches!(err, PlannerError::Parse { .. }));
        assert!(err.hint().unwrap().contains("schema"));
    }

    #[test]
    fn test_sample_round_trips_through_json() {
        let sample = Planner::sample();
        let json = sample.to_json_pretty().unwrap();
        let back = Planner::from_json(&json).unwrap();
        assert_eq!(back.pages.len(), sample.pages.len());
        assert_eq!(back.chains, sample.chains);
    }

    #[test]
    fn test_sample_shape() {
        let sample = Planner::sample();
        // index + year + 12 months + 2 collections + 8 notes
        assert_eq!(sample.pages.len(), 24);
        let notes = sample.page("notes-1").unwrap().grid.as_ref().unwrap();
        assert_eq!(notes.children.len(), 8);
        assert_eq!(notes.continuations, vec!["notes-2".to_string()]);
    }
}
