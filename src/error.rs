//! Structured error types for planner composition.
//!
//! Every variant is local to a single operation: a failed grid or link on one
//! page never aborts the rest of the document.

use thiserror::Error;

/// The unified error type returned by all public Almanac API functions.
#[derive(Debug, Error)]
pub enum PlannerError {
    /// A grid placement asked for more cells than the grid has.
    #[error(
        "too many objects to fit in grid: rows {rows}, cols {cols}, \
         first entry offset {offset}, objects {children}"
    )]
    Capacity {
        rows: usize,
        cols: usize,
        offset: usize,
        children: usize,
    },

    /// A link or grid cell points at a page whose surface does not exist yet.
    #[error("page '{page}' has no surface to link to")]
    DanglingReference { page: String },

    /// Geometry or description values that would produce nonsense output.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// JSON input failed to parse as a planner description.
    #[error("failed to parse planner: {source}")]
    Parse {
        #[source]
        source: serde_json::Error,
        hint: String,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl PlannerError {
    pub(crate) fn config(message: impl Into<String>) -> Self {
        PlannerError::Configuration(message.into())
    }

    /// A short suggestion for fixing parse errors, if there is one.
    pub fn hint(&self) -> Option<&str> {
        match self {
            PlannerError::Parse { hint, .. } if !hint.is_empty() => Some(hint),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for PlannerError {
    fn from(e: serde_json::Error) -> Self {
        let hint = match e.classify() {
            serde_json::error::Category::Syntax => {
                "Check for trailing commas, missing quotes, or unescaped characters.".to_string()
            }
            serde_json::error::Category::Data => {
                "The JSON is valid but doesn't match the planner schema. Check field names and types."
                    .to_string()
            }
            serde_json::error::Category::Eof => {
                "Unexpected end of input. Is the JSON truncated?".to_string()
            }
            serde_json::error::Category::Io => String::new(),
        };
        PlannerError::Parse { source: e, hint }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capacity_message_carries_context() {
        let err = PlannerError::Capacity {
            rows: 2,
            cols: 3,
            offset: 1,
            children: 6,
        };
        let msg = err.to_string();
        assert!(msg.contains("rows 2"));
        assert!(msg.contains("cols 3"));
        assert!(msg.contains("offset 1"));
        assert!(msg.contains("objects 6"));
    }

    #[test]
    fn syntax_errors_get_a_hint() {
        let err: PlannerError = serde_json::from_str::<serde_json::Value>("{\"a\": 1,}")
            .unwrap_err()
            .into();
        assert!(err.hint().unwrap().contains("trailing commas"));
    }

    #[test]
    fn non_parse_errors_have_no_hint() {
        let err = PlannerError::config("bad");
        assert!(err.hint().is_none());
        assert_eq!(err.to_string(), "configuration error: bad");
    }
}
