//! # Grid Pagination
//!
//! Splits a child list that doesn't fit one grid into consecutive windows,
//! one per container page. The first window may start part-way into the
//! grid (its first-entry offset); every later window starts at the first
//! cell of a fresh page.

use crate::error::PlannerError;

use super::grid::grid_capacity;

/// The children `start..end` placed on one container page, after leaving
/// `offset` leading cells empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowRange {
    pub offset: usize,
    pub start: usize,
    pub end: usize,
}

impl WindowRange {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// This window's slice of `all`.
    pub fn slice<'a, T>(&self, all: &'a [T]) -> &'a [T] {
        &all[self.start..self.end]
    }
}

/// Windows covering `total` children in a rows × cols grid.
///
/// Always returns at least one window, so an empty child list still gets a
/// (blank) grid on its first page.
pub fn paginate(
    total: usize,
    rows: usize,
    cols: usize,
    first_offset: usize,
) -> Result<Vec<WindowRange>, PlannerError> {
    let capacity = grid_capacity(rows, cols)?;
    if first_offset > capacity {
        return Err(PlannerError::Capacity {
            rows,
            cols,
            offset: first_offset,
            children: total,
        });
    }

    let first = total.min(capacity - first_offset);
    let mut windows = vec![WindowRange {
        offset: first_offset,
        start: 0,
        end: first,
    }];

    let mut start = first;
    while start < total {
        let end = total.min(start + capacity);
        windows.push(WindowRange {
            offset: 0,
            start,
            end,
        });
        start = end;
    }

    Ok(windows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn huge_offset_is_a_capacity_error() {
        assert!(matches!(
            paginate(1, 2, 3, usize::MAX),
            Err(PlannerError::Capacity { offset: usize::MAX, .. })
        ));
    }

    #[test]
    fn oversized_grid_is_a_configuration_error() {
        assert!(matches!(
            paginate(1, 1 << 33, 1 << 33, 0),
            Err(PlannerError::Configuration(_))
        ));
        assert!(matches!(paginate(1, 0, 3, 0), Err(PlannerError::Configuration(_))));
    }

    #[test]
    fn everything_fits() {
        let windows = paginate(5, 2, 3, 0).unwrap();
        assert_eq!(windows, vec![WindowRange { offset: 0, start: 0, end: 5 }]);
    }

    #[test]
    fn spills_onto_following_pages() {
        let windows = paginate(14, 2, 3, 0).unwrap();
        assert_eq!(
            windows,
            vec![
                WindowRange { offset: 0, start: 0, end: 6 },
                WindowRange { offset: 0, start: 6, end: 12 },
                WindowRange { offset: 0, start: 12, end: 14 },
            ]
        );
    }

    #[test]
    fn first_offset_shrinks_first_window() {
        // a month starting on a Thursday: three blank cells first
        let windows = paginate(10, 2, 4, 3).unwrap();
        assert_eq!(windows[0], WindowRange { offset: 3, start: 0, end: 5 });
        assert_eq!(windows[1], WindowRange { offset: 0, start: 5, end: 10 });
        assert_eq!(windows.len(), 2);
    }

    #[test]
    fn full_offset_leaves_first_page_blank() {
        let windows = paginate(2, 2, 3, 6).unwrap();
        assert!(windows[0].is_empty());
        assert_eq!(windows[1], WindowRange { offset: 0, start: 0, end: 2 });
    }

    #[test]
    fn empty_list_gets_one_window() {
        let windows = paginate(0, 2, 3, 5).unwrap();
        assert_eq!(windows, vec![WindowRange { offset: 5, start: 0, end: 0 }]);
    }

    #[test]
    fn windows_never_exceed_capacity() {
        for total in 0..40 {
            for offset in 0..=6 {
                let windows = paginate(total, 2, 3, offset).unwrap();
                let covered: usize = windows.iter().map(|w| w.len()).sum();
                assert_eq!(covered, total);
                for w in &windows {
                    assert!(w.offset + w.len() <= 6);
                }
            }
        }
    }

    #[test]
    fn bad_grids_rejected() {
        assert!(matches!(paginate(3, 0, 3, 0), Err(PlannerError::Configuration(_))));
        assert!(matches!(paginate(3, 2, 3, 7), Err(PlannerError::Capacity { .. })));
    }

    #[test]
    fn slice_selects_children() {
        let names = ["a", "b", "c", "d"];
        let w = WindowRange { offset: 0, start: 1, end: 3 };
        assert_eq!(w.slice(&names), &["b", "c"]);
    }
}
