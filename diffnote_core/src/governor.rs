//! Truncates a changeset to what one render pass may show.

use diffnote_api::RawFileDiff;

use crate::budget::DiffBudget;

/// Applies a [`DiffBudget`] to an ordered sequence of file diffs.
#[derive(Debug, Default, Clone, Copy)]
pub struct DiffGovernor;

impl DiffGovernor {
    /// Return the prefix of `diffs` that fits `budget`.
    ///
    /// At most `max_files` files are taken. Each file's raw line count is added
    /// to a running total and the file is included before the total is checked:
    /// the file that pushes the total strictly above `max_lines` is still part
    /// of the result and iteration stops right after it. The result can
    /// therefore exceed `max_lines`, but never `max_files`.
    #[must_use]
    pub fn bound(diffs: &[RawFileDiff], budget: DiffBudget) -> &[RawFileDiff] {
        let mut lines = 0usize;
        let mut taken = 0usize;

        for diff in diffs.iter().take(budget.max_files) {
            lines = lines.saturating_add(diff.raw_line_count);
            taken += 1;
            if lines > budget.max_lines {
                break;
            }
        }

        &diffs[..taken]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn files(counts: &[usize]) -> Vec<RawFileDiff> {
        counts
            .iter()
            .enumerate()
            .map(|(index, count)| {
                RawFileDiff::new(format!("file_{index}.txt"), Vec::new()).with_raw_line_count(*count)
            })
            .collect()
    }

    #[test]
    fn crossing_file_is_included_then_stops() {
        let diffs = files(&[50, 60, 5000]);
        let bounded = DiffGovernor::bound(&diffs, DiffBudget::new(10, 100));
        assert_eq!(bounded.len(), 2);
        assert_eq!(bounded, &diffs[..2]);
    }

    #[test]
    fn exact_line_total_keeps_going() {
        let diffs = files(&[40, 60, 1, 1]);
        let bounded = DiffGovernor::bound(&diffs, DiffBudget::new(10, 100));
        assert_eq!(bounded.len(), 3);
    }

    #[test]
    fn file_ceiling_caps_result() {
        let diffs = files(&[1, 1, 1, 1, 1]);
        assert_eq!(DiffGovernor::bound(&diffs, DiffBudget::new(3, 100)).len(), 3);
    }

    #[test]
    fn empty_cases() {
        assert!(DiffGovernor::bound(&[], DiffBudget::SAFE).is_empty());
        let diffs = files(&[1, 2]);
        assert!(DiffGovernor::bound(&diffs, DiffBudget::new(0, 100)).is_empty());
        assert!(DiffGovernor::bound(&diffs, DiffBudget::new(0, 0)).is_empty());
    }

    #[test]
    fn zero_line_budget_still_shows_first_file() {
        let diffs = files(&[3, 4]);
        assert_eq!(DiffGovernor::bound(&diffs, DiffBudget::new(5, 0)).len(), 1);
    }

    #[test]
    fn result_is_prefix_within_file_ceiling() {
        let diffs = files(&[7, 0, 13, 2, 90, 4, 4, 4]);
        for max_files in 0..10 {
            for max_lines in [0, 5, 20, 100, 1000] {
                let bounded = DiffGovernor::bound(&diffs, DiffBudget::new(max_files, max_lines));
                assert!(bounded.len() <= max_files);
                assert_eq!(bounded, &diffs[..bounded.len()]);
            }
        }
    }
}
