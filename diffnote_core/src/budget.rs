//! File and line ceilings for a single render pass.

use serde::{Deserialize, Serialize};

/// Ceiling on how much of a changeset one render pass may show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffBudget {
    /// Maximum number of files rendered.
    pub max_files: usize,
    /// Cumulative raw line count after which rendering stops.
    pub max_lines: usize,
}

impl DiffBudget {
    /// Default conservative budget.
    pub const SAFE: Self = Self::new(100, 5_000);
    /// Default opt-in budget for callers that asked to see more.
    pub const HARD: Self = Self::new(1_000, 50_000);

    /// Convenience constructor for explicit values.
    #[must_use]
    pub const fn new(max_files: usize, max_lines: usize) -> Self {
        Self {
            max_files,
            max_lines,
        }
    }
}

/// The pair of budgets a deployment renders with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiffLimits {
    /// Budget used unless the request forces the hard one.
    pub safe: DiffBudget,
    /// Budget used when the request opts into seeing more.
    pub hard: DiffBudget,
}

impl Default for DiffLimits {
    fn default() -> Self {
        Self {
            safe: DiffBudget::SAFE,
            hard: DiffBudget::HARD,
        }
    }
}

impl DiffLimits {
    /// Pick the hard budget when `force` is set, the safe one otherwise.
    #[must_use]
    pub const fn select(&self, force: bool) -> DiffBudget {
        if force {
            self.hard
        } else {
            self.safe
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn select_follows_force_flag() {
        let limits = DiffLimits::default();
        assert_eq!(limits.select(false), DiffBudget::SAFE);
        assert_eq!(limits.select(true), DiffBudget::HARD);
    }

    #[test]
    fn select_uses_configured_values() {
        let limits = DiffLimits {
            safe: DiffBudget::new(1, 2),
            hard: DiffBudget::new(3, 4),
        };
        assert_eq!(limits.select(false), DiffBudget::new(1, 2));
        assert_eq!(limits.select(true), DiffBudget::new(3, 4));
    }
}
