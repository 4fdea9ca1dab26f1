//! Inline vs split view selection.

use serde::{Deserialize, Serialize};

/// Query value that selects the split layout.
pub const SPLIT_TOKEN: &str = "parallel";

/// Layout a diff is rendered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewMode {
    /// One column, lines in diff order.
    #[default]
    Inline,
    /// Old and new side by side.
    Split,
}

impl ViewMode {
    /// Parse the `view` query parameter; anything but the split token is inline.
    #[must_use]
    pub fn from_query(value: Option<&str>) -> Self {
        match value {
            Some(SPLIT_TOKEN) => Self::Split,
            _ => Self::Inline,
        }
    }

    /// Query value that selects this mode.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Inline => "inline",
            Self::Split => SPLIT_TOKEN,
        }
    }
}
