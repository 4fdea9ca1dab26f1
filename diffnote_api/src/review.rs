//! Line addresses and the discussion comments anchored to them.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable, opaque address of a single diff line.
///
/// Only its equality and round-trip stability are meaningful; the textual
/// layout is owned by the line coder in `diffnote_core`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LineAddress(String);

impl LineAddress {
    /// Wrap an already-encoded address, e.g. one read back from storage.
    pub fn new(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }

    /// Borrow the encoded form.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LineAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for LineAddress {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A stored line comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    /// Line the comment is attached to.
    pub anchor: LineAddress,
    /// Display name of the author.
    pub author: String,
    /// Markdown body of the comment.
    pub body: String,
    /// Resolved or deleted comments are inactive and never displayed.
    #[serde(default = "default_active")]
    pub active: bool,
}

impl Comment {
    /// Create an active comment.
    pub fn new(anchor: LineAddress, author: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            anchor,
            author: author.into(),
            body: body.into(),
            active: true,
        }
    }

    /// Mark the comment as inactive.
    #[must_use]
    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }
}

const fn default_active() -> bool {
    true
}
