//! Revision identities used to describe a comparison.

use serde::{Deserialize, Serialize};

/// Identity of a revision that a diff can reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Revision {
    /// Full object identifier (git SHA).
    pub oid: String,
    /// Optional human-friendly reference such as a branch name.
    #[serde(default)]
    pub reference: Option<String>,
    /// Optional summary line describing the revision.
    #[serde(default)]
    pub summary: Option<String>,
    /// Author information when available.
    #[serde(default)]
    pub author: Option<Signature>,
    /// Unix timestamp (seconds) associated with the revision.
    #[serde(default)]
    pub timestamp: Option<i64>,
}

impl Revision {
    /// Abbreviated identifier suitable for display.
    pub fn short_oid(&self) -> &str {
        self.oid.get(..8).unwrap_or(&self.oid)
    }
}

/// Structured author identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    /// Display name for the individual.
    pub name: String,
    /// Optional email address.
    #[serde(default)]
    pub email: Option<String>,
}

/// The pair of revisions compared by a diff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevisionRange {
    /// Base revision. Absent for a root commit.
    #[serde(default)]
    pub base: Option<Revision>,
    /// Head revision (the state being reviewed).
    pub head: Revision,
}
