//! Per-file diffs as handed over by the diff engine.

use serde::{Deserialize, Serialize};

/// The diff for a single file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawFileDiff {
    /// Path of the file on the base side.
    pub old_path: String,
    /// Path of the file on the head side.
    pub new_path: String,
    /// Classification of the change.
    #[serde(default)]
    pub flags: FileFlags,
    /// Line-level changes, in diff order.
    #[serde(default)]
    pub lines: Vec<RawDiffLine>,
    /// Number of lines in the textual patch, counted before parsing.
    #[serde(default)]
    pub raw_line_count: usize,
    /// Commit a submodule entry points to on the linked blob side.
    #[serde(default)]
    pub submodule_commit: Option<String>,
}

impl RawFileDiff {
    /// Create a file diff where the path did not change.
    pub fn new(path: impl Into<String>, lines: Vec<RawDiffLine>) -> Self {
        let path = path.into();
        let raw_line_count = lines.len();
        Self {
            old_path: path.clone(),
            new_path: path,
            flags: FileFlags::default(),
            lines,
            raw_line_count,
            submodule_commit: None,
        }
    }

    /// Override the textual line count used for budgeting.
    #[must_use]
    pub fn with_raw_line_count(mut self, raw_line_count: usize) -> Self {
        self.raw_line_count = raw_line_count;
        self
    }

    /// Replace the change flags.
    #[must_use]
    pub fn with_flags(mut self, flags: FileFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Mark the entry as a submodule pointing at `commit`.
    #[must_use]
    pub fn with_submodule_commit(mut self, commit: impl Into<String>) -> Self {
        self.flags.submodule = true;
        self.submodule_commit = Some(commit.into());
        self
    }

    /// Path the file is known by in this diff.
    ///
    /// Deleted files only exist on the base side, so their old path is used.
    pub fn file_path(&self) -> &str {
        if self.flags.deleted_file {
            &self.old_path
        } else {
            &self.new_path
        }
    }
}

/// Change flags attached to a file diff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FileFlags {
    /// File only exists on the head side.
    #[serde(default)]
    pub new_file: bool,
    /// File only exists on the base side.
    #[serde(default)]
    pub deleted_file: bool,
    /// File path changed between base and head.
    #[serde(default)]
    pub renamed_file: bool,
    /// Entry is a submodule pointer rather than a blob.
    #[serde(default)]
    pub submodule: bool,
}

/// A single line within a file diff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawDiffLine {
    /// Raw text of the line, without the leading marker.
    pub text: String,
    /// The role the line plays in the diff.
    pub kind: LineKind,
    /// 1-based line number on the base side; absent for added lines.
    #[serde(default)]
    pub old_line: Option<u32>,
    /// 1-based line number on the head side; absent for removed lines.
    #[serde(default)]
    pub new_line: Option<u32>,
}

impl RawDiffLine {
    /// Unchanged line present on both sides.
    pub fn context(text: impl Into<String>, old_line: u32, new_line: u32) -> Self {
        Self {
            text: text.into(),
            kind: LineKind::Context,
            old_line: Some(old_line),
            new_line: Some(new_line),
        }
    }

    /// Line that only exists on the head side.
    pub fn added(text: impl Into<String>, new_line: u32) -> Self {
        Self {
            text: text.into(),
            kind: LineKind::Added,
            old_line: None,
            new_line: Some(new_line),
        }
    }

    /// Line that only exists on the base side.
    pub fn removed(text: impl Into<String>, old_line: u32) -> Self {
        Self {
            text: text.into(),
            kind: LineKind::Removed,
            old_line: Some(old_line),
            new_line: None,
        }
    }

    /// Whether the position pair matches the line kind.
    pub const fn is_well_formed(&self) -> bool {
        match self.kind {
            LineKind::Context => self.old_line.is_some() && self.new_line.is_some(),
            LineKind::Added => self.old_line.is_none() && self.new_line.is_some(),
            LineKind::Removed => self.old_line.is_some() && self.new_line.is_none(),
        }
    }
}

/// Type of a line contained in a diff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineKind {
    /// Unchanged context line.
    Context,
    /// A newly added line.
    Added,
    /// A deleted line.
    Removed,
}

/// Side of the diff a blob or line lives on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiffSide {
    /// Base (old, left) side.
    Base,
    /// Head (new, right) side.
    Head,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serde_defaults_are_applied() {
        let json = r#"{
            "old_path": "README.md",
            "new_path": "README.md"
        }"#;

        let file: RawFileDiff = serde_json::from_str(json).expect("deserialize with defaults");
        assert_eq!(file.flags, FileFlags::default());
        assert!(file.lines.is_empty());
        assert_eq!(file.raw_line_count, 0);
        assert!(file.submodule_commit.is_none());
    }

    #[test]
    fn encoded_uses_snake_case() {
        let json = serde_json::to_string(&LineKind::Removed).expect("serialize line kind");
        assert_eq!(json, "\"removed\"");
        let side = serde_json::to_string(&DiffSide::Head).expect("serialize side");
        assert_eq!(side, "\"head\"");
    }

    #[test]
    fn constructors_are_well_formed() {
        assert!(RawDiffLine::context("a", 1, 1).is_well_formed());
        assert!(RawDiffLine::added("b", 2).is_well_formed());
        assert!(RawDiffLine::removed("c", 2).is_well_formed());

        let broken = RawDiffLine {
            text: String::new(),
            kind: LineKind::Added,
            old_line: None,
            new_line: None,
        };
        assert!(!broken.is_well_formed());
    }

    #[test]
    fn deleted_files_use_old_path() {
        let file = RawFileDiff {
            old_path: "gone.rs".into(),
            new_path: "/dev/null".into(),
            flags: FileFlags {
                deleted_file: true,
                ..FileFlags::default()
            },
            lines: vec![RawDiffLine::removed("fn main() {}", 1)],
            raw_line_count: 2,
            submodule_commit: None,
        };
        assert_eq!(file.file_path(), "gone.rs");

        let renamed = RawFileDiff::new("new.rs", Vec::new());
        assert_eq!(renamed.file_path(), "new.rs");
    }

    #[test]
    fn raw_line_count_defaults_to_line_total() {
        let file = RawFileDiff::new(
            "src/lib.rs",
            vec![RawDiffLine::context("a", 1, 1), RawDiffLine::added("b", 2)],
        );
        assert_eq!(file.raw_line_count, 2);
        assert_eq!(file.with_raw_line_count(9).raw_line_count, 9);
    }
}
