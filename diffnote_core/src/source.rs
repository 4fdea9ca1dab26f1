//! Sources feeding the render pipeline: file diffs and comment snapshots.

use std::path::{Path, PathBuf};

use git2::{Delta, DiffDelta, DiffFindOptions, DiffOptions, FileMode, Oid, Patch};
use tracing::debug;

use crate::{
    repository::{display_path, Repository},
    Comment, Error, FileFlags, RawDiffLine, RawFileDiff, Result, RevisionRange,
};

/// Supplies the file diffs of a comparison, in display order.
pub trait DiffSource {
    /// Compute the file diffs between `range.base` and `range.head`.
    ///
    /// # Errors
    ///
    /// Implementors surface backend failures.
    fn diffs(&self, range: &RevisionRange) -> Result<Vec<RawFileDiff>>;
}

/// Supplies a read-only snapshot of the comments for a diff.
pub trait CommentStore {
    /// Fetch every stored comment, active or not.
    ///
    /// # Errors
    ///
    /// Implementors surface backend failures.
    fn snapshot(&self) -> Result<Vec<Comment>>;
}

/// [`DiffSource`] backed by libgit2 tree-to-tree diffs.
#[derive(Debug)]
pub struct GitDiffSource<'repo> {
    repository: &'repo Repository,
}

impl<'repo> GitDiffSource<'repo> {
    /// Construct a source bound to `repository`.
    #[must_use]
    pub const fn new(repository: &'repo Repository) -> Self {
        Self { repository }
    }
}

impl DiffSource for GitDiffSource<'_> {
    fn diffs(&self, range: &RevisionRange) -> Result<Vec<RawFileDiff>> {
        let repo = self.repository.git_repo();
        let head_tree = repo
            .find_commit(Oid::from_str(&range.head.oid)?)?
            .tree()?;
        let base_tree = match &range.base {
            Some(base) => Some(repo.find_commit(Oid::from_str(&base.oid)?)?.tree()?),
            None => None,
        };

        let mut options = DiffOptions::new();
        options.context_lines(3);
        let mut diff =
            repo.diff_tree_to_tree(base_tree.as_ref(), Some(&head_tree), Some(&mut options))?;

        let mut find = DiffFindOptions::new();
        find.renames(true);
        diff.find_similar(Some(&mut find))?;

        let count = diff.deltas().len();
        let mut files = Vec::with_capacity(count);
        for idx in 0..count {
            let Some(delta) = diff.get_delta(idx) else {
                continue;
            };
            let patch = Patch::from_diff(&diff, idx)?;
            files.push(convert_delta(&delta, patch.as_ref())?);
        }

        debug!(files = files.len(), head = range.head.short_oid(), "computed diff");
        Ok(files)
    }
}

fn convert_delta(delta: &DiffDelta<'_>, patch: Option<&Patch<'_>>) -> Result<RawFileDiff> {
    let old_file = delta.old_file();
    let new_file = delta.new_file();
    let old_path = old_file.path().map(display_path).unwrap_or_default();
    let new_path = new_file
        .path()
        .map(display_path)
        .unwrap_or_else(|| old_path.clone());

    let flags = FileFlags {
        new_file: delta.status() == Delta::Added,
        deleted_file: delta.status() == Delta::Deleted,
        renamed_file: delta.status() == Delta::Renamed,
        submodule: new_file.mode() == FileMode::Commit || old_file.mode() == FileMode::Commit,
    };

    let submodule_commit = if flags.submodule {
        let linked = if flags.deleted_file { &old_file } else { &new_file };
        Some(linked.id()).filter(|oid| !oid.is_zero()).map(|oid| oid.to_string())
    } else {
        None
    };

    let mut lines = Vec::new();
    let mut raw_line_count = 0;
    if let Some(patch) = patch {
        for hunk in 0..patch.num_hunks() {
            let hunk_lines = patch.num_lines_in_hunk(hunk)?;
            // The hunk header counts towards the textual size.
            raw_line_count += hunk_lines + 1;
            for offset in 0..hunk_lines {
                if let Some(line) = convert_line(&patch.line_in_hunk(hunk, offset)?) {
                    lines.push(line);
                }
            }
        }
    }
    // Binary and header-only deltas still print one line in a textual patch.
    let raw_line_count = raw_line_count.max(1);

    Ok(RawFileDiff {
        old_path,
        new_path,
        flags,
        lines,
        raw_line_count,
        submodule_commit,
    })
}

fn convert_line(line: &git2::DiffLine<'_>) -> Option<RawDiffLine> {
    let text = String::from_utf8_lossy(line.content())
        .trim_end_matches(['\n', '\r'])
        .to_owned();

    match (line.origin(), line.old_lineno(), line.new_lineno()) {
        (' ', Some(old), Some(new)) => Some(RawDiffLine::context(text, old, new)),
        ('+', _, Some(new)) => Some(RawDiffLine::added(text, new)),
        ('-', Some(old), _) => Some(RawDiffLine::removed(text, old)),
        // End-of-file newline markers and headers carry no line of their own.
        _ => None,
    }
}

/// [`CommentStore`] reading a JSON array of comments from disk.
#[derive(Debug, Clone)]
pub struct JsonCommentStore {
    path: PathBuf,
}

impl JsonCommentStore {
    /// Construct a store reading from `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// File the snapshot is read from.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CommentStore for JsonCommentStore {
    fn snapshot(&self) -> Result<Vec<Comment>> {
        let shown = display_path(&self.path);
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %shown, "no comment snapshot");
                return Ok(Vec::new());
            }
            Err(source) => {
                return Err(Error::Io {
                    path: shown,
                    source,
                })
            }
        };

        serde_json::from_str(&text).map_err(|source| Error::CommentStore {
            path: shown,
            source,
        })
    }
}
