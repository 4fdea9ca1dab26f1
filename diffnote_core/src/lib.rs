//! Core library for diffnote's diff review pages.
//!
//! The crate is layered around three primary responsibilities:
//! - bounding how much of a changeset is rendered in one pass
//! - giving every diff line a stable address that comments can anchor to
//! - placing anchored comments on the right column of inline and split views

#![warn(
    clippy::all,
    clippy::cargo,
    clippy::nursery,
    clippy::pedantic,
    missing_docs
)]
#![cfg_attr(
    not(test),
    deny(
        clippy::dbg_macro,
        clippy::expect_used,
        clippy::panic,
        clippy::print_stderr,
        clippy::print_stdout,
        clippy::todo,
        clippy::unwrap_used
    )
)]

/// Render budgets and their selection.
pub mod budget;
/// Grouping of active comments by line address.
pub mod comments;
/// Deployment configuration.
pub mod config;
/// Truncation of a changeset to a budget.
pub mod governor;
/// Webhook management and test triggering.
pub mod hooks;
/// Stable line addresses.
pub mod line_code;
/// Inline and split render pipeline.
pub mod render;
/// Git repository access.
pub mod repository;
/// Comment placement for split rows.
pub mod sides;
/// Diff and comment sources.
pub mod source;
/// Tracing subscriber setup.
pub mod telemetry;
/// Inline vs split view selection.
pub mod view;

pub use diffnote_api::{
    Comment, DiffSide, FileFlags, LineAddress, LineKind, RawDiffLine, RawFileDiff, Revision,
    RevisionRange, Signature,
};

pub use budget::{DiffBudget, DiffLimits};
pub use comments::CommentIndex;
pub use config::Config;
pub use governor::DiffGovernor;
pub use line_code::LineCoder;
pub use render::{
    validate_diffs, DiffRenderer, FileBody, InlineRow, RenderRequest, RenderedDiff,
    RenderedFileDiff, SplitCell, SplitRow, SubmoduleLink,
};
pub use sides::SideMapper;
pub use view::ViewMode;

/// Common result type for the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the core library.
///
/// The render pipeline itself is infallible; these cover the sources feeding it
/// and the hook controller around it.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Underlying git operation failed.
    #[error("git error: {source}")]
    Git {
        /// Original libgit2 error.
        #[from]
        source: git2::Error,
    },
    /// Provided path does not correspond to a git repository.
    #[error("path does not reference a git repository: {path}")]
    NotARepository {
        /// Path that failed to resolve to a repository.
        path: String,
    },
    /// Bare repositories are currently unsupported.
    #[error("repository at {path} is bare and unsupported")]
    BareRepository {
        /// Path of the repository lacking a working tree.
        path: String,
    },
    /// Repository has no head revision to diff.
    #[error("repository has no head revision to diff")]
    MissingHeadRevision,
    /// Filesystem interaction failed.
    #[error("failed to access {path}: {source}")]
    Io {
        /// Filesystem path involved in the failed operation.
        path: String,
        /// Source I/O error returned by the standard library.
        #[source]
        source: std::io::Error,
    },
    /// Configuration file could not be parsed.
    #[error("invalid configuration in {path}: {source}")]
    Config {
        /// Configuration file path.
        path: String,
        /// Parser error.
        #[source]
        source: toml::de::Error,
    },
    /// Comment snapshot could not be decoded.
    #[error("invalid comment snapshot in {path}: {source}")]
    CommentStore {
        /// Snapshot file path.
        path: String,
        /// Decoder error.
        #[source]
        source: serde_json::Error,
    },
    /// The diff source produced a line whose positions contradict its kind.
    #[error("malformed diff line {index} in {path}")]
    MalformedLine {
        /// File containing the line.
        path: String,
        /// Zero-based index of the line within the file diff.
        index: usize,
    },
    /// No hook with the given identifier exists.
    #[error("hook {id} not found")]
    HookNotFound {
        /// Requested hook identifier.
        id: u64,
    },
    /// Hook registry rejected the request.
    #[error("hook error: {source}")]
    Hook {
        /// Registry error.
        #[from]
        source: diffnote_hook_api::HookError,
    },
}
