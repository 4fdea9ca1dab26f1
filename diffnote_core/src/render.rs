//! Render pipeline: bound the changeset, address every line, attach comments.

use diffnote_api::{Comment, DiffSide, LineAddress, LineKind, RawDiffLine, RawFileDiff};
use serde::Serialize;
use tracing::{debug, warn};

use crate::{
    budget::{DiffBudget, DiffLimits},
    comments::CommentIndex,
    governor::DiffGovernor,
    line_code::LineCoder,
    sides::SideMapper,
    view::ViewMode,
    Error, Result,
};

/// Per-request rendering preferences, passed explicitly instead of read from
/// ambient request state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderRequest {
    /// Layout to render.
    pub view: ViewMode,
    /// Whether the caller opted into the hard budget.
    pub force: bool,
    /// Rendering inside a merge request whose source project still exists.
    pub merge_request_source: bool,
}

impl RenderRequest {
    /// Build a request from the `view` and `force_show_diff` query values.
    ///
    /// The hard budget is selected when `force_show_diff` is present and not blank.
    #[must_use]
    pub fn from_query(view: Option<&str>, force_show_diff: Option<&str>) -> Self {
        Self {
            view: ViewMode::from_query(view),
            force: force_show_diff.is_some_and(|value| !value.trim().is_empty()),
            merge_request_source: false,
        }
    }

    /// Mark the request as coming from a merge request with a live source project.
    #[must_use]
    pub const fn with_merge_request_source(mut self, merge_request_source: bool) -> Self {
        self.merge_request_source = merge_request_source;
        self
    }
}

/// One line of the inline layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InlineRow<'a> {
    /// The diff line.
    pub line: &'a RawDiffLine,
    /// Address comments anchor to.
    pub address: LineAddress,
    /// Active comments on this line.
    pub comments: Option<&'a [Comment]>,
}

/// A non-empty cell of a split row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SplitCell<'a> {
    /// The diff line shown in the cell.
    pub line: &'a RawDiffLine,
    /// Address comments anchor to.
    pub address: LineAddress,
}

impl SplitCell<'_> {
    /// Kind of the line in this cell.
    #[must_use]
    pub const fn kind(&self) -> LineKind {
        self.line.kind
    }
}

/// One row of the split layout; `None` cells are blank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SplitRow<'a> {
    /// Old-side cell.
    pub left: Option<SplitCell<'a>>,
    /// New-side cell.
    pub right: Option<SplitCell<'a>>,
    /// Comments shown under the left cell.
    pub left_comments: Option<&'a [Comment]>,
    /// Comments shown under the right cell.
    pub right_comments: Option<&'a [Comment]>,
}

/// Longest submodule name shown before it is cut with an ellipsis.
pub const SUBMODULE_NAME_WIDTH: usize = 40;

/// Hex digits of a submodule commit shown in its link.
pub const SUBMODULE_SHA_WIDTH: usize = 8;

/// Link target shown for a submodule entry instead of line rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmoduleLink {
    /// Last path component, truncated to [`SUBMODULE_NAME_WIDTH`] characters.
    pub name: String,
    /// Abbreviated commit the entry points to, when known.
    pub commit: Option<String>,
}

impl SubmoduleLink {
    fn for_file(file: &RawFileDiff) -> Self {
        let path = file.file_path();
        let name = path.rsplit('/').next().unwrap_or(path);
        Self {
            name: truncate_name(name),
            commit: file
                .submodule_commit
                .as_deref()
                .map(|oid| oid.chars().take(SUBMODULE_SHA_WIDTH).collect()),
        }
    }
}

fn truncate_name(name: &str) -> String {
    const OMISSION: &str = "...";
    if name.chars().count() <= SUBMODULE_NAME_WIDTH {
        return name.to_owned();
    }
    let kept: String = name
        .chars()
        .take(SUBMODULE_NAME_WIDTH - OMISSION.len())
        .collect();
    kept + OMISSION
}

/// Renderable content of a file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "content", rename_all = "snake_case")]
pub enum FileBody<'a> {
    /// Submodule pointer change; shown as a link, no line rows.
    Submodule(SubmoduleLink),
    /// Inline rows.
    Inline(Vec<InlineRow<'a>>),
    /// Split rows.
    Split(Vec<SplitRow<'a>>),
}

/// A file diff ready for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedFileDiff<'a> {
    /// The underlying file diff.
    pub file: &'a RawFileDiff,
    /// Side whose blob the file links to; deleted files only exist on the base.
    pub blob_side: DiffSide,
    /// Whether the file can be edited from the review page.
    pub editable: bool,
    /// Rows to render.
    pub body: FileBody<'a>,
}

/// Output of one render pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedDiff<'a> {
    /// Layout used.
    pub view: ViewMode,
    /// Budget applied.
    pub budget: DiffBudget,
    /// Number of files in the full changeset.
    pub total_files: usize,
    /// Files within budget, in changeset order.
    pub files: Vec<RenderedFileDiff<'a>>,
}

impl RenderedDiff<'_> {
    /// Whether files were left out to respect the budget.
    #[must_use]
    pub fn truncated(&self) -> bool {
        self.files.len() < self.total_files
    }
}

/// Turns a changeset and a comment snapshot into rendered files.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiffRenderer {
    limits: DiffLimits,
}

impl DiffRenderer {
    /// Construct a renderer for the given deployment limits.
    #[must_use]
    pub const fn new(limits: DiffLimits) -> Self {
        Self { limits }
    }

    /// Limits this renderer selects budgets from.
    #[must_use]
    pub const fn limits(&self) -> DiffLimits {
        self.limits
    }

    /// Render `diffs` with the comments in `index`.
    #[must_use]
    pub fn render<'a>(
        &self,
        diffs: &'a [RawFileDiff],
        index: &'a CommentIndex,
        request: &RenderRequest,
    ) -> RenderedDiff<'a> {
        let budget = self.limits.select(request.force);
        let bounded = DiffGovernor::bound(diffs, budget);

        if bounded.len() < diffs.len() {
            warn!(
                shown = bounded.len(),
                total = diffs.len(),
                max_files = budget.max_files,
                max_lines = budget.max_lines,
                "diff truncated to budget"
            );
        }

        let files = bounded
            .iter()
            .map(|file| render_file(file, index, request))
            .collect();

        debug!(
            view = request.view.as_str(),
            force = request.force,
            files = bounded.len(),
            comments = index.len(),
            "rendered diff"
        );

        RenderedDiff {
            view: request.view,
            budget,
            total_files: diffs.len(),
            files,
        }
    }
}

/// Reject file diffs containing a line whose positions contradict its kind.
///
/// # Errors
///
/// Returns [`Error::MalformedLine`] for the first offending line.
pub fn validate_diffs(diffs: &[RawFileDiff]) -> Result<()> {
    for file in diffs {
        if let Some(index) = file.lines.iter().position(|line| !line.is_well_formed()) {
            return Err(Error::MalformedLine {
                path: file.file_path().to_owned(),
                index,
            });
        }
    }
    Ok(())
}

fn render_file<'a>(
    file: &'a RawFileDiff,
    index: &'a CommentIndex,
    request: &RenderRequest,
) -> RenderedFileDiff<'a> {
    let deleted = file.flags.deleted_file;
    let body = if file.flags.submodule {
        FileBody::Submodule(SubmoduleLink::for_file(file))
    } else {
        match request.view {
            ViewMode::Inline => FileBody::Inline(inline_rows(file, index)),
            ViewMode::Split => FileBody::Split(split_rows(file, index)),
        }
    };

    RenderedFileDiff {
        file,
        blob_side: if deleted { DiffSide::Base } else { DiffSide::Head },
        editable: !deleted && request.merge_request_source,
        body,
    }
}

fn inline_rows<'a>(file: &'a RawFileDiff, index: &'a CommentIndex) -> Vec<InlineRow<'a>> {
    let path = file.file_path();
    file.lines
        .iter()
        .map(|line| {
            let address = LineCoder::for_line(path, line);
            let comments = index.get(&address);
            InlineRow {
                line,
                address,
                comments,
            }
        })
        .collect()
}

fn split_rows<'a>(file: &'a RawFileDiff, index: &'a CommentIndex) -> Vec<SplitRow<'a>> {
    let path = file.file_path();
    let cell = |line: &'a RawDiffLine| SplitCell {
        line,
        address: LineCoder::for_line(path, line),
    };

    let mut rows = Vec::with_capacity(file.lines.len());
    let lines = &file.lines;
    let mut i = 0;

    while i < lines.len() {
        if lines[i].kind == LineKind::Context {
            rows.push(split_row(Some(cell(&lines[i])), Some(cell(&lines[i])), index));
            i += 1;
            continue;
        }

        // Pair a run of removals with the run of additions that follows it.
        let removed_start = i;
        while i < lines.len() && lines[i].kind == LineKind::Removed {
            i += 1;
        }
        let added_start = i;
        while i < lines.len() && lines[i].kind == LineKind::Added {
            i += 1;
        }

        let removed = &lines[removed_start..added_start];
        let added = &lines[added_start..i];
        for offset in 0..removed.len().max(added.len()) {
            rows.push(split_row(
                removed.get(offset).map(cell),
                added.get(offset).map(cell),
                index,
            ));
        }
    }

    rows
}

fn split_row<'a>(
    left: Option<SplitCell<'a>>,
    right: Option<SplitCell<'a>>,
    index: &'a CommentIndex,
) -> SplitRow<'a> {
    let (left_comments, right_comments) = SideMapper::resolve_sides(
        left.as_ref().map(SplitCell::kind),
        right.as_ref().map(SplitCell::kind),
        left.as_ref().map(|cell| &cell.address),
        right.as_ref().map(|cell| &cell.address),
        index,
    );

    SplitRow {
        left,
        right,
        left_comments,
        right_comments,
    }
}

#[cfg(test)]
mod tests {
    use diffnote_api::FileFlags;

    use super::*;

    fn sample_file() -> RawFileDiff {
        RawFileDiff::new(
            "src/lib.rs",
            vec![
                RawDiffLine::context("fn main() {", 1, 1),
                RawDiffLine::removed("    old();", 2),
                RawDiffLine::removed("    older();", 3),
                RawDiffLine::added("    new();", 2),
                RawDiffLine::context("}", 4, 3),
                RawDiffLine::added("// trailing", 4),
            ],
        )
    }

    fn split_body<'a>(rendered: &'a RenderedDiff<'_>) -> &'a [SplitRow<'a>] {
        match &rendered.files[0].body {
            FileBody::Split(rows) => rows,
            other => panic!("expected split body, got {other:?}"),
        }
    }

    #[test]
    fn request_from_query() {
        let request = RenderRequest::from_query(Some("parallel"), Some("1"));
        assert_eq!(request.view, ViewMode::Split);
        assert!(request.force);

        let request = RenderRequest::from_query(Some("inline"), Some("  "));
        assert_eq!(request.view, ViewMode::Inline);
        assert!(!request.force);

        assert!(!RenderRequest::from_query(None, None).force);
    }

    #[test]
    fn split_rows_pair_removals_with_additions() {
        let diffs = vec![sample_file()];
        let index = CommentIndex::default();
        let request = RenderRequest::from_query(Some("parallel"), None);
        let rendered = DiffRenderer::default().render(&diffs, &index, &request);
        let rows = split_body(&rendered);

        let shape: Vec<_> = rows
            .iter()
            .map(|row| {
                (
                    row.left.as_ref().map(SplitCell::kind),
                    row.right.as_ref().map(SplitCell::kind),
                )
            })
            .collect();
        assert_eq!(
            shape,
            vec![
                (Some(LineKind::Context), Some(LineKind::Context)),
                (Some(LineKind::Removed), Some(LineKind::Added)),
                (Some(LineKind::Removed), None),
                (Some(LineKind::Context), Some(LineKind::Context)),
                (None, Some(LineKind::Added)),
            ]
        );
    }

    #[test]
    fn addresses_do_not_depend_on_view() {
        let diffs = vec![sample_file()];
        let index = CommentIndex::default();
        let renderer = DiffRenderer::default();

        let inline = renderer.render(&diffs, &index, &RenderRequest::default());
        let FileBody::Inline(rows) = &inline.files[0].body else {
            panic!("expected inline body");
        };
        let mut inline_addresses: Vec<_> = rows.iter().map(|row| row.address.clone()).collect();

        let split = renderer.render(&diffs, &index, &RenderRequest::from_query(Some("parallel"), None));
        let mut split_addresses: Vec<_> = split_body(&split)
            .iter()
            .flat_map(|row| [row.left.as_ref(), row.right.as_ref()])
            .flatten()
            .map(|cell| cell.address.clone())
            .collect();

        inline_addresses.sort();
        split_addresses.sort();
        split_addresses.dedup();
        assert_eq!(inline_addresses, split_addresses);
    }

    #[test]
    fn added_line_comments_stay_on_right() {
        let diffs = vec![sample_file()];
        let trailing = LineCoder::address("src/lib.rs", Some(4), None);
        let index = CommentIndex::build(vec![Comment::new(trailing.clone(), "ana", "why?")]);
        let request = RenderRequest::from_query(Some("parallel"), None);
        let rendered = DiffRenderer::default().render(&diffs, &index, &request);
        let rows = split_body(&rendered);

        let last = rows.last().expect("rows");
        assert!(last.left.is_none());
        assert!(last.left_comments.is_none());
        assert_eq!(last.right_comments.map(<[_]>::len), Some(1));
    }

    #[test]
    fn budget_truncation_is_reported() {
        let diffs = vec![
            sample_file().with_raw_line_count(10),
            sample_file().with_raw_line_count(10),
            sample_file().with_raw_line_count(10),
        ];
        let limits = DiffLimits {
            safe: DiffBudget::new(10, 15),
            hard: DiffBudget::new(10, 100),
        };
        let renderer = DiffRenderer::new(limits);
        let index = CommentIndex::default();

        let safe = renderer.render(&diffs, &index, &RenderRequest::default());
        assert_eq!(safe.files.len(), 2);
        assert_eq!(safe.total_files, 3);
        assert!(safe.truncated());

        let forced = renderer.render(&diffs, &index, &RenderRequest::from_query(None, Some("true")));
        assert_eq!(forced.files.len(), 3);
        assert!(!forced.truncated());
        assert_eq!(forced.budget, limits.hard);
    }

    #[test]
    fn deleted_and_submodule_files() {
        let deleted = RawFileDiff {
            old_path: "gone.rs".into(),
            new_path: "gone.rs".into(),
            flags: FileFlags {
                deleted_file: true,
                ..FileFlags::default()
            },
            lines: vec![RawDiffLine::removed("x", 1)],
            raw_line_count: 2,
            submodule_commit: None,
        };
        let submodule = RawFileDiff::new("vendor/lib", Vec::new())
            .with_submodule_commit("0123456789abcdef0123456789abcdef01234567");
        let diffs = vec![deleted, submodule, sample_file()];
        let index = CommentIndex::default();
        let request = RenderRequest::default().with_merge_request_source(true);
        let rendered = DiffRenderer::default().render(&diffs, &index, &request);

        assert_eq!(rendered.files[0].blob_side, DiffSide::Base);
        assert!(!rendered.files[0].editable);
        assert_eq!(
            rendered.files[1].body,
            FileBody::Submodule(SubmoduleLink {
                name: "lib".into(),
                commit: Some("01234567".into()),
            })
        );
        assert_eq!(rendered.files[2].blob_side, DiffSide::Head);
        assert!(rendered.files[2].editable);
    }

    #[test]
    fn submodule_links_truncate_long_names() {
        let long = format!("deps/{}", "a".repeat(50));
        let file = RawFileDiff::new(long, Vec::new()).with_flags(FileFlags {
            submodule: true,
            ..FileFlags::default()
        });
        let link = SubmoduleLink::for_file(&file);
        assert_eq!(link.name.chars().count(), SUBMODULE_NAME_WIDTH);
        assert!(link.name.ends_with("..."));
        assert!(link.commit.is_none());

        let exact = "b".repeat(SUBMODULE_NAME_WIDTH);
        assert_eq!(truncate_name(&exact), exact);
    }

    #[test]
    fn submodule_body_serializes_link() {
        let diffs = vec![
            RawFileDiff::new("vendor/lib", Vec::new()).with_submodule_commit("abcdef0123456789")
        ];
        let index = CommentIndex::default();
        let rendered = DiffRenderer::default().render(&diffs, &index, &RenderRequest::default());

        let json = serde_json::to_value(&rendered.files[0].body).expect("serialize body");
        assert_eq!(json["kind"], "submodule");
        assert_eq!(json["content"]["name"], "lib");
        assert_eq!(json["content"]["commit"], "abcdef01");
    }

    #[test]
    fn validate_rejects_malformed_lines() {
        let mut file = sample_file();
        assert!(validate_diffs(std::slice::from_ref(&file)).is_ok());

        file.lines[3].old_line = Some(9);
        let err = validate_diffs(&[file]).expect_err("malformed");
        assert!(matches!(err, Error::MalformedLine { index: 3, .. }));
    }
}
