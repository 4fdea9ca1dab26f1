//! `diffnote` renders a repository comparison with its line comments.
//!
//! ```text
//! diffnote render --repo . --base main --head HEAD --view parallel --comments notes.json
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use diffnote_core::{
    repository::Repository,
    source::{CommentStore, DiffSource, GitDiffSource, JsonCommentStore},
    telemetry::init_tracing,
    validate_diffs, CommentIndex, Config, DiffRenderer, FileBody, RenderRequest, RenderedDiff,
    RenderedFileDiff,
};
use tracing::{info, Level};

#[derive(Parser)]
#[command(name = "diffnote")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Render bounded diffs with anchored line comments", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json_logs: bool,

    /// Configuration file with render budgets
    #[arg(long, global = true, env = "DIFFNOTE_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a comparison
    Render {
        /// Repository path
        #[arg(long, default_value = ".")]
        repo: PathBuf,

        /// Base revision (defaults to the first parent of head)
        #[arg(long)]
        base: Option<String>,

        /// Head revision
        #[arg(long, default_value = "HEAD")]
        head: String,

        /// Layout: `parallel` for side by side, anything else for inline
        #[arg(long)]
        view: Option<String>,

        /// Use the hard budget instead of the safe one
        #[arg(long)]
        force: bool,

        /// JSON comment snapshot
        #[arg(long)]
        comments: Option<PathBuf>,

        /// Print the rendered diff as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    init_tracing(cli.json_logs, level);

    let config = Config::load(cli.config.as_deref()).context("failed to load configuration")?;

    match cli.command {
        Commands::Render {
            repo,
            base,
            head,
            view,
            force,
            comments,
            json,
        } => {
            let repository = Repository::open(&repo)
                .with_context(|| format!("failed to open repository at {}", repo.display()))?;
            let range = repository
                .resolve_range(base.as_deref(), &head)
                .with_context(|| format!("failed to resolve revision {head}"))?;

            let diffs = GitDiffSource::new(&repository).diffs(&range)?;
            validate_diffs(&diffs)?;

            let snapshot = match comments {
                Some(path) => JsonCommentStore::new(path).snapshot()?,
                None => Vec::new(),
            };
            let index = CommentIndex::build(snapshot);

            let force_flag = force.then_some("1");
            let request = RenderRequest::from_query(view.as_deref(), force_flag);
            let rendered = DiffRenderer::new(config.limits).render(&diffs, &index, &request);
            info!(
                files = rendered.files.len(),
                total = rendered.total_files,
                "rendered {}",
                range.head.short_oid()
            );

            if json {
                println!("{}", serde_json::to_string_pretty(&rendered)?);
            } else {
                print_text(&rendered);
            }
        }
    }

    Ok(())
}

fn print_text(rendered: &RenderedDiff<'_>) {
    for file in &rendered.files {
        print_file(file);
    }

    if rendered.truncated() {
        println!(
            "... {} of {} files shown (limit {} files / {} lines); pass --force to see more",
            rendered.files.len(),
            rendered.total_files,
            rendered.budget.max_files,
            rendered.budget.max_lines
        );
    }
}

fn print_file(file: &RenderedFileDiff<'_>) {
    let raw = file.file;
    if raw.flags.renamed_file {
        println!("=== {} -> {}", raw.old_path, raw.new_path);
    } else {
        println!("=== {}", raw.file_path());
    }

    match &file.body {
        FileBody::Submodule(link) => println!(
            "    {} @ {}",
            link.name,
            link.commit.as_deref().unwrap_or("unknown")
        ),
        FileBody::Inline(rows) => {
            for row in rows {
                let count = row.comments.map_or(0, <[_]>::len);
                println!(
                    "{} {} [{}]{}",
                    marker(row.line.kind),
                    row.line.text,
                    row.address,
                    comment_suffix(count)
                );
            }
        }
        FileBody::Split(rows) => {
            for row in rows {
                let left = row
                    .left
                    .as_ref()
                    .map(|cell| format!("{} {}", marker(cell.kind()), cell.line.text))
                    .unwrap_or_default();
                let right = row
                    .right
                    .as_ref()
                    .map(|cell| format!("{} {}", marker(cell.kind()), cell.line.text))
                    .unwrap_or_default();
                let left_count = row.left_comments.map_or(0, <[_]>::len);
                let right_count = row.right_comments.map_or(0, <[_]>::len);
                println!(
                    "{left:<40}{} | {right}{}",
                    comment_suffix(left_count),
                    comment_suffix(right_count)
                );
            }
        }
    }
}

const fn marker(kind: diffnote_core::LineKind) -> char {
    match kind {
        diffnote_core::LineKind::Context => ' ',
        diffnote_core::LineKind::Added => '+',
        diffnote_core::LineKind::Removed => '-',
    }
}

fn comment_suffix(count: usize) -> String {
    if count == 0 {
        String::new()
    } else {
        format!(" ({count} comments)")
    }
}
