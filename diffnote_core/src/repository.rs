//! Repository access built on top of libgit2.

use std::fmt;
use std::path::{Path, PathBuf};

use git2::{Commit, ErrorCode, Repository as GitRepository};

use crate::{Error, Result, Revision, RevisionRange, Signature};

/// Revspec used when no head revision is named.
const HEAD: &str = "HEAD";

/// Handle to the repository whose changes are reviewed.
pub struct Repository {
    inner: GitRepository,
    root: PathBuf,
}

impl Repository {
    /// Discover the repository containing `path`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotARepository`] when no repository encloses the path
    /// and [`Error::BareRepository`] when the repository has no working tree.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let inner = GitRepository::discover(path).map_err(|err| match err.code() {
            ErrorCode::NotFound => Error::NotARepository {
                path: display_path(path),
            },
            _ => Error::from(err),
        })?;

        let Some(root) = inner.workdir().map(Path::to_path_buf) else {
            return Err(Error::BareRepository {
                path: display_path(inner.path()),
            });
        };

        Ok(Self { inner, root })
    }

    /// Working tree root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Underlying libgit2 handle.
    #[must_use]
    pub const fn git_repo(&self) -> &GitRepository {
        &self.inner
    }

    /// Whether the repository has no commits yet.
    ///
    /// # Errors
    ///
    /// Propagates failures resolving HEAD other than an unborn branch.
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.head_commit()?.is_none())
    }

    /// Compare HEAD with its first parent.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingHeadRevision`] when the repository has no commits
    /// and propagates libgit2 failures.
    pub fn revision_range(&self) -> Result<RevisionRange> {
        if self.is_empty()? {
            return Err(Error::MissingHeadRevision);
        }
        self.resolve_range(None, HEAD)
    }

    /// Resolve a comparison from revspecs such as `main`, `HEAD~2` or a SHA.
    ///
    /// Without `base`, the first parent of `head` is used; a root commit has no base.
    ///
    /// # Errors
    ///
    /// Propagates libgit2 failures for unknown revspecs or non-commit objects.
    pub fn resolve_range(&self, base: Option<&str>, head: &str) -> Result<RevisionRange> {
        let head_commit = self.peel(head)?;
        let base = match base {
            Some(spec) => Some(revision(&self.peel(spec)?, Some(spec))),
            None => head_commit
                .parents()
                .next()
                .map(|parent| revision(&parent, None)),
        };

        Ok(RevisionRange {
            base,
            head: revision(&head_commit, Some(head)),
        })
    }

    fn peel(&self, spec: &str) -> Result<Commit<'_>> {
        Ok(self.inner.revparse_single(spec)?.peel_to_commit()?)
    }

    fn head_commit(&self) -> Result<Option<Commit<'_>>> {
        match self.inner.head() {
            Ok(head) => Ok(Some(head.peel_to_commit()?)),
            Err(err) if matches!(err.code(), ErrorCode::UnbornBranch | ErrorCode::NotFound) => {
                Ok(None)
            }
            Err(err) => Err(err.into()),
        }
    }
}

fn revision(commit: &Commit<'_>, reference: Option<&str>) -> Revision {
    let signature = commit.author();
    let author = signature.name().map(|name| Signature {
        name: name.to_owned(),
        email: signature.email().map(str::to_owned),
    });

    Revision {
        oid: commit.id().to_string(),
        reference: reference.map(str::to_owned),
        summary: commit.summary().map(str::to_owned),
        author,
        timestamp: Some(commit.time().seconds()),
    }
}

pub(crate) fn display_path(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

impl fmt::Debug for Repository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Repository").field(&self.root).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use git2::{IndexAddOption, Oid};
    use tempfile::TempDir;

    fn commit_all(repo: &GitRepository, message: &str) -> Result<Oid> {
        let mut index = repo.index()?;
        index.add_all(["*"], IndexAddOption::DEFAULT, None)?;
        index.write()?;
        let tree = repo.find_tree(index.write_tree()?)?;
        let signature = git2::Signature::now("Test User", "test@example.com")?;

        let parent = repo.head().ok().and_then(|head| head.peel_to_commit().ok());
        let parents: Vec<&Commit<'_>> = parent.iter().collect();
        Ok(repo.commit(
            Some(HEAD),
            &signature,
            &signature,
            message,
            &tree,
            &parents,
        )?)
    }

    #[test]
    fn range_of_root_commit_has_no_base() -> Result<()> {
        let temp = TempDir::new().expect("tempdir");
        let git_repo = GitRepository::init(temp.path())?;

        std::fs::write(temp.path().join("README.md"), "hello\n").expect("write file");
        commit_all(&git_repo, "Initial commit")?;

        let repo = Repository::open(temp.path())?;
        let range = repo.revision_range()?;
        assert!(range.base.is_none());
        assert_eq!(range.head.summary.as_deref(), Some("Initial commit"));
        assert_eq!(range.head.reference.as_deref(), Some(HEAD));
        assert!(!repo.is_empty()?);
        assert!(repo.root().join("README.md").exists());

        Ok(())
    }

    #[test]
    fn resolve_range_defaults_to_first_parent() -> Result<()> {
        let temp = TempDir::new().expect("tempdir");
        let git_repo = GitRepository::init(temp.path())?;

        std::fs::write(temp.path().join("file.txt"), "one\n").expect("write file");
        let first = commit_all(&git_repo, "Initial commit")?;
        std::fs::write(temp.path().join("file.txt"), "two\n").expect("write file");
        commit_all(&git_repo, "Second commit")?;

        let repo = Repository::open(temp.path())?;
        let range = repo.resolve_range(None, HEAD)?;
        let base = range.base.expect("base revision");
        assert_eq!(base.oid, first.to_string());
        assert!(base.reference.is_none());

        let explicit = repo.resolve_range(Some("HEAD~1"), HEAD)?;
        let explicit_base = explicit.base.expect("explicit base");
        assert_eq!(explicit_base.oid, base.oid);
        assert_eq!(explicit_base.reference.as_deref(), Some("HEAD~1"));

        Ok(())
    }

    #[test]
    fn empty_repository_has_no_range() -> Result<()> {
        let temp = TempDir::new().expect("tempdir");
        GitRepository::init(temp.path())?;

        let repo = Repository::open(temp.path())?;
        assert!(repo.is_empty()?);
        assert!(matches!(repo.revision_range(), Err(Error::MissingHeadRevision)));
        Ok(())
    }

    #[test]
    fn open_rejects_plain_and_bare_directories() -> Result<()> {
        let plain = TempDir::new().expect("tempdir");
        assert!(matches!(
            Repository::open(plain.path()),
            Err(Error::NotARepository { .. })
        ));

        let bare = TempDir::new().expect("tempdir");
        GitRepository::init_bare(bare.path())?;
        assert!(matches!(
            Repository::open(bare.path()),
            Err(Error::BareRepository { .. })
        ));
        Ok(())
    }
}
