//! Repository status snapshots
//!
//! A snapshot summarizes the working tree (untracked, staged, modified and
//! ignored paths) and how each local branch relates to its upstream. All of
//! it is computed by libgit2; nothing here diffs trees by hand.

use std::collections::BTreeSet;

use git2::{Branch, BranchType, ErrorCode, Repository, Status, StatusOptions};
use serde::Serialize;
use tracing::debug;

use crate::{Error, Result};

/// Where HEAD points
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "name", rename_all = "lowercase")]
pub enum Head {
    /// On a local branch
    Branch(String),
    /// Detached at a commit
    Detached(String),
    /// On a branch with no commits yet
    Unborn(String),
}

impl Head {
    /// Branch name, unless detached
    pub fn branch(&self) -> Option<&str> {
        match self {
            Head::Branch(name) | Head::Unborn(name) => Some(name.as_str()),
            Head::Detached(_) => None,
        }
    }
}

/// Relationship of a branch to its upstream
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum Upstream {
    /// No upstream configured
    None,
    /// Tracking a remote branch
    Tracking {
        /// Upstream branch, eg. `origin/main`
        name: String,
        /// Commits on the branch missing from upstream
        ahead: usize,
        /// Commits on upstream missing from the branch
        behind: usize,
    },
}

/// A local branch and its upstream relationship
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BranchStatus {
    pub name: String,
    pub upstream: Upstream,
}

/// Working tree file states
///
/// A path may be both staged and modified.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FileStates {
    pub untracked: BTreeSet<String>,
    pub staged: BTreeSet<String>,
    pub modified: BTreeSet<String>,
    pub ignored: BTreeSet<String>,
}

/// Point-in-time summary of a repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusSnapshot {
    pub head: Head,
    /// Upstream of the current branch
    pub upstream: Upstream,
    /// Every local branch, sorted by name
    pub branches: Vec<BranchStatus>,
    pub files: FileStates,
}

impl StatusSnapshot {
    pub fn has_untracked(&self) -> bool {
        !self.files.untracked.is_empty()
    }

    pub fn has_uncommitted_changes(&self) -> bool {
        !self.files.staged.is_empty() || !self.files.modified.is_empty()
    }

    /// No untracked, staged or modified files. Ignored files don't count.
    pub fn is_clean(&self) -> bool {
        !self.has_untracked() && !self.has_uncommitted_changes()
    }
}

const STAGED: Status = Status::INDEX_NEW
    .union(Status::INDEX_MODIFIED)
    .union(Status::INDEX_DELETED)
    .union(Status::INDEX_RENAMED)
    .union(Status::INDEX_TYPECHANGE);

const MODIFIED: Status = Status::WT_MODIFIED
    .union(Status::WT_DELETED)
    .union(Status::WT_RENAMED)
    .union(Status::WT_TYPECHANGE)
    .union(Status::CONFLICTED);

/// Compute a status snapshot from the repository's current on-disk state
pub fn load_status(repo: &Repository) -> Result<StatusSnapshot> {
    debug!(path = %repo.path().display(), "Loading repo status");

    let head = head_state(repo).map_err(Error::StatusLoadFailed)?;
    let branches = local_branches(repo).map_err(Error::StatusLoadFailed)?;

    let upstream = match &head {
        Head::Branch(name) => branches
            .iter()
            .find(|b| &b.name == name)
            .map(|b| b.upstream.clone())
            .unwrap_or(Upstream::None),
        Head::Detached(_) | Head::Unborn(_) => Upstream::None,
    };

    // Bare repositories have no working tree to report on
    let files = if repo.is_bare() {
        FileStates::default()
    } else {
        file_states(repo).map_err(Error::StatusLoadFailed)?
    };

    Ok(StatusSnapshot {
        head,
        upstream,
        branches,
        files,
    })
}

fn head_state(repo: &Repository) -> std::result::Result<Head, git2::Error> {
    let head = match repo.head() {
        Ok(head) => head,
        Err(e) if e.code() == ErrorCode::UnbornBranch || e.code() == ErrorCode::NotFound => {
            let head = repo.find_reference("HEAD")?;
            let target = head.symbolic_target().unwrap_or_default();
            let name = target.strip_prefix("refs/heads/").unwrap_or(target);
            return Ok(Head::Unborn(name.to_string()));
        }
        Err(e) => return Err(e),
    };

    if head.is_branch() {
        Ok(Head::Branch(head.shorthand().unwrap_or_default().to_string()))
    } else {
        let id = head.target().map(|oid| oid.to_string()).unwrap_or_default();
        Ok(Head::Detached(id))
    }
}

fn local_branches(repo: &Repository) -> std::result::Result<Vec<BranchStatus>, git2::Error> {
    let mut branches = Vec::new();

    for branch in repo.branches(Some(BranchType::Local))? {
        let (branch, _) = branch?;
        let Some(name) = branch.name()?.map(str::to_string) else {
            continue;
        };

        let upstream = upstream_state(repo, &branch)?;
        branches.push(BranchStatus { name, upstream });
    }

    branches.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(branches)
}

fn upstream_state(
    repo: &Repository,
    branch: &Branch<'_>,
) -> std::result::Result<Upstream, git2::Error> {
    let upstream = match branch.upstream() {
        Ok(upstream) => upstream,
        Err(e) if e.code() == ErrorCode::NotFound => return Ok(Upstream::None),
        Err(e) => return Err(e),
    };

    let name = upstream.name()?.unwrap_or_default().to_string();

    let (Some(local), Some(remote)) = (branch.get().target(), upstream.get().target()) else {
        return Ok(Upstream::None);
    };

    let (ahead, behind) = repo.graph_ahead_behind(local, remote)?;

    Ok(Upstream::Tracking {
        name,
        ahead,
        behind,
    })
}

fn file_states(repo: &Repository) -> std::result::Result<FileStates, git2::Error> {
    let mut opts = StatusOptions::new();
    opts.include_untracked(true)
        .recurse_untracked_dirs(true)
        .include_ignored(true);

    let statuses = repo.statuses(Some(&mut opts))?;
    let mut files = FileStates::default();

    for entry in statuses.iter() {
        let path = String::from_utf8_lossy(entry.path_bytes()).into_owned();
        let status = entry.status();

        if status.is_ignored() {
            files.ignored.insert(path);
            continue;
        }

        if status.is_wt_new() {
            files.untracked.insert(path.clone());
        }
        if status.intersects(STAGED) {
            files.staged.insert(path.clone());
        }
        if status.intersects(MODIFIED) {
            files.modified.insert(path);
        }
    }

    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::fixtures::TestRepo;

    fn status_of(repo: &TestRepo) -> StatusSnapshot {
        load_status(&repo.repo).unwrap()
    }

    #[test]
    fn test_empty_repo_is_unborn() {
        let repo = TestRepo::empty();
        let status = status_of(&repo);

        assert!(matches!(status.head, Head::Unborn(_)));
        assert_eq!(status.upstream, Upstream::None);
        assert!(status.branches.is_empty());
        assert!(status.is_clean());
    }

    #[test]
    fn test_untracked() {
        let repo = TestRepo::empty();
        repo.write_file("README", "I'm a README file");

        let status = status_of(&repo);
        assert!(status.files.untracked.contains("README"));
        assert!(status.files.staged.is_empty());
        assert!(status.has_untracked());
        assert!(!status.has_uncommitted_changes());
    }

    #[test]
    fn test_staged() {
        let repo = TestRepo::empty();
        repo.write_file("README", "I'm a README file");
        repo.add_file("README");

        let status = status_of(&repo);
        assert!(status.files.staged.contains("README"));
        assert!(status.files.untracked.is_empty());
        assert!(status.has_uncommitted_changes());
    }

    #[test]
    fn test_committed_is_clean() {
        let repo = TestRepo::with_commit();
        let status = status_of(&repo);

        assert!(matches!(status.head, Head::Branch(_)));
        assert_eq!(status.upstream, Upstream::None);
        assert!(status.is_clean());
    }

    #[test]
    fn test_modified() {
        let repo = TestRepo::with_commit();
        repo.write_file("README", "I'm modified");

        let status = status_of(&repo);
        assert!(status.files.modified.contains("README"));
        assert!(status.files.staged.is_empty());
        assert!(!status.is_clean());
    }

    #[test]
    fn test_staged_and_modified() {
        let repo = TestRepo::with_commit();
        repo.write_file("README", "staged change");
        repo.add_file("README");
        repo.write_file("README", "unstaged change on top");

        let status = status_of(&repo);
        assert!(status.files.staged.contains("README"));
        assert!(status.files.modified.contains("README"));
    }

    #[test]
    fn test_ignored_is_not_untracked() {
        let repo = TestRepo::empty();
        repo.write_file(".gitignore", "ignoreme");
        repo.add_file(".gitignore");
        repo.commit("Initial commit");
        repo.write_file("ignoreme", "I'm being ignored");

        let status = status_of(&repo);
        assert!(status.files.ignored.contains("ignoreme"));
        assert!(!status.files.untracked.contains("ignoreme"));
        assert!(status.is_clean());
    }

    #[test]
    fn test_local_branch_has_no_upstream() {
        let repo = TestRepo::with_commit();
        repo.branch("local");

        let status = status_of(&repo);
        let local = status.branches.iter().find(|b| b.name == "local").unwrap();
        assert_eq!(local.upstream, Upstream::None);
        assert_eq!(status.branches.len(), 2);
    }

    #[test]
    fn test_detached_head() {
        let repo = TestRepo::with_commit();
        let oid = repo.repo.head().unwrap().target().unwrap();
        repo.repo.set_head_detached(oid).unwrap();

        let status = status_of(&repo);
        assert_eq!(status.head, Head::Detached(oid.to_string()));
        assert_eq!(status.head.branch(), None);
        assert_eq!(status.upstream, Upstream::None);
    }
}
