//! Git operations for git-get
//!
//! This module provides cloning, the repository handle, status snapshots and
//! discovery of repositories under a root directory.

mod clone;
mod discover;
mod repo;
mod status;

#[cfg(test)]
pub(crate) mod fixtures;

pub use clone::{clone_repo, CloneOptions};
pub use discover::find_repos;
pub use repo::Repo;
pub use status::{load_status, BranchStatus, FileStates, Head, StatusSnapshot, Upstream};
