//! git-get core - clone remote repositories into a predictable directory tree
//!
//! This crate normalizes remote addresses, derives a deterministic local path
//! for each of them, and tracks the synchronization state of the local clones.
//! All object storage, transport and diffing is done by libgit2.

pub mod address;
pub mod config;
pub mod error;
pub mod git;

pub use address::{parse_url, url_to_path, CanonicalUrl};
pub use config::Config;
pub use error::{Error, ErrorKind, Result};
pub use git::{
    clone_repo, find_repos, load_status, BranchStatus, CloneOptions, FileStates, Head, Repo,
    StatusSnapshot, Upstream,
};
