//! Repository handle: open, clone, fetch and reload

use std::path::{Path, PathBuf};

use git2::{FetchOptions, Repository};
use tracing::{debug, info};

use super::clone::{clone_repo, remote_callbacks, CloneOptions};
use super::status::{load_status, StatusSnapshot};
use crate::{Error, Result};

/// An opened repository together with its latest status snapshot
///
/// A `Repo` always holds a snapshot: `open` and `clone` fail rather than
/// return a handle whose status could not be loaded. Not meant to be shared
/// between threads; callers serialize access to a given handle.
pub struct Repo {
    repo: Repository,
    path: PathBuf,
    status: StatusSnapshot,
}

impl std::fmt::Debug for Repo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repo")
            .field("path", &self.path)
            .field("status", &self.status)
            .finish_non_exhaustive()
    }
}

impl Repo {
    /// Open the repository at `path` and load its status
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "Opening repo");

        let repo = Repository::open(path).map_err(|source| Error::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;

        let status = load_status(&repo)?;

        Ok(Self {
            repo,
            path: path.to_path_buf(),
            status,
        })
    }

    /// Clone `url` into `path`, then open it
    pub fn clone(url: &str, path: impl AsRef<Path>, options: &CloneOptions) -> Result<Self> {
        let path = path.as_ref();
        clone_repo(url, path, options)?;
        Self::open(path)
    }

    /// Fetch every configured remote
    ///
    /// Stops at the first remote that fails; later remotes are not tried.
    /// Only remote-tracking refs change, the status snapshot is left as is
    /// until [`Repo::reload`].
    pub fn fetch(&self) -> Result<()> {
        let names = self.repo.remotes().map_err(Error::ListRemotesFailed)?;

        for name in names.iter().flatten() {
            debug!(remote = name, path = %self.path.display(), "Fetching remote");

            let fetch_failed = |source| Error::FetchFailed {
                remote: name.to_string(),
                source,
            };

            let mut remote = self.repo.find_remote(name).map_err(fetch_failed)?;

            let mut fetch_options = FetchOptions::new();
            fetch_options.remote_callbacks(remote_callbacks());

            remote
                .fetch(&[] as &[&str], Some(&mut fetch_options), None)
                .map_err(fetch_failed)?;
        }

        info!(path = %self.path.display(), remotes = names.len(), "Fetched repo");
        Ok(())
    }

    /// Recompute the status snapshot
    ///
    /// On failure the previous snapshot is kept.
    pub fn reload(&mut self) -> Result<()> {
        self.status = load_status(&self.repo)?;
        Ok(())
    }

    /// Names of the configured remotes
    pub fn remotes(&self) -> Result<Vec<String>> {
        let names = self.repo.remotes().map_err(Error::ListRemotesFailed)?;
        Ok(names.iter().flatten().map(str::to_string).collect())
    }

    /// Path the repository was opened or cloned at
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Latest status snapshot
    pub fn status(&self) -> &StatusSnapshot {
        &self.status
    }

    /// Get access to the underlying git2 repository
    pub fn inner(&self) -> &Repository {
        &self.repo
    }
}
