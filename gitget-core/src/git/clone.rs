//! Cloning remote repositories

use std::fs;
use std::path::Path;

use git2::build::RepoBuilder;
use git2::{Cred, CredentialType, FetchOptions, RemoteCallbacks};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{Error, Result};

/// Credential requests answered before giving up
const MAX_CREDENTIAL_ATTEMPTS: usize = 3;

/// Options for cloning a repository
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct CloneOptions {
    /// Clone without a working tree (no checkout)
    pub bare: bool,

    /// Check out this branch instead of the remote HEAD
    pub branch: Option<String>,
}

/// Remote callbacks shared by clone and fetch
///
/// Credentials are tried in order: ssh-agent, the configured git credential
/// helper, then the engine default.
pub(crate) fn remote_callbacks<'a>() -> RemoteCallbacks<'a> {
    let mut attempts = 0;

    let mut callbacks = RemoteCallbacks::new();
    callbacks.credentials(move |url, username_from_url, allowed| {
        attempts += 1;
        if attempts > MAX_CREDENTIAL_ATTEMPTS {
            return Err(git2::Error::from_str("no usable credentials"));
        }

        let username = username_from_url.unwrap_or("git");

        if allowed.contains(CredentialType::USERNAME) {
            return Cred::username(username);
        }

        if allowed.contains(CredentialType::SSH_KEY) {
            return Cred::ssh_key_from_agent(username);
        }

        if allowed.contains(CredentialType::USER_PASS_PLAINTEXT) {
            let config = git2::Config::open_default()?;
            return Cred::credential_helper(&config, url, username_from_url);
        }

        Cred::default()
    });

    // Silent for now
    callbacks.transfer_progress(|_| true);

    callbacks
}

/// Clone `url` into `path`
///
/// Missing parent directories of `path` are created first.
pub fn clone_repo(url: &str, path: impl AsRef<Path>, options: &CloneOptions) -> Result<()> {
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut fetch_options = FetchOptions::new();
    fetch_options.remote_callbacks(remote_callbacks());

    let mut builder = RepoBuilder::new();
    builder.bare(options.bare).fetch_options(fetch_options);

    if let Some(branch) = &options.branch {
        builder.branch(branch);
    }

    debug!(url, path = %path.display(), bare = options.bare, "Cloning repo");

    builder.clone(url, path).map_err(|source| Error::CloneFailed {
        url: url.to_string(),
        source,
    })?;

    info!(url, path = %path.display(), "Cloned repo");
    Ok(())
}
