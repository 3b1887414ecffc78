//! Error types for git-get

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for git-get operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for git-get operations
///
/// Every engine failure keeps the underlying `git2::Error` as its source, so
/// the full chain is available to whoever reports it.
#[derive(Error, Debug)]
pub enum Error {
    /// Address matched neither the SCP-like form nor the generic URL grammar
    #[error("Failed parsing URL: {0}")]
    InvalidUrl(#[source] url::ParseError),

    /// Address parsed but names neither a host nor a path
    #[error("Parsed URL is empty")]
    EmptyUrl,

    /// Clone failed
    #[error("Failed cloning repo {url}")]
    CloneFailed {
        url: String,
        #[source]
        source: git2::Error,
    },

    /// Opening an existing repository failed
    #[error("Failed opening repo at {}", path.display())]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: git2::Error,
    },

    /// Listing configured remotes failed
    #[error("Failed listing remotes")]
    ListRemotesFailed(#[source] git2::Error),

    /// Looking up or fetching a remote failed
    #[error("Failed fetching remote {remote}")]
    FetchFailed {
        remote: String,
        #[source]
        source: git2::Error,
    },

    /// Computing the status snapshot failed
    #[error("Failed loading repo status")]
    StatusLoadFailed(#[source] git2::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Discriminant of [`Error`] for programmatic dispatch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidUrl,
    EmptyUrl,
    CloneFailed,
    OpenFailed,
    ListRemotesFailed,
    FetchFailed,
    StatusLoadFailed,
    Io,
    Config,
}

impl Error {
    /// The kind of failure, independent of its message
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidUrl(_) => ErrorKind::InvalidUrl,
            Error::EmptyUrl => ErrorKind::EmptyUrl,
            Error::CloneFailed { .. } => ErrorKind::CloneFailed,
            Error::OpenFailed { .. } => ErrorKind::OpenFailed,
            Error::ListRemotesFailed(_) => ErrorKind::ListRemotesFailed,
            Error::FetchFailed { .. } => ErrorKind::FetchFailed,
            Error::StatusLoadFailed(_) => ErrorKind::StatusLoadFailed,
            Error::Io(_) => ErrorKind::Io,
            Error::Config(_) => ErrorKind::Config,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error as _;

    use super::*;

    #[test]
    fn test_kind_matches_variant() {
        assert_eq!(Error::EmptyUrl.kind(), ErrorKind::EmptyUrl);
        assert_eq!(
            Error::Config("bad".to_string()).kind(),
            ErrorKind::Config
        );
    }

    #[test]
    fn test_source_chain_preserved() {
        let err = Error::FetchFailed {
            remote: "origin".to_string(),
            source: git2::Error::from_str("connection refused"),
        };

        assert_eq!(err.to_string(), "Failed fetching remote origin");
        let source = err.source().unwrap();
        assert!(source.to_string().contains("connection refused"));
    }
}
