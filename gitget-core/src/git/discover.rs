//! Finding repositories under a root directory

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use git2::Repository;
use tracing::warn;

use crate::Result;

/// Every repository under `root`, sorted
///
/// A directory is a repository when it has a `.git` entry or is itself a
/// bare repository. Does not descend into a repository once found. A missing
/// root yields an empty list; unreadable subdirectories are skipped.
pub fn find_repos(root: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
    let root = root.as_ref();
    let mut repos = Vec::new();

    if !root.exists() {
        return Ok(repos);
    }

    walk(root, &mut repos)?;

    repos.sort();
    Ok(repos)
}

fn is_repo(dir: &Path) -> bool {
    dir.join(".git").exists()
        || (dir.join("HEAD").is_file() && Repository::open_bare(dir).is_ok())
}

fn walk(dir: &Path, repos: &mut Vec<PathBuf>) -> io::Result<()> {
    if is_repo(dir) {
        repos.push(dir.to_path_buf());
        return Ok(());
    }

    for entry in fs::read_dir(dir)? {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!(dir = %dir.display(), error = %e, "Skipping unreadable entry");
                continue;
            }
        };

        // Symlinks are not followed
        if !entry.file_type().is_ok_and(|t| t.is_dir()) {
            continue;
        }

        let path = entry.path();
        if let Err(e) = walk(&path, repos) {
            warn!(dir = %path.display(), error = %e, "Skipping unreadable directory");
        }
    }

    Ok(())
}
