//! Status command - show the sync state of one repository

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use clap::Args;
use gitget_core::{Head, Repo, StatusSnapshot, Upstream};

/// Show the status of a single repository
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Repository directory (defaults to the current directory)
    path: Option<PathBuf>,

    /// Fetch all remotes before computing the status
    #[arg(short, long)]
    fetch: bool,

    /// Print the status as JSON
    #[arg(long)]
    json: bool,
}

impl StatusArgs {
    /// Execute the status command
    pub fn execute(&self, verbose: bool) -> anyhow::Result<()> {
        let path = match &self.path {
            Some(path) => path.clone(),
            None => std::env::current_dir()?,
        };

        let repo = open_synced(&path, self.fetch)?;
        let status = repo.status();

        if self.json {
            println!("{}", serde_json::to_string_pretty(status)?);
            return Ok(());
        }

        println!("{}", head_line(status));

        print_files("Staged", &status.files.staged);
        print_files("Modified", &status.files.modified);
        print_files("Untracked", &status.files.untracked);
        if verbose {
            print_files("Ignored", &status.files.ignored);
        }

        if status.branches.len() > 1 {
            println!();
            println!("Branches:");
            for branch in &status.branches {
                println!("  {:<24} {}", branch.name, upstream_label(&branch.upstream));
            }
        }

        Ok(())
    }
}

/// Open a repository, optionally fetching and reloading it first
pub fn open_synced(path: &Path, fetch: bool) -> gitget_core::Result<Repo> {
    let mut repo = Repo::open(path)?;

    if fetch {
        repo.fetch()?;
        repo.reload()?;
    }

    Ok(repo)
}

/// One-line summary: branch, upstream and working tree state
pub fn summary(status: &StatusSnapshot) -> String {
    let branch = match &status.head {
        Head::Branch(name) | Head::Unborn(name) => name.clone(),
        Head::Detached(id) => format!("detached@{}", &id[..id.len().min(8)]),
    };

    let tree = if status.is_clean() { "clean" } else { "dirty" };

    format!("{}  {}  {}", branch, upstream_label(&status.upstream), tree)
}

fn head_line(status: &StatusSnapshot) -> String {
    let head = match &status.head {
        Head::Branch(name) => format!("On branch {}", name),
        Head::Unborn(name) => format!("On branch {} (no commits yet)", name),
        Head::Detached(id) => format!("HEAD detached at {}", id),
    };

    format!("{} [{}]", head, upstream_label(&status.upstream))
}

fn upstream_label(upstream: &Upstream) -> String {
    match upstream {
        Upstream::None => "no upstream".to_string(),
        Upstream::Tracking {
            name,
            ahead: 0,
            behind: 0,
        } => format!("{} up to date", name),
        Upstream::Tracking {
            name,
            ahead,
            behind,
        } => format!("{} ahead {} behind {}", name, ahead, behind),
    }
}

fn print_files(label: &str, paths: &BTreeSet<String>) {
    if paths.is_empty() {
        return;
    }

    println!();
    println!("{}:", label);
    for path in paths {
        println!("  {}", path);
    }
}

#[cfg(test)]
mod tests {
    use gitget_core::{BranchStatus, FileStates};

    use super::*;

    fn snapshot(head: Head, upstream: Upstream) -> StatusSnapshot {
        StatusSnapshot {
            head,
            upstream: upstream.clone(),
            branches: vec![BranchStatus {
                name: "main".to_string(),
                upstream,
            }],
            files: FileStates::default(),
        }
    }

    #[test]
    fn test_summary_tracking() {
        let status = snapshot(
            Head::Branch("main".to_string()),
            Upstream::Tracking {
                name: "origin/main".to_string(),
                ahead: 2,
                behind: 1,
            },
        );
        assert_eq!(summary(&status), "main  origin/main ahead 2 behind 1  clean");
    }

    #[test]
    fn test_summary_dirty_without_upstream() {
        let mut status = snapshot(Head::Branch("main".to_string()), Upstream::None);
        status.files.untracked.insert("notes.txt".to_string());
        assert_eq!(summary(&status), "main  no upstream  dirty");
    }

    #[test]
    fn test_summary_detached() {
        let status = snapshot(
            Head::Detached("0123456789abcdef".to_string()),
            Upstream::None,
        );
        assert!(summary(&status).starts_with("detached@01234567"));
    }
}
