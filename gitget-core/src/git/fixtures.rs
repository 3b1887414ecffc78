//! Throwaway repositories for tests

use std::fs;
use std::path::Path;

use git2::{Oid, Repository, Signature, Time};
use tempfile::TempDir;

use super::clone::CloneOptions;
use super::repo::Repo;
use crate::address::parse_url;

const TEST_USER: &str = "Test User";
const TEST_EMAIL: &str = "testuser@example.com";
/// 2000-01-01 16:00:00 UTC
const TEST_TIME: i64 = 946_742_400;

/// A repository in a temp dir, removed on drop
pub struct TestRepo {
    dir: TempDir,
    pub repo: Repository,
}

impl TestRepo {
    pub fn empty() -> Self {
        let dir = TempDir::new().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        Self { dir, repo }
    }

    pub fn with_commit() -> Self {
        let repo = Self::empty();
        repo.write_file("README", "I'm a README file");
        repo.add_file("README");
        repo.commit("Initial commit");
        repo
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// `file://` address of this repository, run through the normalizer
    pub fn url(&self) -> String {
        parse_url(&format!("file://{}", self.path().display()))
            .unwrap()
            .to_string()
    }

    pub fn write_file(&self, name: &str, content: &str) {
        write_file(&self.repo, name, content);
    }

    pub fn add_file(&self, name: &str) {
        add_file(&self.repo, name);
    }

    pub fn commit(&self, msg: &str) -> Oid {
        commit(&self.repo, msg)
    }

    pub fn branch(&self, name: &str) {
        let head = self.repo.head().unwrap().peel_to_commit().unwrap();
        self.repo.branch(name, &head, false).unwrap();
    }

    /// Overwrite the ref HEAD points at with something that isn't a commit id
    pub fn corrupt_head_ref(&self) {
        let head = self.repo.head().unwrap();
        let name = head.name().unwrap();
        fs::write(self.repo.path().join(name), "not a commit id\n").unwrap();
    }

    /// Clone this repository into a fresh temp dir
    pub fn clone_repo(&self) -> (TempDir, Repo) {
        let dir = TempDir::new().unwrap();
        let repo = Repo::clone(&self.url(), dir.path().join("clone"), &CloneOptions::default())
            .unwrap();
        (dir, repo)
    }
}

pub fn write_file(repo: &Repository, name: &str, content: &str) {
    let workdir = repo.workdir().unwrap();
    fs::write(workdir.join(name), content).unwrap();
}

pub fn add_file(repo: &Repository, name: &str) {
    let mut index = repo.index().unwrap();
    index.add_path(Path::new(name)).unwrap();
    index.write().unwrap();
}

pub fn commit(repo: &Repository, msg: &str) -> Oid {
    let sig = Signature::new(TEST_USER, TEST_EMAIL, &Time::new(TEST_TIME, 0)).unwrap();

    let mut index = repo.index().unwrap();
    let tree_id = index.write_tree().unwrap();
    let tree = repo.find_tree(tree_id).unwrap();

    let parent = repo.head().ok().and_then(|h| h.peel_to_commit().ok());
    let parents: Vec<_> = parent.iter().collect();

    repo.commit(Some("HEAD"), &sig, &sig, msg, &tree, &parents)
        .unwrap()
}
