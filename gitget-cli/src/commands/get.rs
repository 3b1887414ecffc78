//! Get command - clone a repository to its derived path

use clap::Args;
use gitget_core::{clone_repo, parse_url, Config};

/// Clone a repository under the root directory
#[derive(Args, Debug)]
pub struct GetArgs {
    /// Repository address (https://, ssh://, git+ssh://, file:// or user@host:path)
    url: String,

    /// Branch to check out instead of the remote HEAD
    #[arg(short, long)]
    branch: Option<String>,

    /// Clone without a working tree
    #[arg(long)]
    bare: bool,
}

impl GetArgs {
    /// Execute the get command
    pub fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let url = parse_url(&self.url)?;
        let dest = config.repo_path(&url);

        if dest.exists() {
            anyhow::bail!("Repository already exists at {}", dest.display());
        }

        let mut options = config.clone.clone();
        if self.bare {
            options.bare = true;
        }
        if let Some(branch) = &self.branch {
            options.branch = Some(branch.clone());
        }

        clone_repo(&url.to_string(), &dest, &options)?;

        println!("{}", dest.display());
        Ok(())
    }
}

/// Print where a repository would be cloned to
#[derive(Args, Debug)]
pub struct PathArgs {
    /// Repository address
    url: String,
}

impl PathArgs {
    /// Execute the path command
    pub fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let url = parse_url(&self.url)?;
        println!("{}", config.repo_path(&url).display());
        Ok(())
    }
}
