//! List command - status of every repository under the root

use std::path::Path;

use clap::Args;
use gitget_core::{find_repos, Config};
use serde_json::json;

use super::status::{open_synced, summary};

/// List all repositories under the root directory
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Fetch all remotes of each repository first
    #[arg(short, long)]
    fetch: bool,

    /// Print the listing as JSON
    #[arg(long)]
    json: bool,
}

impl ListArgs {
    /// Execute the list command
    pub fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let repos = find_repos(&config.root)?;
        tracing::debug!(root = %config.root.display(), count = repos.len(), "Found repos");

        if repos.is_empty() && !self.json {
            println!("No repositories found under {}", config.root.display());
            return Ok(());
        }

        let mut entries = Vec::new();

        for path in &repos {
            let name = relative(&config.root, path);

            // One broken repo shouldn't hide the rest
            match open_synced(path, self.fetch) {
                Ok(repo) if self.json => {
                    entries.push(json!({ "path": name, "status": repo.status() }));
                }
                Ok(repo) => println!("{}  {}", name, summary(repo.status())),
                Err(e) if self.json => {
                    entries.push(json!({ "path": name, "error": format!("{:#}", anyhow::Error::new(e)) }));
                }
                Err(e) => println!("{}  error: {:#}", name, anyhow::Error::new(e)),
            }
        }

        if self.json {
            println!("{}", serde_json::to_string_pretty(&entries)?);
        }

        Ok(())
    }
}

fn relative(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .display()
        .to_string()
}
