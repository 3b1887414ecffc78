//! git-get CLI - clone repositories into a predictable directory tree
//!
//! Every repository lands at `<root>/<host>/<path>`, and can later be listed
//! with its sync state against its upstream.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use gitget_core::Config;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use commands::{GetArgs, ListArgs, PathArgs, StatusArgs};

/// git-get: clone repositories into a predictable directory tree
#[derive(Parser, Debug)]
#[command(name = "git-get")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Directory repositories are cloned under (overrides config and env)
    #[arg(long, global = true, env = "GITGET_ROOT")]
    root: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show version information
    Version,

    /// Clone a repository under the root directory
    #[command(visible_alias = "g")]
    Get(GetArgs),

    /// Print where a repository would be cloned to
    Path(PathArgs),

    /// Show the status of a single repository
    #[command(visible_alias = "st")]
    Status(StatusArgs),

    /// List all repositories under the root directory
    #[command(visible_alias = "ls")]
    List(ListArgs),

    /// Show current configuration
    Config,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose {
        EnvFilter::new("gitget_core=debug,git_get=debug")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    // Load configuration with overrides
    let config = Config::load_with_overrides(cli.root.clone())?;

    tracing::debug!(
        root = %config.root.display(),
        bare = config.clone.bare,
        "Configuration loaded"
    );

    match cli.command {
        Some(Commands::Version) => {
            println!("git-get {}", env!("CARGO_PKG_VERSION"));
        }
        Some(Commands::Get(args)) => {
            args.execute(&config)?;
        }
        Some(Commands::Path(args)) => {
            args.execute(&config)?;
        }
        Some(Commands::Status(args)) => {
            args.execute(cli.verbose)?;
        }
        Some(Commands::List(args)) => {
            args.execute(&config)?;
        }
        Some(Commands::Config) => {
            println!("git-get Configuration");
            println!("=====================");
            println!();
            println!("  root: {}", config.root.display());
            println!("  clone.bare: {}", config.clone.bare);
            println!(
                "  clone.branch: {}",
                config.clone.branch.as_deref().unwrap_or("(remote HEAD)")
            );
            println!();
            if let Some(path) = Config::default_config_path() {
                println!("Config file: {}", path.display());
                if path.exists() {
                    println!("  (exists)");
                } else {
                    println!("  (not found - using defaults)");
                }
            }
        }
        None => {
            println!("git-get - clone repositories into a predictable directory tree");
            println!();
            println!("Use --help for usage information");
        }
    }

    Ok(())
}
