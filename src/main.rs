//! CLI entry point for weblog

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "weblog")]
#[command(version)]
#[command(about = "Post index, markdown rendering and related posts for a small blog", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rebuild the post index
    #[command(alias = "r")]
    Regenerate {
        /// Rebuild again whenever a post changes
        #[arg(short, long)]
        watch: bool,
    },

    /// List indexed content
    List {
        /// Type of content to list (post, tag)
        #[arg(default_value = "post")]
        r#type: String,
    },

    /// Render a post with its related posts
    Show {
        /// Post file name, e.g. hello.md
        id: String,

        /// Print the rendered post as JSON
        #[arg(long)]
        json: bool,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "weblog=debug,info"
    } else {
        "weblog=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir().context("Cannot determine current directory")?,
    };

    match cli.command {
        Commands::Regenerate { watch } => {
            let blog = weblog::Weblog::new(&base_dir)?;
            tracing::info!("Regenerating index from {:?}", blog.posts_dir);
            weblog::commands::regenerate::run(&blog)?;

            if watch {
                weblog::commands::regenerate::watch(&blog)?;
            }
        }

        Commands::List { r#type } => {
            let blog = weblog::Weblog::new(&base_dir)?;
            weblog::commands::list::run(&blog, &r#type)?;
        }

        Commands::Show { id, json } => {
            let blog = weblog::Weblog::new(&base_dir)?;
            weblog::commands::show::run(&blog, &id, json)?;
        }

        Commands::Version => {
            println!("weblog version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
