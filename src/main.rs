//! CLI entry point for staticgen-rs

use anyhow::Result;
use clap::{ArgGroup, Parser};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use staticgen_rs::Site;

#[derive(Parser)]
#[command(name = "staticgen-rs")]
#[command(version)]
#[command(about = "A small static site generator: markdown in, html and atom out", long_about = None)]
#[command(group(ArgGroup::new("mode").required(true).args(["init", "generate"])))]
struct Cli {
    /// Initialize an empty project
    #[arg(long)]
    init: bool,

    /// Generate the website from content
    #[arg(long)]
    generate: bool,

    /// Set the project directory (defaults to current directory)
    #[arg(short, long)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long)]
    debug: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "staticgen_rs=debug,info"
    } else {
        "staticgen_rs=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    if cli.init {
        tracing::info!("Initializing project in {:?}", base_dir);
        staticgen_rs::commands::init::run(&base_dir)?;
        println!("Initialized empty project in {:?}", base_dir);
    } else {
        tracing::info!("Generating static files...");
        let site = Site::load(&base_dir)?;
        site.generate()?;
        println!("Generated successfully!");
    }

    Ok(())
}
