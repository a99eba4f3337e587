//! Story Tree Dump
//!
//! Builds the typed content tree of an exported story file and prints it as
//! JSON. Useful for checking how fields are classified and which relations
//! resolve before wiring a renderer.
//!
//! # Usage
//!
//! ```bash
//! # Dump a story exported from the delivery API
//! cargo run --bin blok-dump -- story.json
//!
//! # Resolve relations from a directory of <uuid>.json exports
//! cargo run --bin blok-dump -- story.json --relations exports/ --config build.json
//!
//! # List uids with their component paths instead of the full tree
//! cargo run --bin blok-dump -- story.json --index
//! ```
//!
//! Logging goes to stderr and honors `RUST_LOG` (default `info`).

use anyhow::Context;
use blokspace_core::{
    BuildConfig, DirectoryRelationFetcher, FlatIndex, TreeBuilder, TypeRegistry,
};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;

/// Build a story's typed content tree and print it
#[derive(Parser, Debug)]
#[command(name = "blok-dump")]
#[command(about, long_about = None)]
struct Args {
    /// Story JSON file (`{"story": ...}` or the bare envelope)
    story: PathBuf,

    /// Build configuration JSON file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory of `<uuid>.json` exports used to resolve relations
    #[arg(long)]
    relations: Option<PathBuf>,

    /// Print uids with their component paths instead of the full tree
    #[arg(long)]
    index: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => BuildConfig::from_json_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => BuildConfig::default(),
    };

    let mut builder = TreeBuilder::new(Arc::new(TypeRegistry::new())).with_config(config);
    if let Some(dir) = &args.relations {
        tracing::info!(dir = %dir.display(), "Resolving relations from directory");
        builder = builder.with_fetcher(Arc::new(DirectoryRelationFetcher::new(dir)));
    }

    let contents = std::fs::read_to_string(&args.story)
        .with_context(|| format!("Failed to read {}", args.story.display()))?;
    let raw: serde_json::Value = serde_json::from_str(&contents)
        .with_context(|| format!("{} is not valid JSON", args.story.display()))?;

    let story = builder.build_story(raw)?;
    tracing::info!(name = %story.name, full_slug = %story.full_slug, "Built story");

    if args.index {
        let index = FlatIndex::build(&story.content);
        for (uid, node) in index.iter() {
            println!("{}\t{}", uid, node.component_path.join(" > "));
        }
    } else {
        println!("{}", serde_json::to_string_pretty(&story)?);
    }

    Ok(())
}
