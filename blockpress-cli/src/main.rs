//! Blockpress command-line front end
//!
//! Inspects the built-in block types, validates edit files and saves them
//! to a local SQLite block store through the reconciliation service.
//!
//! Usage:
//!   blockpress types
//!   blockpress schema hero
//!   blockpress new image_grid --position 2 > grid.json
//!   blockpress validate page.json
//!   blockpress plan --db blocks.db --content-id 7 page.json
//!   blockpress sync --db blocks.db --content-id 7 page.json
//!   blockpress show --db blocks.db --content-id 7
//!
//! Every command prints JSON to stdout; logs go to stderr.

use anyhow::{bail, Result};
use blockpress_blocks::BlockConfigCodec;
use blockpress_cli::{
    builtin_registry, decode_entries, load_config, new_entry, open_service, plan_sync, read_edit_file, run_sync,
    schema_document, show_page, type_summaries, validate_blocks,
};
use blockpress_types::{BlockType, ContentId};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser, Debug)]
#[command(name = "blockpress")]
#[command(about = "Inspect, validate and sync Blockpress content blocks")]
struct Args {
    /// Path to a JSON config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List registered block types
    Types,

    /// Print the field schema of a block type
    Schema {
        block_type: BlockType,
    },

    /// Print a default edit entry for a block type
    New {
        block_type: BlockType,

        /// Position the block is created at
        #[arg(short, long, default_value = "0")]
        position: u32,
    },

    /// Validate an edit file without touching storage
    Validate {
        edit: PathBuf,
    },

    /// Show the operations a sync would send
    Plan {
        #[command(flatten)]
        store: StoreArgs,
        edit: PathBuf,
    },

    /// Save an edit file as the new state of a page
    Sync {
        #[command(flatten)]
        store: StoreArgs,
        edit: PathBuf,
    },

    /// Print the stored blocks of a page as an edit file
    Show {
        #[command(flatten)]
        store: StoreArgs,
    },
}

#[derive(clap::Args, Debug)]
struct StoreArgs {
    /// Path to the SQLite block store
    #[arg(long, default_value = "blocks.db")]
    db: PathBuf,

    /// Page whose blocks are read or written
    #[arg(long)]
    content_id: ContentId,
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    // RUST_LOG wins over --verbose
    let log_level = if args.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let config = load_config(args.config.as_deref())?;
    let registry = builtin_registry();

    match args.command {
        Command::Types => print_json(&type_summaries(&registry)),
        Command::Schema { block_type } => print_json(&schema_document(&registry, &block_type)?),
        Command::New { block_type, position } => {
            let codec = BlockConfigCodec::new(registry);
            print_json(&new_entry(&codec, &block_type, position)?)
        }
        Command::Validate { edit } => {
            let codec = BlockConfigCodec::new(registry);
            let entries = read_edit_file(&edit)?;
            let blocks = decode_entries(&codec, ContentId::new(0), &entries)?;
            let invalid = validate_blocks(&blocks);
            print_json(&invalid)?;
            if !invalid.is_empty() {
                bail!("{} of {} block(s) are invalid", invalid.len(), blocks.len());
            }
            info!("{} block(s) valid", blocks.len());
            Ok(())
        }
        Command::Plan { store, edit } => {
            let service = open_service(&store.db, registry, &config)?;
            let entries = read_edit_file(&edit)?;
            print_json(&plan_sync(&service, store.content_id, &entries).await?)
        }
        Command::Sync { store, edit } => {
            let service = open_service(&store.db, registry, &config)?;
            let entries = read_edit_file(&edit)?;
            let outcome = run_sync(&service, store.content_id, &entries).await?;
            print_json(&outcome)?;
            if !outcome.is_complete() {
                warn!(
                    "{} operation(s) failed, fetch the page before syncing again",
                    outcome.report().failure_count()
                );
                bail!("Sync was only partially applied");
            }
            Ok(())
        }
        Command::Show { store } => {
            let service = open_service(&store.db, registry, &config)?;
            print_json(&show_page(&service, store.content_id).await?)
        }
    }
}
