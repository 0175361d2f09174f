// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use clap::{Parser, Subcommand};
use merkle_cli::commands::{dump, inspect, prove, verify};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "merkle")]
#[command(about = "Offline inspection and proof tooling for Merkle hash logs", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show entry count, level count and root of a hash log.
    Inspect {
        log_path: PathBuf,
    },
    /// Rebuild the tree from a hash log and print every level.
    Dump {
        log_path: PathBuf,
    },
    /// Print the inclusion proof for one leaf as JSON
    Prove {
        log_path: PathBuf,
        index: usize,
    },
    /// Check a record against a root without any tree storage
    Verify {
        /// Expected root, 0x-prefixed hex
        #[arg(long)]
        root: String,

        /// Leaf index of the record
        #[arg(long)]
        index: usize,

        /// The record itself
        #[arg(long)]
        data: String,

        /// Sibling hashes, leaf level first. Repeat once per level.
        #[arg(long = "hash")]
        hashes: Vec<String>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Inspect { log_path } => inspect::run(&log_path),
        Commands::Dump { log_path } => dump::run(&log_path),
        Commands::Prove { log_path, index } => prove::run(&log_path, index),
        Commands::Verify {
            root,
            index,
            data,
            hashes,
        } => verify::run(&root, index, &data, &hashes),
    }
}
