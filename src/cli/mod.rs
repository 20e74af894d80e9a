// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Command-line argument definitions.

pub mod display;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "talpa", version, about = "Categorical full-text search")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build a snapshot from a JSON index definition
    Index {
        /// Index definition file (name, categories, records)
        #[arg(long)]
        input: PathBuf,
        /// Snapshot file to write
        #[arg(long)]
        output: PathBuf,
    },
    /// Query a snapshot
    Search {
        /// Snapshot file built by `talpa index`
        snapshot: PathBuf,
        /// Query text; qualifier syntax (`title:word`) applies
        query: String,
        #[arg(long, default_value_t = talpa::DEFAULT_LIMIT)]
        limit: usize,
        #[arg(long, default_value_t = 0)]
        offset: usize,
        /// Stop evaluating N allocations after the result slice is covered
        #[arg(long, value_name = "EXTRA")]
        terminate_early: Option<usize>,
        /// Print the raw result JSON instead of the human listing
        #[arg(long)]
        json: bool,
    },
    /// Show a snapshot's category statistics
    Inspect {
        /// Snapshot file to examine
        snapshot: PathBuf,
    },
}
