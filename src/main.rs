// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Talpa CLI: build, query, and inspect snapshots.
//!
//! ```bash
//! # Build a snapshot from a JSON index definition
//! talpa index --input books.json --output books.talpa
//!
//! # Query it
//! talpa search books.talpa "title:peter" --limit 10
//!
//! # Same, but stop early once the slice is covered
//! talpa search books.talpa "peter pan" --terminate-early 1
//!
//! # What is in there?
//! talpa inspect books.talpa
//! ```
//!
//! The index definition is one JSON document:
//!
//! ```json
//! {
//!   "name": "books",
//!   "categories": [
//!     {"name": "title", "weight": 1.0},
//!     {"name": "author", "qualifiers": ["author", "by"],
//!      "similarity": {"phonetic": {"n": 5}}},
//!     {"name": "isbn", "partial": {"substring": {"from": 4, "to": -1}}}
//!   ],
//!   "records": [
//!     {"id": 1, "fields": {"title": "Peter Pan", "author": "Barrie"}}
//!   ]
//! }
//! ```

use clap::Parser;
use serde::Deserialize;
use std::path::Path;
use std::process::ExitCode;

use talpa::{
    search, CategorySpec, Index, PartialKind, Record, SearchError, SearchOptions, SimilarityKind,
    Snapshot, Tokenizer,
};

mod cli;
use cli::display::{count, styled, timing, BOLD, CYAN, DIM, GREEN, YELLOW};
use cli::{Cli, Commands};

/// JSON shape of `talpa index --input`.
#[derive(Deserialize)]
struct IndexFile {
    name: String,
    /// Punctuation to strip from tokens; omit for the default set.
    #[serde(default)]
    removed_characters: Option<String>,
    categories: Vec<CategoryFile>,
    records: Vec<Record>,
}

#[derive(Deserialize)]
struct CategoryFile {
    name: String,
    #[serde(default)]
    weight: f64,
    #[serde(default)]
    qualifiers: Vec<String>,
    #[serde(default)]
    partial: PartialKind,
    #[serde(default)]
    similarity: SimilarityKind,
    #[serde(default)]
    from: Option<String>,
    #[serde(default)]
    location: Option<LocationFile>,
}

#[derive(Deserialize)]
struct LocationFile {
    radius: f64,
    #[serde(default = "default_precision")]
    precision: usize,
}

fn default_precision() -> usize {
    1
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let outcome = match cli.command {
        Commands::Index { input, output } => run_index(&input, &output),
        Commands::Search {
            snapshot,
            query,
            limit,
            offset,
            terminate_early,
            json,
        } => run_search(&snapshot, &query, limit, offset, terminate_early, json),
        Commands::Inspect { snapshot } => run_inspect(&snapshot),
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err);
            ExitCode::FAILURE
        }
    }
}

fn run_index(input: &Path, output: &Path) -> Result<(), SearchError> {
    let raw = std::fs::read_to_string(input)?;
    let definition: IndexFile = serde_json::from_str(&raw).map_err(|err| {
        SearchError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("{}: {}", input.display(), err),
        ))
    })?;

    let tokenizer = match &definition.removed_characters {
        Some(removed) => Tokenizer::removing(removed),
        None => Tokenizer::new(),
    };
    let mut index = Index::with_tokenizer(&definition.name, tokenizer);

    for category in definition.categories {
        if let Some(location) = category.location {
            index.location(&category.name, location.radius, location.precision);
            continue;
        }
        let mut spec = CategorySpec::new()
            .partial(category.partial)
            .similarity(category.similarity)
            .weight(category.weight);
        spec.qualifiers = category.qualifiers;
        spec.from = category.from;
        index.category(&category.name, spec);
    }

    let record_count = definition.records.len();
    for record in definition.records {
        index.add_record(record);
    }

    let started = std::time::Instant::now();
    let snapshot = build(&index, record_count);
    snapshot.dump(output)?;

    println!(
        "{} {} records into {} in {}",
        styled("indexed", GREEN),
        count(record_count),
        output.display(),
        timing(started.elapsed().as_secs_f64()),
    );
    Ok(())
}

/// Parallel build for corpora big enough to amortize the fork, with a
/// progress spinner when we are on a terminal.
#[cfg(feature = "parallel")]
fn build(index: &Index, record_count: usize) -> Snapshot {
    use indicatif::{ProgressBar, ProgressStyle};

    if record_count < 10_000 {
        return index.commit();
    }

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner} indexing {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(format!("{} records", count(record_count)));
    let snapshot = index.commit_parallel();
    spinner.finish_and_clear();
    snapshot
}

#[cfg(not(feature = "parallel"))]
fn build(index: &Index, _record_count: usize) -> Snapshot {
    index.commit()
}

fn run_search(
    snapshot_path: &Path,
    query: &str,
    limit: usize,
    offset: usize,
    terminate_early: Option<usize>,
    json: bool,
) -> Result<(), SearchError> {
    let snapshot = Snapshot::load(snapshot_path)?;

    let mut options = SearchOptions::default().limit(limit).offset(offset);
    if let Some(extra) = terminate_early {
        options = options.terminate_early_with(extra);
    }

    let results = search(&snapshot, query, &options);

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&results).unwrap_or_else(|_| "{}".to_string())
        );
        return Ok(());
    }

    println!(
        "{} {} of {} ids in {}",
        styled(&results.ids.len().to_string(), BOLD),
        styled("hits", DIM),
        count(results.total),
        styled(&timing(results.duration), CYAN),
    );
    for qualifier in &results.unknown_qualifiers {
        println!(
            "{} unknown qualifier '{}'",
            styled("warning:", YELLOW),
            qualifier
        );
    }
    if results.truncated {
        println!("{} deadline expired, partial results", styled("warning:", YELLOW));
    }

    for summary in &results.allocations {
        println!(
            "  {} {:<30} {:>8} ids  score {:.3}",
            styled("▸", DIM),
            summary.categories.join(", "),
            count(summary.ids_count),
            summary.score,
        );
    }
    if !results.ids.is_empty() {
        let rendered: Vec<String> = results.ids.iter().map(|id| id.to_string()).collect();
        println!("  {}", rendered.join(" "));
    }
    Ok(())
}

fn run_inspect(snapshot_path: &Path) -> Result<(), SearchError> {
    let snapshot = Snapshot::load(snapshot_path)?;

    println!(
        "{} {} ({} records)",
        styled("index", DIM),
        styled(snapshot.name(), BOLD),
        count(snapshot.record_count()),
    );
    for category in snapshot.categories() {
        println!(
            "  {:<16} exact {:>9} tokens / {:>9} postings   partial {:>9}   classes {:>7}   weight {:.2}",
            styled(category.name(), CYAN),
            count(category.exact.token_count()),
            count(category.exact.posting_count()),
            count(category.partial.token_count()),
            count(category.similarity.class_count()),
            category.weight,
        );
    }
    Ok(())
}
