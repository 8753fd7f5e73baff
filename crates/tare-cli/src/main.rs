//! Tare CLI — measure the memory footprint of one construction
//! strategy and capture a heap snapshot of the resulting population.
//!
//! One command, two required options: a strategy from the closed set
//! and a positive instance count. Invalid or missing options print
//! usage and exit non-zero before any work happens.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::{debug, info, warn, Level};

use tare_core::StrategyKind;
use tare_population::Population;
use tare_snapshot::{capture_to_file, HeapGraph};

mod mem;

use mem::{mb, mb_or_unknown, MemoryFigures};

/// Compare object-construction strategies by memory footprint.
///
/// Generates a deterministic population of instances under the chosen
/// strategy, reports coarse before/after memory figures, and writes a
/// heap snapshot of the live object graph for offline inspection.
#[derive(Parser, Debug)]
#[command(name = "tare", version, about, long_about = None)]
struct Cli {
    /// Construction strategy to measure.
    #[arg(short, long, value_enum)]
    strategy: StrategyArg,

    /// Number of instances to generate.
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..))]
    count: u32,

    /// Directory the snapshot file is written into.
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// Relaxation iterations for the pre-capture exercise pass.
    #[arg(long, default_value_t = 4)]
    exercise_iterations: u32,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

/// Closed strategy enumeration for the CLI surface.
#[derive(ValueEnum, Clone, Copy, Debug)]
enum StrategyArg {
    /// One shared method table for all instances.
    Shared,
    /// Per-instance closures over private state.
    Closure,
    /// Per-instance thin wrappers delegating to shared functions.
    Delegate,
}

impl From<StrategyArg> for StrategyKind {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Shared => StrategyKind::Shared,
            StrategyArg::Closure => StrategyKind::Closure,
            StrategyArg::Delegate => StrategyKind::Delegate,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else if cli.quiet {
        Level::ERROR
    } else {
        Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .init();

    let kind: StrategyKind = cli.strategy.into();

    let before = MemoryFigures::probe();
    report_figures("before population", &before, None);

    let mut population = Population::generate(kind, cli.count);
    debug!(
        strategy = %kind,
        count = population.len(),
        warmup = %format!("{:#018x}", population.warmup_digest()),
        "population generated"
    );

    let after = MemoryFigures::probe();
    report_figures(
        "after population",
        &after,
        Some(population.retained_bytes()),
    );
    match after.rss_delta(&before) {
        Some(delta) => info!(
            "population delta: rss {:+.2} MB, retained estimate {}",
            delta as f64 / (1024.0 * 1024.0),
            mb(population.retained_bytes() as u64),
        ),
        None => info!(
            "population delta: retained estimate {} (rss unavailable)",
            mb(population.retained_bytes() as u64),
        ),
    }

    // There is no forced reclamation in this runtime; report the
    // post-population figures for the third checkpoint and move on.
    warn!("forced reclamation unavailable in this runtime; proceeding without it");
    let after_reclaim = MemoryFigures::probe();
    report_figures(
        "after reclamation (no-op)",
        &after_reclaim,
        Some(population.retained_bytes()),
    );

    let exercised = population.exercise(cli.exercise_iterations);
    debug!(digest = %format!("{exercised:#018x}"), "exercise pass complete");

    let path = cli
        .out_dir
        .join(format!("heap-{}-{}.heapsnapshot", kind.label(), cli.count));
    let graph = HeapGraph::from_population(&population);
    let report = capture_to_file(graph, &path)
        .with_context(|| format!("capturing heap snapshot to '{}'", path.display()))?;

    info!(
        "snapshot written: {} ({}, {} fragments, {} nodes, {} edges)",
        report.path.display(),
        mb(report.stats.bytes),
        report.stats.fragments,
        report.stats.nodes,
        report.stats.edges,
    );

    Ok(())
}

/// Print one memory checkpoint.
fn report_figures(label: &str, figures: &MemoryFigures, retained: Option<usize>) {
    match retained {
        Some(bytes) => info!(
            "{label}: rss {}, data {}, retained {}",
            mb_or_unknown(figures.rss_bytes),
            mb_or_unknown(figures.data_bytes),
            mb(bytes as u64),
        ),
        None => info!(
            "{label}: rss {}, data {}",
            mb_or_unknown(figures.rss_bytes),
            mb_or_unknown(figures.data_bytes),
        ),
    }
}
