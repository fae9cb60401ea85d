// SPDX-License-Identifier: MIT OR Apache-2.0
//! `vizlab` - headless graph traversal player
//!
//! Loads a graph (a RON file or the bundled 20-node ring), computes a BFS or
//! DFS visitation order from a start node, then replays that order one node
//! per tick in the terminal.
//!
//! ## Architecture
//!
//! Traversal lives in `vizlab_graph` and pacing in `vizlab_sequencer`. This
//! binary only wires them together: settings and flags in, rendered frames
//! out on stdout, logs on stderr.

mod cli;
mod error;
mod player;
mod settings;

use clap::Parser;
use cli::Cli;
use error::AppError;
use settings::AppSettings;
use std::process::ExitCode;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;
use vizlab_graph::graphs::undirected;
use vizlab_graph::{AlgorithmInfo, Graph};

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    tracing::info!("Starting vizlab v{}", env!("CARGO_PKG_VERSION"));

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();

    // Frames go to stdout, so logs stay on stderr.
    tracing_subscriber::registry()
        .with(log_filter(rust_log.as_deref(), verbose))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// `RUST_LOG` wins when set; otherwise the player crates log at info, or
/// debug with `--verbose`.
fn log_filter(rust_log: Option<&str>, verbose: bool) -> EnvFilter {
    if let Some(directives) = rust_log.filter(|d| !d.trim().is_empty()) {
        match EnvFilter::try_new(directives) {
            Ok(filter) => return filter,
            Err(e) => eprintln!("Ignoring invalid RUST_LOG {directives:?}: {e}"),
        }
    }

    let level = if verbose { "debug" } else { "info" };
    EnvFilter::new(format!("vizlab_app={level},vizlab_sequencer={level}"))
}

fn run(cli: &Cli) -> Result<(), AppError> {
    let settings = AppSettings::resolve(cli)?;

    if let Some(path) = &cli.write_config {
        settings.save(path)?;
        tracing::info!("Wrote settings to {}", path.display());
        return Ok(());
    }

    if let Some(path) = &cli.dump_fixture {
        undirected::ring_with_chords().save(path)?;
        tracing::info!("Wrote ring fixture to {}", path.display());
        return Ok(());
    }

    let graph = match &settings.graph {
        Some(path) => Graph::load(path)?,
        None => undirected::ring_with_chords(),
    };
    tracing::info!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "Loaded graph '{}'",
        graph.name
    );

    if cli.describe {
        print_description(settings.mode.info());
    }

    // An unknown start node fails here, before anything is animated.
    let order = vizlab_graph::traverse(&graph, &settings.start, settings.mode)?;
    tracing::info!(
        mode = %settings.mode,
        start = %settings.start,
        reached = order.len(),
        "Computed visitation order"
    );

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let mut stdout = std::io::stdout();
    let snapshot =
        runtime.block_on(player::play(&graph, order, settings.sequencer.clone(), &mut stdout))?;

    tracing::info!(
        status = %snapshot.status,
        visited = snapshot.visited.len(),
        "Playback finished"
    );
    Ok(())
}

fn print_description(info: &AlgorithmInfo) {
    println!("{}", info.name);
    println!();
    println!("{}", info.description);
    println!();
    println!("Time:  {}", info.time_complexity);
    println!("Space: {}", info.space_complexity);
    println!();
    for line in info.pseudocode {
        println!("  {line}");
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_log_filter() {
        let filter = log_filter(None, false).to_string();
        assert!(filter.contains("vizlab_app=info"), "{filter}");
        assert!(filter.contains("vizlab_sequencer=info"), "{filter}");

        let filter = log_filter(Some("  "), true).to_string();
        assert!(filter.contains("vizlab_app=debug"), "{filter}");
        assert!(filter.contains("vizlab_sequencer=debug"), "{filter}");
    }

    #[test]
    fn test_rust_log_overrides_defaults() {
        for verbose in [false, true] {
            let filter =
                log_filter(Some("vizlab_sequencer=trace,vizlab_app=trace"), verbose).to_string();
            assert!(filter.contains("vizlab_sequencer=trace"), "{filter}");
            assert!(filter.contains("vizlab_app=trace"), "{filter}");
            assert!(!filter.contains("=info"), "{filter}");
            assert!(!filter.contains("=debug"), "{filter}");
        }
    }

    #[test]
    fn test_invalid_rust_log_falls_back() {
        let filter = log_filter(Some("vizlab_app=loud"), false).to_string();
        assert!(filter.contains("vizlab_app=info"), "{filter}");
    }
}
