// SPDX-License-Identifier: MIT OR Apache-2.0
//! Command-line interface.

use clap::Parser;
use std::path::PathBuf;
use vizlab_graph::TraversalMode;

/// Animate a BFS or DFS traversal of a graph, one node per tick
#[derive(Debug, Parser)]
#[command(name = "vizlab", version, about)]
pub struct Cli {
    /// Settings file (RON); defaults to ./vizlab.ron when present
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Graph file (RON); defaults to the bundled 20-node ring
    #[arg(long, short = 'g')]
    pub graph: Option<PathBuf>,

    /// Start node ID
    #[arg(long, short = 's')]
    pub start: Option<String>,

    /// Traversal mode: "bfs" or "dfs"
    #[arg(long, short = 'm')]
    pub mode: Option<TraversalMode>,

    /// Delay between highlighted nodes in milliseconds
    #[arg(long)]
    pub delay_ms: Option<u64>,

    /// Print the algorithm description before playing
    #[arg(long)]
    pub describe: bool,

    /// Write the bundled ring graph to FILE and exit
    #[arg(long, value_name = "FILE")]
    pub dump_fixture: Option<PathBuf>,

    /// Write the resolved settings to FILE and exit
    #[arg(long, value_name = "FILE")]
    pub write_config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, short = 'v')]
    pub verbose: bool,
}
