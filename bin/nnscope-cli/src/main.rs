// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # nnscope
//!
//! Command-line inspector for feed-forward network dumps.
//!
//! ## Usage
//! ```bash
//! # Print nodes, tensors, and endpoints of a dump
//! nnscope inspect --graph ./dumps/mnist/net.json
//!
//! # Load and report a single OK / error line
//! nnscope check --graph ./dumps/mnist/net.json
//! ```

mod commands;
mod config;

use clap::{Parser, Subcommand};
use config::InspectorConfig;

#[derive(Parser)]
#[command(
    name = "nnscope",
    about = "Inspector for feed-forward network dumps",
    version,
    author
)]
struct Cli {
    /// Path to a TOML display configuration file.
    #[arg(short, long, global = true)]
    config: Option<std::path::PathBuf>,

    /// Enable verbose logging (repeat for more: -v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect a dump: print its nodes, tensors, endpoints, and weight previews.
    Inspect {
        /// Path to the network description file.
        #[arg(short, long)]
        graph: std::path::PathBuf,
    },

    /// Load a dump and report success or the first error.
    Check {
        /// Path to the network description file.
        #[arg(short, long)]
        graph: std::path::PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing/logging based on verbosity.
    commands::init_tracing(cli.verbose);

    let config = match &cli.config {
        Some(path) => InspectorConfig::from_file(path)?,
        None => InspectorConfig::default(),
    };

    match cli.command {
        Commands::Inspect { graph } => commands::inspect::execute(graph, &config),
        Commands::Check { graph } => commands::check::execute(graph),
    }
}
