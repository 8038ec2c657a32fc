// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # procstat
//!
//! Command-line interface for the procstat library.
//!
//! ## Usage
//! ```bash
//! # Host CPU/memory usage over a 1 s window
//! procstat host --interval-ms 1000
//!
//! # One process, sampled twice
//! procstat proc 1234
//!
//! # Top processes by resident memory, as JSON
//! procstat --json ps --limit 10
//!
//! # Read a host /proc mounted into a container
//! procstat --config ./procstat.toml mem
//! ```

mod commands;

use anyhow::Context;
use clap::{Parser, Subcommand};
use procstat::ProcConfig;

#[derive(Parser)]
#[command(
    name = "procstat",
    about = "Host and process telemetry from /proc counters",
    version,
    author
)]
struct Cli {
    /// Path to a TOML configuration file (proc/sys roots, tick rate).
    #[arg(short, long, global = true)]
    config: Option<std::path::PathBuf>,

    /// Enable verbose logging (repeat for more: -v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Print machine-readable JSON instead of text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sample host CPU twice and report usage plus memory.
    Host {
        /// Delay between the two CPU samples, in milliseconds.
        #[arg(short, long, default_value_t = 1000)]
        interval_ms: u64,
    },

    /// Show CPU identity, topology and frequency limits.
    Cpu,

    /// Show system memory accounting.
    Mem,

    /// Sample one process twice and report its CPU and memory share.
    Proc {
        /// Process id.
        pid: u64,

        /// Delay between the two samples, in milliseconds.
        #[arg(short, long, default_value_t = 1000)]
        interval_ms: u64,
    },

    /// List processes, largest resident set first.
    Ps {
        /// Maximum number of rows.
        #[arg(short, long, default_value_t = 20)]
        limit: usize,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing/logging based on verbosity.
    commands::init_tracing(cli.verbose);

    let config = match &cli.config {
        Some(path) => ProcConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => ProcConfig::default(),
    };
    let ctx = commands::Context::new(&config, cli.json)?;

    match cli.command {
        Commands::Host { interval_ms } => commands::host::execute(&ctx, interval_ms).await,
        Commands::Cpu => commands::cpu::execute(&ctx),
        Commands::Mem => commands::mem::execute(&ctx),
        Commands::Proc { pid, interval_ms } => {
            commands::process::execute(&ctx, pid, interval_ms).await
        }
        Commands::Ps { limit } => commands::ps::execute(&ctx, limit),
    }
}
