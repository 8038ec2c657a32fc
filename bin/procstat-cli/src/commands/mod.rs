// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Subcommand implementations and shared plumbing.

pub mod cpu;
pub mod host;
pub mod mem;
pub mod process;
pub mod ps;

use anyhow::Context as _;
use procstat::{KernelFs, ProcConfig, TickRate};
use tracing_subscriber::EnvFilter;

/// Resolved configuration every subcommand reads from.
pub struct Context {
    pub fs: KernelFs,
    pub ticks: TickRate,
    pub json: bool,
}

impl Context {
    pub fn new(config: &ProcConfig, json: bool) -> anyhow::Result<Self> {
        let ticks = config
            .resolve_ticks()
            .context("resolving kernel tick rate")?;
        tracing::debug!(
            "proc root {}, sys root {}, {ticks}",
            config.proc_root.display(),
            config.sys_root.display()
        );
        Ok(Self {
            fs: config.kernel_fs(),
            ticks,
            json,
        })
    }

    /// Prints `value` as pretty JSON.
    pub fn print_json<T: serde::Serialize>(&self, value: &T) -> anyhow::Result<()> {
        println!("{}", serde_json::to_string_pretty(value)?);
        Ok(())
    }
}

/// Installs a stderr subscriber; `RUST_LOG` overrides the `-v` count.
pub fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Creates a visual usage bar (0-100 % scale).
pub fn usage_bar(percent: f64) -> String {
    let filled = ((percent / 100.0) * 20.0).round().clamp(0.0, 20.0) as usize;
    let empty = 20 - filled;
    let symbol = if percent >= 90.0 {
        "#"
    } else if percent >= 70.0 {
        "="
    } else {
        "-"
    };
    format!("[{}{}]", symbol.repeat(filled), ".".repeat(empty))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usage_bar() {
        assert_eq!(usage_bar(0.0), format!("[{}]", ".".repeat(20)));
        assert_eq!(usage_bar(50.0), format!("[{}{}]", "-".repeat(10), ".".repeat(10)));
        assert_eq!(usage_bar(100.0), format!("[{}]", "#".repeat(20)));
        assert_eq!(usage_bar(250.0), format!("[{}]", "#".repeat(20)));
    }
}
