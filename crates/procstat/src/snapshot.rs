// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Aggregated point-in-time host snapshot.
//!
//! A [`HostSnapshot`] bundles the CPU tick counters, memory accounting and
//! load averages read at one instant. Two snapshots taken apart yield a
//! [`HostUsage`] via [`HostSnapshot::usage_since`].

use crate::cpu::{read_cpu_stat, CpuStat};
use crate::loadavg::{read_load_average, LoadAverage};
use crate::memory::{read_memory, MemorySnapshot};
use crate::usage::cpu_usage_percent;
use crate::{KernelFs, ProcError};
use std::time::{SystemTime, UNIX_EPOCH};

/// Host-wide counters captured together.
#[derive(Debug, Clone, serde::Serialize)]
pub struct HostSnapshot {
    /// System-wide CPU sample.
    pub cpu: CpuStat,
    /// Per-core samples, in `/proc/stat` order.
    pub cores: Vec<CpuStat>,
    pub memory: MemorySnapshot,
    /// `None` if `/proc/loadavg` could not be read.
    pub load: Option<LoadAverage>,
    /// Unix timestamp in milliseconds when the snapshot was taken.
    pub timestamp_ms: u64,
}

/// Rates between two host snapshots.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct HostUsage {
    pub cpu_percent: f64,
    /// Per-core busy share; cores missing from either snapshot are dropped.
    pub core_percents: Vec<f64>,
    pub memory_used_percent: f64,
    pub swap_used_percent: f64,
    /// Wall-clock time between the two snapshots.
    pub interval_ms: u64,
}

impl HostSnapshot {
    /// Captures a new snapshot.
    ///
    /// CPU and memory reads must succeed; load average degrades to `None`.
    pub fn capture(fs: &KernelFs) -> Result<Self, ProcError> {
        let (cpu, cores) = read_cpu_stat(fs)?;
        let memory = read_memory(fs)?;
        let load = read_load_average(fs)
            .map_err(|e| tracing::warn!("load average unavailable: {e}"))
            .ok();

        let timestamp_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);

        Ok(Self {
            cpu,
            cores,
            memory,
            load,
            timestamp_ms,
        })
    }

    /// Rates between `earlier` and `self`.
    ///
    /// CPU rates come from the tick deltas; memory figures are taken from
    /// `self` since they are gauges, not counters.
    pub fn usage_since(&self, earlier: &HostSnapshot) -> HostUsage {
        let core_percents = earlier
            .cores
            .iter()
            .zip(&self.cores)
            .map(|(a, b)| cpu_usage_percent(Some(a), Some(b)))
            .collect();

        HostUsage {
            cpu_percent: cpu_usage_percent(Some(&earlier.cpu), Some(&self.cpu)),
            core_percents,
            memory_used_percent: self.memory.used_percent(),
            swap_used_percent: self.memory.swap_used_percent(),
            interval_ms: self.timestamp_ms.abs_diff(earlier.timestamp_ms),
        }
    }

    /// Returns a summary string suitable for logging or CLI display.
    ///
    /// # Example output
    /// ```text
    /// Host: 8 cores, Mem 2456/3793 MB free (35.3% used), Swap 0.0% used, Load 0.35 0.28 0.22
    /// ```
    pub fn summary(&self) -> String {
        let load = match &self.load {
            Some(l) => format!("{:.2} {:.2} {:.2}", l.avg1, l.avg5, l.avg15),
            None => "n/a".to_string(),
        };
        format!(
            "Host: {} cores, Mem {}/{} MB free ({:.1}% used), Swap {:.1}% used, Load {load}",
            self.cores.len(),
            self.memory.free_mb(),
            self.memory.total_mb(),
            self.memory.used_percent(),
            self.memory.swap_used_percent(),
        )
    }
}

impl HostUsage {
    /// The busiest core's share, or `0.0` without per-core data.
    pub fn peak_core_percent(&self) -> f64 {
        self.core_percents.iter().copied().fold(0.0, f64::max)
    }

    /// Returns a one-line summary.
    pub fn summary(&self) -> String {
        format!(
            "CPU {:.1}% (peak core {:.1}%), Mem {:.1}% used, Swap {:.1}% used over {} ms",
            self.cpu_percent,
            self.peak_core_percent(),
            self.memory_used_percent,
            self.swap_used_percent,
            self.interval_ms,
        )
    }
}
