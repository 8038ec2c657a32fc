// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Cumulative scheduler tick counters from `/proc/stat`.
//!
//! ```text
//! cpu  10132153 290696 3084719 46828483 16683 0 25195 0 175628 0
//! cpu0 1393280 32966 572056 13343292 6130 0 17875 0 23933 0
//! ```
//!
//! The kernel already counts guest time inside `user` (and guest-nice time
//! inside `nice`). [`CpuStat`] removes that overlap once, at construction,
//! so `total` never double-counts.

use crate::schema::{CpuField, CPU_STAT_V1};
use crate::{KernelFs, ProcError};
use std::path::Path;

/// Label prefix shared by the aggregate and per-core records.
const CPU_PREFIX: &str = "cpu";

/// One sample of cumulative tick counters, system-wide or for one core.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct CpuStat {
    /// User-mode ticks, excluding guest time.
    pub user: u64,
    /// Niced user-mode ticks, excluding guest-nice time.
    pub nice: u64,
    pub system: u64,
    pub idle: u64,
    pub iowait: u64,
    pub irq: u64,
    pub softirq: u64,
    pub steal: u64,
    pub guest: u64,
    pub guest_nice: u64,
    /// Sum of the ten fields above.
    pub total: u64,
}

impl CpuStat {
    /// Builds a sample from raw kernel-order counters
    /// (`user nice system idle iowait irq softirq steal guest guest_nice`).
    ///
    /// `user` and `nice` are taken as reported, i.e. still including guest
    /// time; the overlap is removed here. A `total` that would overflow
    /// saturates at `u64::MAX`.
    pub fn from_raw(raw: [u64; 10]) -> Self {
        let mut stat = Self::without_guest_overlap(raw);
        stat.total = stat.field_sum().unwrap_or(u64::MAX);
        stat
    }

    fn without_guest_overlap(raw: [u64; 10]) -> Self {
        let [user, nice, system, idle, iowait, irq, softirq, steal, guest, guest_nice] = raw;
        Self {
            user: user.saturating_sub(guest),
            nice: nice.saturating_sub(guest_nice),
            system,
            idle,
            iowait,
            irq,
            softirq,
            steal,
            guest,
            guest_nice,
            total: 0,
        }
    }

    /// Parses a single `cpu`/`cpuN` line.
    ///
    /// The line must have exactly 11 whitespace-separated fields, and the
    /// counters must sum without overflowing `u64`.
    pub fn parse_line(line: &str, source_path: &Path) -> Result<Self, ProcError> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let mut raw = [0u64; 10];
        for (field, value) in CPU_STAT_V1.extract(&tokens, source_path)? {
            raw[column(field)] = value.as_u64();
        }
        let mut stat = Self::without_guest_overlap(raw);
        stat.total = stat.field_sum().ok_or_else(|| {
            ProcError::malformed(source_path.display().to_string(), "cpu tick counters overflow u64")
        })?;
        Ok(stat)
    }

    /// Idle plus iowait ticks.
    pub fn idle_ticks(&self) -> u64 {
        self.idle.saturating_add(self.iowait)
    }

    /// Ticks spent doing anything other than idling or waiting on I/O.
    pub fn busy_ticks(&self) -> u64 {
        self.total.saturating_sub(self.idle_ticks())
    }

    fn field_sum(&self) -> Option<u64> {
        [
            self.user,
            self.nice,
            self.system,
            self.idle,
            self.iowait,
            self.irq,
            self.softirq,
            self.steal,
            self.guest,
            self.guest_nice,
        ]
        .into_iter()
        .try_fold(0u64, u64::checked_add)
    }
}

fn column(field: CpuField) -> usize {
    match field {
        CpuField::User => 0,
        CpuField::Nice => 1,
        CpuField::System => 2,
        CpuField::Idle => 3,
        CpuField::Iowait => 4,
        CpuField::Irq => 5,
        CpuField::Softirq => 6,
        CpuField::Steal => 7,
        CpuField::Guest => 8,
        CpuField::GuestNice => 9,
    }
}

/// Parses `/proc/stat` content into the aggregate record and the per-core
/// records in file order.
///
/// Any malformed `cpu*` line rejects the whole file.
pub fn parse_cpu_stat(content: &str, source_path: &Path) -> Result<(CpuStat, Vec<CpuStat>), ProcError> {
    let mut aggregate = None;
    let mut cores = Vec::new();

    for line in content.lines() {
        let Some(label) = line.split_whitespace().next() else {
            continue;
        };
        if !label.starts_with(CPU_PREFIX) {
            continue;
        }

        let stat = CpuStat::parse_line(line, source_path)?;
        if label == CPU_PREFIX {
            aggregate = Some(stat);
        } else {
            cores.push(stat);
        }
    }

    let aggregate = aggregate.ok_or_else(|| ProcError::NotFound {
        what: format!("aggregate 'cpu' record in {}", source_path.display()),
    })?;

    tracing::trace!(cores = cores.len(), total = aggregate.total, "parsed cpu stat");
    Ok((aggregate, cores))
}

/// Reads `<proc>/stat`: the system-wide sample plus one sample per core.
pub fn read_cpu_stat(fs: &KernelFs) -> Result<(CpuStat, Vec<CpuStat>), ProcError> {
    let path = fs.proc_path("stat");
    let content = fs.read_to_string(&path)?;
    parse_cpu_stat(&content, &path)
}
