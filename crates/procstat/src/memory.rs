// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! System memory accounting via `/proc/meminfo`.
//!
//! All counters are kept in kibibytes, as the kernel reports them.
//!
//! # Known limitation
//! `free` is redefined as `MemFree + Cached + Buffers`, the traditional
//! "available" approximation. Inside some cgroup setups the kernel can
//! report counters where that sum exceeds `MemTotal` (or `SwapFree` exceeds
//! `SwapTotal`). The derived `used`/`swap_used` values are meaningless in
//! that case; they saturate at zero rather than wrap.

use crate::source::parse_field;
use crate::{KernelFs, ProcError};
use std::path::Path;

/// System-wide memory state at one instant, in kibibytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct MemorySnapshot {
    pub total: u64,
    /// `MemFree + Cached + Buffers`.
    pub free: u64,
    /// `total - free`.
    pub used: u64,
    pub cached: u64,
    pub buffers: u64,
    pub active: u64,
    pub inactive: u64,
    pub swap_total: u64,
    pub swap_free: u64,
    /// `swap_total - swap_free`.
    pub swap_used: u64,
    pub swap_cached: u64,
}

impl MemorySnapshot {
    /// Parses the content of a `/proc/meminfo`-formatted string.
    pub fn parse(content: &str, source_path: &Path) -> Result<Self, ProcError> {
        let mut mem = Self::default();

        for line in content.lines() {
            let parts: Vec<&str> = line.split_whitespace().collect();
            if parts.len() < 2 {
                return Err(ProcError::malformed(
                    source_path.display().to_string(),
                    format!("expected 'Key: value [unit]', got '{line}'"),
                ));
            }
            let value: u64 = parse_field(parts[1], source_path, "kB value")?;

            let key = parts[0].trim_end_matches(':').to_lowercase();
            match key.as_str() {
                "memtotal" => mem.total = value,
                "memfree" => mem.free = value,
                "cached" => mem.cached = value,
                "buffers" => mem.buffers = value,
                "active" => mem.active = value,
                "inactive" => mem.inactive = value,
                "swaptotal" => mem.swap_total = value,
                "swapfree" => mem.swap_free = value,
                "swapcached" => mem.swap_cached = value,
                _ => {}
            }
        }

        mem.free = mem.free + mem.cached + mem.buffers;
        mem.used = mem.total.saturating_sub(mem.free);
        mem.swap_used = mem.swap_total.saturating_sub(mem.swap_free);
        Ok(mem)
    }

    /// Used memory as a percentage of total; `0.0` when total is zero.
    pub fn used_percent(&self) -> f64 {
        percent(self.used, self.total)
    }

    /// Free memory as a percentage of total; `0.0` when total is zero.
    pub fn free_percent(&self) -> f64 {
        percent(self.free, self.total)
    }

    /// Used swap as a percentage of swap total; `0.0` without swap.
    pub fn swap_used_percent(&self) -> f64 {
        percent(self.swap_used, self.swap_total)
    }

    /// Free swap as a percentage of swap total; `0.0` without swap.
    pub fn swap_free_percent(&self) -> f64 {
        percent(self.swap_free, self.swap_total)
    }

    /// `kb` as a percentage of total memory; `0.0` when total is zero.
    pub fn share_of_total_percent(&self, kb: u64) -> f64 {
        percent(kb, self.total)
    }

    /// Returns total memory in megabytes.
    pub fn total_mb(&self) -> u64 {
        self.total / 1024
    }

    /// Returns free (available) memory in megabytes.
    pub fn free_mb(&self) -> u64 {
        self.free / 1024
    }
}

fn percent(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    part as f64 / whole as f64 * 100.0
}

/// Reads current memory information from `<proc>/meminfo`.
pub fn read_memory(fs: &KernelFs) -> Result<MemorySnapshot, ProcError> {
    let path = fs.proc_path("meminfo");
    let content = fs.read_to_string(&path)?;
    MemorySnapshot::parse(&content, &path)
}
