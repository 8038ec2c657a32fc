// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Static CPU identity and frequency limits.
//!
//! Reads CPU state from:
//! - `/proc/cpuinfo`: one `key : value` stanza per logical thread.
//! - `/sys/devices/system/cpu/cpu0/cpufreq/cpuinfo_{min,max}_freq`: the
//!   hardware frequency limits in kHz.
//! - `/sys/devices/system/cpu/online`: the online CPU range list (optional).
//!
//! Nothing here is rate-based; the values are informational.

use crate::source::parse_field;
use crate::{KernelFs, ProcError};
use std::collections::BTreeSet;
use std::path::Path;

/// sysfs CPU directory, relative to the sys root.
const CPU_SYSFS_DIR: &str = "devices/system/cpu";

/// CPU identity, topology counts and frequency limits.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct CpuTopology {
    /// `model name`, e.g. `"Intel(R) Core(TM) i7-8550U CPU @ 1.80GHz"`.
    pub name: String,
    pub model: u64,
    pub family: u64,
    pub vendor_id: String,
    pub stepping: String,
    /// `cache size`, in the unit the kernel reports (kB on x86).
    pub cache_kb: u64,
    pub flags: Vec<String>,
    /// Minimum hardware frequency in kHz.
    pub min_freq_khz: u64,
    /// Maximum hardware frequency in kHz.
    pub max_freq_khz: u64,
    /// Distinct `core id` values.
    pub core_count: u64,
    /// Number of `processor` stanzas (logical threads).
    pub thread_count: u64,
    /// Distinct `physical id` values.
    pub socket_count: u64,
    /// CPUs listed in `/sys/devices/system/cpu/online`, if readable.
    pub online_count: Option<u32>,
}

impl CpuTopology {
    /// Maximum frequency in MHz.
    pub fn max_freq_mhz(&self) -> u64 {
        self.max_freq_khz / 1000
    }

    /// Minimum frequency in MHz.
    pub fn min_freq_mhz(&self) -> u64 {
        self.min_freq_khz / 1000
    }
}

/// Reads frequency limits from sysfs and identity from `<proc>/cpuinfo`.
pub fn read_cpu_topology(fs: &KernelFs) -> Result<CpuTopology, ProcError> {
    let min_freq_khz = read_freq(fs, "cpu0/cpufreq/cpuinfo_min_freq")?;
    let max_freq_khz = read_freq(fs, "cpu0/cpufreq/cpuinfo_max_freq")?;

    let cpuinfo_path = fs.proc_path("cpuinfo");
    let content = fs.read_to_string(&cpuinfo_path)?;
    let mut topology = parse_cpuinfo(&content, &cpuinfo_path)?;

    topology.min_freq_khz = min_freq_khz;
    topology.max_freq_khz = max_freq_khz;
    topology.online_count = read_online_count(fs);
    Ok(topology)
}

/// Parses `/proc/cpuinfo` content. Frequency fields are left at zero.
pub fn parse_cpuinfo(content: &str, source_path: &Path) -> Result<CpuTopology, ProcError> {
    let mut topology = CpuTopology::default();
    let mut name: Option<String> = None;
    let mut model: Option<u64> = None;
    let mut family: Option<u64> = None;
    let mut vendor_id: Option<String> = None;
    let mut stepping: Option<String> = None;
    let mut cache_kb: Option<u64> = None;
    let mut flags: Option<Vec<String>> = None;
    let mut cores = BTreeSet::new();
    let mut sockets = BTreeSet::new();

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let parts: Vec<&str> = line.split(':').collect();
        let [key, value] = parts.as_slice() else {
            return Err(ProcError::malformed(
                source_path.display().to_string(),
                format!("expected 'key: value', got '{line}'"),
            ));
        };
        let key = key.trim().to_lowercase();
        let value = value.trim();

        match key.as_str() {
            "processor" => topology.thread_count += 1,
            "model name" if name.is_none() => name = Some(value.to_string()),
            "model" if model.is_none() => model = Some(parse_field(value, source_path, "model")?),
            "cpu family" if family.is_none() => {
                family = Some(parse_field(value, source_path, "cpu family")?)
            }
            "vendor_id" if vendor_id.is_none() => vendor_id = Some(value.to_string()),
            "stepping" if stepping.is_none() => stepping = Some(value.to_string()),
            "cache size" if cache_kb.is_none() => cache_kb = Some(parse_cache_size(value, source_path)?),
            "flags" if flags.is_none() => {
                flags = Some(value.split_whitespace().map(str::to_string).collect())
            }
            "physical id" => {
                sockets.insert(parse_field::<u64>(value, source_path, "physical id")?);
            }
            "core id" => {
                cores.insert(parse_field::<u64>(value, source_path, "core id")?);
            }
            _ => {}
        }
    }

    topology.name = name.unwrap_or_default();
    topology.model = model.unwrap_or_default();
    topology.family = family.unwrap_or_default();
    topology.vendor_id = vendor_id.unwrap_or_default();
    topology.stepping = stepping.unwrap_or_default();
    topology.cache_kb = cache_kb.unwrap_or_default();
    topology.flags = flags.unwrap_or_default();
    topology.core_count = cores.len() as u64;
    topology.socket_count = sockets.len() as u64;
    Ok(topology)
}

/// `cache size : 8192 KB` → 8192.
fn parse_cache_size(value: &str, source_path: &Path) -> Result<u64, ProcError> {
    let fields: Vec<&str> = value.split_whitespace().collect();
    match fields.as_slice() {
        [amount, _unit] => parse_field(amount, source_path, "cache size"),
        _ => Err(ProcError::malformed(
            source_path.display().to_string(),
            format!("expected '<size> <unit>' cache size, got '{value}'"),
        )),
    }
}

/// Reads a CPU frequency value from sysfs (reported in kHz).
fn read_freq(fs: &KernelFs, relative: &str) -> Result<u64, ProcError> {
    let path = fs.sys_path(CPU_SYSFS_DIR).join(relative);
    let content = fs.read_single_value(&path)?;
    parse_field(&content, &path, "frequency (kHz)")
}

/// Counts CPUs in the sysfs `online` range list; `None` if unreadable.
fn read_online_count(fs: &KernelFs) -> Option<u32> {
    let path = fs.sys_path(CPU_SYSFS_DIR).join("online");
    match fs.read_single_value(&path) {
        Ok(content) => parse_cpu_range(&content),
        Err(e) => {
            tracing::debug!("online cpu list unavailable: {e}");
            None
        }
    }
}

/// Parses a CPU range string like `"0-3"` → 4, `"0-7"` → 8, `"0"` → 1, `"0,2-3"` → 3.
fn parse_cpu_range(s: &str) -> Option<u32> {
    let mut total = 0u32;
    for part in s.split(',') {
        let part = part.trim();
        if let Some((start_s, end_s)) = part.split_once('-') {
            let start: u32 = start_s.trim().parse().ok()?;
            let end: u32 = end_s.trim().parse().ok()?;
            total += end.checked_sub(start)? + 1;
        } else {
            let _: u32 = part.parse().ok()?;
            total += 1;
        }
    }
    (total > 0).then_some(total)
}
