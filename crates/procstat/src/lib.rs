// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # procstat
//!
//! Reads cumulative kernel accounting counters from `/proc` and `/sys` into
//! immutable snapshots, and turns pairs of snapshots into usage rates.
//!
//! # Snapshots
//! - [`CpuStat`]: system-wide and per-core scheduler ticks (`/proc/stat`).
//! - [`MemorySnapshot`]: system memory accounting (`/proc/meminfo`).
//! - [`ProcessInfo`]: identity, CPU ticks and memory of one process
//!   (`/proc/<pid>/{status,stat,cmdline}`).
//! - [`CpuTopology`], [`LoadAverage`]: informational, no rates.
//!
//! # Rates
//! Counters only mean something as deltas. The caller takes two snapshots
//! some time apart and hands both to a calculator in [`usage`]:
//!
//! ```text
//! read_cpu_stat() ──► CpuStat (t0) ─┐
//!                                   ├──► cpu_usage_percent() ──► f64
//! read_cpu_stat() ──► CpuStat (t1) ─┘
//! ```
//!
//! Nothing here schedules reads or keeps history.
//!
//! # Injected context
//! Readers take a [`KernelFs`] (where procfs/sysfs live) and tick
//! conversions take a [`TickRate`]. Both are plain values, so tests can
//! point at a fixture tree and pin the tick rate.
//!
//! # Example
//! ```no_run
//! use procstat::{read_cpu_stat, usage, KernelFs};
//!
//! let fs = KernelFs::host();
//! let (before, _) = read_cpu_stat(&fs).expect("failed to read /proc/stat");
//! std::thread::sleep(std::time::Duration::from_millis(500));
//! let (after, _) = read_cpu_stat(&fs).expect("failed to read /proc/stat");
//! println!("CPU {:.1}%", usage::cpu_usage_percent(Some(&before), Some(&after)));
//! ```

mod config;
pub mod cpu;
mod error;
mod loadavg;
mod memory;
pub mod process;
pub mod schema;
mod snapshot;
mod source;
mod tick;
mod uptime;
pub mod usage;

pub use config::ProcConfig;
pub use cpu::{read_cpu_stat, read_cpu_topology, CpuStat, CpuTopology};
pub use error::ProcError;
pub use loadavg::{read_load_average, LoadAverage};
pub use memory::{read_memory, MemorySnapshot};
pub use process::{
    list_processes, read_process, ProcessCpuStat, ProcessInfo, ProcessMemoryStat, ProcessTicks,
};
pub use snapshot::{HostSnapshot, HostUsage};
pub use source::KernelFs;
pub use tick::TickRate;
pub use uptime::read_uptime;
