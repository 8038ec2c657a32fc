// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! CPU tick counters and static topology.

mod stat;
mod topology;

pub use stat::{parse_cpu_stat, read_cpu_stat, CpuStat};
pub use topology::{parse_cpuinfo, read_cpu_topology, CpuTopology};
