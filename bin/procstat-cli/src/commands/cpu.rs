// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `procstat cpu`: static CPU identity and limits.

use super::Context;
use anyhow::Context as _;
use procstat::read_cpu_topology;

pub fn execute(ctx: &Context) -> anyhow::Result<()> {
    let topology = read_cpu_topology(&ctx.fs).context("reading CPU topology")?;

    if ctx.json {
        return ctx.print_json(&topology);
    }

    println!("  CPU");
    println!("   Model:        {}", topology.name);
    println!("   Vendor:       {}", topology.vendor_id);
    println!(
        "   Family/Model: {}/{} (stepping {})",
        topology.family, topology.model, topology.stepping
    );
    println!(
        "   Topology:     {} socket(s), {} core(s), {} thread(s)",
        topology.socket_count, topology.core_count, topology.thread_count
    );
    if let Some(online) = topology.online_count {
        println!("   Online:       {online}");
    }
    println!(
        "   Frequency:    {} - {} MHz",
        topology.min_freq_mhz(),
        topology.max_freq_mhz()
    );
    println!("   Cache:        {} KB", topology.cache_kb);
    println!("   Flags:        {}", topology.flags.len());
    println!("   Tick rate:    {}", ctx.ticks);
    Ok(())
}
