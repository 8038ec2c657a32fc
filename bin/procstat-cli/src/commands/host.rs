// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `procstat host`: two host snapshots and the usage between them.

use super::{usage_bar, Context};
use procstat::{HostSnapshot, HostUsage};
use std::time::Duration;

#[derive(serde::Serialize)]
struct HostReport<'a> {
    snapshot: &'a HostSnapshot,
    usage: &'a HostUsage,
}

pub async fn execute(ctx: &Context, interval_ms: u64) -> anyhow::Result<()> {
    let first = HostSnapshot::capture(&ctx.fs)?;
    tokio::time::sleep(Duration::from_millis(interval_ms)).await;
    let second = HostSnapshot::capture(&ctx.fs)?;
    let usage = second.usage_since(&first);
    tracing::info!("{}", usage.summary());

    if ctx.json {
        return ctx.print_json(&HostReport {
            snapshot: &second,
            usage: &usage,
        });
    }

    println!("  CPU");
    println!(
        "   Total:        {:5.1}%  {}",
        usage.cpu_percent,
        usage_bar(usage.cpu_percent)
    );
    for (i, pct) in usage.core_percents.iter().enumerate() {
        println!("   cpu{i:<10} {pct:5.1}%  {}", usage_bar(*pct));
    }
    println!();

    println!("  Memory");
    println!("   Total:        {} MB", second.memory.total_mb());
    println!("   Free:         {} MB", second.memory.free_mb());
    println!(
        "   Used:         {:5.1}%  {}",
        usage.memory_used_percent,
        usage_bar(usage.memory_used_percent)
    );
    println!("   Swap used:    {:5.1}%", usage.swap_used_percent);
    println!();

    if let Some(load) = &second.load {
        println!("  Load");
        println!(
            "   Average:      {:.2} {:.2} {:.2}  ({}/{} tasks runnable)",
            load.avg1, load.avg5, load.avg15, load.active_tasks, load.total_tasks
        );
        println!();
    }

    println!("{}", second.summary());
    Ok(())
}
