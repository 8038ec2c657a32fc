// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `procstat proc <pid>`: one process, sampled twice.

use super::Context;
use anyhow::Context as _;
use procstat::usage::process_cpu_usage_percent;
use procstat::{read_process, ProcessInfo};
use std::time::Duration;

#[derive(serde::Serialize)]
struct ProcessReport<'a> {
    process: &'a ProcessInfo,
    cpu_percent: f64,
    lifetime_cpu_percent: f64,
    memory_percent: f64,
}

pub async fn execute(ctx: &Context, pid: u64, interval_ms: u64) -> anyhow::Result<()> {
    let mut info = read_process(&ctx.fs, pid).with_context(|| format!("reading process {pid}"))?;
    let before = info.cpu;

    tokio::time::sleep(Duration::from_millis(interval_ms)).await;
    info.update(&ctx.fs)
        .with_context(|| format!("refreshing process {pid}"))?;

    let cpu_percent = process_cpu_usage_percent(Some(&before), Some(&info.cpu), ctx.ticks);
    let lifetime_percent = info.lifetime_cpu_percent(ctx.ticks);
    let memory_percent = info.memory_percent(&ctx.fs)?;

    if ctx.json {
        return ctx.print_json(&ProcessReport {
            process: &info,
            cpu_percent,
            lifetime_cpu_percent: lifetime_percent,
            memory_percent,
        });
    }

    println!("  Process {}", info.pid);
    println!("   Name:         {}", info.name);
    if !info.path.is_empty() {
        println!("   Command:      {} {}", info.path, info.arguments.join(" "));
    }
    println!("   State:        {}", info.state);
    println!("   Parent:       {}", info.ppid);
    println!("   User/Group:   {}/{}", info.uid, info.gid);
    println!("   Threads:      {}", info.thread_count);
    println!("   Priority:     {} (nice {})", info.priority, info.nice);
    println!();
    println!("  Usage");
    println!("   CPU:          {cpu_percent:.1}%  (over {interval_ms} ms)");
    println!("   CPU lifetime: {lifetime_percent:.1}%");
    println!(
        "   Memory:       {:.1}%  ({} kB resident, {} kB virtual)",
        memory_percent, info.memory.resident_kb, info.memory.virtual_kb
    );
    Ok(())
}
