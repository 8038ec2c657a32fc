// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `procstat ps`: process list ordered by resident memory.

use super::Context;
use procstat::{list_processes, read_memory, ProcessInfo};

pub fn execute(ctx: &Context, limit: usize) -> anyhow::Result<()> {
    let mut processes = list_processes(&ctx.fs)?;
    let memory = read_memory(&ctx.fs)?;
    sort_by_resident(&mut processes);
    processes.truncate(limit);

    if ctx.json {
        return ctx.print_json(&processes);
    }

    println!(
        "{:>8} {:>8} {:>6} {:>10} {:>7} {:>7}  NAME",
        "PID", "PPID", "STATE", "RSS(kB)", "MEM%", "CPU%"
    );
    for p in &processes {
        println!(
            "{:>8} {:>8} {:>6} {:>10} {:>7.1} {:>7.1}  {}",
            p.pid,
            p.ppid,
            p.state,
            p.memory.resident_kb,
            memory.share_of_total_percent(p.memory.resident_kb),
            p.lifetime_cpu_percent(ctx.ticks),
            p.name
        );
    }
    Ok(())
}

/// Largest resident set first; ties by pid.
fn sort_by_resident(processes: &mut [ProcessInfo]) {
    processes.sort_by(|a, b| {
        b.memory
            .resident_kb
            .cmp(&a.memory.resident_kb)
            .then(a.pid.cmp(&b.pid))
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn proc_with(pid: u64, rss: u64) -> ProcessInfo {
        let mut p = ProcessInfo {
            pid,
            ..Default::default()
        };
        p.memory.resident_kb = rss;
        p
    }

    #[test]
    fn test_sort_by_resident() {
        let mut ps = vec![proc_with(3, 10), proc_with(1, 500), proc_with(2, 10)];
        sort_by_resident(&mut ps);
        assert_eq!(ps.iter().map(|p| p.pid).collect::<Vec<_>>(), vec![1, 2, 3]);
    }
}
