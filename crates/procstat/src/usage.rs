// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Rate computation from pairs of snapshots.
//!
//! All functions here are pure apart from [`process_memory_percent`], which
//! needs a fresh `/proc/meminfo` read. The callers keep the snapshots and
//! decide how far apart to take them.
//!
//! # Zero-delta fallbacks
//! When two samples show no progress (equal totals, or equal uptimes), the
//! later sample's cumulative value is used as the "delta" instead. Comparing
//! a sample with itself therefore reports the average since boot (or since
//! process start) rather than dividing zero by zero. Callers rely on this
//! one-off value on their first comparison.

use crate::cpu::CpuStat;
use crate::memory::read_memory;
use crate::process::{ProcessCpuStat, ProcessInfo};
use crate::{KernelFs, ProcError, TickRate};
use std::cmp::Ordering;

/// Busy share of a CPU (or core) between two samples, in percent.
///
/// Returns `0.0` if either sample is missing or both totals are zero.
///
/// When the idle counters did not move, the idle fallback (the later
/// sample's cumulative `idle`) can exceed the total delta, and the result is
/// then negative. It is returned as computed so callers can spot it.
///
/// # Known limitation
/// `CpuStat` carries no timestamp, so the sample with the smaller `total` is
/// taken to be the earlier one. That is wrong if the counters wrapped or
/// were reset between the two reads.
pub fn cpu_usage_percent(a: Option<&CpuStat>, b: Option<&CpuStat>) -> f64 {
    let (Some(a), Some(b)) = (a, b) else {
        return 0.0;
    };
    if a.total == 0 && b.total == 0 {
        return 0.0;
    }

    let (earlier, later) = match cpu_order(a, b) {
        Ordering::Greater => (b, a),
        _ => (a, b),
    };

    let mut delta_total = later.total - earlier.total;
    if delta_total == 0 {
        delta_total = later.total;
    }

    let mut delta_idle = later.idle_ticks().saturating_sub(earlier.idle_ticks());
    if delta_idle == 0 {
        delta_idle = later.idle;
    }

    let busy = delta_total as f64 - delta_idle as f64;
    busy / delta_total as f64 * 100.0
}

/// Recency order for timestamp-less CPU samples: by `total`, ties broken on
/// the idle counters so that argument order never changes the result.
fn cpu_order(a: &CpuStat, b: &CpuStat) -> Ordering {
    a.total
        .cmp(&b.total)
        .then(a.idle_ticks().cmp(&b.idle_ticks()))
        .then(a.idle.cmp(&b.idle))
}

/// CPU share of one process between two samples, in percent of one core.
///
/// A multi-threaded process can exceed 100. Returns `0.0` if either sample
/// is missing or neither carries a capture time.
pub fn process_cpu_usage_percent(
    a: Option<&ProcessCpuStat>,
    b: Option<&ProcessCpuStat>,
    ticks: TickRate,
) -> f64 {
    let (Some(a), Some(b)) = (a, b) else {
        return 0.0;
    };
    if a.uptime_secs == 0.0 && b.uptime_secs == 0.0 {
        return 0.0;
    }

    let (earlier, later) = match a
        .uptime_secs
        .total_cmp(&b.uptime_secs)
        .then(a.total.cmp(&b.total))
    {
        Ordering::Greater => (b, a),
        _ => (a, b),
    };

    let mut elapsed = later.uptime_secs - earlier.uptime_secs;
    if elapsed == 0.0 {
        // Freshly started: measure from the process start instead.
        elapsed = later.uptime_secs - ticks.ticks_to_secs(later.start_ticks);
    }
    if elapsed <= 0.0 {
        return 0.0;
    }

    100.0 * ticks.ticks_to_secs(later.total.saturating_sub(earlier.total)) / elapsed
}

/// CPU share of a process averaged over its whole lifetime, from one sample.
pub fn process_lifetime_cpu_percent(cpu: &ProcessCpuStat, ticks: TickRate) -> f64 {
    let elapsed = cpu.uptime_secs - ticks.ticks_to_secs(cpu.start_ticks);
    if elapsed <= 0.0 {
        return 0.0;
    }
    100.0 * ticks.ticks_to_secs(cpu.total) / elapsed
}

/// Resident memory of a process as a percentage of total system memory.
///
/// Reads `<proc>/meminfo` on every call; returns `0.0` if it reports a zero
/// total.
pub fn process_memory_percent(process: &ProcessInfo, fs: &KernelFs) -> Result<f64, ProcError> {
    let memory = read_memory(fs)?;
    Ok(memory.share_of_total_percent(process.memory.resident_kb))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::ProcessTicks;
    use proptest::prelude::*;

    fn cpu(raw: [u64; 10]) -> CpuStat {
        CpuStat::from_raw(raw)
    }

    fn proc_cpu(start: u64, utime: u64, stime: u64, uptime_secs: f64) -> ProcessCpuStat {
        ProcessCpuStat::from_ticks(
            ProcessTicks {
                start,
                utime,
                stime,
                ..Default::default()
            },
            uptime_secs,
        )
    }

    #[test]
    fn test_two_sample_usage() {
        let a = cpu([100, 0, 50, 800, 10, 0, 0, 0, 0, 0]);
        let b = cpu([150, 0, 70, 820, 15, 0, 0, 0, 0, 0]);
        assert_eq!(a.total, 960);
        assert_eq!(b.total, 1055);
        // delta_total = 95, delta_idle = (820+15) - (800+10) = 25.
        let expected = (95.0 - 25.0) / 95.0 * 100.0;
        assert!((cpu_usage_percent(Some(&a), Some(&b)) - expected).abs() < 1e-9);
    }

    #[test]
    fn test_argument_order_irrelevant() {
        let a = cpu([100, 0, 50, 800, 10, 0, 0, 0, 0, 0]);
        let b = cpu([150, 0, 70, 820, 15, 0, 0, 0, 0, 0]);
        assert_eq!(
            cpu_usage_percent(Some(&a), Some(&b)),
            cpu_usage_percent(Some(&b), Some(&a))
        );
    }

    #[test]
    fn test_missing_or_empty_samples() {
        let a = cpu([1, 0, 0, 1, 0, 0, 0, 0, 0, 0]);
        let zero = CpuStat::default();
        assert_eq!(cpu_usage_percent(None, Some(&a)), 0.0);
        assert_eq!(cpu_usage_percent(Some(&a), None), 0.0);
        assert_eq!(cpu_usage_percent(Some(&zero), Some(&zero)), 0.0);
    }

    #[test]
    fn test_identical_samples_report_since_boot_share() {
        let x = cpu([200, 0, 100, 700, 0, 0, 0, 0, 0, 0]);
        // Stalled pair: total and idle fall back to the cumulative values.
        assert!((cpu_usage_percent(Some(&x), Some(&x)) - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_fully_idle_pair() {
        let x = cpu([0, 0, 0, 500, 0, 0, 0, 0, 0, 0]);
        assert_eq!(cpu_usage_percent(Some(&x), Some(&x)), 0.0);
    }

    #[test]
    fn test_stalled_idle_returns_raw_fallback_value() {
        // 100 busy ticks, idle unchanged: delta_idle falls back to 500.
        let a = cpu([100, 0, 100, 500, 0, 0, 0, 0, 0, 0]);
        let b = cpu([100, 0, 200, 500, 0, 0, 0, 0, 0, 0]);
        assert!((cpu_usage_percent(Some(&a), Some(&b)) - -400.0).abs() < 1e-9);
    }

    #[test]
    fn test_first_call_against_empty_sample() {
        let boot = CpuStat::default();
        let now = cpu([300, 0, 100, 600, 0, 0, 0, 0, 0, 0]);
        assert!((cpu_usage_percent(Some(&boot), Some(&now)) - 40.0).abs() < 1e-9);
    }

    #[test]
    fn test_process_usage() {
        let tps = TickRate::USER_HZ;
        let a = proc_cpu(1000, 200, 100, 50.0);
        let b = proc_cpu(1000, 350, 150, 52.0);
        // 200 ticks = 2 s of CPU over 2 s.
        assert!((process_cpu_usage_percent(Some(&a), Some(&b), tps) - 100.0).abs() < 1e-9);
        assert_eq!(
            process_cpu_usage_percent(Some(&b), Some(&a), tps),
            process_cpu_usage_percent(Some(&a), Some(&b), tps)
        );
    }

    #[test]
    fn test_process_usage_degenerate() {
        let tps = TickRate::USER_HZ;
        let a = proc_cpu(0, 10, 10, 0.0);
        assert_eq!(process_cpu_usage_percent(None, Some(&a), tps), 0.0);
        assert_eq!(process_cpu_usage_percent(Some(&a), Some(&a), tps), 0.0);

        let x = proc_cpu(100, 10, 10, 30.0);
        assert_eq!(process_cpu_usage_percent(Some(&x), Some(&x), tps), 0.0);
    }

    #[test]
    fn test_process_same_uptime_uses_start_time() {
        let tps = TickRate::USER_HZ;
        // Started at 10 s; both samples at 14 s; 200 ticks apart = 2 s of CPU.
        let a = proc_cpu(1000, 100, 0, 14.0);
        let b = proc_cpu(1000, 300, 0, 14.0);
        assert!((process_cpu_usage_percent(Some(&a), Some(&b), tps) - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_lifetime_share() {
        let tps = TickRate::USER_HZ;
        // Started at 10 s, sampled at 30 s, 500 ticks = 5 s of CPU.
        let x = proc_cpu(1000, 300, 200, 30.0);
        assert!((process_lifetime_cpu_percent(&x, tps) - 25.0).abs() < 1e-9);

        let fresh = proc_cpu(1000, 1, 0, 10.0);
        assert_eq!(process_lifetime_cpu_percent(&fresh, tps), 0.0);
    }

    #[test]
    fn test_memory_percent() {
        let dir = tempfile::tempdir().unwrap();
        let fs = KernelFs::new(dir.path(), dir.path());
        let mut p = ProcessInfo::default();
        p.memory.resident_kb = 250;

        std::fs::write(dir.path().join("meminfo"), "MemTotal: 1000 kB\n").unwrap();
        assert!((process_memory_percent(&p, &fs).unwrap() - 25.0).abs() < 1e-9);

        std::fs::write(dir.path().join("meminfo"), "MemTotal: 0 kB\n").unwrap();
        assert_eq!(process_memory_percent(&p, &fs).unwrap(), 0.0);

        std::fs::remove_file(dir.path().join("meminfo")).unwrap();
        assert!(matches!(
            process_memory_percent(&p, &fs),
            Err(ProcError::NotAccessible { .. })
        ));
    }

    fn raw_sample() -> impl Strategy<Value = [u64; 10]> {
        prop::array::uniform10(0u64..1_000_000)
    }

    proptest! {
        #[test]
        fn prop_total_is_field_sum(raw in raw_sample()) {
            let s = CpuStat::from_raw(raw);
            let sum = s.user + s.nice + s.system + s.idle + s.iowait
                + s.irq + s.softirq + s.steal + s.guest + s.guest_nice;
            prop_assert_eq!(s.total, sum);
        }

        #[test]
        fn prop_symmetric(a in raw_sample(), b in raw_sample()) {
            let (a, b) = (CpuStat::from_raw(a), CpuStat::from_raw(b));
            prop_assert_eq!(
                cpu_usage_percent(Some(&a), Some(&b)),
                cpu_usage_percent(Some(&b), Some(&a))
            );
        }

        #[test]
        fn prop_monotonic_pair_in_range(
            base in raw_sample(),
            busy in 1u64..100_000,
            idle in 1u64..100_000,
        ) {
            let earlier = CpuStat::from_raw(base);
            let mut next = base;
            next[2] += busy;
            next[3] += idle;
            let later = CpuStat::from_raw(next);

            prop_assert!(later.total >= earlier.total);
            let pct = cpu_usage_percent(Some(&earlier), Some(&later));
            prop_assert!((0.0..=100.0).contains(&pct));
            let expected = busy as f64 / (busy + idle) as f64 * 100.0;
            prop_assert!((pct - expected).abs() < 1e-6);
        }
    }
}
