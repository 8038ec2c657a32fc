// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `/proc/<pid>/stat`: scheduler counters by fixed position.
//!
//! Field 2 (`comm`) is wrapped in parentheses and may itself contain spaces
//! or `)`, so the line is split at the *last* `)` before tokenizing. After
//! that, positions line up with `proc(5)` and are resolved through
//! [`PID_STAT_V1`].

use crate::schema::{PidStatField, PID_STAT_V1};
use crate::ProcError;
use std::path::Path;

/// Raw tick counters as the kernel reports them, guest time still included
/// in `utime`/`cutime`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProcessTicks {
    /// Start time after boot, in ticks.
    pub start: u64,
    pub utime: u64,
    pub stime: u64,
    pub cutime: u64,
    pub cstime: u64,
    pub guest: u64,
    pub cguest: u64,
}

/// Cumulative CPU counters for one process and its reaped children.
#[derive(Debug, Clone, Copy, Default, PartialEq, serde::Serialize)]
pub struct ProcessCpuStat {
    /// Process start, in ticks since boot.
    pub start_ticks: u64,
    /// User-mode ticks, excluding guest time.
    pub user_ticks: u64,
    pub system_ticks: u64,
    pub guest_ticks: u64,
    /// Reaped children's user-mode ticks, excluding their guest time.
    pub children_user: u64,
    pub children_system: u64,
    pub children_guest: u64,
    /// Sum of the six CPU components.
    pub total: u64,
    /// System uptime (seconds since boot) when the sample was taken.
    pub uptime_secs: f64,
}

impl ProcessTicks {
    /// Sum of the six CPU components with guest time counted once, or
    /// `None` if it overflows `u64`.
    fn cpu_total(&self) -> Option<u64> {
        [
            self.utime.saturating_sub(self.guest),
            self.stime,
            self.cutime.saturating_sub(self.cguest),
            self.cstime,
            self.guest,
            self.cguest,
        ]
        .into_iter()
        .try_fold(0u64, u64::checked_add)
    }
}

impl ProcessCpuStat {
    /// Builds a sample from raw counters, removing the guest overlap once.
    /// A `total` that would overflow saturates at `u64::MAX`.
    pub fn from_ticks(ticks: ProcessTicks, uptime_secs: f64) -> Self {
        Self {
            start_ticks: ticks.start,
            user_ticks: ticks.utime.saturating_sub(ticks.guest),
            system_ticks: ticks.stime,
            guest_ticks: ticks.guest,
            children_user: ticks.cutime.saturating_sub(ticks.cguest),
            children_system: ticks.cstime,
            children_guest: ticks.cguest,
            total: ticks.cpu_total().unwrap_or(u64::MAX),
            uptime_secs,
        }
    }
}

/// Non-CPU fields taken from the stat line, plus the raw ticks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct StatRecord {
    pub tty: u64,
    pub priority: i64,
    pub nice: i64,
    pub ticks: ProcessTicks,
}

/// Splits a stat line into positional tokens, keeping `comm` as one token.
fn tokenize(line: &str) -> Vec<&str> {
    let line = line.trim();
    match (line.find('('), line.rfind(')')) {
        (Some(open), Some(close)) if open < close => {
            let mut tokens: Vec<&str> = line[..open].split_whitespace().collect();
            tokens.push(&line[open..=close]);
            tokens.extend(line[close + 1..].split_whitespace());
            tokens
        }
        _ => line.split_whitespace().collect(),
    }
}

/// Parses the single stat line.
pub(crate) fn parse_stat(content: &str, source_path: &Path) -> Result<StatRecord, ProcError> {
    let tokens = tokenize(content);
    let mut rec = StatRecord::default();

    for (field, value) in PID_STAT_V1.extract(&tokens, source_path)? {
        match field {
            PidStatField::TtyNr => rec.tty = value.as_u64(),
            PidStatField::Utime => rec.ticks.utime = value.as_u64(),
            PidStatField::Stime => rec.ticks.stime = value.as_u64(),
            PidStatField::Cutime => rec.ticks.cutime = value.as_u64(),
            PidStatField::Cstime => rec.ticks.cstime = value.as_u64(),
            PidStatField::Priority => rec.priority = value.as_i64(),
            PidStatField::Nice => rec.nice = value.as_i64(),
            PidStatField::StartTime => rec.ticks.start = value.as_u64(),
            PidStatField::GuestTime => rec.ticks.guest = value.as_u64(),
            PidStatField::CguestTime => rec.ticks.cguest = value.as_u64(),
        }
    }

    if rec.ticks.cpu_total().is_none() {
        return Err(ProcError::malformed(
            source_path.display().to_string(),
            "process tick counters overflow u64",
        ));
    }

    Ok(rec)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// A 52-field stat line for pid 4242 with the given CPU counters.
    pub(crate) fn stat_line(comm: &str, utime: u64, stime: u64, start: u64, guest: u64) -> String {
        format!(
            "4242 ({comm}) S 4000 4242 4242 34816 4242 4194304 1000 0 0 0 \
             {utime} {stime} 20 10 20 0 1 0 {start} 225280000 1280 18446744073709551615 \
             1 1 0 0 0 0 65536 3686404 1266761467 0 0 0 17 2 0 0 0 {guest} 4 \
             0 0 0 0 0 0 0 0"
        )
    }

    #[test]
    fn test_parse_stat_positions() {
        let rec = parse_stat(&stat_line("bash", 500, 120, 9000, 30), Path::new("/proc/4242/stat")).unwrap();
        assert_eq!(rec.tty, 34816);
        assert_eq!(rec.ticks.utime, 500);
        assert_eq!(rec.ticks.stime, 120);
        assert_eq!(rec.ticks.cutime, 20);
        assert_eq!(rec.ticks.cstime, 10);
        assert_eq!(rec.priority, 20);
        assert_eq!(rec.nice, 0);
        assert_eq!(rec.ticks.start, 9000);
        assert_eq!(rec.ticks.guest, 30);
        assert_eq!(rec.ticks.cguest, 4);
    }

    #[test]
    fn test_comm_with_spaces_and_parens() {
        let rec = parse_stat(
            &stat_line("evil ) name (x", 7, 3, 100, 0),
            Path::new("/proc/4242/stat"),
        )
        .unwrap();
        assert_eq!(rec.ticks.utime, 7);
        assert_eq!(rec.ticks.start, 100);
    }

    #[test]
    fn test_negative_nice() {
        let line = stat_line("rt", 1, 1, 1, 0).replace(" 20 0 1 0 ", " 0 -20 1 0 ");
        let rec = parse_stat(&line, Path::new("/proc/4242/stat")).unwrap();
        assert_eq!(rec.priority, 0);
        assert_eq!(rec.nice, -20);
    }

    #[test]
    fn test_short_record_rejected() {
        let err = parse_stat("4242 (bash) S 4000 4242", Path::new("/proc/4242/stat")).unwrap_err();
        assert!(matches!(err, ProcError::MalformedRecord { .. }));
    }

    #[test]
    fn test_non_numeric_tick_field_rejected() {
        let line = stat_line("bash", 500, 120, 9000, 30).replace(" 500 120 ", " x 120 ");
        let err = parse_stat(&line, Path::new("/proc/4242/stat")).unwrap_err();
        assert!(matches!(err, ProcError::MalformedRecord { .. }));
    }

    #[test]
    fn test_overflowing_ticks_rejected() {
        let line = stat_line("bash", u64::MAX, u64::MAX, 9000, 0);
        let err = parse_stat(&line, Path::new("/proc/4242/stat")).unwrap_err();
        assert!(matches!(err, ProcError::MalformedRecord { .. }));
    }

    #[test]
    fn test_from_ticks_saturates_total() {
        let cpu = ProcessCpuStat::from_ticks(
            ProcessTicks {
                utime: u64::MAX,
                stime: u64::MAX,
                ..ProcessTicks::default()
            },
            1.0,
        );
        assert_eq!(cpu.total, u64::MAX);
    }

    #[test]
    fn test_guest_subtracted_once() {
        let cpu = ProcessCpuStat::from_ticks(
            ProcessTicks {
                start: 10,
                utime: 100,
                stime: 40,
                cutime: 30,
                cstime: 5,
                guest: 25,
                cguest: 10,
            },
            12.5,
        );
        assert_eq!(cpu.user_ticks, 75);
        assert_eq!(cpu.children_user, 20);
        assert_eq!(cpu.total, 75 + 40 + 20 + 5 + 25 + 10);
        assert!((cpu.uptime_secs - 12.5).abs() < 1e-9);
    }
}
