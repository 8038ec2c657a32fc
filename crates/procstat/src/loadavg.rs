// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Load averages from `/proc/loadavg`.
//!
//! Format: `"0.35 0.28 0.22 1/234 5678"`: 1/5/15-minute averages,
//! runnable/total scheduling entities, and the most recently created pid.

use crate::source::parse_field;
use crate::{KernelFs, ProcError};
use std::path::Path;

/// Scheduler run-queue averages and task counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, serde::Serialize)]
pub struct LoadAverage {
    pub avg1: f64,
    pub avg5: f64,
    pub avg15: f64,
    /// Currently runnable tasks.
    pub active_tasks: u64,
    /// Tasks that exist in the system.
    pub total_tasks: u64,
    pub last_pid: u64,
}

impl LoadAverage {
    /// Parses `/proc/loadavg` content.
    pub fn parse(content: &str, source_path: &Path) -> Result<Self, ProcError> {
        let fields: Vec<&str> = content.split_whitespace().collect();
        let [avg1, avg5, avg15, tasks, last_pid] = fields.as_slice() else {
            return Err(ProcError::malformed(
                source_path.display().to_string(),
                format!("expected 5 fields, got {}", fields.len()),
            ));
        };

        let Some((active, total)) = tasks.split_once('/') else {
            return Err(ProcError::malformed(
                source_path.display().to_string(),
                format!("expected 'active/total' task ratio, got '{tasks}'"),
            ));
        };

        Ok(Self {
            avg1: parse_field(avg1, source_path, "load average")?,
            avg5: parse_field(avg5, source_path, "load average")?,
            avg15: parse_field(avg15, source_path, "load average")?,
            active_tasks: parse_field(active, source_path, "active task count")?,
            total_tasks: parse_field(total, source_path, "total task count")?,
            last_pid: parse_field(last_pid, source_path, "last pid")?,
        })
    }
}

/// Reads `<proc>/loadavg`.
pub fn read_load_average(fs: &KernelFs) -> Result<LoadAverage, ProcError> {
    let path = fs.proc_path("loadavg");
    let content = fs.read_single_value(&path)?;
    LoadAverage::parse(&content, &path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path() -> &'static Path {
        Path::new("/proc/loadavg")
    }

    #[test]
    fn test_parse_loadavg() {
        let load = LoadAverage::parse("0.35 0.28 0.22 1/234 5678\n", path()).unwrap();
        assert!((load.avg1 - 0.35).abs() < 1e-9);
        assert!((load.avg15 - 0.22).abs() < 1e-9);
        assert_eq!(load.active_tasks, 1);
        assert_eq!(load.total_tasks, 234);
        assert_eq!(load.last_pid, 5678);
    }

    #[test]
    fn test_bad_task_ratio() {
        assert!(matches!(
            LoadAverage::parse("0.35 0.28 0.22 1-234 5678", path()),
            Err(ProcError::MalformedRecord { .. })
        ));
    }

    #[test]
    fn test_wrong_field_count() {
        assert!(matches!(
            LoadAverage::parse("0.35 0.28 0.22", path()),
            Err(ProcError::MalformedRecord { .. })
        ));
    }
}
