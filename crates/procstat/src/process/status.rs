// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `/proc/<pid>/status`: identity fields and memory region sizes.
//!
//! ```text
//! Name:   bash
//! State:  S (sleeping)
//! Tgid:   4242
//! PPid:   4000
//! Uid:    1000    1000    1000    1000
//! Gid:    1000    1000    1000    1000
//! FDSize: 256
//! Groups: 4 24 27 1000
//! VmRSS:      5120 kB
//! Threads:    1
//! ```

use crate::source::parse_field;
use crate::ProcError;
use std::path::Path;

/// Instantaneous memory-region sizes of one process, in kibibytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct ProcessMemoryStat {
    /// `VmSize`.
    pub virtual_kb: u64,
    /// `VmPeak`.
    pub peak_virtual_kb: u64,
    /// `VmRSS`.
    pub resident_kb: u64,
    /// `VmHWM`.
    pub peak_resident_kb: u64,
    /// `VmLck`.
    pub locked_kb: u64,
    /// `VmData`.
    pub data_kb: u64,
    /// `VmStk`.
    pub stack_kb: u64,
    /// `VmExe`.
    pub text_kb: u64,
    /// `VmLib`.
    pub shared_kb: u64,
}

/// Everything taken from one status read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct StatusRecord {
    pub name: String,
    pub tgid: Option<u64>,
    pub ppid: u64,
    pub state: String,
    pub thread_count: u64,
    pub fd_count: u64,
    pub uid: u64,
    pub gid: u64,
    pub groups: Vec<u64>,
    pub memory: ProcessMemoryStat,
}

/// Parses status content. Lines with no value are skipped; a selected key
/// with a non-numeric value rejects the record.
pub(crate) fn parse_status(content: &str, source_path: &Path) -> Result<StatusRecord, ProcError> {
    let mut rec = StatusRecord::default();
    let num = |value: &str, what: &str| -> Result<u64, ProcError> { parse_field(value, source_path, what) };

    for line in content.lines() {
        let Some((key, rest)) = line.split_once(':') else {
            continue;
        };
        let rest = rest.trim();
        let Some(first) = rest.split_whitespace().next() else {
            continue;
        };

        match key.trim().to_lowercase().as_str() {
            "name" => rec.name = strip_parens(rest).to_string(),
            "tgid" => rec.tgid = Some(num(first, "Tgid")?),
            "ppid" => rec.ppid = num(first, "PPid")?,
            "state" => rec.state = first.to_string(),
            "threads" => rec.thread_count = num(first, "Threads")?,
            "fdsize" => rec.fd_count = num(first, "FDSize")?,
            "uid" => rec.uid = num(first, "Uid")?,
            "gid" => rec.gid = num(first, "Gid")?,
            "groups" => {
                rec.groups = rest
                    .split_whitespace()
                    .map(|g| num(g, "Groups"))
                    .collect::<Result<_, _>>()?;
            }
            "vmpeak" => rec.memory.peak_virtual_kb = num(first, "VmPeak")?,
            "vmsize" => rec.memory.virtual_kb = num(first, "VmSize")?,
            "vmlck" => rec.memory.locked_kb = num(first, "VmLck")?,
            "vmhwm" => rec.memory.peak_resident_kb = num(first, "VmHWM")?,
            "vmrss" => rec.memory.resident_kb = num(first, "VmRSS")?,
            "vmdata" => rec.memory.data_kb = num(first, "VmData")?,
            "vmstk" => rec.memory.stack_kb = num(first, "VmStk")?,
            "vmexe" => rec.memory.text_kb = num(first, "VmExe")?,
            "vmlib" => rec.memory.shared_kb = num(first, "VmLib")?,
            _ => {}
        }
    }

    Ok(rec)
}

fn strip_parens(name: &str) -> &str {
    name.strip_prefix('(')
        .and_then(|n| n.strip_suffix(')'))
        .unwrap_or(name)
}
