// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Seconds since boot, from `/proc/uptime`.
//!
//! Process CPU samples use this as their clock: `starttime` in
//! `/proc/<pid>/stat` is measured from boot too, so both sides of every
//! elapsed-time computation share one origin.

use crate::source::parse_field;
use crate::{KernelFs, ProcError};
use std::path::Path;

/// Parses `/proc/uptime` content: `"<uptime> <idle>"`.
pub fn parse_uptime(content: &str, source_path: &Path) -> Result<f64, ProcError> {
    let fields: Vec<&str> = content.split_whitespace().collect();
    let [uptime, _idle] = fields.as_slice() else {
        return Err(ProcError::malformed(
            source_path.display().to_string(),
            format!("expected 2 fields, got {}", fields.len()),
        ));
    };
    parse_field(uptime, source_path, "uptime seconds")
}

/// Reads the current system uptime in seconds.
pub fn read_uptime(fs: &KernelFs) -> Result<f64, ProcError> {
    let path = fs.proc_path("uptime");
    let content = fs.read_single_value(&path)?;
    parse_uptime(&content, &path)
}
