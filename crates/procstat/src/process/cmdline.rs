// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `/proc/<pid>/cmdline`: NUL-separated argv.
//!
//! NULs are treated as whitespace, so an argument that itself contains a
//! space is split in two. Kernel threads and zombies have an empty file.

/// Splits a raw cmdline blob into `(path, arguments)`.
///
/// Returns `None` if the blob holds no fields.
pub(crate) fn parse_cmdline(raw: &[u8]) -> Option<(String, Vec<String>)> {
    let text = String::from_utf8_lossy(raw).replace('\0', " ");
    let mut fields = text.split_whitespace().map(str::to_string);
    let path = fields.next()?;
    Some((path, fields.collect()))
}
