// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Location of the kernel's virtual filesystems.
//!
//! Every reader in this crate takes a [`KernelFs`] instead of hard-coding
//! `/proc` and `/sys`, so the same parsing code runs against the live host
//! or against a fixture tree on disk.

use crate::ProcError;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Default mount point of procfs.
pub const DEFAULT_PROC_ROOT: &str = "/proc";

/// Default mount point of sysfs.
pub const DEFAULT_SYS_ROOT: &str = "/sys";

/// Roots of the proc and sys trees that readers resolve paths against.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct KernelFs {
    proc_root: PathBuf,
    sys_root: PathBuf,
}

impl KernelFs {
    /// Creates a source rooted at arbitrary directories.
    pub fn new(proc_root: impl Into<PathBuf>, sys_root: impl Into<PathBuf>) -> Self {
        Self {
            proc_root: proc_root.into(),
            sys_root: sys_root.into(),
        }
    }

    /// The live host: `/proc` and `/sys`.
    pub fn host() -> Self {
        Self::new(DEFAULT_PROC_ROOT, DEFAULT_SYS_ROOT)
    }

    pub fn proc_root(&self) -> &Path {
        &self.proc_root
    }

    pub fn sys_root(&self) -> &Path {
        &self.sys_root
    }

    /// Resolves a path relative to the proc root (e.g. `"meminfo"`).
    pub fn proc_path(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.proc_root.join(relative)
    }

    /// Resolves a path relative to the sys root.
    pub fn sys_path(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.sys_root.join(relative)
    }

    /// Resolves `<proc>/<pid>/<file>`.
    pub fn pid_path(&self, pid: u64, file: &str) -> PathBuf {
        self.proc_root.join(pid.to_string()).join(file)
    }

    /// Reads a whole file as UTF-8 text.
    ///
    /// The file handle is scoped to this call.
    pub(crate) fn read_to_string(&self, path: &Path) -> Result<String, ProcError> {
        std::fs::read_to_string(path).map_err(|e| not_accessible(path, e))
    }

    /// Reads a whole file as raw bytes.
    pub(crate) fn read_bytes(&self, path: &Path) -> Result<Vec<u8>, ProcError> {
        std::fs::read(path).map_err(|e| not_accessible(path, e))
    }

    /// Reads a file that holds a single value and returns it trimmed.
    pub(crate) fn read_single_value(&self, path: &Path) -> Result<String, ProcError> {
        self.read_to_string(path).map(|s| s.trim().to_string())
    }
}

impl Default for KernelFs {
    fn default() -> Self {
        Self::host()
    }
}

fn not_accessible(path: &Path, source: std::io::Error) -> ProcError {
    ProcError::NotAccessible {
        path: path.display().to_string(),
        source,
    }
}

/// Parses one numeric field, mapping failure to [`ProcError::MalformedRecord`].
pub(crate) fn parse_field<T: FromStr>(value: &str, path: &Path, what: &str) -> Result<T, ProcError> {
    value.parse::<T>().map_err(|_| {
        ProcError::malformed(
            path.display().to_string(),
            format!("expected numeric {what}, got '{value}'"),
        )
    })
}
