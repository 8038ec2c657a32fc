// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Reader configuration loaded from TOML files or constructed programmatically.
//!
//! # TOML Format
//! ```toml
//! proc_root = "/host/proc"
//! sys_root = "/host/sys"
//! ticks_per_second = 100
//! ```
//!
//! Every key is optional. Omitting `ticks_per_second` means "ask the kernel".

use crate::source::{DEFAULT_PROC_ROOT, DEFAULT_SYS_ROOT};
use crate::{KernelFs, ProcError, TickRate};
use std::path::{Path, PathBuf};

/// Where to read kernel counters from and how to convert ticks.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ProcConfig {
    /// procfs mount point (e.g. a host `/proc` bind-mounted into a container).
    #[serde(default = "default_proc_root")]
    pub proc_root: PathBuf,
    /// sysfs mount point.
    #[serde(default = "default_sys_root")]
    pub sys_root: PathBuf,
    /// Fixed tick rate; `None` queries `sysconf(_SC_CLK_TCK)`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ticks_per_second: Option<u64>,
}

fn default_proc_root() -> PathBuf {
    PathBuf::from(DEFAULT_PROC_ROOT)
}

fn default_sys_root() -> PathBuf {
    PathBuf::from(DEFAULT_SYS_ROOT)
}

impl ProcConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ProcError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ProcError::Config(format!("cannot read config '{}': {e}", path.display()))
        })?;
        Self::from_toml(&content)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ProcError> {
        toml::from_str(toml_str).map_err(|e| ProcError::Config(format!("TOML parse error: {e}")))
    }

    /// Serialises configuration to TOML.
    pub fn to_toml(&self) -> Result<String, ProcError> {
        toml::to_string_pretty(self)
            .map_err(|e| ProcError::Config(format!("TOML serialise error: {e}")))
    }

    /// The filesystem roots readers should use.
    pub fn kernel_fs(&self) -> KernelFs {
        KernelFs::new(&self.proc_root, &self.sys_root)
    }

    /// Resolves the tick rate: the configured value, or the kernel's.
    pub fn resolve_ticks(&self) -> Result<TickRate, ProcError> {
        match self.ticks_per_second {
            Some(n) => TickRate::new(n),
            None => TickRate::from_system(),
        }
    }
}

impl Default for ProcConfig {
    fn default() -> Self {
        Self {
            proc_root: default_proc_root(),
            sys_root: default_sys_root(),
            ticks_per_second: None,
        }
    }
}
