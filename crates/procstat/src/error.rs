// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for procfs and sysfs reads.

/// Errors that can occur when reading or parsing kernel accounting files.
#[derive(Debug, thiserror::Error)]
pub enum ProcError {
    /// The file is missing or cannot be read (e.g. permission denied).
    #[error("failed to read {path}: {source}")]
    NotAccessible {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// A record did not match its expected shape: wrong field count, or a
    /// field that should be numeric was not.
    #[error("malformed record in {path}: {detail}")]
    MalformedRecord { path: String, detail: String },

    /// The requested process or record is absent at read time.
    #[error("not found: {what}")]
    NotFound { what: String },

    /// Configuration could not be loaded or resolved.
    #[error("configuration error: {0}")]
    Config(String),
}

impl ProcError {
    /// Shorthand for building a [`ProcError::MalformedRecord`].
    pub(crate) fn malformed(path: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::MalformedRecord {
            path: path.into(),
            detail: detail.into(),
        }
    }

    /// Returns `true` if the error means the target no longer exists.
    ///
    /// Covers both an explicit [`ProcError::NotFound`] and an I/O
    /// `NotFound`, which is what a read against an exited process's
    /// `/proc/<pid>` entry produces.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::NotFound { .. } => true,
            Self::NotAccessible { source, .. } => {
                source.kind() == std::io::ErrorKind::NotFound
            }
            _ => false,
        }
    }
}
