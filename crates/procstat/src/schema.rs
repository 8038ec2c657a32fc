// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Positional schemas for fixed-layout kernel records.
//!
//! `/proc/stat` CPU lines and `/proc/<pid>/stat` carry their meaning purely
//! by field position. Instead of indexing token slices inline, each layout
//! is described once as a [`RecordSchema`]: a named, versioned table of
//! `(position → field, parser)` entries. If a kernel release moves a field,
//! a new table is added here and the readers stay unchanged.
//!
//! Positions are 1-indexed, matching `proc(5)`.

use crate::source::parse_field;
use crate::ProcError;
use std::path::Path;

/// How a positional token is parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldParser {
    /// Decimal `u64`.
    Unsigned,
    /// Decimal `i64` (priority and niceness can be negative).
    Signed,
}

/// A parsed positional value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldValue {
    Unsigned(u64),
    Signed(i64),
}

impl FieldValue {
    /// The value as `u64`; signed values below zero clamp to 0.
    pub fn as_u64(self) -> u64 {
        match self {
            Self::Unsigned(v) => v,
            Self::Signed(v) => v.max(0) as u64,
        }
    }

    /// The value as `i64`; unsigned values above `i64::MAX` clamp.
    pub fn as_i64(self) -> i64 {
        match self {
            Self::Unsigned(v) => i64::try_from(v).unwrap_or(i64::MAX),
            Self::Signed(v) => v,
        }
    }
}

/// One entry of a schema table.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec<F> {
    /// 1-indexed position in the record.
    pub position: usize,
    pub field: F,
    pub parser: FieldParser,
}

const fn unsigned<F>(position: usize, field: F) -> FieldSpec<F> {
    FieldSpec {
        position,
        field,
        parser: FieldParser::Unsigned,
    }
}

const fn signed<F>(position: usize, field: F) -> FieldSpec<F> {
    FieldSpec {
        position,
        field,
        parser: FieldParser::Signed,
    }
}

/// Accepted token count for a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Exact(usize),
    AtLeast(usize),
}

impl Arity {
    fn accepts(self, count: usize) -> bool {
        match self {
            Self::Exact(n) => count == n,
            Self::AtLeast(n) => count >= n,
        }
    }
}

impl std::fmt::Display for Arity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Exact(n) => write!(f, "exactly {n}"),
            Self::AtLeast(n) => write!(f, "at least {n}"),
        }
    }
}

/// A named, versioned positional layout.
#[derive(Debug)]
pub struct RecordSchema<F: 'static> {
    pub name: &'static str,
    pub version: u32,
    pub arity: Arity,
    pub fields: &'static [FieldSpec<F>],
}

impl<F: Copy> RecordSchema<F> {
    /// Validates the token count, then parses every field in table order.
    ///
    /// Either every field parses or the whole record is rejected.
    pub fn extract(&self, tokens: &[&str], path: &Path) -> Result<Vec<(F, FieldValue)>, ProcError> {
        if !self.arity.accepts(tokens.len()) {
            return Err(ProcError::malformed(
                path.display().to_string(),
                format!(
                    "{} v{}: expected {} fields, got {}",
                    self.name,
                    self.version,
                    self.arity,
                    tokens.len()
                ),
            ));
        }

        self.fields
            .iter()
            .map(|spec| {
                // Arity is validated above and every table keeps its
                // positions within its own minimum.
                let token = tokens.get(spec.position - 1).copied().unwrap_or_default();
                let value = match spec.parser {
                    FieldParser::Unsigned => FieldValue::Unsigned(parse_field(token, path, self.name)?),
                    FieldParser::Signed => FieldValue::Signed(parse_field(token, path, self.name)?),
                };
                Ok((spec.field, value))
            })
            .collect()
    }
}

/// Tick columns of a `/proc/stat` `cpu` line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CpuField {
    User,
    Nice,
    System,
    Idle,
    Iowait,
    Irq,
    Softirq,
    Steal,
    Guest,
    GuestNice,
}

/// `cpuN user nice system idle iowait irq softirq steal guest guest_nice`
/// (Linux ≥ 2.6.33). Position 1 is the label.
pub static CPU_STAT_V1: RecordSchema<CpuField> = RecordSchema {
    name: "cpu stat",
    version: 1,
    arity: Arity::Exact(11),
    fields: &[
        unsigned(2, CpuField::User),
        unsigned(3, CpuField::Nice),
        unsigned(4, CpuField::System),
        unsigned(5, CpuField::Idle),
        unsigned(6, CpuField::Iowait),
        unsigned(7, CpuField::Irq),
        unsigned(8, CpuField::Softirq),
        unsigned(9, CpuField::Steal),
        unsigned(10, CpuField::Guest),
        unsigned(11, CpuField::GuestNice),
    ],
};

/// Fields taken from `/proc/<pid>/stat`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PidStatField {
    TtyNr,
    Utime,
    Stime,
    Cutime,
    Cstime,
    Priority,
    Nice,
    StartTime,
    GuestTime,
    CguestTime,
}

/// `/proc/<pid>/stat` as documented in `proc(5)`; `guest_time` and
/// `cguest_time` (43, 44) exist since Linux 2.6.24.
pub static PID_STAT_V1: RecordSchema<PidStatField> = RecordSchema {
    name: "pid stat",
    version: 1,
    arity: Arity::AtLeast(44),
    fields: &[
        unsigned(7, PidStatField::TtyNr),
        unsigned(14, PidStatField::Utime),
        unsigned(15, PidStatField::Stime),
        unsigned(16, PidStatField::Cutime),
        unsigned(17, PidStatField::Cstime),
        signed(18, PidStatField::Priority),
        signed(19, PidStatField::Nice),
        unsigned(22, PidStatField::StartTime),
        unsigned(43, PidStatField::GuestTime),
        unsigned(44, PidStatField::CguestTime),
    ],
};
