// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Kernel clock-tick rate (`USER_HZ`).
//!
//! Every CPU time counter in `/proc/stat` and `/proc/<pid>/stat` is expressed
//! in clock ticks. Converting those counters to seconds requires the number
//! of ticks per second, which the kernel exposes via `sysconf(_SC_CLK_TCK)`.
//!
//! The rate is queried once and then passed explicitly to whatever needs it,
//! so tests can run with a fixed rate and never touch the host.

use crate::ProcError;

/// Number of kernel clock ticks per wall-clock second.
///
/// Always non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
pub struct TickRate(u64);

impl TickRate {
    /// The rate used by virtually every Linux build (`CONFIG_HZ` aside,
    /// `USER_HZ` is fixed at 100 on all mainstream architectures).
    pub const USER_HZ: TickRate = TickRate(100);

    /// Creates a tick rate from an explicit value.
    pub fn new(ticks_per_second: u64) -> Result<Self, ProcError> {
        if ticks_per_second == 0 {
            return Err(ProcError::Config(
                "ticks_per_second must be greater than zero".to_string(),
            ));
        }
        Ok(Self(ticks_per_second))
    }

    /// Queries the running kernel via `sysconf(_SC_CLK_TCK)`.
    pub fn from_system() -> Result<Self, ProcError> {
        use nix::unistd::{sysconf, SysconfVar};

        match sysconf(SysconfVar::CLK_TCK) {
            Ok(Some(hz)) if hz > 0 => {
                tracing::debug!("sysconf(_SC_CLK_TCK) = {hz}");
                Ok(Self(hz as u64))
            }
            Ok(other) => Err(ProcError::Config(format!(
                "sysconf(_SC_CLK_TCK) returned an unusable value: {other:?}"
            ))),
            Err(errno) => Err(ProcError::Config(format!(
                "sysconf(_SC_CLK_TCK) failed: {errno}"
            ))),
        }
    }

    /// Ticks per second as an integer.
    pub fn per_second(self) -> u64 {
        self.0
    }

    /// Converts a tick count to seconds.
    pub fn ticks_to_secs(self, ticks: u64) -> f64 {
        ticks as f64 / self.0 as f64
    }
}

impl Default for TickRate {
    fn default() -> Self {
        Self::USER_HZ
    }
}

impl std::fmt::Display for TickRate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} Hz", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_rejected() {
        assert!(matches!(TickRate::new(0), Err(ProcError::Config(_))));
    }

    #[test]
    fn test_ticks_to_secs() {
        let rate = TickRate::new(250).unwrap();
        assert!((rate.ticks_to_secs(500) - 2.0).abs() < 1e-9);
        assert!((TickRate::USER_HZ.ticks_to_secs(1) - 0.01).abs() < 1e-9);
    }

    #[test]
    fn test_from_system() {
        if std::path::Path::new("/proc/self/stat").exists() {
            let rate = TickRate::from_system().unwrap();
            assert!(rate.per_second() > 0);
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(TickRate::USER_HZ.to_string(), "100 Hz");
    }
}
