// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Per-process accounting.
//!
//! A [`ProcessInfo`] merges three procfs records:
//!
//! ```text
//! /proc/<pid>/status   identity + memory sizes     (mandatory)
//! /proc/<pid>/stat     tick counters, tty, nice    (mandatory)
//! /proc/<pid>/cmdline  executable path + argv      (optional)
//! ```
//!
//! Kernel threads have an empty cmdline and some processes hide theirs, so
//! a cmdline failure only leaves `path`/`arguments` empty.

mod cmdline;
mod stat;
mod status;

pub use stat::{ProcessCpuStat, ProcessTicks};
pub use status::ProcessMemoryStat;

use crate::uptime::read_uptime;
use crate::{usage, KernelFs, ProcError, TickRate};
use stat::{parse_stat, StatRecord};
use status::{parse_status, StatusRecord};

/// Identity and accounting for one process.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
pub struct ProcessInfo {
    /// Thread-group id (`Tgid`).
    pub pid: u64,
    pub ppid: u64,
    pub name: String,
    /// Executable path (`argv[0]`); empty if the cmdline was unavailable.
    pub path: String,
    pub arguments: Vec<String>,
    /// Single-letter state code (`R`, `S`, `D`, `Z`, ...).
    pub state: String,
    pub uid: u64,
    pub gid: u64,
    /// Supplementary group ids.
    pub groups: Vec<u64>,
    /// Controlling terminal device number.
    pub tty: u64,
    pub thread_count: u64,
    pub priority: i64,
    pub nice: i64,
    /// Size of the file-descriptor table (`FDSize`).
    pub fd_count: u64,
    pub cpu: ProcessCpuStat,
    pub memory: ProcessMemoryStat,
}

impl ProcessInfo {
    /// Re-reads status and stat, replacing the counters in place.
    ///
    /// The cmdline is not re-read. On error `self` is left unchanged.
    pub fn update(&mut self, fs: &KernelFs) -> Result<(), ProcError> {
        let accounting = read_accounting(fs, self.pid)?;
        self.apply(accounting);
        Ok(())
    }

    /// CPU share over the process's whole lifetime, in percent.
    pub fn lifetime_cpu_percent(&self, ticks: TickRate) -> f64 {
        usage::process_lifetime_cpu_percent(&self.cpu, ticks)
    }

    /// Resident memory as a percentage of system memory.
    ///
    /// Reads `<proc>/meminfo` on every call.
    pub fn memory_percent(&self, fs: &KernelFs) -> Result<f64, ProcError> {
        usage::process_memory_percent(self, fs)
    }

    fn apply(&mut self, accounting: Accounting) {
        let Accounting { status, stat, cpu } = accounting;

        if let Some(tgid) = status.tgid {
            self.pid = tgid;
        }
        self.ppid = status.ppid;
        self.name = status.name;
        self.state = status.state;
        self.uid = status.uid;
        self.gid = status.gid;
        self.groups = status.groups;
        self.thread_count = status.thread_count;
        self.fd_count = status.fd_count;
        self.memory = status.memory;

        self.tty = stat.tty;
        self.priority = stat.priority;
        self.nice = stat.nice;
        self.cpu = cpu;
    }
}

/// The two mandatory records of one read.
struct Accounting {
    status: StatusRecord,
    stat: StatRecord,
    cpu: ProcessCpuStat,
}

fn read_accounting(fs: &KernelFs, pid: u64) -> Result<Accounting, ProcError> {
    let status_path = fs.pid_path(pid, "status");
    let content = fs
        .read_to_string(&status_path)
        .map_err(|e| process_gone(pid, e))?;
    let status = parse_status(&content, &status_path)?;

    let stat_path = fs.pid_path(pid, "stat");
    let content = fs
        .read_to_string(&stat_path)
        .map_err(|e| process_gone(pid, e))?;
    let stat = parse_stat(&content, &stat_path)?;

    let uptime_secs = read_uptime(fs)?;
    let cpu = ProcessCpuStat::from_ticks(stat.ticks, uptime_secs);

    Ok(Accounting { status, stat, cpu })
}

fn process_gone(pid: u64, err: ProcError) -> ProcError {
    if err.is_not_found() {
        ProcError::NotFound {
            what: format!("process {pid}"),
        }
    } else {
        err
    }
}

/// Reads one process by id.
pub fn read_process(fs: &KernelFs, pid: u64) -> Result<ProcessInfo, ProcError> {
    let mut info = ProcessInfo {
        pid,
        ..Default::default()
    };
    info.apply(read_accounting(fs, pid)?);

    let cmdline_path = fs.pid_path(pid, "cmdline");
    match fs.read_bytes(&cmdline_path) {
        Ok(raw) => {
            if let Some((path, arguments)) = cmdline::parse_cmdline(&raw) {
                info.path = path;
                info.arguments = arguments;
            }
        }
        Err(e) => tracing::trace!("pid {pid}: no cmdline: {e}"),
    }

    Ok(info)
}

/// Reads every live process under `<proc>`, sorted by pid.
///
/// Processes that exit mid-scan, or whose records cannot be read, are
/// skipped. Only failing to list `<proc>` itself is an error.
pub fn list_processes(fs: &KernelFs) -> Result<Vec<ProcessInfo>, ProcError> {
    let root = fs.proc_root();
    let entries = std::fs::read_dir(root).map_err(|e| ProcError::NotAccessible {
        path: root.display().to_string(),
        source: e,
    })?;

    let mut processes: Vec<ProcessInfo> = entries
        .filter_map(|e| e.ok())
        .filter_map(|e| {
            let name = e.file_name();
            let name = name.to_str()?;
            if !name.starts_with(|c: char| c.is_ascii_digit()) {
                return None;
            }
            name.parse::<u64>().ok()
        })
        .filter_map(|pid| match read_process(fs, pid) {
            Ok(info) => Some(info),
            Err(e) => {
                tracing::debug!("skipping pid {pid}: {e}");
                None
            }
        })
        .collect();

    processes.sort_by_key(|p| p.pid);
    tracing::debug!("listed {} processes", processes.len());
    Ok(processes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn fixture(dir: &Path, pid: u64, status: &str, stat: &str, cmdline: Option<&[u8]>) {
        let pid_dir = dir.join(pid.to_string());
        std::fs::create_dir_all(&pid_dir).unwrap();
        std::fs::write(pid_dir.join("status"), status).unwrap();
        std::fs::write(pid_dir.join("stat"), stat).unwrap();
        if let Some(raw) = cmdline {
            std::fs::write(pid_dir.join("cmdline"), raw).unwrap();
        }
    }

    fn status_for(pid: u64, name: &str, rss_kb: u64) -> String {
        format!(
            "Name:\t{name}\nState:\tS (sleeping)\nTgid:\t{pid}\nPPid:\t1\n\
             Uid:\t1000\t1000\t1000\t1000\nGid:\t1000\t1000\t1000\t1000\n\
             FDSize:\t64\nGroups:\t1000\nVmRSS:\t{rss_kb} kB\nThreads:\t2\n"
        )
    }

    fn proc_tree() -> (tempfile::TempDir, KernelFs) {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("uptime"), "1000.00 3000.00\n").unwrap();
        std::fs::write(dir.path().join("meminfo"), "MemTotal: 10240 kB\nMemFree: 0 kB\n").unwrap();
        let fs = KernelFs::new(dir.path(), dir.path());
        (dir, fs)
    }

    #[test]
    fn test_read_process_merges_records() {
        let (dir, fs) = proc_tree();
        fixture(
            dir.path(),
            4242,
            &status_for(4242, "bash", 5120),
            &stat::tests::stat_line("bash", 500, 120, 9000, 30),
            Some(b"/bin/bash\0--login\0"),
        );

        let info = read_process(&fs, 4242).unwrap();
        assert_eq!(info.pid, 4242);
        assert_eq!(info.ppid, 1);
        assert_eq!(info.name, "bash");
        assert_eq!(info.path, "/bin/bash");
        assert_eq!(info.arguments, vec!["--login"]);
        assert_eq!(info.thread_count, 2);
        assert_eq!(info.tty, 34816);
        assert_eq!(info.memory.resident_kb, 5120);
        assert_eq!(info.cpu.user_ticks, 470);
        assert!((info.cpu.uptime_secs - 1000.0).abs() < 1e-9);
    }

    #[test]
    fn test_missing_cmdline_tolerated() {
        let (dir, fs) = proc_tree();
        fixture(
            dir.path(),
            7,
            &status_for(7, "kthreadd", 0),
            &stat::tests::stat_line("kthreadd", 0, 3, 1, 0),
            None,
        );
        let info = read_process(&fs, 7).unwrap();
        assert!(info.path.is_empty());
        assert!(info.arguments.is_empty());
    }

    #[test]
    fn test_missing_process_is_not_found() {
        let (_dir, fs) = proc_tree();
        assert!(matches!(read_process(&fs, 99), Err(ProcError::NotFound { .. })));
    }

    #[test]
    fn test_malformed_stat_aborts_read() {
        let (dir, fs) = proc_tree();
        fixture(dir.path(), 8, &status_for(8, "x", 1), "8 (x) S 1 2 3", None);
        assert!(matches!(
            read_process(&fs, 8),
            Err(ProcError::MalformedRecord { .. })
        ));
    }

    #[test]
    fn test_update_refreshes_counters_not_cmdline() {
        let (dir, fs) = proc_tree();
        fixture(
            dir.path(),
            4242,
            &status_for(4242, "bash", 5120),
            &stat::tests::stat_line("bash", 500, 120, 9000, 0),
            Some(b"/bin/bash\0"),
        );
        let mut info = read_process(&fs, 4242).unwrap();

        fixture(
            dir.path(),
            4242,
            &status_for(4242, "bash", 8192),
            &stat::tests::stat_line("bash", 800, 150, 9000, 0),
            Some(b"/bin/zsh\0"),
        );
        std::fs::write(dir.path().join("uptime"), "1010.00 3000.00\n").unwrap();
        info.update(&fs).unwrap();

        assert_eq!(info.memory.resident_kb, 8192);
        assert_eq!(info.cpu.user_ticks, 800);
        assert!((info.cpu.uptime_secs - 1010.0).abs() < 1e-9);
        assert_eq!(info.path, "/bin/bash");
    }

    #[test]
    fn test_failed_update_leaves_process_unchanged() {
        let (dir, fs) = proc_tree();
        fixture(
            dir.path(),
            5,
            &status_for(5, "sleep", 100),
            &stat::tests::stat_line("sleep", 1, 1, 1, 0),
            None,
        );
        let mut info = read_process(&fs, 5).unwrap();
        let before = info.clone();

        std::fs::remove_dir_all(dir.path().join("5")).unwrap();
        assert!(info.update(&fs).unwrap_err().is_not_found());
        assert_eq!(info, before);
    }

    #[test]
    fn test_list_skips_garbage_and_broken_entries() {
        let (dir, fs) = proc_tree();
        fixture(
            dir.path(),
            20,
            &status_for(20, "b", 1),
            &stat::tests::stat_line("b", 1, 1, 1, 0),
            None,
        );
        fixture(
            dir.path(),
            3,
            &status_for(3, "a", 1),
            &stat::tests::stat_line("a", 1, 1, 1, 0),
            None,
        );
        fixture(dir.path(), 9, &status_for(9, "broken", 1), "9 (broken)", None);
        std::fs::create_dir_all(dir.path().join("self")).unwrap();
        std::fs::create_dir_all(dir.path().join("4abc")).unwrap();

        let pids: Vec<u64> = list_processes(&fs).unwrap().iter().map(|p| p.pid).collect();
        assert_eq!(pids, vec![3, 20]);
    }

    #[test]
    fn test_read_self() {
        if Path::new("/proc/self/stat").exists() {
            let pid = u64::from(std::process::id());
            let info = read_process(&KernelFs::host(), pid).unwrap();
            assert_eq!(info.pid, pid);
            assert!(info.memory.resident_kb > 0);
        }
    }
}
