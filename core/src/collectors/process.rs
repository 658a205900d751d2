//! Process collector
//!
//! Reads `ps aux` sorted by CPU usage and keeps the busiest entries.

use async_trait::async_trait;

use super::command::{count_proc_pids, optional, run};
use super::{CollectedSnapshot, CollectionError, Collector, ProcessEntry, ProcessInfo};
use crate::cache::CacheCategory;

/// Default number of processes kept
pub const DEFAULT_TOP_PROCESSES: usize = 10;

/// `ps aux` prints eleven columns, the last being the command line
const PS_COLUMNS: usize = 11;

/// Collects [`ProcessInfo`]
#[derive(Clone, Debug)]
pub struct ProcessCollector {
    limit: usize,
}

impl ProcessCollector {
    /// Keep at most `limit` processes
    pub fn new(limit: usize) -> Self {
        Self { limit }
    }
}

impl Default for ProcessCollector {
    fn default() -> Self {
        Self::new(DEFAULT_TOP_PROCESSES)
    }
}

#[async_trait]
impl Collector for ProcessCollector {
    fn category(&self) -> CacheCategory {
        CacheCategory::Process
    }

    async fn collect(&self) -> Result<CollectedSnapshot, CollectionError> {
        let args: &[&str] = if cfg!(target_os = "linux") {
            &["aux", "--sort=-%cpu"]
        } else if cfg!(target_os = "macos") {
            &["aux", "-r"]
        } else {
            return Err(CollectionError::Unsupported("process listing"));
        };

        let output = run("ps", args).await?;
        if !output.lines().next().is_some_and(|h| h.contains("PID")) {
            return Err(CollectionError::parse("ps output", "missing header"));
        }

        let total = if cfg!(target_os = "linux") {
            optional("process count", count_proc_pids().await)
        } else {
            Some(output.lines().skip(1).filter(|l| !l.trim().is_empty()).count())
        };

        Ok(CollectedSnapshot::Process(ProcessInfo {
            top: parse_ps_aux(&output, self.limit),
            total,
        }))
    }
}

/// Parse `ps aux` output, keeping the first `limit` well-formed rows
///
/// Rows with too few columns or non-numeric PID/CPU/MEM fields are skipped.
pub fn parse_ps_aux(output: &str, limit: usize) -> Vec<ProcessEntry> {
    output
        .lines()
        .skip(1)
        .filter_map(parse_ps_row)
        .take(limit)
        .collect()
}

fn parse_ps_row(line: &str) -> Option<ProcessEntry> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() < PS_COLUMNS {
        return None;
    }

    let pid = fields[1].parse().ok()?;
    let cpu_percent = fields[2].parse().ok()?;
    let mem_percent = fields[3].parse().ok()?;
    let executable = fields[PS_COLUMNS - 1];
    // Kernel threads look like `[kworker/0:1H-events]` and keep their brackets
    let name = if executable.starts_with('[') {
        executable
    } else {
        executable
            .rsplit('/')
            .next()
            .filter(|n| !n.is_empty())
            .unwrap_or(executable)
    }
    .to_string();

    Some(ProcessEntry {
        pid,
        name,
        cpu_percent,
        mem_percent,
        command: fields[PS_COLUMNS - 1..].join(" "),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const PS: &str = "\
USER         PID %CPU %MEM    VSZ   RSS TTY      STAT START   TIME COMMAND
alice       4242 37.5  2.1 123456 65432 ?        Sl   09:12   1:02 /usr/lib/firefox/firefox -contentproc
root           1  0.3  0.1  16900 12000 ?        Ss   08:00   0:03 /sbin/init splash
bob          abc  1.0  1.0      1     1 ?        S    08:00   0:00 broken
short line
carol        777  0.0  0.0      0     0 ?        I<   08:00   0:00 [kworker/0:1H-events]
";

    #[test]
    fn test_parse_rows() {
        let entries = parse_ps_aux(PS, 10);
        assert_eq!(entries.len(), 3);

        assert_eq!(
            entries[0],
            ProcessEntry {
                pid: 4242,
                name: "firefox".to_string(),
                cpu_percent: 37.5,
                mem_percent: 2.1,
                command: "/usr/lib/firefox/firefox -contentproc".to_string(),
            }
        );
        assert_eq!(entries[1].name, "init");
        assert_eq!(entries[2].name, "[kworker/0:1H-events]");
    }

    #[test]
    fn test_limit() {
        let entries = parse_ps_aux(PS, 1);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].pid, 4242);
    }

    #[test]
    fn test_header_only() {
        assert!(parse_ps_aux("USER PID %CPU %MEM VSZ RSS TTY STAT START TIME COMMAND\n", 5).is_empty());
    }
}
