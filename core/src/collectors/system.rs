//! Always-on system summary
//!
//! Unlike the cached categories this is not tied to a view: the standard
//! panel shows it whenever it is visible, and it is refreshed on its own
//! fixed interval.

use std::time::Duration;

use super::command::{count_proc_pids, optional, read, run};
use super::snapshot::format_bytes;

/// Host identity and load
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SystemInfo {
    pub os: String,
    pub arch: String,
    pub cpu_count: usize,
    pub username: String,
    /// `used / total`
    pub memory: Option<String>,
    /// Root filesystem usage, or its device and type when usage is unknown
    pub disk: Option<String>,
    /// 1, 5 and 15 minute load averages
    pub load_average: Option<String>,
    pub process_count: Option<usize>,
}

impl SystemInfo {
    /// The fields that need no IO
    pub fn basic() -> Self {
        Self {
            os: std::env::consts::OS.to_string(),
            arch: std::env::consts::ARCH.to_string(),
            cpu_count: std::thread::available_parallelism().map_or(1, |n| n.get()),
            username: username_from_env().unwrap_or_else(|| "unknown".to_string()),
            ..Self::default()
        }
    }
}

/// Gather a full summary, giving up on slow probes after `timeout`
///
/// Never fails: whatever could not be read within the budget is left empty.
pub async fn collect_system(timeout: Duration) -> SystemInfo {
    match tokio::time::timeout(timeout, gather()).await {
        Ok(info) => info,
        Err(_) => {
            tracing::warn!(timeout_ms = timeout.as_millis() as u64, "System summary timed out");
            SystemInfo::basic()
        }
    }
}

async fn gather() -> SystemInfo {
    let mut info = SystemInfo::basic();

    let (meminfo, loadavg, df, pids) = tokio::join!(
        read("/proc/meminfo"),
        read("/proc/loadavg"),
        run("df", &["-Pk", "/"]),
        count_proc_pids(),
    );

    info.memory = optional("meminfo", meminfo).as_deref().and_then(parse_meminfo);
    info.load_average = optional("loadavg", loadavg).as_deref().and_then(parse_loadavg);
    info.process_count = optional("process count", pids);
    info.disk = match optional("df", df).as_deref().and_then(parse_df) {
        Some(disk) => Some(disk),
        None => optional("mounts", read("/proc/mounts").await)
            .as_deref()
            .and_then(parse_root_mount),
    };

    if info.username == "unknown" {
        if let Some(name) = optional("whoami", run("whoami", &[]).await) {
            let name = name.trim();
            if !name.is_empty() {
                info.username = name.to_string();
            }
        }
    }

    info
}

fn username_from_env() -> Option<String> {
    ["USER", "USERNAME", "LOGNAME"]
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .find(|name| !name.is_empty())
}

// ============================================================================
// Parsing
// ============================================================================

/// `used / total` from `/proc/meminfo`
///
/// Used memory is `MemTotal - MemAvailable`.
pub fn parse_meminfo(content: &str) -> Option<String> {
    let field = |key: &str| -> Option<u64> {
        content
            .lines()
            .find_map(|l| l.strip_prefix(key)?.strip_prefix(':'))
            .and_then(|rest| rest.split_whitespace().next()?.parse().ok())
    };

    let total_kb = field("MemTotal")?;
    let available_kb = field("MemAvailable")?;
    let used_kb = total_kb.saturating_sub(available_kb);
    Some(format!(
        "{} / {}",
        format_bytes(used_kb * 1024),
        format_bytes(total_kb * 1024)
    ))
}

/// First three fields of `/proc/loadavg`
pub fn parse_loadavg(content: &str) -> Option<String> {
    let fields: Vec<&str> = content.split_whitespace().take(3).collect();
    (fields.len() == 3).then(|| fields.join(" "))
}

/// Usage line from POSIX `df -Pk /` output
pub fn parse_df(output: &str) -> Option<String> {
    let row = output.lines().nth(1)?;
    let fields: Vec<&str> = row.split_whitespace().collect();
    if fields.len() < 6 {
        return None;
    }
    let total_kb: u64 = fields[1].parse().ok()?;
    let used_kb: u64 = fields[2].parse().ok()?;
    Some(format!(
        "{} / {} ({})",
        format_bytes(used_kb * 1024),
        format_bytes(total_kb * 1024),
        fields[4]
    ))
}

/// Device and filesystem type of `/` from `/proc/mounts`
pub fn parse_root_mount(content: &str) -> Option<String> {
    content.lines().find_map(|line| {
        let fields: Vec<&str> = line.split_whitespace().collect();
        (fields.len() >= 3 && fields[1] == "/").then(|| format!("{} ({})", fields[0], fields[2]))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_meminfo() {
        let content = "\
MemTotal:       16384000 kB
MemFree:         1024000 kB
MemAvailable:    8192000 kB
";
        assert_eq!(parse_meminfo(content).as_deref(), Some("7.8 GiB / 15.6 GiB"));
        assert_eq!(parse_meminfo("MemTotal: 100 kB\n"), None);
    }

    #[test]
    fn test_meminfo_prefix_is_exact() {
        // MemTotalX must not satisfy a lookup for MemTotal
        let content = "MemTotalX: 1 kB\nMemTotal: 2048 kB\nMemAvailable: 1024 kB\n";
        assert_eq!(parse_meminfo(content).as_deref(), Some("1.0 MiB / 2.0 MiB"));
    }

    #[test]
    fn test_loadavg() {
        assert_eq!(
            parse_loadavg("0.52 0.58 0.59 2/1234 56789\n").as_deref(),
            Some("0.52 0.58 0.59")
        );
        assert_eq!(parse_loadavg("0.5\n"), None);
    }

    #[test]
    fn test_df() {
        let output = "\
Filesystem     1024-blocks      Used Available Capacity Mounted on
/dev/nvme0n1p2   488245288 195298116 268078124      43% /
";
        assert_eq!(parse_df(output).as_deref(), Some("186.3 GiB / 465.6 GiB (43%)"));
        assert_eq!(parse_df("Filesystem\n"), None);
    }

    #[test]
    fn test_root_mount() {
        let content = "\
proc /proc proc rw,nosuid 0 0
/dev/sda1 / ext4 rw,relatime 0 0
tmpfs /tmp tmpfs rw 0 0
";
        assert_eq!(parse_root_mount(content).as_deref(), Some("/dev/sda1 (ext4)"));
    }

    #[test]
    fn test_basic_fields() {
        let info = SystemInfo::basic();
        assert_eq!(info.os, std::env::consts::OS);
        assert!(info.cpu_count >= 1);
        assert_eq!(info.memory, None);
    }

    #[tokio::test]
    async fn test_collect_never_fails() {
        let info = collect_system(Duration::from_secs(5)).await;
        assert!(!info.os.is_empty());
        assert!(!info.username.is_empty());
    }
}
