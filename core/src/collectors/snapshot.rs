//! Snapshot payloads produced by the collectors
//!
//! Individual probes that fail leave their field empty (`None` or an empty
//! list) rather than failing the whole snapshot. Views print "N/A" for them.

use crate::cache::CacheCategory;

/// Network interfaces, sockets, and traffic
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NetworkInfo {
    /// Non-loopback addresses; `127.0.0.1` when none were found
    pub ip_addresses: Vec<String>,
    /// Bytes received across all non-loopback interfaces
    pub bandwidth_in: Option<String>,
    /// Bytes sent across all non-loopback interfaces
    pub bandwidth_out: Option<String>,
    /// Open TCP sockets
    pub connections: Option<usize>,
    /// Listening ports (at most ten)
    pub active_ports: Vec<String>,
}

/// Sensors and peripherals
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HardwareInfo {
    pub gpu: Option<String>,
    pub temperature: Option<String>,
    pub fan_speed: Option<String>,
    pub battery_status: Option<String>,
    pub battery_level: Option<String>,
}

/// One row of the process table
#[derive(Clone, Debug, PartialEq)]
pub struct ProcessEntry {
    pub pid: u32,
    /// Executable name without its directory
    pub name: String,
    pub cpu_percent: f64,
    pub mem_percent: f64,
    /// Full command line
    pub command: String,
}

/// Busiest processes, sorted by CPU
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProcessInfo {
    pub top: Vec<ProcessEntry>,
    /// Total number of processes on the host
    pub total: Option<usize>,
}

/// Current conditions and forecast
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WeatherInfo {
    /// One-line summary such as `Partly cloudy +12°C`
    pub current: String,
    /// Forecast text, control sequences removed
    pub forecast: Vec<String>,
    /// The requested location, or "Auto-detected"
    pub location: String,
}

/// A snapshot for any one cache category
#[derive(Clone, Debug, PartialEq)]
pub enum CollectedSnapshot {
    Network(NetworkInfo),
    Hardware(HardwareInfo),
    Process(ProcessInfo),
    Weather(WeatherInfo),
}

impl CollectedSnapshot {
    /// The category this snapshot belongs in
    pub fn category(&self) -> CacheCategory {
        match self {
            Self::Network(_) => CacheCategory::Network,
            Self::Hardware(_) => CacheCategory::Hardware,
            Self::Process(_) => CacheCategory::Process,
            Self::Weather(_) => CacheCategory::Weather,
        }
    }
}

/// Format a byte count with binary units
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KiB", "MiB", "GiB", "TiB"];

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{value:.1} {}", UNITS[unit])
    }
}
