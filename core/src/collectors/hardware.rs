//! Hardware collector: GPU, temperature, fan, battery

use async_trait::async_trait;

use super::command::{optional, read, run};
use super::{CollectedSnapshot, CollectionError, Collector, HardwareInfo};
use crate::cache::CacheCategory;

const THERMAL_ZONE: &str = "/sys/class/thermal/thermal_zone0/temp";
const BATTERY_STATUS: &str = "/sys/class/power_supply/BAT0/status";
const BATTERY_CAPACITY: &str = "/sys/class/power_supply/BAT0/capacity";

/// Collects [`HardwareInfo`]
#[derive(Clone, Debug, Default)]
pub struct HardwareCollector;

impl HardwareCollector {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Collector for HardwareCollector {
    fn category(&self) -> CacheCategory {
        CacheCategory::Hardware
    }

    async fn collect(&self) -> Result<CollectedSnapshot, CollectionError> {
        if !cfg!(target_os = "linux") {
            return Err(CollectionError::Unsupported("hardware sensors"));
        }

        let (gpu, sensors, status, capacity) = tokio::join!(
            gpu_name(),
            run("sensors", &[]),
            read(BATTERY_STATUS),
            read(BATTERY_CAPACITY),
        );

        let sensors = optional("sensors", sensors);
        let temperature = match sensors.as_deref().and_then(parse_sensors_temperature) {
            Some(temp) => Some(temp),
            None => optional("thermal zone", read(THERMAL_ZONE).await)
                .as_deref()
                .and_then(parse_thermal_zone),
        };

        let info = HardwareInfo {
            gpu: optional("gpu", gpu),
            temperature,
            fan_speed: sensors.as_deref().and_then(parse_sensors_fan),
            battery_status: optional("battery status", status)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            battery_level: optional("battery capacity", capacity).and_then(|c| parse_capacity(&c)),
        };

        Ok(CollectedSnapshot::Hardware(info))
    }
}

async fn gpu_name() -> Result<String, CollectionError> {
    let nvidia = run(
        "nvidia-smi",
        &["--query-gpu=name", "--format=csv,noheader,nounits"],
    )
    .await;
    if let Some(name) = nvidia.ok().and_then(|out| first_line(&out)) {
        return Ok(name);
    }

    let lspci = run("lspci", &[]).await?;
    parse_lspci_gpu(&lspci).ok_or_else(|| CollectionError::parse("lspci", "no display controller"))
}

// ============================================================================
// Parsing
// ============================================================================

fn first_line(output: &str) -> Option<String> {
    output
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .map(str::to_string)
}

/// Device description of the first VGA or display controller in `lspci`
pub fn parse_lspci_gpu(output: &str) -> Option<String> {
    output
        .lines()
        .find(|line| {
            let lower = line.to_ascii_lowercase();
            lower.contains("vga") || lower.contains("display")
        })
        .map(|line| {
            // "00:02.0 VGA compatible controller: Intel Corporation ..."
            line.split_once(": ")
                .map_or(line, |(_, device)| device)
                .trim()
                .to_string()
        })
}

/// First reading after a `label:` prefix in a `sensors` line
fn sensor_value(line: &str) -> Option<String> {
    let (_, rest) = line.split_once(':')?;
    let mut parts = rest.split_whitespace();
    let value = parts.next()?;
    // Fans are reported as "1200 RPM"
    match parts.next() {
        Some("RPM") => Some(format!("{value} RPM")),
        _ => Some(value.to_string()),
    }
}

/// CPU temperature from `sensors` output
pub fn parse_sensors_temperature(output: &str) -> Option<String> {
    output
        .lines()
        .find(|l| l.contains("Package id 0:") || l.contains("Core 0:"))
        .and_then(sensor_value)
}

/// First fan reading from `sensors` output
pub fn parse_sensors_fan(output: &str) -> Option<String> {
    output
        .lines()
        .find(|l| l.to_ascii_lowercase().contains("fan") && l.contains("RPM"))
        .and_then(sensor_value)
}

/// Millidegrees Celsius from a thermal zone, formatted as `45.0°C`
pub fn parse_thermal_zone(content: &str) -> Option<String> {
    let millidegrees: i64 = content.trim().parse().ok()?;
    Some(format!("{:.1}°C", millidegrees as f64 / 1000.0))
}

/// Battery capacity as a percentage string
pub fn parse_capacity(content: &str) -> Option<String> {
    let level: u8 = content.trim().parse().ok()?;
    Some(format!("{level}%"))
}
