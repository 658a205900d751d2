//! Per-view rendering

use std::time::Duration;

use super::{ListCursor, ViewContent, ViewContext};
use crate::cache::{CacheCategory, SlotValue};

/// Rule drawn under section headings
pub const RULE: &str = "─────────────────────";

const NA: &str = "N/A";

/// Uptime as `1h2m3s`, `4m5s` or `6s`
pub fn format_uptime(uptime: Duration) -> String {
    let secs = uptime.as_secs();
    let (h, m, s) = (secs / 3600, (secs % 3600) / 60, secs % 60);
    if h > 0 {
        format!("{h}h{m}m{s}s")
    } else if m > 0 {
        format!("{m}m{s}s")
    } else {
        format!("{s}s")
    }
}

fn or_na(value: Option<&str>) -> String {
    value.filter(|v| !v.is_empty()).unwrap_or(NA).to_string()
}

fn join_or_na(values: &[String]) -> String {
    if values.is_empty() {
        NA.to_string()
    } else {
        values.join(", ")
    }
}

/// Status line for a slot with nothing to show, `None` when data is ready
fn slot_status(ctx: &ViewContext<'_>, category: CacheCategory) -> Option<String> {
    match ctx.cache.read(category) {
        SlotValue::Pending => Some("Collecting...".to_string()),
        SlotValue::Unavailable { reason } => Some(format!("Unavailable: {reason}")),
        SlotValue::Ready(_) => None,
    }
}

pub(super) fn standard(ctx: &ViewContext<'_>) -> ViewContent {
    let display = ctx.display;
    let system = ctx.system;
    let mut content = ViewContent::new();

    content.section("System Information");
    if display.show_os {
        content.field("OS", format!("{} ({})", system.os, system.arch));
    }
    if display.show_hostname {
        content.field("User", &system.username);
    }
    if display.show_cpu {
        content.field("CPU", format!("{} cores", system.cpu_count));
    }
    if display.show_memory {
        content.field("Memory", or_na(system.memory.as_deref()));
    }
    if let Some(count) = system.process_count.filter(|&n| n > 0) {
        content.field("Processes", count.to_string());
    }
    if let Some(ref load) = system.load_average {
        content.field("Load", load);
    }
    if display.show_disk {
        content.field("Disk", or_na(system.disk.as_deref()));
    }

    content.blank().section("Runtime Information");
    if display.show_uptime {
        content.field("Uptime", format_uptime(ctx.uptime));
    }
    content.field("Time", ctx.clock.format("%H:%M:%S").to_string());
    if display.show_weather {
        let weather = match ctx.cache.read(CacheCategory::Weather) {
            SlotValue::Pending => "Loading...".to_string(),
            SlotValue::Unavailable { .. } => NA.to_string(),
            SlotValue::Ready(_) => ctx
                .cache
                .weather()
                .map_or_else(|| NA.to_string(), |w| w.current.clone()),
        };
        content.field("Weather", weather);
    }
    if display.show_fps_counter {
        let fps = if ctx.frame_rate.is_zero() {
            0.0
        } else {
            1.0 / ctx.frame_rate.as_secs_f64()
        };
        content.field("FPS", format!("{fps:.1}"));
    }

    content
}

pub(super) fn network(ctx: &ViewContext<'_>) -> ViewContent {
    let mut content = ViewContent::new();
    content.section("Network Information");

    if let Some(status) = slot_status(ctx, CacheCategory::Network) {
        content.muted(status);
        return content;
    }
    let Some(info) = ctx.cache.network() else {
        return content;
    };

    content
        .field("IP Addresses", join_or_na(&info.ip_addresses))
        .field("Bandwidth In", or_na(info.bandwidth_in.as_deref()))
        .field("Bandwidth Out", or_na(info.bandwidth_out.as_deref()))
        .field(
            "Active Connections",
            info.connections.map_or_else(|| NA.to_string(), |n| n.to_string()),
        )
        .field("Active Ports", join_or_na(&info.active_ports));
    content
}

pub(super) fn hardware(ctx: &ViewContext<'_>) -> ViewContent {
    let mut content = ViewContent::new();
    content.section("Hardware Information");

    if let Some(status) = slot_status(ctx, CacheCategory::Hardware) {
        content.muted(status);
        return content;
    }
    let Some(info) = ctx.cache.hardware() else {
        return content;
    };

    content
        .field("GPU", or_na(info.gpu.as_deref()))
        .field("Temperature", or_na(info.temperature.as_deref()))
        .field("Fan Speed", or_na(info.fan_speed.as_deref()))
        .field("Battery Status", or_na(info.battery_status.as_deref()))
        .field("Battery Level", or_na(info.battery_level.as_deref()));
    content
}

pub(super) fn processes(ctx: &ViewContext<'_>, cursor: &ListCursor) -> ViewContent {
    let mut content = ViewContent::new();
    content.section("Process Information");

    if let Some(status) = slot_status(ctx, CacheCategory::Process) {
        content.muted(status);
        return content;
    }
    let Some(info) = ctx.cache.process() else {
        return content;
    };

    content
        .field(
            "Total Processes",
            info.total.map_or_else(|| NA.to_string(), |n| n.to_string()),
        )
        .blank();

    if info.top.is_empty() {
        content.muted("No processes reported");
        return content;
    }

    let selected = cursor.selected().min(info.top.len() - 1);
    for (i, entry) in info.top.iter().enumerate() {
        content.entry(
            &entry.name,
            format!(
                "PID: {} | CPU: {:.1}% | Memory: {:.1}%",
                entry.pid, entry.cpu_percent, entry.mem_percent
            ),
            i == selected,
        );
    }
    content
}

pub(super) fn weather(ctx: &ViewContext<'_>) -> ViewContent {
    let mut content = ViewContent::new();
    content.section("Weather Information");

    if let Some(status) = slot_status(ctx, CacheCategory::Weather) {
        content.muted(status);
        return content;
    }
    let Some(info) = ctx.cache.weather() else {
        return content;
    };

    content
        .field("Current", &info.current)
        .field("Location", &info.location)
        .blank()
        .section("Today's Forecast");

    if info.forecast.is_empty() {
        content.muted("No forecast data available");
    } else {
        for line in &info.forecast {
            content.text(line);
        }
    }
    content
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::SnapshotCache;
    use crate::collectors::{
        CollectedSnapshot, CollectorOutcome, CollectorReport, NetworkInfo, ProcessEntry,
        ProcessInfo, SystemInfo, WeatherInfo,
    };
    use crate::config::DisplayConfig;
    use crate::views::{ContentLine, View};
    use chrono::NaiveTime;
    use pretty_assertions::assert_eq;
    use std::time::Instant;

    fn system() -> SystemInfo {
        SystemInfo {
            os: "linux".to_string(),
            arch: "x86_64".to_string(),
            cpu_count: 8,
            username: "ada".to_string(),
            memory: Some("3.0 GiB / 16.0 GiB".to_string()),
            disk: None,
            load_average: Some("0.10 0.20 0.30".to_string()),
            process_count: Some(321),
        }
    }

    fn fill(cache: &mut SnapshotCache, snapshot: CollectedSnapshot) {
        let now = Instant::now();
        let category = snapshot.category();
        let seq = cache.begin_refresh(category, now);
        cache.apply(
            CollectorReport {
                category,
                seq,
                outcome: CollectorOutcome::Ready(snapshot),
                elapsed: Duration::ZERO,
            },
            now,
        );
    }

    fn render(view: &View, cache: &SnapshotCache, display: &DisplayConfig) -> ViewContent {
        let system = system();
        let ctx = ViewContext {
            cache,
            system: &system,
            display,
            uptime: Duration::from_secs(3725),
            clock: NaiveTime::from_hms_opt(9, 5, 7).unwrap(),
            frame_rate: Duration::from_millis(200),
            width: 80,
            height: 24,
        };
        view.render(&ctx)
    }

    #[test]
    fn test_format_uptime() {
        assert_eq!(format_uptime(Duration::from_millis(999)), "0s");
        assert_eq!(format_uptime(Duration::from_secs(65)), "1m5s");
        assert_eq!(format_uptime(Duration::from_secs(7200)), "2h0m0s");
    }

    #[test]
    fn test_standard_fields() {
        let cache = SnapshotCache::default();
        let display = DisplayConfig {
            show_fps_counter: true,
            ..DisplayConfig::default()
        };
        let content = render(&View::Standard, &cache, &display);

        assert_eq!(content.field_value("OS"), Some("linux (x86_64)"));
        assert_eq!(content.field_value("User"), Some("ada"));
        assert_eq!(content.field_value("CPU"), Some("8 cores"));
        assert_eq!(content.field_value("Processes"), Some("321"));
        assert_eq!(content.field_value("Load"), Some("0.10 0.20 0.30"));
        assert_eq!(content.field_value("Disk"), Some("N/A"));
        assert_eq!(content.field_value("Uptime"), Some("1h2m5s"));
        assert_eq!(content.field_value("Time"), Some("09:05:07"));
        assert_eq!(content.field_value("FPS"), Some("5.0"));
        assert_eq!(content.field_value("Weather"), None);
    }

    #[test]
    fn test_standard_toggles() {
        let cache = SnapshotCache::default();
        let display = DisplayConfig {
            show_os: false,
            show_disk: false,
            show_uptime: false,
            show_weather: true,
            ..DisplayConfig::default()
        };
        let content = render(&View::Standard, &cache, &display);

        assert_eq!(content.field_value("OS"), None);
        assert_eq!(content.field_value("Disk"), None);
        assert_eq!(content.field_value("Uptime"), None);
        assert_eq!(content.field_value("Weather"), Some("Loading..."));
    }

    #[test]
    fn test_pending_slot_shows_collecting() {
        let cache = SnapshotCache::default();
        let content = render(&View::Network, &cache, &DisplayConfig::default());
        assert!(content
            .lines
            .contains(&ContentLine::Muted("Collecting...".to_string())));
    }

    #[test]
    fn test_network_fields() {
        let mut cache = SnapshotCache::default();
        fill(
            &mut cache,
            CollectedSnapshot::Network(NetworkInfo {
                ip_addresses: vec!["10.0.0.2".to_string(), "fe80::1".to_string()],
                bandwidth_in: Some("1.5 GiB".to_string()),
                bandwidth_out: None,
                connections: Some(12),
                active_ports: Vec::new(),
            }),
        );
        let content = render(&View::Network, &cache, &DisplayConfig::default());

        assert_eq!(content.field_value("IP Addresses"), Some("10.0.0.2, fe80::1"));
        assert_eq!(content.field_value("Bandwidth In"), Some("1.5 GiB"));
        assert_eq!(content.field_value("Bandwidth Out"), Some("N/A"));
        assert_eq!(content.field_value("Active Connections"), Some("12"));
        assert_eq!(content.field_value("Active Ports"), Some("N/A"));
    }

    #[test]
    fn test_unavailable_shows_reason() {
        let mut cache = SnapshotCache::default();
        let now = Instant::now();
        let seq = cache.begin_refresh(CacheCategory::Hardware, now);
        cache.apply(
            CollectorReport::unavailable(CacheCategory::Hardware, seq, "timed out after 2500ms"),
            now,
        );
        let content = render(&View::Hardware, &cache, &DisplayConfig::default());
        assert!(content.lines.contains(&ContentLine::Muted(
            "Unavailable: timed out after 2500ms".to_string()
        )));
    }

    #[test]
    fn test_process_entries_mark_selection() {
        let mut cache = SnapshotCache::default();
        let entry = |pid: u32, name: &str| ProcessEntry {
            pid,
            name: name.to_string(),
            cpu_percent: 12.34,
            mem_percent: 1.0,
            command: name.to_string(),
        };
        fill(
            &mut cache,
            CollectedSnapshot::Process(ProcessInfo {
                top: vec![entry(10, "cargo"), entry(20, "rustc")],
                total: Some(250),
            }),
        );

        let mut cursor = ListCursor::new();
        cursor.down(2);
        let content = render(&View::Processes(cursor), &cache, &DisplayConfig::default());

        assert_eq!(content.field_value("Total Processes"), Some("250"));
        let entries: Vec<_> = content
            .lines
            .iter()
            .filter_map(|l| match l {
                ContentLine::Entry {
                    title,
                    description,
                    selected,
                } => Some((title.as_str(), description.as_str(), *selected)),
                _ => None,
            })
            .collect();
        assert_eq!(
            entries,
            vec![
                ("cargo", "PID: 10 | CPU: 12.3% | Memory: 1.0%", false),
                ("rustc", "PID: 20 | CPU: 12.3% | Memory: 1.0%", true),
            ]
        );
    }

    #[test]
    fn test_weather_forecast() {
        let mut cache = SnapshotCache::default();
        fill(
            &mut cache,
            CollectedSnapshot::Weather(WeatherInfo {
                current: "Sunny +21°C".to_string(),
                forecast: Vec::new(),
                location: "Oslo".to_string(),
            }),
        );
        let content = render(&View::Weather, &cache, &DisplayConfig::default());

        assert_eq!(content.field_value("Current"), Some("Sunny +21°C"));
        assert_eq!(content.field_value("Location"), Some("Oslo"));
        assert!(content
            .lines
            .contains(&ContentLine::Heading("Today's Forecast".to_string())));
        assert!(content
            .lines
            .contains(&ContentLine::Muted("No forecast data available".to_string())));

        let standard = render(
            &View::Standard,
            &cache,
            &DisplayConfig {
                show_weather: true,
                ..DisplayConfig::default()
            },
        );
        assert_eq!(standard.field_value("Weather"), Some("Sunny +21°C"));
    }
}
