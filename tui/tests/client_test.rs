//! Dashboard client tests
//!
//! Drives a [`DashboardClient`] headlessly: fake collectors stand in for the
//! host, and the loop below plays the part of the App, feeding every task
//! result back into the dashboard.

use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use pretty_assertions::assert_eq;
use tempfile::NamedTempFile;

use skyfetch_core::collectors::{HardwareInfo, NetworkInfo};
use skyfetch_core::{
    CacheCategory, CollectedSnapshot, CollectionError, Collector, CollectorRegistry, Dashboard,
    FrameSourceChain, InputEvent, Message, SkyfetchConfig, SlotValue,
};
use skyfetch_tui::{ClientSettings, DashboardClient};

// ============================================================================
// Fake collectors
// ============================================================================

/// Returns a fixed network snapshot and counts calls
struct FakeNetwork {
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl Collector for FakeNetwork {
    fn category(&self) -> CacheCategory {
        CacheCategory::Network
    }

    async fn collect(&self) -> Result<CollectedSnapshot, CollectionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(CollectedSnapshot::Network(NetworkInfo {
            ip_addresses: vec!["192.168.1.20".to_string()],
            connections: Some(12),
            ..NetworkInfo::default()
        }))
    }
}

/// Never finishes within any reasonable budget
struct HangingHardware;

#[async_trait]
impl Collector for HangingHardware {
    fn category(&self) -> CacheCategory {
        CacheCategory::Hardware
    }

    async fn collect(&self) -> Result<CollectedSnapshot, CollectionError> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Ok(CollectedSnapshot::Hardware(HardwareInfo::default()))
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn static_config() -> SkyfetchConfig {
    let mut config = SkyfetchConfig::default();
    config.display.static_mode = true;
    config
}

fn client(
    config: SkyfetchConfig,
    chain: FrameSourceChain,
    registry: CollectorRegistry,
) -> DashboardClient {
    let mut settings = ClientSettings::from_config(&config);
    settings.collector_timeout = Duration::from_millis(50);
    DashboardClient::new(Dashboard::new(config, chain), registry, settings)
}

/// Feed task results back until `done` holds
async fn pump_until(client: &mut DashboardClient, done: impl Fn(&Dashboard) -> bool) {
    for _ in 0..200 {
        if done(client.dashboard()) {
            return;
        }
        let message = tokio::time::timeout(Duration::from_secs(30), client.recv())
            .await
            .expect("no message before timeout")
            .expect("channel closed");
        client.handle(message, Instant::now());
    }
    panic!("condition not reached after 200 messages");
}

// ============================================================================
// Tests
// ============================================================================

#[tokio::test]
async fn test_collected_snapshot_reaches_cache() {
    let calls = Arc::new(AtomicUsize::new(0));
    let registry = CollectorRegistry::new().with(FakeNetwork {
        calls: Arc::clone(&calls),
    });
    let mut client = client(static_config(), FrameSourceChain::new(), registry);

    client.start(Instant::now());
    pump_until(&mut client, |d| d.cache().network().is_some()).await;

    let network = client.dashboard().cache().network().unwrap();
    assert_eq!(network.ip_addresses, vec!["192.168.1.20".to_string()]);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_missing_collector_reports_unavailable() {
    let mut client = client(static_config(), FrameSourceChain::new(), CollectorRegistry::new());

    client.start(Instant::now());
    pump_until(&mut client, |d| {
        matches!(d.cache().read(CacheCategory::Process), SlotValue::Unavailable { .. })
    })
    .await;

    match client.dashboard().cache().read(CacheCategory::Process) {
        SlotValue::Unavailable { reason } => assert_eq!(reason, "no collector available"),
        other => panic!("expected unavailable, got {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn test_hanging_collector_times_out() {
    let registry = CollectorRegistry::new().with(HangingHardware);
    let mut client = client(static_config(), FrameSourceChain::new(), registry);

    client.start(Instant::now());
    pump_until(&mut client, |d| {
        matches!(d.cache().read(CacheCategory::Hardware), SlotValue::Unavailable { .. })
    })
    .await;

    match client.dashboard().cache().read(CacheCategory::Hardware) {
        SlotValue::Unavailable { reason } => assert_eq!(reason, "timed out after 50ms"),
        other => panic!("expected unavailable, got {other:?}"),
    }
}

#[tokio::test]
async fn test_frames_load_from_disk() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "one\n---FRAME---\ntwo\n---FRAME---\nthree\n").unwrap();

    let chain = FrameSourceChain::from_paths(Some(file.path()), None);
    let mut client = client(static_config(), chain, CollectorRegistry::new());

    client.start(Instant::now());
    pump_until(&mut client, |d| d.playback().frame_count() > 0).await;

    assert_eq!(client.dashboard().playback().frame_count(), 3);
    assert_eq!(client.dashboard().playback().current_frame().content(), "one\n");
    assert_eq!(client.dashboard().notice(), None);
}

#[tokio::test]
async fn test_missing_frame_file_leaves_rain_and_notice() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("absent.txt");
    let chain = FrameSourceChain::from_paths(Some(&missing), None);
    let mut client = client(static_config(), chain, CollectorRegistry::new());

    client.start(Instant::now());
    pump_until(&mut client, |d| d.notice().is_some()).await;

    assert!(client.dashboard().playback().is_procedural());
}

#[tokio::test]
async fn test_ticks_advance_loaded_frames() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "a\n---FRAME---\nb\n---FRAME---\nc\n").unwrap();

    let mut config = SkyfetchConfig::default();
    config.animation.rate = Some(Duration::from_millis(20));
    let chain = FrameSourceChain::from_paths(Some(file.path()), None);
    let mut client = client(config, chain, CollectorRegistry::new());

    client.start(Instant::now());
    pump_until(&mut client, |d| d.playback().frame_count() == 3).await;
    pump_until(&mut client, |d| d.playback().index() > 0).await;

    assert!(client.is_running());
}

#[tokio::test]
async fn test_quit_stops_client() {
    let mut client = client(static_config(), FrameSourceChain::new(), CollectorRegistry::new());
    client.start(Instant::now());
    assert!(client.is_running());

    client.handle(Message::Input(InputEvent::Quit), Instant::now());
    assert!(!client.is_running());
}
