//! Snapshot Cache
//!
//! One slot per metric category, each with its own TTL. Reads never block
//! and never fail: a view gets whatever the slot currently holds, stale or
//! not. Only [`SnapshotCache::apply`] writes a slot, and it replaces the
//! value and refresh time of that one category.
//!
//! # Dispatch Bookkeeping
//!
//! Every dispatch takes a sequence number from a single counter. A slot
//! remembers the newest number it has dispatched and the newest it has
//! applied, so a slow result that arrives after a newer one is dropped
//! instead of overwriting it. A slot with a dispatch outstanding is not
//! offered for refresh again until that dispatch completes (or has been
//! outstanding for longer than the TTL, in case the result was lost).

use std::fmt;
use std::time::{Duration, Instant};

use crate::collectors::{
    CollectedSnapshot, CollectorOutcome, CollectorReport, HardwareInfo, NetworkInfo, ProcessInfo,
    WeatherInfo,
};

// ============================================================================
// Categories
// ============================================================================

/// A metric category with its own slot and TTL
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CacheCategory {
    Network,
    Hardware,
    Process,
    Weather,
}

impl CacheCategory {
    /// Every category, in slot order
    pub const ALL: [CacheCategory; 4] = [
        CacheCategory::Network,
        CacheCategory::Hardware,
        CacheCategory::Process,
        CacheCategory::Weather,
    ];

    fn index(self) -> usize {
        match self {
            Self::Network => 0,
            Self::Hardware => 1,
            Self::Process => 2,
            Self::Weather => 3,
        }
    }

    /// Lowercase name used in logs and config
    pub fn name(self) -> &'static str {
        match self {
            Self::Network => "network",
            Self::Hardware => "hardware",
            Self::Process => "process",
            Self::Weather => "weather",
        }
    }
}

impl fmt::Display for CacheCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// TTLs
// ============================================================================

/// Default TTL for network, hardware, and process snapshots
pub const DEFAULT_TTL: Duration = Duration::from_secs(10);

/// Default TTL for weather snapshots
pub const DEFAULT_WEATHER_TTL: Duration = Duration::from_secs(30);

/// Per-category time-to-live
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CacheTtls {
    pub network: Duration,
    pub hardware: Duration,
    pub process: Duration,
    pub weather: Duration,
}

impl Default for CacheTtls {
    fn default() -> Self {
        Self {
            network: DEFAULT_TTL,
            hardware: DEFAULT_TTL,
            process: DEFAULT_TTL,
            weather: DEFAULT_WEATHER_TTL,
        }
    }
}

impl CacheTtls {
    /// TTL for one category
    pub fn get(&self, category: CacheCategory) -> Duration {
        match category {
            CacheCategory::Network => self.network,
            CacheCategory::Hardware => self.hardware,
            CacheCategory::Process => self.process,
            CacheCategory::Weather => self.weather,
        }
    }
}

// ============================================================================
// Slots
// ============================================================================

/// What a slot currently holds
#[derive(Clone, Debug, Default, PartialEq)]
pub enum SlotValue {
    /// Never populated
    #[default]
    Pending,
    /// Most recent successful snapshot
    Ready(CollectedSnapshot),
    /// Most recent run failed
    Unavailable { reason: String },
}

impl From<CollectorOutcome> for SlotValue {
    fn from(outcome: CollectorOutcome) -> Self {
        match outcome {
            CollectorOutcome::Ready(snapshot) => Self::Ready(snapshot),
            CollectorOutcome::Unavailable { reason } => Self::Unavailable { reason },
        }
    }
}

#[derive(Debug)]
struct Slot {
    value: SlotValue,
    last_refreshed: Option<Instant>,
    ttl: Duration,
    dispatched_seq: u64,
    applied_seq: u64,
    /// When the outstanding dispatch was made, if any
    in_flight_since: Option<Instant>,
}

impl Slot {
    fn new(ttl: Duration) -> Self {
        Self {
            value: SlotValue::Pending,
            last_refreshed: None,
            ttl,
            dispatched_seq: 0,
            applied_seq: 0,
            in_flight_since: None,
        }
    }
}

/// Result of [`SnapshotCache::apply`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ApplyResult {
    /// The slot now holds the report's outcome
    Applied,
    /// A newer result was already applied; the report was dropped
    Stale,
}

// ============================================================================
// Cache
// ============================================================================

/// Per-category TTL cache of collected snapshots
#[derive(Debug)]
pub struct SnapshotCache {
    slots: [Slot; 4],
    next_seq: u64,
}

impl Default for SnapshotCache {
    fn default() -> Self {
        Self::new(CacheTtls::default())
    }
}

impl SnapshotCache {
    /// Create an empty cache; every slot starts `Pending`
    pub fn new(ttls: CacheTtls) -> Self {
        Self {
            slots: CacheCategory::ALL.map(|c| Slot::new(ttls.get(c))),
            next_seq: 1,
        }
    }

    fn slot(&self, category: CacheCategory) -> &Slot {
        &self.slots[category.index()]
    }

    fn slot_mut(&mut self, category: CacheCategory) -> &mut Slot {
        &mut self.slots[category.index()]
    }

    /// Current value of a slot
    pub fn read(&self, category: CacheCategory) -> &SlotValue {
        &self.slot(category).value
    }

    /// When the slot was last written
    pub fn last_refreshed(&self, category: CacheCategory) -> Option<Instant> {
        self.slot(category).last_refreshed
    }

    /// The slot's TTL
    pub fn ttl(&self, category: CacheCategory) -> Duration {
        self.slot(category).ttl
    }

    /// True if the slot was never populated or its value is older than the TTL
    pub fn should_refresh(&self, category: CacheCategory, now: Instant) -> bool {
        let slot = self.slot(category);
        match slot.last_refreshed {
            None => true,
            Some(at) => now.saturating_duration_since(at) > slot.ttl,
        }
    }

    /// True if a dispatch for the slot is outstanding
    pub fn is_in_flight(&self, category: CacheCategory, now: Instant) -> bool {
        let slot = self.slot(category);
        slot.in_flight_since
            .is_some_and(|since| now.saturating_duration_since(since) <= slot.ttl)
    }

    /// Categories that need a refresh and have nothing outstanding
    pub fn due_categories(&self, now: Instant) -> Vec<CacheCategory> {
        CacheCategory::ALL
            .into_iter()
            .filter(|&c| self.should_refresh(c, now) && !self.is_in_flight(c, now))
            .collect()
    }

    /// Record a dispatch and return its sequence number
    pub fn begin_refresh(&mut self, category: CacheCategory, now: Instant) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;

        let slot = self.slot_mut(category);
        slot.dispatched_seq = seq;
        slot.in_flight_since = Some(now);
        seq
    }

    /// Store a collector result
    ///
    /// Results older than the last applied one for the same category are
    /// dropped. The in-flight mark is cleared once the newest dispatch
    /// reports back.
    pub fn apply(&mut self, report: CollectorReport, now: Instant) -> ApplyResult {
        let category = report.category;
        let slot = self.slot_mut(category);

        if report.seq >= slot.dispatched_seq {
            slot.in_flight_since = None;
        }

        if report.seq < slot.applied_seq {
            tracing::debug!(
                category = %category,
                seq = report.seq,
                applied = slot.applied_seq,
                "Dropping stale collector result"
            );
            return ApplyResult::Stale;
        }

        slot.applied_seq = report.seq;
        slot.value = report.outcome.into();
        slot.last_refreshed = Some(now);
        ApplyResult::Applied
    }

    /// Network snapshot, if one is ready
    pub fn network(&self) -> Option<&NetworkInfo> {
        match self.read(CacheCategory::Network) {
            SlotValue::Ready(CollectedSnapshot::Network(info)) => Some(info),
            _ => None,
        }
    }

    /// Hardware snapshot, if one is ready
    pub fn hardware(&self) -> Option<&HardwareInfo> {
        match self.read(CacheCategory::Hardware) {
            SlotValue::Ready(CollectedSnapshot::Hardware(info)) => Some(info),
            _ => None,
        }
    }

    /// Process snapshot, if one is ready
    pub fn process(&self) -> Option<&ProcessInfo> {
        match self.read(CacheCategory::Process) {
            SlotValue::Ready(CollectedSnapshot::Process(info)) => Some(info),
            _ => None,
        }
    }

    /// Weather snapshot, if one is ready
    pub fn weather(&self) -> Option<&WeatherInfo> {
        match self.read(CacheCategory::Weather) {
            SlotValue::Ready(CollectedSnapshot::Weather(info)) => Some(info),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collectors::ProcessEntry;
    use pretty_assertions::assert_eq;

    fn ready(category: CacheCategory, seq: u64, total: usize) -> CollectorReport {
        let snapshot = match category {
            CacheCategory::Process => CollectedSnapshot::Process(ProcessInfo {
                top: Vec::new(),
                total: Some(total),
            }),
            CacheCategory::Network => CollectedSnapshot::Network(NetworkInfo {
                connections: Some(total),
                ..NetworkInfo::default()
            }),
            CacheCategory::Hardware => CollectedSnapshot::Hardware(HardwareInfo::default()),
            CacheCategory::Weather => CollectedSnapshot::Weather(WeatherInfo::default()),
        };
        CollectorReport {
            category,
            seq,
            outcome: CollectorOutcome::Ready(snapshot),
            elapsed: Duration::ZERO,
        }
    }

    #[test]
    fn test_new_cache_is_pending_and_due() {
        let cache = SnapshotCache::default();
        let now = Instant::now();
        for category in CacheCategory::ALL {
            assert_eq!(cache.read(category), &SlotValue::Pending);
            assert!(cache.should_refresh(category, now));
        }
        assert_eq!(cache.due_categories(now), CacheCategory::ALL.to_vec());
    }

    #[test]
    fn test_ttl_boundaries() {
        let mut cache = SnapshotCache::default();
        let t0 = Instant::now();

        let seq = cache.begin_refresh(CacheCategory::Process, t0);
        cache.apply(ready(CacheCategory::Process, seq, 100), t0);

        // The t0 snapshot is still served at t0 + 5s
        assert!(!cache.should_refresh(CacheCategory::Process, t0 + Duration::from_secs(5)));
        assert_eq!(cache.process().unwrap().total, Some(100));

        assert!(!cache.should_refresh(CacheCategory::Process, t0 + Duration::from_secs(10)));
        assert!(cache.should_refresh(CacheCategory::Process, t0 + Duration::from_secs(11)));
    }

    #[test]
    fn test_weather_ttl_is_longer() {
        let mut cache = SnapshotCache::default();
        let t0 = Instant::now();
        let seq = cache.begin_refresh(CacheCategory::Weather, t0);
        cache.apply(ready(CacheCategory::Weather, seq, 0), t0);

        assert!(!cache.should_refresh(CacheCategory::Weather, t0 + Duration::from_secs(20)));
        assert!(cache.should_refresh(CacheCategory::Weather, t0 + Duration::from_secs(31)));
    }

    #[test]
    fn test_apply_touches_one_category() {
        let mut cache = SnapshotCache::default();
        let now = Instant::now();
        let seq = cache.begin_refresh(CacheCategory::Network, now);
        cache.apply(ready(CacheCategory::Network, seq, 3), now);

        assert_eq!(cache.network().unwrap().connections, Some(3));
        assert_eq!(cache.read(CacheCategory::Hardware), &SlotValue::Pending);
        assert_eq!(cache.last_refreshed(CacheCategory::Hardware), None);
    }

    #[test]
    fn test_in_flight_not_due() {
        let mut cache = SnapshotCache::default();
        let now = Instant::now();
        cache.begin_refresh(CacheCategory::Hardware, now);

        let due = cache.due_categories(now);
        assert!(!due.contains(&CacheCategory::Hardware));
        assert!(due.contains(&CacheCategory::Network));
    }

    #[test]
    fn test_lost_dispatch_expires() {
        let mut cache = SnapshotCache::default();
        let now = Instant::now();
        cache.begin_refresh(CacheCategory::Hardware, now);
        assert!(cache
            .due_categories(now + Duration::from_secs(11))
            .contains(&CacheCategory::Hardware));
    }

    #[test]
    fn test_stale_result_dropped() {
        let mut cache = SnapshotCache::default();
        let now = Instant::now();

        let old = cache.begin_refresh(CacheCategory::Process, now);
        let new = cache.begin_refresh(CacheCategory::Process, now);
        assert!(new > old);

        assert_eq!(cache.apply(ready(CacheCategory::Process, new, 200), now), ApplyResult::Applied);
        assert_eq!(cache.apply(ready(CacheCategory::Process, old, 100), now), ApplyResult::Stale);
        assert_eq!(cache.process().unwrap().total, Some(200));
    }

    #[test]
    fn test_older_dispatch_still_applies_when_newer_pending() {
        let mut cache = SnapshotCache::default();
        let now = Instant::now();

        let old = cache.begin_refresh(CacheCategory::Process, now);
        let new = cache.begin_refresh(CacheCategory::Process, now);

        assert_eq!(cache.apply(ready(CacheCategory::Process, old, 100), now), ApplyResult::Applied);
        assert!(cache.is_in_flight(CacheCategory::Process, now));

        cache.apply(ready(CacheCategory::Process, new, 200), now);
        assert!(!cache.is_in_flight(CacheCategory::Process, now));
    }

    #[test]
    fn test_unavailable_counts_as_refresh() {
        let mut cache = SnapshotCache::default();
        let now = Instant::now();
        let seq = cache.begin_refresh(CacheCategory::Weather, now);
        cache.apply(
            CollectorReport::unavailable(CacheCategory::Weather, seq, "timed out after 2500ms"),
            now,
        );

        assert_eq!(
            cache.read(CacheCategory::Weather),
            &SlotValue::Unavailable {
                reason: "timed out after 2500ms".to_string()
            }
        );
        assert!(!cache.should_refresh(CacheCategory::Weather, now));
        assert!(cache.weather().is_none());
    }

    #[test]
    fn test_typed_accessors() {
        let mut cache = SnapshotCache::default();
        let now = Instant::now();
        let seq = cache.begin_refresh(CacheCategory::Process, now);
        cache.apply(
            CollectorReport {
                category: CacheCategory::Process,
                seq,
                outcome: CollectorOutcome::Ready(CollectedSnapshot::Process(ProcessInfo {
                    top: vec![ProcessEntry {
                        pid: 1,
                        name: "init".to_string(),
                        cpu_percent: 0.0,
                        mem_percent: 0.1,
                        command: "/sbin/init".to_string(),
                    }],
                    total: Some(1),
                })),
                elapsed: Duration::ZERO,
            },
            now,
        );
        assert_eq!(cache.process().unwrap().top[0].name, "init");
        assert!(cache.network().is_none());
    }
}
