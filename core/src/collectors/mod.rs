//! Host Metric Collectors
//!
//! One collector per cache category, all behind the [`Collector`] trait so
//! the surface can run them uniformly and tests can substitute fakes.
//!
//! # Failure Contract
//!
//! A collector returns `Err` freely; [`run_collector`] bounds it with a
//! timeout and turns any error into an "unavailable" report. Within a
//! collector, a failed sub-probe (a missing `sensors` binary, say) only
//! blanks its own field.

mod command;
mod error;
mod hardware;
mod network;
mod process;
mod runner;
mod snapshot;
mod system;
mod weather;

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::cache::CacheCategory;

pub use error::CollectionError;
pub use hardware::{
    parse_capacity, parse_lspci_gpu, parse_sensors_fan, parse_sensors_temperature,
    parse_thermal_zone, HardwareCollector,
};
pub use network::{
    count_socket_table, parse_hostname_addresses, parse_netstat_listening, parse_proc_net_dev,
    parse_ss_listening, NetworkCollector, MAX_PORTS,
};
pub use process::{parse_ps_aux, ProcessCollector, DEFAULT_TOP_PROCESSES};
pub use runner::{run_collector, CollectorOutcome, CollectorReport, DEFAULT_COLLECTOR_TIMEOUT};
pub use snapshot::{
    format_bytes, CollectedSnapshot, HardwareInfo, NetworkInfo, ProcessEntry, ProcessInfo,
    WeatherInfo,
};
pub use system::{
    collect_system, parse_df, parse_loadavg, parse_meminfo, parse_root_mount, SystemInfo,
};
pub use weather::{
    parse_current, parse_forecast, WeatherCollector, WeatherSettings, DEFAULT_WEATHER_URL,
};

/// A source of snapshots for one cache category
#[async_trait]
pub trait Collector: Send + Sync {
    /// The category this collector fills
    fn category(&self) -> CacheCategory;

    /// Gather a fresh snapshot
    ///
    /// May take arbitrarily long; callers bound it with [`run_collector`].
    async fn collect(&self) -> Result<CollectedSnapshot, CollectionError>;
}

/// Settings the host collectors are built from
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CollectorSettings {
    /// Processes kept in the process snapshot
    pub top_processes: usize,
    pub weather: WeatherSettings,
}

impl Default for CollectorSettings {
    fn default() -> Self {
        Self {
            top_processes: DEFAULT_TOP_PROCESSES,
            weather: WeatherSettings::default(),
        }
    }
}

/// Collectors keyed by the category they fill
#[derive(Clone, Default)]
pub struct CollectorRegistry {
    collectors: HashMap<CacheCategory, Arc<dyn Collector>>,
}

impl CollectorRegistry {
    /// An empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// The real host collectors
    ///
    /// A collector that cannot be constructed is left out; dispatches for
    /// its category report it as unavailable.
    pub fn host(settings: &CollectorSettings) -> Self {
        let mut registry = Self::new()
            .with(NetworkCollector::new())
            .with(HardwareCollector::new())
            .with(ProcessCollector::new(settings.top_processes));

        match WeatherCollector::new(settings.weather.clone()) {
            Ok(weather) => registry.register(Arc::new(weather)),
            Err(e) => tracing::warn!(error = %e, "Weather collector disabled"),
        }

        registry
    }

    /// Add a collector, replacing any for the same category
    pub fn register(&mut self, collector: Arc<dyn Collector>) {
        self.collectors.insert(collector.category(), collector);
    }

    /// Builder form of [`CollectorRegistry::register`]
    pub fn with(mut self, collector: impl Collector + 'static) -> Self {
        self.register(Arc::new(collector));
        self
    }

    /// The collector for `category`, if one is registered
    pub fn get(&self, category: CacheCategory) -> Option<Arc<dyn Collector>> {
        self.collectors.get(&category).cloned()
    }

    /// Number of registered collectors
    pub fn len(&self) -> usize {
        self.collectors.len()
    }

    /// True when no collectors are registered
    pub fn is_empty(&self) -> bool {
        self.collectors.is_empty()
    }
}

impl std::fmt::Debug for CollectorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut categories: Vec<_> = self.collectors.keys().collect();
        categories.sort();
        f.debug_struct("CollectorRegistry")
            .field("categories", &categories)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_registry_covers_every_category() {
        let registry = CollectorRegistry::host(&CollectorSettings::default());
        for category in CacheCategory::ALL {
            let collector = registry.get(category).unwrap();
            assert_eq!(collector.category(), category);
        }
        assert_eq!(registry.len(), CacheCategory::ALL.len());
    }

    #[test]
    fn test_register_replaces() {
        let mut registry = CollectorRegistry::new().with(ProcessCollector::new(3));
        registry.register(Arc::new(ProcessCollector::new(5)));
        assert_eq!(registry.len(), 1);
        assert!(registry.get(CacheCategory::Network).is_none());
    }
}
