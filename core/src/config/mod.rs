//! TOML Configuration File Support
//!
//! Dashboard configuration lives at `~/.config/skyfetch/config.toml`.
//!
//! # Configuration Priority
//!
//! Values are loaded with the following priority (highest first):
//! 1. CLI arguments ([`ConfigOverrides`])
//! 2. Environment variables (`SKYFETCH_*`)
//! 3. TOML configuration file
//! 4. Default values
//!
//! # Example Configuration
//!
//! ```toml
//! [display]
//! fps = 5
//! show_weather = true
//!
//! [animation]
//! frame_file = "~/frames/storm.cast"  # a leading ~ is the home directory
//! loop_animation = true
//! min_frame_interval_ms = 100
//!
//! [tabs]
//! order = ["standard", "processes", "network"]
//! default = "processes"
//!
//! [cache]
//! weather_ttl_secs = 60
//! collector_timeout_ms = 2500
//!
//! [weather]
//! location = "Oslo"
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cache::CacheTtls;
use crate::collectors::{CollectorSettings, DEFAULT_COLLECTOR_TIMEOUT};
use crate::frames::RecordingOptions;
use crate::playback::PlaybackOptions;

/// Frames per second when nothing else is configured
pub const DEFAULT_FPS: u32 = 5;

/// Interval between cache refresh passes
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(1);

/// Interval between system summary refreshes
pub const DEFAULT_SYSTEM_INTERVAL: Duration = Duration::from_secs(10);

/// Tab ids in their default order
pub const DEFAULT_TAB_ORDER: [&str; 5] = ["standard", "network", "hardware", "processes", "weather"];

// =============================================================================
// Error Types
// =============================================================================

/// Errors that can occur when loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("failed to read config file at {path}: {source}")]
    Read {
        /// The path that was attempted
        path: PathBuf,
        /// The underlying IO error
        source: std::io::Error,
    },

    /// Failed to parse TOML
    #[error("failed to parse TOML config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Invalid configuration value
    #[error("invalid configuration: {0}")]
    Validation(String),
}

// =============================================================================
// Configuration Source Tracking
// =============================================================================

/// Tracks where a configuration value came from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Value from command-line argument
    Cli,
    /// Value from environment variable
    Env,
    /// Value from TOML configuration file
    File,
    /// Default value
    Default,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cli => write!(f, "CLI"),
            Self::Env => write!(f, "environment"),
            Self::File => write!(f, "config file"),
            Self::Default => write!(f, "default"),
        }
    }
}

// =============================================================================
// TOML Configuration Structures
// =============================================================================

/// `[display]` section
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayToml {
    pub fps: Option<u32>,
    pub static_mode: Option<bool>,
    pub hide_animation: Option<bool>,
    pub show_os: Option<bool>,
    pub show_hostname: Option<bool>,
    pub show_cpu: Option<bool>,
    pub show_memory: Option<bool>,
    pub show_disk: Option<bool>,
    pub show_uptime: Option<bool>,
    pub show_fps_counter: Option<bool>,
    pub show_weather: Option<bool>,
}

/// `[animation]` section
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationToml {
    /// Frame file; an empty string means "none"
    pub frame_file: Option<String>,
    pub loop_animation: Option<bool>,
    /// Frame interval, overriding `display.fps`
    pub rate_ms: Option<u64>,
    pub min_frame_interval_ms: Option<u64>,
    pub min_visible_chars: Option<usize>,
}

/// `[tabs]` section
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TabsToml {
    pub enabled: Option<bool>,
    pub visible: Option<Vec<String>>,
    pub order: Option<Vec<String>>,
    pub default: Option<String>,
}

/// `[cache]` section
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheToml {
    pub network_ttl_secs: Option<u64>,
    pub hardware_ttl_secs: Option<u64>,
    pub process_ttl_secs: Option<u64>,
    pub weather_ttl_secs: Option<u64>,
    pub collector_timeout_ms: Option<u64>,
    pub refresh_interval_ms: Option<u64>,
    pub system_interval_secs: Option<u64>,
    pub top_processes: Option<usize>,
}

/// `[weather]` section
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherToml {
    pub location: Option<String>,
    pub url: Option<String>,
    pub request_timeout_ms: Option<u64>,
}

/// Top-level TOML configuration structure
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SkyfetchToml {
    pub display: DisplayToml,
    pub animation: AnimationToml,
    pub tabs: TabsToml,
    pub cache: CacheToml,
    pub weather: WeatherToml,
}

// =============================================================================
// Main Configuration Struct
// =============================================================================

/// What the dashboard draws
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DisplayConfig {
    pub fps: u32,
    /// Render once and never tick
    pub static_mode: bool,
    /// Show only the info panel
    pub hide_animation: bool,
    pub show_os: bool,
    pub show_hostname: bool,
    pub show_cpu: bool,
    pub show_memory: bool,
    pub show_disk: bool,
    pub show_uptime: bool,
    pub show_fps_counter: bool,
    pub show_weather: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            fps: DEFAULT_FPS,
            static_mode: false,
            hide_animation: false,
            show_os: true,
            show_hostname: true,
            show_cpu: true,
            show_memory: true,
            show_disk: true,
            show_uptime: true,
            show_fps_counter: false,
            show_weather: false,
        }
    }
}

/// Where frames come from and how they play
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnimationConfig {
    pub frame_file: Option<PathBuf>,
    pub loop_animation: bool,
    /// Explicit frame interval; `None` derives it from `display.fps`
    pub rate: Option<Duration>,
    pub recording: RecordingOptions,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            frame_file: None,
            loop_animation: true,
            rate: None,
            recording: RecordingOptions::default(),
        }
    }
}

/// Which views exist and which starts active
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TabsConfig {
    /// With tabs disabled only the standard view is shown
    pub enabled: bool,
    pub visible: Vec<String>,
    pub order: Vec<String>,
    pub default: String,
}

impl Default for TabsConfig {
    fn default() -> Self {
        let all: Vec<String> = DEFAULT_TAB_ORDER.iter().map(|s| s.to_string()).collect();
        Self {
            enabled: true,
            visible: all.clone(),
            order: all,
            default: "standard".to_string(),
        }
    }
}

/// Snapshot cache and collector timing
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CacheConfig {
    pub ttls: CacheTtls,
    pub collector_timeout: Duration,
    pub refresh_interval: Duration,
    pub system_interval: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttls: CacheTtls::default(),
            collector_timeout: DEFAULT_COLLECTOR_TIMEOUT,
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
            system_interval: DEFAULT_SYSTEM_INTERVAL,
        }
    }
}

/// Centralized configuration for the dashboard
///
/// Use [`load_config`] to load with priority handling, then apply
/// [`ConfigOverrides`] from the command line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SkyfetchConfig {
    pub display: DisplayConfig,
    pub animation: AnimationConfig,
    pub tabs: TabsConfig,
    pub cache: CacheConfig,
    pub collectors: CollectorSettings,

    /// Path to the config file that was loaded (if any)
    pub config_file_path: Option<PathBuf>,

    /// Highest-priority source that set a value
    source: ConfigSource,
}

impl Default for SkyfetchConfig {
    fn default() -> Self {
        Self {
            display: DisplayConfig::default(),
            animation: AnimationConfig::default(),
            tabs: TabsConfig::default(),
            cache: CacheConfig::default(),
            collectors: CollectorSettings::default(),
            config_file_path: None,
            source: ConfigSource::Default,
        }
    }
}

impl SkyfetchConfig {
    /// Create a new configuration with default values
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the primary source of this configuration
    #[must_use]
    pub fn source(&self) -> ConfigSource {
        self.source
    }

    /// Set the configuration source
    pub fn set_source(&mut self, source: ConfigSource) {
        self.source = source;
    }

    /// Interval between animation frames
    ///
    /// An explicit rate wins; otherwise it is derived from `fps`.
    pub fn frame_rate(&self) -> Duration {
        self.animation
            .rate
            .unwrap_or_else(|| Duration::from_millis(1000 / u64::from(self.display.fps.max(1))))
    }

    /// Playback settings derived from display and animation settings
    pub fn playback_options(&self) -> PlaybackOptions {
        PlaybackOptions {
            rate: self.frame_rate(),
            looping: self.animation.loop_animation,
            one_shot: self.display.static_mode,
        }
    }

    /// Reject values the dashboard cannot run with
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] naming the offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.display.fps == 0 {
            return Err(ConfigError::Validation("display.fps must be at least 1".into()));
        }
        if self.animation.rate == Some(Duration::ZERO) {
            return Err(ConfigError::Validation("animation.rate must be positive".into()));
        }
        if self.cache.collector_timeout.is_zero() {
            return Err(ConfigError::Validation(
                "cache.collector_timeout_ms must be positive".into(),
            ));
        }
        if self.cache.refresh_interval.is_zero() {
            return Err(ConfigError::Validation(
                "cache.refresh_interval_ms must be positive".into(),
            ));
        }
        if self.cache.system_interval.is_zero() {
            return Err(ConfigError::Validation(
                "cache.system_interval_secs must be positive".into(),
            ));
        }
        Ok(())
    }
}

// =============================================================================
// Configuration Loading
// =============================================================================

/// Get the default configuration file path
///
/// Returns `$XDG_CONFIG_HOME/skyfetch/config.toml` or
/// `~/.config/skyfetch/config.toml` if `XDG_CONFIG_HOME` is not set.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("skyfetch").join("config.toml"))
}

/// Load configuration from the default path and the process environment
///
/// # Errors
///
/// Returns an error if the config file exists but cannot be read, parsed,
/// or validated. A missing config file is not an error.
pub fn load_config() -> Result<SkyfetchConfig, ConfigError> {
    load_config_from_path(default_config_path().as_deref())
}

/// Load configuration from a specific path and the process environment
///
/// # Errors
///
/// Returns an error if the specified config file cannot be read, parsed,
/// or validated.
pub fn load_config_from_path(path: Option<&Path>) -> Result<SkyfetchConfig, ConfigError> {
    load_config_with_env(path, |key| std::env::var(key).ok())
}

/// Load configuration with a custom environment lookup
///
/// # Errors
///
/// Same as [`load_config_from_path`].
pub fn load_config_with_env<F>(path: Option<&Path>, env: F) -> Result<SkyfetchConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = read_config_file(path)?;
    apply_env_config(&mut config, env);
    config.validate()?;

    Ok(config)
}

/// The file the binary reads: `explicit` if given, else [`default_config_path`]
#[must_use]
pub fn config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    explicit.map(Path::to_path_buf).or_else(default_config_path)
}

/// Startup configuration for the binary
///
/// Reads `explicit` or the default config file, layers the process
/// environment on top, and never fails. See [`load_config_or_default_with_env`].
#[must_use]
pub fn load_config_or_default(explicit: Option<&Path>) -> SkyfetchConfig {
    load_config_or_default_with_env(config_path(explicit).as_deref(), |key| {
        std::env::var(key).ok()
    })
}

/// Lenient loading with a custom environment lookup
///
/// An unreadable or invalid file is replaced by the defaults, and the
/// environment still applies on top of them. Environment values that make
/// the result invalid are dropped as a whole, keeping the file's values.
#[must_use]
pub fn load_config_or_default_with_env<F>(path: Option<&Path>, env: F) -> SkyfetchConfig
where
    F: Fn(&str) -> Option<String>,
{
    let base = match read_config_file(path).and_then(|c| c.validate().map(|()| c)) {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!(error = %e, "Config file unusable, using defaults");
            SkyfetchConfig::default()
        }
    };

    let mut config = base.clone();
    apply_env_config(&mut config, env);
    match config.validate() {
        Ok(()) => config,
        Err(e) => {
            tracing::warn!(error = %e, "Ignoring environment overrides");
            base
        }
    }
}

/// Defaults overlaid with the TOML file at `path`, if it exists
fn read_config_file(path: Option<&Path>) -> Result<SkyfetchConfig, ConfigError> {
    let mut config = SkyfetchConfig::default();

    if let Some(config_path) = path {
        if config_path.exists() {
            let toml_content =
                std::fs::read_to_string(config_path).map_err(|e| ConfigError::Read {
                    path: config_path.to_path_buf(),
                    source: e,
                })?;

            let toml_config: SkyfetchToml = toml::from_str(&toml_content)?;
            apply_toml_config(&mut config, &toml_config);
            config.config_file_path = Some(config_path.to_path_buf());
            config.source = ConfigSource::File;

            tracing::info!(
                path = %config_path.display(),
                "Loaded configuration from file"
            );
        } else {
            tracing::debug!(
                path = %config_path.display(),
                "Config file not found, using defaults"
            );
        }
    }

    Ok(config)
}

/// Apply TOML configuration values to the config struct
fn apply_toml_config(config: &mut SkyfetchConfig, toml: &SkyfetchToml) {
    // Display
    let display = &toml.display;
    let d = &mut config.display;
    set(&mut d.fps, display.fps);
    set(&mut d.static_mode, display.static_mode);
    set(&mut d.hide_animation, display.hide_animation);
    set(&mut d.show_os, display.show_os);
    set(&mut d.show_hostname, display.show_hostname);
    set(&mut d.show_cpu, display.show_cpu);
    set(&mut d.show_memory, display.show_memory);
    set(&mut d.show_disk, display.show_disk);
    set(&mut d.show_uptime, display.show_uptime);
    set(&mut d.show_fps_counter, display.show_fps_counter);
    set(&mut d.show_weather, display.show_weather);

    // Animation
    let animation = &toml.animation;
    if let Some(ref file) = animation.frame_file {
        config.animation.frame_file = non_empty_path(file);
    }
    set(&mut config.animation.loop_animation, animation.loop_animation);
    if let Some(ms) = animation.rate_ms {
        config.animation.rate = Some(Duration::from_millis(ms));
    }
    if let Some(ms) = animation.min_frame_interval_ms {
        config.animation.recording.min_frame_interval = Duration::from_millis(ms);
    }
    set(
        &mut config.animation.recording.min_visible_chars,
        animation.min_visible_chars,
    );

    // Tabs
    let tabs = &toml.tabs;
    set(&mut config.tabs.enabled, tabs.enabled);
    if let Some(ref visible) = tabs.visible {
        if !visible.is_empty() {
            config.tabs.visible = visible.clone();
        }
    }
    if let Some(ref order) = tabs.order {
        if !order.is_empty() {
            config.tabs.order = order.clone();
        }
    }
    if let Some(ref default) = tabs.default {
        if !default.is_empty() {
            config.tabs.default = default.clone();
        }
    }

    // Cache
    let cache = &toml.cache;
    let ttls = &mut config.cache.ttls;
    set_secs(&mut ttls.network, cache.network_ttl_secs);
    set_secs(&mut ttls.hardware, cache.hardware_ttl_secs);
    set_secs(&mut ttls.process, cache.process_ttl_secs);
    set_secs(&mut ttls.weather, cache.weather_ttl_secs);
    set_millis(&mut config.cache.collector_timeout, cache.collector_timeout_ms);
    set_millis(&mut config.cache.refresh_interval, cache.refresh_interval_ms);
    set_secs(&mut config.cache.system_interval, cache.system_interval_secs);
    set(&mut config.collectors.top_processes, cache.top_processes);

    // Weather
    let weather = &toml.weather;
    if let Some(ref location) = weather.location {
        config.collectors.weather.location = non_empty(location);
    }
    if let Some(ref url) = weather.url {
        if !url.trim().is_empty() {
            config.collectors.weather.base_url = url.trim().to_string();
        }
    }
    set_millis(
        &mut config.collectors.weather.request_timeout,
        weather.request_timeout_ms,
    );
}

/// Apply environment variable overrides to the config
fn apply_env_config<F>(config: &mut SkyfetchConfig, env: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(fps) = env("SKYFETCH_FPS") {
        match fps.trim().parse::<u32>() {
            Ok(fps) => {
                config.display.fps = fps;
                config.source = ConfigSource::Env;
            }
            Err(_) => tracing::warn!(value = %fps, "Ignoring invalid SKYFETCH_FPS"),
        }
    }
    if let Some(file) = env("SKYFETCH_FRAME_FILE") {
        config.animation.frame_file = non_empty_path(&file);
        config.source = ConfigSource::Env;
    }
    if let Some(value) = env("SKYFETCH_STATIC") {
        config.display.static_mode = parse_flag(&value);
        config.source = ConfigSource::Env;
    }
    if let Some(value) = env("SKYFETCH_LOOP") {
        config.animation.loop_animation = parse_flag(&value);
        config.source = ConfigSource::Env;
    }
    if let Some(timeout) = env("SKYFETCH_COLLECTOR_TIMEOUT_MS") {
        match timeout.trim().parse::<u64>() {
            Ok(ms) => {
                config.cache.collector_timeout = Duration::from_millis(ms);
                config.source = ConfigSource::Env;
            }
            Err(_) => {
                tracing::warn!(value = %timeout, "Ignoring invalid SKYFETCH_COLLECTOR_TIMEOUT_MS")
            }
        }
    }
    if let Some(value) = env("SKYFETCH_WEATHER") {
        config.display.show_weather = parse_flag(&value);
        config.source = ConfigSource::Env;
    }
    if let Some(location) = env("SKYFETCH_WEATHER_LOCATION") {
        config.collectors.weather.location = non_empty(&location);
        config.source = ConfigSource::Env;
    }
}

fn set<T>(target: &mut T, value: Option<T>) {
    if let Some(v) = value {
        *target = v;
    }
}

fn set_secs(target: &mut Duration, value: Option<u64>) {
    set(target, value.map(Duration::from_secs));
}

fn set_millis(target: &mut Duration, value: Option<u64>) {
    set(target, value.map(Duration::from_millis));
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

fn non_empty_path(value: &str) -> Option<PathBuf> {
    non_empty(value).map(|v| expand_home(&v))
}

/// Expand a leading `~` to the home directory
fn expand_home(value: &str) -> PathBuf {
    let rest = match value.strip_prefix('~') {
        Some(rest) if rest.is_empty() || rest.starts_with('/') => rest.trim_start_matches('/'),
        _ => return PathBuf::from(value),
    };
    match dirs::home_dir() {
        Some(home) if rest.is_empty() => home,
        Some(home) => home.join(rest),
        None => PathBuf::from(value),
    }
}

fn parse_flag(value: &str) -> bool {
    let value = value.trim();
    value != "0" && !value.eq_ignore_ascii_case("false") && !value.eq_ignore_ascii_case("no")
}

/// Parse an interval like `150ms`, `1s`, `1.5s` or `2m`
///
/// Returns `None` for anything else, including zero.
pub fn parse_interval(value: &str) -> Option<Duration> {
    let value = value.trim();
    let split = value
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(value.len());
    let (number, unit) = value.split_at(split);
    let number: f64 = number.parse().ok()?;

    let secs = match unit {
        "ms" => number / 1000.0,
        "s" => number,
        "m" => number * 60.0,
        _ => return None,
    };
    if !secs.is_finite() || secs <= 0.0 {
        return None;
    }
    Duration::try_from_secs_f64(secs).ok()
}

// =============================================================================
// CLI Override Support
// =============================================================================

/// Command-line overrides, applied after [`load_config`]
#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub frame_file: Option<PathBuf>,
    pub rate: Option<Duration>,
    pub fps: Option<u32>,
    pub static_mode: Option<bool>,
    pub loop_animation: Option<bool>,
    pub hide_animation: Option<bool>,
    pub tabs_enabled: Option<bool>,
}

impl ConfigOverrides {
    /// Create a new empty set of overrides
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set frame file override
    #[must_use]
    pub fn with_frame_file(mut self, path: PathBuf) -> Self {
        self.frame_file = Some(path);
        self
    }

    /// Set frame interval override
    #[must_use]
    pub fn with_rate(mut self, rate: Duration) -> Self {
        self.rate = Some(rate);
        self
    }

    /// Set fps override
    #[must_use]
    pub fn with_fps(mut self, fps: u32) -> Self {
        self.fps = Some(fps);
        self
    }

    /// Set static mode override
    #[must_use]
    pub fn with_static_mode(mut self, enabled: bool) -> Self {
        self.static_mode = Some(enabled);
        self
    }

    /// Set looping override
    #[must_use]
    pub fn with_loop_animation(mut self, enabled: bool) -> Self {
        self.loop_animation = Some(enabled);
        self
    }

    /// Set hide-animation override
    #[must_use]
    pub fn with_hide_animation(mut self, enabled: bool) -> Self {
        self.hide_animation = Some(enabled);
        self
    }

    /// Set tabs override
    #[must_use]
    pub fn with_tabs_enabled(mut self, enabled: bool) -> Self {
        self.tabs_enabled = Some(enabled);
        self
    }

    fn is_empty(&self) -> bool {
        self.frame_file.is_none()
            && self.rate.is_none()
            && self.fps.is_none()
            && self.static_mode.is_none()
            && self.loop_animation.is_none()
            && self.hide_animation.is_none()
            && self.tabs_enabled.is_none()
    }

    /// Apply overrides to a configuration
    ///
    /// The CLI frame file is not written into `animation.frame_file`: the
    /// dashboard tries it first and keeps the configured file as a fallback.
    pub fn apply(&self, config: &mut SkyfetchConfig) {
        if !self.is_empty() {
            config.source = ConfigSource::Cli;
        }

        if let Some(fps) = self.fps {
            config.display.fps = fps;
            config.animation.rate = None;
        }
        if let Some(rate) = self.rate {
            config.animation.rate = Some(rate);
        }
        set(&mut config.display.static_mode, self.static_mode);
        set(&mut config.animation.loop_animation, self.loop_animation);
        set(&mut config.display.hide_animation, self.hide_animation);
        set(&mut config.tabs.enabled, self.tabs_enabled);
    }
}

// =============================================================================
// Tests
// =============================================================================
