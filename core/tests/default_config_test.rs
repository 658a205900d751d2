//! Startup configuration from the default location
//!
//! Kept in its own test binary: it points `XDG_CONFIG_HOME` at a temporary
//! directory, which would race with any other test reading the environment.

#![cfg(target_os = "linux")]

use std::time::Duration;

use pretty_assertions::assert_eq;
use tempfile::TempDir;

use skyfetch_core::{config_path, default_config_path, load_config_or_default, ConfigSource};

#[test]
fn test_startup_reads_default_config_file() {
    let dir = TempDir::new().unwrap();
    std::env::set_var("XDG_CONFIG_HOME", dir.path());
    std::env::remove_var("SKYFETCH_FPS");

    let path = default_config_path().expect("config dir should resolve");
    assert_eq!(path, dir.path().join("skyfetch").join("config.toml"));
    assert_eq!(config_path(None), Some(path.clone()));

    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, "[display]\nfps = 9\n\n[cache]\nweather_ttl_secs = 90\n").unwrap();

    let config = load_config_or_default(None);
    assert_eq!(config.display.fps, 9);
    assert_eq!(config.cache.ttls.weather, Duration::from_secs(90));
    assert_eq!(config.config_file_path.as_deref(), Some(path.as_path()));
    assert_eq!(config.source(), ConfigSource::File);

    // An explicit path replaces the default file rather than merging with it
    let other = dir.path().join("other.toml");
    std::fs::write(&other, "[display]\nfps = 3\n").unwrap();
    let config = load_config_or_default(Some(&other));
    assert_eq!(config.display.fps, 3);
    assert_eq!(config.cache.ttls.weather, Duration::from_secs(30));
}
