//! Weather collector
//!
//! Queries a wttr.in-compatible service: a one-line summary from
//! `?format=%C+%t` and a three-day text forecast from `?days=3`. The service
//! only returns plain text to curl-like user agents, so one is sent.

use std::time::Duration;

use async_trait::async_trait;

use super::{CollectedSnapshot, CollectionError, Collector, WeatherInfo};
use crate::cache::CacheCategory;
use crate::frames::strip_control_sequences;

/// Default service endpoint
pub const DEFAULT_WEATHER_URL: &str = "https://wttr.in";

/// User agent that makes the service answer in plain text
const USER_AGENT: &str = "curl/7.68.0";

/// Lines of service chrome dropped from the forecast
const FORECAST_NOISE: [&str; 3] = ["Location:", "Follow @igor_chubin", "Weather report:"];

/// Where and how to fetch weather
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WeatherSettings {
    /// Service base URL
    pub base_url: String,
    /// Location to query; `None` lets the service geolocate
    pub location: Option<String>,
    /// Per-request timeout
    pub request_timeout: Duration,
}

impl Default for WeatherSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_WEATHER_URL.to_string(),
            location: None,
            request_timeout: Duration::from_secs(3),
        }
    }
}

/// Collects [`WeatherInfo`]
#[derive(Clone, Debug)]
pub struct WeatherCollector {
    settings: WeatherSettings,
    client: reqwest::Client,
}

impl WeatherCollector {
    /// Create a collector with its own HTTP client
    pub fn new(settings: WeatherSettings) -> Result<Self, CollectionError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(settings.request_timeout)
            .build()?;
        Ok(Self { settings, client })
    }

    fn url(&self, query: &str) -> String {
        let base = self.settings.base_url.trim_end_matches('/');
        let location = self.settings.location.as_deref().unwrap_or("");
        format!("{base}/{location}?{query}")
    }

    async fn fetch(&self, query: &str) -> Result<String, CollectionError> {
        let response = self
            .client
            .get(self.url(query))
            .send()
            .await?
            .error_for_status()?;
        Ok(response.text().await?)
    }
}

#[async_trait]
impl Collector for WeatherCollector {
    fn category(&self) -> CacheCategory {
        CacheCategory::Weather
    }

    async fn collect(&self) -> Result<CollectedSnapshot, CollectionError> {
        let (current, forecast) = tokio::join!(
            self.fetch("format=%C+%t"),
            self.fetch("days=3"),
        );

        let current = parse_current(&current?)
            .ok_or_else(|| CollectionError::parse("weather summary", "empty response"))?;

        let forecast = match forecast {
            Ok(body) => parse_forecast(&body),
            Err(e) => {
                tracing::debug!(error = %e, "Forecast unavailable");
                Vec::new()
            }
        };

        Ok(CollectedSnapshot::Weather(WeatherInfo {
            current,
            forecast,
            location: self
                .settings
                .location
                .clone()
                .unwrap_or_else(|| "Auto-detected".to_string()),
        }))
    }
}

/// One-line summary, or `None` when the body is blank
pub fn parse_current(body: &str) -> Option<String> {
    let summary = body
        .split(['\r', '\n'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    (!summary.is_empty()).then_some(summary)
}

/// Forecast lines with colors removed and service chrome filtered out
pub fn parse_forecast(body: &str) -> Vec<String> {
    strip_control_sequences(body)
        .lines()
        .map(|l| l.trim_end())
        .filter(|l| !l.is_empty())
        .filter(|l| !FORECAST_NOISE.iter().any(|noise| l.contains(noise)))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_current_summary() {
        assert_eq!(parse_current("Partly cloudy +12°C\n").as_deref(), Some("Partly cloudy +12°C"));
        assert_eq!(parse_current("Rain\r\n+8°C").as_deref(), Some("Rain +8°C"));
        assert_eq!(parse_current("  \n"), None);
    }

    #[test]
    fn test_forecast_filtering() {
        let body = "Weather report: Berlin\n\
                    \n\
                    \x1b[38;5;226m    \\   /  \x1b[0m   Sunny\n\
                    \x1b[38;5;226m     .-.   \x1b[0m   +21(23) °C\r\n\
                    Location: Berlin, Germany [52.5,13.4]\n\
                    \n\
                    Follow @igor_chubin for wttr.in updates\n";
        assert_eq!(
            parse_forecast(body),
            vec!["    \\   /     Sunny", "     .-.      +21(23) °C"]
        );
    }

    #[test]
    fn test_url_with_location() {
        let collector = WeatherCollector::new(WeatherSettings {
            base_url: "https://example.test/".to_string(),
            location: Some("Oslo".to_string()),
            ..WeatherSettings::default()
        })
        .unwrap();
        assert_eq!(collector.url("days=3"), "https://example.test/Oslo?days=3");

        let auto = WeatherCollector::new(WeatherSettings::default()).unwrap();
        assert_eq!(auto.url("format=%C+%t"), "https://wttr.in/?format=%C+%t");
    }
}
