use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Format of `location.localtime` as delivered by weatherstack, e.g. "2025-01-27 23:23".
pub const LOCALTIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Placeholder shown for values the provider did not send.
pub const MISSING: &str = "N/A";

/// Trim a user-entered city name, rejecting empty input.
pub fn normalize_city(input: &str) -> Option<&str> {
    let trimmed = input.trim();
    if trimmed.is_empty() { None } else { Some(trimmed) }
}

/// Current conditions for one city, as shown by the view.
///
/// Built only from a provider response that carried all three sections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherRecord {
    pub request: RequestInfo,
    pub location: Location,
    pub current: Current,
}

impl WeatherRecord {
    /// Result panel header, e.g. "Current Weather in London, United Kingdom".
    pub fn headline(&self) -> String {
        format!(
            "Current Weather in {}, {}",
            self.location.name.as_deref().unwrap_or(MISSING),
            self.location.country.as_deref().unwrap_or(MISSING),
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RequestInfo {
    pub query: Option<String>,
    pub language: Option<String>,
    pub unit: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub name: Option<String>,
    pub country: Option<String>,
    pub region: Option<String>,
    pub lat: Option<String>,
    pub lon: Option<String>,
    pub timezone_id: Option<String>,
    pub localtime: Option<String>,
}

impl Location {
    /// Parsed `localtime`, if present and well-formed.
    pub fn local_datetime(&self) -> Option<NaiveDateTime> {
        let raw = self.localtime.as_deref()?;
        NaiveDateTime::parse_from_str(raw, LOCALTIME_FORMAT).ok()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Current {
    pub observation_time: Option<String>,
    pub temperature: Option<f64>,
    pub weather_code: Option<i64>,
    pub weather_icons: Option<Vec<String>>,
    pub weather_descriptions: Option<Vec<String>>,
    pub wind_speed: Option<f64>,
    pub wind_degree: Option<i64>,
    pub wind_dir: Option<String>,
    pub pressure: Option<f64>,
    pub precip: Option<f64>,
    pub humidity: Option<f64>,
    pub cloudcover: Option<f64>,
    pub feelslike: Option<f64>,
    pub uv_index: Option<f64>,
    pub visibility: Option<f64>,
}

impl Current {
    pub fn primary_icon(&self) -> Option<&str> {
        self.weather_icons.as_ref()?.first().map(String::as_str)
    }

    pub fn primary_description(&self) -> Option<&str> {
        self.weather_descriptions.as_ref()?.first().map(String::as_str)
    }
}
