use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::{
    config::Config,
    error::FetchError,
    model::{Current, Location, RequestInfo, WeatherRecord},
};

use super::WeatherProvider;

/// Client for weatherstack's `current` endpoint.
#[derive(Debug, Clone)]
pub struct WeatherstackProvider {
    access_key: String,
    base_url: String,
    units: String,
    http: Client,
}

impl WeatherstackProvider {
    pub fn new(access_key: String) -> Self {
        Self::from_parts(access_key, crate::config::DEFAULT_BASE_URL, crate::config::DEFAULT_UNITS)
    }

    pub fn with_config(access_key: String, config: &Config) -> Self {
        Self::from_parts(access_key, config.base_url(), config.units())
    }

    fn from_parts(access_key: String, base_url: &str, units: &str) -> Self {
        Self {
            access_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            units: units.to_string(),
            http: Client::new(),
        }
    }

    pub fn endpoint(&self) -> String {
        format!("{}/current", self.base_url)
    }
}

#[async_trait]
impl WeatherProvider for WeatherstackProvider {
    async fn fetch_weather(&self, city: &str) -> Result<WeatherRecord, FetchError> {
        let url = self.endpoint();
        debug!(%url, city, units = %self.units, "requesting current weather");

        let res = self
            .http
            .get(&url)
            .query(&[
                ("access_key", self.access_key.as_str()),
                ("query", city),
                ("units", self.units.as_str()),
            ])
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "weatherstack request failed to send");
                FetchError::Network(e.to_string())
            })?;

        let status = res.status();
        if !status.is_success() {
            warn!(%status, city, "weatherstack returned non-success status");
            return Err(FetchError::city_not_found());
        }

        let body = res.text().await.map_err(|e| FetchError::Network(e.to_string()))?;

        let record = parse_current(&body)?;
        debug!(city, location = ?record.location.name, "weather record transformed");
        Ok(record)
    }
}

/// Decode a `current` response body and map it into a [`WeatherRecord`].
///
/// The provider error flag is checked on the untyped body, so an error
/// response is reported as such whatever shape its other fields have.
pub fn parse_current(body: &str) -> Result<WeatherRecord, FetchError> {
    let value: Value =
        serde_json::from_str(body).map_err(|e| FetchError::transform(e.to_string()))?;

    if let Some(error) = reported_error(&value) {
        warn!(code = %error["code"], kind = %error["type"], "weatherstack reported an error");
        let info = error.get("info").and_then(Value::as_str).map(str::to_string);
        return Err(FetchError::api(info));
    }

    let parsed: WsResponse =
        serde_json::from_value(value).map_err(|e| FetchError::transform(e.to_string()))?;

    WeatherRecord::try_from(parsed)
}

/// The `error` object, unless `success` is explicitly true.
fn reported_error(value: &Value) -> Option<&Value> {
    if value.get("success").and_then(Value::as_bool) == Some(true) {
        return None;
    }
    value.get("error").filter(|e| !e.is_null())
}

#[derive(Debug, Deserialize)]
struct WsRequest {
    query: Option<String>,
    language: Option<String>,
    unit: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WsLocation {
    name: Option<String>,
    country: Option<String>,
    region: Option<String>,
    lat: Option<String>,
    lon: Option<String>,
    timezone_id: Option<String>,
    localtime: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WsCurrent {
    observation_time: Option<String>,
    temperature: Option<f64>,
    weather_code: Option<i64>,
    weather_icons: Option<Vec<String>>,
    weather_descriptions: Option<Vec<String>>,
    wind_speed: Option<f64>,
    wind_degree: Option<i64>,
    wind_dir: Option<String>,
    pressure: Option<f64>,
    precip: Option<f64>,
    humidity: Option<f64>,
    cloudcover: Option<f64>,
    feelslike: Option<f64>,
    uv_index: Option<f64>,
    visibility: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct WsResponse {
    request: Option<WsRequest>,
    location: Option<WsLocation>,
    current: Option<WsCurrent>,
}

impl TryFrom<WsResponse> for WeatherRecord {
    type Error = FetchError;

    fn try_from(value: WsResponse) -> Result<Self, Self::Error> {
        let missing = |section: &str| {
            FetchError::transform(format!("provider response has no `{section}` section"))
        };

        let request = value.request.ok_or_else(|| missing("request"))?;
        let location = value.location.ok_or_else(|| missing("location"))?;
        let current = value.current.ok_or_else(|| missing("current"))?;

        Ok(WeatherRecord {
            request: RequestInfo {
                query: request.query,
                language: request.language,
                unit: request.unit,
            },
            location: Location {
                name: location.name,
                country: location.country,
                region: location.region,
                lat: location.lat,
                lon: location.lon,
                timezone_id: location.timezone_id,
                localtime: location.localtime,
            },
            current: Current {
                observation_time: current.observation_time,
                temperature: current.temperature,
                weather_code: current.weather_code,
                weather_icons: current.weather_icons,
                weather_descriptions: current.weather_descriptions,
                wind_speed: current.wind_speed,
                wind_degree: current.wind_degree,
                wind_dir: current.wind_dir,
                pressure: current.pressure,
                precip: current.precip,
                humidity: current.humidity,
                cloudcover: current.cloudcover,
                feelslike: current.feelslike,
                uv_index: current.uv_index,
                visibility: current.visibility,
            },
        })
    }
}
