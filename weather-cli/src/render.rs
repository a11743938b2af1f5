//! Text rendering of the weather view.

use std::fmt::Display;

use chrono::NaiveDateTime;
use weatherstack_core::{ViewState, WeatherRecord, WeatherView, model::MISSING};

pub const TITLE: &str = "Weather Information";
pub const INPUT_LABEL: &str = "Enter city name:";
pub const LOADING_PANEL: &str = "Loading weather data...";

/// Render the whole page: title, form status line and the current panel.
pub fn render_view(view: &WeatherView) -> String {
    let mut out = String::new();
    out.push_str(TITLE);
    out.push('\n');
    out.push_str(&format!("{INPUT_LABEL} {}  [{}]\n", view.city_input(), view.submit_label()));
    out.push('\n');
    out.push_str(&render_state(view.state()));
    out
}

pub fn render_state(state: &ViewState) -> String {
    match state {
        ViewState::Idle => String::new(),
        ViewState::Loading => format!("{LOADING_PANEL}\n"),
        ViewState::Failed(message) => render_error(message),
        ViewState::Success(record) => render_record(record),
    }
}

pub fn render_error(message: &str) -> String {
    format!("Error: {message}\n")
}

pub fn render_record(record: &WeatherRecord) -> String {
    let current = &record.current;
    let location = &record.location;

    let mut lines = vec![
        record.headline(),
        local_time_line(location.local_datetime(), location.localtime.as_deref()),
        String::new(),
    ];

    let description = current.primary_description().unwrap_or(MISSING);
    match current.primary_icon() {
        Some(icon) => lines.push(format!("{description} ({icon})")),
        None => lines.push(description.to_string()),
    }
    lines.push(String::new());

    let wind = match (current.wind_speed, &current.wind_dir) {
        (Some(speed), Some(dir)) => format!("{speed} km/h {dir}"),
        (speed, _) => measure(speed, " km/h"),
    };

    let rows = [
        ("Temperature", measure(current.temperature, "°C")),
        ("Feels Like", measure(current.feelslike, "°C")),
        ("Humidity", measure(current.humidity, "%")),
        ("Wind Speed", wind),
        ("Pressure", measure(current.pressure, " mb")),
        ("Visibility", measure(current.visibility, " km")),
        ("Cloud Cover", measure(current.cloudcover, "%")),
    ];
    let width = rows.iter().map(|(term, _)| term.len()).max().unwrap_or(0);
    for (term, definition) in rows {
        lines.push(format!("  {term:<width$}  {definition}"));
    }

    lines.push(String::new());
    lines.push(format!(
        "Location: {}°N, {}°E",
        location.lat.as_deref().unwrap_or(MISSING),
        location.lon.as_deref().unwrap_or(MISSING),
    ));

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

fn local_time_line(parsed: Option<NaiveDateTime>, raw: Option<&str>) -> String {
    match (parsed, raw) {
        (Some(dt), _) => dt.format("%a %-d %b %Y, %H:%M").to_string(),
        (None, Some(raw)) => raw.to_string(),
        (None, None) => MISSING.to_string(),
    }
}

fn measure<T: Display>(v: Option<T>, unit: &str) -> String {
    match v {
        Some(v) => format!("{v}{unit}"),
        None => MISSING.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn london() -> WeatherRecord {
        serde_json::from_value(serde_json::json!({
            "request": {"query": "London, United Kingdom", "language": "en", "unit": "m"},
            "location": {
                "name": "London", "country": "United Kingdom", "region": "City of London",
                "lat": "51.517", "lon": "-0.106", "timezone_id": "Europe/London",
                "localtime": "2025-01-27 23:23"
            },
            "current": {
                "observation_time": "11:23 PM", "temperature": 8.0, "weather_code": 122,
                "weather_icons": ["https://example.test/cloud.png"],
                "weather_descriptions": ["Overcast"],
                "wind_speed": 15.0, "wind_degree": 270, "wind_dir": "W", "pressure": 1018.0,
                "precip": 0.0, "humidity": 76.0, "cloudcover": 100.0, "feelslike": 5.0,
                "uv_index": 0.0, "visibility": 10.0
            }
        }))
        .expect("fixture should deserialize")
    }

    #[test]
    fn record_panel_contains_header_and_definitions() {
        let out = render_record(&london());

        assert!(out.starts_with("Current Weather in London, United Kingdom\n"));
        assert!(out.contains("Mon 27 Jan 2025, 23:23"));
        assert!(out.contains("Overcast (https://example.test/cloud.png)"));
        assert!(out.contains("Temperature  8°C"));
        assert!(out.contains("Feels Like   5°C"));
        assert!(out.contains("Humidity     76%"));
        assert!(out.contains("Wind Speed   15 km/h W"));
        assert!(out.contains("Pressure     1018 mb"));
        assert!(out.contains("Visibility   10 km"));
        assert!(out.contains("Cloud Cover  100%"));
        assert!(out.contains("Location: 51.517°N, -0.106°E"));
    }

    #[test]
    fn missing_values_render_as_placeholder() {
        let mut record = london();
        record.current.humidity = None;
        record.current.wind_dir = None;
        record.current.weather_icons = None;
        record.location.localtime = Some("sometime".into());

        let out = render_record(&record);
        assert!(out.contains("Humidity     N/A\n"));
        assert!(out.contains("Wind Speed   15 km/h\n"));
        assert!(out.contains("\nOvercast\n"));
        assert!(out.contains("\nsometime\n"));
    }

    #[test]
    fn page_shows_form_line_and_submit_label() {
        let provider = weatherstack_core::WeatherstackProvider::new("KEY".into());
        let mut view = WeatherView::new(Box::new(provider), "London");

        let idle = render_view(&view);
        assert!(idle.starts_with("Weather Information\n"));
        assert!(idle.contains("Enter city name: London  [Get Weather]"));

        view.begin_fetch("Paris");
        let loading = render_view(&view);
        assert!(loading.contains("Enter city name: London  [Loading...]"));
        assert!(loading.ends_with("Loading weather data...\n"));
    }

    #[test]
    fn error_and_loading_panels() {
        assert_eq!(render_state(&ViewState::Failed("X".into())), "Error: X\n");
        assert_eq!(render_state(&ViewState::Loading), "Loading weather data...\n");
        assert_eq!(render_state(&ViewState::Idle), "");
    }
}
