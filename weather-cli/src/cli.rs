use anyhow::{Context, anyhow};
use clap::{Parser, Subcommand};
use inquire::{InquireError, Password, PasswordDisplayMode, Text};
use std::process::ExitCode;
use tracing::debug;
use weatherstack_core::{
    Config, FetchError, PendingFetch, WeatherProvider, WeatherRecord, WeatherView,
    model::normalize_city, provider_from_config,
};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weatherstack", version, about = "Current weather from weatherstack")]
pub struct Cli {
    /// Log debug output to stderr (overridden by RUST_LOG).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the weatherstack access key (and optionally a default city).
    Configure,

    /// Prompt for cities repeatedly, starting with the default city (the default command).
    Interactive,

    /// Show current weather for one city.
    Show {
        /// City name, e.g. "London" or "New York".
        city: String,

        /// Print the record as JSON instead of the text panel.
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<ExitCode> {
        match self.command.unwrap_or(Command::Interactive) {
            Command::Configure => configure().map(|()| ExitCode::SUCCESS),
            Command::Interactive => interactive().await.map(|()| ExitCode::SUCCESS),
            Command::Show { city, json } => show(&city, json).await,
        }
    }
}

fn configure() -> anyhow::Result<()> {
    // Read the file directly so an env override is not written back.
    let path = Config::config_file_path()?;
    let mut cfg = Config::load_from(&path)?;

    let key = Password::new("weatherstack access key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read access key")?;
    if key.trim().is_empty() {
        return Err(anyhow!("Access key must not be empty"));
    }
    cfg.set_access_key(key.trim().to_string());

    let city = Text::new("Default city:")
        .with_default(cfg.default_city())
        .prompt()
        .context("Failed to read default city")?;
    cfg.default_city = normalize_city(&city).map(str::to_string);

    cfg.save()?;
    println!("Configuration saved to {}", path.display());
    Ok(())
}

async fn show(city: &str, json: bool) -> anyhow::Result<ExitCode> {
    let city = normalize_city(city).ok_or_else(|| anyhow!("City name must not be empty"))?;

    let cfg = Config::load()?;
    let provider = provider_from_config(&cfg)?;

    let result = provider.fetch_weather(city).await;
    match format_show(&result, json)? {
        ShowOutput::Record(out) => {
            print!("{out}");
            Ok(ExitCode::SUCCESS)
        }
        ShowOutput::Error(out) => {
            eprint!("{out}");
            Ok(ExitCode::FAILURE)
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum ShowOutput {
    Record(String),
    Error(String),
}

/// Failures use the same `Error: ...` panel as the interactive view.
fn format_show(
    result: &Result<WeatherRecord, FetchError>,
    json: bool,
) -> anyhow::Result<ShowOutput> {
    let record = match result {
        Ok(record) => record,
        Err(err) => return Ok(ShowOutput::Error(render::render_error(&err.to_string()))),
    };

    if json {
        let mut out = serde_json::to_string_pretty(record)
            .context("Failed to serialize weather record")?;
        out.push('\n');
        Ok(ShowOutput::Record(out))
    } else {
        Ok(ShowOutput::Record(render::render_record(record)))
    }
}

async fn interactive() -> anyhow::Result<()> {
    let cfg = Config::load()?;
    let provider = provider_from_config(&cfg)?;
    let mut view = WeatherView::new(provider, cfg.default_city());

    if let Some(pending) = view.begin_mount() {
        drive(&mut view, pending, |page| println!("{page}")).await;
    }

    loop {
        let input = Text::new(render::INPUT_LABEL)
            .with_initial_value(view.city_input())
            .with_placeholder("e.g., London, New York, Tokyo")
            .with_help_message("Enter: Get Weather, Esc: quit")
            .prompt();

        let input = match input {
            Ok(input) => input,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => break,
            Err(e) => return Err(e).context("Failed to read city name"),
        };

        match view.begin_submit(&input) {
            Some(pending) => drive(&mut view, pending, |page| println!("{page}")).await,
            None => debug!("blank city name, nothing to fetch"),
        }
    }

    Ok(())
}

/// Runs a started fetch, handing `show` the in-flight page and then the outcome page.
async fn drive(view: &mut WeatherView, pending: PendingFetch, mut show: impl FnMut(String)) {
    show(render::render_view(view));
    let result = view.perform(&pending).await;
    view.resolve(pending.ticket, result);
    show(render::render_view(view));
}

#[cfg(test)]
mod tests {
    use super::*;
    use weatherstack_core::WeatherstackProvider;

    fn record() -> WeatherRecord {
        serde_json::from_value(serde_json::json!({
            "request": {"query": "Paris"},
            "location": {"name": "Paris", "country": "France"},
            "current": {"temperature": 11.0}
        }))
        .expect("fixture should deserialize")
    }

    #[test]
    fn show_failure_uses_error_panel() {
        let result = Err(FetchError::city_not_found());
        let out = format_show(&result, false).unwrap();
        assert_eq!(out, ShowOutput::Error("Error: City not found\n".into()));

        let out = format_show(&Err(FetchError::Api("X".into())), true).unwrap();
        assert_eq!(out, ShowOutput::Error("Error: X\n".into()));
    }

    #[test]
    fn show_success_renders_panel_or_json() {
        let result = Ok(record());

        match format_show(&result, false).unwrap() {
            ShowOutput::Record(out) => assert!(out.starts_with("Current Weather in Paris, France\n")),
            other => panic!("unexpected output: {other:?}"),
        }

        match format_show(&result, true).unwrap() {
            ShowOutput::Record(out) => {
                let value: serde_json::Value = serde_json::from_str(&out).unwrap();
                assert_eq!(value["location"]["country"], "France");
            }
            other => panic!("unexpected output: {other:?}"),
        }
    }

    #[tokio::test]
    async fn drive_shows_loading_page_before_outcome() {
        let cfg = Config { base_url: Some("http://127.0.0.1:9".into()), ..Config::default() };
        let provider = WeatherstackProvider::with_config("KEY".into(), &cfg);
        let mut view = WeatherView::new(Box::new(provider), "London");

        let pending = view.begin_mount().expect("mount starts a fetch");
        let mut pages = Vec::new();
        drive(&mut view, pending, |page| pages.push(page)).await;

        assert_eq!(pages.len(), 2);
        assert!(pages[0].contains("Enter city name: London  [Loading...]"));
        assert!(pages[0].ends_with("Loading weather data...\n"));
        assert!(pages[1].contains("[Get Weather]"));
        assert!(pages[1].contains("Error: "));
    }
}
