//! View controller for the city search form and its result panel.
//!
//! Owns the form input, the last outcome and the loading flag. Only the
//! most recently started fetch may update the state.

use tracing::debug;

use crate::{
    error::FetchError,
    model::{WeatherRecord, normalize_city},
    provider::WeatherProvider,
};

pub const SUBMIT_LABEL: &str = "Get Weather";
pub const LOADING_LABEL: &str = "Loading...";

#[derive(Debug, Clone, PartialEq, Default)]
pub enum ViewState {
    /// No fetch attempted yet.
    #[default]
    Idle,
    Loading,
    Success(WeatherRecord),
    Failed(String),
}

impl ViewState {
    pub fn is_loading(&self) -> bool {
        matches!(self, ViewState::Loading)
    }
}

/// Identifies one started fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket(u64);

/// A fetch that has been started but not resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingFetch {
    pub ticket: FetchTicket,
    pub city: String,
}

#[derive(Debug)]
pub struct WeatherView {
    provider: Box<dyn WeatherProvider>,
    default_city: String,
    city_input: String,
    state: ViewState,
    issued: u64,
    in_flight: Option<FetchTicket>,
}

impl WeatherView {
    pub fn new(provider: Box<dyn WeatherProvider>, default_city: impl Into<String>) -> Self {
        let default_city = default_city.into();
        Self {
            provider,
            city_input: default_city.clone(),
            default_city,
            state: ViewState::Idle,
            issued: 0,
            in_flight: None,
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    /// Record currently on display, if the last fetch succeeded.
    pub fn record(&self) -> Option<&WeatherRecord> {
        match &self.state {
            ViewState::Success(record) => Some(record),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.state {
            ViewState::Failed(message) => Some(message),
            _ => None,
        }
    }

    pub fn city_input(&self) -> &str {
        &self.city_input
    }

    pub fn set_city_input(&mut self, value: impl Into<String>) {
        self.city_input = value.into();
    }

    pub fn submit_enabled(&self) -> bool {
        !self.state.is_loading()
    }

    pub fn submit_label(&self) -> &'static str {
        if self.state.is_loading() { LOADING_LABEL } else { SUBMIT_LABEL }
    }

    /// Initial fetch for the default city. Does nothing once any fetch was started.
    pub async fn mount(&mut self) -> bool {
        match self.begin_mount() {
            Some(pending) => self.complete(pending).await,
            None => false,
        }
    }

    /// Form submission. Blank input and submissions while loading are ignored.
    pub async fn submit(&mut self, input: &str) -> bool {
        match self.begin_submit(input) {
            Some(pending) => self.complete(pending).await,
            None => false,
        }
    }

    /// First half of [`mount`](Self::mount): enters `Loading` for the default city.
    pub fn begin_mount(&mut self) -> Option<PendingFetch> {
        if self.issued > 0 {
            return None;
        }
        let city = self.default_city.clone();
        self.begin_fetch(&city)
    }

    /// First half of [`submit`](Self::submit), so the caller can show the
    /// loading page before awaiting [`perform`](Self::perform).
    pub fn begin_submit(&mut self, input: &str) -> Option<PendingFetch> {
        self.set_city_input(input);
        if !self.submit_enabled() {
            debug!("submit ignored while a fetch is in flight");
            return None;
        }
        self.begin_fetch(input)
    }

    async fn complete(&mut self, pending: PendingFetch) -> bool {
        let result = self.perform(&pending).await;
        self.resolve(pending.ticket, result)
    }

    /// Enter `Loading` for `input` without the submit guard.
    ///
    /// Any earlier fetch still in flight is superseded.
    pub fn begin_fetch(&mut self, input: &str) -> Option<PendingFetch> {
        let city = normalize_city(input)?.to_string();

        self.issued += 1;
        let ticket = FetchTicket(self.issued);
        self.in_flight = Some(ticket);
        self.state = ViewState::Loading;

        debug!(city = %city, ticket = self.issued, "fetch started");
        Some(PendingFetch { ticket, city })
    }

    /// Fetch for a pending ticket; does not touch the view state.
    pub async fn perform(&self, pending: &PendingFetch) -> Result<WeatherRecord, FetchError> {
        self.provider.fetch_weather(&pending.city).await
    }

    /// Apply a fetch outcome. Returns false if `ticket` was superseded or already resolved.
    pub fn resolve(
        &mut self,
        ticket: FetchTicket,
        result: Result<WeatherRecord, FetchError>,
    ) -> bool {
        if self.in_flight != Some(ticket) {
            debug!(ticket = ticket.0, "discarding stale fetch result");
            return false;
        }
        self.in_flight = None;

        self.state = match result {
            Ok(record) => ViewState::Success(record),
            Err(err) => {
                debug!(kind = err.kind(), error = %err, "fetch failed");
                ViewState::Failed(err.to_string())
            }
        };
        true
    }
}
