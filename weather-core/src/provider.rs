use crate::{
    Config, WeatherRecord, error::FetchError, provider::weatherstack::WeatherstackProvider,
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod weatherstack;

/// Source of current-conditions records.
///
/// `city` is already trimmed and non-empty; implementations issue a single
/// request and never retry.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn fetch_weather(&self, city: &str) -> Result<WeatherRecord, FetchError>;
}

/// Construct the weatherstack provider from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let access_key = config.access_key().ok_or_else(|| {
        anyhow::anyhow!(
            "No weatherstack access key configured.\n\
                 Hint: run `weatherstack configure` or set {}.",
            crate::config::ACCESS_KEY_ENV
        )
    })?;

    Ok(Box::new(WeatherstackProvider::with_config(access_key.to_owned(), config)))
}
