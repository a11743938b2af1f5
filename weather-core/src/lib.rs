//! Core library for the `weatherstack` CLI.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The weatherstack provider (fetch and transform of current conditions)
//! - Shared domain models and the fetch error taxonomy
//! - The view controller driving the search form
//!
//! It is used by `weatherstack-cli`, but can also be reused by other front ends.

pub mod config;
pub mod error;
pub mod model;
pub mod provider;
pub mod view;

pub use config::Config;
pub use error::FetchError;
pub use model::{Current, Location, RequestInfo, WeatherRecord};
pub use provider::{WeatherProvider, provider_from_config, weatherstack::WeatherstackProvider};
pub use view::{FetchTicket, PendingFetch, ViewState, WeatherView};
