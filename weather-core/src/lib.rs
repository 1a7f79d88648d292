//! Core library for the `weather` lookup tool.
//!
//! This crate defines:
//! - The lookup client for the OpenWeather current-weather endpoint
//! - The error taxonomy every caller maps to its own presentation
//! - Configuration & credentials handling
//! - The optional append-only lookup log
//!
//! It is used by `weather-lookup-cli`, but can also be reused by other binaries or services.

pub mod config;
pub mod error;
pub mod history;
pub mod model;
pub mod provider;

pub use config::{Config, ProviderConfig};
pub use error::LookupError;
pub use history::LookupLog;
pub use model::{WeatherQuery, WeatherRecord};
pub use provider::{
    WeatherLookup,
    lookup_from_config,
    openweather::{ClientSettings, WeatherLookupClient},
};
