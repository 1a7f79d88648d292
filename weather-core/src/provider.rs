use crate::{
    Config, WeatherRecord, error::LookupError, provider::openweather::WeatherLookupClient,
};
use async_trait::async_trait;
use std::{fmt::Debug, sync::Arc};

pub mod openweather;

/// One lookup: a city name in, a record or a classified error out.
#[async_trait]
pub trait WeatherLookup: Send + Sync + Debug {
    async fn lookup(&self, city: &str) -> Result<WeatherRecord, LookupError>;
}

/// Construct the lookup client from config.
///
/// A missing API key is not an error here; it surfaces as
/// [`LookupError::ConfigurationMissing`] on the first lookup.
pub fn lookup_from_config(config: &Config) -> Result<Arc<dyn WeatherLookup>, LookupError> {
    let client = WeatherLookupClient::new(config.client_settings())?;
    Ok(Arc::new(client))
}
