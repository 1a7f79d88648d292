use serde::{Deserialize, Serialize};

use crate::error::LookupError;

/// A validated city query. The city is trimmed and never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeatherQuery {
    city: String,
}

impl WeatherQuery {
    pub fn new(city: &str) -> Result<Self, LookupError> {
        let city = city.trim();
        if city.is_empty() {
            return Err(LookupError::InvalidInput("city name must not be empty".to_string()));
        }

        Ok(Self { city: city.to_string() })
    }

    pub fn city(&self) -> &str {
        &self.city
    }
}

/// Current conditions for one city, copied from the upstream payload in metric units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherRecord {
    pub city: String,
    pub temperature_celsius: f64,
    pub feels_like_celsius: f64,
    pub description: String,
    pub humidity_percent: u8,
    pub wind_speed_mps: f64,
    /// Coarse condition group such as "rain" or "clouds", when the upstream sends one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weather_type: Option<String>,
}
