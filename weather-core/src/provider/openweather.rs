use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;

use crate::{
    config::{API_KEY_ENV, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS},
    error::LookupError,
    model::{WeatherQuery, WeatherRecord},
};

use super::WeatherLookup;

const UNITS: &str = "metric";

/// Everything the client needs to reach the upstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    pub api_key: Option<String>,
    pub base_url: String,
    pub timeout: Duration,
}

impl ClientSettings {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Client for the OpenWeather current-weather endpoint.
#[derive(Debug, Clone)]
pub struct WeatherLookupClient {
    settings: ClientSettings,
    http: Client,
}

impl WeatherLookupClient {
    pub fn new(settings: ClientSettings) -> Result<Self, LookupError> {
        let http = Client::builder().timeout(settings.timeout).build().map_err(|e| {
            LookupError::NetworkError(format!("Failed to build HTTP client: {}", e.without_url()))
        })?;

        Ok(Self { settings, http })
    }

    async fn fetch_current(
        &self,
        query: &WeatherQuery,
        api_key: &str,
    ) -> Result<WeatherRecord, LookupError> {
        tracing::debug!(city = query.city(), "requesting current weather from OpenWeather");

        let res = self
            .http
            .get(&self.settings.base_url)
            .query(&[("q", query.city()), ("appid", api_key), ("units", UNITS)])
            .send()
            .await
            .map_err(transport_error)?;

        let status = res.status();
        if status == StatusCode::NOT_FOUND {
            tracing::info!(city = query.city(), "OpenWeather does not know this city");
            return Err(LookupError::NotFound);
        }

        let body = res.text().await.map_err(transport_error)?;

        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "OpenWeather request failed");
            let message = if body.trim().is_empty() {
                status.canonical_reason().unwrap_or("unknown status").to_string()
            } else {
                truncate_body(&body)
            };
            return Err(LookupError::UpstreamHttpError { status: status.as_u16(), message });
        }

        parse_current(&body)
    }
}

#[async_trait]
impl WeatherLookup for WeatherLookupClient {
    async fn lookup(&self, city: &str) -> Result<WeatherRecord, LookupError> {
        let query = WeatherQuery::new(city)?;

        let api_key = self.settings.api_key.as_deref().ok_or_else(|| {
            LookupError::ConfigurationMissing(format!(
                "No OpenWeather API key configured. Set {API_KEY_ENV} or run `weather configure`."
            ))
        })?;

        self.fetch_current(&query, api_key).await
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: f64,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    #[serde(default)]
    main: Option<String>,
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
}

fn parse_current(body: &str) -> Result<WeatherRecord, LookupError> {
    let parsed: OwCurrentResponse = serde_json::from_str(body)
        .map_err(|e| LookupError::MalformedResponse(format!("Failed to parse OpenWeather JSON: {e}")))?;

    let weather = parsed.weather.into_iter().next().ok_or_else(|| {
        LookupError::MalformedResponse("OpenWeather response contained no weather entries".into())
    })?;

    if parsed.main.humidity > 100 {
        return Err(LookupError::MalformedResponse(format!(
            "humidity {} is outside 0..=100",
            parsed.main.humidity
        )));
    }

    Ok(WeatherRecord {
        city: parsed.name,
        temperature_celsius: parsed.main.temp,
        feels_like_celsius: parsed.main.feels_like,
        description: weather.description,
        humidity_percent: parsed.main.humidity,
        wind_speed_mps: parsed.wind.speed,
        weather_type: weather.main.map(|m| m.to_lowercase()),
    })
}

// Query strings carry the API key, so the URL is dropped from transport errors.
fn transport_error(err: reqwest::Error) -> LookupError {
    if err.is_timeout() {
        LookupError::NetworkError(format!("request timed out: {}", err.without_url()))
    } else {
        LookupError::NetworkError(err.without_url().to_string())
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() <= MAX {
        return body.to_string();
    }

    let mut end = MAX;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &body[..end])
}
