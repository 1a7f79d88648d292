//! Append-only, human-readable log of successful lookups.

use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use std::{
    fs::OpenOptions,
    io::Write,
    path::{Path, PathBuf},
};

use crate::model::WeatherRecord;

const SEPARATOR_WIDTH: usize = 30;

#[derive(Debug, Clone)]
pub struct LookupLog {
    path: PathBuf,
}

impl LookupLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(&self, record: &WeatherRecord) -> Result<()> {
        self.append_at(record, Utc::now())
    }

    /// Append one entry stamped with `at`. Creates the file if it is missing.
    pub fn append_at(&self, record: &WeatherRecord, at: DateTime<Utc>) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("Failed to open lookup log: {}", self.path.display()))?;

        file.write_all(format_entry(record, at).as_bytes())
            .with_context(|| format!("Failed to write lookup log: {}", self.path.display()))?;

        tracing::debug!(path = %self.path.display(), city = %record.city, "appended lookup log entry");
        Ok(())
    }
}

fn format_entry(record: &WeatherRecord, at: DateTime<Utc>) -> String {
    format!(
        "Checked at: {}\n\
         City: {}\n\
         Temperature: {}°C (Feels like: {}°C)\n\
         Description: {}\n\
         Humidity: {}%\n\
         Wind speed: {} m/s\n\
         {}\n",
        at.to_rfc3339_opts(SecondsFormat::Secs, true),
        record.city,
        record.temperature_celsius,
        record.feels_like_celsius,
        record.description,
        record.humidity_percent,
        record.wind_speed_mps,
        "-".repeat(SEPARATOR_WIDTH),
    )
}
