use std::{net::SocketAddr, path::PathBuf, process::ExitCode};

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use inquire::{Password, PasswordDisplayMode, Text};
use weather_lookup_core::{Config, LookupError, LookupLog, WeatherRecord, lookup_from_config};

use crate::{render, server};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Current weather for a city")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key and lookup log location.
    Configure,

    /// Show current weather for a city.
    Show {
        /// City name; prompted for when absent.
        city: Option<String>,

        /// Print the JSON document instead of text.
        #[arg(long)]
        json: bool,

        /// Append the result to this log file (overrides the configured one).
        #[arg(long)]
        log: Option<PathBuf>,
    },

    /// Serve the HTML form and JSON API.
    Serve {
        #[arg(long, default_value = "127.0.0.1:5000")]
        addr: SocketAddr,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<ExitCode> {
        match self.command {
            Command::Configure => {
                // Env overrides are not applied so they never end up on disk.
                configure(Config::load()?)?;
                Ok(ExitCode::SUCCESS)
            }
            Command::Show { city, json, log } => {
                let config = load_effective_config()?;
                show(&config, city, json, log).await
            }
            Command::Serve { addr } => {
                let config = load_effective_config()?;
                if config.api_key().is_none() {
                    tracing::warn!("no API key configured; lookups will fail until one is set");
                }
                server::serve(addr, lookup_from_config(&config)?).await?;
                Ok(ExitCode::SUCCESS)
            }
        }
    }
}

fn load_effective_config() -> anyhow::Result<Config> {
    let mut config = Config::load()?;
    config.apply_env_overrides(|name| std::env::var(name).ok());
    Ok(config)
}

fn configure(mut config: Config) -> anyhow::Result<()> {
    let key = Password::new("OpenWeather API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    let key = key.trim();
    if key.is_empty() {
        bail!("API key must not be empty");
    }
    config.set_api_key(key.to_string());

    let current_log =
        config.log_file.as_ref().map(|p| p.display().to_string()).unwrap_or_default();
    let log = Text::new("Lookup log file (leave empty to disable):")
        .with_default(&current_log)
        .prompt()
        .context("Failed to read log file path")?;
    config.log_file = Some(log.trim()).filter(|p| !p.is_empty()).map(PathBuf::from);

    let path = config.save()?;
    println!("Saved configuration to {}", path.display());
    Ok(())
}

async fn show(
    config: &Config,
    city: Option<String>,
    json: bool,
    log: Option<PathBuf>,
) -> anyhow::Result<ExitCode> {
    let city = match city {
        Some(city) => city,
        None => Text::new("Enter a city name:").prompt().context("Failed to read city name")?,
    };

    let lookup = lookup_from_config(config)?;

    match lookup.lookup(&city).await {
        Ok(record) => {
            if json {
                println!("{}", serde_json::to_string_pretty(&render::JsonWeather::from(&record))?);
            } else {
                println!("{}", render::text(&record));
            }

            if let Some(path) = log.or_else(|| config.log_file.clone()) {
                append_log(&LookupLog::new(path), &record);
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            tracing::debug!(error = %err, "lookup failed");
            eprintln!("❌ {}", err.user_message());
            if let Some(detail) = error_detail(&err) {
                eprintln!("   {detail}");
            }
            Ok(ExitCode::FAILURE)
        }
    }
}

fn append_log(log: &LookupLog, record: &WeatherRecord) {
    if let Err(err) = log.append(record) {
        tracing::warn!(error = %err, "could not write lookup log");
        eprintln!("warning: {err:#}");
    }
}

/// Extra line worth showing under the user message, if the error carries one.
fn error_detail(err: &LookupError) -> Option<String> {
    match err {
        LookupError::NotFound | LookupError::InvalidInput(_) => None,
        LookupError::UpstreamHttpError { message, .. } => Some(message.clone()),
        LookupError::NetworkError(msg)
        | LookupError::MalformedResponse(msg)
        | LookupError::ConfigurationMissing(msg) => Some(msg.clone()),
    }
}
