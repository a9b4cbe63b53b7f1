//! Configuration loaded from environment variables.

use dotenv::dotenv;
use std::env;
use std::fs;
use tracing::info;

use crate::auth::ServiceAccountKey;
use crate::client::DEFAULT_CALENDAR_ENDPOINT;
use crate::error::{Result, SyncError};

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Expected value of the `x-webhook-source` header
    pub header_source_to_pass: String,
    /// Shared calendar receiving Collect and Return appointments
    pub central_calendar_id: String,
    /// Credentials used to act on the calendars
    pub service_account: ServiceAccountKey,
    /// Base URL of the Calendar API
    pub calendar_endpoint: String,
    pub port: u16,
}

fn required(name: &str) -> Result<String> {
    env::var(name).map_err(|_| SyncError::Config(format!("{} must be set in environment", name)))
}

impl Config {
    /// Load configuration from the environment, reading `.env` first if present.
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        let service_account_json = match env::var("GCP_SERVICE_ACCOUNT_SECRET") {
            Ok(inline) => inline,
            Err(_) => {
                let path = env::var("GCP_SERVICE_ACCOUNT_FILE").map_err(|_| {
                    SyncError::Config(
                        "GCP_SERVICE_ACCOUNT_SECRET or GCP_SERVICE_ACCOUNT_FILE must be set"
                            .to_string(),
                    )
                })?;
                info!("Loading service account key from {}", path);
                fs::read_to_string(&path).map_err(|e| {
                    SyncError::Config(format!("cannot read service account file {}: {}", path, e))
                })?
            }
        };

        let port = match env::var("PORT") {
            Ok(raw) => raw
                .parse()
                .map_err(|_| SyncError::Config(format!("PORT is not a valid port: {}", raw)))?,
            Err(_) => 8080,
        };

        Ok(Self {
            header_source_to_pass: required("HEADER_SOURCE_TO_PASS")?,
            central_calendar_id: required("GOOGLE_DEFAULT_CALENDAR_ID")?,
            service_account: ServiceAccountKey::from_json(&service_account_json)?,
            calendar_endpoint: env::var("GOOGLE_CALENDAR_API_ENDPOINT")
                .unwrap_or_else(|_| DEFAULT_CALENDAR_ENDPOINT.to_string()),
            port,
        })
    }
}
