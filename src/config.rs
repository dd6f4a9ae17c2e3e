//! Environment-driven configuration for the client core. The base API URL is
//! validated up front; provider keys are opaque values handed to the map and
//! payment widgets and are not validated here.

use crate::error::ApiError;
use std::env;
use url::Url;

const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:8000";

/// Client configuration derived from environment variables.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub api_base_url: String,
    pub maps_api_key: String,
    pub payment_public_key: String,
}

impl AppConfig {
    /// Load configuration from the `PARKEASE_*` environment variables.
    ///
    /// # Errors
    /// Returns an error if the configured base URL is not a valid http(s) URL.
    pub fn load() -> Result<Self, ApiError> {
        let api_base_url =
            env::var("PARKEASE_API_BASE_URL").unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string());
        let api_base_url = normalize_base_url(&api_base_url)?;

        Ok(Self {
            api_base_url,
            maps_api_key: env::var("PARKEASE_MAPS_API_KEY").unwrap_or_default(),
            payment_public_key: env::var("PARKEASE_PAYMENT_PUBLIC_KEY").unwrap_or_default(),
        })
    }
}

fn normalize_base_url(raw: &str) -> Result<String, ApiError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let url = Url::parse(trimmed)
        .map_err(|err| ApiError::Config(format!("Invalid API base URL {trimmed}: {err}")))?;

    match url.scheme() {
        "http" | "https" => Ok(trimmed.to_string()),
        scheme => Err(ApiError::Config(format!(
            "Invalid API base URL {trimmed}: unsupported scheme {scheme}"
        ))),
    }
}
