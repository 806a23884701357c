//! Base URL resolution for the lookup endpoint

use crate::ConfigError;
use url::Url;

pub const DEFAULT_API_URL: &str = "https://pokeapi.co/api/v2";

/// Environment variable overriding the API base URL
pub const API_URL_ENV: &str = "POKEFETCH_API_URL";

/// Pick the base URL: explicit value first, then the environment, then the default
pub fn get_api_base_url(explicit: Option<&str>) -> String {
    if let Some(url) = explicit {
        return url.to_string();
    }

    if let Ok(url) = std::env::var(API_URL_ENV) {
        if !url.trim().is_empty() {
            return url;
        }
    }

    DEFAULT_API_URL.to_string()
}

/// Validate a base URL. Only http(s) endpoints are accepted.
pub fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw.trim()).map_err(|source| ConfigError::InvalidUrl {
        url: raw.to_string(),
        source,
    })?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConfigError::UnsupportedScheme(other.to_string())),
    }
}
