//! Blocking HTTP data source

use crate::{ConfigError, LookupError, LookupResult, get_api_base_url, parse_base_url};
use reqwest::StatusCode;
use reqwest::blocking::Client;
use url::Url;

/// Anything that can resolve a query into a [`LookupResult`].
///
/// The lookup controller only talks to this trait, so the terminal UI and the
/// tests can swap in their own source.
pub trait DataSource: Send + Sync {
    /// Fetch the creature named (or numbered) `query`. The query is already normalized.
    fn lookup(&self, query: &str) -> Result<LookupResult, LookupError>;

    /// Download the bytes behind an image reference
    fn fetch_sprite(&self, url: &str) -> Result<Vec<u8>, LookupError>;
}

/// Map a response status onto the lookup taxonomy
pub fn check_status(status: StatusCode) -> Result<(), LookupError> {
    if status.is_success() {
        Ok(())
    } else if status == StatusCode::NOT_FOUND {
        Err(LookupError::NotFound)
    } else {
        Err(LookupError::Status(status))
    }
}

/// PokeAPI over `reqwest::blocking`
#[derive(Debug, Clone)]
pub struct PokeApiClient {
    http: Client,
    base_url: Url,
}

impl PokeApiClient {
    pub fn new(base_url: Url) -> Result<Self, ConfigError> {
        let http = Client::builder()
            .user_agent(concat!("pokefetch/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ConfigError::HttpClient)?;
        Ok(Self::with_client(base_url, http))
    }

    /// Use a preconfigured HTTP client (proxy settings, timeouts)
    pub fn with_client(base_url: Url, http: Client) -> Self {
        Self { http, base_url }
    }

    /// Resolve the base URL from `explicit`, the environment, or the default
    pub fn from_env(explicit: Option<&str>) -> Result<Self, ConfigError> {
        let base_url = parse_base_url(&get_api_base_url(explicit))?;
        Self::new(base_url)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `{base}/pokemon/{query}` with the query encoded as one path segment
    pub fn lookup_url(&self, query: &str) -> String {
        format!(
            "{}/pokemon/{}",
            self.base_url.as_str().trim_end_matches('/'),
            urlencoding::encode(query)
        )
    }
}

impl DataSource for PokeApiClient {
    fn lookup(&self, query: &str) -> Result<LookupResult, LookupError> {
        let url = self.lookup_url(query);
        log::debug!("GET {}", url);

        let response = self.http.get(&url).send()?;
        check_status(response.status())?;

        let body = response.bytes()?;
        let result: LookupResult = serde_json::from_slice(&body)?;
        log::debug!("Resolved '{}' to #{} {}", query, result.id, result.name);
        Ok(result)
    }

    fn fetch_sprite(&self, url: &str) -> Result<Vec<u8>, LookupError> {
        let response = self.http.get(url).send()?;
        check_status(response.status())?;
        Ok(response.bytes()?.to_vec())
    }
}
