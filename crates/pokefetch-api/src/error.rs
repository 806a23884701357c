use reqwest::StatusCode;
use thiserror::Error;

pub const NOT_FOUND_MESSAGE: &str = "Pokémon not found!";
pub const CONNECTION_ERROR_MESSAGE: &str = "Connection error.";

/// User-facing category of a failed lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The endpoint answered 404
    NotFound,
    /// Any other status, transport failure, or undecodable body
    Connectivity,
}

/// Failure of a single lookup.
///
/// `Display` is the exact text shown to the user; the variants keep the
/// underlying cause around for logging.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("Pokémon not found!")]
    NotFound,

    #[error("Connection error.")]
    Status(StatusCode),

    #[error("Connection error.")]
    Transport(#[from] reqwest::Error),

    #[error("Connection error.")]
    Decode(#[from] serde_json::Error),

    /// The fetch ended without producing an outcome (worker panicked or went away)
    #[error("Connection error.")]
    Interrupted,
}

impl LookupError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            LookupError::NotFound => ErrorKind::NotFound,
            LookupError::Status(_)
            | LookupError::Transport(_)
            | LookupError::Decode(_)
            | LookupError::Interrupted => ErrorKind::Connectivity,
        }
    }

    /// Underlying cause, for debug logs
    pub fn detail(&self) -> String {
        match self {
            LookupError::NotFound => "HTTP 404".to_string(),
            LookupError::Status(status) => format!("HTTP {}", status),
            LookupError::Transport(e) => format!("transport: {}", e),
            LookupError::Decode(e) => format!("decode: {}", e),
            LookupError::Interrupted => "lookup interrupted".to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid API URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Unsupported API URL scheme '{0}' (expected http or https)")]
    UnsupportedScheme(String),

    #[error("Failed to create HTTP client")]
    HttpClient(#[source] reqwest::Error),
}
