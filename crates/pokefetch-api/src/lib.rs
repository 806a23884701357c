//! Client for the PokeAPI lookup-by-name endpoint.
//!
//! The crate exposes the [`LookupResult`] shape consumed by the renderer, the
//! [`DataSource`] seam the lookup controller talks to, and the two-way
//! [`LookupError`] taxonomy (not found vs. everything else).

pub mod client;
pub mod config;
mod error;
pub mod model;

pub use client::{DataSource, PokeApiClient, check_status};
pub use config::{API_URL_ENV, DEFAULT_API_URL, get_api_base_url, parse_base_url};
pub use error::{
    CONNECTION_ERROR_MESSAGE, ConfigError, ErrorKind, LookupError, NOT_FOUND_MESSAGE,
};
pub use reqwest::StatusCode;

pub use model::{LookupResult, NamedResource, SPRITE_LABELS, Sprites, TypeSlot};
