use std::time::Duration;

use http::HeaderValue;
use reqwest::{Client, Url};

use crate::args::{DEFAULT_USER_AGENT, PositiveUsize};
use crate::error::{AppError, AppResult, HttpError};

/// Per-burst request parameters, read-only for the whole run.
#[derive(Debug, Clone)]
pub struct BurstSettings {
    pub target: Url,
    pub api_key: HeaderValue,
    pub requests_per_tick: PositiveUsize,
    pub verbose: bool,
    pub wait_ongoing: bool,
}

/// Builds the shared client. `timeout` bounds every request end to end.
///
/// # Errors
///
/// Returns an error when the TLS backend or client cannot be initialised.
pub fn build_client(timeout: Duration) -> AppResult<Client> {
    Client::builder()
        .user_agent(DEFAULT_USER_AGENT)
        .timeout(timeout)
        .build()
        .map_err(|err| AppError::http(HttpError::BuildClientFailed { source: err }))
}

/// Parses the target URL, accepting only http and https.
///
/// # Errors
///
/// Returns an error for malformed URLs or other schemes.
pub fn parse_target_url(raw: &str) -> AppResult<Url> {
    let url = Url::parse(raw.trim()).map_err(|err| {
        AppError::http(HttpError::InvalidUrl {
            url: raw.to_owned(),
            source: err,
        })
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(AppError::http(HttpError::UnsupportedScheme {
            scheme: other.to_owned(),
        })),
    }
}

/// Turns the API key into a sensitive header value.
///
/// # Errors
///
/// Returns an error when the key contains characters not allowed in headers.
pub fn parse_api_key(key: &str) -> AppResult<HeaderValue> {
    let mut value = HeaderValue::from_str(key)
        .map_err(|err| AppError::http(HttpError::InvalidApiKey { source: err }))?;
    value.set_sensitive(true);
    Ok(value)
}
