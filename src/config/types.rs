use std::time::Duration;

use serde::Deserialize;

use crate::args::parse_duration_arg;
use crate::error::AppResult;

/// Values accepted from `tickburst.toml` / `tickburst.json`.
///
/// Counts are signed so that a zero or negative value is reported as a
/// configuration error rather than a parse failure.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub url: Option<String>,
    pub key: Option<String>,
    pub rqs: Option<i64>,
    pub duration: Option<i64>,
    pub timeout: Option<DurationValue>,
    pub verbose: Option<bool>,
    pub wait_ongoing: Option<bool>,
    pub no_color: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum DurationValue {
    Seconds(u64),
    Text(String),
}

impl DurationValue {
    pub(crate) fn to_duration(&self) -> AppResult<Duration> {
        match self {
            DurationValue::Seconds(secs) => parse_duration_arg(&secs.to_string()),
            DurationValue::Text(text) => parse_duration_arg(text),
        }
    }
}
