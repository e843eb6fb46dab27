use clap::ArgMatches;
use clap::parser::ValueSource;

use crate::args::{LoadArgs, PositiveU64, PositiveUsize};
use crate::error::{AppError, AppResult, ConfigError, ValidationError};

use super::types::ConfigFile;

/// Applies configuration values to CLI arguments. Values given on the
/// command line always win.
///
/// # Errors
///
/// Returns an error when a config value is out of range.
pub fn apply_config(
    args: &mut LoadArgs,
    matches: &ArgMatches,
    config: &ConfigFile,
) -> AppResult<()> {
    if !is_cli(matches, "url")
        && let Some(url) = config.url.clone()
    {
        args.url = url;
    }

    if !is_set(matches, "key")
        && let Some(key) = config.key.clone()
    {
        args.key = key;
    }

    if !is_cli(matches, "requests_per_tick")
        && let Some(value) = config.rqs
    {
        args.requests_per_tick = ensure_positive_usize(value, "rqs")?;
    }

    if !is_cli(matches, "duration")
        && let Some(value) = config.duration
    {
        args.duration = ensure_positive_u64(value, "duration")?;
    }

    if !is_cli(matches, "request_timeout")
        && let Some(value) = config.timeout.as_ref()
    {
        args.request_timeout = value.to_duration().map_err(|err| match err {
            AppError::Validation(source) => {
                AppError::config(ConfigError::InvalidTimeout { source })
            }
            other => other,
        })?;
    }

    if !is_cli(matches, "verbose")
        && let Some(value) = config.verbose
    {
        args.verbose = value;
    }

    if !is_cli(matches, "wait_ongoing")
        && let Some(value) = config.wait_ongoing
    {
        args.wait_ongoing = value;
    }

    if !is_set(matches, "no_color")
        && let Some(value) = config.no_color
    {
        args.no_color = value;
    }

    Ok(())
}

fn is_cli(matches: &ArgMatches, name: &str) -> bool {
    matches.value_source(name) == Some(ValueSource::CommandLine)
}

// Environment values count as explicit for the env-backed flags.
fn is_set(matches: &ArgMatches, name: &str) -> bool {
    matches!(
        matches.value_source(name),
        Some(ValueSource::CommandLine | ValueSource::EnvVariable)
    )
}

fn ensure_positive_u64(value: i64, field: &str) -> AppResult<PositiveU64> {
    u64::try_from(value)
        .map_err(|_err| ValidationError::ValueTooSmall { min: 1 })
        .and_then(PositiveU64::try_from)
        .map_err(|err| {
            AppError::config(ConfigError::FieldMustBePositive {
                field: field.to_owned(),
                source: err,
            })
        })
}

fn ensure_positive_usize(value: i64, field: &str) -> AppResult<PositiveUsize> {
    usize::try_from(value)
        .map_err(|_err| ValidationError::ValueTooSmall { min: 1 })
        .and_then(PositiveUsize::try_from)
        .map_err(|err| {
            AppError::config(ConfigError::FieldMustBePositive {
                field: field.to_owned(),
                source: err,
            })
        })
}
