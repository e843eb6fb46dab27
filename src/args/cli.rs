use clap::Parser;
use std::time::Duration;

use super::DEFAULT_TARGET_URL;
use super::parsers::{
    parse_bool_env, parse_duration_arg, parse_positive_u64, parse_positive_usize,
};
use super::types::{PositiveU64, PositiveUsize};

#[derive(Debug, Parser, Clone)]
#[clap(
    version,
    about = "Tick-driven HTTP load generator - fires a fixed burst of concurrent POST requests every second and reports how many succeeded."
)]
pub struct LoadArgs {
    /// The server POST url
    #[arg(long, short, default_value = DEFAULT_TARGET_URL)]
    pub url: String,

    /// The server API key, sent as the X-Api-Key header
    #[arg(
        long,
        short,
        env = "TICKBURST_API_KEY",
        hide_env_values = true,
        default_value = ""
    )]
    pub key: String,

    /// Requests launched on every tick (one tick per second)
    #[arg(
        long = "rqs",
        short = 'r',
        default_value = "10",
        value_parser = parse_positive_usize
    )]
    pub requests_per_tick: PositiveUsize,

    /// Duration of the run (seconds)
    #[arg(
        long = "duration",
        short = 't',
        default_value = "1",
        value_parser = parse_positive_u64
    )]
    pub duration: PositiveU64,

    /// Timeout for each request (supports ms/s/m/h)
    #[arg(long = "timeout", default_value = "10s", value_parser = parse_duration_arg)]
    pub request_timeout: Duration,

    /// Let requests still in flight at the deadline finish instead of cancelling them
    #[arg(long = "wait-ongoing")]
    pub wait_ongoing: bool,

    /// Print the response of each request (also sets log level to debug unless overridden by TICKBURST_LOG/RUST_LOG)
    #[arg(long, short = 'v')]
    pub verbose: bool,

    /// Disable color output
    #[arg(long = "no-color", env = "NO_COLOR", value_parser = parse_bool_env)]
    pub no_color: bool,

    /// Path to config file (TOML/JSON). Defaults to ./tickburst.toml or ./tickburst.json if present.
    #[arg(long, short = 'c')]
    pub config: Option<String>,
}
