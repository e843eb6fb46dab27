//! CLI argument types and parsing helpers.
mod cli;
mod defaults;
pub(crate) mod parsers;
mod types;


pub use cli::LoadArgs;
pub use types::{PositiveU64, PositiveUsize};

pub(crate) use defaults::{DEFAULT_TARGET_URL, DEFAULT_USER_AGENT};
pub(crate) use parsers::parse_duration_arg;
