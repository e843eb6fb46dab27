//! Run lifecycle: settings, the timed run and the final summary.
mod runner;
pub(crate) mod summary;

#[cfg(test)]
mod tests;

pub use runner::{RunSettings, TICK_INTERVAL, run_load};
