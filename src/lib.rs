//! Core library for the `tickburst` CLI.
//!
//! Every tick (one second) the dispatcher fires a burst of concurrent POST
//! requests at the target, each worker classifies its response, records it
//! in a lock-free [`report::Report`] and hands the outcome to a per-burst
//! collector for logging. When the run ends the report is printed as JSON.
pub mod app;
pub mod args;
pub mod config;
pub mod entry;
pub mod error;
pub mod http;
pub mod logger;
pub mod report;
pub mod shutdown;
