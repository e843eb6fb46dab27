//! Burst dispatch, request workers and outcome collection.
mod client;
mod collector;
mod dispatcher;
mod outcome;
mod payload;
mod worker;

#[cfg(test)]
pub(crate) mod test_support;

pub use client::{BurstSettings, build_client, parse_api_key, parse_target_url};
pub use dispatcher::{DispatchSummary, Dispatcher};
pub use outcome::{ACCEPTED_STATUSES, Classification, OutcomePayload, RequestOutcome, classify_status};
pub use payload::RequestPayload;

#[cfg(test)]
pub(crate) use collector::{CollectorKind, pretty_body, run_collector};
#[cfg(test)]
pub(crate) use dispatcher::{BurstContext, BurstSummary, run_burst};
#[cfg(test)]
pub(crate) use worker::{WorkerContext, run_worker};
