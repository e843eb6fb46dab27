use std::sync::Arc;

use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use tokio::sync::mpsc;
use tracing::debug;

use crate::report::Report;
use crate::shutdown::ShutdownReceiver;

use super::client::BurstSettings;
use super::outcome::{Classification, RequestOutcome};
use super::payload::RequestPayload;

const JSON_CONTENT_TYPE: &str = "application/json; charset=UTF-8";
const API_KEY_HEADER: &str = "X-Api-Key";

/// Everything one worker needs; cloned per request of a burst.
#[derive(Debug, Clone)]
pub(crate) struct WorkerContext {
    pub(crate) burst: u64,
    pub(crate) client: Client,
    pub(crate) settings: Arc<BurstSettings>,
    pub(crate) report: Arc<Report>,
    pub(crate) success_tx: mpsc::Sender<RequestOutcome>,
    pub(crate) error_tx: mpsc::Sender<RequestOutcome>,
}

/// Performs one POST, records it and publishes the outcome.
///
/// Returns `None` when shutdown cancelled the attempt before it completed;
/// such an attempt is neither recorded nor published.
pub(crate) async fn run_worker(
    worker: WorkerContext,
    index: usize,
    mut shutdown_rx: ShutdownReceiver,
) -> Option<Classification> {
    let request = worker
        .client
        .post(worker.settings.target.clone())
        .header(CONTENT_TYPE, JSON_CONTENT_TYPE)
        .header(API_KEY_HEADER, worker.settings.api_key.clone())
        .json(&RequestPayload::new(index));

    let attempt = if worker.settings.wait_ongoing {
        request.send().await
    } else {
        tokio::select! {
            _ = shutdown_rx.recv() => {
                debug!("request #{} of burst #{} cancelled by shutdown", index, worker.burst);
                return None;
            }
            result = request.send() => result,
        }
    };

    let outcome = RequestOutcome::from_attempt(worker.burst, index, attempt);
    let classification = outcome.classification();
    worker.report.record(classification);

    let channel = match classification {
        Classification::Success => &worker.success_tx,
        Classification::Failure => &worker.error_tx,
    };
    if channel.send(outcome).await.is_err() {
        debug!(
            "collector of burst #{} is gone; request #{} not logged",
            worker.burst, index
        );
    }
    Some(classification)
}
