use futures_util::StreamExt;
use reqwest::Response;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

use super::outcome::{OutcomePayload, RequestOutcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CollectorKind {
    Success,
    Error,
}

/// Logs every outcome published on `outcome_rx` until all senders of the
/// burst are dropped. Returns how many outcomes were drained.
pub(crate) async fn run_collector(
    kind: CollectorKind,
    burst: u64,
    mut outcome_rx: mpsc::Receiver<RequestOutcome>,
    verbose: bool,
) -> usize {
    let mut drained: usize = 0;
    while let Some(outcome) = outcome_rx.recv().await {
        if drained == 0 {
            info!("burst #{}", burst);
        }
        drained = drained.saturating_add(1);
        match kind {
            CollectorKind::Success => log_success(outcome, verbose).await,
            CollectorKind::Error => log_failure(outcome, verbose).await,
        }
    }
    drained
}

async fn log_success(outcome: RequestOutcome, verbose: bool) {
    let RequestOutcome { index, payload, .. } = outcome;
    match payload {
        OutcomePayload::Response(response) => {
            info!(
                "request #{} >> http status response {}",
                index,
                response.status().as_u16()
            );
            if verbose {
                if let Some(body) = read_body(index, response).await {
                    info!("request #{} >> response: {}", index, pretty_body(&body));
                }
            } else {
                release_body(index, response).await;
            }
        }
        OutcomePayload::Transport(err) => {
            // Workers only route responses here.
            warn!("error on request #{} >> {}", index, err);
        }
    }
}

async fn log_failure(outcome: RequestOutcome, verbose: bool) {
    let RequestOutcome { index, payload, .. } = outcome;
    match payload {
        OutcomePayload::Transport(err) => {
            warn!("error on request #{} >> {}", index, err);
        }
        OutcomePayload::Response(response) => {
            warn!(
                "error on request #{} >> http status code: {}",
                index,
                response.status().as_u16()
            );
            if verbose {
                if let Some(body) = read_body(index, response).await
                    && !body.is_empty()
                {
                    info!(
                        "request #{} >> response: {}",
                        index,
                        String::from_utf8_lossy(&body)
                    );
                }
            } else {
                release_body(index, response).await;
            }
        }
    }
}

async fn read_body(index: usize, response: Response) -> Option<Vec<u8>> {
    match response.bytes().await {
        Ok(bytes) => Some(bytes.to_vec()),
        Err(err) => {
            error!("request #{} >> failed to read response body: {}", index, err);
            None
        }
    }
}

// Drains without buffering so the connection can go back to the pool.
async fn release_body(index: usize, response: Response) {
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        if let Err(err) = chunk {
            error!("request #{} >> failed to drain response body: {}", index, err);
            return;
        }
    }
}

/// Indents JSON bodies; anything else is returned as (lossy) text.
pub(crate) fn pretty_body(body: &[u8]) -> String {
    serde_json::from_slice::<serde_json::Value>(body)
        .ok()
        .and_then(|value| serde_json::to_string_pretty(&value).ok())
        .unwrap_or_else(|| String::from_utf8_lossy(body).into_owned())
}
