use std::sync::Arc;
use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, info};

use crate::args::LoadArgs;
use crate::error::AppResult;
use crate::http::{BurstSettings, Dispatcher, build_client, parse_api_key, parse_target_url};
use crate::report::{Report, ReportSnapshot};
use crate::shutdown::ShutdownSender;

/// Period between two bursts.
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Fully resolved, validated settings of one run.
#[derive(Debug, Clone)]
pub struct RunSettings {
    pub burst: BurstSettings,
    pub duration: Duration,
    pub tick: Duration,
    pub request_timeout: Duration,
}

impl RunSettings {
    /// Validates the CLI/config values that are not already typed.
    ///
    /// # Errors
    ///
    /// Returns an error for an invalid target URL or API key.
    pub fn from_args(args: &LoadArgs) -> AppResult<Self> {
        Ok(Self {
            burst: BurstSettings {
                target: parse_target_url(&args.url)?,
                api_key: parse_api_key(&args.key)?,
                requests_per_tick: args.requests_per_tick,
                verbose: args.verbose,
                wait_ongoing: args.wait_ongoing,
            },
            duration: Duration::from_secs(args.duration.get()),
            tick: TICK_INTERVAL,
            request_timeout: args.request_timeout,
        })
    }
}

/// Runs bursts for the configured duration and returns the final counts.
///
/// The run lasts `duration` plus one tick, since the first burst only fires
/// after one tick. A shutdown broadcast ends it early. Either way the
/// dispatcher is stopped and joined before the report is read.
///
/// # Errors
///
/// Returns an error when the HTTP client cannot be built or the dispatcher
/// task fails.
pub async fn run_load(
    settings: RunSettings,
    shutdown_tx: &ShutdownSender,
) -> AppResult<ReportSnapshot> {
    let client = build_client(settings.request_timeout)?;
    let report = Arc::new(Report::new());
    let dispatcher = Dispatcher::new(
        client,
        Arc::new(settings.burst),
        Arc::clone(&report),
        settings.tick,
    );

    let mut shutdown_rx = shutdown_tx.subscribe();
    info!("Waiting for all requests to be executed...");
    let dispatch = tokio::spawn(dispatcher.run(shutdown_tx.clone()));

    let run_for = settings.duration.saturating_add(settings.tick);
    let interrupted = tokio::select! {
        () = sleep(run_for) => false,
        _ = shutdown_rx.recv() => {
            info!("Run stopped before the configured duration elapsed.");
            true
        }
    };
    if !interrupted {
        drop(shutdown_tx.send(()));
    }

    let summary = dispatch.await?;
    debug!(
        "{} burst(s) dispatched: {} completed, {} cancelled, {} logged",
        summary.bursts, summary.completed, summary.cancelled, summary.collected
    );
    info!("Requests executed successfully.");

    Ok(report.snapshot())
}
