use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tracing::{debug, error};

use crate::report::Report;
use crate::shutdown::{ShutdownReceiver, ShutdownSender, shutdown_requested};

use super::client::BurstSettings;
use super::collector::{CollectorKind, run_collector};
use super::worker::{WorkerContext, run_worker};

/// Shared state handed to every burst.
#[derive(Debug, Clone)]
pub(crate) struct BurstContext {
    pub(crate) client: Client,
    pub(crate) settings: Arc<BurstSettings>,
    pub(crate) report: Arc<Report>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct BurstSummary {
    pub(crate) burst: u64,
    pub(crate) completed: usize,
    pub(crate) cancelled: usize,
    pub(crate) collected: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchSummary {
    pub bursts: u64,
    pub completed: u64,
    pub cancelled: u64,
    pub collected: u64,
}

impl DispatchSummary {
    fn absorb(&mut self, burst: &BurstSummary) {
        self.completed = self.completed.saturating_add(to_u64(burst.completed));
        self.cancelled = self.cancelled.saturating_add(to_u64(burst.cancelled));
        self.collected = self.collected.saturating_add(to_u64(burst.collected));
    }
}

/// Launches one burst per tick until shutdown is broadcast.
#[derive(Debug)]
pub struct Dispatcher {
    context: BurstContext,
    tick: Duration,
}

impl Dispatcher {
    #[must_use]
    pub fn new(
        client: Client,
        settings: Arc<BurstSettings>,
        report: Arc<Report>,
        tick: Duration,
    ) -> Self {
        Self {
            context: BurstContext {
                client,
                settings,
                report,
            },
            tick,
        }
    }

    /// Runs until shutdown, then waits for the bursts still in flight.
    ///
    /// The first burst fires one tick after start. Bursts run as their own
    /// tasks, so a slow burst never delays the next tick.
    pub async fn run(self, shutdown_tx: ShutdownSender) -> DispatchSummary {
        let mut shutdown_rx = shutdown_tx.subscribe();
        let start = Instant::now()
            .checked_add(self.tick)
            .unwrap_or_else(Instant::now);
        let mut ticker = interval_at(start, self.tick);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let mut bursts = JoinSet::new();
        let mut summary = DispatchSummary::default();

        loop {
            tokio::select! {
                biased;
                _ = shutdown_rx.recv() => break,
                Some(joined) = bursts.join_next() => {
                    record_burst(&mut summary, joined);
                }
                _ = ticker.tick() => {
                    let burst_rx = shutdown_tx.subscribe();
                    if shutdown_requested(&mut shutdown_rx) {
                        break;
                    }
                    summary.bursts = summary.bursts.saturating_add(1);
                    bursts.spawn(run_burst(self.context.clone(), summary.bursts, burst_rx));
                }
            }
        }

        debug!("dispatcher stopping, {} burst(s) still running", bursts.len());
        while let Some(joined) = bursts.join_next().await {
            record_burst(&mut summary, joined);
        }
        summary
    }
}

fn record_burst(
    summary: &mut DispatchSummary,
    joined: Result<BurstSummary, tokio::task::JoinError>,
) {
    match joined {
        Ok(burst) => summary.absorb(&burst),
        Err(err) => error!("burst task failed: {}", err),
    }
}

/// Fires `requests_per_tick` workers at once, waits for all of them, then
/// waits for both collectors to drain the burst's channels.
///
/// `shutdown_rx` must be subscribed before the burst task is spawned. A
/// shutdown that lands before the workers start skips the whole burst.
pub(crate) async fn run_burst(
    context: BurstContext,
    burst: u64,
    mut shutdown_rx: ShutdownReceiver,
) -> BurstSummary {
    let size = context.settings.requests_per_tick.get();
    let verbose = context.settings.verbose;

    let worker_rxs: Vec<ShutdownReceiver> =
        (0..size).map(|_| shutdown_rx.resubscribe()).collect();
    if shutdown_requested(&mut shutdown_rx) {
        debug!("burst #{} skipped, shutdown already requested", burst);
        return BurstSummary {
            burst,
            cancelled: size,
            ..BurstSummary::default()
        };
    }

    // Capacity covers the whole burst, so publishing never waits on a collector.
    let (success_tx, success_rx) = mpsc::channel(size);
    let (error_tx, error_rx) = mpsc::channel(size);

    let mut workers = JoinSet::new();
    for (index, worker_rx) in (1..=size).zip(worker_rxs) {
        let worker = WorkerContext {
            burst,
            client: context.client.clone(),
            settings: Arc::clone(&context.settings),
            report: Arc::clone(&context.report),
            success_tx: success_tx.clone(),
            error_tx: error_tx.clone(),
        };
        workers.spawn(run_worker(worker, index, worker_rx));
    }
    drop(success_tx);
    drop(error_tx);

    let success_collector = tokio::spawn(run_collector(
        CollectorKind::Success,
        burst,
        success_rx,
        verbose,
    ));
    let error_collector = tokio::spawn(run_collector(
        CollectorKind::Error,
        burst,
        error_rx,
        verbose,
    ));

    let mut summary = BurstSummary {
        burst,
        ..BurstSummary::default()
    };
    while let Some(joined) = workers.join_next().await {
        match joined {
            Ok(Some(_)) => summary.completed = summary.completed.saturating_add(1),
            Ok(None) => summary.cancelled = summary.cancelled.saturating_add(1),
            Err(err) => error!("worker of burst #{} failed: {}", burst, err),
        }
    }

    for collector in [success_collector, error_collector] {
        match collector.await {
            Ok(drained) => summary.collected = summary.collected.saturating_add(drained),
            Err(err) => error!("collector of burst #{} failed: {}", burst, err),
        }
    }

    debug!(
        "burst #{} done: {} completed, {} cancelled, {} logged",
        burst, summary.completed, summary.cancelled, summary.collected
    );
    summary
}

fn to_u64(value: usize) -> u64 {
    u64::try_from(value).unwrap_or(u64::MAX)
}
