use super::summary::mask_key;
use super::*;
use crate::args::PositiveUsize;
use crate::http::test_support::{spawn_stalled_server, spawn_status_server, unreachable_url};
use crate::http::{BurstSettings, parse_api_key, parse_target_url};
use crate::report::ReportSnapshot;
use crate::shutdown::shutdown_channel;
use std::future::Future;
use std::time::{Duration, Instant};

fn run_async_test<F>(future: F) -> Result<(), String>
where
    F: Future<Output = Result<(), String>>,
{
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .map_err(|err| format!("Failed to build runtime: {}", err))?;
    runtime.block_on(future)
}

fn fast_settings(url: &str, requests_per_tick: usize, ticks: u32) -> Result<RunSettings, String> {
    let tick = Duration::from_millis(100);
    Ok(RunSettings {
        burst: BurstSettings {
            target: parse_target_url(url).map_err(|err| err.to_string())?,
            api_key: parse_api_key("key").map_err(|err| err.to_string())?,
            requests_per_tick: PositiveUsize::try_from(requests_per_tick)
                .map_err(|err| err.to_string())?,
            verbose: false,
            wait_ongoing: false,
        },
        duration: tick.saturating_mul(ticks),
        tick,
        request_timeout: Duration::from_secs(2),
    })
}

fn check_range(snapshot: &ReportSnapshot, expected: u64, slack: u64) -> Result<(), String> {
    let low = expected.saturating_sub(slack);
    let high = expected.saturating_add(slack);
    if snapshot.total_requests < low || snapshot.total_requests > high {
        return Err(format!(
            "Expected {}..={} requests, got {:?}",
            low, high, snapshot
        ));
    }
    if !snapshot.is_balanced() {
        return Err(format!("Unbalanced report: {:?}", snapshot));
    }
    Ok(())
}

#[test]
fn run_with_healthy_endpoint_counts_every_burst() -> Result<(), String> {
    run_async_test(async {
        let server = spawn_status_server(200, r#"{"ok":true}"#).await?;
        let (shutdown_tx, _) = shutdown_channel();

        let snapshot = run_load(fast_settings(&server.url, 5, 3)?, &shutdown_tx)
            .await
            .map_err(|err| err.to_string())?;

        check_range(&snapshot, 15, 5)?;
        if snapshot.total_fail != 0 {
            return Err(format!("Expected no failures, got {:?}", snapshot));
        }
        Ok(())
    })
}

#[test]
fn run_with_failing_endpoint_counts_only_failures() -> Result<(), String> {
    run_async_test(async {
        let server = spawn_status_server(500, "down").await?;
        let (shutdown_tx, _) = shutdown_channel();

        let snapshot = run_load(fast_settings(&server.url, 2, 2)?, &shutdown_tx)
            .await
            .map_err(|err| err.to_string())?;

        check_range(&snapshot, 4, 2)?;
        if snapshot.total_success != 0 || snapshot.total_fail != snapshot.total_requests {
            return Err(format!("Expected only failures, got {:?}", snapshot));
        }
        Ok(())
    })
}

#[test]
fn run_against_unreachable_endpoint_still_reports() -> Result<(), String> {
    run_async_test(async {
        let url = unreachable_url().await?;
        let (shutdown_tx, _) = shutdown_channel();

        let snapshot = run_load(fast_settings(&url, 1, 1)?, &shutdown_tx)
            .await
            .map_err(|err| err.to_string())?;

        if snapshot.total_requests == 0 {
            return Err("Expected at least one attempt".to_owned());
        }
        if snapshot.total_success != 0 || !snapshot.is_balanced() {
            return Err(format!("Expected only failures, got {:?}", snapshot));
        }
        Ok(())
    })
}

#[test]
fn external_shutdown_ends_run_early() -> Result<(), String> {
    run_async_test(async {
        let server = spawn_status_server(204, "").await?;
        let (shutdown_tx, _) = shutdown_channel();
        let mut settings = fast_settings(&server.url, 1, 1)?;
        settings.duration = Duration::from_secs(60);

        let trigger = shutdown_tx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(350)).await;
            drop(trigger.send(()));
        });

        let started = Instant::now();
        let snapshot = run_load(settings, &shutdown_tx)
            .await
            .map_err(|err| err.to_string())?;

        if started.elapsed() > Duration::from_secs(5) {
            return Err(format!("Run did not stop early: {:?}", started.elapsed()));
        }
        if !snapshot.is_balanced() || snapshot.total_fail != 0 {
            return Err(format!("Unexpected report: {:?}", snapshot));
        }
        Ok(())
    })
}

fn stalled_settings(url: &str) -> Result<RunSettings, String> {
    let mut settings = fast_settings(url, 2, 2)?;
    settings.request_timeout = Duration::from_secs(30);
    Ok(settings)
}

#[test]
fn deadline_cancels_requests_to_stalled_endpoint() -> Result<(), String> {
    run_async_test(async {
        let server = spawn_stalled_server().await?;
        let (shutdown_tx, _) = shutdown_channel();
        let settings = stalled_settings(&server.url)?;
        let bound = settings
            .duration
            .saturating_add(settings.tick.saturating_mul(2))
            .saturating_add(Duration::from_millis(500));

        let started = Instant::now();
        let snapshot = run_load(settings, &shutdown_tx)
            .await
            .map_err(|err| err.to_string())?;

        if started.elapsed() > bound {
            return Err(format!("Run outlived its deadline: {:?}", started.elapsed()));
        }
        if snapshot != ReportSnapshot::default() {
            return Err(format!("Cancelled attempts were counted: {:?}", snapshot));
        }
        if server.requests().is_empty() {
            return Err("Expected the stalled endpoint to see requests".to_owned());
        }
        Ok(())
    })
}

#[test]
fn repeated_interrupt_cancels_requests_to_stalled_endpoint() -> Result<(), String> {
    run_async_test(async {
        let server = spawn_stalled_server().await?;
        let (shutdown_tx, _) = shutdown_channel();
        let mut settings = stalled_settings(&server.url)?;
        settings.duration = Duration::from_secs(60);

        // Signal handler and a second interrupt both broadcast.
        let trigger = shutdown_tx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(250)).await;
            drop(trigger.send(()));
            drop(trigger.send(()));
        });

        let started = Instant::now();
        let snapshot = run_load(settings, &shutdown_tx)
            .await
            .map_err(|err| err.to_string())?;

        if started.elapsed() > Duration::from_secs(2) {
            return Err(format!("Run did not stop on interrupt: {:?}", started.elapsed()));
        }
        if snapshot != ReportSnapshot::default() {
            return Err(format!("Cancelled attempts were counted: {:?}", snapshot));
        }
        Ok(())
    })
}

#[test]
fn settings_reject_invalid_target() -> Result<(), String> {
    use clap::Parser;

    let args = crate::args::LoadArgs::try_parse_from(["tickburst", "-u", "mailto:ops@example.com"])
        .map_err(|err| err.to_string())?;
    if RunSettings::from_args(&args).is_ok() {
        return Err("Expected mailto URL to be rejected".to_owned());
    }

    let args = crate::args::LoadArgs::try_parse_from(["tickburst", "-u", "http://localhost:8080"])
        .map_err(|err| err.to_string())?;
    let settings = RunSettings::from_args(&args).map_err(|err| err.to_string())?;
    if settings.tick != TICK_INTERVAL || settings.duration != Duration::from_secs(1) {
        return Err(format!("Unexpected defaults: {:?}", settings));
    }
    Ok(())
}

#[test]
fn mask_key_hides_all_but_prefix() -> Result<(), String> {
    let cases = [
        ("", "(none)"),
        ("abc", "***"),
        ("abcdefgh", "abcd****"),
    ];
    for (input, expected) in cases {
        let masked = mask_key(input);
        if masked != expected {
            return Err(format!("mask_key({:?}) = {:?}", input, masked));
        }
    }
    Ok(())
}
