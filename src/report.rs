//! Run-wide request counters and the final JSON report.
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::http::Classification;

/// Aggregate counters shared by every worker of a run.
#[derive(Debug, Default)]
pub struct Report {
    total_requests: AtomicU64,
    total_success: AtomicU64,
    total_fail: AtomicU64,
}

impl Report {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one completed attempt: the total plus exactly one of
    /// success/fail.
    pub fn record(&self, classification: Classification) {
        self.total_requests.fetch_add(1, Ordering::Relaxed);
        let counter = match classification {
            Classification::Success => &self.total_success,
            Classification::Failure => &self.total_fail,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Reads the counters. Only consistent once no worker is in flight.
    #[must_use]
    pub fn snapshot(&self) -> ReportSnapshot {
        ReportSnapshot {
            total_requests: self.total_requests.load(Ordering::Acquire),
            total_success: self.total_success.load(Ordering::Acquire),
            total_fail: self.total_fail.load(Ordering::Acquire),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ReportSnapshot {
    pub total_requests: u64,
    pub total_success: u64,
    pub total_fail: u64,
}

impl ReportSnapshot {
    #[must_use]
    pub const fn is_balanced(&self) -> bool {
        match self.total_success.checked_add(self.total_fail) {
            Some(sum) => sum == self.total_requests,
            None => false,
        }
    }
}

/// Renders the snapshot as indented JSON.
///
/// # Errors
///
/// Returns an error when serialization fails.
pub fn render_report(snapshot: &ReportSnapshot) -> AppResult<String> {
    Ok(serde_json::to_string_pretty(snapshot)?)
}
