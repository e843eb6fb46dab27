use tracing::info;

use crate::args::LoadArgs;
use crate::error::AppResult;
use crate::report::{ReportSnapshot, render_report};

/// Visible characters of the API key kept when logging the configuration.
const KEY_VISIBLE_CHARS: usize = 4;

pub(crate) fn log_configuration(args: &LoadArgs) {
    info!("url: {}", args.url);
    info!("key: {}", mask_key(&args.key));
    info!("rqs: {}", args.requests_per_tick.get());
    info!("duration: {}", args.duration.get());
    info!("timeout: {:?}", args.request_timeout);
    info!("verbose: {}", args.verbose);
}

/// Writes the report banner to the log and the JSON report to stdout.
///
/// # Errors
///
/// Returns an error when the report cannot be serialized.
pub(crate) fn print_report(snapshot: &ReportSnapshot) -> AppResult<()> {
    let rendered = render_report(snapshot)?;
    info!("--------------------REPORT--------------------");
    println!("{}", rendered);
    Ok(())
}

pub(crate) fn mask_key(key: &str) -> String {
    let total = key.chars().count();
    if total == 0 {
        return "(none)".to_owned();
    }
    if total <= KEY_VISIBLE_CHARS {
        return "*".repeat(total);
    }
    let visible: String = key.chars().take(KEY_VISIBLE_CHARS).collect();
    format!(
        "{}{}",
        visible,
        "*".repeat(total.saturating_sub(KEY_VISIBLE_CHARS))
    )
}
