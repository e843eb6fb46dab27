use clap::{ArgMatches, CommandFactory, FromArgMatches};

use crate::app::summary::{log_configuration, print_report};
use crate::app::{RunSettings, run_load};
use crate::args::LoadArgs;
use crate::config::{apply_config, load_config};
use crate::error::AppResult;
use crate::shutdown::{setup_signal_shutdown_handler, shutdown_channel};

/// Parses arguments, runs the load and prints the report.
///
/// # Errors
///
/// Returns configuration errors before the run starts, and runtime or
/// serialization errors after it.
pub fn run() -> AppResult<()> {
    let matches = LoadArgs::command().get_matches();
    let args = resolve_args(&matches)?;

    crate::logger::init_logging(args.verbose, args.no_color);
    log_configuration(&args);
    let settings = RunSettings::from_args(&args)?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(run_async(settings))
}

/// Builds the effective arguments: CLI values, then the config file for
/// anything not given on the command line.
///
/// # Errors
///
/// Returns an error when the arguments or the config file are invalid.
pub fn resolve_args(matches: &ArgMatches) -> AppResult<LoadArgs> {
    let mut args = LoadArgs::from_arg_matches(matches)?;
    if let Some(config) = load_config(args.config.as_deref())? {
        apply_config(&mut args, matches, &config)?;
    }
    Ok(args)
}

async fn run_async(settings: RunSettings) -> AppResult<()> {
    let (shutdown_tx, _) = shutdown_channel();
    let signal_handler = setup_signal_shutdown_handler(&shutdown_tx);

    let result = run_load(settings, &shutdown_tx).await;
    drop(shutdown_tx.send(()));
    drop(signal_handler.await);

    print_report(&result?)
}
