use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracebuild::{classify, cli::Cli, epoch, runner, trace_event::TraceEvent};
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber for debug output. The invocation contract
/// has no room for a --debug flag, so this is gated on the environment.
fn init_tracing() {
    if std::env::var_os("TRACEBUILD_DEBUG").is_some() {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive(tracing::Level::DEBUG.into()),
            )
            .with_writer(std::io::stderr)
            .init();
    }
}

/// One invocation: run the step, classify it, coordinate the epoch, append
/// the trace event. Every failure propagates here and becomes exit code 1.
fn run(cli: &Cli) -> Result<()> {
    let command_line = cli.command_line();
    let timing = runner::run_step(&command_line)?;

    let tokens = cli.tokens();
    let desc = classify::classify(&tokens)?;

    let elapsed = timing.elapsed();
    println!(
        "SCRIPTY SCRIPT {desc} done in {} {} milliseconds",
        runner::format_elapsed(elapsed),
        elapsed.as_millis()
    );

    let epoch = epoch::get_or_create_epoch(&tracebuild::epoch_file(), epoch::ACQUIRE_DEADLINE)?;

    let ts_us = (epoch::unix_timestamp(timing.start) - epoch) * 1_000_000.0;
    let dur_us = elapsed.as_secs_f64() * 1_000_000.0;
    TraceEvent::complete(desc, ts_us, dur_us).append_to(&tracebuild::trace_file())?;

    Ok(())
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err:#}");
            ExitCode::FAILURE
        }
    }
}
