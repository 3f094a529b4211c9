//! Wrapped-command execution.

use std::process::Command;
use std::time::{Duration, SystemTime};

use anyhow::{Context, Result};

/// Wall-clock timing of one executed build step.
#[derive(Debug, Clone, Copy)]
pub struct StepTiming {
    pub start: SystemTime,
    pub end: SystemTime,
}

impl StepTiming {
    /// Duration the step ran for.
    pub fn elapsed(&self) -> Duration {
        self.end.duration_since(self.start).unwrap_or_default()
    }
}

/// Run the build step through `sh -c`, capturing start/end timestamps.
///
/// The step's own exit status is not inspected: tracing proceeds whether or
/// not the step succeeded, and the build tool only ever sees this wrapper's
/// exit code.
pub fn run_step(command_line: &str) -> Result<StepTiming> {
    let start = SystemTime::now();
    Command::new("sh")
        .arg("-c")
        .arg(command_line)
        .status()
        .with_context(|| format!("failed to spawn build step: {command_line}"))?;
    let end = SystemTime::now();
    Ok(StepTiming { start, end })
}

/// Render an elapsed duration for the console line as `H:MM:SS[.micros]`,
/// the fractional part omitted when zero.
pub fn format_elapsed(d: Duration) -> String {
    let total = d.as_secs();
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;
    let micros = d.subsec_micros();
    if micros == 0 {
        format!("{hours}:{minutes:02}:{seconds:02}")
    } else {
        format!("{hours}:{minutes:02}:{seconds:02}.{micros:06}")
    }
}
