//! Chrome Trace Event records.
//!
//! One complete ("X") event is appended per build step. The trace file is a
//! fragment: comma-terminated JSON objects, one per line, that an external
//! consumer wraps in `[ ... ]` before feeding to a trace viewer. Events from
//! concurrent steps land in append order, so consumers sort by `ts`.

use std::path::Path;
use std::process::Command;

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

/// A single complete event in Chrome Trace Event Format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceEvent {
    pub pid: u32,
    pub tid: u32,
    /// Microseconds from the shared epoch to the step's start.
    pub ts: f64,
    /// Microseconds the step ran for.
    pub dur: f64,
    /// Event phase; always "X" (complete event).
    pub ph: String,
    pub cat: String,
    /// The classifier's description of the step.
    pub name: String,
}

impl TraceEvent {
    /// Build a complete event for one build step. `pid`/`tid` are constant
    /// placeholders; the trace has no real process structure.
    pub fn complete(name: impl Into<String>, ts_us: f64, dur_us: f64) -> Self {
        Self {
            pid: 0,
            tid: 0,
            ts: ts_us,
            dur: dur_us,
            ph: "X".to_string(),
            cat: "app".to_string(),
            name: name.into(),
        }
    }

    /// The comma-terminated fragment line appended to the trace file.
    pub fn fragment_line(&self) -> Result<String> {
        Ok(format!("{},", serde_json::to_string(self)?))
    }

    /// Append this event to `trace_file` via a spawned `sh` redirect.
    ///
    /// The append deliberately goes through the shell's `>>` rather than an
    /// in-process write; short appends are atomic enough that concurrent
    /// invocations' lines do not interleave.
    pub fn append_to(&self, trace_file: &Path) -> Result<()> {
        let line = self.fragment_line()?;
        let script = format!(
            "echo {} >> {}",
            shell_quote(&line),
            shell_quote(&trace_file.to_string_lossy())
        );
        tracing::debug!(%script, "appending trace event");
        let status = Command::new("sh").arg("-c").arg(&script).status()?;
        if !status.success() {
            bail!("trace append exited with {status}");
        }
        Ok(())
    }
}

/// Single-quote `s` for POSIX sh, escaping embedded single quotes.
fn shell_quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', r"'\''"))
}
