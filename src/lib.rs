//! tracebuild - build-step tracer emitting Chrome Trace Event timings
//!
//! Wrap a build tool's per-step shell (`make SHELL=/path/to/tracebuild`) to
//! run each step, classify its command line into a readable description, and
//! append one Chrome Trace Event per step to a shared trace file. Concurrent
//! steps agree on a common timebase through a filesystem-coordinated epoch
//! file; no central coordinator is involved.

use std::env;
use std::path::PathBuf;

pub mod classify;
pub mod cli;
pub mod epoch;
pub mod runner;
pub mod trace_event;

/// Default location of the shared epoch file.
pub const DEFAULT_EPOCH_FILE: &str = "/tmp/buildtime.dat";

/// Default location of the shared trace fragment file.
pub const DEFAULT_TRACE_FILE: &str = "/tmp/tmp.json";

/// Epoch file path. The invocation contract leaves no room for flags, so the
/// `TRACEBUILD_EPOCH_FILE` environment variable is the override seam.
pub fn epoch_file() -> PathBuf {
    env::var_os("TRACEBUILD_EPOCH_FILE")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_EPOCH_FILE))
}

/// Trace file path, overridable via `TRACEBUILD_TRACE_FILE`.
pub fn trace_file() -> PathBuf {
    env::var_os("TRACEBUILD_TRACE_FILE")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_TRACE_FILE))
}
