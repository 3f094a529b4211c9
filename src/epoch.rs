//! Shared epoch coordination.
//!
//! Every concurrent wrapper invocation in one build session must agree on a
//! single reference timestamp so that trace offsets share an origin. The
//! first invocation to win an exclusive-create race on the epoch file writes
//! the current wall-clock time into it; every other invocation reads that
//! value back. The filesystem namespace is the only coordination medium:
//! exactly one `create_new` succeeds, all losers observe `AlreadyExists` and
//! fall back to reading.
//!
//! The epoch file is never mutated after creation. Cleaning it up between
//! build sessions is the operator's job, not ours.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use thiserror::Error;

/// How long an invocation may spin trying to acquire the epoch before
/// giving up. Guards against a corrupted or permanently unreadable file.
pub const ACQUIRE_DEADLINE: Duration = Duration::from_secs(5);

#[derive(Error, Debug)]
pub enum EpochError {
    #[error("couldn't acquire build time")]
    AcquisitionTimeout,

    #[error("epoch file error: {0}")]
    Io(#[from] io::Error),
}

/// Read the shared epoch from `path`, creating it with the current time if
/// this invocation wins the first-writer race.
///
/// Returns the epoch as a float Unix timestamp. Concurrent callers all
/// return the identical value: whichever one's exclusive create succeeds
/// determines it permanently.
pub fn get_or_create_epoch(path: &Path, deadline: Duration) -> Result<f64, EpochError> {
    let started = Instant::now();

    loop {
        if started.elapsed() > deadline {
            return Err(EpochError::AcquisitionTimeout);
        }

        match fs::read_to_string(path) {
            Ok(contents) => match contents.trim().parse::<f64>() {
                Ok(epoch) => return Ok(epoch),
                Err(_) => {
                    // The winner has created the file but its write may not
                    // be visible yet; keep retrying until the deadline.
                    tracing::debug!(path = %path.display(), "epoch file not yet parseable, retrying");
                    continue;
                }
            },
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                match OpenOptions::new().write(true).create_new(true).open(path) {
                    Ok(mut file) => {
                        let now = unix_now();
                        write!(file, "{now}")?;
                        tracing::debug!(epoch = now, "won the epoch create race");
                        // Re-read on the next pass so every caller leaves
                        // through the same code path.
                    }
                    Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                        tracing::debug!("lost the epoch create race, retrying");
                    }
                    Err(e) => return Err(EpochError::Io(e)),
                }
            }
            Err(e) => return Err(EpochError::Io(e)),
        }
    }
}

/// Current wall-clock time as a float Unix timestamp.
pub fn unix_now() -> f64 {
    unix_timestamp(SystemTime::now())
}

/// Seconds since the Unix epoch for `t`, as f64.
pub fn unix_timestamp(t: SystemTime) -> f64 {
    match t.duration_since(UNIX_EPOCH) {
        Ok(d) => d.as_secs_f64(),
        Err(e) => -e.duration().as_secs_f64(),
    }
}
