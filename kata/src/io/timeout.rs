//! Run a computation on a worker thread with a wall-clock budget.
//!
//! Used to guard against accidental infinite loops on pathological input. A
//! worker that overruns its budget is abandoned, not cancelled: the thread
//! keeps running detached and its eventual result is discarded.

use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::{debug, error, instrument, warn};

#[derive(Debug, Error)]
pub enum TimeoutError {
    #[error("took longer than {0:?} (infinite loop?)")]
    TimedOut(Duration),
    #[error("worker panicked before producing a result")]
    Panicked,
    #[error("spawn worker thread")]
    Spawn(#[source] std::io::Error),
}

/// Call `f` on a fresh thread and wait at most `timeout` for its result.
#[instrument(skip_all, fields(timeout_ms = timeout.as_millis() as u64))]
pub fn with_timeout<T, F>(timeout: Duration, f: F) -> Result<T, TimeoutError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    let (sender, receiver) = mpsc::channel();
    let started = Instant::now();

    debug!("spawning worker thread");
    thread::Builder::new()
        .name("kata-worker".to_string())
        .spawn(move || {
            // The caller may have stopped listening already.
            let _ = sender.send(f());
        })
        .map_err(TimeoutError::Spawn)?;

    match receiver.recv_timeout(timeout) {
        Ok(value) => {
            debug!(elapsed_ms = started.elapsed().as_millis() as u64, "worker finished");
            Ok(value)
        }
        Err(RecvTimeoutError::Timeout) => {
            warn!("worker timed out, abandoning");
            Err(TimeoutError::TimedOut(timeout))
        }
        Err(RecvTimeoutError::Disconnected) => {
            error!("worker exited without a result");
            Err(TimeoutError::Panicked)
        }
    }
}
