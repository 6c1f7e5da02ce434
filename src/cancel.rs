//! Ctrl+C handling for batch scans.
//!
//! A batch finishes the tokens already in flight and skips the rest.

use std::sync::atomic::{AtomicBool, Ordering};

static CANCELLED: AtomicBool = AtomicBool::new(false);

pub fn is_cancelled() -> bool {
    CANCELLED.load(Ordering::SeqCst)
}

/// Request cancellation of the running batch.
pub fn cancel() {
    CANCELLED.store(true, Ordering::SeqCst);
}

/// Clear a previous cancellation before starting a new batch.
pub fn reset() {
    CANCELLED.store(false, Ordering::SeqCst);
}

/// Install the Ctrl+C handler. Later calls are no-ops.
pub fn register_handler() {
    if ctrlc::set_handler(cancel).is_err() {
        log::debug!("Ctrl+C handler already installed");
    }
}
