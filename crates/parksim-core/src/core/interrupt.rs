use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{Context, Result};

static INTERRUPTED: AtomicBool = AtomicBool::new(false);

#[cfg(test)]
thread_local! {
    static TEST_INTERRUPT_OVERRIDE: std::cell::Cell<Option<bool>> = const { std::cell::Cell::new(None) };
}

/// Initializes the Ctrl+C handler.
///
/// The handler sets an interrupt flag only; it does not print anything.
/// Only the automatic loop checks the flag (between readings) and prints the
/// closing message itself, so install this when automatic mode starts. A
/// second Ctrl+C force-exits with status 130.
///
/// # Errors
/// Returns an error if a handler is already registered or the OS refuses it.
pub fn init() -> Result<()> {
    ctrlc::set_handler(trigger).context("Error setting Ctrl+C handler")
}

fn trigger() {
    if INTERRUPTED.swap(true, Ordering::SeqCst) {
        // Second Ctrl+C - force exit
        std::process::exit(130);
    }
}

/// Checks if an interrupt has been requested.
pub fn is_interrupted() -> bool {
    #[cfg(test)]
    if let Some(val) = TEST_INTERRUPT_OVERRIDE.with(std::cell::Cell::get) {
        return val;
    }
    INTERRUPTED.load(Ordering::SeqCst)
}

/// Resets the interrupt flag.
#[cfg(test)]
pub(crate) fn reset() {
    INTERRUPTED.store(false, Ordering::SeqCst);
    TEST_INTERRUPT_OVERRIDE.with(|c| c.set(None));
}

/// Forces `is_interrupted()` for the current test thread only.
#[cfg(test)]
pub(crate) fn set_test_override(value: Option<bool>) {
    TEST_INTERRUPT_OVERRIDE.with(|c| c.set(value));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_override_is_thread_local() {
        set_test_override(Some(true));
        assert!(is_interrupted());

        let other = std::thread::spawn(is_interrupted).join().unwrap();
        assert!(!other);

        reset();
        assert!(!is_interrupted());
    }
}
