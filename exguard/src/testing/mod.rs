//! Testing utilities for guarded calls.
//!
//! This module provides:
//! - A stage recorder for checking which handlers ran, and in what order
//! - Assertions over recorded stages
//! - Helpers for catching propagated panics and enabling tracing output

mod assertions;
mod recorder;

pub use assertions::{assert_invoked_once, assert_not_invoked, assert_stage_order};
pub use recorder::StageRecorder;

use crate::payload::ExceptionPayload;
use std::panic::{self, AssertUnwindSafe};
use tracing_subscriber::EnvFilter;

/// Runs `f` and returns the panic it raised.
///
/// # Panics
///
/// Panics if `f` returns normally.
pub fn expect_panic<F: FnOnce()>(f: F) -> ExceptionPayload {
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(()) => panic!("Expected a panic, but the closure returned normally"),
        Err(raw) => ExceptionPayload::from_raw(raw, None),
    }
}

/// Installs a fmt subscriber writing through the test harness.
///
/// Honors `RUST_LOG` and defaults to `warn`. Safe to call from every test.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}
