//! # Exguard
//!
//! Guarded `try` / `catch` / `finally` calls for test harnesses.
//!
//! A guarded call runs a unit of work, hands any exception it raises to a
//! failure handler, and always runs a cleanup handler afterwards:
//!
//! - **Unwinding flavour**: a panic from the work is the exception
//! - **Fallible flavour**: an `Err` from the work is the exception
//! - **Finally override**: a failing cleanup replaces any pending exception
//! - **Opaque payloads**: the failure handler receives exactly what was raised
//!
//! ## Quick Start
//!
//! ```rust
//! use exguard::prelude::*;
//!
//! let guard = ExceptionGuard::with_config(GuardConfig::new().with_quiet(true));
//! let mut caught: Option<ExceptionPayload> = None;
//! let mut finished = false;
//!
//! guard.run(
//!     || {
//!         let divisor = std::hint::black_box(0);
//!         let _ = 1 / divisor;
//!     },
//!     |payload| caught = Some(payload),
//!     || finished = true,
//! );
//!
//! assert!(caught.is_some());
//! assert!(finished);
//! ```
//!
//! Panics can only be caught when the crate under test is built with
//! `panic = "unwind"`, the default.

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod config;
pub mod errors;
pub mod guard;
pub mod hook;
pub mod payload;
pub mod testing;

pub use config::GuardConfig;
pub use errors::{GuardError, GuardResult};
pub use guard::{run, run_catching, try_run, ExceptionGuard, Stage};
pub use payload::{ExceptionPayload, PanicLocation};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::GuardConfig;
    pub use crate::errors::{GuardError, GuardResult};
    pub use crate::guard::{run, run_catching, try_run, ExceptionGuard, Stage};
    pub use crate::payload::{ExceptionPayload, PanicLocation};
}
