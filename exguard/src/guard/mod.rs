//! Guarded try/catch/finally calls.
//!
//! A guarded call runs three stages in order:
//!
//! 1. `work`
//! 2. `on_exception`, only if `work` raised, with the exact payload it raised
//! 3. `on_finally`, always, exactly once
//!
//! An exception from `work` is recovered by handing it to `on_exception`.
//! Exceptions from `on_exception` or `on_finally` propagate to the caller, and
//! one raised by `on_finally` replaces any exception still pending from the
//! earlier stages.
//!
//! Two flavours share that contract:
//!
//! - [`ExceptionGuard::run`] treats an unwinding panic as the exception.
//! - [`ExceptionGuard::try_run`] treats an `Err` as the exception.

mod fallible;
mod unwind;


use crate::config::GuardConfig;
use crate::payload::ExceptionPayload;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A stage of a guarded call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// The work under observation.
    Work,
    /// The failure handler.
    OnException,
    /// The cleanup handler.
    OnFinally,
}

impl Stage {
    /// Returns the stage name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Work => "work",
            Self::OnException => "on_exception",
            Self::OnFinally => "on_finally",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Runs guarded calls with a fixed configuration.
///
/// The guard holds no state between calls. Every callable is borrowed or moved
/// for the duration of a single call and dropped before it returns.
#[derive(Debug, Clone, Default)]
pub struct ExceptionGuard {
    config: GuardConfig,
}

impl ExceptionGuard {
    /// Creates a guard with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a guard with the given configuration.
    #[must_use]
    pub fn with_config(config: GuardConfig) -> Self {
        Self { config }
    }

    /// Returns the guard's configuration.
    #[must_use]
    pub fn config(&self) -> &GuardConfig {
        &self.config
    }

    /// Runs `work`, hands a panic from it to `on_exception`, then always runs
    /// `on_finally`.
    ///
    /// Returns normally unless `on_exception` or `on_finally` panics. A panic
    /// from `on_finally` wins over one from `on_exception`.
    ///
    /// ```
    /// use exguard::{ExceptionGuard, GuardConfig};
    ///
    /// let guard = ExceptionGuard::with_config(GuardConfig::new().with_quiet(true));
    /// let mut caught = None;
    /// let mut cleaned = false;
    ///
    /// guard.run(
    ///     || panic!("index out of range"),
    ///     |payload| caught = Some(payload),
    ///     || cleaned = true,
    /// );
    ///
    /// assert_eq!(caught.unwrap().message(), Some("index out of range"));
    /// assert!(cleaned);
    /// ```
    pub fn run<W, H, F>(&self, work: W, on_exception: H, on_finally: F)
    where
        W: FnOnce(),
        H: FnOnce(ExceptionPayload),
        F: FnOnce(),
    {
        unwind::run(&self.config, work, on_exception, on_finally);
    }

    /// [`run`](Self::run) with an empty cleanup stage.
    pub fn run_catching<W, H>(&self, work: W, on_exception: H)
    where
        W: FnOnce(),
        H: FnOnce(ExceptionPayload),
    {
        self.run(work, on_exception, || {});
    }

    /// Result-based guarded call.
    ///
    /// `Err` from `work` goes to `on_exception`, which may recover it with
    /// `Ok(())` or replace it. `on_finally` always runs, and its `Err` replaces
    /// anything pending. Panics are not caught as exceptions, but `on_finally`
    /// still runs before they continue unwinding.
    ///
    /// ```
    /// use exguard::ExceptionGuard;
    ///
    /// let mut seen = Vec::new();
    /// let result: Result<(), String> = ExceptionGuard::new().try_run(
    ///     || Err("disk full".to_string()),
    ///     |error| {
    ///         seen.push(error);
    ///         Ok(())
    ///     },
    ///     || Err("unmount failed".to_string()),
    /// );
    ///
    /// assert_eq!(seen, vec!["disk full".to_string()]);
    /// assert_eq!(result, Err("unmount failed".to_string()));
    /// ```
    pub fn try_run<E, W, H, F>(&self, work: W, on_exception: H, on_finally: F) -> Result<(), E>
    where
        W: FnOnce() -> Result<(), E>,
        H: FnOnce(E) -> Result<(), E>,
        F: FnOnce() -> Result<(), E>,
    {
        fallible::run(&self.config, work, on_exception, on_finally)
    }
}

/// Runs a guarded call with the default configuration.
///
/// See [`ExceptionGuard::run`].
pub fn run<W, H, F>(work: W, on_exception: H, on_finally: F)
where
    W: FnOnce(),
    H: FnOnce(ExceptionPayload),
    F: FnOnce(),
{
    ExceptionGuard::new().run(work, on_exception, on_finally);
}

/// Runs a guarded call without a cleanup stage.
///
/// See [`ExceptionGuard::run_catching`].
pub fn run_catching<W, H>(work: W, on_exception: H)
where
    W: FnOnce(),
    H: FnOnce(ExceptionPayload),
{
    ExceptionGuard::new().run_catching(work, on_exception);
}

/// Runs a result-based guarded call with the default configuration.
///
/// See [`ExceptionGuard::try_run`].
pub fn try_run<E, W, H, F>(work: W, on_exception: H, on_finally: F) -> Result<(), E>
where
    W: FnOnce() -> Result<(), E>,
    H: FnOnce(E) -> Result<(), E>,
    F: FnOnce() -> Result<(), E>,
{
    ExceptionGuard::new().try_run(work, on_exception, on_finally)
}
