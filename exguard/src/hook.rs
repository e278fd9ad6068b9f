//! Process panic hook used while guarded work runs.
//!
//! The hook is installed once, on the first guarded call that asks for
//! location capture or quiet mode, and chains to whatever hook was installed
//! before it. All bookkeeping is thread-local: a guard on one thread never
//! affects panic reporting on another. Nested guards keep a stack of their
//! settings and the hook only ever consults the innermost one.
//!
//! Every thread-local is reached through `try_with`, since guarded calls may
//! run from thread-local destructors after this module's storage is gone.
//! Without storage the scope simply captures nothing and silences nothing.

use crate::config::GuardConfig;
use crate::payload::PanicLocation;
use std::any::{Any, TypeId};
use std::cell::RefCell;
use std::panic;
use std::sync::Once;

static INSTALL: Once = Once::new();

/// Settings of one active guard scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ScopeFlags {
    pub(crate) capture: bool,
    pub(crate) quiet: bool,
}

/// Identifies which panic a recorded location belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Fingerprint {
    type_id: TypeId,
    message: Option<String>,
}

impl Fingerprint {
    fn of(payload: &(dyn Any + Send)) -> Self {
        let payload: &dyn Any = payload;
        let message = payload
            .downcast_ref::<&'static str>()
            .map(|s| (*s).to_owned())
            .or_else(|| payload.downcast_ref::<String>().cloned());
        Self {
            type_id: payload.type_id(),
            message,
        }
    }
}

#[derive(Debug)]
struct RecordedPanic {
    location: PanicLocation,
    fingerprint: Fingerprint,
}

thread_local! {
    static SCOPES: RefCell<Vec<ScopeFlags>> = const { RefCell::new(Vec::new()) };
    static LAST_PANIC: RefCell<Option<RecordedPanic>> = const { RefCell::new(None) };
}

fn install() {
    // set_hook panics when called from a panicking thread.
    if std::thread::panicking() {
        return;
    }

    INSTALL.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            let innermost = innermost();
            if innermost.is_some_and(|flags| flags.capture) {
                if let Some(location) = info.location() {
                    let recorded = RecordedPanic {
                        location: PanicLocation::from(location),
                        fingerprint: Fingerprint::of(info.payload()),
                    };
                    let _ = LAST_PANIC.try_with(|slot| {
                        if let Ok(mut slot) = slot.try_borrow_mut() {
                            *slot = Some(recorded);
                        }
                    });
                }
            }

            if !innermost.is_some_and(|flags| flags.quiet) {
                previous(info);
            }
        }));
        tracing::trace!("exguard panic hook installed");
    });
}

/// Returns the settings of the innermost active scope on this thread.
pub(crate) fn innermost() -> Option<ScopeFlags> {
    SCOPES
        .try_with(|scopes| scopes.try_borrow().ok().and_then(|s| s.last().copied()))
        .ok()
        .flatten()
}

/// Returns true once the guard's hook has been installed in this process.
#[must_use]
pub fn is_installed() -> bool {
    INSTALL.is_completed()
}

/// Marks the current thread as running guarded work until dropped.
pub(crate) struct CaptureScope {
    pushed: bool,
}

impl CaptureScope {
    pub(crate) fn enter(config: &GuardConfig) -> Self {
        let flags = ScopeFlags {
            capture: config.capture_location,
            quiet: config.quiet,
        };
        if flags.capture || flags.quiet {
            install();
        }

        // A scope with neither flag is still pushed so it masks outer scopes.
        let pushed = SCOPES
            .try_with(|scopes| {
                scopes
                    .try_borrow_mut()
                    .map(|mut scopes| scopes.push(flags))
                    .is_ok()
            })
            .unwrap_or(false);

        if pushed && flags.capture {
            let _ = LAST_PANIC.try_with(|slot| {
                if let Ok(mut slot) = slot.try_borrow_mut() {
                    *slot = None;
                }
            });
        }
        Self { pushed }
    }
}

impl Drop for CaptureScope {
    fn drop(&mut self) {
        if self.pushed {
            let _ = SCOPES.try_with(|scopes| {
                if let Ok(mut scopes) = scopes.try_borrow_mut() {
                    scopes.pop();
                }
            });
        }
    }
}

/// Takes the location recorded for `payload` on this thread.
///
/// Returns `None` when the recorded panic is not the one that produced
/// `payload`, e.g. when the payload was raised with `resume_unwind`, which
/// bypasses the hook.
pub(crate) fn take_location(payload: &(dyn Any + Send)) -> Option<PanicLocation> {
    let recorded = LAST_PANIC
        .try_with(|slot| slot.try_borrow_mut().ok().and_then(|mut slot| slot.take()))
        .ok()
        .flatten()?;

    (recorded.fingerprint == Fingerprint::of(payload)).then_some(recorded.location)
}
