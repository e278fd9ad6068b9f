//! Guarded calls where an unwinding panic is the exception.

use super::Stage;
use crate::config::GuardConfig;
use crate::hook::{self, CaptureScope};
use crate::payload::ExceptionPayload;
use std::panic::{self, AssertUnwindSafe};
use tracing::{debug, trace};

pub(super) fn run<W, H, F>(config: &GuardConfig, work: W, on_exception: H, on_finally: F)
where
    W: FnOnce(),
    H: FnOnce(ExceptionPayload),
    F: FnOnce(),
{
    let label = config.label();

    let outcome = {
        let _scope = CaptureScope::enter(config);
        panic::catch_unwind(AssertUnwindSafe(work))
    };

    // Panic still owed to the caller once cleanup is done.
    let pending = match outcome {
        Ok(()) => {
            trace!(label, stage = %Stage::Work, "guarded work completed");
            None
        }
        Err(raw) => {
            let location = if config.capture_location {
                hook::take_location(&*raw)
            } else {
                None
            };
            let payload = ExceptionPayload::from_raw(raw, location);
            debug!(label, stage = %Stage::Work, %payload, "guarded work raised");
            let handled = panic::catch_unwind(AssertUnwindSafe(move || on_exception(payload)));
            match handled {
                Ok(()) => None,
                Err(raised) => {
                    debug!(label, stage = %Stage::OnException, "exception handler raised");
                    Some(raised)
                }
            }
        }
    };

    match panic::catch_unwind(AssertUnwindSafe(on_finally)) {
        Ok(()) => {
            if let Some(raised) = pending {
                panic::resume_unwind(raised);
            }
        }
        Err(raised) => {
            if pending.is_some() {
                debug!(label, stage = %Stage::OnFinally, "cleanup raised, superseding pending exception");
            } else {
                debug!(label, stage = %Stage::OnFinally, "cleanup raised");
            }
            drop(pending);
            panic::resume_unwind(raised);
        }
    }
}
