//! Guarded calls where an `Err` is the exception.

use super::Stage;
use crate::config::GuardConfig;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use tracing::{debug, trace};

/// What the first two stages left behind for the caller.
enum Pending<E> {
    Error(E),
    Panic(Box<dyn Any + Send + 'static>),
}

pub(super) fn run<E, W, H, F>(
    config: &GuardConfig,
    work: W,
    on_exception: H,
    on_finally: F,
) -> Result<(), E>
where
    W: FnOnce() -> Result<(), E>,
    H: FnOnce(E) -> Result<(), E>,
    F: FnOnce() -> Result<(), E>,
{
    let label = config.label();

    // Panics are not exceptions here; they only get held until cleanup has run.
    let stages = panic::catch_unwind(AssertUnwindSafe(move || match work() {
        Ok(()) => {
            trace!(label, stage = %Stage::Work, "guarded work completed");
            Ok(())
        }
        Err(error) => {
            debug!(label, stage = %Stage::Work, "guarded work failed");
            on_exception(error)
        }
    }));

    let pending = match stages {
        Ok(Ok(())) => None,
        Ok(Err(error)) => {
            debug!(label, stage = %Stage::OnException, "exception handler failed");
            Some(Pending::Error(error))
        }
        Err(raised) => Some(Pending::Panic(raised)),
    };

    match on_finally() {
        Err(error) => {
            if pending.is_some() {
                debug!(label, stage = %Stage::OnFinally, "cleanup failed, superseding pending exception");
            }
            Err(error)
        }
        Ok(()) => match pending {
            None => Ok(()),
            Some(Pending::Error(error)) => Err(error),
            Some(Pending::Panic(raised)) => panic::resume_unwind(raised),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::expect_panic;
    use pretty_assertions::assert_eq;
    use std::cell::Cell;

    #[derive(Debug, PartialEq)]
    enum Fault {
        Work,
        Handler,
        Cleanup,
    }

    #[test]
    fn test_recovered_error_returns_ok() {
        let mut seen = None;
        let result = run(
            &GuardConfig::default(),
            || Err(Fault::Work),
            |error| {
                seen = Some(error);
                Ok(())
            },
            || Ok(()),
        );

        assert_eq!(result, Ok(()));
        assert_eq!(seen, Some(Fault::Work));
    }

    #[test]
    fn test_handler_error_is_returned() {
        let cleaned = Cell::new(false);
        let result = run(
            &GuardConfig::default(),
            || Err(Fault::Work),
            |_| Err(Fault::Handler),
            || {
                cleaned.set(true);
                Ok(())
            },
        );

        assert_eq!(result, Err(Fault::Handler));
        assert!(cleaned.get());
    }

    #[test]
    fn test_cleanup_error_overrides_handler_error() {
        let result = run(
            &GuardConfig::default(),
            || Err(Fault::Work),
            |_| Err(Fault::Handler),
            || Err(Fault::Cleanup),
        );

        assert_eq!(result, Err(Fault::Cleanup));
    }

    #[test]
    fn test_work_panic_still_runs_cleanup() {
        let handled = Cell::new(false);
        let cleaned = Cell::new(false);

        let payload = expect_panic(|| {
            let _ = run::<Fault, _, _, _>(
                &GuardConfig::default(),
                || panic!("not an error value"),
                |_| {
                    handled.set(true);
                    Ok(())
                },
                || {
                    cleaned.set(true);
                    Ok(())
                },
            );
        });

        assert_eq!(payload.message(), Some("not an error value"));
        assert!(!handled.get());
        assert!(cleaned.get());
    }

    #[test]
    fn test_handler_panic_still_runs_cleanup() {
        let cleaned = Cell::new(false);

        let payload = expect_panic(|| {
            let _ = run(
                &GuardConfig::default(),
                || Err(Fault::Work),
                |_| panic!("handler blew up"),
                || {
                    cleaned.set(true);
                    Ok(())
                },
            );
        });

        assert_eq!(payload.message(), Some("handler blew up"));
        assert!(cleaned.get());
    }

    #[test]
    fn test_cleanup_error_overrides_pending_panic() {
        let result = run(
            &GuardConfig::default(),
            || panic!("work panicked"),
            |_| Ok(()),
            || Err(Fault::Cleanup),
        );

        assert_eq!(result, Err(Fault::Cleanup));
    }

    #[test]
    fn test_cleanup_panic_supersedes_pending_error() {
        let handled = Cell::new(0);

        let payload = expect_panic(|| {
            let _ = run(
                &GuardConfig::default(),
                || Err(Fault::Work),
                |_| {
                    handled.set(handled.get() + 1);
                    Err(Fault::Handler)
                },
                || panic!("cleanup blew up"),
            );
        });

        assert_eq!(payload.message(), Some("cleanup blew up"));
        assert_eq!(handled.get(), 1);
    }

    #[test]
    fn test_cleanup_panic_supersedes_pending_panic() {
        let payload = expect_panic(|| {
            let _ = run::<Fault, _, _, _>(
                &GuardConfig::default(),
                || panic!("work blew up"),
                |_| Ok(()),
                || panic!("cleanup blew up"),
            );
        });

        assert_eq!(payload.message(), Some("cleanup blew up"));
    }
}
