//! The opaque exception payload handed to failure handlers.

use serde::{Deserialize, Serialize};
use std::any::Any;
use std::fmt;
use std::panic;

/// Source location where a panic was raised.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PanicLocation {
    /// Source file path.
    pub file: String,
    /// Line number.
    pub line: u32,
    /// Column number.
    pub column: u32,
}

impl PanicLocation {
    /// Creates a new panic location.
    #[must_use]
    pub fn new(file: impl Into<String>, line: u32, column: u32) -> Self {
        Self {
            file: file.into(),
            line,
            column,
        }
    }
}

impl From<&panic::Location<'_>> for PanicLocation {
    fn from(location: &panic::Location<'_>) -> Self {
        Self::new(location.file(), location.line(), location.column())
    }
}

impl fmt::Display for PanicLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}

/// A caught exception.
///
/// Wraps exactly the object the runtime intercepted. The guard never looks
/// inside it; the accessors below are for whoever receives it.
pub struct ExceptionPayload {
    raw: Box<dyn Any + Send + 'static>,
    location: Option<PanicLocation>,
}

impl ExceptionPayload {
    /// Creates a payload from an arbitrary value.
    #[must_use]
    pub fn new<T: Any + Send + 'static>(value: T) -> Self {
        Self::from_raw(Box::new(value), None)
    }

    /// Wraps a payload produced by `catch_unwind`.
    pub(crate) fn from_raw(
        raw: Box<dyn Any + Send + 'static>,
        location: Option<PanicLocation>,
    ) -> Self {
        Self { raw, location }
    }

    /// Returns the panic message for `&str` and `String` payloads.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        if let Some(message) = self.raw.downcast_ref::<&'static str>() {
            Some(message)
        } else {
            self.raw.downcast_ref::<String>().map(String::as_str)
        }
    }

    /// Returns true if the wrapped value is of type `T`.
    #[must_use]
    pub fn is<T: Any>(&self) -> bool {
        self.raw.is::<T>()
    }

    /// Returns a reference to the wrapped value if it is of type `T`.
    #[must_use]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.raw.downcast_ref::<T>()
    }

    /// Takes the wrapped value out if it is of type `T`.
    ///
    /// On mismatch the payload is handed back untouched.
    pub fn downcast<T: Any>(self) -> Result<T, Self> {
        let Self { raw, location } = self;
        match raw.downcast::<T>() {
            Ok(value) => Ok(*value),
            Err(raw) => Err(Self { raw, location }),
        }
    }

    /// Where the panic was raised, if the guard captured it.
    ///
    /// `None` for payloads raised with `resume_unwind`, which never reach the
    /// panic hook.
    #[must_use]
    pub fn location(&self) -> Option<&PanicLocation> {
        self.location.as_ref()
    }

    /// Returns the original boxed payload.
    #[must_use]
    pub fn into_inner(self) -> Box<dyn Any + Send + 'static> {
        self.raw
    }

    /// Re-raises the original payload on the current thread.
    pub fn resume(self) -> ! {
        panic::resume_unwind(self.raw)
    }
}

impl fmt::Debug for ExceptionPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExceptionPayload")
            .field("message", &self.message())
            .field("location", &self.location)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for ExceptionPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.message() {
            Some(message) => write!(f, "panicked: {message}")?,
            None => f.write_str("panicked with a non-string payload")?,
        }
        if let Some(ref location) = self.location {
            write!(f, " at {location}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ExceptionPayload {}
