//! Configuration for guarded calls.

use crate::errors::GuardResult;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Options applied to every call made through an [`ExceptionGuard`](crate::guard::ExceptionGuard).
///
/// None of these change the order in which stages run or which exception
/// propagates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuardConfig {
    /// Name attached to the guard's tracing events.
    #[serde(default)]
    pub label: Option<String>,
    /// Whether to record where guarded work panicked.
    #[serde(default = "default_capture_location")]
    pub capture_location: bool,
    /// Whether to silence the panic report for panics raised by guarded work.
    ///
    /// Panics from the exception and cleanup handlers are still reported.
    #[serde(default)]
    pub quiet: bool,
}

fn default_capture_location() -> bool {
    true
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            label: None,
            capture_location: default_capture_location(),
            quiet: false,
        }
    }
}

impl GuardConfig {
    /// Creates a new guard configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the label.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Sets whether panic locations are captured.
    #[must_use]
    pub fn with_capture_location(mut self, capture: bool) -> Self {
        self.capture_location = capture;
        self
    }

    /// Sets quiet mode.
    #[must_use]
    pub fn with_quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    /// Returns the label, or an empty string when unset.
    #[must_use]
    pub fn label(&self) -> &str {
        self.label.as_deref().unwrap_or_default()
    }

    /// Parses a configuration from JSON text.
    pub fn from_json(text: &str) -> GuardResult<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Reads and parses a JSON configuration file.
    pub fn from_json_file(path: impl AsRef<Path>) -> GuardResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::GuardError;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn test_config_defaults() {
        let config = GuardConfig::default();
        assert!(config.label.is_none());
        assert!(config.capture_location);
        assert!(!config.quiet);
        assert_eq!(config.label(), "");
    }

    #[test]
    fn test_config_builder() {
        let config = GuardConfig::new()
            .with_label("stress")
            .with_capture_location(false)
            .with_quiet(true);

        assert_eq!(config.label(), "stress");
        assert!(!config.capture_location);
        assert!(config.quiet);
    }

    #[test]
    fn test_from_json_fills_defaults() {
        let config = GuardConfig::from_json(r#"{"quiet": true}"#).unwrap();
        assert_eq!(config, GuardConfig::new().with_quiet(true));
    }

    #[test]
    fn test_from_json_empty_object() {
        let config = GuardConfig::from_json("{}").unwrap();
        assert_eq!(config, GuardConfig::default());
    }

    #[test]
    fn test_from_json_rejects_bad_types() {
        let err = GuardConfig::from_json(r#"{"quiet": "yes"}"#).unwrap_err();
        assert!(matches!(err, GuardError::InvalidConfig(_)));
    }

    #[test]
    fn test_from_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"label": "collection-updates"}}"#).unwrap();

        let config = GuardConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.label(), "collection-updates");
        assert!(config.capture_location);
    }

    #[test]
    fn test_from_json_file_missing() {
        let err = GuardConfig::from_json_file("/nonexistent/exguard.json").unwrap_err();
        assert!(matches!(err, GuardError::Io(_)));
    }

    #[test]
    fn test_config_serialization() {
        let config = GuardConfig::new().with_label("roundtrip");
        let json = serde_json::to_string(&config).unwrap();
        let back: GuardConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
