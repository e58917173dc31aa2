//! Configuration for queue cleanup
//!
//! Defines the settings value object and the shapes accepted by the two
//! configuration entry points.

use crate::pattern::MATCH_NOTHING_PATTERN;
use crate::validation::{is_valid_timeout, DEFAULT_TIMEOUT_HOURS};
use crate::CleanupError;
use serde::de::IgnoredAny;
use serde::Deserialize;
use serde_json::value::RawValue;

/// Stored cleanup settings
///
/// Fields hold what was written, which is not necessarily usable; read them
/// through [`crate::ConfigStore`], which substitutes safe defaults.
///
/// # Examples
///
/// ```
/// use qclean_janitor::CleanupSettings;
///
/// let settings = CleanupSettings::default();
/// assert_eq!(settings.timeout_hours, 24.0);
/// // A fresh install evicts nothing until a pattern is configured
/// assert_eq!(settings.item_pattern, qclean_janitor::MATCH_NOTHING_PATTERN);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct CleanupSettings {
    /// Hours an item may stay queued before it may be evicted
    pub timeout_hours: f64,

    /// Pattern over fully-qualified display names
    pub item_pattern: String,
}

impl Default for CleanupSettings {
    fn default() -> Self {
        Self {
            timeout_hours: DEFAULT_TIMEOUT_HOURS,
            item_pattern: MATCH_NOTHING_PATTERN.to_string(),
        }
    }
}

impl CleanupSettings {
    /// Create settings from raw values
    pub fn new(timeout_hours: f64, item_pattern: impl Into<String>) -> Self {
        Self {
            timeout_hours,
            item_pattern: item_pattern.into(),
        }
    }

    /// The timeout a sweep would use for these settings
    pub fn effective_timeout_hours(&self) -> f64 {
        if is_valid_timeout(self.timeout_hours) {
            self.timeout_hours
        } else {
            DEFAULT_TIMEOUT_HOURS
        }
    }
}

/// Timeout as supplied by a declarative document
///
/// Anything that is not a number or numeric text is kept as `Invalid` so the
/// loader can fall back to the default instead of rejecting the document.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum TimeoutValue {
    /// Numeric value (integers included)
    Number(f64),

    /// Textual value, parsed leniently
    Text(String),

    /// Any other type
    Invalid(IgnoredAny),
}

/// Settings from the declarative loader
///
/// Absent fields leave the stored value unchanged.
///
/// ```toml
/// [queue_cleanup]
/// timeout = 123
/// itemPattern = "^abc.*"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DeclarativeSettings {
    /// Timeout in hours
    #[serde(default, alias = "timeout_hours")]
    pub timeout: Option<TimeoutValue>,

    /// Item pattern, stored as-is
    #[serde(default, rename = "itemPattern", alias = "item_pattern")]
    pub item_pattern: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct DeclarativeDocument {
    #[serde(default, alias = "queueCleanup")]
    queue_cleanup: Option<DeclarativeSettings>,
}

// serde_json range-checks numbers while reading them, so the JSON timeout is
// kept as raw text until the rest of the document has parsed
#[derive(Debug, Default, Deserialize)]
struct JsonDocument {
    #[serde(default, alias = "queueCleanup")]
    queue_cleanup: Option<JsonSettings>,
}

#[derive(Debug, Default, Deserialize)]
struct JsonSettings {
    #[serde(default, alias = "timeout_hours")]
    timeout: Option<Box<RawValue>>,

    #[serde(default, rename = "itemPattern", alias = "item_pattern")]
    item_pattern: Option<String>,
}

impl From<JsonSettings> for DeclarativeSettings {
    fn from(settings: JsonSettings) -> Self {
        Self {
            timeout: settings.timeout.map(|raw| {
                serde_json::from_str(raw.get()).unwrap_or(TimeoutValue::Invalid(IgnoredAny))
            }),
            item_pattern: settings.item_pattern,
        }
    }
}

impl DeclarativeSettings {
    /// Parse the `[queue_cleanup]` table of a TOML document
    ///
    /// Returns empty settings when the table is missing.
    pub fn from_toml_str(s: &str) -> Result<Self, CleanupError> {
        let document: DeclarativeDocument = toml::from_str(s)
            .map_err(|e| CleanupError::Config(format!("Failed to parse config TOML: {}", e)))?;
        Ok(document.queue_cleanup.unwrap_or_default())
    }

    /// Parse the `queue_cleanup` object of a JSON document
    ///
    /// A timeout that is not a representable number (such as `1e400`) is
    /// kept as [`TimeoutValue::Invalid`] rather than failing the document.
    pub fn from_json_str(s: &str) -> Result<Self, CleanupError> {
        let document: JsonDocument = serde_json::from_str(s)
            .map_err(|e| CleanupError::Config(format!("Failed to parse config JSON: {}", e)))?;
        Ok(document.queue_cleanup.map(Self::from).unwrap_or_default())
    }
}

/// Raw field values from the interactive form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormSubmission {
    /// Timeout text as typed
    pub timeout: String,

    /// Pattern text as typed
    pub item_pattern: String,
}

impl FormSubmission {
    /// Create a submission from extracted field values
    pub fn new(timeout: impl Into<String>, item_pattern: impl Into<String>) -> Self {
        Self {
            timeout: timeout.into(),
            item_pattern: item_pattern.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = CleanupSettings::default();
        assert_eq!(settings.timeout_hours, 24.0);
        assert_eq!(settings.item_pattern, MATCH_NOTHING_PATTERN);
    }

    #[test]
    fn test_effective_timeout() {
        assert_eq!(CleanupSettings::new(3.5, ".*").effective_timeout_hours(), 3.5);
        assert_eq!(CleanupSettings::new(-1.0, ".*").effective_timeout_hours(), 24.0);
        assert_eq!(CleanupSettings::new(0.001, ".*").effective_timeout_hours(), 24.0);
        assert_eq!(CleanupSettings::new(f64::NAN, ".*").effective_timeout_hours(), 24.0);
        assert_eq!(CleanupSettings::new(f64::INFINITY, ".*").effective_timeout_hours(), 24.0);
    }

    #[test]
    fn test_parse_toml() {
        let toml = r#"
            [queue_cleanup]
            timeout = 123
            itemPattern = "^abc.*"
        "#;

        let settings = DeclarativeSettings::from_toml_str(toml).unwrap();
        assert_eq!(settings.timeout, Some(TimeoutValue::Number(123.0)));
        assert_eq!(settings.item_pattern.as_deref(), Some("^abc.*"));
    }

    #[test]
    fn test_parse_toml_snake_case_aliases() {
        let toml = r#"
            [queue_cleanup]
            timeout_hours = 1.5
            item_pattern = "deploy-.*"
        "#;

        let settings = DeclarativeSettings::from_toml_str(toml).unwrap();
        assert_eq!(settings.timeout, Some(TimeoutValue::Number(1.5)));
        assert_eq!(settings.item_pattern.as_deref(), Some("deploy-.*"));
    }

    #[test]
    fn test_parse_toml_lenient_timeout_types() {
        let settings = DeclarativeSettings::from_toml_str("[queue_cleanup]\ntimeout = \"12\"").unwrap();
        assert_eq!(settings.timeout, Some(TimeoutValue::Text("12".to_string())));

        let settings = DeclarativeSettings::from_toml_str("[queue_cleanup]\ntimeout = true").unwrap();
        assert!(matches!(settings.timeout, Some(TimeoutValue::Invalid(_))));

        let settings = DeclarativeSettings::from_toml_str("[queue_cleanup]\ntimeout = [1, 2]").unwrap();
        assert!(matches!(settings.timeout, Some(TimeoutValue::Invalid(_))));
    }

    #[test]
    fn test_parse_toml_missing_table() {
        let settings = DeclarativeSettings::from_toml_str("[other]\nkey = 1").unwrap();
        assert_eq!(settings, DeclarativeSettings::default());
    }

    #[test]
    fn test_parse_toml_syntax_error() {
        let result = DeclarativeSettings::from_toml_str("[queue_cleanup\ntimeout = 1");
        assert!(matches!(result, Err(CleanupError::Config(_))));
    }

    #[test]
    fn test_parse_json() {
        let json = r#"{"queueCleanup": {"timeout": -1, "itemPattern": "[bad"}}"#;
        let settings = DeclarativeSettings::from_json_str(json).unwrap();
        assert_eq!(settings.timeout, Some(TimeoutValue::Number(-1.0)));
        assert_eq!(settings.item_pattern.as_deref(), Some("[bad"));
    }

    #[test]
    fn test_parse_json_lenient_timeout_types() {
        let settings = DeclarativeSettings::from_json_str(r#"{"queue_cleanup": {"timeout": "12"}}"#).unwrap();
        assert_eq!(settings.timeout, Some(TimeoutValue::Text("12".to_string())));

        let settings = DeclarativeSettings::from_json_str(r#"{"queue_cleanup": {"timeout": {"h": 1}}}"#).unwrap();
        assert!(matches!(settings.timeout, Some(TimeoutValue::Invalid(_))));

        let settings = DeclarativeSettings::from_json_str(r#"{"queue_cleanup": {"timeout": null}}"#).unwrap();
        assert_eq!(settings.timeout, None);
    }

    #[test]
    fn test_parse_json_out_of_range_timeout() {
        let json = r#"{"queue_cleanup": {"timeout": 1e400, "itemPattern": "x"}}"#;
        let settings = DeclarativeSettings::from_json_str(json).unwrap();
        assert!(matches!(settings.timeout, Some(TimeoutValue::Invalid(_))));
        assert_eq!(settings.item_pattern.as_deref(), Some("x"));
    }

    #[test]
    fn test_parse_json_syntax_error() {
        let result = DeclarativeSettings::from_json_str(r#"{"queue_cleanup": {"timeout": 1e}}"#);
        assert!(matches!(result, Err(CleanupError::Config(_))));
    }
}
