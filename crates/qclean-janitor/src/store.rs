//! Validated access to cleanup settings
//!
//! [`ConfigStore`] is the single owner of the settings value. Readers always
//! get usable values; writers come in two flavours:
//!
//! - **Declarative** (`set_*`, `apply_declarative`, `load_toml`, `load_json`):
//!   lenient. A bad timeout becomes the default, a bad pattern is stored and
//!   neutralized at read time. Nothing is reported back.
//! - **Interactive form** (`submit_form`): strict. A bad field is reported and
//!   the stored settings are left untouched.

use crate::config::{CleanupSettings, DeclarativeSettings, FormSubmission, TimeoutValue};
use crate::pattern::ItemPattern;
use crate::validation::{
    is_valid_timeout, parse_timeout, validate_item_pattern, validate_timeout,
    DEFAULT_TIMEOUT_HOURS,
};
use crate::{CleanupError, ValidationError};
use std::sync::{Arc, RwLock, RwLockReadGuard};

/// Settings as a sweep pass sees them
#[derive(Debug, Clone)]
pub struct ResolvedSettings {
    /// Effective timeout in hours (always valid)
    pub timeout_hours: f64,

    /// Effective pattern (the match-nothing pattern if the stored one is bad)
    pub pattern: ItemPattern,
}

impl ResolvedSettings {
    /// Timeout expressed in milliseconds
    pub fn timeout_millis(&self) -> f64 {
        self.timeout_hours * 3_600_000.0
    }
}

/// Shared, validated holder of [`CleanupSettings`]
///
/// Cloning yields another handle to the same settings, so the host keeps one
/// clone for its configuration surfaces and injects another into the sweeper.
///
/// # Examples
///
/// ```
/// use qclean_janitor::{ConfigStore, FormSubmission};
///
/// let store = ConfigStore::default();
///
/// // Declarative path: silently falls back
/// store.set_timeout("not a number");
/// assert_eq!(store.timeout_hours(), 24.0);
///
/// // Form path: reports and keeps the old value
/// assert!(store.submit_form(&FormSubmission::new("-1", ".*")).is_err());
/// assert_eq!(store.timeout_hours(), 24.0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConfigStore {
    settings: Arc<RwLock<CleanupSettings>>,
}

impl ConfigStore {
    /// Create a store holding `settings` as-is
    pub fn new(settings: CleanupSettings) -> Self {
        Self {
            settings: Arc::new(RwLock::new(settings)),
        }
    }

    /// Timeout in hours, or the 24 hour default if the stored value is unusable
    pub fn timeout_hours(&self) -> f64 {
        self.read()
            .map(|settings| settings.effective_timeout_hours())
            .unwrap_or(DEFAULT_TIMEOUT_HOURS)
    }

    /// Pattern source, or the match-nothing pattern if the stored one does not compile
    pub fn item_pattern(&self) -> String {
        let pattern = match self.read() {
            Ok(settings) => effective_pattern(&settings.item_pattern),
            Err(_) => ItemPattern::match_nothing(),
        };
        pattern.as_str().to_string()
    }

    /// Copy of the stored (unvalidated) settings
    pub fn snapshot(&self) -> Result<CleanupSettings, CleanupError> {
        self.read().map(|settings| settings.clone())
    }

    /// Effective settings for one sweep pass
    ///
    /// Fails only if the settings cannot be read at all, in which case the
    /// pass is skipped.
    pub fn resolve(&self) -> Result<ResolvedSettings, CleanupError> {
        let settings = self.snapshot()?;

        Ok(ResolvedSettings {
            timeout_hours: settings.effective_timeout_hours(),
            pattern: effective_pattern(&settings.item_pattern),
        })
    }

    /// Replace the whole settings value
    pub fn replace(&self, settings: CleanupSettings) {
        self.update(|current| *current = settings);
    }

    /// Lenient timeout write from text; returns the stored value
    pub fn set_timeout(&self, text: &str) -> f64 {
        let hours = lenient_timeout_text(text);
        self.update(|settings| settings.timeout_hours = hours);
        hours
    }

    /// Lenient timeout write from a number; returns the stored value
    pub fn set_timeout_hours(&self, hours: f64) -> f64 {
        let hours = lenient_timeout(hours);
        self.update(|settings| settings.timeout_hours = hours);
        hours
    }

    /// Lenient pattern write; the pattern is validated when it is read
    pub fn set_item_pattern(&self, pattern: impl Into<String>) {
        let pattern = pattern.into();
        self.update(|settings| settings.item_pattern = pattern);
    }

    /// Apply the fields present in a declarative document, all at once
    pub fn apply_declarative(&self, declared: DeclarativeSettings) {
        let timeout = declared.timeout.map(|value| match value {
            TimeoutValue::Number(hours) => lenient_timeout(hours),
            TimeoutValue::Text(text) => lenient_timeout_text(&text),
            TimeoutValue::Invalid(_) => {
                tracing::warn!(
                    default_hours = DEFAULT_TIMEOUT_HOURS,
                    "Timeout is not a number, using default"
                );
                DEFAULT_TIMEOUT_HOURS
            }
        });

        self.update(|settings| {
            if let Some(hours) = timeout {
                settings.timeout_hours = hours;
            }
            if let Some(pattern) = declared.item_pattern {
                settings.item_pattern = pattern;
            }
        });
    }

    /// Load the `[queue_cleanup]` table of a TOML document
    ///
    /// Only a malformed document is an error; bad field values fall back.
    pub fn load_toml(&self, s: &str) -> Result<(), CleanupError> {
        let declared = DeclarativeSettings::from_toml_str(s)?;
        self.apply_declarative(declared);
        Ok(())
    }

    /// Load the `queue_cleanup` object of a JSON document
    pub fn load_json(&self, s: &str) -> Result<(), CleanupError> {
        let declared = DeclarativeSettings::from_json_str(s)?;
        self.apply_declarative(declared);
        Ok(())
    }

    /// Strict write from the interactive form
    ///
    /// Both fields are validated before anything is stored; on error the
    /// previous settings stay in place.
    pub fn submit_form(&self, form: &FormSubmission) -> Result<CleanupSettings, ValidationError> {
        let timeout_hours = validate_timeout(&form.timeout)?;
        validate_item_pattern(&form.item_pattern)?;

        let settings = CleanupSettings::new(timeout_hours, form.item_pattern.clone());
        self.replace(settings.clone());
        Ok(settings)
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, CleanupSettings>, CleanupError> {
        self.settings
            .read()
            .map_err(|e| CleanupError::Config(format!("Settings unreadable: {}", e)))
    }

    #[cfg(test)]
    pub(crate) fn poison_lock(&self) {
        let settings = Arc::clone(&self.settings);
        let _ = std::thread::spawn(move || {
            let _guard = settings.write().unwrap();
            panic!("poison the settings lock");
        })
        .join();
    }

    // Writes store a complete value, so a poisoned lock is taken over and healed.
    fn update(&self, f: impl FnOnce(&mut CleanupSettings)) {
        {
            let mut settings = self
                .settings
                .write()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            f(&mut *settings);
        }
        self.settings.clear_poison();
    }
}

fn effective_pattern(source: &str) -> ItemPattern {
    match ItemPattern::compile(source) {
        Ok(pattern) => pattern,
        Err(e) => {
            tracing::warn!(
                pattern = %source,
                error = %e,
                "Item pattern does not compile, matching nothing"
            );
            ItemPattern::match_nothing()
        }
    }
}

fn lenient_timeout(hours: f64) -> f64 {
    if is_valid_timeout(hours) {
        hours
    } else {
        tracing::warn!(
            value = hours,
            default_hours = DEFAULT_TIMEOUT_HOURS,
            "Invalid timeout, using default"
        );
        DEFAULT_TIMEOUT_HOURS
    }
}

fn lenient_timeout_text(text: &str) -> f64 {
    parse_timeout(text).unwrap_or_else(|| {
        tracing::warn!(
            value = %text,
            default_hours = DEFAULT_TIMEOUT_HOURS,
            "Cannot convert timeout to a number, using default"
        );
        DEFAULT_TIMEOUT_HOURS
    })
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: unusable declarative timeouts always read back as 24
        #[test]
        fn test_declarative_small_timeouts_default(hours in -1.0e12f64..=0.005) {
            let store = ConfigStore::new(CleanupSettings::new(5.0, ".*"));
            store.apply_declarative(DeclarativeSettings {
                timeout: Some(TimeoutValue::Number(hours)),
                item_pattern: None,
            });
            prop_assert_eq!(store.timeout_hours(), 24.0);
        }

        /// Property: non-numeric declarative text always reads back as 24
        #[test]
        fn test_declarative_text_timeouts_default(text in "[a-zA-Z ]{0,16}") {
            let store = ConfigStore::new(CleanupSettings::new(5.0, ".*"));
            store.set_timeout(&text);
            prop_assert_eq!(store.timeout_hours(), 24.0);
        }

        /// Property: a malformed pattern reads back as one that matches nothing
        #[test]
        fn test_bad_pattern_matches_no_names(
            prefix in "[a-z]{0,8}",
            names in proptest::collection::vec("[ -~]{0,40}", 100),
        ) {
            let store = ConfigStore::new(CleanupSettings::new(1.0, format!("{}(", prefix)));
            let pattern = ItemPattern::compile(&store.item_pattern()).unwrap();

            for name in &names {
                prop_assert!(!pattern.is_match(name).unwrap());
            }
        }
    }
}
