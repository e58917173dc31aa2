//! Field validation shared by both configuration entry points
//!
//! The interactive form calls [`validate_timeout`] and
//! [`validate_item_pattern`] and reports their errors back to the user. The
//! declarative loader uses the same rules but substitutes defaults instead.

use crate::{ItemPattern, ValidationError};

/// Default eviction threshold in hours
pub const DEFAULT_TIMEOUT_HOURS: f64 = 24.0;

/// Timeouts at or below this many hours are invalid
pub const MIN_TIMEOUT_HOURS: f64 = 0.005;

/// Whether `hours` is a usable timeout
pub fn is_valid_timeout(hours: f64) -> bool {
    hours.is_finite() && hours > MIN_TIMEOUT_HOURS
}

/// Parse timeout text, returning `None` for anything unusable
pub fn parse_timeout(text: &str) -> Option<f64> {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|hours| is_valid_timeout(*hours))
}

/// Form-path timeout validation
///
/// # Examples
///
/// ```
/// use qclean_janitor::validate_timeout;
///
/// assert_eq!(validate_timeout("1.5"), Ok(1.5));
/// assert!(validate_timeout("-1").is_err());
/// assert!(validate_timeout("soon").is_err());
/// ```
pub fn validate_timeout(text: &str) -> Result<f64, ValidationError> {
    parse_timeout(text).ok_or(ValidationError::Timeout)
}

/// Form-path pattern validation
///
/// On failure the error carries the regex compiler's diagnostic; use
/// [`ValidationError::render_preformatted`] to display it.
pub fn validate_item_pattern(text: &str) -> Result<(), ValidationError> {
    ItemPattern::compile(text)
        .map(|_| ())
        .map_err(|e| ValidationError::ItemPattern(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_timeout_accepts_numbers() {
        assert_eq!(validate_timeout("24"), Ok(24.0));
        assert_eq!(validate_timeout(" 0.5 "), Ok(0.5));
        assert_eq!(validate_timeout("0.006"), Ok(0.006));
        assert_eq!(validate_timeout("1e2"), Ok(100.0));
    }

    #[test]
    fn test_validate_timeout_rejects_garbage() {
        for text in ["", "abc", "-1", "0", "0.005", "NaN", "inf", "-inf", "12h"] {
            assert_eq!(validate_timeout(text), Err(ValidationError::Timeout), "{:?}", text);
        }
    }

    #[test]
    fn test_validate_item_pattern() {
        assert!(validate_item_pattern("^deploy-.*").is_ok());
        assert!(validate_item_pattern("").is_ok());

        match validate_item_pattern("deploy-(") {
            Err(ValidationError::ItemPattern(message)) => {
                assert!(message.contains("unclosed group"), "{}", message);
            }
            other => panic!("expected pattern error, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_verbose_pattern_with_comment() {
        assert_eq!(validate_item_pattern("(?x) deploy-.* # deploy jobs"), Ok(()));
    }

    #[test]
    fn test_pattern_diagnostic_quotes_source_as_written() {
        match validate_item_pattern("deploy-(") {
            Err(ValidationError::ItemPattern(message)) => {
                assert!(message.contains("deploy-("), "{}", message);
                assert!(!message.contains("^(?:"), "{}", message);
            }
            other => panic!("expected pattern error, got {:?}", other),
        }
    }

    #[test]
    fn test_pattern_diagnostic_renders_safely() {
        let err = validate_item_pattern("<b>(").unwrap_err();
        let rendered = err.render_preformatted();
        assert!(rendered.starts_with("<pre>"));
        assert!(rendered.ends_with("</pre>"));
        assert!(rendered.contains("&lt;b&gt;("));
        assert!(!rendered.contains("<b>"));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: everything at or below the minimum is rejected
        #[test]
        fn test_small_timeouts_rejected(hours in -1.0e9f64..=MIN_TIMEOUT_HOURS) {
            prop_assert_eq!(validate_timeout(&hours.to_string()), Err(ValidationError::Timeout));
        }

        /// Property: everything above the minimum is accepted verbatim
        #[test]
        fn test_large_timeouts_accepted(hours in 0.0051f64..1.0e9) {
            prop_assert_eq!(validate_timeout(&hours.to_string()), Ok(hours));
        }

        /// Property: alphabetic text is never a timeout
        #[test]
        fn test_words_rejected(text in "[a-zA-Z]{1,12}") {
            // "inf", "infinity" and "nan" parse as floats but are not finite
            prop_assert!(validate_timeout(&text).is_err());
        }
    }
}
