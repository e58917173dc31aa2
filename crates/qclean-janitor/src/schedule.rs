//! Recurrence period of the sweep
//!
//! The period is deployment-level: it comes from the environment once at
//! process start and is not part of [`crate::CleanupSettings`].

use std::env::{self, VarError};
use std::time::Duration;

/// Environment variable holding the period in hours
pub const PERIOD_ENV_VAR: &str = "QUEUE_CLEANUP_PERIOD_HOURS";

/// Built-in period in hours
pub const DEFAULT_PERIOD_HOURS: f64 = 24.0;

/// Time between two sweep passes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepPeriod {
    hours: f64,
    interval: Duration,
}

impl Default for SweepPeriod {
    fn default() -> Self {
        Self {
            hours: DEFAULT_PERIOD_HOURS,
            interval: Duration::from_secs(DEFAULT_PERIOD_HOURS as u64 * 3600),
        }
    }
}

impl SweepPeriod {
    /// Period from whole or fractional hours
    ///
    /// Returns `None` unless the value is finite, positive and at least one
    /// second long.
    ///
    /// # Examples
    ///
    /// ```
    /// use qclean_janitor::SweepPeriod;
    /// use std::time::Duration;
    ///
    /// let period = SweepPeriod::from_hours(0.5).unwrap();
    /// assert_eq!(period.interval(), Duration::from_secs(1800));
    /// assert!(SweepPeriod::from_hours(0.0).is_none());
    /// ```
    pub fn from_hours(hours: f64) -> Option<Self> {
        if !hours.is_finite() || hours <= 0.0 {
            return None;
        }

        let interval = Duration::try_from_secs_f64(hours * 3600.0).ok()?;
        if interval < Duration::from_secs(1) {
            return None;
        }

        Some(Self { hours, interval })
    }

    /// Read the period from [`PERIOD_ENV_VAR`]
    ///
    /// Call once at startup. An unset variable yields the default silently; an
    /// unusable one yields the default with a warning.
    pub fn from_env() -> Self {
        match env::var(PERIOD_ENV_VAR) {
            Ok(value) => Self::parse(Some(&value)),
            Err(VarError::NotPresent) => Self::default(),
            Err(VarError::NotUnicode(value)) => {
                tracing::warn!(
                    value = ?value,
                    default_hours = DEFAULT_PERIOD_HOURS,
                    "Queue cleanup period is not valid unicode, using default"
                );
                Self::default()
            }
        }
    }

    /// Period from an optional override string
    pub fn parse(value: Option<&str>) -> Self {
        let Some(raw) = value else {
            return Self::default();
        };

        match raw.trim().parse::<f64>().ok().and_then(Self::from_hours) {
            Some(period) => period,
            None => {
                tracing::warn!(
                    value = %raw,
                    default_hours = DEFAULT_PERIOD_HOURS,
                    "Cannot convert queue cleanup period to hours, using default"
                );
                Self::default()
            }
        }
    }

    /// Period in hours
    pub fn hours(&self) -> f64 {
        self.hours
    }

    /// Period as a timer interval
    pub fn interval(&self) -> Duration {
        self.interval
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_period() {
        let period = SweepPeriod::default();
        assert_eq!(period.hours(), 24.0);
        assert_eq!(period.interval(), Duration::from_secs(24 * 3600));
    }

    #[test]
    fn test_parse_unset() {
        assert_eq!(SweepPeriod::parse(None), SweepPeriod::default());
    }

    #[test]
    fn test_parse_integer_and_fraction() {
        assert_eq!(SweepPeriod::parse(Some("6")).interval(), Duration::from_secs(6 * 3600));
        assert_eq!(SweepPeriod::parse(Some(" 1.5 ")).interval(), Duration::from_secs(5400));
        assert_eq!(SweepPeriod::parse(Some("0.25")).hours(), 0.25);
    }

    #[test]
    fn test_parse_invalid_falls_back() {
        for value in ["", "daily", "-2", "0", "NaN", "inf", "1e300", "0.0000001"] {
            assert_eq!(SweepPeriod::parse(Some(value)), SweepPeriod::default(), "{:?}", value);
        }
    }

    #[test]
    fn test_from_hours_bounds() {
        assert!(SweepPeriod::from_hours(2.0 / 3600.0).is_some());
        assert!(SweepPeriod::from_hours(0.5 / 3600.0).is_none());
        assert!(SweepPeriod::from_hours(f64::MAX).is_none());
    }
}
