//! Error types for queue cleanup

use thiserror::Error;

/// Pass-level errors
///
/// Every variant means "skip this pass"; none of them stop the worker.
#[derive(Error, Debug)]
pub enum CleanupError {
    /// The queue could not be enumerated (not initialized, unreachable, ...)
    #[error("Queue unavailable: {0}")]
    QueueUnavailable(String),

    /// Settings could not be read or parsed
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Field-level errors reported by the interactive form path
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Timeout was not a number above the minimum
    #[error("timeout must be a positive number greater than 0.005")]
    Timeout,

    /// Pattern failed to compile; carries the compiler diagnostic
    #[error("{0}")]
    ItemPattern(String),
}

impl ValidationError {
    /// Name of the form field the error belongs to
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::Timeout => "timeout",
            ValidationError::ItemPattern(_) => "itemPattern",
        }
    }

    /// Message escaped and wrapped for fixed-width display
    ///
    /// Regex diagnostics draw carets under the offending column, so they are
    /// only readable in a monospaced block. The text is HTML-escaped so a
    /// pattern can never inject markup into the form.
    pub fn render_preformatted(&self) -> String {
        let message = self.to_string();
        let mut out = String::with_capacity(message.len() + 11);
        out.push_str("<pre>");
        for c in message.chars() {
            match c {
                '<' => out.push_str("&lt;"),
                '>' => out.push_str("&gt;"),
                '&' => out.push_str("&amp;"),
                '"' => out.push_str("&quot;"),
                '\'' => out.push_str("&#39;"),
                _ => out.push(c),
            }
        }
        out.push_str("</pre>");
        out
    }
}

/// Per-item pattern evaluation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MatchError {
    /// Name is too long to be matched safely
    #[error("display name is {len} bytes, limit is {max}")]
    InputTooLong {
        /// Length of the rejected name
        len: usize,
        /// Configured limit
        max: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_names() {
        assert_eq!(ValidationError::Timeout.field(), "timeout");
        assert_eq!(ValidationError::ItemPattern("x".into()).field(), "itemPattern");
    }

    #[test]
    fn test_render_preformatted_escapes_markup() {
        let err = ValidationError::ItemPattern("<script>alert('x') & \"y\"</script>".into());
        assert_eq!(
            err.render_preformatted(),
            "<pre>&lt;script&gt;alert(&#39;x&#39;) &amp; &quot;y&quot;&lt;/script&gt;</pre>"
        );
    }

    #[test]
    fn test_timeout_message() {
        assert_eq!(
            ValidationError::Timeout.to_string(),
            "timeout must be a positive number greater than 0.005"
        );
    }
}
