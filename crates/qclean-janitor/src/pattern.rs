//! Compiled item-name patterns

use crate::MatchError;
use regex::Regex;
use std::fmt;

/// Unsatisfiable expression: no position is both a word boundary and not one
pub const MATCH_NOTHING_PATTERN: &str = r"\b\B";

/// Longest display name the matcher will evaluate
pub const MAX_MATCH_INPUT_BYTES: usize = 64 * 1024;

/// A pattern matched against the *whole* fully-qualified display name
///
/// `deploy-.*` matches `deploy-prod` but not `team/deploy-prod`; write
/// `.*/deploy-.*` to reach into folders.
#[derive(Debug, Clone)]
pub struct ItemPattern {
    source: String,
    // None is the match-nothing pattern
    regex: Option<Regex>,
}

impl ItemPattern {
    /// Compile `source` as a full-match pattern
    ///
    /// The source is checked on its own before it is anchored, so text such as
    /// `a)(b` cannot become valid by closing the anchoring group, and errors
    /// always quote the source as written.
    pub fn compile(source: &str) -> Result<Self, regex::Error> {
        Regex::new(source)?;
        let regex = Regex::new(&format!("^(?:{})$", source))
            // A trailing `#` comment under `(?x)` runs to the end of the line,
            // swallowing the closing group unless a newline ends it first
            .or_else(|_| Regex::new(&format!("^(?:{}\n)$", source)))?;

        Ok(Self {
            source: source.to_string(),
            regex: Some(regex),
        })
    }

    /// The fail-safe pattern that matches no name at all
    pub fn match_nothing() -> Self {
        Self {
            source: MATCH_NOTHING_PATTERN.to_string(),
            regex: None,
        }
    }

    /// The pattern source as configured
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Whether this is the fail-safe pattern
    pub fn is_match_nothing(&self) -> bool {
        self.regex.is_none()
    }

    /// Evaluate the pattern against a display name
    pub fn is_match(&self, name: &str) -> Result<bool, MatchError> {
        if name.len() > MAX_MATCH_INPUT_BYTES {
            return Err(MatchError::InputTooLong {
                len: name.len(),
                max: MAX_MATCH_INPUT_BYTES,
            });
        }

        Ok(self.regex.as_ref().is_some_and(|regex| regex.is_match(name)))
    }
}

impl fmt::Display for ItemPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}
