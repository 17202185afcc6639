//! Naming pattern parsing.

use super::{TagError, PLACEHOLDER};
use regex::Regex;

/// A tag naming convention such as `IT-N` or `MIS-MON-2025-N`.
///
/// The placeholder is always the **last** `N` in the pattern, so fixed text may
/// contain the letter (`MON` above). Everything else is matched literally.
#[derive(Debug, Clone)]
pub struct NamingPattern {
    prefix: String,
    suffix: String,
    matcher: Regex,
}

impl NamingPattern {
    /// Parse a pattern string.
    ///
    /// # Errors
    ///
    /// Returns `TagError::EmptyPattern` for blank input and
    /// `TagError::MissingPlaceholder` when there is no `N`.
    pub fn parse(pattern: &str) -> Result<Self, TagError> {
        let pattern = pattern.trim();
        if pattern.is_empty() {
            return Err(TagError::EmptyPattern);
        }

        let at = pattern
            .rfind(PLACEHOLDER)
            .ok_or_else(|| TagError::MissingPlaceholder(pattern.to_string()))?;
        let prefix = &pattern[..at];
        let suffix = &pattern[at + PLACEHOLDER.len_utf8()..];

        let source = format!(
            r"^{}(\d+){}$",
            regex::escape(prefix),
            regex::escape(suffix)
        );
        let matcher = Regex::new(&source).map_err(|e| TagError::InvalidPattern {
            pattern: pattern.to_string(),
            message: e.to_string(),
        })?;

        Ok(Self {
            prefix: prefix.to_string(),
            suffix: suffix.to_string(),
            matcher,
        })
    }

    /// Fixed text before the placeholder.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Fixed text after the placeholder.
    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    /// Text to hand to a substring search when enumerating tags of this pattern.
    pub fn search_term(&self) -> &str {
        if self.prefix.is_empty() {
            &self.suffix
        } else {
            &self.prefix
        }
    }

    /// Whether `tag` fully matches this pattern.
    pub fn matches(&self, tag: &str) -> bool {
        self.matcher.is_match(tag.trim())
    }

    /// The sequence digits of a matching tag, with their original padding.
    pub fn capture<'t>(&self, tag: &'t str) -> Option<&'t str> {
        self.matcher
            .captures(tag.trim())
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    }

    /// Sequence number of a matching tag, or 0 when it does not match.
    pub fn extract_number(&self, tag: &str) -> u64 {
        self.capture(tag)
            .and_then(|digits| digits.parse().ok())
            .unwrap_or(0)
    }

    /// Substitute a zero-padded number into the pattern.
    pub fn render(&self, number: u64, width: usize) -> String {
        format!("{}{:0width$}{}", self.prefix, number, self.suffix, width = width)
    }
}
