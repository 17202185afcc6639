//! Asset tag sequencing.
//!
//! Generates human-readable tags from a naming convention with one numeric
//! placeholder (`IT-N` → `IT-0001`, `IT-0002`, ...). An existing tag that already
//! follows the convention is preserved so assets are never renumbered on resync.
//!
//! # Example
//!
//! ```rust
//! use sniper::tagging::next_tag;
//!
//! let tag = next_tag("MIS-2025-N", ["MIS-2025-0001", "MIS-2025-0003"]).unwrap();
//! assert_eq!(tag, "MIS-2025-0004");
//! ```

mod error;
mod pattern;

pub use error::TagError;
pub use pattern::NamingPattern;

use std::fmt::Display;
use std::future::Future;

/// Character marking the sequence number in a naming pattern.
pub const PLACEHOLDER: char = 'N';

/// Digit width used when no tag of the pattern exists yet.
pub const INITIAL_WIDTH: usize = 4;

/// Outcome of tag assignment. Never an error: failures collapse into `Fallback`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagDecision {
    /// The existing tag already follows the convention.
    Preserved(String),
    /// A new sequence number was allocated.
    Generated(String),
    /// No convention applies, or generation failed.
    Fallback(String),
}

impl TagDecision {
    pub fn tag(&self) -> &str {
        match self {
            TagDecision::Preserved(tag)
            | TagDecision::Generated(tag)
            | TagDecision::Fallback(tag) => tag,
        }
    }

    pub fn into_tag(self) -> String {
        match self {
            TagDecision::Preserved(tag)
            | TagDecision::Generated(tag)
            | TagDecision::Fallback(tag) => tag,
        }
    }
}

impl NamingPattern {
    /// Next tag after the highest-numbered tag in `existing` that matches this pattern.
    ///
    /// The number is padded to the digit width of the previous maximum, so widths
    /// grow naturally past `9999`. Starts at `0001` when nothing matches.
    pub fn next_tag<I, S>(&self, existing: I) -> String
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let highest = existing
            .into_iter()
            .filter_map(|tag| {
                let digits = self.capture(tag.as_ref())?;
                let number = digits.parse::<u64>().ok()?;
                Some((number, digits.len()))
            })
            .max();

        match highest {
            Some((number, width)) => self.render(number.saturating_add(1), width),
            None => self.render(1, INITIAL_WIDTH),
        }
    }
}

/// Whether `tag` fully matches `pattern`. Invalid patterns match nothing.
pub fn tag_matches_pattern(tag: &str, pattern: &str) -> bool {
    NamingPattern::parse(pattern)
        .map(|p| p.matches(tag))
        .unwrap_or(false)
}

/// Sequence number captured from `tag`, or 0 when it does not match `pattern`.
pub fn extract_number(tag: &str, pattern: &str) -> u64 {
    NamingPattern::parse(pattern)
        .map(|p| p.extract_number(tag))
        .unwrap_or(0)
}

/// Next tag for `pattern` given the tags already in use.
pub fn next_tag<I, S>(pattern: &str, existing: I) -> Result<String, TagError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    Ok(NamingPattern::parse(pattern)?.next_tag(existing))
}

/// Keep a conforming tag or allocate the next one; otherwise use `fallback`.
///
/// `load_existing` receives the pattern's search term and returns the tags
/// currently in use. It is only called when a new number is needed. Any failure
/// (invalid pattern, failed lookup) is logged and yields
/// `TagDecision::Fallback(fallback)`.
pub async fn generate_or_preserve<F, Fut, E>(
    pattern: &str,
    fallback: &str,
    existing_tag: Option<&str>,
    load_existing: F,
) -> TagDecision
where
    F: FnOnce(String) -> Fut,
    Fut: Future<Output = Result<Vec<String>, E>>,
    E: Display,
{
    if pattern.trim().is_empty() {
        return TagDecision::Fallback(fallback.to_string());
    }

    let parsed = match NamingPattern::parse(pattern) {
        Ok(parsed) => parsed,
        Err(e) => {
            tracing::warn!(pattern, error = %e, "Invalid naming pattern, using fallback tag");
            return TagDecision::Fallback(fallback.to_string());
        }
    };

    if let Some(tag) = existing_tag.map(str::trim).filter(|t| parsed.matches(t)) {
        return TagDecision::Preserved(tag.to_string());
    }

    match load_existing(parsed.search_term().to_string()).await {
        Ok(tags) => TagDecision::Generated(parsed.next_tag(&tags)),
        Err(e) => {
            tracing::warn!(
                pattern,
                fallback,
                error = %e,
                "Failed to enumerate existing tags, using fallback tag"
            );
            TagDecision::Fallback(fallback.to_string())
        }
    }
}
