//! Fuzzy serial matching.
//!
//! Two serials match when they differ only by zero padding inside numeric runs.
//! Letters are never fuzzed: `3CM22239ZQ` and `3CM22239Z0` are different units.

use super::normalize::{normalize_model_name, normalize_serial};
use regex::Regex;
use std::sync::LazyLock;

/// Edit distance above which two serials are rejected without segment comparison.
pub const MAX_EDIT_DISTANCE: usize = 3;

static SEGMENT_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Z]+|[0-9]+").expect("segment pattern is valid"));

#[derive(Debug, PartialEq, Eq)]
enum Segment<'a> {
    Letters(&'a str),
    Digits(&'a str),
}

impl Segment<'_> {
    fn matches(&self, other: &Segment<'_>) -> bool {
        match (self, other) {
            (Segment::Letters(a), Segment::Letters(b)) => a == b,
            (Segment::Digits(a), Segment::Digits(b)) => same_integer(a, b),
            _ => false,
        }
    }
}

/// Compare two digit strings as integers without parsing (serial runs overflow u64).
fn same_integer(a: &str, b: &str) -> bool {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a == b
}

fn segments(serial: &str) -> Vec<Segment<'_>> {
    SEGMENT_PATTERN
        .find_iter(serial)
        .map(|m| {
            let text = m.as_str();
            if text.as_bytes()[0].is_ascii_digit() {
                Segment::Digits(text)
            } else {
                Segment::Letters(text)
            }
        })
        .collect()
}

/// Returns true when `a` and `b` identify the same physical serial.
///
/// Only leading-zero differences in numeric segments are tolerated. The relation
/// is symmetric.
///
/// # Examples
///
/// ```
/// use sniper::matching::serials_match;
///
/// assert!(serials_match("UK2239016158", "UK02239016158"));
/// assert!(!serials_match("3CM22239ZQ", "3CM22239Z0"));
/// assert!(!serials_match("00AB123", "AB123"));
/// ```
pub fn serials_match(a: &str, b: &str) -> bool {
    if a.trim().is_empty() || b.trim().is_empty() {
        return false;
    }

    let a = normalize_serial(a);
    let b = normalize_serial(b);
    if a == b {
        return true;
    }

    if strsim::levenshtein(&a, &b) > MAX_EDIT_DISTANCE {
        return false;
    }

    // Same length but different content means a substituted character.
    if a.chars().count() == b.chars().count() {
        return false;
    }

    let left = segments(&a);
    let right = segments(&b);
    if left.len() != right.len() {
        return false;
    }

    left.iter().zip(right.iter()).all(|(l, r)| l.matches(r))
}

/// Normalized display-name equality. Empty names never match.
pub fn model_name_matches(a: &str, b: &str) -> bool {
    let a = normalize_model_name(a);
    !a.is_empty() && a == normalize_model_name(b)
}
