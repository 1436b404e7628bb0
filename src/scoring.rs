//! Extraction of the score and reason from the provider's free-text reply.
//!
//! The provider is asked to answer with
//!
//! ```text
//! Score: XX
//! Reason: ...
//! ```
//!
//! but nothing enforces it, so both labels are searched independently and
//! each has its own fallback.

use crate::models::UNPARSEABLE_SCORE;
use once_cell::sync::Lazy;
use regex::Regex;

/// Reason used when the reply has no `Reason:` label.
pub const NO_REASON_PROVIDED: &str = "No reason provided";

static SCORE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Score:\s*(\d+)").expect("score pattern is valid"));

static REASON_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Reason:\s*(.*)").expect("reason pattern is valid"));

static DECIMAL_DIGIT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\A\d\z").expect("digit pattern is valid"));

/// Score and reason pulled out of a scoring reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedScore {
    pub score: i64,
    pub reason: String,
}

/// Parses a scoring reply.
///
/// * `score` is the first run of decimal digits (any script, e.g. `87`,
///   `８７`, `٨٧`) following a `Score:` label and optional whitespace, with no
///   range clamp. It is [`UNPARSEABLE_SCORE`] when no label is followed by
///   digits. A run too large for an `i64` saturates to `i64::MAX` rather than
///   keeping its exact value, so the lead is still stored.
/// * `reason` is the rest of the line after the first `Reason:` label,
///   trimmed, or [`NO_REASON_PROVIDED`] when the label is absent.
pub fn parse_scoring_reply(text: &str) -> ParsedScore {
    let score = SCORE_RE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|digits| digits_to_score(digits.as_str()))
        .unwrap_or(UNPARSEABLE_SCORE);

    let reason = REASON_RE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_else(|| NO_REASON_PROVIDED.to_string());

    ParsedScore { score, reason }
}

/// Folds a run of `\d` characters into an integer, saturating on overflow.
fn digits_to_score(digits: &str) -> i64 {
    let mut value: i64 = 0;
    let mut saturated = false;
    for c in digits.chars() {
        let digit = decimal_value(c);
        match value.checked_mul(10).and_then(|v| v.checked_add(digit)) {
            Some(next) => value = next,
            None => {
                saturated = true;
                value = i64::MAX;
                break;
            }
        }
    }
    if saturated {
        tracing::warn!("Score digits '{}' exceed i64; saturating", digits);
    }
    value
}

/// Numeric value of a Unicode decimal digit.
///
/// Decimal digits are encoded in contiguous blocks of ten ordered 0..9, and
/// adjacent blocks (e.g. the mathematical digits) are each ten long, so the
/// offset from the start of the surrounding digit run, modulo 10, is the value.
fn decimal_value(c: char) -> i64 {
    if let Some(d) = c.to_digit(10) {
        return i64::from(d);
    }
    let mut start = u32::from(c);
    while let Some(prev) = start.checked_sub(1).and_then(char::from_u32) {
        let mut buf = [0u8; 4];
        if !DECIMAL_DIGIT_RE.is_match(prev.encode_utf8(&mut buf)) {
            break;
        }
        start -= 1;
    }
    i64::from((u32::from(c) - start) % 10)
}
