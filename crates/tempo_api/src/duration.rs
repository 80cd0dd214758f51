//! Conversion between human-entered durations ("2h 30m", "1.5h", "90") and seconds.
//!
//! Parsing is lenient on purpose: unreadable tokens are skipped and input that
//! yields nothing positive falls back to one hour. Callers that need strict
//! validation must check the text themselves before calling [`parse`].

use once_cell::sync::Lazy;
use regex::Regex;

/// Value returned by [`parse`] when no token contributes a positive amount.
pub const DEFAULT_DURATION_SECS: u64 = 3600;

const SECS_PER_HOUR: f64 = 3600.0;
const SECS_PER_MINUTE: u64 = 60;

static HOURS_ONLY_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+(?:\.\d*)?|\.\d+)\s*h$").expect("invalid hours regex"));
static DURATION_TOKEN_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d+(?:\.\d*)?|\.\d+)(h|m)?$").expect("invalid duration token regex")
});

/// Parses a duration string into whole seconds.
///
/// Bare numbers are minutes, fractional hours and minutes truncate to whole
/// seconds, and empty or unreadable input yields [`DEFAULT_DURATION_SECS`].
pub fn parse(text: &str) -> u64 {
    let normalized = text.trim().to_lowercase();

    // A lone hour amount is taken as is, so "0h" stays zero.
    if let Some(capture) = HOURS_ONLY_REGEX.captures(&normalized) {
        if let Some(hours) = parse_amount(&capture[1]) {
            return fraction_to_secs(hours, SECS_PER_HOUR);
        }
    }

    let mut total = 0u64;
    for part in normalized.replace(',', " ").split_whitespace() {
        total = total.saturating_add(token_secs(part).unwrap_or(0));
    }

    if total > 0 {
        total
    } else {
        DEFAULT_DURATION_SECS
    }
}

fn token_secs(part: &str) -> Option<u64> {
    let capture = DURATION_TOKEN_REGEX.captures(part)?;
    let amount = &capture[1];
    match capture.get(2).map(|unit| unit.as_str()) {
        Some("h") => parse_amount(amount).map(|hours| fraction_to_secs(hours, SECS_PER_HOUR)),
        Some(_) => {
            parse_amount(amount).map(|minutes| fraction_to_secs(minutes, SECS_PER_MINUTE as f64))
        }
        // bare numbers count only when they are whole minutes
        None => amount
            .parse::<u64>()
            .ok()
            .map(|minutes| minutes.saturating_mul(SECS_PER_MINUTE)),
    }
}

/// Formats seconds as "Hh Mm", or "Mm" when under an hour. Leftover seconds are dropped.
pub fn format(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    if hours > 0 {
        format!("{}h {}m", hours, minutes)
    } else {
        format!("{}m", minutes)
    }
}

fn parse_amount(text: &str) -> Option<f64> {
    text.parse::<f64>().ok().filter(|value| value.is_finite())
}

fn fraction_to_secs(amount: f64, unit: f64) -> u64 {
    // `as` saturates at u64::MAX for oversized values
    (amount * unit).trunc() as u64
}

#[cfg(test)]
mod tests {
    use super::{format, parse, DEFAULT_DURATION_SECS};

    #[test]
    fn format_matches_reference_values() {
        assert_eq!(format(0), "0m");
        assert_eq!(format(60), "1m");
        assert_eq!(format(1800), "30m");
        assert_eq!(format(3600), "1h 0m");
        assert_eq!(format(3900), "1h 5m");
        assert_eq!(format(3659), "1h 0m");
    }

    #[test]
    fn parse_matches_reference_values() {
        assert_eq!(parse("1h"), 3600);
        assert_eq!(parse("1.5h"), 5400);
        assert_eq!(parse("30m"), 1800);
        assert_eq!(parse("1h 30m"), 5400);
        assert_eq!(parse("2h 45m"), 9900);
        assert_eq!(parse("90"), 5400);
        assert_eq!(parse(""), 3600);
    }

    #[test]
    fn parse_accepts_commas_case_and_padding() {
        assert_eq!(parse("  2H, 15M "), 8100);
        assert_eq!(parse("1.25 h"), 4500);
        assert_eq!(parse("0.5m"), 30);
    }

    #[test]
    fn parse_truncates_fractional_seconds() {
        // 0.0001h = 0.36s
        assert_eq!(parse("1.0001h"), 3600);
    }

    #[test]
    fn unreadable_input_falls_back_to_one_hour() {
        assert_eq!(parse("soon"), DEFAULT_DURATION_SECS);
        assert_eq!(parse("-2h"), DEFAULT_DURATION_SECS);
        assert_eq!(parse("1h30m"), DEFAULT_DURATION_SECS);
        assert_eq!(parse("nanh"), DEFAULT_DURATION_SECS);
        assert_eq!(parse("0m"), DEFAULT_DURATION_SECS);
    }

    #[test]
    fn unreadable_tokens_are_skipped_not_fatal() {
        assert_eq!(parse("xh 20m"), 1200);
        assert_eq!(parse("2h 1.5"), 7200);
    }

    #[test]
    fn tokens_with_trailing_text_are_skipped() {
        assert_eq!(parse("90min 15m"), 900);
        assert_eq!(parse("2hours"), DEFAULT_DURATION_SECS);
        assert_eq!(parse(".5h 10"), 2400);
    }

    #[test]
    fn zero_hours_alone_is_legal() {
        assert_eq!(parse("0h"), 0);
    }

    #[test]
    fn whole_minutes_round_trip() {
        for minutes in (1..=600u64).chain([1439, 1440, 10_000]) {
            let seconds = minutes * 60;
            assert_eq!(parse(&format(seconds)), seconds, "{minutes} minutes");
        }
    }

    #[test]
    fn sub_minute_precision_is_dropped_on_format() {
        assert_eq!(parse(&format(5430)), 5400);
    }
}
