//! Locale date parsing against provider-specific format lists.

use chrono::{NaiveDate, NaiveDateTime};

/// Parse a date token with the provider's ordered format list.
///
/// Formats without time tokens parse as a bare date at midnight.
/// Two-digit years follow chrono's `%y` pivot (00-68 map to 2000s).
/// A parse failure yields `None`; whether that is fatal is decided by
/// the result normalizer, not here.
pub fn parse_datetime(token: &str, formats: &[&str]) -> Option<NaiveDateTime> {
    let token = collapse_spaces(token.trim());

    for format in formats {
        if has_time_tokens(format) {
            if let Ok(dt) = NaiveDateTime::parse_from_str(&token, format) {
                return Some(dt);
            }
        } else if let Ok(d) = NaiveDate::parse_from_str(&token, format) {
            return d.and_hms_opt(0, 0, 0);
        }
    }
    None
}

fn has_time_tokens(format: &str) -> bool {
    format.contains("%H") || format.contains("%I") || format.contains("%M")
}

fn collapse_spaces(token: &str) -> String {
    token.split_whitespace().collect::<Vec<_>>().join(" ")
}
