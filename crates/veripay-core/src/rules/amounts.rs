//! Monetary value parsing.

use rust_decimal::Decimal;
use std::str::FromStr;

/// Parse a receipt amount token into a decimal.
///
/// Thousands separators (commas, regular and non-breaking spaces) are
/// stripped before the numeric parse; a trailing comma group of two
/// digits is treated as a decimal separator. Tokens that do not parse to
/// a finite number yield `None` so a failed extraction can never look
/// like a genuine zero-value transaction.
pub fn parse_amount(token: &str) -> Option<Decimal> {
    let cleaned: String = token
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == ',' || *c == '.')
        .collect();
    if !cleaned.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }

    let normalized = match (cleaned.rfind(','), cleaned.rfind('.')) {
        // Both separators: the later one is the decimal point.
        (Some(c), Some(d)) if c > d => cleaned.replace('.', "").replace(',', "."),
        (Some(_), Some(_)) => cleaned.replace(',', ""),
        // Comma only: decimal separator when it looks like one, thousands
        // separator otherwise.
        (Some(c), None) => {
            let digits_after = cleaned.len() - c - 1;
            if digits_after == 2 && cleaned.matches(',').count() == 1 {
                cleaned.replace(',', ".")
            } else {
                cleaned.replace(',', "")
            }
        }
        _ => cleaned,
    };

    Decimal::from_str(&normalized).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn thousands_separators_are_idempotent() {
        assert_eq!(parse_amount("1,234.50"), Some(dec("1234.50")));
        assert_eq!(parse_amount("1234.50"), Some(dec("1234.50")));
        assert_eq!(parse_amount("12,345,678.90"), Some(dec("12345678.90")));
    }

    #[test]
    fn currency_markers_are_ignored() {
        assert_eq!(parse_amount("ETB 1,000.00"), Some(dec("1000.00")));
        assert_eq!(parse_amount("100.00 Birr"), Some(dec("100.00")));
    }

    #[test]
    fn comma_decimal_fallback() {
        assert_eq!(parse_amount("1234,56"), Some(dec("1234.56")));
        assert_eq!(parse_amount("1,234"), Some(dec("1234")));
    }

    #[test]
    fn garbage_is_absent() {
        assert_eq!(parse_amount("N/A"), None);
        assert_eq!(parse_amount("--"), None);
        assert_eq!(parse_amount(""), None);
    }
}
