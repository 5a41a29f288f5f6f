//! Amount parsing for externally supplied input.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! Every amount in the ledger is a `rust_decimal::Decimal`.

use std::str::FromStr;

use rust_decimal::Decimal;

use crate::error::InputError;

/// Parses a debit or credit cell from an imported row.
///
/// A blank cell means zero. Anything else must be a plain decimal literal.
pub fn parse_amount(raw: &str) -> Result<Decimal, InputError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(Decimal::ZERO);
    }

    Decimal::from_str(trimmed).map_err(|_| InputError::MalformedAmount(raw.to_string()))
}

/// Parses a signed amount from a bank statement export.
///
/// Statement exports are noisy: currency symbols, thousands separators and
/// accounting-style parentheses for negatives all show up. Returns `Ok(None)`
/// when nothing is left after cleaning.
pub fn parse_statement_amount(raw: &str) -> Result<Option<Decimal>, InputError> {
    let mut cleaned: String = raw
        .chars()
        .filter(|c| !matches!(c, '$' | ',' | ' ' | '\t'))
        .collect();

    if cleaned.contains('(') && cleaned.contains(')') {
        cleaned = format!("-{}", cleaned.replace(['(', ')'], ""));
    }

    if cleaned.is_empty() {
        return Ok(None);
    }

    Decimal::from_str(&cleaned)
        .map(Some)
        .map_err(|_| InputError::MalformedAmount(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case("100.00", dec!(100.00))]
    #[case("  42 ", dec!(42))]
    #[case("", Decimal::ZERO)]
    #[case("   ", Decimal::ZERO)]
    #[case("0.01", dec!(0.01))]
    fn test_parse_amount(#[case] raw: &str, #[case] expected: Decimal) {
        assert_eq!(parse_amount(raw).unwrap(), expected);
    }

    #[rstest]
    #[case("12,50")]
    #[case("abc")]
    #[case("$10")]
    fn test_parse_amount_rejects_malformed(#[case] raw: &str) {
        assert!(matches!(
            parse_amount(raw),
            Err(InputError::MalformedAmount(_))
        ));
    }

    #[rstest]
    #[case("$1,250.00", Some(dec!(1250.00)))]
    #[case("(250.00)", Some(dec!(-250.00)))]
    #[case("$ (1,000.10)", Some(dec!(-1000.10)))]
    #[case("-75.25", Some(dec!(-75.25)))]
    #[case("  ", None)]
    #[case("$", None)]
    fn test_parse_statement_amount(#[case] raw: &str, #[case] expected: Option<Decimal>) {
        assert_eq!(parse_statement_amount(raw).unwrap(), expected);
    }

    #[test]
    fn test_parse_statement_amount_rejects_garbage() {
        assert!(parse_statement_amount("twelve").is_err());
    }
}
