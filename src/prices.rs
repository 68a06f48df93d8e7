//! Prices
//!
//! Coercion of marketplace price text into exact monetary amounts.
//!
//! Scraped listings carry prices as locale-formatted text: comma or point
//! decimal separators, grouping separators, stray whitespace or newlines, and
//! trailing currency annotations (`"2,50 €"`). Everything here converts such
//! text into [`Money`] in minor units or fails with a [`PriceError`] that the
//! ingestion layer can attach to the offending row.

use num_traits::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use rusty_money::{Money, iso::Currency};
use thiserror::Error;

/// Errors raised while coercing price text into a monetary amount.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PriceError {
    /// The price field was empty or contained only whitespace.
    #[error("price field is empty")]
    Empty,

    /// The price text did not start with a numeric amount.
    #[error("price {0:?} is not numeric")]
    NotNumeric(String),

    /// The price text encoded a negative amount.
    #[error("price {0:?} is negative")]
    Negative(String),

    /// The amount does not fit the currency's minor-unit representation.
    #[error("price {0:?} cannot be represented in minor units")]
    NotRepresentable(String),
}

/// Parse locale-formatted price text into [`Money`] in the given currency.
///
/// Whitespace (including embedded newlines) is stripped, the leading numeric
/// run is taken, and anything after it (currency signs, condition notes) is
/// discarded. A separator that occurs exactly once and is the rightmost of
/// `.`/`,` is treated as the decimal separator; repeated separators are
/// treated as grouping and removed. Sub-minor-unit digits are rounded half
/// away from zero.
///
/// # Errors
///
/// Returns a [`PriceError`] if the text is empty, non-numeric, negative, or
/// does not fit in the currency's minor units.
pub fn parse_price(
    raw: &str,
    currency: &'static Currency,
) -> Result<Money<'static, Currency>, PriceError> {
    let minor = parse_minor_units(raw, currency.exponent)?;

    Ok(Money::from_minor(minor, currency))
}

/// Parse locale-formatted price text into minor units at the given exponent.
///
/// # Errors
///
/// Returns a [`PriceError`] under the same conditions as [`parse_price`].
pub fn parse_minor_units(raw: &str, exponent: u32) -> Result<i64, PriceError> {
    let compact: String = raw.chars().filter(|c| !c.is_whitespace()).collect();

    if compact.is_empty() {
        return Err(PriceError::Empty);
    }

    if compact.starts_with('-') {
        return Err(PriceError::Negative(raw.trim().to_string()));
    }

    // Leading numeric run; trailing currency annotations are dropped.
    let numeric: String = compact
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.' || *c == ',')
        .collect();

    if !numeric.chars().any(|c| c.is_ascii_digit()) {
        return Err(PriceError::NotNumeric(raw.trim().to_string()));
    }

    let canonical = canonicalize_separators(&numeric);

    let amount: Decimal = canonical
        .parse()
        .map_err(|_err| PriceError::NotNumeric(raw.trim().to_string()))?;

    let scale = 10_i64
        .checked_pow(exponent)
        .map(Decimal::from)
        .ok_or_else(|| PriceError::NotRepresentable(raw.trim().to_string()))?;

    let minor = amount
        .checked_mul(scale)
        .map(|scaled| scaled.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|rounded| rounded.to_i64())
        .ok_or_else(|| PriceError::NotRepresentable(raw.trim().to_string()))?;

    Ok(minor)
}

/// Rewrite a numeric run into point-decimal form.
///
/// The rightmost of `.`/`,` is the decimal separator when it occurs exactly
/// once; any separator occurring more than once is grouping and is removed.
fn canonicalize_separators(numeric: &str) -> String {
    let points = numeric.chars().filter(|c| *c == '.').count();
    let commas = numeric.chars().filter(|c| *c == ',').count();

    let last_point = numeric.rfind('.');
    let last_comma = numeric.rfind(',');

    let decimal = match (last_point, last_comma) {
        (Some(p), Some(c)) => {
            if p > c {
                (points == 1).then_some('.')
            } else {
                (commas == 1).then_some(',')
            }
        }
        (Some(_), None) => (points == 1).then_some('.'),
        (None, Some(_)) => (commas == 1).then_some(','),
        (None, None) => None,
    };

    numeric
        .chars()
        .filter_map(|c| match c {
            '.' | ',' if Some(c) == decimal => Some('.'),
            '.' | ',' => None,
            digit => Some(digit),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::EUR;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn parses_comma_decimal_separator() -> TestResult {
        assert_eq!(parse_price("1,10", EUR)?, Money::from_minor(110, EUR));

        Ok(())
    }

    #[test]
    fn parses_point_decimal_separator() -> TestResult {
        assert_eq!(parse_price("0.50", EUR)?, Money::from_minor(50, EUR));

        Ok(())
    }

    #[test]
    fn strips_trailing_currency_annotation() -> TestResult {
        assert_eq!(parse_price("2,50 €", EUR)?, Money::from_minor(250, EUR));

        Ok(())
    }

    #[test]
    fn strips_embedded_newlines() -> TestResult {
        assert_eq!(parse_price("1\n,75 €", EUR)?, Money::from_minor(175, EUR));

        Ok(())
    }

    #[test]
    fn parses_grouped_thousands_with_comma_decimal() -> TestResult {
        assert_eq!(
            parse_price("1.234,56", EUR)?,
            Money::from_minor(123_456, EUR)
        );

        Ok(())
    }

    #[test]
    fn parses_grouped_thousands_with_point_decimal() -> TestResult {
        assert_eq!(
            parse_price("1,234.56", EUR)?,
            Money::from_minor(123_456, EUR)
        );

        Ok(())
    }

    #[test]
    fn treats_repeated_separator_as_grouping() -> TestResult {
        assert_eq!(
            parse_price("1.234.567", EUR)?,
            Money::from_minor(123_456_700, EUR)
        );

        Ok(())
    }

    #[test]
    fn parses_whole_number_as_major_units() -> TestResult {
        assert_eq!(parse_price("12", EUR)?, Money::from_minor(1200, EUR));

        Ok(())
    }

    #[test]
    fn rounds_sub_minor_digits_half_away_from_zero() -> TestResult {
        assert_eq!(parse_price("1,005", EUR)?, Money::from_minor(101, EUR));

        Ok(())
    }

    #[test]
    fn rejects_empty_text() {
        assert_eq!(parse_price("  \n ", EUR), Err(PriceError::Empty));
    }

    #[test]
    fn rejects_non_numeric_text() {
        assert_eq!(
            parse_price("sold out", EUR),
            Err(PriceError::NotNumeric("sold out".to_string()))
        );
    }

    #[test]
    fn rejects_negative_amounts() {
        assert_eq!(
            parse_price("-1,50", EUR),
            Err(PriceError::Negative("-1,50".to_string()))
        );
    }

    #[test]
    fn zero_exponent_currency_treats_lone_separator_as_decimal() -> TestResult {
        // Separator classification does not depend on the exponent: a lone
        // `.` is still the decimal separator, and the fraction rounds away.
        assert_eq!(parse_minor_units("1.250", 0)?, 1);
        assert_eq!(parse_minor_units("1250", 0)?, 1250);

        Ok(())
    }

    #[test]
    fn oversized_exponent_is_not_representable() {
        assert_eq!(
            parse_minor_units("1", 19),
            Err(PriceError::NotRepresentable("1".to_string()))
        );
    }
}
