//! Money helpers.
//!
//! All prices in the system are ARS amounts represented as
//! [`rust_decimal::Decimal`]. Floats never touch a money path.

use rust_decimal::{Decimal, RoundingStrategy};

/// Round an amount to whole pesos, half away from zero.
///
/// Derived prices (pack/wholesale) are always quoted in whole pesos.
#[must_use]
pub fn round_to_peso(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Round a stock quantity to three decimals, half away from zero.
///
/// Raw-material quantities are kept at millesimal precision (e.g. 0.125 kg
/// of filament drawn from a spool).
#[must_use]
pub fn round_quantity(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(3, RoundingStrategy::MidpointAwayFromZero)
}

/// Format an amount for display, e.g. `$1.234,50`.
///
/// Argentine convention: thousands separated by `.`, decimals by `,`.
/// Whole amounts omit the decimal part.
#[must_use]
pub fn format_ars(amount: Decimal) -> String {
    let rounded = amount.round_dp(2);
    let negative = rounded.is_sign_negative();
    let abs = rounded.abs();
    let as_str = abs.to_string();
    let (int_part, frac_part) = as_str
        .split_once('.')
        .map_or((as_str.as_str(), ""), |(i, f)| (i, f));

    let mut grouped = String::new();
    let digits: Vec<char> = int_part.chars().collect();
    for (i, c) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i).is_multiple_of(3) {
            grouped.push('.');
        }
        grouped.push(*c);
    }

    let sign = if negative { "-" } else { "" };
    if frac_part.is_empty() || frac_part.chars().all(|c| c == '0') {
        format!("{sign}${grouped}")
    } else {
        format!("{sign}${grouped},{frac_part:0<2}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_to_peso_half_away_from_zero() {
        assert_eq!(round_to_peso(Decimal::new(105, 1)), Decimal::from(11)); // 10.5
        assert_eq!(round_to_peso(Decimal::new(104, 1)), Decimal::from(10)); // 10.4
        assert_eq!(round_to_peso(Decimal::new(-105, 1)), Decimal::from(-11));
    }

    #[test]
    fn test_round_quantity() {
        assert_eq!(
            round_quantity(Decimal::new(1_234_56, 5)), // 1.23456
            Decimal::new(1_235, 3)
        );
    }

    #[test]
    fn test_format_ars_grouping() {
        assert_eq!(format_ars(Decimal::from(58_500)), "$58.500");
        assert_eq!(format_ars(Decimal::new(28_500_50, 2)), "$28.500,50");
        assert_eq!(format_ars(Decimal::from(950)), "$950");
        assert_eq!(format_ars(Decimal::from(1_000_000)), "$1.000.000");
    }
}
