//! Currency rounding helpers.
//!
//! Midpoints round away from zero, so 157.5 becomes 158.

use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds to the nearest whole currency unit.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::round_currency;
/// use rust_decimal::Decimal;
///
/// assert_eq!(round_currency(Decimal::new(1575, 1)), Decimal::new(158, 0));
/// assert_eq!(round_currency(Decimal::new(1574, 1)), Decimal::new(157, 0));
/// ```
pub fn round_currency(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Rounds to two decimal places.
pub fn round_cents(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}
