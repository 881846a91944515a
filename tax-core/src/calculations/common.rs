//! Rounding and rate helpers shared by the tax calculators.
//!
//! Every calculator keeps full precision while it works and rounds once,
//! when a result value is finalized.

use rust_decimal::{Decimal, RoundingStrategy};

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// Rounds a monetary value to two decimal places, midpoint away from zero.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(2158.3333)), dec!(2158.33));
/// assert_eq!(round_half_up(dec!(0.005)), dec!(0.01));
/// assert_eq!(round_half_up(dec!(-0.005)), dec!(-0.01));
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Clamps negative values to zero.
pub fn floor_at_zero(value: Decimal) -> Decimal {
    value.max(Decimal::ZERO)
}

/// Converts a fractional rate (`0.24`) into a percentage (`24`).
pub fn as_percent(rate: Decimal) -> Decimal {
    rate * HUNDRED
}

/// Expresses `part` as a percentage of `base`, rounded to two places.
///
/// Returns zero when `base` is zero or negative, so callers never divide by
/// zero.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::calculations::common::effective_rate;
///
/// assert_eq!(effective_rate(dec!(2000), dec!(15000)), dec!(13.33));
/// assert_eq!(effective_rate(dec!(100), dec!(0)), dec!(0));
/// ```
pub fn effective_rate(
    part: Decimal,
    base: Decimal,
) -> Decimal {
    if base <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    round_half_up(part / base * HUNDRED)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    // =========================================================================
    // round_half_up tests
    // =========================================================================

    #[test]
    fn round_half_up_rounds_down_below_midpoint() {
        assert_eq!(round_half_up(dec!(3225.004)), dec!(3225.00));
    }

    #[test]
    fn round_half_up_rounds_up_at_midpoint() {
        assert_eq!(round_half_up(dec!(1099.995)), dec!(1100.00));
    }

    #[test]
    fn round_half_up_rounds_negative_midpoint_away_from_zero() {
        assert_eq!(round_half_up(dec!(-12.345)), dec!(-12.35));
    }

    #[test]
    fn round_half_up_keeps_two_place_values() {
        assert_eq!(round_half_up(dec!(7000.00)), dec!(7000.00));
    }

    // =========================================================================
    // floor_at_zero tests
    // =========================================================================

    #[test]
    fn floor_at_zero_clamps_negative_values() {
        assert_eq!(floor_at_zero(dec!(-5000.00)), dec!(0));
    }

    #[test]
    fn floor_at_zero_keeps_positive_values() {
        assert_eq!(floor_at_zero(dec!(30000.00)), dec!(30000.00));
    }

    // =========================================================================
    // rate tests
    // =========================================================================

    #[test]
    fn as_percent_scales_fraction() {
        assert_eq!(as_percent(dec!(0.1333)), dec!(13.33));
        assert_eq!(as_percent(dec!(0.24)), dec!(24));
    }

    #[test]
    fn effective_rate_rounds_to_two_places() {
        assert_eq!(effective_rate(dec!(13900), dec!(50000)), dec!(27.80));
        assert_eq!(effective_rate(dec!(5000), dec!(15000)), dec!(33.33));
    }

    #[test]
    fn effective_rate_is_zero_for_zero_base() {
        assert_eq!(effective_rate(dec!(0), dec!(0)), dec!(0));
    }

    #[test]
    fn effective_rate_is_zero_for_negative_base() {
        assert_eq!(effective_rate(dec!(10), dec!(-100)), dec!(0));
    }
}
