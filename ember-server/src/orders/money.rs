//! Money calculation utilities using rust_decimal for precision
//!
//! All arithmetic is done in `Decimal`, then converted to `f64` for
//! storage/serialization. Monetary values round to 2 decimal places,
//! half-up.

use rust_decimal::prelude::*;

/// Rounding for monetary values (2 decimal places, half-up)
const DECIMAL_PLACES: u32 = 2;

/// Round a decimal amount to money precision
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Convert an f64 price into Decimal for calculation
pub fn dec(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}

/// Line total: unit price × quantity
pub fn line_total(price: f64, quantity: i64) -> Decimal {
    dec(price) * Decimal::from(quantity)
}

/// Order total over (unit price, quantity) pairs, rounded, as storage f64
pub fn order_total<I>(lines: I) -> f64
where
    I: IntoIterator<Item = (f64, i64)>,
{
    let total: Decimal = lines
        .into_iter()
        .map(|(price, quantity)| line_total(price, quantity))
        .sum();
    round_money(total).to_f64().unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_total_exact() {
        // {price: 10.00, qty: 2} + {price: 5.00, qty: 1} => 25.00
        let total = order_total([(10.00, 2), (5.00, 1)]);
        assert_eq!(total, 25.00);
    }

    #[test]
    fn test_order_total_no_float_drift() {
        // 0.1 + 0.2 style inputs stay exact through Decimal
        let total = order_total([(0.10, 1), (0.20, 1)]);
        assert_eq!(total, 0.30);
    }

    #[test]
    fn test_rounding_half_up() {
        assert_eq!(round_money(dec(2.005)), dec(2.01));
        assert_eq!(round_money(dec(2.004)), dec(2.00));
    }

    #[test]
    fn test_empty_order_is_zero() {
        assert_eq!(order_total(std::iter::empty()), 0.0);
    }
}
