//! Money calculation utilities using rust_decimal for precision
//!
//! All arithmetic happens on `Decimal`; values are converted back to `f64`
//! (rounded to 2 dp, half away from zero) for storage and serialization.

use rust_decimal::prelude::*;
use serde::{Deserialize, Serialize};

/// Rounding precision for monetary values
const DECIMAL_PLACES: u32 = 2;

/// Convert f64 to Decimal for calculation
///
/// Non-finite input is logged and treated as zero.
#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_else(|| {
        tracing::error!(value = ?value, "Non-finite f64 in monetary calculation, defaulting to zero");
        Decimal::ZERO
    })
}

/// Round a Decimal to 2 decimal places
#[inline]
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Convert Decimal back to f64 for storage, rounded to 2 decimal places
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    round_money(value).to_f64().unwrap_or_default()
}

/// A priced order line (unit price already resolved)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricedLine {
    pub unit_price: Decimal,
    pub quantity: i32,
}

impl PricedLine {
    pub fn new(unit_price: f64, quantity: i32) -> Self {
        Self {
            unit_price: to_decimal(unit_price),
            quantity,
        }
    }

    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

/// Order totals, already rounded to 2 dp
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderTotals {
    pub subtotal: f64,
    pub tax: f64,
    pub total: f64,
}

/// Compute subtotal, tax and total.
///
/// `tax_rate` is a percentage (8.0 = 8 %). `total` is the sum of the rounded
/// subtotal and rounded tax so `total == subtotal + tax` holds exactly at 2 dp.
pub fn compute_totals(lines: &[PricedLine], tax_rate: f64) -> OrderTotals {
    let subtotal = round_money(lines.iter().map(PricedLine::line_total).sum());
    let tax = round_money(subtotal * to_decimal(tax_rate) / Decimal::ONE_HUNDRED);
    let total = subtotal + tax;
    OrderTotals {
        subtotal: to_f64(subtotal),
        tax: to_f64(tax),
        total: to_f64(total),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cart_example_at_eight_percent() {
        let lines = [PricedLine::new(6.50, 2), PricedLine::new(3.00, 1)];
        let totals = compute_totals(&lines, 8.0);
        assert_eq!(totals.subtotal, 16.00);
        assert_eq!(totals.tax, 1.28);
        assert_eq!(totals.total, 17.28);
    }

    #[test]
    fn test_zero_tax() {
        let lines = [PricedLine::new(4.25, 3)];
        let totals = compute_totals(&lines, 0.0);
        assert_eq!(totals.subtotal, 12.75);
        assert_eq!(totals.tax, 0.0);
        assert_eq!(totals.total, 12.75);
    }

    #[test]
    fn test_total_is_sum_of_rounded_parts() {
        // 3 x 3.33 = 9.99; 9.99 * 7.25% = 0.724275 -> 0.72
        let lines = [PricedLine::new(3.33, 3)];
        let totals = compute_totals(&lines, 7.25);
        assert_eq!(totals.subtotal, 9.99);
        assert_eq!(totals.tax, 0.72);
        assert_eq!(totals.total, 10.71);
        assert!((totals.total - (totals.subtotal + totals.tax)).abs() < 1e-9);
    }

    #[test]
    fn test_rounding_half_away_from_zero() {
        assert_eq!(to_f64(Decimal::new(1005, 3)), 1.01);
        assert_eq!(to_f64(Decimal::new(-1005, 3)), -1.01);
    }

    #[test]
    fn test_empty_lines() {
        let totals = compute_totals(&[], 8.0);
        assert_eq!(totals.subtotal, 0.0);
        assert_eq!(totals.total, 0.0);
    }

    #[test]
    fn test_non_finite_is_zero() {
        assert_eq!(to_decimal(f64::NAN), Decimal::ZERO);
    }
}
