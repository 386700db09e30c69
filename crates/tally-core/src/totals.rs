//! # Order Totals
//!
//! Accumulates line subtotals during a checkout and settles the discount.
//!
//! ## Reconciliation Rule
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  line.subtotal  = unit_price × quantity                                 │
//! │  gross          = Σ line.subtotal                                       │
//! │  discount       = clamp(requested, 0, gross)                            │
//! │  total_amount   = gross − discount          (never negative)            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The accumulator is fed from inside the checkout transaction, one line per
//! reserved item, so an overflow aborts the unit like any other rejection.

use crate::error::{CoreResult, ValidationError};
use crate::money::Money;

/// Final figures of a checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderTotals {
    /// Sum of all line subtotals.
    pub gross: Money,
    /// Discount actually applied, already clamped to `[0, gross]`.
    pub discount: Money,
    /// `gross - discount`.
    pub total: Money,
}

/// Running sum of line subtotals.
#[derive(Debug, Clone, Default)]
pub struct TotalsAccumulator {
    gross: Money,
    lines: usize,
}

impl TotalsAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a line and returns its subtotal.
    ///
    /// Fails with `OutOfRange` when the subtotal or the running total would
    /// overflow i64.
    pub fn add_line(&mut self, unit_price: Money, quantity: i64) -> CoreResult<Money> {
        let subtotal = unit_price
            .multiply_quantity(quantity)
            .ok_or_else(|| overflow("subtotal"))?;
        self.gross = self
            .gross
            .checked_add(subtotal)
            .ok_or_else(|| overflow("total_amount"))?;
        self.lines += 1;
        Ok(subtotal)
    }

    /// Number of lines added so far.
    pub fn line_count(&self) -> usize {
        self.lines
    }

    /// Gross amount so far.
    pub fn gross(&self) -> Money {
        self.gross
    }

    /// Clamps the requested discount and settles the final amount.
    pub fn finish(self, requested_discount: i64) -> OrderTotals {
        let discount = Money::from_minor(requested_discount).clamp_to(Money::zero(), self.gross);
        OrderTotals {
            gross: self.gross,
            discount,
            total: self.gross - discount,
        }
    }
}

fn overflow(field: &str) -> crate::error::CoreError {
    ValidationError::OutOfRange {
        field: field.to_string(),
        min: 0,
        max: i64::MAX,
    }
    .into()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;

    #[test]
    fn test_accumulates_lines() {
        let mut acc = TotalsAccumulator::new();
        assert_eq!(acc.add_line(Money::from_minor(3_000), 5).unwrap().minor(), 15_000);
        assert_eq!(acc.add_line(Money::from_minor(1_000), 2).unwrap().minor(), 2_000);
        assert_eq!(acc.line_count(), 2);
        assert_eq!(acc.gross().minor(), 17_000);

        let totals = acc.finish(2_000);
        assert_eq!(totals.gross.minor(), 17_000);
        assert_eq!(totals.discount.minor(), 2_000);
        assert_eq!(totals.total.minor(), 15_000);
    }

    #[test]
    fn test_negative_discount_becomes_zero() {
        let mut acc = TotalsAccumulator::new();
        acc.add_line(Money::from_minor(500), 1).unwrap();
        let totals = acc.finish(-300);
        assert_eq!(totals.discount.minor(), 0);
        assert_eq!(totals.total.minor(), 500);
    }

    #[test]
    fn test_oversized_discount_is_clamped_to_gross() {
        let mut acc = TotalsAccumulator::new();
        acc.add_line(Money::from_minor(500), 2).unwrap();
        let totals = acc.finish(5_000);
        assert_eq!(totals.discount.minor(), 1_000);
        assert!(totals.total.is_zero());
    }

    #[test]
    fn test_overflow_is_rejected() {
        let mut acc = TotalsAccumulator::new();
        let err = acc.add_line(Money::from_minor(i64::MAX), 2).unwrap_err();
        assert!(matches!(err, CoreError::Validation(ValidationError::OutOfRange { .. })));

        let mut acc = TotalsAccumulator::new();
        acc.add_line(Money::from_minor(i64::MAX), 1).unwrap();
        assert!(acc.add_line(Money::from_minor(1), 1).is_err());
    }
}
