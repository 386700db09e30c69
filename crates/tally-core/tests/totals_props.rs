//! Property-based tests for order totals.
//!
//! These tests use proptest to check the reconciliation rule across
//! randomly generated baskets and discounts.

use proptest::prelude::*;

use tally_core::money::Money;
use tally_core::totals::TotalsAccumulator;

/// Strategy for one basket line: (unit price, quantity).
fn basket_line() -> impl Strategy<Value = (i64, i64)> {
    (0i64..1_000_000, 1i64..1_000)
}

fn basket() -> impl Strategy<Value = Vec<(i64, i64)>> {
    prop::collection::vec(basket_line(), 1..20)
}

proptest! {
    #[test]
    fn total_reconciles_with_lines(lines in basket(), requested in any::<i64>()) {
        let mut acc = TotalsAccumulator::new();
        let mut subtotals = Vec::new();
        for (price, qty) in &lines {
            subtotals.push(acc.add_line(Money::from_minor(*price), *qty).unwrap().minor());
        }

        let totals = acc.finish(requested);
        let gross: i64 = subtotals.iter().sum();

        prop_assert_eq!(totals.gross.minor(), gross);
        prop_assert!(totals.discount.minor() >= 0);
        prop_assert!(totals.discount.minor() <= gross);
        prop_assert_eq!(totals.total.minor(), gross - totals.discount.minor());
        prop_assert!(!totals.total.is_negative());
    }

    #[test]
    fn subtotal_is_price_times_quantity((price, qty) in basket_line()) {
        let mut acc = TotalsAccumulator::new();
        let subtotal = acc.add_line(Money::from_minor(price), qty).unwrap();
        prop_assert_eq!(subtotal.minor(), price * qty);
    }

    #[test]
    fn in_range_discount_is_kept(lines in basket(), pct in 0i64..=100) {
        let mut acc = TotalsAccumulator::new();
        for (price, qty) in &lines {
            acc.add_line(Money::from_minor(*price), *qty).unwrap();
        }
        let requested = acc.gross().minor() * pct / 100;

        let totals = acc.finish(requested);
        prop_assert_eq!(totals.discount.minor(), requested);
    }

    #[test]
    fn overflowing_line_is_an_error(qty in 2i64..1_000) {
        let mut acc = TotalsAccumulator::new();
        prop_assert!(acc.add_line(Money::from_minor(i64::MAX), qty).is_err());
        prop_assert_eq!(acc.line_count(), 0);
    }
}
