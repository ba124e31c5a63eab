//! # Per-Line Markup
//!
//! Supports the "prices with margin baked in" toggle on the line-item grid:
//! instead of showing overhead and profit as separate rows, every unit price
//! is scaled by one multiplier.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  subtotal $1,750   overhead $262.50   profit $402.50                    │
//! │                                                                         │
//! │  multiplier = (1750 + 262.50 + 402.50) / 1750 = 1.38                    │
//! │                                                                         │
//! │  Shingles   $1,000.00  ──► $1,380.00                                    │
//! │  Labor        $750.00  ──► $1,035.00                                    │
//! │                            ─────────                                    │
//! │                            $2,415.00  = calculatedTotal                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Which Multiplier?
//! [`calculate_markup_multiplier`] only knows about overhead and profit
//! markup. When the NET margin floor lifts the quote above the markup total,
//! lines scaled with it sum to `calculatedTotal`, not the quoted price. Use
//! [`VisibleBreakdown::markup_multiplier`](crate::breakdown::VisibleBreakdown::markup_multiplier)
//! for lines that must agree with the quoted (pre-discount) total.

use crate::money::round_cents;
use crate::types::LineItem;

/// Ratio of marked-up total to subtotal.
///
/// Returns `1.0` for an empty subtotal.
///
/// ## Example
/// ```rust
/// use roofquote_core::markup::calculate_markup_multiplier;
///
/// assert_eq!(calculate_markup_multiplier(1750.0, 262.5, 402.5), 1.38);
/// assert_eq!(calculate_markup_multiplier(0.0, 10.0, 10.0), 1.0);
/// ```
pub fn calculate_markup_multiplier(subtotal: f64, overhead_amount: f64, profit_amount: f64) -> f64 {
    if subtotal == 0.0 {
        return 1.0;
    }
    (subtotal + overhead_amount + profit_amount) / subtotal
}

/// Returns copies of `items` with `unit_price` and `total` scaled by
/// `multiplier`, each rounded to cents.
///
/// Quantities, names and categories are untouched. The stored `total` is
/// scaled rather than recomputed so rows the caller has overridden keep
/// their proportions.
pub fn apply_markup_to_line_items(items: &[LineItem], multiplier: f64) -> Vec<LineItem> {
    items
        .iter()
        .map(|item| LineItem {
            unit_price: round_cents(item.unit_price * multiplier),
            total: round_cents(item.total * multiplier),
            ..item.clone()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::breakdown::get_cost_breakdown;
    use crate::types::{LaborItem, PricingParameters};

    fn grid() -> Vec<LineItem> {
        vec![
            LineItem::material("Shingles", 20.0, "sq", 30.0),
            LineItem::material("Underlayment", 4.0, "roll", 100.0),
            LineItem::labor("Install crew", 10.0, 75.0),
        ]
    }

    fn engine_inputs(items: &[LineItem]) -> (Vec<LineItem>, Vec<LaborItem>) {
        let materials = items.iter().filter(|i| !i.is_labor()).cloned().collect();
        let labor = items.iter().filter(|i| i.is_labor()).map(LaborItem::from).collect();
        (materials, labor)
    }

    #[test]
    fn test_multiplier() {
        assert_eq!(calculate_markup_multiplier(1000.0, 150.0, 230.0), 1.38);
        assert_eq!(calculate_markup_multiplier(0.0, 0.0, 0.0), 1.0);
    }

    #[test]
    fn test_apply_scales_price_and_total() {
        let marked = apply_markup_to_line_items(&grid(), 1.38);

        assert_eq!(marked[0].unit_price, 41.4);
        assert_eq!(marked[0].total, 828.0);
        assert_eq!(marked[0].quantity, 20.0);
        assert_eq!(marked[2].unit_price, 103.5);
        assert_eq!(marked[2].total, 1035.0);
        assert_eq!(marked[2].name, "Install crew");
    }

    #[test]
    fn test_apply_leaves_input_untouched() {
        let items = grid();
        let _ = apply_markup_to_line_items(&items, 2.0);
        assert_eq!(items, grid());
    }

    #[test]
    fn test_marked_lines_sum_to_calculated_total() {
        let items = grid();
        let (materials, labor) = engine_inputs(&items);
        let result = get_cost_breakdown(&materials, &labor, &[], &PricingParameters::default());
        let b = result.visible().unwrap();

        let multiplier = calculate_markup_multiplier(b.subtotal, b.overhead_amount, b.profit_amount);
        let sum: f64 = apply_markup_to_line_items(&items, multiplier)
            .iter()
            .map(|i| i.total)
            .sum();

        assert!((sum - b.calculated_total).abs() <= 0.01 * items.len() as f64);
    }

    #[test]
    fn test_floor_diverges_from_markup_multiplier() {
        let items = grid();
        let (materials, labor) = engine_inputs(&items);
        let params = PricingParameters {
            overhead_percent: 0.0,
            profit_percent: 0.0,
            ..PricingParameters::default()
        };
        let result = get_cost_breakdown(&materials, &labor, &[], &params);
        let b = result.visible().unwrap();
        assert!(b.margin_floor_applied());

        let markup_only: f64 = apply_markup_to_line_items(
            &items,
            calculate_markup_multiplier(b.subtotal, b.overhead_amount, b.profit_amount),
        )
        .iter()
        .map(|i| i.total)
        .sum();
        assert_eq!(markup_only, b.calculated_total);
        assert!(markup_only < b.final_total);

        let with_floor: f64 = apply_markup_to_line_items(&items, b.markup_multiplier())
            .iter()
            .map(|i| i.total)
            .sum();
        assert!((with_floor - b.final_total_before_discount).abs() <= 0.01 * items.len() as f64);
    }
}
