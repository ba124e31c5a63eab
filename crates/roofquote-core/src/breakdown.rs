//! # Cost Breakdown Engine
//!
//! Turns line items and pricing parameters into a priced quote.
//!
//! ## Calculation Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     get_cost_breakdown()                                │
//! │                                                                         │
//! │  materials ─┐                                                           │
//! │  labor ─────┼──► subtotal ──┬──► + overheadCosts ──────► totalCost      │
//! │  add-ons ───┘               │         (real cost)           │           │
//! │                             │                               ▼           │
//! │                             │                  targetTotal =            │
//! │                             │                  totalCost / (1 - NET%)   │
//! │                             │                               │           │
//! │                             └──► + overhead markup          │           │
//! │                                  + profit markup            │           │
//! │                                  = calculatedTotal          │           │
//! │                                         │                   │           │
//! │                                         ▼                   ▼           │
//! │                              max(calculatedTotal, targetTotal)          │
//! │                                         │   (margin floor)              │
//! │                                         ▼                               │
//! │                              - discount, floor at 0                     │
//! │                                         │                               │
//! │                                         ▼                               │
//! │                                    finalTotal                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every monetary intermediate is rounded to cents as soon as it is
//! computed, so float drift never compounds across steps.
//!
//! ## Two Outputs
//! - [`CostBreakdown::Visible`]: the contractor's view, every figure shown.
//! - [`CostBreakdown::Hidden`]: the client's view, markup folded into the
//!   category totals. Overhead, profit and true cost are not present at all,
//!   so they cannot be read back (or misread as zero).
//!
//! ## Example
//! ```rust
//! use roofquote_core::breakdown::get_cost_breakdown;
//! use roofquote_core::types::{LaborItem, LineItem, PricingParameters};
//!
//! let materials = vec![LineItem::material("Shingles", 10.0, "sq", 100.0)];
//! let labor = vec![LaborItem::new("Install crew", 10.0, 75.0)];
//!
//! let breakdown = get_cost_breakdown(&materials, &labor, &[], &PricingParameters::default());
//!
//! assert_eq!(breakdown.final_total(), 2415.0);
//! assert!(!breakdown.is_margin_hidden());
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::round_cents;
use crate::types::{AddOn, LaborItem, LineItem, PricingParameters};

// =============================================================================
// Output Types
// =============================================================================

/// The full contractor-facing breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct VisibleBreakdown {
    pub materials_total: f64,
    pub labor_total: f64,
    pub add_ons_total: f64,
    pub subtotal: f64,

    pub overhead_percent: f64,
    /// Overhead markup (price, not cost).
    pub overhead_amount: f64,
    pub overhead_cost_percent: f64,
    /// Operating costs (insurance, workers' comp, office).
    pub overhead_costs: f64,
    pub subtotal_with_overhead: f64,
    pub profit_percent: f64,
    pub profit_amount: f64,

    /// `subtotal + overheadCosts`: the baseline NET margin is measured against.
    pub total_cost: f64,
    /// Total from markup alone.
    pub calculated_total: f64,
    /// Total at which NET margin equals the target exactly.
    pub target_total: f64,
    pub final_total_before_discount: f64,

    pub net_margin_target: f64,
    /// Percentage, not rounded.
    pub net_margin_actual: f64,
    pub discount_amount: f64,
    pub final_total: f64,
}

impl VisibleBreakdown {
    /// Whether the NET margin floor raised the total above the markup total.
    pub fn margin_floor_applied(&self) -> bool {
        self.target_total > self.calculated_total
    }

    /// Everything the client pays above the line-item subtotal, before discount.
    pub fn margin_total(&self) -> f64 {
        round_cents(self.final_total_before_discount - self.subtotal)
    }

    /// Multiplier that scales every line item onto the pre-discount total.
    ///
    /// Unlike [`crate::markup::calculate_markup_multiplier`], this includes
    /// any uplift from the margin floor, so per-line prices always agree with
    /// the hidden-margin totals.
    pub fn markup_multiplier(&self) -> f64 {
        if self.subtotal == 0.0 {
            1.0
        } else {
            self.final_total_before_discount / self.subtotal
        }
    }
}

/// The client-facing breakdown with markup folded into category totals.
///
/// `subtotal` equals `final_total`; the pre-markup subtotal is not exposed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct HiddenBreakdown {
    /// Materials with their share of the margin.
    pub materials_total: f64,
    /// Labor with its share of the margin.
    pub labor_total: f64,
    /// Add-ons with their share of the margin.
    pub add_ons_total: f64,
    pub subtotal: f64,
    pub discount_amount: f64,
    pub final_total: f64,
}

/// Result of a breakdown calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "mode", rename_all = "camelCase")]
pub enum CostBreakdown {
    Visible(VisibleBreakdown),
    Hidden(HiddenBreakdown),
}

impl CostBreakdown {
    pub fn final_total(&self) -> f64 {
        match self {
            CostBreakdown::Visible(b) => b.final_total,
            CostBreakdown::Hidden(b) => b.final_total,
        }
    }

    pub fn discount_amount(&self) -> f64 {
        match self {
            CostBreakdown::Visible(b) => b.discount_amount,
            CostBreakdown::Hidden(b) => b.discount_amount,
        }
    }

    pub fn is_margin_hidden(&self) -> bool {
        matches!(self, CostBreakdown::Hidden(_))
    }

    /// The contractor view, if this breakdown was computed with margins shown.
    pub fn visible(&self) -> Option<&VisibleBreakdown> {
        match self {
            CostBreakdown::Visible(b) => Some(b),
            CostBreakdown::Hidden(_) => None,
        }
    }

    /// The client view, if this breakdown was computed with margins hidden.
    pub fn hidden(&self) -> Option<&HiddenBreakdown> {
        match self {
            CostBreakdown::Visible(_) => None,
            CostBreakdown::Hidden(b) => Some(b),
        }
    }

    /// Flattens into the single-object shape older consumers expect.
    pub fn summary(&self) -> BreakdownSummary {
        BreakdownSummary::from(self)
    }
}

// =============================================================================
// Flat Summary
// =============================================================================

/// Single-object breakdown shape used by the preview panel and PDF export.
///
/// In hidden mode the margin fields are zeroed, `subtotal` is the final
/// total and `is_margin_hidden` is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct BreakdownSummary {
    pub materials_total: f64,
    pub labor_total: f64,
    pub add_ons_total: f64,
    pub subtotal: f64,
    pub overhead_percent: f64,
    pub overhead_amount: f64,
    pub overhead_cost_percent: f64,
    pub overhead_costs: f64,
    pub profit_percent: f64,
    pub profit_amount: f64,
    pub total_cost: f64,
    pub net_margin_target: f64,
    pub net_margin_actual: f64,
    pub discount_amount: f64,
    pub final_total: f64,
    pub is_margin_hidden: bool,
}

impl From<&CostBreakdown> for BreakdownSummary {
    fn from(breakdown: &CostBreakdown) -> Self {
        match breakdown {
            CostBreakdown::Visible(b) => BreakdownSummary {
                materials_total: b.materials_total,
                labor_total: b.labor_total,
                add_ons_total: b.add_ons_total,
                subtotal: b.subtotal,
                overhead_percent: b.overhead_percent,
                overhead_amount: b.overhead_amount,
                overhead_cost_percent: b.overhead_cost_percent,
                overhead_costs: b.overhead_costs,
                profit_percent: b.profit_percent,
                profit_amount: b.profit_amount,
                total_cost: b.total_cost,
                net_margin_target: b.net_margin_target,
                net_margin_actual: b.net_margin_actual,
                discount_amount: b.discount_amount,
                final_total: b.final_total,
                is_margin_hidden: false,
            },
            CostBreakdown::Hidden(b) => BreakdownSummary {
                materials_total: b.materials_total,
                labor_total: b.labor_total,
                add_ons_total: b.add_ons_total,
                subtotal: b.subtotal,
                overhead_percent: 0.0,
                overhead_amount: 0.0,
                overhead_cost_percent: 0.0,
                overhead_costs: 0.0,
                profit_percent: 0.0,
                profit_amount: 0.0,
                total_cost: 0.0,
                net_margin_target: 0.0,
                net_margin_actual: 0.0,
                discount_amount: b.discount_amount,
                final_total: b.final_total,
                is_margin_hidden: true,
            },
        }
    }
}

// =============================================================================
// Engine
// =============================================================================

/// Computes the cost breakdown for a quote.
///
/// ## Inputs
/// - `materials`: rows tagged [`LineCategory::Labor`](crate::types::LineCategory)
///   are skipped; labor comes only from `labor`.
/// - `labor`: each entry contributes its `total`, or `hours * rate`.
/// - `add_ons`: each contributes its `price`.
/// - `params`: whole-number percentages, flat discount, display mode.
///
/// ## Domain
/// The engine does not validate its inputs. A `net_margin_target` of 100 or
/// more makes `target_total` infinite or negative; negative discounts and
/// prices are summed as-is. Run `validation::validate_pricing_parameters`
/// at the input boundary.
pub fn get_cost_breakdown(
    materials: &[LineItem],
    labor: &[LaborItem],
    add_ons: &[AddOn],
    params: &PricingParameters,
) -> CostBreakdown {
    let visible = compute_visible(materials, labor, add_ons, params);

    if params.hide_margins {
        CostBreakdown::Hidden(fold_margins(&visible))
    } else {
        CostBreakdown::Visible(visible)
    }
}

/// Computes the full breakdown regardless of `params.hide_margins`.
pub fn compute_visible(
    materials: &[LineItem],
    labor: &[LaborItem],
    add_ons: &[AddOn],
    params: &PricingParameters,
) -> VisibleBreakdown {
    let materials_total = round_cents(
        materials
            .iter()
            .filter(|item| !item.is_labor())
            .map(|item| item.total)
            .sum(),
    );
    let labor_total = round_cents(labor.iter().map(LaborItem::amount).sum());
    let add_ons_total = round_cents(add_ons.iter().map(|a| a.price).sum());
    let subtotal = round_cents(materials_total + labor_total + add_ons_total);

    let overhead_costs = round_cents(subtotal * params.overhead_cost_percent / 100.0);
    let overhead_amount = round_cents(subtotal * params.overhead_percent / 100.0);
    let subtotal_with_overhead = round_cents(subtotal + overhead_amount);
    let profit_amount = round_cents(subtotal_with_overhead * params.profit_percent / 100.0);

    let total_cost = round_cents(subtotal + overhead_costs);
    let calculated_total = round_cents(subtotal_with_overhead + profit_amount);
    let target_total = round_cents(total_cost / (1.0 - params.net_margin_target / 100.0));

    // NaN from an unguarded 100% target with zero cost is ignored by f64::max.
    let final_total_before_discount = calculated_total.max(target_total);
    let final_total = round_cents(final_total_before_discount - params.discount_amount).max(0.0);

    let net_margin_actual = if final_total == 0.0 {
        0.0
    } else {
        (final_total - total_cost) / final_total * 100.0
    };

    VisibleBreakdown {
        materials_total,
        labor_total,
        add_ons_total,
        subtotal,
        overhead_percent: params.overhead_percent,
        overhead_amount,
        overhead_cost_percent: params.overhead_cost_percent,
        overhead_costs,
        subtotal_with_overhead,
        profit_percent: params.profit_percent,
        profit_amount,
        total_cost,
        calculated_total,
        target_total,
        final_total_before_discount,
        net_margin_target: params.net_margin_target,
        net_margin_actual,
        discount_amount: params.discount_amount,
        final_total,
    }
}

/// Spreads the margin over the category totals by their share of subtotal.
///
/// The margin is everything between the subtotal and the pre-discount total,
/// so it includes any uplift from the NET margin floor. Each share is rounded
/// to cents; the leftover cent (at most one per category) goes to the largest
/// category so the folded totals add back up to `final_total + discount`.
fn fold_margins(visible: &VisibleBreakdown) -> HiddenBreakdown {
    let margin_total = visible.margin_total();
    let totals = [
        visible.materials_total,
        visible.labor_total,
        visible.add_ons_total,
    ];

    let mut folded = totals;
    if visible.subtotal != 0.0 {
        for (share, total) in folded.iter_mut().zip(totals) {
            *share = round_cents(total + margin_total * (total / visible.subtotal));
        }

        let residue = round_cents(visible.final_total_before_discount - folded.iter().sum::<f64>());
        if residue.is_finite() && residue != 0.0 {
            let largest = (0..totals.len())
                .fold(0, |best, i| if totals[i] > totals[best] { i } else { best });
            folded[largest] = round_cents(folded[largest] + residue);
        }
    }

    let [materials_total, labor_total, add_ons_total] = folded;
    HiddenBreakdown {
        materials_total,
        labor_total,
        add_ons_total,
        subtotal: visible.final_total,
        discount_amount: visible.discount_amount,
        final_total: visible.final_total,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
