//! # Domain Types
//!
//! Value records the breakdown engine consumes. None of them are persisted
//! by this crate; callers build them fresh for every calculation.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    LineItem     │   │   LaborItem     │   │     AddOn       │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  name           │   │  name           │   │  name           │       │
//! │  │  category       │   │  hours          │   │  price          │       │
//! │  │  quantity, unit │   │  rate           │   │                 │       │
//! │  │  unitPrice      │   │  total?         │   │  (no quantity)  │       │
//! │  │  total (stored) │   │                 │   │                 │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌──────────────────────────────────────────────────────────────┐      │
//! │  │  PricingParameters                                           │      │
//! │  │  overhead% 15 · profit% 20 · overheadCost% 10 · NET 20%      │      │
//! │  │  discount $0 · hideMargins false      (whole-number percents)│      │
//! │  └──────────────────────────────────────────────────────────────┘      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Numeric fields deserialize through [`crate::lenient`], so a malformed
//! value becomes `0` instead of a parse error.

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::lenient;
use crate::money::round_cents;

// =============================================================================
// Line Category
// =============================================================================

/// What a line item prices.
///
/// Unrecognised category strings deserialize as [`LineCategory::Custom`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum LineCategory {
    /// Shingles, underlayment, flashing, fasteners...
    #[default]
    Material,
    /// Crew time.
    Labor,
    /// Optional extras (gutter guards, skylights).
    Addon,
    /// Anything else the contractor types in.
    #[serde(other)]
    Custom,
}

impl fmt::Display for LineCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LineCategory::Material => write!(f, "material"),
            LineCategory::Labor => write!(f, "labor"),
            LineCategory::Addon => write!(f, "addon"),
            LineCategory::Custom => write!(f, "custom"),
        }
    }
}

// =============================================================================
// Line Item
// =============================================================================

/// A priced row on a proposal.
///
/// ## The Stored Total
/// `total` is denormalized: it is whatever the caller saved last. For
/// material and labor rows it should equal `round_cents(quantity * unit_price)`;
/// for add-on rows it should equal the unit price. The engine sums the stored
/// value for materials, so callers are expected to keep it current (see
/// [`LineItem::computed_total`] and `validation::check_line_item_total`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    /// Caller-assigned identifier, if the row has been saved.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub category: LineCategory,

    #[serde(default, deserialize_with = "lenient::number")]
    pub quantity: f64,

    /// Unit label ("sq", "bundle", "hr", "lf").
    #[serde(default)]
    pub unit: String,

    #[serde(default, deserialize_with = "lenient::number")]
    pub unit_price: f64,

    #[serde(default, deserialize_with = "lenient::number")]
    pub total: f64,
}

impl LineItem {
    /// Creates a line item with its total computed from quantity and price.
    pub fn new(
        name: impl Into<String>,
        category: LineCategory,
        quantity: f64,
        unit: impl Into<String>,
        unit_price: f64,
    ) -> Self {
        let mut item = LineItem {
            id: None,
            name: name.into(),
            category,
            quantity,
            unit: unit.into(),
            unit_price,
            total: 0.0,
        };
        item.total = item.computed_total();
        item
    }

    /// Creates a material row.
    pub fn material(name: impl Into<String>, quantity: f64, unit: impl Into<String>, unit_price: f64) -> Self {
        LineItem::new(name, LineCategory::Material, quantity, unit, unit_price)
    }

    /// Creates a labor row (quantity in hours, unit price as hourly rate).
    pub fn labor(name: impl Into<String>, hours: f64, rate: f64) -> Self {
        LineItem::new(name, LineCategory::Labor, hours, "hr", rate)
    }

    /// What `total` should be, derived from the other fields.
    ///
    /// ## Example
    /// ```rust
    /// use roofquote_core::types::{LineCategory, LineItem};
    ///
    /// let shingles = LineItem::material("Architectural shingles", 32.0, "sq", 120.5);
    /// assert_eq!(shingles.computed_total(), 3856.0);
    ///
    /// let skylight = LineItem::new("Skylight", LineCategory::Addon, 3.0, "ea", 450.0);
    /// assert_eq!(skylight.computed_total(), 450.0);
    /// ```
    pub fn computed_total(&self) -> f64 {
        match self.category {
            LineCategory::Addon => round_cents(self.unit_price),
            _ => round_cents(self.quantity * self.unit_price),
        }
    }

    /// Overwrites the stored total with [`LineItem::computed_total`].
    pub fn recompute_total(&mut self) {
        self.total = self.computed_total();
    }

    #[inline]
    pub fn is_labor(&self) -> bool {
        self.category == LineCategory::Labor
    }
}

// =============================================================================
// Labor Item
// =============================================================================

/// A labor entry as the engine reads it.
///
/// Contributes `total` when one was supplied, otherwise `hours * rate`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LaborItem {
    #[serde(default)]
    pub name: String,

    #[serde(default, deserialize_with = "lenient::number")]
    pub hours: f64,

    #[serde(default, deserialize_with = "lenient::number")]
    pub rate: f64,

    /// Missing, `null` or non-numeric totals are treated as absent.
    #[serde(default, deserialize_with = "lenient::optional_number")]
    pub total: Option<f64>,
}

impl LaborItem {
    /// Creates a labor entry without a stored total.
    pub fn new(name: impl Into<String>, hours: f64, rate: f64) -> Self {
        LaborItem {
            name: name.into(),
            hours,
            rate,
            total: None,
        }
    }

    /// The amount this entry adds to the labor total.
    pub fn amount(&self) -> f64 {
        match self.total {
            Some(total) => total,
            None => self.hours * self.rate,
        }
    }
}

/// Labor rows from the proposal grid always recompute from hours and rate.
impl From<&LineItem> for LaborItem {
    fn from(item: &LineItem) -> Self {
        LaborItem::new(item.name.clone(), item.quantity, item.unit_price)
    }
}

// =============================================================================
// Add-On
// =============================================================================

/// An optional extra priced as a flat amount.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct AddOn {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default)]
    pub name: String,

    #[serde(default, deserialize_with = "lenient::number")]
    pub price: f64,
}

impl AddOn {
    pub fn new(name: impl Into<String>, price: f64) -> Self {
        AddOn {
            id: None,
            name: name.into(),
            price,
        }
    }
}

// =============================================================================
// Pricing Parameters
// =============================================================================

/// The percentages and discount applied on top of the line items.
///
/// Percentages are whole numbers (`15.0` means 15%) and are divided by 100
/// only at the point of use.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct PricingParameters {
    /// Markup covering general business overhead. Raises price, not cost.
    pub overhead_percent: f64,

    /// Markup applied on top of subtotal plus overhead markup.
    pub profit_percent: f64,

    /// Real operating costs (insurance, workers' comp, office). Counted as cost.
    pub overhead_cost_percent: f64,

    /// Minimum NET margin the final price must reach. Must be below 100.
    pub net_margin_target: f64,

    /// Flat dollar discount applied after the margin floor.
    pub discount_amount: f64,

    /// Fold markup into visible line prices for client-facing documents.
    pub hide_margins: bool,
}

impl Default for PricingParameters {
    fn default() -> Self {
        PricingParameters {
            overhead_percent: crate::DEFAULT_OVERHEAD_PERCENT,
            profit_percent: crate::DEFAULT_PROFIT_PERCENT,
            overhead_cost_percent: crate::DEFAULT_OVERHEAD_COST_PERCENT,
            net_margin_target: crate::DEFAULT_NET_MARGIN_TARGET,
            discount_amount: 0.0,
            hide_margins: false,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_line_item_new_computes_total() {
        let item = LineItem::material("Drip edge", 12.0, "pc", 8.333);
        assert_eq!(item.total, 100.0);
        assert_eq!(item.category, LineCategory::Material);
    }

    #[test]
    fn test_line_item_deserializes_leniently() {
        let item: LineItem = serde_json::from_value(json!({
            "name": "Ice & water shield",
            "category": "material",
            "quantity": "4 rolls",
            "unit": "roll",
            "unitPrice": null,
            "total": "abc"
        }))
        .unwrap();

        assert_eq!(item.quantity, 4.0);
        assert_eq!(item.unit_price, 0.0);
        assert_eq!(item.total, 0.0);
        assert_eq!(item.id, None);
    }

    #[test]
    fn test_line_item_missing_fields_default() {
        let item: LineItem = serde_json::from_value(json!({ "total": 1000 })).unwrap();
        assert_eq!(item.total, 1000.0);
        assert_eq!(item.category, LineCategory::Material);
        assert!(item.name.is_empty());
    }

    #[test]
    fn test_unknown_category_is_custom() {
        let item: LineItem =
            serde_json::from_value(json!({ "category": "dumpster", "total": 350 })).unwrap();
        assert_eq!(item.category, LineCategory::Custom);
    }

    #[test]
    fn test_line_item_serializes_camel_case() {
        let item = LineItem::labor("Tear-off crew", 10.0, 75.0);
        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(value["unitPrice"], json!(75.0));
        assert_eq!(value["category"], json!("labor"));
        assert!(value.get("id").is_none());
    }

    #[test]
    fn test_labor_amount_prefers_total() {
        let mut labor = LaborItem::new("Install", 10.0, 75.0);
        assert_eq!(labor.amount(), 750.0);

        labor.total = Some(800.0);
        assert_eq!(labor.amount(), 800.0);
    }

    #[test]
    fn test_labor_non_numeric_total_is_absent() {
        let labor: LaborItem =
            serde_json::from_value(json!({ "hours": "10", "rate": 75, "total": "n/a" })).unwrap();
        assert_eq!(labor.total, None);
        assert_eq!(labor.amount(), 750.0);
    }

    #[test]
    fn test_labor_from_line_item_ignores_stored_total() {
        let mut row = LineItem::labor("Install", 8.0, 60.0);
        row.total = 9999.0;
        let labor = LaborItem::from(&row);
        assert_eq!(labor.amount(), 480.0);
    }

    #[test]
    fn test_add_on_price_coercion() {
        let add_on: AddOn = serde_json::from_value(json!({ "name": "Gutter guard", "price": "249.99" })).unwrap();
        assert_eq!(add_on.price, 249.99);

        let add_on: AddOn = serde_json::from_value(json!({ "name": "Mystery" })).unwrap();
        assert_eq!(add_on.price, 0.0);
    }

    #[test]
    fn test_pricing_defaults() {
        let params = PricingParameters::default();
        assert_eq!(params.overhead_percent, 15.0);
        assert_eq!(params.profit_percent, 20.0);
        assert_eq!(params.overhead_cost_percent, 10.0);
        assert_eq!(params.net_margin_target, 20.0);
        assert_eq!(params.discount_amount, 0.0);
        assert!(!params.hide_margins);
    }

    #[test]
    fn test_pricing_partial_json_uses_defaults() {
        let params: PricingParameters =
            serde_json::from_value(json!({ "profitPercent": 25, "hideMargins": true })).unwrap();
        assert_eq!(params.profit_percent, 25.0);
        assert_eq!(params.overhead_percent, 15.0);
        assert!(params.hide_margins);
    }
}
