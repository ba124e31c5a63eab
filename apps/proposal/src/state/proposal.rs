//! # Proposal State
//!
//! A proposal being edited: its line items, add-ons and pricing.
//!
//! ## Editing Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Proposal Edits                                       │
//! │                                                                         │
//! │  Editor / Assistant        Proposal method          Effect              │
//! │  ──────────────────        ───────────────          ──────              │
//! │                                                                         │
//! │  New row ─────────────────► add_line_item() ──────► items.push(item)    │
//! │                                                                         │
//! │  Edit qty / price ────────► update_line_item() ───► total recomputed    │
//! │                                                                         │
//! │  Delete row ──────────────► remove_line_item() ───► items.remove(i)     │
//! │                                                                         │
//! │  Pricing panel ───────────► set_pricing() ────────► params replaced     │
//! │                                                                         │
//! │  Every edit ends in refresh_total(): the engine runs again and the      │
//! │  stored totalAmountCents follows finalTotal.                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Rows typed by a person and rows proposed by the assistant are stored
//! the same way; `origin` is informational only.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use roofquote_core::breakdown::compute_visible;
use roofquote_core::validation::{
    add_on_warnings, line_item_warnings, validate_item_name, validate_pricing_parameters, validate_unit, LineItemWarning,
};
use roofquote_core::{
    apply_markup_to_line_items, get_cost_breakdown, AddOn, CoreError, CoreResult, CostBreakdown, LaborItem,
    LineCategory, LineItem, Money, PricingParameters, ValidationError,
};

/// Who put a line item on the proposal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemOrigin {
    #[default]
    Manual,
    Assistant,
}

/// A line item as stored on a proposal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposalItem {
    #[serde(flatten)]
    pub item: LineItem,

    #[serde(default)]
    pub origin: ItemOrigin,
}

impl ProposalItem {
    /// The item's ID. Always set once the item is on a proposal.
    pub fn id(&self) -> &str {
        self.item.id.as_deref().unwrap_or_default()
    }
}

/// Partial update for a line item. `None` fields are left alone.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItemPatch {
    pub name: Option<String>,
    pub category: Option<LineCategory>,
    #[serde(default, deserialize_with = "roofquote_core::lenient::optional_number")]
    pub quantity: Option<f64>,
    pub unit: Option<String>,
    #[serde(default, deserialize_with = "roofquote_core::lenient::optional_number")]
    pub unit_price: Option<f64>,
}

/// Warnings for one line item, for display next to the row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemWarnings {
    pub item_id: String,
    pub name: String,
    pub warnings: Vec<LineItemWarning>,
}

/// A roofing proposal.
///
/// ## Invariants
/// - Every line item and add-on has a unique ID
/// - Every line item's `total` matches its quantity and unit price
/// - `total_amount_cents` is the engine's `finalTotal` after the last edit,
///   or `None` when that total is not finite
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Proposal {
    pub id: String,
    pub client_name: String,
    pub project_address: String,
    pub line_items: Vec<ProposalItem>,
    pub add_ons: Vec<AddOn>,
    pub pricing: PricingParameters,
    pub total_amount_cents: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Proposal {
    /// Creates an empty proposal.
    pub fn new(client_name: impl Into<String>, project_address: impl Into<String>, pricing: PricingParameters) -> Self {
        let now = Utc::now();
        Proposal {
            id: Uuid::new_v4().to_string(),
            client_name: client_name.into(),
            project_address: project_address.into(),
            line_items: Vec::new(),
            add_ons: Vec::new(),
            pricing,
            total_amount_cents: Some(0),
            created_at: now,
            updated_at: now,
        }
    }

    // =========================================================================
    // Line Items
    // =========================================================================

    /// Adds a line item and returns its new ID.
    ///
    /// Any ID or total on `item` is replaced: the proposal assigns the ID and
    /// derives the total from quantity and unit price.
    pub fn add_line_item(&mut self, mut item: LineItem, origin: ItemOrigin) -> CoreResult<String> {
        validate_line_item(&item)?;

        let id = Uuid::new_v4().to_string();
        item.id = Some(id.clone());
        item.name = item.name.trim().to_string();
        item.recompute_total();

        self.line_items.push(ProposalItem { item, origin });
        self.touch();
        Ok(id)
    }

    /// Applies a patch to a line item and recomputes its total.
    pub fn update_line_item(&mut self, item_id: &str, patch: LineItemPatch) -> CoreResult<()> {
        let entry = self
            .line_items
            .iter_mut()
            .find(|i| i.id() == item_id)
            .ok_or_else(|| CoreError::LineItemNotFound(item_id.to_string()))?;

        let mut item = entry.item.clone();
        if let Some(name) = patch.name {
            item.name = name.trim().to_string();
        }
        if let Some(category) = patch.category {
            item.category = category;
        }
        if let Some(quantity) = patch.quantity {
            item.quantity = quantity;
        }
        if let Some(unit) = patch.unit {
            item.unit = unit;
        }
        if let Some(unit_price) = patch.unit_price {
            item.unit_price = unit_price;
        }
        validate_line_item(&item)?;
        item.recompute_total();

        entry.item = item;
        self.touch();
        Ok(())
    }

    /// Removes a line item and returns it.
    pub fn remove_line_item(&mut self, item_id: &str) -> CoreResult<ProposalItem> {
        let index = self
            .line_items
            .iter()
            .position(|i| i.id() == item_id)
            .ok_or_else(|| CoreError::LineItemNotFound(item_id.to_string()))?;

        let removed = self.line_items.remove(index);
        self.touch();
        Ok(removed)
    }

    // =========================================================================
    // Add-Ons
    // =========================================================================

    /// Adds a flat-priced add-on and returns its new ID.
    pub fn add_add_on(&mut self, name: &str, price: f64) -> CoreResult<String> {
        validate_item_name(name)?;
        if !price.is_finite() {
            return Err(ValidationError::NotFinite {
                field: "price".to_string(),
            }
            .into());
        }

        let id = Uuid::new_v4().to_string();
        self.add_ons.push(AddOn {
            id: Some(id.clone()),
            name: name.trim().to_string(),
            price,
        });
        self.touch();
        Ok(id)
    }

    /// Removes an add-on and returns it.
    pub fn remove_add_on(&mut self, add_on_id: &str) -> CoreResult<AddOn> {
        let index = self
            .add_ons
            .iter()
            .position(|a| a.id.as_deref() == Some(add_on_id))
            .ok_or_else(|| CoreError::AddOnNotFound(add_on_id.to_string()))?;

        let removed = self.add_ons.remove(index);
        self.touch();
        Ok(removed)
    }

    // =========================================================================
    // Pricing
    // =========================================================================

    /// Replaces the pricing parameters. Rejected parameters leave the
    /// proposal unchanged.
    pub fn set_pricing(&mut self, pricing: PricingParameters) -> CoreResult<()> {
        validate_pricing_parameters(&pricing)?;
        self.pricing = pricing;
        self.touch();
        Ok(())
    }

    /// Splits the grid into the engine's material and labor inputs.
    ///
    /// Labor rows are read as hours × rate.
    pub fn engine_inputs(&self) -> (Vec<LineItem>, Vec<LaborItem>) {
        let materials = self
            .line_items
            .iter()
            .filter(|i| !i.item.is_labor())
            .map(|i| i.item.clone())
            .collect();
        let labor = self
            .line_items
            .iter()
            .filter(|i| i.item.is_labor())
            .map(|i| LaborItem::from(&i.item))
            .collect();
        (materials, labor)
    }

    /// Runs the breakdown engine on the current contents.
    pub fn breakdown(&self) -> CostBreakdown {
        let (materials, labor) = self.engine_inputs();
        get_cost_breakdown(&materials, &labor, &self.add_ons, &self.pricing)
    }

    /// Recomputes the breakdown and stores its final total.
    pub fn refresh_total(&mut self) -> CostBreakdown {
        let breakdown = self.breakdown();
        self.total_amount_cents = Money::from_dollars(breakdown.final_total()).map(|m| m.cents());
        breakdown
    }

    /// Line items followed by add-ons (as one-each `addon` rows), with every
    /// price scaled onto the pre-discount total, for documents that show
    /// prices with markup included.
    pub fn priced_line_items(&self) -> Vec<LineItem> {
        let (materials, labor) = self.engine_inputs();
        let visible = compute_visible(&materials, &labor, &self.add_ons, &self.pricing);
        let items: Vec<LineItem> = self
            .line_items
            .iter()
            .map(|i| i.item.clone())
            .chain(self.add_ons.iter().map(|a| {
                let mut row = LineItem::new(a.name.clone(), LineCategory::Addon, 1.0, "ea", a.price);
                row.id = a.id.clone();
                row
            }))
            .collect();
        apply_markup_to_line_items(&items, visible.markup_multiplier())
    }

    /// Warnings for every line item and add-on that has any.
    pub fn audit(&self) -> Vec<ItemWarnings> {
        let items = self
            .line_items
            .iter()
            .map(|entry| (entry.id(), &entry.item.name, line_item_warnings(&entry.item)));
        let add_ons = self
            .add_ons
            .iter()
            .map(|a| (a.id.as_deref().unwrap_or_default(), &a.name, add_on_warnings(a)));

        items
            .chain(add_ons)
            .filter(|(_, _, warnings)| !warnings.is_empty())
            .map(|(id, name, warnings)| ItemWarnings {
                item_id: id.to_string(),
                name: name.clone(),
                warnings,
            })
            .collect()
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
        self.refresh_total();
    }
}

fn validate_line_item(item: &LineItem) -> Result<(), ValidationError> {
    validate_item_name(&item.name)?;
    validate_unit(&item.unit)?;
    for (field, value) in [("quantity", item.quantity), ("unitPrice", item.unit_price)] {
        if !value.is_finite() {
            return Err(ValidationError::NotFinite {
                field: field.to_string(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use roofquote_core::validation::LineItemWarning;

    fn roof_job() -> Proposal {
        let mut proposal = Proposal::new("Dana Whitfield", "14 Larch Lane", PricingParameters::default());
        proposal
            .add_line_item(LineItem::material("Architectural shingles", 10.0, "sq", 100.0), ItemOrigin::Manual)
            .unwrap();
        proposal
            .add_line_item(LineItem::labor("Tear-off and install", 10.0, 75.0), ItemOrigin::Manual)
            .unwrap();
        proposal
    }

    #[test]
    fn test_new_proposal_is_empty() {
        let proposal = Proposal::new("Client", "Address", PricingParameters::default());
        assert!(proposal.line_items.is_empty());
        assert_eq!(proposal.total_amount_cents, Some(0));
        assert_eq!(proposal.breakdown().final_total(), 0.0);
    }

    #[test]
    fn test_total_follows_edits() {
        let mut proposal = roof_job();
        assert_eq!(proposal.total_amount_cents, Some(241_500));

        let shingles = proposal.line_items[0].id().to_string();
        proposal
            .update_line_item(
                &shingles,
                LineItemPatch {
                    quantity: Some(12.0),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(proposal.line_items[0].item.total, 1200.0);
        // subtotal 1950 → 1950 * 1.15 * 1.2 = 2691
        assert_eq!(proposal.total_amount_cents, Some(269_100));
    }

    #[test]
    fn test_add_line_item_replaces_id_and_total() {
        let mut proposal = Proposal::new("Client", "Address", PricingParameters::default());
        let mut item = LineItem::material("  Drip edge ", 10.0, "lf", 2.5);
        item.id = Some("from-client".to_string());
        item.total = 999.0;

        let id = proposal.add_line_item(item, ItemOrigin::Assistant).unwrap();
        let stored = &proposal.line_items[0];
        assert_eq!(stored.id(), id);
        assert_ne!(id, "from-client");
        assert_eq!(stored.item.total, 25.0);
        assert_eq!(stored.item.name, "Drip edge");
        assert_eq!(stored.origin, ItemOrigin::Assistant);
    }

    #[test]
    fn test_origin_does_not_change_price() {
        let mut manual = Proposal::new("Client", "Address", PricingParameters::default());
        let mut assisted = manual.clone();
        let item = LineItem::material("Ice and water shield", 3.0, "roll", 89.99);

        manual.add_line_item(item.clone(), ItemOrigin::Manual).unwrap();
        assisted.add_line_item(item, ItemOrigin::Assistant).unwrap();

        assert_eq!(manual.breakdown(), assisted.breakdown());
    }

    #[test]
    fn test_rejects_blank_name() {
        let mut proposal = Proposal::new("Client", "Address", PricingParameters::default());
        let err = proposal
            .add_line_item(LineItem::material("  ", 1.0, "ea", 10.0), ItemOrigin::Manual)
            .unwrap_err();
        assert!(matches!(err, CoreError::Validation(ValidationError::Required { .. })));
        assert!(proposal.line_items.is_empty());
    }

    #[test]
    fn test_rejected_patch_leaves_item() {
        let mut proposal = roof_job();
        let id = proposal.line_items[0].id().to_string();
        let before = proposal.line_items[0].clone();

        let result = proposal.update_line_item(
            &id,
            LineItemPatch {
                quantity: Some(20.0),
                unit_price: Some(f64::NAN),
                ..Default::default()
            },
        );
        assert!(result.is_err());
        assert_eq!(proposal.line_items[0], before);
    }

    #[test]
    fn test_remove_line_item() {
        let mut proposal = roof_job();
        let labor = proposal.line_items[1].id().to_string();

        let removed = proposal.remove_line_item(&labor).unwrap();
        assert_eq!(removed.item.name, "Tear-off and install");
        // 1000 * 1.15 * 1.2 = 1380
        assert_eq!(proposal.total_amount_cents, Some(138_000));

        assert!(matches!(
            proposal.remove_line_item(&labor),
            Err(CoreError::LineItemNotFound(_))
        ));
    }

    #[test]
    fn test_add_ons() {
        let mut proposal = roof_job();
        let id = proposal.add_add_on("Ridge vent upgrade", 250.0).unwrap();
        // subtotal 2000 → 2000 * 1.15 * 1.2 = 2760
        assert_eq!(proposal.total_amount_cents, Some(276_000));

        proposal.remove_add_on(&id).unwrap();
        assert_eq!(proposal.total_amount_cents, Some(241_500));
        assert!(matches!(proposal.remove_add_on(&id), Err(CoreError::AddOnNotFound(_))));
    }

    #[test]
    fn test_set_pricing_validates() {
        let mut proposal = roof_job();
        let before = proposal.pricing;

        let runaway = PricingParameters {
            net_margin_target: 100.0,
            ..PricingParameters::default()
        };
        assert!(proposal.set_pricing(runaway).is_err());
        assert_eq!(proposal.pricing, before);

        let floor = PricingParameters {
            overhead_percent: 10.0,
            profit_percent: 10.0,
            ..PricingParameters::default()
        };
        proposal.set_pricing(floor).unwrap();
        assert_eq!(proposal.total_amount_cents, Some(240_625));
    }

    #[test]
    fn test_hidden_breakdown() {
        let mut proposal = roof_job();
        proposal
            .set_pricing(PricingParameters {
                hide_margins: true,
                ..PricingParameters::default()
            })
            .unwrap();

        let breakdown = proposal.breakdown();
        let hidden = breakdown.hidden().unwrap();
        assert_eq!(hidden.final_total, 2415.0);
        assert_eq!(hidden.materials_total + hidden.labor_total, 2415.0);
    }

    #[test]
    fn test_labor_rows_use_hours_times_rate() {
        let mut proposal = roof_job();
        proposal.line_items[1].item.total = 5.0;
        let (materials, labor) = proposal.engine_inputs();
        assert_eq!(materials.len(), 1);
        assert_eq!(labor[0].amount(), 750.0);
    }

    #[test]
    fn test_priced_line_items_sum_to_quoted_total() {
        let mut proposal = roof_job();
        proposal
            .set_pricing(PricingParameters {
                overhead_percent: 0.0,
                profit_percent: 0.0,
                ..PricingParameters::default()
            })
            .unwrap();

        let sum: f64 = proposal.priced_line_items().iter().map(|i| i.total).sum();
        assert!((sum - 2406.25).abs() <= 0.02);
    }

    #[test]
    fn test_audit() {
        let mut proposal = roof_job();
        assert!(proposal.audit().is_empty());

        proposal
            .add_line_item(LineItem::material("Credit", 1.0, "ea", -50.0), ItemOrigin::Manual)
            .unwrap();
        let report = proposal.audit();
        assert_eq!(report.len(), 1);
        assert_eq!(report[0].name, "Credit");
        assert_eq!(
            report[0].warnings,
            vec![LineItemWarning::NegativeUnitPrice { unit_price: -50.0 }]
        );
    }

    #[test]
    fn test_priced_line_items_include_add_ons() {
        let mut proposal = Proposal::new("Client", "Address", PricingParameters::default());
        proposal
            .add_line_item(LineItem::material("Architectural shingles", 10.0, "sq", 100.0), ItemOrigin::Manual)
            .unwrap();
        let skylight = proposal.add_add_on("Skylight", 750.0).unwrap();

        let priced = proposal.priced_line_items();
        assert_eq!(priced.len(), 2);
        assert_eq!(priced[0].total, 1380.0);
        assert_eq!(priced[1].id.as_deref(), Some(skylight.as_str()));
        assert_eq!(priced[1].category, LineCategory::Addon);
        assert_eq!(priced[1].total, 1035.0);

        let sum: f64 = priced.iter().map(|i| i.total).sum();
        assert!((sum - proposal.breakdown().final_total()).abs() <= 0.02);
        assert!((sum - 2415.0).abs() <= 0.02);
    }

    #[test]
    fn test_audit_flags_negative_add_on() {
        let mut proposal = roof_job();
        let id = proposal.add_add_on("Courtesy credit", -100.0).unwrap();

        let report = proposal.audit();
        assert_eq!(report.len(), 1);
        assert_eq!(report[0].item_id, id);
        assert_eq!(report[0].name, "Courtesy credit");
        assert_eq!(
            report[0].warnings,
            vec![LineItemWarning::NegativeUnitPrice { unit_price: -100.0 }]
        );
    }

    #[test]
    fn test_patch_accepts_numeric_strings() {
        let patch: LineItemPatch = serde_json::from_str(r#"{"quantity":"12","unitPrice":"110.50"}"#).unwrap();
        assert_eq!(patch.quantity, Some(12.0));
        assert_eq!(patch.unit_price, Some(110.5));

        let patch: LineItemPatch = serde_json::from_str(r#"{"name":"Starter strip"}"#).unwrap();
        assert_eq!(patch.quantity, None);
        assert_eq!(patch.unit_price, None);
    }

    #[test]
    fn test_serialized_item_is_flat() {
        let proposal = roof_job();
        let json = serde_json::to_value(&proposal).unwrap();
        let first = &json["lineItems"][0];
        assert_eq!(first["name"], "Architectural shingles");
        assert_eq!(first["unitPrice"], 100.0);
        assert_eq!(first["origin"], "manual");
        assert_eq!(json["totalAmountCents"], 241_500);
    }
}
