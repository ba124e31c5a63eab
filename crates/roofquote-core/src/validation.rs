//! # Validation Module
//!
//! Input checks callers run before handing data to the breakdown engine.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Proposal form / assistant tool call                          │
//! │  ├── Field presence, lengths                                           │
//! │  └── BLOCKING: validate_* → Err(ValidationError)                       │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Line item audit                                              │
//! │  ├── quantity ≤ 0, unit price < 0, stale stored total                  │
//! │  └── NON-BLOCKING: line_item_warnings → shown next to the row          │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: get_cost_breakdown                                           │
//! │  └── Never fails; trusts layers 1 and 2 for the domain                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use roofquote_core::types::PricingParameters;
//! use roofquote_core::validation::validate_pricing_parameters;
//!
//! assert!(validate_pricing_parameters(&PricingParameters::default()).is_ok());
//!
//! let runaway = PricingParameters { net_margin_target: 100.0, ..Default::default() };
//! assert!(validate_pricing_parameters(&runaway).is_err());
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::types::{AddOn, LineItem, PricingParameters};
use crate::{CENT_TOLERANCE, MAX_NAME_LENGTH, MAX_UNIT_LENGTH};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Pricing Validators
// =============================================================================

/// Validates a whole-number percentage in `[0, 100]`.
pub fn validate_percent(field: &str, value: f64) -> ValidationResult<()> {
    if !value.is_finite() {
        return Err(ValidationError::NotFinite {
            field: field.to_string(),
        });
    }

    if !(0.0..=100.0).contains(&value) {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0.0,
            max: 100.0,
            max_exclusive: false,
        });
    }

    Ok(())
}

/// Validates a NET margin target in `[0, 100)`.
///
/// A target of 100% has no finite solution (`cost / 0`).
pub fn validate_net_margin_target(value: f64) -> ValidationResult<()> {
    let field = "netMarginTarget";
    if !value.is_finite() {
        return Err(ValidationError::NotFinite {
            field: field.to_string(),
        });
    }

    if !(0.0..100.0).contains(&value) {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0.0,
            max: 100.0,
            max_exclusive: true,
        });
    }

    Ok(())
}

/// Validates a flat discount. Zero is allowed.
pub fn validate_discount_amount(value: f64) -> ValidationResult<()> {
    let field = "discountAmount";
    if !value.is_finite() {
        return Err(ValidationError::NotFinite {
            field: field.to_string(),
        });
    }

    if value < 0.0 {
        return Err(ValidationError::MustBeNonNegative {
            field: field.to_string(),
        });
    }

    Ok(())
}

/// Validates every pricing parameter, reporting the first failure.
pub fn validate_pricing_parameters(params: &PricingParameters) -> ValidationResult<()> {
    validate_percent("overheadPercent", params.overhead_percent)?;
    validate_percent("profitPercent", params.profit_percent)?;
    validate_percent("overheadCostPercent", params.overhead_cost_percent)?;
    validate_net_margin_target(params.net_margin_target)?;
    validate_discount_amount(params.discount_amount)?;
    Ok(())
}

// =============================================================================
// Line Item Validators
// =============================================================================

/// Validates a line item or add-on name.
///
/// ## Rules
/// - Must not be blank
/// - At most 200 characters
pub fn validate_item_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: MAX_NAME_LENGTH,
        });
    }

    Ok(())
}

/// Validates a unit label. Empty is allowed ("each" is implied).
pub fn validate_unit(unit: &str) -> ValidationResult<()> {
    if unit.trim().chars().count() > MAX_UNIT_LENGTH {
        return Err(ValidationError::TooLong {
            field: "unit".to_string(),
            max: MAX_UNIT_LENGTH,
        });
    }

    Ok(())
}

/// Outcome of comparing a stored total against its inputs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum TotalCheck {
    Valid,
    Inconsistent { expected: f64, actual: f64 },
}

impl TotalCheck {
    pub fn is_valid(&self) -> bool {
        matches!(self, TotalCheck::Valid)
    }
}

/// Compares a line item's stored `total` with `quantity * unit_price`
/// (or the unit price for add-on rows), allowing one cent of drift.
///
/// The item is not modified.
///
/// ## Example
/// ```rust
/// use roofquote_core::types::LineItem;
/// use roofquote_core::validation::{check_line_item_total, TotalCheck};
///
/// let mut item = LineItem::material("Shingles", 10.0, "sq", 100.0);
/// assert_eq!(check_line_item_total(&item), TotalCheck::Valid);
///
/// item.quantity = 12.0;
/// assert_eq!(
///     check_line_item_total(&item),
///     TotalCheck::Inconsistent { expected: 1200.0, actual: 1000.0 }
/// );
/// ```
pub fn check_line_item_total(item: &LineItem) -> TotalCheck {
    let expected = item.computed_total();
    if (expected - item.total).abs() <= CENT_TOLERANCE {
        TotalCheck::Valid
    } else {
        TotalCheck::Inconsistent {
            expected,
            actual: item.total,
        }
    }
}

/// A problem worth showing next to a line item. Never blocks calculation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum LineItemWarning {
    /// Quantity is zero or negative.
    NonPositiveQuantity { quantity: f64 },
    /// Unit price is negative.
    NegativeUnitPrice { unit_price: f64 },
    /// Stored total disagrees with quantity × unit price.
    InconsistentTotal { expected: f64, actual: f64 },
}

/// Collects the warnings for one line item.
///
/// Add-on rows are priced flat, so their quantity is not checked.
pub fn line_item_warnings(item: &LineItem) -> Vec<LineItemWarning> {
    let mut warnings = Vec::new();

    if item.category != crate::types::LineCategory::Addon && item.quantity <= 0.0 {
        warnings.push(LineItemWarning::NonPositiveQuantity {
            quantity: item.quantity,
        });
    }

    if item.unit_price < 0.0 {
        warnings.push(LineItemWarning::NegativeUnitPrice {
            unit_price: item.unit_price,
        });
    }

    if let TotalCheck::Inconsistent { expected, actual } = check_line_item_total(item) {
        warnings.push(LineItemWarning::InconsistentTotal { expected, actual });
    }

    warnings
}

/// Collects the warnings for one add-on. Only the price is checked.
pub fn add_on_warnings(add_on: &AddOn) -> Vec<LineItemWarning> {
    if add_on.price < 0.0 {
        vec![LineItemWarning::NegativeUnitPrice {
            unit_price: add_on.price,
        }]
    } else {
        Vec::new()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::LineCategory;

    #[test]
    fn test_validate_percent() {
        assert!(validate_percent("overheadPercent", 0.0).is_ok());
        assert!(validate_percent("overheadPercent", 15.0).is_ok());
        assert!(validate_percent("overheadPercent", 100.0).is_ok());

        assert!(validate_percent("overheadPercent", -0.5).is_err());
        assert!(validate_percent("overheadPercent", 100.01).is_err());
        assert!(matches!(
            validate_percent("overheadPercent", f64::NAN),
            Err(ValidationError::NotFinite { .. })
        ));
    }

    #[test]
    fn test_validate_net_margin_target() {
        assert!(validate_net_margin_target(0.0).is_ok());
        assert!(validate_net_margin_target(99.99).is_ok());
        assert!(validate_net_margin_target(100.0).is_err());
        assert!(validate_net_margin_target(-1.0).is_err());
        assert!(validate_net_margin_target(f64::INFINITY).is_err());
    }

    #[test]
    fn test_validate_discount_amount() {
        assert!(validate_discount_amount(0.0).is_ok());
        assert!(validate_discount_amount(250.0).is_ok());
        assert_eq!(
            validate_discount_amount(-1.0),
            Err(ValidationError::MustBeNonNegative {
                field: "discountAmount".to_string()
            })
        );
    }

    #[test]
    fn test_validate_pricing_parameters_reports_field() {
        assert!(validate_pricing_parameters(&PricingParameters::default()).is_ok());

        let params = PricingParameters {
            profit_percent: 120.0,
            ..PricingParameters::default()
        };
        let err = validate_pricing_parameters(&params).unwrap_err();
        assert!(err.to_string().starts_with("profitPercent"));
    }

    #[test]
    fn test_validate_item_name() {
        assert!(validate_item_name("Architectural shingles").is_ok());
        assert!(validate_item_name("").is_err());
        assert!(validate_item_name("   ").is_err());
        assert!(validate_item_name(&"A".repeat(201)).is_err());
    }

    #[test]
    fn test_validate_unit() {
        assert!(validate_unit("").is_ok());
        assert!(validate_unit("sq").is_ok());
        assert!(validate_unit(&"x".repeat(21)).is_err());
    }

    #[test]
    fn test_check_line_item_total_tolerates_a_cent() {
        let mut item = LineItem::material("Flashing", 3.0, "pc", 3.333);
        assert_eq!(item.total, 10.0);
        item.total = 10.01;
        assert!(check_line_item_total(&item).is_valid());
        item.total = 10.02;
        assert!(!check_line_item_total(&item).is_valid());
    }

    #[test]
    fn test_check_add_on_row_uses_price() {
        let mut item = LineItem::new("Skylight", LineCategory::Addon, 0.0, "ea", 450.0);
        assert_eq!(check_line_item_total(&item), TotalCheck::Valid);
        item.total = 900.0;
        assert_eq!(
            check_line_item_total(&item),
            TotalCheck::Inconsistent {
                expected: 450.0,
                actual: 900.0
            }
        );
    }

    #[test]
    fn test_line_item_warnings() {
        let clean = LineItem::material("Shingles", 10.0, "sq", 100.0);
        assert!(line_item_warnings(&clean).is_empty());

        let mut bad = LineItem::material("Credit", 0.0, "ea", -50.0);
        bad.total = 25.0;
        let warnings = line_item_warnings(&bad);
        assert_eq!(
            warnings,
            vec![
                LineItemWarning::NonPositiveQuantity { quantity: 0.0 },
                LineItemWarning::NegativeUnitPrice { unit_price: -50.0 },
                LineItemWarning::InconsistentTotal {
                    expected: 0.0,
                    actual: 25.0
                },
            ]
        );
    }

    #[test]
    fn test_warning_serialization() {
        let value = serde_json::to_value(LineItemWarning::NegativeUnitPrice { unit_price: -1.0 }).unwrap();
        assert_eq!(value["kind"], "negativeUnitPrice");

        let value = serde_json::to_value(TotalCheck::Valid).unwrap();
        assert_eq!(value["status"], "valid");
    }

    #[test]
    fn test_add_on_warnings() {
        assert!(add_on_warnings(&AddOn::new("Skylight", 450.0)).is_empty());
        assert!(add_on_warnings(&AddOn::new("Courtesy credit", 0.0)).is_empty());
        assert_eq!(
            add_on_warnings(&AddOn::new("Courtesy credit", -100.0)),
            vec![LineItemWarning::NegativeUnitPrice { unit_price: -100.0 }]
        );
    }
}
