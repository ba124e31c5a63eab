//! # roofquote-core: Pricing Engine for Roofing Proposals
//!
//! Turns a proposal's line items, labor and add-ons into a cost breakdown:
//! overhead, profit, a NET margin floor, discount and the final price.
//! Everything here is a pure function of its inputs.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        RoofQuote Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              Proposal editor / AI assistant tools               │   │
//! │  │    add line item ──► set pricing ──► view breakdown             │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               roofquote-proposal (commands, config)             │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ roofquote-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │ breakdown │  │  markup   │  │ validation│  │   │
//! │  │   │ LineItem  │  │  engine   │  │ per-line  │  │  bounds   │  │   │
//! │  │   │ Pricing.. │  │ Visible/  │  │ multiplier│  │ warnings  │  │   │
//! │  │   │           │  │ Hidden    │  │           │  │           │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO CLOCK • NO RANDOMNESS • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Line items, labor, add-ons, pricing parameters
//! - [`breakdown`] - The cost breakdown engine
//! - [`markup`] - Spreading markup across line items
//! - [`money`] - Cent rounding and the integer [`Money`] type
//! - [`lenient`] - Forgiving numeric deserialization
//! - [`error`] - Domain error types
//! - [`validation`] - Input bounds and line item warnings
//!
//! ## Design Principles
//!
//! 1. **Dollars as f64, rounded every step**: each intermediate amount is
//!    rounded to whole cents before the next step uses it
//! 2. **Never fails**: the engine coerces bad numbers to zero instead of
//!    erroring; validation is a separate, explicit layer
//! 3. **Margins can be hidden**: homeowner-facing breakdowns fold overhead
//!    and profit into the category totals
//!
//! ## Example Usage
//!
//! ```rust
//! use roofquote_core::{get_cost_breakdown, LaborItem, LineItem, PricingParameters};
//!
//! let materials = vec![LineItem::material("Shingles", 10.0, "sq", 100.0)];
//! let labor = vec![LaborItem::new("Tear-off and install", 10.0, 75.0)];
//!
//! let breakdown = get_cost_breakdown(&materials, &labor, &[], &PricingParameters::default());
//!
//! // 1750 + 15% overhead + 20% profit = 2415, above the 20% NET floor
//! assert_eq!(breakdown.final_total(), 2415.0);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod breakdown;
pub mod error;
pub mod lenient;
pub mod markup;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use breakdown::{get_cost_breakdown, BreakdownSummary, CostBreakdown, HiddenBreakdown, VisibleBreakdown};
pub use error::{CoreError, CoreResult, ValidationError};
pub use markup::{apply_markup_to_line_items, calculate_markup_multiplier};
pub use money::{round_cents, Money};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Default overhead markup, percent of subtotal.
pub const DEFAULT_OVERHEAD_PERCENT: f64 = 15.0;

/// Default profit markup, percent of subtotal.
pub const DEFAULT_PROFIT_PERCENT: f64 = 20.0;

/// Default real overhead cost, percent of subtotal.
///
/// Only used for the NET margin floor, never added to the price directly.
pub const DEFAULT_OVERHEAD_COST_PERCENT: f64 = 10.0;

/// Default minimum NET margin, percent of the final price.
pub const DEFAULT_NET_MARGIN_TARGET: f64 = 20.0;

/// How far a stored line total may drift from `quantity * unit_price`.
pub const CENT_TOLERANCE: f64 = 0.01;

/// Maximum length of a line item or add-on name.
pub const MAX_NAME_LENGTH: usize = 200;

/// Maximum length of a unit label ("sq", "bundle", "hr").
pub const MAX_UNIT_LENGTH: usize = 20;
