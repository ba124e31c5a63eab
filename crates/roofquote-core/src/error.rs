//! # Error Types
//!
//! Domain-specific error types for roofquote-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  roofquote-core errors (this file)                                     │
//! │  ├── CoreError        - Proposal editing failures                      │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  proposal app errors (separate crate)                                  │
//! │  ├── ConfigError      - quote.toml / environment problems              │
//! │  └── ApiError         - What the UI sees (serialized)                  │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ApiError → UI                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Note
//! The breakdown engine itself never returns an error: malformed numbers
//! are coerced to zero and out-of-domain percentages flow through. These
//! types are for the validators callers run *before* the engine.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Errors raised while editing a proposal's line items.
#[derive(Debug, Error)]
pub enum CoreError {
    /// No line item with this ID on the proposal.
    #[error("Line item not found: {0}")]
    LineItemNotFound(String),

    /// No add-on with this ID on the proposal.
    #[error("Add-on not found: {0}")]
    AddOnNotFound(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised at the input boundary so the engine only ever sees a sane domain.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    ///
    /// `max_exclusive` distinguishes `[0, 100)` (NET margin target) from
    /// `[0, 100]` (the other percentages).
    #[error("{field} must be between {min} and {max}{}", exclusive_suffix(.max_exclusive))]
    OutOfRange {
        field: String,
        min: f64,
        max: f64,
        max_exclusive: bool,
    },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    MustBeNonNegative { field: String },

    /// Value is NaN or infinite.
    #[error("{field} must be a finite number")]
    NotFinite { field: String },
}

fn exclusive_suffix(max_exclusive: &bool) -> &'static str {
    if *max_exclusive {
        " (exclusive)"
    } else {
        ""
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::LineItemNotFound("li-42".to_string());
        assert_eq!(err.to_string(), "Line item not found: li-42");
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "name".to_string(),
        };
        assert_eq!(err.to_string(), "name is required");

        let err = ValidationError::OutOfRange {
            field: "netMarginTarget".to_string(),
            min: 0.0,
            max: 100.0,
            max_exclusive: true,
        };
        assert_eq!(
            err.to_string(),
            "netMarginTarget must be between 0 and 100 (exclusive)"
        );

        let err = ValidationError::OutOfRange {
            field: "profitPercent".to_string(),
            min: 0.0,
            max: 100.0,
            max_exclusive: false,
        };
        assert_eq!(err.to_string(), "profitPercent must be between 0 and 100");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::MustBeNonNegative {
            field: "discountAmount".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
