//! # Money Module
//!
//! Cent-level rounding for the breakdown engine and the `Money` type used
//! wherever a total leaves the engine to be stored or displayed.
//!
//! ## Two Representations
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  INSIDE THE ENGINE: f64 dollars, rounded to cents after EVERY step      │
//! │                                                                         │
//! │    0.1 + 0.2 = 0.30000000000000004   (raw float drift)                  │
//! │    round_cents(0.1 + 0.2) = 0.3      (drift never compounds)            │
//! │                                                                         │
//! │  Percentages are fractional (15% of $1,750.01) and the margin floor     │
//! │  divides by (1 - target), so the engine works in dollars and snaps      │
//! │  each intermediate back onto the cent grid.                             │
//! │                                                                         │
//! │  AT THE BOUNDARY: Money (i64 cents)                                     │
//! │                                                                         │
//! │    finalTotal 2415.0 ──► Money::from_dollars ──► 241500 cents           │
//! │    Stored as the proposal's totalAmount, displayed as "$2415.00"        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use roofquote_core::money::{round_cents, Money};
//!
//! assert_eq!(round_cents(262.499999999), 262.5);
//!
//! let total = Money::from_dollars(2415.0).unwrap();
//! assert_eq!(total.cents(), 241_500);
//! assert_eq!(total.to_string(), "$2415.00");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

// =============================================================================
// Cent Rounding
// =============================================================================

/// Rounds a dollar amount to the nearest cent.
///
/// Halves round toward positive infinity (`2.125 → 2.13`, `-2.125 → -2.12`),
/// matching how the quote UI has always rounded. Non-finite values pass
/// through unchanged so an unguarded margin target surfaces as `inf` rather
/// than a panic.
///
/// ## Example
/// ```rust
/// use roofquote_core::money::round_cents;
///
/// assert_eq!(round_cents(1925.0 / 0.8), 2406.25);
/// assert_eq!(round_cents(0.1 + 0.2), 0.3);
/// assert!(round_cents(f64::INFINITY).is_infinite());
/// ```
pub fn round_cents(value: f64) -> f64 {
    let scaled = value * 100.0;
    let floor = scaled.floor();
    let rounded = if scaled - floor >= 0.5 {
        floor + 1.0
    } else {
        floor
    };
    rounded / 100.0
}

/// Checks that a dollar amount sits on the cent grid (within float noise).
pub fn is_whole_cents(value: f64) -> bool {
    if !value.is_finite() {
        return false;
    }
    let scaled = value * 100.0;
    (scaled - scaled.round()).abs() < 1e-6
}

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in cents.
///
/// ## Design Decisions
/// - **i64 (signed)**: discounts and corrections can be negative
/// - **Only built from finite dollars**: `from_dollars` refuses `inf`/`NaN`,
///   so a runaway margin target can never be stored as a total
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Converts a dollar amount produced by the engine into cents.
    ///
    /// Returns `None` for non-finite amounts or amounts outside the `i64`
    /// cent range.
    ///
    /// ## Example
    /// ```rust
    /// use roofquote_core::money::Money;
    ///
    /// assert_eq!(Money::from_dollars(1380.36).unwrap().cents(), 138_036);
    /// assert!(Money::from_dollars(f64::INFINITY).is_none());
    /// ```
    pub fn from_dollars(dollars: f64) -> Option<Self> {
        if !dollars.is_finite() {
            return None;
        }
        let cents = (round_cents(dollars) * 100.0).round();
        if cents < i64::MIN as f64 || cents > i64::MAX as f64 {
            return None;
        }
        Some(Money(cents as i64))
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit (dollars) portion.
    #[inline]
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit (cents) portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }
}

/// Debug-style display. Locale-aware formatting lives with the app config.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}${}.{:02}",
            sign,
            self.dollars().abs(),
            self.cents_part()
        )
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_cents_half_up() {
        assert_eq!(round_cents(2.125), 2.13);
        assert_eq!(round_cents(262.5), 262.5);
        assert_eq!(round_cents(0.005), 0.01);
        assert_eq!(round_cents(-2.125), -2.12);
        assert_eq!(round_cents(-2.346), -2.35);
    }

    #[test]
    fn test_round_cents_absorbs_float_drift() {
        assert_eq!(round_cents(0.1 + 0.2), 0.3);
        assert_eq!(round_cents(1750.0 * 0.15), 262.5);
        assert_eq!(round_cents(1925.0 / (1.0 - 0.2)), 2406.25);
    }

    #[test]
    fn test_round_cents_non_finite_passes_through() {
        assert_eq!(round_cents(f64::INFINITY), f64::INFINITY);
        assert_eq!(round_cents(f64::NEG_INFINITY), f64::NEG_INFINITY);
        assert!(round_cents(f64::NAN).is_nan());
    }

    #[test]
    fn test_is_whole_cents() {
        assert!(is_whole_cents(1380.36));
        assert!(is_whole_cents(0.0));
        assert!(!is_whole_cents(1380.365));
        assert!(!is_whole_cents(f64::INFINITY));
    }

    #[test]
    fn test_from_dollars() {
        assert_eq!(Money::from_dollars(2415.0), Some(Money::from_cents(241_500)));
        assert_eq!(Money::from_dollars(0.1 + 0.2), Some(Money::from_cents(30)));
        assert_eq!(Money::from_dollars(-5.5), Some(Money::from_cents(-550)));
        assert_eq!(Money::from_dollars(f64::NAN), None);
        assert_eq!(Money::from_dollars(1e30), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(241_500).to_string(), "$2415.00");
        assert_eq!(Money::from_cents(-550).to_string(), "-$5.50");
        assert_eq!(Money::zero().to_string(), "$0.00");
    }
}
