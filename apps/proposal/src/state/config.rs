//! # Quote Configuration
//!
//! Company details and the pricing defaults new proposals start from.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     ROOFQUOTE_NET_MARGIN_TARGET=25                                     │
//! │     ROOFQUOTE_HIDE_MARGINS=true                                        │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/roofquote/quote.toml (Linux)                             │
//! │     ~/Library/Application Support/com.roofquote.roofquote/quote.toml   │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     15% overhead, 20% profit, 10% overhead cost, 20% NET floor         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # quote.toml
//! [company]
//! name = "Summit Roofing"
//! currency_code = "USD"
//! currency_symbol = "$"
//! currency_decimals = 2
//!
//! [pricing]
//! overhead_percent = 15.0
//! profit_percent = 20.0
//! overhead_cost_percent = 10.0
//! net_margin_target = 20.0
//! hide_margins = false
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use roofquote_core::validation::validate_pricing_parameters;
use roofquote_core::{Money, PricingParameters, ValidationError};

// =============================================================================
// Errors
// =============================================================================

/// Errors loading, saving or validating `quote.toml`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config file is not valid TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Config could not be serialized: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("No config path available")]
    NoConfigPath,

    #[error("Invalid pricing defaults: {0}")]
    InvalidPricing(ValidationError),

    #[error("Invalid currency settings: {0}")]
    InvalidCurrency(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

// =============================================================================
// Company Settings
// =============================================================================

/// Who is quoting, and how amounts are displayed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompanySettings {
    /// Shown on proposals and exports.
    pub name: String,

    /// Currency code (ISO 4217)
    pub currency_code: String,

    /// Currency symbol (for display)
    pub currency_symbol: String,

    /// Number of decimal places for currency
    pub currency_decimals: u8,
}

impl Default for CompanySettings {
    fn default() -> Self {
        CompanySettings {
            name: "RoofQuote Contractor".to_string(),
            currency_code: "USD".to_string(),
            currency_symbol: "$".to_string(),
            currency_decimals: 2,
        }
    }
}

// =============================================================================
// Pricing Defaults
// =============================================================================

/// Pricing parameters a new proposal starts with.
///
/// Discounts are per proposal and have no default here.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingDefaults {
    pub overhead_percent: f64,
    pub profit_percent: f64,
    pub overhead_cost_percent: f64,
    pub net_margin_target: f64,
    pub hide_margins: bool,
}

impl Default for PricingDefaults {
    fn default() -> Self {
        let params = PricingParameters::default();
        PricingDefaults {
            overhead_percent: params.overhead_percent,
            profit_percent: params.profit_percent,
            overhead_cost_percent: params.overhead_cost_percent,
            net_margin_target: params.net_margin_target,
            hide_margins: params.hide_margins,
        }
    }
}

impl PricingDefaults {
    /// Pricing parameters for a fresh proposal (no discount).
    pub fn to_parameters(&self) -> PricingParameters {
        PricingParameters {
            overhead_percent: self.overhead_percent,
            profit_percent: self.profit_percent,
            overhead_cost_percent: self.overhead_cost_percent,
            net_margin_target: self.net_margin_target,
            discount_amount: 0.0,
            hide_margins: self.hide_margins,
        }
    }
}

// =============================================================================
// Quote Config
// =============================================================================

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuoteConfig {
    pub company: CompanySettings,
    pub pricing: PricingDefaults,
}

impl QuoteConfig {
    /// Loads configuration from file and environment.
    ///
    /// ## Loading Order
    /// 1. Start with defaults
    /// 2. Load from TOML file (explicit path, else the platform config dir)
    /// 3. Override with `ROOFQUOTE_*` environment variables
    /// 4. Validate
    pub fn load(config_path: Option<PathBuf>) -> ConfigResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading quote config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> ConfigResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or(ConfigError::NoConfigPath)?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents)?;

        info!(?path, "Quote config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        validate_pricing_parameters(&self.pricing.to_parameters())
            .map_err(ConfigError::InvalidPricing)?;

        if self.company.currency_code.trim().is_empty() {
            return Err(ConfigError::InvalidCurrency(
                "currency_code must not be empty".into(),
            ));
        }

        if self.company.currency_decimals > 2 {
            return Err(ConfigError::InvalidCurrency(format!(
                "currency_decimals must be at most 2, got {}",
                self.company.currency_decimals
            )));
        }

        Ok(())
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    /// Applies overrides from any key lookup. Unparseable values are ignored.
    fn apply_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(name) = lookup("ROOFQUOTE_COMPANY_NAME") {
            self.company.name = name;
        }

        if let Some(code) = lookup("ROOFQUOTE_CURRENCY_CODE") {
            self.company.currency_code = code;
        }

        if let Some(symbol) = lookup("ROOFQUOTE_CURRENCY_SYMBOL") {
            self.company.currency_symbol = symbol;
        }

        let percents: [(&str, &mut f64); 4] = [
            ("ROOFQUOTE_OVERHEAD_PERCENT", &mut self.pricing.overhead_percent),
            ("ROOFQUOTE_PROFIT_PERCENT", &mut self.pricing.profit_percent),
            ("ROOFQUOTE_OVERHEAD_COST_PERCENT", &mut self.pricing.overhead_cost_percent),
            ("ROOFQUOTE_NET_MARGIN_TARGET", &mut self.pricing.net_margin_target),
        ];
        for (key, slot) in percents {
            if let Some(raw) = lookup(key) {
                match raw.trim().parse::<f64>() {
                    Ok(value) => {
                        debug!(key, value, "Overriding pricing default from environment");
                        *slot = value;
                    }
                    Err(_) => warn!(key, value = %raw, "Ignoring non-numeric environment override"),
                }
            }
        }

        if let Some(raw) = lookup("ROOFQUOTE_HIDE_MARGINS") {
            match raw.to_lowercase().as_str() {
                "1" | "true" | "yes" => self.pricing.hide_margins = true,
                "0" | "false" | "no" => self.pricing.hide_margins = false,
                _ => warn!(value = %raw, "Unknown ROOFQUOTE_HIDE_MARGINS value"),
            }
        }
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "roofquote", "roofquote")
            .map(|dirs| dirs.config_dir().join("quote.toml"))
    }

    // =========================================================================
    // Formatting
    // =========================================================================

    /// Formats a cent amount as a currency string.
    ///
    /// With `currency_decimals = 0` the cents are truncated.
    ///
    /// ## Example
    /// ```rust
    /// use roofquote_proposal::state::QuoteConfig;
    ///
    /// let config = QuoteConfig::default();
    /// assert_eq!(config.format_currency(241500), "$2415.00");
    /// ```
    pub fn format_currency(&self, cents: i64) -> String {
        let decimals = u32::from(self.company.currency_decimals.min(2));
        let divisor = 10_i64.pow(decimals);
        let minor = cents / 10_i64.pow(2 - decimals);
        let whole = minor / divisor;
        let frac = (minor % divisor).abs();

        format!(
            "{}{}{}",
            if cents < 0 { "-" } else { "" },
            self.company.currency_symbol,
            if decimals > 0 {
                format!("{}.{:0width$}", whole.abs(), frac, width = decimals as usize)
            } else {
                whole.abs().to_string()
            }
        )
    }

    /// Formats a dollar amount from the engine. Non-finite amounts show as "N/A".
    pub fn format_dollars(&self, dollars: f64) -> String {
        Money::from_dollars(dollars)
            .map(|money| self.format_currency(money.cents()))
            .unwrap_or_else(|| "N/A".to_string())
    }
}
