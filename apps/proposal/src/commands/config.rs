//! # Config Commands
//!
//! Commands for reading the loaded configuration.

use tracing::debug;

use crate::state::QuoteConfig;

/// Gets the current configuration.
///
/// ## When Used
/// - Editor startup (company name, currency symbol)
/// - Pricing panel (default percentages shown as placeholders)
pub fn get_config(config: &QuoteConfig) -> QuoteConfig {
    debug!("get_config command");
    config.clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_config_returns_copy() {
        let mut config = QuoteConfig::default();
        config.company.name = "Summit Roofing".to_string();
        assert_eq!(get_config(&config), config);
    }
}
