//! Core engine configuration management.
//!
//! Advance and withholding accounts are resolved from configured chart of
//! accounts codes, never from hard-coded identifiers.

use rust_decimal::Decimal;
use serde::Deserialize;

/// Core engine configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CoreConfig {
    /// Numeric tolerance configuration.
    #[serde(default)]
    pub tolerance: ToleranceConfig,
    /// Chart of accounts resolution for generated lines.
    pub accounts: AccountResolutionConfig,
}

/// Numeric tolerances for balance comparisons.
#[derive(Debug, Clone, Deserialize)]
pub struct ToleranceConfig {
    /// Maximum permitted |debits - credits| for a journal to balance.
    #[serde(default = "default_balance_tolerance")]
    pub balance: Decimal,
    /// How far below zero an advance balance may drift before consumption
    /// is rejected.
    #[serde(default = "default_advance_tolerance")]
    pub advance: Decimal,
}

fn default_balance_tolerance() -> Decimal {
    Decimal::new(1, 2)
}

fn default_advance_tolerance() -> Decimal {
    Decimal::new(1, 2)
}

impl Default for ToleranceConfig {
    fn default() -> Self {
        Self {
            balance: default_balance_tolerance(),
            advance: default_advance_tolerance(),
        }
    }
}

/// Chart of accounts codes for lines the settlement processor generates
/// itself: advance/prepayment accounts and withholding tax accounts.
///
/// Codes are looked up against the tenant's chart of accounts at settlement
/// time; an unknown code is a typed error, not a fallback.
#[derive(Debug, Clone, Deserialize)]
pub struct AccountResolutionConfig {
    /// Account code for customer advances (a liability: money received
    /// ahead of an allocated invoice).
    pub customer_advance_code: String,
    /// Account code for supplier advances (an asset: money paid ahead of
    /// an allocated bill).
    pub supplier_advance_code: String,
    /// Account code for the withholding tax clearing account.
    pub withholding_clearing_code: String,
    /// Account code for the withholding tax payable account.
    pub withholding_payable_code: String,
}

impl CoreConfig {
    /// Loads configuration from environment and config files.
    ///
    /// Reads `config/default` then `config/{RUN_MODE}` (both optional),
    /// then applies `SALDO__`-prefixed environment overrides, e.g.
    /// `SALDO__ACCOUNTS__CUSTOMER_ADVANCE_CODE=2150`.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded or is incomplete.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("SALDO").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_tolerance_defaults() {
        let tolerance = ToleranceConfig::default();
        assert_eq!(tolerance.balance, dec!(0.01));
        assert_eq!(tolerance.advance, dec!(0.01));
    }

    #[test]
    fn test_load_from_environment() {
        temp_env::with_vars(
            [
                ("SALDO__ACCOUNTS__CUSTOMER_ADVANCE_CODE", Some("2150")),
                ("SALDO__ACCOUNTS__SUPPLIER_ADVANCE_CODE", Some("1450")),
                ("SALDO__ACCOUNTS__WITHHOLDING_CLEARING_CODE", Some("1460")),
                ("SALDO__ACCOUNTS__WITHHOLDING_PAYABLE_CODE", Some("2250")),
            ],
            || {
                let config = CoreConfig::load().expect("config should load from env");
                assert_eq!(config.accounts.customer_advance_code, "2150");
                assert_eq!(config.accounts.supplier_advance_code, "1450");
                assert_eq!(config.accounts.withholding_clearing_code, "1460");
                assert_eq!(config.accounts.withholding_payable_code, "2250");
                assert_eq!(config.tolerance.balance, dec!(0.01));
            },
        );
    }
}
