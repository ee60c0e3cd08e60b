use alloy::primitives::U256;
use rust_decimal::Decimal;
use serde::Deserialize;

use super::mantissa::{decimal_to_u256_trunc, Mantissa};

/// Body of the market-data API's token-list endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenListResponse {
    #[serde(rename = "cToken")]
    pub tokens: Vec<TokenEntry>,
    #[serde(default)]
    pub error: Option<serde_json::Value>,
}

/// `{ "value": "..." }` wrapper the API uses for every numeric field.
///
/// `Decimal`'s own deserializer accepts both decimal strings and JSON numbers.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ValueField {
    pub value: Decimal,
}

/// A single market entry as published by the API.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenEntry {
    pub symbol: String,
    pub cash: ValueField,
    pub total_borrows: ValueField,
    pub reserves: ValueField,
    pub collateral_factor: ValueField,
    pub interest_rate_model_address: String,
    pub borrow_rate: ValueField,
}

/// Immutable market inputs for one verification run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarketSnapshot {
    pub symbol: String,
    pub cash: U256,
    pub borrows: U256,
    pub reserves: U256,
    /// Collateral factor scaled by 1e18, used as the rate-model kink.
    pub collateral_factor_kink: Mantissa,
    /// Unchecksummed address as published; resolved by the explorer stage.
    pub interest_rate_model_address: String,
    /// Borrow APY as published by the API (fraction, e.g. `0.034`).
    pub api_borrow_apy: Decimal,
}

impl TryFrom<TokenEntry> for MarketSnapshot {
    type Error = String;

    /// Truncate amounts toward zero and scale the collateral factor to 1e18.
    fn try_from(entry: TokenEntry) -> Result<Self, Self::Error> {
        let amount = |name: &str, field: ValueField| {
            decimal_to_u256_trunc(field.value)
                .ok_or_else(|| format!("{name} is negative or out of range: {}", field.value))
        };

        let cash = amount("cash", entry.cash)?;
        let borrows = amount("total_borrows", entry.total_borrows)?;
        let reserves = amount("reserves", entry.reserves)?;
        let collateral_factor_kink = Mantissa::from_fraction(entry.collateral_factor.value)
            .ok_or_else(|| {
                format!(
                    "collateral_factor is negative or out of range: {}",
                    entry.collateral_factor.value
                )
            })?;

        Ok(Self {
            symbol: entry.symbol,
            cash,
            borrows,
            reserves,
            collateral_factor_kink,
            interest_rate_model_address: entry.interest_rate_model_address,
            api_borrow_apy: entry.borrow_rate.value,
        })
    }
}
