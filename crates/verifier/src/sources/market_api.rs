//! Market snapshot fetcher.
//!
//! One GET against the market-data API's token list, typed deserialisation
//! of the body, and an exact (case-sensitive) symbol match.

use reqwest::Client;
use tracing::{debug, info};

use crate::errors::CheckError;
use crate::types::{MarketSnapshot, TokenListResponse};

const STAGE: &str = "market API";

/// Client for the market-data API's token-list endpoint.
pub struct MarketApiClient {
    http: Client,
    url: String,
}

impl MarketApiClient {
    pub fn new(http: Client, url: impl Into<String>) -> Self {
        Self {
            http,
            url: url.into(),
        }
    }

    /// Fetch the token list and return the snapshot for `symbol`.
    pub async fn fetch_snapshot(&self, symbol: &str) -> Result<MarketSnapshot, CheckError> {
        let body = self
            .http
            .get(&self.url)
            .send()
            .await
            .map_err(|e| CheckError::network(STAGE, e))?
            .error_for_status()
            .map_err(|e| CheckError::network(STAGE, e))?
            .text()
            .await
            .map_err(|e| CheckError::network(STAGE, e))?;

        let snapshot = parse_snapshot(&body, symbol)?;

        info!(
            symbol = %snapshot.symbol,
            cash = %snapshot.cash,
            borrows = %snapshot.borrows,
            reserves = %snapshot.reserves,
            kink = %snapshot.collateral_factor_kink,
            model = %snapshot.interest_rate_model_address,
            api_borrow_apy = %snapshot.api_borrow_apy,
            "market snapshot fetched"
        );

        Ok(snapshot)
    }
}

/// Parse a token-list body and extract the entry matching `symbol` exactly.
pub fn parse_snapshot(body: &str, symbol: &str) -> Result<MarketSnapshot, CheckError> {
    let response: TokenListResponse =
        serde_json::from_str(body).map_err(|e| CheckError::parse(STAGE, e))?;

    if let Some(error) = response.error.as_ref().filter(|e| !e.is_null()) {
        return Err(CheckError::network(STAGE, format!("API returned error: {error}")));
    }

    debug!(entries = response.tokens.len(), "token list parsed");

    let entry = response
        .tokens
        .into_iter()
        .find(|t| t.symbol == symbol)
        .ok_or_else(|| CheckError::NotFound {
            symbol: symbol.to_string(),
        })?;

    MarketSnapshot::try_from(entry).map_err(|reason| CheckError::parse(STAGE, reason))
}
