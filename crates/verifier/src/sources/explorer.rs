//! Contract interface resolver.
//!
//! Normalises the rate-model address to its checksummed form, asks the block
//! explorer for the verified ABI and decodes the doubly-encoded `result`
//! field into a typed [`JsonAbi`].

use alloy::json_abi::JsonAbi;
use alloy::primitives::Address;
use reqwest::Client;
use serde::Deserialize;
use std::str::FromStr;
use tracing::{debug, info};

use super::contracts::{rate_functions, ExpectedFunction};
use crate::config::ExplorerConfig;
use crate::errors::CheckError;

const STAGE: &str = "explorer API";

/// Parse a 40-hex-character address (optional `0x`) in any letter case.
///
/// Returns the address; its canonical string is `address.to_checksum(None)`.
pub fn normalize_address(input: &str) -> Result<Address, CheckError> {
    let invalid = |reason: &str| CheckError::InvalidAddress {
        input: input.to_string(),
        reason: reason.to_string(),
    };

    let trimmed = input.trim();
    let hex = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    if hex.len() != 40 {
        return Err(invalid(&format!("expected 40 hex characters, got {}", hex.len())));
    }
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(invalid("contains non-hex characters"));
    }
    Address::from_str(hex).map_err(|e| invalid(&e.to_string()))
}

/// Explorer response envelope. `result` holds the ABI as a JSON string on
/// success, or a human-readable reason on failure.
#[derive(Debug, Deserialize)]
struct ExplorerResponse {
    status: String,
    #[serde(default)]
    message: String,
    result: String,
}

/// A contract's resolved, typed interface description.
#[derive(Debug, Clone)]
pub struct ContractInterface {
    address: Address,
    abi: JsonAbi,
}

impl ContractInterface {
    /// Decode an ABI JSON document and check it declares the rate functions.
    pub fn from_abi_json(address: Address, abi_json: &str) -> Result<Self, CheckError> {
        let abi: JsonAbi = serde_json::from_str(abi_json)
            .map_err(|e| CheckError::parse(STAGE, format!("invalid ABI JSON: {e}")))?;
        let interface = Self { address, abi };
        for expected in rate_functions() {
            interface.require(&expected)?;
        }
        Ok(interface)
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn abi(&self) -> &JsonAbi {
        &self.abi
    }

    /// Whether the ABI declares `expected` with the exact same signature.
    pub fn declares(&self, expected: &ExpectedFunction) -> bool {
        self.abi
            .function(expected.name)
            .is_some_and(|overloads| overloads.iter().any(|f| f.selector() == expected.selector))
    }

    /// Fail with a `ParseError` unless `expected` is declared.
    pub fn require(&self, expected: &ExpectedFunction) -> Result<(), CheckError> {
        if self.declares(expected) {
            Ok(())
        } else {
            Err(CheckError::parse(
                STAGE,
                format!(
                    "interface of {} does not declare {}",
                    self.address.to_checksum(None),
                    expected.signature
                ),
            ))
        }
    }
}

/// Block-explorer ABI lookup client.
pub struct ExplorerClient {
    http: Client,
    config: ExplorerConfig,
    api_key: Option<String>,
}

impl ExplorerClient {
    /// The API key, if any, is read from the env var named in `config`.
    pub fn new(http: Client, config: &ExplorerConfig) -> Self {
        let api_key = if config.api_key_env.is_empty() {
            None
        } else {
            crate::config::env_string(&config.api_key_env)
        };
        Self {
            http,
            config: config.clone(),
            api_key,
        }
    }

    /// Resolve the verified interface of the contract at `raw_address`.
    pub async fn resolve(&self, raw_address: &str) -> Result<ContractInterface, CheckError> {
        let address = normalize_address(raw_address)?;
        let checksummed = address.to_checksum(None);

        let mut query: Vec<(&str, String)> = vec![
            ("chainid", self.config.chain_id.to_string()),
            ("module", "contract".into()),
            ("action", "getabi".into()),
            ("address", checksummed.clone()),
        ];
        if let Some(key) = &self.api_key {
            query.push(("apikey", key.clone()));
        }

        debug!(address = %checksummed, url = %self.config.base_url, "requesting ABI");

        let body = self
            .http
            .get(&self.config.base_url)
            .query(&query)
            .send()
            .await
            .map_err(|e| CheckError::network(STAGE, e))?
            .error_for_status()
            .map_err(|e| CheckError::network(STAGE, e))?
            .text()
            .await
            .map_err(|e| CheckError::network(STAGE, e))?;

        let interface = parse_abi_response(address, &body)?;

        info!(
            address = %checksummed,
            functions = interface.abi().functions().count(),
            "contract interface resolved"
        );

        Ok(interface)
    }
}

/// Decode the explorer envelope, then the ABI string it carries.
pub fn parse_abi_response(address: Address, body: &str) -> Result<ContractInterface, CheckError> {
    let response: ExplorerResponse =
        serde_json::from_str(body).map_err(|e| CheckError::parse(STAGE, e))?;

    if response.status != "1" {
        return Err(CheckError::network(
            STAGE,
            format!("request rejected ({}): {}", response.message, response.result),
        ));
    }

    ContractInterface::from_abi_json(address, &response.result)
}
