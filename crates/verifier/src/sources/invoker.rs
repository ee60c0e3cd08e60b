//! Contract invoker: binds a resolved ABI to an address over JSON-RPC.
//!
//! Calls are `eth_call` simulations against the latest block: no transaction
//! is submitted and no gas is spent. The ABI is only known at runtime, so
//! arguments and results go through `DynSolValue`.

use std::time::Duration;

use alloy::contract::{ContractInstance, Error as ContractError, Interface};
use alloy::dyn_abi::DynSolValue;
use alloy::primitives::U256;
use alloy::providers::RootProvider;
use alloy::rpc::client::RpcClient;
use alloy::transports::http::reqwest::{Client, Url};
use alloy::transports::http::Http;
use alloy::transports::TransportError;
use tracing::debug;

use super::explorer::ContractInterface;
use crate::config::HttpConfig;
use crate::constants::{FN_GET_BORROW_RATE, FN_UTILIZATION_RATE};
use crate::errors::CheckError;
use crate::types::Mantissa;

/// Concrete provider type: Alloy HTTP provider over Ethereum network.
pub type HttpProvider = RootProvider;

/// JSON-RPC error code geth and most clients use for `execution reverted`.
const EXECUTION_REVERTED_CODE: i64 = 3;

/// Build an HTTP provider whose transport honours the configured timeouts.
pub fn connect_http(rpc_url: &str, http: &HttpConfig) -> Result<HttpProvider, CheckError> {
    let url: Url = rpc_url.parse().map_err(|e| CheckError::Rpc {
        function: "connect".into(),
        reason: format!("invalid RPC URL: {e}"),
    })?;
    let client = Client::builder()
        .connect_timeout(Duration::from_secs(http.connect_timeout_seconds))
        .timeout(Duration::from_secs(http.request_timeout_seconds))
        .build()
        .map_err(|e| CheckError::Rpc {
            function: "connect".into(),
            reason: e.to_string(),
        })?;
    let transport = Http::with_client(client, url);
    Ok(RootProvider::new(RpcClient::new(transport, false)))
}

/// Read-only binding of a contract's interface to its on-chain address.
pub struct ContractInvoker {
    contract: ContractInstance<HttpProvider>,
    interface: ContractInterface,
}

impl ContractInvoker {
    /// Construct with an Alloy HTTP provider and a resolved interface.
    pub fn new(provider: HttpProvider, interface: ContractInterface) -> Self {
        let contract = ContractInstance::new(
            interface.address(),
            provider,
            Interface::new(interface.abi().clone()),
        );
        Self {
            contract,
            interface,
        }
    }

    pub fn interface(&self) -> &ContractInterface {
        &self.interface
    }

    /// Simulate `function(args...)` and decode its single `uint256` result.
    pub async fn call_uint(&self, function: &str, args: &[U256]) -> Result<U256, CheckError> {
        let args: Vec<DynSolValue> = args.iter().map(|a| DynSolValue::Uint(*a, 256)).collect();

        let values = self
            .contract
            .function(function, &args)
            .map_err(|e| classify_call_error(function, e))?
            .call()
            .await
            .map_err(|e| classify_call_error(function, e))?;

        let value = single_uint(function, &values)?;
        debug!(function, result = %value, "eth_call");
        Ok(value)
    }

    /// Contract's own utilization for the given market state (1e18-scaled).
    pub async fn utilization_rate(
        &self,
        cash: U256,
        borrows: U256,
        reserves: U256,
    ) -> Result<Mantissa, CheckError> {
        self.call_uint(FN_UTILIZATION_RATE, &[cash, borrows, reserves])
            .await
            .map(Mantissa::from_raw)
    }

    /// Contract's own per-block borrow rate for the given market state.
    pub async fn get_borrow_rate(
        &self,
        cash: U256,
        borrows: U256,
        reserves: U256,
    ) -> Result<Mantissa, CheckError> {
        self.call_uint(FN_GET_BORROW_RATE, &[cash, borrows, reserves])
            .await
            .map(Mantissa::from_raw)
    }
}

/// Extract exactly one `uint` from a decoded return tuple.
fn single_uint(function: &str, values: &[DynSolValue]) -> Result<U256, CheckError> {
    match values {
        [DynSolValue::Uint(value, _)] => Ok(*value),
        other => Err(CheckError::Decode {
            function: function.to_string(),
            reason: format!("expected a single uint256, got {other:?}"),
        }),
    }
}

/// Map an Alloy contract error onto the verifier taxonomy.
fn classify_call_error(function: &str, err: ContractError) -> CheckError {
    let function = function.to_string();
    match err {
        ContractError::UnknownFunction(name) => CheckError::parse(
            "contract interface",
            format!("function '{name}' is not declared"),
        ),
        ContractError::AbiError(e) => CheckError::Decode {
            function,
            reason: e.to_string(),
        },
        err @ ContractError::ZeroData(..) => CheckError::Decode {
            function,
            reason: err.to_string(),
        },
        ContractError::TransportError(e) if is_revert(&e) => CheckError::Revert {
            function,
            reason: e.to_string(),
        },
        other => CheckError::Rpc {
            function,
            reason: other.to_string(),
        },
    }
}

/// Whether a JSON-RPC error response reports a reverted simulation.
fn is_revert(err: &TransportError) -> bool {
    err.as_error_resp().is_some_and(|payload| {
        payload.code == EXECUTION_REVERTED_CODE || payload.message.to_lowercase().contains("revert")
    })
}
