#![allow(dead_code)]

use std::collections::HashMap;

use alloy::hex;
use alloy::primitives::U256;
use rate_verifier::config::{
    AppConfig, EndpointsConfig, ExplorerConfig, HttpConfig, KinkSource, LoggingConfig,
    MarketApiConfig, ParameterSource, RateModelConfig, RpcConfig, ToleranceConfig,
    VerifierConfig,
};
use rate_verifier::sources::contracts::expected_function;
use rust_decimal_macros::dec;
use serde_json::{json, Value};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

pub const MODEL_ADDRESS: &str = "0xfb564da37b41b2f6b6edcc3e56fbf523bd9f2012";

/// 1e18 * 500000 / 1450000, floored.
pub const LITERAL_UTILIZATION: u128 = 344_827_586_206_896_551;
/// LITERAL_UTILIZATION * 23782343987 / 1e18, floored.
pub const LITERAL_BORROW_RATE: u128 = 8_200_808_271;
pub const MULTIPLIER_PER_BLOCK: u128 = 23_782_343_987;
pub const JUMP_MULTIPLIER_PER_BLOCK: u128 = 518_455_098_934;

/// Full jump-rate model ABI, including the parameter getters.
pub const RATE_MODEL_ABI: &str = r#"[
    {"type":"function","name":"utilizationRate","stateMutability":"pure",
     "inputs":[{"name":"cash","type":"uint256"},{"name":"borrows","type":"uint256"},{"name":"reserves","type":"uint256"}],
     "outputs":[{"name":"","type":"uint256"}]},
    {"type":"function","name":"getBorrowRate","stateMutability":"view",
     "inputs":[{"name":"cash","type":"uint256"},{"name":"borrows","type":"uint256"},{"name":"reserves","type":"uint256"}],
     "outputs":[{"name":"","type":"uint256"}]},
    {"type":"function","name":"baseRatePerBlock","stateMutability":"view","inputs":[],"outputs":[{"name":"","type":"uint256"}]},
    {"type":"function","name":"multiplierPerBlock","stateMutability":"view","inputs":[],"outputs":[{"name":"","type":"uint256"}]},
    {"type":"function","name":"jumpMultiplierPerBlock","stateMutability":"view","inputs":[],"outputs":[{"name":"","type":"uint256"}]},
    {"type":"function","name":"blocksPerYear","stateMutability":"view","inputs":[],"outputs":[{"name":"","type":"uint256"}]},
    {"type":"function","name":"kink","stateMutability":"view","inputs":[],"outputs":[{"name":"","type":"uint256"}]}
]"#;

/// `RATE_MODEL_ABI` without the named functions.
pub fn abi_without(names: &[&str]) -> String {
    let abi: Vec<Value> = serde_json::from_str(RATE_MODEL_ABI).expect("valid ABI");
    let kept: Vec<Value> = abi
        .into_iter()
        .filter(|entry| !matches!(entry["name"].as_str(), Some(name) if names.contains(&name)))
        .collect();
    Value::Array(kept).to_string()
}

// ---------------------------------------------------------------------------
// Fake JSON-RPC node
// ---------------------------------------------------------------------------

/// What the fake node answers for a given function.
#[derive(Debug, Clone)]
pub enum Reply {
    Uint(U256),
    Revert,
    Empty,
}

/// Answers `eth_call` by the 4-byte selector of the call input, echoing the
/// request id.
#[derive(Debug, Clone, Default)]
pub struct FakeNode {
    replies: HashMap<String, Reply>,
}

impl FakeNode {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reply to calls of `function` (by name) with `reply`.
    pub fn on(mut self, function: &str, reply: Reply) -> Self {
        let selector = expected_function(function)
            .unwrap_or_else(|| panic!("unknown rate model function {function}"))
            .selector;
        self.replies.insert(hex::encode(selector), reply);
        self
    }

    pub fn on_uint(self, function: &str, value: u128) -> Self {
        self.on(function, Reply::Uint(U256::from(value)))
    }

    /// A node for the literal 1000000 / 500000 / 50000 market.
    pub fn literal_market() -> Self {
        Self::new()
            .on_uint("utilizationRate", LITERAL_UTILIZATION)
            .on_uint("getBorrowRate", LITERAL_BORROW_RATE)
    }

    /// Adds the parameter getters for the cDAI jump-rate model.
    pub fn with_getters(self) -> Self {
        self.on_uint("baseRatePerBlock", 0)
            .on_uint("multiplierPerBlock", MULTIPLIER_PER_BLOCK)
            .on_uint("jumpMultiplierPerBlock", JUMP_MULTIPLIER_PER_BLOCK)
            .on_uint("blocksPerYear", 2_102_400)
            .on_uint("kink", 800_000_000_000_000_000)
    }
}

fn rpc_result(id: Value, result: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "jsonrpc": "2.0", "id": id, "result": result }))
}

fn rpc_revert(id: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "jsonrpc": "2.0",
        "id": id,
        "error": { "code": 3, "message": "execution reverted", "data": "0x" }
    }))
}

impl Respond for FakeNode {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let body: Value = match serde_json::from_slice(&request.body) {
            Ok(body) => body,
            Err(_) => return ResponseTemplate::new(400),
        };
        let id = body["id"].clone();

        match body["method"].as_str() {
            Some("eth_chainId") => return rpc_result(id, json!("0x1")),
            Some("eth_blockNumber") => return rpc_result(id, json!("0x1")),
            Some("eth_call") => {}
            _ => return rpc_revert(id),
        }

        let call = &body["params"][0];
        let input = call["input"]
            .as_str()
            .or_else(|| call["data"].as_str())
            .unwrap_or("0x");
        let selector = input
            .trim_start_matches("0x")
            .get(..8)
            .unwrap_or_default()
            .to_lowercase();

        match self.replies.get(&selector) {
            Some(Reply::Uint(value)) => rpc_result(
                id,
                json!(hex::encode_prefixed(value.to_be_bytes::<32>())),
            ),
            Some(Reply::Empty) => rpc_result(id, json!("0x")),
            Some(Reply::Revert) | None => rpc_revert(id),
        }
    }
}

// ---------------------------------------------------------------------------
// Fake HTTP APIs
// ---------------------------------------------------------------------------

pub fn token_json(symbol: &str, cash: &str, borrows: &str, reserves: &str, apy: &str) -> Value {
    json!({
        "symbol": symbol,
        "cash": { "value": cash },
        "total_borrows": { "value": borrows },
        "reserves": { "value": reserves },
        "collateral_factor": { "value": "0.8" },
        "interest_rate_model_address": MODEL_ADDRESS,
        "borrow_rate": { "value": apy },
    })
}

/// The literal market with an API APY close to the compounded rate.
pub fn literal_token() -> Value {
    token_json("cDAI", "1000000.4", "500000", "50000", "0.0198600566")
}

pub async fn mount_market(server: &MockServer, tokens: Vec<Value>) {
    Mock::given(method("GET"))
        .and(path("/market"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "cToken": tokens, "error": null })),
        )
        .mount(server)
        .await;
}

pub async fn mount_explorer(server: &MockServer, abi: &str) {
    Mock::given(method("GET"))
        .and(path("/explorer"))
        .and(query_param("action", "getabi"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "1",
            "message": "OK",
            "result": abi,
        })))
        .mount(server)
        .await;
}

pub async fn mount_node(server: &MockServer, node: FakeNode) {
    Mock::given(method("POST"))
        .and(path("/rpc"))
        .respond_with(node)
        .mount(server)
        .await;
}

/// Mount a node that must never be reached.
pub async fn mount_unreachable_node(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/rpc"))
        .respond_with(FakeNode::new())
        .expect(0)
        .mount(server)
        .await;
}

pub fn rpc_url(server: &MockServer) -> String {
    format!("{}/rpc", server.uri())
}

pub fn http_config() -> HttpConfig {
    HttpConfig {
        connect_timeout_seconds: 5,
        request_timeout_seconds: 10,
    }
}

/// Config pointing every endpoint at `server`, with operator constants.
pub fn test_config(server: &MockServer) -> VerifierConfig {
    VerifierConfig {
        app: AppConfig {
            logging: LoggingConfig {
                log_dir: "logs".into(),
                file_prefix: "rate-verifier.log".into(),
                filter: "rate_verifier=debug".into(),
            },
        },
        endpoints: EndpointsConfig {
            market_api: MarketApiConfig {
                base_url: format!("{}/market", server.uri()),
                target_symbol: "cDAI".into(),
            },
            explorer: ExplorerConfig {
                base_url: format!("{}/explorer", server.uri()),
                chain_id: 1,
                api_key_env: String::new(),
            },
            rpc: RpcConfig {
                http_url: rpc_url(server),
            },
            http: http_config(),
        },
        rate_model: RateModelConfig {
            source: ParameterSource::Config,
            kink_source: KinkSource::CollateralFactor,
            base_rate_per_block: Some("0".into()),
            multiplier_per_block: Some(MULTIPLIER_PER_BLOCK.to_string()),
            jump_multiplier_per_block: None,
            blocks_per_year: Some("2102400".into()),
            blocks_per_day: dec!(6570),
            days_per_year: dec!(365),
        },
        tolerances: ToleranceConfig::default(),
    }
}
