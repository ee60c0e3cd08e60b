pub mod contracts;
pub mod explorer;
pub mod invoker;
pub mod market_api;

use std::time::Duration;

use reqwest::Client;

use crate::config::HttpConfig;
use crate::errors::CheckError;

/// Build an HTTP client with explicit connect and request timeouts.
pub fn build_http_client(http: &HttpConfig) -> Result<Client, CheckError> {
    Client::builder()
        .connect_timeout(Duration::from_secs(http.connect_timeout_seconds))
        .timeout(Duration::from_secs(http.request_timeout_seconds))
        .user_agent(concat!("rate-verifier/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| CheckError::network("http client", e))
}
