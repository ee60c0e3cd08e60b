use rust_decimal::Decimal;
use thiserror::Error;

/// Exit status for a run where every comparison held.
pub const EXIT_OK: u8 = 0;

/// Exit status for any fetch, parse, call or arithmetic failure.
pub const EXIT_FAILURE: u8 = 1;

/// Exit status for a comparison outside its tolerance.
pub const EXIT_TOLERANCE: u8 = 2;

/// Typed error taxonomy for the verification pipeline.
///
/// Every variant is fatal: the pipeline stops at the first one and `main`
/// maps it to a process exit code via [`CheckError::exit_code`].
#[derive(Error, Debug)]
pub enum CheckError {
    // -- Fetching -----------------------------------------------------------
    #[error("{stage}: network error: {reason}")]
    Network { stage: &'static str, reason: String },

    #[error("{stage}: parse error: {reason}")]
    Parse { stage: &'static str, reason: String },

    #[error("market API: no entry with symbol '{symbol}'")]
    NotFound { symbol: String },

    #[error("invalid address '{input}': {reason}")]
    InvalidAddress { input: String, reason: String },

    // -- Contract calls -----------------------------------------------------
    #[error("RPC error calling {function}: {reason}")]
    Rpc { function: String, reason: String },

    #[error("{function} reverted: {reason}")]
    Revert { function: String, reason: String },

    #[error("cannot decode {function} result: {reason}")]
    Decode { function: String, reason: String },

    // -- Evaluation ---------------------------------------------------------
    #[error(
        "degenerate market: cash ({cash}) + borrows ({borrows}) - reserves ({reserves}) is not positive"
    )]
    DegenerateMarket {
        cash: String,
        borrows: String,
        reserves: String,
    },

    #[error("rate model parameter '{name}' is required but not configured")]
    MissingRateParameter { name: &'static str },

    // -- Comparison ---------------------------------------------------------
    #[error(
        "{quantity} outside tolerance: computed {computed}, reference {reference}, error {error} (max {threshold})"
    )]
    ToleranceExceeded {
        quantity: String,
        computed: Decimal,
        reference: Decimal,
        error: Decimal,
        threshold: Decimal,
    },
}

impl CheckError {
    /// Process exit status for this failure.
    pub fn exit_code(&self) -> u8 {
        match self {
            CheckError::ToleranceExceeded { .. } => EXIT_TOLERANCE,
            _ => EXIT_FAILURE,
        }
    }

    pub(crate) fn network(stage: &'static str, reason: impl std::fmt::Display) -> Self {
        CheckError::Network {
            stage,
            reason: reason.to_string(),
        }
    }

    pub(crate) fn parse(stage: &'static str, reason: impl std::fmt::Display) -> Self {
        CheckError::Parse {
            stage,
            reason: reason.to_string(),
        }
    }
}
