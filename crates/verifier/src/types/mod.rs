pub mod comparison;
pub mod mantissa;
pub mod market;
pub mod rate_model;

pub use comparison::{ComparisonResult, ErrorMode, Quantity};
pub use mantissa::Mantissa;
pub use market::{MarketSnapshot, TokenEntry, TokenListResponse};
pub use rate_model::{Annualization, RateModelConstants};
