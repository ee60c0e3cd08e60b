//! Compile-time signatures of the interest-rate-model functions.
//!
//! The invoker binds whatever ABI the explorer returns; these declarations
//! pin the argument types the verifier relies on, so a resolved ABI that
//! declares a same-named function with different inputs is rejected before
//! any call is made.

use alloy::primitives::Selector;
use alloy::sol;
use alloy::sol_types::SolCall;

sol! {
    /// Compound-style jump rate model.
    interface IInterestRateModel {
        function utilizationRate(uint256 cash, uint256 borrows, uint256 reserves) external pure returns (uint256);
        function getBorrowRate(uint256 cash, uint256 borrows, uint256 reserves) external view returns (uint256);

        function baseRatePerBlock() external view returns (uint256);
        function multiplierPerBlock() external view returns (uint256);
        function jumpMultiplierPerBlock() external view returns (uint256);
        function blocksPerYear() external view returns (uint256);
        function kink() external view returns (uint256);
    }
}

/// A function the verifier expects the resolved ABI to declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpectedFunction {
    pub name: &'static str,
    pub signature: &'static str,
    pub selector: Selector,
}

fn expected<C: SolCall>() -> ExpectedFunction {
    let name = C::SIGNATURE
        .split_once('(')
        .map_or(C::SIGNATURE, |(name, _)| name);
    ExpectedFunction {
        name,
        signature: C::SIGNATURE,
        selector: Selector::new(C::SELECTOR),
    }
}

/// Three-argument rate functions every verification run calls.
pub fn rate_functions() -> [ExpectedFunction; 2] {
    [
        expected::<IInterestRateModel::utilizationRateCall>(),
        expected::<IInterestRateModel::getBorrowRateCall>(),
    ]
}

/// Zero-argument parameter getters read when parameters come from chain.
pub fn parameter_getters() -> [ExpectedFunction; 5] {
    [
        expected::<IInterestRateModel::baseRatePerBlockCall>(),
        expected::<IInterestRateModel::multiplierPerBlockCall>(),
        expected::<IInterestRateModel::jumpMultiplierPerBlockCall>(),
        expected::<IInterestRateModel::blocksPerYearCall>(),
        expected::<IInterestRateModel::kinkCall>(),
    ]
}

/// Look up a known rate-model function by name.
pub fn expected_function(name: &str) -> Option<ExpectedFunction> {
    rate_functions()
        .into_iter()
        .chain(parameter_getters())
        .find(|f| f.name == name)
}
