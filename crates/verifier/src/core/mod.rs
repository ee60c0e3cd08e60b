pub mod comparator;
pub mod rate_model;
pub mod report;
pub mod verifier;
