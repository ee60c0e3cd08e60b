use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::errors::CheckError;
use crate::types::{ComparisonResult, ErrorMode, Quantity};

/// Error between `computed` and `reference` under `mode`.
///
/// A relative comparison against a zero reference degrades to the absolute
/// difference.
pub fn measure_error(computed: Decimal, reference: Decimal, mode: ErrorMode) -> Decimal {
    let diff = (computed - reference).abs();
    match mode {
        ErrorMode::Relative if !reference.is_zero() => diff / reference.abs(),
        _ => diff,
    }
}

/// Compare and fail with [`CheckError::ToleranceExceeded`] when
/// `error > threshold`. An error exactly at the threshold passes.
pub fn compare(
    quantity: Quantity,
    computed: Decimal,
    reference: Decimal,
    mode: ErrorMode,
    threshold: Decimal,
) -> Result<ComparisonResult, CheckError> {
    let error = measure_error(computed, reference, mode);

    if error > threshold {
        warn!(
            %quantity,
            %computed,
            %reference,
            %error,
            %threshold,
            "comparison failed"
        );
        return Err(CheckError::ToleranceExceeded {
            quantity: quantity.to_string(),
            computed,
            reference,
            error,
            threshold,
        });
    }

    info!(%quantity, %computed, %reference, %error, ?mode, "comparison passed");

    Ok(ComparisonResult {
        quantity,
        computed,
        reference,
        error,
        mode,
    })
}
