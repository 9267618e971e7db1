//! Rain/no-rain threshold estimation.
//!
//! The smallest finite value of a field is taken to mean "no rain". The
//! threshold is the smallest value above it, i.e. the weakest signal that can
//! be told apart from no rain.

use ndarray::{ArrayView, Dimension};

use crate::field::finite_min;

/// Estimate the rain/no-rain threshold of a field.
///
/// Non-finite values are ignored. Returns NaN when no finite value is left,
/// and the minimum itself when every finite value equals it.
pub fn estimate_threshold<D: Dimension>(field: ArrayView<'_, f32, D>) -> f32 {
    let min_precip = match finite_min(field.iter().copied()) {
        Some(min) => min,
        None => return f32::NAN,
    };

    finite_min(field.iter().copied().filter(|&v| v > min_precip)).unwrap_or(min_precip)
}

/// The value representing "no rain": the minimum finite value of the field,
/// or NaN if the field holds no finite value.
pub fn zero_value<D: Dimension>(field: ArrayView<'_, f32, D>) -> f32 {
    finite_min(field.iter().copied()).unwrap_or(f32::NAN)
}
