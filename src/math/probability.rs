//! Density evaluation and weighted selection for Gaussian mixtures

use crate::math::covariance::Covariance;
use num_traits::Float;

/// `ln(2π)`, the per-dimension normalising term of a Gaussian log-density
const LN_TWO_PI: f64 = 1.837_877_066_409_345_5;

/// Log-density of a bivariate Gaussian at `point`
///
/// Returns `None` when the covariance is singular.
pub fn gaussian_log_density(point: [f64; 2], mean: [f64; 2], covariance: &Covariance) -> Option<f64> {
    let inverse = covariance.inverse()?;
    let determinant = covariance.determinant();
    let dx = point[0] - mean[0];
    let dy = point[1] - mean[1];
    let mahalanobis = inverse.quadratic_form(dx, dy);

    Some(-0.5 * (2.0f64.mul_add(LN_TWO_PI, determinant.ln()) + mahalanobis))
}

/// Numerically stable `ln(Σ exp(values))`
///
/// Shifts by the maximum so large negative log-densities do not underflow.
/// An empty slice or all-infinite input yields negative infinity.
pub fn log_sum_exp<T: Float>(values: &[T]) -> T {
    let max = values
        .iter()
        .copied()
        .fold(T::neg_infinity(), |acc, value| acc.max(value));

    if !max.is_finite() {
        return max;
    }

    let sum = values
        .iter()
        .fold(T::zero(), |acc, &value| acc + (value - max).exp());

    max + sum.ln()
}

/// Index selected by walking cumulative `weights` with a uniform draw in `[0, 1)`
///
/// Weights need not be normalised. Falls back to the last index when rounding
/// leaves the draw unconsumed.
pub fn select_weighted(weights: &[f64], uniform: f64) -> usize {
    let total: f64 = weights.iter().sum();
    let mut remaining = uniform * total;

    for (index, &weight) in weights.iter().enumerate() {
        remaining -= weight;
        if remaining < 0.0 {
            return index;
        }
    }

    weights.len().saturating_sub(1)
}
