//! Matthews correlation between a prediction vector and an observation vector.
//!
//! The prediction vector holds probabilities in `[0, 1]` (fractional values such as
//! `0.90` are common), while observations are binary. The coefficient is computed as a
//! plain Pearson correlation over the two vectors, so no binary-only shortcuts are used.

use crate::error::{Result, SimulationError};

/// Returns an error unless both vectors have the same length.
fn ensure_same_shape(prediction: &[f64], observation: &[f64]) -> Result<()> {
    if prediction.len() != observation.len() {
        return Err(SimulationError::ShapeMismatch {
            prediction_len: prediction.len(),
            observation_len: observation.len(),
        });
    }
    Ok(())
}

/// Arithmetic mean, accumulated left to right.
fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// True when every entry equals the first one (zero standard deviation).
///
/// Checked directly instead of through the variance, since the mean of a constant
/// fractional vector is not always exactly representable.
fn is_constant(values: &[f64]) -> bool {
    values.iter().all(|&v| v == values[0])
}

/// Calculates the Matthews correlation coefficient between `prediction` and `observation`.
///
/// Degenerate inputs (empty vectors, a zero mean, or a constant vector on either side)
/// yield `0.0` instead of NaN.
///
/// # Errors
/// Returns [`SimulationError::ShapeMismatch`] if the vectors differ in length.
///
/// # Examples
/// ```
/// use quake_mcc_core::mcc::matthews_correlation;
///
/// let p = [1.0, 0.0, 1.0, 0.0];
/// let s = [1.0, 0.0, 1.0, 0.0];
/// assert!((matthews_correlation(&p, &s).unwrap() - 1.0).abs() < 1e-12);
/// ```
pub fn matthews_correlation(prediction: &[f64], observation: &[f64]) -> Result<f64> {
    ensure_same_shape(prediction, observation)?;

    if prediction.is_empty() {
        return Ok(0.0);
    }

    let mean_p = mean(prediction);
    let mean_s = mean(observation);

    if mean_p == 0.0 || mean_s == 0.0 || is_constant(prediction) || is_constant(observation) {
        return Ok(0.0);
    }

    let mut covariance = 0.0;
    let mut var_p = 0.0;
    let mut var_s = 0.0;

    for (pi, si) in prediction.iter().zip(observation.iter()) {
        let dp = pi - mean_p;
        let ds = si - mean_s;
        covariance += ds * dp;
        var_p += dp * dp;
        var_s += ds * ds;
    }

    let denominator = (var_s * var_p).sqrt();
    if denominator == 0.0 {
        return Ok(0.0);
    }

    Ok(covariance / denominator)
}

/// Counts indices where both the prediction and the observation are zero.
///
/// This is the "no larger event" agreement count used to condition tail queries.
///
/// # Errors
/// Returns [`SimulationError::ShapeMismatch`] if the vectors differ in length.
pub fn true_positive_count(prediction: &[f64], observation: &[f64]) -> Result<usize> {
    ensure_same_shape(prediction, observation)?;

    Ok(prediction
        .iter()
        .zip(observation.iter())
        .filter(|&(&p, &s)| p == 0.0 && s == 0.0)
        .count())
}
