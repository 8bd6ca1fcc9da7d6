//! Error types for the MCC estimator and trial result queries.

use thiserror::Error;

/// Errors surfaced by the estimator and by aggregation queries over trial results.
///
/// A degenerate correlation (zero mean or zero variance in either vector) is not an
/// error; the estimator returns `0.0` for it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimulationError {
    /// Prediction and observation vectors have different lengths.
    #[error("shape mismatch: prediction has {prediction_len} entries, observation has {observation_len}")]
    ShapeMismatch {
        prediction_len: usize,
        observation_len: usize,
    },

    /// No trial satisfied the conditioning filter, so the tail fraction is undefined.
    #[error("empty sample: no trials with at least {min_true_positives} true positives")]
    EmptySample { min_true_positives: usize },
}

pub type Result<T> = std::result::Result<T, SimulationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shape_mismatch_message_names_both_lengths() {
        let err = SimulationError::ShapeMismatch {
            prediction_len: 2,
            observation_len: 3,
        };
        let msg = err.to_string();
        assert!(msg.contains("2 entries"), "message was {msg}");
        assert!(msg.contains("has 3"), "message was {msg}");
    }

    #[test]
    fn empty_sample_message_names_threshold() {
        let err = SimulationError::EmptySample {
            min_true_positives: 4,
        };
        assert!(err.to_string().contains("at least 4"));
    }
}
