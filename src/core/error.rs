use thiserror::Error;

/// Errors surfaced by the hedging engine.
///
/// Ingestion and matrix failures abort the whole call: no partial results
/// are ever returned alongside one of these.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum HedgeError {
    /// A historical data row could not be parsed. `line` is 1-based.
    #[error("line {line}: {message}")]
    Validation { line: usize, message: String },

    #[error("price range probabilities sum to {total:.4}%, expected 100% (±0.01)")]
    ProbabilityMismatch { total: f64 },

    #[error("configuration error: {0}")]
    Configuration(String),

    /// A pricing formula produced NaN or infinity.
    #[error("non-finite value produced by {context}")]
    Numeric { context: String },

    #[error("export failed: {0}")]
    Export(String),
}

pub type HedgeResult<T> = Result<T, HedgeError>;

impl From<csv::Error> for HedgeError {
    fn from(err: csv::Error) -> Self {
        Self::Export(err.to_string())
    }
}

impl From<std::io::Error> for HedgeError {
    fn from(err: std::io::Error) -> Self {
        Self::Export(err.to_string())
    }
}

impl HedgeError {
    pub fn validation(line: usize, message: impl Into<String>) -> Self {
        Self::Validation {
            line,
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_message_carries_line() {
        let err = HedgeError::validation(7, "invalid date 'abc'");
        assert_eq!(err.to_string(), "line 7: invalid date 'abc'");
    }

    #[test]
    fn test_probability_mismatch_message() {
        let err = HedgeError::ProbabilityMismatch { total: 90.0 };
        assert!(err.to_string().contains("90.0000%"));
    }
}
