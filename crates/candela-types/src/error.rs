//! Error types for candela.

use thiserror::Error;

/// Result type alias for candela operations.
pub type Result<T> = std::result::Result<T, CandelaError>;

/// Errors surfaced at the analytics boundary.
///
/// Numeric degeneracies (division by zero, empty windows, zero volume) are
/// never reported here; every algorithm resolves them locally with a
/// documented convention.
#[derive(Error, Debug)]
pub enum CandelaError {
    /// A parameter was outside its legal domain.
    #[error("Invalid parameter `{name}`: {reason}")]
    InvalidParameter {
        /// Parameter name as the caller spelled it.
        name: &'static str,
        /// Human-readable description of the violated constraint.
        reason: String,
    },

    /// The input bars do not form a valid series.
    #[error(transparent)]
    Series(#[from] SeriesError),

    /// Unknown identifier (indicator, transform, timeframe, ...).
    #[error("Unknown {kind}: {value}")]
    Unknown {
        /// What kind of identifier was looked up.
        kind: &'static str,
        /// The rejected value.
        value: String,
    },

    /// Invalid data format.
    #[error("Parse error: {0}")]
    Parse(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CandelaError {
    /// Creates an [`CandelaError::InvalidParameter`].
    #[must_use]
    pub fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }

    /// Returns true if this error rejected a parameter.
    #[must_use]
    pub const fn is_invalid_parameter(&self) -> bool {
        matches!(self, Self::InvalidParameter { .. })
    }
}

/// Error for bar sequences that violate the series contract.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SeriesError {
    /// Timestamps must be strictly increasing.
    #[error("Bar {index} has time {current}, not after previous time {previous}")]
    NonIncreasingTime {
        /// Index of the offending bar.
        index: usize,
        /// Time of the preceding bar.
        previous: i64,
        /// Time of the offending bar.
        current: i64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_parameter_display() {
        let err = CandelaError::invalid("period", "must be at least 1");
        assert!(err.is_invalid_parameter());
        assert_eq!(
            err.to_string(),
            "Invalid parameter `period`: must be at least 1"
        );
    }

    #[test]
    fn test_series_error_is_transparent() {
        let err: CandelaError = SeriesError::NonIncreasingTime {
            index: 2,
            previous: 10,
            current: 10,
        }
        .into();
        assert_eq!(
            err.to_string(),
            "Bar 2 has time 10, not after previous time 10"
        );
    }
}
