//! Parameter validation shared by every analytics entry point.
//!
//! Invalid parameters are rejected before any computation starts and are
//! never clamped.

use crate::{CandelaError, Result};

/// Validates a window length.
///
/// # Errors
///
/// Returns [`CandelaError::InvalidParameter`] when `period` is zero.
pub fn require_period(name: &'static str, period: usize) -> Result<usize> {
    if period == 0 {
        return Err(CandelaError::invalid(name, "must be at least 1"));
    }
    Ok(period)
}

/// Validates a strictly positive, finite quantity (box size, row size, ...).
///
/// # Errors
///
/// Returns [`CandelaError::InvalidParameter`] for zero, negative, NaN or
/// infinite values.
pub fn require_positive(name: &'static str, value: f64) -> Result<f64> {
    if !value.is_finite() || value <= 0.0 {
        return Err(CandelaError::invalid(
            name,
            format!("must be a positive finite number, got {value}"),
        ));
    }
    Ok(value)
}

/// Validates a non-negative, finite quantity.
///
/// # Errors
///
/// Returns [`CandelaError::InvalidParameter`] for negative, NaN or infinite
/// values.
pub fn require_non_negative(name: &'static str, value: f64) -> Result<f64> {
    if !value.is_finite() || value < 0.0 {
        return Err(CandelaError::invalid(
            name,
            format!("must be a non-negative finite number, got {value}"),
        ));
    }
    Ok(value)
}

/// Validates a percentage in `(0, 100]`.
///
/// # Errors
///
/// Returns [`CandelaError::InvalidParameter`] outside that interval.
pub fn require_percentage(name: &'static str, value: f64) -> Result<f64> {
    if !(value > 0.0 && value <= 100.0) {
        return Err(CandelaError::invalid(
            name,
            format!("must be in (0, 100], got {value}"),
        ));
    }
    Ok(value)
}

/// Validates that `fast < slow` for paired-period indicators.
///
/// # Errors
///
/// Returns [`CandelaError::InvalidParameter`] when the fast period is not
/// shorter than the slow one.
pub fn require_ordered(name: &'static str, fast: usize, slow: usize) -> Result<()> {
    if fast >= slow {
        return Err(CandelaError::invalid(
            name,
            format!("fast period {fast} must be shorter than slow period {slow}"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_period() {
        assert_eq!(require_period("period", 14).unwrap(), 14);
        assert!(require_period("period", 0).unwrap_err().is_invalid_parameter());
    }

    #[test]
    fn test_positive() {
        assert!(require_positive("box_size", 0.5).is_ok());
        assert!(require_positive("box_size", 0.0).is_err());
        assert!(require_positive("box_size", -1.0).is_err());
        assert!(require_positive("box_size", f64::NAN).is_err());
        assert!(require_positive("box_size", f64::INFINITY).is_err());
    }

    #[test]
    fn test_percentage_bounds() {
        assert!(require_percentage("value_area_pct", 100.0).is_ok());
        assert!(require_percentage("value_area_pct", 0.01).is_ok());
        assert!(require_percentage("value_area_pct", 0.0).is_err());
        assert!(require_percentage("value_area_pct", 100.5).is_err());
        assert!(require_percentage("value_area_pct", f64::NAN).is_err());
    }

    #[test]
    fn test_ordered() {
        assert!(require_ordered("macd", 12, 26).is_ok());
        assert!(require_ordered("macd", 26, 26).is_err());
    }
}
