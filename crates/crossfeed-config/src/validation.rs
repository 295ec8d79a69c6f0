//! Range checks for crossfeed settings.
//!
//! The core assumes cross-path gains are at most 0 dB and does not check.
//! Everything that reaches it from a file or the command line goes through
//! here first.

use std::ops::RangeInclusive;
use thiserror::Error;

/// Allowed direct gain, tenths of a dB.
pub const DIRECT_GAIN_RANGE: RangeInclusive<i32> = -60..=0;

/// Allowed cross gain, tenths of a dB.
pub const CROSS_GAIN_RANGE: RangeInclusive<i32> = -120..=-30;

/// Allowed extra high-frequency attenuation, tenths of a dB.
pub const HF_ATTENUATION_RANGE: RangeInclusive<i32> = -240..=-60;

/// Allowed corner frequency, Hz.
pub const HF_CUTOFF_RANGE: RangeInclusive<u32> = 500..=2000;

/// Validation error types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Parameter value out of range.
    #[error("parameter '{param}' value {value} out of range [{min}, {max}]")]
    OutOfRange {
        /// Name of the parameter.
        param: &'static str,
        /// The value that was out of range.
        value: i64,
        /// Minimum allowed value.
        min: i64,
        /// Maximum allowed value.
        max: i64,
    },

    /// Multiple validation errors.
    #[error("multiple validation errors: {}", .0.iter().map(|e| e.to_string()).collect::<Vec<_>>().join("; "))]
    Multiple(Vec<ValidationError>),
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Check one value against its range.
pub fn check_range<T>(param: &'static str, value: T, range: &RangeInclusive<T>) -> ValidationResult<()>
where
    T: PartialOrd + Copy + Into<i64>,
{
    if range.contains(&value) {
        Ok(())
    } else {
        Err(ValidationError::OutOfRange {
            param,
            value: value.into(),
            min: (*range.start()).into(),
            max: (*range.end()).into(),
        })
    }
}

/// Fold individual results into one, keeping every failure.
pub fn collect(results: impl IntoIterator<Item = ValidationResult<()>>) -> ValidationResult<()> {
    let mut errors: Vec<ValidationError> = results.into_iter().filter_map(Result::err).collect();
    match errors.len() {
        0 => Ok(()),
        1 => Err(errors.remove(0)),
        _ => Err(ValidationError::Multiple(errors)),
    }
}
