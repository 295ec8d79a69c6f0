//! Decibel to linear gain conversion.
//!
//! Gains arrive from the control surface as integers (tenths or hundredths of
//! a dB) and leave as unsigned Q8.24 factors. The conversion runs on the
//! control path only, so it may use `libm`; its output is what the fixed-point
//! translator consumes.
//!
//! ```rust
//! use crossfeed_core::gain::linear_gain_q24;
//! use crossfeed_core::fixed::Q24_ONE;
//!
//! assert_eq!(linear_gain_q24(0), Q24_ONE);
//! // -6.02 dB is very close to one half
//! let half = linear_gain_q24(-602);
//! assert!((half as i64 - (Q24_ONE / 2) as i64).abs() < 1000);
//! ```

use crate::fixed::Q24_ONE;

/// Convert a gain in hundredths of a dB to an unsigned Q8.24 linear factor.
///
/// `10^(db / 20)` scaled by `2^24` and rounded. Zero maps exactly to unity.
/// Gains too large for the format saturate at `u32::MAX` (about +48 dB);
/// very small gains round to zero.
pub fn linear_gain_q24(db_hundredths: i32) -> u32 {
    if db_hundredths == 0 {
        return Q24_ONE;
    }
    let linear = libm::pow(10.0, f64::from(db_hundredths) / 2000.0);
    // float-to-int `as` casts saturate, including +inf
    libm::round(linear * f64::from(Q24_ONE)) as u32
}

/// Convert tenths of a dB to hundredths, saturating.
#[inline]
pub fn tenths_to_hundredths(db_tenths: i32) -> i32 {
    db_tenths.saturating_mul(10)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn as_linear(q24: u32) -> f64 {
        f64::from(q24) / f64::from(Q24_ONE)
    }

    #[test]
    fn unity_at_zero_db() {
        assert_eq!(linear_gain_q24(0), Q24_ONE);
    }

    #[test]
    fn six_db_steps() {
        let down = as_linear(linear_gain_q24(-600));
        assert!((down - 0.501_187).abs() < 1e-5, "got {down}");
        let up = as_linear(linear_gain_q24(600));
        assert!((up - 1.995_262).abs() < 1e-5, "got {up}");
    }

    #[test]
    fn monotonic_over_attenuation_range() {
        let mut prev = linear_gain_q24(0);
        for db in (-4800..0).rev().step_by(50) {
            let g = linear_gain_q24(db);
            assert!(g <= prev, "{db}: {g} > {prev}");
            prev = g;
        }
    }

    #[test]
    fn huge_gain_saturates() {
        assert_eq!(linear_gain_q24(i32::MAX), u32::MAX);
        assert_eq!(linear_gain_q24(10_000), u32::MAX);
    }

    #[test]
    fn huge_attenuation_rounds_to_zero() {
        assert_eq!(linear_gain_q24(i32::MIN), 0);
    }

    #[test]
    fn tenths_conversion_saturates() {
        assert_eq!(tenths_to_hundredths(-15), -150);
        assert_eq!(tenths_to_hundredths(i32::MAX), i32::MAX);
    }
}
