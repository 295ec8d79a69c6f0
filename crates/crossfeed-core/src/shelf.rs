//! First-order shelving filter design.
//!
//! Produces the three coefficients of
//!
//! ```text
//! y[n] = c0 * x[n] + c1 * x[n-1] + c2 * y[n-1]
//! ```
//!
//! for a shelf whose gain is unity on one side of the corner and `gain` dB on
//! the other. The bilinear-transform prototype is
//!
//! ```text
//!          b0 + b1 z^-1
//! H(z) = ---------------      c0 = b0/a0, c1 = b1/a0, c2 = -a1/a0
//!          a0 + a1 z^-1
//! ```
//!
//! with, for a high shelf, `b0,b1 = sin(w/2) ± g cos(w/2)` and
//! `a0,a1 = sin(w/2) ± cos(w/2)/g`, where `g = 10^(gain/40)`. A low shelf swaps
//! the roles of sine and cosine. DC gain of a high shelf is exactly one and its
//! Nyquist gain is `g²`; a low shelf is the mirror image.
//!
//! Only `sin`/`cos` of the corner come from `libm`; the rest is fixed point so
//! the result is reproducible bit for bit.
//!
//! # Formats
//!
//! - corner frequency: unsigned 0.32 fraction of the sample rate
//!   (`0x8000_0000` is Nyquist)
//! - internal terms: s3.28
//! - output: Q4.27, range roughly ±16

use crate::fixed::{Q31_FRAC_BITS, frac_mul, frac_mul_shl, fp_div, saturate};
use crate::gain::linear_gain_q24;

/// Which side of the corner carries the gain.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShelfKind {
    /// Gain applies below the corner; unity above.
    Low,
    /// Gain applies above the corner; unity below.
    High,
}

/// Fractional bits of the shelf coefficients.
pub const SHELF_FRAC_BITS: u32 = 27;

/// Sine and cosine of a full-turn phase, both in Q31.
///
/// `phase` maps `0..2^32` onto `0..2π`.
pub fn sincos(phase: u32) -> (i32, i32) {
    let angle = f64::from(phase) * (core::f64::consts::TAU / 4_294_967_296.0);
    let scale = f64::from(1u32 << Q31_FRAC_BITS);
    let to_q31 = |v: f64| saturate(libm::round(v * scale) as i64);
    (to_q31(libm::sin(angle)), to_q31(libm::cos(angle)))
}

/// Design a first-order shelf.
///
/// # Arguments
/// * `cutoff` - Shelf midpoint as an unsigned 0.32 fraction of the sample rate
/// * `gain_tenths_db` - Shelf gain in tenths of a dB, at most ±24 dB
/// * `kind` - Low or high shelf
///
/// # Returns
/// `[c0, c1, c2]` in Q4.27.
pub fn shelf_coefs(cutoff: u32, gain_tenths_db: i32, kind: ShelfKind) -> [i32; 3] {
    // g = 10^(dB/40), s3.28
    let g = i64::from(linear_gain_q24(gain_tenths_db.saturating_mul(5))) << 4;
    let g = i64::from(saturate(g)).max(1);

    let (sin, cos) = sincos(cutoff / 2);

    let (b0, b1, a0, a1) = match kind {
        ShelfKind::Low => {
            let sin_div_g = fp_div(i64::from(sin), g, 25);
            let sin_g = i64::from(frac_mul(sin, g as i32));
            let cos = i64::from(cos >> 3);
            (sin_g + cos, sin_g - cos, sin_div_g + cos, sin_div_g - cos)
        }
        ShelfKind::High => {
            let cos_div_g = fp_div(i64::from(cos), g, 25);
            let cos_g = i64::from(frac_mul(cos, g as i32));
            let sin = i64::from(sin >> 3);
            (sin + cos_g, sin - cos_g, sin + cos_div_g, sin - cos_div_g)
        }
    };

    // 1/a0 in s2.29
    let rcp_a0 = saturate(fp_div(1, a0, 57));
    [
        frac_mul_shl(saturate(b0), rcp_a0, 1),
        frac_mul_shl(saturate(b1), rcp_a0, 1),
        frac_mul_shl(saturate(a1), rcp_a0, 1).saturating_neg(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn as_f64(c: [i32; 3]) -> [f64; 3] {
        let scale = f64::from(1u32 << SHELF_FRAC_BITS);
        c.map(|v| f64::from(v) / scale)
    }

    fn dc_gain(c: [f64; 3]) -> f64 {
        (c[0] + c[1]) / (1.0 - c[2])
    }

    fn nyquist_gain(c: [f64; 3]) -> f64 {
        (c[0] - c[1]) / (1.0 + c[2])
    }

    /// 700 Hz at 44.1 kHz as a 0.32 fraction.
    fn corner() -> u32 {
        (u32::MAX / 44_100) * 700
    }

    #[test]
    fn sincos_quadrants() {
        let (s, c) = sincos(0);
        assert_eq!(s, 0);
        assert_eq!(c, i32::MAX);
        let (s, c) = sincos(1 << 30);
        assert_eq!(s, i32::MAX);
        assert!(c.abs() < 2);
        let (s, c) = sincos(1 << 31);
        assert!(s.abs() < 2);
        assert_eq!(c, i32::MIN);
    }

    #[test]
    fn high_shelf_unity_at_dc() {
        let c = as_f64(shelf_coefs(corner(), -60, ShelfKind::High));
        assert!((dc_gain(c) - 1.0).abs() < 1e-3, "DC gain {}", dc_gain(c));
    }

    #[test]
    fn high_shelf_attenuates_nyquist() {
        let c = as_f64(shelf_coefs(corner(), -60, ShelfKind::High));
        let expected = libm::pow(10.0, -6.0 / 20.0);
        assert!(
            (nyquist_gain(c) - expected).abs() < 2e-3,
            "Nyquist gain {} vs {expected}",
            nyquist_gain(c)
        );
    }

    #[test]
    fn low_shelf_mirrors_high_shelf() {
        let c = as_f64(shelf_coefs(corner(), -60, ShelfKind::Low));
        let expected = libm::pow(10.0, -6.0 / 20.0);
        assert!((dc_gain(c) - expected).abs() < 2e-3, "DC gain {}", dc_gain(c));
        assert!((nyquist_gain(c) - 1.0).abs() < 1e-3);
    }

    #[test]
    fn zero_gain_is_flat() {
        let c = as_f64(shelf_coefs(corner(), 0, ShelfKind::High));
        // numerator equals denominator: c0 = 1 and the zero cancels the pole
        assert!((c[0] - 1.0).abs() < 1e-6, "c0 = {}", c[0]);
        assert!((c[1] + c[2]).abs() < 1e-6, "c1 = {}, c2 = {}", c[1], c[2]);
        assert!((dc_gain(c) - 1.0).abs() < 1e-4);
        assert!((nyquist_gain(c) - 1.0).abs() < 1e-4);
    }

    #[test]
    fn pole_inside_unit_circle() {
        for tenths in [-240, -160, -60, -10, 60, 240] {
            for hz in [200u32, 700, 2000, 8000] {
                let cutoff = (u32::MAX / 44_100) * hz;
                let c = as_f64(shelf_coefs(cutoff, tenths, ShelfKind::High));
                assert!(c[2].abs() < 1.0, "{tenths}/{hz}: c2 = {}", c[2]);
            }
        }
    }
}
