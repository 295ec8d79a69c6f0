//! Translation from user-facing parameters to fixed-point coefficients.
//!
//! The control surface speaks in tenths of a dB and Hz; the processor wants a
//! [`Q31`] direct gain and three [`Q31`] filter taps. This module is the only
//! place the two meet.
//!
//! # Caller contract
//!
//! Cross-path gains (`lf`, `hf`) are expected to be ≤ 0 dB. The translation
//! relies on that to shift coefficients into Q31 without overflow. Out-of-range
//! values are not rejected here; they saturate and the filter stops
//! meaning what was asked for. Validation belongs one layer up.

use crate::fixed::{Q27_TO_Q31_SHIFT, Q31, frac_mul_shl, fp_div, saturate};
use crate::gain::{linear_gain_q24, tenths_to_hundredths};
use crate::shelf::{ShelfKind, shelf_coefs};

/// The pipeline's fixed native sample rate in Hz.
pub const NATIVE_FREQUENCY: u32 = 44_100;

/// Fractional bits used when dividing the corner by the half-gain factor.
const CORNER_DIV_BITS: u32 = 24;

/// Everything the processor needs besides its own history.
///
/// Copied as a unit so a reader never mixes old and new values.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Coefficients {
    /// Linear gain of the un-delayed signal.
    pub direct_gain: Q31,
    /// `[c0, c1, c2]` of the cross-path shelf, LF gain folded in.
    pub filter: [Q31; 3],
}

impl Coefficients {
    /// All-zero coefficients: silence in, silence out.
    pub const SILENT: Self = Self {
        direct_gain: Q31::ZERO,
        filter: [Q31::ZERO; 3],
    };

    /// Cross path passes the delayed sample through unfiltered at (almost) unity.
    pub const fn unfiltered(direct_gain: Q31) -> Self {
        Self {
            direct_gain,
            filter: [Q31::MAX, Q31::ZERO, Q31::ZERO],
        }
    }

    /// Build a full set from user-facing values at [`NATIVE_FREQUENCY`].
    ///
    /// # Arguments
    /// * `direct_tenths_db` - Direct path gain
    /// * `lf_tenths_db` - Cross path gain below the corner (≤ 0)
    /// * `hf_tenths_db` - Cross path gain above the corner (≤ 0)
    /// * `cutoff_hz` - Corner frequency (the −3 dB point of the shelf)
    pub fn from_db(
        direct_tenths_db: i32,
        lf_tenths_db: i32,
        hf_tenths_db: i32,
        cutoff_hz: u32,
    ) -> Self {
        Self {
            direct_gain: direct_gain_from_db(direct_tenths_db),
            filter: cross_filter(lf_tenths_db, hf_tenths_db, cutoff_hz, NATIVE_FREQUENCY),
        }
    }
}

/// Direct-path gain from tenths of a dB.
///
/// Anything at or above 0 dB clamps to [`Q31::MAX`], however far over.
pub fn direct_gain_from_db(gain_tenths_db: i32) -> Q31 {
    Q31::from_q24(linear_gain_q24(tenths_to_hundredths(gain_tenths_db)))
}

/// Cross-path shelf taps from low/high gains and a corner frequency.
///
/// The corner is moved from the shelf midpoint to the −3 dB point by dividing
/// it by `10^((hf - lf) / 40)`, then the shelf is designed for the gain
/// difference and scaled by the LF gain.
pub fn cross_filter(
    lf_tenths_db: i32,
    hf_tenths_db: i32,
    cutoff_hz: u32,
    native_frequency: u32,
) -> [Q31; 3] {
    let scaler = direct_gain_from_db(lf_tenths_db).to_bits();

    let cutoff = (u32::MAX / native_frequency.max(1)).saturating_mul(cutoff_hz);
    let shelf_gain = hf_tenths_db.saturating_sub(lf_tenths_db);
    let half_gain = linear_gain_q24(shelf_gain.saturating_mul(5));
    let cutoff = fp_div(i64::from(cutoff), i64::from(half_gain), CORNER_DIV_BITS)
        .clamp(0, i64::from(u32::MAX)) as u32;

    let [c0, c1, c2] = shelf_coefs(cutoff, shelf_gain, ShelfKind::High);
    [
        Q31::from_bits(frac_mul_shl(c0, scaler, Q27_TO_Q31_SHIFT)),
        Q31::from_bits(frac_mul_shl(c1, scaler, Q27_TO_Q31_SHIFT)),
        Q31::from_bits(saturate(i64::from(c2) << Q27_TO_Q31_SHIFT)),
    ]
}
