//! Control surface for the crossfeed stage.
//!
//! [`CrossfeedControl`] is what settings code and user interfaces talk to. It
//! translates user-facing values into fixed-point coefficients and publishes
//! them through the stage's [`SharedCoefficients`], so it can live on any
//! thread. Cloning is cheap and every clone drives the same stage at the same
//! rate.

#[cfg(not(feature = "std"))]
use alloc::sync::Arc;
#[cfg(feature = "std")]
use std::sync::Arc;

use core::sync::atomic::{AtomicBool, AtomicI32, AtomicU32, Ordering};

use crate::coefs::{Coefficients, NATIVE_FREQUENCY, cross_filter, direct_gain_from_db};
use crate::fixed::Q31;
use crate::params::SharedCoefficients;

/// The rate and the last cross-path request, kept so the corner can be
/// re-normalized when the rate changes.
///
/// Only written inside [`SharedCoefficients::modify`]; the sequence lock
/// orders the writes.
#[derive(Debug)]
struct Tuning {
    native_frequency: AtomicU32,
    lf_tenths_db: AtomicI32,
    hf_tenths_db: AtomicI32,
    cutoff_hz: AtomicU32,
    cross_set: AtomicBool,
}

impl Tuning {
    fn new(native_frequency: u32) -> Self {
        Self {
            native_frequency: AtomicU32::new(native_frequency),
            lf_tenths_db: AtomicI32::new(0),
            hf_tenths_db: AtomicI32::new(0),
            cutoff_hz: AtomicU32::new(0),
            cross_set: AtomicBool::new(false),
        }
    }

    fn filter_at(&self, native_frequency: u32) -> [Q31; 3] {
        cross_filter(
            self.lf_tenths_db.load(Ordering::Relaxed),
            self.hf_tenths_db.load(Ordering::Relaxed),
            self.cutoff_hz.load(Ordering::Relaxed),
            native_frequency,
        )
    }
}

fn nonzero_rate(native_frequency: u32) -> u32 {
    if native_frequency == 0 {
        NATIVE_FREQUENCY
    } else {
        native_frequency
    }
}

/// Handle for changing crossfeed parameters.
#[derive(Clone, Debug)]
pub struct CrossfeedControl {
    shared: Arc<SharedCoefficients>,
    tuning: Arc<Tuning>,
}

impl CrossfeedControl {
    /// Control a stage through `shared`, at [`NATIVE_FREQUENCY`].
    pub fn new(shared: Arc<SharedCoefficients>) -> Self {
        Self::with_native_frequency(shared, NATIVE_FREQUENCY)
    }

    /// Control a stage whose pipeline runs at `native_frequency` Hz.
    ///
    /// Only the corner frequency translation depends on the rate. A rate of
    /// zero falls back to [`NATIVE_FREQUENCY`].
    pub fn with_native_frequency(shared: Arc<SharedCoefficients>, native_frequency: u32) -> Self {
        Self {
            shared,
            tuning: Arc::new(Tuning::new(nonzero_rate(native_frequency))),
        }
    }

    /// The cell this handle publishes into.
    pub fn shared(&self) -> &Arc<SharedCoefficients> {
        &self.shared
    }

    /// Sample rate used to normalize the corner frequency.
    pub fn native_frequency(&self) -> u32 {
        self.tuning.native_frequency.load(Ordering::Relaxed)
    }

    /// Move to a new pipeline rate, for this handle and all its clones.
    ///
    /// If cross params were set, the filter is translated again so the corner
    /// stays at the same frequency in Hz. A rate of zero falls back to
    /// [`NATIVE_FREQUENCY`].
    pub fn set_native_frequency(&self, native_frequency: u32) {
        let native_frequency = nonzero_rate(native_frequency);
        let tuning = &self.tuning;
        self.shared.modify(|c| {
            let old = tuning
                .native_frequency
                .swap(native_frequency, Ordering::Relaxed);
            if old != native_frequency && tuning.cross_set.load(Ordering::Relaxed) {
                c.filter = tuning.filter_at(native_frequency);
            }
        });
        #[cfg(feature = "tracing")]
        tracing::debug!(native_frequency, "crossfeed: native frequency");
    }

    /// Request crossfeed on or off.
    ///
    /// The request is picked up by the stage's owner, which forwards it to
    /// the host; see [`CrossfeedStage::sync_enable`](crate::stage::CrossfeedStage::sync_enable).
    pub fn enable_crossfeed(&self, enable: bool) {
        #[cfg(feature = "tracing")]
        tracing::debug!(enable, "crossfeed: enable requested");
        self.shared.set_enabled(enable);
    }

    /// Whether crossfeed is currently requested.
    pub fn is_enabled(&self) -> bool {
        self.shared.enabled()
    }

    /// Set the direct path gain in tenths of a dB.
    ///
    /// Anything at or above 0 dB clamps to unity. The filter is untouched.
    pub fn set_direct_gain(&self, gain_tenths_db: i32) {
        let gain = direct_gain_from_db(gain_tenths_db);
        self.shared.modify(|c| c.direct_gain = gain);
        #[cfg(feature = "tracing")]
        tracing::debug!(
            gain_tenths_db,
            q31 = gain.to_bits(),
            "crossfeed: direct gain"
        );
    }

    /// Set the cross path: gain below and above the corner (tenths of a dB,
    /// both ≤ 0) and the corner frequency in Hz. The direct gain is untouched.
    pub fn set_cross_params(&self, lf_tenths_db: i32, hf_tenths_db: i32, cutoff_hz: u32) {
        let tuning = &self.tuning;
        self.shared.modify(|c| {
            tuning.lf_tenths_db.store(lf_tenths_db, Ordering::Relaxed);
            tuning.hf_tenths_db.store(hf_tenths_db, Ordering::Relaxed);
            tuning.cutoff_hz.store(cutoff_hz, Ordering::Relaxed);
            tuning.cross_set.store(true, Ordering::Relaxed);
            c.filter = tuning.filter_at(tuning.native_frequency.load(Ordering::Relaxed));
        });
        #[cfg(feature = "tracing")]
        tracing::debug!(
            lf_tenths_db,
            hf_tenths_db,
            cutoff_hz,
            native_frequency = self.native_frequency(),
            "crossfeed: cross params"
        );
    }

    /// The most recently published coefficients.
    ///
    /// Waits out a write in progress; meant for tools, not the audio thread.
    pub fn coefficients(&self) -> Coefficients {
        self.shared.read().1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn control() -> CrossfeedControl {
        CrossfeedControl::new(Arc::new(SharedCoefficients::default()))
    }

    #[test]
    fn starts_silent_and_disabled() {
        let c = control();
        assert_eq!(c.coefficients(), Coefficients::SILENT);
        assert!(!c.is_enabled());
        assert_eq!(c.native_frequency(), NATIVE_FREQUENCY);
    }

    #[test]
    fn direct_gain_leaves_filter_alone() {
        let c = control();
        c.set_cross_params(-60, -220, 700);
        let filter = c.coefficients().filter;
        c.set_direct_gain(-15);
        assert_eq!(c.coefficients().filter, filter);
        assert_eq!(c.coefficients().direct_gain, direct_gain_from_db(-15));
    }

    #[test]
    fn cross_params_leave_direct_gain_alone() {
        let c = control();
        c.set_direct_gain(-60);
        c.set_cross_params(-60, -220, 700);
        assert_eq!(c.coefficients().direct_gain, direct_gain_from_db(-60));
        assert_eq!(
            c.coefficients().filter,
            cross_filter(-60, -220, 700, NATIVE_FREQUENCY)
        );
    }

    #[test]
    fn large_gains_all_clamp_to_the_same_value() {
        let c = control();
        for tenths in [0, 1, 60, 10_000, i32::MAX] {
            c.set_direct_gain(tenths);
            assert_eq!(c.coefficients().direct_gain, Q31::MAX, "{tenths}");
        }
    }

    #[test]
    fn clones_share_state() {
        let a = control();
        let b = a.clone();
        a.enable_crossfeed(true);
        a.set_direct_gain(-30);
        assert!(b.is_enabled());
        assert_eq!(b.coefficients(), a.coefficients());
    }

    #[test]
    fn native_frequency_moves_the_corner() {
        let shared = Arc::new(SharedCoefficients::default());
        let at_48k = CrossfeedControl::with_native_frequency(Arc::clone(&shared), 48_000);
        at_48k.set_cross_params(-60, -220, 700);
        assert_ne!(
            at_48k.coefficients().filter,
            cross_filter(-60, -220, 700, NATIVE_FREQUENCY)
        );
    }

    #[test]
    fn rate_change_retranslates_cross_filter() {
        let c = control();
        c.set_direct_gain(-15);
        c.set_cross_params(-60, -220, 700);
        let other = c.clone();
        c.set_native_frequency(96_000);

        assert_eq!(other.native_frequency(), 96_000);
        let coefs = c.coefficients();
        assert_eq!(coefs.filter, cross_filter(-60, -220, 700, 96_000));
        assert_eq!(coefs.direct_gain, direct_gain_from_db(-15));

        // later requests translate at the new rate too
        other.set_cross_params(-45, -205, 900);
        assert_eq!(c.coefficients().filter, cross_filter(-45, -205, 900, 96_000));
    }

    #[test]
    fn rate_change_before_cross_params_keeps_filter() {
        let c = control();
        c.set_native_frequency(48_000);
        assert_eq!(c.coefficients(), Coefficients::SILENT);
        c.set_native_frequency(0);
        assert_eq!(c.native_frequency(), NATIVE_FREQUENCY);
    }

    #[test]
    fn zero_rate_falls_back_to_native() {
        let c = CrossfeedControl::with_native_frequency(Arc::new(SharedCoefficients::default()), 0);
        assert_eq!(c.native_frequency(), NATIVE_FREQUENCY);
    }
}
