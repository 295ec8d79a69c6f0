//! Per-sample crossfeed processing.
//!
//! [`SampleProcessor`] is the seam for alternative implementations of the hot
//! loop. [`ReferenceProcessor`] is the authoritative one; anything else must
//! produce identical samples and leave identical state, which the test suite
//! checks for [`SpanProcessor`].
//!
//! For each frame, with `c = filter` and `g = direct_gain`:
//!
//! ```text
//! old_l    = delay[i]                     // oldest stored left sample
//! cross_l  = c0*old_l + c1*l.x1 + c2*l.y1 // shelf
//! l.x1, l.y1 = old_l, cross_l
//! delay[i] = in_l;  i += 1
//! (same for the right channel at the new i, giving cross_r)
//! out_l    = g*in_l + cross_r             // crossfeed: opposite channel
//! out_r    = g*in_r + cross_l
//! if i == DELAY_LEN { i = 0 }
//! ```
//!
//! Multiplies truncate and sums saturate. Only the first
//! `min(left.len(), right.len())` samples are touched.

use crate::coefs::Coefficients;
use crate::delay::{ChannelHistory, DELAY_LEN, DelayLineState};
use crate::fixed::Q31;

/// A block-processing strategy for the crossfeed loop.
///
/// Implementations run on the audio thread and must not allocate or block.
pub trait SampleProcessor {
    /// Process `left`/`right` in place and advance `state`.
    fn process(
        &self,
        coefs: &Coefficients,
        state: &mut DelayLineState,
        left: &mut [i32],
        right: &mut [i32],
    );
}

/// Straightforward loop with a wrap check every frame.
#[derive(Clone, Copy, Debug, Default)]
pub struct ReferenceProcessor;

/// Processes runs of frames up to the next wrap point without checking the
/// cursor inside the run.
#[derive(Clone, Copy, Debug, Default)]
pub struct SpanProcessor;

/// Filter the delayed sample in `slot`, update history, and store `input`.
#[inline(always)]
fn filter_tap(
    slot: &mut i32,
    history: &mut ChannelHistory,
    filter: &[Q31; 3],
    input: i32,
) -> i32 {
    let old = *slot;
    let acc = filter[0]
        .scale(old)
        .saturating_add(filter[1].scale(history.prev_in))
        .saturating_add(filter[2].scale(history.prev_out));
    history.prev_out = acc;
    history.prev_in = old;
    *slot = input;
    acc
}

/// Mix the direct signal with the cross-fed one.
#[inline(always)]
fn mix(gain: Q31, direct: i32, cross: i32) -> i32 {
    gain.scale(direct).saturating_add(cross)
}

impl SampleProcessor for ReferenceProcessor {
    fn process(
        &self,
        coefs: &Coefficients,
        state: &mut DelayLineState,
        left: &mut [i32],
        right: &mut [i32],
    ) {
        let gain = coefs.direct_gain;
        let filter = &coefs.filter;
        let mut index = state.index;

        for (l, r) in left.iter_mut().zip(right.iter_mut()) {
            let (in_l, in_r) = (*l, *r);

            let cross_l = filter_tap(&mut state.delay[index], &mut state.left, filter, in_l);
            index += 1;
            let cross_r = filter_tap(&mut state.delay[index], &mut state.right, filter, in_r);
            index += 1;

            *l = mix(gain, in_l, cross_r);
            *r = mix(gain, in_r, cross_l);

            if index >= DELAY_LEN {
                index = 0;
            }
        }

        state.index = index;
    }
}

impl SampleProcessor for SpanProcessor {
    fn process(
        &self,
        coefs: &Coefficients,
        state: &mut DelayLineState,
        left: &mut [i32],
        right: &mut [i32],
    ) {
        let gain = coefs.direct_gain;
        let filter = &coefs.filter;
        let frames = left.len().min(right.len());
        let mut left = &mut left[..frames];
        let mut right = &mut right[..frames];

        while !left.is_empty() {
            // cursor is always even, so there is room for at least one frame
            let run = ((DELAY_LEN - state.index) / 2).min(left.len());
            let (l_run, l_rest) = core::mem::take(&mut left).split_at_mut(run);
            let (r_run, r_rest) = core::mem::take(&mut right).split_at_mut(run);
            let start = state.index;
            let slots = &mut state.delay[start..start + run * 2];

            for ((l, r), pair) in l_run
                .iter_mut()
                .zip(r_run.iter_mut())
                .zip(slots.chunks_exact_mut(2))
            {
                let (in_l, in_r) = (*l, *r);
                let cross_l = filter_tap(&mut pair[0], &mut state.left, filter, in_l);
                let cross_r = filter_tap(&mut pair[1], &mut state.right, filter, in_r);
                *l = mix(gain, in_l, cross_r);
                *r = mix(gain, in_r, cross_l);
            }

            let end = start + run * 2;
            state.index = if end >= DELAY_LEN { 0 } else { end };
            left = l_rest;
            right = r_rest;
        }
    }
}
