//! Property-based tests for crossfeed-core.
//!
//! Covers processor equivalence, cursor bounds, silence preservation, and the
//! guarantee that only the processed prefix of each channel changes.

use crossfeed_core::{
    Coefficients, DELAY_LEN, DelayLineState, Q31, ReferenceProcessor, SampleProcessor,
    SpanProcessor, direct_gain_from_db,
};
use proptest::prelude::*;

/// Coefficients from the ranges a validated configuration allows.
fn coefficients() -> impl Strategy<Value = Coefficients> {
    (-60i32..=0, -120i32..=-30, -240i32..=-60, 500u32..=2000).prop_map(
        |(direct, cross, atten, cutoff)| Coefficients::from_db(direct, cross, cross + atten, cutoff),
    )
}

/// Arbitrary raw coefficients, including extreme ones.
fn raw_coefficients() -> impl Strategy<Value = Coefficients> {
    (any::<i32>(), any::<[i32; 3]>()).prop_map(|(g, f)| Coefficients {
        direct_gain: Q31::from_bits(g),
        filter: f.map(Q31::from_bits),
    })
}

/// Block boundaries splitting `len` samples.
fn splits(len: usize) -> impl Strategy<Value = Vec<usize>> {
    prop::collection::vec(0..=len, 0..6).prop_map(move |mut cuts| {
        cuts.push(0);
        cuts.push(len);
        cuts.sort_unstable();
        cuts
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    /// The span processor produces the same samples and state as the reference
    /// for any input, coefficients, and block split.
    #[test]
    fn span_equals_reference(
        coefs in prop_oneof![coefficients(), raw_coefficients()],
        (left, right, cuts) in (1usize..200).prop_flat_map(|len| (
            prop::collection::vec(any::<i32>(), len),
            prop::collection::vec(any::<i32>(), len),
            splits(len),
        )),
    ) {
        let (mut ref_l, mut ref_r) = (left.clone(), right.clone());
        let (mut span_l, mut span_r) = (left, right);
        let mut ref_state = DelayLineState::new();
        let mut span_state = DelayLineState::new();

        for w in cuts.windows(2) {
            let (s, e) = (w[0], w[1]);
            ReferenceProcessor.process(&coefs, &mut ref_state, &mut ref_l[s..e], &mut ref_r[s..e]);
            SpanProcessor.process(&coefs, &mut span_state, &mut span_l[s..e], &mut span_r[s..e]);
        }

        prop_assert_eq!(ref_l, span_l);
        prop_assert_eq!(ref_r, span_r);
        prop_assert_eq!(ref_state, span_state);
    }

    /// The cursor stays in range and advances two slots per frame.
    #[test]
    fn cursor_in_range(
        coefs in coefficients(),
        blocks in prop::collection::vec(0usize..64, 1..10),
    ) {
        let mut state = DelayLineState::new();
        let mut frames = 0usize;
        for len in blocks {
            let mut left = vec![1 << 20; len];
            let mut right = vec![-(1 << 20); len];
            ReferenceProcessor.process(&coefs, &mut state, &mut left, &mut right);
            frames += len;
            prop_assert!(state.index() < DELAY_LEN);
            prop_assert_eq!(state.index(), (frames * 2) % DELAY_LEN);
        }
    }

    /// From a flushed state, silence in gives silence out.
    #[test]
    fn silence_stays_silent(coefs in coefficients(), len in 0usize..500) {
        let mut state = DelayLineState::new();
        let mut left = vec![0; len];
        let mut right = vec![0; len];
        SpanProcessor.process(&coefs, &mut state, &mut left, &mut right);
        prop_assert!(left.iter().all(|&s| s == 0));
        prop_assert!(right.iter().all(|&s| s == 0));
        prop_assert!(state.is_silent());
    }

    /// Only the first `min(len_l, len_r)` samples of each channel change.
    #[test]
    fn only_common_prefix_is_touched(
        coefs in coefficients(),
        left in prop::collection::vec(-(1i32 << 28)..(1 << 28), 0..100),
        right in prop::collection::vec(-(1i32 << 28)..(1 << 28), 0..100),
    ) {
        let n = left.len().min(right.len());
        let (mut out_l, mut out_r) = (left.clone(), right.clone());
        let mut state = DelayLineState::new();
        ReferenceProcessor.process(&coefs, &mut state, &mut out_l, &mut out_r);

        prop_assert_eq!(out_l.len(), left.len());
        prop_assert_eq!(out_r.len(), right.len());
        prop_assert_eq!(&out_l[n..], &left[n..]);
        prop_assert_eq!(&out_r[n..], &right[n..]);
        prop_assert_eq!(state.index(), (n * 2) % DELAY_LEN);
    }

    /// Flushing any state twice is the same as flushing it once.
    #[test]
    fn flush_idempotent(
        coefs in coefficients(),
        input in prop::collection::vec(any::<i32>(), 1..64),
    ) {
        let mut state = DelayLineState::new();
        let mut left = input.clone();
        let mut right = input;
        ReferenceProcessor.process(&coefs, &mut state, &mut left, &mut right);
        state.flush();
        let once = state.clone();
        state.flush();
        prop_assert_eq!(&state, &once);
        prop_assert_eq!(state, DelayLineState::new());
    }

    /// Direct gains at or above 0 dB all clamp to the same value.
    #[test]
    fn large_direct_gain_clamps(tenths in 0i32..=i32::MAX) {
        prop_assert_eq!(direct_gain_from_db(tenths), Q31::MAX);
    }

    /// Validated settings always yield a stable cross-path pole.
    #[test]
    fn pole_is_stable(coefs in coefficients()) {
        prop_assert!(coefs.filter[2].to_f64().abs() < 1.0);
    }
}
