//! Conversion between file sample formats and the pipeline's fixed point.
//!
//! Inside the pipeline a sample is an `i32` with [`SAMPLE_FRAC_BITS`]
//! fractional bits, so full scale is `±1 << 28` and there are three bits of
//! headroom above it.

/// Fractional bits of a pipeline sample.
pub const SAMPLE_FRAC_BITS: u32 = 28;

/// Pipeline full scale, `1.0`.
pub const FULL_SCALE: i32 = 1 << SAMPLE_FRAC_BITS;

/// Shift between an integer PCM sample of `bits` and the pipeline format.
///
/// Positive means shift left going into the pipeline.
fn pcm_shift(bits: u16) -> i32 {
    // a `bits`-wide sample has `bits - 1` fractional bits
    SAMPLE_FRAC_BITS as i32 - (i32::from(bits) - 1)
}

/// Integer PCM sample of `bits` width to pipeline fixed point.
pub fn pcm_to_fixed(sample: i32, bits: u16) -> i32 {
    let shift = pcm_shift(bits);
    if shift >= 0 {
        sample << shift
    } else {
        sample >> -shift
    }
}

/// Pipeline fixed point to integer PCM of `bits` width, clipping at full scale.
pub fn fixed_to_pcm(sample: i32, bits: u16) -> i32 {
    let max = (1i64 << (bits - 1)) - 1;
    let min = -(1i64 << (bits - 1));
    let shift = pcm_shift(bits);
    let value = if shift >= 0 {
        i64::from(sample >> shift)
    } else {
        i64::from(sample) << -shift
    };
    value.clamp(min, max) as i32
}

/// Float sample (`1.0` full scale) to pipeline fixed point, saturating.
pub fn float_to_fixed(sample: f32) -> i32 {
    // float-to-int `as` casts saturate and map NaN to zero
    (f64::from(sample) * f64::from(FULL_SCALE)).round() as i32
}

/// Pipeline fixed point to float.
pub fn fixed_to_float(sample: i32) -> f32 {
    (f64::from(sample) / f64::from(FULL_SCALE)) as f32
}
