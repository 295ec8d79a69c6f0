//! Fixed-point arithmetic for the crossfeed signal path.
//!
//! Everything on the processing path is integer arithmetic. Three formats
//! appear, each with a named shift to move between them:
//!
//! | Format | Fractional bits | Used for |
//! |--------|-----------------|----------|
//! | [`Q31`] (s0.31) | 31 | direct gain, filter coefficients |
//! | Q8.24 (unsigned) | 24 | output of [`linear_gain_q24`](crate::gain::linear_gain_q24) |
//! | Q4.27 | 27 | output of [`shelf_coefs`](crate::shelf::shelf_coefs) |
//!
//! Audio samples are opaque `i32` values. Multiplying a sample by a [`Q31`]
//! keeps the sample's own format, so the processor does not care how many
//! fractional bits the host uses.
//!
//! # Rounding
//!
//! [`frac_mul`] truncates: the discarded low bits are removed with an
//! arithmetic shift, which rounds toward negative infinity. This introduces
//! a bias of at most one LSB per multiply. Results that do not fit in 32 bits
//! saturate instead of wrapping.

/// Fractional bits of [`Q31`].
pub const Q31_FRAC_BITS: u32 = 31;

/// Fractional bits of the unsigned Q8.24 gain format.
pub const Q24_FRAC_BITS: u32 = 24;

/// Unity in Q8.24.
pub const Q24_ONE: u32 = 1 << Q24_FRAC_BITS;

/// Left shift taking a Q8.24 value to Q31.
pub const Q24_TO_Q31_SHIFT: u32 = Q31_FRAC_BITS - Q24_FRAC_BITS;

/// Left shift taking a Q4.27 value to Q31.
pub const Q27_TO_Q31_SHIFT: u32 = 4;

/// Signed fixed-point value with 31 fractional bits, covering [-1, 1).
///
/// "One" is not representable; [`Q31::MAX`] (`1 - 2^-31`) stands in for it
/// and is what saturating conversions produce for any value ≥ 1.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Q31(i32);

impl Q31 {
    /// Zero.
    pub const ZERO: Self = Self(0);
    /// Largest representable value, `1 - 2^-31`.
    pub const MAX: Self = Self(i32::MAX);
    /// Smallest representable value, `-1`.
    pub const MIN: Self = Self(i32::MIN);

    /// Wrap raw bits.
    pub const fn from_bits(bits: i32) -> Self {
        Self(bits)
    }

    /// Raw bits.
    pub const fn to_bits(self) -> i32 {
        self.0
    }

    /// Convert an unsigned Q8.24 gain, clamping anything ≥ 1.0 to [`Q31::MAX`].
    pub const fn from_q24(value: u32) -> Self {
        if value >= Q24_ONE {
            Self::MAX
        } else {
            // value < 2^24, so the shifted result stays below 2^31
            Self((value << Q24_TO_Q31_SHIFT) as i32)
        }
    }

    /// Convert a Q4.27 value, saturating outside [-1, 1).
    pub fn from_q27(value: i32) -> Self {
        Self(saturate(i64::from(value) << Q27_TO_Q31_SHIFT))
    }

    /// Multiply a sample by this value. See [`frac_mul`].
    #[inline]
    pub fn scale(self, sample: i32) -> i32 {
        frac_mul(sample, self.0)
    }

    /// Approximate floating-point value. Not for use on the processing path.
    pub fn to_f64(self) -> f64 {
        f64::from(self.0) / f64::from(1u32 << Q31_FRAC_BITS)
    }

    /// Nearest Q31 to `value`, saturating outside [-1, 1).
    ///
    /// Intended for tools and tests; the processing path never touches floats.
    pub fn from_f64(value: f64) -> Self {
        // float-to-int `as` casts saturate
        Self(libm::round(value * f64::from(1u32 << Q31_FRAC_BITS)) as i32)
    }
}

/// Clamp a 64-bit intermediate into `i32`.
#[inline]
pub fn saturate(value: i64) -> i32 {
    if value > i64::from(i32::MAX) {
        i32::MAX
    } else if value < i64::from(i32::MIN) {
        i32::MIN
    } else {
        value as i32
    }
}

/// Fractional multiply: `(a * b) >> 31`, truncating, saturating.
///
/// With `b` in Q31 the result has the same format as `a`. The only product
/// that overflows is `i32::MIN * i32::MIN`, which saturates to `i32::MAX`.
#[inline]
pub fn frac_mul(a: i32, b: i32) -> i32 {
    saturate((i64::from(a) * i64::from(b)) >> Q31_FRAC_BITS)
}

/// Fractional multiply with a left shift folded in: `(a * b) >> (31 - shift)`.
///
/// Used to rescale between formats in one step, e.g. a Q4.27 coefficient times
/// a Q31 gain with `shift = 4` yields Q31.
#[inline]
pub fn frac_mul_shl(a: i32, b: i32, shift: u32) -> i32 {
    debug_assert!(shift < Q31_FRAC_BITS);
    saturate((i64::from(a) * i64::from(b)) >> (Q31_FRAC_BITS - shift))
}

/// Fixed-point divide: `(a << frac_bits) / b`.
///
/// The result carries `frac_bits` more fractional bits than `a` has over `b`.
/// Division by zero returns the extreme of the matching sign instead of
/// panicking.
#[inline]
pub fn fp_div(a: i64, b: i64, frac_bits: u32) -> i64 {
    if b == 0 {
        return if a < 0 { i64::MIN } else { i64::MAX };
    }
    (a << frac_bits) / b
}
