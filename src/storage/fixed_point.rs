//! Fixed-point encoding for stored samples.
//!
//! Readings are kept as hundredths of a unit (0.01 °C, 0.01 %RH) in a small
//! signed integer so a year of history for two quantities fits in a few KB of
//! suspend-surviving RAM. The integer width is a type parameter; the
//! composition root picks it once (see [`crate::Compact`]).

use core::fmt;

/// Scale between physical units and the stored integer.
pub const SCALE: f32 = 100.0;

/// Compact integer type a sample can be stored as.
///
/// Arithmetic on samples (sums, two-element means) is carried out in `i64`
/// through [`widen`](CompactSample::widen) and [`narrow`](CompactSample::narrow)
/// so it cannot overflow for any buffer the cascade holds.
pub trait CompactSample: Copy + Ord + Default + fmt::Debug + fmt::Display {
    const ZERO: Self;
    /// Smallest physical value representable without clamping.
    const MIN_VALUE: f32;
    /// Largest physical value representable without clamping.
    const MAX_VALUE: f32;

    /// Encode a physical value, rounding to the nearest hundredth.
    ///
    /// Values outside `MIN_VALUE..=MAX_VALUE` clamp to the nearest bound and
    /// NaN encodes as zero. Either way the stored value is wrong; keeping
    /// readings in range is the caller's job.
    fn encode(value: f32) -> Self;

    /// Decode back to physical units.
    fn decode(self) -> f32;

    fn widen(self) -> i64;

    /// Truncating conversion back from the wide accumulator.
    fn narrow(wide: i64) -> Self;
}

/// Scale and round half away from zero.
#[inline]
fn scale_rounded(value: f32) -> f32 {
    let scaled = value * SCALE;
    if scaled >= 0.0 {
        scaled + 0.5
    } else {
        scaled - 0.5
    }
}

macro_rules! impl_compact_sample {
    ($($ty:ty),*) => {
        $(
            impl CompactSample for $ty {
                const ZERO: Self = 0;
                const MIN_VALUE: f32 = <$ty>::MIN as f32 / SCALE;
                const MAX_VALUE: f32 = <$ty>::MAX as f32 / SCALE;

                #[inline]
                fn encode(value: f32) -> Self {
                    // Float to int `as` casts saturate and map NaN to 0.
                    scale_rounded(value) as $ty
                }

                #[inline]
                fn decode(self) -> f32 {
                    self as f32 / SCALE
                }

                #[inline]
                fn widen(self) -> i64 {
                    self as i64
                }

                #[inline]
                fn narrow(wide: i64) -> Self {
                    wide as $ty
                }
            }
        )*
    };
}

impl_compact_sample!(i16, i32);

/// Shorthand for [`CompactSample::encode`].
#[inline]
pub fn encode<T: CompactSample>(value: f32) -> T {
    T::encode(value)
}

/// Shorthand for [`CompactSample::decode`].
#[inline]
pub fn decode<T: CompactSample>(value: T) -> f32 {
    value.decode()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32) -> bool {
        let diff = a - b;
        diff < 0.01 && diff > -0.01
    }

    #[test]
    fn test_encode_hundredths() {
        assert_eq!(encode::<i16>(21.5), 2150);
        assert_eq!(encode::<i16>(-12.34), -1234);
        assert_eq!(encode::<i16>(0.0), 0);
        assert_eq!(encode::<i32>(55.55), 5555);
    }

    #[test]
    fn test_encode_rounds_to_nearest() {
        // 0.29 * 100 is 28.999998 in f32; truncation would lose a whole step.
        assert_eq!(encode::<i16>(0.29), 29);
        assert_eq!(encode::<i16>(20.126), 2013);
        assert_eq!(encode::<i16>(-20.126), -2013);
        // Truncating would give 29.
        assert_eq!(encode::<i16>(0.299), 30);
        assert_eq!(encode::<i16>(-0.299), -30);
    }

    #[test]
    fn test_decode() {
        assert!(close(decode(2150i16), 21.5));
        assert!(close(decode(-1234i16), -12.34));
    }

    #[test]
    fn test_round_trip_within_step() {
        let mut value = -300.0f32;
        while value < 300.0 {
            let back = decode(encode::<i16>(value));
            assert!(close(back, value), "{} decoded as {}", value, back);
            value += 0.37;
        }
    }

    #[test]
    fn test_out_of_range_clamps() {
        assert_eq!(encode::<i16>(400.0), i16::MAX);
        assert_eq!(encode::<i16>(-400.0), i16::MIN);
        assert!(close(decode(encode::<i16>(400.0)), i16::MAX_VALUE));
        // The wider type keeps the same reading intact.
        assert_eq!(encode::<i32>(400.0), 40_000);
    }

    #[test]
    fn test_nan_encodes_as_zero() {
        assert_eq!(encode::<i16>(f32::NAN), 0);
    }

    #[test]
    fn test_wide_arithmetic() {
        assert_eq!(i16::MAX.widen() + i16::MAX.widen(), 65_534);
        assert_eq!(i16::narrow(-2500), -2500);
    }
}
