use core::fmt::Debug;
use core::ops::{Add, Sub};

/// Associated data that can be used for measures (such as length, count or
/// cost).
///
/// This is the bound shared by the generic engines: anything orderable,
/// addable and cloneable with a default value qualifies, so the standard
/// integer and floating-point types all implement it.
pub trait Measure: Debug + PartialOrd + Add<Self, Output = Self> + Default + Clone {}

impl<M> Measure for M where M: Debug + PartialOrd + Add<M, Output = M> + Default + Clone {}

/// A floating-point measure.
pub trait FloatMeasure: Measure + Copy {
    fn zero() -> Self;
    fn infinite() -> Self;
}

impl FloatMeasure for f32 {
    fn zero() -> Self {
        0.
    }
    fn infinite() -> Self {
        1. / 0.
    }
}

impl FloatMeasure for f64 {
    fn zero() -> Self {
        0.
    }
    fn infinite() -> Self {
        1. / 0.
    }
}

/// A measure with known extremes and overflow-aware addition.
pub trait BoundedMeasure: Measure + Sub<Self, Output = Self> {
    fn min() -> Self;
    fn max() -> Self;
    fn overflowing_add(self, rhs: Self) -> (Self, bool);
}

macro_rules! impl_bounded_measure_integer(
    ( $( $t:ident ),* ) => {
        $(
            impl BoundedMeasure for $t {
                fn min() -> Self {
                    $t::MIN
                }

                fn max() -> Self {
                    $t::MAX
                }

                fn overflowing_add(self, rhs: Self) -> (Self, bool) {
                    self.overflowing_add(rhs)
                }
            }
        )*
    };
);

impl_bounded_measure_integer!(u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize);

macro_rules! impl_bounded_measure_float(
    ( $( $t:ident ),* ) => {
        $(
            impl BoundedMeasure for $t {
                fn min() -> Self {
                    $t::MIN
                }

                fn max() -> Self {
                    $t::MAX
                }

                fn overflowing_add(self, rhs: Self) -> (Self, bool) {
                    // for an overflow: a + b > max: both values need to be
                    // positive and a > max - b must be satisfied
                    let overflow =
                        self > Self::default() && rhs > Self::default() && self > $t::MAX - rhs;

                    // for an underflow: a + b < min: overflow can not
                    // happen and both values must be negative and
                    // a < min - b must be satisfied
                    let underflow = !overflow
                        && self < Self::default()
                        && rhs < Self::default()
                        && self < $t::MIN - rhs;

                    (self + rhs, overflow || underflow)
                }
            }
        )*
    };
);

impl_bounded_measure_float!(f32, f64);

/// Some measure of positive numbers, assuming positive
/// float-pointing numbers
pub trait PositiveMeasure: Measure + Copy {
    fn zero() -> Self;
    fn max() -> Self;
}

macro_rules! impl_positive_measure(
    ( $( $t:ident ),* )=> {
        $(
            impl PositiveMeasure for $t {
                fn zero() -> Self {
                    0 as $t
                }
                fn max() -> Self {
                    $t::MAX
                }
            }

        )*
    }
);

impl_positive_measure!(u8, u16, u32, u64, u128, usize, f32, f64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounded_extremes() {
        assert_eq!(<i64 as BoundedMeasure>::max(), i64::MAX);
        assert_eq!(<u32 as BoundedMeasure>::min(), 0);
        assert_eq!(BoundedMeasure::overflowing_add(i8::MAX, 1i8), (i8::MIN, true));
        assert_eq!(BoundedMeasure::overflowing_add(40i8, 2i8), (42, false));
    }

    #[test]
    fn float_overflow_detection() {
        let (_, overflowed) = BoundedMeasure::overflowing_add(f64::MAX, f64::MAX);
        assert!(overflowed);
        let (sum, overflowed) = BoundedMeasure::overflowing_add(1.5f64, 2.25f64);
        assert_eq!(sum, 3.75);
        assert!(!overflowed);
        let (_, underflowed) = BoundedMeasure::overflowing_add(f32::MIN, f32::MIN);
        assert!(underflowed);
    }

    #[test]
    fn float_and_positive_constants() {
        assert_eq!(<f64 as FloatMeasure>::zero(), 0.0);
        assert!(<f32 as FloatMeasure>::infinite().is_infinite());
        assert_eq!(<u64 as PositiveMeasure>::zero(), 0);
        assert_eq!(<f64 as PositiveMeasure>::max(), f64::MAX);
    }
}
