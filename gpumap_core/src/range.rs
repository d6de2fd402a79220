//! Integer range iteration for device code.
//!
//! [`RangeIterator`] is a four-scalar cursor meant to live in registers: it carries no references,
//! never allocates and never panics, so kernels can drive it either through the `Iterator` impl or
//! with an explicit `has_next`/`advance` loop.

use crate::memory::DeviceCopy;
use core::convert::TryFrom;
use core::fmt;
use core::iter::FusedIterator;

/// Primitive integers a [`RangeIterator`] can walk over.
///
/// Implemented for every primitive integer up to 64 bits. Unsigned types can only step upwards.
pub trait RangeInt: DeviceCopy + Copy + Ord + fmt::Debug {
    /// The additive identity; a step equal to this is rejected.
    const ZERO: Self;
    /// The default step.
    const ONE: Self;

    /// `self + step`, or `None` if the sum does not fit in `Self`.
    fn checked_step(self, step: Self) -> Option<Self>;

    /// Lossless widening used to count the values left in a range.
    fn widen(self) -> i128;
}

macro_rules! impl_range_int {
    ($($t:ty)*) => {
        $(
            impl RangeInt for $t {
                const ZERO: Self = 0;
                const ONE: Self = 1;

                #[inline]
                fn checked_step(self, step: Self) -> Option<Self> {
                    self.checked_add(step)
                }

                #[inline]
                fn widen(self) -> i128 {
                    self as i128
                }
            }
        )*
    }
}

impl_range_int!(
    i8 i16 i32 i64 isize
    u8 u16 u32 u64 usize
);

/// Error returned when a range cannot be built.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RangeError {
    /// The step was zero, which would never reach `stop`.
    ZeroStep,
}

impl fmt::Display for RangeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            RangeError::ZeroStep => write!(f, "range step must not be zero"),
        }
    }
}

impl core::error::Error for RangeError {}

/// Cursor over `start, start + step, start + 2 * step, ...`, stopping before `stop`.
///
/// The cursor always holds the value the next call to [`advance`](#method.advance)
/// returns. A positive step runs while `last < stop`, a negative one while `last > stop`.
///
/// ```
/// use gpumap_core::RangeIterator;
///
/// let values: [u32; 3] = {
///     let mut it = RangeIterator::new(2u32, 9, 3).unwrap();
///     [it.advance(), it.advance(), it.advance()]
/// };
/// assert_eq!(values, [2, 5, 8]);
///
/// // The bounds are read-only; the cursor is `last` in the four-scalar layout.
/// let it = RangeIterator::new(-4i64, 4, 2).unwrap();
/// assert_eq!((-4, 4, 2, -4), (it.start(), it.stop(), it.step(), it.cursor()));
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(C)]
pub struct RangeIterator<T: RangeInt> {
    start: T,
    stop: T,
    step: T,
    last: T,
}

unsafe impl<T: RangeInt> DeviceCopy for RangeIterator<T> {}

impl<T: RangeInt> RangeIterator<T> {
    /// Creates a range from `start` (inclusive) to `stop` (exclusive) in increments of `step`.
    ///
    /// Returns `RangeError::ZeroStep` if `step` is zero. Ranges whose `start` already lies past
    /// `stop` in the direction of travel are valid and simply empty.
    pub fn new(start: T, stop: T, step: T) -> Result<Self, RangeError> {
        if step == T::ZERO {
            return Err(RangeError::ZeroStep);
        }
        Ok(RangeIterator {
            start,
            stop,
            step,
            last: start,
        })
    }

    /// The first value of the range.
    pub fn start(&self) -> T {
        self.start
    }

    /// The exclusive bound of the range.
    pub fn stop(&self) -> T {
        self.stop
    }

    /// The increment between consecutive values.
    pub fn step(&self) -> T {
        self.step
    }

    /// The cursor, i.e. the value the next call to `advance` returns.
    pub fn cursor(&self) -> T {
        self.last
    }

    /// Returns true if the cursor has not yet reached `stop`.
    #[inline]
    pub fn has_next(&self) -> bool {
        if self.step > T::ZERO {
            self.last < self.stop
        } else {
            self.last > self.stop
        }
    }

    /// Returns the cursor's value, then moves the cursor on by `step`.
    ///
    /// This does not check `has_next`; once the range is exhausted it keeps returning the parked
    /// cursor. If moving the cursor would overflow `T`, it is parked on `stop` instead, which ends
    /// the iteration without wrapping.
    #[inline]
    pub fn advance(&mut self) -> T {
        let current = self.last;
        self.last = current.checked_step(self.step).unwrap_or(self.stop);
        current
    }

    /// Number of values still to be produced.
    pub fn remaining(&self) -> usize {
        if !self.has_next() {
            return 0;
        }
        let span = self.stop.widen() - self.last.widen();
        let step = self.step.widen();
        // Both have the same sign here, so this is a ceiling division of magnitudes.
        let count = (span.abs() + step.abs() - 1) / step.abs();
        usize::try_from(count).unwrap_or(usize::MAX)
    }
}

impl<T: RangeInt> Iterator for RangeIterator<T> {
    type Item = T;

    #[inline]
    fn next(&mut self) -> Option<T> {
        if self.has_next() {
            Some(self.advance())
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.remaining();
        (n, Some(n))
    }
}

impl<T: RangeInt> ExactSizeIterator for RangeIterator<T> {}

impl<T: RangeInt> FusedIterator for RangeIterator<T> {}

/// `0, 1, ..., stop - 1`.
pub fn range<T: RangeInt>(stop: T) -> RangeIterator<T> {
    range_from(T::ZERO, stop)
}

/// `start, start + 1, ..., stop - 1`.
pub fn range_from<T: RangeInt>(start: T, stop: T) -> RangeIterator<T> {
    RangeIterator {
        start,
        stop,
        step: T::ONE,
        last: start,
    }
}

/// `start, start + step, ...` up to but excluding `stop`; see [`RangeIterator::new`].
pub fn range_step<T: RangeInt>(start: T, stop: T, step: T) -> Result<RangeIterator<T>, RangeError> {
    RangeIterator::new(start, stop, step)
}

#[cfg(test)]
mod test {
    use super::*;

    fn collect<T: RangeInt>(it: RangeIterator<T>, out: &mut [T]) -> usize {
        let mut n = 0;
        for v in it {
            out[n] = v;
            n += 1;
        }
        n
    }

    #[test]
    fn test_yields_start_first() {
        let mut it = range_from(3i32, 6);
        assert!(it.has_next());
        assert_eq!(3, it.advance());
        assert_eq!(4, it.advance());
        assert_eq!(5, it.advance());
        assert!(!it.has_next());
    }

    #[test]
    fn test_stop_is_exclusive() {
        let mut out = [0i32; 8];
        let n = collect(range_step(0, 10, 5).unwrap(), &mut out);
        assert_eq!(&out[..n], &[0, 5]);
    }

    #[test]
    fn test_uneven_step_stops_before_bound() {
        let mut out = [0i64; 8];
        let n = collect(range_step(1i64, 10, 4).unwrap(), &mut out);
        assert_eq!(&out[..n], &[1, 5, 9]);
    }

    #[test]
    fn test_negative_step_counts_down() {
        let mut out = [0i32; 8];
        let n = collect(range_step(5, -1, -2).unwrap(), &mut out);
        assert_eq!(&out[..n], &[5, 3, 1]);
    }

    #[test]
    fn test_empty_ranges() {
        assert!(!range(0i32).has_next());
        assert!(!range_from(7u8, 7).has_next());
        assert!(!range_from(9i16, 2).has_next());
        assert!(!range_step(0i32, 5, -1).unwrap().has_next());
        assert_eq!(None, range_from(4usize, 1).next());
    }

    #[test]
    fn test_zero_step_rejected() {
        assert_eq!(Err(RangeError::ZeroStep), RangeIterator::new(0i32, 10, 0));
        assert_eq!(Err(RangeError::ZeroStep), range_step(0u32, 10, 0));
    }

    #[test]
    fn test_overflow_parks_cursor_on_stop() {
        let mut it = range_step(i8::MAX - 2, i8::MAX, 100).unwrap();
        assert_eq!(Some(i8::MAX - 2), it.next());
        assert_eq!(i8::MAX, it.cursor());
        assert_eq!(None, it.next());

        let mut it = range_step(250u8, u8::MAX, 3).unwrap();
        assert_eq!(Some(250), it.next());
        assert_eq!(Some(253), it.next());
        assert_eq!(None, it.next());

        let mut it = range_step(i32::MIN + 1, i32::MIN, -7).unwrap();
        assert_eq!(Some(i32::MIN + 1), it.next());
        assert_eq!(None, it.next());
    }

    #[test]
    fn test_full_width_range_reaches_max_minus_one() {
        let mut it = range_from(u8::MIN, u8::MAX);
        assert_eq!(255, it.len());
        let mut last = 0;
        while it.has_next() {
            last = it.advance();
        }
        assert_eq!(254, last);
    }

    #[test]
    fn test_remaining_tracks_cursor() {
        let mut it = range_step(0i32, 10, 3).unwrap();
        assert_eq!(4, it.len());
        let _ = it.next();
        assert_eq!(3, it.len());
        assert_eq!((3, Some(3)), it.size_hint());

        let it = range_step(10i32, -10, -7).unwrap();
        assert_eq!(3, it.len());

        let it = range_from(i64::MIN, i64::MAX);
        assert_eq!(usize::try_from(u64::MAX).unwrap_or(usize::MAX), it.len());
    }

    #[test]
    fn test_fused_after_exhaustion() {
        let mut it = range(2u32);
        assert_eq!(Some(0), it.next());
        assert_eq!(Some(1), it.next());
        assert_eq!(None, it.next());
        assert_eq!(None, it.next());
        assert_eq!(0, it.len());
    }

    #[test]
    fn test_accessors_survive_iteration() {
        let mut it = range_step(1i32, 8, 2).unwrap();
        let _ = it.next();
        assert_eq!((1, 8, 2, 3), (it.start(), it.stop(), it.step(), it.cursor()));
    }

    #[test]
    fn test_iterator_adapters() {
        let sum: i32 = range(5i32).map(|v| v * v).sum();
        assert_eq!(30, sum);
        assert_eq!(Some(18), range_step(0i32, 20, 3).unwrap().last());
    }

    #[test]
    fn test_zero_step_display() {
        use core::fmt::Write;

        struct Buf([u8; 64], usize);
        impl Write for Buf {
            fn write_str(&mut self, s: &str) -> fmt::Result {
                let end = self.1 + s.len();
                self.0[self.1..end].copy_from_slice(s.as_bytes());
                self.1 = end;
                Ok(())
            }
        }

        let mut buf = Buf([0; 64], 0);
        write!(buf, "{}", RangeError::ZeroStep).unwrap();
        assert_eq!(b"range step must not be zero", &buf.0[..buf.1]);
    }
}
