use std::fmt;
use std::num::NonZeroI64;
use std::ops;

use serde::Deserialize;
use serde::Serialize;

use crate::IndexError;
use crate::bounds::MAX_AXIS_LEN;
use crate::bounds::ResolvedSlice;
use crate::bounds::ceil_div;
use crate::bounds::check_axis_len;
use crate::bounds::resolve_slice;

const ONE: NonZeroI64 = match NonZeroI64::new(1) {
    Some(one) => one,
    None => unreachable!(),
};

/// A strided range along one axis, with optional start and stop
/// bounds and a nonzero step.
///
/// Bounds follow the usual conventions: negative values count from
/// the end of the axis, and an omitted bound defaults according to
/// the sign of the step. Equality is structural: two slices compare
/// equal iff their start, stop and step match after the step
/// defaults to 1. Whether two different slices select the same
/// elements depends on the axis length; see
/// [`Index::canonicalize`](crate::Index::canonicalize).
///
/// ```
/// use ndindex::Slice;
///
/// let s = Slice::new(Some(-3), None, None).unwrap();
/// assert_eq!(s, Slice::from(-3..));
/// assert_eq!(s.resolve(10).iter().collect::<Vec<_>>(), vec![7, 8, 9]);
/// assert!(Slice::new(None, None, Some(0)).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Slice {
    start: Option<i64>,
    stop: Option<i64>,
    step: NonZeroI64,
}

impl Slice {
    /// Create a new slice. An omitted step is 1; a zero step is
    /// rejected.
    pub fn new(
        start: Option<i64>,
        stop: Option<i64>,
        step: Option<i64>,
    ) -> Result<Self, IndexError> {
        let step = NonZeroI64::new(step.unwrap_or(1)).ok_or(IndexError::ZeroStep)?;
        Ok(Self { start, stop, step })
    }

    /// The slice selecting an entire axis, `:`.
    pub const fn full() -> Self {
        Self {
            start: None,
            stop: None,
            step: ONE,
        }
    }

    /// The slice `0:0`, which selects nothing on any axis.
    pub const fn empty() -> Self {
        Self {
            start: Some(0),
            stop: Some(0),
            step: ONE,
        }
    }

    pub(crate) fn with_step(start: Option<i64>, stop: Option<i64>, step: NonZeroI64) -> Self {
        Self { start, stop, step }
    }

    pub fn start(&self) -> Option<i64> {
        self.start
    }

    pub fn stop(&self) -> Option<i64> {
        self.stop
    }

    pub fn step(&self) -> i64 {
        self.step.get()
    }

    /// Whether this is `:`, which selects every element of any axis.
    pub fn is_full(&self) -> bool {
        *self == Self::full()
    }

    /// Resolve this slice against an axis of length `size`.
    pub fn resolve(&self, size: usize) -> ResolvedSlice {
        resolve_slice(self, size)
    }

    /// The canonical slice over an axis of length `size` that selects
    /// `len` elements starting at `first` and advancing by `step`.
    ///
    /// Empty selections become `0:0` (or `:` on an empty axis), single
    /// elements become `i:i+1`, stop sits next to the last element, and
    /// bounds that equal the defaults for `size` are dropped. `size` is
    /// at most [`MAX_AXIS_LEN`], so every bound fits in an `i64`.
    pub(crate) fn spanning(first: usize, step: i64, len: usize, size: usize) -> Self {
        debug_assert!(size <= MAX_AXIS_LEN);
        if len == 0 {
            // Every slice of an empty axis selects all of it.
            return if size == 0 { Self::full() } else { Self::empty() };
        }
        let first = first as i128;
        let size = size as i128;
        let (stop, step) = if len == 1 {
            (Some(first + 1), 1)
        } else {
            let last = first + step as i128 * (len as i128 - 1);
            if step > 0 {
                (Some(last + 1), step)
            } else {
                ((last >= 1).then_some(last - 1), step)
            }
        };

        let (start, stop) = if step > 0 {
            ((first != 0).then_some(first), stop.filter(|&s| s != size))
        } else {
            ((first != size - 1).then_some(first), stop)
        };
        Self {
            start: start.map(to_i64),
            stop: stop.map(to_i64),
            step: NonZeroI64::new(step).unwrap_or(ONE),
        }
    }

    /// An equivalent slice for every axis length, with some
    /// redundancy removed.
    ///
    /// When both bounds count from the same end of the axis in the
    /// direction of the step, the selected offsets are fixed and the
    /// slice is tightened: an empty selection becomes `0:0`, a single
    /// element gets step 1, and the stop moves next to the last
    /// element. Bounds equal to their defaults are dropped. Any other
    /// slice is returned unchanged.
    pub fn reduce(&self) -> Self {
        let step = self.step();
        let reduced = match (self.start, self.stop) {
            // Counting from the front with a positive step: clamping
            // at the end of the axis only truncates the tail.
            (start, Some(stop)) if step > 0 && start.unwrap_or(0) >= 0 && stop >= 0 => {
                let start = start.unwrap_or(0);
                match span_len(start, stop, step) {
                    0 => return Self::empty(),
                    1 => Self::with_step(Some(start), start.checked_add(1), ONE),
                    len => {
                        let last = start + step * (len - 1);
                        Self::with_step(Some(start), last.checked_add(1), self.step)
                    }
                }
            }
            // Counting from the back with a negative step.
            (start, Some(stop)) if step < 0 && start.unwrap_or(-1) < 0 && stop < 0 => {
                let start = start.unwrap_or(-1);
                match span_len(stop, start, -step) {
                    0 => return Self::empty(),
                    1 => Self::with_step(Some(start), (start < -1).then_some(start + 1), ONE),
                    len => {
                        let last = start + step * (len - 1);
                        Self::with_step(Some(start), Some(last - 1), self.step)
                    }
                }
            }
            _ => *self,
        };

        let start = match reduced.start {
            Some(0) if reduced.step() > 0 => None,
            Some(-1) if reduced.step() < 0 => None,
            start => start,
        };
        Self { start, ..reduced }
    }

    /// The largest number of elements this slice selects on an axis
    /// of any length, or `None` when it grows without bound.
    pub fn max_len(&self) -> Option<usize> {
        let step = self.step() as i128;
        let span = |extent: i128| ceil_div(extent, step.abs()) as usize;
        let start = self.start.map(i128::from);
        let stop = self.stop.map(i128::from);

        if step > 0 {
            match (start, stop) {
                (None, None) => None,
                (Some(s), None) if s < 0 => Some(span(-s)),
                (Some(_), None) => None,
                (s, Some(t)) => {
                    let s = s.unwrap_or(0);
                    match (s >= 0, t >= 0) {
                        (true, true) | (false, false) => Some(span(t - s)),
                        (true, false) => None,
                        (false, true) => Some(span(t.min(-s))),
                    }
                }
            }
        } else {
            match (start, stop) {
                (None, Some(t)) if t < 0 => Some(span(-1 - t)),
                (None, _) => None,
                (Some(s), None) if s >= 0 => Some(span(s + 1)),
                (Some(_), None) => None,
                (Some(s), Some(t)) => match (s >= 0, t >= 0) {
                    (true, true) | (false, false) => Some(span(s - t)),
                    (false, true) => None,
                    (true, false) => Some(span((s + 1).min(-1 - t))),
                },
            }
        }
    }

    /// The slice `sub` such that, on an axis of length `size`,
    /// `a[index][sub]` holds exactly those elements of `a[index]`
    /// that `self` also selects. Fails if `size` exceeds
    /// [`MAX_AXIS_LEN`].
    ///
    /// ```
    /// use ndindex::Slice;
    ///
    /// // Even positions, seen through 3:10.
    /// let evens = Slice::new(None, None, Some(2)).unwrap();
    /// let sub = evens.as_subindex(&Slice::from(3..10), 10).unwrap();
    /// assert_eq!(sub, Slice::new(Some(1), None, Some(2)).unwrap());
    /// ```
    pub fn as_subindex(&self, index: &Slice, size: usize) -> Result<Slice, IndexError> {
        check_axis_len(size, 0)?;
        let this = self.resolve(size);
        let within = index.resolve(size);
        let empty = Slice::spanning(0, 1, 0, within.len());

        let (Some((lo1, m1, hi1)), Some((lo2, m2, hi2))) = (ascending(&this), ascending(&within))
        else {
            return Ok(empty);
        };

        // Chinese remainder: x ≡ lo1 (mod m1), x ≡ lo2 (mod m2).
        let (g, p, _) = extended_gcd(m1, m2);
        if (lo2 - lo1) % g != 0 {
            return Ok(empty);
        }
        let lcm = m1 / g * m2;
        let t = ((lo2 - lo1) / g * p).rem_euclid(m2 / g);
        let x = lo1 + m1 * t;

        let lo = lo1.max(lo2);
        let hi = hi1.min(hi2);
        let first = lo + (x - lo).rem_euclid(lcm);
        if first > hi {
            return Ok(empty);
        }
        let count = (hi - first) / lcm + 1;

        let k = within.step() as i128;
        // `within` is non-empty here.
        let origin = within.first().unwrap_or(0) as i128;
        let pos = if k > 0 {
            (first - origin) / k
        } else {
            (origin - (first + (count - 1) * lcm)) / -k
        };
        Ok(Slice::spanning(
            pos as usize,
            to_i64(lcm / k.abs()),
            count as usize,
            within.len(),
        ))
    }
}

/// The selected positions of `r` as an ascending progression
/// `(low, stride, high)`, or `None` if empty.
fn ascending(r: &ResolvedSlice) -> Option<(i128, i128, i128)> {
    let first = r.first()? as i128;
    let last = r.last()? as i128;
    Some((first.min(last), (r.step() as i128).abs(), first.max(last)))
}

/// Returns `(g, p, q)` with `g = gcd(a, b) = p*a + q*b`, for positive
/// `a` and `b`.
fn extended_gcd(a: i128, b: i128) -> (i128, i128, i128) {
    if b == 0 {
        (a, 1, 0)
    } else {
        let (g, p, q) = extended_gcd(b, a % b);
        (g, q, p - (a / b) * q)
    }
}

/// Number of elements in `from..to` by a positive `step`.
fn span_len(from: i64, to: i64, step: i64) -> i64 {
    ceil_div(to as i128 - from as i128, step as i128) as i64
}

/// Lossless for bounds and strides over axes of at most
/// [`MAX_AXIS_LEN`].
fn to_i64(value: i128) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

impl Default for Slice {
    fn default() -> Self {
        Self::full()
    }
}

impl fmt::Display for Slice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(start) = self.start {
            write!(f, "{}", start)?;
        }
        write!(f, ":")?;
        if let Some(stop) = self.stop {
            write!(f, "{}", stop)?;
        }
        if self.step() != 1 {
            write!(f, ":{}", self.step())?;
        }
        Ok(())
    }
}

impl From<ops::RangeFull> for Slice {
    fn from(_: ops::RangeFull) -> Self {
        Self::full()
    }
}

macro_rules! impl_slice_from_ranges {
    ($($t:ty),*) => {
        $(
            impl From<ops::Range<$t>> for Slice {
                fn from(r: ops::Range<$t>) -> Self {
                    Self::with_step(Some(i64::from(r.start)), Some(i64::from(r.end)), ONE)
                }
            }

            impl From<ops::RangeFrom<$t>> for Slice {
                fn from(r: ops::RangeFrom<$t>) -> Self {
                    Self::with_step(Some(i64::from(r.start)), None, ONE)
                }
            }

            impl From<ops::RangeTo<$t>> for Slice {
                fn from(r: ops::RangeTo<$t>) -> Self {
                    Self::with_step(None, Some(i64::from(r.end)), ONE)
                }
            }

            impl From<ops::RangeInclusive<$t>> for Slice {
                fn from(r: ops::RangeInclusive<$t>) -> Self {
                    let stop = inclusive_stop(i64::from(*r.end()));
                    Self::with_step(Some(i64::from(*r.start())), stop, ONE)
                }
            }

            impl From<ops::RangeToInclusive<$t>> for Slice {
                fn from(r: ops::RangeToInclusive<$t>) -> Self {
                    Self::with_step(None, inclusive_stop(i64::from(r.end)), ONE)
                }
            }
        )*
    };
}

impl_slice_from_ranges!(i32, i64);

/// The exclusive stop following an inclusive `end`; `..=-1` runs to
/// the end of the axis.
fn inclusive_stop(end: i64) -> Option<i64> {
    match end {
        -1 => None,
        end => end.checked_add(1),
    }
}
