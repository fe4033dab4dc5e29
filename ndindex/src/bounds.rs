//! Per-axis arithmetic: resolving an integer or a [`Slice`] against
//! the length of a single axis.
//!
//! Slices resolve with the usual bounded-stride semantics:
//!
//! ```text
//! step > 0:  start ∈ [0, n],  stop ∈ [0, n],  defaults (0, n)
//! step < 0:  start ∈ [-1, n-1], stop ∈ [-1, n-1], defaults (n-1, -1)
//! len       = max(0, ⌈(stop - start) / step⌉)
//! ```
//!
//! Negative bounds are taken relative to the end of the axis (`+ n`)
//! before clamping. The `-1` of the negative-step case means "before
//! index 0"; it is carried as [`Position::Before`] so that it can
//! never be mistaken for the literal index `-1` (which is `n - 1`).

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

use crate::IndexError;
use crate::Slice;

/// A resolved slice bound on an axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Position {
    /// Just before index 0. Only produced for negative steps.
    Before,
    /// A concrete position in `0..=n`.
    At(usize),
}

impl Position {
    fn from_offset(offset: i128) -> Self {
        match usize::try_from(offset) {
            Ok(pos) => Position::At(pos),
            Err(_) => Position::Before,
        }
    }

    pub(crate) fn offset(self) -> i128 {
        match self {
            Position::Before => -1,
            Position::At(pos) => pos as i128,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Position::Before => write!(f, "<0"),
            Position::At(pos) => write!(f, "{}", pos),
        }
    }
}

/// A slice resolved against a concrete axis length: explicit start,
/// stop and step, plus the number of selected elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResolvedSlice {
    start: Position,
    stop: Position,
    step: i64,
    len: usize,
    size: usize,
}

impl ResolvedSlice {
    /// The resolved start bound.
    pub fn start(&self) -> Position {
        self.start
    }

    /// The resolved (exclusive) stop bound.
    pub fn stop(&self) -> Position {
        self.stop
    }

    pub fn step(&self) -> i64 {
        self.step
    }

    /// Number of selected elements.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Length of the axis this slice was resolved against.
    pub fn size(&self) -> usize {
        self.size
    }

    /// The axis position of the `k`th selected element.
    pub fn get(&self, k: usize) -> Option<usize> {
        if k >= self.len {
            return None;
        }
        let pos = self.start.offset() + self.step as i128 * k as i128;
        usize::try_from(pos).ok()
    }

    pub fn first(&self) -> Option<usize> {
        self.get(0)
    }

    pub fn last(&self) -> Option<usize> {
        self.len.checked_sub(1).and_then(|k| self.get(k))
    }

    /// Whether axis position `pos` is selected.
    pub fn contains(&self, pos: usize) -> bool {
        let Some(first) = self.first() else {
            return false;
        };
        let delta = pos as i128 - first as i128;
        let step = self.step as i128;
        delta % step == 0 && (0..self.len as i128).contains(&(delta / step))
    }

    /// Iterator over the selected axis positions, in selection order.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.len).filter_map(move |k| self.get(k))
    }
}

impl fmt::Display for ResolvedSlice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}, {}) len {}",
            self.start, self.stop, self.step, self.len
        )
    }
}

/// The longest supported axis. Every position on such an axis, and
/// every slice bound over it, fits in an `i64`.
pub const MAX_AXIS_LEN: usize = i64::MAX as usize;

/// Check that `axis` of length `size` is no longer than
/// [`MAX_AXIS_LEN`].
pub fn check_axis_len(size: usize, axis: usize) -> Result<(), IndexError> {
    if size > MAX_AXIS_LEN {
        return Err(IndexError::AxisTooLong { axis, size });
    }
    Ok(())
}

/// Resolve the integer index `value` on `axis` of length `size`.
pub fn resolve_integer(value: i64, size: usize, axis: usize) -> Result<usize, IndexError> {
    let n = size as i128;
    let pos = if value < 0 {
        value as i128 + n
    } else {
        value as i128
    };
    if pos < 0 || pos >= n {
        return Err(IndexError::OutOfBounds {
            index: value,
            axis,
            size,
        });
    }
    Ok(pos as usize)
}

/// Resolve `slice` against an axis of length `size`. This never
/// fails: out-of-range bounds clamp, and an empty selection is valid.
pub fn resolve_slice(slice: &Slice, size: usize) -> ResolvedSlice {
    let n = size as i128;
    let step = slice.step() as i128;
    let relative = |bound: i64| {
        let bound = bound as i128;
        if bound < 0 { bound + n } else { bound }
    };

    let (start, stop, len) = if step > 0 {
        let start = slice.start().map_or(0, |s| relative(s).clamp(0, n));
        let stop = slice.stop().map_or(n, |s| relative(s).clamp(0, n));
        (start, stop, ceil_div(stop - start, step))
    } else {
        let start = slice.start().map_or(n - 1, |s| relative(s).clamp(-1, n - 1));
        let stop = slice.stop().map_or(-1, |s| relative(s).clamp(-1, n - 1));
        (start, stop, ceil_div(start - stop, -step))
    };

    ResolvedSlice {
        start: Position::from_offset(start),
        stop: Position::from_offset(stop),
        step: slice.step(),
        len: len as usize,
        size,
    }
}

/// `⌈a / b⌉` for `b > 0`, or 0 when `a <= 0`.
pub(crate) fn ceil_div(a: i128, b: i128) -> i128 {
    if a <= 0 { 0 } else { (a + b - 1) / b }
}
