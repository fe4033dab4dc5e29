//! Composition: a single index equivalent to applying one index and
//! then another.
//!
//! Every kept axis of the first index is an affine map from output
//! positions to input positions, `k -> first + k * step`. Indexing that
//! output with the second index selects `q` (an integer) or the
//! progression `first' + j * step'` (a slice), and pulling that back
//! through the map gives an integer or slice on the input axis:
//!
//! ```text
//! integer q:  first + q * step
//! slice:      first + first' * step, step * step', len'
//! ```
//!
//! This is the same offset/stride update used when slicing a strided
//! view. New axes of the second index are inserted in front of the
//! output axis they precede; a new axis of the first index survives if
//! the second index keeps its single element.

use std::iter;

use crate::Index;
use crate::IndexError;
use crate::Slice;
use crate::Tuple;
use crate::expand::AxisIndex;
use crate::expand::Expansion;

/// Compose `a` and `b` on `shape`: the canonical index `c` such that
/// indexing an array of shape `shape` with `c` equals indexing it with
/// `a` and then indexing the result with `b`.
///
/// ```
/// use ndindex::Index;
/// use ndindex::compose;
///
/// let c = compose(&Index::from(2..8), &Index::from(1..3), &[10]).unwrap();
/// assert_eq!(c, Index::from(3..5));
/// ```
pub fn compose(a: &Index, b: &Index, shape: &[usize]) -> Result<Index, IndexError> {
    let first = Expansion::new(a, shape)?;
    if first.has_arrays() {
        return Err(not_composable("the first index has array indices"));
    }
    let intermediate = first.result_shape();
    let second = Expansion::new(b, &intermediate)?;
    if second.has_arrays() {
        return Err(not_composable("the second index has array indices"));
    }

    // The consuming operation of `b` on each intermediate axis, and
    // the number of new axes `b` places just before it.
    let mut before = Vec::with_capacity(intermediate.len());
    let mut ops = Vec::with_capacity(intermediate.len());
    let mut pending = 0;
    for op in second.axes() {
        match op {
            AxisIndex::NewAxis => pending += 1,
            AxisIndex::Integer { .. } | AxisIndex::Slice { .. } => {
                before.push(pending);
                ops.push(op);
                pending = 0;
            }
            AxisIndex::Array { .. } => {
                return Err(not_composable("the second index has array indices"));
            }
        }
    }
    let trailing = pending;
    debug_assert_eq!(ops.len(), intermediate.len());

    let new_axes = |count: usize| iter::repeat(Index::NewAxis).take(count);
    let mut elements = Vec::new();
    let mut dim = 0;
    for op in first.axes() {
        match op {
            AxisIndex::Integer { position, .. } => {
                elements.push(Index::Integer(*position as i64))
            }
            AxisIndex::Slice { axis, slice, .. } => {
                elements.extend(new_axes(before[dim]));
                match ops[dim] {
                    AxisIndex::Integer { position: q, .. } => {
                        let position = slice.get(*q).ok_or(IndexError::OutOfBounds {
                            index: *q as i64,
                            axis: dim,
                            size: slice.len(),
                        })?;
                        elements.push(Index::Integer(position as i64));
                    }
                    AxisIndex::Slice { slice: inner, .. } => {
                        let composed = match inner.first().and_then(|k| slice.get(k)) {
                            Some(start) => Slice::spanning(
                                start,
                                slice.step().saturating_mul(inner.step()),
                                inner.len(),
                                slice.size(),
                            ),
                            None => Slice::spanning(0, 1, 0, slice.size()),
                        };
                        tracing::trace!(
                            axis,
                            outer = %slice,
                            inner = %inner,
                            %composed,
                            "composed slices"
                        );
                        elements.push(Index::Slice(composed));
                    }
                    _ => return Err(not_composable("unexpected operation")),
                }
                dim += 1;
            }
            AxisIndex::NewAxis => {
                elements.extend(new_axes(before[dim]));
                match ops[dim] {
                    AxisIndex::Integer { .. } => {}
                    AxisIndex::Slice { slice: inner, .. } if inner.len() == 1 => {
                        elements.push(Index::NewAxis)
                    }
                    AxisIndex::Slice { .. } => {
                        return Err(not_composable(
                            "an empty selection on a new axis has no equivalent index",
                        ));
                    }
                    _ => return Err(not_composable("unexpected operation")),
                }
                dim += 1;
            }
            AxisIndex::Array { .. } => {
                return Err(not_composable("the first index has array indices"));
            }
        }
    }
    elements.extend(new_axes(trailing));

    let composed = Expansion::new(&Index::Tuple(Tuple::from_valid(elements)), shape)?.canonical();
    tracing::debug!(%a, %b, ?shape, %composed, "composed indices");
    Ok(composed)
}

fn not_composable(reason: &str) -> IndexError {
    IndexError::NotComposable {
        reason: reason.to_string(),
    }
}

impl Index {
    /// Compose this index with `next` on `shape`; see [`compose`].
    pub fn compose(&self, next: &Index, shape: &[usize]) -> Result<Index, IndexError> {
        compose(self, next, shape)
    }
}
