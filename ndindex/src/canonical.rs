//! Canonical forms.
//!
//! The canonical form of an index on a shape removes every difference
//! of spelling: negative positions, slice bounds that clamp or match
//! their defaults, ellipses, and trailing full slices.
//!
//! - integers are non-negative positions;
//! - slices are rebuilt from the positions they select: an empty
//!   slice is `0:0`, a single element `i` is `i:i+1`, and bounds equal
//!   to the defaults are dropped;
//! - trailing full slices are dropped, so selecting everything is the
//!   empty tuple `()`, and a one-element tuple is replaced by its
//!   element.
//!
//! Without array indices, a slice selecting one element `i` is the
//! same as `(i, newaxis)`. Every run of integers, new axes and
//! single-element slices is rewritten as its integers followed by its
//! new axes, and then the last of those integers are paired with the
//! new axes to form single-element slices:
//!
//! ```text
//! (newaxis, 0, 1:2)  ->  (0, 1, newaxis, newaxis)  ->  (0:1, 1:2)
//! (2, newaxis, newaxis)                             ->  (2:3, newaxis)
//! ```
//!
//! Empty results are not unified: on shape `(0, 3)`, `(:, 0)` and
//! `(:, 1)` both select nothing but keep distinct canonical forms.

use std::iter;
use std::mem;

use crate::Index;
use crate::IndexError;
use crate::ResolvedSlice;
use crate::Slice;
use crate::Tuple;
use crate::expand::AxisIndex;
use crate::expand::Expansion;

impl Expansion {
    /// The canonical form of the expanded index.
    pub fn canonical(&self) -> Index {
        let mut elements: Vec<Index> = if self.has_arrays() {
            // Integers take part in broadcasting, and their positions
            // relative to the arrays matter.
            self.axes()
                .iter()
                .map(|op| match op {
                    AxisIndex::Slice { slice, .. } => Index::Slice(canonical_slice(slice)),
                    op => op.to_index(),
                })
                .collect()
        } else {
            self.basic_elements()
        };
        strip_trailing(&mut elements, |e| matches!(e, Index::Slice(s) if s.is_full()));

        let canonical = collapse(elements);
        tracing::trace!(shape = ?self.shape(), %canonical, "canonicalized index");
        canonical
    }

    fn basic_elements(&self) -> Vec<Index> {
        let mut elements = Vec::with_capacity(self.axes().len());
        let mut run = Run::default();
        for op in self.axes() {
            match op {
                AxisIndex::Integer { axis, position } => {
                    run.integers.push((*position, self.shape()[*axis]));
                }
                AxisIndex::NewAxis => run.new_axes += 1,
                AxisIndex::Slice { slice, .. } => match slice.first() {
                    Some(first) if slice.len() == 1 => {
                        run.integers.push((first, slice.size()));
                        run.new_axes += 1;
                    }
                    _ => {
                        run.flush(&mut elements);
                        elements.push(Index::Slice(canonical_slice(slice)));
                    }
                },
                AxisIndex::Array { array, .. } => {
                    run.flush(&mut elements);
                    elements.push(Index::Array(array.clone()));
                }
            }
        }
        run.flush(&mut elements);
        elements
    }
}

/// A maximal run of integers (position and axis length) and new axes.
#[derive(Default)]
struct Run {
    integers: Vec<(usize, usize)>,
    new_axes: usize,
}

impl Run {
    fn flush(&mut self, elements: &mut Vec<Index>) {
        let integers = mem::take(&mut self.integers);
        let new_axes = mem::take(&mut self.new_axes);
        let paired = integers.len().min(new_axes);
        let unpaired = integers.len() - paired;
        for (k, (position, size)) in integers.into_iter().enumerate() {
            elements.push(if k < unpaired {
                Index::Integer(position as i64)
            } else {
                Index::Slice(Slice::spanning(position, 1, 1, size))
            });
        }
        elements.extend(iter::repeat(Index::NewAxis).take(new_axes - paired));
    }
}

/// The canonical slice selecting the same positions as `slice`.
pub(crate) fn canonical_slice(slice: &ResolvedSlice) -> Slice {
    Slice::spanning(
        slice.first().unwrap_or(0),
        slice.step(),
        slice.len(),
        slice.size(),
    )
}

fn strip_trailing(elements: &mut Vec<Index>, removable: impl Fn(&Index) -> bool) {
    while elements.last().is_some_and(&removable) {
        elements.pop();
    }
}

fn collapse(mut elements: Vec<Index>) -> Index {
    if elements.len() == 1 {
        if let Some(element) = elements.pop() {
            return element;
        }
    }
    Index::Tuple(Tuple::from_valid(elements))
}

impl Index {
    /// The canonical form of this index on `shape`.
    ///
    /// ```
    /// use ndindex::Index;
    /// use ndindex::Slice;
    ///
    /// let a = Index::from(Slice::new(Some(0), Some(10), Some(1)).unwrap());
    /// let b = Index::from(..);
    /// assert_eq!(a.canonicalize(&[10]).unwrap(), b.canonicalize(&[10]).unwrap());
    /// assert_eq!(a.canonicalize(&[10]).unwrap().to_string(), "()");
    /// ```
    pub fn canonicalize(&self, shape: &[usize]) -> Result<Index, IndexError> {
        Ok(Expansion::new(self, shape)?.canonical())
    }

    /// An equivalent index on every shape this index is valid for,
    /// computed without a shape.
    ///
    /// Slices are reduced with [`Slice::reduce`]. An ellipsis followed
    /// only by full slices is dropped along with them, trailing full
    /// slices are dropped when no ellipsis remains, a bare ellipsis
    /// becomes `()`, and a one-element tuple is replaced by its
    /// element.
    pub fn reduce(&self) -> Index {
        match self {
            Index::Slice(slice) => Index::Slice(slice.reduce()),
            Index::Ellipsis => Index::Tuple(Tuple::empty()),
            Index::Tuple(tuple) => {
                let mut elements: Vec<Index> = tuple
                    .iter()
                    .map(|e| match e {
                        Index::Slice(slice) => Index::Slice(slice.reduce()),
                        e => e.clone(),
                    })
                    .collect();
                let is_full = |e: &Index| matches!(e, Index::Slice(s) if s.is_full());
                if let Some(at) = elements.iter().position(Index::is_ellipsis) {
                    if elements[at + 1..].iter().all(is_full) {
                        elements.truncate(at);
                    }
                }
                // Slices after an ellipsis pin the axes it leaves out.
                if !elements.iter().any(Index::is_ellipsis) {
                    strip_trailing(&mut elements, is_full);
                }
                collapse(elements)
            }
            Index::Integer(_) | Index::NewAxis | Index::Array(_) => self.clone(),
        }
    }
}
