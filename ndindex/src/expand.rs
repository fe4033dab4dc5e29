//! Tuple expansion: turning a raw index and a shape into one explicit
//! operation per axis.
//!
//! Expansion is where all validation happens. An ellipsis (or the
//! implicit one at the end of every index) is replaced by full
//! slices, integers and slices are resolved against the axis they
//! consume, and array indices are checked and broadcast. Everything
//! downstream of an [`Expansion`] (canonical forms, result shapes) is
//! infallible.

use crate::ArrayIndex;
use crate::Index;
use crate::IndexError;
use crate::IndexOpts;
use crate::ResolvedSlice;
use crate::Slice;
use crate::Tuple;
use crate::bounds::check_axis_len;
use crate::bounds::resolve_integer;
use crate::broadcast_shapes;

/// One explicit operation of an expanded index.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AxisIndex {
    /// Select `position` on `axis`, removing it.
    Integer { axis: usize, position: usize },

    /// Select a strided range of `axis`. `source` is the slice as it
    /// was written; inserted slices are `:`.
    Slice {
        axis: usize,
        source: Slice,
        slice: ResolvedSlice,
    },

    /// Insert a length-1 axis.
    NewAxis,

    /// Index the axes starting at `axis` with an array.
    Array { axis: usize, array: ArrayIndex },
}

impl AxisIndex {
    /// The input axes consumed by this operation.
    pub fn axes(&self) -> std::ops::Range<usize> {
        match self {
            AxisIndex::Integer { axis, .. } | AxisIndex::Slice { axis, .. } => *axis..*axis + 1,
            AxisIndex::NewAxis => 0..0,
            AxisIndex::Array { axis, array } => *axis..*axis + array.consumed_axes(),
        }
    }

    /// The operation as a plain index: integers as non-negative
    /// positions, slices as written.
    pub fn to_index(&self) -> Index {
        match self {
            AxisIndex::Integer { position, .. } => Index::Integer(*position as i64),
            AxisIndex::Slice { source, .. } => Index::Slice(*source),
            AxisIndex::NewAxis => Index::NewAxis,
            AxisIndex::Array { array, .. } => Index::Array(array.clone()),
        }
    }
}

/// An index expanded against a shape.
///
/// Every axis of the shape is at most
/// [`MAX_AXIS_LEN`](crate::MAX_AXIS_LEN) long, so all
/// resolved positions convert to `i64` without loss.
///
/// ```
/// use ndindex::Expansion;
/// use ndindex::Index;
/// use ndindex::tuple;
///
/// let index = Index::from(tuple![1, Index::Ellipsis].unwrap());
/// let expansion = Expansion::new(&index, &[4, 5, 6]).unwrap();
/// assert_eq!(expansion.to_index().to_string(), "(1, :, :)");
/// assert_eq!(expansion.result_shape(), vec![5, 6]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Expansion {
    shape: Vec<usize>,
    axes: Vec<AxisIndex>,
    /// The broadcast shape of the array indices, if there are any.
    fancy: Option<Vec<usize>>,
}

impl Expansion {
    /// Expand `index` against `shape` with the default options.
    pub fn new(index: &Index, shape: &[usize]) -> Result<Self, IndexError> {
        Self::with_opts(index, shape, &IndexOpts::default())
    }

    /// Expand `index` against `shape`, failing with the first
    /// violation found.
    pub fn with_opts(
        index: &Index,
        shape: &[usize],
        opts: &IndexOpts,
    ) -> Result<Self, IndexError> {
        tracing::trace!(%index, ?shape, "expanding index");
        opts.check_ndim(shape.len())?;
        for (axis, &size) in shape.iter().enumerate() {
            check_axis_len(size, axis)?;
        }

        let elements = index.elements();
        let consumed = index.consumed_axes();
        if consumed > shape.len() {
            return Err(IndexError::TooManyIndices {
                ndim: shape.len(),
                given: consumed,
            });
        }
        let fill = shape.len() - consumed;
        let ellipsis = index.ellipsis_index();

        let mut axes = Vec::with_capacity(elements.len() + fill);
        let mut axis = 0;
        let mut arrays = Vec::new();
        for (i, element) in elements.iter().enumerate() {
            if i == ellipsis {
                fill_axes(&mut axes, shape, &mut axis, fill);
            }
            match element {
                Index::Integer(value) => {
                    let position = resolve_integer(*value, shape[axis], axis)?;
                    axes.push(AxisIndex::Integer { axis, position });
                    axis += 1;
                }
                Index::Slice(source) => {
                    axes.push(AxisIndex::Slice {
                        axis,
                        source: *source,
                        slice: source.resolve(shape[axis]),
                    });
                    axis += 1;
                }
                Index::Ellipsis => {}
                Index::NewAxis => axes.push(AxisIndex::NewAxis),
                Index::Array(array) => {
                    if !opts.allow_array_indices {
                        return Err(IndexError::ArrayIndexDisallowed);
                    }
                    let end = axis + array.consumed_axes();
                    array.validate(&shape[axis..end], axis)?;
                    arrays.push(array.broadcast_shape());
                    axes.push(AxisIndex::Array {
                        axis,
                        array: array.clone(),
                    });
                    axis = end;
                }
                // Tuple elements are never tuples themselves.
                Index::Tuple(_) => return Err(IndexError::NestedTuple),
            }
        }
        if ellipsis == elements.len() {
            fill_axes(&mut axes, shape, &mut axis, fill);
        }
        debug_assert_eq!(axis, shape.len());

        let fancy = if arrays.is_empty() {
            None
        } else {
            let shapes: Vec<&[usize]> = arrays.iter().map(Vec::as_slice).collect();
            Some(broadcast_shapes(&shapes)?)
        };

        let expansion = Self {
            shape: shape.to_vec(),
            axes,
            fancy,
        };
        opts.check_ndim(expansion.result_shape().len())?;
        tracing::debug!(%index, ?shape, expanded = %expansion.to_index(), "expanded index");
        Ok(expansion)
    }

    /// The shape this index was expanded against.
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// The explicit operations, in order. Every input axis is consumed
    /// by exactly one of them.
    pub fn axes(&self) -> &[AxisIndex] {
        &self.axes
    }

    pub fn has_arrays(&self) -> bool {
        self.fancy.is_some()
    }

    /// The broadcast shape of the array indices, if any.
    pub fn fancy_shape(&self) -> Option<&[usize]> {
        self.fancy.as_deref()
    }

    /// The expanded index as an explicit tuple: no ellipsis and one
    /// element per consumed axis.
    pub fn to_index(&self) -> Index {
        Index::Tuple(Tuple::from_valid(
            self.axes.iter().map(AxisIndex::to_index).collect(),
        ))
    }
}

fn fill_axes(axes: &mut Vec<AxisIndex>, shape: &[usize], axis: &mut usize, count: usize) {
    for _ in 0..count {
        let source = Slice::full();
        axes.push(AxisIndex::Slice {
            axis: *axis,
            source,
            slice: source.resolve(shape[*axis]),
        });
        *axis += 1;
    }
}

impl Index {
    /// The explicit form of this index on `shape`: the ellipsis and
    /// any implicit trailing axes become full slices, and integers
    /// become non-negative.
    pub fn expand(&self, shape: &[usize]) -> Result<Index, IndexError> {
        Ok(Expansion::new(self, shape)?.to_index())
    }

    /// Check this index against `shape`.
    pub fn validate(&self, shape: &[usize]) -> Result<(), IndexError> {
        Expansion::new(self, shape).map(|_| ())
    }

    pub fn is_valid(&self, shape: &[usize]) -> bool {
        self.validate(shape).is_ok()
    }
}
