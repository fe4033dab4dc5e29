//! Array-valued ("fancy") indices.
//!
//! The engine never sees the contents of an index array, only its
//! metadata: the shape, and for boolean masks the number of true
//! entries. That is enough to compute result shapes and to check the
//! constraints that do not depend on values (mask shapes, broadcast
//! compatibility). Bounds of individual integer entries are the host
//! array library's responsibility.

use std::fmt;

use itertools::Itertools;
use serde::Deserialize;
use serde::Serialize;

use crate::IndexError;

/// Element type of an [`ArrayIndex`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ArrayDtype {
    Integer,
    Boolean,
}

/// An integer or boolean array index.
///
/// A mask can never have more true entries than elements. This is
/// checked on construction, on deserialization, and again when the
/// index is expanded, since the variants can be built directly.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "ArrayIndexFields")]
pub enum ArrayIndex {
    /// An array of positions along a single axis.
    Integer { shape: Vec<usize> },
    /// A mask over `shape.len()` consecutive axes with `count` true
    /// entries.
    Boolean { shape: Vec<usize>, count: usize },
}

impl ArrayIndex {
    pub fn integer(shape: impl Into<Vec<usize>>) -> Self {
        ArrayIndex::Integer {
            shape: shape.into(),
        }
    }

    /// A boolean mask of the given shape with `count` true entries.
    /// The count cannot exceed the number of mask elements.
    pub fn boolean(shape: impl Into<Vec<usize>>, count: usize) -> Result<Self, IndexError> {
        let shape = shape.into();
        check_count(&shape, count)?;
        Ok(ArrayIndex::Boolean { shape, count })
    }

    pub fn dtype(&self) -> ArrayDtype {
        match self {
            ArrayIndex::Integer { .. } => ArrayDtype::Integer,
            ArrayIndex::Boolean { .. } => ArrayDtype::Boolean,
        }
    }

    /// The shape of the index array itself.
    pub fn shape(&self) -> &[usize] {
        match self {
            ArrayIndex::Integer { shape } | ArrayIndex::Boolean { shape, .. } => shape,
        }
    }

    /// The number of array axes this index consumes.
    pub fn consumed_axes(&self) -> usize {
        match self {
            ArrayIndex::Integer { .. } => 1,
            ArrayIndex::Boolean { shape, .. } => shape.len(),
        }
    }

    /// The shape this index contributes to broadcasting. A boolean
    /// mask behaves like the one-dimensional positions of its true
    /// entries.
    pub fn broadcast_shape(&self) -> Vec<usize> {
        match self {
            ArrayIndex::Integer { shape } => shape.clone(),
            ArrayIndex::Boolean { count, .. } => vec![*count],
        }
    }

    /// Check this index against the lengths of the axes it consumes,
    /// starting at axis `axis`.
    pub(crate) fn validate(&self, indexed: &[usize], axis: usize) -> Result<(), IndexError> {
        match self {
            ArrayIndex::Boolean { shape, count } => {
                check_count(shape, *count)?;
                if shape.as_slice() != indexed {
                    return Err(IndexError::BooleanShapeMismatch {
                        index: shape.clone(),
                        indexed: indexed.to_vec(),
                        axis,
                    });
                }
            }
            ArrayIndex::Integer { shape } => {
                // No position exists on an empty axis.
                if indexed == [0] && !shape.contains(&0) {
                    return Err(IndexError::OutOfBounds {
                        index: 0,
                        axis,
                        size: 0,
                    });
                }
            }
        }
        Ok(())
    }
}

/// The number of elements of an array of `shape`, or `None` if it
/// exceeds `usize`.
fn element_count(shape: &[usize]) -> Option<usize> {
    if shape.contains(&0) {
        return Some(0);
    }
    shape.iter().try_fold(1usize, |n, &d| n.checked_mul(d))
}

fn check_count(shape: &[usize], count: usize) -> Result<(), IndexError> {
    // A mask too large to count has room for any `count`.
    if element_count(shape).is_some_and(|n| count > n) {
        return Err(IndexError::BooleanCount {
            shape: shape.to_vec(),
            count,
        });
    }
    Ok(())
}

/// The serialized form of [`ArrayIndex`], checked on the way in.
#[derive(Deserialize)]
enum ArrayIndexFields {
    Integer { shape: Vec<usize> },
    Boolean { shape: Vec<usize>, count: usize },
}

impl TryFrom<ArrayIndexFields> for ArrayIndex {
    type Error = IndexError;

    fn try_from(fields: ArrayIndexFields) -> Result<Self, IndexError> {
        match fields {
            ArrayIndexFields::Integer { shape } => Ok(ArrayIndex::Integer { shape }),
            ArrayIndexFields::Boolean { shape, count } => ArrayIndex::boolean(shape, count),
        }
    }
}

impl fmt::Display for ArrayIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArrayIndex::Integer { shape } => {
                write!(f, "array(int, shape=[{}])", shape.iter().join(", "))
            }
            ArrayIndex::Boolean { shape, count } => write!(
                f,
                "array(bool, shape=[{}], count={})",
                shape.iter().join(", "),
                count
            ),
        }
    }
}

/// Broadcast shapes together: shapes are right-aligned, and each
/// dimension must either agree or be 1.
///
/// ```
/// use ndindex::broadcast_shapes;
///
/// assert_eq!(broadcast_shapes(&[&[3, 1], &[4]]).unwrap(), vec![3, 4]);
/// assert!(broadcast_shapes(&[&[3], &[4]]).is_err());
/// ```
pub fn broadcast_shapes(shapes: &[&[usize]]) -> Result<Vec<usize>, IndexError> {
    let ndim = shapes.iter().map(|s| s.len()).max().unwrap_or(0);
    let mut result = vec![1; ndim];
    for shape in shapes {
        let offset = ndim - shape.len();
        for (d, &size) in shape.iter().enumerate() {
            let target = &mut result[offset + d];
            if *target == 1 {
                *target = size;
            } else if size != 1 && size != *target {
                return Err(IndexError::Broadcast {
                    shapes: shapes.iter().map(|s| s.to_vec()).collect(),
                });
            }
        }
    }
    Ok(result)
}
