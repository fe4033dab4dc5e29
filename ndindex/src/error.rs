use serde::Deserialize;
use serde::Serialize;

/// The type of error for index construction, validation and
/// composition.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum IndexError {
    #[error("index {index} is out of bounds for axis {axis} with size {size}")]
    OutOfBounds { index: i64, axis: usize, size: usize },

    #[error(
        "too many indices for array: array is {ndim}-dimensional, but {given} were indexed"
    )]
    TooManyIndices { ndim: usize, given: usize },

    #[error(
        "boolean index of shape {index:?} did not match indexed shape {indexed:?} \
         starting at axis {axis}"
    )]
    BooleanShapeMismatch {
        index: Vec<usize>,
        indexed: Vec<usize>,
        axis: usize,
    },

    #[error("{ndim} dimensions exceed the maximum of {max}")]
    TooManyDimensions { ndim: usize, max: usize },

    #[error(
        "axis {axis} has length {size}, longer than the maximum of {}",
        crate::bounds::MAX_AXIS_LEN
    )]
    AxisTooLong { axis: usize, size: usize },

    #[error("slice step cannot be zero")]
    ZeroStep,

    #[error("an index can only have a single ellipsis ('...'), found {count}")]
    MultipleEllipsis { count: usize },

    #[error("tuple indices cannot be nested")]
    NestedTuple,

    #[error("boolean index of shape {shape:?} cannot have {count} true entries")]
    BooleanCount { shape: Vec<usize>, count: usize },

    #[error("array indices are disallowed by the index options")]
    ArrayIndexDisallowed,

    #[error("cannot compose indices: {reason}")]
    NotComposable { reason: String },

    #[error(
        "shape mismatch: indexing arrays could not be broadcast together with shapes {shapes:?}"
    )]
    Broadcast { shapes: Vec<Vec<usize>> },
}

/// The coarse classification of an [`IndexError`]:
///
/// - `Index`: a concrete position or arity does not fit the shape.
/// - `Value`: the index itself is malformed, independent of any shape,
///   or the shape has an axis too long to index.
/// - `Broadcast`: array indices have incompatible shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    Index,
    Value,
    Broadcast,
}

impl IndexError {
    /// The kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            IndexError::OutOfBounds { .. }
            | IndexError::TooManyIndices { .. }
            | IndexError::BooleanShapeMismatch { .. }
            | IndexError::TooManyDimensions { .. } => ErrorKind::Index,
            IndexError::ZeroStep
            | IndexError::MultipleEllipsis { .. }
            | IndexError::NestedTuple
            | IndexError::BooleanCount { .. }
            | IndexError::AxisTooLong { .. }
            | IndexError::ArrayIndexDisallowed
            | IndexError::NotComposable { .. } => ErrorKind::Value,
            IndexError::Broadcast { .. } => ErrorKind::Broadcast,
        }
    }
}
