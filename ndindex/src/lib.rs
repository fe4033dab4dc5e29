//! Index algebra for n-dimensional arrays.
//!
//! Provides [`Index`], a representation of the objects used to index
//! into n-dimensional arrays: integers, [`Slice`]s, ellipses, new
//! axes, tuples of these, and (as an extension) integer and boolean
//! array indices described by their shapes. See [`Index`] for more
//! details.
//!
//! The crate never touches array memory. Given only a shape, it
//! answers:
//!
//! - whether an index is valid ([`Index::validate`]);
//! - its explicit form ([`Index::expand`]) and canonical form
//!   ([`Index::canonicalize`]);
//! - the shape of the result ([`Index::newshape`]);
//! - a single index equivalent to applying two in sequence
//!   ([`compose`]).
//!
//! ```
//! use ndindex::Index;
//! use ndindex::tuple;
//!
//! let index = Index::from(tuple![1, Index::Ellipsis].unwrap());
//! assert_eq!(index.expand(&[4, 5, 6]).unwrap().to_string(), "(1, :, :)");
//! assert_eq!(index.newshape(&[4, 5, 6]).unwrap(), vec![5, 6]);
//! assert_eq!(index.canonicalize(&[4, 5, 6]).unwrap(), Index::from(1));
//! ```

mod error;
pub use error::ErrorKind;
pub use error::IndexError;

mod index;
pub use index::Index;
pub use index::Tuple;

mod slice;
pub use slice::Slice;

/// Integer and boolean array indices, and shape broadcasting.
pub mod array;
pub use array::ArrayDtype;
pub use array::ArrayIndex;
pub use array::broadcast_shapes;

/// Resolving integers and slices against a single axis.
pub mod bounds;
pub use bounds::MAX_AXIS_LEN;
pub use bounds::Position;
pub use bounds::ResolvedSlice;
pub use bounds::check_axis_len;
pub use bounds::resolve_integer;
pub use bounds::resolve_slice;

mod opts;
pub use opts::ALLOW_ARRAY_INDICES_ENV;
pub use opts::IndexOpts;
pub use opts::MAX_NDIM_ENV;

pub mod expand;
pub use expand::AxisIndex;
pub use expand::Expansion;

mod canonical;

mod newshape;

mod compose;
pub use compose::compose;

#[cfg(test)]
mod test_utils;

// Compile-time check: every public value type can be shared across
// threads.
fn _assert_thread_safe()
where
    Index: Send + Sync + 'static,
    Expansion: Send + Sync + 'static,
    IndexError: Send + Sync + 'static,
    IndexOpts: Send + Sync + 'static,
{
}
