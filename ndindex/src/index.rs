use std::fmt;
use std::ops;

use enum_as_inner::EnumAsInner;
use itertools::Itertools;
use serde::Deserialize;
use serde::Serialize;

use crate::ArrayIndex;
use crate::IndexError;
use crate::Slice;

/// An index into an n-dimensional array.
///
/// `Index` is a closed set of variants; every operation in this crate
/// handles each of them explicitly. Values are immutable and compare
/// structurally. Structural equality is conservative: different
/// spellings of the same selection (say `0:10` and `:` on an axis of
/// length 10) compare unequal until both are canonicalized against a
/// shape with [`Index::canonicalize`].
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    EnumAsInner
)]
pub enum Index {
    /// Selects a single element, removing the axis.
    Integer(i64),

    /// Selects a strided range, keeping the axis.
    Slice(Slice),

    /// Stands for as many full slices as needed to index every axis.
    Ellipsis,

    /// Inserts an axis of length 1 without consuming one.
    NewAxis,

    /// One sub-index per consumed axis, in order.
    Tuple(Tuple),

    /// An integer or boolean array index.
    Array(ArrayIndex),
}

impl Index {
    /// The sub-indices of this index: the elements of a tuple, or the
    /// index itself otherwise.
    pub fn elements(&self) -> &[Index] {
        match self {
            Index::Tuple(tuple) => tuple.elements(),
            other => std::slice::from_ref(other),
        }
    }

    pub fn has_ellipsis(&self) -> bool {
        self.elements().contains(&Index::Ellipsis)
    }

    /// The position of the ellipsis among [`Index::elements`], or the
    /// number of elements if there is none (where the implicit
    /// ellipsis sits).
    pub fn ellipsis_index(&self) -> usize {
        let elements = self.elements();
        elements
            .iter()
            .position(|e| *e == Index::Ellipsis)
            .unwrap_or(elements.len())
    }

    /// The number of array axes this index consumes, not counting
    /// axes filled in by an ellipsis or implicit trailing slices.
    pub fn consumed_axes(&self) -> usize {
        self.elements()
            .iter()
            .map(|e| match e {
                Index::Integer(_) | Index::Slice(_) => 1,
                Index::Array(array) => array.consumed_axes(),
                Index::Ellipsis | Index::NewAxis | Index::Tuple(_) => 0,
            })
            .sum()
    }
}

impl fmt::Display for Index {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Index::Integer(value) => write!(f, "{}", value),
            Index::Slice(slice) => write!(f, "{}", slice),
            Index::Ellipsis => write!(f, "..."),
            Index::NewAxis => write!(f, "newaxis"),
            Index::Tuple(tuple) => write!(f, "{}", tuple),
            Index::Array(array) => write!(f, "{}", array),
        }
    }
}

/// A sequence of sub-indices, one per consumed axis, interleaved with
/// new axes and at most one ellipsis. Tuples do not nest.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "Vec<Index>", into = "Vec<Index>")]
pub struct Tuple {
    elements: Vec<Index>,
}

impl Tuple {
    /// Create a tuple, rejecting nested tuples and repeated ellipses.
    pub fn new(elements: impl IntoIterator<Item = Index>) -> Result<Self, IndexError> {
        let elements: Vec<Index> = elements.into_iter().collect();
        if elements.iter().any(Index::is_tuple) {
            return Err(IndexError::NestedTuple);
        }
        let count = elements.iter().filter(|e| e.is_ellipsis()).count();
        if count > 1 {
            return Err(IndexError::MultipleEllipsis { count });
        }
        Ok(Self { elements })
    }

    /// The empty tuple, `()`, which selects everything.
    pub fn empty() -> Self {
        Self {
            elements: Vec::new(),
        }
    }

    /// Build a tuple from elements already known to satisfy the
    /// tuple invariants.
    pub(crate) fn from_valid(elements: Vec<Index>) -> Self {
        debug_assert!(elements.iter().all(|e| !e.is_tuple()));
        debug_assert!(elements.iter().filter(|e| e.is_ellipsis()).count() <= 1);
        Self { elements }
    }

    pub fn elements(&self) -> &[Index] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Index> {
        self.elements.iter()
    }

    pub fn into_inner(self) -> Vec<Index> {
        self.elements
    }
}

impl TryFrom<Vec<Index>> for Tuple {
    type Error = IndexError;

    fn try_from(elements: Vec<Index>) -> Result<Self, Self::Error> {
        Tuple::new(elements)
    }
}

impl From<Tuple> for Vec<Index> {
    fn from(tuple: Tuple) -> Self {
        tuple.elements
    }
}

impl<'a> IntoIterator for &'a Tuple {
    type Item = &'a Index;
    type IntoIter = std::slice::Iter<'a, Index>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}

impl fmt::Display for Tuple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.elements.as_slice() {
            [single] => write!(f, "({},)", single),
            elements => write!(f, "({})", elements.iter().join(", ")),
        }
    }
}

/// Construct a [`Tuple`] from expressions convertible into [`Index`].
/// Evaluates to `Result<Tuple, IndexError>`.
///
/// ```
/// use ndindex::Index;
/// use ndindex::tuple;
///
/// let t = tuple![1, Index::Ellipsis, 2..8, Index::NewAxis].unwrap();
/// assert_eq!(t.to_string(), "(1, ..., 2:8, newaxis)");
/// assert!(tuple![Index::Ellipsis, Index::Ellipsis].is_err());
/// ```
#[macro_export]
macro_rules! tuple {
    ( $( $index:expr ),* $(,)? ) => {
        $crate::Tuple::new(vec![ $( $crate::Index::from($index) ),* ])
    };
}

impl From<Slice> for Index {
    fn from(slice: Slice) -> Self {
        Index::Slice(slice)
    }
}

impl From<Tuple> for Index {
    fn from(tuple: Tuple) -> Self {
        Index::Tuple(tuple)
    }
}

impl From<ArrayIndex> for Index {
    fn from(array: ArrayIndex) -> Self {
        Index::Array(array)
    }
}

impl From<ops::RangeFull> for Index {
    fn from(r: ops::RangeFull) -> Self {
        Index::Slice(r.into())
    }
}

macro_rules! impl_index_from_integers {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Index {
                fn from(value: $t) -> Self {
                    Index::Integer(value as i64)
                }
            }
        )*
    };
}

impl_index_from_integers!(i32, i64, isize);

macro_rules! impl_index_from_ranges {
    ($($t:ty),*) => {
        $(
            impl From<ops::Range<$t>> for Index {
                fn from(r: ops::Range<$t>) -> Self {
                    Index::Slice(r.into())
                }
            }

            impl From<ops::RangeFrom<$t>> for Index {
                fn from(r: ops::RangeFrom<$t>) -> Self {
                    Index::Slice(r.into())
                }
            }

            impl From<ops::RangeTo<$t>> for Index {
                fn from(r: ops::RangeTo<$t>) -> Self {
                    Index::Slice(r.into())
                }
            }

            impl From<ops::RangeInclusive<$t>> for Index {
                fn from(r: ops::RangeInclusive<$t>) -> Self {
                    Index::Slice(r.into())
                }
            }

            impl From<ops::RangeToInclusive<$t>> for Index {
                fn from(r: ops::RangeToInclusive<$t>) -> Self {
                    Index::Slice(r.into())
                }
            }
        )*
    };
}

impl_index_from_ranges!(i32, i64);
