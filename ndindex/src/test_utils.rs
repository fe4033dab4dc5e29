//! Test support: a naive reference model of basic indexing, and
//! `proptest` strategies for shapes and indices.
//!
//! The model materializes an array whose elements are their own
//! row-major offsets and applies an index one element at a time. It
//! shares no code with the engine, so agreement between the two is
//! meaningful.

use proptest::collection::vec;
use proptest::prelude::*;

use crate::Index;
use crate::Slice;
use crate::Tuple;

/// A materialized array of element ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct Reference {
    shape: Vec<usize>,
    data: Vec<usize>,
}

impl Reference {
    /// The array of `shape` whose elements are `0, 1, 2, ...` in
    /// row-major order.
    pub(crate) fn iota(shape: &[usize]) -> Self {
        Self {
            shape: shape.to_vec(),
            data: (0..shape.iter().product()).collect(),
        }
    }

    pub(crate) fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Apply a basic index, or return `None` if it is not valid for
    /// this array.
    pub(crate) fn apply(&self, index: &Index) -> Option<Reference> {
        let elements: Vec<&Index> = match index {
            Index::Tuple(tuple) => tuple.iter().collect(),
            other => vec![other],
        };
        let consumed = elements
            .iter()
            .filter(|e| matches!(e, Index::Integer(_) | Index::Slice(_)))
            .count();
        let fill = self.shape.len().checked_sub(consumed)?;

        let full = Index::Slice(Slice::full());
        let mut explicit = Vec::new();
        let mut filled = false;
        for element in elements {
            if *element == Index::Ellipsis {
                explicit.extend(std::iter::repeat(&full).take(fill));
                filled = true;
            } else {
                explicit.push(element);
            }
        }
        if !filled {
            explicit.extend(std::iter::repeat(&full).take(fill));
        }

        let mut result = self.clone();
        let mut axis = 0;
        for element in explicit {
            match element {
                Index::Integer(value) => {
                    let n = result.shape[axis] as i64;
                    let position = if *value < 0 { *value + n } else { *value };
                    if position < 0 || position >= n {
                        return None;
                    }
                    result = result.take(axis, &[position as usize], false);
                }
                Index::Slice(slice) => {
                    let positions = reference_slice_positions(slice, result.shape[axis]);
                    result = result.take(axis, &positions, true);
                    axis += 1;
                }
                Index::NewAxis => {
                    result.shape.insert(axis, 1);
                    axis += 1;
                }
                other => panic!("reference model cannot apply {}", other),
            }
        }
        Some(result)
    }

    /// Gather `positions` along `axis`, keeping the axis or dropping it.
    fn take(&self, axis: usize, positions: &[usize], keep: bool) -> Self {
        let outer: usize = self.shape[..axis].iter().product();
        let n = self.shape[axis];
        let inner: usize = self.shape[axis + 1..].iter().product();

        let mut data = Vec::with_capacity(outer * positions.len() * inner);
        for o in 0..outer {
            for &p in positions {
                let base = (o * n + p) * inner;
                data.extend_from_slice(&self.data[base..base + inner]);
            }
        }
        let mut shape = self.shape.clone();
        if keep {
            shape[axis] = positions.len();
        } else {
            shape.remove(axis);
        }
        Self { shape, data }
    }
}

/// The positions `slice` selects on an axis of length `size`, computed
/// by clamping the bounds and stepping from start until stop.
pub(crate) fn reference_slice_positions(slice: &Slice, size: usize) -> Vec<usize> {
    let n = size as i128;
    let step = slice.step() as i128;
    let (lower, upper) = if step < 0 { (-1, n - 1) } else { (0, n) };
    let adjust = |bound: Option<i64>, default: i128| match bound {
        None => default,
        Some(b) if b < 0 => (b as i128 + n).max(lower),
        Some(b) => (b as i128).min(upper),
    };
    let (start, stop) = if step < 0 {
        (adjust(slice.start(), upper), adjust(slice.stop(), lower))
    } else {
        (adjust(slice.start(), lower), adjust(slice.stop(), upper))
    };

    let mut positions = Vec::new();
    let mut i = start;
    while (step > 0 && i < stop) || (step < 0 && i > stop) {
        positions.push(i as usize);
        i += step;
    }
    positions
}

/// Slices with bounds in `-bound..=bound` and steps of magnitude at
/// most `bound`; any part may be omitted.
pub(crate) fn arb_slice(bound: i64) -> impl Strategy<Value = Slice> {
    let endpoint = || proptest::option::of(-bound..=bound);
    let step = (1..=bound.max(1), any::<bool>())
        .prop_map(|(m, negative)| if negative { -m } else { m });
    (endpoint(), endpoint(), proptest::option::of(step))
        .prop_map(|(start, stop, step)| Slice::new(start, stop, step).unwrap())
}

pub(crate) fn arb_shape() -> impl Strategy<Value = Vec<usize>> {
    vec(0usize..5, 0..4)
}

/// Basic indices with up to `ndim + 1` integers, slices and new axes,
/// and possibly an ellipsis. Many are invalid for any given shape.
pub(crate) fn arb_index(ndim: usize) -> impl Strategy<Value = Index> {
    let element = prop_oneof![
        3 => (-6i64..6).prop_map(Index::Integer),
        3 => arb_slice(6).prop_map(Index::Slice),
        1 => Just(Index::NewAxis),
    ];
    (
        vec(element, 0..=ndim + 1),
        proptest::option::of(any::<proptest::sample::Index>()),
        any::<bool>(),
    )
        .prop_map(|(mut elements, ellipsis, bare)| {
            if let Some(at) = ellipsis {
                elements.insert(at.index(elements.len() + 1), Index::Ellipsis);
            }
            if bare && elements.len() == 1 {
                elements.remove(0)
            } else {
                Index::Tuple(Tuple::from_valid(elements))
            }
        })
}

pub(crate) fn arb_shape_and_index() -> impl Strategy<Value = (Vec<usize>, Index)> {
    arb_shape().prop_flat_map(|shape| {
        let ndim = shape.len();
        (Just(shape), arb_index(ndim))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuple;

    #[test]
    fn test_reference_model() {
        let array = Reference::iota(&[2, 3]);
        let row = array.apply(&Index::from(1)).unwrap();
        assert_eq!(row.shape(), &[3]);
        assert_eq!(row.data, vec![3, 4, 5]);

        let column = array.apply(&Index::from(tuple![.., -1].unwrap())).unwrap();
        assert_eq!(column.shape(), &[2]);
        assert_eq!(column.data, vec![2, 5]);

        let reverse = Slice::new(None, None, Some(-2)).unwrap();
        let reversed = array
            .apply(&Index::from(tuple![Index::Ellipsis, reverse].unwrap()))
            .unwrap();
        assert_eq!(reversed.shape(), &[2, 2]);
        assert_eq!(reversed.data, vec![2, 0, 5, 3]);

        let lifted = array.apply(&Index::from(tuple![0, Index::NewAxis].unwrap())).unwrap();
        assert_eq!(lifted.shape(), &[1, 3]);

        assert!(array.apply(&Index::from(2)).is_none());
        assert!(array.apply(&Index::from(tuple![0, 0, 0].unwrap())).is_none());
        assert!(Reference::iota(&[0]).apply(&Index::from(..)).unwrap().is_empty());
    }

    #[test]
    fn test_reference_slice_positions() {
        let positions = |start, stop, step, n| {
            reference_slice_positions(&Slice::new(start, stop, step).unwrap(), n)
        };
        assert_eq!(positions(None, None, None, 4), vec![0, 1, 2, 3]);
        assert_eq!(positions(None, None, Some(-1), 4), vec![3, 2, 1, 0]);
        assert_eq!(positions(Some(-3), None, None, 10), vec![7, 8, 9]);
        assert_eq!(positions(None, Some(-1), Some(-1), 4), Vec::<usize>::new());
        assert_eq!(positions(Some(-100), Some(100), Some(3), 7), vec![0, 3, 6]);
    }
}
