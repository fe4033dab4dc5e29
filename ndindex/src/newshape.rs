use crate::Index;
use crate::IndexError;
use crate::expand::AxisIndex;
use crate::expand::Expansion;

/// One entry of a result layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Dim {
    /// An axis kept by a slice, with its new length.
    Sliced(usize),
    /// An inserted length-1 axis.
    New,
    /// The broadcast block of the array indices.
    Broadcast,
}

impl Expansion {
    /// Whether `op` takes part in fancy indexing. Once any array index
    /// is present, integers behave as 0-d arrays.
    fn is_fancy(&self, op: &AxisIndex) -> bool {
        match op {
            AxisIndex::Array { .. } => true,
            AxisIndex::Integer { .. } => self.has_arrays(),
            AxisIndex::Slice { .. } | AxisIndex::NewAxis => false,
        }
    }

    fn layout(&self) -> Vec<Dim> {
        let fancy: Vec<usize> = self
            .axes()
            .iter()
            .enumerate()
            .filter(|(_, op)| self.is_fancy(op))
            .map(|(i, _)| i)
            .collect();
        // Adjacent fancy indices keep their place; otherwise their
        // block moves to the front.
        let adjacent = fancy.windows(2).all(|w| w[1] == w[0] + 1);

        let mut dims = Vec::with_capacity(self.axes().len());
        if self.has_arrays() && !adjacent {
            dims.push(Dim::Broadcast);
        }
        for (i, op) in self.axes().iter().enumerate() {
            if self.is_fancy(op) {
                if adjacent && fancy.first() == Some(&i) {
                    dims.push(Dim::Broadcast);
                }
                continue;
            }
            match op {
                AxisIndex::Slice { slice, .. } => dims.push(Dim::Sliced(slice.len())),
                AxisIndex::NewAxis => dims.push(Dim::New),
                AxisIndex::Integer { .. } | AxisIndex::Array { .. } => {}
            }
        }
        dims
    }

    /// The shape of the result of indexing an array of shape
    /// [`Expansion::shape`].
    pub fn result_shape(&self) -> Vec<usize> {
        let fancy = self.fancy_shape().unwrap_or(&[]);
        let mut shape = Vec::new();
        for dim in self.layout() {
            match dim {
                Dim::Sliced(len) => shape.push(len),
                Dim::New => shape.push(1),
                Dim::Broadcast => shape.extend_from_slice(fancy),
            }
        }
        shape
    }

    /// Positions in [`Expansion::result_shape`] of the axes inserted
    /// by new axes.
    pub fn new_axes(&self) -> Vec<usize> {
        let fancy = self.fancy_shape().map_or(0, <[usize]>::len);
        let mut positions = Vec::new();
        let mut offset = 0;
        for dim in self.layout() {
            match dim {
                Dim::Sliced(_) => offset += 1,
                Dim::New => {
                    positions.push(offset);
                    offset += 1;
                }
                Dim::Broadcast => offset += fancy,
            }
        }
        positions
    }
}

impl Index {
    /// The shape of the result of applying this index to an array of
    /// shape `shape`.
    ///
    /// ```
    /// use ndindex::Index;
    ///
    /// assert_eq!(Index::from(-3..).newshape(&[10]).unwrap(), vec![3]);
    /// assert!(Index::from(10).newshape(&[5]).is_err());
    /// ```
    pub fn newshape(&self, shape: &[usize]) -> Result<Vec<usize>, IndexError> {
        Ok(Expansion::new(self, shape)?.result_shape())
    }
}
