// Copyright (c) 2026 The tensor-arena Authors
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Tensor shape descriptors and dimension utilities.

use crate::{DType, TensorError};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Maximum number of dimensions a shape or coordinate set may carry.
pub const MAX_RANK: usize = 6;

/// Describes the dimensionality of a [`crate::Tensor`].
///
/// Extents are stored outermost-first in row-major (C) order: the last
/// dimension is the fastest-moving one in memory. Trailing dimensions of
/// size 1 are insignificant — `[2, 3]` and `[2, 3, 1]` compare equal and
/// describe the same element layout.
///
/// # Examples
/// ```
/// use tensor_core::TensorShape;
/// let s = TensorShape::new(vec![2, 3, 4]).unwrap();
/// assert_eq!(s.rank(), 3);
/// assert_eq!(s.total_size(), 24);
/// ```
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(into = "Vec<usize>", try_from = "Vec<usize>")]
pub struct TensorShape {
    dims: Vec<usize>,
}

impl TensorShape {
    /// Creates a new shape from the given extents.
    ///
    /// Fails with [`TensorError::RankTooLarge`] if more than [`MAX_RANK`]
    /// dimensions are given.
    pub fn new(dims: Vec<usize>) -> Result<Self, TensorError> {
        if dims.len() > MAX_RANK {
            return Err(TensorError::RankTooLarge {
                rank: dims.len(),
                max_rank: MAX_RANK,
            });
        }
        Ok(Self { dims })
    }

    /// Creates a scalar shape (rank 0, one element).
    pub fn scalar() -> Self {
        Self { dims: vec![] }
    }

    /// Creates a 1-D shape.
    pub fn vector(len: usize) -> Self {
        Self { dims: vec![len] }
    }

    /// Creates a 2-D shape.
    pub fn matrix(rows: usize, cols: usize) -> Self {
        Self {
            dims: vec![rows, cols],
        }
    }

    /// Returns the number of dimensions (rank).
    pub fn rank(&self) -> usize {
        self.dims.len()
    }

    /// Returns the extents as a slice.
    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    /// Returns the extent of one dimension, or `None` if out of bounds.
    pub fn dim(&self, index: usize) -> Option<usize> {
        self.dims.get(index).copied()
    }

    /// Returns the extent of one dimension, treating dimensions beyond the
    /// rank as having size 1.
    pub fn dim_or_one(&self, index: usize) -> usize {
        self.dims.get(index).copied().unwrap_or(1)
    }

    /// Sets the extent of one dimension.
    ///
    /// Growing beyond the current rank fills intervening dimensions with 1.
    /// Fails with [`TensorError::DimensionOutOfRange`] if `dim` is not below
    /// [`MAX_RANK`].
    pub fn set(&mut self, dim: usize, extent: usize) -> Result<(), TensorError> {
        if dim >= MAX_RANK {
            return Err(TensorError::DimensionOutOfRange {
                dim,
                max_rank: MAX_RANK,
            });
        }
        if dim >= self.dims.len() {
            self.dims.resize(dim + 1, 1);
        }
        self.dims[dim] = extent;
        Ok(())
    }

    /// Returns the total number of elements.
    ///
    /// The product of all extents: 0 if any extent is 0, and 1 for a
    /// scalar (rank 0) shape.
    pub fn total_size(&self) -> usize {
        self.dims.iter().product()
    }

    /// Computes the memory footprint in bytes for a given [`DType`].
    pub fn size_bytes(&self, dtype: DType) -> usize {
        self.total_size() * dtype.size_bytes()
    }

    /// Computes row-major (C-order) strides in bytes, given the element
    /// size in bytes.
    ///
    /// The stride for dimension `i` is the number of bytes to skip in the
    /// flat buffer to advance one step along that dimension.
    pub fn strides_in_bytes(&self, element_size: usize) -> Vec<usize> {
        let rank = self.dims.len();
        if rank == 0 {
            return vec![];
        }
        let mut strides = vec![0usize; rank];
        strides[rank - 1] = element_size;
        for i in (0..rank - 1).rev() {
            strides[i] = strides[i + 1] * self.dims[i + 1];
        }
        strides
    }

    /// Returns `true` if two shapes are broadcast-compatible.
    ///
    /// Dimensions are aligned from the left (trailing dimensions of the
    /// longer shape count as size 1); each pair must be equal or contain
    /// a 1.
    pub fn is_broadcast_compatible(&self, other: &TensorShape) -> bool {
        let rank = self.rank().max(other.rank());
        (0..rank).all(|i| {
            let a = self.dim_or_one(i);
            let b = other.dim_or_one(i);
            a == b || a == 1 || b == 1
        })
    }

    /// Extents with trailing size-1 dimensions stripped.
    fn significant_dims(&self) -> &[usize] {
        let mut end = self.dims.len();
        while end > 0 && self.dims[end - 1] == 1 {
            end -= 1;
        }
        &self.dims[..end]
    }
}

/// Deserialization routes through the checked constructor, so the wire
/// format is a plain extent array and the rank cap cannot be bypassed.
impl TryFrom<Vec<usize>> for TensorShape {
    type Error = TensorError;

    fn try_from(dims: Vec<usize>) -> Result<Self, TensorError> {
        Self::new(dims)
    }
}

impl From<TensorShape> for Vec<usize> {
    fn from(shape: TensorShape) -> Self {
        shape.dims
    }
}

/// Equality ignores trailing size-1 dimensions.
impl PartialEq for TensorShape {
    fn eq(&self, other: &Self) -> bool {
        self.significant_dims() == other.significant_dims()
    }
}

impl Eq for TensorShape {}

impl Hash for TensorShape {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.significant_dims().hash(state);
    }
}

impl fmt::Display for TensorShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, d) in self.dims.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{d}")?;
        }
        write!(f, "]")
    }
}
