// Copyright (c) 2026 The tensor-arena Authors
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Signed per-dimension offsets into a tensor's index space.

use crate::{TensorError, MAX_RANK};
use std::fmt;

/// The position of a sub-region's origin within a parent's index space.
///
/// Offsets are signed so that anchors can also describe regions that start
/// before a tensor's own origin (e.g. a valid region inset by padding).
/// Dimensions beyond the stored rank read as 0.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(into = "Vec<isize>", try_from = "Vec<isize>")]
pub struct Coordinates {
    coords: Vec<isize>,
}

impl Coordinates {
    /// Creates coordinates from the given offsets.
    ///
    /// Fails with [`TensorError::RankTooLarge`] if more than [`MAX_RANK`]
    /// offsets are given.
    pub fn new(coords: &[isize]) -> Result<Self, TensorError> {
        if coords.len() > MAX_RANK {
            return Err(TensorError::RankTooLarge {
                rank: coords.len(),
                max_rank: MAX_RANK,
            });
        }
        Ok(Self {
            coords: coords.to_vec(),
        })
    }

    /// Creates all-zero coordinates of the given rank.
    pub fn zero(rank: usize) -> Result<Self, TensorError> {
        if rank > MAX_RANK {
            return Err(TensorError::RankTooLarge {
                rank,
                max_rank: MAX_RANK,
            });
        }
        Ok(Self {
            coords: vec![0; rank],
        })
    }

    /// Returns the number of stored dimensions.
    pub fn rank(&self) -> usize {
        self.coords.len()
    }

    /// Returns the offset for one dimension; dimensions beyond the stored
    /// rank read as 0.
    pub fn dim(&self, index: usize) -> isize {
        self.coords.get(index).copied().unwrap_or(0)
    }

    /// Sets the offset for one dimension, growing with zeros as needed.
    ///
    /// Fails with [`TensorError::DimensionOutOfRange`] if `dim` is not
    /// below [`MAX_RANK`].
    pub fn set(&mut self, dim: usize, offset: isize) -> Result<(), TensorError> {
        if dim >= MAX_RANK {
            return Err(TensorError::DimensionOutOfRange {
                dim,
                max_rank: MAX_RANK,
            });
        }
        if dim >= self.coords.len() {
            self.coords.resize(dim + 1, 0);
        }
        self.coords[dim] = offset;
        Ok(())
    }

    /// Returns the offsets as a slice.
    pub fn as_slice(&self) -> &[isize] {
        &self.coords
    }

    /// Returns `true` if any stored offset is negative.
    pub fn has_negative(&self) -> bool {
        self.coords.iter().any(|&c| c < 0)
    }
}

/// Deserialization routes through the checked constructor, so the rank
/// cap cannot be bypassed.
impl TryFrom<Vec<isize>> for Coordinates {
    type Error = TensorError;

    fn try_from(coords: Vec<isize>) -> Result<Self, TensorError> {
        Self::new(&coords)
    }
}

impl From<Coordinates> for Vec<isize> {
    fn from(coords: Coordinates) -> Self {
        coords.coords
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, c) in self.coords.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{c}")?;
        }
        write!(f, ")")
    }
}
