// Copyright (c) 2026 The tensor-arena Authors
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for tensor storage and aliasing.

use crate::{Coordinates, DType, TensorShape};

/// Errors that can occur while describing, allocating or viewing tensors.
#[derive(Debug, thiserror::Error)]
pub enum TensorError {
    /// A dimension index exceeds the maximum supported rank.
    #[error("dimension {dim} out of range (maximum rank is {max_rank})")]
    DimensionOutOfRange { dim: usize, max_rank: usize },

    /// A shape or coordinate set has more dimensions than supported.
    #[error("rank {rank} exceeds the maximum supported rank {max_rank}")]
    RankTooLarge { rank: usize, max_rank: usize },

    /// The tensor was used before `init` recorded its metadata.
    #[error("tensor is not initialised: call init() before use")]
    Uninitialized,

    /// `allocate` was called on a tensor that already has backing storage.
    #[error("tensor is already allocated")]
    AlreadyAllocated,

    /// Buffer access on a tensor without backing storage.
    #[error("tensor is not allocated: no backing buffer is bound")]
    NotAllocated,

    /// Shape/type mutation attempted while backing storage exists.
    #[error("tensor is not resizable while allocated: free() it first")]
    NotResizable,

    /// Element access outside the valid region.
    #[error("coordinates {coords} are outside the valid region of shape {shape}")]
    CoordinatesOutOfBounds {
        coords: Coordinates,
        shape: TensorShape,
    },

    /// A sub-tensor region does not fit inside its parent.
    #[error(
        "sub-tensor region (coords {coords}, shape {shape}) exceeds parent shape {parent} \
         and extend_parent is not set"
    )]
    RegionOutOfBounds {
        coords: Coordinates,
        shape: TensorShape,
        parent: TensorShape,
    },

    /// Negative coordinates are not valid sub-tensor anchors.
    #[error("sub-tensor coordinates {coords} contain a negative offset")]
    NegativeCoordinates { coords: Coordinates },

    /// The element type does not match the accessor or operation.
    #[error("dtype mismatch: expected {expected}, got {actual}")]
    DTypeMismatch { expected: DType, actual: DType },

    /// Two shapes are incompatible for the requested operation.
    #[error("incompatible shapes for {op}: {lhs} vs {rhs}")]
    ShapeMismatch {
        op: &'static str,
        lhs: TensorShape,
        rhs: TensorShape,
    },

    /// A bulk import was given the wrong number of elements.
    #[error("element count mismatch: expected {expected}, got {actual}")]
    ElementCountMismatch { expected: usize, actual: usize },
}
