// Copyright (c) 2026 The tensor-arena Authors
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The closed set of tensor variants an operator can be configured with.

use crate::{Binding, Coordinates, SubTensor, Tensor, TensorError, TensorInfo};

/// A tensor argument: either an owning [`Tensor`] or an aliasing
/// [`SubTensor`] view.
///
/// Operators store `TensorArg`s at configure time and resolve bindings at
/// run time. The closed enum replaces runtime type inspection: which
/// variant a function was composed with is decided when the pipeline is
/// built, and both variants answer the same stride-aware access surface.
#[derive(Debug, Clone)]
pub enum TensorArg {
    /// An owning tensor.
    Tensor(Tensor),
    /// An aliasing view of a parent tensor.
    View(SubTensor),
}

impl TensorArg {
    /// Returns the argument's metadata.
    ///
    /// Fails with [`TensorError::Uninitialized`] for a tensor that has
    /// not been `init`ed.
    pub fn info(&self) -> Result<TensorInfo, TensorError> {
        match self {
            TensorArg::Tensor(t) => t.info().ok_or(TensorError::Uninitialized),
            TensorArg::View(v) => Ok(v.info().clone()),
        }
    }

    /// Resolves the bound byte range for kernel access.
    pub fn binding(&self) -> Result<Binding, TensorError> {
        match self {
            TensorArg::Tensor(t) => t.binding(),
            TensorArg::View(v) => v.binding(),
        }
    }

    /// Returns `true` if backing storage is currently bound.
    pub fn is_allocated(&self) -> bool {
        match self {
            TensorArg::Tensor(t) => t.is_allocated(),
            TensorArg::View(v) => v.parent().is_allocated(),
        }
    }

    /// Reads the `f32` element at `coords`.
    pub fn read_f32(&self, coords: &Coordinates) -> Result<f32, TensorError> {
        match self {
            TensorArg::Tensor(t) => t.read_f32(coords),
            TensorArg::View(v) => v.read_f32(coords),
        }
    }

    /// Writes the `f32` element at `coords`.
    pub fn write_f32(&self, coords: &Coordinates, value: f32) -> Result<(), TensorError> {
        match self {
            TensorArg::Tensor(t) => t.write_f32(coords, value),
            TensorArg::View(v) => v.write_f32(coords, value),
        }
    }
}

impl From<&Tensor> for TensorArg {
    fn from(t: &Tensor) -> Self {
        TensorArg::Tensor(t.clone())
    }
}

impl From<Tensor> for TensorArg {
    fn from(t: Tensor) -> Self {
        TensorArg::Tensor(t)
    }
}

impl From<&SubTensor> for TensorArg {
    fn from(v: &SubTensor) -> Self {
        TensorArg::View(v.clone())
    }
}

impl From<SubTensor> for TensorArg {
    fn from(v: SubTensor) -> Self {
        TensorArg::View(v)
    }
}
