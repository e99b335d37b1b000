// Copyright (c) 2026 The tensor-arena Authors
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The owning tensor type and its `init → allocate → free` lifecycle.

use crate::storage::Storage;
use crate::{Binding, Coordinates, DType, TensorError, TensorInfo, TensorShape};
use std::cell::RefCell;
use std::rc::Rc;

/// Shared state behind every handle to one logical tensor.
#[derive(Debug)]
struct TensorState {
    info: Option<TensorInfo>,
    storage: Storage,
}

/// An owning, n-dimensional tensor with an explicit lifecycle:
///
/// ```text
/// Tensor::new() ──init(info)──► initialised ──allocate()──► allocated
///                                   ▲                           │
///                                   └──────────free()───────────┘
/// ```
///
/// - `init` records shape and element type without allocating.
/// - `allocate` commits a **zero-initialised** backing buffer of
///   `total_size_in_bytes()` (documented choice: padding and alias
///   regions always have deterministic content).
/// - Once allocated, shape and type are immutable until `free`.
///
/// `Tensor` is a cheap-clone handle: clones share the same state, so a
/// [`crate::SubTensor`] view or a memory group holding a clone observes
/// allocation and buffer rebinding. Handles are single-threaded (`Rc`).
///
/// # Example
/// ```
/// use tensor_core::{Coordinates, DType, Tensor, TensorInfo, TensorShape};
///
/// let t = Tensor::new();
/// t.init(TensorInfo::new(TensorShape::matrix(2, 2), DType::F32)).unwrap();
/// t.allocate().unwrap();
/// t.write_f32(&Coordinates::new(&[1, 1]).unwrap(), 4.0).unwrap();
/// assert_eq!(t.read_f32(&Coordinates::new(&[1, 1]).unwrap()).unwrap(), 4.0);
/// t.free();
/// assert!(t.buffer_ptr().is_none());
/// ```
#[derive(Clone)]
pub struct Tensor {
    state: Rc<RefCell<TensorState>>,
}

impl Tensor {
    /// Creates an empty tensor with no metadata and no storage.
    pub fn new() -> Self {
        Self {
            state: Rc::new(RefCell::new(TensorState {
                info: None,
                storage: Storage::Unbound,
            })),
        }
    }

    /// Records the tensor's metadata without allocating storage.
    ///
    /// Re-initialising an unallocated tensor replaces its metadata.
    /// Fails with [`TensorError::NotResizable`] while storage is bound.
    pub fn init(&self, info: TensorInfo) -> Result<(), TensorError> {
        let mut state = self.state.borrow_mut();
        if state.storage.is_bound() {
            return Err(TensorError::NotResizable);
        }
        state.info = Some(info);
        Ok(())
    }

    /// Returns a copy of the tensor's metadata, if `init` has been called.
    pub fn info(&self) -> Option<TensorInfo> {
        self.state.borrow().info.clone()
    }

    /// Commits a zero-initialised backing buffer sized by the metadata.
    ///
    /// # Errors
    /// - [`TensorError::Uninitialized`] if `init` was never called.
    /// - [`TensorError::AlreadyAllocated`] if storage is already bound.
    pub fn allocate(&self) -> Result<(), TensorError> {
        let mut state = self.state.borrow_mut();
        if state.storage.is_bound() {
            return Err(TensorError::AlreadyAllocated);
        }
        let info = state.info.as_ref().ok_or(TensorError::Uninitialized)?;
        let len = info.total_size_in_bytes();
        let buf = Rc::new(RefCell::new(vec![0u8; len]));
        state.storage = Storage::Bound {
            buf,
            offset: 0,
            len,
        };
        Ok(())
    }

    /// Releases the backing storage. Metadata is kept, so the tensor can
    /// be re-`allocate`d. Buffer access fails until then.
    pub fn free(&self) {
        self.state.borrow_mut().storage = Storage::Unbound;
    }

    /// Returns `true` if backing storage is currently bound.
    pub fn is_allocated(&self) -> bool {
        self.state.borrow().storage.is_bound()
    }

    /// Binds this tensor to a range of an externally owned buffer.
    ///
    /// Used by the memory planner to lease arena bytes to registered
    /// tensors. No element data is moved or copied — only the
    /// (buffer, offset) pair changes.
    ///
    /// # Errors
    /// - [`TensorError::Uninitialized`] without prior `init`.
    /// - [`TensorError::AlreadyAllocated`] if storage is already bound.
    ///
    /// # Panics
    /// Panics if the buffer is too small for `offset` plus the tensor's
    /// byte footprint (an internal planner contract violation).
    pub fn bind_to(&self, buf: Rc<RefCell<Vec<u8>>>, offset: usize) -> Result<(), TensorError> {
        let mut state = self.state.borrow_mut();
        if state.storage.is_bound() {
            return Err(TensorError::AlreadyAllocated);
        }
        let info = state.info.as_ref().ok_or(TensorError::Uninitialized)?;
        let len = info.total_size_in_bytes();
        assert!(
            buf.borrow().len() >= offset + len,
            "arena buffer too small: need {} bytes at offset {}, have {}",
            len,
            offset,
            buf.borrow().len(),
        );
        state.storage = Storage::Bound { buf, offset, len };
        Ok(())
    }

    /// Resolves the bound byte range for kernel access.
    pub fn binding(&self) -> Result<Binding, TensorError> {
        self.state
            .borrow()
            .storage
            .binding()
            .ok_or(TensorError::NotAllocated)
    }

    /// Returns the base pointer of the backing buffer, or `None` while
    /// unallocated. Diagnostic use (aliasing assertions, tests).
    pub fn buffer_ptr(&self) -> Option<*const u8> {
        self.state
            .borrow()
            .storage
            .binding()
            .map(|b| b.base_ptr())
    }

    /// Computes the address of the element at `coords`.
    ///
    /// Coordinates outside the valid region are a checked error, never
    /// undefined behaviour.
    pub fn ptr_to_element(&self, coords: &Coordinates) -> Result<*const u8, TensorError> {
        let info = self.info().ok_or(TensorError::Uninitialized)?;
        let offset = info.offset_element_in_bytes(coords)?;
        Ok(self.binding()?.base_ptr().wrapping_add(offset))
    }

    /// Reads the `f32` element at `coords`.
    pub fn read_f32(&self, coords: &Coordinates) -> Result<f32, TensorError> {
        let (binding, offset) = self.element_access(coords, DType::F32)?;
        Ok(binding.read_f32(offset))
    }

    /// Writes the `f32` element at `coords`.
    pub fn write_f32(&self, coords: &Coordinates, value: f32) -> Result<(), TensorError> {
        let (binding, offset) = self.element_access(coords, DType::F32)?;
        binding.write_f32(offset, value);
        Ok(())
    }

    /// Reads the `u8` element at `coords`.
    pub fn read_u8(&self, coords: &Coordinates) -> Result<u8, TensorError> {
        let (binding, offset) = self.element_access(coords, DType::U8)?;
        Ok(binding.read_u8(offset))
    }

    /// Writes the `u8` element at `coords`.
    pub fn write_u8(&self, coords: &Coordinates, value: u8) -> Result<(), TensorError> {
        let (binding, offset) = self.element_access(coords, DType::U8)?;
        binding.write_u8(offset, value);
        Ok(())
    }

    /// Copies all elements out in row-major order. `F32` tensors only.
    pub fn export_f32(&self) -> Result<Vec<f32>, TensorError> {
        let info = self.typed_info(DType::F32)?;
        let binding = self.binding()?;
        Ok(info.iter_offsets().map(|o| binding.read_f32(o)).collect())
    }

    /// Fills the tensor from a row-major slice. `F32` tensors only.
    ///
    /// Fails with [`TensorError::ElementCountMismatch`] if `values` does
    /// not hold exactly `total_size()` elements.
    pub fn import_f32(&self, values: &[f32]) -> Result<(), TensorError> {
        let info = self.typed_info(DType::F32)?;
        let expected = info.shape().total_size();
        if values.len() != expected {
            return Err(TensorError::ElementCountMismatch {
                expected,
                actual: values.len(),
            });
        }
        let binding = self.binding()?;
        for (offset, &v) in info.iter_offsets().zip(values) {
            binding.write_f32(offset, v);
        }
        Ok(())
    }

    /// Grows the shape so that every dimension covers `min_extents`.
    ///
    /// The `extend_parent` escape hatch for sub-tensors. Only legal while
    /// unallocated; strides, sizes and the valid region are recomputed.
    pub(crate) fn grow_shape(&self, min_extents: &TensorShape) -> Result<(), TensorError> {
        let mut state = self.state.borrow_mut();
        if state.storage.is_bound() {
            return Err(TensorError::NotResizable);
        }
        let info = state.info.as_ref().ok_or(TensorError::Uninitialized)?;
        let rank = info.shape().rank().max(min_extents.rank());
        let mut dims = Vec::with_capacity(rank);
        for i in 0..rank {
            dims.push(info.shape().dim_or_one(i).max(min_extents.dim_or_one(i)));
        }
        let grown = TensorShape::new(dims)?;
        state.info = Some(TensorInfo::with_channels(
            grown,
            info.dtype(),
            info.num_channels(),
        ));
        Ok(())
    }

    fn typed_info(&self, dtype: DType) -> Result<TensorInfo, TensorError> {
        let info = self.info().ok_or(TensorError::Uninitialized)?;
        if info.dtype() != dtype {
            return Err(TensorError::DTypeMismatch {
                expected: dtype,
                actual: info.dtype(),
            });
        }
        Ok(info)
    }

    fn element_access(
        &self,
        coords: &Coordinates,
        dtype: DType,
    ) -> Result<(Binding, usize), TensorError> {
        let info = self.typed_info(dtype)?;
        let offset = info.offset_element_in_bytes(coords)?;
        Ok((self.binding()?, offset))
    }
}

impl Default for Tensor {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Tensor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.borrow();
        let mut d = f.debug_struct("Tensor");
        match &state.info {
            Some(info) => d
                .field("shape", &format_args!("{}", info.shape()))
                .field("dtype", &info.dtype()),
            None => d.field("info", &"uninitialised"),
        };
        d.field("allocated", &state.storage.is_bound()).finish()
    }
}
