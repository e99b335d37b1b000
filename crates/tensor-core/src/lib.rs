// Copyright (c) 2026 The tensor-arena Authors
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # tensor-core
//!
//! Tensor value types, owning storage and aliasing sub-tensor views for
//! composing operator pipelines without redundant allocation.
//!
//! This crate provides:
//! - [`TensorShape`] / [`Coordinates`] — bounded-rank extents and signed
//!   per-dimension offsets.
//! - [`DType`] — supported element data types (f32, f16, u8, i8, i32).
//! - [`TensorInfo`] — shape, strides, element type and [`ValidRegion`]
//!   metadata describing a tensor's storage.
//! - [`Tensor`] — an owning tensor with an explicit
//!   `init → allocate → free` lifecycle.
//! - [`SubTensor`] — a non-owning view aliasing a coordinate-offset slice
//!   of a parent tensor's storage.
//! - [`TensorArg`] — the closed set of tensor variants an operator can be
//!   configured with.
//!
//! # Ownership Model
//!
//! ```text
//! Tensor ──┐
//!          ├──► Rc<RefCell<TensorState>> ──► buffer bytes
//! Tensor ──┘         ▲
//! (clone)            │ shared storage
//!               SubTensor (shape + coordinate offset)
//! ```
//!
//! A `Tensor` is a cheap-clone handle over shared state, so views and the
//! memory planner observe allocation and buffer rebinding through the same
//! cell. A `SubTensor` keeps its parent's storage alive, which makes the
//! classic "view outlives parent" bug unrepresentable.
//!
//! # Thread Model
//! Storage is `Rc`-shared: a tensor and every view of it belong to the
//! thread that created them. Independent pipelines on different threads
//! use independent tensors.
//!
//! # Example
//! ```
//! use tensor_core::{Coordinates, DType, SubTensor, Tensor, TensorInfo, TensorShape};
//!
//! let parent = Tensor::new();
//! parent.init(TensorInfo::new(TensorShape::new(vec![4, 4]).unwrap(), DType::F32)).unwrap();
//! parent.allocate().unwrap();
//!
//! // A 2x2 view anchored at (1, 1) aliases the parent's bytes.
//! let view = SubTensor::new(
//!     &parent,
//!     TensorShape::new(vec![2, 2]).unwrap(),
//!     Coordinates::new(&[1, 1]).unwrap(),
//!     false,
//! ).unwrap();
//!
//! view.write_f32(&Coordinates::new(&[0, 0]).unwrap(), 7.0).unwrap();
//! let through_parent = parent.read_f32(&Coordinates::new(&[1, 1]).unwrap()).unwrap();
//! assert_eq!(through_parent, 7.0);
//! ```

mod arg;
mod coords;
mod dtype;
mod error;
mod info;
mod shape;
mod storage;
mod subtensor;
mod tensor;

pub use arg::TensorArg;
pub use coords::Coordinates;
pub use dtype::DType;
pub use error::TensorError;
pub use info::{OffsetIter, TensorInfo, ValidRegion};
pub use shape::{TensorShape, MAX_RANK};
pub use storage::Binding;
pub use subtensor::SubTensor;
pub use tensor::Tensor;
