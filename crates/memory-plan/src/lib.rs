// Copyright (c) 2026 The tensor-arena Authors
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # memory-plan
//!
//! A lifetime-aware arena planner for the intermediate tensors of an
//! operator pipeline.
//!
//! Most intermediates are transient: written by one pipeline step,
//! consumed by the next, then dead. Allocating each one independently
//! wastes memory proportional to pipeline depth. A [`MemoryGroup`]
//! instead collects every intermediate together with its [`LiveRange`]
//! (the inclusive span of step indices during which it is read or
//! written), packs them into a single arena slab with a first-fit
//! interval layout, and rebinds each tensor's buffer to
//! `slab + assigned_offset`.
//!
//! # Key Components
//!
//! - [`LiveRange`] — inclusive interval of pipeline step indices.
//! - [`MemoryGroup`] — registration (`manage`), idempotent `finalize`,
//!   and slab ownership for one pipeline instance.
//! - [`PlanStats`] — how much memory the layout saved.
//!
//! # Safety Invariant
//!
//! Two registered tensors share arena bytes **only if** their live ranges
//! are disjoint. The planner is a best-effort space reducer, never a
//! correctness requirement: the degenerate layout (sum of all sizes, no
//! sharing) is always valid.
//!
//! # Example
//! ```
//! use memory_plan::{LiveRange, MemoryGroup};
//! use tensor_core::{DType, Tensor, TensorInfo, TensorShape};
//!
//! let make = |elems: usize| {
//!     let t = Tensor::new();
//!     t.init(TensorInfo::new(TensorShape::vector(elems), DType::F32)).unwrap();
//!     t
//! };
//!
//! // a is dead before b is first produced, so they may share bytes.
//! let a = make(256);
//! let b = make(256);
//! let mut group = MemoryGroup::new();
//! group.manage(&a, LiveRange::new(0, 1)).unwrap();
//! group.manage(&b, LiveRange::new(2, 3)).unwrap();
//! group.finalize().unwrap();
//!
//! assert!(a.is_allocated() && b.is_allocated());
//! assert!(group.arena_bytes() <= 2 * 1024);
//! ```

mod error;
mod group;
mod layout;
mod range;
mod stats;

pub use error::MemoryError;
pub use group::MemoryGroup;
pub use layout::{plan_offsets, Placement, Request};
pub use range::LiveRange;
pub use stats::PlanStats;
