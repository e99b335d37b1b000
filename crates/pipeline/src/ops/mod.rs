// Copyright (c) 2026 The tensor-arena Authors
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Reference operators implementing the [`crate::Function`] protocol.
//!
//! All operators compute in `f32` over NCHW-ordered shapes
//! (batch, channels, height, width). They are direct, scalar kernels:
//! correct and stride-aware, with no vectorisation.

mod activation;
mod conv2d;
mod elementwise;
mod grouped_conv2d;

pub use activation::{Activation, ActivationKind};
pub use conv2d::{Conv2d, PadStrideInfo};
pub use elementwise::ElementwiseAdd;
pub use grouped_conv2d::GroupedConv2d;
