// Copyright (c) 2026 The tensor-arena Authors
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # pipeline
//!
//! Operator composition over `tensor-core` and `memory-plan`: the
//! [`Function`] protocol, a small set of reference operators, and the
//! [`Pipeline`] context that ties functions to an arena memory plan.
//!
//! # Lifecycle
//! ```text
//! Op::configure(args)? ──► pipeline.add_function(op)
//!                            │  pipeline.manage(intermediate, range)
//!                            ▼
//!                    pipeline.prepare()      (plan arena, bind leases)
//!                            ▼
//!                    pipeline.run()          (synchronous, repeatable)
//! ```
//!
//! Configuration is a fallible constructor: shape and type errors
//! surface when the pipeline is built, never at run time. Composite
//! operators like [`ops::GroupedConv2d`] implement [`Function`] by
//! delegating to children configured over sub-tensor views, so the
//! pipeline treats leaf kernels and compositions uniformly.
//!
//! # Example
//! ```
//! use pipeline::ops::{Activation, ActivationKind};
//! use pipeline::Pipeline;
//! use tensor_core::{DType, Tensor, TensorInfo, TensorShape};
//!
//! let input = Tensor::new();
//! input.init(TensorInfo::new(TensorShape::vector(4), DType::F32)).unwrap();
//! input.allocate().unwrap();
//! input.import_f32(&[-1.0, 2.0, -3.0, 4.0]).unwrap();
//!
//! let mut pipeline = Pipeline::new();
//! let relu = Activation::configure(
//!     (&input).into(),
//!     (&input).into(),
//!     ActivationKind::Relu,
//! ).unwrap();
//! pipeline.add_function(Box::new(relu));
//! pipeline.run().unwrap();
//! assert_eq!(input.export_f32().unwrap(), vec![0.0, 2.0, 0.0, 4.0]);
//! ```

mod config;
mod error;
mod function;
mod metrics;
pub mod ops;
mod pipeline;

pub use config::PipelineConfig;
pub use error::PipelineError;
pub use function::{Function, FunctionSequence};
pub use metrics::{RunMetrics, StepMetrics};
pub use pipeline::Pipeline;
