// Copyright (c) 2026 The tensor-arena Authors
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for operator configuration and pipeline execution.

use memory_plan::MemoryError;
use tensor_core::TensorError;

/// Errors that can occur while configuring or running a pipeline.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// An operator rejected its arguments at configure time.
    #[error("{op}: invalid configuration: {reason}")]
    InvalidConfiguration {
        /// Operator name.
        op: String,
        /// What was wrong with the arguments.
        reason: String,
    },

    /// A grouped operator was asked to split a dimension that the group
    /// count does not divide.
    #[error("{op}: dimension {dim} (extent {extent}) is not divisible into {num_groups} groups")]
    NotDivisible {
        /// Operator name.
        op: String,
        /// Index of the dimension being split.
        dim: usize,
        /// Extent of that dimension.
        extent: usize,
        /// Requested number of groups.
        num_groups: usize,
    },

    /// Configuration file problem.
    #[error("config error: {0}")]
    Config(String),

    /// Tensor-level failure (shape, lifecycle, access).
    #[error("tensor error: {0}")]
    Tensor(#[from] TensorError),

    /// Arena planning failure.
    #[error("memory error: {0}")]
    Memory(#[from] MemoryError),
}

impl PipelineError {
    /// Shorthand for [`PipelineError::InvalidConfiguration`].
    pub fn invalid(op: &str, reason: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            op: op.to_string(),
            reason: reason.into(),
        }
    }
}
