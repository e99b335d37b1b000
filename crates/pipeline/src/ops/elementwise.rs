// Copyright (c) 2026 The tensor-arena Authors
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Element-wise binary operators.

use crate::{Function, PipelineError};
use tensor_core::{DType, TensorArg};

/// Adds two equal-shaped `f32` tensors element-wise into an output.
///
/// Any argument may be a sub-tensor view; offsets are walked
/// stride-aware, so views over the same parent compose (including using
/// one of the inputs as the output for in-place accumulation).
pub struct ElementwiseAdd {
    lhs: TensorArg,
    rhs: TensorArg,
    output: TensorArg,
}

impl ElementwiseAdd {
    /// Validates shapes and captures the arguments.
    pub fn configure(
        lhs: TensorArg,
        rhs: TensorArg,
        output: TensorArg,
    ) -> Result<Self, PipelineError> {
        const OP: &str = "ElementwiseAdd";

        let l_info = lhs.info()?;
        let r_info = rhs.info()?;
        let o_info = output.info()?;
        for info in [&l_info, &r_info, &o_info] {
            if info.dtype() != DType::F32 {
                return Err(PipelineError::invalid(OP, "arguments must be f32"));
            }
        }
        if l_info.shape() != r_info.shape() || l_info.shape() != o_info.shape() {
            return Err(PipelineError::InvalidConfiguration {
                op: OP.to_string(),
                reason: format!(
                    "shapes must match: {} + {} -> {}",
                    l_info.shape(),
                    r_info.shape(),
                    o_info.shape()
                ),
            });
        }
        Ok(Self { lhs, rhs, output })
    }
}

impl Function for ElementwiseAdd {
    fn name(&self) -> &str {
        "ElementwiseAdd"
    }

    fn run(&mut self) -> Result<(), PipelineError> {
        let l_info = self.lhs.info()?;
        let r_info = self.rhs.info()?;
        let o_info = self.output.info()?;
        let l_b = self.lhs.binding()?;
        let r_b = self.rhs.binding()?;
        let o_b = self.output.binding()?;

        for ((l_off, r_off), o_off) in l_info
            .iter_offsets()
            .zip(r_info.iter_offsets())
            .zip(o_info.iter_offsets())
        {
            o_b.write_f32(o_off, l_b.read_f32(l_off) + r_b.read_f32(r_off));
        }
        Ok(())
    }
}

impl std::fmt::Debug for ElementwiseAdd {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ElementwiseAdd").finish()
    }
}
