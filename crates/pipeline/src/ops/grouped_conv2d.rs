// Copyright (c) 2026 The tensor-arena Authors
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Grouped convolution decomposed into per-group [`Conv2d`] children
//! over sub-tensor views.

use crate::ops::{Conv2d, PadStrideInfo};
use crate::{Function, FunctionSequence, PipelineError};
use tensor_core::{Coordinates, SubTensor, Tensor, TensorShape};

/// A grouped 2D convolution.
///
/// With `num_groups == G`, the input channels and the output channels are
/// both split into `G` equal shares; group `g` convolves input channels
/// `[g*ci/G, (g+1)*ci/G)` with its own weight share to produce output
/// channels `[g*o/G, (g+1)*o/G)`.
///
/// The decomposition is pure aliasing: configure carves one [`SubTensor`]
/// per share out of each argument and appends one [`Conv2d`] child per
/// group to a [`FunctionSequence`]. No bytes are copied at configure or
/// run time; children write their slices of the shared output allocation
/// directly. `G == 1` degenerates to a single child over the whole
/// tensors.
///
/// Arguments are owning tensors (views cannot be re-sliced), with shapes
/// as for [`Conv2d`] and weights carrying `ci/G` channels: `[o, ci/G, kh, kw]`.
pub struct GroupedConv2d {
    children: FunctionSequence,
    num_groups: usize,
}

impl GroupedConv2d {
    /// Validates divisibility, carves per-group views and configures the
    /// children.
    ///
    /// # Errors
    /// - [`PipelineError::NotDivisible`] if `num_groups` does not divide
    ///   the input channel count or the output channel count.
    /// - Any [`Conv2d::configure`] error, per group.
    pub fn configure(
        input: &Tensor,
        weights: &Tensor,
        bias: Option<&Tensor>,
        output: &Tensor,
        conv: PadStrideInfo,
        num_groups: usize,
    ) -> Result<Self, PipelineError> {
        const OP: &str = "GroupedConv2d";

        if num_groups == 0 {
            return Err(PipelineError::invalid(OP, "num_groups must be at least 1"));
        }
        let mut children = FunctionSequence::new(OP);
        if num_groups == 1 {
            children.push(Box::new(Conv2d::configure(
                input.into(),
                weights.into(),
                bias.map(Into::into),
                output.into(),
                conv,
            )?));
            return Ok(Self {
                children,
                num_groups,
            });
        }

        let in_info = input
            .info()
            .ok_or(tensor_core::TensorError::Uninitialized)?;
        let w_info = weights
            .info()
            .ok_or(tensor_core::TensorError::Uninitialized)?;
        let out_info = output
            .info()
            .ok_or(tensor_core::TensorError::Uninitialized)?;

        let n = in_info.shape().dim_or_one(0);
        let ci = in_info.shape().dim_or_one(1);
        let h = in_info.shape().dim_or_one(2);
        let w = in_info.shape().dim_or_one(3);
        let o = w_info.shape().dim_or_one(0);
        let kc = w_info.shape().dim_or_one(1);
        let kh = w_info.shape().dim_or_one(2);
        let kw = w_info.shape().dim_or_one(3);
        let oh = out_info.shape().dim_or_one(2);
        let ow = out_info.shape().dim_or_one(3);

        if ci % num_groups != 0 {
            return Err(PipelineError::NotDivisible {
                op: OP.to_string(),
                dim: 1,
                extent: ci,
                num_groups,
            });
        }
        if o % num_groups != 0 {
            return Err(PipelineError::NotDivisible {
                op: OP.to_string(),
                dim: 1,
                extent: o,
                num_groups,
            });
        }
        let ci_share = ci / num_groups;
        let o_share = o / num_groups;
        if kc != ci_share {
            return Err(PipelineError::invalid(
                OP,
                format!("weights carry {kc} channels, expected ci/G = {ci_share}"),
            ));
        }

        for g in 0..num_groups {
            let in_view = SubTensor::new(
                input,
                TensorShape::new(vec![n, ci_share, h, w])?,
                Coordinates::new(&[0, (g * ci_share) as isize, 0, 0])?,
                false,
            )?;
            let w_view = SubTensor::new(
                weights,
                TensorShape::new(vec![o_share, ci_share, kh, kw])?,
                Coordinates::new(&[(g * o_share) as isize, 0, 0, 0])?,
                false,
            )?;
            let b_view = match bias {
                Some(bias) => Some(SubTensor::new(
                    bias,
                    TensorShape::vector(o_share),
                    Coordinates::new(&[(g * o_share) as isize])?,
                    false,
                )?),
                None => None,
            };
            let out_view = SubTensor::new(
                output,
                TensorShape::new(vec![n, o_share, oh, ow])?,
                Coordinates::new(&[0, (g * o_share) as isize, 0, 0])?,
                false,
            )?;

            children.push(Box::new(Conv2d::configure(
                in_view.into(),
                w_view.into(),
                b_view.map(Into::into),
                out_view.into(),
                conv,
            )?));
        }

        Ok(Self {
            children,
            num_groups,
        })
    }

    /// Returns the configured group count.
    pub fn num_groups(&self) -> usize {
        self.num_groups
    }
}

impl Function for GroupedConv2d {
    fn name(&self) -> &str {
        "GroupedConv2d"
    }

    fn prepare(&mut self) -> Result<(), PipelineError> {
        self.children.prepare()
    }

    fn run(&mut self) -> Result<(), PipelineError> {
        self.children.run()
    }
}

impl std::fmt::Debug for GroupedConv2d {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GroupedConv2d")
            .field("num_groups", &self.num_groups)
            .field("children", &self.children.len())
            .finish()
    }
}
