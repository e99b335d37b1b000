// Copyright (c) 2026 The tensor-arena Authors
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Direct 2D convolution over NCHW `f32` tensors.

use crate::{Function, PipelineError};
use tensor_core::{Binding, DType, TensorArg, TensorInfo};

/// Stride and zero-padding parameters for spatial operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PadStrideInfo {
    /// Vertical stride.
    pub stride_h: usize,
    /// Horizontal stride.
    pub stride_w: usize,
    /// Zero padding above and below.
    pub pad_h: usize,
    /// Zero padding left and right.
    pub pad_w: usize,
}

impl PadStrideInfo {
    /// Creates stride/padding parameters.
    pub fn new(stride_h: usize, stride_w: usize, pad_h: usize, pad_w: usize) -> Self {
        Self {
            stride_h,
            stride_w,
            pad_h,
            pad_w,
        }
    }

    /// Output extent along one spatial axis: `(in + 2*pad - kernel) / stride + 1`.
    ///
    /// Returns `None` when the padded input is smaller than the kernel.
    pub fn output_extent(&self, input: usize, kernel: usize, vertical: bool) -> Option<usize> {
        let (pad, stride) = if vertical {
            (self.pad_h, self.stride_h)
        } else {
            (self.pad_w, self.stride_w)
        };
        let padded = input + 2 * pad;
        if padded < kernel || stride == 0 {
            return None;
        }
        Some((padded - kernel) / stride + 1)
    }
}

impl Default for PadStrideInfo {
    /// Unit stride, no padding.
    fn default() -> Self {
        Self::new(1, 1, 0, 0)
    }
}

/// Reads the NCHW extents of a shape, treating missing trailing
/// dimensions as extent 1.
fn dims4(info: &TensorInfo) -> [usize; 4] {
    let s = info.shape();
    [
        s.dim_or_one(0),
        s.dim_or_one(1),
        s.dim_or_one(2),
        s.dim_or_one(3),
    ]
}

fn stride(info: &TensorInfo, dim: usize) -> usize {
    info.strides_in_bytes().get(dim).copied().unwrap_or(0)
}

fn require_f32(op: &str, role: &str, info: &TensorInfo) -> Result<(), PipelineError> {
    if info.dtype() != DType::F32 {
        return Err(PipelineError::invalid(
            op,
            format!("{role} must be f32, got {}", info.dtype()),
        ));
    }
    Ok(())
}

/// A configured direct convolution.
///
/// Shapes (NCHW):
/// - input `[n, ci, h, w]`
/// - weights `[o, ci, kh, kw]`
/// - bias `[o]` (optional)
/// - output `[n, o, oh, ow]` where each spatial extent follows
///   [`PadStrideInfo::output_extent`].
///
/// All shape and type checking happens in [`Conv2d::configure`]; `run`
/// only fails if backing storage is missing. Inputs and outputs may be
/// sub-tensor views, which is how [`crate::ops::GroupedConv2d`] reuses
/// this kernel per channel group.
pub struct Conv2d {
    input: TensorArg,
    weights: TensorArg,
    bias: Option<TensorArg>,
    output: TensorArg,
    conv: PadStrideInfo,
}

impl Conv2d {
    /// Validates shapes and captures the arguments.
    pub fn configure(
        input: TensorArg,
        weights: TensorArg,
        bias: Option<TensorArg>,
        output: TensorArg,
        conv: PadStrideInfo,
    ) -> Result<Self, PipelineError> {
        const OP: &str = "Conv2d";

        if conv.stride_h == 0 || conv.stride_w == 0 {
            return Err(PipelineError::invalid(OP, "strides must be at least 1"));
        }

        let in_info = input.info()?;
        let w_info = weights.info()?;
        let out_info = output.info()?;
        require_f32(OP, "input", &in_info)?;
        require_f32(OP, "weights", &w_info)?;
        require_f32(OP, "output", &out_info)?;

        let [n, ci, h, w] = dims4(&in_info);
        let [o, wc, kh, kw] = dims4(&w_info);
        let [on, oc, oh, ow] = dims4(&out_info);

        if wc != ci {
            return Err(PipelineError::invalid(
                OP,
                format!("weights expect {wc} input channels, input has {ci}"),
            ));
        }
        if let Some(ref bias) = bias {
            let b_info = bias.info()?;
            require_f32(OP, "bias", &b_info)?;
            let blen = b_info.shape().dim_or_one(0);
            if b_info.shape().rank() > 1 || blen != o {
                return Err(PipelineError::invalid(
                    OP,
                    format!("bias must be a vector of {o} elements, got {}", b_info.shape()),
                ));
            }
        }

        let expect_h = conv.output_extent(h, kh, true);
        let expect_w = conv.output_extent(w, kw, false);
        let (expect_h, expect_w) = match (expect_h, expect_w) {
            (Some(eh), Some(ew)) => (eh, ew),
            _ => {
                return Err(PipelineError::invalid(
                    OP,
                    format!("kernel {kh}x{kw} does not fit padded input {h}x{w}"),
                ));
            }
        };
        if on != n || oc != o || oh != expect_h || ow != expect_w {
            return Err(PipelineError::invalid(
                OP,
                format!(
                    "output shape {} does not match expected [{n}, {o}, {expect_h}, {expect_w}]",
                    out_info.shape()
                ),
            ));
        }

        Ok(Self {
            input,
            weights,
            bias,
            output,
            conv,
        })
    }

    fn read_bias(&self, binding: Option<(&Binding, &TensorInfo)>, channel: usize) -> f32 {
        match binding {
            Some((b, info)) => {
                b.read_f32(info.offset_first_element() + channel * stride(info, 0))
            }
            None => 0.0,
        }
    }
}

impl Function for Conv2d {
    fn name(&self) -> &str {
        "Conv2d"
    }

    fn run(&mut self) -> Result<(), PipelineError> {
        let in_info = self.input.info()?;
        let w_info = self.weights.info()?;
        let out_info = self.output.info()?;
        let in_b = self.input.binding()?;
        let w_b = self.weights.binding()?;
        let out_b = self.output.binding()?;
        let bias = match &self.bias {
            Some(b) => Some((b.binding()?, b.info()?)),
            None => None,
        };

        let [n, ci, h, w] = dims4(&in_info);
        let [o, _, kh, kw] = dims4(&w_info);
        let [_, _, oh, ow] = dims4(&out_info);

        let (is0, is1, is2, is3) = (
            stride(&in_info, 0),
            stride(&in_info, 1),
            stride(&in_info, 2),
            stride(&in_info, 3),
        );
        let (ws0, ws1, ws2, ws3) = (
            stride(&w_info, 0),
            stride(&w_info, 1),
            stride(&w_info, 2),
            stride(&w_info, 3),
        );
        let (os0, os1, os2, os3) = (
            stride(&out_info, 0),
            stride(&out_info, 1),
            stride(&out_info, 2),
            stride(&out_info, 3),
        );
        let in_base = in_info.offset_first_element();
        let w_base = w_info.offset_first_element();
        let out_base = out_info.offset_first_element();

        for b in 0..n {
            for oc in 0..o {
                let acc0 = self.read_bias(bias.as_ref().map(|(b, i)| (b, i)), oc);
                for y in 0..oh {
                    for x in 0..ow {
                        let mut acc = acc0;
                        for c in 0..ci {
                            for ky in 0..kh {
                                // Taps falling into the zero padding are skipped.
                                let iy = (y * self.conv.stride_h + ky) as isize
                                    - self.conv.pad_h as isize;
                                if iy < 0 || iy as usize >= h {
                                    continue;
                                }
                                for kx in 0..kw {
                                    let ix = (x * self.conv.stride_w + kx) as isize
                                        - self.conv.pad_w as isize;
                                    if ix < 0 || ix as usize >= w {
                                        continue;
                                    }
                                    let in_off = in_base
                                        + b * is0
                                        + c * is1
                                        + iy as usize * is2
                                        + ix as usize * is3;
                                    let w_off =
                                        w_base + oc * ws0 + c * ws1 + ky * ws2 + kx * ws3;
                                    acc += in_b.read_f32(in_off) * w_b.read_f32(w_off);
                                }
                            }
                        }
                        let out_off = out_base + b * os0 + oc * os1 + y * os2 + x * os3;
                        out_b.write_f32(out_off, acc);
                    }
                }
            }
        }
        Ok(())
    }
}

impl std::fmt::Debug for Conv2d {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Conv2d").field("conv", &self.conv).finish()
    }
}
