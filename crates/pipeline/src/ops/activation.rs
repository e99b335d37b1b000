// Copyright (c) 2026 The tensor-arena Authors
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Element-wise activation functions.

use crate::{Function, PipelineError};
use tensor_core::{DType, TensorArg};

/// Which activation to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ActivationKind {
    /// `max(0, x)`.
    Relu,
    /// Pass-through (useful as a copy between differently-strided tensors).
    Identity,
}

impl ActivationKind {
    fn apply(&self, x: f32) -> f32 {
        match self {
            ActivationKind::Relu => x.max(0.0),
            ActivationKind::Identity => x,
        }
    }
}

/// Applies an [`ActivationKind`] element-wise from input to output.
///
/// Input and output must be `f32` with equal shapes. In-place operation
/// works by passing the same tensor (or views of the same parent) for
/// both arguments.
pub struct Activation {
    input: TensorArg,
    output: TensorArg,
    kind: ActivationKind,
}

impl Activation {
    /// Validates shapes and captures the arguments.
    pub fn configure(
        input: TensorArg,
        output: TensorArg,
        kind: ActivationKind,
    ) -> Result<Self, PipelineError> {
        const OP: &str = "Activation";

        let in_info = input.info()?;
        let out_info = output.info()?;
        if in_info.dtype() != DType::F32 || out_info.dtype() != DType::F32 {
            return Err(PipelineError::invalid(OP, "arguments must be f32"));
        }
        if in_info.shape() != out_info.shape() {
            return Err(PipelineError::invalid(
                OP,
                format!(
                    "input shape {} does not match output shape {}",
                    in_info.shape(),
                    out_info.shape()
                ),
            ));
        }
        Ok(Self {
            input,
            output,
            kind,
        })
    }
}

impl Function for Activation {
    fn name(&self) -> &str {
        "Activation"
    }

    fn run(&mut self) -> Result<(), PipelineError> {
        let in_info = self.input.info()?;
        let out_info = self.output.info()?;
        let in_b = self.input.binding()?;
        let out_b = self.output.binding()?;

        for (in_off, out_off) in in_info.iter_offsets().zip(out_info.iter_offsets()) {
            out_b.write_f32(out_off, self.kind.apply(in_b.read_f32(in_off)));
        }
        Ok(())
    }
}

impl std::fmt::Debug for Activation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Activation").field("kind", &self.kind).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tensor_core::{Tensor, TensorInfo, TensorShape};

    fn tensor(dims: &[usize]) -> Tensor {
        let t = Tensor::new();
        t.init(TensorInfo::new(
            TensorShape::new(dims.to_vec()).unwrap(),
            DType::F32,
        ))
        .unwrap();
        t.allocate().unwrap();
        t
    }

    #[test]
    fn test_relu() {
        let input = tensor(&[2, 2]);
        input.import_f32(&[-1.0, 2.0, -3.0, 4.0]).unwrap();
        let output = tensor(&[2, 2]);

        let mut act =
            Activation::configure((&input).into(), (&output).into(), ActivationKind::Relu)
                .unwrap();
        act.run().unwrap();
        assert_eq!(output.export_f32().unwrap(), vec![0.0, 2.0, 0.0, 4.0]);
    }

    #[test]
    fn test_in_place() {
        let t = tensor(&[4]);
        t.import_f32(&[-1.0, -2.0, 3.0, 4.0]).unwrap();

        let mut act =
            Activation::configure((&t).into(), (&t).into(), ActivationKind::Relu).unwrap();
        act.run().unwrap();
        assert_eq!(t.export_f32().unwrap(), vec![0.0, 0.0, 3.0, 4.0]);
    }

    #[test]
    fn test_identity_copies() {
        let input = tensor(&[3]);
        input.import_f32(&[1.0, -2.0, 3.0]).unwrap();
        let output = tensor(&[3]);

        let mut act =
            Activation::configure((&input).into(), (&output).into(), ActivationKind::Identity)
                .unwrap();
        act.run().unwrap();
        assert_eq!(output.export_f32().unwrap(), vec![1.0, -2.0, 3.0]);
    }

    #[test]
    fn test_shape_mismatch() {
        let input = tensor(&[2, 2]);
        let output = tensor(&[2, 3]);
        assert!(Activation::configure(
            (&input).into(),
            (&output).into(),
            ActivationKind::Relu
        )
        .is_err());
    }
}
