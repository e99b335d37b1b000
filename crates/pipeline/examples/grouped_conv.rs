// Copyright (c) 2026 The tensor-arena Authors
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Grouped convolution demo: a conv -> relu pipeline with the grouped
//! convolution split into per-group sub-tensor views and the
//! intermediate leased from the arena.
//!
//! Run with `cargo run --example grouped_conv`.

use memory_plan::LiveRange;
use pipeline::ops::{Activation, ActivationKind, GroupedConv2d, PadStrideInfo};
use pipeline::Pipeline;
use tensor_core::{DType, Tensor, TensorInfo, TensorShape};

fn tensor(dims: &[usize]) -> Result<Tensor, Box<dyn std::error::Error>> {
    let t = Tensor::new();
    t.init(TensorInfo::new(
        TensorShape::new(dims.to_vec())?,
        DType::F32,
    ))?;
    Ok(t)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let num_groups = 2;
    let input = tensor(&[1, 4, 8, 8])?;
    input.allocate()?;
    input.import_f32(&(0..256).map(|i| (i % 7) as f32 * 0.1).collect::<Vec<_>>())?;

    let weights = tensor(&[4, 2, 3, 3])?;
    weights.allocate()?;
    weights.import_f32(&(0..72).map(|i| (i % 5) as f32 * 0.05).collect::<Vec<_>>())?;

    let output = tensor(&[1, 4, 8, 8])?;
    output.allocate()?;

    // The conv result lives only between the two steps, so it is leased
    // from the pipeline's arena rather than allocated on its own.
    let mid = tensor(&[1, 4, 8, 8])?;

    let mut pipeline = Pipeline::new();
    pipeline.add_function(Box::new(GroupedConv2d::configure(
        &input,
        &weights,
        None,
        &mid,
        PadStrideInfo::new(1, 1, 1, 1),
        num_groups,
    )?));
    pipeline.add_function(Box::new(Activation::configure(
        (&mid).into(),
        (&output).into(),
        ActivationKind::Relu,
    )?));
    pipeline.manage(&mid, LiveRange::new(0, 1))?;

    pipeline.run()?;

    if let Some(metrics) = pipeline.last_metrics() {
        print!("{}", metrics.summary());
    }
    let sum: f32 = output.export_f32()?.iter().sum();
    println!("output sum: {sum}");
    Ok(())
}
