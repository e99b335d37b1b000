// Copyright (c) 2026 The tensor-arena Authors
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! End-to-end tests: grouped convolution equivalence and arena-backed
//! pipelines.

use memory_plan::LiveRange;
use pipeline::ops::{Activation, ActivationKind, Conv2d, GroupedConv2d, PadStrideInfo};
use pipeline::{Function, Pipeline, PipelineError};
use tensor_core::{DType, Tensor, TensorInfo, TensorShape};

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

/// Deterministic positive fill so float sums compare exactly against the
/// block-diagonal reference (adding zero terms never perturbs them).
fn fill(t: &Tensor, scale: f32) {
    let n = t.info().unwrap().shape().total_size();
    t.import_f32(
        &(0..n)
            .map(|i| 1.0 + (i % 13) as f32 * scale)
            .collect::<Vec<_>>(),
    )
    .unwrap();
}

/// Expands grouped weights `[o, ci/g, kh, kw]` into the equivalent
/// block-diagonal dense weights `[o, ci, kh, kw]`.
fn block_diagonal(grouped: &Tensor, ci: usize, num_groups: usize) -> Tensor {
    let shape = grouped.info().unwrap().shape().clone();
    let (o, share, kh, kw) = (
        shape.dim_or_one(0),
        shape.dim_or_one(1),
        shape.dim_or_one(2),
        shape.dim_or_one(3),
    );
    let o_share = o / num_groups;
    let src = grouped.export_f32().unwrap();

    let dense = tensor(&[o, ci, kh, kw]);
    let mut values = vec![0.0f32; o * ci * kh * kw];
    for oc in 0..o {
        let g = oc / o_share;
        for c in 0..share {
            for ky in 0..kh {
                for kx in 0..kw {
                    let src_idx = ((oc * share + c) * kh + ky) * kw + kx;
                    let dst_c = g * share + c;
                    let dst_idx = ((oc * ci + dst_c) * kh + ky) * kw + kx;
                    values[dst_idx] = src[src_idx];
                }
            }
        }
    }
    dense.import_f32(&values).unwrap();
    dense
}

#[test]
fn grouped_conv_matches_block_diagonal_dense_conv() {
    let (n, ci, h, w) = (2, 4, 5, 5);
    let (o, kh, kw) = (4, 3, 3);
    let conv_info = PadStrideInfo::new(1, 1, 1, 1);

    for num_groups in [1usize, 2, 4] {
        let input = tensor(&[n, ci, h, w]);
        fill(&input, 0.25);
        let weights = tensor(&[o, ci / num_groups, kh, kw]);
        fill(&weights, 0.125);
        let bias = tensor(&[o]);
        fill(&bias, 0.5);

        let grouped_out = tensor(&[n, o, h, w]);
        let mut grouped = GroupedConv2d::configure(
            &input,
            &weights,
            Some(&bias),
            &grouped_out,
            conv_info,
            num_groups,
        )
        .unwrap();
        grouped.run().unwrap();

        let dense_weights = block_diagonal(&weights, ci, num_groups);
        let dense_out = tensor(&[n, o, h, w]);
        let mut dense = Conv2d::configure(
            (&input).into(),
            (&dense_weights).into(),
            Some((&bias).into()),
            (&dense_out).into(),
            conv_info,
        )
        .unwrap();
        dense.run().unwrap();

        assert_eq!(
            grouped_out.export_f32().unwrap(),
            dense_out.export_f32().unwrap(),
            "mismatch for {num_groups} groups"
        );
    }
}

#[test]
fn grouped_conv_rejects_indivisible_channels() {
    // Three channels cannot be split into two groups.
    let input = tensor(&[2, 3, 4, 4]);
    let weights = tensor(&[4, 1, 1, 1]);
    let output = tensor(&[2, 4, 4, 4]);

    let err = GroupedConv2d::configure(
        &input,
        &weights,
        None,
        &output,
        PadStrideInfo::default(),
        2,
    )
    .unwrap_err();
    assert!(matches!(
        err,
        PipelineError::NotDivisible {
            extent: 3,
            num_groups: 2,
            ..
        }
    ));
}

#[test]
fn arena_pipeline_end_to_end() {
    // conv -> relu -> conv, with both intermediates leased from the arena.
    let input = tensor(&[1, 2, 4, 4]);
    fill(&input, 0.5);
    let w1 = tensor(&[2, 2, 3, 3]);
    fill(&w1, 0.25);
    let w2 = tensor(&[1, 2, 1, 1]);
    fill(&w2, 1.0);
    let output = tensor(&[1, 1, 2, 2]);

    let mid1 = Tensor::new();
    mid1.init(TensorInfo::new(
        TensorShape::new(vec![1, 2, 2, 2]).unwrap(),
        DType::F32,
    ))
    .unwrap();
    let mid2 = Tensor::new();
    mid2.init(TensorInfo::new(
        TensorShape::new(vec![1, 2, 2, 2]).unwrap(),
        DType::F32,
    ))
    .unwrap();

    let mut pipeline = Pipeline::new();
    pipeline.add_function(Box::new(
        Conv2d::configure(
            (&input).into(),
            (&w1).into(),
            None,
            (&mid1).into(),
            PadStrideInfo::default(),
        )
        .unwrap(),
    ));
    pipeline.add_function(Box::new(
        Activation::configure((&mid1).into(), (&mid2).into(), ActivationKind::Relu).unwrap(),
    ));
    pipeline.add_function(Box::new(
        Conv2d::configure(
            (&mid2).into(),
            (&w2).into(),
            None,
            (&output).into(),
            PadStrideInfo::default(),
        )
        .unwrap(),
    ));
    pipeline.manage(&mid1, LiveRange::new(0, 1)).unwrap();
    pipeline.manage(&mid2, LiveRange::new(1, 2)).unwrap();

    pipeline.run().unwrap();
    assert!(mid1.is_allocated());
    assert!(mid2.is_allocated());
    // Both intermediates overlap at step 1, so the arena holds both.
    assert!(pipeline.arena_bytes() >= 64);

    // All inputs positive, all weights positive: output must be positive.
    assert!(output.export_f32().unwrap().iter().all(|&x| x > 0.0));

    // Reference: same functions against independently allocated tensors.
    let ref_mid1 = tensor(&[1, 2, 2, 2]);
    let ref_mid2 = tensor(&[1, 2, 2, 2]);
    let ref_out = tensor(&[1, 1, 2, 2]);
    Conv2d::configure(
        (&input).into(),
        (&w1).into(),
        None,
        (&ref_mid1).into(),
        PadStrideInfo::default(),
    )
    .unwrap()
    .run()
    .unwrap();
    Activation::configure((&ref_mid1).into(), (&ref_mid2).into(), ActivationKind::Relu)
        .unwrap()
        .run()
        .unwrap();
    Conv2d::configure(
        (&ref_mid2).into(),
        (&w2).into(),
        None,
        (&ref_out).into(),
        PadStrideInfo::default(),
    )
    .unwrap()
    .run()
    .unwrap();
    assert_eq!(
        output.export_f32().unwrap(),
        ref_out.export_f32().unwrap()
    );
}

#[test]
fn randomized_chains_keep_live_intermediates_disjoint() {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    // Random-length relu chains: consecutive intermediates are live at
    // the same step, so their arena leases must never share bytes, and
    // the chain must still compute an exact pass-through of the
    // non-negative input.
    for seed in 0..8u64 {
        let mut rng = StdRng::seed_from_u64(seed);
        let elems = rng.gen_range(1..64);
        let depth = rng.gen_range(2..6);

        let input = tensor(&[elems]);
        input
            .import_f32(&(0..elems).map(|i| i as f32).collect::<Vec<_>>())
            .unwrap();
        let output = tensor(&[elems]);

        let mut pipeline = Pipeline::new();
        let mut intermediates = Vec::new();
        let mut prev = input.clone();
        for step in 0..depth {
            let next = Tensor::new();
            next.init(TensorInfo::new(TensorShape::vector(elems), DType::F32))
                .unwrap();
            pipeline.add_function(Box::new(
                Activation::configure((&prev).into(), (&next).into(), ActivationKind::Relu)
                    .unwrap(),
            ));
            pipeline.manage(&next, LiveRange::new(step, step + 1)).unwrap();
            intermediates.push(next.clone());
            prev = next;
        }
        pipeline.add_function(Box::new(
            Activation::configure((&prev).into(), (&output).into(), ActivationKind::Identity)
                .unwrap(),
        ));

        pipeline.run().unwrap();
        assert_eq!(
            output.export_f32().unwrap(),
            input.export_f32().unwrap(),
            "seed {seed}: relu chain must pass non-negative input through"
        );

        for pair in intermediates.windows(2) {
            let a_start = pair[0].binding().unwrap().base_offset();
            let a_end = a_start + pair[0].info().unwrap().total_size_in_bytes();
            let b_start = pair[1].binding().unwrap().base_offset();
            let b_end = b_start + pair[1].info().unwrap().total_size_in_bytes();
            assert!(
                a_end <= b_start || b_end <= a_start,
                "seed {seed}: consecutive intermediates share arena bytes"
            );
        }
    }
}

#[test]
fn prepare_is_idempotent_and_run_repeats() {
    let input = tensor(&[1, 1, 3, 3]);
    fill(&input, 1.0);
    let weights = tensor(&[1, 1, 2, 2]);
    fill(&weights, 0.5);
    let output = tensor(&[1, 1, 2, 2]);
    let mid = Tensor::new();
    mid.init(TensorInfo::new(
        TensorShape::new(vec![1, 1, 2, 2]).unwrap(),
        DType::F32,
    ))
    .unwrap();

    let mut pipeline = Pipeline::new();
    pipeline.add_function(Box::new(
        Conv2d::configure(
            (&input).into(),
            (&weights).into(),
            None,
            (&mid).into(),
            PadStrideInfo::default(),
        )
        .unwrap(),
    ));
    pipeline.add_function(Box::new(
        Activation::configure((&mid).into(), (&output).into(), ActivationKind::Identity)
            .unwrap(),
    ));
    pipeline.manage(&mid, LiveRange::new(0, 1)).unwrap();

    pipeline.prepare().unwrap();
    let arena = pipeline.arena_bytes();
    pipeline.prepare().unwrap();
    assert_eq!(pipeline.arena_bytes(), arena);

    pipeline.run().unwrap();
    let first = output.export_f32().unwrap();
    pipeline.run().unwrap();
    assert_eq!(output.export_f32().unwrap(), first);
}
