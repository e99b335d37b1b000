// Copyright (c) 2026 The tensor-arena Authors
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Benchmarks for element offset arithmetic and view access.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tensor_core::{Coordinates, DType, SubTensor, Tensor, TensorInfo, TensorShape};

fn bench_offset_iter(c: &mut Criterion) {
    let info = TensorInfo::new(TensorShape::new(vec![8, 64, 64]).unwrap(), DType::F32);
    c.bench_function("offset_iter_32k", |b| {
        b.iter(|| {
            let mut sum = 0usize;
            for offset in info.iter_offsets() {
                sum = sum.wrapping_add(offset);
            }
            black_box(sum)
        })
    });
}

fn bench_view_reads(c: &mut Criterion) {
    let parent = Tensor::new();
    parent
        .init(TensorInfo::new(
            TensorShape::new(vec![64, 64]).unwrap(),
            DType::F32,
        ))
        .unwrap();
    parent.allocate().unwrap();
    let view = SubTensor::new(
        &parent,
        TensorShape::matrix(32, 32),
        Coordinates::new(&[16, 16]).unwrap(),
        false,
    )
    .unwrap();
    let binding = view.binding().unwrap();

    c.bench_function("view_read_1k", |b| {
        b.iter(|| {
            let mut acc = 0.0f32;
            for offset in view.info().iter_offsets() {
                acc += binding.read_f32(offset);
            }
            black_box(acc)
        })
    });
}

criterion_group!(benches, bench_offset_iter, bench_view_reads);
criterion_main!(benches);
