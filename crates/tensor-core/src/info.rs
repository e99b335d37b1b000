// Copyright (c) 2026 The tensor-arena Authors
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Tensor metadata: shape, strides, element type and valid region.

use crate::{Coordinates, DType, TensorError, TensorShape};

/// The rectangular sub-range of a tensor's storage that holds meaningful
/// data, as opposed to padding or bytes donated to an arena lease.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ValidRegion {
    anchor: Coordinates,
    shape: TensorShape,
}

impl ValidRegion {
    /// Creates a valid region from an anchor and a shape.
    pub fn new(anchor: Coordinates, shape: TensorShape) -> Self {
        Self { anchor, shape }
    }

    /// The full region of the given shape, anchored at the origin.
    pub fn full(shape: TensorShape) -> Self {
        Self {
            anchor: Coordinates::default(),
            shape,
        }
    }

    /// Returns the anchor coordinates.
    pub fn anchor(&self) -> &Coordinates {
        &self.anchor
    }

    /// Returns the region's shape.
    pub fn shape(&self) -> &TensorShape {
        &self.shape
    }

    /// Returns `true` if the coordinates fall inside this region.
    ///
    /// Dimensions beyond a rank read as offset 0 / extent 1, so lower-rank
    /// coordinates address the region's leading dimensions.
    pub fn contains(&self, coords: &Coordinates) -> bool {
        let rank = self
            .shape
            .rank()
            .max(self.anchor.rank())
            .max(coords.rank());
        (0..rank).all(|i| {
            let lo = self.anchor.dim(i);
            let hi = lo + self.shape.dim_or_one(i) as isize;
            let c = coords.dim(i);
            c >= lo && c < hi
        })
    }
}

/// Describes a tensor's storage: shape, element type, channel count,
/// byte strides, first-element offset and [`ValidRegion`].
///
/// A `TensorInfo` is owned by exactly one [`crate::Tensor`]; a
/// [`crate::SubTensor`] derives its own info from the parent's by
/// advancing the first-element offset and narrowing the valid region.
///
/// Strides carry no alignment padding: the byte layout is dense row-major.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TensorInfo {
    shape: TensorShape,
    dtype: DType,
    num_channels: usize,
    strides_in_bytes: Vec<usize>,
    offset_first_element: usize,
    total_size_in_bytes: usize,
    valid_region: ValidRegion,
}

impl TensorInfo {
    /// Creates an info for a single-channel tensor of the given shape and
    /// element type. The valid region covers the full shape.
    pub fn new(shape: TensorShape, dtype: DType) -> Self {
        Self::with_channels(shape, dtype, 1)
    }

    /// Creates an info with `num_channels` interleaved channels per
    /// element position.
    pub fn with_channels(shape: TensorShape, dtype: DType, num_channels: usize) -> Self {
        let element_size = dtype.size_bytes() * num_channels;
        let strides_in_bytes = shape.strides_in_bytes(element_size);
        let total_size_in_bytes = shape.total_size() * element_size;
        let valid_region = ValidRegion::full(shape.clone());
        Self {
            shape,
            dtype,
            num_channels,
            strides_in_bytes,
            offset_first_element: 0,
            total_size_in_bytes,
            valid_region,
        }
    }

    /// Returns the tensor's shape.
    pub fn shape(&self) -> &TensorShape {
        &self.shape
    }

    /// Returns the element data type.
    pub fn dtype(&self) -> DType {
        self.dtype
    }

    /// Returns the number of interleaved channels per element position.
    pub fn num_channels(&self) -> usize {
        self.num_channels
    }

    /// Returns the size of one element position in bytes (all channels).
    pub fn element_size(&self) -> usize {
        self.dtype.size_bytes() * self.num_channels
    }

    /// Returns the row-major byte strides, one per dimension.
    pub fn strides_in_bytes(&self) -> &[usize] {
        &self.strides_in_bytes
    }

    /// Returns the byte offset of the element at the origin.
    ///
    /// Zero for an owning tensor; a sub-tensor's displacement into its
    /// parent's storage.
    pub fn offset_first_element(&self) -> usize {
        self.offset_first_element
    }

    /// Returns the byte footprint of the described storage.
    pub fn total_size_in_bytes(&self) -> usize {
        self.total_size_in_bytes
    }

    /// Returns the valid region.
    pub fn valid_region(&self) -> &ValidRegion {
        &self.valid_region
    }

    /// Replaces the valid region.
    pub fn set_valid_region(&mut self, region: ValidRegion) {
        self.valid_region = region;
    }

    /// Computes the byte offset of the element at `coords`:
    /// `offset_first_element + Σ coords[i] * strides[i]`.
    ///
    /// Coordinates outside the valid region fail with
    /// [`TensorError::CoordinatesOutOfBounds`] — out-of-range access is a
    /// checked error here, never undefined behaviour.
    pub fn offset_element_in_bytes(&self, coords: &Coordinates) -> Result<usize, TensorError> {
        if !self.valid_region.contains(coords) {
            return Err(TensorError::CoordinatesOutOfBounds {
                coords: coords.clone(),
                shape: self.shape.clone(),
            });
        }
        Ok(self.offset_unchecked(coords))
    }

    /// The stride dot product without the valid-region check. Used where
    /// the region has already been validated (e.g. kernel inner loops).
    pub fn offset_unchecked(&self, coords: &Coordinates) -> usize {
        let mut offset = self.offset_first_element as isize;
        for (i, &stride) in self.strides_in_bytes.iter().enumerate() {
            offset += coords.dim(i) * stride as isize;
        }
        offset as usize
    }

    /// Iterates the byte offsets of every element in logical row-major
    /// order. Stride-aware, so it walks sub-tensor views correctly.
    pub fn iter_offsets(&self) -> OffsetIter {
        OffsetIter::new(self)
    }

    /// Derives the info of a sub-tensor view: same dtype and strides,
    /// first-element offset advanced by the stride-weighted coordinate
    /// displacement, valid region narrowed to the view's own frame.
    pub(crate) fn view(&self, shape: TensorShape, coords: &Coordinates) -> TensorInfo {
        let element_size = self.element_size();
        let offset_first_element = self.offset_unchecked(coords);
        let total_size_in_bytes = shape.total_size() * element_size;
        let valid_region = ValidRegion::full(shape.clone());
        TensorInfo {
            shape,
            dtype: self.dtype,
            num_channels: self.num_channels,
            strides_in_bytes: self.strides_in_bytes.clone(),
            offset_first_element,
            total_size_in_bytes,
            valid_region,
        }
    }
}

/// Odometer-style iterator over the byte offsets of a tensor's elements.
///
/// Yields `shape.total_size()` offsets in row-major order, honouring the
/// info's strides and first-element offset.
#[derive(Debug)]
pub struct OffsetIter {
    dims: Vec<usize>,
    strides: Vec<usize>,
    index: Vec<usize>,
    offset: usize,
    remaining: usize,
}

impl OffsetIter {
    fn new(info: &TensorInfo) -> Self {
        let rank = info.shape().rank();
        let dims: Vec<usize> = (0..rank).map(|i| info.shape().dim_or_one(i)).collect();
        let strides: Vec<usize> = (0..rank)
            .map(|i| info.strides_in_bytes().get(i).copied().unwrap_or(0))
            .collect();
        Self {
            dims,
            strides,
            index: vec![0; rank],
            offset: info.offset_first_element(),
            remaining: info.shape().total_size(),
        }
    }
}

impl Iterator for OffsetIter {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let current = self.offset;

        // Advance the odometer, innermost dimension first.
        for i in (0..self.dims.len()).rev() {
            self.index[i] += 1;
            self.offset += self.strides[i];
            if self.index[i] < self.dims[i] {
                return Some(current);
            }
            self.offset -= self.strides[i] * self.dims[i];
            self.index[i] = 0;
        }
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for OffsetIter {}
