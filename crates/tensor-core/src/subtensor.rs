// Copyright (c) 2026 The tensor-arena Authors
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Non-owning sub-tensor views aliasing a parent tensor's storage.

use crate::{
    Binding, Coordinates, DType, Tensor, TensorError, TensorInfo, TensorShape, ValidRegion,
    MAX_RANK,
};

/// A non-owning view over a coordinate-offset slice of a parent
/// [`Tensor`]'s storage.
///
/// A `SubTensor` never allocates: its bytes are the parent's bytes, found
/// by advancing the parent's base pointer by the stride-weighted
/// coordinate displacement. Its [`TensorInfo`] reuses the parent's element
/// type and strides with the valid region narrowed to the view's frame.
///
/// The view holds a handle to the parent, so the parent's storage stays
/// alive for as long as any view exists — the "view must not outlive
/// parent" obligation of the raw-pointer formulation is structural here.
/// Allocation state still tracks the parent: a view over an unallocated
/// parent reports no buffer until the parent is allocated or leased.
///
/// # Grouped decomposition
/// Carving one view per channel share turns a tensor into `G` disjoint
/// slices sharing a single allocation; composite operators configure one
/// child per slice and run them in order, with no data copies.
#[derive(Debug, Clone)]
pub struct SubTensor {
    parent: Tensor,
    info: TensorInfo,
    coords: Coordinates,
}

impl SubTensor {
    /// Creates a view of `shape` anchored at `coords` in the parent's
    /// index space.
    ///
    /// With `extend_parent == false` (the normal case) the region must fit
    /// inside the parent's extents, or construction fails with
    /// [`TensorError::RegionOutOfBounds`]. With `extend_parent == true`
    /// an **unallocated** parent is grown to fit — a discouraged escape
    /// hatch kept for composing shapes bottom-up; it fails with
    /// [`TensorError::NotResizable`] on an allocated parent.
    ///
    /// # Errors
    /// - [`TensorError::NegativeCoordinates`] for negative anchors.
    /// - [`TensorError::Uninitialized`] if the parent has no metadata.
    pub fn new(
        parent: &Tensor,
        shape: TensorShape,
        coords: Coordinates,
        extend_parent: bool,
    ) -> Result<Self, TensorError> {
        if coords.has_negative() {
            return Err(TensorError::NegativeCoordinates { coords });
        }
        let parent_info = parent.info().ok_or(TensorError::Uninitialized)?;

        let fits = (0..MAX_RANK).all(|i| {
            coords.dim(i) as usize + shape.dim_or_one(i) <= parent_info.shape().dim_or_one(i)
        });
        if !fits {
            if !extend_parent {
                return Err(TensorError::RegionOutOfBounds {
                    coords,
                    shape,
                    parent: parent_info.shape().clone(),
                });
            }
            let rank = shape.rank().max(coords.rank());
            let mut dims = Vec::with_capacity(rank);
            for i in 0..rank {
                dims.push(coords.dim(i) as usize + shape.dim_or_one(i));
            }
            parent.grow_shape(&TensorShape::new(dims)?)?;
        }

        let parent_info = parent
            .info()
            .expect("parent metadata must survive grow_shape");
        let mut info = parent_info.view(shape.clone(), &coords);
        info.set_valid_region(derive_valid_region(
            &shape,
            &coords,
            parent_info.valid_region(),
        ));

        Ok(Self {
            parent: parent.clone(),
            info,
            coords,
        })
    }

    /// Returns the parent handle (the ownership root of the bytes).
    pub fn parent(&self) -> &Tensor {
        &self.parent
    }

    /// Returns the view's derived metadata.
    pub fn info(&self) -> &TensorInfo {
        &self.info
    }

    /// Returns the view's shape.
    pub fn shape(&self) -> &TensorShape {
        self.info.shape()
    }

    /// Returns the view's anchor within the parent's index space.
    pub fn coordinates(&self) -> &Coordinates {
        &self.coords
    }

    /// Resolves the parent's bound byte range for kernel access.
    ///
    /// Element offsets derived from this view's [`TensorInfo`] already
    /// include the coordinate displacement.
    pub fn binding(&self) -> Result<Binding, TensorError> {
        self.parent.binding()
    }

    /// Returns the view's base pointer: the parent's buffer advanced by
    /// the stride-weighted coordinate displacement. `None` while the
    /// parent is unallocated.
    pub fn buffer_ptr(&self) -> Option<*const u8> {
        self.parent
            .buffer_ptr()
            .map(|p| p.wrapping_add(self.info.offset_first_element()))
    }

    /// Reads the `f32` element at `coords` (view frame).
    pub fn read_f32(&self, coords: &Coordinates) -> Result<f32, TensorError> {
        let (binding, offset) = self.element_access(coords, DType::F32)?;
        Ok(binding.read_f32(offset))
    }

    /// Writes the `f32` element at `coords` (view frame).
    pub fn write_f32(&self, coords: &Coordinates, value: f32) -> Result<(), TensorError> {
        let (binding, offset) = self.element_access(coords, DType::F32)?;
        binding.write_f32(offset, value);
        Ok(())
    }

    /// Reads the `u8` element at `coords` (view frame).
    pub fn read_u8(&self, coords: &Coordinates) -> Result<u8, TensorError> {
        let (binding, offset) = self.element_access(coords, DType::U8)?;
        Ok(binding.read_u8(offset))
    }

    /// Writes the `u8` element at `coords` (view frame).
    pub fn write_u8(&self, coords: &Coordinates, value: u8) -> Result<(), TensorError> {
        let (binding, offset) = self.element_access(coords, DType::U8)?;
        binding.write_u8(offset, value);
        Ok(())
    }

    fn element_access(
        &self,
        coords: &Coordinates,
        dtype: DType,
    ) -> Result<(Binding, usize), TensorError> {
        if self.info.dtype() != dtype {
            return Err(TensorError::DTypeMismatch {
                expected: dtype,
                actual: self.info.dtype(),
            });
        }
        let offset = self.info.offset_element_in_bytes(coords)?;
        Ok((self.binding()?, offset))
    }
}

/// Narrows the parent's valid region into the view's frame: the
/// intersection of `[0, shape)` with the parent region translated by
/// `-coords`.
fn derive_valid_region(
    shape: &TensorShape,
    coords: &Coordinates,
    parent_region: &ValidRegion,
) -> ValidRegion {
    let rank = shape.rank();
    let mut anchor = Coordinates::default();
    let mut region_shape = TensorShape::scalar();
    for i in 0..rank {
        let parent_lo = parent_region.anchor().dim(i) - coords.dim(i);
        let parent_hi = parent_lo + parent_region.shape().dim_or_one(i) as isize;
        let lo = parent_lo.max(0);
        let hi = parent_hi.min(shape.dim_or_one(i) as isize);
        let extent = (hi - lo).max(0) as usize;
        // Ranks stay within MAX_RANK because shape already passed the cap.
        anchor.set(i, lo).expect("rank bounded by shape rank");
        region_shape
            .set(i, extent)
            .expect("rank bounded by shape rank");
    }
    ValidRegion::new(anchor, region_shape)
}
