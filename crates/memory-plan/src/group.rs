// Copyright (c) 2026 The tensor-arena Authors
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The memory group: registration, layout and slab binding for one
//! pipeline's intermediate tensors.

use crate::layout::{plan_offsets, Request};
use crate::{LiveRange, MemoryError, PlanStats};
use std::cell::RefCell;
use std::rc::Rc;
use tensor_core::Tensor;

/// Default arena alignment in bytes.
const DEFAULT_ALIGNMENT: usize = 64;

/// Coordinates the backing storage of a pipeline's intermediate tensors.
///
/// Intermediates are registered with [`manage`](MemoryGroup::manage)
/// while the pipeline is being configured; [`finalize`](MemoryGroup::finalize)
/// then computes a first-fit interval layout, allocates one zero-filled
/// slab sized to the peak concurrent footprint, and rebinds every
/// registered tensor to its lease. Tensors are never moved or copied —
/// only their (buffer, offset) binding changes.
///
/// `finalize` is idempotent; registration after it fails with
/// [`MemoryError::AlreadyFinalized`]. Each pipeline instance owns its own
/// group — there is no process-wide manager.
///
/// # Example
/// ```
/// use memory_plan::{LiveRange, MemoryGroup};
/// use tensor_core::{DType, Tensor, TensorInfo, TensorShape};
///
/// let t = Tensor::new();
/// t.init(TensorInfo::new(TensorShape::vector(16), DType::F32)).unwrap();
///
/// let mut group = MemoryGroup::new();
/// group.manage(&t, LiveRange::new(0, 1)).unwrap();
/// group.finalize().unwrap();
/// assert!(t.is_allocated());
/// ```
#[derive(Debug)]
pub struct MemoryGroup {
    alignment: usize,
    registered: Vec<(Tensor, LiveRange)>,
    slab: Option<Rc<RefCell<Vec<u8>>>>,
    stats: PlanStats,
    finalized: bool,
}

impl MemoryGroup {
    /// Creates a group with the default 64-byte arena alignment.
    pub fn new() -> Self {
        Self {
            alignment: DEFAULT_ALIGNMENT,
            registered: Vec::new(),
            slab: None,
            stats: PlanStats::default(),
            finalized: false,
        }
    }

    /// Creates a group with a custom arena alignment.
    ///
    /// Fails with [`MemoryError::BadAlignment`] unless `alignment` is a
    /// non-zero power of two.
    pub fn with_alignment(alignment: usize) -> Result<Self, MemoryError> {
        if alignment == 0 || !alignment.is_power_of_two() {
            return Err(MemoryError::BadAlignment(alignment));
        }
        Ok(Self {
            alignment,
            ..Self::new()
        })
    }

    /// Registers an intermediate tensor and its live range.
    ///
    /// The tensor must be initialised (so its byte footprint is known)
    /// and must not already have backing storage — the group will bind
    /// it at finalize time.
    ///
    /// # Errors
    /// - [`MemoryError::AlreadyFinalized`] after `finalize`.
    /// - [`MemoryError::Tensor`] for an uninitialised or already
    ///   allocated tensor.
    pub fn manage(&mut self, tensor: &Tensor, range: LiveRange) -> Result<(), MemoryError> {
        if self.finalized {
            return Err(MemoryError::AlreadyFinalized);
        }
        if tensor.is_allocated() {
            return Err(MemoryError::Tensor(
                tensor_core::TensorError::AlreadyAllocated,
            ));
        }
        tensor
            .info()
            .ok_or(tensor_core::TensorError::Uninitialized)?;
        self.registered.push((tensor.clone(), range));
        Ok(())
    }

    /// Computes the layout, allocates the slab and rebinds every
    /// registered tensor. Idempotent: the second and later calls are
    /// no-ops returning `Ok`.
    ///
    /// Fails without side effects if a registered tensor acquired its own
    /// storage since `manage`; freeing that tensor makes a later
    /// `finalize` succeed.
    pub fn finalize(&mut self) -> Result<(), MemoryError> {
        if self.finalized {
            return Ok(());
        }

        // Validate every tensor before binding any, so a failure leaves
        // no tensor leased from a slab the group then drops.
        for (tensor, _) in &self.registered {
            if tensor.is_allocated() {
                return Err(MemoryError::Tensor(
                    tensor_core::TensorError::AlreadyAllocated,
                ));
            }
        }

        let requests: Vec<Request> = self
            .registered
            .iter()
            .map(|(tensor, range)| Request {
                size_bytes: tensor
                    .info()
                    .map(|i| i.total_size_in_bytes())
                    .unwrap_or(0),
                range: *range,
            })
            .collect();

        let (placements, arena_bytes) = plan_offsets(&requests, self.alignment);

        // Zero-filled slab: leased regions have deterministic content.
        let slab = Rc::new(RefCell::new(vec![0u8; arena_bytes]));
        for (index, ((tensor, _), placement)) in
            self.registered.iter().zip(&placements).enumerate()
        {
            if let Err(e) = tensor.bind_to(Rc::clone(&slab), placement.offset) {
                // Unwind the leases handed out so far (e.g. the same
                // tensor was registered twice).
                for (bound, _) in &self.registered[..index] {
                    bound.free();
                }
                return Err(e.into());
            }
        }

        self.stats = PlanStats {
            num_tensors: self.registered.len(),
            requested_bytes: requests.iter().map(|r| r.size_bytes).sum(),
            arena_bytes,
        };
        self.slab = Some(slab);
        self.finalized = true;
        Ok(())
    }

    /// Returns `true` once the layout has been committed.
    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    /// Returns the number of registered tensors.
    pub fn num_managed(&self) -> usize {
        self.registered.len()
    }

    /// Returns the slab size in bytes (0 before finalize).
    pub fn arena_bytes(&self) -> usize {
        self.stats.arena_bytes
    }

    /// Returns layout statistics (zeroed before finalize).
    pub fn stats(&self) -> &PlanStats {
        &self.stats
    }
}

impl Default for MemoryGroup {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tensor_core::{DType, TensorInfo, TensorShape};

    fn intermediate(elems: usize) -> Tensor {
        let t = Tensor::new();
        t.init(TensorInfo::new(TensorShape::vector(elems), DType::F32))
            .unwrap();
        t
    }

    fn offset_of(t: &Tensor) -> usize {
        t.binding().unwrap().base_offset()
    }

    #[test]
    fn test_manage_and_finalize() {
        let a = intermediate(64);
        let b = intermediate(64);

        let mut group = MemoryGroup::new();
        group.manage(&a, LiveRange::new(0, 1)).unwrap();
        group.manage(&b, LiveRange::new(1, 2)).unwrap();
        assert_eq!(group.num_managed(), 2);

        group.finalize().unwrap();
        assert!(group.is_finalized());
        assert!(a.is_allocated());
        assert!(b.is_allocated());
        // Overlapping lifetimes: distinct leases.
        assert_ne!(offset_of(&a), offset_of(&b));
    }

    #[test]
    fn test_disjoint_lifetimes_share_lease() {
        let a = intermediate(64);
        let b = intermediate(64);

        let mut group = MemoryGroup::new();
        group.manage(&a, LiveRange::new(0, 1)).unwrap();
        group.manage(&b, LiveRange::new(2, 3)).unwrap();
        group.finalize().unwrap();

        assert_eq!(offset_of(&a), offset_of(&b));
        assert_eq!(group.arena_bytes(), 256);
    }

    #[test]
    fn test_finalize_is_idempotent() {
        let a = intermediate(16);
        let mut group = MemoryGroup::new();
        group.manage(&a, LiveRange::at(0)).unwrap();

        group.finalize().unwrap();
        let offset = offset_of(&a);
        let arena = group.arena_bytes();

        group.finalize().unwrap();
        assert_eq!(offset_of(&a), offset);
        assert_eq!(group.arena_bytes(), arena);
    }

    #[test]
    fn test_manage_after_finalize_fails() {
        let a = intermediate(16);
        let mut group = MemoryGroup::new();
        group.manage(&a, LiveRange::at(0)).unwrap();
        group.finalize().unwrap();

        let late = intermediate(16);
        assert!(matches!(
            group.manage(&late, LiveRange::at(1)),
            Err(MemoryError::AlreadyFinalized)
        ));
    }

    #[test]
    fn test_manage_rejects_allocated_tensor() {
        let t = intermediate(16);
        t.allocate().unwrap();

        let mut group = MemoryGroup::new();
        assert!(matches!(
            group.manage(&t, LiveRange::at(0)),
            Err(MemoryError::Tensor(
                tensor_core::TensorError::AlreadyAllocated
            ))
        ));
    }

    #[test]
    fn test_manage_rejects_uninitialised_tensor() {
        let t = Tensor::new();
        let mut group = MemoryGroup::new();
        assert!(group.manage(&t, LiveRange::at(0)).is_err());
    }

    #[test]
    fn test_finalize_recovers_after_external_allocation() {
        let a = intermediate(16);
        let b = intermediate(16);
        let mut group = MemoryGroup::new();
        group.manage(&a, LiveRange::at(0)).unwrap();
        group.manage(&b, LiveRange::at(1)).unwrap();

        // b grabs its own buffer behind the group's back.
        b.allocate().unwrap();
        assert!(matches!(
            group.finalize(),
            Err(MemoryError::Tensor(
                tensor_core::TensorError::AlreadyAllocated
            ))
        ));
        assert!(!group.is_finalized());
        // The failed finalize bound nothing.
        assert!(!a.is_allocated());

        // Releasing the stray buffer unblocks the group.
        b.free();
        group.finalize().unwrap();
        assert!(group.is_finalized());
        assert!(a.is_allocated());
        assert!(b.is_allocated());
        assert_eq!(offset_of(&a), offset_of(&b));
    }

    #[test]
    fn test_duplicate_registration_fails_cleanly() {
        let t = intermediate(16);
        let mut group = MemoryGroup::new();
        group.manage(&t, LiveRange::at(0)).unwrap();
        group.manage(&t, LiveRange::at(1)).unwrap();

        assert!(group.finalize().is_err());
        assert!(!group.is_finalized());
        assert!(!t.is_allocated());
    }

    #[test]
    fn test_leased_bytes_are_zeroed() {
        let a = intermediate(8);
        let mut group = MemoryGroup::new();
        group.manage(&a, LiveRange::at(0)).unwrap();
        group.finalize().unwrap();
        assert!(a.export_f32().unwrap().iter().all(|&x| x == 0.0));
    }

    #[test]
    fn test_bad_alignment() {
        assert!(matches!(
            MemoryGroup::with_alignment(0),
            Err(MemoryError::BadAlignment(0))
        ));
        assert!(matches!(
            MemoryGroup::with_alignment(48),
            Err(MemoryError::BadAlignment(48))
        ));
        assert!(MemoryGroup::with_alignment(128).is_ok());
    }

    #[test]
    fn test_empty_group_finalizes() {
        let mut group = MemoryGroup::new();
        group.finalize().unwrap();
        assert_eq!(group.arena_bytes(), 0);
        assert!(group.is_finalized());
    }

    #[test]
    fn test_stats() {
        let a = intermediate(64); // 256 bytes
        let b = intermediate(64); // 256 bytes
        let mut group = MemoryGroup::new();
        group.manage(&a, LiveRange::new(0, 1)).unwrap();
        group.manage(&b, LiveRange::new(2, 3)).unwrap();
        group.finalize().unwrap();

        let stats = group.stats();
        assert_eq!(stats.num_tensors, 2);
        assert_eq!(stats.requested_bytes, 512);
        assert_eq!(stats.arena_bytes, 256);
        assert!((stats.reuse_ratio() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_randomized_pipelines_never_alias_live_pairs() {
        use rand::rngs::StdRng;
        use rand::{Rng, SeedableRng};

        for seed in 0..16u64 {
            let mut rng = StdRng::seed_from_u64(seed);
            let n = rng.gen_range(3..=10);

            let mut group = MemoryGroup::new();
            let mut tensors = Vec::new();
            for _ in 0..n {
                let t = intermediate(rng.gen_range(1..512));
                let first = rng.gen_range(0..10);
                let last = rng.gen_range(first..10);
                group.manage(&t, LiveRange::new(first, last)).unwrap();
                tensors.push((t, LiveRange::new(first, last)));
            }
            group.finalize().unwrap();

            for i in 0..tensors.len() {
                for j in (i + 1)..tensors.len() {
                    let (ref a, ra) = tensors[i];
                    let (ref b, rb) = tensors[j];
                    if !ra.overlaps(&rb) {
                        continue;
                    }
                    let a_start = offset_of(a);
                    let a_end = a_start + a.info().unwrap().total_size_in_bytes();
                    let b_start = offset_of(b);
                    let b_end = b_start + b.info().unwrap().total_size_in_bytes();
                    assert!(
                        a_end <= b_start || b_end <= a_start,
                        "seed {seed}: overlapping-lifetime tensors share bytes"
                    );
                }
            }
        }
    }
}
