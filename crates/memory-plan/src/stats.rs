// Copyright (c) 2026 The tensor-arena Authors
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Layout statistics: how much memory the arena plan saved.

/// Summary of a committed arena layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct PlanStats {
    /// Number of tensors packed into the arena.
    pub num_tensors: usize,
    /// Sum of all tensor footprints, as if allocated independently.
    pub requested_bytes: usize,
    /// Actual slab size after lifetime-based reuse.
    pub arena_bytes: usize,
}

impl PlanStats {
    /// Fraction of requested bytes saved by reuse, in `[0, 1)`.
    ///
    /// Returns 0.0 for an empty plan or when no reuse was possible.
    pub fn reuse_ratio(&self) -> f64 {
        if self.requested_bytes == 0 || self.arena_bytes >= self.requested_bytes {
            return 0.0;
        }
        1.0 - self.arena_bytes as f64 / self.requested_bytes as f64
    }

    /// One-line human-readable summary.
    pub fn summary(&self) -> String {
        format!(
            "{} tensors, {} B requested, {} B arena ({:.1}% reuse)",
            self.num_tensors,
            self.requested_bytes,
            self.arena_bytes,
            self.reuse_ratio() * 100.0
        )
    }
}
