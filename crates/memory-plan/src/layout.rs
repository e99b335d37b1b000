// Copyright (c) 2026 The tensor-arena Authors
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! First-fit interval layout: packing live ranges into arena offsets.
//!
//! For each request, in registration order, the planner scans the blocks
//! already placed whose live ranges overlap the candidate's and picks the
//! lowest aligned offset that collides with none of them. Requests whose
//! lifetimes are disjoint are free to land on the same bytes; requests
//! that are ever live together can never overlap.
//!
//! The layout is best-effort: the worst case degenerates to the sum of
//! all request sizes, which is always correct, just without reuse.

use crate::LiveRange;

/// One tensor's demand on the arena.
#[derive(Debug, Clone, Copy)]
pub struct Request {
    /// Byte footprint of the tensor.
    pub size_bytes: usize,
    /// Steps during which the tensor is live.
    pub range: LiveRange,
}

/// Where a request landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    /// Assigned byte offset within the arena.
    pub offset: usize,
    /// Byte footprint (copied from the request).
    pub size_bytes: usize,
}

impl Placement {
    /// End of the occupied byte range (exclusive).
    pub fn end(&self) -> usize {
        self.offset + self.size_bytes
    }
}

/// Rounds `value` up to the next multiple of `alignment`.
///
/// `alignment` must be a non-zero power of two.
fn align_up(value: usize, alignment: usize) -> usize {
    (value + alignment - 1) & !(alignment - 1)
}

/// Assigns an arena offset to every request and returns the placements
/// (in request order) together with the total arena size in bytes.
pub fn plan_offsets(requests: &[Request], alignment: usize) -> (Vec<Placement>, usize) {
    let mut placements: Vec<Placement> = Vec::with_capacity(requests.len());
    let mut arena_end = 0usize;

    for request in requests {
        // Only blocks live at the same time constrain this request.
        let mut conflicting: Vec<&Placement> = placements
            .iter()
            .zip(requests)
            .filter(|(p, r)| p.size_bytes > 0 && r.range.overlaps(&request.range))
            .map(|(p, _)| p)
            .collect();
        conflicting.sort_by_key(|p| p.offset);

        let mut offset = 0usize;
        for block in conflicting {
            if offset + request.size_bytes <= block.offset {
                break;
            }
            offset = offset.max(align_up(block.end(), alignment));
        }

        let placement = Placement {
            offset,
            size_bytes: request.size_bytes,
        };
        arena_end = arena_end.max(placement.end());
        placements.push(placement);
    }

    (placements, arena_end)
}
