// Copyright (c) 2026 The tensor-arena Authors
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Live ranges: the span of pipeline steps during which a tensor is used.

/// An inclusive interval `[first_use, last_use]` of pipeline step indices.
///
/// A tensor's live range runs from the step that produces it to the last
/// step that consumes it. The planner assumes registration order is also
/// data-flow order, so ranges fully describe when bytes may be reused.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct LiveRange {
    /// Index of the step that first touches the tensor.
    pub first_use: usize,
    /// Index of the step that last touches the tensor.
    pub last_use: usize,
}

impl LiveRange {
    /// Creates a live range; the bounds are normalised so that
    /// `first_use <= last_use`.
    pub fn new(first_use: usize, last_use: usize) -> Self {
        if first_use <= last_use {
            Self {
                first_use,
                last_use,
            }
        } else {
            Self {
                first_use: last_use,
                last_use: first_use,
            }
        }
    }

    /// A range covering a single step.
    pub fn at(step: usize) -> Self {
        Self::new(step, step)
    }

    /// Returns `true` if the two ranges share at least one step.
    pub fn overlaps(&self, other: &LiveRange) -> bool {
        self.first_use <= other.last_use && other.first_use <= self.last_use
    }
}

impl std::fmt::Display for LiveRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}]", self.first_use, self.last_use)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalisation() {
        let r = LiveRange::new(5, 2);
        assert_eq!(r.first_use, 2);
        assert_eq!(r.last_use, 5);
    }

    #[test]
    fn test_overlap() {
        let a = LiveRange::new(0, 2);
        let b = LiveRange::new(2, 4);
        let c = LiveRange::new(3, 5);
        assert!(a.overlaps(&b)); // Shared step 2.
        assert!(!a.overlaps(&c));
        assert!(b.overlaps(&c));
        assert!(a.overlaps(&a));
    }

    #[test]
    fn test_single_step() {
        let r = LiveRange::at(3);
        assert!(r.overlaps(&LiveRange::new(3, 7)));
        assert!(!r.overlaps(&LiveRange::new(4, 7)));
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", LiveRange::new(1, 4)), "[1, 4]");
    }
}
