// Copyright (c) 2026 The tensor-arena Authors
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for arena planning.

use tensor_core::TensorError;

/// Errors that can occur while registering tensors or finalizing a group.
#[derive(Debug, thiserror::Error)]
pub enum MemoryError {
    /// Registration attempted after the group's layout was committed.
    #[error("memory group already finalized: intermediates must be registered before finalize()")]
    AlreadyFinalized,

    /// The arena alignment is unusable.
    #[error("arena alignment {0} is not a non-zero power of two")]
    BadAlignment(usize),

    /// A registered tensor was in the wrong lifecycle state.
    #[error("tensor error: {0}")]
    Tensor(#[from] TensorError),
}
