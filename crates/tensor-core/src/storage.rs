// Copyright (c) 2026 The tensor-arena Authors
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Backing storage for tensors: unbound, owned, or leased from an arena.
//!
//! A bound storage is a shared byte buffer plus a byte offset. Owning
//! tensors bind a freshly allocated buffer at offset 0; tensors managed by
//! a memory group are rebound to `arena_slab + assigned_offset` when the
//! group finalizes. Rebinding never moves or copies element data — only
//! the (buffer, offset) pair changes.

use std::cell::RefCell;
use std::rc::Rc;

/// Where a tensor's bytes live.
#[derive(Debug, Clone)]
pub(crate) enum Storage {
    /// No backing buffer: freshly constructed, freed, or awaiting an
    /// arena lease.
    Unbound,
    /// Bound to `len` bytes starting at `offset` within a shared buffer.
    Bound {
        buf: Rc<RefCell<Vec<u8>>>,
        offset: usize,
        len: usize,
    },
}

impl Storage {
    pub(crate) fn is_bound(&self) -> bool {
        matches!(self, Storage::Bound { .. })
    }

    pub(crate) fn binding(&self) -> Option<Binding> {
        match self {
            Storage::Unbound => None,
            Storage::Bound { buf, offset, len } => Some(Binding {
                buf: Rc::clone(buf),
                base: *offset,
                len: *len,
            }),
        }
    }
}

/// A resolved handle to a tensor's bytes: shared buffer + base offset.
///
/// Kernels obtain one `Binding` per tensor argument at the start of
/// `run()` and address elements at `base + byte_offset`, where the byte
/// offset comes from [`crate::TensorInfo`] stride arithmetic. Element
/// accessors go through `from_ne_bytes`/`to_ne_bytes`, so arena leases
/// need no alignment guarantees.
#[derive(Debug, Clone)]
pub struct Binding {
    buf: Rc<RefCell<Vec<u8>>>,
    base: usize,
    len: usize,
}

impl Binding {
    /// Returns the base pointer of this binding's byte range.
    ///
    /// Diagnostic use only (aliasing assertions, tests); element access
    /// goes through the typed readers below.
    pub fn base_ptr(&self) -> *const u8 {
        // A short shared borrow; the pointer stays valid for as long as
        // the buffer Rc is alive and unresized, which holds because
        // allocated tensors are not resizable.
        self.buf.borrow().as_ptr().wrapping_add(self.base)
    }

    /// Returns the byte offset of this binding within the shared buffer.
    pub fn base_offset(&self) -> usize {
        self.base
    }

    /// Returns the length in bytes of the bound range.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the bound range is empty.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Reads an `f32` at `byte_offset` from the binding base.
    pub fn read_f32(&self, byte_offset: usize) -> f32 {
        let buf = self.buf.borrow();
        let at = self.base + byte_offset;
        let mut raw = [0u8; 4];
        raw.copy_from_slice(&buf[at..at + 4]);
        f32::from_ne_bytes(raw)
    }

    /// Writes an `f32` at `byte_offset` from the binding base.
    pub fn write_f32(&self, byte_offset: usize, value: f32) {
        let mut buf = self.buf.borrow_mut();
        let at = self.base + byte_offset;
        buf[at..at + 4].copy_from_slice(&value.to_ne_bytes());
    }

    /// Reads a `u8` at `byte_offset` from the binding base.
    pub fn read_u8(&self, byte_offset: usize) -> u8 {
        self.buf.borrow()[self.base + byte_offset]
    }

    /// Writes a `u8` at `byte_offset` from the binding base.
    pub fn write_u8(&self, byte_offset: usize, value: u8) {
        self.buf.borrow_mut()[self.base + byte_offset] = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bound(bytes: usize, offset: usize) -> Binding {
        let buf = Rc::new(RefCell::new(vec![0u8; bytes]));
        Storage::Bound {
            buf,
            offset,
            len: bytes - offset,
        }
        .binding()
        .unwrap()
    }

    #[test]
    fn test_unbound_has_no_binding() {
        assert!(Storage::Unbound.binding().is_none());
        assert!(!Storage::Unbound.is_bound());
    }

    #[test]
    fn test_f32_roundtrip() {
        let b = bound(64, 0);
        b.write_f32(8, 3.5);
        assert_eq!(b.read_f32(8), 3.5);
        assert_eq!(b.read_f32(0), 0.0);
    }

    #[test]
    fn test_base_offset_applies() {
        let b = bound(64, 16);
        b.write_u8(0, 0xAB);
        assert_eq!(b.read_u8(0), 0xAB);
        // The same buffer seen from offset 0 has the byte at 16.
        let whole = Binding {
            buf: Rc::clone(&b.buf),
            base: 0,
            len: 64,
        };
        assert_eq!(whole.read_u8(16), 0xAB);
        assert_eq!(b.base_ptr() as usize - whole.base_ptr() as usize, 16);
    }

    #[test]
    fn test_shared_buffer_visibility() {
        let buf = Rc::new(RefCell::new(vec![0u8; 16]));
        let a = Storage::Bound {
            buf: Rc::clone(&buf),
            offset: 0,
            len: 16,
        };
        let b = Storage::Bound {
            buf,
            offset: 4,
            len: 12,
        };
        a.binding().unwrap().write_f32(4, 2.0);
        assert_eq!(b.binding().unwrap().read_f32(0), 2.0);
    }
}
