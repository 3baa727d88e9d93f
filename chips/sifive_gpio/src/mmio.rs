// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Handles to memory-mapped register blocks.
//!
//! Peripheral drivers never own their registers. They hold an [`MmioRef`]
//! pointing at the block the board hands them, and every access goes through
//! the volatile cells of the register struct.

use core::fmt;
use core::ops::Deref;

/// A `'static` shared reference to a memory-mapped register block `T`.
///
/// Creating one is the only unsafe step in talking to a peripheral. Once the
/// caller vouches for the address, dereferencing is safe.
pub struct MmioRef<T> {
    ptr: *const T,
}

impl<T> MmioRef<T> {
    /// Wrap a pointer to a register block.
    ///
    /// # Safety
    ///
    /// `ptr` must be non-null, aligned for `T`, and point at memory laid out
    /// as `T` that stays valid for the rest of the program.
    pub const unsafe fn new(ptr: *const T) -> MmioRef<T> {
        MmioRef { ptr }
    }

    /// Wrap the register block mapped at physical address `addr`.
    ///
    /// # Safety
    ///
    /// Same contract as [`MmioRef::new`].
    pub const unsafe fn from_address(addr: usize) -> MmioRef<T> {
        MmioRef {
            ptr: addr as *const T,
        }
    }

    /// Base address of the block.
    pub fn address(&self) -> usize {
        self.ptr as usize
    }
}

impl<T> Clone for MmioRef<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for MmioRef<T> {}

impl<T: 'static> Deref for MmioRef<T> {
    type Target = T;

    fn deref(&self) -> &'static T {
        unsafe { &*self.ptr }
    }
}

impl<T> fmt::Debug for MmioRef<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MmioRef({:#010x})", self.address())
    }
}
