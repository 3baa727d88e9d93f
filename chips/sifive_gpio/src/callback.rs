// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Pin-change callbacks.

use core::cell::Cell;
use core::fmt;

use crate::list::{ListLink, ListNode};

/// Interface for users of GPIO interrupts.
///
/// `fired` runs in interrupt context. It cannot fail: whatever the client
/// does with the event stays on its side of the call.
pub trait Client {
    /// `pins` has exactly one bit set, the pin that triggered.
    fn fired(&self, pins: u32);
}

/// A registration of `client` for every pin in `pin_mask`.
///
/// The node is owned by the registrant and linked into the controller's list
/// in place, so registering allocates nothing.
pub struct GpioCallback<'a> {
    client: &'a dyn Client,
    pin_mask: Cell<u32>,
    next: ListLink<'a, GpioCallback<'a>>,
}

impl<'a> GpioCallback<'a> {
    pub const fn new(client: &'a dyn Client, pin_mask: u32) -> GpioCallback<'a> {
        GpioCallback {
            client,
            pin_mask: Cell::new(pin_mask),
            next: ListLink::empty(),
        }
    }

    pub fn pin_mask(&self) -> u32 {
        self.pin_mask.get()
    }

    /// Takes effect from the next dispatch, registered or not.
    pub fn set_pin_mask(&self, pin_mask: u32) {
        self.pin_mask.set(pin_mask);
    }

    pub(crate) fn matches(&self, pins: u32) -> bool {
        self.pin_mask.get() & pins != 0
    }

    pub(crate) fn fire(&self, pins: u32) {
        self.client.fired(pins);
    }
}

impl<'a> ListNode<'a, GpioCallback<'a>> for GpioCallback<'a> {
    fn next(&'a self) -> &'a ListLink<'a, GpioCallback<'a>> {
        &self.next
    }
}

impl fmt::Debug for GpioCallback<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GpioCallback")
            .field("pin_mask", &format_args!("{:#034b}", self.pin_mask.get()))
            .finish_non_exhaustive()
    }
}
