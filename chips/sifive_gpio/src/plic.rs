// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Upstream interrupt controller.
//!
//! Every GPIO pin has its own PLIC source, numbered from the controller's IRQ
//! base. The GPIO driver only needs three things from the interrupt
//! controller, captured by [`InterruptLines`]. [`Plic`] provides them for the
//! SiFive Platform-Level Interrupt Controller.

use core::cell::Cell;

use tock_registers::interfaces::{Readable, Writeable};
use tock_registers::registers::{ReadOnly, ReadWrite};
use tock_registers::register_bitfields;

use crate::mmio::MmioRef;

/// What the GPIO driver consumes from the interrupt controller.
pub trait InterruptLines {
    /// The line currently being serviced, if any.
    fn active_line(&self) -> Option<u32>;

    /// Unmask `line`.
    fn enable_line(&self, line: u32);

    /// Mask `line`.
    fn disable_line(&self, line: u32);
}

/// The PLIC specification allows up to 1023 sources.
const MAX_INTERRUPTS: usize = 1023;
/// One bit per source in the pending and enable banks.
const MAX_BIT_REGS: usize = (MAX_INTERRUPTS + 1).div_ceil(32);

/// Priority given to every source by [`Plic::init`]. Anything above the
/// threshold of zero is delivered.
const DEFAULT_PRIORITY: u32 = 1;

register_bitfields![u32,
    priority [
        Priority OFFSET(0) NUMBITS(3) []
    ]
];

/// PLIC registers, machine-mode context 0 only.
#[repr(C)]
pub struct PlicRegisters {
    _reserved0: u32,
    /// Priority of sources 1..=1023
    priority: [ReadWrite<u32, priority::Register>; MAX_INTERRUPTS],
    _reserved1: [u8; 0x1000 - (MAX_INTERRUPTS + 1) * 4],
    /// Pending bits, source `n` at bit `n % 32` of word `n / 32`
    pending: [ReadOnly<u32>; MAX_BIT_REGS],
    _reserved2: [u8; 0x1000 - MAX_BIT_REGS * 4],
    /// Enable bits, same layout as `pending`
    enable: [ReadWrite<u32>; MAX_BIT_REGS],
    _reserved3: [u8; 0x20_0000 - 0x2000 - MAX_BIT_REGS * 4],
    /// Priority threshold
    threshold: ReadWrite<u32, priority::Register>,
    /// Claim/complete
    claim: ReadWrite<u32>,
}

const _: () = assert!(core::mem::offset_of!(PlicRegisters, priority) == 0x4);
const _: () = assert!(core::mem::offset_of!(PlicRegisters, pending) == 0x1000);
const _: () = assert!(core::mem::offset_of!(PlicRegisters, enable) == 0x2000);
const _: () = assert!(core::mem::offset_of!(PlicRegisters, threshold) == 0x20_0000);
const _: () = assert!(core::mem::offset_of!(PlicRegisters, claim) == 0x20_0004);

/// A PLIC implementing `TOTAL_INTS` sources, numbered `1..=TOTAL_INTS`.
///
/// 52 matches the FE310, whose GPIO pins are sources 8 through 39.
pub struct Plic<const TOTAL_INTS: usize = 52> {
    registers: MmioRef<PlicRegisters>,
    active: Cell<Option<u32>>,
}

impl<const TOTAL_INTS: usize> Plic<TOTAL_INTS> {
    pub const fn new(registers: MmioRef<PlicRegisters>) -> Self {
        Plic {
            registers,
            active: Cell::new(None),
        }
    }

    fn enable_regs(&self) -> &[ReadWrite<u32>] {
        &self.registers.enable[0..(TOTAL_INTS + 1).div_ceil(32)]
    }

    fn priority_regs(&self) -> &[ReadWrite<u32, priority::Register>] {
        &self.registers.priority[0..TOTAL_INTS]
    }

    fn implemented(line: u32) -> bool {
        line != 0 && line as usize <= TOTAL_INTS
    }

    /// Mask every source, give each the default priority and accept all
    /// priorities.
    pub fn init(&self) {
        for enable in self.enable_regs() {
            enable.set(0);
        }
        for priority in self.priority_regs() {
            priority.write(priority::Priority.val(DEFAULT_PRIORITY));
        }
        self.registers.threshold.write(priority::Priority.val(0));
    }

    /// Whether the PLIC gateway holds a request for `line`.
    pub fn is_pending(&self, line: u32) -> bool {
        if !Self::implemented(line) {
            return false;
        }
        let word = self.registers.pending[line as usize / 32].get();
        word & (1 << (line % 32)) != 0
    }

    /// Claim the highest-priority pending source, run `handler` with it, then
    /// signal completion. The claimed line is reported by `active_line` for
    /// the duration of `handler`.
    ///
    /// Returns `false` when nothing was pending.
    pub fn handle_next<F: FnOnce(u32)>(&self, handler: F) -> bool {
        let line = self.registers.claim.get();
        if line == 0 {
            return false;
        }

        self.active.set(Some(line));
        handler(line);
        self.active.set(None);

        self.registers.claim.set(line);
        true
    }

    fn update_enable(&self, line: u32, on: bool) {
        if !Self::implemented(line) {
            log::warn!("plic: line {} is not implemented (1..={})", line, TOTAL_INTS);
            return;
        }
        let reg = &self.enable_regs()[line as usize / 32];
        let bit = 1 << (line % 32);
        if on {
            reg.set(reg.get() | bit);
        } else {
            reg.set(reg.get() & !bit);
        }
    }
}

impl<const TOTAL_INTS: usize> InterruptLines for Plic<TOTAL_INTS> {
    fn active_line(&self) -> Option<u32> {
        self.active.get()
    }

    fn enable_line(&self, line: u32) {
        self.update_enable(line, true);
    }

    fn disable_line(&self, line: u32) {
        self.update_enable(line, false);
    }
}
