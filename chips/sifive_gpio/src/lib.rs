// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Driver for the GPIO controller of SiFive Freedom RISC-V SoCs.
//!
//! The crate turns abstract pin configurations into the bank's register bit
//! patterns and demultiplexes the per-pin PLIC lines into registered
//! callbacks. Boards supply the register addresses, the IRQ base of pin 0 and
//! an interrupt controller; see [`gpio`] for the wiring.

#![no_std]
#![crate_name = "sifive_gpio"]
#![crate_type = "rlib"]

mod config;

pub mod callback;
pub mod errorcode;
pub mod flags;
pub mod gpio;
pub mod list;
pub mod mmio;
pub mod plic;

pub use crate::callback::{Client, GpioCallback};
pub use crate::errorcode::{ConfigError, GpioError, IoError};
pub use crate::flags::{Flags, PinMode, Trigger};
pub use crate::gpio::{Access, Configuration, GpioRegisters, SifiveGpio};
pub use crate::mmio::MmioRef;
pub use crate::plic::{InterruptLines, Plic, PlicRegisters};

/// Pins in the bank, one bit per pin in every register.
pub const PIN_COUNT: u32 = 32;
