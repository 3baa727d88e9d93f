// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! SiFive GPIO controller.
//!
//! One 32-pin bank. Every pin has its own interrupt source at the upstream
//! controller, numbered `irq_base + pin`, and all of them are routed to
//! [`SifiveGpio::handle_interrupt`].
//!
//! The driver keeps no shadow of the hardware. Each operation reads and writes
//! the registers directly, so pending bits raised by the hardware between two
//! calls are always observed.
//!
//! Typical board wiring:
//!
//! ```rust,ignore
//! let plic = Plic::new(unsafe { MmioRef::from_address(0x0C00_0000) });
//! let gpio = SifiveGpio::new(unsafe { MmioRef::from_address(0x1001_2000) }, 8, &plic);
//! plic.init();
//! gpio.init();
//!
//! gpio.configure(Access::Pin, 3, Flags::INTERRUPT | Flags::EDGE | Flags::DOUBLE_EDGE)?;
//! gpio.register_callback(&BUTTON_CALLBACK);
//! gpio.enable_source(Access::Pin, 3)?;
//!
//! // trap handler
//! while plic.handle_next(|line| match line {
//!     8..=39 => gpio.handle_interrupt(),
//!     _ => {}
//! }) {}
//! ```

use tock_registers::fields::{Field, FieldValue};
use tock_registers::interfaces::{ReadWriteable, Readable, Writeable};
use tock_registers::register_bitfields;
use tock_registers::registers::{ReadOnly, ReadWrite};

use crate::callback::GpioCallback;
use crate::config::CONFIG;
use crate::errorcode::{ConfigError, GpioError, IoError};
use crate::flags::{Flags, PinMode, Trigger};
use crate::list::List;
use crate::mmio::MmioRef;
use crate::plic::InterruptLines;
use crate::PIN_COUNT;

#[repr(C)]
pub struct GpioRegisters {
    /// Pin Input Value Register
    input_val: ReadOnly<u32, pins::Register>,
    /// Pin Input Enable Register
    input_en: ReadWrite<u32, pins::Register>,
    /// Pin Output Enable Register
    output_en: ReadWrite<u32, pins::Register>,
    /// Output Port Value Register
    output_val: ReadWrite<u32, pins::Register>,
    /// Internal Pull-Up Enable Register
    pue: ReadWrite<u32, pins::Register>,
    /// Drive Strength Register
    #[allow(dead_code)]
    ds: ReadWrite<u32, pins::Register>,
    /// Rise Interrupt Enable Register
    rise_ie: ReadWrite<u32, pins::Register>,
    /// Rise Interrupt Pending Register
    rise_ip: ReadWrite<u32, pins::Register>,
    /// Fall Interrupt Enable Register
    fall_ie: ReadWrite<u32, pins::Register>,
    /// Fall Interrupt Pending Register
    fall_ip: ReadWrite<u32, pins::Register>,
    /// High Interrupt Enable Register
    high_ie: ReadWrite<u32, pins::Register>,
    /// High Interrupt Pending Register
    high_ip: ReadWrite<u32, pins::Register>,
    /// Low Interrupt Enable Register
    low_ie: ReadWrite<u32, pins::Register>,
    /// Low Interrupt Pending Register
    low_ip: ReadWrite<u32, pins::Register>,
    // Pin multiplexing is left to the board.
    /// HW I/O Function Enable Register
    #[allow(dead_code)]
    iof_en: ReadWrite<u32, pins::Register>,
    /// HW I/O Function Select Register
    #[allow(dead_code)]
    iof_sel: ReadWrite<u32, pins::Register>,
    /// Output XOR (invert) Register
    out_xor: ReadWrite<u32, pins::Register>,
}

const _: () = assert!(core::mem::offset_of!(GpioRegisters, output_val) == 0x0C);
const _: () = assert!(core::mem::offset_of!(GpioRegisters, rise_ie) == 0x18);
const _: () = assert!(core::mem::offset_of!(GpioRegisters, rise_ip) == 0x1C);
const _: () = assert!(core::mem::offset_of!(GpioRegisters, low_ip) == 0x34);
const _: () = assert!(core::mem::offset_of!(GpioRegisters, iof_sel) == 0x3C);
const _: () = assert!(core::mem::offset_of!(GpioRegisters, out_xor) == 0x40);
const _: () = assert!(core::mem::size_of::<GpioRegisters>() == 0x44);

register_bitfields![u32,
    pins [
        pin0 OFFSET(0) NUMBITS(1) [],
        pin1 OFFSET(1) NUMBITS(1) [],
        pin2 OFFSET(2) NUMBITS(1) [],
        pin3 OFFSET(3) NUMBITS(1) [],
        pin4 OFFSET(4) NUMBITS(1) [],
        pin5 OFFSET(5) NUMBITS(1) [],
        pin6 OFFSET(6) NUMBITS(1) [],
        pin7 OFFSET(7) NUMBITS(1) [],
        pin8 OFFSET(8) NUMBITS(1) [],
        pin9 OFFSET(9) NUMBITS(1) [],
        pin10 OFFSET(10) NUMBITS(1) [],
        pin11 OFFSET(11) NUMBITS(1) [],
        pin12 OFFSET(12) NUMBITS(1) [],
        pin13 OFFSET(13) NUMBITS(1) [],
        pin14 OFFSET(14) NUMBITS(1) [],
        pin15 OFFSET(15) NUMBITS(1) [],
        pin16 OFFSET(16) NUMBITS(1) [],
        pin17 OFFSET(17) NUMBITS(1) [],
        pin18 OFFSET(18) NUMBITS(1) [],
        pin19 OFFSET(19) NUMBITS(1) [],
        pin20 OFFSET(20) NUMBITS(1) [],
        pin21 OFFSET(21) NUMBITS(1) [],
        pin22 OFFSET(22) NUMBITS(1) [],
        pin23 OFFSET(23) NUMBITS(1) [],
        pin24 OFFSET(24) NUMBITS(1) [],
        pin25 OFFSET(25) NUMBITS(1) [],
        pin26 OFFSET(26) NUMBITS(1) [],
        pin27 OFFSET(27) NUMBITS(1) [],
        pin28 OFFSET(28) NUMBITS(1) [],
        pin29 OFFSET(29) NUMBITS(1) [],
        pin30 OFFSET(30) NUMBITS(1) [],
        pin31 OFFSET(31) NUMBITS(1) []
    ]
];

/// Addressing mode of a pin operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Access {
    /// One pin, by index.
    Pin,
    /// The whole bank at once. Not supported by this driver.
    Port,
}

/// Direction a pin is currently set up for, as read back from the enables.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Configuration {
    /// Neither input nor output enabled: the reset state.
    Disabled,
    Input,
    Output,
    /// Both enables set. `configure` never produces this.
    InputOutput,
}

/// The one-bit field of a pin, valid in every register of the bank.
struct PinBits {
    field: Field<u32, pins::Register>,
    set: FieldValue<u32, pins::Register>,
    clear: FieldValue<u32, pins::Register>,
}

impl PinBits {
    fn new(pin: u32) -> PinBits {
        let field = Field::new(1, pin as usize);
        PinBits {
            field,
            set: field.val(1),
            clear: field.val(0),
        }
    }

    fn value(&self, on: bool) -> FieldValue<u32, pins::Register> {
        if on {
            self.set
        } else {
            self.clear
        }
    }

    fn mask(&self) -> u32 {
        self.field.mask << self.field.shift
    }
}

/// Validate an operation's addressing and return the pin's field.
fn pin_bits(access: Access, pin: u32) -> Result<PinBits, GpioError> {
    if access != Access::Pin {
        return Err(GpioError::Unsupported);
    }
    if pin >= PIN_COUNT {
        return Err(GpioError::OutOfRange);
    }
    Ok(PinBits::new(pin))
}

pub struct SifiveGpio<'a, I: InterruptLines> {
    registers: MmioRef<GpioRegisters>,
    irq_base: u32,
    lines: &'a I,
    callbacks: List<'a, GpioCallback<'a>>,
}

impl<'a, I: InterruptLines> SifiveGpio<'a, I> {
    /// `irq_base` is the upstream line of pin 0; pin `n` fires line
    /// `irq_base + n`.
    pub const fn new(
        registers: MmioRef<GpioRegisters>,
        irq_base: u32,
        lines: &'a I,
    ) -> SifiveGpio<'a, I> {
        SifiveGpio {
            registers,
            irq_base,
            lines,
            callbacks: List::new(),
        }
    }

    pub fn irq_base(&self) -> u32 {
        self.irq_base
    }

    /// Put every pin in a known state: direction, pull, polarity and trigger
    /// enables all cleared. Must run before any pin is used.
    pub fn init(&self) {
        let regs = self.registers;

        regs.input_en.set(0);
        regs.output_en.set(0);
        regs.pue.set(0);
        regs.rise_ie.set(0);
        regs.fall_ie.set(0);
        regs.high_ie.set(0);
        regs.low_ie.set(0);
        regs.out_xor.set(0);
    }

    /// Configure direction, polarity, pull and interrupt trigger of `pin`.
    ///
    /// The trigger is only programmed here. Whether the pin actually raises
    /// its line is decided by [`enable_source`](Self::enable_source), and the
    /// source should be disabled while its trigger is being changed.
    pub fn configure(&self, access: Access, pin: u32, flags: Flags) -> Result<(), ConfigError> {
        let bits = pin_bits(access, pin)?;
        let mode = PinMode::try_from(flags)?;
        let regs = self.registers;

        match mode {
            PinMode::Output { invert } => {
                regs.input_en.modify(bits.clear);
                regs.output_en.modify(bits.set);
                regs.out_xor.modify(bits.value(invert));
            }
            PinMode::Input { pull_up, trigger } => {
                regs.output_en.modify(bits.clear);
                regs.input_en.modify(bits.set);
                regs.pue.modify(bits.value(pull_up));

                if let Some(trigger) = trigger {
                    self.program_trigger(&bits, trigger);
                }
            }
        }

        if CONFIG.trace_config {
            log::trace!("gpio: pin {} configured as {:?}", pin, mode);
        }
        Ok(())
    }

    /// Edge and level enables are mutually exclusive, so the class not in use
    /// is cleared first.
    fn program_trigger(&self, bits: &PinBits, trigger: Trigger) {
        let regs = self.registers;

        if trigger.is_edge() {
            regs.high_ie.modify(bits.clear);
            regs.low_ie.modify(bits.clear);

            regs.rise_ie.modify(bits.value(trigger.on_rise()));
            regs.fall_ie.modify(bits.value(trigger.on_fall()));
        } else {
            regs.rise_ie.modify(bits.clear);
            regs.fall_ie.modify(bits.clear);

            let high = trigger == Trigger::HighLevel;
            regs.high_ie.modify(bits.value(high));
            regs.low_ie.modify(bits.value(!high));
        }
    }

    pub fn configuration(&self, access: Access, pin: u32) -> Result<Configuration, GpioError> {
        let bits = pin_bits(access, pin)?;
        let regs = self.registers;

        let input = regs.input_en.is_set(bits.field);
        let output = regs.output_en.is_set(bits.field);
        Ok(match (input, output) {
            (true, true) => Configuration::InputOutput,
            (true, false) => Configuration::Input,
            (false, true) => Configuration::Output,
            (false, false) => Configuration::Disabled,
        })
    }

    /// Drive `pin` to `value`. Refused for a pin configured as input rather
    /// than silently latching a value nobody sees.
    pub fn write(&self, access: Access, pin: u32, value: bool) -> Result<(), IoError> {
        let bits = pin_bits(access, pin)?;
        let regs = self.registers;

        if regs.input_en.is_set(bits.field) {
            return Err(GpioError::InvalidState);
        }
        regs.output_val.modify(bits.value(value));
        Ok(())
    }

    /// Flip the output value of `pin` and return the new level.
    pub fn toggle(&self, access: Access, pin: u32) -> Result<bool, IoError> {
        let bits = pin_bits(access, pin)?;
        let regs = self.registers;

        if regs.input_en.is_set(bits.field) {
            return Err(GpioError::InvalidState);
        }
        let level = !regs.output_val.is_set(bits.field);
        regs.output_val.modify(bits.value(level));
        Ok(level)
    }

    /// Current level of `pin`: the driven value for an output, the sampled
    /// value otherwise.
    pub fn read(&self, access: Access, pin: u32) -> Result<bool, IoError> {
        let bits = pin_bits(access, pin)?;
        let regs = self.registers;

        if regs.output_en.is_set(bits.field) {
            Ok(regs.output_val.is_set(bits.field))
        } else {
            Ok(regs.input_val.is_set(bits.field))
        }
    }

    /// Whether any trigger class holds an unacknowledged event for `pin`.
    pub fn is_pending(&self, access: Access, pin: u32) -> Result<bool, GpioError> {
        let bits = pin_bits(access, pin)?;
        let regs = self.registers;

        Ok(regs.rise_ip.is_set(bits.field)
            || regs.fall_ip.is_set(bits.field)
            || regs.high_ip.is_set(bits.field)
            || regs.low_ip.is_set(bits.field))
    }

    /// Add `callback` to the dispatch list. A callback that is already
    /// registered is moved to the front rather than linked twice.
    pub fn register_callback(&self, callback: &'a GpioCallback<'a>) {
        self.callbacks.remove(callback);
        self.callbacks.push_head(callback);
    }

    pub fn unregister_callback(&self, callback: &GpioCallback<'a>) -> Result<(), GpioError> {
        if self.callbacks.remove(callback) {
            Ok(())
        } else {
            Err(GpioError::NotRegistered)
        }
    }

    /// Upstream line of `pin`. Fails rather than wrapping when the IRQ base
    /// leaves no room for the pin.
    fn line_of(&self, access: Access, pin: u32) -> Result<u32, GpioError> {
        pin_bits(access, pin)?;
        self.irq_base.checked_add(pin).ok_or(GpioError::OutOfRange)
    }

    /// Unmask the pin's line at the interrupt controller.
    pub fn enable_source(&self, access: Access, pin: u32) -> Result<(), GpioError> {
        let line = self.line_of(access, pin)?;
        self.lines.enable_line(line);
        Ok(())
    }

    /// Mask the pin's line at the interrupt controller.
    pub fn disable_source(&self, access: Access, pin: u32) -> Result<(), GpioError> {
        let line = self.line_of(access, pin)?;
        self.lines.disable_line(line);
        Ok(())
    }

    /// Entry point from the trap handler for any of this bank's lines.
    pub fn handle_interrupt(&self) {
        if let Some(line) = self.lines.active_line() {
            self.handle_line(line);
        }
    }

    /// Run the callbacks of the pin behind `line`, then acknowledge it.
    pub fn handle_line(&self, line: u32) {
        let pin = match line.checked_sub(self.irq_base) {
            Some(pin) if pin < PIN_COUNT => pin,
            _ => {
                log::warn!(
                    "gpio: line {} is not a pin line (base {})",
                    line,
                    self.irq_base
                );
                return;
            }
        };
        let bits = PinBits::new(pin);
        let mask = bits.mask();

        if CONFIG.trace_interrupts {
            log::trace!("gpio: line {} -> pin {}", line, pin);
        }

        for callback in self.callbacks.iter().filter(|cb| cb.matches(mask)) {
            callback.fire(mask);
        }

        self.acknowledge(pin, &bits);
    }

    /// Clear the pin's event in the first pending register holding it.
    ///
    /// Only one trigger class is armed per pin, so at most one register should
    /// hold the bit. Should the hardware report several, rise wins over fall,
    /// fall over high, high over low; the others stay pending.
    fn acknowledge(&self, pin: u32, bits: &PinBits) {
        let regs = self.registers;
        let pending: [(&str, &ReadWrite<u32, pins::Register>); 4] = [
            ("rise", &regs.rise_ip),
            ("fall", &regs.fall_ip),
            ("high", &regs.high_ip),
            ("low", &regs.low_ip),
        ];

        match pending.iter().find(|(_, reg)| reg.is_set(bits.field)) {
            Some((class, reg)) => {
                // Write-1-to-clear: a read-modify-write would also clear
                // every other pin pending in the same register.
                reg.set(bits.mask());
                if CONFIG.trace_interrupts {
                    log::trace!("gpio: pin {} acknowledged in {}_ip", pin, class);
                }
            }
            None => log::debug!("gpio: pin {} fired with nothing pending", pin),
        }
    }
}
