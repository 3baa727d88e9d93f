// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! A button on pin 3 of an FE310, driven end to end through the public API:
//! configuration, arming at the PLIC, a falling-edge event, dispatch.

use core::cell::Cell;
use core::mem::size_of;
use core::ptr;

use sifive_gpio::{
    Access, Client, Flags, GpioCallback, GpioRegisters, InterruptLines, MmioRef, Plic,
    PlicRegisters, SifiveGpio,
};

const GPIO_IRQ_BASE: u32 = 8;

const INPUT_EN: usize = 0x04;
const OUTPUT_EN: usize = 0x08;
const RISE_IE: usize = 0x18;
const RISE_IP: usize = 0x1C;
const FALL_IE: usize = 0x20;
const FALL_IP: usize = 0x24;
const HIGH_IE: usize = 0x28;
const HIGH_IP: usize = 0x2C;
const LOW_IE: usize = 0x30;
const LOW_IP: usize = 0x34;

const PLIC_ENABLE: usize = 0x2000;
const PLIC_CLAIM: usize = 0x20_0004;

/// Zeroed, leaked memory the size of `T`, addressed by byte offset.
struct Fake {
    base: *mut u32,
}

impl Fake {
    fn of<T>() -> Fake {
        let mem = vec![0u32; size_of::<T>() / 4].leak();
        Fake {
            base: mem.as_mut_ptr(),
        }
    }

    fn mmio<T>(&self) -> MmioRef<T> {
        unsafe { MmioRef::new(self.base as *const T) }
    }

    fn get(&self, offset: usize) -> u32 {
        unsafe { ptr::read_volatile(self.base.add(offset / 4)) }
    }

    fn set(&self, offset: usize, value: u32) {
        unsafe { ptr::write_volatile(self.base.add(offset / 4), value) }
    }
}

#[derive(Default)]
struct Button {
    presses: Cell<u32>,
    last: Cell<u32>,
}

impl Client for Button {
    fn fired(&self, pins: u32) {
        self.presses.set(self.presses.get() + 1);
        self.last.set(pins);
    }
}

#[test]
fn button_on_pin_3() {
    let gpio_mem = Fake::of::<GpioRegisters>();
    let plic_mem = Fake::of::<PlicRegisters>();
    let plic: Plic = Plic::new(plic_mem.mmio());

    let button = Button::default();
    let neighbour = Button::default();
    let button_cb = GpioCallback::new(&button, 0b1000);
    let neighbour_cb = GpioCallback::new(&neighbour, 0b1_0000);

    let gpio = SifiveGpio::new(gpio_mem.mmio(), GPIO_IRQ_BASE, &plic);
    plic.init();
    gpio.init();

    let both_edges = Flags::INTERRUPT | Flags::EDGE | Flags::DOUBLE_EDGE;
    gpio.configure(Access::Pin, 3, both_edges).unwrap();

    assert_eq!(gpio_mem.get(INPUT_EN), 0b1000);
    assert_eq!(gpio_mem.get(OUTPUT_EN), 0);
    assert_eq!(gpio_mem.get(RISE_IE), 0b1000);
    assert_eq!(gpio_mem.get(FALL_IE), 0b1000);
    assert_eq!(gpio_mem.get(HIGH_IE), 0);
    assert_eq!(gpio_mem.get(LOW_IE), 0);

    gpio.register_callback(&button_cb);
    gpio.register_callback(&neighbour_cb);
    gpio.enable_source(Access::Pin, 3).unwrap();
    assert_eq!(plic_mem.get(PLIC_ENABLE), 1 << 11);

    // The pin falls; the PLIC offers line 11 for claiming.
    gpio_mem.set(FALL_IP, 0b1000);
    plic_mem.set(PLIC_CLAIM, GPIO_IRQ_BASE + 3);

    let serviced = plic.handle_next(|line| {
        assert_eq!(line, 11);
        gpio.handle_interrupt();
    });

    assert!(serviced);
    assert_eq!((button.presses.get(), button.last.get()), (1, 0b1000));
    assert_eq!(neighbour.presses.get(), 0);
    // Acknowledged in fall_ip only.
    assert_eq!(gpio_mem.get(FALL_IP), 0b1000);
    assert_eq!(gpio_mem.get(RISE_IP), 0);
    assert_eq!(gpio_mem.get(HIGH_IP), 0);
    assert_eq!(gpio_mem.get(LOW_IP), 0);
    assert_eq!(plic.active_line(), None);

    gpio.disable_source(Access::Pin, 3).unwrap();
    assert_eq!(plic_mem.get(PLIC_ENABLE), 0);
}

#[test]
fn output_pin_round_trip() {
    let gpio_mem = Fake::of::<GpioRegisters>();
    let plic_mem = Fake::of::<PlicRegisters>();
    let plic: Plic = Plic::new(plic_mem.mmio());
    let gpio = SifiveGpio::new(gpio_mem.mmio(), GPIO_IRQ_BASE, &plic);
    gpio.init();

    gpio.configure(Access::Pin, 19, Flags::OUTPUT).unwrap();
    gpio.write(Access::Pin, 19, true).unwrap();
    assert_eq!(gpio.read(Access::Pin, 19), Ok(true));
    assert_eq!(gpio.toggle(Access::Pin, 19), Ok(false));
    assert_eq!(gpio.read(Access::Pin, 19), Ok(false));
}
