// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Errors returned by the GPIO driver.

use core::fmt;

/// Every way a driver call can be refused.
///
/// Errors are detected before any register is touched, so a failed call
/// leaves the hardware exactly as it was.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(usize)]
pub enum GpioError {
    /// Pin index is not below `PIN_COUNT`.
    OutOfRange = 1,
    /// Addressing mode other than a single pin.
    Unsupported = 2,
    /// Flags that cannot be honoured together: inverted input, pull-down,
    /// or an interrupt on an output.
    InvalidCombination = 3,
    /// The pin is configured as an input.
    InvalidState = 4,
    /// The callback is not registered with this controller.
    NotRegistered = 5,
}

/// Errors of [`SifiveGpio::configure`](crate::gpio::SifiveGpio::configure).
pub type ConfigError = GpioError;

/// Errors of pin reads and writes.
pub type IoError = GpioError;

impl From<GpioError> for usize {
    fn from(err: GpioError) -> usize {
        err as usize
    }
}

impl fmt::Display for GpioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            GpioError::OutOfRange => "pin out of range",
            GpioError::Unsupported => "unsupported addressing mode",
            GpioError::InvalidCombination => "invalid flag combination",
            GpioError::InvalidState => "pin is configured as input",
            GpioError::NotRegistered => "callback not registered",
        };
        f.write_str(msg)
    }
}
