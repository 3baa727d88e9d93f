// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Compile-time configuration of the driver.
//!
//! Options live in a `const` rather than behind `#[cfg]` so every code path is
//! type-checked whatever the selection, and disabled branches fold away.

/// Compile-time configuration options.
pub(crate) struct Config {
    /// Trace every accepted pin configuration to the log.
    pub(crate) trace_config: bool,

    /// Trace each dispatcher run: the pin a line maps to and which pending
    /// register was acknowledged.
    pub(crate) trace_interrupts: bool,
}

/// The only place in the crate where cargo features are read.
pub(crate) const CONFIG: Config = Config {
    trace_config: cfg!(feature = "trace_config"),
    trace_interrupts: cfg!(feature = "trace_interrupts"),
};
