// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Pin configuration flags.
//!
//! Callers describe a pin with a [`Flags`] bitmask. The configurator decodes
//! it once into a [`PinMode`], and only a mode that decoded cleanly is ever
//! written to the hardware.
//!
//! Absent bits carry meaning: no `OUTPUT` is an input, no `ACTIVE_HIGH` is
//! active low, no `EDGE` is level triggered.

use bitflags::bitflags;

use crate::errorcode::GpioError;

bitflags! {
    /// Requested direction, polarity, pull and interrupt trigger of a pin.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct Flags: u32 {
        /// Drive the pin. Without it the pin is an input.
        const OUTPUT = 1 << 0;
        /// Program an interrupt trigger. Inputs only.
        const INTERRUPT = 1 << 1;
        /// Trigger on the high level or the rising edge.
        const ACTIVE_HIGH = 1 << 2;
        /// Edge triggered. Without it the trigger is a level.
        const EDGE = 1 << 5;
        /// Trigger on both edges. Only meaningful with `EDGE`.
        const DOUBLE_EDGE = 1 << 6;
        /// Invert the output value. Outputs only.
        const INVERT = 1 << 7;
        /// Enable the internal pull-up. Inputs only.
        const PULL_UP = 1 << 8;
        /// Request a pull-down. The block has none, so this is always refused
        /// for an input.
        const PULL_DOWN = 1 << 9;
    }
}

impl Flags {
    /// Plain input: no pull, no interrupt.
    pub const INPUT: Flags = Flags::empty();
}

/// Interrupt trigger class armed for an input pin.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Trigger {
    RisingEdge,
    FallingEdge,
    BothEdges,
    HighLevel,
    LowLevel,
}

impl Trigger {
    fn from_flags(flags: Flags) -> Trigger {
        if flags.contains(Flags::EDGE) {
            if flags.contains(Flags::DOUBLE_EDGE) {
                Trigger::BothEdges
            } else if flags.contains(Flags::ACTIVE_HIGH) {
                Trigger::RisingEdge
            } else {
                Trigger::FallingEdge
            }
        } else if flags.contains(Flags::ACTIVE_HIGH) {
            Trigger::HighLevel
        } else {
            Trigger::LowLevel
        }
    }

    pub fn is_edge(self) -> bool {
        matches!(
            self,
            Trigger::RisingEdge | Trigger::FallingEdge | Trigger::BothEdges
        )
    }

    pub fn on_rise(self) -> bool {
        matches!(self, Trigger::RisingEdge | Trigger::BothEdges)
    }

    pub fn on_fall(self) -> bool {
        matches!(self, Trigger::FallingEdge | Trigger::BothEdges)
    }
}

/// A decoded, hardware-realisable pin configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PinMode {
    Output {
        invert: bool,
    },
    Input {
        pull_up: bool,
        trigger: Option<Trigger>,
    },
}

impl TryFrom<Flags> for PinMode {
    type Error = GpioError;

    fn try_from(flags: Flags) -> Result<PinMode, GpioError> {
        if flags.contains(Flags::OUTPUT) {
            // Trigger logic only samples inputs. Pull flags mean nothing here.
            if flags.contains(Flags::INTERRUPT) {
                return Err(GpioError::InvalidCombination);
            }
            return Ok(PinMode::Output {
                invert: flags.contains(Flags::INVERT),
            });
        }

        // out_xor only sits on the output path, and there is no pull-down.
        if flags.intersects(Flags::INVERT | Flags::PULL_DOWN) {
            return Err(GpioError::InvalidCombination);
        }

        let trigger = if flags.contains(Flags::INTERRUPT) {
            Some(Trigger::from_flags(flags))
        } else {
            None
        };

        Ok(PinMode::Input {
            pull_up: flags.contains(Flags::PULL_UP),
            trigger,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{Flags, PinMode, Trigger};
    use crate::errorcode::GpioError;

    fn trigger_of(flags: Flags) -> Option<Trigger> {
        match PinMode::try_from(flags | Flags::INTERRUPT) {
            Ok(PinMode::Input { trigger, .. }) => trigger,
            other => panic!("expected an input, got {:?}", other),
        }
    }

    #[test]
    fn plain_input() {
        assert_eq!(
            PinMode::try_from(Flags::INPUT),
            Ok(PinMode::Input {
                pull_up: false,
                trigger: None
            })
        );
        assert_eq!(
            PinMode::try_from(Flags::PULL_UP),
            Ok(PinMode::Input {
                pull_up: true,
                trigger: None
            })
        );
    }

    #[test]
    fn output_polarity() {
        assert_eq!(
            PinMode::try_from(Flags::OUTPUT),
            Ok(PinMode::Output { invert: false })
        );
        assert_eq!(
            PinMode::try_from(Flags::OUTPUT | Flags::INVERT),
            Ok(PinMode::Output { invert: true })
        );
    }

    #[test]
    fn output_ignores_pull() {
        assert_eq!(
            PinMode::try_from(Flags::OUTPUT | Flags::PULL_DOWN),
            Ok(PinMode::Output { invert: false })
        );
    }

    #[test]
    fn rejected_combinations() {
        for flags in [
            Flags::INVERT,
            Flags::PULL_DOWN,
            Flags::PULL_UP | Flags::PULL_DOWN,
            Flags::OUTPUT | Flags::INTERRUPT,
            Flags::OUTPUT | Flags::INTERRUPT | Flags::EDGE,
        ] {
            assert_eq!(
                PinMode::try_from(flags),
                Err(GpioError::InvalidCombination),
                "{:?}",
                flags
            );
        }
    }

    #[test]
    fn trigger_decoding() {
        assert_eq!(
            trigger_of(Flags::EDGE | Flags::DOUBLE_EDGE),
            Some(Trigger::BothEdges)
        );
        assert_eq!(
            trigger_of(Flags::EDGE | Flags::DOUBLE_EDGE | Flags::ACTIVE_HIGH),
            Some(Trigger::BothEdges)
        );
        assert_eq!(
            trigger_of(Flags::EDGE | Flags::ACTIVE_HIGH),
            Some(Trigger::RisingEdge)
        );
        assert_eq!(trigger_of(Flags::EDGE), Some(Trigger::FallingEdge));
        assert_eq!(trigger_of(Flags::ACTIVE_HIGH), Some(Trigger::HighLevel));
        assert_eq!(trigger_of(Flags::empty()), Some(Trigger::LowLevel));
        // Double edge without EDGE is still a level trigger.
        assert_eq!(trigger_of(Flags::DOUBLE_EDGE), Some(Trigger::LowLevel));
    }

    #[test]
    fn trigger_flags_without_interrupt_are_ignored() {
        assert_eq!(
            PinMode::try_from(Flags::EDGE | Flags::ACTIVE_HIGH),
            Ok(PinMode::Input {
                pull_up: false,
                trigger: None
            })
        );
    }

    #[test]
    fn trigger_classes() {
        assert!(Trigger::BothEdges.on_rise() && Trigger::BothEdges.on_fall());
        assert!(Trigger::RisingEdge.on_rise());
        assert!(!Trigger::RisingEdge.on_fall());
        assert!(!Trigger::FallingEdge.on_rise());
        assert!(Trigger::FallingEdge.on_fall());
        assert!(!Trigger::HighLevel.is_edge());
        assert!(!Trigger::LowLevel.is_edge());
    }
}
