// C3Shim - Bare-metal ESP32-C3 support layer
// Copyright (C) 2026 The C3Shim Authors
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

//! Hardware interfaces consumed by the runtime layer.
//!
//! Every operation here is infallible by contract. Implementations that can
//! block (a full TX FIFO) simply block.

use core::ops::Not;

/// A software-controllable watchdog instance.
///
/// The super watchdog is deliberately absent: the chip exposes no documented
/// control path for it, so it stays armed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Watchdog {
    /// Main watchdog of timer group 0 (MWDT0).
    TimerGroup0,
    /// RTC watchdog (RWDT).
    Rtc,
}

impl Watchdog {
    /// Every instance the disable sequence has to visit.
    pub const CONTROLLABLE: [Watchdog; 2] = [Watchdog::TimerGroup0, Watchdog::Rtc];
}

/// Observable state of a watchdog controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WatchdogState {
    pub write_protect_locked: bool,
    pub enabled: bool,
    pub persist_across_flashboot: bool,
}

impl WatchdogState {
    /// What the hardware comes up with after a power-on or system reset.
    pub const POWER_ON: WatchdogState = WatchdogState {
        write_protect_locked: true,
        enabled: true,
        persist_across_flashboot: true,
    };
}

/// GPIO pad number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pin(pub u8);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinFunction {
    Gpio,
    /// Raw IO_MUX function number for a dedicated peripheral signal.
    Alternate(u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Input,
    Output,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Level {
    #[default]
    Low,
    High,
}

impl Not for Level {
    type Output = Level;

    fn not(self) -> Level {
        match self {
            Level::Low => Level::High,
            Level::High => Level::Low,
        }
    }
}

impl From<bool> for Level {
    fn from(high: bool) -> Self {
        if high {
            Level::High
        } else {
            Level::Low
        }
    }
}

impl From<Level> for bool {
    fn from(level: Level) -> bool {
        level == Level::High
    }
}

pub trait GpioHal {
    fn select_function(&mut self, pin: Pin, function: PinFunction);
    fn set_direction(&mut self, pin: Pin, direction: Direction);
    fn set_level(&mut self, pin: Pin, level: Level);
}

pub trait WatchdogHal {
    fn set_write_protect(&mut self, wdt: Watchdog, locked: bool);
    fn set_enabled(&mut self, wdt: Watchdog, enabled: bool);
    fn set_persist_across_flashboot(&mut self, wdt: Watchdog, persist: bool);
    fn state(&mut self, wdt: Watchdog) -> WatchdogState;
}

/// Blocking single-character output primitive.
pub trait CharOut {
    fn transmit_one_byte(&mut self, byte: u8);
}

/// One calibrated unit of busy-waiting.
pub trait Spin {
    fn nop(&mut self);
}

/// What a halted program does forever.
pub trait Idle {
    fn idle(&mut self);
}

impl<T: GpioHal + ?Sized> GpioHal for &mut T {
    fn select_function(&mut self, pin: Pin, function: PinFunction) {
        (**self).select_function(pin, function)
    }

    fn set_direction(&mut self, pin: Pin, direction: Direction) {
        (**self).set_direction(pin, direction)
    }

    fn set_level(&mut self, pin: Pin, level: Level) {
        (**self).set_level(pin, level)
    }
}

impl<T: CharOut + ?Sized> CharOut for &mut T {
    fn transmit_one_byte(&mut self, byte: u8) {
        (**self).transmit_one_byte(byte)
    }
}

impl<T: Spin + ?Sized> Spin for &mut T {
    fn nop(&mut self) {
        (**self).nop()
    }
}

impl<T: Idle + ?Sized> Idle for &mut T {
    fn idle(&mut self) {
        (**self).idle()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_negation() {
        assert_eq!(!Level::Low, Level::High);
        assert_eq!(!!Level::High, Level::High);
        assert!(bool::from(Level::from(true)));
        assert_eq!(Level::default(), Level::Low);
    }

    #[test]
    fn test_super_watchdog_not_controllable() {
        assert_eq!(Watchdog::CONTROLLABLE.len(), 2);
    }
}
