// C3Shim - Bare-metal ESP32-C3 support layer
// Copyright (C) 2026 The C3Shim Authors
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

//! Recording HAL used by the unit tests.

use crate::hal::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Call {
    Function(Pin, PinFunction),
    Direction(Pin, Direction),
    Level(Pin, Level),
    WriteProtect(Watchdog, bool),
    Enable(Watchdog, bool),
    Persist(Watchdog, bool),
    Tx(u8),
}

#[derive(Debug)]
pub struct FakeHal {
    pub calls: Vec<Call>,
    pub spins: u64,
    pub watchdogs: [WatchdogState; 2],
}

impl Default for FakeHal {
    fn default() -> Self {
        Self {
            calls: Vec::new(),
            spins: 0,
            watchdogs: [WatchdogState::POWER_ON; 2],
        }
    }
}

impl FakeHal {
    fn slot(&mut self, wdt: Watchdog) -> &mut WatchdogState {
        match wdt {
            Watchdog::TimerGroup0 => &mut self.watchdogs[0],
            Watchdog::Rtc => &mut self.watchdogs[1],
        }
    }

    pub fn transmitted(&self) -> Vec<u8> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::Tx(b) => Some(*b),
                _ => None,
            })
            .collect()
    }

    pub fn levels(&self, pin: Pin) -> Vec<Level> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::Level(p, l) if *p == pin => Some(*l),
                _ => None,
            })
            .collect()
    }
}

impl GpioHal for FakeHal {
    fn select_function(&mut self, pin: Pin, function: PinFunction) {
        self.calls.push(Call::Function(pin, function));
    }

    fn set_direction(&mut self, pin: Pin, direction: Direction) {
        self.calls.push(Call::Direction(pin, direction));
    }

    fn set_level(&mut self, pin: Pin, level: Level) {
        self.calls.push(Call::Level(pin, level));
    }
}

impl WatchdogHal for FakeHal {
    fn set_write_protect(&mut self, wdt: Watchdog, locked: bool) {
        self.calls.push(Call::WriteProtect(wdt, locked));
        self.slot(wdt).write_protect_locked = locked;
    }

    fn set_enabled(&mut self, wdt: Watchdog, enabled: bool) {
        self.calls.push(Call::Enable(wdt, enabled));
        let slot = self.slot(wdt);
        if !slot.write_protect_locked {
            slot.enabled = enabled;
        }
    }

    fn set_persist_across_flashboot(&mut self, wdt: Watchdog, persist: bool) {
        self.calls.push(Call::Persist(wdt, persist));
        let slot = self.slot(wdt);
        if !slot.write_protect_locked {
            slot.persist_across_flashboot = persist;
        }
    }

    fn state(&mut self, wdt: Watchdog) -> WatchdogState {
        *self.slot(wdt)
    }
}

impl CharOut for FakeHal {
    fn transmit_one_byte(&mut self, byte: u8) {
        self.calls.push(Call::Tx(byte));
    }
}

impl Spin for FakeHal {
    fn nop(&mut self) {
        self.spins += 1;
    }
}
