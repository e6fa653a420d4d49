// C3Shim - Bare-metal ESP32-C3 support layer
// Copyright (C) 2026 The C3Shim Authors
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

use crate::delay::BusyWait;
use crate::hal::{Direction, GpioHal, Level, Pin, PinFunction, Spin};

/// Toggles one output pin forever.
///
/// Does not touch the watchdogs. Run without
/// [`disable_all`](crate::watchdog::disable_all) first, the blinking stops when
/// a watchdog fires and starts over after the reset.
#[derive(Debug)]
pub struct BlinkLoop {
    pin: Pin,
    delay: BusyWait,
    next: Level,
}

impl BlinkLoop {
    /// Routes `pin` to the GPIO matrix and enables its output driver.
    pub fn new<H: GpioHal + ?Sized>(hal: &mut H, pin: Pin, delay: BusyWait) -> Self {
        hal.select_function(pin, PinFunction::Gpio);
        hal.set_direction(pin, Direction::Output);
        Self {
            pin,
            delay,
            next: Level::Low,
        }
    }

    /// Level the next [`step`](Self::step) will drive.
    pub fn next_level(&self) -> Level {
        self.next
    }

    /// Drives the opposite of the previous level, then waits. Returns the level
    /// written.
    pub fn step<H: GpioHal + Spin + ?Sized>(&mut self, hal: &mut H) -> Level {
        let level = self.next;
        hal.set_level(self.pin, level);
        self.next = !level;
        self.delay.wait(hal);
        level
    }

    pub fn run<H: GpioHal + Spin + ?Sized>(mut self, hal: &mut H) -> ! {
        loop {
            self.step(hal);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake::{Call, FakeHal};

    #[test]
    fn test_new_configures_pin_first() {
        let mut hal = FakeHal::default();
        let _blink = BlinkLoop::new(&mut hal, Pin(2), BusyWait::new(0));

        assert_eq!(
            hal.calls,
            vec![
                Call::Function(Pin(2), PinFunction::Gpio),
                Call::Direction(Pin(2), Direction::Output),
            ]
        );
    }

    #[test]
    fn test_levels_alternate() {
        let mut hal = FakeHal::default();
        let mut blink = BlinkLoop::new(&mut hal, Pin(5), BusyWait::new(3));

        for _ in 0..9 {
            blink.step(&mut hal);
        }

        let levels = hal.levels(Pin(5));
        assert_eq!(levels.len(), 9);
        assert_eq!(levels[0], Level::Low);
        for pair in levels.windows(2) {
            assert_ne!(pair[0], pair[1]);
        }
        assert_eq!(hal.spins, 27);
    }

    #[test]
    fn test_delay_follows_each_edge() {
        let mut hal = FakeHal::default();
        let mut blink = BlinkLoop::new(&mut hal, Pin(2), BusyWait::new(4));

        assert_eq!(blink.step(&mut hal), Level::Low);
        assert_eq!(hal.spins, 4);
        assert_eq!(blink.next_level(), Level::High);
    }
}
