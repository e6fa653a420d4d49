// C3Shim - Bare-metal ESP32-C3 support layer
// Copyright (C) 2026 The C3Shim Authors
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

use crate::hal::Spin;
use core::time::Duration;

/// Pause between blink edges and between hello messages (~3 Hz blink).
pub const DEFAULT_PERIOD: Duration = Duration::from_millis(160);

/// Platform tuning for busy-wait loops. Both values depend on the clock the
/// bootloader leaves the core at and on how the spin loop compiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelayCalibration {
    pub cpu_hz: u32,
    pub cycles_per_iteration: u32,
}

impl Default for DelayCalibration {
    fn default() -> Self {
        Self {
            cpu_hz: 20_000_000,
            cycles_per_iteration: 10,
        }
    }
}

/// Timer-free delay: a fixed number of [`Spin::nop`] iterations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusyWait {
    iterations: u32,
}

impl BusyWait {
    pub const fn new(iterations: u32) -> Self {
        Self { iterations }
    }

    /// Approximates `period` under `calibration`. Saturates at `u32::MAX`.
    pub fn for_period(period: Duration, calibration: DelayCalibration) -> Self {
        let cycles = period.as_micros() * calibration.cpu_hz as u128 / 1_000_000;
        let per_iteration = calibration.cycles_per_iteration.max(1) as u128;
        let iterations = (cycles / per_iteration).min(u32::MAX as u128) as u32;
        Self { iterations }
    }

    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    pub fn wait<S: Spin + ?Sized>(&self, cpu: &mut S) {
        for _ in 0..self.iterations {
            cpu.nop();
        }
    }
}

impl Default for BusyWait {
    fn default() -> Self {
        Self::for_period(DEFAULT_PERIOD, DelayCalibration::default())
    }
}
