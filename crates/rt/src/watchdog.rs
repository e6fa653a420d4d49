// C3Shim - Bare-metal ESP32-C3 support layer
// Copyright (C) 2026 The C3Shim Authors
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

//! Watchdog neutralization.
//!
//! Both the MWDT and the RWDT come out of reset armed. Their control registers
//! sit behind a write-protect key, so every change has to be bracketed by an
//! unlock: a disable written while locked is silently dropped and the device
//! resets once the countdown expires.
//!
//! The super watchdog (SWD) is not covered. There is no control path for it in
//! the HAL, so a program that runs long enough without feeding it will still
//! reset.

use crate::hal::{Watchdog, WatchdogHal, WatchdogState};

/// Handle to one physical watchdog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WatchdogController {
    id: Watchdog,
}

impl WatchdogController {
    pub const fn new(id: Watchdog) -> Self {
        Self { id }
    }

    pub fn state<H: WatchdogHal + ?Sized>(&self, hal: &mut H) -> WatchdogState {
        hal.state(self.id)
    }

    /// Unlock, disable, clear flashboot persistence, then lock again.
    pub fn disable<H: WatchdogHal + ?Sized>(&self, hal: &mut H) {
        hal.set_write_protect(self.id, false);
        hal.set_enabled(self.id, false);
        // Otherwise the next bootloader-driven soft reset re-arms it.
        hal.set_persist_across_flashboot(self.id, false);
        hal.set_write_protect(self.id, true);
    }
}

/// Runs the disable sequence on each of `watchdogs`, in order.
pub fn disable_watchdogs<H: WatchdogHal + ?Sized>(hal: &mut H, watchdogs: &[Watchdog]) {
    for &id in watchdogs {
        WatchdogController::new(id).disable(hal);
    }
}

/// Runs the disable sequence on every controllable watchdog.
pub fn disable_all<H: WatchdogHal + ?Sized>(hal: &mut H) {
    disable_watchdogs(hal, &Watchdog::CONTROLLABLE);
}
