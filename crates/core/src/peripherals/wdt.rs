// C3Shim - Bare-metal ESP32-C3 support layer
// Copyright (C) 2026 The C3Shim Authors
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

//! Watchdog peripherals: the timer-group MWDT and the RTC_CNTL block, which
//! holds both the RWDT and the super watchdog.
//!
//! Timeouts are counted in CPU cycles. Only stage 0 is modelled and it always
//! resets the whole system.

use crate::{Peripheral, ResetCause, ResetKind, SimResult, WatchdogUnit};
use c3shim_rt::esp32c3::{rtc_cntl, timg0, MwdtConfig0, RwdtConfig0, WDT_WKEY};
use c3shim_rt::hal::WatchdogState;
use serde_json::json;
use std::any::Any;

/// Countdown shared by all watchdog flavours.
#[derive(Debug, Clone)]
struct Countdown {
    unit: WatchdogUnit,
    counter: u64,
    timeout: u64,
    power_on_timeout: u64,
}

impl Countdown {
    fn new(unit: WatchdogUnit, timeout: u64) -> Self {
        Self {
            unit,
            counter: 0,
            timeout,
            power_on_timeout: timeout,
        }
    }

    fn tick(&mut self, cycles: u64) -> Option<ResetCause> {
        self.counter += cycles;
        if self.counter >= self.timeout {
            tracing::info!(
                "{:?} watchdog expired after {} cycles",
                self.unit,
                self.counter
            );
            self.counter = 0;
            return Some(ResetCause::WatchdogTimeout(self.unit));
        }
        None
    }

    fn restart(&mut self) {
        self.counter = 0;
    }

    fn power_on(&mut self) {
        self.counter = 0;
        self.timeout = self.power_on_timeout;
    }
}

fn snapshot(state: WatchdogState, countdown: &Countdown) -> serde_json::Value {
    json!({
        "write_protect_locked": state.write_protect_locked,
        "enabled": state.enabled,
        "persist_across_flashboot": state.persist_across_flashboot,
        "counter": countdown.counter,
        "timeout": countdown.timeout,
    })
}

/// Main watchdog of timer group 0.
///
/// Config writes land in a shadow register and only take effect once written
/// with `CONF_UPDATE_EN`.
#[derive(Debug)]
pub struct TimerGroupWdt {
    config0: u32,
    active: MwdtConfig0,
    wprotect: u32,
    countdown: Countdown,
}

impl TimerGroupWdt {
    const POWER_ON: MwdtConfig0 = MwdtConfig0::EN.union(MwdtConfig0::FLASHBOOT_MOD_EN);

    pub fn new(timeout: u64) -> Self {
        Self {
            config0: Self::POWER_ON.bits(),
            active: Self::POWER_ON,
            wprotect: 0,
            countdown: Countdown::new(WatchdogUnit::TimerGroup0, timeout),
        }
    }

    pub fn state(&self) -> WatchdogState {
        WatchdogState {
            write_protect_locked: self.wprotect != WDT_WKEY,
            enabled: self.active.contains(MwdtConfig0::EN),
            persist_across_flashboot: self.active.contains(MwdtConfig0::FLASHBOOT_MOD_EN),
        }
    }
}

impl Peripheral for TimerGroupWdt {
    fn read(&self, offset: u64) -> SimResult<u32> {
        Ok(match offset as u32 {
            timg0::WDTCONFIG0 => self.config0,
            timg0::WDTCONFIG2 => self.countdown.timeout.min(u32::MAX as u64) as u32,
            timg0::WDTWPROTECT => self.wprotect,
            _ => 0,
        })
    }

    fn write(&mut self, offset: u64, value: u32) -> SimResult<()> {
        let offset = offset as u32;
        if offset == timg0::WDTWPROTECT {
            self.wprotect = value;
            return Ok(());
        }
        if self.wprotect != WDT_WKEY {
            tracing::warn!("MWDT0: write to {:#x} dropped, write protection enabled", offset);
            return Ok(());
        }

        match offset {
            timg0::WDTCONFIG0 => {
                let update = value & MwdtConfig0::CONF_UPDATE_EN.bits() != 0;
                self.config0 = value & !MwdtConfig0::CONF_UPDATE_EN.bits();
                if update {
                    self.active = MwdtConfig0::from_bits_retain(self.config0);
                    tracing::debug!("MWDT0: config latched {:?}", self.active);
                }
            }
            timg0::WDTCONFIG2 => self.countdown.timeout = value as u64,
            _ => {}
        }
        Ok(())
    }

    fn tick(&mut self, cycles: u64) -> Option<ResetCause> {
        if !self.active.contains(MwdtConfig0::EN) {
            return None;
        }
        self.countdown.tick(cycles)
    }

    fn reset(&mut self, kind: ResetKind) {
        self.wprotect = 0;
        match kind {
            ResetKind::System => {
                self.config0 = Self::POWER_ON.bits();
                self.active = Self::POWER_ON;
                self.countdown.power_on();
            }
            ResetKind::Soft => {
                if self.active.contains(MwdtConfig0::FLASHBOOT_MOD_EN) {
                    self.active.insert(MwdtConfig0::EN);
                    self.config0 |= MwdtConfig0::EN.bits();
                }
                self.countdown.restart();
            }
        }
    }

    fn snapshot(&self) -> serde_json::Value {
        snapshot(self.state(), &self.countdown)
    }

    fn as_any(&self) -> Option<&dyn Any> {
        Some(self)
    }
}

/// RTC_CNTL: the RWDT plus, optionally, the super watchdog.
///
/// The super watchdog has no registers here. It cannot be fed or disabled and
/// resets the chip every time its timeout elapses.
#[derive(Debug)]
pub struct RtcCntl {
    config0: RwdtConfig0,
    wprotect: u32,
    rwdt: Countdown,
    swd: Option<Countdown>,
}

impl RtcCntl {
    const POWER_ON: RwdtConfig0 = RwdtConfig0::EN.union(RwdtConfig0::FLASHBOOT_MOD_EN);

    pub fn new(rwdt_timeout: u64, swd_timeout: Option<u64>) -> Self {
        Self {
            config0: Self::POWER_ON,
            wprotect: 0,
            rwdt: Countdown::new(WatchdogUnit::Rtc, rwdt_timeout),
            swd: swd_timeout.map(|t| Countdown::new(WatchdogUnit::Super, t)),
        }
    }

    pub fn state(&self) -> WatchdogState {
        WatchdogState {
            write_protect_locked: self.wprotect != WDT_WKEY,
            enabled: self.config0.contains(RwdtConfig0::EN),
            persist_across_flashboot: self.config0.contains(RwdtConfig0::FLASHBOOT_MOD_EN),
        }
    }
}

impl Peripheral for RtcCntl {
    fn read(&self, offset: u64) -> SimResult<u32> {
        Ok(match offset as u32 {
            rtc_cntl::WDTCONFIG0 => self.config0.bits(),
            rtc_cntl::WDTCONFIG1 => self.rwdt.timeout.min(u32::MAX as u64) as u32,
            rtc_cntl::WDTWPROTECT => self.wprotect,
            _ => 0,
        })
    }

    fn write(&mut self, offset: u64, value: u32) -> SimResult<()> {
        let offset = offset as u32;
        match offset {
            rtc_cntl::WDTWPROTECT => self.wprotect = value,
            rtc_cntl::WDTCONFIG0 | rtc_cntl::WDTCONFIG1 if self.wprotect != WDT_WKEY => {
                tracing::warn!("RWDT: write to {:#x} dropped, write protection enabled", offset);
            }
            rtc_cntl::WDTCONFIG0 => self.config0 = RwdtConfig0::from_bits_retain(value),
            rtc_cntl::WDTCONFIG1 => self.rwdt.timeout = value as u64,
            _ => {}
        }
        Ok(())
    }

    fn tick(&mut self, cycles: u64) -> Option<ResetCause> {
        let rwdt = if self.config0.contains(RwdtConfig0::EN) {
            self.rwdt.tick(cycles)
        } else {
            None
        };
        let swd = self.swd.as_mut().and_then(|swd| swd.tick(cycles));
        rwdt.or(swd)
    }

    fn reset(&mut self, kind: ResetKind) {
        self.wprotect = 0;
        match kind {
            ResetKind::System => {
                self.config0 = Self::POWER_ON;
                self.rwdt.power_on();
            }
            ResetKind::Soft => {
                if self.config0.contains(RwdtConfig0::FLASHBOOT_MOD_EN) {
                    self.config0.insert(RwdtConfig0::EN);
                }
                self.rwdt.restart();
            }
        }
        if let Some(swd) = self.swd.as_mut() {
            swd.power_on();
        }
    }

    fn snapshot(&self) -> serde_json::Value {
        let mut value = snapshot(self.state(), &self.rwdt);
        value["super_wdt"] = match &self.swd {
            Some(swd) => json!({ "counter": swd.counter, "timeout": swd.timeout }),
            None => serde_json::Value::Null,
        };
        value
    }

    fn as_any(&self) -> Option<&dyn Any> {
        Some(self)
    }
}
