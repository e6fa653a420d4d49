// C3Shim - Bare-metal ESP32-C3 support layer
// Copyright (C) 2026 The C3Shim Authors
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

//! ESP32-C3 register layout and a register-level HAL on top of it.
//!
//! [`Esp32c3`] only needs word-sized register access ([`Mmio`]). On the chip
//! that is a volatile pointer access, on the host it is the simulated bus.

use crate::hal::*;
use bitflags::bitflags;

/// Word-sized access to memory-mapped registers.
pub trait Mmio {
    fn read32(&mut self, addr: u32) -> u32;
    fn write32(&mut self, addr: u32, value: u32);

    fn modify32<F: FnOnce(u32) -> u32>(&mut self, addr: u32, f: F) {
        let value = self.read32(addr);
        self.write32(addr, f(value));
    }
}

/// Unlock key shared by the MWDT and RWDT write-protect registers.
pub const WDT_WKEY: u32 = 0x50D8_3AA1;

pub mod timg0 {
    pub const BASE: u32 = 0x6001_F000;
    pub const WDTCONFIG0: u32 = 0x48;
    /// Stage 0 timeout.
    pub const WDTCONFIG2: u32 = 0x50;
    pub const WDTWPROTECT: u32 = 0x64;
}

pub mod rtc_cntl {
    pub const BASE: u32 = 0x6000_8000;
    pub const WDTCONFIG0: u32 = 0x90;
    /// Stage 0 timeout.
    pub const WDTCONFIG1: u32 = 0x94;
    pub const WDTWPROTECT: u32 = 0xA8;
}

pub mod gpio {
    pub const BASE: u32 = 0x6000_4000;
    pub const OUT: u32 = 0x04;
    pub const OUT_W1TS: u32 = 0x08;
    pub const OUT_W1TC: u32 = 0x0C;
    pub const ENABLE: u32 = 0x20;
    pub const ENABLE_W1TS: u32 = 0x24;
    pub const ENABLE_W1TC: u32 = 0x28;
    pub const FUNC0_OUT_SEL_CFG: u32 = 0x554;
    /// Output signal index that hands the pad to `OUT`/`ENABLE`.
    pub const SIG_GPIO_OUT: u32 = 0x80;
    pub const PIN_COUNT: u8 = 22;
}

pub mod io_mux {
    pub const BASE: u32 = 0x6000_9000;
    pub const GPIO0: u32 = 0x04;
    pub const MCU_SEL_SHIFT: u32 = 12;
    pub const MCU_SEL_MASK: u32 = 0x7 << MCU_SEL_SHIFT;
    pub const FUNC_GPIO: u32 = 1;
}

pub mod uart0 {
    pub const BASE: u32 = 0x6000_0000;
    pub const FIFO: u32 = 0x00;
    pub const STATUS: u32 = 0x1C;
    pub const TXFIFO_CNT_SHIFT: u32 = 16;
    pub const TXFIFO_CNT_MASK: u32 = 0x3FF << TXFIFO_CNT_SHIFT;
    pub const FIFO_LEN: u32 = 128;
}

bitflags! {
    /// `TIMG_WDTCONFIG0_REG` bits the runtime cares about.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct MwdtConfig0: u32 {
        const EN = 1 << 31;
        /// Latches the rest of the register into the watchdog clock domain.
        const CONF_UPDATE_EN = 1 << 22;
        const FLASHBOOT_MOD_EN = 1 << 14;
    }
}

bitflags! {
    /// `RTC_CNTL_WDTCONFIG0_REG` bits the runtime cares about.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct RwdtConfig0: u32 {
        const EN = 1 << 31;
        const FLASHBOOT_MOD_EN = 1 << 12;
    }
}

struct WdtRegs {
    config0: u32,
    wprotect: u32,
    en: u32,
    flashboot: u32,
    update: u32,
}

fn wdt_regs(wdt: Watchdog) -> WdtRegs {
    match wdt {
        Watchdog::TimerGroup0 => WdtRegs {
            config0: timg0::BASE + timg0::WDTCONFIG0,
            wprotect: timg0::BASE + timg0::WDTWPROTECT,
            en: MwdtConfig0::EN.bits(),
            flashboot: MwdtConfig0::FLASHBOOT_MOD_EN.bits(),
            update: MwdtConfig0::CONF_UPDATE_EN.bits(),
        },
        Watchdog::Rtc => WdtRegs {
            config0: rtc_cntl::BASE + rtc_cntl::WDTCONFIG0,
            wprotect: rtc_cntl::BASE + rtc_cntl::WDTWPROTECT,
            en: RwdtConfig0::EN.bits(),
            flashboot: RwdtConfig0::FLASHBOOT_MOD_EN.bits(),
            // RWDT config takes effect immediately
            update: 0,
        },
    }
}

fn pin_mask(pin: Pin) -> u32 {
    debug_assert!(pin.0 < gpio::PIN_COUNT, "GPIO{} does not exist", pin.0);
    1 << pin.0
}

/// Register-level HAL for the ESP32-C3.
#[derive(Debug, Default)]
pub struct Esp32c3<M> {
    mmio: M,
}

impl<M: Mmio> Esp32c3<M> {
    pub fn new(mmio: M) -> Self {
        Self { mmio }
    }

    pub fn mmio(&self) -> &M {
        &self.mmio
    }

    pub fn mmio_mut(&mut self) -> &mut M {
        &mut self.mmio
    }

    fn update_wdt_config(&mut self, wdt: Watchdog, bit: u32, set: bool) {
        let regs = wdt_regs(wdt);
        let update = regs.update;
        self.mmio.modify32(regs.config0, |v| {
            let v = if set { v | bit } else { v & !bit };
            v | update
        });
    }
}

impl<M: Mmio> GpioHal for Esp32c3<M> {
    fn select_function(&mut self, pin: Pin, function: PinFunction) {
        debug_assert!(pin.0 < gpio::PIN_COUNT, "GPIO{} does not exist", pin.0);
        let func = match function {
            PinFunction::Gpio => io_mux::FUNC_GPIO,
            PinFunction::Alternate(f) => f as u32,
        };
        let addr = io_mux::BASE + io_mux::GPIO0 + 4 * pin.0 as u32;
        self.mmio.modify32(addr, |v| {
            (v & !io_mux::MCU_SEL_MASK) | ((func << io_mux::MCU_SEL_SHIFT) & io_mux::MCU_SEL_MASK)
        });
    }

    fn set_direction(&mut self, pin: Pin, direction: Direction) {
        let mask = pin_mask(pin);
        match direction {
            Direction::Output => {
                let sel = gpio::BASE + gpio::FUNC0_OUT_SEL_CFG + 4 * pin.0 as u32;
                self.mmio.write32(sel, gpio::SIG_GPIO_OUT);
                self.mmio.write32(gpio::BASE + gpio::ENABLE_W1TS, mask);
            }
            Direction::Input => self.mmio.write32(gpio::BASE + gpio::ENABLE_W1TC, mask),
        }
    }

    fn set_level(&mut self, pin: Pin, level: Level) {
        let reg = match level {
            Level::High => gpio::OUT_W1TS,
            Level::Low => gpio::OUT_W1TC,
        };
        self.mmio.write32(gpio::BASE + reg, pin_mask(pin));
    }
}

impl<M: Mmio> WatchdogHal for Esp32c3<M> {
    fn set_write_protect(&mut self, wdt: Watchdog, locked: bool) {
        let key = if locked { 0 } else { WDT_WKEY };
        self.mmio.write32(wdt_regs(wdt).wprotect, key);
    }

    fn set_enabled(&mut self, wdt: Watchdog, enabled: bool) {
        let en = wdt_regs(wdt).en;
        self.update_wdt_config(wdt, en, enabled);
    }

    fn set_persist_across_flashboot(&mut self, wdt: Watchdog, persist: bool) {
        let flashboot = wdt_regs(wdt).flashboot;
        self.update_wdt_config(wdt, flashboot, persist);
    }

    fn state(&mut self, wdt: Watchdog) -> WatchdogState {
        let regs = wdt_regs(wdt);
        let config = self.mmio.read32(regs.config0);
        WatchdogState {
            write_protect_locked: self.mmio.read32(regs.wprotect) != WDT_WKEY,
            enabled: config & regs.en != 0,
            persist_across_flashboot: config & regs.flashboot != 0,
        }
    }
}

impl<M: Mmio> CharOut for Esp32c3<M> {
    fn transmit_one_byte(&mut self, byte: u8) {
        let status = uart0::BASE + uart0::STATUS;
        while (self.mmio.read32(status) & uart0::TXFIFO_CNT_MASK) >> uart0::TXFIFO_CNT_SHIFT
            >= uart0::FIFO_LEN
        {}
        self.mmio.write32(uart0::BASE + uart0::FIFO, byte as u32);
    }
}

impl<M: Mmio + Spin> Spin for Esp32c3<M> {
    fn nop(&mut self) {
        self.mmio.nop();
    }
}

impl<M: Mmio + Idle> Idle for Esp32c3<M> {
    fn idle(&mut self) {
        self.mmio.idle();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    /// Flat register file that applies the write-protect and W1TS/W1TC rules
    /// the HAL depends on.
    #[derive(Default)]
    struct Regs {
        mem: HashMap<u32, u32>,
        writes: Vec<(u32, u32)>,
        tx_busy_polls: u32,
    }

    impl Mmio for Regs {
        fn read32(&mut self, addr: u32) -> u32 {
            if addr == uart0::BASE + uart0::STATUS && self.tx_busy_polls > 0 {
                self.tx_busy_polls -= 1;
                return uart0::FIFO_LEN << uart0::TXFIFO_CNT_SHIFT;
            }
            self.mem.get(&addr).copied().unwrap_or(0)
        }

        fn write32(&mut self, addr: u32, value: u32) {
            self.writes.push((addr, value));
            match addr {
                a if a == gpio::BASE + gpio::OUT_W1TS => {
                    *self.mem.entry(gpio::BASE + gpio::OUT).or_default() |= value
                }
                a if a == gpio::BASE + gpio::OUT_W1TC => {
                    *self.mem.entry(gpio::BASE + gpio::OUT).or_default() &= !value
                }
                a if a == gpio::BASE + gpio::ENABLE_W1TS => {
                    *self.mem.entry(gpio::BASE + gpio::ENABLE).or_default() |= value
                }
                _ => {
                    self.mem.insert(addr, value);
                }
            }
        }
    }

    #[test]
    fn test_wdt_disable_sequence_registers() {
        let mut hal = Esp32c3::new(Regs::default());
        let config0 = timg0::BASE + timg0::WDTCONFIG0;
        let power_on = (MwdtConfig0::EN | MwdtConfig0::FLASHBOOT_MOD_EN).bits();
        hal.mmio_mut().mem.insert(config0, power_on);

        crate::watchdog::WatchdogController::new(Watchdog::TimerGroup0).disable(&mut hal);

        let writes = &hal.mmio().writes;
        assert_eq!(writes[0], (timg0::BASE + timg0::WDTWPROTECT, WDT_WKEY));
        let disabled = MwdtConfig0::FLASHBOOT_MOD_EN | MwdtConfig0::CONF_UPDATE_EN;
        assert_eq!(writes[1], (config0, disabled.bits()));
        assert_eq!(writes[3], (timg0::BASE + timg0::WDTWPROTECT, 0));

        let state = hal.state(Watchdog::TimerGroup0);
        assert!(!state.enabled);
        assert!(!state.persist_across_flashboot);
        assert!(state.write_protect_locked);
    }

    #[test]
    fn test_rwdt_has_no_update_bit() {
        let mut hal = Esp32c3::new(Regs::default());
        let config0 = rtc_cntl::BASE + rtc_cntl::WDTCONFIG0;
        hal.mmio_mut().mem.insert(config0, RwdtConfig0::all().bits());

        hal.set_enabled(Watchdog::Rtc, false);

        assert_eq!(hal.mmio().mem[&config0], RwdtConfig0::FLASHBOOT_MOD_EN.bits());
    }

    #[test]
    fn test_gpio_output_setup() {
        let mut hal = Esp32c3::new(Regs::default());
        hal.select_function(Pin(2), PinFunction::Gpio);
        hal.set_direction(Pin(2), Direction::Output);
        hal.set_level(Pin(2), Level::High);

        let mux = hal.mmio().mem[&(io_mux::BASE + io_mux::GPIO0 + 8)];
        assert_eq!((mux & io_mux::MCU_SEL_MASK) >> io_mux::MCU_SEL_SHIFT, 1);
        assert_eq!(hal.mmio().mem[&(gpio::BASE + gpio::ENABLE)], 1 << 2);
        assert_eq!(hal.mmio().mem[&(gpio::BASE + gpio::OUT)], 1 << 2);

        hal.set_level(Pin(2), Level::Low);
        assert_eq!(hal.mmio().mem[&(gpio::BASE + gpio::OUT)], 0);
    }

    #[test]
    fn test_highest_pin() {
        let mut hal = Esp32c3::new(Regs::default());
        hal.set_direction(Pin(21), Direction::Output);
        hal.set_level(Pin(21), Level::High);

        assert_eq!(hal.mmio().mem[&(gpio::BASE + gpio::OUT)], 1 << 21);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "GPIO40 does not exist")]
    fn test_level_on_missing_pin() {
        let mut hal = Esp32c3::new(Regs::default());
        hal.set_level(Pin(40), Level::High);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "GPIO22 does not exist")]
    fn test_direction_on_missing_pin() {
        let mut hal = Esp32c3::new(Regs::default());
        hal.set_direction(Pin(22), Direction::Output);
    }

    #[test]
    fn test_transmit_waits_for_fifo_space() {
        let mut hal = Esp32c3::new(Regs {
            tx_busy_polls: 3,
            ..Default::default()
        });
        hal.transmit_one_byte(b'H');

        assert_eq!(hal.mmio().tx_busy_polls, 0);
        assert_eq!(hal.mmio().writes, vec![(uart0::BASE + uart0::FIFO, b'H' as u32)]);
    }
}
