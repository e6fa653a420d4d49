// C3Shim - Bare-metal ESP32-C3 support layer
// Copyright (C) 2026 The C3Shim Authors
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

use crate::peripherals::{gpio::GpioMatrix, io_mux::IoMux, uart::Uart, wdt};
use crate::{Peripheral, ResetCause, ResetKind, SimResult, SimulationError};
use c3shim_config::SystemConfig;
use c3shim_rt::esp32c3::{gpio, io_mux, rtc_cntl, timg0, uart0};

#[derive(Debug)]
pub struct PeripheralEntry {
    pub name: String,
    pub base: u64,
    pub size: u64,
    pub dev: Box<dyn Peripheral>,
}

#[derive(Debug, Default)]
pub struct SystemBus {
    pub peripherals: Vec<PeripheralEntry>,
}

impl SystemBus {
    /// ESP32-C3 peripheral map with watchdog timeouts taken from `config`.
    pub fn from_config(config: &SystemConfig) -> Self {
        let wdts = &config.watchdogs;
        let mwdt_timeout = config.ms_to_cycles(wdts.timer_group0_ms);
        let rwdt_timeout = config.ms_to_cycles(wdts.rtc_ms);
        let swd_timeout = wdts.super_ms.map(|ms| config.ms_to_cycles(ms));

        let mut bus = Self::default();
        bus.attach(
            "uart0",
            uart0::BASE as u64,
            0x100,
            Box::new(Uart::new(config.uart_echo)),
        );
        bus.attach("gpio", gpio::BASE as u64, 0x1000, Box::new(GpioMatrix::new()));
        bus.attach("io_mux", io_mux::BASE as u64, 0x100, Box::new(IoMux::new()));
        bus.attach(
            "rtc_cntl",
            rtc_cntl::BASE as u64,
            0x1000,
            Box::new(wdt::RtcCntl::new(rwdt_timeout, swd_timeout)),
        );
        bus.attach(
            "timg0",
            timg0::BASE as u64,
            0x1000,
            Box::new(wdt::TimerGroupWdt::new(mwdt_timeout)),
        );
        bus
    }

    pub fn attach(&mut self, name: &str, base: u64, size: u64, dev: Box<dyn Peripheral>) {
        tracing::debug!("Attaching {} at {:#x} (+{:#x})", name, base, size);
        self.peripherals.push(PeripheralEntry {
            name: name.to_string(),
            base,
            size,
            dev,
        });
    }

    fn find(&self, addr: u64) -> SimResult<(&PeripheralEntry, u64)> {
        self.peripherals
            .iter()
            .find(|p| addr >= p.base && addr < p.base + p.size)
            .map(|p| (p, addr - p.base))
            .ok_or(SimulationError::MemoryViolation(addr))
    }

    fn find_mut(&mut self, addr: u64) -> SimResult<(&mut PeripheralEntry, u64)> {
        self.peripherals
            .iter_mut()
            .find(|p| addr >= p.base && addr < p.base + p.size)
            .map(|p| {
                let offset = addr - p.base;
                (p, offset)
            })
            .ok_or(SimulationError::MemoryViolation(addr))
    }

    /// Downcast the peripheral registered under `name`.
    pub fn peripheral<T: 'static>(&self, name: &str) -> Option<&T> {
        self.peripherals
            .iter()
            .find(|p| p.name == name)
            .and_then(|p| p.dev.as_any())
            .and_then(|any| any.downcast_ref::<T>())
    }

    pub fn reset_peripherals(&mut self, kind: ResetKind) {
        for p in &mut self.peripherals {
            p.dev.reset(kind);
        }
    }

    /// Level currently driven on pad `pin`, or `None` when the pad is not
    /// routed to the GPIO output path.
    pub fn pad_level(&self, pin: u8) -> Option<bool> {
        let mux = self.peripheral::<IoMux>("io_mux")?;
        let gpio = self.peripheral::<GpioMatrix>("gpio")?;
        if mux.function(pin) != io_mux::FUNC_GPIO {
            return None;
        }
        gpio.driven_level(pin)
    }
}

impl crate::Bus for SystemBus {
    fn read_u32(&self, addr: u64) -> SimResult<u32> {
        if addr % 4 != 0 {
            return Err(SimulationError::MisalignedAccess(addr));
        }
        let (p, offset) = self.find(addr)?;
        p.dev.read(offset)
    }

    fn write_u32(&mut self, addr: u64, value: u32) -> SimResult<()> {
        if addr % 4 != 0 {
            return Err(SimulationError::MisalignedAccess(addr));
        }
        let (p, offset) = self.find_mut(addr)?;
        tracing::debug!("{}: [{:#x}] <- {:#010x}", p.name, offset, value);
        p.dev.write(offset, value)
    }

    fn tick_peripherals(&mut self, cycles: u64) -> Vec<ResetCause> {
        self.peripherals
            .iter_mut()
            .filter_map(|p| p.dev.tick(cycles))
            .collect()
    }
}
