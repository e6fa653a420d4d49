// C3Shim - Bare-metal ESP32-C3 support layer
// Copyright (C) 2026 The C3Shim Authors
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

pub mod bus;
pub mod metrics;
pub mod peripherals;
pub mod runner;
pub mod sim;
pub mod snapshot;

use serde::{Deserialize, Serialize};
use std::any::Any;


#[derive(Debug, thiserror::Error)]
pub enum SimulationError {
    #[error("Memory access violation at {0:#x}")]
    MemoryViolation(u64),
    #[error("Misaligned register access at {0:#x}")]
    MisalignedAccess(u64),
}

pub type SimResult<T> = Result<T, SimulationError>;

/// Watchdog instances present on the simulated chip, including the super
/// watchdog which software cannot reach.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WatchdogUnit {
    TimerGroup0,
    Rtc,
    Super,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResetCause {
    WatchdogTimeout(WatchdogUnit),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetKind {
    /// Power-on and watchdog system resets: registers return to their
    /// power-on values.
    System,
    /// Bootloader-driven soft reset: watchdogs with flashboot persistence set
    /// are armed again, others keep their state.
    Soft,
}

/// Trait for observing simulation events in a modular way.
pub trait SimulationObserver: std::fmt::Debug + Send + Sync {
    fn on_simulation_start(&self) {}
    fn on_simulation_stop(&self) {}
    fn on_iteration(&self, _cycles: u64) {}
    fn on_reset(&self, _event: &runner::ResetEvent) {}
}

/// Trait representing a memory-mapped peripheral.
///
/// Registers are accessed as whole 32-bit words; `offset` is relative to the
/// peripheral base and always word-aligned.
pub trait Peripheral: std::fmt::Debug + Send {
    fn read(&self, offset: u64) -> SimResult<u32>;
    fn write(&mut self, offset: u64, value: u32) -> SimResult<()>;
    /// Advance by `cycles` CPU cycles. Returns a reset request if the
    /// peripheral wants to reset the chip.
    fn tick(&mut self, _cycles: u64) -> Option<ResetCause> {
        None
    }
    fn reset(&mut self, _kind: ResetKind) {}
    fn snapshot(&self) -> serde_json::Value {
        serde_json::Value::Null
    }
    fn as_any(&self) -> Option<&dyn Any> {
        None
    }
}

/// Trait representing the system bus
pub trait Bus {
    fn read_u32(&self, addr: u64) -> SimResult<u32>;
    fn write_u32(&mut self, addr: u64, value: u32) -> SimResult<()>;
    fn tick_peripherals(&mut self, cycles: u64) -> Vec<ResetCause>;
}

/// The simulated SoC: a bus full of peripherals and a cycle counter.
///
/// Once a peripheral requests a reset the core is held in reset: register
/// writes and cycles are dropped until [`Soc::reset`] is called.
#[derive(Debug)]
pub struct Soc {
    pub bus: bus::SystemBus,
    cycles: u64,
    pending_reset: Option<ResetCause>,
}

impl Soc {
    pub fn new(config: &c3shim_config::SystemConfig) -> Self {
        Self::with_bus(bus::SystemBus::from_config(config))
    }

    pub fn with_bus(bus: bus::SystemBus) -> Self {
        Self {
            bus,
            cycles: 0,
            pending_reset: None,
        }
    }

    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    pub fn pending_reset(&self) -> Option<ResetCause> {
        self.pending_reset
    }

    pub fn advance(&mut self, cycles: u64) {
        if self.pending_reset.is_some() {
            return;
        }
        self.cycles += cycles;

        if let Some(cause) = self.bus.tick_peripherals(cycles).into_iter().next() {
            tracing::info!("Reset requested at cycle {}: {:?}", self.cycles, cause);
            self.pending_reset = Some(cause);
        }
    }

    pub fn read_u32(&self, addr: u64) -> SimResult<u32> {
        self.bus.read_u32(addr)
    }

    pub fn write_u32(&mut self, addr: u64, value: u32) -> SimResult<()> {
        if self.pending_reset.is_some() {
            tracing::debug!("Write to {:#x} dropped, core held in reset", addr);
            return Ok(());
        }
        self.bus.write_u32(addr, value)
    }

    /// System reset. Peripherals go back to power-on values; the cycle counter
    /// keeps running so reset events stay ordered in time.
    pub fn reset(&mut self) -> Option<ResetCause> {
        self.bus.reset_peripherals(ResetKind::System);
        self.pending_reset.take()
    }

    pub fn soft_reset(&mut self) {
        self.bus.reset_peripherals(ResetKind::Soft);
        self.pending_reset = None;
    }
}
