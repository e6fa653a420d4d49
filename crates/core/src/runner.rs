// C3Shim - Bare-metal ESP32-C3 support layer
// Copyright (C) 2026 The C3Shim Authors
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

//! Runs the demo programs on the simulated SoC.
//!
//! A real device re-executes the program from the top after every reset. The
//! runner does the same: when a watchdog fires mid-iteration it records a
//! [`ResetEvent`], resets the SoC and boots the program again.

use crate::peripherals::{gpio::GpioMatrix, uart::Uart};
use crate::sim::{self, SimChip};
use crate::{ResetCause, SimulationObserver, Soc};
use c3shim_config::{Demo, StopReason, SystemConfig};
use c3shim_rt::blink::BlinkLoop;
use c3shim_rt::delay::{BusyWait, DelayCalibration};
use c3shim_rt::hal::Pin;
use c3shim_rt::hello::HelloLoop;
use c3shim_rt::watchdog;
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Serialize)]
pub struct ResetEvent {
    pub cycle: u64,
    pub cause: ResetCause,
    /// Loop iterations completed since the previous boot.
    pub iterations: u64,
}

#[derive(Debug, Clone, Copy)]
pub struct RunLimits {
    pub max_cycles: u64,
    pub wall_time: Option<Duration>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub demo: Demo,
    pub stop_reason: StopReason,
    pub cycles: u64,
    pub iterations: u64,
    pub boots: u64,
    pub resets: Vec<ResetEvent>,
    #[serde(skip)]
    pub uart: Vec<u8>,
    #[serde(skip)]
    pub pin_levels: Vec<bool>,
}

impl RunReport {
    pub fn uart_text(&self) -> String {
        String::from_utf8_lossy(&self.uart).into_owned()
    }
}

enum Program<'m> {
    Blink(BlinkLoop),
    Hello(HelloLoop<'m>),
}

impl Program<'_> {
    fn step(&mut self, chip: &mut SimChip) {
        match self {
            Program::Blink(blink) => {
                blink.step(chip);
            }
            Program::Hello(hello) => {
                hello.step(chip);
            }
        }
    }
}

/// What the firmware's `main` does before entering its loop.
fn boot<'m>(demo: Demo, chip: &mut SimChip, config: &'m SystemConfig, delay: BusyWait) -> Program<'m> {
    let pin = Pin(config.blink_pin);
    match demo {
        Demo::Blink => Program::Blink(BlinkLoop::new(chip, pin, delay)),
        Demo::BlinkNoWdt => {
            watchdog::disable_all(chip);
            Program::Blink(BlinkLoop::new(chip, pin, delay))
        }
        Demo::Hello => Program::Hello(HelloLoop::start(chip, &config.message, delay)),
    }
}

pub struct Runner {
    config: SystemConfig,
    chip: SimChip,
    delay: BusyWait,
    pub observers: Vec<Arc<dyn SimulationObserver>>,
}

impl Runner {
    pub fn new(config: SystemConfig) -> Self {
        let soc = Soc::new(&config);
        let chip = sim::chip(soc, config.cycles_per_iteration);
        let delay = BusyWait::for_period(
            config.delay(),
            DelayCalibration {
                cpu_hz: config.cpu_hz,
                cycles_per_iteration: config.cycles_per_iteration,
            },
        );
        Self {
            config,
            chip,
            delay,
            observers: Vec::new(),
        }
    }

    pub fn delay(&self) -> BusyWait {
        self.delay
    }

    pub fn soc(&self) -> &Soc {
        self.chip.mmio().soc()
    }

    pub fn run(&mut self, demo: Demo, limits: RunLimits) -> RunReport {
        let start = Instant::now();
        for observer in &self.observers {
            observer.on_simulation_start();
        }

        let chip = &mut self.chip;
        let mut program = boot(demo, chip, &self.config, self.delay);
        let mut boots = 1;
        let mut iterations = 0;
        let mut boot_iterations = 0;
        let mut resets = Vec::new();

        let stop_reason = loop {
            if let Some(limit) = limits.wall_time {
                if start.elapsed() >= limit {
                    break StopReason::WallTime;
                }
            }
            if chip.mmio().soc().cycles() >= limits.max_cycles {
                break StopReason::MaxCycles;
            }

            program.step(chip);

            let soc = chip.mmio_mut().soc_mut();
            if soc.pending_reset().is_none() {
                boot_iterations += 1;
                iterations += 1;
                for observer in &self.observers {
                    observer.on_iteration(soc.cycles());
                }
                continue;
            }

            let cycle = soc.cycles();
            if let Some(cause) = soc.reset() {
                let event = ResetEvent {
                    cycle,
                    cause,
                    iterations: boot_iterations,
                };
                tracing::info!(
                    "Reset at cycle {} ({:?}) after {} iterations, rebooting",
                    cycle,
                    cause,
                    boot_iterations
                );
                for observer in &self.observers {
                    observer.on_reset(&event);
                }
                resets.push(event);
            }
            program = boot(demo, chip, &self.config, self.delay);
            boots += 1;
            boot_iterations = 0;
        };

        for observer in &self.observers {
            observer.on_simulation_stop();
        }

        let bus = &chip.mmio().soc().bus;
        let uart = bus
            .peripheral::<Uart>("uart0")
            .map(|u| u.output().to_vec())
            .unwrap_or_default();
        let pin_levels = bus
            .peripheral::<GpioMatrix>("gpio")
            .map(|g| g.levels(self.config.blink_pin))
            .unwrap_or_default();

        RunReport {
            demo,
            stop_reason,
            cycles: chip.mmio().soc().cycles(),
            iterations,
            boots,
            resets,
            uart,
            pin_levels,
        }
    }
}
