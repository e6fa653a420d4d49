// C3Shim - Bare-metal ESP32-C3 support layer
// Copyright (C) 2026 The C3Shim Authors
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

//! Glue that lets the target-side HAL run against the simulated SoC.

use crate::Soc;
use c3shim_rt::esp32c3::{Esp32c3, Mmio};
use c3shim_rt::hal::{Idle, Spin};

/// The register-level ESP32-C3 HAL, backed by the simulator.
pub type SimChip = Esp32c3<SimHal>;

/// Register access and CPU time for code running on the simulated SoC.
///
/// Each register write costs one cycle, each spin iteration costs
/// `cycles_per_iteration`. Bus faults are logged and otherwise ignored, the
/// HAL contract has no error path.
#[derive(Debug)]
pub struct SimHal {
    soc: Soc,
    cycles_per_iteration: u64,
}

impl SimHal {
    pub fn new(soc: Soc, cycles_per_iteration: u32) -> Self {
        Self {
            soc,
            cycles_per_iteration: cycles_per_iteration.max(1) as u64,
        }
    }

    pub fn soc(&self) -> &Soc {
        &self.soc
    }

    pub fn soc_mut(&mut self) -> &mut Soc {
        &mut self.soc
    }
}

impl Mmio for SimHal {
    fn read32(&mut self, addr: u32) -> u32 {
        self.soc.read_u32(addr as u64).unwrap_or_else(|e| {
            tracing::warn!("Register read failed: {}", e);
            0
        })
    }

    fn write32(&mut self, addr: u32, value: u32) {
        if let Err(e) = self.soc.write_u32(addr as u64, value) {
            tracing::warn!("Register write failed: {}", e);
        }
        self.soc.advance(1);
    }
}

impl Spin for SimHal {
    fn nop(&mut self) {
        self.soc.advance(self.cycles_per_iteration);
    }
}

impl Idle for SimHal {
    fn idle(&mut self) {
        self.soc.advance(1);
    }
}

pub fn chip(soc: Soc, cycles_per_iteration: u32) -> SimChip {
    Esp32c3::new(SimHal::new(soc, cycles_per_iteration))
}
