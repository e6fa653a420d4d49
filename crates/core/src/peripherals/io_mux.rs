// C3Shim - Bare-metal ESP32-C3 support layer
// Copyright (C) 2026 The C3Shim Authors
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

use crate::{Peripheral, ResetKind, SimResult};
use c3shim_rt::esp32c3::{gpio, io_mux};
use serde_json::json;
use std::any::Any;

/// IO_MUX pad configuration. Only the function select field is interpreted.
#[derive(Debug)]
pub struct IoMux {
    pads: [u32; gpio::PIN_COUNT as usize],
}

impl Default for IoMux {
    fn default() -> Self {
        Self::new()
    }
}

impl IoMux {
    pub fn new() -> Self {
        // Reset value: function 0, pad not handed to the GPIO matrix
        Self {
            pads: [0; gpio::PIN_COUNT as usize],
        }
    }

    fn pad_index(offset: u64) -> Option<usize> {
        let offset = offset as u32;
        if offset < io_mux::GPIO0 {
            return None;
        }
        let index = ((offset - io_mux::GPIO0) / 4) as usize;
        (index < gpio::PIN_COUNT as usize).then_some(index)
    }

    pub fn function(&self, pin: u8) -> u32 {
        self.pads
            .get(pin as usize)
            .map_or(0, |pad| (pad & io_mux::MCU_SEL_MASK) >> io_mux::MCU_SEL_SHIFT)
    }
}

impl Peripheral for IoMux {
    fn read(&self, offset: u64) -> SimResult<u32> {
        Ok(Self::pad_index(offset).map_or(0, |i| self.pads[i]))
    }

    fn write(&mut self, offset: u64, value: u32) -> SimResult<()> {
        if let Some(i) = Self::pad_index(offset) {
            self.pads[i] = value;
        }
        Ok(())
    }

    fn reset(&mut self, _kind: ResetKind) {
        *self = Self::new();
    }

    fn snapshot(&self) -> serde_json::Value {
        let functions: Vec<u32> = (0..gpio::PIN_COUNT).map(|p| self.function(p)).collect();
        json!({ "functions": functions })
    }

    fn as_any(&self) -> Option<&dyn Any> {
        Some(self)
    }
}
