// C3Shim - Bare-metal ESP32-C3 support layer
// Copyright (C) 2026 The C3Shim Authors
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

use crate::{Peripheral, ResetKind, SimResult};
use c3shim_rt::esp32c3::gpio;
use serde_json::json;
use std::any::Any;

/// ESP32-C3 GPIO matrix, output side only.
#[derive(Debug)]
pub struct GpioMatrix {
    out: u32,
    enable: u32,
    out_sel: [u32; gpio::PIN_COUNT as usize],
    /// Every level written per pin through `OUT`, `OUT_W1TS` or `OUT_W1TC`.
    history: Vec<(u8, bool)>,
}

impl Default for GpioMatrix {
    fn default() -> Self {
        Self::new()
    }
}

impl GpioMatrix {
    pub fn new() -> Self {
        Self {
            out: 0,
            enable: 0,
            // Reset value: no output signal routed
            out_sel: [0; gpio::PIN_COUNT as usize],
            history: Vec::new(),
        }
    }

    fn out_sel_index(offset: u32) -> Option<usize> {
        let first = gpio::FUNC0_OUT_SEL_CFG;
        let last = first + 4 * (gpio::PIN_COUNT as u32 - 1);
        if (first..=last).contains(&offset) {
            Some(((offset - first) / 4) as usize)
        } else {
            None
        }
    }

    fn record(&mut self, mask: u32, high: bool) {
        for pin in 0..gpio::PIN_COUNT {
            if mask & (1 << pin) != 0 {
                self.history.push((pin, high));
            }
        }
    }

    /// Output level if `pin` is enabled as a plain GPIO output.
    pub fn driven_level(&self, pin: u8) -> Option<bool> {
        let routed = self.out_sel.get(pin as usize) == Some(&gpio::SIG_GPIO_OUT);
        if routed && self.enable & (1 << pin) != 0 {
            Some(self.out & (1 << pin) != 0)
        } else {
            None
        }
    }

    pub fn levels(&self, pin: u8) -> Vec<bool> {
        self.history
            .iter()
            .filter(|(p, _)| *p == pin)
            .map(|(_, high)| *high)
            .collect()
    }
}

impl Peripheral for GpioMatrix {
    fn read(&self, offset: u64) -> SimResult<u32> {
        let offset = offset as u32;
        Ok(match offset {
            gpio::OUT => self.out,
            gpio::ENABLE => self.enable,
            _ => Self::out_sel_index(offset).map_or(0, |i| self.out_sel[i]),
        })
    }

    fn write(&mut self, offset: u64, value: u32) -> SimResult<()> {
        let offset = offset as u32;
        let pins = (1u32 << gpio::PIN_COUNT) - 1;
        let value = value & pins;
        match offset {
            gpio::OUT => {
                let changed = self.out ^ value;
                self.record(changed & value, true);
                self.record(changed & !value, false);
                self.out = value;
            }
            gpio::OUT_W1TS => {
                self.out |= value;
                self.record(value, true);
            }
            gpio::OUT_W1TC => {
                self.out &= !value;
                self.record(value, false);
            }
            gpio::ENABLE => self.enable = value,
            gpio::ENABLE_W1TS => self.enable |= value,
            gpio::ENABLE_W1TC => self.enable &= !value,
            _ => {
                if let Some(i) = Self::out_sel_index(offset) {
                    self.out_sel[i] = value & 0xFF;
                }
            }
        }
        Ok(())
    }

    fn reset(&mut self, _kind: ResetKind) {
        // Level history spans resets so callers can see the restarts.
        let history = std::mem::take(&mut self.history);
        *self = Self::new();
        self.history = history;
    }

    fn snapshot(&self) -> serde_json::Value {
        json!({
            "out": self.out,
            "enable": self.enable,
            "writes": self.history.len(),
        })
    }

    fn as_any(&self) -> Option<&dyn Any> {
        Some(self)
    }
}
