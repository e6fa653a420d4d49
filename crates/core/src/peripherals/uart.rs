// C3Shim - Bare-metal ESP32-C3 support layer
// Copyright (C) 2026 The C3Shim Authors
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

use crate::{Peripheral, SimResult};
use c3shim_rt::esp32c3::uart0;
use serde_json::json;
use std::any::Any;
use std::io::{self, Write};

/// UART0 TX path. The FIFO drains instantly. Transmitted bytes are captured
/// (across resets, like a terminal on the other end of the wire) and
/// optionally echoed to stdout.
#[derive(Debug, Default)]
pub struct Uart {
    echo: bool,
    tx: Vec<u8>,
}

impl Uart {
    pub fn new(echo: bool) -> Self {
        Self {
            echo,
            tx: Vec::new(),
        }
    }

    pub fn output(&self) -> &[u8] {
        &self.tx
    }
}

impl Peripheral for Uart {
    fn read(&self, _offset: u64) -> SimResult<u32> {
        // STATUS: TXFIFO_CNT is always 0
        Ok(0)
    }

    fn write(&mut self, offset: u64, value: u32) -> SimResult<()> {
        if offset as u32 == uart0::FIFO {
            let byte = (value & 0xFF) as u8;
            self.tx.push(byte);
            if self.echo {
                let mut stdout = io::stdout();
                // Console output is best effort.
                let _ = stdout.write_all(&[byte]);
                let _ = stdout.flush();
            }
        }
        Ok(())
    }

    fn snapshot(&self) -> serde_json::Value {
        json!({ "tx_bytes": self.tx.len() })
    }

    fn as_any(&self) -> Option<&dyn Any> {
        Some(self)
    }
}
