// C3Shim - Bare-metal ESP32-C3 support layer
// Copyright (C) 2026 The C3Shim Authors
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

use crate::delay::BusyWait;
use crate::hal::{CharOut, Spin, WatchdogHal};
use crate::sink::OutputSink;
use crate::watchdog;

pub const HELLO_MESSAGE: &str = "Hello, world!\n";

/// Prints a fixed message forever.
#[derive(Debug)]
pub struct HelloLoop<'m> {
    message: &'m [u8],
    delay: BusyWait,
}

impl<'m> HelloLoop<'m> {
    /// Disables every controllable watchdog, then returns the loop.
    pub fn start<H: WatchdogHal + ?Sized>(hal: &mut H, message: &'m str, delay: BusyWait) -> Self {
        watchdog::disable_all(hal);
        Self {
            message: message.as_bytes(),
            delay,
        }
    }

    /// One message plus one delay. Returns the number of bytes sent.
    pub fn step<H: CharOut + Spin + ?Sized>(&self, hal: &mut H) -> usize {
        let sent = OutputSink::new(&mut *hal).transmit(self.message);
        self.delay.wait(hal);
        sent
    }

    pub fn run<H: CharOut + Spin + ?Sized>(self, hal: &mut H) -> ! {
        loop {
            self.step(hal);
        }
    }
}
