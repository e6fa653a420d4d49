// C3Shim - Bare-metal ESP32-C3 support layer
// Copyright (C) 2026 The C3Shim Authors
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

use crate::hal::CharOut;
use core::fmt;

/// Unbuffered byte sink over a blocking character-output primitive.
#[derive(Debug)]
pub struct OutputSink<O> {
    out: O,
}

impl<O: CharOut> OutputSink<O> {
    pub fn new(out: O) -> Self {
        Self { out }
    }

    /// Hands every byte to the hardware in order, blocking on each one.
    /// Always returns `bytes.len()`.
    pub fn transmit(&mut self, bytes: &[u8]) -> usize {
        for &byte in bytes {
            self.out.transmit_one_byte(byte);
        }
        bytes.len()
    }
}

impl<O: CharOut> fmt::Write for OutputSink<O> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.transmit(s.as_bytes());
        Ok(())
    }
}
