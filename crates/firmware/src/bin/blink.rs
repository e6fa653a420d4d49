// C3Shim - Bare-metal ESP32-C3 support layer
// Copyright (C) 2026 The C3Shim Authors
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

//! Blinks an LED on GPIO2 with the watchdogs left running.
//!
//! Connect an LED between 3V3 and GPIO2 (the on-board LED of the
//! ESP32-C3-DevKitM-1 is addressable and won't work). The watchdogs are not
//! disabled here, so the blinking stops after a while, the chip resets and the
//! program starts over.

#![no_std]
#![no_main]

use c3shim_rt::blink::BlinkLoop;
use c3shim_rt::hal::Pin;
use panic_halt as _;
use riscv_rt::entry;

const LED: Pin = Pin(2);

#[entry]
fn main() -> ! {
    let mut chip = c3shim_firmware::chip();
    let blink = BlinkLoop::new(&mut chip, LED, c3shim_firmware::delay());
    blink.run(&mut chip)
}
