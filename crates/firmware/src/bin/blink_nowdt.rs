// C3Shim - Bare-metal ESP32-C3 support layer
// Copyright (C) 2026 The C3Shim Authors
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

//! Same as `blink`, but disables the MWDT and RWDT first so it keeps going.

#![no_std]
#![no_main]

use c3shim_rt::blink::BlinkLoop;
use c3shim_rt::hal::Pin;
use c3shim_rt::watchdog;
use panic_halt as _;
use riscv_rt::entry;

const LED: Pin = Pin(2);

#[entry]
fn main() -> ! {
    let mut chip = c3shim_firmware::chip();
    watchdog::disable_all(&mut chip);

    let blink = BlinkLoop::new(&mut chip, LED, c3shim_firmware::delay());
    blink.run(&mut chip)
}
