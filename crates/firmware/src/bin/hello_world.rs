// C3Shim - Bare-metal ESP32-C3 support layer
// Copyright (C) 2026 The C3Shim Authors
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

//! Prints "Hello, world!" on UART0 forever, after disabling the MWDT and
//! RWDT. The super watchdog stays armed.

#![no_std]
#![no_main]

use c3shim_rt::hello::{HelloLoop, HELLO_MESSAGE};
use panic_halt as _;
use riscv_rt::entry;

#[entry]
fn main() -> ! {
    let mut chip = c3shim_firmware::chip();
    let hello = HelloLoop::start(&mut chip, HELLO_MESSAGE, c3shim_firmware::delay());
    hello.run(&mut chip)
}
