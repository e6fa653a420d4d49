// C3Shim - Bare-metal ESP32-C3 support layer
// Copyright (C) 2026 The C3Shim Authors
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

//! Target glue: volatile register access, the spin/idle primitives and the
//! `_write`/`_exit` symbols the C runtime links against.

#![no_std]

use c3shim_rt::delay::BusyWait;
use c3shim_rt::esp32c3::{Esp32c3, Mmio};
use c3shim_rt::hal::{Idle, Spin};
use c3shim_rt::syscalls::Syscalls;

/// Register access through volatile pointers into the peripheral space.
#[derive(Debug, Default)]
pub struct Volatile;

impl Mmio for Volatile {
    fn read32(&mut self, addr: u32) -> u32 {
        // SAFETY: only called by the HAL with ESP32-C3 register addresses.
        unsafe { core::ptr::read_volatile(addr as *const u32) }
    }

    fn write32(&mut self, addr: u32, value: u32) {
        // SAFETY: see read32.
        unsafe { core::ptr::write_volatile(addr as *mut u32, value) }
    }
}

impl Spin for Volatile {
    fn nop(&mut self) {
        unsafe { riscv::asm::nop() }
    }
}

impl Idle for Volatile {
    fn idle(&mut self) {
        unsafe { riscv::asm::nop() }
    }
}

pub type Chip = Esp32c3<Volatile>;

/// HAL over the real chip. The demos are single threaded with no interrupts,
/// so handing out a handle per caller is fine.
pub fn chip() -> Chip {
    Esp32c3::new(Volatile)
}

/// Delay between blink edges and between hello messages.
pub fn delay() -> BusyWait {
    BusyWait::default()
}

/// # Safety
///
/// `buf` must point to `len` readable bytes (or `len` must be 0).
#[no_mangle]
pub unsafe extern "C" fn _write(fd: i32, buf: *const u8, len: usize) -> isize {
    if len == 0 {
        return 0;
    }
    let bytes = core::slice::from_raw_parts(buf, len);
    Syscalls::new(chip(), Volatile).write(fd, bytes) as isize
}

#[no_mangle]
pub extern "C" fn _exit(code: i32) -> ! {
    Syscalls::new(chip(), Volatile).exit(code)
}
