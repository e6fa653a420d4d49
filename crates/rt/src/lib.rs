// C3Shim - Bare-metal ESP32-C3 support layer
// Copyright (C) 2026 The C3Shim Authors
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

//! Runtime support for the ESP32-C3 demo programs.
//!
//! Everything in here runs unhosted: a byte sink and an exit hook for the
//! runtime, the watchdog-disable sequence, and the two demo loops. Hardware is
//! only reached through the traits in [`hal`], so the same code drives the real
//! chip and the host-side simulator.

#![cfg_attr(not(test), no_std)]

pub mod blink;
pub mod delay;
pub mod esp32c3;
pub mod exit;
pub mod hal;
pub mod hello;
pub mod sink;
pub mod syscalls;
pub mod watchdog;

#[cfg(test)]
mod fake;
