// C3Shim - Bare-metal ESP32-C3 support layer
// Copyright (C) 2026 The C3Shim Authors
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

use crate::hal::Idle;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProcessState {
    #[default]
    Running,
    /// Terminal. Nothing observable happens after this, the core just idles.
    Halted,
}

/// Program termination for a target with nothing to return to.
#[derive(Debug)]
pub struct ProcessExit<I> {
    idle: I,
    state: ProcessState,
}

impl<I: Idle> ProcessExit<I> {
    pub fn new(idle: I) -> Self {
        Self {
            idle,
            state: ProcessState::Running,
        }
    }

    pub fn state(&self) -> ProcessState {
        self.state
    }

    /// Transition to [`ProcessState::Halted`]. The exit code has no effect.
    pub fn halt(&mut self, _code: i32) {
        self.state = ProcessState::Halted;
    }

    pub fn terminate(&mut self, code: i32) -> ! {
        self.halt(code);
        loop {
            self.idle.idle();
        }
    }
}
