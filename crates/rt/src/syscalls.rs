// C3Shim - Bare-metal ESP32-C3 support layer
// Copyright (C) 2026 The C3Shim Authors
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

//! Hooks the language runtime calls into: `write` and `exit`.

use crate::exit::{ProcessExit, ProcessState};
use crate::hal::{CharOut, Idle};
use crate::sink::OutputSink;

pub struct Syscalls<O, I> {
    sink: OutputSink<O>,
    exit: ProcessExit<I>,
}

impl<O: CharOut, I: Idle> Syscalls<O, I> {
    pub fn new(out: O, idle: I) -> Self {
        Self {
            sink: OutputSink::new(out),
            exit: ProcessExit::new(idle),
        }
    }

    /// There is a single sink, so `stream_id` is ignored.
    pub fn write(&mut self, _stream_id: i32, buf: &[u8]) -> usize {
        self.sink.transmit(buf)
    }

    pub fn exit(&mut self, code: i32) -> ! {
        self.exit.terminate(code)
    }

    pub fn state(&self) -> ProcessState {
        self.exit.state()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake::FakeHal;
    use std::panic::{self, AssertUnwindSafe};

    struct Stuck(u32);

    impl Idle for Stuck {
        fn idle(&mut self) {
            self.0 += 1;
            if self.0 > 100 {
                panic!("idle");
            }
        }
    }

    #[test]
    fn test_write_ignores_stream_id() {
        let mut hal = FakeHal::default();
        let mut sys = Syscalls::new(&mut hal, Stuck(0));

        assert_eq!(sys.write(1, b"out"), 3);
        assert_eq!(sys.write(2, b"err"), 3);
        assert_eq!(sys.write(-7, b""), 0);
        drop(sys);

        assert_eq!(hal.transmitted(), b"outerr");
    }

    #[test]
    fn test_exit_halts() {
        let mut hal = FakeHal::default();
        let mut sys = Syscalls::new(&mut hal, Stuck(0));
        assert_eq!(sys.state(), ProcessState::Running);

        let result = panic::catch_unwind(AssertUnwindSafe(|| sys.exit(-1)));
        assert!(result.is_err());
        assert_eq!(sys.state(), ProcessState::Halted);
    }
}
