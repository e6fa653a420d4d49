// C3Shim - Bare-metal ESP32-C3 support layer
// Copyright (C) 2026 The C3Shim Authors
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

use crate::runner::ResetEvent;
use crate::SimulationObserver;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Instant;

#[derive(Debug)]
pub struct PerformanceMetrics {
    iteration_count: AtomicU64,
    cycle_count: AtomicU64,
    reset_count: AtomicU64,
    start_time: Mutex<Instant>,
}

impl Default for PerformanceMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl PerformanceMetrics {
    pub fn new() -> Self {
        Self {
            iteration_count: AtomicU64::new(0),
            cycle_count: AtomicU64::new(0),
            reset_count: AtomicU64::new(0),
            start_time: Mutex::new(Instant::now()),
        }
    }

    pub fn get_iterations(&self) -> u64 {
        self.iteration_count.load(Ordering::SeqCst)
    }

    pub fn get_cycles(&self) -> u64 {
        self.cycle_count.load(Ordering::SeqCst)
    }

    pub fn get_resets(&self) -> u64 {
        self.reset_count.load(Ordering::SeqCst)
    }

    /// Simulated cycles per wall-clock second.
    pub fn get_cps(&self) -> f64 {
        let elapsed = match self.start_time.lock() {
            Ok(start) => start.elapsed().as_secs_f64(),
            Err(_) => return 0.0,
        };
        if elapsed > 0.0 {
            self.get_cycles() as f64 / elapsed
        } else {
            0.0
        }
    }
}

impl SimulationObserver for PerformanceMetrics {
    fn on_simulation_start(&self) {
        if let Ok(mut start) = self.start_time.lock() {
            *start = Instant::now();
        }
    }

    fn on_iteration(&self, cycles: u64) {
        self.iteration_count.fetch_add(1, Ordering::SeqCst);
        self.cycle_count.store(cycles, Ordering::SeqCst);
    }

    fn on_reset(&self, event: &ResetEvent) {
        self.reset_count.fetch_add(1, Ordering::SeqCst);
        self.cycle_count.store(event.cycle, Ordering::SeqCst);
    }
}
