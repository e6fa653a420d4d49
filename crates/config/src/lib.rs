// C3Shim - Bare-metal ESP32-C3 support layer
// Copyright (C) 2026 The C3Shim Authors
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// GPIO pads available on the ESP32-C3.
pub const PIN_COUNT: u8 = 22;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum Demo {
    /// Blink with the watchdogs left running.
    Blink,
    /// Blink after running the watchdog-disable sequence.
    BlinkNoWdt,
    Hello,
}

/// Watchdog stage-0 timeouts of the simulated device.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct WatchdogConfig {
    pub timer_group0_ms: u64,
    pub rtc_ms: u64,
    /// `None` models a device without a super watchdog.
    pub super_ms: Option<u64>,
}

impl Default for WatchdogConfig {
    fn default() -> Self {
        Self {
            timer_group0_ms: 1000,
            rtc_ms: 2000,
            super_ms: None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct SystemConfig {
    pub cpu_hz: u32,
    /// CPU cycles one busy-wait iteration takes.
    pub cycles_per_iteration: u32,
    pub delay_ms: u64,
    pub blink_pin: u8,
    pub message: String,
    /// Mirror UART0 output to stdout.
    pub uart_echo: bool,
    pub watchdogs: WatchdogConfig,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            cpu_hz: 20_000_000,
            cycles_per_iteration: 10,
            delay_ms: 160,
            blink_pin: 2,
            message: "Hello, world!\n".to_string(),
            uart_echo: false,
            watchdogs: WatchdogConfig::default(),
        }
    }
}

impl SystemConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let f = std::fs::File::open(&path)
            .with_context(|| format!("Failed to open system config at {:?}", path.as_ref()))?;
        let config: Self =
            serde_yaml::from_reader(f).context("Failed to parse System Config YAML")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.cpu_hz == 0 {
            anyhow::bail!("'cpu_hz' must be greater than zero");
        }
        if self.cycles_per_iteration == 0 {
            anyhow::bail!("'cycles_per_iteration' must be greater than zero");
        }
        if self.blink_pin >= PIN_COUNT {
            anyhow::bail!(
                "'blink_pin' {} out of range (0..{})",
                self.blink_pin,
                PIN_COUNT
            );
        }
        let wdts = &self.watchdogs;
        if wdts.timer_group0_ms == 0 || wdts.rtc_ms == 0 || wdts.super_ms == Some(0) {
            anyhow::bail!("Watchdog timeouts must be greater than zero");
        }
        Ok(())
    }

    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    pub fn ms_to_cycles(&self, ms: u64) -> u64 {
        ms.saturating_mul(self.cpu_hz as u64) / 1000
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct TestInputs {
    pub demo: Demo,
    pub system: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct TestLimits {
    pub max_cycles: u64,
    #[serde(default)]
    pub wall_time_ms: Option<u64>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    MaxCycles,
    WallTime,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct UartContainsAssertion {
    pub uart_contains: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct MinResetsAssertion {
    pub min_resets: u64,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct MaxResetsAssertion {
    pub max_resets: u64,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct StopReasonAssertion {
    pub expected_stop_reason: StopReason,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(untagged)]
pub enum TestAssertion {
    UartContains(UartContainsAssertion),
    MinResets(MinResetsAssertion),
    MaxResets(MaxResetsAssertion),
    ExpectedStopReason(StopReasonAssertion),
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct TestScript {
    pub schema_version: String,
    pub inputs: TestInputs,
    pub limits: TestLimits,
    #[serde(default)]
    pub assertions: Vec<TestAssertion>,
}

impl TestScript {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let f = std::fs::File::open(&path)
            .with_context(|| format!("Failed to open test script at {:?}", path.as_ref()))?;
        let script: Self =
            serde_yaml::from_reader(f).context("Failed to parse Test Script YAML")?;
        script.validate()?;
        Ok(script)
    }

    pub fn validate(&self) -> Result<()> {
        if self.schema_version != "1.0" {
            anyhow::bail!(
                "Unsupported schema_version '{}'. Supported versions: '1.0'",
                self.schema_version
            );
        }

        if self.limits.max_cycles == 0 {
            anyhow::bail!("Limit 'max_cycles' must be greater than zero");
        }

        Ok(())
    }
}
