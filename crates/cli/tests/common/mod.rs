// C3Shim - Bare-metal ESP32-C3 support layer
// Copyright (C) 2026 The C3Shim Authors
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

/// 100 kHz core, 10 ms delays, MWDT at 50 ms, RWDT at 100 ms.
pub const SMALL_SYSTEM: &str = r#"
cpu_hz: 100000
cycles_per_iteration: 1
delay_ms: 10
watchdogs:
  timer_group0_ms: 50
  rtc_ms: 100
"#;

pub fn temp_dir(prefix: &str) -> PathBuf {
    let nonce = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let dir = std::env::temp_dir().join(format!("c3shim-{}-{}", prefix, nonce));
    std::fs::create_dir_all(&dir).expect("Failed to create temp dir");
    dir
}
