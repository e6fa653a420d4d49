// C3Shim - Bare-metal ESP32-C3 support layer
// Copyright (C) 2026 The C3Shim Authors
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

use crate::{ResetCause, Soc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Serialize, Deserialize, Debug)]
pub struct SocSnapshot {
    pub cycles: u64,
    pub pending_reset: Option<ResetCause>,
    pub peripherals: BTreeMap<String, serde_json::Value>,
}

impl Soc {
    pub fn snapshot(&self) -> SocSnapshot {
        SocSnapshot {
            cycles: self.cycles(),
            pending_reset: self.pending_reset(),
            peripherals: self
                .bus
                .peripherals
                .iter()
                .map(|p| (p.name.clone(), p.dev.snapshot()))
                .collect(),
        }
    }
}
