// SPDX-License-Identifier: GPL-3.0-only

use serde::{Deserialize, Serialize};

/// Hardware acceleration settings
///
/// Built from the command line by the binary; hosts can embed it in their own
/// configuration. Nothing here is persisted.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HwAccelConfig {
    /// Prefer hardware coders when they work on this machine
    pub enabled: bool,
    /// Backend alias (e.g. "vaapi", "nvenc"); auto-detect by platform when unset
    pub backend: Option<String>,
}

impl HwAccelConfig {
    pub fn new(enabled: bool, backend: Option<String>) -> Self {
        Self { enabled, backend }
    }

    /// Backend alias, with blank values treated as unset
    pub fn normalized_backend(&self) -> Option<&str> {
        self.backend
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }
}
