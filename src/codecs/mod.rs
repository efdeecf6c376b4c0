// SPDX-License-Identifier: GPL-3.0-only

//! Codec identities, backend tables and capability probing
//!
//! - [`catalog`]: hardware backend names per platform and per alias
//! - [`defaults`]: software coders and the coder descriptor factory
//! - [`probe`]: runtime check that a backend works on this machine

pub mod catalog;
pub mod defaults;
pub mod probe;

pub use catalog::{BackendCatalog, BackendMap, BackendPair, Platform};
pub use defaults::{CoderDescriptor, SoftwareCoders, software_coders};
pub use probe::{CapabilityProbe, GstProbe, ProbeOutcome};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Codec families the media pipeline can negotiate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogicalCodec {
    /// H.264/AVC
    H264,
    /// VP8
    Vp8,
}

impl LogicalCodec {
    /// Every supported codec, in activation order
    pub const ALL: [LogicalCodec; 2] = [LogicalCodec::H264, LogicalCodec::Vp8];

    /// Lowercase identifier (e.g. "h264")
    pub fn as_str(&self) -> &'static str {
        match self {
            LogicalCodec::H264 => "h264",
            LogicalCodec::Vp8 => "vp8",
        }
    }

    /// Uppercase label used in status lines (e.g. "H264")
    pub fn label(&self) -> &'static str {
        match self {
            LogicalCodec::H264 => "H264",
            LogicalCodec::Vp8 => "VP8",
        }
    }
}

impl fmt::Display for LogicalCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogicalCodec {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "h264" | "avc" => Ok(LogicalCodec::H264),
            "vp8" => Ok(LogicalCodec::Vp8),
            other => Err(format!("Unsupported codec '{}'", other)),
        }
    }
}

/// Direction a coder works in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CodecMode {
    Encode,
    Decode,
}

impl CodecMode {
    pub const ALL: [CodecMode; 2] = [CodecMode::Encode, CodecMode::Decode];

    /// "encoder" or "decoder"
    pub fn role(&self) -> &'static str {
        match self {
            CodecMode::Encode => "encoder",
            CodecMode::Decode => "decoder",
        }
    }

    /// Keyword GStreamer puts in the klass metadata of matching elements
    pub(crate) fn klass_keyword(&self) -> &'static str {
        match self {
            CodecMode::Encode => "Encoder",
            CodecMode::Decode => "Decoder",
        }
    }
}

impl fmt::Display for CodecMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.role())
    }
}
