// SPDX-License-Identifier: GPL-3.0-only

//! Hardware backend catalog
//!
//! Static tables naming the GStreamer element to try for each codec and
//! direction, keyed either by platform (auto-detection) or by a short alias
//! the user can pass on the command line. Only one candidate is listed per
//! (codec, mode); anything missing simply means "no hardware candidate".

use super::{CodecMode, LogicalCodec};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Execution platform, as far as backend selection cares
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Platform {
    Linux,
    MacOs,
    Windows,
    Other,
}

impl Platform {
    /// Platform this binary was compiled for
    pub fn current() -> Self {
        if cfg!(target_os = "linux") {
            Platform::Linux
        } else if cfg!(target_os = "macos") {
            Platform::MacOs
        } else if cfg!(target_os = "windows") {
            Platform::Windows
        } else {
            Platform::Other
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Linux => "linux",
            Platform::MacOs => "darwin",
            Platform::Windows => "win32",
            Platform::Other => "other",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Hardware backend names for one codec
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendPair {
    /// Encoder element name, if the backend can encode this codec
    pub encoder: Option<String>,
    /// Decoder element name, if the backend can decode this codec
    pub decoder: Option<String>,
}

impl BackendPair {
    pub fn new(encoder: Option<&str>, decoder: Option<&str>) -> Self {
        Self {
            encoder: encoder.map(str::to_string),
            decoder: decoder.map(str::to_string),
        }
    }

    /// Candidate for the given direction
    pub fn get(&self, mode: CodecMode) -> Option<&str> {
        match mode {
            CodecMode::Encode => self.encoder.as_deref(),
            CodecMode::Decode => self.decoder.as_deref(),
        }
    }
}

/// Hardware candidates per codec
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BackendMap {
    entries: HashMap<LogicalCodec, BackendPair>,
}

impl BackendMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(
        mut self,
        codec: LogicalCodec,
        encoder: Option<&str>,
        decoder: Option<&str>,
    ) -> Self {
        self.insert(codec, BackendPair::new(encoder, decoder));
        self
    }

    pub fn insert(&mut self, codec: LogicalCodec, pair: BackendPair) {
        self.entries.insert(codec, pair);
    }

    /// Candidates for a codec; an empty pair when the map has no entry
    pub fn candidates(&self, codec: LogicalCodec) -> BackendPair {
        self.entries.get(&codec).cloned().unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries sorted by codec
    pub fn iter(&self) -> impl Iterator<Item = (LogicalCodec, &BackendPair)> {
        let mut entries: Vec<_> = self.entries.iter().map(|(c, p)| (*c, p)).collect();
        entries.sort_by_key(|(codec, _)| *codec);
        entries.into_iter()
    }

    fn from_defs(defs: &[BackendDef]) -> Self {
        defs.iter().fold(Self::new(), |map, def| {
            map.with(def.codec, def.encoder, def.decoder)
        })
    }
}

/// Static table row: hardware elements for one codec
#[derive(Debug, Clone, Copy)]
struct BackendDef {
    codec: LogicalCodec,
    encoder: Option<&'static str>,
    decoder: Option<&'static str>,
}

impl BackendDef {
    const fn both(codec: LogicalCodec, encoder: &'static str, decoder: &'static str) -> Self {
        Self {
            codec,
            encoder: Some(encoder),
            decoder: Some(decoder),
        }
    }

    const fn decode_only(codec: LogicalCodec, decoder: &'static str) -> Self {
        Self {
            codec,
            encoder: None,
            decoder: Some(decoder),
        }
    }
}

const VIDEOTOOLBOX: &[BackendDef] = &[BackendDef::both(
    LogicalCodec::H264,
    "vtenc_h264_hw",
    "vtdec_hw",
)];

const VAAPI: &[BackendDef] = &[
    BackendDef::both(LogicalCodec::H264, "vaapih264enc", "vaapih264dec"),
    BackendDef::both(LogicalCodec::Vp8, "vaapivp8enc", "vaapivp8dec"),
];

// GStreamer's newer `va` plugin has no VP8 encoder
const VA: &[BackendDef] = &[
    BackendDef::both(LogicalCodec::H264, "vah264enc", "vah264dec"),
    BackendDef::decode_only(LogicalCodec::Vp8, "vavp8dec"),
];

const NVENC: &[BackendDef] = &[BackendDef::both(
    LogicalCodec::H264,
    "nvh264enc",
    "nvh264dec",
)];

const V4L2: &[BackendDef] = &[
    BackendDef::both(LogicalCodec::H264, "v4l2h264enc", "v4l2h264dec"),
    BackendDef::both(LogicalCodec::Vp8, "v4l2vp8enc", "v4l2vp8dec"),
];

// Media Foundation encodes, Direct3D 11 decodes
const D3D11: &[BackendDef] = &[
    BackendDef::both(LogicalCodec::H264, "mfh264enc", "d3d11h264dec"),
    BackendDef::decode_only(LogicalCodec::Vp8, "d3d11vp8dec"),
];

/// Aliases accepted by `--codec`, with a description for listings
const ALIASES: &[(&str, &str, &[BackendDef])] = &[
    ("videotoolbox", "Apple VideoToolbox", VIDEOTOOLBOX),
    ("vaapi", "VA-API (gstreamer-vaapi)", VAAPI),
    ("va", "VA-API (GStreamer va plugin)", VA),
    ("nvenc", "NVIDIA NVENC/NVDEC", NVENC),
    ("v4l2", "V4L2 stateful codecs", V4L2),
    ("d3d11", "Media Foundation / Direct3D 11", D3D11),
];

const PLATFORMS: &[(Platform, &[BackendDef])] = &[
    (Platform::MacOs, VIDEOTOOLBOX),
    (Platform::Linux, VAAPI),
    (Platform::Windows, D3D11),
];

/// Lookup tables from aliases and platforms to hardware candidates
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendCatalog {
    aliases: Vec<(String, BackendMap)>,
    platforms: HashMap<Platform, BackendMap>,
}

impl Default for BackendCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl BackendCatalog {
    /// The built-in GStreamer backend tables
    pub fn builtin() -> Self {
        let catalog = ALIASES
            .iter()
            .fold(Self::empty(), |catalog, (name, _, defs)| {
                catalog.with_alias(name, BackendMap::from_defs(defs))
            });

        PLATFORMS.iter().fold(catalog, |catalog, (platform, defs)| {
            catalog.with_platform(*platform, BackendMap::from_defs(defs))
        })
    }

    /// A catalog with no entries (every lookup misses)
    pub fn empty() -> Self {
        Self {
            aliases: Vec::new(),
            platforms: HashMap::new(),
        }
    }

    /// Add or replace an alias
    pub fn with_alias(mut self, name: &str, map: BackendMap) -> Self {
        let key = normalize_alias(name);
        self.aliases.retain(|(existing, _)| *existing != key);
        self.aliases.push((key, map));
        self
    }

    /// Add or replace the map used for a platform
    pub fn with_platform(mut self, platform: Platform, map: BackendMap) -> Self {
        self.platforms.insert(platform, map);
        self
    }

    /// Resolve a user-supplied alias (case and surrounding whitespace ignored)
    pub fn resolve_alias(&self, name: &str) -> Option<&BackendMap> {
        let key = normalize_alias(name);
        self.aliases
            .iter()
            .find(|(alias, _)| *alias == key)
            .map(|(_, map)| map)
    }

    pub fn resolve_platform(&self, platform: Platform) -> Option<&BackendMap> {
        self.platforms.get(&platform)
    }

    /// Alias names in registration order
    pub fn aliases(&self) -> impl Iterator<Item = (&str, &BackendMap)> {
        self.aliases.iter().map(|(name, map)| (name.as_str(), map))
    }
}

/// Human-readable description of a built-in alias
pub fn alias_description(name: &str) -> Option<&'static str> {
    let key = normalize_alias(name);
    ALIASES
        .iter()
        .find(|(alias, _, _)| *alias == key)
        .map(|(_, description, _)| *description)
}

fn normalize_alias(name: &str) -> String {
    name.trim().to_ascii_lowercase()
}
