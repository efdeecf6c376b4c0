// SPDX-License-Identifier: GPL-3.0-only

//! Software coders and the coder descriptor factory

use super::{CodecMode, LogicalCodec};
use crate::errors::{FactoryError, HwAccelResult};
use gstreamer as gst;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Software encoder/decoder elements for one codec
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SoftwareCoders {
    pub encoder: &'static str,
    pub decoder: &'static str,
}

impl SoftwareCoders {
    pub fn get(&self, mode: CodecMode) -> &'static str {
        match mode {
            CodecMode::Encode => self.encoder,
            CodecMode::Decode => self.decoder,
        }
    }
}

/// Software coders used whenever no hardware backend is active
///
/// Adding a codec to [`LogicalCodec`] without an entry here fails to compile.
pub const fn software_coders(codec: LogicalCodec) -> SoftwareCoders {
    match codec {
        LogicalCodec::H264 => SoftwareCoders {
            encoder: "x264enc",
            decoder: "avdec_h264",
        },
        LogicalCodec::Vp8 => SoftwareCoders {
            encoder: "vp8enc",
            decoder: "vp8dec",
        },
    }
}

/// Which coder the pipeline should build for a codec and direction
///
/// `backend == None` is the software default. A descriptor bound to a
/// hardware backend never compares equal to the default for the same slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CoderDescriptor {
    pub codec: LogicalCodec,
    pub mode: CodecMode,
    pub backend: Option<String>,
}

impl CoderDescriptor {
    /// The bare software coder
    pub fn software(codec: LogicalCodec, mode: CodecMode) -> Self {
        Self {
            codec,
            mode,
            backend: None,
        }
    }

    /// The default coder bound to a hardware backend
    pub fn hardware(codec: LogicalCodec, mode: CodecMode, backend: impl Into<String>) -> Self {
        Self {
            codec,
            mode,
            backend: Some(backend.into()),
        }
    }

    pub fn is_hardware(&self) -> bool {
        self.backend.is_some()
    }

    /// GStreamer element this descriptor builds
    pub fn element_name(&self) -> &str {
        match &self.backend {
            Some(backend) => backend,
            None => software_coders(self.codec).get(self.mode),
        }
    }

    /// Create the coder element
    ///
    /// Call this at coder construction time with the descriptor just read
    /// from the registry; it needs nothing beyond what the descriptor fixes.
    pub fn build(&self) -> HwAccelResult<gst::Element> {
        gst::init().map_err(|e| FactoryError::GstreamerInit(e.to_string()))?;

        let name = self.element_name();
        debug!(
            codec = %self.codec,
            mode = %self.mode,
            element = name,
            "Creating coder element"
        );

        let element = gst::ElementFactory::make(name).build().map_err(|e| {
            FactoryError::ElementCreation {
                element: name.to_string(),
                reason: e.to_string(),
            }
        })?;

        Ok(element)
    }
}

impl fmt::Display for CoderDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = if self.is_hardware() {
            "hardware"
        } else {
            "software"
        };
        write!(
            f,
            "{} {}: {} ({})",
            self.codec.label(),
            self.mode,
            self.element_name(),
            kind
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_software_element_names() {
        let enc = CoderDescriptor::software(LogicalCodec::H264, CodecMode::Encode);
        let dec = CoderDescriptor::software(LogicalCodec::Vp8, CodecMode::Decode);
        assert_eq!(enc.element_name(), "x264enc");
        assert_eq!(dec.element_name(), "vp8dec");
    }

    #[test]
    fn test_bound_descriptor_differs_from_default() {
        let bare = CoderDescriptor::software(LogicalCodec::Vp8, CodecMode::Encode);
        let bound = CoderDescriptor::hardware(LogicalCodec::Vp8, CodecMode::Encode, "vaapivp8enc");
        assert_ne!(bare, bound);
        assert_eq!(bound.element_name(), "vaapivp8enc");
        assert!(bound.is_hardware());
    }

    #[test]
    fn test_display() {
        let bound = CoderDescriptor::hardware(LogicalCodec::H264, CodecMode::Decode, "nvh264dec");
        assert_eq!(bound.to_string(), "H264 decoder: nvh264dec (hardware)");
    }

    #[test]
    fn test_build_unknown_element_fails() {
        let bogus = CoderDescriptor::hardware(
            LogicalCodec::H264,
            CodecMode::Encode,
            "no-such-element-xyz",
        );
        // Errors either at GStreamer init or at element creation, never panics
        assert!(bogus.build().is_err());
    }
}
