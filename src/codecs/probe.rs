// SPDX-License-Identifier: MPL-2.0

//! Runtime capability probing
//!
//! A backend being installed is not enough: VA-API elements exist on machines
//! without a GPU, NVENC elements exist without the driver. The GStreamer
//! probe therefore builds the element and takes it to READY, which opens the
//! device, before calling the backend usable.

use super::CodecMode;
use gstreamer as gst;
use gstreamer::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, warn};

/// Result of trying a backend on this machine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "reason", rename_all = "lowercase")]
pub enum ProbeOutcome {
    /// The backend can be used
    Available,
    /// Missing element, hardware, driver or permission
    Unavailable(String),
    /// The backend cannot work as asked (wrong direction, broken GStreamer setup)
    Misconfigured(String),
}

impl ProbeOutcome {
    pub fn is_available(&self) -> bool {
        matches!(self, ProbeOutcome::Available)
    }
}

impl fmt::Display for ProbeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeOutcome::Available => write!(f, "available"),
            ProbeOutcome::Unavailable(reason) => write!(f, "unavailable: {}", reason),
            ProbeOutcome::Misconfigured(reason) => write!(f, "misconfigured: {}", reason),
        }
    }
}

/// Checks whether a named backend works in a given direction
///
/// Implementations must not panic and must release whatever they acquire
/// before returning.
pub trait CapabilityProbe {
    fn probe(&self, backend: &str, mode: CodecMode) -> ProbeOutcome;
}

impl<F> CapabilityProbe for F
where
    F: Fn(&str, CodecMode) -> ProbeOutcome,
{
    fn probe(&self, backend: &str, mode: CodecMode) -> ProbeOutcome {
        self(backend, mode)
    }
}

/// Probe backed by GStreamer element factories
#[derive(Debug, Clone, Copy, Default)]
pub struct GstProbe;

impl CapabilityProbe for GstProbe {
    fn probe(&self, backend: &str, mode: CodecMode) -> ProbeOutcome {
        let outcome = probe_element(backend, mode);

        match &outcome {
            ProbeOutcome::Available => debug!("✓ {} usable as {}", backend, mode),
            ProbeOutcome::Unavailable(reason) => {
                debug!("✗ {} not usable as {}: {}", backend, mode, reason)
            }
            ProbeOutcome::Misconfigured(reason) => {
                warn!("✗ {} misconfigured as {}: {}", backend, mode, reason)
            }
        }

        outcome
    }
}

fn probe_element(backend: &str, mode: CodecMode) -> ProbeOutcome {
    if let Err(e) = gst::init() {
        return ProbeOutcome::Misconfigured(format!("GStreamer init failed: {}", e));
    }

    let Some(factory) = gst::ElementFactory::find(backend) else {
        return ProbeOutcome::Unavailable("element not installed".to_string());
    };

    let klass = factory.metadata("klass").unwrap_or_default();
    if !klass.contains(mode.klass_keyword()) {
        return ProbeOutcome::Misconfigured(format!("element is not a {} ({})", mode, klass));
    }

    let element = match gst::ElementFactory::make(backend).build() {
        Ok(element) => ProbeElement(element),
        Err(e) => return ProbeOutcome::Unavailable(e.to_string()),
    };

    // READY opens the device or driver context
    match element.0.set_state(gst::State::Ready) {
        Ok(_) => ProbeOutcome::Available,
        Err(e) => ProbeOutcome::Unavailable(format!("failed to open device: {}", e)),
    }
}

/// Returns the probed element to NULL on every exit path
struct ProbeElement(gst::Element);

impl Drop for ProbeElement {
    fn drop(&mut self) {
        let _ = self.0.set_state(gst::State::Null);
    }
}
