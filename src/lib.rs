// SPDX-License-Identifier: GPL-3.0-only

//! Hardware-accelerated codec selection for real-time media pipelines
//!
//! At startup the application decides, per codec, whether the media pipeline
//! builds a hardware or a software encoder/decoder. Hardware backends are
//! taken from a catalog (by platform or by a user-supplied alias such as
//! `vaapi`), validated on the running machine, and published to a registry
//! that pipeline code consults whenever it creates a coder.
//!
//! # Architecture
//!
//! - [`codecs`]: codec identities, backend catalog, software defaults, probing
//! - [`registry`]: active coder per codec and direction
//! - [`activation`]: the enable/disable procedure that updates the registry
//! - [`config`]: caller intent (enabled flag and backend alias)
//! - [`errors`]: error and warning types
//!
//! # Example
//!
//! ```no_run
//! use rtc_hwaccel::{CodecRegistry, LogicalCodec, configure_hardware_acceleration};
//!
//! let report = configure_hardware_acceleration(true, Some("vaapi"));
//! println!("{report}");
//!
//! let encoder = CodecRegistry::global().get_encoder(LogicalCodec::H264);
//! let _element = encoder.build()?;
//! # Ok::<(), rtc_hwaccel::errors::HwAccelError>(())
//! ```

pub mod activation;
pub mod codecs;
pub mod config;
pub mod errors;
pub mod registry;

// Re-export commonly used types
pub use activation::{
    ActivationReport, HwAccelerator, SelectionStatus, StatusLine, configure_hardware_acceleration,
};
pub use codecs::{
    BackendCatalog, BackendMap, BackendPair, CapabilityProbe, CodecMode, CoderDescriptor,
    GstProbe, LogicalCodec, Platform, ProbeOutcome,
};
pub use config::HwAccelConfig;
pub use errors::{ActivationWarning, HwAccelError, HwAccelResult};
pub use registry::{CodecRegistry, RegistrySnapshot};
