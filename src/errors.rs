// SPDX-License-Identifier: MPL-2.0

//! Error types for codec selection
//!
//! Nothing in here is fatal to activation: probing and catalog misses degrade
//! to software coders. [`HwAccelError`] is what the coder factory and the
//! async activation entry point return to their callers.

use crate::codecs::Platform;
use std::fmt;

/// Result type alias using HwAccelError
pub type HwAccelResult<T> = Result<T, HwAccelError>;

/// Main error type
#[derive(Debug, Clone)]
pub enum HwAccelError {
    /// Coder construction errors
    Factory(FactoryError),
    /// Generic error with message
    Other(String),
}

/// Errors raised while turning a coder descriptor into a GStreamer element
#[derive(Debug, Clone)]
pub enum FactoryError {
    /// GStreamer could not be initialised
    GstreamerInit(String),
    /// The element factory refused to build the element
    ElementCreation {
        /// Element factory name
        element: String,
        /// Reason reported by GStreamer
        reason: String,
    },
}

/// Non-fatal conditions encountered while resolving hardware candidates
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActivationWarning {
    /// The requested backend alias is not in the catalog
    UnknownBackendAlias(String),
    /// The running platform has no catalog entry
    NoHardwareForPlatform(Platform),
}

impl fmt::Display for HwAccelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HwAccelError::Factory(e) => write!(f, "Coder factory error: {}", e),
            HwAccelError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl fmt::Display for FactoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FactoryError::GstreamerInit(msg) => {
                write!(f, "Failed to initialize GStreamer: {}", msg)
            }
            FactoryError::ElementCreation { element, reason } => {
                write!(f, "Failed to create element '{}': {}", element, reason)
            }
        }
    }
}

impl fmt::Display for ActivationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActivationWarning::UnknownBackendAlias(name) => {
                write!(f, "Unknown hardware backend '{}' passed to --codec.", name)
            }
            ActivationWarning::NoHardwareForPlatform(platform) => {
                write!(f, "No hardware codecs known for platform '{}'", platform)
            }
        }
    }
}

impl ActivationWarning {
    /// Silent conditions are logged at debug level and left out of printed reports
    pub fn is_silent(&self) -> bool {
        matches!(self, ActivationWarning::NoHardwareForPlatform(_))
    }
}

impl std::error::Error for HwAccelError {}
impl std::error::Error for FactoryError {}

impl From<FactoryError> for HwAccelError {
    fn from(err: FactoryError) -> Self {
        HwAccelError::Factory(err)
    }
}

impl From<tokio::task::JoinError> for HwAccelError {
    fn from(err: tokio::task::JoinError) -> Self {
        HwAccelError::Other(format!("Activation task failed: {}", err))
    }
}
