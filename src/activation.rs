// SPDX-License-Identifier: GPL-3.0-only

//! Hardware acceleration activation
//!
//! Resolves hardware candidates from the catalog (explicit alias or current
//! platform), probes each candidate, and publishes the winners to the codec
//! registry. Encoders and decoders are probed independently, so a codec may
//! end up with a hardware encoder and a software decoder. Every failure
//! degrades to the software coder for that slot; nothing here returns an
//! error for a missing backend.

use crate::codecs::{
    BackendCatalog, BackendMap, CapabilityProbe, CodecMode, CoderDescriptor, GstProbe,
    LogicalCodec, Platform, ProbeOutcome,
};
use crate::config::HwAccelConfig;
use crate::errors::{ActivationWarning, HwAccelResult};
use crate::registry::{CodecRegistry, RegistrySnapshot};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Why a slot ended up with the coder it has
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionStatus {
    /// Hardware candidate probed successfully
    Enabled,
    /// Hardware candidate failed probing
    Unavailable(String),
    /// Hardware candidate cannot work as configured
    Misconfigured(String),
    /// The backend map offered nothing for this slot
    NoCandidate,
}

/// One activation decision for a (codec, mode) slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    /// Hardware backend that was considered, if any
    pub candidate: Option<String>,
    /// Coder written to the registry
    pub selected: CoderDescriptor,
    pub status: SelectionStatus,
}

impl StatusLine {
    pub fn codec(&self) -> LogicalCodec {
        self.selected.codec
    }

    pub fn mode(&self) -> CodecMode {
        self.selected.mode
    }

    fn log(&self) {
        match self.status {
            SelectionStatus::Enabled | SelectionStatus::Unavailable(_) => info!("{}", self),
            SelectionStatus::Misconfigured(_) => warn!("{}", self),
            SelectionStatus::NoCandidate => debug!("{}", self),
        }
    }
}

impl fmt::Display for StatusLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let codec = self.codec().label();
        let role = self.mode().role();
        let candidate = self.candidate.as_deref().unwrap_or_default();

        match &self.status {
            SelectionStatus::Enabled => {
                write!(f, "Enabled {} hardware {}: {}", codec, role, candidate)
            }
            SelectionStatus::Unavailable(_) => {
                write!(f, "{} hardware {} '{}' not available.", codec, role, candidate)
            }
            SelectionStatus::Misconfigured(reason) => write!(
                f,
                "{} hardware {} '{}' not available (misconfigured: {}).",
                codec, role, candidate, reason
            ),
            SelectionStatus::NoCandidate => write!(
                f,
                "No {} hardware {} candidate, using software {}",
                codec,
                role,
                self.selected.element_name()
            ),
        }
    }
}

/// Everything one activation call decided
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivationReport {
    pub enabled: bool,
    /// Includes silent conditions, which are recorded but never displayed
    pub warnings: Vec<ActivationWarning>,
    /// Encoder then decoder line for each codec, in [`LogicalCodec::ALL`] order
    pub lines: Vec<StatusLine>,
}

impl ActivationReport {
    fn disabled() -> Self {
        Self {
            enabled: false,
            warnings: Vec::new(),
            lines: Vec::new(),
        }
    }

    /// Status line for one slot
    pub fn line(&self, codec: LogicalCodec, mode: CodecMode) -> Option<&StatusLine> {
        self.lines
            .iter()
            .find(|line| line.codec() == codec && line.mode() == mode)
    }

    /// Number of slots now using a hardware coder
    pub fn hardware_count(&self) -> usize {
        self.lines
            .iter()
            .filter(|line| line.status == SelectionStatus::Enabled)
            .count()
    }
}

impl fmt::Display for ActivationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.enabled {
            return write!(f, "Hardware acceleration disabled. Reverted to software codecs.");
        }

        let mut first = true;
        for warning in self.warnings.iter().filter(|w| !w.is_silent()) {
            if !first {
                writeln!(f)?;
            }
            write!(f, "Warning: {}", warning)?;
            first = false;
        }
        for line in &self.lines {
            if !first {
                writeln!(f)?;
            }
            write!(f, "{}", line)?;
            first = false;
        }
        Ok(())
    }
}

/// Selects hardware or software coders and publishes them to a registry
#[derive(Debug, Clone)]
pub struct HwAccelerator<P = GstProbe> {
    catalog: BackendCatalog,
    platform: Platform,
    probe: P,
}

impl HwAccelerator<GstProbe> {
    /// Built-in catalog, current platform, GStreamer probing
    pub fn new() -> Self {
        Self::with_probe(GstProbe)
    }
}

impl Default for HwAccelerator<GstProbe> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: CapabilityProbe> HwAccelerator<P> {
    pub fn with_probe(probe: P) -> Self {
        Self {
            catalog: BackendCatalog::builtin(),
            platform: Platform::current(),
            probe,
        }
    }

    pub fn with_catalog(mut self, catalog: BackendCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Override the platform used for auto-detection
    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    pub fn catalog(&self) -> &BackendCatalog {
        &self.catalog
    }

    pub fn probe(&self) -> &P {
        &self.probe
    }

    /// Activate according to a configuration
    pub fn apply(&self, registry: &CodecRegistry, config: &HwAccelConfig) -> ActivationReport {
        self.activate(registry, config.enabled, config.normalized_backend())
    }

    /// Enable or disable hardware coders
    ///
    /// With `enabled == false` every slot is reset to software without probing.
    /// Otherwise `requested_backend` names a catalog alias ("vaapi", "nvenc",
    /// ...); `None` auto-detects by platform. An unknown alias is reported as
    /// a warning and leaves every slot on software.
    pub fn activate(
        &self,
        registry: &CodecRegistry,
        enabled: bool,
        requested_backend: Option<&str>,
    ) -> ActivationReport {
        if !enabled {
            registry.publish(RegistrySnapshot::software_defaults());
            info!("Hardware acceleration disabled. Reverted to software codecs.");
            return ActivationReport::disabled();
        }

        let (backend_map, warning) = self.resolve_backend_map(requested_backend);
        let mut report = ActivationReport {
            enabled: true,
            warnings: warning.into_iter().collect(),
            lines: Vec::with_capacity(LogicalCodec::ALL.len() * 2),
        };

        let mut snapshot = RegistrySnapshot::software_defaults();
        for codec in LogicalCodec::ALL {
            let candidates = backend_map.candidates(codec);
            for mode in CodecMode::ALL {
                let line = self.select(codec, mode, candidates.get(mode));
                line.log();
                snapshot.set(line.selected.clone());
                report.lines.push(line);
            }
        }

        registry.publish(snapshot);
        info!(
            "Hardware acceleration enabled: {} of {} coders use hardware",
            report.hardware_count(),
            report.lines.len()
        );
        report
    }

    /// Hardware candidates for an alias, or for the platform when none is given
    pub fn resolve_backend_map(
        &self,
        requested_backend: Option<&str>,
    ) -> (BackendMap, Option<ActivationWarning>) {
        let requested = requested_backend
            .map(str::trim)
            .filter(|name| !name.is_empty());

        match requested {
            Some(name) => match self.catalog.resolve_alias(name) {
                Some(map) => {
                    debug!("Using hardware backend alias '{}'", name);
                    (map.clone(), None)
                }
                None => {
                    let warning = ActivationWarning::UnknownBackendAlias(name.to_string());
                    warn!("{}", warning);
                    (BackendMap::new(), Some(warning))
                }
            },
            None => match self.catalog.resolve_platform(self.platform) {
                Some(map) => {
                    debug!("Auto-detected hardware backends for {}", self.platform);
                    (map.clone(), None)
                }
                None => {
                    let warning = ActivationWarning::NoHardwareForPlatform(self.platform);
                    debug!("{}", warning);
                    (BackendMap::new(), Some(warning))
                }
            },
        }
    }

    fn select(&self, codec: LogicalCodec, mode: CodecMode, candidate: Option<&str>) -> StatusLine {
        let Some(backend) = candidate else {
            return StatusLine {
                candidate: None,
                selected: CoderDescriptor::software(codec, mode),
                status: SelectionStatus::NoCandidate,
            };
        };

        let (selected, status) = match self.probe.probe(backend, mode) {
            ProbeOutcome::Available => (
                CoderDescriptor::hardware(codec, mode, backend),
                SelectionStatus::Enabled,
            ),
            ProbeOutcome::Unavailable(reason) => (
                CoderDescriptor::software(codec, mode),
                SelectionStatus::Unavailable(reason),
            ),
            ProbeOutcome::Misconfigured(reason) => (
                CoderDescriptor::software(codec, mode),
                SelectionStatus::Misconfigured(reason),
            ),
        };

        StatusLine {
            candidate: Some(backend.to_string()),
            selected,
            status,
        }
    }
}

impl<P> HwAccelerator<P>
where
    P: CapabilityProbe + Send + Sync + 'static,
{
    /// Run activation on the blocking pool
    ///
    /// Probing opens devices and drivers; keep it off async worker threads.
    pub async fn activate_async(
        self: Arc<Self>,
        registry: Arc<CodecRegistry>,
        config: HwAccelConfig,
    ) -> HwAccelResult<ActivationReport> {
        let report =
            tokio::task::spawn_blocking(move || self.apply(&registry, &config)).await?;
        Ok(report)
    }
}

/// Enable or disable hardware coders in the process-wide registry
///
/// Uses the built-in catalog and GStreamer probing. Call once at startup,
/// before the media pipeline creates coders.
pub fn configure_hardware_acceleration(
    enabled: bool,
    backend: Option<&str>,
) -> ActivationReport {
    HwAccelerator::new().activate(CodecRegistry::global(), enabled, backend)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn always(outcome: ProbeOutcome) -> impl Fn(&str, CodecMode) -> ProbeOutcome {
        move |_: &str, _: CodecMode| outcome.clone()
    }

    #[test]
    fn test_no_candidate_keeps_software() {
        let accel = HwAccelerator::with_probe(always(ProbeOutcome::Available))
            .with_catalog(BackendCatalog::empty())
            .with_platform(Platform::Other);
        let registry = CodecRegistry::new();

        let report = accel.activate(&registry, true, None);

        assert_eq!(
            report.warnings,
            vec![ActivationWarning::NoHardwareForPlatform(Platform::Other)]
        );
        assert!(report.lines.iter().all(|l| l.status == SelectionStatus::NoCandidate));
        assert_eq!(*registry.snapshot(), RegistrySnapshot::software_defaults());
    }

    #[test]
    fn test_platform_without_hardware_prints_no_warning() {
        let accel = HwAccelerator::with_probe(always(ProbeOutcome::Available))
            .with_catalog(BackendCatalog::empty())
            .with_platform(Platform::Other);

        let text = accel.activate(&CodecRegistry::new(), true, None).to_string();

        assert!(!text.contains("Warning"), "unexpected warning in: {text}");
        assert!(text.starts_with("No H264 hardware encoder candidate"));
    }

    #[test]
    fn test_blank_alias_falls_back_to_platform() {
        let accel = HwAccelerator::with_probe(always(ProbeOutcome::Available))
            .with_platform(Platform::Linux);

        let (map, warning) = accel.resolve_backend_map(Some("   "));

        assert!(warning.is_none());
        assert_eq!(&map, accel.catalog().resolve_platform(Platform::Linux).unwrap());
    }

    #[test]
    fn test_misconfigured_falls_back_with_reason() {
        let accel = HwAccelerator::with_probe(always(ProbeOutcome::Misconfigured(
            "element is not a encoder".into(),
        )))
        .with_platform(Platform::Linux);
        let registry = CodecRegistry::new();

        let report = accel.activate(&registry, true, None);
        let line = report.line(LogicalCodec::H264, CodecMode::Encode).unwrap();

        assert!(!registry.get_encoder(LogicalCodec::H264).is_hardware());
        assert!(line.to_string().contains("not available"));
        assert!(line.to_string().contains("misconfigured"));
    }

    #[test]
    fn test_report_lists_encoder_then_decoder() {
        let accel = HwAccelerator::with_probe(always(ProbeOutcome::Available))
            .with_platform(Platform::Linux);
        let report = accel.activate(&CodecRegistry::new(), true, None);

        let slots: Vec<_> = report.lines.iter().map(|l| (l.codec(), l.mode())).collect();
        assert_eq!(
            slots,
            vec![
                (LogicalCodec::H264, CodecMode::Encode),
                (LogicalCodec::H264, CodecMode::Decode),
                (LogicalCodec::Vp8, CodecMode::Encode),
                (LogicalCodec::Vp8, CodecMode::Decode),
            ]
        );
        assert_eq!(report.hardware_count(), 4);
    }

    #[test]
    fn test_disabled_report_text() {
        let accel = HwAccelerator::with_probe(always(ProbeOutcome::Available));
        let report = accel.activate(&CodecRegistry::new(), false, Some("vaapi"));

        assert!(report.lines.is_empty());
        assert_eq!(
            report.to_string(),
            "Hardware acceleration disabled. Reverted to software codecs."
        );
    }
}
