// SPDX-License-Identifier: GPL-3.0-only

//! Integration tests for hardware acceleration activation

use rtc_hwaccel::{
    ActivationWarning, BackendCatalog, BackendMap, CodecMode, CodecRegistry, CoderDescriptor,
    HwAccelConfig, HwAccelerator, LogicalCodec, Platform, ProbeOutcome, RegistrySnapshot,
    SelectionStatus,
};
use std::sync::{Arc, Mutex};

fn available(_: &str, _: CodecMode) -> ProbeOutcome {
    ProbeOutcome::Available
}

fn unavailable(_: &str, _: CodecMode) -> ProbeOutcome {
    ProbeOutcome::Unavailable("no device".to_string())
}

/// Catalog with a single "hw" alias offering both VP8 slots
fn vp8_catalog() -> BackendCatalog {
    let map = BackendMap::new().with(LogicalCodec::Vp8, Some("vp8_hw_enc"), Some("vp8_hw_dec"));
    BackendCatalog::empty()
        .with_alias("hw", map.clone())
        .with_platform(Platform::Linux, map)
}

fn assert_all_software(registry: &CodecRegistry) {
    for codec in LogicalCodec::ALL {
        assert_eq!(
            registry.get_encoder(codec),
            CoderDescriptor::software(codec, CodecMode::Encode)
        );
        assert_eq!(
            registry.get_decoder(codec),
            CoderDescriptor::software(codec, CodecMode::Decode)
        );
    }
}

#[test]
fn test_disable_restores_software_defaults() {
    let registry = CodecRegistry::new();
    let accel = HwAccelerator::with_probe(available).with_platform(Platform::Linux);

    accel.activate(&registry, true, None);
    assert!(registry.get_encoder(LogicalCodec::H264).is_hardware());

    let report = accel.activate(&registry, false, None);
    assert!(!report.enabled);
    assert_all_software(&registry);
}

#[test]
fn test_disable_never_probes() {
    let probed = Mutex::new(0usize);
    let counting = |_: &str, _: CodecMode| {
        *probed.lock().unwrap() += 1;
        ProbeOutcome::Available
    };
    let accel = HwAccelerator::with_probe(counting).with_platform(Platform::Linux);

    accel.activate(&CodecRegistry::new(), false, Some("vaapi"));
    assert_eq!(*probed.lock().unwrap(), 0);
}

#[test]
fn test_codec_missing_from_map_uses_defaults() {
    let registry = CodecRegistry::new();
    let accel = HwAccelerator::with_probe(available).with_catalog(vp8_catalog());

    let report = accel.activate(&registry, true, Some("hw"));

    assert_eq!(
        registry.get_encoder(LogicalCodec::H264),
        CoderDescriptor::software(LogicalCodec::H264, CodecMode::Encode)
    );
    assert_eq!(
        registry.get_decoder(LogicalCodec::H264),
        CoderDescriptor::software(LogicalCodec::H264, CodecMode::Decode)
    );
    let line = report.line(LogicalCodec::H264, CodecMode::Encode).unwrap();
    assert_eq!(line.status, SelectionStatus::NoCandidate);
}

#[test]
fn test_successful_probe_binds_backend() {
    let registry = CodecRegistry::new();
    let accel = HwAccelerator::with_probe(available).with_catalog(vp8_catalog());

    accel.activate(&registry, true, Some("hw"));

    let encoder = registry.get_encoder(LogicalCodec::Vp8);
    let decoder = registry.get_decoder(LogicalCodec::Vp8);
    assert_eq!(
        encoder,
        CoderDescriptor::hardware(LogicalCodec::Vp8, CodecMode::Encode, "vp8_hw_enc")
    );
    assert_ne!(
        encoder,
        CoderDescriptor::software(LogicalCodec::Vp8, CodecMode::Encode)
    );
    assert_eq!(decoder.element_name(), "vp8_hw_dec");
}

#[test]
fn test_failed_probe_falls_back_and_reports() {
    let registry = CodecRegistry::new();
    let accel = HwAccelerator::with_probe(unavailable).with_catalog(vp8_catalog());

    let report = accel.activate(&registry, true, Some("hw"));

    assert_all_software(&registry);
    let line = report.line(LogicalCodec::Vp8, CodecMode::Encode).unwrap();
    assert_eq!(line.to_string(), "VP8 hardware encoder 'vp8_hw_enc' not available.");
}

#[test]
fn test_activation_is_idempotent() {
    let registry = CodecRegistry::new();
    let accel = HwAccelerator::with_probe(available).with_platform(Platform::Linux);

    let first_report = accel.activate(&registry, true, Some("vaapi"));
    let first = registry.snapshot();
    let second_report = accel.activate(&registry, true, Some("vaapi"));
    let second = registry.snapshot();

    assert_eq!(*first, *second);
    assert_eq!(first_report, second_report);
}

#[test]
fn test_unknown_alias_warns_and_uses_defaults() {
    let registry = CodecRegistry::new();
    let accel = HwAccelerator::with_probe(available).with_platform(Platform::Linux);

    let report = accel.activate(&registry, true, Some("nonexistent"));

    assert_eq!(
        report.warnings,
        vec![ActivationWarning::UnknownBackendAlias(
            "nonexistent".to_string()
        )]
    );
    assert_all_software(&registry);
    assert!(
        report
            .to_string()
            .starts_with("Warning: Unknown hardware backend 'nonexistent' passed to --codec.")
    );
}

#[test]
fn test_asymmetric_vp8_selection() {
    // Hardware encode works, hardware decode does not
    let probe = |backend: &str, _: CodecMode| {
        if backend == "vp8_hw_enc" {
            ProbeOutcome::Available
        } else {
            ProbeOutcome::Unavailable("decoder device busy".to_string())
        }
    };
    let registry = CodecRegistry::new();
    let accel = HwAccelerator::with_probe(probe)
        .with_catalog(vp8_catalog())
        .with_platform(Platform::Linux);

    let report = accel.activate(&registry, true, None);

    assert_eq!(
        registry.get_encoder(LogicalCodec::Vp8),
        CoderDescriptor::hardware(LogicalCodec::Vp8, CodecMode::Encode, "vp8_hw_enc")
    );
    assert_eq!(
        registry.get_decoder(LogicalCodec::Vp8),
        CoderDescriptor::software(LogicalCodec::Vp8, CodecMode::Decode)
    );

    let vp8_lines: Vec<String> = report
        .lines
        .iter()
        .filter(|line| line.codec() == LogicalCodec::Vp8)
        .map(|line| line.to_string())
        .collect();
    assert_eq!(
        vp8_lines,
        vec![
            "Enabled VP8 hardware encoder: vp8_hw_enc".to_string(),
            "VP8 hardware decoder 'vp8_hw_dec' not available.".to_string(),
        ]
    );
}

#[test]
fn test_probe_sees_requested_mode() {
    let seen = Mutex::new(Vec::new());
    let recording = |backend: &str, mode: CodecMode| {
        seen.lock().unwrap().push((backend.to_string(), mode));
        ProbeOutcome::Unavailable("stub".to_string())
    };
    let accel = HwAccelerator::with_probe(recording).with_catalog(vp8_catalog());

    accel.activate(&CodecRegistry::new(), true, Some("hw"));

    assert_eq!(
        *seen.lock().unwrap(),
        vec![
            ("vp8_hw_enc".to_string(), CodecMode::Encode),
            ("vp8_hw_dec".to_string(), CodecMode::Decode),
        ]
    );
}

#[test]
fn test_apply_uses_config() {
    let registry = CodecRegistry::new();
    let accel = HwAccelerator::with_probe(available).with_catalog(vp8_catalog());

    let report = accel.apply(&registry, &HwAccelConfig::new(true, Some("HW".to_string())));

    assert!(report.warnings.is_empty());
    assert!(registry.get_encoder(LogicalCodec::Vp8).is_hardware());
}

#[test]
fn test_readers_keep_old_snapshot() {
    let registry = CodecRegistry::new();
    let accel = HwAccelerator::with_probe(available).with_catalog(vp8_catalog());

    let before = registry.snapshot();
    accel.activate(&registry, true, Some("hw"));

    assert_eq!(*before, RegistrySnapshot::software_defaults());
    assert!(registry.snapshot().encoder(LogicalCodec::Vp8).is_hardware());
}

#[tokio::test]
async fn test_activate_async() {
    let registry = Arc::new(CodecRegistry::new());
    let accel = Arc::new(HwAccelerator::with_probe(available).with_catalog(vp8_catalog()));

    let report = accel
        .activate_async(
            Arc::clone(&registry),
            HwAccelConfig::new(true, Some("hw".to_string())),
        )
        .await
        .unwrap();

    assert_eq!(report.hardware_count(), 2);
    assert!(registry.get_decoder(LogicalCodec::Vp8).is_hardware());
}
