// SPDX-License-Identifier: MPL-2.0

//! Integration tests for configuration module

use rtc_hwaccel::HwAccelConfig;

#[test]
fn test_config_default() {
    let config = HwAccelConfig::default();

    assert!(
        !config.enabled,
        "Hardware acceleration should be disabled by default"
    );
    assert_eq!(config.normalized_backend(), None);
}

#[test]
fn test_blank_backend_is_unset() {
    let config = HwAccelConfig::new(true, Some("  ".to_string()));
    assert_eq!(config.normalized_backend(), None);

    let config = HwAccelConfig::new(true, Some(" vaapi ".to_string()));
    assert_eq!(config.normalized_backend(), Some("vaapi"));
}

#[test]
fn test_config_from_partial_json() {
    // Hosts embedding the config may omit fields
    let config: HwAccelConfig = serde_json::from_str(r#"{"enabled": true}"#).unwrap();
    assert!(config.enabled);
    assert_eq!(config.backend, None);
}
