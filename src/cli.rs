// SPDX-License-Identifier: GPL-3.0-only

//! CLI commands
//!
//! - Activating hardware acceleration and showing the resulting coders
//! - Listing which catalog backends work on this machine

use rtc_hwaccel::codecs::catalog::alias_description;
use rtc_hwaccel::codecs::software_coders;
use rtc_hwaccel::{
    CapabilityProbe, CodecMode, CodecRegistry, GstProbe, HwAccelConfig, HwAccelerator,
    LogicalCodec, ProbeOutcome,
};
use serde::Serialize;

/// Run activation against the process-wide registry and print the outcome
pub fn activate(config: &HwAccelConfig) -> Result<(), Box<dyn std::error::Error>> {
    let report = HwAccelerator::new().apply(CodecRegistry::global(), config);
    println!("{}", report);
    println!();

    println!("Active coders:");
    for descriptor in CodecRegistry::global().snapshot().iter() {
        println!("  {}", descriptor);
    }

    Ok(())
}

/// One probed element in the listing
#[derive(Debug, Serialize)]
struct ListingEntry {
    /// Backend alias, or "software" for the default coders
    backend: String,
    codec: LogicalCodec,
    mode: CodecMode,
    element: String,
    outcome: ProbeOutcome,
}

/// Probe every backend in the catalog plus the software coders
pub fn list_backends(json: bool) -> Result<(), Box<dyn std::error::Error>> {
    gstreamer::init()?;

    let accel = HwAccelerator::new();
    let mut entries = Vec::new();

    for (alias, map) in accel.catalog().aliases() {
        for (codec, pair) in map.iter() {
            for mode in CodecMode::ALL {
                if let Some(element) = pair.get(mode) {
                    entries.push(ListingEntry {
                        backend: alias.to_string(),
                        codec,
                        mode,
                        element: element.to_string(),
                        outcome: accel.probe().probe(element, mode),
                    });
                }
            }
        }
    }

    for codec in LogicalCodec::ALL {
        for mode in CodecMode::ALL {
            let element = software_coders(codec).get(mode);
            entries.push(ListingEntry {
                backend: "software".to_string(),
                codec,
                mode,
                element: element.to_string(),
                outcome: GstProbe.probe(element, mode),
            });
        }
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    let mut current_backend: Option<&str> = None;
    for entry in &entries {
        if current_backend != Some(entry.backend.as_str()) {
            if current_backend.is_some() {
                println!();
            }
            match alias_description(&entry.backend) {
                Some(description) => println!("{} ({})", entry.backend, description),
                None => println!("{}", entry.backend),
            }
            current_backend = Some(entry.backend.as_str());
        }

        let mark = if entry.outcome.is_available() {
            "✓"
        } else {
            "✗"
        };
        println!(
            "  {} {} {:<8} {:<16} {}",
            mark,
            entry.codec.label(),
            entry.mode.role(),
            entry.element,
            entry.outcome
        );
    }

    let usable = entries
        .iter()
        .filter(|e| e.backend != "software" && e.outcome.is_available())
        .count();
    println!();
    println!("{} hardware coder(s) usable on this machine", usable);

    Ok(())
}
