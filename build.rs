// SPDX-License-Identifier: GPL-3.0-only

use std::process::Command;

fn main() {
    println!("cargo::rerun-if-changed=.git/HEAD");
    println!("cargo::rerun-if-env-changed=RTC_HWACCEL_VERSION");

    // Packagers without a git checkout pin the version explicitly
    let version = std::env::var("RTC_HWACCEL_VERSION").unwrap_or_else(|_| describe_version());

    println!("cargo::rustc-env=GIT_VERSION={}", version);
}

/// Crate version, suffixed with the short commit hash when building from git
///
/// - "0.1.0" outside a repository
/// - "0.1.0-abcdef1" at a clean commit
/// - "0.1.0-dirty-abcdef1" with uncommitted changes
fn describe_version() -> String {
    let base = std::env::var("CARGO_PKG_VERSION").unwrap_or_else(|_| "0.0.0".to_string());

    let Some(hash) = git(&["rev-parse", "--short", "HEAD"]) else {
        return base;
    };

    let dirty = git(&["status", "--porcelain", "--untracked-files=no"])
        .map(|status| !status.is_empty())
        .unwrap_or(false);

    if dirty {
        format!("{}-dirty-{}", base, hash)
    } else {
        format!("{}-{}", base, hash)
    }
}

fn git(args: &[&str]) -> Option<String> {
    let output = Command::new("git").args(args).output().ok()?;

    if output.status.success() {
        Some(String::from_utf8_lossy(&output.stdout).trim().to_string())
    } else {
        None
    }
}
