//! Composes the `vmcparser --version` detail line.
//!
//! The line reads `<version> (<commit>[-dirty], <target>, <profile>)`.
//! `VMCPARSER_COMMIT` overrides the commit for builds outside a git checkout.

use std::env;
use std::process::Command;

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=VMCPARSER_COMMIT");

    let version = env::var("CARGO_PKG_VERSION").unwrap_or_default();
    let target = env::var("TARGET").unwrap_or_else(|_| "unknown-target".to_string());
    let profile = env::var("PROFILE").unwrap_or_else(|_| "unknown".to_string());

    let commit = match env::var("VMCPARSER_COMMIT") {
        Ok(commit) if !commit.trim().is_empty() => commit.trim().to_string(),
        _ => match git(&["rev-parse", "--short=9", "HEAD"]) {
            Some(commit) if is_dirty() => format!("{commit}-dirty"),
            Some(commit) => commit,
            None => "unknown commit".to_string(),
        },
    };

    println!("cargo:rustc-env=VMCPARSER_LONG_VERSION={version} ({commit}, {target}, {profile})");
}

fn is_dirty() -> bool {
    git(&["status", "--porcelain", "--untracked-files=no"]).is_some()
}

/// Trimmed stdout of a successful git invocation, `None` when empty.
fn git(args: &[&str]) -> Option<String> {
    let output = Command::new("git").args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    let text = String::from_utf8(output.stdout).ok()?;
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}
