// build.rs

use std::env;
use std::path::Path;
use std::process::Command;

/// Length of an abbreviated git revision, matching `git rev-parse --short`.
const SHORT_REVISION_LEN: usize = 7;

fn main() {
    // --- 1. Inform Cargo about rerun triggers ---
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=SIDETABLE_BUILD_REV");
    // Only watch git metadata when it exists, otherwise Cargo reruns on every build.
    if Path::new(".git/HEAD").exists() {
        println!("cargo:rerun-if-changed=.git/HEAD");
        println!("cargo:rerun-if-changed=.git/index");
    }

    // --- 2. Determine the revision ---
    // Priority 1: an explicit override, used by packagers building from a tarball.
    // Priority 2: the git checkout the crate is being built from.
    let revision = env::var("SIDETABLE_BUILD_REV")
        .ok()
        .map(|rev| rev.trim().to_string())
        .filter(|rev| !rev.is_empty())
        .or_else(git_revision);

    // --- 3. Assemble the version string ---
    let package_version = env::var("CARGO_PKG_VERSION").unwrap_or_else(|_| "dev".to_string());
    let full_version = match &revision {
        Some(rev) => {
            let short: String = rev.chars().take(SHORT_REVISION_LEN).collect();
            let dirty = if git_worktree_modified() { ", modified" } else { "" };
            println!("cargo:rustc-env=SIDETABLE_GIT_REV={}", short);
            format!("{} (rev: {}{})", package_version, short, dirty)
        }
        None => package_version,
    };

    println!("cargo:rustc-env=SIDETABLE_VERSION={}", full_version);
}

/// Returns the full hash of `HEAD`, or `None` outside a git checkout.
fn git_revision() -> Option<String> {
    let output = Command::new("git")
        .args(["rev-parse", "HEAD"])
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    let rev = String::from_utf8(output.stdout).ok()?;
    let rev = rev.trim();
    (!rev.is_empty()).then(|| rev.to_string())
}

fn git_worktree_modified() -> bool {
    Command::new("git")
        .args(["status", "--porcelain", "--untracked-files=no"])
        .output()
        .map(|output| output.status.success() && !output.stdout.is_empty())
        .unwrap_or(false)
}
