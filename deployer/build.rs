//! Build script for asdeploy
//! Stamps the binary with the commit and build time shown by `--version`

use std::process::Command;

use chrono::Utc;

fn git(args: &[&str]) -> Option<String> {
    let output = Command::new("git").args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    String::from_utf8(output.stdout)
        .ok()
        .map(|s| s.trim().to_string())
}

fn main() {
    // Packagers building from a tarball pass the commit explicitly
    let git_hash = std::env::var("ASDEPLOY_GIT_HASH").ok().or_else(|| {
        let hash = git(&["rev-parse", "--short=10", "HEAD"])?;
        let dirty = git(&["status", "--porcelain"]).is_some_and(|s| !s.is_empty());
        Some(if dirty { format!("{}-dirty", hash) } else { hash })
    });

    println!(
        "cargo:rustc-env=GIT_HASH={}",
        git_hash.unwrap_or_else(|| "unknown".to_string())
    );
    println!(
        "cargo:rustc-env=BUILD_TIME={}",
        Utc::now().format("%Y-%m-%dT%H:%M:%SZ")
    );

    println!("cargo:rerun-if-env-changed=ASDEPLOY_GIT_HASH");
    println!("cargo:rerun-if-changed=../.git/HEAD");
}
