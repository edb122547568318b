use std::process::Command;

use anyhow::{Context, Result};

/// Published crates, checked one by one so a missing dependency declaration
/// is not masked by feature unification across the workspace.
const CRATES: &[&str] = &["samplify-domain", "samplify-core", "samplify-infra"];

pub fn check_each_crate() -> Result<()> {
    println!("Checking {} crates in isolation...", CRATES.len());

    for (index, krate) in CRATES.iter().enumerate() {
        println!("\n[{}/{}] cargo check -p {krate} --all-targets", index + 1, CRATES.len());

        let status = Command::new("cargo")
            .args(["check", "-p", krate, "--all-targets"])
            .status()
            .with_context(|| format!("Failed to run cargo check for '{krate}'"))?;

        if !status.success() {
            anyhow::bail!("Crate '{krate}' failed to compile on its own");
        }

        println!("✅ {krate} compiled successfully");
    }

    Ok(())
}
