use crate::repo;
use anyhow::{Context, Result};
use std::path::Path;
use std::process::{Command, Stdio};

/// Quality gate steps, run in order; the first failure stops the gate.
const STEPS: &[&[&str]] = &[
    &["fetch"],
    &["check", "--workspace"],
    &["test", "--all"],
    &["fmt", "--all", "--", "--check"],
    &["clippy", "--workspace", "--", "-D", "warnings"],
    &["build", "--release", "--bin", "flex-support-cli"],
];

pub fn run() -> Result<()> {
    let root = repo::repo_root()?;
    for args in STEPS {
        run_step(&root, args)?;
    }
    eprintln!("==> preflight passed ({} steps)", STEPS.len());
    Ok(())
}

fn run_step(root: &Path, args: &[&str]) -> Result<()> {
    let label = format!("cargo {}", args.join(" "));
    eprintln!("==> {label}");
    let status = Command::new("cargo")
        .args(args)
        .current_dir(root)
        .stdin(Stdio::null())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .with_context(|| format!("failed to spawn {label}"))?;

    if !status.success() {
        anyhow::bail!("{label} failed (status {status})");
    }
    Ok(())
}
