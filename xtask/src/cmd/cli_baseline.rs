use crate::repo;
use anyhow::Result;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Help screens captured into the baseline, one per command group.
pub const HELP_SCREENS: &[&[&str]] = &[
    &["--help"],
    &["profiles", "--help"],
    &["taskrouter", "--help"],
    &["conversations", "--help"],
];

pub fn run(out: Option<PathBuf>) -> Result<()> {
    let root = repo::repo_root()?;
    let out_path = out.unwrap_or_else(|| PathBuf::from("docs/cli-baseline.txt"));
    let out_path = if out_path.is_absolute() {
        out_path
    } else {
        root.join(out_path)
    };

    let mut digests = String::new();
    let mut screens = String::new();
    for args in HELP_SCREENS {
        let label = format!("flex-support-cli {}", args.join(" "));
        eprintln!("Capturing {label}...");
        let help = capture_help(&root, args)?;
        digests.push_str(&format!("{}  {label}\n", sha256_hex(help.as_bytes())));
        screens.push_str(&format!("# {label}\n{help}\n"));
    }

    let mut out_text = String::new();
    out_text.push_str("# help sha256\n");
    out_text.push_str(&digests);
    out_text.push('\n');
    out_text.push_str(&screens);

    if let Some(parent) = out_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&out_path, out_text)?;
    println!(
        "Saved baseline to {}",
        repo::rel_from(&root, &out_path).display()
    );
    Ok(())
}

fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

fn capture_help(root: &Path, args: &[&str]) -> Result<String> {
    let output = Command::new("cargo")
        .args(["run", "--quiet", "--bin", "flex-support-cli", "--"])
        .args(args)
        .current_dir(root)
        .output()?;
    if !output.status.success() {
        anyhow::bail!(
            "flex-support-cli {} failed (status {})",
            args.join(" "),
            output.status
        );
    }
    Ok(String::from_utf8_lossy(&output.stdout).to_string())
}
