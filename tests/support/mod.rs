use anyhow::{Context, Result, bail};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

pub fn catalog_compat_binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_catalog-compat"))
}

pub fn repo_schema_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join(catalog_compat::report::REPORT_SCHEMA_PATH)
}

/// Command for the binary with config env vars cleared so the host
/// environment cannot redirect a test run.
pub fn catalog_compat_command(cwd: &Path) -> Command {
    let mut cmd = Command::new(catalog_compat_binary());
    cmd.current_dir(cwd)
        .env_remove(catalog_compat::INPUT_PATH_ENV)
        .env_remove(catalog_compat::OUTPUT_DIR_ENV)
        .env_remove("RUST_LOG");
    cmd
}

pub fn run_command(mut cmd: Command) -> Result<Output> {
    let output = cmd
        .output()
        .with_context(|| format!("failed to run command: {:?}", cmd))?;
    if output.status.success() {
        Ok(output)
    } else {
        bail!(
            "command {:?} failed: status {:?}\nstdout: {}\nstderr: {}",
            cmd,
            output.status.code(),
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        )
    }
}

pub fn run_command_expect_failure(mut cmd: Command) -> Result<Output> {
    let output = cmd
        .output()
        .with_context(|| format!("failed to run command: {:?}", cmd))?;
    if output.status.success() {
        bail!(
            "command {:?} unexpectedly succeeded\nstdout: {}",
            cmd,
            String::from_utf8_lossy(&output.stdout)
        );
    }
    Ok(output)
}

pub fn write_json(path: &Path, value: &Value) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, serde_json::to_vec_pretty(value)?)
        .with_context(|| format!("writing fixture {}", path.display()))
}
