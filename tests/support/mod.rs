use anyhow::{Context, Result, bail};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

pub fn repo_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
}

pub fn shipped_catalog() -> PathBuf {
    repo_root().join("catalog").join("documents.json")
}

/// Command for a crate binary with catalog-related environment cleared.
pub fn helper_command(name: &str) -> Command {
    let path = match name {
        "catalog-export" => env!("CARGO_BIN_EXE_catalog-export"),
        "catalog-lookup" => env!("CARGO_BIN_EXE_catalog-lookup"),
        other => panic!("unknown helper binary {other}"),
    };
    let mut cmd = Command::new(path);
    cmd.env_remove("DOCCATALOG_ROOT")
        .env_remove("DOCCATALOG_CATALOG")
        .env_remove("DOCCATALOG_LOG");
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

/// Lay out a throwaway site with `catalog/documents.json` holding `catalog`.
pub fn site_with_catalog(catalog: &Value) -> Result<TempDir> {
    let dir = TempDir::new()?;
    write_catalog(dir.path(), catalog)?;
    Ok(dir)
}

pub fn write_catalog(site_root: &Path, catalog: &Value) -> Result<PathBuf> {
    let catalog_dir = site_root.join("catalog");
    fs::create_dir_all(&catalog_dir)?;
    let path = catalog_dir.join("documents.json");
    fs::write(&path, serde_json::to_vec_pretty(catalog)?)?;
    Ok(path)
}
