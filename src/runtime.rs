//! Runtime helpers shared across binaries.
//!
//! Centralizes site-root discovery, catalog path resolution and logging
//! setup so the CLIs subscribe to the same behavior instead of
//! re-implementing it.

use anyhow::{Result, bail};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::filter::LevelFilter;

/// Catalog location relative to the site root; also the root sentinel.
pub const DEFAULT_CATALOG_RELATIVE: &str = "catalog/documents.json";

const ROOT_ENV: &str = "DOCCATALOG_ROOT";
const CATALOG_ENV: &str = "DOCCATALOG_CATALOG";
const LOG_ENV: &str = "DOCCATALOG_LOG";

/// Returns true when `candidate` holds a catalog at the default location.
fn is_site_root(candidate: &Path) -> bool {
    candidate.join(DEFAULT_CATALOG_RELATIVE).is_file()
}

/// Verifies that an explicit root hint points at a site with a catalog.
pub fn site_root_from_hint(hint: &str) -> Option<PathBuf> {
    if hint.is_empty() {
        return None;
    }
    let hint_path = PathBuf::from(hint);
    if !is_site_root(&hint_path) {
        return None;
    }
    fs::canonicalize(hint_path).ok()
}

/// Walk up from `start` to the first directory that looks like a site root.
pub fn search_upwards(start: &Path) -> Option<PathBuf> {
    let mut dir = fs::canonicalize(start).ok()?;
    loop {
        if is_site_root(&dir) {
            return Some(dir);
        }
        if !dir.pop() {
            break;
        }
    }
    None
}

/// Locate the site root.
///
/// Honors `DOCCATALOG_ROOT` when it points at a real site, then climbs up
/// from the current directory.
pub fn find_site_root() -> Result<PathBuf> {
    if let Ok(env_root) = env::var(ROOT_ENV) {
        if let Some(root) = site_root_from_hint(&env_root) {
            return Ok(root);
        }
        tracing::warn!(hint = %env_root, "{ROOT_ENV} does not contain {DEFAULT_CATALOG_RELATIVE}");
    }

    if let Ok(cwd) = env::current_dir() {
        if let Some(root) = search_upwards(&cwd) {
            return Ok(root);
        }
    }

    bail!(
        "Unable to locate a site root containing {DEFAULT_CATALOG_RELATIVE}. Set {ROOT_ENV} or pass --catalog."
    );
}

pub fn default_catalog_path(site_root: &Path) -> PathBuf {
    site_root.join(DEFAULT_CATALOG_RELATIVE)
}

/// Pick the catalog file: explicit flag, then `DOCCATALOG_CATALOG`, then the
/// default location under the discovered site root.
pub fn resolve_catalog_path(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }
    if let Some(path) = env::var_os(CATALOG_ENV).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(path));
    }
    Ok(default_catalog_path(&find_site_root()?))
}

/// Parse a `DOCCATALOG_LOG` value; unknown or empty values fall back to `warn`.
pub fn log_level_from(raw: Option<&str>) -> LevelFilter {
    raw.map(str::trim)
        .filter(|value| !value.is_empty())
        .and_then(|value| value.parse::<LevelFilter>().ok())
        .unwrap_or(LevelFilter::WARN)
}

/// Install the stderr fmt subscriber used by every binary.
///
/// Stdout stays reserved for command output.
pub fn init_logging() {
    let level = log_level_from(env::var(LOG_ENV).ok().as_deref());
    if let Err(err) = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
    {
        tracing::debug!("keeping existing tracing subscriber: {err}");
    }
}
