//! Loads the document catalog and emits the derived views as JSON.
//!
//! The output carries `categories` (with generated ids) and `flatItems`, the
//! structure the site's viewers and search read. `--check` only validates
//! and prints a summary, which makes it usable as a pre-publish gate.

use anyhow::{Context, Result, bail};
use doccatalog::runtime::{init_logging, resolve_catalog_path};
use doccatalog::{CatalogExport, DocumentCatalog};
use std::env;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

fn main() {
    init_logging();
    if let Err(err) = run() {
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let args = CliArgs::parse()?;
    let catalog_path = resolve_catalog_path(args.catalog.as_deref())?;
    let catalog = DocumentCatalog::load(&catalog_path)?;

    if args.check {
        println!(
            "{}: {} categories, {} documents",
            catalog_path.display(),
            catalog.categories().len(),
            catalog.len()
        );
        return Ok(());
    }

    let rendered = render(&catalog.export(), args.pretty)?;
    match args.out {
        Some(out) => write_atomically(&out, &rendered)?,
        None => println!("{rendered}"),
    }
    Ok(())
}

fn render(export: &CatalogExport, pretty: bool) -> Result<String> {
    let rendered = if pretty {
        serde_json::to_string_pretty(export)?
    } else {
        serde_json::to_string(export)?
    };
    Ok(rendered)
}

/// Write via a sibling temp file so readers never observe a partial export.
fn write_atomically(path: &Path, contents: &str) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let mut tmp = NamedTempFile::new_in(&dir)
        .with_context(|| format!("creating temp file in {}", dir.display()))?;
    tmp.write_all(contents.as_bytes())?;
    tmp.write_all(b"\n")?;
    tmp.persist(path)
        .with_context(|| format!("writing {}", path.display()))?;
    tracing::info!(path = %path.display(), "wrote catalog export");
    Ok(())
}

struct CliArgs {
    catalog: Option<PathBuf>,
    out: Option<PathBuf>,
    pretty: bool,
    check: bool,
}

impl CliArgs {
    fn parse() -> Result<Self> {
        let mut args = env::args_os().skip(1);
        let mut catalog: Option<PathBuf> = None;
        let mut out: Option<PathBuf> = None;
        let mut pretty = false;
        let mut check = false;

        while let Some(arg_os) = args.next() {
            let arg = arg_os
                .into_string()
                .map_err(|_| anyhow::anyhow!("argument is not valid UTF-8"))?;
            match arg.as_str() {
                "--catalog" => {
                    catalog = Some(PathBuf::from(next_value(&mut args, "--catalog")?));
                }
                "--out" => {
                    out = Some(PathBuf::from(next_value(&mut args, "--out")?));
                }
                "--pretty" => pretty = true,
                "--check" => check = true,
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                other => bail!("unknown flag: {other}\n{}", usage()),
            }
        }

        if check && out.is_some() {
            bail!("--check does not write output; drop --out");
        }

        Ok(CliArgs {
            catalog,
            out,
            pretty,
            check,
        })
    }
}

fn next_value(args: &mut impl Iterator<Item = std::ffi::OsString>, flag: &str) -> Result<String> {
    args.next()
        .map(|os| {
            os.into_string()
                .map_err(|_| anyhow::anyhow!("value for {flag} is not valid UTF-8"))
        })
        .transpose()?
        .ok_or_else(|| anyhow::anyhow!("missing value for {flag}"))
}

fn usage() -> &'static str {
    "Usage: catalog-export [--catalog PATH] [--out PATH] [--pretty] [--check]\n\
Loads the document catalog (default: DOCCATALOG_CATALOG or <site root>/catalog/documents.json), validates it, and prints categories with generated ids plus the flattened document list as JSON.\n"
}

fn print_usage() {
    print!("{}", usage());
}
