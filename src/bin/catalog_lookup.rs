//! Resolves a document name against the catalog.
//!
//! Prints the descriptor together with its category id, the file the viewer
//! opens and the viewer route, or lists every document name in flattened
//! order. Duplicate names resolve to the earliest entry.

use anyhow::{Result, bail};
use doccatalog::runtime::{init_logging, resolve_catalog_path};
use doccatalog::{DocumentCatalog, DocumentDescriptor, ViewerRoute};
use serde::Serialize;
use std::env;
use std::path::PathBuf;

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

    match args.query {
        Query::List => {
            for item in catalog.flat_items() {
                println!("{}", item.name);
            }
        }
        Query::Name(name) => {
            let Some(item) = catalog.find_document(&name) else {
                bail!("document not found in {}: {name}", catalog_path.display());
            };
            let category_id = catalog
                .category_of(&name)
                .map(|category| category.id.to_string());
            let resolved = Resolved::new(item, category_id);
            println!("{}", serde_json::to_string(&resolved)?);
        }
    }
    Ok(())
}

#[derive(Serialize)]
struct Resolved<'a> {
    #[serde(flatten)]
    item: &'a DocumentDescriptor,
    category_id: Option<String>,
    source_path: String,
    viewer: ViewerRoute,
}

impl<'a> Resolved<'a> {
    fn new(item: &'a DocumentDescriptor, category_id: Option<String>) -> Self {
        Self {
            item,
            category_id,
            source_path: item.source_path(),
            viewer: item.viewer(),
        }
    }
}

enum Query {
    Name(String),
    List,
}

struct CliArgs {
    catalog: Option<PathBuf>,
    query: Query,
}

impl CliArgs {
    fn parse() -> Result<Self> {
        let mut args = env::args_os().skip(1);
        let mut catalog: Option<PathBuf> = None;
        let mut query: Option<Query> = None;

        while let Some(arg_os) = args.next() {
            let arg = arg_os
                .into_string()
                .map_err(|_| anyhow::anyhow!("argument is not valid UTF-8"))?;
            match arg.as_str() {
                "--catalog" => {
                    catalog = Some(PathBuf::from(next_value(&mut args, "--catalog")?));
                }
                "--name" => {
                    let name = next_value(&mut args, "--name")?;
                    if query.is_some() {
                        bail!("--name/--list may only be provided once");
                    }
                    query = Some(Query::Name(name));
                }
                "--list" => {
                    if query.is_some() {
                        bail!("--name/--list may only be provided once");
                    }
                    query = Some(Query::List);
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                other => bail!("unknown flag: {other}\n{}", usage()),
            }
        }

        let Some(query) = query else {
            bail!("one of --name or --list is required\n{}", usage());
        };

        Ok(CliArgs { catalog, query })
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
    "Usage: catalog-lookup [--catalog PATH] (--name NAME | --list)\n\
Resolves a document name to its title, type, category id, source file and viewer page, or lists every document name in catalog order.\n"
}

fn print_usage() {
    print!("{}", usage());
}
