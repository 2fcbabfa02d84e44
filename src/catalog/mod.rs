//! Document catalog wiring.
//!
//! This module wraps the JSON catalog under `catalog/documents.json` so the
//! site tooling can load a validated snapshot with consistent category ids.
//! Types in `model` mirror the file; callers use `DocumentCatalog` for the
//! derived views and name lookups.

pub mod identity;
pub mod index;
pub mod model;

pub use identity::{CategoryId, DocumentKind, DownloadMode, ViewerPage, ViewerRoute};
pub use index::{CATALOG_SCHEMA_VERSION, DocumentCatalog};
pub use model::{
    CatalogExport, CatalogFile, Category, CategorySpec, DocumentDescriptor, DocumentSpec,
};

pub use model::load_catalog_from_path;
