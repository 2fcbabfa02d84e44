//! Shared library for the document viewer site's catalog.
//!
//! The site groups its manuals, excerpts and spreadsheets into categories
//! declared in `catalog/documents.json`. This crate loads that list, derives
//! positional category ids (`cat-0`, `cat-1`, ...) and the flat document list
//! used for search and title display, and exports both for the viewers. The
//! viewers themselves (Markdown, PDF, spreadsheet) live outside this crate and
//! only consume the exported structure.

pub mod catalog;
pub mod error;
pub mod runtime;
mod schema_loader;

pub use catalog::{
    CATALOG_SCHEMA_VERSION, CatalogExport, CatalogFile, Category, CategoryId, CategorySpec,
    DocumentCatalog, DocumentDescriptor, DocumentKind, DocumentSpec, DownloadMode, ViewerPage,
    ViewerRoute, load_catalog_from_path,
};
pub use error::ValidationError;
pub use runtime::{default_catalog_path, find_site_root, resolve_catalog_path};
