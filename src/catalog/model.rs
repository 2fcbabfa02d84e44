//! Deserializable representation of `catalog/documents.json` and the derived
//! records built from it.
//!
//! `CatalogFile`, `CategorySpec` and `DocumentSpec` mirror what authors write;
//! they keep the document type as a raw string so construction can report
//! the exact entry that carries an unknown tag. `Category` and
//! `DocumentDescriptor` are the validated records exposed to consumers.

use crate::catalog::identity::{CategoryId, DocumentKind, ViewerRoute};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Clone, Debug, Deserialize)]
/// Full catalog as stored on disk.
pub struct CatalogFile {
    pub schema_version: String,
    #[serde(default)]
    pub categories: Vec<CategorySpec>,
}

#[derive(Clone, Debug, Eq, PartialEq, Deserialize)]
/// Category literal as declared by authors; ids are never supplied here.
pub struct CategorySpec {
    pub name: String,
    #[serde(default)]
    pub items: Vec<DocumentSpec>,
}

#[derive(Clone, Debug, Eq, PartialEq, Deserialize)]
/// Document literal as declared by authors.
pub struct DocumentSpec {
    pub name: String,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl CategorySpec {
    pub fn new(name: impl Into<String>, items: Vec<DocumentSpec>) -> Self {
        Self {
            name: name.into(),
            items,
        }
    }
}

impl DocumentSpec {
    pub fn new(
        name: impl Into<String>,
        title: impl Into<String>,
        kind: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            title: title.into(),
            kind: kind.into(),
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
/// Category with its derived id.
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub items: Vec<DocumentDescriptor>,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
/// One document: path or filename, display title and content type.
pub struct DocumentDescriptor {
    pub name: String,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: DocumentKind,
}

impl DocumentDescriptor {
    /// Relative path of the file the viewer opens.
    ///
    /// Markdown and PDF documents are folders holding `index.md` or
    /// `index.pdf`; spreadsheets are referenced by their own filename.
    pub fn source_path(&self) -> String {
        match self.kind.index_file() {
            Some(index) => format!("{}/{}", self.name.trim_end_matches('/'), index),
            None => self.name.clone(),
        }
    }

    pub fn viewer(&self) -> ViewerRoute {
        self.kind.viewer()
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
/// The derived views handed to the site's viewers and search.
pub struct CatalogExport {
    pub categories: Vec<Category>,
    #[serde(rename = "flatItems")]
    pub flat_items: Vec<DocumentDescriptor>,
}

/// Read and parse a catalog file from disk without additional validation.
pub fn load_catalog_from_path(path: &Path) -> Result<CatalogFile> {
    let data = fs::read_to_string(path)?;
    let catalog: CatalogFile = serde_json::from_str(&data)?;
    Ok(catalog)
}
