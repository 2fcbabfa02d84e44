//! Validated document catalog plus its derived views.
//!
//! Construction assigns positional category ids and flattens every
//! category's items into one order-preserving list. It is strict about
//! malformed entries (empty names, unknown document types) and about
//! unknown schema versions so the site never serves a catalog that only
//! half matches its viewers.

use crate::catalog::load_catalog_from_path;
use crate::catalog::{
    CatalogExport, CatalogFile, Category, CategoryId, CategorySpec, DocumentDescriptor,
    DocumentKind, DocumentSpec,
};
use crate::error::ValidationError;
use crate::schema_loader::{
    SchemaLoadOptions, compile_json_schema, load_json_schema, validate_instance,
};
use anyhow::{Context, Result, bail};
use serde_json::Value;
use std::collections::BTreeSet;
use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Schema version understood by this build.
pub const CATALOG_SCHEMA_VERSION: &str = "document_catalog_v1";

const CATALOG_SCHEMA_FILE: &str = "schema/document_catalog.schema.json";

const EMBEDDED_CATALOG_SCHEMA: &str =
    include_str!("../../schema/document_catalog.schema.json");

#[derive(Clone, Debug, Default, Eq, PartialEq)]
/// Categories with derived ids and the flattened document list.
pub struct DocumentCatalog {
    categories: Vec<Category>,
    flat_items: Vec<DocumentDescriptor>,
}

impl DocumentCatalog {
    /// Build the catalog from category literals in declaration order.
    ///
    /// The category at position `i` receives id `cat-i`. Items are copied
    /// into the flat list in category-then-item order. The first malformed
    /// entry aborts construction.
    pub fn build(specs: &[CategorySpec]) -> Result<Self, ValidationError> {
        let mut categories = Vec::with_capacity(specs.len());
        for (position, spec) in specs.iter().enumerate() {
            if spec.name.trim().is_empty() {
                return Err(ValidationError::EmptyCategoryName { index: position });
            }
            let items = spec
                .items
                .iter()
                .enumerate()
                .map(|(index, item)| descriptor_from_spec(&spec.name, index, item))
                .collect::<Result<Vec<_>, _>>()?;
            categories.push(Category {
                id: CategoryId::for_position(position),
                name: spec.name.clone(),
                items,
            });
        }

        let flat_items: Vec<DocumentDescriptor> = categories
            .iter()
            .flat_map(|category| category.items.iter().cloned())
            .collect();

        tracing::debug!(
            categories = categories.len(),
            documents = flat_items.len(),
            "built document catalog"
        );

        Ok(Self {
            categories,
            flat_items,
        })
    }

    /// Build from a parsed catalog file after checking its schema version.
    pub fn from_file(file: &CatalogFile) -> Result<Self> {
        validate_schema_version(&file.schema_version)?;
        Ok(Self::build(&file.categories)?)
    }

    /// Load, schema-check and build the catalog stored at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        validate_against_schema(path)?;

        let file =
            load_catalog_from_path(path).with_context(|| format!("loading {}", path.display()))?;
        let catalog =
            Self::from_file(&file).with_context(|| format!("validating {}", path.display()))?;
        tracing::info!(
            path = %path.display(),
            categories = catalog.categories.len(),
            documents = catalog.flat_items.len(),
            "loaded document catalog"
        );
        Ok(catalog)
    }

    /// Categories in declaration order, each carrying its derived id.
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Every document across all categories, in category-then-item order.
    pub fn flat_items(&self) -> &[DocumentDescriptor] {
        &self.flat_items
    }

    pub fn category(&self, id: &CategoryId) -> Option<&Category> {
        self.categories.iter().find(|category| &category.id == id)
    }

    /// Resolve a document by name.
    ///
    /// Names are not required to be unique; the earliest entry in the flat
    /// list wins.
    pub fn find_document(&self, name: &str) -> Option<&DocumentDescriptor> {
        self.flat_items.iter().find(|item| item.name == name)
    }

    /// Display title for a document name.
    pub fn title_for(&self, name: &str) -> Option<&str> {
        self.find_document(name).map(|item| item.title.as_str())
    }

    /// Category holding the document that `find_document` resolves to.
    pub fn category_of(&self, name: &str) -> Option<&Category> {
        self.categories
            .iter()
            .find(|category| category.items.iter().any(|item| item.name == name))
    }

    /// Number of documents across all categories.
    pub fn len(&self) -> usize {
        self.flat_items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flat_items.is_empty()
    }

    /// Snapshot of the produced interface for serialization.
    pub fn export(&self) -> CatalogExport {
        CatalogExport {
            categories: self.categories.clone(),
            flat_items: self.flat_items.clone(),
        }
    }
}

fn descriptor_from_spec(
    category: &str,
    index: usize,
    spec: &DocumentSpec,
) -> Result<DocumentDescriptor, ValidationError> {
    let empty_field = |field: &'static str| ValidationError::EmptyField {
        category: category.to_string(),
        index,
        field,
    };
    if spec.name.trim().is_empty() {
        return Err(empty_field("name"));
    }
    if spec.title.trim().is_empty() {
        return Err(empty_field("title"));
    }
    let kind = DocumentKind::from_tag(&spec.kind).ok_or_else(|| ValidationError::UnknownType {
        category: category.to_string(),
        index,
        value: spec.kind.clone(),
    })?;
    Ok(DocumentDescriptor {
        name: spec.name.clone(),
        title: spec.title.clone(),
        kind,
    })
}

fn validate_schema_version(schema_version: &str) -> Result<()> {
    if schema_version.is_empty() {
        bail!("schema_version must not be empty");
    }

    let allowed = allowed_schema_versions();
    if !allowed.contains(schema_version) {
        bail!(
            "schema_version '{}' not in allowed set {:?}",
            schema_version,
            allowed
        );
    }

    Ok(())
}

fn allowed_schema_versions() -> BTreeSet<String> {
    BTreeSet::from_iter([CATALOG_SCHEMA_VERSION.to_string()])
}

fn validate_against_schema(catalog_path: &Path) -> Result<()> {
    let catalog_file = File::open(catalog_path)
        .with_context(|| format!("opening catalog {}", catalog_path.display()))?;
    let catalog_value: Value = serde_json::from_reader(BufReader::new(catalog_file))
        .with_context(|| format!("parsing catalog {}", catalog_path.display()))?;

    let source = resolve_catalog_schema(catalog_path);
    let allowed = allowed_schema_versions();
    let options = SchemaLoadOptions {
        allowed_versions: Some(&allowed),
        ..Default::default()
    };
    let schema = match &source {
        CatalogSchemaSource::Site(path) => load_json_schema(path, options),
        CatalogSchemaSource::Embedded => serde_json::from_str::<Value>(EMBEDDED_CATALOG_SCHEMA)
            .context("parsing embedded catalog schema")
            .and_then(|value| compile_json_schema(&value, "(embedded)", options)),
    }
    .with_context(|| format!("loading catalog schema {source}"))?;
    tracing::debug!(
        schema = %source,
        version = %schema.schema_version,
        "validating catalog against schema"
    );

    if let Err(details) = validate_instance(&schema.compiled, &catalog_value) {
        bail!(
            "document catalog {} failed schema validation:\n{}",
            catalog_path.display(),
            details
        );
    }
    Ok(())
}

/// Where the schema used to validate a catalog comes from.
#[derive(Debug, Eq, PartialEq)]
enum CatalogSchemaSource {
    /// `<root>/schema/...` shipped with the site.
    Site(PathBuf),
    /// The copy compiled into this crate.
    Embedded,
}

impl fmt::Display for CatalogSchemaSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogSchemaSource::Site(path) => write!(f, "{}", path.display()),
            CatalogSchemaSource::Embedded => f.write_str("(embedded)"),
        }
    }
}

/// Prefer the schema shipped with the site (the catalog lives at
/// `<root>/catalog/documents.json`), else the embedded copy.
fn resolve_catalog_schema(catalog_path: &Path) -> CatalogSchemaSource {
    if let Some(base) = catalog_path.parent().and_then(|p| p.parent()) {
        let candidate = base.join(CATALOG_SCHEMA_FILE);
        if candidate.exists() {
            return CatalogSchemaSource::Site(candidate);
        }
    }
    CatalogSchemaSource::Embedded
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use tempfile::{NamedTempFile, TempDir};

    fn doc(name: &str, title: &str, kind: &str) -> DocumentSpec {
        DocumentSpec::new(name, title, kind)
    }

    fn sample_specs() -> Vec<CategorySpec> {
        vec![
            CategorySpec::new("A", vec![doc("x", "X", "md")]),
            CategorySpec::new("B", Vec::new()),
            CategorySpec::new("C", vec![doc("y", "Y", "pdf"), doc("z", "Z", "excel")]),
        ]
    }

    #[test]
    fn assigns_positional_ids_and_flattens_in_order() {
        let catalog = DocumentCatalog::build(&sample_specs()).unwrap();
        let ids: Vec<&str> = catalog.categories().iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, ["cat-0", "cat-1", "cat-2"]);

        let names: Vec<&str> = catalog.flat_items().iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, ["x", "y", "z"]);
        assert_eq!(catalog.flat_items()[2].kind, DocumentKind::Excel);
        assert!(catalog.categories()[1].items.is_empty());
    }

    #[test]
    fn flat_list_is_concatenation_of_category_items() {
        let catalog = DocumentCatalog::build(&sample_specs()).unwrap();
        let concatenated: Vec<DocumentDescriptor> = catalog
            .categories()
            .iter()
            .flat_map(|c| c.items.clone())
            .collect();
        assert_eq!(catalog.flat_items(), concatenated.as_slice());
        let total: usize = catalog.categories().iter().map(|c| c.items.len()).sum();
        assert_eq!(catalog.len(), total);
    }

    #[test]
    fn construction_is_deterministic() {
        let specs = sample_specs();
        let first = DocumentCatalog::build(&specs).unwrap();
        let second = DocumentCatalog::build(&specs).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn empty_input_yields_empty_catalog() {
        let catalog = DocumentCatalog::build(&[]).unwrap();
        assert!(catalog.categories().is_empty());
        assert!(catalog.is_empty());
    }

    #[test]
    fn empty_categories_still_take_a_position() {
        let specs = vec![
            CategorySpec::new("E1", Vec::new()),
            CategorySpec::new("E2", Vec::new()),
            CategorySpec::new("Full", vec![doc("x", "X", "md")]),
        ];
        let catalog = DocumentCatalog::build(&specs).unwrap();
        assert_eq!(catalog.categories()[2].id, CategoryId::for_position(2));
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn rejects_unknown_type() {
        let specs = vec![CategorySpec::new(
            "Docs",
            vec![doc("a", "A", "md"), doc("b", "B", "docx")],
        )];
        let err = DocumentCatalog::build(&specs).unwrap_err();
        assert_eq!(
            err,
            ValidationError::UnknownType {
                category: "Docs".to_string(),
                index: 1,
                value: "docx".to_string(),
            }
        );
    }

    #[test]
    fn rejects_empty_fields() {
        let err = DocumentCatalog::build(&[CategorySpec::new("  ", Vec::new())]).unwrap_err();
        assert_eq!(err, ValidationError::EmptyCategoryName { index: 0 });

        let err =
            DocumentCatalog::build(&[CategorySpec::new("C", vec![doc("", "T", "md")])]).unwrap_err();
        assert!(matches!(err, ValidationError::EmptyField { field: "name", .. }));

        let err =
            DocumentCatalog::build(&[CategorySpec::new("C", vec![doc("n", " ", "pdf")])]).unwrap_err();
        assert!(matches!(err, ValidationError::EmptyField { field: "title", .. }));
    }

    #[test]
    fn first_error_in_declaration_order_wins() {
        let specs = vec![
            CategorySpec::new("First", vec![doc("a", "A", "bogus")]),
            CategorySpec::new("", Vec::new()),
        ];
        let err = DocumentCatalog::build(&specs).unwrap_err();
        assert!(matches!(err, ValidationError::UnknownType { ref category, .. } if category == "First"));
    }

    #[test]
    fn duplicate_names_resolve_to_earliest() {
        let specs = vec![
            CategorySpec::new("One", vec![doc("shared", "First", "md")]),
            CategorySpec::new("Two", vec![doc("shared", "Second", "pdf")]),
        ];
        let catalog = DocumentCatalog::build(&specs).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.title_for("shared"), Some("First"));
        assert_eq!(
            catalog.category_of("shared").map(|c| c.id.as_str()),
            Some("cat-0")
        );
        assert_eq!(catalog.title_for("missing"), None);
    }

    #[test]
    fn category_lookup_by_id() {
        let catalog = DocumentCatalog::build(&sample_specs()).unwrap();
        let category = catalog.category(&CategoryId("cat-2".to_string())).unwrap();
        assert_eq!(category.name, "C");
        assert!(catalog.category(&CategoryId("cat-9".to_string())).is_none());
    }

    #[test]
    fn from_file_rejects_unknown_schema_version() {
        let file: CatalogFile = serde_json::from_value(json!({
            "schema_version": "document_catalog_v0",
            "categories": []
        }))
        .unwrap();
        let err = DocumentCatalog::from_file(&file).unwrap_err();
        assert!(err.to_string().contains("document_catalog_v0"));
    }

    #[test]
    fn load_validates_against_schema() {
        let mut file = NamedTempFile::new().unwrap();
        serde_json::to_writer(
            &mut file,
            &json!({
                "schema_version": CATALOG_SCHEMA_VERSION,
                "categories": [
                    {"name": "A", "items": [{"name": "x", "title": "X", "type": "md"}]},
                    {"name": "B", "items": []}
                ]
            }),
        )
        .unwrap();
        let catalog = DocumentCatalog::load(file.path()).unwrap();
        assert_eq!(catalog.categories().len(), 2);
        assert_eq!(catalog.title_for("x"), Some("X"));

        let mut bad = NamedTempFile::new().unwrap();
        serde_json::to_writer(
            &mut bad,
            &json!({
                "schema_version": CATALOG_SCHEMA_VERSION,
                "categories": [{"id": "cat-7", "name": "A", "items": []}]
            }),
        )
        .unwrap();
        let err = DocumentCatalog::load(bad.path()).unwrap_err();
        assert!(format!("{err:#}").contains("failed schema validation"));
    }

    #[test]
    fn schema_falls_back_to_embedded_copy() {
        let site = TempDir::new().unwrap();
        fs::create_dir_all(site.path().join("catalog")).unwrap();
        let catalog_path = site.path().join("catalog/documents.json");
        fs::write(
            &catalog_path,
            serde_json::to_vec(&json!({
                "schema_version": CATALOG_SCHEMA_VERSION,
                "categories": [{"name": "Only", "items": [{"name": "a.xlsx", "title": "A", "type": "excel"}]}]
            }))
            .unwrap(),
        )
        .unwrap();
        assert!(!site.path().join("schema").exists());
        assert_eq!(resolve_catalog_schema(&catalog_path), CatalogSchemaSource::Embedded);

        let catalog = DocumentCatalog::load(&catalog_path).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.flat_items()[0].kind, DocumentKind::Excel);
    }

    #[test]
    fn site_schema_is_preferred_when_present() {
        let site = TempDir::new().unwrap();
        fs::create_dir_all(site.path().join("schema")).unwrap();
        let schema_path = site.path().join(CATALOG_SCHEMA_FILE);
        fs::write(&schema_path, EMBEDDED_CATALOG_SCHEMA).unwrap();
        let catalog_path = site.path().join("catalog/documents.json");
        assert_eq!(
            resolve_catalog_schema(&catalog_path),
            CatalogSchemaSource::Site(schema_path)
        );
    }

    #[test]
    fn embedded_schema_pins_current_version() {
        let value: Value = serde_json::from_str(EMBEDDED_CATALOG_SCHEMA).unwrap();
        let loaded =
            compile_json_schema(&value, "(embedded)", SchemaLoadOptions::default()).unwrap();
        assert_eq!(loaded.schema_version, CATALOG_SCHEMA_VERSION);
    }
}
