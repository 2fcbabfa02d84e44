//! JSON Schema loader for catalog files.
//!
//! Reads a schema from disk or takes one already in memory, extracts the
//! `schema_version` const it pins, optionally checks that version against an
//! allowed set, and compiles a validator from the payload.

use anyhow::{Context, Result, anyhow, bail};
use jsonschema::JSONSchema;
use serde_json::Value;
use std::collections::BTreeSet;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Result of loading and compiling a JSON Schema.
pub(crate) struct SchemaLoadResult {
    pub schema_version: String,
    pub compiled: JSONSchema,
}

/// Controls how schemas are checked before compilation.
pub(crate) struct SchemaLoadOptions<'a> {
    /// Where to find the schema_version const inside the schema payload.
    pub schema_version_pointer: &'a str,
    /// Allowed schema_version values; enforced when present.
    pub allowed_versions: Option<&'a BTreeSet<String>>,
}

impl<'a> Default for SchemaLoadOptions<'a> {
    fn default() -> Self {
        Self {
            schema_version_pointer: "/properties/schema_version/const",
            allowed_versions: None,
        }
    }
}

pub(crate) fn load_json_schema(
    path: &Path,
    options: SchemaLoadOptions<'_>,
) -> Result<SchemaLoadResult> {
    let file = File::open(path).with_context(|| format!("opening schema {}", path.display()))?;
    let schema_value: Value = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("parsing schema {}", path.display()))?;

    compile_json_schema(&schema_value, &path.display().to_string(), options)
}

/// Compile an in-memory schema; `label` names it in error messages.
pub(crate) fn compile_json_schema(
    schema_value: &Value,
    label: &str,
    options: SchemaLoadOptions<'_>,
) -> Result<SchemaLoadResult> {
    let schema_version = extract_schema_version(schema_value, options.schema_version_pointer)
        .ok_or_else(|| anyhow!("schema {label} missing schema_version const"))?;

    if let Some(allowed) = options.allowed_versions {
        if !allowed.contains(&schema_version) {
            bail!(
                "schema_version '{}' not in allowed set {:?}",
                schema_version,
                allowed
            );
        }
    }

    let compiled = JSONSchema::compile(schema_value)
        .map_err(|err| anyhow!("compiling schema {label}: {err}"))?;

    Ok(SchemaLoadResult {
        schema_version,
        compiled,
    })
}

/// Run `schema` against `instance`, joining every violation into one message.
pub(crate) fn validate_instance(schema: &JSONSchema, instance: &Value) -> Result<(), String> {
    schema.validate(instance).map_err(|errors| {
        errors
            .map(|err| format!("{} (at {})", err, err.instance_path))
            .collect::<Vec<_>>()
            .join("\n")
    })
}

fn extract_schema_version(schema: &Value, pointer: &str) -> Option<String> {
    let version = schema.pointer(pointer).and_then(Value::as_str)?;
    if !version.is_empty()
        && version
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
    {
        Some(version.to_string())
    } else {
        None
    }
}
