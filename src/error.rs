//! Errors raised while constructing a document catalog.
//!
//! Construction fails fast on the first malformed entry in declaration
//! order. IO, JSON and schema problems surface through `anyhow` in the
//! loading paths; these variants cover the catalog contents themselves.

use thiserror::Error;

#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum ValidationError {
    #[error("category {index} has an empty name")]
    EmptyCategoryName { index: usize },

    #[error("category '{category}' item {index}: {field} must not be empty")]
    EmptyField {
        category: String,
        index: usize,
        field: &'static str,
    },

    #[error(
        "category '{category}' item {index}: unknown document type '{value}' (expected md|pdf|excel)"
    )]
    UnknownType {
        category: String,
        index: usize,
        value: String,
    },
}
