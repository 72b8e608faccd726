//! Error types for catalog loading and rectification

use thiserror::Error;

use crate::category::Category;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Malformed property value: unexpected key set [{keys}]")]
    MalformedValue { keys: String },

    #[error("Malformed resource record: {0}")]
    MalformedResource(String),

    #[error("Unhandled RDF type combination '{0}'")]
    UnhandledType(String),

    #[error("Cannot dereference {id} in category {category}")]
    Dereference { category: Category, id: String },

    #[error("Property {property} of {category} has no registered range category")]
    MissingRange { category: Category, property: String },

    #[error("Resource {id}: {property} requires exactly one value, found {count}")]
    MailboxCardinality {
        id: String,
        property: String,
        count: usize,
    },

    #[error("Invalid statement: {0}")]
    Statement(String),

    #[error("Statements have already been canonicalized")]
    AlreadyCanonicalized,

    #[error("Graph is sealed: cannot ingest {0} after statement canonicalization")]
    Sealed(String),

    #[error("Cycle detected while framing: {0}")]
    CycleDetected(String),

    #[error("Failed to load page {page}: {reason}")]
    LoadError { page: u32, reason: String },

    #[error("Invalid pagination: {0}")]
    InvalidPagination(String),

    #[error("Compaction failed: {0}")]
    Compaction(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
