//! DCAT Catalog Rectification Library
//!
//! This library loads the expanded JSON-LD export of a DCAT catalog into an
//! in-memory RDF graph, repairs the defects commonly found in such exports,
//! and renders the result for people and for downstream JSON-LD tools.
//!
//! # Overview
//!
//! Every record of the export becomes a [`Resource`] filed under a
//! [`Category`] derived from its `@type`. On ingestion the graph:
//!
//! 1. Merges records that share an `@id` (datasets and catalogs union their
//!    membership properties, other categories keep the last record)
//! 2. Rectifies each property with an ordered rule chain: property URI
//!    repair, language codes, `mailto:` mailboxes, duplicated literals and
//!    dates, values hidden in a secondary encoding, theme labels
//! 3. Tags plain titles, descriptions and names with a default language
//!
//! Once every page is in, rights and provenance statements are
//! canonicalized: each dataset points at one statement resource per
//! distinct French text. The graph is then sealed.
//!
//! # Views
//!
//! - [`frame`]: inline referenced resources, e.g. distributions into datasets
//! - [`simplify`]: a compact, human-readable projection keyed by short names
//! - [`compact`]: compaction with the `json-ld` crate, rendered in a fixed
//!   property order
//!
//! # Usage
//!
//! ## Import a catalog export
//!
//! ```ignore
//! use dcat_rectify::{import, CachedHttpSource, Graph, ImportOptions};
//!
//! let source = CachedHttpSource::new("https://example.org/dcat/catalog", "json");
//! let mut graph = Graph::default();
//! let report = import(&mut graph, &source, &ImportOptions::default())?;
//!
//! for (page, error) in &report.errors {
//!     eprintln!("page {}: {}", page, error);
//! }
//! ```
//!
//! ## Show datasets with their distributions
//!
//! ```ignore
//! use dcat_rectify::{Category, FrameSpec, Simplifier};
//!
//! let mut simplifier = Simplifier::new(&graph);
//! let datasets = simplifier.simplify_category(
//!     Category::Dataset,
//!     false,
//!     Some(&FrameSpec::distributions()),
//! )?;
//! println!("{}", serde_json::to_string_pretty(&datasets)?);
//! ```

pub mod category;
pub mod compact;
pub mod encoded;
pub mod error;
pub mod frame;
pub mod loader;
pub mod rectify;
pub mod resource;
pub mod simplify;
pub mod statement;
pub mod stats;
pub mod store;
pub mod value;
pub mod vocab;

// Re-export main types for convenience
pub use crate::category::Category;
pub use crate::compact::{
    CompactGraph, CompactNode, JsonLdCompactor, OrderEntry, ProcessorCompactor, PropertyOrder,
};
pub use crate::error::CatalogError;
pub use crate::frame::{frame_category, frame_resource, FrameSpec, FramedResource, FramedValue};
pub use crate::loader::{
    import, CachedHttpSource, ImportOptions, ImportReport, PageSource, RejectedRecord,
};
pub use crate::resource::Resource;
pub use crate::simplify::{simplify_literal, Simplifier};
pub use crate::statement::{CanonicalizeReport, MlString, StatementFailure};
pub use crate::stats::Stats;
pub use crate::store::{Graph, GraphOptions};
pub use crate::value::{Literal, PropertyValue, Reference};
