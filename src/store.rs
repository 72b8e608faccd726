//! The graph store
//!
//! Resources are kept in one bucket per [`Category`]; a reference is
//! dereferenced by looking its id up in the bucket its property's range
//! names. Ingestion merges a re-seen id into the stored resource and
//! rectifies the result before it becomes visible.
//!
//! Statement canonicalization is the ordering barrier of a graph: it runs
//! once, after every page is ingested, and seals the graph against further
//! ingestion.

use std::borrow::Cow;
use std::collections::HashMap;

use indexmap::IndexMap;
use serde_json::Value;

use crate::category::Category;
use crate::error::CatalogError;
use crate::rectify::{apply_default_language, rectify};
use crate::resource::Resource;
use crate::statement::{self, CanonicalizeReport};
use crate::stats::Stats;
use crate::value::PropertyValue;
use crate::vocab::{dcterms, insee, rdfs};

pub const RECORDS_READ: &str = "records read";

/// Options for ingestion
#[derive(Debug, Clone)]
pub struct GraphOptions {
    /// Language given to plain titles, descriptions and names; `None` leaves them plain
    pub default_language: Option<String>,
}

impl Default for GraphOptions {
    fn default() -> Self {
        Self {
            default_language: Some("fr".to_string()),
        }
    }
}

#[derive(Debug, Default)]
pub struct Graph {
    options: GraphOptions,
    buckets: HashMap<Category, IndexMap<String, Resource>>,
    stats: Stats,
    rectify_stats: Stats,
    canonicalized: bool,
}

impl Graph {
    pub fn new(options: GraphOptions) -> Self {
        Self {
            options,
            ..Default::default()
        }
    }

    pub fn options(&self) -> &GraphOptions {
        &self.options
    }

    /// Parse and ingest one expanded JSON-LD node object, returning its category
    pub fn add_record(&mut self, record: &Value) -> Result<Category, CatalogError> {
        let resource = Resource::from_record(record)?;
        let category = resource.category();
        self.add_resource(resource)?;
        Ok(category)
    }

    /// Ingest a resource: merge with a stored resource of the same id, then rectify.
    ///
    /// Nothing is stored when rectification fails; a previously stored
    /// version of the resource stays as it was.
    pub fn add_resource(&mut self, resource: Resource) -> Result<(), CatalogError> {
        if self.canonicalized {
            return Err(CatalogError::Sealed(resource.id().to_string()));
        }
        let category = resource.category();
        let bucket = self.buckets.entry(category).or_default();
        let mut candidate = match bucket.get(resource.id()) {
            Some(existing) => {
                let mut merged = existing.clone();
                merged.merge_from(resource);
                merged
            }
            None => resource,
        };

        let mut stats = Stats::new();
        rectify(&mut candidate, &mut stats)?;
        if let Some(language) = &self.options.default_language {
            apply_default_language(&mut candidate, language, &mut stats);
        }
        self.rectify_stats.absorb(stats);
        self.stats.increment(RECORDS_READ);
        self.stats.increment(category.name());

        bucket.insert(candidate.id().to_string(), candidate);
        Ok(())
    }

    /// Look up a resource in a category.
    ///
    /// INSEE administrative-area URIs that were never ingested are synthesized
    /// as labelled Locations. Anything else unknown is a dereference error.
    pub fn get(&self, category: Category, id: &str) -> Result<Cow<'_, Resource>, CatalogError> {
        if let Some(resource) = self.buckets.get(&category).and_then(|b| b.get(id)) {
            return Ok(Cow::Borrowed(resource));
        }
        if category == Category::Location {
            if let Some(location) = insee_location(id) {
                return Ok(Cow::Owned(location));
            }
        }
        Err(CatalogError::Dereference {
            category,
            id: id.to_string(),
        })
    }

    pub fn contains(&self, category: Category, id: &str) -> bool {
        self.buckets
            .get(&category)
            .is_some_and(|b| b.contains_key(id))
    }

    /// Resources of a category, in first-ingestion order
    pub fn resources_of(&self, category: Category) -> impl Iterator<Item = &Resource> {
        self.buckets
            .get(&category)
            .into_iter()
            .flat_map(|bucket| bucket.values())
    }

    pub fn len(&self) -> usize {
        self.buckets.values().map(IndexMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Records read, overall and per category
    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    /// One counter per defect class healed during ingestion and canonicalization
    pub fn rectify_stats(&self) -> &Stats {
        &self.rectify_stats
    }

    pub fn is_canonicalized(&self) -> bool {
        self.canonicalized
    }

    /// Deduplicate rights and provenance statements across the whole graph.
    ///
    /// May run only once; afterwards the graph refuses further ingestion.
    pub fn canonicalize_statements(&mut self) -> Result<CanonicalizeReport, CatalogError> {
        if self.canonicalized {
            return Err(CatalogError::AlreadyCanonicalized);
        }
        let report = statement::canonicalize(self)?;
        self.rectify_stats
            .add(statement::INLINE_STATEMENT, report.inline_literals);
        self.canonicalized = true;
        log::info!(
            "Canonicalized statements: {} distinct, {} created",
            report.distinct,
            report.created
        );
        Ok(report)
    }

    /// Expanded JSON-LD of one category
    pub fn category_as_json_ld(&self, category: Category) -> Vec<Value> {
        self.resources_of(category).map(Resource::as_json_ld).collect()
    }

    /// Expanded JSON-LD of the whole graph, category by category
    pub fn all_as_json_ld(&self) -> Vec<Value> {
        Category::ALL
            .iter()
            .flat_map(|category| self.category_as_json_ld(*category))
            .collect()
    }

    /// Store a resource built by the graph itself, bypassing merge and rectification
    pub(crate) fn insert_derived(&mut self, resource: Resource) {
        self.buckets
            .entry(resource.category())
            .or_default()
            .entry(resource.id().to_string())
            .or_insert(resource);
    }

    /// Replace the values of a stored resource's property
    pub(crate) fn set_values(
        &mut self,
        category: Category,
        id: &str,
        property: &str,
        values: Vec<PropertyValue>,
    ) {
        if let Some(resource) = self.buckets.get_mut(&category).and_then(|b| b.get_mut(id)) {
            resource.set_values(property, values);
        }
    }
}

/// Location for `http://id.insee.fr/geo/{region|departement|commune}/<code>`
fn insee_location(id: &str) -> Option<Resource> {
    let (kind, code) = id.strip_prefix(insee::GEO_PREFIX)?.split_once('/')?;
    let kind_label = match kind {
        "region" => "Région",
        "departement" => "Département",
        "commune" => "Commune",
        _ => return None,
    };
    Some(
        Resource::new(id, vec![dcterms::LOCATION.to_string()], Category::Location).with_property(
            rdfs::LABEL,
            vec![PropertyValue::lang(format!("{} {}", kind_label, code), "fr")],
        ),
    )
}
