//! Rights and provenance statements
//!
//! Datasets give their access rights and provenance either as French
//! literals or as references to statement resources, often anonymous and
//! duplicated once per dataset. A statement is identified by the MD5 of its
//! French text; canonicalization makes every dataset point at one resource
//! per distinct text.

use std::collections::HashMap;

use indexmap::IndexMap;
use md5::{Digest, Md5};
use serde::Serialize;

use crate::category::Category;
use crate::error::CatalogError;
use crate::resource::Resource;
use crate::store::Graph;
use crate::value::PropertyValue;
use crate::vocab::{dcterms, rdfs, MD5_BLANK_NODE_PREFIX};

pub const INLINE_STATEMENT: &str = "statement given as a literal instead of a resource";

/// Dataset properties holding statements, with the class of the statements they hold
const STATEMENT_PROPERTIES: &[(&str, &str)] = &[
    (dcterms::ACCESS_RIGHTS, dcterms::RIGHTS_STATEMENT),
    (dcterms::PROVENANCE, dcterms::PROVENANCE_STATEMENT),
];

const FRENCH: &str = "fr";

/// A multilingual string; the French text is always present
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MlString {
    strings: IndexMap<String, String>,
}

impl MlString {
    /// Build from (language, text) pairs, dropping empty texts
    pub fn new<I, L, S>(pairs: I) -> Result<Self, CatalogError>
    where
        I: IntoIterator<Item = (L, S)>,
        L: Into<String>,
        S: Into<String>,
    {
        let strings: IndexMap<String, String> = pairs
            .into_iter()
            .map(|(lang, text)| (lang.into(), text.into()))
            .filter(|(_, text)| !text.is_empty())
            .collect();
        if !strings.contains_key(FRENCH) {
            return Err(CatalogError::Statement(
                "multilingual string without French text".to_string(),
            ));
        }
        Ok(Self { strings })
    }

    /// Read the label of a statement resource; every value must be language-tagged
    pub fn from_label(values: &[PropertyValue]) -> Result<Self, CatalogError> {
        let pairs = values
            .iter()
            .map(|value| {
                value
                    .as_literal()
                    .and_then(|l| l.language().map(|lang| (lang, l.value())))
                    .ok_or_else(|| {
                        CatalogError::Statement(format!(
                            "label value {} is not a language-tagged string",
                            value.as_json_ld()
                        ))
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(pairs)
    }

    pub fn french(&self) -> &str {
        self.strings.get(FRENCH).map(String::as_str).unwrap_or_default()
    }

    pub fn get(&self, language: &str) -> Option<&str> {
        self.strings.get(language).map(String::as_str)
    }

    /// Hex MD5 of the French text
    pub fn md5(&self) -> String {
        format!("{:x}", Md5::digest(self.french().as_bytes()))
    }

    /// Label values of a statement resource carrying this string
    pub fn to_label(&self) -> Vec<PropertyValue> {
        self.strings
            .iter()
            .map(|(lang, text)| PropertyValue::lang(text.as_str(), lang.as_str()))
            .collect()
    }
}

/// A statement property left as it was because one of its values could not be read
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatementFailure {
    pub dataset: String,
    pub property: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CanonicalizeReport {
    /// Statements given inline as French literals
    pub inline_literals: usize,
    /// References followed to a statement resource
    pub dereferenced: usize,
    /// Distinct statement texts found
    pub distinct: usize,
    /// Statement resources created for texts that had none
    pub created: usize,
    /// Dataset properties rewritten
    pub properties_rewritten: usize,
    /// Dataset properties left untouched
    pub failures: Vec<StatementFailure>,
}

struct Candidate {
    label: MlString,
    class: &'static str,
    /// Smallest id of an existing statement carrying this text
    existing: Option<String>,
}

/// Read one statement value: its text and, for a reference, the statement id
fn read_statement(
    graph: &Graph,
    value: &PropertyValue,
    report: &mut CanonicalizeReport,
) -> Result<(MlString, Option<String>), CatalogError> {
    match value {
        PropertyValue::Literal(l) if l.language() == Some(FRENCH) => {
            report.inline_literals += 1;
            Ok((MlString::new([(FRENCH, l.value())])?, None))
        }
        PropertyValue::Literal(_) => Err(CatalogError::Statement(format!(
            "{} is not a French literal",
            value.as_json_ld()
        ))),
        PropertyValue::Reference(r) => {
            let statement = graph.get(Category::Generic, r.id())?;
            report.dereferenced += 1;
            let label = MlString::from_label(statement.values(rdfs::LABEL).unwrap_or_default())
                .map_err(|e| CatalogError::Statement(format!("statement {}: {}", r.id(), e)))?;
            Ok((label, Some(r.id().to_string())))
        }
    }
}

/// Rewrite the statement properties of every dataset to one reference per
/// distinct French text.
///
/// When several existing statements share a text, the lexicographically
/// smallest id is kept, so the outcome does not depend on ingestion order.
/// A property holding a value that is neither a French literal nor a
/// reference to a labelled statement is left untouched and listed in
/// [`CanonicalizeReport::failures`].
pub(crate) fn canonicalize(graph: &mut Graph) -> Result<CanonicalizeReport, CatalogError> {
    let mut report = CanonicalizeReport::default();
    let mut candidates: IndexMap<String, Candidate> = IndexMap::new();
    let mut rewrites: Vec<(String, &'static str, Vec<String>)> = Vec::new();

    for dataset in graph.resources_of(Category::Dataset) {
        for &(property, class) in STATEMENT_PROPERTIES {
            let Some(values) = dataset.values(property) else {
                continue;
            };

            let statements = match values
                .iter()
                .map(|value| read_statement(graph, value, &mut report))
                .collect::<Result<Vec<_>, _>>()
            {
                Ok(statements) => statements,
                Err(e) => {
                    log::warn!("Keeping {} of {} as is: {}", property, dataset.id(), e);
                    report.failures.push(StatementFailure {
                        dataset: dataset.id().to_string(),
                        property: property.to_string(),
                        reason: e.to_string(),
                    });
                    continue;
                }
            };

            let mut hashes: Vec<String> = Vec::new();
            for (label, existing) in statements {
                let hash = label.md5();
                let candidate = candidates.entry(hash.clone()).or_insert_with(|| Candidate {
                    label,
                    class,
                    existing: None,
                });
                if let Some(id) = existing {
                    if candidate.existing.as_ref().map_or(true, |current| id < *current) {
                        candidate.existing = Some(id);
                    }
                }
                if !hashes.contains(&hash) {
                    hashes.push(hash);
                }
            }
            rewrites.push((dataset.id().to_string(), property, hashes));
        }
    }

    let mut canonical: HashMap<String, String> = HashMap::new();
    for (hash, candidate) in candidates {
        let id = match candidate.existing {
            Some(id) => id,
            None => {
                let id = format!("{}{}", MD5_BLANK_NODE_PREFIX, hash);
                if !graph.contains(Category::Generic, &id) {
                    log::debug!("Creating statement {}", id);
                    graph.insert_derived(
                        Resource::new(id.as_str(), vec![candidate.class.to_string()], Category::Generic)
                            .with_property(rdfs::LABEL, candidate.label.to_label()),
                    );
                    report.created += 1;
                }
                id
            }
        };
        canonical.insert(hash, id);
    }
    report.distinct = canonical.len();

    for (dataset_id, property, hashes) in rewrites {
        let values = hashes
            .iter()
            .filter_map(|hash| canonical.get(hash))
            .map(PropertyValue::reference)
            .collect();
        graph.set_values(Category::Dataset, &dataset_id, property, values);
        report.properties_rewritten += 1;
    }

    Ok(report)
}
