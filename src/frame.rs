//! Framing: inlining referenced resources into their referrer
//!
//! A [`FrameSpec`] lists, per category, the properties whose references are
//! replaced by the resource they point to. Framing works on a
//! [`FramedResource`] copy, so the graph itself is never modified.

use std::collections::{HashMap, HashSet};

use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::category::Category;
use crate::error::CatalogError;
use crate::resource::Resource;
use crate::store::Graph;
use crate::value::{is_blank_node, PropertyValue};
use crate::vocab::dcat;

/// Properties to inline, per category of the referring resource
#[derive(Debug, Clone, Default)]
pub struct FrameSpec {
    allowed: HashMap<Category, HashSet<String>>,
}

impl FrameSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, category: Category, property: &str) -> Self {
        self.allowed
            .entry(category)
            .or_default()
            .insert(property.to_string());
        self
    }

    /// Datasets embed their distributions, distributions their access service
    pub fn distributions() -> Self {
        Self::new()
            .with(Category::Dataset, dcat::DISTRIBUTION)
            .with(Category::Distribution, dcat::ACCESS_SERVICE)
    }

    pub fn allows(&self, category: Category, property: &str) -> bool {
        self.allowed
            .get(&category)
            .is_some_and(|properties| properties.contains(property))
    }

    pub fn is_empty(&self) -> bool {
        self.allowed.values().all(HashSet::is_empty)
    }
}

/// A property value after framing
#[derive(Debug, Clone, PartialEq)]
pub enum FramedValue {
    Value(PropertyValue),
    Embedded(Box<FramedResource>),
}

/// A resource whose references may have been replaced by the resources they name
#[derive(Debug, Clone, PartialEq)]
pub struct FramedResource {
    id: String,
    types: Vec<String>,
    category: Category,
    properties: IndexMap<String, Vec<FramedValue>>,
}

impl From<&Resource> for FramedResource {
    fn from(resource: &Resource) -> Self {
        Self {
            id: resource.id().to_string(),
            types: resource.types().to_vec(),
            category: resource.category(),
            properties: resource
                .properties()
                .map(|(property, values)| {
                    (
                        property.to_string(),
                        values.iter().cloned().map(FramedValue::Value).collect(),
                    )
                })
                .collect(),
        }
    }
}

impl FramedResource {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn types(&self) -> &[String] {
        &self.types
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn properties(&self) -> impl Iterator<Item = (&str, &[FramedValue])> {
        self.properties
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn values(&self, property: &str) -> Option<&[FramedValue]> {
        self.properties.get(property).map(Vec::as_slice)
    }

    /// Inline the references of allowed properties, recursively.
    ///
    /// Returns the number of references replaced; framing an already framed
    /// resource with the same spec replaces nothing. A reference back to a
    /// resource on the current path fails with [`CatalogError::CycleDetected`].
    pub fn frame(&mut self, graph: &Graph, spec: &FrameSpec) -> Result<usize, CatalogError> {
        let mut path = Vec::new();
        self.frame_along(graph, spec, &mut path)
    }

    fn frame_along(
        &mut self,
        graph: &Graph,
        spec: &FrameSpec,
        path: &mut Vec<String>,
    ) -> Result<usize, CatalogError> {
        path.push(self.id.clone());
        let mut replaced = 0;

        for (property, values) in self.properties.iter_mut() {
            if !spec.allows(self.category, property) {
                continue;
            }
            let range = self.category.range_of(&self.types, property).ok_or_else(|| {
                CatalogError::MissingRange {
                    category: self.category,
                    property: property.clone(),
                }
            })?;

            for value in values.iter_mut() {
                match value {
                    FramedValue::Value(PropertyValue::Reference(r)) => {
                        if path.iter().any(|id| id == r.id()) {
                            return Err(CatalogError::CycleDetected(format!(
                                "{} -> {}",
                                path.join(" -> "),
                                r.id()
                            )));
                        }
                        let target = graph.get(range, r.id())?;
                        let mut embedded = FramedResource::from(target.as_ref());
                        replaced += 1 + embedded.frame_along(graph, spec, path)?;
                        *value = FramedValue::Embedded(Box::new(embedded));
                    }
                    FramedValue::Embedded(inner) => {
                        replaced += inner.frame_along(graph, spec, path)?;
                    }
                    FramedValue::Value(PropertyValue::Literal(_)) => {}
                }
            }
        }

        path.pop();
        Ok(replaced)
    }

    /// Nested expanded JSON-LD; embedded blank nodes lose their `@id`
    pub fn as_json_ld(&self) -> Value {
        self.json_ld_at(0)
    }

    fn json_ld_at(&self, level: usize) -> Value {
        let mut obj = Map::new();
        if level == 0 || !is_blank_node(&self.id) {
            obj.insert("@id".to_string(), Value::String(self.id.clone()));
        }
        obj.insert(
            "@type".to_string(),
            Value::Array(self.types.iter().cloned().map(Value::String).collect()),
        );
        for (property, values) in &self.properties {
            let values = values
                .iter()
                .map(|value| match value {
                    FramedValue::Value(v) => v.as_json_ld(),
                    FramedValue::Embedded(inner) => inner.json_ld_at(level + 1),
                })
                .collect();
            obj.insert(property.clone(), Value::Array(values));
        }
        Value::Object(obj)
    }
}

/// Frame one stored resource
pub fn frame_resource(
    graph: &Graph,
    category: Category,
    id: &str,
    spec: &FrameSpec,
) -> Result<FramedResource, CatalogError> {
    let resource = graph.get(category, id)?;
    let mut framed = FramedResource::from(resource.as_ref());
    framed.frame(graph, spec)?;
    Ok(framed)
}

/// Frame every resource of a category
pub fn frame_category(
    graph: &Graph,
    category: Category,
    spec: &FrameSpec,
) -> Result<Vec<FramedResource>, CatalogError> {
    graph
        .resources_of(category)
        .map(|resource| {
            let mut framed = FramedResource::from(resource);
            framed.frame(graph, spec)?;
            Ok(framed)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vocab::dcterms;
    use serde_json::json;

    fn graph() -> Graph {
        let mut graph = Graph::default();
        for record in [
            json!({
                "@id": "http://example.org/ds",
                "@type": ["http://www.w3.org/ns/dcat#Dataset"],
                "http://purl.org/dc/terms/title": [{"@language": "fr", "@value": "Jeu"}],
                "http://www.w3.org/ns/dcat#distribution": [{"@id": "_:d1"}]
            }),
            json!({
                "@id": "_:d1",
                "@type": ["http://www.w3.org/ns/dcat#Distribution"],
                "http://www.w3.org/ns/dcat#accessService": [{"@id": "http://example.org/wms"}]
            }),
            json!({
                "@id": "http://example.org/wms",
                "@type": ["http://www.w3.org/ns/dcat#DataService"],
                "http://purl.org/dc/terms/title": [{"@language": "fr", "@value": "WMS"}]
            }),
        ] {
            graph.add_record(&record).unwrap();
        }
        graph
    }

    #[test]
    fn test_frame_inlines_recursively() {
        let graph = graph();
        let framed = frame_resource(
            &graph,
            Category::Dataset,
            "http://example.org/ds",
            &FrameSpec::distributions(),
        )
        .unwrap();

        let Some([FramedValue::Embedded(distribution)]) = framed.values(dcat::DISTRIBUTION) else {
            panic!("distribution not embedded");
        };
        assert_eq!(distribution.id(), "_:d1");
        assert!(matches!(
            distribution.values(dcat::ACCESS_SERVICE),
            Some([FramedValue::Embedded(_)])
        ));
        // title is not framed and stays a value
        assert!(matches!(
            framed.values(dcterms::TITLE),
            Some([FramedValue::Value(_)])
        ));
    }

    #[test]
    fn test_frame_is_idempotent() {
        let graph = graph();
        let resource = graph.get(Category::Dataset, "http://example.org/ds").unwrap();
        let mut framed = FramedResource::from(resource.as_ref());
        let spec = FrameSpec::distributions();
        assert_eq!(framed.frame(&graph, &spec).unwrap(), 2);
        let snapshot = framed.clone();
        assert_eq!(framed.frame(&graph, &spec).unwrap(), 0);
        assert_eq!(framed, snapshot);
    }

    #[test]
    fn test_empty_spec_changes_nothing() {
        let graph = graph();
        let resource = graph.get(Category::Dataset, "http://example.org/ds").unwrap();
        let mut framed = FramedResource::from(resource.as_ref());
        assert!(FrameSpec::new().is_empty());
        assert_eq!(framed.frame(&graph, &FrameSpec::new()).unwrap(), 0);
        assert_eq!(framed.as_json_ld(), resource.as_json_ld());
    }

    #[test]
    fn test_property_without_range() {
        let graph = graph();
        let spec = FrameSpec::new().with(Category::Dataset, dcterms::TITLE);
        let err = frame_resource(&graph, Category::Dataset, "http://example.org/ds", &spec)
            .unwrap_err();
        assert!(matches!(err, CatalogError::MissingRange { .. }));
    }

    #[test]
    fn test_cycle_is_reported() {
        let mut graph = Graph::default();
        graph
            .add_record(&json!({
                "@id": "http://example.org/cat",
                "@type": ["http://www.w3.org/ns/dcat#Catalog"],
                "http://xmlns.com/foaf/0.1/isPrimaryTopicOf": [{"@id": "http://example.org/rec"}]
            }))
            .unwrap();
        graph
            .add_record(&json!({
                "@id": "http://example.org/rec",
                "@type": ["http://www.w3.org/ns/dcat#CatalogRecord"],
                "http://www.w3.org/ns/dcat#inCatalog": [{"@id": "http://example.org/cat"}]
            }))
            .unwrap();
        let spec = FrameSpec::new()
            .with(Category::Catalog, crate::vocab::foaf::IS_PRIMARY_TOPIC_OF)
            .with(Category::CatalogRecord, dcat::IN_CATALOG);
        let err = frame_resource(&graph, Category::Catalog, "http://example.org/cat", &spec)
            .unwrap_err();
        assert!(matches!(err, CatalogError::CycleDetected(_)));
    }

    #[test]
    fn test_as_json_ld_omits_embedded_blank_ids() {
        let graph = graph();
        let framed = frame_resource(
            &graph,
            Category::Dataset,
            "http://example.org/ds",
            &FrameSpec::distributions(),
        )
        .unwrap();
        let out = framed.as_json_ld();
        let distribution = &out["http://www.w3.org/ns/dcat#distribution"][0];
        assert!(distribution.get("@id").is_none());
        assert_eq!(
            distribution["http://www.w3.org/ns/dcat#accessService"][0]["@id"],
            json!("http://example.org/wms")
        );
    }

    #[test]
    fn test_frame_category() {
        let graph = graph();
        let framed =
            frame_category(&graph, Category::Dataset, &FrameSpec::distributions()).unwrap();
        assert_eq!(framed.len(), 1);
    }
}
