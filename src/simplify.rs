//! Simplification of resources for display
//!
//! A simplified resource is a JSON object keyed by the short names of its
//! category. Literals become strings, references to resources with a known
//! range embed the simplified target, and properties without a short name
//! are kept as expanded JSON-LD under [`JSON_LD_KEY`].

use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::category::{range_of, Category};
use crate::error::CatalogError;
use crate::frame::{FrameSpec, FramedResource, FramedValue};
use crate::resource::Resource;
use crate::store::Graph;
use crate::value::{is_blank_node, Literal, PropertyValue};
use crate::vocab::{dcat, geosparql, locn, xsd, JSON_LD_KEY};

/// Datatypes rendered as their bare lexical form
const TEMPORAL_DATATYPES: &[&str] = &[xsd::DATE, xsd::DATE_TIME, xsd::G_YEAR, xsd::G_YEAR_MONTH];

/// Simplifies resources of one graph, remembering dereference failures
pub struct Simplifier<'g> {
    graph: &'g Graph,
    deref_failures: IndexMap<String, usize>,
    /// Ids being simplified, outermost first
    stack: Vec<String>,
}

impl<'g> Simplifier<'g> {
    pub fn new(graph: &'g Graph) -> Self {
        Self {
            graph,
            deref_failures: IndexMap::new(),
            stack: Vec::new(),
        }
    }

    /// Failed dereferences met so far, by message, with their count
    pub fn deref_failures(&self) -> &IndexMap<String, usize> {
        &self.deref_failures
    }

    pub fn simplify(&mut self, resource: &Resource) -> Result<Value, CatalogError> {
        self.simplify_framed(&FramedResource::from(resource))
    }

    pub fn simplify_framed(&mut self, resource: &FramedResource) -> Result<Value, CatalogError> {
        if resource.category() == Category::Location {
            if let Some(shape) = location_shape(resource) {
                return Ok(shape);
            }
        }

        self.stack.push(resource.id().to_string());
        let result = self.simplify_properties(resource);
        self.stack.pop();
        result
    }

    fn simplify_properties(&mut self, resource: &FramedResource) -> Result<Value, CatalogError> {
        let short_names = resource.category().short_names(resource.types());
        let mut simple = Map::new();
        let mut unregistered = Map::new();

        for (property, values) in resource.properties() {
            let Some((_, short)) = short_names.iter().find(|(uri, _)| *uri == property) else {
                unregistered.insert(
                    property.to_string(),
                    Value::Array(values.iter().map(framed_json_ld).collect()),
                );
                continue;
            };
            let mut simplified = values
                .iter()
                .map(|value| self.simplify_value(resource.category(), property, short, value))
                .collect::<Result<Vec<_>, _>>()?;
            let entry = if simplified.len() == 1 {
                simplified.remove(0)
            } else {
                Value::Array(simplified)
            };
            simple.insert(short.to_string(), entry);
        }

        if !unregistered.is_empty() {
            simple.insert(JSON_LD_KEY.to_string(), Value::Object(unregistered));
        }
        Ok(Value::Object(simple))
    }

    fn simplify_value(
        &mut self,
        category: Category,
        property: &str,
        short: &str,
        value: &FramedValue,
    ) -> Result<Value, CatalogError> {
        match value {
            FramedValue::Value(PropertyValue::Literal(l)) => Ok(Value::String(simplify_literal(l))),
            FramedValue::Value(PropertyValue::Reference(r)) => {
                self.simplify_reference(category, property, short, r.id())
            }
            FramedValue::Embedded(inner) => {
                let simple = self.simplify_framed(inner)?;
                Ok(with_id(inner.id(), simple))
            }
        }
    }

    fn simplify_reference(
        &mut self,
        category: Category,
        property: &str,
        short: &str,
        id: &str,
    ) -> Result<Value, CatalogError> {
        let range = range_of(short);

        if !is_blank_node(id) {
            let Some(range) = range else {
                return Ok(bracketed(id));
            };
            if self.stack.iter().any(|seen| seen == id) {
                return Ok(bracketed(id));
            }
            let graph = self.graph;
            return match graph.get(range, id) {
                Ok(target) => {
                    let simple = self.simplify(&target)?;
                    Ok(with_id(id, simple))
                }
                Err(e) => {
                    self.record_failure(e);
                    Ok(bracketed(id))
                }
            };
        }

        // blank nodes have no meaning outside the graph and are always embedded
        let range = range.ok_or_else(|| CatalogError::MissingRange {
            category,
            property: property.to_string(),
        })?;
        if self.stack.iter().any(|seen| seen == id) {
            return Err(CatalogError::CycleDetected(format!(
                "{} -> {}",
                self.stack.join(" -> "),
                id
            )));
        }
        let graph = self.graph;
        let target = graph.get(range, id)?;
        self.simplify(&target)
    }

    fn record_failure(&mut self, error: CatalogError) {
        let message = error.to_string();
        let count = self.deref_failures.entry(message).or_insert(0);
        *count += 1;
        if *count == 1 {
            log::warn!("{}", error);
        }
    }

    /// Simplify every resource of a category into an object keyed by id.
    ///
    /// Blank nodes are skipped unless asked for, since they are normally
    /// shown embedded in the resources referring to them. With a frame
    /// spec, resources are framed before being simplified.
    pub fn simplify_category(
        &mut self,
        category: Category,
        include_blank_nodes: bool,
        frame: Option<&FrameSpec>,
    ) -> Result<Value, CatalogError> {
        let graph = self.graph;
        let mut out = Map::new();
        for resource in graph.resources_of(category) {
            if resource.is_blank() && !include_blank_nodes {
                continue;
            }
            let mut framed = FramedResource::from(resource);
            if let Some(spec) = frame {
                framed.frame(graph, spec)?;
            }
            out.insert(resource.id().to_string(), self.simplify_framed(&framed)?);
        }
        Ok(Value::Object(out))
    }
}

/// Literal text, tagged with `@language` or `[datatype]` when not temporal
pub fn simplify_literal(literal: &Literal) -> String {
    match (literal.language(), literal.datatype()) {
        (Some(lang), _) => format!("{}@{}", literal.value(), lang),
        (None, Some(datatype)) if TEMPORAL_DATATYPES.contains(&datatype) => {
            literal.value().to_string()
        }
        (None, Some(datatype)) => format!("{}[{}]", literal.value(), datatype),
        (None, None) => literal.value().to_string(),
    }
}

fn bracketed(id: &str) -> Value {
    Value::String(format!("<{}>", id))
}

/// Prefix a simplified target with its id, unless the id is a blank node
fn with_id(id: &str, simple: Value) -> Value {
    if is_blank_node(id) {
        return simple;
    }
    let mut obj = Map::new();
    obj.insert("@id".to_string(), Value::String(id.to_string()));
    match simple {
        Value::Object(fields) => obj.extend(fields),
        other => {
            obj.insert("value".to_string(), other);
        }
    }
    Value::Object(obj)
}

fn framed_json_ld(value: &FramedValue) -> Value {
    match value {
        FramedValue::Value(v) => v.as_json_ld(),
        FramedValue::Embedded(inner) => inner.as_json_ld(),
    }
}

/// A Location given by a WKT geometry or bounding box
fn location_shape(resource: &FramedResource) -> Option<Value> {
    for (property, key) in [(locn::GEOMETRY, "geometry"), (dcat::BBOX, "bbox")] {
        let wkt = resource.values(property).and_then(|values| {
            values.iter().find_map(|value| match value {
                FramedValue::Value(PropertyValue::Literal(l))
                    if l.datatype() == Some(geosparql::WKT_LITERAL) =>
                {
                    Some(l.value())
                }
                _ => None,
            })
        });
        if let Some(wkt) = wkt {
            let mut obj = Map::new();
            obj.insert(key.to_string(), Value::String(wkt.to_string()));
            return Some(Value::Object(obj));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn graph(records: &[Value]) -> Graph {
        let mut graph = Graph::default();
        for record in records {
            graph.add_record(record).unwrap();
        }
        graph
    }

    fn dataset(extra: Value) -> Value {
        let mut record = json!({
            "@id": "http://example.org/ds",
            "@type": ["http://www.w3.org/ns/dcat#Dataset"],
            "http://purl.org/dc/terms/title": [{"@language": "fr", "@value": "Jeu"}]
        });
        if let (Some(obj), Value::Object(more)) = (record.as_object_mut(), extra) {
            obj.extend(more);
        }
        record
    }

    fn simplify_dataset(graph: &Graph) -> Value {
        let resource = graph.get(Category::Dataset, "http://example.org/ds").unwrap();
        Simplifier::new(graph).simplify(&resource).unwrap()
    }

    #[test]
    fn test_literals() {
        assert_eq!(simplify_literal(&Literal::plain("x")), "x");
        assert_eq!(simplify_literal(&Literal::lang("x", "fr")), "x@fr");
        assert_eq!(simplify_literal(&Literal::typed("2023-05-18", xsd::DATE)), "2023-05-18");
        assert_eq!(simplify_literal(&Literal::typed("2023", xsd::G_YEAR)), "2023");
        assert_eq!(
            simplify_literal(&Literal::typed("12", "http://www.w3.org/2001/XMLSchema#integer")),
            "12[http://www.w3.org/2001/XMLSchema#integer]"
        );
    }

    #[test]
    fn test_scalar_and_list() {
        let graph = graph(&[dataset(json!({
            "http://www.w3.org/ns/dcat#keyword": [
                {"@language": "fr", "@value": "eau"},
                {"@language": "fr", "@value": "air"}
            ]
        }))]);
        let simple = simplify_dataset(&graph);
        assert_eq!(simple["title"], json!("Jeu@fr"));
        assert_eq!(simple["keyword"], json!(["eau@fr", "air@fr"]));
    }

    #[test]
    fn test_reference_without_range_is_bracketed() {
        let graph = graph(&[dataset(json!({
            "http://www.w3.org/ns/dcat#landingPage": [{"@id": "http://example.org/page"}]
        }))]);
        assert_eq!(
            simplify_dataset(&graph)["landingPage"],
            json!("<http://example.org/page>")
        );
    }

    #[test]
    fn test_failed_dereference_degrades_and_is_counted_once() {
        let graph = graph(&[dataset(json!({
            "http://purl.org/dc/terms/publisher": [{"@id": "http://example.org/unknown"}],
            "http://purl.org/dc/terms/creator": [{"@id": "http://example.org/unknown"}]
        }))]);
        let resource = graph.get(Category::Dataset, "http://example.org/ds").unwrap();
        let mut simplifier = Simplifier::new(&graph);
        let simple = simplifier.simplify(&resource).unwrap();
        assert_eq!(simple["publisher"], json!("<http://example.org/unknown>"));
        assert_eq!(simple["creator"], json!("<http://example.org/unknown>"));
        assert_eq!(simplifier.deref_failures().len(), 1);
        assert_eq!(simplifier.deref_failures().values().next(), Some(&2));
    }

    #[test]
    fn test_reference_with_range_embeds_target() {
        let graph = graph(&[
            dataset(json!({
                "http://purl.org/dc/terms/publisher": [{"@id": "http://example.org/org"}]
            })),
            json!({
                "@id": "http://example.org/org",
                "@type": ["http://xmlns.com/foaf/0.1/Organization"],
                "http://xmlns.com/foaf/0.1/name": [{"@value": "Ministère"}]
            }),
        ]);
        assert_eq!(
            simplify_dataset(&graph)["publisher"],
            json!({"@id": "http://example.org/org", "name": "Ministère@fr"})
        );
    }

    #[test]
    fn test_blank_reference_is_embedded_without_id() {
        let graph = graph(&[
            dataset(json!({
                "http://purl.org/dc/terms/temporal": [{"@id": "_:t"}]
            })),
            json!({
                "@id": "_:t",
                "@type": ["http://purl.org/dc/terms/PeriodOfTime"],
                "http://www.w3.org/ns/dcat#startDate": [
                    {"@type": "http://www.w3.org/2001/XMLSchema#date", "@value": "2020-01-01"}
                ]
            }),
        ]);
        assert_eq!(
            simplify_dataset(&graph)["temporal"],
            json!({"startDate": "2020-01-01"})
        );
    }

    #[test]
    fn test_blank_reference_failures_are_errors() {
        let graph = graph(&[dataset(json!({
            "http://purl.org/dc/terms/temporal": [{"@id": "_:missing"}]
        }))]);
        let resource = graph.get(Category::Dataset, "http://example.org/ds").unwrap();
        assert!(matches!(
            Simplifier::new(&graph).simplify(&resource),
            Err(CatalogError::Dereference { .. })
        ));

        let graph = graph_with_blank_landing_page();
        let resource = graph.get(Category::Dataset, "http://example.org/ds").unwrap();
        assert!(matches!(
            Simplifier::new(&graph).simplify(&resource),
            Err(CatalogError::MissingRange { .. })
        ));
    }

    fn graph_with_blank_landing_page() -> Graph {
        graph(&[dataset(json!({
            "http://www.w3.org/ns/dcat#landingPage": [{"@id": "_:page"}]
        }))])
    }

    #[test]
    fn test_unregistered_properties_kept_as_json_ld() {
        let graph = graph(&[dataset(json!({
            "http://example.org/custom": [{"@value": "x"}]
        }))]);
        assert_eq!(
            simplify_dataset(&graph)[JSON_LD_KEY],
            json!({"http://example.org/custom": [{"@value": "x"}]})
        );
    }

    #[test]
    fn test_location_shapes() {
        let graph = graph(&[
            dataset(json!({
                "http://purl.org/dc/terms/spatial": [
                    {"@id": "_:loc"},
                    {"@id": "http://id.insee.fr/geo/region/11"}
                ]
            })),
            json!({
                "@id": "_:loc",
                "@type": ["http://purl.org/dc/terms/Location"],
                "http://www.w3.org/ns/dcat#bbox": [{
                    "@type": "http://www.opengis.net/ont/geosparql#wktLiteral",
                    "@value": "POLYGON((0 0,1 0,1 1,0 1,0 0))"
                }]
            }),
        ]);
        assert_eq!(
            simplify_dataset(&graph)["spatial"],
            json!([
                {"bbox": "POLYGON((0 0,1 0,1 1,0 1,0 0))"},
                {"@id": "http://id.insee.fr/geo/region/11", "label": "Région 11@fr"}
            ])
        );
    }

    #[test]
    fn test_mutual_references_terminate() {
        let graph = graph(&[
            json!({
                "@id": "http://example.org/cat",
                "@type": ["http://www.w3.org/ns/dcat#Catalog"],
                "http://xmlns.com/foaf/0.1/isPrimaryTopicOf": [{"@id": "http://example.org/rec"}]
            }),
            json!({
                "@id": "http://example.org/rec",
                "@type": ["http://www.w3.org/ns/dcat#CatalogRecord"],
                "http://www.w3.org/ns/dcat#inCatalog": [{"@id": "http://example.org/cat"}]
            }),
        ]);
        let catalog = graph.get(Category::Catalog, "http://example.org/cat").unwrap();
        let simple = Simplifier::new(&graph).simplify(&catalog).unwrap();
        assert_eq!(
            simple["isPrimaryTopicOf"]["inCatalog"],
            json!("<http://example.org/cat>")
        );
    }

    #[test]
    fn test_simplify_category_with_frame() {
        let graph = graph(&[
            dataset(json!({
                "http://www.w3.org/ns/dcat#distribution": [{"@id": "_:d"}]
            })),
            json!({
                "@id": "_:d",
                "@type": ["http://www.w3.org/ns/dcat#Distribution"],
                "http://purl.org/dc/terms/title": [{"@value": "CSV"}]
            }),
        ]);
        let mut simplifier = Simplifier::new(&graph);
        let out = simplifier
            .simplify_category(Category::Dataset, false, Some(&FrameSpec::distributions()))
            .unwrap();
        assert_eq!(
            out["http://example.org/ds"]["distribution"],
            json!({"title": "CSV@fr"})
        );

        let distributions = simplifier
            .simplify_category(Category::Distribution, false, None)
            .unwrap();
        assert_eq!(distributions, json!({}));
        let distributions = simplifier
            .simplify_category(Category::Distribution, true, None)
            .unwrap();
        assert!(distributions.get("_:d").is_some());
    }
}
