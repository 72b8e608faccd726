//! RDF resources
//!
//! A resource is an identifier, a type list and an ordered map from property
//! URI to a non-empty list of values. Resources are built from expanded
//! JSON-LD node objects and regenerate that shape through [`Resource::as_json_ld`].

use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::category::{Category, MEMBERSHIP_PROPERTIES};
use crate::error::CatalogError;
use crate::value::{is_blank_node, PropertyValue};
use crate::vocab::{dcterms, foaf, rdfs};

#[derive(Debug, Clone, PartialEq)]
pub struct Resource {
    id: String,
    types: Vec<String>,
    category: Category,
    properties: IndexMap<String, Vec<PropertyValue>>,
}

impl Resource {
    pub fn new(id: impl Into<String>, types: Vec<String>, category: Category) -> Self {
        Self {
            id: id.into(),
            types,
            category,
            properties: IndexMap::new(),
        }
    }

    /// Builder-style property assignment, used for synthesized resources
    pub fn with_property(mut self, property: &str, values: Vec<PropertyValue>) -> Self {
        self.set_values(property, values);
        self
    }

    /// Parse an expanded JSON-LD node object.
    ///
    /// The category is derived from `@type`; an unknown type combination
    /// fails with [`CatalogError::UnhandledType`].
    pub fn from_record(record: &Value) -> Result<Self, CatalogError> {
        let obj = record
            .as_object()
            .ok_or_else(|| CatalogError::MalformedResource(format!("not an object: {}", record)))?;

        let id = obj
            .get("@id")
            .and_then(Value::as_str)
            .ok_or_else(|| CatalogError::MalformedResource("missing @id".to_string()))?;

        let types = match obj.get("@type") {
            Some(Value::String(t)) => vec![t.clone()],
            Some(Value::Array(arr)) => arr
                .iter()
                .map(|t| {
                    t.as_str().map(String::from).ok_or_else(|| {
                        CatalogError::MalformedResource(format!("{}: non-string @type", id))
                    })
                })
                .collect::<Result<Vec<_>, _>>()?,
            _ => {
                return Err(CatalogError::MalformedResource(format!(
                    "{}: missing @type",
                    id
                )))
            }
        };

        let category = Category::from_types(&types)?;
        let mut resource = Resource::new(id, types, category);

        for (key, raw) in obj {
            if key.starts_with('@') {
                continue;
            }
            let values = match raw {
                Value::Array(arr) => arr
                    .iter()
                    .map(PropertyValue::from_json)
                    .collect::<Result<Vec<_>, _>>()?,
                other => vec![PropertyValue::from_json(other)?],
            };
            resource.set_values(key, values);
        }

        Ok(resource)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn types(&self) -> &[String] {
        &self.types
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn is_blank(&self) -> bool {
        is_blank_node(&self.id)
    }

    pub fn properties(&self) -> impl Iterator<Item = (&str, &[PropertyValue])> {
        self.properties
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn property_names(&self) -> Vec<String> {
        self.properties.keys().cloned().collect()
    }

    pub fn values(&self, property: &str) -> Option<&[PropertyValue]> {
        self.properties.get(property).map(Vec::as_slice)
    }

    pub fn has_property(&self, property: &str) -> bool {
        self.properties.contains_key(property)
    }

    /// Replace a property's values; an empty list removes the property
    pub fn set_values(&mut self, property: &str, values: Vec<PropertyValue>) {
        if values.is_empty() {
            self.properties.shift_remove(property);
        } else if let Some(existing) = self.properties.get_mut(property) {
            *existing = values;
        } else {
            self.properties.insert(property.to_string(), values);
        }
    }

    pub fn remove(&mut self, property: &str) -> Option<Vec<PropertyValue>> {
        self.properties.shift_remove(property)
    }

    /// Append values not already present
    pub fn union_values(&mut self, property: &str, values: Vec<PropertyValue>) {
        let mut merged = self.properties.get(property).cloned().unwrap_or_default();
        for value in values {
            if !merged.contains(&value) {
                merged.push(value);
            }
        }
        self.set_values(property, merged);
    }

    /// Rename a property, unioning with values already stored under the new name.
    /// Returns false when the old name is absent.
    pub fn rename_property(&mut self, from: &str, to: &str) -> bool {
        match self.properties.shift_remove(from) {
            Some(values) => {
                self.union_values(to, values);
                true
            }
            None => false,
        }
    }

    /// Combine a re-ingested record of the same id into this resource.
    ///
    /// Categories that union membership merge the membership properties;
    /// every other repeat is ignored. Returns true when values were added.
    pub fn merge_from(&mut self, other: Resource) -> bool {
        if !self.category.unions_membership() {
            return false;
        }
        let mut changed = false;
        for property in MEMBERSHIP_PROPERTIES {
            let Some(values) = other.properties.get(*property) else {
                continue;
            };
            let before = self.values(property).map_or(0, <[PropertyValue]>::len);
            self.union_values(property, values.clone());
            changed |= self.values(property).map_or(0, <[PropertyValue]>::len) != before;
        }
        changed
    }

    /// Human-readable label: `rdfs:label`, `dcterms:title`, `foaf:name`, else the types
    pub fn label(&self) -> String {
        for property in [rdfs::LABEL, dcterms::TITLE, foaf::NAME] {
            if let Some(first) = self
                .values(property)
                .and_then(|vals| vals.iter().find_map(PropertyValue::as_literal))
            {
                return first.value().to_string();
            }
        }
        self.types.join(", ")
    }

    /// Regenerate the expanded JSON-LD node object
    pub fn as_json_ld(&self) -> Value {
        let mut obj = Map::new();
        obj.insert("@id".to_string(), Value::String(self.id.clone()));
        obj.insert(
            "@type".to_string(),
            Value::Array(self.types.iter().cloned().map(Value::String).collect()),
        );
        for (property, values) in &self.properties {
            obj.insert(
                property.clone(),
                Value::Array(values.iter().map(PropertyValue::as_json_ld).collect()),
            );
        }
        Value::Object(obj)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vocab::dcat;
    use serde_json::json;

    fn catalog_page(dataset: &str) -> Value {
        json!({
            "@id": "http://example.org/catalog",
            "@type": ["http://www.w3.org/ns/dcat#Catalog"],
            "http://purl.org/dc/terms/title": [{"@value": "Catalogue"}],
            "http://www.w3.org/ns/dcat#dataset": [{"@id": dataset}]
        })
    }

    #[test]
    fn test_from_record() {
        let r = Resource::from_record(&catalog_page("http://example.org/ds1")).unwrap();
        assert_eq!(r.id(), "http://example.org/catalog");
        assert_eq!(r.category(), Category::Catalog);
        assert_eq!(
            r.values(dcat::DATASET).unwrap(),
            &[PropertyValue::reference("http://example.org/ds1")]
        );
        assert_eq!(r.label(), "Catalogue");
    }

    #[test]
    fn test_missing_type_or_id() {
        let err = Resource::from_record(&json!({"@id": "x"})).unwrap_err();
        assert!(matches!(err, CatalogError::MalformedResource(_)));
        let err = Resource::from_record(&json!({"@type": ["t"]})).unwrap_err();
        assert!(matches!(err, CatalogError::MalformedResource(_)));
    }

    #[test]
    fn test_unhandled_type_propagates() {
        let err = Resource::from_record(&json!({
            "@id": "x",
            "@type": ["http://example.org/Thing"]
        }))
        .unwrap_err();
        assert!(matches!(err, CatalogError::UnhandledType(_)));
    }

    #[test]
    fn test_empty_property_not_stored() {
        let r = Resource::from_record(&json!({
            "@id": "_:b0",
            "@type": "http://xmlns.com/foaf/0.1/Organization",
            "http://xmlns.com/foaf/0.1/name": []
        }))
        .unwrap();
        assert!(!r.has_property(foaf::NAME));
        assert!(r.is_blank());
    }

    #[test]
    fn test_merge_unions_membership() {
        let mut first = Resource::from_record(&catalog_page("http://example.org/ds1")).unwrap();
        let second = Resource::from_record(&catalog_page("http://example.org/ds2")).unwrap();
        assert!(first.merge_from(second.clone()));
        assert_eq!(first.values(dcat::DATASET).unwrap().len(), 2);
        // identical repeat adds nothing
        assert!(!first.merge_from(second));
        assert_eq!(first.values(dcat::DATASET).unwrap().len(), 2);
        assert_eq!(first.values(dcterms::TITLE).unwrap().len(), 1);
    }

    #[test]
    fn test_merge_ignored_for_other_categories() {
        let record = json!({
            "@id": "http://example.org/org",
            "@type": ["http://xmlns.com/foaf/0.1/Organization"],
            "http://xmlns.com/foaf/0.1/name": [{"@value": "Org"}]
        });
        let mut first = Resource::from_record(&record).unwrap();
        let snapshot = first.clone();
        assert!(!first.merge_from(Resource::from_record(&record).unwrap()));
        assert_eq!(first, snapshot);
    }

    #[test]
    fn test_rename_property_unions() {
        let mut r = Resource::new("x", vec![], Category::Dataset)
            .with_property(dcterms::PUBLISHER, vec![PropertyValue::reference("a")])
            .with_property(
                dcat::PUBLISHER_MISPLACED,
                vec![PropertyValue::reference("a"), PropertyValue::reference("b")],
            );
        assert!(r.rename_property(dcat::PUBLISHER_MISPLACED, dcterms::PUBLISHER));
        assert!(!r.has_property(dcat::PUBLISHER_MISPLACED));
        assert_eq!(
            r.values(dcterms::PUBLISHER).unwrap(),
            &[PropertyValue::reference("a"), PropertyValue::reference("b")]
        );
        assert!(!r.rename_property(dcat::PUBLISHER_MISPLACED, dcterms::PUBLISHER));
    }

    #[test]
    fn test_as_json_ld_inverts_from_record() {
        let record = catalog_page("http://example.org/ds1");
        let r = Resource::from_record(&record).unwrap();
        assert_eq!(r.as_json_ld(), record);
    }

    #[test]
    fn test_label_falls_back_to_types() {
        let r = Resource::new(
            "_:b1",
            vec![dcterms::PERIOD_OF_TIME.to_string()],
            Category::Generic,
        );
        assert_eq!(r.label(), dcterms::PERIOD_OF_TIME);
    }
}
