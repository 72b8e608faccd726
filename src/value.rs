//! RDF property values
//!
//! In expanded JSON-LD every value of a property is an object whose key set
//! tells what it is:
//!
//! - `{"@id"}` - a reference to another resource (URI or blank node)
//! - `{"@value"}` - a plain literal
//! - `{"@type", "@value"}` - a typed literal
//! - `{"@language", "@value"}` - a language-tagged string
//!
//! Any other key combination is rejected.

use serde_json::{Map, Value};

use crate::error::CatalogError;
use crate::vocab::BLANK_NODE_PREFIX;

/// Check if an identifier is a blank node id
pub fn is_blank_node(id: &str) -> bool {
    id.starts_with(BLANK_NODE_PREFIX)
}

/// An RDF literal. At most one of `language` and `datatype` is set.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Literal {
    value: String,
    language: Option<String>,
    datatype: Option<String>,
}

impl Literal {
    /// A literal with neither language nor datatype
    pub fn plain(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            language: None,
            datatype: None,
        }
    }

    pub fn lang(value: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            language: Some(language.into()),
            datatype: None,
        }
    }

    pub fn typed(value: impl Into<String>, datatype: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            language: None,
            datatype: Some(datatype.into()),
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    pub fn datatype(&self) -> Option<&str> {
        self.datatype.as_deref()
    }

    /// True for a literal carrying neither language nor datatype
    pub fn is_plain(&self) -> bool {
        self.language.is_none() && self.datatype.is_none()
    }
}

/// A reference to another resource
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Reference {
    id: String,
}

impl Reference {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn is_blank(&self) -> bool {
        is_blank_node(&self.id)
    }
}

/// One value of an RDF property
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PropertyValue {
    Literal(Literal),
    Reference(Reference),
}

impl PropertyValue {
    pub fn reference(id: impl Into<String>) -> Self {
        PropertyValue::Reference(Reference::new(id))
    }

    pub fn plain(value: impl Into<String>) -> Self {
        PropertyValue::Literal(Literal::plain(value))
    }

    pub fn lang(value: impl Into<String>, language: impl Into<String>) -> Self {
        PropertyValue::Literal(Literal::lang(value, language))
    }

    pub fn typed(value: impl Into<String>, datatype: impl Into<String>) -> Self {
        PropertyValue::Literal(Literal::typed(value, datatype))
    }

    /// Parse a value record, classifying it by its key set
    pub fn from_json(record: &Value) -> Result<Self, CatalogError> {
        let obj = record.as_object().ok_or_else(|| CatalogError::MalformedValue {
            keys: format!("not an object: {}", record),
        })?;

        let mut keys: Vec<&str> = obj.keys().map(String::as_str).collect();
        keys.sort_unstable();

        match keys.as_slice() {
            ["@id"] => Ok(PropertyValue::reference(string_field(obj, "@id")?)),
            ["@value"] => Ok(PropertyValue::plain(lexical_value(obj)?)),
            ["@type", "@value"] => Ok(PropertyValue::typed(
                lexical_value(obj)?,
                string_field(obj, "@type")?,
            )),
            ["@language", "@value"] => Ok(PropertyValue::lang(
                lexical_value(obj)?,
                string_field(obj, "@language")?,
            )),
            _ => Err(CatalogError::MalformedValue {
                keys: keys.join(","),
            }),
        }
    }

    /// Regenerate the value record this value was parsed from
    pub fn as_json_ld(&self) -> Value {
        let mut obj = Map::new();
        match self {
            PropertyValue::Reference(r) => {
                obj.insert("@id".to_string(), Value::String(r.id.clone()));
            }
            PropertyValue::Literal(l) => {
                if let Some(language) = &l.language {
                    obj.insert("@language".to_string(), Value::String(language.clone()));
                } else if let Some(datatype) = &l.datatype {
                    obj.insert("@type".to_string(), Value::String(datatype.clone()));
                }
                obj.insert("@value".to_string(), Value::String(l.value.clone()));
            }
        }
        Value::Object(obj)
    }

    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            PropertyValue::Literal(l) => Some(l),
            PropertyValue::Reference(_) => None,
        }
    }

    pub fn as_reference(&self) -> Option<&Reference> {
        match self {
            PropertyValue::Reference(r) => Some(r),
            PropertyValue::Literal(_) => None,
        }
    }

    /// The plain literal text, if this is a literal without language or datatype
    pub fn as_plain_text(&self) -> Option<&str> {
        self.as_literal()
            .filter(|l| l.is_plain())
            .map(Literal::value)
    }
}

fn string_field(obj: &Map<String, Value>, key: &str) -> Result<String, CatalogError> {
    obj.get(key)
        .and_then(Value::as_str)
        .map(String::from)
        .ok_or_else(|| CatalogError::MalformedValue {
            keys: format!("{} is not a string", key),
        })
}

/// Lexical form of `@value`; numbers and booleans are kept in their JSON spelling
fn lexical_value(obj: &Map<String, Value>) -> Result<String, CatalogError> {
    match obj.get("@value") {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(v @ (Value::Number(_) | Value::Bool(_))) => Ok(v.to_string()),
        _ => Err(CatalogError::MalformedValue {
            keys: "@value is not a scalar".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_classify_by_key_set() {
        assert_eq!(
            PropertyValue::from_json(&json!({"@id": "http://example.org/a"})).unwrap(),
            PropertyValue::reference("http://example.org/a")
        );
        assert_eq!(
            PropertyValue::from_json(&json!({"@value": "x"})).unwrap(),
            PropertyValue::plain("x")
        );
        assert_eq!(
            PropertyValue::from_json(&json!({"@language": "fr", "@value": "x"})).unwrap(),
            PropertyValue::lang("x", "fr")
        );
        assert_eq!(
            PropertyValue::from_json(&json!({
                "@type": "http://www.w3.org/2001/XMLSchema#date",
                "@value": "2023-05-18"
            }))
            .unwrap(),
            PropertyValue::typed("2023-05-18", "http://www.w3.org/2001/XMLSchema#date")
        );
    }

    #[test]
    fn test_numeric_value_keeps_json_spelling() {
        let value = PropertyValue::from_json(&json!({"@value": 100})).unwrap();
        assert_eq!(value.as_plain_text(), Some("100"));
    }

    #[test]
    fn test_unknown_key_set_is_malformed() {
        let err = PropertyValue::from_json(&json!({"@id": "a", "@value": "b"})).unwrap_err();
        assert!(matches!(err, CatalogError::MalformedValue { .. }));

        let err = PropertyValue::from_json(&json!({
            "@language": "fr", "@type": "t", "@value": "b"
        }))
        .unwrap_err();
        assert!(matches!(err, CatalogError::MalformedValue { .. }));

        assert!(PropertyValue::from_json(&json!("bare string")).is_err());
    }

    #[test]
    fn test_as_json_ld_restores_key_set() {
        for record in [
            json!({"@id": "_:b0"}),
            json!({"@value": "plain"}),
            json!({"@language": "en", "@value": "tagged"}),
            json!({"@type": "http://www.w3.org/2001/XMLSchema#dateTime", "@value": "2022-09-21T13:31:46"}),
        ] {
            let value = PropertyValue::from_json(&record).unwrap();
            assert_eq!(value.as_json_ld(), record);
        }
    }

    #[test]
    fn test_blank_node_detection() {
        assert!(Reference::new("_:md5-abc").is_blank());
        assert!(!Reference::new("http://example.org/_:x").is_blank());
    }
}
