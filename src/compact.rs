//! Ordered rendering of compacted JSON-LD
//!
//! Compaction against a context is delegated to a JSON-LD processor behind
//! [`JsonLdCompactor`]; [`ProcessorCompactor`] uses the `json-ld` crate. The
//! output is wrapped into a small tree of [`CompactNode`]s and rendered again
//! with a caller-chosen property order, so the printed document does not
//! depend on the processor's map ordering.

use std::collections::{HashMap, HashSet};

use futures::executor::block_on;
use indexmap::IndexMap;
use json_ld::syntax::{Context, Parse, Print, TryFromJson, Value as SyntaxValue};
use json_ld::{JsonLdProcessor, NoLoader, RemoteContextReference, RemoteDocument, RemoteDocumentReference};
use serde::Deserialize;
use serde_json::{json, Map, Value};

use crate::error::CatalogError;

/// An external JSON-LD compaction processor
pub trait JsonLdCompactor {
    /// Compact an expanded document against a context
    fn compact(&self, expanded: &Value, context: &Value) -> Result<Value, CatalogError>;
}

/// Compaction with the `json-ld` crate's processor.
///
/// The context is given inline, so no remote document is ever loaded; a
/// context document wrapping its definitions in `@context` is unwrapped.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessorCompactor;

impl JsonLdCompactor for ProcessorCompactor {
    fn compact(&self, expanded: &Value, context: &Value) -> Result<Value, CatalogError> {
        let context = context.get("@context").unwrap_or(context);
        let context = Context::try_from_json(to_syntax(context)?)
            .map_err(|e| CatalogError::Compaction(format!("invalid context: {}", e)))?;
        let context: RemoteContextReference =
            RemoteDocumentReference::Loaded(RemoteDocument::new(None, None, context));

        let input: RemoteDocument = RemoteDocument::new(None, None, to_syntax(expanded)?);
        let compacted = block_on(input.compact(context, &NoLoader))
            .map_err(|e| CatalogError::Compaction(e.to_string()))?;

        Ok(serde_json::from_str(&compacted.compact_print().to_string())?)
    }
}

/// Re-read a `serde_json` value with the processor's JSON model
fn to_syntax(value: &Value) -> Result<SyntaxValue, CatalogError> {
    let text = serde_json::to_string(value)?;
    SyntaxValue::parse_str(&text)
        .map(|(parsed, _)| parsed)
        .map_err(|e| CatalogError::Compaction(format!("cannot read document: {}", e)))
}

/// One entry of a property order: a property name, or a property whose
/// nested resources follow their own order
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum OrderEntry {
    Name(String),
    Nested(IndexMap<String, Vec<OrderEntry>>),
}

/// Property order per compacted type name, e.g. `Dataset`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PropertyOrder {
    #[serde(default)]
    pub per_type: HashMap<String, Vec<OrderEntry>>,
    /// Order for resources whose type has no entry
    #[serde(default)]
    pub fallback: Vec<OrderEntry>,
}

impl PropertyOrder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_type<I, S>(mut self, type_name: &str, properties: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.per_type.insert(
            type_name.to_string(),
            properties
                .into_iter()
                .map(|p| OrderEntry::Name(p.into()))
                .collect(),
        );
        self
    }

    /// Entries for a `@type` value; the first listed type with an entry wins
    fn for_type(&self, type_value: Option<&Value>) -> &[OrderEntry] {
        let found = match type_value {
            Some(Value::String(t)) => self.per_type.get(t),
            Some(Value::Array(types)) => types
                .iter()
                .filter_map(Value::as_str)
                .find_map(|t| self.per_type.get(t)),
            _ => None,
        };
        found.unwrap_or(&self.fallback)
    }
}

/// A node of a compacted document
#[derive(Debug, Clone, PartialEq)]
pub enum CompactNode {
    Resource {
        /// `None` for an anonymous resource
        id: Option<String>,
        type_value: Option<Value>,
        properties: IndexMap<String, CompactNode>,
    },
    Reference(String),
    Literal(Value),
    List(Vec<CompactNode>),
}

impl CompactNode {
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Array(items) => CompactNode::List(items.iter().map(CompactNode::from_json).collect()),
            Value::Object(obj) if obj.contains_key("@value") => CompactNode::Literal(value.clone()),
            Value::Object(obj) if obj.len() == 1 && obj.contains_key("@id") => {
                match obj.get("@id").and_then(Value::as_str) {
                    Some(id) => CompactNode::Reference(id.to_string()),
                    None => CompactNode::Literal(value.clone()),
                }
            }
            Value::Object(obj) => {
                CompactNode::Resource {
                    id: obj.get("@id").and_then(Value::as_str).map(String::from),
                    type_value: obj.get("@type").cloned(),
                    properties: obj
                        .iter()
                        .filter(|(k, _)| *k != "@id" && *k != "@type")
                        .map(|(k, v)| (k.clone(), CompactNode::from_json(v)))
                        .collect(),
                }
            }
            other => CompactNode::Literal(other.clone()),
        }
    }

    /// Render with the order of each resource's type
    pub fn render(&self, order: &PropertyOrder) -> Value {
        self.render_with(order, None)
    }

    fn render_with(&self, order: &PropertyOrder, nested: Option<&[OrderEntry]>) -> Value {
        match self {
            CompactNode::Resource {
                id,
                type_value,
                properties,
            } => {
                let entries = nested.unwrap_or_else(|| order.for_type(type_value.as_ref()));
                let mut obj = Map::new();
                if let Some(id) = id {
                    obj.insert("@id".to_string(), Value::String(id.clone()));
                }
                if let Some(t) = type_value {
                    obj.insert("@type".to_string(), t.clone());
                }

                let mut placed: HashSet<&str> = HashSet::new();
                for entry in entries {
                    match entry {
                        OrderEntry::Name(name) => {
                            if let Some(node) = properties.get(name) {
                                obj.insert(name.clone(), node.render_with(order, None));
                                placed.insert(name);
                            }
                        }
                        OrderEntry::Nested(map) => {
                            for (name, inner) in map {
                                if let Some(node) = properties.get(name) {
                                    obj.insert(name.clone(), node.render_with(order, Some(inner.as_slice())));
                                    placed.insert(name);
                                }
                            }
                        }
                    }
                }
                for (name, node) in properties {
                    if !placed.contains(name.as_str()) {
                        obj.insert(name.clone(), node.render_with(order, None));
                    }
                }
                Value::Object(obj)
            }
            CompactNode::List(items) => Value::Array(
                items
                    .iter()
                    .map(|item| item.render_with(order, nested))
                    .collect(),
            ),
            CompactNode::Reference(id) => json!({ "@id": id }),
            CompactNode::Literal(value) => value.clone(),
        }
    }
}

/// A compacted graph with its context
#[derive(Debug, Clone, PartialEq)]
pub struct CompactGraph {
    context: Value,
    nodes: Vec<CompactNode>,
}

impl CompactGraph {
    /// Wrap a compacted document: either `{@context, @graph: [...]}` or a single node
    pub fn from_compacted(document: &Value) -> Result<Self, CatalogError> {
        let obj = document.as_object().ok_or_else(|| {
            CatalogError::Compaction(format!("compacted document is not an object: {}", document))
        })?;
        let context = obj.get("@context").cloned().unwrap_or(Value::Null);

        let nodes = match obj.get("@graph") {
            Some(Value::Array(nodes)) => nodes.iter().map(CompactNode::from_json).collect(),
            Some(other) => {
                return Err(CatalogError::Compaction(format!(
                    "@graph is not an array: {}",
                    other
                )))
            }
            None => {
                let mut single = obj.clone();
                single.remove("@context");
                if single.is_empty() {
                    Vec::new()
                } else {
                    vec![CompactNode::from_json(&Value::Object(single))]
                }
            }
        };

        Ok(Self { context, nodes })
    }

    /// Compact expanded resources with an external processor and wrap the result
    pub fn compact_with(
        compactor: &dyn JsonLdCompactor,
        expanded: &[Value],
        context: &Value,
    ) -> Result<Self, CatalogError> {
        let document = compactor.compact(&Value::Array(expanded.to_vec()), context)?;
        let mut graph = Self::from_compacted(&document)?;
        if graph.context.is_null() {
            graph.context = context.get("@context").unwrap_or(context).clone();
        }
        Ok(graph)
    }

    pub fn nodes(&self) -> &[CompactNode] {
        &self.nodes
    }

    pub fn render(&self, order: &PropertyOrder) -> Value {
        json!({
            "@context": self.context,
            "@graph": self.nodes.iter().map(|n| n.render(order)).collect::<Vec<_>>()
        })
    }

    pub fn to_json_string(&self, order: &PropertyOrder, pretty: bool) -> Result<String, CatalogError> {
        let doc = self.render(order);
        if pretty {
            Ok(serde_json::to_string_pretty(&doc)?)
        } else {
            Ok(serde_json::to_string(&doc)?)
        }
    }
}
