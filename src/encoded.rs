//! Recovery of values carrying a nested structured encoding
//!
//! The upstream export sometimes serializes a multilingual label or a URI
//! holder as a Python-style dict string, e.g.
//! `{'label': {'fr': 'Licence ouverte', 'en': ''}, 'type': []}` or
//! `[{'uri': 'https://spdx.org/licenses/etalab-2.0'}]`. Those strings are
//! flow-style YAML, so they are parsed with `serde_yaml` and mapped back to
//! RDF values.

use serde_yaml::{Mapping, Value as Yaml};

use crate::value::PropertyValue;

/// Encodings that carry no information and are dropped
const EMPTY_PLACEHOLDERS: &[&str] = &["{'fr': [], 'en': []}", "{'fr': '', 'en': ''}"];

/// True when a literal's text looks like a nested encoding
pub fn looks_encoded(text: &str) -> bool {
    text.starts_with('{') || text.starts_with("[{")
}

/// Decode an encoded literal into zero or more values.
///
/// Empty placeholders yield no value. Text that cannot be parsed, even after
/// repairing backslash-escaped quotes, or whose structure is not recognized,
/// yields a single diagnostic literal.
pub fn decode(text: &str) -> Vec<PropertyValue> {
    if EMPTY_PLACEHOLDERS.contains(&text) {
        return Vec::new();
    }

    let parsed = match serde_yaml::from_str::<Yaml>(text) {
        Ok(yaml) => yaml,
        Err(_) => match serde_yaml::from_str::<Yaml>(&text.replace("\\'", "''")) {
            Ok(yaml) => yaml,
            Err(e) => {
                log::warn!("Unparsable encoded value {}: {}", text, e);
                return vec![PropertyValue::plain(format!(
                    "unparsable encoded value: {}",
                    text
                ))];
            }
        },
    };

    let elements = match parsed {
        Yaml::Sequence(seq) => seq,
        other => vec![other],
    };

    elements
        .iter()
        .map(|element| {
            element
                .as_mapping()
                .and_then(structure_to_value)
                .unwrap_or_else(|| {
                    log::warn!("Unrecognized encoded structure in {}", text);
                    PropertyValue::plain(format!("unrecognized encoded value: {}", text))
                })
        })
        .collect()
}

/// Map one decoded structure to a value
fn structure_to_value(map: &Mapping) -> Option<PropertyValue> {
    let keys = keys_of(map)?;

    match keys.as_slice() {
        ["label"] => map.get("label").and_then(Yaml::as_mapping).and_then(french_only),
        ["label", "type"] if !truthy(map.get("type")) => {
            map.get("label").and_then(Yaml::as_mapping).and_then(french_only)
        }
        ["fr", "en"] => french_only(map),
        _ => match map.get("uri") {
            Some(Yaml::String(uri)) if !uri.is_empty() => Some(PropertyValue::reference(uri)),
            _ => None,
        },
    }
}

/// A `{fr, en}` label where only the French text is given
fn french_only(map: &Mapping) -> Option<PropertyValue> {
    if keys_of(map)?.as_slice() != ["fr", "en"] || truthy(map.get("en")) {
        return None;
    }
    let text = match map.get("fr")? {
        Yaml::String(s) if !s.is_empty() => s.as_str(),
        Yaml::Sequence(seq) if seq.len() == 1 => seq[0].as_str().filter(|s| !s.is_empty())?,
        _ => return None,
    };
    Some(PropertyValue::lang(text, "fr"))
}

fn keys_of(map: &Mapping) -> Option<Vec<&str>> {
    map.keys().map(Yaml::as_str).collect()
}

/// Whether a field carries information: absent, null, false, empty string
/// and empty collections do not
fn truthy(value: Option<&Yaml>) -> bool {
    match value {
        None | Some(Yaml::Null) => false,
        Some(Yaml::Bool(b)) => *b,
        Some(Yaml::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(Yaml::String(s)) => !s.is_empty(),
        Some(Yaml::Sequence(seq)) => !seq.is_empty(),
        Some(Yaml::Mapping(map)) => !map.is_empty(),
        Some(Yaml::Tagged(_)) => true,
    }
}
