//! Per-resource rectification of upstream encoding defects
//!
//! Rectification first repairs known-bad property URIs, then runs an ordered
//! chain of rules over each property's value list. A rule either does not
//! apply, claims the property and leaves it unchanged, or replaces its value
//! list. The first rule that claims a property ends the chain for that pass;
//! a replaced list is run through the chain again until it settles, so
//! rectifying an already rectified resource changes nothing.
//!
//! Each replacement increments the rule's counter in the supplied [`Stats`].

use crate::encoded;
use crate::error::CatalogError;
use crate::resource::Resource;
use crate::stats::Stats;
use crate::value::{Literal, PropertyValue};
use crate::vocab::{authority, dcat, dcterms, foaf, registry, vcard, xsd};

pub const PROPERTY_URI_REPAIR: &str = "property URI repair";
pub const LANGUAGE_REPAIR: &str = "language repair";
pub const MAILBOX_REPAIR: &str = "mailbox repair";
pub const LITERAL_DUPLICATION: &str = "literal duplicated with and without language";
pub const DATE_DUPLICATION: &str = "date duplicated as date and dateTime";
pub const ENCODED_VALUE: &str = "property holding a structured encoding";
pub const THEME_REPAIR: &str = "theme label replaced by URI";

/// Known-bad property URIs and their replacement
const PROPERTY_URI_FIXES: &[(&str, &str)] = &[
    (dcterms::RIGHTS_HOLDER_MISSPELLED, dcterms::RIGHTS_HOLDER),
    (dcat::PUBLISHER_MISPLACED, dcterms::PUBLISHER),
];

/// Encoded literal standing for the French language authority URI
const ENCODED_FRENCH: &str = "{'uri': 'http://publications.europa.eu/resource/authority/language/FRA'}";

/// Two-letter codes used as language ids, with their authority code
const LANGUAGE_CODES: &[(&str, &str)] = &[
    ("fr", "FRA"),
    ("en", "ENG"),
    ("de", "DEU"),
    ("es", "SPA"),
    ("it", "ITA"),
    ("nl", "NLD"),
];

/// Theme ids given as a bare label, with their registry URI
const THEME_LABELS: &[(&str, &str)] = &[("Énergie", registry::THEME_ENERGIE)];

/// Properties whose plain literals receive the default language
const DEFAULT_LANGUAGE_PROPERTIES: &[&str] = &[dcterms::TITLE, dcterms::DESCRIPTION, foaf::NAME];

/// One property of one resource, as seen by a rule
pub struct PropertyContext<'a> {
    pub id: &'a str,
    pub property: &'a str,
    pub values: &'a [PropertyValue],
}

/// Result of applying a rule to a property
#[derive(Debug, PartialEq)]
pub enum Outcome {
    /// The rule does not concern this property; try the next one
    NotApplicable,
    /// The rule claims the property but has nothing to change
    Unchanged,
    /// The rule claims the property and rewrites its values
    Replaced(Vec<PropertyValue>),
}

pub type Rule = fn(&PropertyContext) -> Result<Outcome, CatalogError>;

/// The ordered rule chain with the counter label of each rule
pub const RULES: &[(&str, Rule)] = &[
    (LANGUAGE_REPAIR, language_rule),
    (MAILBOX_REPAIR, mailbox_rule),
    (LITERAL_DUPLICATION, literal_duplication_rule),
    (DATE_DUPLICATION, date_duplication_rule),
    (ENCODED_VALUE, encoded_value_rule),
    (THEME_REPAIR, theme_rule),
];

/// Rectify a resource in place.
///
/// Fails only on conditions no rule can repair (a mailbox property without
/// exactly one value); the resource may then be partially rectified.
pub fn rectify(resource: &mut Resource, stats: &mut Stats) -> Result<(), CatalogError> {
    repair_property_uris(resource, stats);

    for property in resource.property_names() {
        let mut changed = false;
        // each pass either settles or replaces the list; the bound guards against
        // two rules undoing each other
        for _ in 0..=RULES.len() {
            let Some(values) = resource.values(&property) else {
                break;
            };
            let ctx = PropertyContext {
                id: resource.id(),
                property: &property,
                values,
            };
            match apply_chain(&ctx, stats)? {
                Some(replacement) => {
                    resource.set_values(&property, replacement);
                    changed = true;
                }
                None => break,
            }
        }
        if changed {
            log::debug!("Rectified {} of {}", property, resource.id());
        }
    }
    Ok(())
}

/// Run the rule chain once over a property; `Some` carries a replacement list
fn apply_chain(
    ctx: &PropertyContext,
    stats: &mut Stats,
) -> Result<Option<Vec<PropertyValue>>, CatalogError> {
    for (label, rule) in RULES {
        match rule(ctx)? {
            Outcome::NotApplicable => continue,
            Outcome::Unchanged => return Ok(None),
            Outcome::Replaced(values) => {
                stats.increment(label);
                return Ok(Some(values));
            }
        }
    }
    Ok(None)
}

fn repair_property_uris(resource: &mut Resource, stats: &mut Stats) {
    for (bad, valid) in PROPERTY_URI_FIXES {
        if resource.rename_property(bad, valid) {
            stats.increment(PROPERTY_URI_REPAIR);
        }
    }
}

/// Give plain literals of label-like properties a default language
pub fn apply_default_language(resource: &mut Resource, language: &str, stats: &mut Stats) {
    for property in DEFAULT_LANGUAGE_PROPERTIES {
        let Some(values) = resource.values(property) else {
            continue;
        };
        if !values.iter().any(|v| v.as_plain_text().is_some()) {
            continue;
        }
        let tagged: Vec<PropertyValue> = values
            .iter()
            .map(|v| match v.as_plain_text() {
                Some(text) => {
                    stats.increment(&format!("{} defaults to language {}", property, language));
                    PropertyValue::lang(text, language)
                }
                None => v.clone(),
            })
            .collect();
        resource.set_values(property, tagged);
    }
}

fn language_rule(ctx: &PropertyContext) -> Result<Outcome, CatalogError> {
    if ctx.property != dcterms::LANGUAGE {
        return Ok(Outcome::NotApplicable);
    }

    let mut values = match ctx.values {
        // URI duplicated by a plain string: keep the URI
        [r @ PropertyValue::Reference(_), l] | [l, r @ PropertyValue::Reference(_)]
            if l.as_plain_text().is_some() =>
        {
            vec![r.clone()]
        }
        [single] if single.as_plain_text() == Some(ENCODED_FRENCH) => {
            vec![PropertyValue::reference(authority::LANGUAGE_FRA)]
        }
        other => other.to_vec(),
    };

    values = values
        .into_iter()
        .map(|value| language_uri(&value).unwrap_or(value))
        .collect();

    if values.as_slice() == ctx.values {
        Ok(Outcome::Unchanged)
    } else {
        Ok(Outcome::Replaced(values))
    }
}

/// Authority URI for a reference whose id is a two-letter language code
fn language_uri(value: &PropertyValue) -> Option<PropertyValue> {
    let r = value.as_reference()?;
    let (_, code) = LANGUAGE_CODES.iter().find(|(short, _)| *short == r.id())?;
    Some(PropertyValue::reference(format!(
        "{}{}",
        authority::LANGUAGE_NS,
        code
    )))
}

fn mailbox_rule(ctx: &PropertyContext) -> Result<Outcome, CatalogError> {
    if ctx.property != foaf::MBOX && ctx.property != vcard::HAS_EMAIL {
        return Ok(Outcome::NotApplicable);
    }
    let [value] = ctx.values else {
        return Err(CatalogError::MailboxCardinality {
            id: ctx.id.to_string(),
            property: ctx.property.to_string(),
            count: ctx.values.len(),
        });
    };

    if let Some(address) = value.as_plain_text() {
        return Ok(Outcome::Replaced(vec![PropertyValue::reference(format!(
            "mailto:{}",
            address
        ))]));
    }
    match value.as_reference() {
        Some(r) if !r.id().starts_with("mailto:") => Ok(Outcome::Replaced(vec![
            PropertyValue::reference(format!("mailto:{}", r.id())),
        ])),
        _ => Ok(Outcome::Unchanged),
    }
}

fn literal_pair(values: &[PropertyValue]) -> Option<(&Literal, &Literal)> {
    match values {
        [PropertyValue::Literal(a), PropertyValue::Literal(b)] => Some((a, b)),
        _ => None,
    }
}

fn literal_duplication_rule(ctx: &PropertyContext) -> Result<Outcome, CatalogError> {
    let Some((a, b)) = literal_pair(ctx.values) else {
        return Ok(Outcome::NotApplicable);
    };
    if a.value() != b.value() {
        return Ok(Outcome::NotApplicable);
    }
    let kept = match (a.language(), b.language()) {
        (Some(_), None) => &ctx.values[0],
        (None, Some(_)) => &ctx.values[1],
        _ => return Ok(Outcome::NotApplicable),
    };
    Ok(Outcome::Replaced(vec![kept.clone()]))
}

fn date_duplication_rule(ctx: &PropertyContext) -> Result<Outcome, CatalogError> {
    let Some((a, b)) = literal_pair(ctx.values) else {
        return Ok(Outcome::NotApplicable);
    };
    let (date, date_time, kept) = match (a.datatype(), b.datatype()) {
        (Some(xsd::DATE), Some(xsd::DATE_TIME)) => (a, b, &ctx.values[0]),
        (Some(xsd::DATE_TIME), Some(xsd::DATE)) => (b, a, &ctx.values[1]),
        _ => return Ok(Outcome::NotApplicable),
    };
    // only a true duplicate: the dateTime must fall on the date
    let day = date_time.value().split('T').next().unwrap_or_default();
    if day != date.value() {
        return Ok(Outcome::NotApplicable);
    }
    Ok(Outcome::Replaced(vec![kept.clone()]))
}

fn encoded_value_rule(ctx: &PropertyContext) -> Result<Outcome, CatalogError> {
    let is_encoded =
        |v: &PropertyValue| v.as_plain_text().is_some_and(encoded::looks_encoded);
    if !ctx.values.iter().any(is_encoded) {
        return Ok(Outcome::NotApplicable);
    }

    let mut values = Vec::with_capacity(ctx.values.len());
    for value in ctx.values {
        match value.as_plain_text() {
            Some(text) if encoded::looks_encoded(text) => values.extend(encoded::decode(text)),
            _ => values.push(value.clone()),
        }
    }
    Ok(Outcome::Replaced(values))
}

fn theme_rule(ctx: &PropertyContext) -> Result<Outcome, CatalogError> {
    if ctx.property != dcat::THEME {
        return Ok(Outcome::NotApplicable);
    }
    let repaired = |v: &PropertyValue| {
        v.as_reference().and_then(|r| {
            THEME_LABELS
                .iter()
                .find(|(label, _)| *label == r.id())
                .map(|(_, uri)| PropertyValue::reference(*uri))
        })
    };
    if !ctx.values.iter().any(|v| repaired(v).is_some()) {
        return Ok(Outcome::NotApplicable);
    }
    Ok(Outcome::Replaced(
        ctx.values
            .iter()
            .map(|v| repaired(v).unwrap_or_else(|| v.clone()))
            .collect(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::Category;

    fn resource(property: &str, values: Vec<PropertyValue>) -> Resource {
        Resource::new("http://example.org/ds", vec![], Category::Dataset)
            .with_property(property, values)
    }

    fn rectified(property: &str, values: Vec<PropertyValue>) -> (Resource, Stats) {
        let mut r = resource(property, values);
        let mut stats = Stats::new();
        rectify(&mut r, &mut stats).unwrap();
        (r, stats)
    }

    #[test]
    fn test_property_uri_repair_unions() {
        let mut r = resource(
            dcterms::RIGHTS_HOLDER_MISSPELLED,
            vec![PropertyValue::reference("http://example.org/org")],
        );
        let mut stats = Stats::new();
        rectify(&mut r, &mut stats).unwrap();
        assert!(!r.has_property(dcterms::RIGHTS_HOLDER_MISSPELLED));
        assert_eq!(r.values(dcterms::RIGHTS_HOLDER).unwrap().len(), 1);
        assert_eq!(stats.get(PROPERTY_URI_REPAIR), 1);
    }

    #[test]
    fn test_language_keeps_reference_in_either_order() {
        for values in [
            vec![
                PropertyValue::reference(authority::LANGUAGE_FRA),
                PropertyValue::plain("fr"),
            ],
            vec![
                PropertyValue::plain("fr"),
                PropertyValue::reference(authority::LANGUAGE_FRA),
            ],
        ] {
            let (r, stats) = rectified(dcterms::LANGUAGE, values);
            assert_eq!(
                r.values(dcterms::LANGUAGE).unwrap(),
                &[PropertyValue::reference(authority::LANGUAGE_FRA)]
            );
            assert_eq!(stats.get(LANGUAGE_REPAIR), 1);
        }
    }

    #[test]
    fn test_language_encoded_french_and_codes() {
        let (r, _) = rectified(dcterms::LANGUAGE, vec![PropertyValue::plain(ENCODED_FRENCH)]);
        assert_eq!(
            r.values(dcterms::LANGUAGE).unwrap(),
            &[PropertyValue::reference(authority::LANGUAGE_FRA)]
        );

        let (r, _) = rectified(dcterms::LANGUAGE, vec![PropertyValue::reference("en")]);
        assert_eq!(
            r.values(dcterms::LANGUAGE).unwrap(),
            &[PropertyValue::reference(
                "http://publications.europa.eu/resource/authority/language/ENG"
            )]
        );
    }

    #[test]
    fn test_language_codes_in_a_list() {
        let (r, stats) = rectified(
            dcterms::LANGUAGE,
            vec![
                PropertyValue::reference("fr"),
                PropertyValue::reference("en"),
                PropertyValue::reference("http://example.org/lang/other"),
            ],
        );
        assert_eq!(
            r.values(dcterms::LANGUAGE).unwrap(),
            &[
                PropertyValue::reference(authority::LANGUAGE_FRA),
                PropertyValue::reference(
                    "http://publications.europa.eu/resource/authority/language/ENG"
                ),
                PropertyValue::reference("http://example.org/lang/other"),
            ]
        );
        assert_eq!(stats.get(LANGUAGE_REPAIR), 1);
    }

    #[test]
    fn test_language_property_skips_later_rules() {
        let values = vec![PropertyValue::plain("{'uri': 'x'}")];
        let (r, stats) = rectified(dcterms::LANGUAGE, values.clone());
        assert_eq!(r.values(dcterms::LANGUAGE).unwrap(), values.as_slice());
        assert!(stats.is_empty());
    }

    #[test]
    fn test_mailbox_repairs() {
        let (r, stats) = rectified(foaf::MBOX, vec![PropertyValue::plain("a@b.fr")]);
        assert_eq!(
            r.values(foaf::MBOX).unwrap(),
            &[PropertyValue::reference("mailto:a@b.fr")]
        );
        assert_eq!(stats.get(MAILBOX_REPAIR), 1);

        let (r, _) = rectified(vcard::HAS_EMAIL, vec![PropertyValue::reference("a@b.fr")]);
        assert_eq!(
            r.values(vcard::HAS_EMAIL).unwrap(),
            &[PropertyValue::reference("mailto:a@b.fr")]
        );

        let (_, stats) = rectified(foaf::MBOX, vec![PropertyValue::reference("mailto:a@b.fr")]);
        assert!(stats.is_empty());
    }

    #[test]
    fn test_mailbox_cardinality() {
        let mut r = resource(
            foaf::MBOX,
            vec![PropertyValue::plain("a@b.fr"), PropertyValue::plain("c@d.fr")],
        );
        let err = rectify(&mut r, &mut Stats::new()).unwrap_err();
        assert!(matches!(err, CatalogError::MailboxCardinality { count: 2, .. }));
    }

    #[test]
    fn test_literal_duplication() {
        let (r, stats) = rectified(
            dcterms::TITLE,
            vec![PropertyValue::plain("Titre"), PropertyValue::lang("Titre", "fr")],
        );
        assert_eq!(
            r.values(dcterms::TITLE).unwrap(),
            &[PropertyValue::lang("Titre", "fr")]
        );
        assert_eq!(stats.get(LITERAL_DUPLICATION), 1);

        let values = vec![PropertyValue::lang("Titre", "fr"), PropertyValue::lang("Titre", "en")];
        let (r, stats) = rectified(dcterms::TITLE, values.clone());
        assert_eq!(r.values(dcterms::TITLE).unwrap(), values.as_slice());
        assert!(stats.is_empty());
    }

    #[test]
    fn test_date_duplication_both_orders() {
        let date = PropertyValue::typed("2023-05-18", xsd::DATE);
        let date_time = PropertyValue::typed("2023-05-18T10:00:00", xsd::DATE_TIME);
        for values in [
            vec![date.clone(), date_time.clone()],
            vec![date_time.clone(), date.clone()],
        ] {
            let (r, stats) = rectified(dcterms::MODIFIED, values);
            assert_eq!(r.values(dcterms::MODIFIED).unwrap(), &[date.clone()]);
            assert_eq!(stats.get(DATE_DUPLICATION), 1);
        }
    }

    #[test]
    fn test_date_duplication_needs_same_day() {
        let values = vec![
            PropertyValue::typed("2023-05-18", xsd::DATE),
            PropertyValue::typed("2021-01-01T10:00:00", xsd::DATE_TIME),
        ];
        let (r, _) = rectified(dcterms::MODIFIED, values.clone());
        assert_eq!(r.values(dcterms::MODIFIED).unwrap(), values.as_slice());
    }

    #[test]
    fn test_encoded_values() {
        let (r, stats) = rectified(
            dcterms::LICENSE,
            vec![PropertyValue::plain(
                "[{'label': {'fr': '', 'en': ''}, 'type': [], 'uri': 'https://spdx.org/licenses/etalab-2.0'}]",
            )],
        );
        assert_eq!(
            r.values(dcterms::LICENSE).unwrap(),
            &[PropertyValue::reference("https://spdx.org/licenses/etalab-2.0")]
        );
        assert_eq!(stats.get(ENCODED_VALUE), 1);
    }

    #[test]
    fn test_empty_placeholder_removes_property() {
        let (r, _) = rectified(
            dcterms::PROVENANCE,
            vec![PropertyValue::plain("{'fr': [], 'en': []}")],
        );
        assert!(!r.has_property(dcterms::PROVENANCE));
    }

    #[test]
    fn test_theme_label() {
        let (r, stats) = rectified(
            dcat::THEME,
            vec![
                PropertyValue::reference("Énergie"),
                PropertyValue::reference("http://example.org/theme"),
            ],
        );
        assert_eq!(
            r.values(dcat::THEME).unwrap(),
            &[
                PropertyValue::reference(registry::THEME_ENERGIE),
                PropertyValue::reference("http://example.org/theme"),
            ]
        );
        assert_eq!(stats.get(THEME_REPAIR), 1);
    }

    #[test]
    fn test_rectify_converges() {
        let mut r = resource(
            dcat::THEME,
            vec![
                PropertyValue::plain("{'fr': 'Énergie', 'en': ''}"),
                PropertyValue::reference("Énergie"),
            ],
        )
        .with_property(foaf::MBOX, vec![PropertyValue::plain("a@b.fr")]);
        let mut stats = Stats::new();
        rectify(&mut r, &mut stats).unwrap();
        assert_eq!(stats.get(ENCODED_VALUE), 1);
        assert_eq!(stats.get(THEME_REPAIR), 1);

        let snapshot = r.clone();
        let mut again = Stats::new();
        rectify(&mut r, &mut again).unwrap();
        assert_eq!(r, snapshot);
        assert!(again.is_empty());
    }

    #[test]
    fn test_default_language() {
        let mut r = resource(
            dcterms::TITLE,
            vec![PropertyValue::plain("Titre"), PropertyValue::lang("Title", "en")],
        );
        let mut stats = Stats::new();
        apply_default_language(&mut r, "fr", &mut stats);
        assert_eq!(
            r.values(dcterms::TITLE).unwrap(),
            &[PropertyValue::lang("Titre", "fr"), PropertyValue::lang("Title", "en")]
        );
        assert_eq!(stats.total(), 1);
    }
}
