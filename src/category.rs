//! Resource categories and the static tables attached to them
//!
//! Every resource belongs to one category, derived from its `@type` list.
//! Types that need no specific handling collapse into [`Category::Generic`].
//! Each category carries a short-name table (property URI -> display key)
//! used by simplification and framing, and short names map to the category
//! in which references of that property are dereferenced.

use std::fmt;
use std::str::FromStr;

use crate::error::CatalogError;
use crate::vocab::{adms, dcat, dcterms, foaf, hydra, rdfs, skos, vcard};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Catalog,
    Dataset,
    DataService,
    Distribution,
    CatalogRecord,
    Location,
    PagedCollection,
    /// Types without specific behavior (organizations, statements, concepts, ...)
    Generic,
}

/// (property URI, short name)
pub type ShortNames = &'static [(&'static str, &'static str)];

/// Type -> category table. Multi-type keys are the sorted types joined by ", ".
const TYPE_TABLE: &[(&str, Category)] = &[
    (dcat::CATALOG_CLASS, Category::Catalog),
    (dcat::DATASET_CLASS, Category::Dataset),
    (
        "http://www.w3.org/ns/dcat#Dataset, http://www.w3.org/ns/dcat#DatasetSeries",
        Category::Dataset,
    ),
    (dcat::DATA_SERVICE, Category::DataService),
    (dcat::DISTRIBUTION_CLASS, Category::Distribution),
    (dcat::CATALOG_RECORD, Category::CatalogRecord),
    (dcterms::LOCATION, Category::Location),
    (hydra::PAGED_COLLECTION, Category::PagedCollection),
    (skos::CONCEPT, Category::Generic),
    (dcterms::STANDARD, Category::Generic),
    (dcterms::LICENSE_DOCUMENT, Category::Generic),
    (dcterms::RIGHTS_STATEMENT, Category::Generic),
    (dcterms::PROVENANCE_STATEMENT, Category::Generic),
    (dcterms::MEDIA_TYPE_OR_EXTENT, Category::Generic),
    (dcterms::MEDIA_TYPE_CLASS, Category::Generic),
    (dcterms::PERIOD_OF_TIME, Category::Generic),
    (dcterms::FREQUENCY, Category::Generic),
    (dcterms::LINGUISTIC_SYSTEM, Category::Generic),
    (foaf::ORGANIZATION, Category::Generic),
    (vcard::KIND, Category::Generic),
];

const DATASET_SHORT_NAMES: ShortNames = &[
    (dcterms::TITLE, "title"),
    (dcterms::DESCRIPTION, "description"),
    (dcterms::ISSUED, "issued"),
    (dcterms::CREATED, "created"),
    (dcterms::MODIFIED, "modified"),
    (dcterms::PUBLISHER, "publisher"),
    (dcat::PUBLISHER_MISPLACED, "publisher"),
    (dcterms::CREATOR, "creator"),
    (dcat::CONTACT_POINT, "contactPoint"),
    (dcterms::IDENTIFIER, "identifier"),
    (dcat::THEME, "theme"),
    (dcat::KEYWORD, "keyword"),
    (dcterms::LANGUAGE, "language"),
    (dcterms::SPATIAL, "spatial"),
    (dcterms::TEMPORAL, "temporal"),
    (dcterms::ACCESS_RIGHTS, "accessRights"),
    (dcterms::RIGHTS_HOLDER, "rightsHolder"),
    (dcterms::RIGHTS_HOLDER_MISSPELLED, "rightsHolder"),
    (foaf::HOMEPAGE, "homepage"),
    (dcat::LANDING_PAGE, "landingPage"),
    (foaf::PAGE, "page"),
    (dcterms::MEDIA_TYPE_CLASS, "MediaType"),
    (dcterms::CONFORMS_TO, "conformsTo"),
    (dcterms::PROVENANCE, "provenance"),
    (adms::VERSION_NOTES, "versionNotes"),
    (adms::STATUS, "status"),
    (dcterms::ACCRUAL_PERIODICITY, "accrualPeriodicity"),
    (foaf::IS_PRIMARY_TOPIC_OF, "isPrimaryTopicOf"),
    (dcat::CATALOG, "catalog"),
    (dcat::RECORD, "record"),
    (dcat::DATASET, "dataset"),
    (dcat::SERVICE, "service"),
    (dcat::IN_SERIES, "inSeries"),
    (dcat::SERIES_MEMBER, "seriesMember"),
    (dcat::DISTRIBUTION, "distribution"),
];

const DATA_SERVICE_SHORT_NAMES: ShortNames = &[
    (dcterms::TITLE, "title"),
    (dcterms::CONFORMS_TO, "conformsTo"),
];

const DISTRIBUTION_SHORT_NAMES: ShortNames = &[
    (dcterms::TITLE, "title"),
    (dcterms::DESCRIPTION, "description"),
    (dcterms::FORMAT, "format"),
    (dcat::MEDIA_TYPE, "mediaType"),
    (dcterms::RIGHTS, "rights"),
    (dcterms::LICENSE, "license"),
    (dcterms::ISSUED, "issued"),
    (dcterms::CREATED, "created"),
    (dcterms::MODIFIED, "modified"),
    (dcat::ACCESS_SERVICE, "accessService"),
    (dcat::ACCESS_URL, "accessURL"),
    (dcat::DOWNLOAD_URL, "downloadURL"),
];

const CATALOG_RECORD_SHORT_NAMES: ShortNames = &[
    (dcterms::IDENTIFIER, "identifier"),
    (dcterms::LANGUAGE, "language"),
    (dcterms::MODIFIED, "modified"),
    (dcat::CONTACT_POINT, "contactPoint"),
    (dcat::IN_CATALOG, "inCatalog"),
];

const LABEL_SHORT_NAMES: ShortNames = &[(rdfs::LABEL, "label")];

const PAGED_COLLECTION_SHORT_NAMES: ShortNames = &[
    (hydra::FIRST_PAGE, "firstPage"),
    (hydra::LAST_PAGE, "lastPage"),
    (hydra::NEXT_PAGE, "nextPage"),
    (hydra::PREVIOUS_PAGE, "previousPage"),
    (hydra::ITEMS_PER_PAGE, "itemsPerPage"),
    (hydra::TOTAL_ITEMS, "totalItems"),
];

const ORGANIZATION_SHORT_NAMES: ShortNames = &[
    (foaf::NAME, "name"),
    (foaf::MBOX, "mbox"),
    (foaf::PHONE, "phone"),
    (foaf::HOMEPAGE, "homepage"),
    (foaf::WORKPLACE_HOMEPAGE, "workplaceHomepage"),
];

const PERIOD_OF_TIME_SHORT_NAMES: ShortNames = &[
    (dcat::START_DATE, "startDate"),
    (dcat::END_DATE, "endDate"),
];

const KIND_SHORT_NAMES: ShortNames = &[
    (vcard::FN, "fn"),
    (vcard::HAS_EMAIL, "hasEmail"),
    (vcard::HAS_URL, "hasURL"),
];

/// Generic resources pick their table by their first type
const GENERIC_SHORT_NAMES: &[(&str, ShortNames)] = &[
    (foaf::ORGANIZATION, ORGANIZATION_SHORT_NAMES),
    (dcterms::STANDARD, LABEL_SHORT_NAMES),
    (dcterms::LICENSE_DOCUMENT, LABEL_SHORT_NAMES),
    (dcterms::RIGHTS_STATEMENT, LABEL_SHORT_NAMES),
    (dcterms::PROVENANCE_STATEMENT, LABEL_SHORT_NAMES),
    (dcterms::MEDIA_TYPE_OR_EXTENT, LABEL_SHORT_NAMES),
    (dcterms::MEDIA_TYPE_CLASS, LABEL_SHORT_NAMES),
    (dcterms::FREQUENCY, LABEL_SHORT_NAMES),
    (dcterms::LINGUISTIC_SYSTEM, LABEL_SHORT_NAMES),
    (dcterms::PERIOD_OF_TIME, PERIOD_OF_TIME_SHORT_NAMES),
    (vcard::KIND, KIND_SHORT_NAMES),
    (skos::CONCEPT, LABEL_SHORT_NAMES),
];

/// Properties whose values are unioned when a resource is echoed across pages
pub const MEMBERSHIP_PROPERTIES: &[&str] = &[dcat::CATALOG, dcat::RECORD, dcat::DATASET, dcat::SERVICE];

impl Category {
    pub const ALL: [Category; 8] = [
        Category::Catalog,
        Category::Dataset,
        Category::DataService,
        Category::Distribution,
        Category::CatalogRecord,
        Category::Location,
        Category::PagedCollection,
        Category::Generic,
    ];

    /// Classify a resource by its `@type` list
    pub fn from_types<S: AsRef<str>>(types: &[S]) -> Result<Self, CatalogError> {
        let key = type_key(types);
        TYPE_TABLE
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, category)| *category)
            .ok_or(CatalogError::UnhandledType(key))
    }

    pub fn name(&self) -> &'static str {
        match self {
            Category::Catalog => "Catalog",
            Category::Dataset => "Dataset",
            Category::DataService => "DataService",
            Category::Distribution => "Distribution",
            Category::CatalogRecord => "CatalogRecord",
            Category::Location => "Location",
            Category::PagedCollection => "PagedCollection",
            Category::Generic => "GenResource",
        }
    }

    /// Whether re-ingesting a known id unions its membership properties.
    /// Other categories treat a repeat as identical and ignore it.
    pub fn unions_membership(&self) -> bool {
        matches!(
            self,
            Category::Catalog | Category::Dataset | Category::DataService | Category::Distribution
        )
    }

    /// Short-name table for a resource of this category with the given types
    pub fn short_names<S: AsRef<str>>(&self, types: &[S]) -> ShortNames {
        match self {
            Category::Catalog | Category::Dataset => DATASET_SHORT_NAMES,
            Category::DataService => DATA_SERVICE_SHORT_NAMES,
            Category::Distribution => DISTRIBUTION_SHORT_NAMES,
            Category::CatalogRecord => CATALOG_RECORD_SHORT_NAMES,
            Category::Location => LABEL_SHORT_NAMES,
            Category::PagedCollection => PAGED_COLLECTION_SHORT_NAMES,
            Category::Generic => types
                .first()
                .and_then(|t| {
                    GENERIC_SHORT_NAMES
                        .iter()
                        .find(|(uri, _)| *uri == t.as_ref())
                        .map(|(_, table)| *table)
                })
                .unwrap_or(&[]),
        }
    }

    /// Short name of a property for a resource of this category
    pub fn short_name<S: AsRef<str>>(&self, types: &[S], property: &str) -> Option<&'static str> {
        self.short_names(types)
            .iter()
            .find(|(uri, _)| *uri == property)
            .map(|(_, short)| *short)
    }

    /// Category in which references of `property` are dereferenced
    pub fn range_of<S: AsRef<str>>(&self, types: &[S], property: &str) -> Option<Category> {
        self.short_name(types, property).and_then(range_of)
    }
}

/// Range table: property short name -> category of its reference targets
pub fn range_of(short_name: &str) -> Option<Category> {
    match short_name {
        "publisher" | "creator" | "rightsHolder" | "temporal" | "contactPoint" | "conformsTo"
        | "status" | "theme" | "accessRights" | "license" | "provenance" | "format"
        | "mediaType" | "language" | "accrualPeriodicity" => Some(Category::Generic),
        "spatial" => Some(Category::Location),
        "isPrimaryTopicOf" => Some(Category::CatalogRecord),
        "inCatalog" => Some(Category::Catalog),
        "accessService" => Some(Category::DataService),
        "distribution" => Some(Category::Distribution),
        _ => None,
    }
}

/// Canonical key of a type list: sorted, deduplicated, joined by ", "
fn type_key<S: AsRef<str>>(types: &[S]) -> String {
    let mut sorted: Vec<&str> = types.iter().map(AsRef::as_ref).collect();
    sorted.sort_unstable();
    sorted.dedup();
    sorted.join(", ")
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim_end_matches('s').to_ascii_lowercase();
        Category::ALL
            .into_iter()
            .find(|c| {
                let name = c.name().to_ascii_lowercase();
                name == wanted || (*c == Category::Generic && wanted == "generic")
            })
            .ok_or_else(|| format!("unknown category '{}'", s))
    }
}
