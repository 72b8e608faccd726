//! Vocabulary definitions for the catalog graph
//!
//! URIs of the RDF classes and properties the engine handles explicitly,
//! grouped by namespace.

/// Prefix of blank node identifiers
pub const BLANK_NODE_PREFIX: &str = "_:";

/// Prefix of blank node ids minted from a statement's content hash
pub const MD5_BLANK_NODE_PREFIX: &str = "_:md5-";

/// Catch-all key under which `simplify` keeps properties it has no short name for
pub const JSON_LD_KEY: &str = "json-ld";

pub mod dcterms {
    pub const NS: &str = "http://purl.org/dc/terms/";

    pub const LOCATION: &str = "http://purl.org/dc/terms/Location";
    pub const STANDARD: &str = "http://purl.org/dc/terms/Standard";
    pub const LICENSE_DOCUMENT: &str = "http://purl.org/dc/terms/LicenseDocument";
    pub const RIGHTS_STATEMENT: &str = "http://purl.org/dc/terms/RightsStatement";
    pub const PROVENANCE_STATEMENT: &str = "http://purl.org/dc/terms/ProvenanceStatement";
    pub const MEDIA_TYPE_OR_EXTENT: &str = "http://purl.org/dc/terms/MediaTypeOrExtent";
    pub const MEDIA_TYPE_CLASS: &str = "http://purl.org/dc/terms/MediaType";
    pub const PERIOD_OF_TIME: &str = "http://purl.org/dc/terms/PeriodOfTime";
    pub const FREQUENCY: &str = "http://purl.org/dc/terms/Frequency";
    pub const LINGUISTIC_SYSTEM: &str = "http://purl.org/dc/terms/LinguisticSystem";

    pub const TITLE: &str = "http://purl.org/dc/terms/title";
    pub const DESCRIPTION: &str = "http://purl.org/dc/terms/description";
    pub const ISSUED: &str = "http://purl.org/dc/terms/issued";
    pub const CREATED: &str = "http://purl.org/dc/terms/created";
    pub const MODIFIED: &str = "http://purl.org/dc/terms/modified";
    pub const PUBLISHER: &str = "http://purl.org/dc/terms/publisher";
    pub const CREATOR: &str = "http://purl.org/dc/terms/creator";
    pub const IDENTIFIER: &str = "http://purl.org/dc/terms/identifier";
    pub const LANGUAGE: &str = "http://purl.org/dc/terms/language";
    pub const SPATIAL: &str = "http://purl.org/dc/terms/spatial";
    pub const TEMPORAL: &str = "http://purl.org/dc/terms/temporal";
    pub const ACCESS_RIGHTS: &str = "http://purl.org/dc/terms/accessRights";
    pub const RIGHTS_HOLDER: &str = "http://purl.org/dc/terms/rightsHolder";
    /// Misspelled form found in the upstream export
    pub const RIGHTS_HOLDER_MISSPELLED: &str = "http://purl.org/dc/terms/rights_holder";
    pub const CONFORMS_TO: &str = "http://purl.org/dc/terms/conformsTo";
    pub const PROVENANCE: &str = "http://purl.org/dc/terms/provenance";
    pub const ACCRUAL_PERIODICITY: &str = "http://purl.org/dc/terms/accrualPeriodicity";
    pub const FORMAT: &str = "http://purl.org/dc/terms/format";
    pub const RIGHTS: &str = "http://purl.org/dc/terms/rights";
    pub const LICENSE: &str = "http://purl.org/dc/terms/license";
}

pub mod dcat {
    pub const NS: &str = "http://www.w3.org/ns/dcat#";

    pub const CATALOG_CLASS: &str = "http://www.w3.org/ns/dcat#Catalog";
    pub const CATALOG_RECORD: &str = "http://www.w3.org/ns/dcat#CatalogRecord";
    pub const DATASET_CLASS: &str = "http://www.w3.org/ns/dcat#Dataset";
    pub const DATASET_SERIES: &str = "http://www.w3.org/ns/dcat#DatasetSeries";
    pub const DATA_SERVICE: &str = "http://www.w3.org/ns/dcat#DataService";
    pub const DISTRIBUTION_CLASS: &str = "http://www.w3.org/ns/dcat#Distribution";

    /// Misplaced namespace for `dcterms:publisher` found in the upstream export
    pub const PUBLISHER_MISPLACED: &str = "http://www.w3.org/ns/dcat#publisher";
    pub const CONTACT_POINT: &str = "http://www.w3.org/ns/dcat#contactPoint";
    pub const THEME: &str = "http://www.w3.org/ns/dcat#theme";
    pub const KEYWORD: &str = "http://www.w3.org/ns/dcat#keyword";
    pub const LANDING_PAGE: &str = "http://www.w3.org/ns/dcat#landingPage";
    pub const CATALOG: &str = "http://www.w3.org/ns/dcat#catalog";
    pub const RECORD: &str = "http://www.w3.org/ns/dcat#record";
    pub const DATASET: &str = "http://www.w3.org/ns/dcat#dataset";
    pub const SERVICE: &str = "http://www.w3.org/ns/dcat#service";
    pub const IN_SERIES: &str = "http://www.w3.org/ns/dcat#inSeries";
    pub const SERIES_MEMBER: &str = "http://www.w3.org/ns/dcat#seriesMember";
    pub const DISTRIBUTION: &str = "http://www.w3.org/ns/dcat#distribution";
    pub const IN_CATALOG: &str = "http://www.w3.org/ns/dcat#inCatalog";
    pub const MEDIA_TYPE: &str = "http://www.w3.org/ns/dcat#mediaType";
    pub const ACCESS_SERVICE: &str = "http://www.w3.org/ns/dcat#accessService";
    pub const ACCESS_URL: &str = "http://www.w3.org/ns/dcat#accessURL";
    pub const DOWNLOAD_URL: &str = "http://www.w3.org/ns/dcat#downloadURL";
    pub const START_DATE: &str = "http://www.w3.org/ns/dcat#startDate";
    pub const END_DATE: &str = "http://www.w3.org/ns/dcat#endDate";
    pub const BBOX: &str = "http://www.w3.org/ns/dcat#bbox";
}

pub mod foaf {
    pub const ORGANIZATION: &str = "http://xmlns.com/foaf/0.1/Organization";

    pub const NAME: &str = "http://xmlns.com/foaf/0.1/name";
    pub const MBOX: &str = "http://xmlns.com/foaf/0.1/mbox";
    pub const PHONE: &str = "http://xmlns.com/foaf/0.1/phone";
    pub const HOMEPAGE: &str = "http://xmlns.com/foaf/0.1/homepage";
    pub const WORKPLACE_HOMEPAGE: &str = "http://xmlns.com/foaf/0.1/workplaceHomepage";
    pub const PAGE: &str = "http://xmlns.com/foaf/0.1/page";
    pub const IS_PRIMARY_TOPIC_OF: &str = "http://xmlns.com/foaf/0.1/isPrimaryTopicOf";
}

pub mod vcard {
    pub const KIND: &str = "http://www.w3.org/2006/vcard/ns#Kind";

    pub const FN: &str = "http://www.w3.org/2006/vcard/ns#fn";
    pub const HAS_EMAIL: &str = "http://www.w3.org/2006/vcard/ns#hasEmail";
    pub const HAS_URL: &str = "http://www.w3.org/2006/vcard/ns#hasURL";
}

pub mod adms {
    pub const VERSION_NOTES: &str = "http://www.w3.org/ns/adms#versionNotes";
    pub const STATUS: &str = "http://www.w3.org/ns/adms#status";
}

pub mod skos {
    pub const CONCEPT: &str = "http://www.w3.org/2004/02/skos/core#Concept";
}

pub mod rdfs {
    pub const LABEL: &str = "http://www.w3.org/2000/01/rdf-schema#label";
}

pub mod xsd {
    pub const DATE: &str = "http://www.w3.org/2001/XMLSchema#date";
    pub const DATE_TIME: &str = "http://www.w3.org/2001/XMLSchema#dateTime";
    pub const G_YEAR: &str = "http://www.w3.org/2001/XMLSchema#gYear";
    pub const G_YEAR_MONTH: &str = "http://www.w3.org/2001/XMLSchema#gYearMonth";
}

pub mod locn {
    pub const GEOMETRY: &str = "http://www.w3.org/ns/locn#geometry";
}

pub mod geosparql {
    pub const WKT_LITERAL: &str = "http://www.opengis.net/ont/geosparql#wktLiteral";
}

pub mod hydra {
    pub const PAGED_COLLECTION: &str = "http://www.w3.org/ns/hydra/core#PagedCollection";

    pub const FIRST_PAGE: &str = "http://www.w3.org/ns/hydra/core#firstPage";
    pub const LAST_PAGE: &str = "http://www.w3.org/ns/hydra/core#lastPage";
    pub const NEXT_PAGE: &str = "http://www.w3.org/ns/hydra/core#nextPage";
    pub const PREVIOUS_PAGE: &str = "http://www.w3.org/ns/hydra/core#previousPage";
    pub const ITEMS_PER_PAGE: &str = "http://www.w3.org/ns/hydra/core#itemsPerPage";
    pub const TOTAL_ITEMS: &str = "http://www.w3.org/ns/hydra/core#totalItems";
}

/// EU publications office authority tables
pub mod authority {
    pub const LANGUAGE_NS: &str = "http://publications.europa.eu/resource/authority/language/";
    pub const LANGUAGE_FRA: &str = "http://publications.europa.eu/resource/authority/language/FRA";
}

/// Themes of the ministry registry that the export sometimes names by label only
pub mod registry {
    pub const THEME_ENERGIE: &str =
        "http://registre.data.developpement-durable.gouv.fr/themes-hors-ecospheres/energie";
}

/// INSEE administrative area URIs, synthesized as Locations on dereference
pub mod insee {
    pub const GEO_PREFIX: &str = "http://id.insee.fr/geo/";
}
