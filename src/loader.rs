//! Paginated import of a catalog export
//!
//! The export is served as numbered pages of expanded JSON-LD at
//! `<prefix>/jsonld?page=N`. Pages come from a [`PageSource`];
//! [`CachedHttpSource`] keeps each fetched page as `export<N>.json` in a
//! cache directory and can work from that cache alone.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use serde::Serialize;
use serde_json::Value;
use url::Url;

use crate::category::Category;
use crate::error::CatalogError;
use crate::statement::CanonicalizeReport;
use crate::store::Graph;
use crate::value::PropertyValue;
use crate::vocab::hydra;

/// Source of export pages
pub trait PageSource {
    /// Raw content of a page
    fn fetch(&self, page: u32) -> Result<String, CatalogError>;
}

/// Pages fetched over HTTP and cached on disk
#[derive(Debug, Clone)]
pub struct CachedHttpSource {
    url_prefix: String,
    cache_dir: PathBuf,
    offline: bool,
}

impl CachedHttpSource {
    pub fn new(url_prefix: impl Into<String>, cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            url_prefix: url_prefix.into(),
            cache_dir: cache_dir.into(),
            offline: false,
        }
    }

    /// Only read cached pages; a page missing from the cache is a load error
    pub fn offline(mut self, offline: bool) -> Self {
        self.offline = offline;
        self
    }

    pub fn cache_path(&self, page: u32) -> PathBuf {
        self.cache_dir.join(format!("export{}.json", page))
    }

    pub fn page_url(&self, page: u32) -> String {
        format!("{}/jsonld?page={}", self.url_prefix.trim_end_matches('/'), page)
    }
}

impl PageSource for CachedHttpSource {
    fn fetch(&self, page: u32) -> Result<String, CatalogError> {
        let path = self.cache_path(page);
        if path.is_file() {
            return Ok(fs::read_to_string(&path)?);
        }
        if self.offline {
            return Err(CatalogError::LoadError {
                page,
                reason: format!("missing cached page {}", path.display()),
            });
        }

        let url = self.page_url(page);
        log::info!("Fetching {}", url);
        let content = fetch_url(&url).map_err(|reason| CatalogError::LoadError { page, reason })?;
        fs::create_dir_all(&self.cache_dir)?;
        fs::write(&path, &content)?;
        Ok(content)
    }
}

/// Simple URL fetch; any non-success status is an error
fn fetch_url(url: &str) -> Result<String, String> {
    let response =
        reqwest::blocking::get(url).map_err(|e| format!("HTTP request failed: {}", e))?;
    let status = response.status();
    if !status.is_success() {
        return Err(format!("HTTP status {}", status));
    }
    response
        .text()
        .map_err(|e| format!("Failed to read response: {}", e))
}

/// Page range to import
#[derive(Debug, Clone)]
pub struct ImportOptions {
    pub first_page: u32,
    /// Last page to read; when `None` it is taken from the export's
    /// `hydra:PagedCollection`
    pub last_page: Option<u32>,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            first_page: 1,
            last_page: None,
        }
    }
}

/// A record that could not be ingested
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RejectedRecord {
    pub page: u32,
    pub id: Option<String>,
    pub reason: String,
}

/// Outcome of an import
#[derive(Debug, Clone, Default, Serialize)]
pub struct ImportReport {
    pub pages_loaded: usize,
    /// Pages that could not be fetched or decoded, with the reason
    pub errors: BTreeMap<u32, String>,
    pub rejected: Vec<RejectedRecord>,
    pub last_page: Option<u32>,
    pub statements: Option<CanonicalizeReport>,
}

/// Import pages into a graph, then canonicalize its statements.
///
/// A page that cannot be fetched or decoded is recorded and skipped; when
/// the last page is not known yet the import stops there. A record of an
/// unhandled type fails the whole import. Other invalid records are
/// rejected one by one.
pub fn import(
    graph: &mut Graph,
    source: &dyn PageSource,
    options: &ImportOptions,
) -> Result<ImportReport, CatalogError> {
    if options.first_page == 0 {
        return Err(CatalogError::InvalidPagination(
            "pages are numbered from 1".to_string(),
        ));
    }

    let mut report = ImportReport {
        last_page: options.last_page,
        ..Default::default()
    };

    let mut page = options.first_page;
    while report.last_page.map_or(true, |last| page <= last) {
        let records = match source.fetch(page).and_then(|content| parse_page(page, &content)) {
            Ok(records) => records,
            Err(e) => {
                log::warn!("Page {}: {}", page, e);
                report.errors.insert(page, e.to_string());
                if report.last_page.is_none() {
                    log::warn!("Last page unknown, stopping at page {}", page);
                    break;
                }
                page += 1;
                continue;
            }
        };

        log::info!("Page {}: {} records", page, records.len());
        for record in &records {
            match graph.add_record(record) {
                Ok(_) => {}
                Err(e @ CatalogError::UnhandledType(_)) => return Err(e),
                Err(e) => {
                    let id = record.get("@id").and_then(Value::as_str).map(String::from);
                    log::warn!("Rejected record {:?} of page {}: {}", id, page, e);
                    report.rejected.push(RejectedRecord {
                        page,
                        id,
                        reason: e.to_string(),
                    });
                }
            }
        }
        report.pages_loaded += 1;

        if report.last_page.is_none() {
            report.last_page = last_page(graph)?;
            if let Some(last) = report.last_page {
                log::info!("Last page is {}", last);
            }
        }
        page += 1;
    }

    report.statements = Some(graph.canonicalize_statements()?);
    Ok(report)
}

/// Records of a page: a JSON array, or an object with a `@graph` array
fn parse_page(page: u32, content: &str) -> Result<Vec<Value>, CatalogError> {
    let document: Value = serde_json::from_str(content).map_err(|e| CatalogError::LoadError {
        page,
        reason: format!("invalid JSON: {}", e),
    })?;
    match document {
        Value::Array(records) => Ok(records),
        Value::Object(mut obj) => match obj.remove("@graph") {
            Some(Value::Array(records)) => Ok(records),
            _ => Err(CatalogError::LoadError {
                page,
                reason: "object page without a @graph array".to_string(),
            }),
        },
        _ => Err(CatalogError::LoadError {
            page,
            reason: "page is neither an array nor an object".to_string(),
        }),
    }
}

/// Number of the last page, from the `page` query parameter of `hydra:lastPage`
pub fn last_page(graph: &Graph) -> Result<Option<u32>, CatalogError> {
    let link = graph
        .resources_of(Category::PagedCollection)
        .filter_map(|collection| collection.values(hydra::LAST_PAGE))
        .flat_map(|values| values.iter())
        .find_map(|value| match value {
            PropertyValue::Literal(l) => Some(l.value()),
            PropertyValue::Reference(r) => Some(r.id()),
        });
    let Some(link) = link else {
        return Ok(None);
    };
    page_number(link).map(Some)
}

fn page_number(link: &str) -> Result<u32, CatalogError> {
    let url = Url::parse(link)
        .or_else(|_| Url::parse("http://localhost/").and_then(|base| base.join(link)))
        .map_err(|e| CatalogError::InvalidPagination(format!("{}: {}", link, e)))?;
    url.query_pairs()
        .find(|(key, _)| key == "page")
        .and_then(|(_, value)| value.parse().ok())
        .ok_or_else(|| CatalogError::InvalidPagination(format!("no page number in {}", link)))
}
