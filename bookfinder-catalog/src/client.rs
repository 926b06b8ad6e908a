use crate::cover::{cover_url_on, CoverSize, DEFAULT_COVERS_HOST};
use crate::error::CatalogError;
use crate::query::{SearchDefaults, SearchField, SearchRequest, SortOrder};
use crate::strategy::{Stage, DEFAULT_STAGES};
use bookfinder_http::{ClientSettings, HttpClient};
use url::Url;

pub const DEFAULT_CATALOG_URL: &str = "https://openlibrary.org";
pub const DEFAULT_RELAY_URL: &str = "https://api.allorigins.win";

/// Open Library client: search with fallback, plus key lookups.
///
/// Cheap to clone; holds no per-search state.
#[derive(Clone, Debug)]
pub struct CatalogClient {
    pub(crate) http: HttpClient,
    /// Catalog host without a trailing slash, prefix for `<key>.json`.
    pub(crate) catalog_root: String,
    pub(crate) search_endpoint: Url,
    pub(crate) relay_endpoint: Url,
    covers_host: String,
    pub(crate) stages: Vec<Stage>,
    defaults: SearchDefaults,
}

impl CatalogClient {
    /// Client against the public endpoints with stock settings.
    pub fn new() -> Result<Self, CatalogError> {
        Self::builder().build()
    }

    pub fn builder() -> CatalogClientBuilder {
        CatalogClientBuilder::default()
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    pub fn defaults(&self) -> &SearchDefaults {
        &self.defaults
    }

    pub fn search_endpoint(&self) -> &Url {
        &self.search_endpoint
    }

    /// A request carrying this client's paging and filter defaults.
    pub fn request(
        &self,
        query: impl Into<String>,
        field: SearchField,
        sort: SortOrder,
    ) -> Result<SearchRequest, CatalogError> {
        SearchRequest::with_defaults(query, field, sort, &self.defaults)
    }

    /// Full direct-stage URL for `request`.
    pub fn search_url(&self, request: &SearchRequest) -> Url {
        request.to_url(&self.search_endpoint)
    }

    /// Cover URL on this client's covers host.
    pub fn cover_url(&self, cover_id: Option<i64>, size: CoverSize) -> Option<String> {
        cover_url_on(&self.covers_host, cover_id, size)
    }
}

/// Builder for [`CatalogClient`]; every setting has a default.
///
/// ```no_run
/// use bookfinder_catalog::{CatalogClient, Stage};
///
/// let client = CatalogClient::builder()
///     .stages(vec![Stage::Proxy, Stage::Direct, Stage::Static])
///     .build()
///     .unwrap();
/// assert_eq!(client.stages().len(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct CatalogClientBuilder {
    catalog_url: String,
    relay_url: String,
    covers_url: String,
    stages: Vec<Stage>,
    http: ClientSettings,
    defaults: SearchDefaults,
}

impl Default for CatalogClientBuilder {
    fn default() -> Self {
        Self {
            catalog_url: DEFAULT_CATALOG_URL.to_string(),
            relay_url: DEFAULT_RELAY_URL.to_string(),
            covers_url: DEFAULT_COVERS_HOST.to_string(),
            stages: DEFAULT_STAGES.to_vec(),
            http: ClientSettings::default(),
            defaults: SearchDefaults::default(),
        }
    }
}

impl CatalogClientBuilder {
    pub fn catalog_url(mut self, url: impl Into<String>) -> Self {
        self.catalog_url = url.into();
        self
    }

    /// Relay host; requests go to `<relay>/raw?url=<target>`.
    pub fn relay_url(mut self, url: impl Into<String>) -> Self {
        self.relay_url = url.into();
        self
    }

    pub fn covers_url(mut self, url: impl Into<String>) -> Self {
        self.covers_url = url.into();
        self
    }

    /// Fallback chain, tried in order. Must be non-empty.
    pub fn stages(mut self, stages: Vec<Stage>) -> Self {
        self.stages = stages;
        self
    }

    pub fn http_settings(mut self, settings: ClientSettings) -> Self {
        self.http = settings;
        self
    }

    pub fn defaults(mut self, defaults: SearchDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn build(self) -> Result<CatalogClient, CatalogError> {
        if self.stages.is_empty() {
            return Err(CatalogError::Setup("at least one search stage is required".into()));
        }

        let catalog_root = self.catalog_url.trim_end_matches('/').to_string();
        let http = HttpClient::with_settings(&catalog_root, &self.http)?;
        let search_endpoint = endpoint(&catalog_root, "search.json")?;
        let relay_endpoint = endpoint(self.relay_url.trim_end_matches('/'), "raw")?;
        Url::parse(&self.covers_url)
            .map_err(|e| CatalogError::Setup(format!("invalid covers URL {:?}: {e}", self.covers_url)))?;

        Ok(CatalogClient {
            http,
            catalog_root,
            search_endpoint,
            relay_endpoint,
            covers_host: self.covers_url.trim_end_matches('/').to_string(),
            stages: self.stages,
            defaults: self.defaults,
        })
    }
}

/// `<root>/<leaf>`, keeping any path prefix on `root`.
fn endpoint(root: &str, leaf: &str) -> Result<Url, CatalogError> {
    Url::parse(&format!("{root}/{leaf}"))
        .map_err(|e| CatalogError::Setup(format!("invalid URL {root:?}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_endpoints() {
        let c = CatalogClient::new().unwrap();
        assert_eq!(c.search_endpoint().as_str(), "https://openlibrary.org/search.json");
        assert_eq!(c.relay_endpoint.as_str(), "https://api.allorigins.win/raw");
        assert_eq!(c.stages(), &[Stage::Direct, Stage::Proxy]);
    }

    #[test]
    fn path_prefixes_survive() {
        let c = CatalogClient::builder()
            .catalog_url("http://127.0.0.1:8080/ol/")
            .relay_url("http://127.0.0.1:8081/relay")
            .build()
            .unwrap();
        assert_eq!(c.search_endpoint().as_str(), "http://127.0.0.1:8080/ol/search.json");
        assert_eq!(c.relay_endpoint.as_str(), "http://127.0.0.1:8081/relay/raw");
        assert_eq!(c.catalog_root, "http://127.0.0.1:8080/ol");
    }

    #[test]
    fn empty_stage_list_is_rejected() {
        let got = CatalogClient::builder().stages(vec![]).build();
        assert!(matches!(got, Err(CatalogError::Setup(_))));
    }

    #[test]
    fn bad_urls_are_rejected() {
        assert!(CatalogClient::builder().catalog_url("nope").build().is_err());
        assert!(CatalogClient::builder().relay_url("::").build().is_err());
        assert!(CatalogClient::builder().covers_url("").build().is_err());
    }

    #[test]
    fn client_defaults_flow_into_requests() {
        let c = CatalogClient::builder()
            .defaults(SearchDefaults {
                limit: 7,
                ..SearchDefaults::default()
            })
            .build()
            .unwrap();
        let req = c.request("Dune", SearchField::Title, SortOrder::Relevance).unwrap();
        assert_eq!(req.limit(), 7);
        assert!(c.search_url(&req).as_str().contains("limit=7"));
    }

    #[test]
    fn cover_url_uses_configured_host() {
        let c = CatalogClient::builder()
            .covers_url("http://covers.local/")
            .build()
            .unwrap();
        assert_eq!(
            c.cover_url(Some(5), CoverSize::M).as_deref(),
            Some("http://covers.local/b/id/5-M.jpg")
        );
    }
}
