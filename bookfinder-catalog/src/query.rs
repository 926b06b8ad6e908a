//! Search request construction.
//!
//! Everything here is pure: a [`SearchRequest`] turns into an ordered list of
//! query parameters and, given the catalog's search endpoint, a complete URL.

use crate::error::CatalogError;
use serde::Serialize;
use std::fmt;
use url::Url;

/// Which catalog field the query text is matched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchField {
    Title,
    Author,
    Subject,
    Isbn,
    Publisher,
    /// Full-text search over every field (`q`).
    Generic,
}

impl SearchField {
    /// Name of the query parameter carrying the query text.
    pub fn param(self) -> &'static str {
        match self {
            SearchField::Title => "title",
            SearchField::Author => "author",
            SearchField::Subject => "subject",
            SearchField::Isbn => "isbn",
            SearchField::Publisher => "publisher",
            SearchField::Generic => "q",
        }
    }
}

/// Unrecognised selectors fall back to [`SearchField::Generic`].
impl From<&str> for SearchField {
    fn from(selector: &str) -> Self {
        match selector {
            "title" => SearchField::Title,
            "author" => SearchField::Author,
            "subject" => SearchField::Subject,
            "isbn" => SearchField::Isbn,
            "publisher" => SearchField::Publisher,
            _ => SearchField::Generic,
        }
    }
}

impl fmt::Display for SearchField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.param())
    }
}

/// Ordering hint passed to the catalog. Never applied locally.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Relevance,
    Newest,
    Oldest,
    Title,
    Author,
}

impl SortOrder {
    /// Value of the `sort` query parameter.
    pub fn param(self) -> &'static str {
        match self {
            SortOrder::Relevance => "relevance",
            SortOrder::Newest => "new",
            SortOrder::Oldest => "old",
            SortOrder::Title => "title",
            SortOrder::Author => "author",
        }
    }
}

/// Unrecognised selectors (including `"relevance"` and `""`) mean relevance.
impl From<&str> for SortOrder {
    fn from(selector: &str) -> Self {
        match selector {
            "newest" => SortOrder::Newest,
            "oldest" => SortOrder::Oldest,
            "title" => SortOrder::Title,
            "author" => SortOrder::Author,
            _ => SortOrder::Relevance,
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.param())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchFilters {
    pub has_fulltext: bool,
    pub language: String,
}

impl Default for SearchFilters {
    fn default() -> Self {
        Self {
            has_fulltext: true,
            language: "eng".to_string(),
        }
    }
}

/// Paging and filter values applied to every request a client builds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchDefaults {
    pub limit: u32,
    pub offset: u32,
    pub filters: SearchFilters,
}

impl Default for SearchDefaults {
    fn default() -> Self {
        Self {
            limit: 20,
            offset: 0,
            filters: SearchFilters::default(),
        }
    }
}

/// A single search invocation. Built once, read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchRequest {
    field: SearchField,
    raw_query: String,
    sort: SortOrder,
    limit: u32,
    offset: u32,
    filters: SearchFilters,
}

impl SearchRequest {
    /// Request with the stock paging/filter values (20 results, offset 0,
    /// full text only, English).
    ///
    /// ```
    /// use bookfinder_catalog::{SearchField, SearchRequest, SortOrder};
    ///
    /// let req = SearchRequest::new("Dune", SearchField::Title, SortOrder::Newest).unwrap();
    /// assert_eq!(req.limit(), 20);
    /// assert_eq!(req.query_params()[1], ("sort", "new".to_string()));
    ///
    /// assert!(SearchRequest::new("   ", SearchField::Title, SortOrder::Newest).is_err());
    /// ```
    pub fn new(
        query: impl Into<String>,
        field: SearchField,
        sort: SortOrder,
    ) -> Result<Self, CatalogError> {
        Self::with_defaults(query, field, sort, &SearchDefaults::default())
    }

    pub fn with_defaults(
        query: impl Into<String>,
        field: SearchField,
        sort: SortOrder,
        defaults: &SearchDefaults,
    ) -> Result<Self, CatalogError> {
        let raw_query = query.into();
        if raw_query.trim().is_empty() {
            return Err(CatalogError::EmptyQuery);
        }
        Ok(Self {
            field,
            raw_query,
            sort,
            limit: defaults.limit,
            offset: defaults.offset,
            filters: defaults.filters.clone(),
        })
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_offset(mut self, offset: u32) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_filters(mut self, filters: SearchFilters) -> Self {
        self.filters = filters;
        self
    }

    pub fn field(&self) -> SearchField {
        self.field
    }

    pub fn raw_query(&self) -> &str {
        &self.raw_query
    }

    pub fn sort(&self) -> SortOrder {
        self.sort
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn offset(&self) -> u32 {
        self.offset
    }

    pub fn filters(&self) -> &SearchFilters {
        &self.filters
    }

    /// Parameters in wire order: field, sort, limit, offset, has_fulltext, language.
    pub fn query_params(&self) -> Vec<(&'static str, String)> {
        vec![
            (self.field.param(), self.raw_query.clone()),
            ("sort", self.sort.param().to_string()),
            ("limit", self.limit.to_string()),
            ("offset", self.offset.to_string()),
            ("has_fulltext", self.filters.has_fulltext.to_string()),
            ("language", self.filters.language.clone()),
        ]
    }

    /// Form-encoded query string (`+` for spaces), in wire order.
    pub fn query_string(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.query_params())
            .finish()
    }

    /// `endpoint` with this request's parameters appended.
    pub fn to_url(&self, endpoint: &Url) -> Url {
        let mut url = endpoint.clone();
        url.query_pairs_mut().extend_pairs(self.query_params());
        url
    }
}

/// String-selector entry point: `search_type` and `sort_by` use the lenient
/// mappings of [`SearchField`] and [`SortOrder`].
///
/// ```
/// let params = bookfinder_catalog::build_search_params("Emma", "author", "oldest").unwrap();
/// assert_eq!(params[0], ("author", "Emma".to_string()));
/// assert_eq!(params[1], ("sort", "old".to_string()));
/// ```
pub fn build_search_params(
    query: &str,
    search_type: &str,
    sort_by: &str,
) -> Result<Vec<(&'static str, String)>, CatalogError> {
    SearchRequest::new(query, search_type.into(), sort_by.into()).map(|r| r.query_params())
}
