//! Search execution over an ordered chain of fetch stages.
//!
//! Stages run one at a time, in the client's configured order, each exactly
//! once. A stage fails on transport errors, non-2xx statuses, and bodies that
//! do not normalize; any failure advances to the next stage. The first stage
//! that succeeds wins and its records are returned untouched in order.

use crate::client::CatalogClient;
use crate::error::{CatalogError, FetchError};
use crate::fixtures;
use crate::normalize::normalize_search_body;
use crate::query::SearchRequest;
use crate::types::BookSummary;
use bookfinder_http::RequestOpts;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::borrow::Cow;
use std::fmt;
use url::Url;

/// One attempt within the fallback chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    /// GET the catalog's search endpoint.
    Direct,
    /// GET the same URL through the relay.
    Proxy,
    /// Serve [`fixtures::SAMPLE_BOOKS`]. Never fails.
    Static,
}

pub const DEFAULT_STAGES: [Stage; 2] = [Stage::Direct, Stage::Proxy];

impl Stage {
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Direct => "direct",
            Stage::Proxy => "proxy",
            Stage::Static => "static",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Records from the stage that answered.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchOutcome {
    pub stage: Stage,
    pub books: Vec<BookSummary>,
}

impl SearchOutcome {
    /// True when the records are the built-in samples rather than catalog data.
    pub fn is_sample_data(&self) -> bool {
        self.stage == Stage::Static
    }
}

impl CatalogClient {
    /// Run `request` through the fallback chain.
    ///
    /// Fails with [`CatalogError::SearchFailed`] only when every configured
    /// stage failed; the error carries the last stage's cause.
    pub async fn search(&self, request: &SearchRequest) -> Result<SearchOutcome, CatalogError> {
        let target = self.search_url(request);
        tracing::debug!(url=%target, field=%request.field(), sort=%request.sort(), "catalog.search.url");

        let mut attempted = 0usize;
        let mut last_error = None;

        for &stage in &self.stages {
            attempted += 1;
            tracing::debug!(%stage, attempt=attempted, "catalog.search.stage.start");

            match self.run_stage(stage, &target).await {
                Ok(books) => {
                    tracing::info!(%stage, count=books.len(), "catalog.search.stage.ok");
                    return Ok(SearchOutcome { stage, books });
                }
                Err(error) => {
                    tracing::warn!(%stage, %error, "catalog.search.stage.failed");
                    last_error = Some(error);
                }
            }
        }

        let source = last_error
            .unwrap_or_else(|| FetchError::Transport("no search stage was attempted".into()));
        tracing::error!(attempted, error=%source, "catalog.search.exhausted");
        Err(CatalogError::SearchFailed { attempted, source })
    }

    /// String-selector convenience: lenient field/sort mapping, client defaults,
    /// records only.
    pub async fn search_books(
        &self,
        query: &str,
        search_type: &str,
        sort_by: &str,
    ) -> Result<Vec<BookSummary>, CatalogError> {
        let request = self.request(query, search_type.into(), sort_by.into())?;
        self.search(&request).await.map(|outcome| outcome.books)
    }

    async fn run_stage(&self, stage: Stage, target: &Url) -> Result<Vec<BookSummary>, FetchError> {
        match stage {
            Stage::Direct => self.direct_stage(target).await,
            Stage::Proxy => self.proxy_stage(target).await,
            Stage::Static => Ok(fixtures::sample_books()),
        }
    }

    async fn direct_stage(&self, target: &Url) -> Result<Vec<BookSummary>, FetchError> {
        let opts = RequestOpts {
            allow_absolute: true,
            ..Default::default()
        };
        let body: Value = self.http.get_json(target.as_str(), opts).await?;
        normalize_search_body(&body)
    }

    async fn proxy_stage(&self, target: &Url) -> Result<Vec<BookSummary>, FetchError> {
        let opts = RequestOpts {
            allow_absolute: true,
            query: Some(vec![("url", Cow::Borrowed(target.as_str()))]),
            ..Default::default()
        };
        let body: Value = self
            .http
            .get_json(self.relay_endpoint.as_str(), opts)
            .await?;
        normalize_search_body(&body)
    }
}
