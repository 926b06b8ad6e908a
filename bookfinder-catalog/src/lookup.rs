//! Single-shot reads of catalog documents by key. No fallback chain.

use crate::client::CatalogClient;
use crate::error::{CatalogError, FetchError};
use bookfinder_http::RequestOpts;
use serde_json::Value;

impl CatalogClient {
    /// Raw JSON for a work or edition key such as `/works/OL45804W`.
    pub async fn book_details(&self, key: &str) -> Result<Value, CatalogError> {
        self.lookup("book details", key).await
    }

    /// Raw JSON for an author key such as `/authors/OL34184A`.
    pub async fn author_info(&self, key: &str) -> Result<Value, CatalogError> {
        self.lookup("author info", key).await
    }

    /// Human-facing catalog page for `key`.
    pub fn work_page_url(&self, key: &str) -> Option<String> {
        check_key(key).ok()?;
        Some(format!("{}{key}", self.catalog_root))
    }

    async fn lookup(&self, what: &'static str, key: &str) -> Result<Value, CatalogError> {
        let fail = |source| CatalogError::LookupFailed { what, source };

        check_key(key).map_err(fail)?;
        let url = format!("{}{key}.json", self.catalog_root);
        tracing::debug!(%url, what, "catalog.lookup");

        let opts = RequestOpts {
            allow_absolute: true,
            ..Default::default()
        };
        self.http
            .get_json::<Value>(&url, opts)
            .await
            .map_err(|e| {
                let source = FetchError::from(e);
                tracing::warn!(what, key, error=%source, "catalog.lookup.failed");
                fail(source)
            })
    }
}

/// Keys are absolute catalog paths: one leading `/`, no query, fragment or whitespace.
fn check_key(key: &str) -> Result<(), FetchError> {
    let ok = key.starts_with('/')
        && !key.starts_with("//")
        && key.len() > 1
        && !key.contains(['?', '#', '\\'])
        && !key.chars().any(char::is_whitespace);
    if ok {
        Ok(())
    } else {
        Err(FetchError::InvalidKey(key.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_validation() {
        for good in ["/works/OL45804W", "/authors/OL34184A", "/books/OL7353617M"] {
            assert!(check_key(good).is_ok(), "{good}");
        }
        for bad in ["", "/", "works/OL1W", "//evil.example/x", "/works/OL1W?x=1", "/a b", "/a#b"] {
            assert!(check_key(bad).is_err(), "{bad:?}");
        }
    }

    #[test]
    fn work_page_url_joins_key() {
        let c = CatalogClient::new().unwrap();
        assert_eq!(
            c.work_page_url("/works/OL45804W").as_deref(),
            Some("https://openlibrary.org/works/OL45804W")
        );
        assert_eq!(c.work_page_url("OL45804W"), None);
    }
}
