//! Log-safe renderings of requests and responses.

use reqwest::header::HeaderMap;
use reqwest::{Method, Url};
use std::env;

const RAW_ENV: &str = "BOOKFINDER_HTTP_RAW";
pub(crate) const RAW_MAX_BODY: usize = 64 * 1024;
const SNIPPET_MAX: usize = 500;

/// Credentials that may be embedded in a configured relay or base URL.
/// `key` is a public catalog identifier and stays visible.
const SECRET_KEYS: &[&str] = &["access_token", "api_key", "apikey", "token", "authorization"];

pub(crate) fn raw_enabled() -> bool {
    matches!(
        env::var(RAW_ENV).as_deref(),
        Ok("1") | Ok("true") | Ok("yes")
    )
}

pub(crate) fn is_secret(key: &str) -> bool {
    let lower = key.to_ascii_lowercase();
    SECRET_KEYS.contains(&lower.as_str())
}

/// Query pairs with secret values replaced.
pub(crate) fn redact_pairs<'a, I>(pairs: I) -> Vec<(String, String)>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    pairs
        .into_iter()
        .map(|(k, v)| {
            let v = if is_secret(k) { "<redacted>" } else { v };
            (k.to_string(), v.to_string())
        })
        .collect()
}

pub(crate) fn redact_headers(h: &HeaderMap) -> Vec<(String, String)> {
    h.iter()
        .map(|(k, v)| {
            let key = k.as_str().to_string();
            let val = if is_secret(&key) {
                "<redacted>".to_string()
            } else {
                v.to_str().unwrap_or("").to_string()
            };
            (key, val)
        })
        .collect()
}

/// Best-effort curl line for repro, with secret query values redacted.
pub(crate) fn make_curl(method: &Method, url: &Url) -> String {
    let mut shown = url.clone();
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    if !pairs.is_empty() {
        let redacted = redact_pairs(pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        shown.query_pairs_mut().clear().extend_pairs(redacted);
    }
    format!("curl -X{method} '{}'", shown.as_str())
}

pub(crate) fn snip_body(body: &[u8]) -> String {
    let mut snip = String::from_utf8_lossy(body).to_string();
    if snip.len() > SNIPPET_MAX {
        let mut cut = SNIPPET_MAX;
        while !snip.is_char_boundary(cut) {
            cut -= 1;
        }
        snip.truncate(cut);
        snip.push_str("...");
    }
    snip
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn secret_query_values_are_hidden() {
        let got = redact_pairs([("title", "dune"), ("API_KEY", "abc")]);
        assert_eq!(got[0], ("title".into(), "dune".into()));
        assert_eq!(got[1], ("API_KEY".into(), "<redacted>".into()));
    }

    #[test]
    fn curl_line_redacts_query() {
        let url = Url::parse("https://example.org/search.json?q=x&token=s3cr3t").unwrap();
        let line = make_curl(&Method::GET, &url);
        assert!(line.starts_with("curl -XGET"));
        assert!(!line.contains("s3cr3t"));
        assert!(line.contains("q=x"));
    }

    #[test]
    fn catalog_vocabulary_is_not_redacted() {
        let got = redact_pairs([("key", "/works/OL1W"), ("url", "https://openlibrary.org/search.json")]);
        assert_eq!(got[0].1, "/works/OL1W");
        assert_eq!(got[1].1, "https://openlibrary.org/search.json");
    }

    #[test]
    fn response_headers_hide_credentials() {
        let mut h = HeaderMap::new();
        h.insert("authorization", "Bearer abc".parse().unwrap());
        h.insert("content-type", "application/json".parse().unwrap());
        let got = redact_headers(&h);
        assert!(got.contains(&("authorization".into(), "<redacted>".into())));
        assert!(got.contains(&("content-type".into(), "application/json".into())));
    }

    #[test]
    fn snippet_is_capped_on_char_boundary() {
        let body = "é".repeat(400);
        let snip = snip_body(body.as_bytes());
        assert!(snip.ends_with("..."));
        assert!(snip.len() <= SNIPPET_MAX + 3);
    }
}
