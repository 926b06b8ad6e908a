//! Cover image URLs. No network access.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub const DEFAULT_COVERS_HOST: &str = "https://covers.openlibrary.org";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum CoverSize {
    S,
    #[default]
    M,
    L,
}

impl CoverSize {
    pub fn as_str(self) -> &'static str {
        match self {
            CoverSize::S => "S",
            CoverSize::M => "M",
            CoverSize::L => "L",
        }
    }
}

impl fmt::Display for CoverSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown cover size {0:?}, expected S, M or L")]
pub struct ParseCoverSizeError(pub String);

impl FromStr for CoverSize {
    type Err = ParseCoverSizeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "S" | "s" => Ok(CoverSize::S),
            "M" | "m" => Ok(CoverSize::M),
            "L" | "l" => Ok(CoverSize::L),
            other => Err(ParseCoverSizeError(other.to_string())),
        }
    }
}

/// Cover URL on the public covers host.
///
/// ```
/// use bookfinder_catalog::{cover_image_url, CoverSize};
///
/// assert_eq!(
///     cover_image_url(Some(123), CoverSize::L).as_deref(),
///     Some("https://covers.openlibrary.org/b/id/123-L.jpg")
/// );
/// assert_eq!(cover_image_url(None, CoverSize::M), None);
/// ```
pub fn cover_image_url(cover_id: Option<i64>, size: CoverSize) -> Option<String> {
    cover_url_on(DEFAULT_COVERS_HOST, cover_id, size)
}

/// `<host>/b/id/<id>-<size>.jpg`, or `None` without an id. Id `0` counts as
/// absent; the catalog never issues it.
pub fn cover_url_on(host: &str, cover_id: Option<i64>, size: CoverSize) -> Option<String> {
    let id = cover_id.filter(|id| *id != 0)?;
    Some(format!("{}/b/id/{id}-{size}.jpg", host.trim_end_matches('/')))
}
