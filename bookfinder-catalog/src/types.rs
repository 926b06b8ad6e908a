use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Normalized projection of one catalog search hit.
///
/// Only `title` is guaranteed; everything else is carried through exactly
/// when the catalog sent it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    pub title: String,
    pub authors: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_publish_year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub isbn: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subjects: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publisher: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating_average: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating_count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_sentence: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edition_count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_fulltext: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_scan: Option<bool>,
}

/// Wire shape of a `search.json` document. Unknown fields are ignored, and an
/// optional field of the wrong type reads as absent. Only `title` is required.
#[derive(Debug, Clone, Deserialize)]
pub struct RawDoc {
    #[serde(default, deserialize_with = "lenient")]
    pub key: Option<String>,
    pub title: String,
    #[serde(default, deserialize_with = "one_or_many")]
    pub author_name: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient")]
    pub first_publish_year: Option<i32>,
    #[serde(default, deserialize_with = "lenient")]
    pub cover_i: Option<i64>,
    #[serde(default, deserialize_with = "one_or_many")]
    pub isbn: Option<Vec<String>>,
    #[serde(default, deserialize_with = "one_or_many")]
    pub subject: Option<Vec<String>>,
    #[serde(default, deserialize_with = "one_or_many")]
    pub publisher: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient")]
    pub ratings_average: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub ratings_count: Option<u64>,
    #[serde(default, deserialize_with = "one_or_many")]
    pub first_sentence: Option<Vec<String>>,
    #[serde(default, deserialize_with = "one_or_many")]
    pub language: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient")]
    pub edition_count: Option<u64>,
    #[serde(default, deserialize_with = "lenient")]
    pub has_fulltext: Option<bool>,
    #[serde(default, deserialize_with = "lenient")]
    pub public_scan_b: Option<bool>,
}

impl From<RawDoc> for BookSummary {
    fn from(raw: RawDoc) -> Self {
        Self {
            key: raw.key,
            title: raw.title,
            authors: raw.author_name.unwrap_or_default(),
            first_publish_year: raw.first_publish_year,
            cover_id: raw.cover_i,
            isbn: raw.isbn,
            subjects: raw.subject,
            publisher: raw.publisher,
            rating_average: raw.ratings_average,
            rating_count: raw.ratings_count,
            first_sentence: raw.first_sentence,
            language: raw.language,
            edition_count: raw.edition_count,
            has_fulltext: raw.has_fulltext,
            public_scan: raw.public_scan_b,
        }
    }
}

/// `Some` when the value has the expected type, `None` otherwise.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).ok())
}

/// Accept `"x"` or `["x", "y"]`; anything else reads as absent.
fn one_or_many<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(lenient::<D, OneOrMany>(deserializer)?.map(|v| match v {
        OneOrMany::One(s) => vec![s],
        OneOrMany::Many(xs) => xs,
    }))
}
