use crate::error::FetchError;
use crate::types::{BookSummary, RawDoc};
use serde::Deserialize;
use serde_json::Value;

/// Project a `search.json` body onto [`BookSummary`] records, preserving order.
///
/// A body without a `docs` array, or with a record that is not an object
/// carrying a string `title`, is an [`FetchError::InvalidResponseShape`].
/// Optional fields of an unexpected type are dropped from their record.
pub fn normalize_search_body(body: &Value) -> Result<Vec<BookSummary>, FetchError> {
    let docs = match body.get("docs") {
        Some(Value::Array(docs)) => docs,
        Some(other) => {
            return Err(FetchError::InvalidResponseShape(format!(
                "`docs` is {}, expected an array",
                kind(other)
            )));
        }
        None => {
            return Err(FetchError::InvalidResponseShape(
                "response has no `docs` field".into(),
            ));
        }
    };

    docs.iter()
        .enumerate()
        .map(|(i, doc)| {
            if !doc.is_object() {
                return Err(FetchError::InvalidResponseShape(format!(
                    "docs[{i}] is {}, expected an object",
                    kind(doc)
                )));
            }
            RawDoc::deserialize(doc)
                .map(BookSummary::from)
                .map_err(|e| FetchError::InvalidResponseShape(format!("docs[{i}]: {e}")))
        })
        .collect()
}

fn kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
