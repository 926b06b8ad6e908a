use bookfinder_http::HttpError;
use thiserror::Error;

/// Why a single fetch attempt failed.
///
/// Search stages catch these locally and move on to the next stage; only
/// [`CatalogError`] crosses the crate boundary.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FetchError {
    /// No response at all: DNS, connect, timeout, truncated body.
    #[error("transport error: {0}")]
    Transport(String),

    #[error("HTTP status {status}: {message}")]
    HttpStatus { status: u16, message: String },

    /// A 2xx response whose body is not the expected document.
    #[error("invalid response shape: {0}")]
    InvalidResponseShape(String),

    #[error("invalid catalog key {0:?}")]
    InvalidKey(String),
}

impl From<HttpError> for FetchError {
    fn from(e: HttpError) -> Self {
        match e {
            HttpError::Api {
                status, message, ..
            } => FetchError::HttpStatus {
                status: status.as_u16(),
                message,
            },
            HttpError::Decode(err, snippet) => {
                FetchError::InvalidResponseShape(format!("{err} (body: {snippet})"))
            }
            HttpError::Network(msg) | HttpError::Url(msg) | HttpError::Build(msg) => {
                FetchError::Transport(msg)
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("search query is empty")]
    EmptyQuery,

    /// Every configured stage failed; carries the last stage's cause.
    #[error("failed to search books after {attempted} stage(s): {source}")]
    SearchFailed {
        attempted: usize,
        #[source]
        source: FetchError,
    },

    #[error("failed to fetch {what}: {source}")]
    LookupFailed {
        what: &'static str,
        #[source]
        source: FetchError,
    },

    #[error("catalog client setup failed: {0}")]
    Setup(String),
}

impl From<HttpError> for CatalogError {
    fn from(e: HttpError) -> Self {
        CatalogError::Setup(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bookfinder_http::StatusCode;

    #[test]
    fn http_errors_map_to_fetch_taxonomy() {
        let net = FetchError::from(HttpError::Network("connection refused".into()));
        assert_eq!(net, FetchError::Transport("connection refused".into()));

        let api = FetchError::from(HttpError::Api {
            status: StatusCode::BAD_GATEWAY,
            message: "upstream".into(),
            request_id: "-".into(),
        });
        assert_eq!(
            api,
            FetchError::HttpStatus {
                status: 502,
                message: "upstream".into()
            }
        );

        let decode = FetchError::from(HttpError::Decode("eof".into(), "<html".into()));
        assert!(matches!(decode, FetchError::InvalidResponseShape(_)));
    }
}
