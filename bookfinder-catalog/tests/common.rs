#![allow(dead_code)]

use std::sync::OnceLock;

use bookfinder_common::observability::{LogConfig, LogFormat};
use serde_json::{json, Value};

static INIT_PATH: OnceLock<std::path::PathBuf> = OnceLock::new();

pub fn init_test_tracing() {
    let _ = INIT_PATH.get_or_init(|| {
        let config = LogConfig {
            app_name: "bookfinder-tests",
            log_dir: Some(std::env::temp_dir().join("bookfinder-tests")),
            emit_stderr: true,
            format: if std::env::var("BOOKFINDER_LOG_FORMAT")
                .map(|raw| raw.trim().eq_ignore_ascii_case("json"))
                .unwrap_or(false)
            {
                LogFormat::Json
            } else {
                LogFormat::Text
            },
            default_filter: "debug".to_string(),
        };

        bookfinder_common::observability::init_logging(config).unwrap_or_default()
    });
}

/// Base URL of a local port with nothing listening.
pub fn closed_port_url() -> String {
    let port = {
        let l = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
        l.local_addr().expect("addr").port()
    };
    format!("http://127.0.0.1:{port}")
}

/// A `search.json` body with two hits and some fields the client ignores.
pub fn two_hit_body() -> Value {
    json!({
        "numFound": 2,
        "start": 0,
        "docs": [
            {
                "key": "/works/OL82563W",
                "title": "Harry Potter and the Philosopher's Stone",
                "author_name": ["J. K. Rowling"],
                "first_publish_year": 1997,
                "cover_i": 10521270,
                "has_fulltext": true,
                "ebook_access": "borrowable"
            },
            {
                "key": "/works/OL82586W",
                "title": "Harry Potter and the Deathly Hallows",
                "author_name": ["J. K. Rowling"],
                "first_publish_year": 2007
            }
        ]
    })
}
