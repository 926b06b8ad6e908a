//! Built-in sample records served by the static search stage.
//!
//! These keep a caller's screen populated when both the catalog and the relay
//! are unreachable. They are sample data, not search results.

use crate::types::BookSummary;

/// One hard-coded catalog entry.
#[derive(Debug, Clone, Copy)]
pub struct SampleBook {
    pub key: &'static str,
    pub title: &'static str,
    pub authors: &'static [&'static str],
    pub first_publish_year: i32,
    pub subjects: &'static [&'static str],
    pub first_sentence: &'static str,
    pub edition_count: u64,
}

pub const SAMPLE_BOOKS: [SampleBook; 2] = [
    SampleBook {
        key: "/works/OL66554W",
        title: "Pride and Prejudice",
        authors: &["Jane Austen"],
        first_publish_year: 1813,
        subjects: &["Courtship", "Social classes", "England"],
        first_sentence: "It is a truth universally acknowledged, that a single man in possession of a good fortune, must be in want of a wife.",
        edition_count: 2000,
    },
    SampleBook {
        key: "/works/OL468431W",
        title: "The Great Gatsby",
        authors: &["F. Scott Fitzgerald"],
        first_publish_year: 1925,
        subjects: &["Wealth", "Long Island (N.Y.)", "American fiction"],
        first_sentence: "In my younger and more vulnerable years my father gave me some advice that I've been turning over in my mind ever since.",
        edition_count: 800,
    },
];

impl From<&SampleBook> for BookSummary {
    fn from(s: &SampleBook) -> Self {
        fn owned(xs: &[&str]) -> Vec<String> {
            xs.iter().map(|x| x.to_string()).collect()
        }
        Self {
            key: Some(s.key.to_string()),
            title: s.title.to_string(),
            authors: owned(s.authors),
            first_publish_year: Some(s.first_publish_year),
            cover_id: None,
            isbn: None,
            subjects: Some(owned(s.subjects)),
            publisher: None,
            rating_average: None,
            rating_count: None,
            first_sentence: Some(vec![s.first_sentence.to_string()]),
            language: Some(vec!["eng".to_string()]),
            edition_count: Some(s.edition_count),
            has_fulltext: Some(true),
            public_scan: Some(true),
        }
    }
}

/// [`SAMPLE_BOOKS`] as summaries, in fixture order.
pub fn sample_books() -> Vec<BookSummary> {
    SAMPLE_BOOKS.iter().map(BookSummary::from).collect()
}
