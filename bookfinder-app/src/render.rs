//! Plain-text book cards for the terminal.

use bookfinder_catalog::{BookSummary, CatalogClient, CoverSize};

pub fn authors_line(book: &BookSummary) -> String {
    if book.authors.is_empty() {
        "Unknown Author".to_string()
    } else {
        book.authors.join(", ")
    }
}

pub fn year_line(book: &BookSummary) -> String {
    book.first_publish_year
        .map(|y| y.to_string())
        .unwrap_or_else(|| "Unknown".to_string())
}

pub fn rating_line(book: &BookSummary) -> Option<String> {
    let avg = book.rating_average?;
    Some(format!("{avg:.1} ({} ratings)", book.rating_count.unwrap_or(0)))
}

pub fn subjects_line(book: &BookSummary) -> Option<String> {
    let subjects = book.subjects.as_ref().filter(|s| !s.is_empty())?;
    Some(subjects.iter().take(3).cloned().collect::<Vec<_>>().join(", "))
}

pub fn first_sentence(book: &BookSummary) -> Option<&str> {
    book.first_sentence.as_ref()?.first().map(String::as_str)
}

pub fn results_header(count: usize) -> String {
    match count {
        0 => "No books found".to_string(),
        1 => "Found 1 book".to_string(),
        n => format!("Found {n} books"),
    }
}

/// One card; `cover` and `link` come from the client so hosts follow configuration.
pub fn card(book: &BookSummary, cover: Option<&str>, link: Option<&str>) -> String {
    let mut lines = vec![
        book.title.clone(),
        format!("  by {}", authors_line(book)),
        format!("  first published: {}", year_line(book)),
    ];
    if let Some(rating) = rating_line(book) {
        lines.push(format!("  rating: {rating}"));
    }
    if let Some(subjects) = subjects_line(book) {
        lines.push(format!("  subjects: {subjects}"));
    }
    if let Some(sentence) = first_sentence(book) {
        lines.push(format!("  \"{sentence}\""));
    }
    if let Some(cover) = cover {
        lines.push(format!("  cover: {cover}"));
    }
    if let Some(link) = link {
        lines.push(format!("  details: {link}"));
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

pub fn cards(client: &CatalogClient, books: &[BookSummary]) -> String {
    let mut out = results_header(books.len());
    out.push('\n');
    for book in books {
        out.push('\n');
        let cover = client.cover_url(book.cover_id, CoverSize::M);
        let link = book.key.as_deref().and_then(|k| client.work_page_url(k));
        out.push_str(&card(book, cover.as_deref(), link.as_deref()));
    }
    out
}
