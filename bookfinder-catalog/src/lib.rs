//! Open Library catalog client.
//!
//! - [`query`]: pure mapping from (text, field, sort) to request parameters
//! - [`strategy`]: search over an ordered direct → proxy → static chain
//! - [`lookup`]: book and author documents by key
//! - [`cover`]: cover image URLs
//! - [`fixtures`]: the static stage's sample records
//!
//! # Examples
//! ```no_run
//! use bookfinder_catalog::{CatalogClient, CatalogError, SearchField, SortOrder};
//!
//! # async fn demo() -> Result<(), CatalogError> {
//! let client = CatalogClient::new()?;
//! let req = client.request("Harry Potter", SearchField::Title, SortOrder::Title)?;
//! let outcome = client.search(&req).await?;
//! for book in &outcome.books {
//!     println!("{} ({})", book.title, book.authors.join(", "));
//! }
//! # Ok(())
//! # }
//! ```
mod client;
pub mod cover;
mod error;
pub mod fixtures;
pub mod lookup;
mod normalize;
pub mod query;
pub mod strategy;
pub mod types;

pub use client::{CatalogClient, CatalogClientBuilder, DEFAULT_CATALOG_URL, DEFAULT_RELAY_URL};
pub use cover::{cover_image_url, CoverSize, DEFAULT_COVERS_HOST};
pub use error::{CatalogError, FetchError};
pub use normalize::normalize_search_body;
pub use query::{build_search_params, SearchDefaults, SearchField, SearchFilters, SearchRequest, SortOrder};
pub use strategy::{SearchOutcome, Stage, DEFAULT_STAGES};
pub use types::BookSummary;
