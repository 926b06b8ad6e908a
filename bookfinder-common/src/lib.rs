//! Shared plumbing for the Bookfinder crates.
//!
//! Kept deliberately small: the logging initializer lives in
//! [`observability`], and [`APP_NAME`] is the component name used for
//! default directories and log file names.
//!
//! ```rust
//! use bookfinder_common::observability::{LogConfig, LogFormat};
//!
//! let cfg = LogConfig {
//!     format: LogFormat::Json,
//!     ..LogConfig::default()
//! };
//! assert_eq!(cfg.app_name, bookfinder_common::APP_NAME);
//! assert_eq!(cfg.default_filter, "info");
//! ```

pub mod observability;

/// Logical application name.
pub const APP_NAME: &str = "bookfinder";
