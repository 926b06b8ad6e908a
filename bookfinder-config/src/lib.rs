//! Loader for Bookfinder configuration with YAML + environment overlays.
//!
//! Sources are merged in the order they are added, with `BOOKFINDER_`
//! environment variables applied last (`BOOKFINDER_SEARCH__LIMIT=10` sets
//! `search.limit`). String values may reference `${VAR}` placeholders, which
//! are expanded after merging. Every field has a default, so an empty
//! document yields a working configuration pointed at the public Open Library
//! endpoints.
use bookfinder_common::APP_NAME;
use bookfinder_common::observability::LogFormat;
use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};
use url::Url;

const MAXIMUM_ENV_EXPANSION_DEPTH: usize = 8;
const ENV_PREFIX: &str = "BOOKFINDER";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BookfinderConfig {
    pub catalog: CatalogConfig,
    pub http: HttpConfig,
    pub search: SearchConfig,
    pub logging: LoggingConfig,
}

/// Remote endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub base_url: String,
    pub relay_url: String,
    pub covers_url: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: "https://openlibrary.org".into(),
            relay_url: "https://api.allorigins.win".into(),
            covers_url: "https://covers.openlibrary.org".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub timeout_secs: u64,
    pub connect_timeout_secs: u64,
    pub max_retries: usize,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 15,
            connect_timeout_secs: 5,
            max_retries: 0,
        }
    }
}

/// One entry of the fetch fallback chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StageName {
    Direct,
    Proxy,
    Static,
}

/// Defaults applied to every search request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub limit: u32,
    pub offset: u32,
    pub has_fulltext: bool,
    pub language: String,
    pub stages: Vec<StageName>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            limit: 20,
            offset: 0,
            has_fulltext: true,
            language: "eng".into(),
            stages: vec![StageName::Direct, StageName::Proxy],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub format: LogFormat,
    pub emit_stderr: bool,
    pub filter: String,
    pub dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::Text,
            emit_stderr: false,
            filter: "info".into(),
            dir: None,
        }
    }
}

impl BookfinderConfig {
    /// Reject configurations that would fail at request time.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, raw) in [
            ("catalog.base_url", &self.catalog.base_url),
            ("catalog.relay_url", &self.catalog.relay_url),
            ("catalog.covers_url", &self.catalog.covers_url),
        ] {
            Url::parse(raw)
                .map_err(|e| ConfigError::Message(format!("{name}: invalid URL {raw:?}: {e}")))?;
        }

        let stages = &self.search.stages;
        if stages.is_empty() {
            return Err(ConfigError::Message(
                "search.stages must list at least one stage".into(),
            ));
        }
        for (i, stage) in stages.iter().enumerate() {
            if stages[..i].contains(stage) {
                return Err(ConfigError::Message(format!(
                    "search.stages lists {stage:?} more than once"
                )));
            }
        }
        Ok(())
    }
}

/// `<config dir>/bookfinder/bookfinder.yaml`, when the platform has a config dir.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_NAME).join(format!("{APP_NAME}.yaml")))
}

fn expand_env_in_value(v: &mut Value) {
    match v {
        Value::String(s) => {
            if s.contains('$') {
                let mut cur = std::mem::take(s);
                for _ in 0..MAXIMUM_ENV_EXPANSION_DEPTH {
                    let expanded = match shellexpand::env(&cur) {
                        Ok(cow) => cow.into_owned(),
                        Err(_) => cur.clone(),
                    };
                    if expanded == cur {
                        break;
                    }
                    cur = expanded;
                }
                *s = cur;
            }
        }
        Value::Array(arr) => arr.iter_mut().for_each(expand_env_in_value),
        Value::Object(obj) => obj.values_mut().for_each(expand_env_in_value),
        _ => {}
    }
}

/// Builder over the `config` crate wiring.
pub struct BookfinderConfigLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
}

impl Default for BookfinderConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl BookfinderConfigLoader {
    /// An empty loader; environment overrides are always applied on [`load`](Self::load).
    ///
    /// ```
    /// use bookfinder_config::BookfinderConfigLoader;
    ///
    /// let cfg = BookfinderConfigLoader::new()
    ///     .with_yaml_str("search:\n  limit: 5")
    ///     .load()
    ///     .expect("valid config");
    ///
    /// assert_eq!(cfg.search.limit, 5);
    /// assert_eq!(cfg.search.language, "eng");
    /// ```
    pub fn new() -> Self {
        Self {
            builder: Config::builder(),
        }
    }

    /// Attach a file that must exist; the format is inferred from the suffix.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(true));
        self
    }

    /// Attach a file that is skipped when absent.
    pub fn with_optional_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(false));
        self
    }

    /// Merge an inline YAML snippet.
    ///
    /// ```
    /// use bookfinder_config::{BookfinderConfigLoader, StageName};
    ///
    /// let cfg = BookfinderConfigLoader::new()
    ///     .with_yaml_str(
    ///         r#"
    /// search:
    ///   stages: [proxy, direct, static]
    /// "#,
    ///     )
    ///     .load()
    ///     .unwrap();
    ///
    /// assert_eq!(
    ///     cfg.search.stages,
    ///     vec![StageName::Proxy, StageName::Direct, StageName::Static]
    /// );
    /// ```
    pub fn with_yaml_str(mut self, yaml: &str) -> Self {
        self.builder = self.builder.add_source(File::from_str(yaml, FileFormat::Yaml));
        self
    }

    /// Merge all sources, expand `${VAR}` placeholders, deserialize and validate.
    pub fn load(self) -> Result<BookfinderConfig, ConfigError> {
        let cfg = self
            .builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("search.stages"),
            )
            .build()?;

        let mut v: Value = cfg.try_deserialize()?;
        expand_env_in_value(&mut v);

        let typed: BookfinderConfig =
            serde_json::from_value(v).map_err(|e| ConfigError::Message(e.to_string()))?;
        typed.validate()?;
        Ok(typed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn expands_simple_string() {
        temp_env::with_var("BF_TEST_FOO", Some("bar"), || {
            let mut v = json!("prefix-${BF_TEST_FOO}-suffix");
            expand_env_in_value(&mut v);
            assert_eq!(v, json!("prefix-bar-suffix"));
        });
    }

    #[test]
    fn expands_in_array_and_object() {
        temp_env::with_vars(
            [("BF_TEST_HOST", Some("relay.local")), ("BF_TEST_PORT", Some("8080"))],
            || {
                let mut v = json!([
                    "http://$BF_TEST_HOST",
                    { "relay_url": "http://${BF_TEST_HOST}:${BF_TEST_PORT}" },
                    20,
                    true,
                    null
                ]);
                expand_env_in_value(&mut v);
                assert_eq!(
                    v,
                    json!([
                        "http://relay.local",
                        { "relay_url": "http://relay.local:8080" },
                        20,
                        true,
                        null
                    ])
                );
            },
        );
    }

    #[test]
    fn expands_recursively_across_env_values() {
        temp_env::with_vars(
            [
                ("BF_TEST_C", Some("org")),
                ("BF_TEST_B", Some("openlibrary.${BF_TEST_C}")),
                ("BF_TEST_A", Some("https://${BF_TEST_B}")),
            ],
            || {
                let mut v = json!("${BF_TEST_A}");
                expand_env_in_value(&mut v);
                assert_eq!(v, json!("https://openlibrary.org"));
            },
        );
    }

    #[test]
    fn stops_on_cycles() {
        temp_env::with_vars(
            [("BF_TEST_X", Some("${BF_TEST_Y}")), ("BF_TEST_Y", Some("${BF_TEST_X}"))],
            || {
                let mut v = json!("x=${BF_TEST_X}-y");
                expand_env_in_value(&mut v);
                let s = v.as_str().unwrap();
                assert!(s.starts_with("x=") && s.ends_with("-y"));
                assert!(s.contains("${"));
            },
        );
    }

    #[test]
    fn unknown_vars_are_left_as_is() {
        let mut v = json!("hi-${BF_TEST_DOES_NOT_EXIST}");
        expand_env_in_value(&mut v);
        assert_eq!(v, json!("hi-${BF_TEST_DOES_NOT_EXIST}"));
    }

    #[test]
    fn defaults_validate() {
        BookfinderConfig::default().validate().unwrap();
    }

    #[test]
    fn empty_stage_list_is_rejected() {
        let mut cfg = BookfinderConfig::default();
        cfg.search.stages.clear();
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn duplicate_stage_is_rejected() {
        let mut cfg = BookfinderConfig::default();
        cfg.search.stages = vec![StageName::Direct, StageName::Direct];
        let err = cfg.validate().unwrap_err().to_string();
        assert!(err.contains("more than once"), "{err}");
    }

    #[test]
    fn bad_url_is_rejected() {
        let mut cfg = BookfinderConfig::default();
        cfg.catalog.relay_url = "not a url".into();
        let err = cfg.validate().unwrap_err().to_string();
        assert!(err.contains("catalog.relay_url"), "{err}");
    }
}
