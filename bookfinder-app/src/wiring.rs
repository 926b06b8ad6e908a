use anyhow::{Context, Result};
use bookfinder_catalog::{CatalogClient, SearchDefaults, SearchFilters, Stage};
use bookfinder_common::APP_NAME;
use bookfinder_common::observability::LogConfig;
use bookfinder_config::{BookfinderConfig, StageName};
use bookfinder_http::ClientSettings;
use std::time::Duration;

fn stage_of(name: StageName) -> Stage {
    match name {
        StageName::Direct => Stage::Direct,
        StageName::Proxy => Stage::Proxy,
        StageName::Static => Stage::Static,
    }
}

pub fn log_config(cfg: &BookfinderConfig) -> LogConfig {
    LogConfig {
        app_name: APP_NAME,
        log_dir: cfg.logging.dir.clone(),
        emit_stderr: cfg.logging.emit_stderr,
        format: cfg.logging.format,
        default_filter: cfg.logging.filter.clone(),
    }
}

pub fn build_client(cfg: &BookfinderConfig) -> Result<CatalogClient> {
    let http = ClientSettings {
        timeout: Duration::from_secs(cfg.http.timeout_secs),
        connect_timeout: Duration::from_secs(cfg.http.connect_timeout_secs),
        max_retries: cfg.http.max_retries,
        ..ClientSettings::default()
    };
    let defaults = SearchDefaults {
        limit: cfg.search.limit,
        offset: cfg.search.offset,
        filters: SearchFilters {
            has_fulltext: cfg.search.has_fulltext,
            language: cfg.search.language.clone(),
        },
    };

    CatalogClient::builder()
        .catalog_url(&cfg.catalog.base_url)
        .relay_url(&cfg.catalog.relay_url)
        .covers_url(&cfg.catalog.covers_url)
        .stages(cfg.search.stages.iter().copied().map(stage_of).collect())
        .http_settings(http)
        .defaults(defaults)
        .build()
        .context("failed to build catalog client")
}

#[cfg(test)]
mod tests {
    use super::*;
    use bookfinder_catalog::{SearchField, SortOrder};
    use bookfinder_config::BookfinderConfigLoader;

    #[test]
    fn config_flows_into_client() {
        let cfg = BookfinderConfigLoader::new()
            .with_yaml_str(
                r#"
catalog:
  base_url: http://127.0.0.1:9000/
search:
  limit: 5
  language: fre
  stages: [proxy, static]
"#,
            )
            .load()
            .unwrap();

        let client = build_client(&cfg).unwrap();
        assert_eq!(client.stages(), &[Stage::Proxy, Stage::Static]);
        assert_eq!(client.search_endpoint().as_str(), "http://127.0.0.1:9000/search.json");

        let req = client.request("Zola", SearchField::Author, SortOrder::Oldest).unwrap();
        let url = client.search_url(&req);
        assert_eq!(
            url.query(),
            Some("author=Zola&sort=old&limit=5&offset=0&has_fulltext=true&language=fre")
        );
    }

    #[test]
    fn logging_section_maps_to_log_config() {
        let mut cfg = BookfinderConfig::default();
        cfg.logging.emit_stderr = true;
        cfg.logging.filter = "bookfinder_catalog=debug".into();
        let lc = log_config(&cfg);
        assert!(lc.emit_stderr);
        assert_eq!(lc.default_filter, "bookfinder_catalog=debug");
        assert_eq!(lc.app_name, "bookfinder");
    }
}
