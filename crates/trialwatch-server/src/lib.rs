//! HTTP server for the Trialwatch oversight dashboard.
//!
//! Wires a [`WorkbookSource`] over the configured data directory into the
//! [`trialwatch_api`] router, mounted under `/api`.

use std::{path::PathBuf, sync::Arc};

use axum::Router;
use serde::Deserialize;
use tower_http::trace::TraceLayer;
use trialwatch_core::source::DatasetSource;
use trialwatch_xlsx::{DataFiles, WorkbookSource};

/// Default file name of the CRA site performance report.
pub const REPORT_FILE: &str = "Full_CRA_Site_Performance_Reports.txt";

// ─── Configuration ───────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `TRIALWATCH_*` environment variables. Every key is optional.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ServerConfig {
  pub host:     String,
  pub port:     u16,
  /// Directory holding the four workbooks and the report.
  pub data_dir: PathBuf,
  pub files:    FileOverrides,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:     "127.0.0.1".to_string(),
      port:     8501,
      data_dir: PathBuf::from("data"),
      files:    FileOverrides::default(),
    }
  }
}

/// Per-file paths that replace the defaults inside `data_dir`.
#[derive(Debug, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct FileOverrides {
  pub subjects:  Option<PathBuf>,
  pub sites:     Option<PathBuf>,
  pub countries: Option<PathBuf>,
  pub regions:   Option<PathBuf>,
  pub report:    Option<PathBuf>,
}

impl ServerConfig {
  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }

  pub fn data_files(&self) -> DataFiles {
    let mut files = DataFiles::in_dir(&self.data_dir);
    let overrides = [
      (&mut files.subjects, &self.files.subjects),
      (&mut files.sites, &self.files.sites),
      (&mut files.countries, &self.files.countries),
      (&mut files.regions, &self.files.regions),
    ];
    for (slot, path) in overrides {
      if let Some(path) = path {
        *slot = path.clone();
      }
    }
    files
  }

  pub fn report_path(&self) -> PathBuf {
    self.files.report.clone().unwrap_or_else(|| self.data_dir.join(REPORT_FILE))
  }
}

// ─── Router ──────────────────────────────────────────────────────────────────

/// Mount the API for `source` under `/api`, with request tracing.
pub fn router<S>(source: Arc<S>, report_path: PathBuf) -> Router
where
  S: DatasetSource + 'static,
{
  Router::new()
    .nest("/api", trialwatch_api::api_router(source, report_path))
    .layer(TraceLayer::new_for_http())
}

/// The source and router described by `config`.
pub fn app(config: &ServerConfig) -> (Arc<WorkbookSource>, Router) {
  let source = Arc::new(WorkbookSource::new(config.data_files()));
  let router = router(Arc::clone(&source), config.report_path());
  (source, router)
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use axum::{
    body::Body,
    http::{Request, StatusCode},
  };
  use serde_json::Value;
  use tower::ServiceExt as _;

  use super::*;

  async fn get(router: Router, uri: &str) -> (StatusCode, Value) {
    let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let resp = router.oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
  }

  fn config_in(dir: &std::path::Path) -> ServerConfig {
    ServerConfig { data_dir: dir.to_path_buf(), ..ServerConfig::default() }
  }

  // ── Configuration ───────────────────────────────────────────────────────────

  #[test]
  fn empty_config_uses_defaults() {
    let cfg: ServerConfig = config::Config::builder()
      .build()
      .unwrap()
      .try_deserialize()
      .unwrap();
    assert_eq!(cfg, ServerConfig::default());
    assert_eq!(cfg.address(), "127.0.0.1:8501");
    assert_eq!(cfg.report_path(), PathBuf::from("data").join(REPORT_FILE));
  }

  #[test]
  fn toml_overrides_individual_files() {
    let toml = r#"
      port = 9000
      data_dir = "/srv/trial"

      [files]
      sites  = "/exports/sites.xlsx"
      report = "/exports/cra.txt"
    "#;
    let cfg: ServerConfig = config::Config::builder()
      .add_source(config::File::from_str(toml, config::FileFormat::Toml))
      .build()
      .unwrap()
      .try_deserialize()
      .unwrap();

    assert_eq!(cfg.port, 9000);
    assert_eq!(cfg.host, "127.0.0.1");
    let files = cfg.data_files();
    assert_eq!(files.sites, PathBuf::from("/exports/sites.xlsx"));
    assert_eq!(files.subjects, PathBuf::from("/srv/trial").join(DataFiles::SUBJECTS));
    assert_eq!(cfg.report_path(), PathBuf::from("/exports/cra.txt"));
  }

  // ── Routing ─────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn api_is_nested_under_prefix() {
    let dir = tempfile::tempdir().unwrap();
    let (_, router) = app(&config_in(dir.path()));
    let (status, body) = get(router.clone(), "/api/views").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 5);

    let req = Request::builder().uri("/views").body(Body::empty()).unwrap();
    let resp = router.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn missing_data_files_are_a_server_error() {
    let dir = tempfile::tempdir().unwrap();
    let (_, router) = app(&config_in(dir.path()));
    let (status, body) = get(router, "/api/overview").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().contains("data file not found"));
  }

  #[tokio::test]
  async fn missing_report_is_reported_in_the_summary() {
    let dir = tempfile::tempdir().unwrap();
    let (_, router) = app(&config_in(dir.path()));
    let (status, body) = get(router, "/api/sites/Site%203/summary").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["site_id"], "Site 3");
    assert_eq!(body["summary"], "Summary file not found.");
  }
}
