//! Handlers for `/sites` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/sites` | `?risk=&country=&region=&readiness=&site_id=` |
//! | `GET`  | `/sites/{id}/summary` | always 200; the text explains misses |

use std::path::PathBuf;
use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};
use trialwatch_core::{
  chart::{Chart, PieChart},
  dataset::Snapshot,
  filter::{FilterControl, Selection, SiteFilter},
  record::SiteRecord,
  source::DatasetSource,
  view::{MISSING, Metric, View},
};

use crate::{
  ApiState,
  error::ApiError,
  page::{PageMeta, requested, snapshot},
};

// ─── Page ────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct SiteParams {
  pub risk:      Option<String>,
  pub country:   Option<String>,
  pub region:    Option<String>,
  pub readiness: Option<String>,
  pub site_id:   Option<String>,
}

impl SiteParams {
  fn filter(&self) -> SiteFilter {
    SiteFilter {
      risk:      Selection::from_query(self.risk.as_deref()),
      country:   Selection::from_query(self.country.as_deref()),
      region:    Selection::from_query(self.region.as_deref()),
      readiness: Selection::from_query(self.readiness.as_deref()),
    }
  }
}

#[derive(Debug, Clone, Serialize)]
pub struct SitePage {
  #[serde(flatten)]
  pub meta:     PageMeta,
  pub filters:  Vec<FilterControl>,
  pub matched:  usize,
  pub site_ids: Vec<String>,
  pub selected: SiteDetail,
  /// Risk mix over every site that passed the filters.
  pub chart:    Chart,
}

#[derive(Debug, Clone, Serialize)]
pub struct SiteDetail {
  pub site_id:             String,
  pub country:             String,
  pub region:              String,
  pub metrics:             Vec<Metric>,
  pub risk_level:          String,
  pub critical_site:       String,
  pub risk_signals:        String,
  /// Filled in by [`page`] from the CRA report; empty straight out of
  /// [`build`].
  pub ai_summary:          String,
  pub recommended_actions: String,
}

/// `GET /sites`
pub async fn page<S: DatasetSource>(
  State(state): State<ApiState<S>>,
  Query(params): Query<SiteParams>,
) -> Result<Json<SitePage>, ApiError> {
  let snapshot = snapshot(&*state.source).await?;
  let mut page = build(&snapshot, &params)?;
  page.selected.ai_summary =
    summary_text(Arc::clone(&state.report_path), page.selected.site_id.clone()).await?;
  Ok(Json(page))
}

pub fn build(snapshot: &Snapshot, params: &SiteParams) -> Result<SitePage, ApiError> {
  let wanted = requested("site_id", params.site_id.as_deref())?;
  let filtered = params.filter().apply(&snapshot.datasets.sites).non_empty("sites")?;
  let site = filtered.pick(wanted, "site", |s| s.site_id.as_str())?;

  let chart = PieChart::tally(
    "Risk Distribution Across Filtered Sites",
    filtered.rows.iter().map(|s| s.risk_status.as_str()),
  );

  Ok(SitePage {
    meta:     PageMeta::new(View::Site, snapshot),
    matched:  filtered.rows.len(),
    site_ids: filtered.ids(|s| s.site_id.as_str()),
    selected: detail(site),
    chart:    Chart::Pie(chart),
    filters:  filtered.controls,
  })
}

fn detail(site: &SiteRecord) -> SiteDetail {
  let or_missing = |v: &Option<String>| v.clone().unwrap_or_else(|| MISSING.to_owned());
  SiteDetail {
    site_id:             site.site_id.clone(),
    country:             site.country.clone(),
    region:              site.region.clone(),
    metrics:             vec![
      Metric::count("Subject Count", site.subject_count),
      Metric::percent("Avg DQI", site.avg_dqi),
      Metric::count("Open Queries", site.total_open_queries),
    ],
    risk_level:          site.risk_status.clone(),
    critical_site:       site.critical_site.clone(),
    risk_signals:        or_missing(&site.risk_signals),
    ai_summary:          String::new(),
    recommended_actions: or_missing(&site.recommended_actions),
  }
}

// ─── Summary ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct SummaryResponse {
  pub site_id: String,
  pub summary: String,
}

/// `GET /sites/{id}/summary`
///
/// Does not consult the datasets: any id may be looked up, including one
/// that no longer appears in the site report.
pub async fn summary<S: DatasetSource>(
  State(state): State<ApiState<S>>,
  Path(id): Path<String>,
) -> Result<Json<SummaryResponse>, ApiError> {
  let summary = summary_text(Arc::clone(&state.report_path), id.clone()).await?;
  Ok(Json(SummaryResponse { site_id: id, summary }))
}

/// Run the report lookup off the async runtime; it reads the whole file.
async fn summary_text(report: Arc<PathBuf>, site_id: String) -> Result<String, ApiError> {
  tokio::task::spawn_blocking(move || trialwatch_report::extract_summary(&site_id, &*report))
    .await
    .map_err(|e| ApiError::Source(Box::new(e)))
}
