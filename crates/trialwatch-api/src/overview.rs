//! `GET /overview`: study-wide totals.
//!
//! The overview has no filters; it always covers the whole snapshot.

use axum::{Json, extract::State};
use chrono::{DateTime, Utc};
use serde::Serialize;
use trialwatch_core::{
  chart::{Chart, Heatmap, PieChart},
  dataset::Snapshot,
  source::DatasetSource,
  view::{MISSING, Metric, View, format_percent},
};

use crate::{
  ApiState,
  error::ApiError,
  page::{PageMeta, snapshot},
};

#[derive(Debug, Clone, Serialize)]
pub struct OverviewPage {
  #[serde(flatten)]
  pub meta:      PageMeta,
  pub loaded_at: DateTime<Utc>,
  pub metrics:   Vec<Metric>,
  pub charts:    Vec<Chart>,
}

/// `GET /overview`
pub async fn page<S: DatasetSource>(
  State(state): State<ApiState<S>>,
) -> Result<Json<OverviewPage>, ApiError> {
  let snapshot = snapshot(&*state.source).await?;
  Ok(Json(build(&snapshot)))
}

pub fn build(snapshot: &Snapshot) -> OverviewPage {
  let data = &snapshot.datasets;

  let total = data.subjects.len();
  let clean = data.subjects.iter().filter(|s| is_clean(&s.clean_status)).count();
  let clean_share = (total > 0).then(|| clean as f64 * 100.0 / total as f64);
  let critical = data.sites.iter().filter(|s| is_flagged(&s.critical_site)).count();

  let dqi: Vec<f64> = data.sites.iter().filter_map(|s| s.avg_dqi).collect();
  let mean_dqi = (!dqi.is_empty()).then(|| dqi.iter().sum::<f64>() / dqi.len() as f64);

  let metrics = vec![
    Metric::new("Subjects", total.to_string()),
    Metric::new("Clean Subjects", format!("{clean} ({})", format_percent(clean_share))),
    Metric::new("Sites", data.sites.len().to_string()),
    Metric::new("Critical Sites", critical.to_string()),
    Metric::new("Countries", data.countries.len().to_string()),
    Metric::new("Regions", data.regions.len().to_string()),
    Metric::percent("Mean Site DQI", mean_dqi),
  ];

  let heatmap = Heatmap::tally(
    "Sites by Region and Risk Status",
    data
      .sites
      .iter()
      .filter(|s| !s.region.is_empty())
      .map(|s| (s.region.as_str(), label(&s.risk_status))),
  );
  let clean_pie = PieChart::tally(
    "Subject Clean Status",
    data.subjects.iter().map(|s| label(&s.clean_status)),
  );

  OverviewPage {
    meta: PageMeta::new(View::Overview, snapshot),
    loaded_at: snapshot.loaded_at,
    metrics,
    charts: vec![Chart::Heatmap(heatmap), Chart::Pie(clean_pie)],
  }
}

/// `Patient_Clean_Status` counts as clean only when it reads "Clean".
fn is_clean(status: &str) -> bool { status.trim().eq_ignore_ascii_case("clean") }

/// `Critical_Site` is a free-text yes/no column.
fn is_flagged(value: &str) -> bool {
  matches!(value.trim().to_ascii_lowercase().as_str(), "yes" | "y" | "true" | "1")
}

fn label(value: &str) -> &str { if value.is_empty() { MISSING } else { value } }

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn clean_and_critical_flags() {
    assert!(is_clean("Clean"));
    assert!(is_clean(" clean "));
    assert!(!is_clean("Not Clean"));
    assert!(is_flagged("Yes"));
    assert!(is_flagged("TRUE"));
    assert!(!is_flagged("No"));
    assert!(!is_flagged(""));
  }
}
