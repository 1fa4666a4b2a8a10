//! `GET /countries[?trend=...]`: country-level aggregates.

use axum::{
  Json,
  extract::{Query, State},
};
use serde::{Deserialize, Serialize};
use trialwatch_core::{
  chart::{Chart, Point, ScatterChart},
  dataset::Snapshot,
  filter::{FilterControl, Selection, TrendFilter},
  record::CountryRecord,
  source::DatasetSource,
  view::View,
};

use crate::{
  ApiState,
  error::ApiError,
  page::{PageMeta, snapshot},
};

#[derive(Debug, Default, Deserialize)]
pub struct TrendParams {
  pub trend: Option<String>,
}

impl TrendParams {
  pub(crate) fn filter(&self) -> TrendFilter {
    TrendFilter { trend: Selection::from_query(self.trend.as_deref()) }
  }
}

#[derive(Debug, Clone, Serialize)]
pub struct CountryPage {
  #[serde(flatten)]
  pub meta:    PageMeta,
  pub filters: Vec<FilterControl>,
  /// The six report columns, one row per matching country.
  pub rows:    Vec<CountryRecord>,
  pub chart:   Chart,
}

/// `GET /countries`
pub async fn page<S: DatasetSource>(
  State(state): State<ApiState<S>>,
  Query(params): Query<TrendParams>,
) -> Result<Json<CountryPage>, ApiError> {
  let snapshot = snapshot(&*state.source).await?;
  Ok(Json(build(&snapshot, &params)?))
}

pub fn build(snapshot: &Snapshot, params: &TrendParams) -> Result<CountryPage, ApiError> {
  let filtered = params.filter().countries(&snapshot.datasets.countries).non_empty("countries")?;

  // A country without both coordinates cannot be placed.
  let points = filtered
    .rows
    .iter()
    .filter_map(|c| {
      Some(Point {
        label: c.country.clone(),
        x:     c.avg_dqi?,
        y:     c.pct_sites_ready?,
        size:  c.total_sites.map_or(0.0, f64::from),
        group: c.trend.clone(),
      })
    })
    .collect();

  Ok(CountryPage {
    meta:    PageMeta::new(View::Country, snapshot),
    rows:    filtered.rows.iter().map(|c| (*c).clone()).collect(),
    chart:   Chart::Scatter(ScatterChart {
      title: "Data Quality vs Site Readiness".to_owned(),
      x_label: "Avg DQI".to_owned(),
      y_label: "Sites Ready (%)".to_owned(),
      points,
    }),
    filters: filtered.controls,
  })
}
