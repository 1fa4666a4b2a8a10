//! `GET /regions[?trend=...]`: the executive region summary.

use axum::{
  Json,
  extract::{Query, State},
};
use serde::Serialize;
use trialwatch_core::{
  chart::{Bar, BarChart, Chart},
  dataset::Snapshot,
  filter::FilterControl,
  record::RegionRecord,
  source::DatasetSource,
  view::{Metric, View},
};

use crate::{
  ApiState,
  countries::TrendParams,
  error::ApiError,
  page::{PageMeta, snapshot},
};

#[derive(Debug, Clone, Serialize)]
pub struct RegionPage {
  #[serde(flatten)]
  pub meta:    PageMeta,
  pub filters: Vec<FilterControl>,
  pub panels:  Vec<RegionPanel>,
  pub chart:   Chart,
}

/// One collapsible panel per region.
#[derive(Debug, Clone, Serialize)]
pub struct RegionPanel {
  pub heading: String,
  pub metrics: Vec<Metric>,
}

/// `GET /regions`
pub async fn page<S: DatasetSource>(
  State(state): State<ApiState<S>>,
  Query(params): Query<TrendParams>,
) -> Result<Json<RegionPage>, ApiError> {
  let snapshot = snapshot(&*state.source).await?;
  Ok(Json(build(&snapshot, &params)?))
}

pub fn build(snapshot: &Snapshot, params: &TrendParams) -> Result<RegionPage, ApiError> {
  let filtered = params.filter().regions(&snapshot.datasets.regions).non_empty("regions")?;

  let panels = filtered.rows.iter().map(|r| panel(r)).collect();
  let bars = filtered
    .rows
    .iter()
    .filter_map(|r| {
      r.total_sites.map(|total| Bar {
        category: r.region.clone(),
        value:    f64::from(total),
        group:    r.trend.clone(),
      })
    })
    .collect();

  Ok(RegionPage {
    meta:    PageMeta::new(View::Region, snapshot),
    panels,
    chart:   Chart::Bar(BarChart {
      title: "Site Volume by Region".to_owned(),
      x_label: "Region".to_owned(),
      y_label: "Total Sites".to_owned(),
      grouped: true,
      bars,
    }),
    filters: filtered.controls,
  })
}

fn panel(region: &RegionRecord) -> RegionPanel {
  RegionPanel {
    heading: format!("REGION: {} ({})", region.region, region.trend),
    metrics: vec![
      Metric::count("Total Sites", region.total_sites),
      Metric::percent("Avg DQI", region.avg_dqi),
      Metric::percent("Ready Sites (%)", region.pct_sites_ready),
      Metric::count("Red Sites Count", region.red_site_count),
    ],
  }
}
