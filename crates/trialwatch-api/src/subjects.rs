//! `GET /subjects`: patient performance.
//!
//! | Param | Default |
//! |-------|---------|
//! | `clean` | every clean status |
//! | `blocking` | none (filter disabled) |
//! | `region` | every region |
//! | `country` | every country |
//! | `subject_id` | first match |

use axum::{
  Json,
  extract::{Query, State},
};
use serde::{Deserialize, Serialize};
use trialwatch_core::{
  chart::{Bar, BarChart, Chart},
  dataset::Snapshot,
  filter::{FilterControl, Selection, SubjectFilter},
  record::SubjectRecord,
  source::DatasetSource,
  view::{MISSING, Metric, View},
};

use crate::{
  ApiState,
  error::ApiError,
  page::{PageMeta, requested, snapshot},
};

#[derive(Debug, Default, Deserialize)]
pub struct SubjectParams {
  pub clean:      Option<String>,
  pub blocking:   Option<String>,
  pub region:     Option<String>,
  pub country:    Option<String>,
  pub subject_id: Option<String>,
}

impl SubjectParams {
  fn filter(&self) -> SubjectFilter {
    SubjectFilter {
      clean:    Selection::from_query(self.clean.as_deref()),
      blocking: Selection::from_query(self.blocking.as_deref()),
      region:   Selection::from_query(self.region.as_deref()),
      country:  Selection::from_query(self.country.as_deref()),
    }
  }
}

#[derive(Debug, Clone, Serialize)]
pub struct SubjectPage {
  #[serde(flatten)]
  pub meta:        PageMeta,
  pub filters:     Vec<FilterControl>,
  pub matched:     usize,
  pub subject_ids: Vec<String>,
  pub selected:    SubjectDetail,
}

#[derive(Debug, Clone, Serialize)]
pub struct SubjectDetail {
  pub subject_id:      String,
  pub site_id:         String,
  pub country:         Option<String>,
  pub region:          Option<String>,
  pub metrics:         Vec<Metric>,
  pub clean_status:    String,
  pub blocking_reason: String,
  pub chart:           Chart,
}

/// `GET /subjects`
pub async fn page<S: DatasetSource>(
  State(state): State<ApiState<S>>,
  Query(params): Query<SubjectParams>,
) -> Result<Json<SubjectPage>, ApiError> {
  let snapshot = snapshot(&*state.source).await?;
  Ok(Json(build(&snapshot, &params)?))
}

pub fn build(snapshot: &Snapshot, params: &SubjectParams) -> Result<SubjectPage, ApiError> {
  let wanted = requested("subject_id", params.subject_id.as_deref())?;
  let filtered = params.filter().apply(&snapshot.datasets.subjects).non_empty("subjects")?;
  let subject = filtered.pick(wanted, "subject", |s| s.subject_id.as_str())?;

  Ok(SubjectPage {
    meta:        PageMeta::new(View::Subject, snapshot),
    matched:     filtered.rows.len(),
    subject_ids: filtered.ids(|s| s.subject_id.as_str()),
    selected:    detail(subject),
    filters:     filtered.controls,
  })
}

fn detail(subject: &SubjectRecord) -> SubjectDetail {
  SubjectDetail {
    subject_id:      subject.subject_id.clone(),
    site_id:         subject.site_id.clone(),
    country:         subject.country.clone(),
    region:          subject.region.clone(),
    metrics:         vec![
      Metric::percent("DQI Score", subject.dqi_score),
      Metric::percent("Missing Visits", subject.missing_visits_pct),
      Metric::percent("Missing Pages", subject.missing_pages_pct),
      Metric::percent("Open Queries", subject.open_queries_pct),
      Metric::percent("Verification Needed", subject.crf_verification_needed_pct),
      Metric::percent("Signature Needed", subject.crf_signature_needed_pct),
      Metric::count("Total Queries", subject.total_queries),
      Metric::count("Safety Queries", subject.safety_queries),
    ],
    clean_status:    subject.clean_status.clone(),
    blocking_reason: subject.blocking_reason.clone().unwrap_or_else(|| MISSING.to_owned()),
    chart:           issue_chart(subject),
  }
}

/// Blank counts are left out of the chart rather than drawn as zero.
fn issue_chart(subject: &SubjectRecord) -> Chart {
  let bars = [
    ("Total Queries", "Queries", subject.total_queries),
    ("Protocol Deviations", "Deviations", subject.protocol_deviations),
    ("Missing Pages", "Missing", subject.missing_pages),
  ]
  .into_iter()
  .filter_map(|(category, group, value)| {
    value.map(|v| Bar {
      category: category.to_owned(),
      value:    f64::from(v),
      group:    group.to_owned(),
    })
  })
  .collect();

  Chart::Bar(BarChart {
    title: "Subject Issue Distribution".to_owned(),
    x_label: "Metric".to_owned(),
    y_label: "Count".to_owned(),
    grouped: false,
    bars,
  })
}
