//! Multiselect filters for each dashboard view.
//!
//! Every filter dimension offers the distinct values of one column, in
//! first-seen order, and admits a row when the row's value is among the
//! selected ones. A null value is never admitted. Dimensions are ANDed.
//!
//! A [`Selection`] left at its default resolves per dimension: most select
//! every option, the subject view's blocking-reason filter selects none
//! (and an empty blocking selection disables that filter entirely).

use serde::Serialize;

use crate::{
  Error, Result,
  record::{CountryRecord, RegionRecord, SiteRecord, SubjectRecord},
};

// ─── Selection ───────────────────────────────────────────────────────────────

/// What the user picked for one filter dimension.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Selection {
  /// Nothing was submitted; use the dimension's default.
  #[default]
  Default,
  /// An explicit pick, which may be empty.
  Only(Vec<String>),
}

impl Selection {
  /// Decode a comma-separated query value.
  ///
  /// A missing parameter is [`Selection::Default`]; a present but empty
  /// parameter is an empty explicit selection.
  pub fn from_query(raw: Option<&str>) -> Self {
    match raw {
      None => Self::Default,
      Some(raw) => Self::Only(
        raw
          .split(',')
          .map(str::trim)
          .filter(|v| !v.is_empty())
          .map(str::to_owned)
          .collect(),
      ),
    }
  }

  fn resolve(&self, options: &[String], fallback: Fallback) -> Vec<String> {
    match (self, fallback) {
      (Self::Only(picked), _) => picked.clone(),
      (Self::Default, Fallback::AllOptions) => options.to_vec(),
      (Self::Default, Fallback::Nothing) => Vec::new(),
    }
  }
}

#[derive(Clone, Copy)]
enum Fallback {
  AllOptions,
  Nothing,
}

/// Distinct non-null values in first-seen order.
pub fn distinct<'a, I>(values: I) -> Vec<String>
where
  I: IntoIterator<Item = Option<&'a str>>,
{
  let mut seen: Vec<String> = Vec::new();
  for value in values.into_iter().flatten() {
    if !seen.iter().any(|s| s == value) {
      seen.push(value.to_owned());
    }
  }
  seen
}

// ─── Controls ────────────────────────────────────────────────────────────────

/// A resolved filter dimension, as shown in the sidebar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterControl {
  /// Query parameter name.
  pub key:      &'static str,
  pub label:    &'static str,
  pub options:  Vec<String>,
  pub selected: Vec<String>,
}

impl FilterControl {
  fn new(
    key: &'static str,
    label: &'static str,
    options: Vec<String>,
    selection: &Selection,
    fallback: Fallback,
  ) -> Self {
    let selected = selection.resolve(&options, fallback);
    Self { key, label, options, selected }
  }

  fn admits(&self, value: Option<&str>) -> bool {
    value.is_some_and(|v| self.selected.iter().any(|s| s == v))
  }
}

/// The rows that survived a filter, plus the controls that produced them.
#[derive(Debug)]
pub struct Filtered<'a, T> {
  pub controls: Vec<FilterControl>,
  pub rows:     Vec<&'a T>,
}

impl<'a, T> Filtered<'a, T> {
  /// Halt with [`Error::EmptySelection`] if nothing survived.
  pub fn non_empty(self, kind: &'static str) -> Result<Self> {
    if self.rows.is_empty() {
      Err(Error::EmptySelection(kind))
    } else {
      Ok(self)
    }
  }

  /// Distinct identifiers of the surviving rows, in row order.
  pub fn ids(&self, id: impl Fn(&T) -> &str) -> Vec<String> {
    distinct(self.rows.iter().map(|row| Some(id(row))))
  }

  /// The row to show in detail: `requested` if given, otherwise the first.
  pub fn pick(
    &self,
    requested: Option<&str>,
    kind: &'static str,
    id: impl Fn(&T) -> &str,
  ) -> Result<&'a T> {
    match requested {
      None => self.rows.first().copied().ok_or(Error::EmptySelection(kind)),
      Some(wanted) => self
        .rows
        .iter()
        .copied()
        .find(|row| id(row) == wanted)
        .ok_or_else(|| Error::NotInSelection { kind, id: wanted.to_owned() }),
    }
  }
}

// ─── Subject view ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct SubjectFilter {
  pub clean:    Selection,
  pub blocking: Selection,
  pub region:   Selection,
  pub country:  Selection,
}

impl SubjectFilter {
  pub fn apply<'a>(&self, subjects: &'a [SubjectRecord]) -> Filtered<'a, SubjectRecord> {
    let clean = FilterControl::new(
      "clean",
      "Clean Status",
      distinct(subjects.iter().map(|s| Some(s.clean_status.as_str()))),
      &self.clean,
      Fallback::AllOptions,
    );
    let blocking = FilterControl::new(
      "blocking",
      "Blocking Reason",
      distinct(subjects.iter().map(|s| s.blocking_reason.as_deref())),
      &self.blocking,
      Fallback::Nothing,
    );
    let region = FilterControl::new(
      "region",
      "Region",
      distinct(subjects.iter().map(|s| s.region.as_deref())),
      &self.region,
      Fallback::AllOptions,
    );
    let country = FilterControl::new(
      "country",
      "Country",
      distinct(subjects.iter().map(|s| s.country.as_deref())),
      &self.country,
      Fallback::AllOptions,
    );

    let rows = subjects
      .iter()
      .filter(|s| {
        clean.admits(Some(s.clean_status.as_str()))
          && region.admits(s.region.as_deref())
          && country.admits(s.country.as_deref())
          && (blocking.selected.is_empty()
            || blocking.admits(s.blocking_reason.as_deref()))
      })
      .collect();

    Filtered { controls: vec![clean, blocking, region, country], rows }
  }
}

// ─── Site view ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct SiteFilter {
  pub risk:      Selection,
  pub country:   Selection,
  pub region:    Selection,
  pub readiness: Selection,
}

impl SiteFilter {
  pub fn apply<'a>(&self, sites: &'a [SiteRecord]) -> Filtered<'a, SiteRecord> {
    let risk = site_control(sites, "risk", "Risk Status", |s| s.risk_status.as_str(), &self.risk);
    let country = site_control(sites, "country", "Country", |s| s.country.as_str(), &self.country);
    let region = site_control(sites, "region", "Region", |s| s.region.as_str(), &self.region);
    let readiness = site_control(
      sites,
      "readiness",
      "Ready Status",
      |s| s.analysis_readiness.as_str(),
      &self.readiness,
    );

    let rows = sites
      .iter()
      .filter(|s| {
        risk.admits(Some(s.risk_status.as_str()))
          && country.admits(Some(s.country.as_str()))
          && region.admits(Some(s.region.as_str()))
          && readiness.admits(Some(s.analysis_readiness.as_str()))
      })
      .collect();

    Filtered { controls: vec![risk, country, region, readiness], rows }
  }
}

fn site_control(
  sites: &[SiteRecord],
  key: &'static str,
  label: &'static str,
  value: fn(&SiteRecord) -> &str,
  selection: &Selection,
) -> FilterControl {
  FilterControl::new(
    key,
    label,
    distinct(sites.iter().map(|s| Some(value(s)))),
    selection,
    Fallback::AllOptions,
  )
}

// ─── Country / region views ──────────────────────────────────────────────────

/// The single `Trend` filter shared by the country and region views.
#[derive(Debug, Clone, Default)]
pub struct TrendFilter {
  pub trend: Selection,
}

impl TrendFilter {
  fn apply_by<'a, T>(&self, rows: &'a [T], trend: fn(&T) -> &str) -> Filtered<'a, T> {
    let control = FilterControl::new(
      "trend",
      "Trend",
      distinct(rows.iter().map(|r| Some(trend(r)))),
      &self.trend,
      Fallback::AllOptions,
    );
    let rows = rows.iter().filter(|r| control.admits(Some(trend(r)))).collect();
    Filtered { controls: vec![control], rows }
  }

  pub fn countries<'a>(&self, rows: &'a [CountryRecord]) -> Filtered<'a, CountryRecord> {
    self.apply_by(rows, |r| r.trend.as_str())
  }

  pub fn regions<'a>(&self, rows: &'a [RegionRecord]) -> Filtered<'a, RegionRecord> {
    self.apply_by(rows, |r| r.trend.as_str())
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  fn subject(
    id: &str,
    clean: &str,
    blocking: Option<&str>,
    region: Option<&str>,
    country: Option<&str>,
  ) -> SubjectRecord {
    SubjectRecord {
      subject_id:                  id.into(),
      site_id:                     id.replace("Subject", "Site"),
      clean_status:                clean.into(),
      blocking_reason:             blocking.map(Into::into),
      dqi_score:                   None,
      missing_visits_pct:          None,
      missing_pages_pct:           None,
      open_queries_pct:            None,
      crf_verification_needed_pct: None,
      crf_signature_needed_pct:    None,
      total_queries:               None,
      safety_queries:              None,
      protocol_deviations:         None,
      missing_pages:               None,
      country:                     country.map(Into::into),
      region:                      region.map(Into::into),
    }
  }

  fn cohort() -> Vec<SubjectRecord> {
    vec![
      subject("Subject 1", "Clean", None, Some("EMEA"), Some("Germany")),
      subject("Subject 2", "Not Clean", Some("Open Queries"), Some("APAC"), Some("Japan")),
      subject("Subject 3", "Not Clean", Some("Missing Pages"), Some("EMEA"), Some("France")),
      subject("Subject 4", "Clean", None, None, None),
    ]
  }

  fn ids<T>(filtered: &Filtered<'_, T>, id: impl Fn(&T) -> &str) -> Vec<String> {
    filtered.ids(id)
  }

  #[test]
  fn query_decoding_distinguishes_missing_from_empty() {
    assert_eq!(Selection::from_query(None), Selection::Default);
    assert_eq!(Selection::from_query(Some("")), Selection::Only(vec![]));
    assert_eq!(
      Selection::from_query(Some("EMEA, APAC,,")),
      Selection::Only(vec!["EMEA".into(), "APAC".into()])
    );
  }

  #[test]
  fn distinct_keeps_first_seen_order_and_drops_nulls() {
    let values = [Some("b"), None, Some("a"), Some("b"), Some("c")];
    assert_eq!(distinct(values), vec!["b", "a", "c"]);
  }

  #[test]
  fn default_subject_filter_hides_subjects_without_location() {
    let data = cohort();
    let filtered = SubjectFilter::default().apply(&data);
    assert_eq!(
      ids(&filtered, |s| s.subject_id.as_str()),
      vec!["Subject 1", "Subject 2", "Subject 3"]
    );
    let region = &filtered.controls[2];
    assert_eq!(region.options, vec!["EMEA", "APAC"]);
    assert_eq!(region.selected, region.options);
  }

  #[test]
  fn blocking_filter_defaults_to_disabled() {
    let data = cohort();
    let filtered = SubjectFilter::default().apply(&data);
    let blocking = &filtered.controls[1];
    assert_eq!(blocking.options, vec!["Open Queries", "Missing Pages"]);
    assert!(blocking.selected.is_empty());
    assert_eq!(filtered.rows.len(), 3);
  }

  #[test]
  fn blocking_filter_restricts_when_set() {
    let data = cohort();
    let filter = SubjectFilter {
      blocking: Selection::from_query(Some("Missing Pages")),
      ..Default::default()
    };
    let filtered = filter.apply(&data);
    assert_eq!(ids(&filtered, |s| s.subject_id.as_str()), vec!["Subject 3"]);
  }

  #[test]
  fn dimensions_are_anded() {
    let data = cohort();
    let filter = SubjectFilter {
      clean: Selection::from_query(Some("Not Clean")),
      region: Selection::from_query(Some("EMEA")),
      ..Default::default()
    };
    let filtered = filter.apply(&data);
    assert_eq!(ids(&filtered, |s| s.subject_id.as_str()), vec!["Subject 3"]);
  }

  #[test]
  fn empty_required_selection_halts_instead_of_indexing() {
    let data = cohort();
    let filter = SubjectFilter {
      clean: Selection::from_query(Some("")),
      ..Default::default()
    };
    let filtered = filter.apply(&data);
    assert!(filtered.rows.is_empty());
    assert!(matches!(
      filtered.pick(None, "subjects", |s| s.subject_id.as_str()),
      Err(Error::EmptySelection("subjects"))
    ));
    assert!(matches!(
      filtered.non_empty("subjects"),
      Err(Error::EmptySelection("subjects"))
    ));
  }

  #[test]
  fn pick_prefers_requested_row() {
    let data = cohort();
    let filtered = SubjectFilter::default().apply(&data);
    let picked = filtered.pick(Some("Subject 2"), "subjects", |s| s.subject_id.as_str()).unwrap();
    assert_eq!(picked.subject_id, "Subject 2");
    let first = filtered.pick(None, "subjects", |s| s.subject_id.as_str()).unwrap();
    assert_eq!(first.subject_id, "Subject 1");
  }

  #[test]
  fn pick_rejects_row_outside_selection() {
    let data = cohort();
    let filtered = SubjectFilter::default().apply(&data);
    let err = filtered.pick(Some("Subject 4"), "subjects", |s| s.subject_id.as_str()).unwrap_err();
    assert!(matches!(err, Error::NotInSelection { id, .. } if id == "Subject 4"));
  }

  #[test]
  fn trend_filter_applies_to_regions() {
    let regions = vec![
      RegionRecord {
        region:          "EMEA".into(),
        total_sites:     Some(4),
        avg_dqi:         Some(91.0),
        pct_sites_ready: Some(75.0),
        red_site_count:  Some(1),
        trend:           "Improving".into(),
      },
      RegionRecord {
        region:          "APAC".into(),
        total_sites:     Some(2),
        avg_dqi:         Some(80.0),
        pct_sites_ready: Some(50.0),
        red_site_count:  Some(0),
        trend:           "Declining".into(),
      },
    ];
    let filter = TrendFilter { trend: Selection::from_query(Some("Declining")) };
    let filtered = filter.regions(&regions);
    assert_eq!(ids(&filtered, |r| r.region.as_str()), vec!["APAC"]);
    assert_eq!(filtered.controls[0].options, vec!["Improving", "Declining"]);
  }
}
