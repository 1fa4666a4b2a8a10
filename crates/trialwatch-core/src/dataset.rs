//! The four joined datasets and the snapshot that carries them.
//!
//! Subjects do not name their site directly. The site key is derived from
//! the subject identifier (`"Subject 12"` → `"Site 12"`) and the site
//! report's `country` / `region` columns are left-joined on it.

use std::collections::{HashMap, hash_map::Entry};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::warn;

use crate::record::{CountryRecord, RegionRecord, SiteRecord, SubjectRecord};

// ─── Datasets ────────────────────────────────────────────────────────────────

/// Everything the dashboard renders from, in source-file row order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Datasets {
  pub subjects:  Vec<SubjectRecord>,
  pub sites:     Vec<SiteRecord>,
  pub countries: Vec<CountryRecord>,
  pub regions:   Vec<RegionRecord>,
}

impl Datasets {
  /// Bundle freshly decoded rows, joining site locations onto subjects.
  pub fn assemble(
    mut subjects: Vec<SubjectRecord>,
    sites: Vec<SiteRecord>,
    countries: Vec<CountryRecord>,
    regions: Vec<RegionRecord>,
  ) -> Self {
    join_site_locations(&mut subjects, &sites);
    Self { subjects, sites, countries, regions }
  }
}

/// One load of the datasets, shared read-only between requests.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
  #[serde(skip)]
  pub datasets:  Datasets,
  /// Hex digest over the source files; changes whenever any file does.
  pub version:   String,
  pub loaded_at: DateTime<Utc>,
}

// ─── Join ────────────────────────────────────────────────────────────────────

/// Derive a subject's site key by replacing every `Subject` with `Site`.
pub fn derive_site_id(subject_id: &str) -> String {
  subject_id.replace("Subject", "Site")
}

/// Location columns looked up for a site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteLocation<'a> {
  pub country: Option<&'a str>,
  pub region:  Option<&'a str>,
}

fn non_blank(s: &str) -> Option<&str> { (!s.is_empty()).then_some(s) }

/// Build the `site_id → location` lookup, de-duplicated by identifier.
///
/// The first row for a site wins. A later row that disagrees is logged and
/// ignored so the join can never multiply subject rows.
pub fn site_locations(sites: &[SiteRecord]) -> HashMap<&str, SiteLocation<'_>> {
  let mut lookup = HashMap::with_capacity(sites.len());
  for site in sites {
    let location = SiteLocation {
      country: non_blank(&site.country),
      region:  non_blank(&site.region),
    };
    match lookup.entry(site.site_id.as_str()) {
      Entry::Vacant(slot) => {
        slot.insert(location);
      }
      Entry::Occupied(existing) if *existing.get() != location => {
        warn!(
          site_id = %site.site_id,
          "duplicate site row with a different location; keeping the first"
        );
      }
      Entry::Occupied(_) => {}
    }
  }
  lookup
}

/// Left-join site locations onto `subjects` by their derived site key.
///
/// Subjects without a matching site keep `None` for both columns.
pub fn join_site_locations(subjects: &mut [SubjectRecord], sites: &[SiteRecord]) {
  let lookup = site_locations(sites);
  let mut unmatched = 0usize;
  for subject in subjects.iter_mut() {
    subject.site_id = derive_site_id(&subject.subject_id);
    match lookup.get(subject.site_id.as_str()) {
      Some(location) => {
        subject.country = location.country.map(str::to_owned);
        subject.region = location.region.map(str::to_owned);
      }
      None => {
        subject.country = None;
        subject.region = None;
        unmatched += 1;
      }
    }
  }
  if unmatched > 0 {
    warn!(unmatched, "subjects without a matching site row");
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  fn subject(id: &str) -> SubjectRecord {
    SubjectRecord {
      subject_id:                  id.into(),
      site_id:                     String::new(),
      clean_status:                "Clean".into(),
      blocking_reason:             None,
      dqi_score:                   Some(90.0),
      missing_visits_pct:          None,
      missing_pages_pct:           None,
      open_queries_pct:            None,
      crf_verification_needed_pct: None,
      crf_signature_needed_pct:    None,
      total_queries:               Some(1),
      safety_queries:              Some(0),
      protocol_deviations:         Some(0),
      missing_pages:               Some(0),
      country:                     None,
      region:                      None,
    }
  }

  fn site(id: &str, country: &str, region: &str) -> SiteRecord {
    SiteRecord {
      site_id:             id.into(),
      country:             country.into(),
      region:              region.into(),
      risk_status:         "Green".into(),
      analysis_readiness:  "Ready".into(),
      subject_count:       Some(1),
      avg_dqi:             Some(88.0),
      total_open_queries:  Some(0),
      critical_site:       "No".into(),
      risk_signals:        None,
      recommended_actions: None,
    }
  }

  #[test]
  fn derive_replaces_every_occurrence() {
    assert_eq!(derive_site_id("Subject 7"), "Site 7");
    assert_eq!(derive_site_id("Subject-Subject"), "Site-Site");
    assert_eq!(derive_site_id("S-7"), "S-7");
  }

  #[test]
  fn join_attaches_location_of_matching_site() {
    let sites = vec![
      site("Site 1", "Germany", "EMEA"),
      site("Site 2", "Japan", "APAC"),
    ];
    let data = Datasets::assemble(
      vec![subject("Subject 2"), subject("Subject 1"), subject("Subject 2")],
      sites,
      vec![],
      vec![],
    );

    let located: Vec<_> = data
      .subjects
      .iter()
      .map(|s| (s.site_id.as_str(), s.country.as_deref(), s.region.as_deref()))
      .collect();
    assert_eq!(located, vec![
      ("Site 2", Some("Japan"), Some("APAC")),
      ("Site 1", Some("Germany"), Some("EMEA")),
      ("Site 2", Some("Japan"), Some("APAC")),
    ]);
  }

  #[test]
  fn unmatched_subject_keeps_null_location() {
    let mut subjects = vec![subject("Subject 99")];
    join_site_locations(&mut subjects, &[site("Site 1", "Germany", "EMEA")]);
    assert_eq!(subjects[0].site_id, "Site 99");
    assert!(subjects[0].country.is_none());
    assert!(subjects[0].region.is_none());
  }

  #[test]
  fn duplicate_site_rows_do_not_multiply_subjects() {
    let sites = vec![
      site("Site 1", "Germany", "EMEA"),
      site("Site 1", "France", "EMEA"),
    ];
    let data = Datasets::assemble(vec![subject("Subject 1")], sites, vec![], vec![]);
    assert_eq!(data.subjects.len(), 1);
    assert_eq!(data.subjects[0].country.as_deref(), Some("Germany"));
  }

  #[test]
  fn blank_site_location_joins_as_null() {
    let mut subjects = vec![subject("Subject 3")];
    join_site_locations(&mut subjects, &[site("Site 3", "", "LATAM")]);
    assert!(subjects[0].country.is_none());
    assert_eq!(subjects[0].region.as_deref(), Some("LATAM"));
  }
}
