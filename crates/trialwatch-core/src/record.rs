//! Row types for the four pre-computed oversight reports.
//!
//! Records are plain data: they are decoded once per load and never mutated
//! afterwards, except for the site location columns that the loader joins
//! onto each subject.

use serde::{Deserialize, Serialize};

// ─── Subject level ───────────────────────────────────────────────────────────

/// One enrolled patient (`interim_unified_subject`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectRecord {
  pub subject_id:                  String,
  /// `subject_id` with `Subject` replaced by `Site`; the join key.
  pub site_id:                     String,
  pub clean_status:                String,
  pub blocking_reason:             Option<String>,
  pub dqi_score:                   Option<f64>,
  pub missing_visits_pct:          Option<f64>,
  pub missing_pages_pct:           Option<f64>,
  pub open_queries_pct:            Option<f64>,
  pub crf_verification_needed_pct: Option<f64>,
  pub crf_signature_needed_pct:    Option<f64>,
  pub total_queries:               Option<u32>,
  pub safety_queries:              Option<u32>,
  pub protocol_deviations:         Option<u32>,
  pub missing_pages:               Option<u32>,
  /// Joined from the site report; `None` when no site matched.
  pub country:                     Option<String>,
  pub region:                      Option<String>,
}

// ─── Site level ──────────────────────────────────────────────────────────────

/// One investigator site (`Site_Oversight_Final_Report`).
///
/// `risk_status` is kept verbatim. The site report and the aggregate
/// reports do not agree on a vocabulary ("Green/Amber/Red" versus
/// "Low/Medium/High Risk"), so no normalisation is applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteRecord {
  pub site_id:             String,
  pub country:             String,
  pub region:              String,
  pub risk_status:         String,
  pub analysis_readiness:  String,
  pub subject_count:       Option<u32>,
  pub avg_dqi:             Option<f64>,
  pub total_open_queries:  Option<u32>,
  pub critical_site:       String,
  pub risk_signals:        Option<String>,
  pub recommended_actions: Option<String>,
}

// ─── Aggregates ──────────────────────────────────────────────────────────────

/// Country roll-up (`interim_unified_country`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryRecord {
  pub country:         String,
  pub total_sites:     Option<u32>,
  pub avg_dqi:         Option<f64>,
  pub pct_sites_ready: Option<f64>,
  pub total_red_sites: Option<u32>,
  pub trend:           String,
}

/// Region roll-up (`interim_unified_region`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionRecord {
  pub region:          String,
  pub total_sites:     Option<u32>,
  pub avg_dqi:         Option<f64>,
  pub pct_sites_ready: Option<f64>,
  pub red_site_count:  Option<u32>,
  pub trend:           String,
}
