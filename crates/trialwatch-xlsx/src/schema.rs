//! Column headers of the four upstream workbooks.
//!
//! Headers are matched exactly (after trimming). Columns not listed here are
//! ignored; every column listed must be present.

pub mod subject {
  pub const SUBJECT_ID: &str = "Subject_ID";
  pub const CLEAN_STATUS: &str = "Patient_Clean_Status";
  pub const BLOCKING_REASON: &str = "Blocking_Reason";
  pub const DQI_SCORE: &str = "DQI_Subject_Score";
  pub const MISSING_VISITS_PCT: &str = "missing_visits_pct";
  pub const MISSING_PAGES_PCT: &str = "missing_pages_pct";
  pub const OPEN_QUERIES_PCT: &str = "open_queries_pct";
  pub const VERIFICATION_NEEDED_PCT: &str = "crf_verification_needed_pct";
  pub const SIGNATURE_NEEDED_PCT: &str = "crf_signature_needed_pct";
  pub const TOTAL_QUERIES: &str = "Total_Queries";
  pub const SAFETY_QUERIES: &str = "Safety_Queries";
  pub const PROTOCOL_DEVIATIONS: &str = "Protocol_Deviations";
  pub const MISSING_PAGES: &str = "Missing_Pages";

  pub const ALL: &[&str] = &[
    SUBJECT_ID,
    CLEAN_STATUS,
    BLOCKING_REASON,
    DQI_SCORE,
    MISSING_VISITS_PCT,
    MISSING_PAGES_PCT,
    OPEN_QUERIES_PCT,
    VERIFICATION_NEEDED_PCT,
    SIGNATURE_NEEDED_PCT,
    TOTAL_QUERIES,
    SAFETY_QUERIES,
    PROTOCOL_DEVIATIONS,
    MISSING_PAGES,
  ];
}

pub mod site {
  pub const SITE_ID: &str = "Site_ID";
  pub const COUNTRY: &str = "country";
  pub const REGION: &str = "region";
  pub const RISK_STATUS: &str = "Site_Risk_Status";
  pub const ANALYSIS_READINESS: &str = "Analysis_Readiness";
  pub const SUBJECT_COUNT: &str = "Subject_Count";
  pub const AVG_DQI: &str = "Avg_DQI_Site";
  pub const TOTAL_OPEN_QUERIES: &str = "Total_Open_Queries";
  pub const CRITICAL_SITE: &str = "Critical_Site";
  pub const RISK_SIGNALS: &str = "Risk_Signals";
  pub const RECOMMENDED_ACTIONS: &str = "Recommended_Actions";

  pub const ALL: &[&str] = &[
    SITE_ID,
    COUNTRY,
    REGION,
    RISK_STATUS,
    ANALYSIS_READINESS,
    SUBJECT_COUNT,
    AVG_DQI,
    TOTAL_OPEN_QUERIES,
    CRITICAL_SITE,
    RISK_SIGNALS,
    RECOMMENDED_ACTIONS,
  ];
}

pub mod country {
  pub const COUNTRY: &str = "country";
  pub const TOTAL_SITES: &str = "Total_Sites";
  pub const AVG_DQI: &str = "Avg_DQI";
  pub const PCT_SITES_READY: &str = "Pct_Sites_Ready";
  pub const TOTAL_RED_SITES: &str = "Total_Red_Sites";
  pub const TREND: &str = "Trend";

  pub const ALL: &[&str] =
    &[COUNTRY, TOTAL_SITES, AVG_DQI, PCT_SITES_READY, TOTAL_RED_SITES, TREND];
}

/// Same shape as the country sheet, except the red-site column name.
pub mod region {
  pub const REGION: &str = "region";
  pub const TOTAL_SITES: &str = "Total_Sites";
  pub const AVG_DQI: &str = "Avg_DQI";
  pub const PCT_SITES_READY: &str = "Pct_Sites_Ready";
  pub const RED_SITE_COUNT: &str = "Red_Site_Count";
  pub const TREND: &str = "Trend";

  pub const ALL: &[&str] =
    &[REGION, TOTAL_SITES, AVG_DQI, PCT_SITES_READY, RED_SITE_COUNT, TREND];
}
