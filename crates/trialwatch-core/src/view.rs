//! Dashboard navigation and metric tiles.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoEnumIterator};

/// The five pages a user can navigate between.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  EnumIter,
  AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum View {
  Overview,
  Subject,
  Site,
  Country,
  Region,
}

impl View {
  pub fn title(self) -> &'static str {
    match self {
      Self::Overview => "Clinical Trial Oversight Dashboard",
      Self::Subject => "Patient Performance (Subject Level)",
      Self::Site => "Site Operational Oversight",
      Self::Country => "Geographic Insights: Country Level",
      Self::Region => "Executive Summary: Region Level",
    }
  }

  /// Path of the page relative to the API root.
  pub fn path(self) -> &'static str {
    match self {
      Self::Overview => "/overview",
      Self::Subject => "/subjects",
      Self::Site => "/sites",
      Self::Country => "/countries",
      Self::Region => "/regions",
    }
  }
}

/// One entry of the navigation control.
#[derive(Debug, Clone, Serialize)]
pub struct NavEntry {
  pub view:  View,
  pub title: &'static str,
  pub path:  &'static str,
}

/// Navigation entries for every view, in menu order.
pub fn navigation() -> Vec<NavEntry> {
  View::iter()
    .map(|view| NavEntry { view, title: view.title(), path: view.path() })
    .collect()
}

// ─── Metrics ─────────────────────────────────────────────────────────────────

/// A labelled value tile. Values are pre-formatted for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Metric {
  pub label: String,
  pub value: String,
}

impl Metric {
  pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
    Self { label: label.into(), value: value.into() }
  }

  /// A percentage to one decimal place, e.g. `87.5%`.
  pub fn percent(label: impl Into<String>, value: Option<f64>) -> Self {
    Self::new(label, format_percent(value))
  }

  pub fn count(label: impl Into<String>, value: Option<u32>) -> Self {
    Self::new(label, format_count(value))
  }
}

/// Placeholder for a blank spreadsheet cell.
pub const MISSING: &str = "n/a";

pub fn format_percent(value: Option<f64>) -> String {
  value.map_or_else(|| MISSING.to_owned(), |v| format!("{v:.1}%"))
}

pub fn format_count(value: Option<u32>) -> String {
  value.map_or_else(|| MISSING.to_owned(), |v| v.to_string())
}

#[cfg(test)]
mod tests {
  use std::str::FromStr as _;

  use super::*;

  #[test]
  fn views_round_trip_through_their_names() {
    for view in View::iter() {
      assert_eq!(View::from_str(view.as_ref()).unwrap(), view);
      assert_eq!(
        serde_json::to_value(view).unwrap(),
        serde_json::Value::String(view.to_string())
      );
    }
  }

  #[test]
  fn navigation_lists_five_views_overview_first() {
    let nav = navigation();
    assert_eq!(nav.len(), 5);
    assert_eq!(nav[0].view, View::Overview);
    assert_eq!(nav[2].path, "/sites");
  }

  #[test]
  fn percent_formatting() {
    assert_eq!(format_percent(Some(87.54)), "87.5%");
    assert_eq!(format_percent(Some(0.0)), "0.0%");
    assert_eq!(format_percent(None), "n/a");
    assert_eq!(Metric::count("Open Queries", Some(12)).value, "12");
  }
}
