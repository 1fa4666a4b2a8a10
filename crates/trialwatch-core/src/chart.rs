//! Chart specifications.
//!
//! Charts are data, not drawings: each variant carries the series a client
//! needs to render it. Drawing is the client's concern.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Chart {
  Bar(BarChart),
  Pie(PieChart),
  Scatter(ScatterChart),
  Heatmap(Heatmap),
}

// ─── Bar ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarChart {
  pub title:   String,
  pub x_label: String,
  pub y_label: String,
  /// `true` when bars sharing a category are drawn side by side.
  pub grouped: bool,
  pub bars:    Vec<Bar>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bar {
  pub category: String,
  pub value:    f64,
  /// Colour key.
  pub group:    String,
}

// ─── Pie ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PieChart {
  pub title:  String,
  pub slices: Vec<Slice>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Slice {
  pub label: String,
  pub count: usize,
}

impl PieChart {
  /// Count occurrences of each label, keeping first-seen order.
  pub fn tally<'a>(
    title: impl Into<String>,
    labels: impl IntoIterator<Item = &'a str>,
  ) -> Self {
    let mut slices: Vec<Slice> = Vec::new();
    for label in labels {
      match slices.iter_mut().find(|s| s.label == label) {
        Some(slice) => slice.count += 1,
        None => slices.push(Slice { label: label.to_owned(), count: 1 }),
      }
    }
    Self { title: title.into(), slices }
  }
}

// ─── Scatter ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterChart {
  pub title:   String,
  pub x_label: String,
  pub y_label: String,
  pub points:  Vec<Point>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Point {
  /// Hover label.
  pub label: String,
  pub x:     f64,
  pub y:     f64,
  /// Marker size.
  pub size:  f64,
  /// Colour key.
  pub group: String,
}

// ─── Heatmap ─────────────────────────────────────────────────────────────────

/// A row × column count matrix; `cells[r][c]` counts pairs
/// `(rows[r], columns[c])`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Heatmap {
  pub title:   String,
  pub rows:    Vec<String>,
  pub columns: Vec<String>,
  pub cells:   Vec<Vec<usize>>,
}

impl Heatmap {
  pub fn tally<'a>(
    title: impl Into<String>,
    pairs: impl IntoIterator<Item = (&'a str, &'a str)>,
  ) -> Self {
    let pairs: Vec<(&str, &str)> = pairs.into_iter().collect();
    let rows = crate::filter::distinct(pairs.iter().map(|(r, _)| Some(*r)));
    let columns = crate::filter::distinct(pairs.iter().map(|(_, c)| Some(*c)));
    let mut cells = vec![vec![0; columns.len()]; rows.len()];
    for (r, c) in pairs {
      let ri = rows.iter().position(|x| x == r);
      let ci = columns.iter().position(|x| x == c);
      if let (Some(ri), Some(ci)) = (ri, ci) {
        cells[ri][ci] += 1;
      }
    }
    Self { title: title.into(), rows, columns, cells }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn pie_tally_counts_in_first_seen_order() {
    let pie = PieChart::tally("Risk", ["Red", "Green", "Red", "Amber", "Red"]);
    let counts: Vec<_> = pie.slices.iter().map(|s| (s.label.as_str(), s.count)).collect();
    assert_eq!(counts, vec![("Red", 3), ("Green", 1), ("Amber", 1)]);
  }

  #[test]
  fn heatmap_tally_fills_matrix() {
    let map = Heatmap::tally("Sites", [
      ("EMEA", "Red"),
      ("APAC", "Green"),
      ("EMEA", "Red"),
      ("EMEA", "Green"),
    ]);
    assert_eq!(map.rows, vec!["EMEA", "APAC"]);
    assert_eq!(map.columns, vec!["Red", "Green"]);
    assert_eq!(map.cells, vec![vec![2, 1], vec![0, 1]]);
  }

  #[test]
  fn chart_serialises_with_kind_tag() {
    let chart = Chart::Pie(PieChart::tally("t", ["a"]));
    let json = serde_json::to_value(&chart).unwrap();
    assert_eq!(json["kind"], "pie");
    assert_eq!(json["slices"][0]["count"], 1);
  }
}
