//! Decoding worksheet cells into record fields.
//!
//! Cells arrive as [`calamine::Data`]. Text columns accept any scalar cell;
//! numeric columns accept numbers and numeric-looking strings. A blank cell
//! is `None` for optional fields and the empty string for required text.

use std::{
  collections::HashMap,
  path::{Path, PathBuf},
};

use calamine::{Data, Range};
use trialwatch_core::record::{CountryRecord, RegionRecord, SiteRecord, SubjectRecord};

use crate::{
  Error, Result,
  schema::{country, region, site, subject},
};

// ─── Sheet ───────────────────────────────────────────────────────────────────

/// A worksheet split into a header map and its non-blank data rows.
pub(crate) struct Sheet {
  path:    PathBuf,
  columns: HashMap<String, usize>,
  /// `(spreadsheet row number, cells)`; row numbers are 1-based.
  rows:    Vec<(usize, Vec<Data>)>,
}

impl Sheet {
  pub(crate) fn from_range(path: &Path, range: &Range<Data>) -> Self {
    let first_row = range.start().map_or(0, |(row, _)| row as usize) + 1;
    let mut iter = range.rows().enumerate();

    let columns: HashMap<String, usize> = iter
      .next()
      .map(|(_, header)| {
        header
          .iter()
          .enumerate()
          .filter_map(|(i, cell)| text(cell).ok().flatten().map(|h| (h.trim().to_owned(), i)))
          .collect()
      })
      .unwrap_or_default();

    let rows: Vec<(usize, Vec<Data>)> = iter
      .filter(|(_, cells)| cells.iter().any(|c| !is_blank(c)))
      .map(|(i, cells)| (first_row + i, cells.to_vec()))
      .collect();

    Self { path: path.to_path_buf(), columns, rows }
  }

  /// Fail unless every column in `names` is present.
  pub(crate) fn require(&self, names: &[&'static str]) -> Result<()> {
    match names.iter().find(|n| !self.columns.contains_key(**n)) {
      Some(column) => Err(Error::MissingColumn { path: self.path.clone(), column: *column }),
      None => Ok(()),
    }
  }

  pub(crate) fn rows(&self) -> impl Iterator<Item = Row<'_>> {
    self.rows.iter().map(|(line, cells)| Row { sheet: self, line: *line, cells })
  }
}

// ─── Row ─────────────────────────────────────────────────────────────────────

static EMPTY: Data = Data::Empty;

pub(crate) struct Row<'a> {
  sheet: &'a Sheet,
  line:  usize,
  cells: &'a [Data],
}

impl Row<'_> {
  fn cell(&self, column: &str) -> &Data {
    self
      .sheet
      .columns
      .get(column)
      .and_then(|i| self.cells.get(*i))
      .unwrap_or(&EMPTY)
  }

  fn malformed(&self, column: &'static str, reason: String) -> Error {
    Error::Malformed {
      path: self.sheet.path.clone(),
      row: self.line,
      column,
      reason,
    }
  }

  /// Required text; a blank cell decodes to `""`.
  pub(crate) fn text(&self, column: &'static str) -> Result<String> {
    Ok(self.opt_text(column)?.unwrap_or_default())
  }

  pub(crate) fn opt_text(&self, column: &'static str) -> Result<Option<String>> {
    text(self.cell(column)).map_err(|reason| self.malformed(column, reason))
  }

  pub(crate) fn measure(&self, column: &'static str) -> Result<Option<f64>> {
    number(self.cell(column)).map_err(|reason| self.malformed(column, reason))
  }

  pub(crate) fn count(&self, column: &'static str) -> Result<Option<u32>> {
    self
      .measure(column)?
      .map(|v| whole(v).map_err(|reason| self.malformed(column, reason)))
      .transpose()
  }
}

// ─── Cell conversions ────────────────────────────────────────────────────────

fn is_blank(cell: &Data) -> bool {
  match cell {
    Data::Empty => true,
    Data::String(s) => s.trim().is_empty(),
    _ => false,
  }
}

fn text(cell: &Data) -> Result<Option<String>, String> {
  match cell {
    Data::Empty => Ok(None),
    Data::String(s) if s.is_empty() => Ok(None),
    Data::String(s) => Ok(Some(s.clone())),
    Data::Int(i) => Ok(Some(i.to_string())),
    // Integral floats print without a trailing `.0` (ids stored as numbers).
    Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => Ok(Some(format!("{}", *f as i64))),
    Data::Float(f) => Ok(Some(f.to_string())),
    Data::Bool(b) => Ok(Some(b.to_string())),
    Data::Error(e) => Err(format!("cell error {e:?}")),
    other => Ok(Some(other.to_string())),
  }
}

fn number(cell: &Data) -> Result<Option<f64>, String> {
  let value = match cell {
    Data::Empty => return Ok(None),
    Data::Float(f) => *f,
    Data::Int(i) => *i as f64,
    Data::String(s) if s.trim().is_empty() => return Ok(None),
    Data::String(s) => s
      .trim()
      .parse::<f64>()
      .map_err(|_| format!("expected a number, found {s:?}"))?,
    other => return Err(format!("expected a number, found {other:?}")),
  };
  Ok((!value.is_nan()).then_some(value))
}

fn whole(value: f64) -> Result<u32, String> {
  if value >= 0.0 && value.fract() == 0.0 && value <= f64::from(u32::MAX) {
    Ok(value as u32)
  } else {
    Err(format!("expected a non-negative whole number, found {value}"))
  }
}

// ─── Records ─────────────────────────────────────────────────────────────────

pub(crate) fn subjects(sheet: &Sheet) -> Result<Vec<SubjectRecord>> {
  sheet.require(subject::ALL)?;
  sheet
    .rows()
    .map(|row| {
      let subject_id = row.text(subject::SUBJECT_ID)?;
      Ok(SubjectRecord {
        site_id: trialwatch_core::dataset::derive_site_id(&subject_id),
        subject_id,
        clean_status: row.text(subject::CLEAN_STATUS)?,
        blocking_reason: row.opt_text(subject::BLOCKING_REASON)?,
        dqi_score: row.measure(subject::DQI_SCORE)?,
        missing_visits_pct: row.measure(subject::MISSING_VISITS_PCT)?,
        missing_pages_pct: row.measure(subject::MISSING_PAGES_PCT)?,
        open_queries_pct: row.measure(subject::OPEN_QUERIES_PCT)?,
        crf_verification_needed_pct: row.measure(subject::VERIFICATION_NEEDED_PCT)?,
        crf_signature_needed_pct: row.measure(subject::SIGNATURE_NEEDED_PCT)?,
        total_queries: row.count(subject::TOTAL_QUERIES)?,
        safety_queries: row.count(subject::SAFETY_QUERIES)?,
        protocol_deviations: row.count(subject::PROTOCOL_DEVIATIONS)?,
        missing_pages: row.count(subject::MISSING_PAGES)?,
        country: None,
        region: None,
      })
    })
    .collect()
}

pub(crate) fn sites(sheet: &Sheet) -> Result<Vec<SiteRecord>> {
  sheet.require(site::ALL)?;
  sheet
    .rows()
    .map(|row| {
      Ok(SiteRecord {
        site_id:             row.text(site::SITE_ID)?,
        country:             row.text(site::COUNTRY)?,
        region:              row.text(site::REGION)?,
        risk_status:         row.text(site::RISK_STATUS)?,
        analysis_readiness:  row.text(site::ANALYSIS_READINESS)?,
        subject_count:       row.count(site::SUBJECT_COUNT)?,
        avg_dqi:             row.measure(site::AVG_DQI)?,
        total_open_queries:  row.count(site::TOTAL_OPEN_QUERIES)?,
        critical_site:       row.text(site::CRITICAL_SITE)?,
        risk_signals:        row.opt_text(site::RISK_SIGNALS)?,
        recommended_actions: row.opt_text(site::RECOMMENDED_ACTIONS)?,
      })
    })
    .collect()
}

pub(crate) fn countries(sheet: &Sheet) -> Result<Vec<CountryRecord>> {
  sheet.require(country::ALL)?;
  sheet
    .rows()
    .map(|row| {
      Ok(CountryRecord {
        country:         row.text(country::COUNTRY)?,
        total_sites:     row.count(country::TOTAL_SITES)?,
        avg_dqi:         row.measure(country::AVG_DQI)?,
        pct_sites_ready: row.measure(country::PCT_SITES_READY)?,
        total_red_sites: row.count(country::TOTAL_RED_SITES)?,
        trend:           row.text(country::TREND)?,
      })
    })
    .collect()
}

pub(crate) fn regions(sheet: &Sheet) -> Result<Vec<RegionRecord>> {
  sheet.require(region::ALL)?;
  sheet
    .rows()
    .map(|row| {
      Ok(RegionRecord {
        region:          row.text(region::REGION)?,
        total_sites:     row.count(region::TOTAL_SITES)?,
        avg_dqi:         row.measure(region::AVG_DQI)?,
        pct_sites_ready: row.measure(region::PCT_SITES_READY)?,
        red_site_count:  row.count(region::RED_SITE_COUNT)?,
        trend:           row.text(region::TREND)?,
      })
    })
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn text_accepts_scalars() {
    assert_eq!(text(&Data::String("Site 1".into())), Ok(Some("Site 1".into())));
    assert_eq!(text(&Data::Float(12.0)), Ok(Some("12".into())));
    assert_eq!(text(&Data::Float(12.5)), Ok(Some("12.5".into())));
    assert_eq!(text(&Data::Int(7)), Ok(Some("7".into())));
    assert_eq!(text(&Data::Bool(true)), Ok(Some("true".into())));
    assert_eq!(text(&Data::Empty), Ok(None));
    assert_eq!(text(&Data::String(String::new())), Ok(None));
  }

  #[test]
  fn number_accepts_numeric_strings_and_blanks() {
    assert_eq!(number(&Data::Float(87.5)), Ok(Some(87.5)));
    assert_eq!(number(&Data::Int(3)), Ok(Some(3.0)));
    assert_eq!(number(&Data::String(" 4.25 ".into())), Ok(Some(4.25)));
    assert_eq!(number(&Data::String("  ".into())), Ok(None));
    assert_eq!(number(&Data::String("NaN".into())), Ok(None));
    assert_eq!(number(&Data::Empty), Ok(None));
    assert!(number(&Data::String("high".into())).is_err());
    assert!(number(&Data::Bool(false)).is_err());
  }

  #[test]
  fn counts_must_be_whole_and_non_negative() {
    assert_eq!(whole(12.0), Ok(12));
    assert!(whole(1.5).is_err());
    assert!(whole(-1.0).is_err());
  }

  #[test]
  fn blank_rows_are_skipped_and_numbered_from_header() {
    let mut range = Range::new((0, 0), (3, 1));
    range.set_value((0, 0), Data::String("Site_ID".into()));
    range.set_value((0, 1), Data::String(" Trend ".into()));
    range.set_value((1, 0), Data::String("Site 1".into()));
    range.set_value((3, 0), Data::String("Site 2".into()));

    let sheet = Sheet::from_range(Path::new("t.xlsx"), &range);
    assert!(sheet.require(&["Site_ID", "Trend"]).is_ok());
    assert!(matches!(
      sheet.require(&["Site_ID", "Avg_DQI"]),
      Err(Error::MissingColumn { column: "Avg_DQI", .. })
    ));
    let lines: Vec<_> = sheet.rows().map(|r| r.line).collect();
    assert_eq!(lines, vec![2, 4]);
  }
}
