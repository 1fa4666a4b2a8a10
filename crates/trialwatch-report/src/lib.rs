//! Reader for the flat-text CRA site performance report.
//!
//! The report is produced upstream as one text file holding a section per
//! site, separated by a line of 50 hyphens. Each section carries a site
//! header and a free-text `AI Summary:` block. There is no formal grammar,
//! so lookups are best-effort and never fail: [`extract_summary`] always
//! returns something displayable.
//!
//! # Quick start
//!
//! ```no_run
//! let text = trialwatch_report::extract_summary("Site 12", "data/report.txt");
//! println!("{text}");
//! ```

pub mod error;
mod parse;

use std::path::Path;

pub use error::{Error, Result};
pub use parse::{normalize_summary, site_key};
use tracing::{debug, warn};

// ─── Constants ───────────────────────────────────────────────────────────────

/// Separator line between site sections.
pub const SECTION_DELIMITER: &str = "--------------------------------------------------";

/// Shown when the report file does not exist.
pub const FILE_NOT_FOUND: &str = "Summary file not found.";

/// Shown when no section (or no summary within it) exists for the site.
pub const SUMMARY_NOT_FOUND: &str = "AI Summary not found for this site.";

// ─── Parsed report ───────────────────────────────────────────────────────────

/// A report split into its site sections, borrowing from the source text.
#[derive(Debug, Clone)]
pub struct Report<'a> {
  sections: Vec<&'a str>,
}

/// Outcome of looking a site up in a [`Report`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
  /// The normalized summary text.
  Found(String),
  /// No section mentions the site.
  NoSection,
  /// The first section mentioning the site has no `AI Summary:` marker.
  /// Later sections are not consulted.
  NoSummary,
}

impl Lookup {
  /// The text to show for this outcome.
  pub fn into_display(self) -> String {
    match self {
      Lookup::Found(text) => text,
      Lookup::NoSection | Lookup::NoSummary => SUMMARY_NOT_FOUND.to_owned(),
    }
  }
}

impl<'a> Report<'a> {
  pub fn parse(content: &'a str) -> Self {
    Self { sections: content.split(SECTION_DELIMITER).collect() }
  }

  pub fn sections(&self) -> &[&'a str] { &self.sections }

  /// Find the summary for `site_id` (`"Site 12"` or `"12"`).
  ///
  /// Only the first section that mentions the site is examined.
  pub fn lookup(&self, site_id: &str) -> Lookup {
    let key = site_key(site_id);
    let Some(section) = self
      .sections
      .iter()
      .find(|section| parse::mentions_site(section, key))
    else {
      return Lookup::NoSection;
    };
    match parse::capture_summary(section) {
      Some(raw) => Lookup::Found(normalize_summary(raw)),
      None => Lookup::NoSummary,
    }
  }
}

// ─── File API ────────────────────────────────────────────────────────────────

/// Read the report at `path` and look `site_id` up in it.
///
/// The file is read on every call; operators edit it between monitoring
/// cycles.
pub fn read_summary(site_id: &str, path: impl AsRef<Path>) -> Result<Lookup> {
  let path = path.as_ref();
  if !path.exists() {
    return Err(Error::NotFound(path.to_path_buf()));
  }
  let content = std::fs::read_to_string(path).map_err(|source| Error::Io {
    path: path.to_path_buf(),
    source,
  })?;
  let lookup = Report::parse(&content).lookup(site_id);
  debug!(site_id, path = %path.display(), ?lookup, "summary lookup");
  Ok(lookup)
}

/// Display text for `site_id`'s AI summary. Never fails.
///
/// Returns [`FILE_NOT_FOUND`] when the report is missing,
/// [`SUMMARY_NOT_FOUND`] when the site has no summary, and
/// `"Error reading summary: …"` for any other failure.
pub fn extract_summary(site_id: &str, path: impl AsRef<Path>) -> String {
  match read_summary(site_id, path) {
    Ok(lookup) => lookup.into_display(),
    Err(Error::NotFound(_)) => FILE_NOT_FOUND.to_owned(),
    Err(e) => {
      warn!(site_id, error = %e, "failed to read summary report");
      format!("Error reading summary: {e}")
    }
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
