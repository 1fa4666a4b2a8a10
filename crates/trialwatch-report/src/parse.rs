//! Section splitting and summary clean-up.
//!
//! Pipeline:
//!   raw report
//!     └─ split on SECTION_DELIMITER   → sections
//!          └─ first section mentioning "Site {id}"
//!               └─ capture after "AI Summary:" → raw summary
//!                    └─ normalize_summary()     → display text

use std::sync::LazyLock;

use regex::Regex;

/// Everything after the marker up to the end of the section, newlines
/// included.
static SUMMARY_MARKER: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"(?s)AI Summary:\s*(.*)").expect("valid regex"));

/// Header echo that upstream generators sometimes repeat inside the summary.
static DUPLICATE_HEADER: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"Site ID: Site \d+").expect("valid regex"));

/// Reduce `"Site 12"`, `" 12 "` or `"12"` to the bare identifier `"12"`.
pub fn site_key(raw: &str) -> &str {
  let start = raw.trim_start();
  start.strip_prefix("Site ").unwrap_or(start).trim()
}

/// Does `section` mention the site? Plain substring match: `"Site 1"` is
/// also found inside `"Site 10"`, and an empty key matches any `"Site "`.
pub(crate) fn mentions_site(section: &str, key: &str) -> bool {
  section.contains(&format!("Site {key}"))
}

/// The raw text following `AI Summary:` in `section`, if the marker exists.
pub(crate) fn capture_summary(section: &str) -> Option<&str> {
  SUMMARY_MARKER
    .captures(section)
    .and_then(|caps| caps.get(1))
    .map(|m| m.as_str())
}

/// Turn a captured summary into display text.
///
/// Strips markdown emphasis and quotes, starts a new line at the first
/// `Performance`, and drops any echoed `Site ID: Site N` header.
pub fn normalize_summary(raw: &str) -> String {
  let text: String = raw.trim().chars().filter(|c| !matches!(c, '*' | '"')).collect();

  let text = match text.split_once("Performance") {
    Some((before, after)) => {
      format!("{}\nPerformance {}", before.trim(), after.trim())
    }
    None => text,
  };

  DUPLICATE_HEADER.replace_all(&text, "").trim().to_owned()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn site_key_strips_prefix_and_whitespace() {
    assert_eq!(site_key("Site 7"), "7");
    assert_eq!(site_key("  Site 7 "), "7");
    assert_eq!(site_key("7"), "7");
    assert_eq!(site_key("Site "), "");
    assert_eq!(site_key(" Site  "), "");
  }

  #[test]
  fn empty_key_mentions_any_site_header() {
    assert!(mentions_site("Site 1 report", ""));
    assert!(!mentions_site("no header here", ""));
  }

  #[test]
  fn mention_is_a_plain_substring_match() {
    assert!(mentions_site("Site ID: Site 10", "1"));
    assert!(!mentions_site("Site ID: Site 20", "1"));
  }

  #[test]
  fn capture_spans_lines_and_skips_leading_whitespace() {
    let section = "Site ID: Site 3\nAI Summary:\n\n  line one\nline two\n";
    assert_eq!(capture_summary(section), Some("line one\nline two\n"));
  }

  #[test]
  fn capture_is_case_sensitive() {
    assert_eq!(capture_summary("ai summary: nope"), None);
  }

  #[test]
  fn emphasis_and_quotes_are_removed() {
    assert_eq!(
      normalize_summary(r#"*Performance* is "good""#),
      "Performance is good"
    );
  }

  #[test]
  fn line_break_only_before_first_performance() {
    assert_eq!(
      normalize_summary("Overall stable. Performance trending up; Performance review due."),
      "Overall stable.\nPerformance trending up; Performance review due."
    );
  }

  #[test]
  fn duplicate_header_is_dropped() {
    assert_eq!(
      normalize_summary("Site ID: Site 42 Enrollment is on track."),
      "Enrollment is on track."
    );
  }

  #[test]
  fn text_without_performance_is_only_cleaned() {
    assert_eq!(normalize_summary("  **Low** risk.  "), "Low risk.");
  }
}
