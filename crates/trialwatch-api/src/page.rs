//! Pieces shared by every page payload.

use std::sync::Arc;

use serde::Serialize;
use trialwatch_core::{dataset::Snapshot, source::DatasetSource, view::View};

use crate::error::ApiError;

/// Header fields carried by every page.
#[derive(Debug, Clone, Serialize)]
pub struct PageMeta {
  pub view:    View,
  pub title:   &'static str,
  /// Version of the snapshot the page was built from.
  pub version: String,
}

impl PageMeta {
  pub fn new(view: View, snapshot: &Snapshot) -> Self {
    Self { view, title: view.title(), version: snapshot.version.clone() }
  }
}

/// Fetch the current snapshot, mapping loader failures to a 500.
pub(crate) async fn snapshot<S: DatasetSource>(source: &S) -> Result<Arc<Snapshot>, ApiError> {
  source.load().await.map_err(|e| ApiError::Source(Box::new(e)))
}

/// Validate an optional detail-selection parameter such as `subject_id`.
///
/// Absent means "the first match". Present but blank is rejected rather
/// than silently treated as absent.
pub(crate) fn requested<'q>(
  name: &str,
  value: Option<&'q str>,
) -> Result<Option<&'q str>, ApiError> {
  match value.map(str::trim) {
    Some("") => Err(ApiError::BadRequest(format!("{name} must not be empty"))),
    other => Ok(other),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn blank_detail_selection_is_rejected() {
    assert!(matches!(requested("site_id", Some("  ")), Err(ApiError::BadRequest(_))));
    assert_eq!(requested("site_id", Some(" Site 4 ")).unwrap(), Some("Site 4"));
    assert_eq!(requested("site_id", None).unwrap(), None);
  }
}
