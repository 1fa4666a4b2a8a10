//! Error types for `trialwatch-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// The filters left nothing to show; the page must stop rendering.
  #[error("no {0} match the current filters")]
  EmptySelection(&'static str),

  #[error("{kind} {id:?} is not in the current selection")]
  NotInSelection { kind: &'static str, id: String },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
