//! Error type for `trialwatch-xlsx`.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("data file not found: {}", .0.display())]
  Missing(PathBuf),

  #[error("cannot access {}: {source}", path.display())]
  Io {
    path:   PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("cannot read workbook {}: {source}", path.display())]
  Workbook {
    path:   PathBuf,
    #[source]
    source: calamine::Error,
  },

  #[error("workbook {} has no worksheets", .0.display())]
  NoWorksheet(PathBuf),

  #[error("{}: missing column {column:?}", path.display())]
  MissingColumn { path: PathBuf, column: &'static str },

  /// A cell that cannot be decoded into its column's type.
  #[error("{} row {row}, column {column:?}: {reason}", path.display())]
  Malformed {
    path:   PathBuf,
    row:    usize,
    column: &'static str,
    reason: String,
  },

  #[error("loader task failed: {0}")]
  Task(#[from] tokio::task::JoinError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
