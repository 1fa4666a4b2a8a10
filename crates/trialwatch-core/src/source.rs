//! The `DatasetSource` trait.
//!
//! The trait is implemented by loaders (e.g. `trialwatch-xlsx`). Higher
//! layers (`trialwatch-api`, `trialwatch-server`) depend on this
//! abstraction, not on any concrete file format.

use std::{future::Future, sync::Arc};

use crate::dataset::Snapshot;

/// Abstraction over where the oversight datasets come from.
///
/// Implementations are expected to memoize: repeated calls to
/// [`load`](DatasetSource::load) while the underlying data is unchanged
/// return the same shared [`Snapshot`] without re-reading anything.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait DatasetSource: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Return the current snapshot, loading it if the cache is cold or stale.
  ///
  /// A missing or malformed input is an error; no partial snapshot is ever
  /// returned.
  fn load(
    &self,
  ) -> impl Future<Output = Result<Arc<Snapshot>, Self::Error>> + Send + '_;

  /// Drop any memoized snapshot so the next [`load`](DatasetSource::load)
  /// re-reads the source.
  fn invalidate(&self) -> impl Future<Output = ()> + Send + '_;
}
