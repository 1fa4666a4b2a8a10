//! JSON API for the Trialwatch oversight dashboard.
//!
//! Exposes an axum [`Router`] backed by any
//! [`trialwatch_core::source::DatasetSource`]. Each dashboard view is one
//! `GET` endpoint whose query string carries the filter selections.
//! Rendering is the client's concern.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", trialwatch_api::api_router(source.clone(), report_path))
//! ```

pub mod countries;
pub mod error;
pub mod overview;
pub mod page;
pub mod regions;
pub mod reload;
pub mod sites;
pub mod subjects;
pub mod views;


use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  routing::{get, post},
};
use trialwatch_core::source::DatasetSource;

pub use error::ApiError;

/// State shared by every handler.
pub struct ApiState<S> {
  pub source:      Arc<S>,
  /// The CRA performance report read by the AI-summary lookup.
  pub report_path: Arc<PathBuf>,
}

impl<S> Clone for ApiState<S> {
  fn clone(&self) -> Self {
    Self {
      source:      Arc::clone(&self.source),
      report_path: Arc::clone(&self.report_path),
    }
  }
}

/// Build a fully-materialised API router for `source`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(source: Arc<S>, report_path: impl Into<PathBuf>) -> Router<()>
where
  S: DatasetSource + 'static,
{
  let state = ApiState { source, report_path: Arc::new(report_path.into()) };
  Router::new()
    .route("/views", get(views::list))
    .route("/overview", get(overview::page::<S>))
    .route("/subjects", get(subjects::page::<S>))
    .route("/sites", get(sites::page::<S>))
    .route("/sites/{id}/summary", get(sites::summary::<S>))
    .route("/countries", get(countries::page::<S>))
    .route("/regions", get(regions::page::<S>))
    .route("/reload", post(reload::handler::<S>))
    .with_state(state)
}
