//! `POST /reload`: drop the memoized snapshot and load a fresh one.

use axum::{Json, extract::State};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;
use trialwatch_core::source::DatasetSource;

use crate::{ApiState, error::ApiError, page::snapshot};

#[derive(Debug, Clone, Serialize)]
pub struct ReloadResponse {
  pub version:   String,
  pub loaded_at: DateTime<Utc>,
}

/// `POST /reload`
pub async fn handler<S: DatasetSource>(
  State(state): State<ApiState<S>>,
) -> Result<Json<ReloadResponse>, ApiError> {
  state.source.invalidate().await;
  let snapshot = snapshot(&*state.source).await?;
  info!(version = %snapshot.version, "datasets reloaded on request");
  Ok(Json(ReloadResponse {
    version:   snapshot.version.clone(),
    loaded_at: snapshot.loaded_at,
  }))
}
