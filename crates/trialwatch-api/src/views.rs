//! `GET /views`: the navigation menu.

use axum::Json;
use trialwatch_core::view::{NavEntry, navigation};

/// `GET /views`
pub async fn list() -> Json<Vec<NavEntry>> { Json(navigation()) }
