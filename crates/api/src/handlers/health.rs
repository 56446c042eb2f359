use axum::{extract::State, http::StatusCode};
use tracing::warn;

use crate::state::AppState;

/// GET /health - 200 while the cache answers, 503 otherwise
pub async fn health(State(state): State<AppState>) -> (StatusCode, &'static str) {
	match state.store.health_check().await {
		Ok(true) => (StatusCode::OK, "OK"),
		Ok(false) => (StatusCode::SERVICE_UNAVAILABLE, "UNAVAILABLE"),
		Err(e) => {
			warn!("Cache health check failed: {}", e);
			(StatusCode::SERVICE_UNAVAILABLE, "UNAVAILABLE")
		},
	}
}
