use axum::{
	extract::{Query, State},
	http::StatusCode,
	response::Json,
};
use haul_service::MainlandStatus;
use serde::Deserialize;
use tracing::warn;

use crate::handlers::common::{error_response, ApiError};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MainlandQuery {
	pub system_name: Option<String>,
	pub system_id: Option<String>,
}

/// GET /api/mainland - Whether a system connects to mainland highsec
pub async fn get_mainland(
	State(state): State<AppState>,
	Query(query): Query<MainlandQuery>,
) -> Result<Json<MainlandStatus>, ApiError> {
	let name = query.system_name.filter(|n| !n.trim().is_empty());

	let result = match (name, query.system_id) {
		(Some(name), _) => state.mainland.is_mainland_by_name(name.trim()).await,
		(None, Some(raw_id)) => {
			let system_id = raw_id.trim().parse::<i64>().map_err(|_| {
				error_response(
					StatusCode::BAD_REQUEST,
					"Invalid parameter.",
					format!("systemId '{}' is not a number", raw_id),
				)
			})?;
			state.mainland.is_mainland_by_id(system_id).await
		},
		(None, None) => {
			return Err(error_response(
				StatusCode::BAD_REQUEST,
				"Missing parameter.",
				"systemName or systemId is required",
			))
		},
	};

	match result {
		Ok(is_mainland) => Ok(Json(MainlandStatus { is_mainland })),
		Err(e) => {
			warn!("Mainland probe failed: {}", e);
			Err(error_response(
				StatusCode::BAD_GATEWAY,
				"Upstream unavailable.",
				e.to_string(),
			))
		},
	}
}
