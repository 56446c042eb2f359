use axum::{
	extract::{Query, State},
	response::Json,
};
use haul_service::SystemsResponse;
use serde::Deserialize;

use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct SystemsQuery {
	pub version: Option<String>,
}

/// GET /api/systems - System names, empty when the client is current
pub async fn get_systems(
	State(state): State<AppState>,
	Query(query): Query<SystemsQuery>,
) -> Json<SystemsResponse> {
	Json(state.systems.response_for(query.version.as_deref()))
}
