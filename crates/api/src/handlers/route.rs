use axum::{
	extract::{Query, State},
	http::StatusCode,
	response::Json,
};
use haul_types::{RouteQuery, RouteResponse};
use tracing::{info, warn};

use crate::handlers::common::{error_response, ApiError};
use crate::state::AppState;

/// GET /api/route - Quote a route across the selected providers
pub async fn get_route(
	State(state): State<AppState>,
	Query(query): Query<RouteQuery>,
) -> Result<Json<RouteResponse>, ApiError> {
	let params = query.into_parameters().map_err(|e| {
		warn!("Rejected route request: {}", e);
		error_response(StatusCode::BAD_REQUEST, e.label(), e.to_string())
	})?;

	info!(
		"Route request {} -> {} ({} m3, {} ISK)",
		params.origin, params.destination, params.volume, params.collateral
	);

	Ok(Json(state.aggregator.fetch_route(params).await))
}
