use axum::{routing::get, Router};
use tower::ServiceBuilder;
use tower_http::{
	compression::CompressionLayer,
	cors::CorsLayer,
	limit::RequestBodyLimitLayer,
	request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
	trace::TraceLayer,
};
use tracing::Level;

use crate::handlers::{get_mainland, get_route, get_systems, health};
use crate::security::with_response_headers;
use crate::state::AppState;

// State is applied at the application level using `.with_state(...)`.
pub fn create_router() -> Router<AppState> {
	let cors = CorsLayer::permissive();
	// Every endpoint is a GET; bodies are never expected
	let body_limit = RequestBodyLimitLayer::new(16 * 1024);
	let trace = TraceLayer::new_for_http()
		.make_span_with(|req: &axum::http::Request<_>| {
			let req_id = req
				.headers()
				.get("x-request-id")
				.and_then(|v| v.to_str().ok())
				.unwrap_or("-");
			tracing::info_span!(
				"http_request",
				method = %req.method(),
				uri = %req.uri(),
				req_id
			)
		})
		.on_request(tower_http::trace::DefaultOnRequest::new().level(Level::INFO))
		.on_response(
			tower_http::trace::DefaultOnResponse::new()
				.level(Level::INFO)
				.latency_unit(tower_http::LatencyUnit::Millis),
		);
	let req_id = ServiceBuilder::new()
		.layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
		.layer(PropagateRequestIdLayer::x_request_id());

	let router = Router::new()
		.route("/health", get(health))
		.route("/health/", get(health))
		.route("/api/route", get(get_route))
		.route("/api/route/", get(get_route))
		.route("/api/mainland", get(get_mainland))
		.route("/api/mainland/", get(get_mainland))
		.route("/api/systems", get(get_systems))
		.route("/api/systems/", get(get_systems))
		.layer(cors)
		.layer(CompressionLayer::new())
		.layer(trace)
		.layer(req_id)
		.layer(body_limit);

	with_response_headers(router)
}
