//! Tests for REST API endpoints

use axum::{
	body::Body,
	http::{Request, StatusCode},
	Router,
};
use haul_aggregator::{
	service::{MockAggregatorTrait, MockMainlandTrait, MainlandError},
	storage::MemoryStore,
	AdapterError, AppState, ErrorKind, ProviderId, QuoteFailure, QuoteOffer, RouteResponse,
	SystemsCatalog,
};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

/// Create test application state
fn create_test_app_state(aggregator: MockAggregatorTrait, mainland: MockMainlandTrait) -> AppState {
	AppState {
		aggregator: Arc::new(aggregator),
		mainland: Arc::new(mainland),
		systems: Arc::new(SystemsCatalog::new(
			vec!["Jita".to_string(), "Amarr".to_string(), "Perimeter".to_string()],
			"20211018",
		)),
		store: Arc::new(MemoryStore::new()),
	}
}

/// Create test router
fn create_test_router(aggregator: MockAggregatorTrait, mainland: MockMainlandTrait) -> Router {
	haul_aggregator::create_router().with_state(create_test_app_state(aggregator, mainland))
}

fn default_router() -> Router {
	create_test_router(MockAggregatorTrait::new(), MockMainlandTrait::new())
}

async fn get(app: Router, uri: &str) -> (StatusCode, axum::http::HeaderMap, Vec<u8>) {
	let response = app
		.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
		.await
		.unwrap();
	let status = response.status();
	let headers = response.headers().clone();
	let body = axum::body::to_bytes(response.into_body(), usize::MAX)
		.await
		.unwrap();
	(status, headers, body.to_vec())
}

async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
	let (status, _, body) = get(app, uri).await;
	(status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn test_health_endpoint() {
	let (status, _, body) = get(default_router(), "/health").await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(&body[..], b"OK");
}

#[tokio::test]
async fn test_response_and_request_id_headers() {
	let (_, headers, _) = get(default_router(), "/health").await;
	assert_eq!(headers["x-content-type-options"], "nosniff");
	assert_eq!(
		headers["content-security-policy"],
		"default-src 'none'; frame-ancestors 'none'"
	);
	assert_eq!(headers["referrer-policy"], "no-referrer");
	assert_eq!(headers["cross-origin-resource-policy"], "cross-origin");
	assert_eq!(headers["cache-control"], "no-store");
	assert!(headers.contains_key("x-request-id"));

	// Error responses carry them as well
	let (status, headers, _) = get(default_router(), "/api/mainland").await;
	assert_eq!(status, StatusCode::BAD_REQUEST);
	assert_eq!(headers["cache-control"], "no-store");
}

#[tokio::test]
async fn test_route_missing_parameter() {
	let mut aggregator = MockAggregatorTrait::new();
	aggregator.expect_fetch_route().never();
	let app = create_test_router(aggregator, MockMainlandTrait::new());

	let (status, body) = get_json(app, "/api/route?origin=Jita&volume=1000&collateral=1").await;
	assert_eq!(status, StatusCode::BAD_REQUEST);
	assert_eq!(body["error"], "Missing parameter.");
	assert!(body["message"].as_str().unwrap().contains("destination"));
}

#[tokio::test]
async fn test_route_invalid_number() {
	let mut aggregator = MockAggregatorTrait::new();
	aggregator.expect_fetch_route().never();
	let app = create_test_router(aggregator, MockMainlandTrait::new());

	let (status, body) = get_json(
		app,
		"/api/route?origin=Jita&destination=Amarr&volume=lots&collateral=1",
	)
	.await;
	assert_eq!(status, StatusCode::BAD_REQUEST);
	assert_eq!(body["error"], "Invalid parameter.");
}

#[tokio::test]
async fn test_route_returns_aggregated_response() {
	let mut aggregator = MockAggregatorTrait::new();
	aggregator
		.expect_fetch_route()
		.withf(|params| {
			params.origin == "Jita"
				&& params.destination == "Amarr"
				&& params.volume == 10_000.0
				&& params.collateral == 500_000_000.0
				&& params.providers == Some(vec![ProviderId::RedFrog, ProviderId::Ghsol])
		})
		.times(1)
		.returning(|_| {
			RouteResponse::new(
				vec![
					QuoteFailure::new(&ProviderId::Ghsol.details(), ErrorKind::NullsecNotServed)
						.into(),
					QuoteOffer::new(&ProviderId::RedFrog.details(), 12_000_000.0, 3, 7).into(),
				],
				None,
			)
		});
	let app = create_test_router(aggregator, MockMainlandTrait::new());

	let (status, body) = get_json(
		app,
		"/api/route?origin=Jita&destination=Amarr&volume=10000&collateral=500000000&providers=redfrog,ghsol",
	)
	.await;
	assert_eq!(status, StatusCode::OK);

	let providers = body["providers"].as_array().unwrap();
	assert_eq!(providers.len(), 2);
	assert_eq!(providers[0]["status"], "success");
	assert_eq!(providers[0]["provider"], "Red Frog Freight");
	assert_eq!(providers[1]["status"], "failure");
	assert_eq!(providers[1]["errorKind"], "nullsecNotServed");
	assert!(body.get("distances").is_none());
}

#[tokio::test]
async fn test_route_accepts_trailing_slash() {
	let mut aggregator = MockAggregatorTrait::new();
	aggregator
		.expect_fetch_route()
		.times(1)
		.returning(|_| RouteResponse::new(vec![], None));
	let app = create_test_router(aggregator, MockMainlandTrait::new());

	let (status, body) = get_json(
		app,
		"/api/route/?origin=Jita&destination=Amarr&volume=1&collateral=1",
	)
	.await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(body["providers"], serde_json::json!([]));
}

#[tokio::test]
async fn test_mainland_by_name() {
	let mut mainland = MockMainlandTrait::new();
	mainland
		.expect_is_mainland_by_name()
		.withf(|name| name == "Amarr")
		.times(1)
		.returning(|_| Ok(true));
	let app = create_test_router(MockAggregatorTrait::new(), mainland);

	let (status, body) = get_json(app, "/api/mainland?systemName=Amarr").await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(body["isMainland"], true);
}

#[tokio::test]
async fn test_mainland_by_id() {
	let mut mainland = MockMainlandTrait::new();
	mainland
		.expect_is_mainland_by_id()
		.withf(|id| *id == 30000142)
		.times(1)
		.returning(|_| Ok(false));
	let app = create_test_router(MockAggregatorTrait::new(), mainland);

	let (status, body) = get_json(app, "/api/mainland?systemId=30000142").await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(body["isMainland"], false);
}

#[tokio::test]
async fn test_mainland_parameter_errors() {
	let (status, body) = get_json(default_router(), "/api/mainland").await;
	assert_eq!(status, StatusCode::BAD_REQUEST);
	assert_eq!(body["error"], "Missing parameter.");

	let (status, body) = get_json(default_router(), "/api/mainland?systemId=jita").await;
	assert_eq!(status, StatusCode::BAD_REQUEST);
	assert_eq!(body["error"], "Invalid parameter.");
}

#[tokio::test]
async fn test_mainland_upstream_failure_is_bad_gateway() {
	let mut mainland = MockMainlandTrait::new();
	mainland.expect_is_mainland_by_name().returning(|_| {
		Err(MainlandError::Upstream(AdapterError::Upstream {
			message: "calculator offline".to_string(),
		}))
	});
	let app = create_test_router(MockAggregatorTrait::new(), mainland);

	let (status, body) = get_json(app, "/api/mainland?systemName=Jita").await;
	assert_eq!(status, StatusCode::BAD_GATEWAY);
	assert_eq!(body["error"], "Upstream unavailable.");
}

#[tokio::test]
async fn test_systems_catalog_versioning() {
	let (status, body) = get_json(default_router(), "/api/systems").await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(body["version"], "20211018");
	assert_eq!(body["systemNames"].as_array().unwrap().len(), 3);

	let (_, body) = get_json(default_router(), "/api/systems?version=20211018").await;
	assert_eq!(body["systemNames"], serde_json::json!([]));

	let (_, body) = get_json(default_router(), "/api/systems?version=20200101").await;
	assert_eq!(body["systemNames"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
	let (status, _, _) = get(default_router(), "/api/unknown").await;
	assert_eq!(status, StatusCode::NOT_FOUND);
}
