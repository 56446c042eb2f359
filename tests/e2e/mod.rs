//! End-to-end test utilities and shared fixtures
//!
//! A single axum server stands in for every upstream: the Red Frog
//! calculators under `/frog`, PushX under `/pushx` and ESI under `/esi`.

use axum::{
	extract::{Path, Query, State},
	http::StatusCode,
	routing::{get, post},
	Json, Router,
};
use haul_aggregator::{AggregatorBuilder, Settings};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

pub const PERIMETER: i64 = 30000144;
pub const AMARR: i64 = 30002187;
pub const DQ: i64 = 30004759;

/// Names, ids and security of the systems the fake topology knows
const SYSTEMS: [(&str, i64, f64); 4] = [
	("Jita", 30000142, 0.946),
	("Perimeter", PERIMETER, 0.957),
	("Amarr", AMARR, 1.0),
	("1DQ1-A", DQ, -0.38),
];

/// Call counters of the fake upstreams
#[derive(Default)]
pub struct UpstreamCalls {
	pub red: AtomicUsize,
	pub purple: AtomicUsize,
	pub black: AtomicUsize,
	pub pushx: AtomicUsize,
	pub esi_route: AtomicUsize,
}

impl UpstreamCalls {
	pub fn get(counter: &AtomicUsize) -> usize {
		counter.load(Ordering::SeqCst)
	}
}

#[derive(Debug, Deserialize)]
struct FrogParams {
	origin: String,
	destination: String,
	collateral: Option<f64>,
}

fn error_body(status: StatusCode, message: &str) -> (StatusCode, Json<Value>) {
	(status, Json(json!({ "error": message })))
}

async fn frog_quote(
	State(calls): State<Arc<UpstreamCalls>>,
	Path(calculator): Path<String>,
	Query(params): Query<FrogParams>,
) -> (StatusCode, Json<Value>) {
	let counter = match calculator.as_str() {
		"red" => &calls.red,
		"purple" => &calls.purple,
		"black" => &calls.black,
		_ => return error_body(StatusCode::NOT_FOUND, "Unknown calculator"),
	};
	counter.fetch_add(1, Ordering::SeqCst);

	for name in [&params.origin, &params.destination] {
		if !SYSTEMS.iter().any(|(known, _, _)| known.eq_ignore_ascii_case(name)) {
			return error_body(
				StatusCode::BAD_REQUEST,
				&format!("System {} not found in our database", name),
			);
		}
	}
	let nullsec = |name: &str| name.eq_ignore_ascii_case("1DQ1-A");
	if nullsec(&params.origin) || nullsec(&params.destination) {
		return error_body(
			StatusCode::BAD_REQUEST,
			"No contiguous High Sec route found between the systems",
		);
	}

	match calculator.as_str() {
		"red" => (
			StatusCode::OK,
			Json(json!({
				"reward_base": 12_000_000.0,
				"reward_rush": 24_000_000.0,
				"days_to_complete": 3,
				"days_expiration": 7
			})),
		),
		"purple" => {
			if params.collateral.is_none() {
				return error_body(StatusCode::BAD_REQUEST, "collateral is required");
			}
			(
				StatusCode::OK,
				Json(json!({
					"reward_base": 20_000_000.0,
					"days_to_complete": 3,
					"days_expiration": 7
				})),
			)
		},
		_ => (
			StatusCode::OK,
			Json(json!({
				"reward_base": 95_000_000.0,
				"days_to_complete": 5,
				"days_expiration": 7,
				"distance": 6.2
			})),
		),
	}
}

/// PushX is down for the whole suite
async fn pushx_quote(State(calls): State<Arc<UpstreamCalls>>) -> (StatusCode, &'static str) {
	calls.pushx.fetch_add(1, Ordering::SeqCst);
	(StatusCode::INTERNAL_SERVER_ERROR, "maintenance")
}

async fn esi_ids(Json(names): Json<Vec<String>>) -> Json<Value> {
	let systems: Vec<Value> = SYSTEMS
		.iter()
		.filter(|(name, _, _)| names.iter().any(|n| n.eq_ignore_ascii_case(name)))
		.map(|(name, id, _)| json!({ "id": id, "name": name }))
		.collect();
	Json(json!({ "systems": systems }))
}

async fn esi_route(
	State(calls): State<Arc<UpstreamCalls>>,
	Path((origin, destination)): Path<(i64, i64)>,
) -> Json<Vec<i64>> {
	calls.esi_route.fetch_add(1, Ordering::SeqCst);
	Json(vec![origin, PERIMETER, destination])
}

async fn esi_system(Path(system_id): Path<i64>) -> (StatusCode, Json<Value>) {
	match SYSTEMS.iter().find(|(_, id, _)| *id == system_id) {
		Some((name, id, security)) => (
			StatusCode::OK,
			Json(json!({
				"system_id": id,
				"name": name,
				"security_status": security,
				"constellation_id": 20000020
			})),
		),
		None => error_body(StatusCode::NOT_FOUND, "System not found"),
	}
}

/// Fake upstream services bound to an ephemeral port
pub struct MockUpstream {
	pub base_url: String,
	pub calls: Arc<UpstreamCalls>,
	handle: JoinHandle<()>,
}

impl MockUpstream {
	pub async fn spawn() -> Self {
		let calls = Arc::new(UpstreamCalls::default());
		let app = Router::new()
			.route("/frog/{calculator}/", get(frog_quote))
			.route("/pushx/", get(pushx_quote))
			.route("/esi/universe/ids/", post(esi_ids))
			.route("/esi/route/{origin}/{destination}/", get(esi_route))
			.route("/esi/universe/systems/{system_id}/", get(esi_system))
			.with_state(Arc::clone(&calls));

		let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
			.await
			.expect("bind upstream port");
		let addr = listener.local_addr().unwrap();
		let handle = tokio::spawn(async move {
			let _ = axum::serve(listener, app).await;
		});

		Self {
			base_url: format!("http://{}", addr),
			calls,
			handle,
		}
	}

	/// Settings pointing every upstream at this server
	pub fn settings(&self) -> Settings {
		let mut settings = Settings::default();
		settings.upstreams.red_frog_base_url = format!("{}/frog", self.base_url);
		settings.upstreams.pushx_base_url = format!("{}/pushx", self.base_url);
		settings.upstreams.esi_base_url = format!("{}/esi", self.base_url);
		settings.upstreams.request_timeout_ms = Some(5_000);
		settings.jobs.retry_delay_seconds = 0;
		settings
	}
}

impl Drop for MockUpstream {
	fn drop(&mut self) {
		self.handle.abort();
	}
}

/// Aggregator served on an ephemeral port against a [`MockUpstream`]
pub struct TestServer {
	pub base_url: String,
	pub upstream: MockUpstream,
	pub client: reqwest::Client,
	handle: JoinHandle<()>,
}

impl TestServer {
	pub async fn spawn() -> Result<Self, Box<dyn std::error::Error>> {
		let upstream = MockUpstream::spawn().await;
		Self::spawn_with_settings(upstream.settings(), upstream).await
	}

	pub async fn spawn_with_settings(
		settings: Settings,
		upstream: MockUpstream,
	) -> Result<Self, Box<dyn std::error::Error>> {
		let aggregator = AggregatorBuilder::new()
			.with_settings(settings)
			.start()
			.await?;

		let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
		let addr = listener.local_addr()?;
		let router = aggregator.router;
		let handle = tokio::spawn(async move {
			let _ = axum::serve(listener, router).await;
		});

		Ok(Self {
			base_url: format!("http://{}", addr),
			upstream,
			client: reqwest::Client::new(),
			handle,
		})
	}

	pub async fn get_json(&self, path_and_query: &str) -> (reqwest::StatusCode, Value) {
		let response = self
			.client
			.get(format!("{}{}", self.base_url, path_and_query))
			.send()
			.await
			.expect("request aggregator");
		let status = response.status();
		let body = response.json::<Value>().await.expect("json body");
		(status, body)
	}

	/// Repeat a request until `done` accepts the body or the attempts run out
	pub async fn poll_json<F>(&self, path_and_query: &str, done: F) -> Value
	where
		F: Fn(&Value) -> bool,
	{
		let mut last = Value::Null;
		for _ in 0..100 {
			let (_, body) = self.get_json(path_and_query).await;
			if done(&body) {
				return body;
			}
			last = body;
			tokio::time::sleep(Duration::from_millis(50)).await;
		}
		panic!("condition not reached, last body: {}", last);
	}
}

impl Drop for TestServer {
	fn drop(&mut self) {
		self.handle.abort();
	}
}

/// Entries of a route response belonging to one provider
pub fn entries_for<'a>(body: &'a Value, provider: &str) -> Vec<&'a Value> {
	body["providers"]
		.as_array()
		.map(|entries| {
			entries
				.iter()
				.filter(|entry| entry["provider"] == provider)
				.collect()
		})
		.unwrap_or_default()
}
