use crate::e2e::{entries_for, TestServer, UpstreamCalls};

const JITA_AMARR: &str =
	"/api/route?origin=Jita&destination=Amarr&volume=10000&collateral=500000000";

#[tokio::test]
async fn test_route_merges_providers_and_isolates_failures() {
	let server = TestServer::spawn().await.expect("start aggregator");

	let (status, body) = server.get_json(JITA_AMARR).await;
	assert_eq!(status, reqwest::StatusCode::OK);

	let red = entries_for(&body, "Red Frog Freight");
	assert_eq!(red.len(), 2);
	assert!(red.iter().all(|e| e["status"] == "success"));
	assert!(red.iter().any(|e| e["rushDurationHours"] == 4));

	let purple = entries_for(&body, "Purple Frog Transport");
	assert_eq!(purple.len(), 1);
	assert_eq!(purple[0]["reward"], 20_000_000.0);

	let ghsol = entries_for(&body, "Galactic Hauling Solutions Inc.");
	assert_eq!(ghsol.len(), 2);

	// PushX is down; its failure must not take anyone else with it
	let pushx = entries_for(&body, "Push Industries");
	assert_eq!(pushx.len(), 1);
	assert_eq!(pushx[0]["status"], "failure");
	assert_eq!(pushx[0]["errorKind"], "routeUnavailable");

	// Successes come first, cheapest first
	let providers = body["providers"].as_array().unwrap();
	let rewards: Vec<f64> = providers
		.iter()
		.take_while(|e| e["status"] == "success")
		.map(|e| e["reward"].as_f64().unwrap())
		.collect();
	assert_eq!(rewards.len(), providers.len() - 1);
	assert!(rewards.windows(2).all(|w| w[0] <= w[1]));
	assert_eq!(providers.last().unwrap()["status"], "failure");
}

#[tokio::test]
async fn test_route_quotes_are_served_from_cache() {
	let server = TestServer::spawn().await.expect("start aggregator");
	let calls = &server.upstream.calls;

	let (_, first) = server.get_json(JITA_AMARR).await;
	assert!(entries_for(&first, "Red Frog Freight")
		.iter()
		.all(|e| e["cached"] == false));
	assert_eq!(UpstreamCalls::get(&calls.red), 1);

	// 9,999 m3 and 499.5m ISK land in the same 10k/500m buckets
	let (_, second) = server
		.get_json("/api/route?origin=Jita&destination=Amarr&volume=9999&collateral=499500000")
		.await;
	assert!(entries_for(&second, "Red Frog Freight")
		.iter()
		.all(|e| e["cached"] == true));
	assert_eq!(UpstreamCalls::get(&calls.red), 1);

	// Transient failures are retried on every request
	assert_eq!(UpstreamCalls::get(&calls.pushx), 2);
}

#[tokio::test]
async fn test_route_attaches_resolved_distances() {
	let server = TestServer::spawn().await.expect("start aggregator");

	let body = server
		.poll_json(JITA_AMARR, |body| {
			body["distances"]["gates"].is_object() && body["distances"]["lightyears"].is_object()
		})
		.await;

	let gates = &body["distances"]["gates"];
	assert_eq!(gates["jumpCount"], 2);
	assert_eq!(
		gates["perSystemSecurity"],
		serde_json::json!([0.946, 0.957, 1.0])
	);
	assert_eq!(body["distances"]["lightyears"]["lightyearDistance"], 6.2);

	// Each metric is resolved once however many requests asked for it
	assert_eq!(UpstreamCalls::get(&server.upstream.calls.esi_route), 1);
	assert!(UpstreamCalls::get(&server.upstream.calls.black) >= 1);
}

#[tokio::test]
async fn test_nullsec_route_failures() {
	let server = TestServer::spawn().await.expect("start aggregator");
	let path = "/api/route?origin=Jita&destination=1DQ1-A&volume=1000&collateral=1000000&providers=redfrog,ghsol";

	let (status, body) = server.get_json(path).await;
	assert_eq!(status, reqwest::StatusCode::OK);

	let red = entries_for(&body, "Red Frog Freight");
	assert_eq!(red.len(), 1);
	assert_eq!(red[0]["errorKind"], "routeNotContiguousHighsec");

	let ghsol = entries_for(&body, "Galactic Hauling Solutions Inc.");
	assert_eq!(ghsol.len(), 1);
	assert_eq!(ghsol[0]["errorKind"], "nullsecNotServed");

	// Stable rejections are cached like successes
	let (_, again) = server.get_json(path).await;
	assert_eq!(entries_for(&again, "Red Frog Freight")[0]["cached"], true);
	assert_eq!(UpstreamCalls::get(&server.upstream.calls.red), 1);
}

#[tokio::test]
async fn test_limits_are_enforced_without_upstream_calls() {
	let server = TestServer::spawn().await.expect("start aggregator");

	let (_, body) = server
		.get_json("/api/route?origin=Jita&destination=Amarr&volume=100000&collateral=1000000&providers=purplefrog")
		.await;
	let purple = entries_for(&body, "Purple Frog Transport");
	assert_eq!(purple.len(), 1);
	assert_eq!(purple[0]["errorKind"], "limitExceeded");
	assert_eq!(UpstreamCalls::get(&server.upstream.calls.purple), 0);
}

#[tokio::test]
async fn test_route_rejects_missing_parameter() {
	let server = TestServer::spawn().await.expect("start aggregator");

	let (status, body) = server
		.get_json("/api/route?origin=Jita&destination=Amarr&collateral=1")
		.await;
	assert_eq!(status, reqwest::StatusCode::BAD_REQUEST);
	assert_eq!(body["error"], "Missing parameter.");
	assert_eq!(UpstreamCalls::get(&server.upstream.calls.red), 0);
}
