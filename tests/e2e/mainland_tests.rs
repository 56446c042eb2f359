use crate::e2e::{TestServer, UpstreamCalls};

#[tokio::test]
async fn test_mainland_probe_by_name() {
	let server = TestServer::spawn().await.expect("start aggregator");

	let (status, body) = server.get_json("/api/mainland?systemName=Amarr").await;
	assert_eq!(status, reqwest::StatusCode::OK);
	assert_eq!(body["isMainland"], true);

	// Outcome is remembered per lowercased name
	let (_, body) = server.get_json("/api/mainland?systemName=amarr").await;
	assert_eq!(body["isMainland"], true);
	assert_eq!(UpstreamCalls::get(&server.upstream.calls.red), 1);
}

#[tokio::test]
async fn test_mainland_probe_rejects_disconnected_system() {
	let server = TestServer::spawn().await.expect("start aggregator");

	let (status, body) = server.get_json("/api/mainland?systemName=1DQ1-A").await;
	assert_eq!(status, reqwest::StatusCode::OK);
	assert_eq!(body["isMainland"], false);
}

#[tokio::test]
async fn test_mainland_by_id_resolves_name_first() {
	let server = TestServer::spawn().await.expect("start aggregator");

	let (status, body) = server
		.get_json(&format!("/api/mainland?systemId={}", crate::e2e::AMARR))
		.await;
	assert_eq!(status, reqwest::StatusCode::OK);
	assert_eq!(body["isMainland"], true);

	// Nullsec ids are answered from security status alone
	let (_, body) = server
		.get_json(&format!("/api/mainland?systemId={}", crate::e2e::DQ))
		.await;
	assert_eq!(body["isMainland"], false);
	assert_eq!(UpstreamCalls::get(&server.upstream.calls.red), 1);
}
