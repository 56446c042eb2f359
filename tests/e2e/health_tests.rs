use crate::e2e::TestServer;

#[tokio::test]
async fn test_health_and_systems() {
	let server = TestServer::spawn().await.expect("start aggregator");

	let response = server
		.client
		.get(format!("{}/health", server.base_url))
		.send()
		.await
		.unwrap();
	assert_eq!(response.status(), reqwest::StatusCode::OK);
	assert_eq!(response.text().await.unwrap(), "OK");

	// No catalog file configured: an empty list under the configured version
	let (status, body) = server.get_json("/api/systems").await;
	assert_eq!(status, reqwest::StatusCode::OK);
	assert_eq!(body["version"], "20211018");
	assert_eq!(body["systemNames"], serde_json::json!([]));
}
