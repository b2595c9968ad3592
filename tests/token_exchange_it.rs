// crates.io
use httpmock::prelude::*;
// self
use goal_tracker::{_preludet::*, error::RequestError};

#[tokio::test]
async fn exchange_posts_form_credentials_and_returns_token_pair() {
	let server = MockServer::start_async().await;
	let tracker = build_test_tracker(&server.base_url()).expect("Tracker should build.");
	let mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/oauth/token")
				.header("content-type", "application/x-www-form-urlencoded")
				.form_urlencoded_tuple("client_id", TEST_CLIENT_ID)
				.form_urlencoded_tuple("client_secret", TEST_CLIENT_SECRET)
				.form_urlencoded_tuple("code", "valid-code")
				.form_urlencoded_tuple("grant_type", "authorization_code");
			then.status(200).header("content-type", "application/json").body(
				"{\"token_type\":\"Bearer\",\"expires_at\":1735689600,\"expires_in\":21600,\
				\"access_token\":\"access-success\",\"refresh_token\":\"refresh-success\",\
				\"athlete\":{\"id\":42}}",
			);
		})
		.await;
	let tokens = tracker.exchange_code("valid-code").await.expect("Exchange should succeed.");

	mock.assert_async().await;

	assert_eq!(tokens.access_token.expose(), "access-success");
	assert_eq!(tokens.refresh_token.expose(), "refresh-success");
}

#[tokio::test]
async fn token_body_without_token_type_is_accepted() {
	let server = MockServer::start_async().await;
	let tracker = build_test_tracker(&server.base_url()).expect("Tracker should build.");
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/oauth/token").form_urlencoded_tuple("code", "bare-code");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"access_token\":\"a\",\"refresh_token\":\"r\"}");
		})
		.await;
	let tokens = tracker
		.exchange_code("bare-code")
		.await
		.expect("A body without token_type should still exchange.");

	mock.assert_async().await;

	assert_eq!(tokens.access_token.expose(), "a");
	assert_eq!(tokens.refresh_token.expose(), "r");
}

#[tokio::test]
async fn unauthorized_exchange_reports_status_text() {
	let server = MockServer::start_async().await;
	let tracker = build_test_tracker(&server.base_url()).expect("Tracker should build.");
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/oauth/token");
			then.status(401).header("content-type", "application/json").body(
				"{\"message\":\"Authorization Error\",\"errors\":[{\"resource\":\"Application\",\
				\"field\":\"client_id\",\"code\":\"invalid\"}]}",
			);
		})
		.await;
	let err = tracker.exchange_code("stale-code").await.expect_err("401 must fail the exchange.");

	mock.assert_async().await;

	assert!(matches!(err, Error::Auth(RequestError::Status { status: 401, .. })));
	assert_eq!(err.status(), Some(401));
	assert!(err.to_string().contains("Unauthorized"));
	assert_eq!(err.to_string(), "Failed to get access token: Unauthorized");
}

#[tokio::test]
async fn missing_refresh_token_is_reported() {
	let server = MockServer::start_async().await;
	let tracker = build_test_tracker(&server.base_url()).expect("Tracker should build.");
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/oauth/token");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"token_type\":\"Bearer\",\"access_token\":\"only-access\"}");
		})
		.await;
	let err = tracker.exchange_code("code").await.expect_err("Exchange should fail.");

	mock.assert_async().await;

	assert!(matches!(
		err,
		Error::Auth(RequestError::MissingField { field: "refresh_token" })
	));
}

#[tokio::test]
async fn empty_code_is_rejected_without_a_request() {
	let server = MockServer::start_async().await;
	let tracker = build_test_tracker(&server.base_url()).expect("Tracker should build.");
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/oauth/token");
			then.status(200);
		})
		.await;
	let err = tracker.exchange_code("").await.expect_err("Empty codes must be rejected.");

	assert!(matches!(err, Error::Auth(RequestError::MissingField { field: "code" })));

	mock.assert_calls_async(0).await;
}

#[tokio::test]
async fn unreachable_token_endpoint_is_a_transport_error() {
	let tracker = build_test_tracker("http://127.0.0.1:1").expect("Tracker should build.");
	let err = tracker.exchange_code("code").await.expect_err("Closed port must fail.");

	assert!(matches!(err, Error::Auth(RequestError::Transport(_))));
	assert!(err.to_string().starts_with("Failed to get access token:"));
}
