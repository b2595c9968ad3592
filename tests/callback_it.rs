// crates.io
use httpmock::prelude::*;
use serde_json::json;
// self
use goal_tracker::{
	_preludet::*,
	flows::{AuthOrchestrator, AuthResult, AuthState, CallbackOutcome},
	store::{ACCESS_TOKEN_KEY, ATHLETE_KEY, KeyValueStore, REFRESH_TOKEN_KEY, load_session},
};

fn callback_url(query: &str) -> Url {
	Url::parse(&format!("https://app.example.com/callback{query}"))
		.expect("Callback fixture should parse.")
}

async fn mock_token_success(server: &MockServer) -> httpmock::Mock<'_> {
	server
		.mock_async(|when, then| {
			when.method(POST).path("/oauth/token").form_urlencoded_tuple("code", "good-code");
			then.status(200).header("content-type", "application/json").body(
				"{\"token_type\":\"Bearer\",\"access_token\":\"access-cb\",\
				\"refresh_token\":\"refresh-cb\",\"expires_in\":21600}",
			);
		})
		.await
}

#[tokio::test]
async fn callback_without_code_stays_awaiting_and_returns_authorize_url() {
	let server = MockServer::start_async().await;
	let (mut orchestrator, store) =
		build_test_orchestrator(&server.base_url()).expect("Orchestrator should build.");
	let any = server
		.mock_async(|_, then| {
			then.status(500);
		})
		.await;
	let outcome = orchestrator.initialize(&callback_url("?code=")).await;
	let CallbackOutcome::AwaitingCallback { authorize_url } = outcome else {
		panic!("A URL without a code must not complete the callback.");
	};
	let pairs: HashMap<_, _> = authorize_url.query_pairs().into_owned().collect();

	assert_eq!(authorize_url.path(), "/oauth/authorize");
	assert_eq!(pairs.get("client_id").map(String::as_str), Some(TEST_CLIENT_ID));
	assert_eq!(pairs.get("approval_prompt").map(String::as_str), Some("force"));
	assert_eq!(orchestrator.state(), &AuthState::AwaitingCallback);
	assert!(store.is_empty());

	any.assert_calls_async(0).await;
}

#[tokio::test]
async fn callback_with_code_persists_session_and_authenticates() {
	let server = MockServer::start_async().await;
	let (mut orchestrator, store) =
		build_test_orchestrator(&server.base_url()).expect("Orchestrator should build.");
	let token = mock_token_success(&server).await;
	let profile = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/v3/athlete").header("authorization", "Bearer access-cb");
			then.status(200).json_body(json!({
				"id": TEST_ATHLETE_ID,
				"firstname": "Jack",
				"lastname": "Toohey",
				"city": null,
				"state": "MA",
				"profile": "https://img.example.com/large.jpg",
				"profile_medium": "https://img.example.com/medium.jpg",
			}));
		})
		.await;
	let outcome = orchestrator.initialize(&callback_url("?state=&code=good-code&scope=read")).await;

	token.assert_async().await;
	profile.assert_async().await;

	let CallbackOutcome::Completed(AuthResult::Success(session)) = outcome else {
		panic!("Callback should complete successfully.");
	};

	assert_eq!(session.athlete.name, "Jack Toohey");
	assert_eq!(session.tokens.access_token.expose(), "access-cb");
	assert!(matches!(orchestrator.state(), AuthState::Authenticated(_)));
	assert_eq!(
		store.get(ACCESS_TOKEN_KEY).await.expect("Read should succeed.").as_deref(),
		Some("access-cb")
	);
	assert_eq!(
		store.get(REFRESH_TOKEN_KEY).await.expect("Read should succeed.").as_deref(),
		Some("refresh-cb")
	);

	let athlete_json = store
		.get(ATHLETE_KEY)
		.await
		.expect("Read should succeed.")
		.expect("Athlete entry should be persisted.");
	let athlete: serde_json::Value =
		serde_json::from_str(&athlete_json).expect("Athlete entry should be JSON.");

	assert_eq!(athlete["id"], TEST_ATHLETE_ID);
	assert_eq!(athlete["state"], "MA");
	assert!(athlete["city"].is_null());

	let restored = load_session(store.as_ref())
		.await
		.expect("Session should load.")
		.expect("Session should be complete.");

	assert_eq!(restored.athlete, session.athlete);

	// A second load with the same code must not hit the provider again.
	let again = orchestrator.initialize(&callback_url("?code=good-code")).await;

	assert!(matches!(again, CallbackOutcome::Completed(AuthResult::Success(_))));

	token.assert_calls_async(1).await;
	profile.assert_calls_async(1).await;
}

#[tokio::test]
async fn failed_exchange_becomes_structured_failure() {
	let server = MockServer::start_async().await;
	let (mut orchestrator, store) =
		build_test_orchestrator(&server.base_url()).expect("Orchestrator should build.");
	let token = server
		.mock_async(|when, then| {
			when.method(POST).path("/oauth/token");
			then.status(400)
				.header("content-type", "application/json")
				.body("{\"message\":\"Bad Request\",\"errors\":[]}");
		})
		.await;
	let outcome = orchestrator.initialize(&callback_url("?code=used-code")).await;

	token.assert_async().await;

	let CallbackOutcome::Completed(result) = outcome else {
		panic!("A code must complete the callback attempt.");
	};

	assert_eq!(
		serde_json::to_value(&result).expect("Result should serialize."),
		json!({ "success": false, "error": "Failed to get access token: Bad Request" })
	);
	assert_eq!(orchestrator.state(), &AuthState::AwaitingCallback);
	assert!(store.is_empty());
}

#[tokio::test]
async fn failed_profile_fetch_persists_nothing() {
	let server = MockServer::start_async().await;
	let (mut orchestrator, store) =
		build_test_orchestrator(&server.base_url()).expect("Orchestrator should build.");
	let token = mock_token_success(&server).await;
	let profile = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/v3/athlete");
			then.status(401).json_body(json!({"message": "Authorization Error"}));
		})
		.await;
	let outcome = orchestrator.initialize(&callback_url("?code=good-code")).await;

	token.assert_async().await;
	profile.assert_async().await;

	assert_eq!(
		outcome,
		CallbackOutcome::Completed(AuthResult::Failure {
			error: "Failed to fetch athlete profile: Unauthorized".into(),
		})
	);
	assert!(orchestrator.session().is_none());
	assert!(store.is_empty());
}

#[tokio::test]
async fn restore_and_sign_out_follow_the_store() {
	let server = MockServer::start_async().await;
	let (mut orchestrator, store) =
		build_test_orchestrator(&server.base_url()).expect("Orchestrator should build.");
	let token = mock_token_success(&server).await;
	let profile = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/v3/athlete");
			then.status(200).json_body(json!({"id": 7, "firstname": "Ada", "lastname": "Walker"}));
		})
		.await;
	let outcome = orchestrator.initialize(&callback_url("?code=good-code")).await;

	assert!(matches!(outcome, CallbackOutcome::Completed(AuthResult::Success(_))));

	token.assert_async().await;
	profile.assert_async().await;

	let shared: Arc<dyn KeyValueStore> = store.clone();
	let mut restored = AuthOrchestrator::restore(orchestrator.tracker().clone(), shared)
		.await
		.expect("Restore should succeed.");

	assert_eq!(restored.session().map(|s| s.athlete.id), Some(7));

	restored.sign_out().await.expect("Sign out should succeed.");

	assert_eq!(restored.state(), &AuthState::AwaitingCallback);
	assert!(store.is_empty());
}
