// crates.io
use axum::{
	body::{self, Body},
	http::{Request, StatusCode},
	response::Response,
};
use httpmock::prelude::*;
use tower::ServiceExt;
// self
use secure_link_gate::{
	_preludet::*,
	auth::AccessToken,
	gate::Gate,
	notify::NtfyNotifier,
	server::{self, ORIGINAL_URI_HEADER},
	store::{StoreError, StoreFuture, TokenStore},
};

struct BrokenStore;
impl TokenStore for BrokenStore {
	fn read(&self) -> StoreFuture<'_, Option<AccessToken>> {
		Box::pin(async { Err(StoreError::Backend { message: "permission denied".into() }) })
	}

	fn write(&self, _token: AccessToken) -> StoreFuture<'_, ()> {
		Box::pin(async { Err(StoreError::Backend { message: "disk full".into() }) })
	}
}

async fn call(gate: Arc<Gate>, original_uri: Option<&str>) -> Response {
	let mut request = Request::get("/validate");

	if let Some(uri) = original_uri {
		request = request.header(ORIGINAL_URI_HEADER, uri);
	}

	server::router(gate)
		.oneshot(request.body(Body::empty()).expect("Request fixture should build."))
		.await
		.expect("Router should be infallible.")
}

async fn body_text(response: Response) -> String {
	let bytes = body::to_bytes(response.into_body(), usize::MAX)
		.await
		.expect("Response body should be readable.");

	String::from_utf8(bytes.to_vec()).expect("Response body should be UTF-8.")
}

#[tokio::test]
async fn missing_header_defaults_to_root_and_issues() {
	let server = MockServer::start_async().await;
	let topic = server
		.mock_async(|when, then| {
			when.method(POST).path("/gate-topic");
			then.status(200);
		})
		.await;
	let (gate, store) = build_test_gate(&server.url("/gate-topic"));
	let response = call(Arc::new(gate), None).await;

	assert_eq!(response.status(), StatusCode::FORBIDDEN);
	assert_eq!(body_text(response).await, "Access Denied: Token sent via ntfy.");

	let token = store.current().expect("Store should hold the new token.");

	// Delivery runs detached from the response; poll until the alert lands.
	for _ in 0..50 {
		if topic.calls_async().await == 1 {
			break;
		}

		tokio::time::sleep(Duration::from_millis(20)).await;
	}

	topic.assert_calls_async(1).await;
	assert!(!token.expose().is_empty());
}

#[tokio::test]
async fn current_token_gets_empty_ok() {
	let (gate, store) = build_test_gate("http://127.0.0.1:1/gate-topic");
	let token = AccessToken::generate();

	store.write(token.clone()).await.expect("Seeding the store should succeed.");

	let uri = format!("/live/channel.m3u8?secure={}", token.expose());
	let response = call(Arc::new(gate), Some(&uri)).await;

	assert_eq!(response.status(), StatusCode::OK);
	assert!(body_text(response).await.is_empty());
}

#[tokio::test]
async fn wrong_token_gets_plain_text_forbidden() {
	let (gate, store) = build_test_gate("http://127.0.0.1:1/gate-topic");

	store.write(AccessToken::generate()).await.expect("Seeding the store should succeed.");

	let response = call(Arc::new(gate), Some("/live?secure=guess")).await;

	assert_eq!(response.status(), StatusCode::FORBIDDEN);
	assert!(
		response
			.headers()
			.get("content-type")
			.and_then(|v| v.to_str().ok())
			.is_some_and(|v| v.starts_with("text/plain"))
	);
	assert_eq!(body_text(response).await, "Access Denied: Invalid token.");
}

#[tokio::test]
async fn storage_failure_is_an_internal_error() {
	let config = test_config("http://127.0.0.1:1/gate-topic");
	let notifier = NtfyNotifier::new(
		config.notify_url().expect("Test ntfy URL should be valid."),
		config.notify_timeout(),
	)
	.expect("Notifier should build.");
	let gate = Gate::new(&config, Arc::new(BrokenStore), Arc::new(notifier))
		.expect("Gate fixture should build.");
	let gate = Arc::new(gate);
	let with_token = call(gate.clone(), Some("/?secure=abc")).await;
	let without_token = call(gate, Some("/")).await;

	assert_eq!(with_token.status(), StatusCode::INTERNAL_SERVER_ERROR);
	assert_eq!(without_token.status(), StatusCode::INTERNAL_SERVER_ERROR);
	assert_eq!(body_text(without_token).await, "Internal error.");
}
