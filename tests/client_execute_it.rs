mod common;

// std
use std::{sync::Arc, time::Duration};
// crates.io
use serde::{Deserialize, Serialize};
// self
use common::{BASE_URL, Scripted, ScriptedTransport, builder};
use digikey_client::{CallContext, Error, ErrorKind, Locale, client::ApiRequest, retry::RetryConfig};

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct Echo {
	value: String,
}

const ECHO: &str = r#"{"value":"ok"}"#;

fn fast_retries(max_retries: u32) -> RetryConfig {
	RetryConfig::default()
		.with_max_retries(max_retries)
		.with_backoff(Duration::from_millis(20), Duration::from_secs(1))
		.with_multiplier(2.0)
		.with_jitter(0.0)
}

#[tokio::test]
async fn unauthorized_response_reauthenticates_once() {
	let transport = ScriptedTransport::new([Scripted::json(401, ""), Scripted::json(200, ECHO)]);
	let client = builder(transport.clone()).build().expect("Client should build.");
	let echo: Echo = client
		.execute(&CallContext::new(), &ApiRequest::get("/echo"))
		.await
		.expect("Second attempt should succeed with a fresh token.");

	assert_eq!(echo.value, "ok");
	assert_eq!(transport.token_calls(), 2);

	let calls = transport.api_calls();

	assert_eq!(calls.len(), 2);
	assert_eq!(calls[0].header("authorization"), Some("Bearer token-1"));
	assert_eq!(calls[1].header("authorization"), Some("Bearer token-2"));
}

#[tokio::test]
async fn reauthentication_does_not_spend_the_retry_budget() {
	let transport = ScriptedTransport::new([Scripted::json(401, ""), Scripted::json(200, ECHO)]);
	let client = builder(transport.clone())
		.retry_config(RetryConfig::disabled())
		.build()
		.expect("Client should build.");
	let echo: Echo = client
		.execute(&CallContext::new(), &ApiRequest::get("/echo"))
		.await
		.expect("Restart after 401 should succeed without any retries configured.");

	assert_eq!(echo.value, "ok");
	assert_eq!(transport.api_call_count(), 2);
	assert_eq!(transport.token_calls(), 2);
}

#[tokio::test]
async fn reauthentication_restarts_with_a_fresh_retry_budget() {
	let transport = ScriptedTransport::new([
		Scripted::json(401, ""),
		Scripted::json(503, ""),
		Scripted::json(200, ECHO),
	]);
	let client = builder(transport.clone())
		.retry_config(fast_retries(1))
		.build()
		.expect("Client should build.");
	let echo: Echo = client
		.execute(&CallContext::new(), &ApiRequest::get("/echo"))
		.await
		.expect("The single retry should remain available after the restart.");

	assert_eq!(echo.value, "ok");
	assert_eq!(transport.api_call_count(), 3);
	assert_eq!(transport.token_calls(), 2);
}

#[tokio::test]
async fn repeated_unauthorized_response_is_returned() {
	let transport = ScriptedTransport::new([
		Scripted::json(401, "").header("x-request-id", "req-1"),
		Scripted::json(401, "").header("x-request-id", "req-2"),
	]);
	let client = builder(transport.clone()).build().expect("Client should build.");
	let err = client
		.execute::<Echo>(&CallContext::new(), &ApiRequest::get("/echo"))
		.await
		.expect_err("Second rejection should surface.");

	assert!(err.is_unauthorized());
	assert_eq!(err.status(), Some(401));
	assert_eq!(transport.token_calls(), 2);
	assert_eq!(transport.api_call_count(), 2);
	assert!(client.credentials().credential().is_none());
}

#[tokio::test]
async fn server_errors_are_retried_with_growing_backoff() {
	let transport = ScriptedTransport::new([
		Scripted::json(503, r#"{"message":"maintenance"}"#),
		Scripted::json(503, r#"{"message":"maintenance"}"#),
		Scripted::json(503, r#"{"message":"maintenance"}"#),
		Scripted::json(503, r#"{"message":"maintenance"}"#),
	]);
	let client = builder(transport.clone())
		.retry_config(fast_retries(3))
		.build()
		.expect("Client should build.");
	let err = client
		.execute::<Echo>(&CallContext::new(), &ApiRequest::get("/echo"))
		.await
		.expect_err("Exhausted retries should surface the last error.");

	assert_eq!(err.kind(), ErrorKind::ServerError);
	assert_eq!(err.status(), Some(503));

	let calls = transport.api_calls();

	assert_eq!(calls.len(), 4);

	for (i, expected) in [20, 40, 80].into_iter().enumerate() {
		let gap = calls[i + 1].at - calls[i].at;

		assert!(gap >= Duration::from_millis(expected), "gap {i} was {gap:?}");
	}
}

#[tokio::test]
async fn transient_failure_then_success() {
	let transport = ScriptedTransport::new([Scripted::json(502, ""), Scripted::json(200, ECHO)]);
	let client = builder(transport.clone())
		.retry_config(fast_retries(3))
		.build()
		.expect("Client should build.");
	let echo: Echo = client
		.execute(&CallContext::new(), &ApiRequest::get("/echo"))
		.await
		.expect("Retry should succeed.");

	assert_eq!(echo, Echo { value: "ok".into() });
	assert_eq!(transport.api_call_count(), 2);
	assert_eq!(transport.token_calls(), 1);
}

#[tokio::test]
async fn client_errors_are_not_retried() {
	let transport = ScriptedTransport::new([Scripted::json(
		404,
		r#"{"message":"Product not found","details":"No match"}"#,
	)]);
	let client = builder(transport.clone())
		.retry_config(fast_retries(3))
		.build()
		.expect("Client should build.");
	let err = client
		.execute::<Echo>(&CallContext::new(), &ApiRequest::get("/echo"))
		.await
		.expect_err("404 should be terminal.");

	match err {
		Error::Api(api) => {
			assert_eq!(api.status, 404);
			assert_eq!(api.message, "Product not found");
			assert_eq!(api.details, "No match");
		},
		other => panic!("Unexpected error: {other:?}."),
	}

	assert_eq!(transport.api_call_count(), 1);
}

#[tokio::test]
async fn retry_after_blocks_further_requests() {
	let transport = ScriptedTransport::new([
		Scripted::json(429, r#"{"message":"Too many requests"}"#).header("retry-after", "30"),
	]);
	let client = builder(transport.clone())
		.retry_config(fast_retries(3))
		.build()
		.expect("Client should build.");
	let err = client
		.execute::<Echo>(&CallContext::new(), &ApiRequest::get("/echo"))
		.await
		.expect_err("Quota hint should stop the call.");

	// The retry is refused by the limiter before it reaches the network.
	assert!(matches!(err, Error::RateLimited(_)));
	assert_eq!(err.kind(), ErrorKind::RateLimitExceeded);
	assert_eq!(transport.api_call_count(), 1);

	let stats = client.rate_limit_stats();

	assert_eq!(stats.minute.remaining, 0);
	assert!(client.rate_limiter().wait_time() > time::Duration::seconds(20));

	let err = client
		.execute::<Echo>(&CallContext::new(), &ApiRequest::get("/echo"))
		.await
		.expect_err("Limiter should refuse locally.");

	assert!(matches!(err, Error::RateLimited(_)));
	assert_eq!(transport.api_call_count(), 1);
}

#[tokio::test]
async fn rate_limited_request_is_retried_once_the_hint_elapses() {
	let transport = ScriptedTransport::new([
		Scripted::json(429, r#"{"message":"Too many requests"}"#).header("retry-after", "1"),
		Scripted::json(200, ECHO),
	]);
	let client = builder(transport.clone())
		.retry_config(
			RetryConfig::default()
				.with_max_retries(1)
				.with_backoff(Duration::from_millis(1_200), Duration::from_secs(2))
				.with_jitter(0.0),
		)
		.build()
		.expect("Client should build.");
	let echo: Echo = client
		.execute(&CallContext::new(), &ApiRequest::get("/echo"))
		.await
		.expect("Retry after the hint should succeed.");

	assert_eq!(echo.value, "ok");

	let calls = transport.api_calls();

	assert_eq!(calls.len(), 2);
	assert!(calls[1].at - calls[0].at >= Duration::from_secs(1));
}

#[tokio::test]
async fn oversized_retry_after_is_capped() {
	let transport = ScriptedTransport::new([
		Scripted::json(429, "").header("retry-after", "99999999999999"),
	]);
	let client = builder(transport.clone())
		.retry_config(fast_retries(1))
		.build()
		.expect("Client should build.");
	let err = client
		.execute::<Echo>(&CallContext::new(), &ApiRequest::get("/echo"))
		.await
		.expect_err("Quota hint should stop the call.");

	assert!(err.is_rate_limited());

	let wait = client.rate_limiter().wait_time();

	assert!(wait > time::Duration::hours(23));
	assert!(wait <= time::Duration::DAY);
}

#[tokio::test]
async fn local_quota_refuses_without_network() {
	let transport = ScriptedTransport::new([]);
	let client =
		builder(transport.clone()).rate_limits(2, 100).build().expect("Client should build.");
	let ctx = CallContext::new();

	for _ in 0..2 {
		client
			.execute::<serde_json::Value>(&ctx, &ApiRequest::get("/echo"))
			.await
			.expect("Calls within quota should succeed.");
	}

	let err = client
		.execute::<serde_json::Value>(&ctx, &ApiRequest::get("/echo"))
		.await
		.expect_err("Third call should be refused.");

	assert!(matches!(err, Error::RateLimited(ref e) if e.limit == 2));
	assert_eq!(transport.api_call_count(), 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_calls_share_one_token_exchange() {
	let transport = ScriptedTransport::new([]).with_token_delay(Duration::from_millis(50));
	let client = Arc::new(builder(transport.clone()).build().expect("Client should build."));
	let mut tasks = tokio::task::JoinSet::new();

	for _ in 0..8 {
		let client = Arc::clone(&client);

		tasks.spawn(async move {
			client.execute::<serde_json::Value>(&CallContext::new(), &ApiRequest::get("/echo")).await
		});
	}

	while let Some(joined) = tasks.join_next().await {
		joined.expect("Task should not panic.").expect("Call should succeed.");
	}

	assert_eq!(transport.token_calls(), 1);
	assert_eq!(transport.api_call_count(), 8);
	assert_eq!(client.rate_limit_stats().minute.used, 8);
}

#[tokio::test]
async fn cached_responses_skip_the_network() {
	let transport = ScriptedTransport::new([Scripted::json(200, ECHO)]);
	let client = builder(transport.clone()).build().expect("Client should build.");
	let ctx = CallContext::new();
	let request = ApiRequest::get("/echo").cached("echo", Duration::from_secs(60));
	let first: Echo = client.execute(&ctx, &request).await.expect("First call should succeed.");
	let second: Echo = client.execute(&ctx, &request).await.expect("Cached call should succeed.");

	assert_eq!(first, second);
	assert_eq!(transport.api_call_count(), 1);

	client.clear_cache();

	let _: serde_json::Value =
		client.execute(&ctx, &request).await.expect("Call after clearing should succeed.");

	assert_eq!(transport.api_call_count(), 2);
}

#[tokio::test]
async fn unbounded_cache_ttl_is_accepted() {
	let transport = ScriptedTransport::new([Scripted::json(200, ECHO)]);
	let client = builder(transport.clone()).build().expect("Client should build.");
	let ctx = CallContext::new();
	let request = ApiRequest::get("/echo").cached("echo", Duration::MAX);
	let _: Echo = client.execute(&ctx, &request).await.expect("First call should succeed.");
	let _: Echo = client.execute(&ctx, &request).await.expect("Cached call should succeed.");

	assert_eq!(transport.api_call_count(), 1);
}

#[tokio::test]
async fn cancellation_interrupts_an_inflight_request() {
	let transport =
		ScriptedTransport::new([Scripted::json(200, ECHO).delayed(Duration::from_secs(30))]);
	let client = builder(transport.clone()).build().expect("Client should build.");
	let ctx = CallContext::new();
	let canceller = ctx.clone();

	tokio::spawn(async move {
		tokio::time::sleep(Duration::from_millis(50)).await;
		canceller.cancel();
	});

	let err = client
		.execute::<Echo>(&ctx, &ApiRequest::get("/echo"))
		.await
		.expect_err("Cancelled call should fail.");

	assert!(matches!(err, Error::Cancelled));
	assert!(err.is_cancelled());
}

#[tokio::test]
async fn deadline_interrupts_backoff() {
	let transport = ScriptedTransport::new([Scripted::json(503, ""), Scripted::json(200, ECHO)]);
	let client = builder(transport.clone())
		.retry_config(
			RetryConfig::default()
				.with_backoff(Duration::from_secs(10), Duration::from_secs(10))
				.with_jitter(0.0),
		)
		.build()
		.expect("Client should build.");
	let ctx = CallContext::new().with_timeout(Duration::from_millis(100));
	let err = client
		.execute::<Echo>(&ctx, &ApiRequest::get("/echo"))
		.await
		.expect_err("Deadline should cut the backoff short.");

	assert!(matches!(err, Error::DeadlineExceeded));
	assert_eq!(transport.api_call_count(), 1);
}

#[tokio::test]
async fn requests_carry_credentials_and_locale_headers() {
	let transport = ScriptedTransport::new([Scripted::json(200, ECHO)]);
	let client = builder(transport.clone())
		.locale(Locale::new("CA", "fr", "CAD"))
		.build()
		.expect("Client should build.");
	let request = ApiRequest::post("/echo")
		.json_body(&serde_json::json!({ "Keywords": "x" }))
		.expect("Body should encode.");
	let _: Echo = client.execute(&CallContext::new(), &request).await.expect("Call should succeed.");
	let call = &transport.api_calls()[0];

	assert_eq!(call.method, "POST");
	assert_eq!(call.uri, format!("{BASE_URL}/echo"));
	assert_eq!(call.header("authorization"), Some("Bearer token-1"));
	assert_eq!(call.header("x-digikey-client-id"), Some("test-client"));
	assert_eq!(call.header("x-digikey-locale-site"), Some("CA"));
	assert_eq!(call.header("x-digikey-locale-language"), Some("fr"));
	assert_eq!(call.header("x-digikey-locale-currency"), Some("CAD"));
	assert_eq!(call.header("content-type"), Some("application/json"));
	assert_eq!(call.header("accept"), Some("application/json"));
	assert_eq!(call.body, br#"{"Keywords":"x"}"#);
}
