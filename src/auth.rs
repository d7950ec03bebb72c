//! Bearer credential caching with lazy, single-flight refresh.
//!
//! [`CredentialManager`] keeps at most one access token. Readers take a shared lock and return
//! the cached token while it is outside the refresh buffer; otherwise they queue on an async
//! refresh lock, re-check the cache once they hold it, and only the first caller through the
//! lock talks to the token endpoint. Every waiting caller then observes the fresh token.

mod metrics;
mod secret;

pub use metrics::*;
pub use secret::*;

// self
use crate::{
	_prelude::*,
	context::CallContext,
	obs::{self, Outcome, RequestSpan},
	oauth::TokenExchange,
};

/// Default margin before expiry at which a cached token stops being used.
pub const DEFAULT_REFRESH_BUFFER: Duration = Duration::seconds(60);

/// Cached access token and its absolute expiry.
#[derive(Clone, Debug)]
pub struct Credential {
	/// Bearer token.
	pub token: TokenSecret,
	/// Instant the token endpoint said the token stops working.
	pub expires_at: OffsetDateTime,
}
impl Credential {
	/// Returns `true` while `now < expires_at - buffer`.
	pub fn is_usable_at(&self, now: OffsetDateTime, buffer: Duration) -> bool {
		self.expires_at.checked_sub(buffer).is_some_and(|usable_until| now < usable_until)
	}
}

/// Owns the client's single credential and the exchange that refreshes it.
#[derive(Debug)]
pub struct CredentialManager {
	exchange: TokenExchange,
	state: RwLock<Option<Credential>>,
	refresh_lock: AsyncMutex<()>,
	refresh_buffer: Duration,
	metrics: CredentialMetrics,
}
impl CredentialManager {
	/// Creates a manager with no cached credential.
	pub fn new(exchange: TokenExchange) -> Self {
		Self {
			exchange,
			state: RwLock::new(None),
			refresh_lock: AsyncMutex::new(()),
			refresh_buffer: DEFAULT_REFRESH_BUFFER,
			metrics: CredentialMetrics::default(),
		}
	}

	/// Overrides the refresh buffer (defaults to 60 seconds). Negative values count as zero.
	pub fn with_refresh_buffer(mut self, buffer: Duration) -> Self {
		self.refresh_buffer = if buffer.is_negative() { Duration::ZERO } else { buffer };

		self
	}

	/// Returns a usable token, refreshing it first when needed.
	pub async fn get_token(&self, ctx: &CallContext) -> Result<TokenSecret> {
		if let Some(token) = self.usable_token(OffsetDateTime::now_utc()) {
			return Ok(token);
		}

		self.refresh_token(ctx).await
	}

	/// Obtains a fresh token unless another caller refreshed it while this one waited.
	///
	/// The refresh lock is held across the exchange so concurrent callers collapse into a single
	/// request. Waiting for the lock and the exchange itself both honor `ctx`.
	pub async fn refresh_token(&self, ctx: &CallContext) -> Result<TokenSecret> {
		let _singleflight = ctx.run(self.refresh_lock.lock()).await?;

		if let Some(token) = self.usable_token(OffsetDateTime::now_utc()) {
			return Ok(token);
		}

		let span = RequestSpan::token_exchange(self.exchange.token_url());

		self.metrics.record_attempt();
		obs::record_token_exchange(Outcome::Attempt);

		let result = span
			.instrument(ctx.run(self.exchange.client_credentials()))
			.await
			.and_then(|r| r)
			.and_then(|grant| {
				let expires_at = OffsetDateTime::now_utc().checked_add(grant.expires_in);

				match expires_at {
					Some(expires_at) => Ok((grant, expires_at)),
					None => Err(Error::MalformedTokenResponse {
						reason: "expires_in is out of range".into(),
					}),
				}
			});

		match result {
			Ok((grant, expires_at)) => {
				let credential = Credential { token: grant.access_token, expires_at };
				let token = credential.token.clone();

				*self.state.write() = Some(credential);

				self.metrics.record_success();
				obs::record_token_exchange(Outcome::Success);
				obs::log_token_exchange(Ok(grant.expires_in));

				Ok(token)
			},
			Err(e) => {
				self.metrics.record_failure();
				obs::record_token_exchange(Outcome::Failure);
				obs::log_token_exchange(Err(&e));

				Err(e)
			},
		}
	}

	/// Discards the cached credential so the next call refreshes it.
	pub fn invalidate(&self) {
		if self.state.write().take().is_some() {
			self.metrics.record_invalidation();
		}
	}

	/// Returns a snapshot of the cached credential, usable or not.
	pub fn credential(&self) -> Option<Credential> {
		self.state.read().clone()
	}

	/// Exchange counters.
	pub fn metrics(&self) -> &CredentialMetrics {
		&self.metrics
	}

	/// Margin before expiry at which the token is refreshed.
	pub fn refresh_buffer(&self) -> Duration {
		self.refresh_buffer
	}

	fn usable_token(&self, now: OffsetDateTime) -> Option<TokenSecret> {
		self.state
			.read()
			.as_ref()
			.filter(|credential| credential.is_usable_at(now, self.refresh_buffer))
			.map(|credential| credential.token.clone())
	}
}

#[cfg(test)]
mod tests {
	// std
	use std::sync::atomic::{AtomicUsize, Ordering};
	// self
	use super::*;
	use crate::http::{HttpTransport, TransportFuture};

	struct TokenEndpoint {
		calls: AtomicUsize,
		expires_in: i64,
		delay: StdDuration,
	}
	impl TokenEndpoint {
		fn new(expires_in: i64, delay: StdDuration) -> Arc<Self> {
			Arc::new(Self { calls: AtomicUsize::new(0), expires_in, delay })
		}

		fn calls(&self) -> usize {
			self.calls.load(Ordering::SeqCst)
		}
	}
	impl HttpTransport for TokenEndpoint {
		fn send(&self, _request: oauth2::HttpRequest) -> TransportFuture<'_> {
			Box::pin(async move {
				let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;

				tokio::time::sleep(self.delay).await;

				let body = format!(
					r#"{{"access_token":"token-{n}","token_type":"Bearer","expires_in":{}}}"#,
					self.expires_in
				);
				let response = http::Response::builder()
					.status(200)
					.header("content-type", "application/json")
					.body(body.into_bytes())
					.map_err(crate::error::ConfigError::from)?;

				Ok(response)
			})
		}
	}

	fn manager(endpoint: Arc<TokenEndpoint>) -> CredentialManager {
		let url = Url::parse("https://auth.example.com/v1/oauth2/token")
			.expect("Token URL fixture should parse.");
		let exchange = TokenExchange::new(&url, "client", "secret", endpoint)
			.expect("Exchange should be configured.");

		CredentialManager::new(exchange)
	}

	#[tokio::test]
	async fn token_is_cached_until_the_buffer() {
		let endpoint = TokenEndpoint::new(3_600, StdDuration::ZERO);
		let manager = manager(endpoint.clone());
		let ctx = CallContext::new();
		let first = manager.get_token(&ctx).await.expect("First fetch should succeed.");
		let second = manager.get_token(&ctx).await.expect("Second fetch should succeed.");

		assert_eq!(first.expose(), "token-1");
		assert_eq!(second.expose(), "token-1");
		assert_eq!(endpoint.calls(), 1);
		assert_eq!(manager.metrics().successes(), 1);
	}

	#[tokio::test]
	async fn token_inside_the_buffer_is_refreshed() {
		let endpoint = TokenEndpoint::new(30, StdDuration::ZERO);
		let manager = manager(endpoint.clone());
		let ctx = CallContext::new();

		manager.get_token(&ctx).await.expect("First fetch should succeed.");

		let second = manager.get_token(&ctx).await.expect("Second fetch should succeed.");

		assert_eq!(second.expose(), "token-2");
		assert_eq!(endpoint.calls(), 2);
	}

	#[tokio::test]
	async fn invalidate_forces_a_new_exchange() {
		let endpoint = TokenEndpoint::new(3_600, StdDuration::ZERO);
		let manager = manager(endpoint.clone());
		let ctx = CallContext::new();

		manager.get_token(&ctx).await.expect("First fetch should succeed.");
		manager.invalidate();

		assert!(manager.credential().is_none());

		let token = manager.get_token(&ctx).await.expect("Fetch after invalidation should succeed.");

		assert_eq!(token.expose(), "token-2");
		assert_eq!(manager.metrics().invalidations(), 1);
	}

	#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
	async fn concurrent_callers_share_one_exchange() {
		let endpoint = TokenEndpoint::new(3_600, StdDuration::from_millis(50));
		let manager = Arc::new(manager(endpoint.clone()));
		let mut tasks = tokio::task::JoinSet::new();

		for _ in 0..10 {
			let manager = Arc::clone(&manager);

			tasks.spawn(async move { manager.get_token(&CallContext::new()).await });
		}

		while let Some(joined) = tasks.join_next().await {
			let token = joined.expect("Task should not panic.").expect("Fetch should succeed.");

			assert_eq!(token.expose(), "token-1");
		}

		assert_eq!(endpoint.calls(), 1);
		assert_eq!(manager.metrics().attempts(), 1);
	}

	#[tokio::test]
	async fn unrepresentable_expiry_is_rejected() {
		let endpoint = TokenEndpoint::new(i64::MAX, StdDuration::ZERO);
		let manager = manager(endpoint.clone());
		let err = manager
			.get_token(&CallContext::new())
			.await
			.expect_err("Expiry beyond the calendar should be rejected.");

		assert!(matches!(err, Error::MalformedTokenResponse { .. }));
		assert!(manager.credential().is_none());
		assert_eq!(manager.metrics().failures(), 1);

		// The refresh lock must have been released.
		let err = manager.get_token(&CallContext::new()).await.expect_err("Retry should fail too.");

		assert!(matches!(err, Error::MalformedTokenResponse { .. }));
		assert_eq!(endpoint.calls(), 2);
	}

	#[test]
	fn huge_refresh_buffer_makes_credentials_unusable() {
		let credential = Credential {
			token: TokenSecret::new("t"),
			expires_at: OffsetDateTime::now_utc() + Duration::hours(1),
		};

		assert!(credential.is_usable_at(OffsetDateTime::now_utc(), Duration::seconds(60)));
		assert!(!credential.is_usable_at(OffsetDateTime::now_utc(), Duration::MAX));
	}

	#[tokio::test]
	async fn cancelled_refresh_returns_promptly() {
		let endpoint = TokenEndpoint::new(3_600, StdDuration::from_secs(30));
		let manager = manager(endpoint);
		let ctx = CallContext::new().with_timeout(StdDuration::from_millis(20));
		let err = manager.get_token(&ctx).await.expect_err("Refresh should be interrupted.");

		assert!(matches!(err, Error::DeadlineExceeded));
		assert!(manager.credential().is_none());
	}
}
