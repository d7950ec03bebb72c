//! Request orchestration: cache, quota, credential, send, and response classification.
//!
//! [`Client::execute`] is the single entry point every API operation goes through. One call
//! runs through these steps in order:
//!
//! 1. Serve a cached response when the request carries a cache directive that allows lookup.
//! 2. For every attempt, consult the [`RateLimiter`], obtain a bearer token, and send.
//! 3. Classify the response. Transient failures back off and retry; `429` additionally feeds
//!    `Retry-After` into the limiter; `401` discards the credential and restarts the attempt
//!    loop once with a fresh token; `2xx` is decoded and cached.

pub mod builder;
pub mod request;

pub use builder::*;
pub use request::*;

// crates.io
use oauth2::http::{
	HeaderMap,
	header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, RETRY_AFTER},
};
// self
use crate::{
	_prelude::*,
	auth::{CredentialManager, TokenSecret},
	cache::{CacheConfig, ResponseCache},
	context::CallContext,
	error::{ApiError, ConfigError},
	http::{HttpTransport, REQUEST_ID_HEADER, header_value},
	locale::Locale,
	obs::{self, CacheEvent, Outcome, RequestSpan, RetryReason},
	rate_limit::{RateLimitStats, RateLimiter},
	retry::{self, RetryConfig},
};

/// Header carrying the API client identifier.
pub const CLIENT_ID_HEADER: &str = "X-DIGIKEY-Client-Id";
/// Header carrying the locale site.
pub const LOCALE_SITE_HEADER: &str = "X-DIGIKEY-Locale-Site";
/// Header carrying the locale language.
pub const LOCALE_LANGUAGE_HEADER: &str = "X-DIGIKEY-Locale-Language";
/// Header carrying the locale currency.
pub const LOCALE_CURRENCY_HEADER: &str = "X-DIGIKEY-Locale-Currency";

const JSON: &str = "application/json";

/// Classified result of one attempt.
enum Attempt<T> {
	Success(T),
	Retryable(Error, RetryReason),
	Terminal(Error),
	RateLimited { retry_after: i64, error: Error },
	Unauthorized(Error),
}

/// Result of one pass through the attempt loop.
enum Pass<T> {
	Finished(Result<T>),
	Unauthorized(Error),
}

/// Resilient API client.
///
/// The client owns its limiter, credential manager, and cache; share it behind an [`Arc`] to
/// issue calls concurrently.
pub struct Client {
	transport: Arc<dyn HttpTransport>,
	base_url: String,
	client_id: String,
	credentials: CredentialManager,
	rate_limiter: RateLimiter,
	retry: RetryConfig,
	cache: Option<Arc<dyn ResponseCache>>,
	cache_config: CacheConfig,
	locale: RwLock<Locale>,
}
impl Client {
	/// Starts configuring a client for the given API credentials.
	pub fn builder(client_id: impl Into<String>, client_secret: impl Into<String>) -> ClientBuilder {
		ClientBuilder::new(client_id, client_secret)
	}

	/// Runs `request` through the pipeline and decodes the JSON response into `T`.
	pub async fn execute<T>(&self, ctx: &CallContext, request: &ApiRequest) -> Result<T>
	where
		T: DeserializeOwned + Serialize,
	{
		let span = RequestSpan::new(request.method.as_str(), &request.path);

		obs::record_request_outcome(Outcome::Attempt);

		let result = span.instrument(self.execute_inner(ctx, request)).await;

		match &result {
			Ok(_) => obs::record_request_outcome(Outcome::Success),
			Err(_) => obs::record_request_outcome(Outcome::Failure),
		}

		result
	}

	/// Current locale.
	pub fn locale(&self) -> Locale {
		self.locale.read().clone()
	}

	/// Switches the locale for subsequent requests.
	pub fn set_locale(&self, locale: Locale) {
		*self.locale.write() = locale;
	}

	/// Quota usage snapshot.
	pub fn rate_limit_stats(&self) -> RateLimitStats {
		self.rate_limiter.stats()
	}

	/// Quota limiter shared by every call.
	pub fn rate_limiter(&self) -> &RateLimiter {
		&self.rate_limiter
	}

	/// Credential manager shared by every call.
	pub fn credentials(&self) -> &CredentialManager {
		&self.credentials
	}

	/// Active retry policy.
	pub fn retry_config(&self) -> &RetryConfig {
		&self.retry
	}

	/// Active cache configuration.
	pub fn cache_config(&self) -> &CacheConfig {
		&self.cache_config
	}

	/// Response cache, if one is configured.
	pub fn cache(&self) -> Option<&Arc<dyn ResponseCache>> {
		self.cache.as_ref()
	}

	/// Drops every cached response.
	pub fn clear_cache(&self) {
		if let Some(cache) = &self.cache {
			cache.clear();
		}
	}

	/// Base URL requests are resolved against.
	pub fn base_url(&self) -> &str {
		&self.base_url
	}

	async fn execute_inner<T>(&self, ctx: &CallContext, request: &ApiRequest) -> Result<T>
	where
		T: DeserializeOwned + Serialize,
	{
		let cache = self.active_cache(request);

		if let Some((cache, directive)) = cache.filter(|(_, directive)| directive.lookup) {
			match cache.get(&directive.key).map(|bytes| serde_json::from_slice::<T>(&bytes)) {
				Some(Ok(value)) => {
					obs::record_cache_event(CacheEvent::Hit);
					obs::log_cache_event(CacheEvent::Hit, &directive.key);

					return Ok(value);
				},
				_ => {
					obs::record_cache_event(CacheEvent::Miss);
					obs::log_cache_event(CacheEvent::Miss, &directive.key);
				},
			}
		}

		let mut reauthenticated = false;

		loop {
			match self.run_attempts::<T>(ctx, request).await {
				Pass::Finished(result) => {
					let value = result?;

					if let Some((cache, directive)) = cache {
						store(cache, directive, &value);
					}

					return Ok(value);
				},
				Pass::Unauthorized(error) => {
					self.credentials.invalidate();
					obs::log_credential_rejected(!reauthenticated);

					if reauthenticated {
						return Err(error);
					}

					reauthenticated = true;

					obs::record_retry(RetryReason::Reauthenticate);
				},
			}
		}
	}

	async fn run_attempts<T>(&self, ctx: &CallContext, request: &ApiRequest) -> Pass<T>
	where
		T: DeserializeOwned,
	{
		let mut attempt = 0;

		loop {
			let (error, reason) = match self.attempt::<T>(ctx, request).await {
				Attempt::Success(value) => return Pass::Finished(Ok(value)),
				Attempt::Terminal(error) => return Pass::Finished(Err(error)),
				Attempt::Unauthorized(error) => return Pass::Unauthorized(error),
				Attempt::Retryable(error, reason) => (error, reason),
				Attempt::RateLimited { retry_after, error } => {
					obs::log_retry_after(retry_after);
					self.rate_limiter.update_from_response(retry_after);

					(error, RetryReason::RateLimited)
				},
			};

			if attempt >= self.retry.max_retries {
				return Pass::Finished(Err(error));
			}

			attempt += 1;

			let delay = self.retry.calculate_backoff(attempt - 1);

			obs::record_retry(reason);
			obs::log_retry(attempt, delay, reason);

			if let Err(e) = retry::sleep(ctx, delay).await {
				return Pass::Finished(Err(e));
			}
		}
	}

	async fn attempt<T>(&self, ctx: &CallContext, request: &ApiRequest) -> Attempt<T>
	where
		T: DeserializeOwned,
	{
		if let Err(e) = self.rate_limiter.allow() {
			obs::log_rate_limited(&e);

			return Attempt::Terminal(e.into());
		}

		let token = match self.credentials.get_token(ctx).await {
			Ok(token) => token,
			Err(e) => return classify_token_failure(e),
		};
		let http_request = match self.build_request(request, &token) {
			Ok(http_request) => http_request,
			Err(e) => return Attempt::Terminal(e),
		};
		let response = match ctx.run(self.transport.send(http_request)).await {
			Ok(Ok(response)) => response,
			Ok(Err(Error::Transport(e))) =>
				return if retry::should_retry(Some(&e), 0) {
					Attempt::Retryable(e.into(), RetryReason::Transport)
				} else {
					Attempt::Terminal(e.into())
				},
			Ok(Err(e)) | Err(e) => return Attempt::Terminal(e),
		};
		let status = response.status().as_u16();
		let headers = response.headers();
		let body = response.body();

		match status {
			429 => Attempt::RateLimited {
				retry_after: retry::parse_retry_after(
					headers.get(RETRY_AFTER).and_then(|value| value.to_str().ok()),
				),
				error: handle_error_response(status, body, headers),
			},
			401 => Attempt::Unauthorized(
				ApiError {
					status,
					message: "unauthorized".into(),
					details: String::from_utf8_lossy(body).into_owned(),
					request_id: header_value(headers, REQUEST_ID_HEADER),
				}
				.into(),
			),
			200..=299 => match decode::<T>(status, body) {
				Ok(value) => Attempt::Success(value),
				Err(e) => Attempt::Terminal(e),
			},
			_ => {
				let error = handle_error_response(status, body, headers);

				if retry::should_retry(None, status) {
					Attempt::Retryable(error, RetryReason::Status)
				} else {
					Attempt::Terminal(error)
				}
			},
		}
	}

	fn build_request(
		&self,
		request: &ApiRequest,
		token: &TokenSecret,
	) -> Result<http::Request<Vec<u8>>> {
		let locale = self.locale();
		let url = format!("{}{}", self.base_url.trim_end_matches('/'), request.path);

		http::Request::builder()
			.method(request.method.clone())
			.uri(url)
			.header(AUTHORIZATION, token.header_value()?)
			.header(CLIENT_ID_HEADER, self.client_id.as_str())
			.header(LOCALE_SITE_HEADER, locale.site.as_str())
			.header(LOCALE_LANGUAGE_HEADER, locale.language.as_str())
			.header(LOCALE_CURRENCY_HEADER, locale.currency.as_str())
			.header(CONTENT_TYPE, JSON)
			.header(ACCEPT, JSON)
			.body(request.body.clone().unwrap_or_default())
			.map_err(|e| ConfigError::from(e).into())
	}

	fn active_cache<'a>(
		&'a self,
		request: &'a ApiRequest,
	) -> Option<(&'a dyn ResponseCache, &'a CacheDirective)> {
		if !self.cache_config.enabled {
			return None;
		}

		Some((self.cache.as_deref()?, request.cache.as_ref()?))
	}
}
impl Debug for Client {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Client")
			.field("base_url", &self.base_url)
			.field("client_id", &self.client_id)
			.field("locale", &*self.locale.read())
			.field("retry", &self.retry)
			.field("cache_config", &self.cache_config)
			.field("cache_set", &self.cache.is_some())
			.finish()
	}
}

fn classify_token_failure<T>(error: Error) -> Attempt<T> {
	let retryable = match &error {
		Error::Transport(e) => retry::should_retry(Some(e), 0),
		Error::Api(e) => retry::should_retry(None, e.status),
		_ => false,
	};

	if retryable {
		let reason = match error {
			Error::Transport(_) => RetryReason::Transport,
			_ => RetryReason::Status,
		};

		Attempt::Retryable(error, reason)
	} else {
		Attempt::Terminal(error)
	}
}

fn decode<T>(status: u16, body: &[u8]) -> Result<T>
where
	T: DeserializeOwned,
{
	let mut deserializer = serde_json::Deserializer::from_slice(body);

	serde_path_to_error::deserialize(&mut deserializer)
		.map_err(|source| Error::ResponseParse { source, status })
}

fn store<T>(cache: &dyn ResponseCache, directive: &CacheDirective, value: &T)
where
	T: Serialize,
{
	match serde_json::to_vec(value) {
		Ok(bytes) => {
			cache.set(&directive.key, bytes, directive.ttl);
			obs::record_cache_event(CacheEvent::Store);
			obs::log_cache_event(CacheEvent::Store, &directive.key);
		},
		Err(e) => obs::log_cache_store_failure(&directive.key, &e),
	}
}

/// Builds the [`ApiError`] for a non-success response.
///
/// A `{message, details}` body is used verbatim; anything else falls back to the canonical
/// status text with the raw body as details.
pub fn handle_error_response(status: u16, body: &[u8], headers: &HeaderMap) -> Error {
	#[derive(Deserialize)]
	struct ErrorBody {
		#[serde(default)]
		message: String,
		#[serde(default)]
		details: Option<serde_json::Value>,
	}

	let request_id = header_value(headers, REQUEST_ID_HEADER);
	let (message, details) = match serde_json::from_slice::<ErrorBody>(body) {
		Ok(parsed) => (
			parsed.message,
			match parsed.details {
				Some(serde_json::Value::String(details)) => details,
				Some(serde_json::Value::Null) | None => String::new(),
				Some(other) => other.to_string(),
			},
		),
		Err(_) => (
			http::StatusCode::from_u16(status)
				.ok()
				.and_then(|code| code.canonical_reason())
				.unwrap_or("Unknown Status")
				.to_owned(),
			String::from_utf8_lossy(body).into_owned(),
		),
	};

	ApiError { status, message, details, request_id }.into()
}
