// self
use crate::{
	_prelude::*,
	error::RateLimitError,
	obs::{CacheEvent, RetryReason},
};

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedRequest<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedRequest<F> = F;

/// A span wrapping one pipeline call.
#[derive(Clone, Debug)]
pub struct RequestSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl RequestSpan {
	/// Creates a new span tagged with the request method and path.
	pub fn new(method: &str, path: &str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!("digikey_client.request", method, path);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (method, path);

			Self {}
		}
	}

	/// Creates the span used around credential refreshes.
	pub fn token_exchange(token_url: &Url) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span =
				tracing::debug_span!("digikey_client.token_exchange", url = token_url.as_str());

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = token_url;

			Self {}
		}
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedRequest<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}

/// Logs that another attempt was scheduled after `delay`.
pub fn log_retry(attempt: u32, delay: StdDuration, reason: RetryReason) {
	#[cfg(feature = "tracing")]
	tracing::debug!(
		attempt,
		delay_ms = delay.as_millis() as u64,
		reason = reason.as_str(),
		"retrying request"
	);
	#[cfg(not(feature = "tracing"))]
	let _ = (attempt, delay, reason);
}

/// Logs that the local quota refused a request.
pub fn log_rate_limited(err: &RateLimitError) {
	#[cfg(feature = "tracing")]
	tracing::warn!(
		window = err.window.as_str(),
		limit = err.limit,
		reset_at = %err.reset_at,
		"local rate limit exhausted"
	);
	#[cfg(not(feature = "tracing"))]
	let _ = err;
}

/// Logs an upstream `Retry-After` hint applied to the limiter.
pub fn log_retry_after(seconds: i64) {
	#[cfg(feature = "tracing")]
	tracing::warn!(retry_after_secs = seconds, "upstream rate limit hit");
	#[cfg(not(feature = "tracing"))]
	let _ = seconds;
}

/// Logs that the credential was rejected and discarded.
pub fn log_credential_rejected(reauthenticating: bool) {
	#[cfg(feature = "tracing")]
	tracing::debug!(reauthenticating, "credential rejected by upstream");
	#[cfg(not(feature = "tracing"))]
	let _ = reauthenticating;
}

/// Logs a completed token exchange.
pub fn log_token_exchange(result: std::result::Result<Duration, &Error>) {
	#[cfg(feature = "tracing")]
	{
		match result {
			Ok(expires_in) => tracing::debug!(
				expires_in_secs = expires_in.whole_seconds(),
				"access token refreshed"
			),
			Err(e) => tracing::warn!(error = %e, "access token refresh failed"),
		}
	}
	#[cfg(not(feature = "tracing"))]
	let _ = result;
}

/// Logs a response cache event.
pub fn log_cache_event(event: CacheEvent, key: &str) {
	#[cfg(feature = "tracing")]
	tracing::trace!(event = event.as_str(), key, "response cache");
	#[cfg(not(feature = "tracing"))]
	let _ = (event, key);
}

/// Logs a value that could not be written to the response cache.
pub fn log_cache_store_failure(key: &str, err: &serde_json::Error) {
	#[cfg(feature = "tracing")]
	tracing::warn!(key, error = %err, "response could not be cached");
	#[cfg(not(feature = "tracing"))]
	let _ = (key, err);
}
