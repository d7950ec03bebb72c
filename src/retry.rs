//! Exponential backoff and retry classification.

// crates.io
use rand::Rng;
// self
use crate::{_prelude::*, context::CallContext, error::TransportError};

/// Statuses that signal a transient upstream condition.
pub const RETRYABLE_STATUSES: [u16; 5] = [429, 500, 502, 503, 504];

/// Backoff schedule applied between attempts of one request.
#[derive(Clone, Debug, PartialEq)]
pub struct RetryConfig {
	/// Retries after the first attempt; `0` disables retrying.
	pub max_retries: u32,
	/// Delay before the first retry.
	pub initial_backoff: StdDuration,
	/// Upper bound on any single delay before jitter is applied.
	pub max_backoff: StdDuration,
	/// Growth factor per attempt; values below `1.0` are treated as `1.0`.
	pub multiplier: f64,
	/// Jitter fraction in `[0, 1]`; each delay moves uniformly within `± jitter × delay`.
	pub jitter: f64,
}
impl RetryConfig {
	/// Configuration that performs a single attempt.
	pub fn disabled() -> Self {
		Self { max_retries: 0, ..Default::default() }
	}

	/// Overrides the retry budget.
	pub fn with_max_retries(mut self, max_retries: u32) -> Self {
		self.max_retries = max_retries;

		self
	}

	/// Overrides the initial and maximum delays.
	pub fn with_backoff(mut self, initial: StdDuration, max: StdDuration) -> Self {
		self.initial_backoff = initial;
		self.max_backoff = max;

		self
	}

	/// Overrides the growth factor.
	pub fn with_multiplier(mut self, multiplier: f64) -> Self {
		self.multiplier = multiplier;

		self
	}

	/// Overrides the jitter fraction.
	pub fn with_jitter(mut self, jitter: f64) -> Self {
		self.jitter = jitter;

		self
	}

	/// Delay to wait before retry number `attempt + 1` (`attempt` is zero-based).
	///
	/// Computes `min(max_backoff, initial_backoff × multiplier^attempt)` and then shifts it by a
	/// uniformly drawn offset in `± jitter × delay`, never going below zero. With `jitter == 0`
	/// the result is exact.
	pub fn calculate_backoff(&self, attempt: u32) -> StdDuration {
		let multiplier = if self.multiplier.is_finite() { self.multiplier.max(1.0) } else { 1.0 };
		let initial = self.initial_backoff.as_nanos() as f64;
		let max = self.max_backoff.as_nanos() as f64;
		let exponent = i32::try_from(attempt).unwrap_or(i32::MAX);
		let base = initial * multiplier.powi(exponent);
		let capped = if base.is_finite() { base.min(max) } else { max };
		let jitter = if self.jitter.is_finite() { self.jitter.clamp(0.0, 1.0) } else { 0.0 };
		let delay = if jitter > 0.0 {
			let offset = capped * jitter * rand::rng().random_range(-1.0..=1.0);

			(capped + offset).max(0.0)
		} else {
			capped
		};

		StdDuration::from_nanos(delay as u64)
	}
}
impl Default for RetryConfig {
	fn default() -> Self {
		Self {
			max_retries: 3,
			initial_backoff: StdDuration::from_millis(500),
			max_backoff: StdDuration::from_secs(30),
			multiplier: 2.0,
			jitter: 0.1,
		}
	}
}

/// Returns `true` when a failed attempt is worth repeating.
///
/// A transport failure qualifies when it is a timeout or otherwise temporary; a status
/// qualifies when it is 429 or one of the transient 5xx codes. `401` is never retryable here,
/// re-authentication is handled by the request pipeline.
pub fn should_retry(transport_error: Option<&TransportError>, status: u16) -> bool {
	if transport_error.is_some_and(|e| e.is_timeout() || e.is_temporary()) {
		return true;
	}

	RETRYABLE_STATUSES.contains(&status)
}

/// Sleeps for `duration` unless the context fires first.
pub async fn sleep(ctx: &CallContext, duration: StdDuration) -> Result<()> {
	if duration.is_zero() {
		return ctx.check();
	}

	ctx.run(tokio::time::sleep(duration)).await
}

/// Parses a `Retry-After` header expressed in whole seconds; anything else yields `0`.
pub fn parse_retry_after(header: Option<&str>) -> i64 {
	header.and_then(|raw| raw.trim().parse::<i64>().ok()).unwrap_or(0)
}
