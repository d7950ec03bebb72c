//! Optional observability helpers for the request pipeline.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to wrap every request in a span named `digikey_client.request` with the
//!   `method` and `path` fields, and to log retries, quota refusals, token exchanges, and cache
//!   traffic as events.
//! - Enable `metrics` to increment the `digikey_client_request_total`,
//!   `digikey_client_retry_total`, `digikey_client_token_exchange_total`, and
//!   `digikey_client_cache_total` counters.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Outcome labels recorded for requests and token exchanges.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Outcome {
	/// Entry to a pipeline operation.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl Outcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			Outcome::Attempt => "attempt",
			Outcome::Success => "success",
			Outcome::Failure => "failure",
		}
	}
}
impl Display for Outcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Why the pipeline scheduled another attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RetryReason {
	/// Timeout or temporary network failure.
	Transport,
	/// Upstream answered 429.
	RateLimited,
	/// Upstream answered with a transient 5xx status.
	Status,
	/// Credential was rejected and the loop restarts with a fresh token.
	Reauthenticate,
}
impl RetryReason {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			RetryReason::Transport => "transport",
			RetryReason::RateLimited => "rate_limited",
			RetryReason::Status => "status",
			RetryReason::Reauthenticate => "reauthenticate",
		}
	}
}
impl Display for RetryReason {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Response cache events.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CacheEvent {
	/// Lookup returned a usable value.
	Hit,
	/// Lookup found nothing usable.
	Miss,
	/// A fresh response was stored.
	Store,
}
impl CacheEvent {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			CacheEvent::Hit => "hit",
			CacheEvent::Miss => "miss",
			CacheEvent::Store => "store",
		}
	}
}
impl Display for CacheEvent {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
