// self
use crate::obs::{CacheEvent, Outcome, RetryReason};

/// Records a request outcome via the global metrics recorder (when enabled).
pub fn record_request_outcome(outcome: Outcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!("digikey_client_request_total", "outcome" => outcome.as_str())
			.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = outcome;
	}
}

/// Records a scheduled retry via the global metrics recorder (when enabled).
pub fn record_retry(reason: RetryReason) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!("digikey_client_retry_total", "reason" => reason.as_str()).increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = reason;
	}
}

/// Records a token exchange outcome via the global metrics recorder (when enabled).
pub fn record_token_exchange(outcome: Outcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!("digikey_client_token_exchange_total", "outcome" => outcome.as_str())
			.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = outcome;
	}
}

/// Records a response cache event via the global metrics recorder (when enabled).
pub fn record_cache_event(event: CacheEvent) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!("digikey_client_cache_total", "result" => event.as_str()).increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = event;
	}
}
