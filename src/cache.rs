//! TTL response cache contract and the built-in in-memory implementation.

pub mod key;
pub mod memory;

pub use key::*;
pub use memory::MemoryCache;

// self
use crate::_prelude::*;

/// Default lifetime of cached keyword search responses.
pub const DEFAULT_SEARCH_TTL: StdDuration = StdDuration::from_secs(5 * 60);
/// Default lifetime of cached product details.
pub const DEFAULT_DETAILS_TTL: StdDuration = StdDuration::from_secs(60 * 60);
/// Default interval between background expiry sweeps.
pub const DEFAULT_CLEANUP_INTERVAL: StdDuration = StdDuration::from_secs(5 * 60);

/// Storage contract for serialized API responses keyed by request identity.
///
/// Implementations must treat an entry whose expiry has passed as absent, whether or not it has
/// been physically removed yet.
pub trait ResponseCache
where
	Self: Send + Sync,
{
	/// Returns the stored bytes for `key` unless the entry is missing or expired.
	fn get(&self, key: &str) -> Option<Vec<u8>>;

	/// Stores `value` under `key` for `ttl`, replacing any previous entry.
	fn set(&self, key: &str, value: Vec<u8>, ttl: StdDuration);

	/// Removes the entry for `key`, if any.
	fn delete(&self, key: &str);

	/// Removes every entry.
	fn clear(&self);

	/// Number of live entries.
	fn len(&self) -> usize;

	/// Returns `true` when no live entry remains.
	fn is_empty(&self) -> bool {
		self.len() == 0
	}
}

/// Cache behavior applied by the client.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CacheConfig {
	/// Master switch; when `false` no lookups or stores happen.
	pub enabled: bool,
	/// Lifetime of keyword search responses.
	pub search_ttl: StdDuration,
	/// Lifetime of product detail responses.
	pub details_ttl: StdDuration,
	/// Interval between background sweeps of the built-in cache.
	pub cleanup_interval: StdDuration,
}
impl CacheConfig {
	/// Configuration with caching switched off.
	pub fn disabled() -> Self {
		Self { enabled: false, ..Default::default() }
	}

	/// Overrides the search response lifetime.
	pub fn with_search_ttl(mut self, ttl: StdDuration) -> Self {
		self.search_ttl = ttl;

		self
	}

	/// Overrides the product details lifetime.
	pub fn with_details_ttl(mut self, ttl: StdDuration) -> Self {
		self.details_ttl = ttl;

		self
	}

	/// Overrides the sweep interval.
	pub fn with_cleanup_interval(mut self, interval: StdDuration) -> Self {
		self.cleanup_interval = interval;

		self
	}
}
impl Default for CacheConfig {
	fn default() -> Self {
		Self {
			enabled: true,
			search_ttl: DEFAULT_SEARCH_TTL,
			details_ttl: DEFAULT_DETAILS_TTL,
			cleanup_interval: DEFAULT_CLEANUP_INTERVAL,
		}
	}
}
