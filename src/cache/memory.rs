//! Thread-safe in-memory [`ResponseCache`] with lazy expiry and a background sweep.

// std
use std::sync::Weak;
// crates.io
use tokio::{task::JoinHandle, time::Instant};
// self
use crate::{_prelude::*, cache::ResponseCache};

type EntryMap = Arc<RwLock<HashMap<String, CacheEntry>>>;

#[derive(Clone, Debug)]
struct CacheEntry {
	value: Vec<u8>,
	// `None` when the TTL reaches past what `Instant` can represent.
	expires_at: Option<Instant>,
}
impl CacheEntry {
	fn is_expired_at(&self, now: Instant) -> bool {
		self.expires_at.is_some_and(|expires_at| now >= expires_at)
	}
}

/// Process-local TTL cache.
///
/// Expired entries are dropped when a lookup observes them and by a sweep task that runs every
/// `cleanup_interval`. The sweep is only started when the cache is created inside a Tokio
/// runtime; it stops when the cache is dropped.
#[derive(Debug)]
pub struct MemoryCache {
	entries: EntryMap,
	sweeper: Option<JoinHandle<()>>,
}
impl MemoryCache {
	/// Creates an empty cache that sweeps expired entries every `cleanup_interval`.
	///
	/// A zero interval disables the sweep; expiry is then purely lazy.
	pub fn new(cleanup_interval: StdDuration) -> Self {
		let entries = EntryMap::default();
		let sweeper = match tokio::runtime::Handle::try_current() {
			Ok(runtime) if !cleanup_interval.is_zero() =>
				Some(runtime.spawn(sweep(Arc::downgrade(&entries), cleanup_interval))),
			_ => None,
		};

		Self { entries, sweeper }
	}

	/// Removes every expired entry, returning how many were dropped.
	pub fn purge_expired(&self) -> usize {
		purge(&self.entries, Instant::now())
	}

	/// Returns `true` when a background sweep is running.
	pub fn is_sweeping(&self) -> bool {
		self.sweeper.as_ref().is_some_and(|handle| !handle.is_finished())
	}
}
impl Default for MemoryCache {
	fn default() -> Self {
		Self::new(crate::cache::DEFAULT_CLEANUP_INTERVAL)
	}
}
impl Drop for MemoryCache {
	fn drop(&mut self) {
		if let Some(handle) = self.sweeper.take() {
			handle.abort();
		}
	}
}
impl ResponseCache for MemoryCache {
	fn get(&self, key: &str) -> Option<Vec<u8>> {
		let now = Instant::now();

		{
			let entries = self.entries.read();

			match entries.get(key) {
				Some(entry) if !entry.is_expired_at(now) => return Some(entry.value.clone()),
				Some(_) => {},
				None => return None,
			}
		}

		let mut entries = self.entries.write();

		// Another writer may have replaced the entry between the two locks.
		if entries.get(key).is_some_and(|entry| entry.is_expired_at(now)) {
			entries.remove(key);
		}

		None
	}

	fn set(&self, key: &str, value: Vec<u8>, ttl: StdDuration) {
		let expires_at = Instant::now().checked_add(ttl);

		self.entries.write().insert(key.to_owned(), CacheEntry { value, expires_at });
	}

	fn delete(&self, key: &str) {
		self.entries.write().remove(key);
	}

	fn clear(&self) {
		self.entries.write().clear();
	}

	fn len(&self) -> usize {
		let now = Instant::now();

		self.entries.read().values().filter(|entry| !entry.is_expired_at(now)).count()
	}
}

fn purge(entries: &RwLock<HashMap<String, CacheEntry>>, now: Instant) -> usize {
	let mut entries = entries.write();
	let before = entries.len();

	entries.retain(|_, entry| !entry.is_expired_at(now));

	before - entries.len()
}

async fn sweep(entries: Weak<RwLock<HashMap<String, CacheEntry>>>, interval: StdDuration) {
	let mut ticker = tokio::time::interval(interval);

	// The first tick completes immediately.
	ticker.tick().await;

	loop {
		ticker.tick().await;

		let Some(entries) = entries.upgrade() else {
			break;
		};

		purge(&entries, Instant::now());
	}
}
