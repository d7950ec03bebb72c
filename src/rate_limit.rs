//! Dual fixed-window quota accounting (per minute and per day).
//!
//! The limiter is a pure in-memory counter: it never sleeps or performs I/O. Every operation
//! has an `*_at` twin that takes the current instant explicitly so window arithmetic can be
//! exercised deterministically.

// self
use crate::{_prelude::*, error::RateLimitError};

/// Default requests allowed per minute.
pub const DEFAULT_MINUTE_LIMIT: u32 = 120;
/// Default requests allowed per day.
pub const DEFAULT_DAY_LIMIT: u32 = 1_000;
/// Longest upstream `Retry-After` hint honored; larger hints are capped to it.
pub const MAX_RETRY_AFTER: Duration = Duration::DAY;

/// Identifies one of the two quota windows.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RateWindowKind {
	/// Sixty-second window.
	Minute,
	/// Twenty-four-hour window.
	Day,
}
impl RateWindowKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Minute => "minute",
			Self::Day => "day",
		}
	}

	/// Length of the window.
	pub const fn duration(self) -> Duration {
		match self {
			Self::Minute => Duration::MINUTE,
			Self::Day => Duration::DAY,
		}
	}
}
impl Display for RateWindowKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Fixed counting window that resets lazily once `reset_at` has passed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RateWindow {
	/// Requests counted in the current window.
	pub count: u32,
	/// Requests allowed per window.
	pub limit: u32,
	/// Instant at which the window resets.
	pub reset_at: OffsetDateTime,
	kind: RateWindowKind,
}
impl RateWindow {
	fn new(kind: RateWindowKind, limit: u32, now: OffsetDateTime) -> Self {
		Self { count: 0, limit, reset_at: now + kind.duration(), kind }
	}

	fn is_due(&self, now: OffsetDateTime) -> bool {
		now >= self.reset_at
	}

	fn roll(&mut self, now: OffsetDateTime) {
		if self.is_due(now) {
			self.count = 0;
			self.reset_at = now + self.kind.duration();
		}
	}

	fn is_exhausted(&self) -> bool {
		self.count >= self.limit
	}

	fn snapshot(&self, now: OffsetDateTime) -> WindowStats {
		let (used, reset_at) = if self.is_due(now) {
			(0, now + self.kind.duration())
		} else {
			(self.count, self.reset_at)
		};

		WindowStats { limit: self.limit, used, remaining: self.limit.saturating_sub(used), reset_at }
	}

	fn refusal(&self) -> RateLimitError {
		RateLimitError {
			limit: self.limit,
			remaining: self.limit.saturating_sub(self.count),
			reset_at: self.reset_at,
			window: self.kind,
		}
	}
}

/// Usage snapshot of a single window.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WindowStats {
	/// Requests allowed per window.
	pub limit: u32,
	/// Requests counted in the current window.
	pub used: u32,
	/// Requests left before the window refuses.
	pub remaining: u32,
	/// Instant at which the window resets.
	pub reset_at: OffsetDateTime,
}

/// Usage snapshot of both windows.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RateLimitStats {
	/// Per-minute window.
	pub minute: WindowStats,
	/// Per-day window.
	pub day: WindowStats,
}

#[derive(Debug)]
struct Windows {
	minute: RateWindow,
	day: RateWindow,
}
impl Windows {
	fn roll(&mut self, now: OffsetDateTime) {
		self.minute.roll(now);
		self.day.roll(now);
	}
}

/// Thread-safe dual-window limiter guarded by a single lock.
#[derive(Debug)]
pub struct RateLimiter {
	inner: Mutex<Windows>,
}
impl RateLimiter {
	/// Creates a limiter with the default quotas (120/minute, 1000/day).
	pub fn new() -> Self {
		Self::with_limits(DEFAULT_MINUTE_LIMIT, DEFAULT_DAY_LIMIT)
	}

	/// Creates a limiter with custom quotas.
	pub fn with_limits(minute_limit: u32, day_limit: u32) -> Self {
		Self::with_limits_at(minute_limit, day_limit, OffsetDateTime::now_utc())
	}

	/// Creates a limiter whose windows start at `now`.
	pub fn with_limits_at(minute_limit: u32, day_limit: u32, now: OffsetDateTime) -> Self {
		Self {
			inner: Mutex::new(Windows {
				minute: RateWindow::new(RateWindowKind::Minute, minute_limit, now),
				day: RateWindow::new(RateWindowKind::Day, day_limit, now),
			}),
		}
	}

	/// Counts one request against both windows, or refuses it.
	pub fn allow(&self) -> Result<(), RateLimitError> {
		self.allow_at(OffsetDateTime::now_utc())
	}

	/// [`allow`](Self::allow) evaluated at `now`.
	///
	/// The minute window is checked first, so a refusal names it whenever both are exhausted.
	/// A refused request does not count against either window.
	pub fn allow_at(&self, now: OffsetDateTime) -> Result<(), RateLimitError> {
		let mut windows = self.inner.lock();

		windows.roll(now);

		if windows.minute.is_exhausted() {
			return Err(windows.minute.refusal());
		}
		if windows.day.is_exhausted() {
			return Err(windows.day.refusal());
		}

		windows.minute.count += 1;
		windows.day.count += 1;

		Ok(())
	}

	/// Reports usage without mutating any counter.
	pub fn stats(&self) -> RateLimitStats {
		self.stats_at(OffsetDateTime::now_utc())
	}

	/// [`stats`](Self::stats) evaluated at `now`; due windows are reported as already reset.
	pub fn stats_at(&self, now: OffsetDateTime) -> RateLimitStats {
		let windows = self.inner.lock();

		RateLimitStats { minute: windows.minute.snapshot(now), day: windows.day.snapshot(now) }
	}

	/// Time until the next request would be allowed; zero when both windows have headroom.
	pub fn wait_time(&self) -> Duration {
		self.wait_time_at(OffsetDateTime::now_utc())
	}

	/// [`wait_time`](Self::wait_time) evaluated at `now`.
	pub fn wait_time_at(&self, now: OffsetDateTime) -> Duration {
		let windows = self.inner.lock();

		[&windows.minute, &windows.day]
			.into_iter()
			.filter(|window| !window.is_due(now) && window.is_exhausted())
			.map(|window| window.reset_at - now)
			.max()
			.unwrap_or(Duration::ZERO)
	}

	/// Applies an upstream `Retry-After` hint by exhausting the minute window until it elapses.
	pub fn update_from_response(&self, retry_after_secs: i64) {
		self.update_from_response_at(retry_after_secs, OffsetDateTime::now_utc());
	}

	/// [`update_from_response`](Self::update_from_response) evaluated at `now`. Non-positive
	/// hints are ignored and hints beyond [`MAX_RETRY_AFTER`] are capped.
	pub fn update_from_response_at(&self, retry_after_secs: i64, now: OffsetDateTime) {
		if retry_after_secs <= 0 {
			return;
		}

		let hint = Duration::seconds(retry_after_secs.min(MAX_RETRY_AFTER.whole_seconds()));
		let mut windows = self.inner.lock();

		windows.minute.count = windows.minute.limit;
		windows.minute.reset_at = now.checked_add(hint).unwrap_or(now);
	}
}
impl Default for RateLimiter {
	fn default() -> Self {
		Self::new()
	}
}
