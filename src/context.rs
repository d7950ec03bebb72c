//! Per-call cancellation and deadline propagation.
//!
//! Every suspension point in the pipeline (backoff sleeps, the credential refresh lock, token
//! exchanges, and API sends) is raced against the caller's [`CallContext`] so a cancelled call
//! returns promptly instead of waiting for the network.

// crates.io
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
// self
use crate::_prelude::*;

/// Cancellation signal plus optional deadline supplied by the caller.
#[derive(Clone, Debug, Default)]
pub struct CallContext {
	cancel: CancellationToken,
	deadline: Option<Instant>,
}
impl CallContext {
	/// Creates a context that is never cancelled and has no deadline.
	pub fn new() -> Self {
		Self::default()
	}

	/// Wraps an existing cancellation token.
	pub fn from_token(cancel: CancellationToken) -> Self {
		Self { cancel, deadline: None }
	}

	/// Sets the deadline to `timeout` from now. A timeout too large to represent leaves the
	/// context without a deadline.
	pub fn with_timeout(self, timeout: StdDuration) -> Self {
		match Instant::now().checked_add(timeout) {
			Some(deadline) => self.with_deadline(deadline),
			None => self,
		}
	}

	/// Sets an absolute deadline. An earlier deadline already present wins.
	pub fn with_deadline(mut self, deadline: Instant) -> Self {
		self.deadline = Some(match self.deadline {
			Some(current) => current.min(deadline),
			None => deadline,
		});

		self
	}

	/// Fires the cancellation signal for this context and every clone of it.
	pub fn cancel(&self) {
		self.cancel.cancel();
	}

	/// Returns the underlying cancellation token.
	pub fn token(&self) -> &CancellationToken {
		&self.cancel
	}

	/// Returns the deadline, if one was set.
	pub fn deadline(&self) -> Option<Instant> {
		self.deadline
	}

	/// Fails fast when the signal already fired.
	pub fn check(&self) -> Result<()> {
		if self.cancel.is_cancelled() {
			return Err(Error::Cancelled);
		}
		if self.deadline.is_some_and(|deadline| Instant::now() >= deadline) {
			return Err(Error::DeadlineExceeded);
		}

		Ok(())
	}

	/// Resolves once the context is cancelled or its deadline passes, yielding the matching error.
	pub async fn done(&self) -> Error {
		match self.deadline {
			Some(deadline) => tokio::select! {
				biased;
				_ = self.cancel.cancelled() => Error::Cancelled,
				_ = tokio::time::sleep_until(deadline) => Error::DeadlineExceeded,
			},
			None => {
				self.cancel.cancelled().await;

				Error::Cancelled
			},
		}
	}

	/// Drives `fut` to completion unless the context fires first.
	pub async fn run<F>(&self, fut: F) -> Result<F::Output>
	where
		F: Future,
	{
		self.check()?;

		tokio::select! {
			biased;
			err = self.done() => Err(err),
			output = fut => Ok(output),
		}
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[tokio::test]
	async fn run_returns_output_when_not_cancelled() {
		let ctx = CallContext::new();
		let value = ctx.run(async { 7 }).await.expect("Uncancelled context should run the future.");

		assert_eq!(value, 7);
	}

	#[tokio::test]
	async fn cancelled_context_fails_fast() {
		let ctx = CallContext::new();

		ctx.cancel();

		assert!(matches!(ctx.check(), Err(Error::Cancelled)));
		assert!(matches!(ctx.run(async { 7 }).await, Err(Error::Cancelled)));
	}

	#[tokio::test]
	async fn cancellation_interrupts_pending_future() {
		let ctx = CallContext::new();
		let trigger = ctx.clone();

		tokio::spawn(async move {
			tokio::time::sleep(StdDuration::from_millis(20)).await;
			trigger.cancel();
		});

		let started = Instant::now();
		let result = ctx.run(tokio::time::sleep(StdDuration::from_secs(30))).await;

		assert!(matches!(result, Err(Error::Cancelled)));
		assert!(started.elapsed() < StdDuration::from_secs(5));
	}

	#[tokio::test]
	async fn deadline_interrupts_pending_future() {
		let ctx = CallContext::new().with_timeout(StdDuration::from_millis(20));
		let result = ctx.run(tokio::time::sleep(StdDuration::from_secs(30))).await;

		assert!(matches!(result, Err(Error::DeadlineExceeded)));
	}

	#[test]
	fn earlier_deadline_wins() {
		let now = Instant::now();
		let ctx = CallContext::new()
			.with_deadline(now + StdDuration::from_secs(5))
			.with_deadline(now + StdDuration::from_secs(60));

		assert_eq!(ctx.deadline(), Some(now + StdDuration::from_secs(5)));
	}

	#[test]
	fn unrepresentable_timeout_sets_no_deadline() {
		let ctx = CallContext::new().with_timeout(StdDuration::MAX);

		assert_eq!(ctx.deadline(), None);
		assert!(ctx.check().is_ok());

		let now = Instant::now();
		let ctx = CallContext::new()
			.with_deadline(now + StdDuration::from_secs(5))
			.with_timeout(StdDuration::MAX);

		assert_eq!(ctx.deadline(), Some(now + StdDuration::from_secs(5)));
	}
}
