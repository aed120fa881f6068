// std
use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe counters for the shared refresh flow.
#[derive(Debug, Default)]
pub struct RefreshMetrics {
	attempts: AtomicU64,
	success: AtomicU64,
	failure: AtomicU64,
	joined: AtomicU64,
}
impl RefreshMetrics {
	/// Returns the number of refresh calls actually issued.
	pub fn attempts(&self) -> u64 {
		self.attempts.load(Ordering::Relaxed)
	}

	/// Returns the number of refresh calls that produced a new access token.
	pub fn successes(&self) -> u64 {
		self.success.load(Ordering::Relaxed)
	}

	/// Returns the number of refresh calls that failed.
	pub fn failures(&self) -> u64 {
		self.failure.load(Ordering::Relaxed)
	}

	/// Returns the number of requests that parked behind an in-flight refresh instead of
	/// issuing their own.
	pub fn joined_waiters(&self) -> u64 {
		self.joined.load(Ordering::Relaxed)
	}

	pub(crate) fn record_attempt(&self) {
		self.attempts.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_success(&self) {
		self.success.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_failure(&self) {
		self.failure.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_joined_waiter(&self) {
		self.joined.fetch_add(1, Ordering::Relaxed);
	}
}
