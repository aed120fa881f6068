//! Optional observability helpers for client flows.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `greencare_client.flow` with the `flow`
//!   (dispatch/refresh) and `stage` (call site) fields; dispatch spans also carry `method` and
//!   `path`.
//! - Enable `metrics` to increment the `greencare_client_flow_total` counter for every
//!   attempt/success/failure, labeled by `flow` + `outcome`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Client flows observed by the instrumentation hooks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ClientFlow {
	/// One authenticated request moving through the dispatch pipeline.
	Dispatch,
	/// The shared token-refresh flow.
	Refresh,
}
impl ClientFlow {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			ClientFlow::Dispatch => "dispatch",
			ClientFlow::Refresh => "refresh",
		}
	}
}
impl Display for ClientFlow {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowOutcome {
	/// Entry to an instrumented flow.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl FlowOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowOutcome::Attempt => "attempt",
			FlowOutcome::Success => "success",
			FlowOutcome::Failure => "failure",
		}
	}
}
impl Display for FlowOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
