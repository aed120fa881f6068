//! Single-flight refresh coordination shared by every dispatch that hits a 401.
//!
//! The first request to observe an authorization expiry becomes the refresh leader: it posts the
//! stored refresh token to `/auth/token/refresh/` and settles the outcome for everyone. Requests
//! failing while that call is in flight enqueue a deferred instead of issuing a second refresh,
//! and the settled outcome, new access token or shared failure, completes the deferreds in
//! enqueue order.

mod metrics;

pub use metrics::RefreshMetrics;

// std
use std::mem;
// self
use crate::{
	_prelude::*,
	auth::TokenSecret,
	client::ApiClient,
	error::{RefreshFailure, RequestFailure},
	http::{ApiTransport, RequestDescriptor},
	obs::{self, ClientFlow, FlowOutcome, FlowSpan},
};

/// Path of the token refresh endpoint below the client's base URL.
pub(crate) const REFRESH_ENDPOINT: &str = "/auth/token/refresh/";

/// Outcome shared between the refresh leader and its waiters.
pub(crate) type RefreshOutcome = Result<TokenSecret, RefreshFailure>;

type Waiter = Arc<OnceCell<RefreshOutcome>>;

/// Coordination state enforcing at most one outstanding refresh per client.
///
/// The lock covers queue bookkeeping only and is never held across an await; waiters park on
/// their own deferred cell outside of it.
#[derive(Debug, Default)]
pub(crate) struct RefreshCoordinator {
	state: Mutex<RefreshState>,
}
impl RefreshCoordinator {
	fn join(&self) -> RefreshRole {
		let mut state = self.state.lock();

		if state.in_progress {
			let cell = Arc::new(OnceCell::new());

			state.waiters.push(cell.clone());

			RefreshRole::Waiter(cell)
		} else {
			state.in_progress = true;

			RefreshRole::Leader
		}
	}

	// Flips the flag and drains the queue in one critical section, so a request rejected after
	// the drain elects a fresh leader instead of parking on a settled refresh.
	fn settle(&self) -> Vec<Waiter> {
		let mut state = self.state.lock();

		state.in_progress = false;

		mem::take(&mut state.waiters)
	}
}

#[derive(Debug, Default)]
struct RefreshState {
	in_progress: bool,
	waiters: Vec<Waiter>,
}

/// How a 401-hit request participates in the shared refresh.
enum RefreshRole {
	/// First observer; performs the refresh call and settles everyone.
	Leader,
	/// Parked behind the in-flight refresh; adopts the settled outcome.
	Waiter(Waiter),
}

/// Completes every waiter a dropped leader would otherwise strand.
struct LeaderGuard<'a> {
	coordinator: &'a RefreshCoordinator,
	settled: bool,
}
impl<'a> LeaderGuard<'a> {
	fn new(coordinator: &'a RefreshCoordinator) -> Self {
		Self { coordinator, settled: false }
	}

	fn settle(&mut self) -> Vec<Waiter> {
		self.settled = true;

		self.coordinator.settle()
	}
}
impl Drop for LeaderGuard<'_> {
	fn drop(&mut self) {
		if self.settled {
			return;
		}

		// The leader future was dropped mid-refresh. The outcome is unknown, so waiters receive
		// an interrupted failure instead of hanging; tokens stay put because the refresh was
		// never observed to fail.
		for waiter in self.coordinator.settle() {
			let _ = waiter.set_blocking(Err(RefreshFailure::Interrupted));
		}
	}
}

impl<T> ApiClient<T>
where
	T: ?Sized + ApiTransport,
{
	/// Returns a fresh access token, joining the in-flight refresh when one exists.
	pub(crate) async fn obtain_fresh_access(&self) -> RefreshOutcome {
		match self.coordinator.join() {
			RefreshRole::Waiter(cell) => {
				self.refresh_metrics.record_joined_waiter();

				cell.wait().await.clone()
			},
			RefreshRole::Leader => self.lead_refresh().await,
		}
	}

	async fn lead_refresh(&self) -> RefreshOutcome {
		const FLOW: ClientFlow = ClientFlow::Refresh;

		let span = FlowSpan::new(FLOW, "lead_refresh");

		obs::record_flow_outcome(FLOW, FlowOutcome::Attempt);
		self.refresh_metrics.record_attempt();

		let mut guard = LeaderGuard::new(&self.coordinator);
		let outcome = span.instrument(self.run_refresh()).await;

		match &outcome {
			Ok(_) => {
				self.refresh_metrics.record_success();
				obs::record_flow_outcome(FLOW, FlowOutcome::Success);
			},
			Err(failure) => {
				self.refresh_metrics.record_failure();
				obs::record_flow_outcome(FLOW, FlowOutcome::Failure);

				self.notify_session_expired(failure);
			},
		}

		// No await between draining and completing; a cancellation here can no longer strand a
		// parked waiter.
		for waiter in guard.settle() {
			let _ = waiter.set_blocking(outcome.clone());
		}

		outcome
	}

	async fn run_refresh(&self) -> RefreshOutcome {
		let refresh_token = match self.store.refresh().await {
			Ok(Some(token)) => token,
			Ok(None) => {
				// Nothing to refresh with; the endpoint is never called.
				self.purge_tokens().await;

				return Err(RefreshFailure::MissingRefreshToken);
			},
			Err(e) => return Err(RefreshFailure::Store { message: e.to_string() }),
		};
		let request = RequestDescriptor::post(REFRESH_ENDPOINT)
			.with_body(serde_json::json!({ "refresh": refresh_token.expose() }));
		// Sent without a bearer header and outside the dispatch pipeline, so a rejection here
		// cannot recurse into another refresh.
		let response = match self.send(&request, None).await {
			Ok(response) => response,
			Err(e) => {
				self.purge_tokens().await;

				return Err(RefreshFailure::Network { message: e.to_string() });
			},
		};

		if !response.is_success() {
			let failure = RequestFailure::new(response.status, response.text());
			let detail = failure.detail().unwrap_or_else(|| failure.body.clone());

			self.purge_tokens().await;

			return Err(RefreshFailure::Rejected { status: failure.status, detail });
		}

		let access = match response.json::<RefreshResponse>() {
			Ok(payload) => payload.access,
			Err(error) => {
				let message = match &error {
					Error::UnexpectedPayload { source, .. } => source.to_string(),
					other => other.to_string(),
				};

				self.purge_tokens().await;

				return Err(RefreshFailure::MalformedResponse { message });
			},
		};

		if let Err(e) = self.store.set_tokens(access.clone(), refresh_token).await {
			return Err(RefreshFailure::Store { message: e.to_string() });
		}

		Ok(access)
	}

	fn notify_session_expired(&self, failure: &RefreshFailure) {
		// A failure that leaves the stored pair in place does not end the session.
		if !failure.ends_session() {
			return;
		}

		if let Some(watcher) = &self.watcher {
			watcher.on_session_expired(failure);
		}
	}

	// Best-effort; the refresh failure stays the primary error.
	async fn purge_tokens(&self) {
		let _ = self.store.clear().await;
	}
}

/// Success payload of the refresh endpoint.
#[derive(Debug, Deserialize)]
struct RefreshResponse {
	access: TokenSecret,
}

#[cfg(test)]
mod tests {
	// crates.io
	use tokio::runtime::Runtime;
	// self
	use super::*;

	#[test]
	fn first_joiner_leads_then_others_wait() {
		let coordinator = RefreshCoordinator::default();

		assert!(matches!(coordinator.join(), RefreshRole::Leader));
		assert!(matches!(coordinator.join(), RefreshRole::Waiter(_)));
		assert!(matches!(coordinator.join(), RefreshRole::Waiter(_)));

		let drained = coordinator.settle();

		assert_eq!(drained.len(), 2);
		// The queue resets; the next expiry elects a fresh leader.
		assert!(matches!(coordinator.join(), RefreshRole::Leader));
	}

	#[test]
	fn settle_preserves_enqueue_order() {
		let coordinator = RefreshCoordinator::default();
		let _leader = coordinator.join();
		let RefreshRole::Waiter(first) = coordinator.join() else {
			panic!("Second join should wait.")
		};
		let RefreshRole::Waiter(second) = coordinator.join() else {
			panic!("Third join should wait.")
		};
		let drained = coordinator.settle();

		assert!(Arc::ptr_eq(&drained[0], &first));
		assert!(Arc::ptr_eq(&drained[1], &second));
	}

	#[test]
	fn dropped_leader_interrupts_waiters() {
		let coordinator = RefreshCoordinator::default();
		let RefreshRole::Leader = coordinator.join() else { panic!("First join should lead.") };
		let RefreshRole::Waiter(cell) = coordinator.join() else {
			panic!("Second join should wait.")
		};

		drop(LeaderGuard::new(&coordinator));

		let rt = Runtime::new().expect("Tokio runtime should build.");
		let outcome = rt.block_on(async { cell.wait().await.clone() });

		assert_eq!(outcome, Err(RefreshFailure::Interrupted));
		// The interrupted round is over; leadership is up for grabs again.
		assert!(matches!(coordinator.join(), RefreshRole::Leader));
	}
}
