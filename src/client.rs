//! The authenticated request client and its dispatch pipeline.
//!
//! [`ApiClient`] wraps every outbound GreenCare call: it reads the access token fresh from the
//! [`TokenStore`] at dispatch time, attaches it as a bearer header, and interprets exactly one
//! response status specially. A 401 routes the request through the shared refresh flow in
//! [`refresh`]: the first observer posts the refresh token while later observers queue behind it,
//! and every affected request replays at most once with the fresh token. All other failures pass
//! through to the caller unchanged.

pub mod refresh;

pub use refresh::RefreshMetrics;

// crates.io
use serde::de::DeserializeOwned;
// self
use crate::{
	_prelude::*,
	auth::TokenSecret,
	error::{ConfigError, RefreshFailure, RequestFailure},
	http::{ApiTransport, AUTHORIZATION_EXPIRED_STATUS, RawResponse, RequestDescriptor},
	obs::{self, ClientFlow, FlowOutcome, FlowSpan},
	store::TokenStore,
};
#[cfg(feature = "reqwest")]
use crate::http::{DEFAULT_REQUEST_TIMEOUT, ReqwestTransport};

#[cfg(feature = "reqwest")]
/// Client specialized for the crate's default reqwest transport.
pub type ReqwestApiClient = ApiClient<ReqwestTransport>;

/// Hook invoked when a failed refresh ends the session.
///
/// The web application reacts by routing the user to its login screen; library callers install
/// whatever transition fits their surface. The refresh leader invokes the hook at most once per
/// session-ending failure, after the stored tokens have been purged; failures for which
/// [`RefreshFailure::ends_session`] is `false` keep the stored pair and never reach the hook.
pub trait SessionWatcher
where
	Self: Send + Sync,
{
	/// Observes the terminal refresh failure that ended the session.
	fn on_session_expired(&self, failure: &RefreshFailure);
}

/// Issues authenticated calls against one GreenCare deployment.
///
/// The client owns the transport, token store, and refresh coordination state so the typed
/// endpoint wrappers can focus on paths and payloads. Clones share the coordination state (they
/// are the same logical client); separately constructed clients never do.
#[derive(Clone)]
pub struct ApiClient<T>
where
	T: ?Sized + ApiTransport,
{
	/// Transport used for every outbound request.
	pub transport: Arc<T>,
	/// Store that owns the session's token pair.
	pub store: Arc<dyn TokenStore>,
	/// Base URL every descriptor path is resolved against.
	pub base_url: Url,
	/// Shared metrics recorder for refresh flow outcomes.
	pub refresh_metrics: Arc<RefreshMetrics>,
	watcher: Option<Arc<dyn SessionWatcher>>,
	coordinator: Arc<refresh::RefreshCoordinator>,
}
impl<T> ApiClient<T>
where
	T: ?Sized + ApiTransport,
{
	/// Creates a client that reuses the caller-provided transport.
	pub fn with_transport(
		base_url: Url,
		store: Arc<dyn TokenStore>,
		transport: impl Into<Arc<T>>,
	) -> Self {
		Self {
			transport: transport.into(),
			store,
			base_url,
			refresh_metrics: Default::default(),
			watcher: None,
			coordinator: Default::default(),
		}
	}

	/// Installs the hook notified when a failed refresh ends the session.
	pub fn with_session_watcher(mut self, watcher: Arc<dyn SessionWatcher>) -> Self {
		self.watcher = Some(watcher);

		self
	}

	/// Dispatches `request`, recovering a single authorization expiry via the shared refresh flow.
	///
	/// Success means a 2xx response. A 401 on a fresh descriptor triggers (or joins) the refresh
	/// flow and replays the request once with the new token; every other failure passes through
	/// unchanged.
	pub async fn dispatch(&self, request: RequestDescriptor) -> Result<RawResponse> {
		const FLOW: ClientFlow = ClientFlow::Dispatch;

		let span = FlowSpan::for_request("dispatch", request.method, &request.path);

		obs::record_flow_outcome(FLOW, FlowOutcome::Attempt);

		let result = span.instrument(self.dispatch_inner(request)).await;

		match &result {
			Ok(_) => obs::record_flow_outcome(FLOW, FlowOutcome::Success),
			Err(_) => obs::record_flow_outcome(FLOW, FlowOutcome::Failure),
		}

		result
	}

	async fn dispatch_inner(&self, request: RequestDescriptor) -> Result<RawResponse> {
		let bearer = self.store.access().await?;
		let response = self.send(&request, bearer.as_ref()).await?;

		if response.status != AUTHORIZATION_EXPIRED_STATUS {
			return Self::finalize(response);
		}
		if request.retried() {
			// Rejected again after a replay; another refresh cannot help.
			return Err(Error::AuthorizationExpired(Self::failure(response)));
		}

		let access = self.obtain_fresh_access().await.map_err(Error::RefreshFailed)?;
		let replay = request.into_retry();
		let response = self.send(&replay, Some(&access)).await?;

		if response.status == AUTHORIZATION_EXPIRED_STATUS {
			return Err(Error::AuthorizationExpired(Self::failure(response)));
		}

		Self::finalize(response)
	}

	async fn send(
		&self,
		request: &RequestDescriptor,
		bearer: Option<&TokenSecret>,
	) -> Result<RawResponse> {
		let url = self.endpoint_url(&request.path)?;

		Ok(self.transport.execute(url, request, bearer).await?)
	}

	fn finalize(response: RawResponse) -> Result<RawResponse> {
		if response.is_success() {
			Ok(response)
		} else {
			Err(Error::RequestFailed(Self::failure(response)))
		}
	}

	fn failure(response: RawResponse) -> RequestFailure {
		RequestFailure::new(response.status, response.text())
	}

	// Plain concatenation instead of [`Url::join`]; joining would drop the `/api` suffix most
	// deployments carry on the base URL.
	fn endpoint_url(&self, path: &str) -> Result<Url, ConfigError> {
		let base = self.base_url.as_str().trim_end_matches('/');
		let joined = if path.starts_with('/') {
			format!("{base}{path}")
		} else {
			format!("{base}/{path}")
		};

		Url::parse(&joined)
			.map_err(|source| ConfigError::InvalidEndpointPath { path: path.to_string(), source })
	}

	pub(crate) async fn get_json<R>(&self, path: impl Into<String>) -> Result<R>
	where
		R: DeserializeOwned,
	{
		self.dispatch(RequestDescriptor::get(path)).await?.json()
	}

	/// Fetches a collection, accepting both a bare JSON array and the `{"data": [...]}` envelope
	/// some deployments wrap listings in.
	pub(crate) async fn get_list<R>(&self, path: impl Into<String>) -> Result<Vec<R>>
	where
		R: DeserializeOwned,
	{
		let response = self.dispatch(RequestDescriptor::get(path)).await?;

		match response.json::<Vec<R>>() {
			Ok(items) => Ok(items),
			Err(original) => response
				.json::<ListEnvelope<R>>()
				.map(|envelope| envelope.data)
				.map_err(|_| original),
		}
	}

	pub(crate) async fn post_json<B, R>(&self, path: impl Into<String>, body: &B) -> Result<R>
	where
		B: Serialize,
		R: DeserializeOwned,
	{
		let request = RequestDescriptor::post(path).with_json(body).map_err(Error::Config)?;

		self.dispatch(request).await?.json()
	}

	pub(crate) async fn put_json<B, R>(&self, path: impl Into<String>, body: &B) -> Result<R>
	where
		B: Serialize,
		R: DeserializeOwned,
	{
		let request = RequestDescriptor::put(path).with_json(body).map_err(Error::Config)?;

		self.dispatch(request).await?.json()
	}

	pub(crate) async fn delete_resource(&self, path: impl Into<String>) -> Result<()> {
		self.dispatch(RequestDescriptor::delete(path)).await?;

		Ok(())
	}
}
#[cfg(feature = "reqwest")]
impl ApiClient<ReqwestTransport> {
	/// Creates a client backed by the crate's default reqwest transport.
	///
	/// The transport carries [`DEFAULT_REQUEST_TIMEOUT`] so every call, token refresh included,
	/// is bounded. Pass a custom transport through [`ApiClient::with_transport`] to change that.
	pub fn new(base_url: Url, store: Arc<dyn TokenStore>) -> Result<Self> {
		let transport = ReqwestTransport::with_timeout(DEFAULT_REQUEST_TIMEOUT)?;

		Ok(Self::with_transport(base_url, store, transport))
	}
}
impl<T> Debug for ApiClient<T>
where
	T: ?Sized + ApiTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ApiClient")
			.field("base_url", &self.base_url.as_str())
			.field("watcher_set", &self.watcher.is_some())
			.finish()
	}
}

#[derive(Deserialize)]
struct ListEnvelope<R> {
	data: Vec<R>,
}
