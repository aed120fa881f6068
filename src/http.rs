//! Transport primitives for dispatching GreenCare API calls.
//!
//! The module exposes [`ApiTransport`] as the client's only dependency on an HTTP stack, plus the
//! immutable [`RequestDescriptor`] a transport executes and the [`RawResponse`] it yields. The
//! default reqwest-backed implementation lives here as [`ReqwestTransport`].

// std
use std::ops::Deref;
// crates.io
use serde::de::DeserializeOwned;
// self
use crate::{
	_prelude::*,
	auth::TokenSecret,
	error::{ConfigError, NetworkError},
};

/// Instance-wide timeout for [`ReqwestTransport::with_timeout`]-built clients. It also bounds the
/// token-refresh call, so a hung auth endpoint cannot suspend queued requests forever.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
/// HTTP status the client reads as "authorization expired"; the only status it interprets itself.
pub const AUTHORIZATION_EXPIRED_STATUS: u16 = 401;

/// HTTP methods used across the GreenCare API surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
	/// Fetch a resource or listing.
	Get,
	/// Create a resource or invoke an action endpoint.
	Post,
	/// Replace a resource.
	Put,
	/// Remove a resource.
	Delete,
}
impl Method {
	/// Uppercase wire label.
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Get => "GET",
			Self::Post => "POST",
			Self::Put => "PUT",
			Self::Delete => "DELETE",
		}
	}
}
impl Display for Method {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Immutable description of one outbound call.
///
/// Replaying a request after a token refresh goes through [`into_retry`](Self::into_retry), the
/// only producer of a descriptor with the retried marker set. A retried descriptor that fails
/// authorization again is terminal, which keeps "retry at most once" checkable at the type level.
#[derive(Clone, Debug, PartialEq)]
pub struct RequestDescriptor {
	/// HTTP method.
	pub method: Method,
	/// Path below the client's base URL, query string included, e.g. `/products/?category=tools`.
	pub path: String,
	/// Extra headers beyond the bearer attachment.
	pub headers: Vec<(String, String)>,
	/// JSON body, when the call carries one.
	pub body: Option<serde_json::Value>,
	retried: bool,
}
impl RequestDescriptor {
	/// Builds a descriptor from a method and path.
	pub fn new(method: Method, path: impl Into<String>) -> Self {
		Self { method, path: path.into(), headers: Vec::new(), body: None, retried: false }
	}

	/// Starts a GET descriptor for `path`.
	pub fn get(path: impl Into<String>) -> Self {
		Self::new(Method::Get, path)
	}

	/// Starts a POST descriptor for `path`.
	pub fn post(path: impl Into<String>) -> Self {
		Self::new(Method::Post, path)
	}

	/// Starts a PUT descriptor for `path`.
	pub fn put(path: impl Into<String>) -> Self {
		Self::new(Method::Put, path)
	}

	/// Starts a DELETE descriptor for `path`.
	pub fn delete(path: impl Into<String>) -> Self {
		Self::new(Method::Delete, path)
	}

	/// Adds a header pair.
	pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.headers.push((name.into(), value.into()));

		self
	}

	/// Attaches an already-built JSON body.
	pub fn with_body(mut self, body: serde_json::Value) -> Self {
		self.body = Some(body);

		self
	}

	/// Attaches a JSON body serialized from `body`.
	pub fn with_json(mut self, body: &impl Serialize) -> Result<Self, ConfigError> {
		self.body = Some(serde_json::to_value(body)?);

		Ok(self)
	}

	/// Whether this descriptor is the post-refresh replay of an earlier attempt.
	pub fn retried(&self) -> bool {
		self.retried
	}

	/// Consumes the descriptor into its single allowed replay.
	pub fn into_retry(mut self) -> Self {
		self.retried = true;

		self
	}
}

/// Raw response surfaced by a transport: the final status plus the unparsed body.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RawResponse {
	/// HTTP status code.
	pub status: u16,
	/// Response body bytes, unparsed.
	pub body: Vec<u8>,
}
impl RawResponse {
	/// Builds a response from a status and body bytes.
	pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
		Self { status, body: body.into() }
	}

	/// Whether the status sits in the 2xx success range.
	pub fn is_success(&self) -> bool {
		(200..300).contains(&self.status)
	}

	/// Response body as lossy UTF-8 text.
	pub fn text(&self) -> String {
		String::from_utf8_lossy(&self.body).into_owned()
	}

	/// Decodes the body as JSON into `T`, reporting the failing field path on malformed payloads.
	pub fn json<T>(&self) -> Result<T>
	where
		T: DeserializeOwned,
	{
		let mut deserializer = serde_json::Deserializer::from_slice(&self.body);

		serde_path_to_error::deserialize(&mut deserializer)
			.map_err(|source| Error::UnexpectedPayload { source, status: self.status })
	}
}

/// Future returned by [`ApiTransport::execute`].
pub type TransportFuture<'a> =
	Pin<Box<dyn Future<Output = Result<RawResponse, NetworkError>> + 'a + Send>>;

/// Abstraction over HTTP transports capable of executing GreenCare API calls.
///
/// The trait is the client's only dependency on an HTTP stack. The URL arrives fully resolved
/// against the client's base; `bearer` is attached as `Authorization: Bearer ...` when present.
/// Implementations must be `Send + Sync + 'static` so one transport can be shared across client
/// clones without extra wrappers, and the returned future must be `Send` so dispatch futures can
/// hop executors.
pub trait ApiTransport
where
	Self: 'static + Send + Sync,
{
	/// Executes `request` against `url`, attaching `bearer` when present.
	///
	/// Implementations report transport-level failures only; every HTTP response, success or not,
	/// comes back as a [`RawResponse`] for the dispatch pipeline to interpret.
	fn execute<'a>(
		&'a self,
		url: Url,
		request: &'a RequestDescriptor,
		bearer: Option<&'a TokenSecret>,
	) -> TransportFuture<'a>;
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
///
/// [`Default`] wraps a stock client with no timeout; production construction goes through
/// [`with_timeout`](Self::with_timeout) so every call, token refresh included, is bounded.
#[cfg(feature = "reqwest")]
#[derive(Clone, Default)]
pub struct ReqwestTransport(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestTransport {
	/// Wraps an existing [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}

	/// Builds a transport whose every request is bounded by `timeout`.
	pub fn with_timeout(timeout: Duration) -> Result<Self, ConfigError> {
		Ok(Self(ReqwestClient::builder().timeout(timeout).build()?))
	}

	fn method(method: Method) -> reqwest::Method {
		match method {
			Method::Get => reqwest::Method::GET,
			Method::Post => reqwest::Method::POST,
			Method::Put => reqwest::Method::PUT,
			Method::Delete => reqwest::Method::DELETE,
		}
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestTransport {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Deref for ReqwestTransport {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl ApiTransport for ReqwestTransport {
	fn execute<'a>(
		&'a self,
		url: Url,
		request: &'a RequestDescriptor,
		bearer: Option<&'a TokenSecret>,
	) -> TransportFuture<'a> {
		let client = self.0.clone();

		Box::pin(async move {
			let mut builder = client.request(Self::method(request.method), url);

			if let Some(token) = bearer {
				builder = builder.bearer_auth(token.expose());
			}
			for (name, value) in &request.headers {
				builder = builder.header(name, value);
			}
			if let Some(body) = &request.body {
				builder = builder.json(body);
			}

			let response = builder.send().await.map_err(NetworkError::from)?;
			let status = response.status().as_u16();
			let body = response.bytes().await.map_err(NetworkError::from)?.to_vec();

			Ok(RawResponse { status, body })
		})
	}
}
