//! Client-level error types shared across dispatch, refresh, and stores.

// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical client error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Token-store failure.
	#[error("{0}")]
	Store(
		#[from]
		#[source]
		crate::store::StoreError,
	),
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure (DNS, TCP, TLS); no usable response was received.
	#[error(transparent)]
	Network(#[from] NetworkError),

	/// Endpoint answered with a non-success status other than an authorization failure.
	#[error("Endpoint rejected the request with HTTP {}.", .0.status)]
	RequestFailed(RequestFailure),
	/// Replayed request was rejected a second time; refreshing cannot recover this session.
	#[error("Access token was rejected again after a refresh (HTTP {}).", .0.status)]
	AuthorizationExpired(RequestFailure),
	/// Token refresh settled with a failure; [`RefreshFailure::ends_session`] tells whether the
	/// stored tokens were purged.
	#[error(transparent)]
	RefreshFailed(#[from] RefreshFailure),
	/// Endpoint returned a success status with a payload the typed layer could not decode.
	#[error("Endpoint returned malformed JSON.")]
	UnexpectedPayload {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::error::Error>,
		/// HTTP status code of the response carrying the payload.
		status: u16,
	},
}
impl Error {
	/// HTTP status attached to the failure, when one exists.
	pub fn status(&self) -> Option<u16> {
		match self {
			Self::RequestFailed(failure) | Self::AuthorizationExpired(failure) =>
				Some(failure.status),
			Self::RefreshFailed(RefreshFailure::Rejected { status, .. }) => Some(*status),
			Self::UnexpectedPayload { status, .. } => Some(*status),
			_ => None,
		}
	}

	/// Whether the failure ended the session; callers should route the user back through login.
	pub fn is_session_expired(&self) -> bool {
		match self {
			Self::AuthorizationExpired(_) => true,
			Self::RefreshFailed(failure) => failure.ends_session(),
			_ => false,
		}
	}
}

/// Configuration and request-construction failures raised by the client.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// Endpoint path does not resolve against the configured base URL.
	#[error("Endpoint path `{path}` does not form a valid URL.")]
	InvalidEndpointPath {
		/// Offending path.
		path: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Request body could not be serialized to JSON.
	#[error("Request body could not be serialized.")]
	InvalidRequestBody(#[from] serde_json::Error),
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Verbatim record of a rejected HTTP response, preserved for the caller.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RequestFailure {
	/// HTTP status code of the rejection.
	pub status: u16,
	/// Response body as text, untouched.
	pub body: String,
}
impl RequestFailure {
	/// Captures a rejection from a raw status and body.
	pub fn new(status: u16, body: impl Into<String>) -> Self {
		Self { status, body: body.into() }
	}

	/// Extracts the human-readable message DRF-style backends place under `detail`, `error`, or
	/// `message` in JSON error bodies.
	pub fn detail(&self) -> Option<String> {
		let value = serde_json::from_str::<serde_json::Value>(&self.body).ok()?;

		["detail", "error", "message"]
			.into_iter()
			.find_map(|key| value.get(key))
			.and_then(|message| message.as_str())
			.map(ToOwned::to_owned)
	}
}

/// Terminal outcome of a failed token refresh.
///
/// `Clone` on purpose: one settled refresh fans its failure out verbatim to every waiter queued
/// behind it.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum RefreshFailure {
	/// No refresh token was stored when the access token expired.
	#[error("No refresh token is available; the session is already gone.")]
	MissingRefreshToken,
	/// Auth endpoint rejected the refresh token.
	#[error("Token refresh was rejected with HTTP {status}: {detail}.")]
	Rejected {
		/// HTTP status code of the rejection.
		status: u16,
		/// Message extracted from the rejection body, or the raw body.
		detail: String,
	},
	/// Auth endpoint accepted the refresh but answered with an unusable payload.
	#[error("Token refresh returned an unusable payload: {message}.")]
	MalformedResponse {
		/// Summary of the parsing failure.
		message: String,
	},
	/// Network failed while the refresh call was in flight.
	#[error("Network error occurred while refreshing the access token: {message}.")]
	Network {
		/// Summary of the transport failure.
		message: String,
	},
	/// Token store failed while the refresh was being processed.
	#[error("Token store failed during refresh: {message}.")]
	Store {
		/// Summary of the store failure.
		message: String,
	},
	/// The task driving the refresh was dropped before the outcome was known.
	#[error("Token refresh was interrupted before it settled.")]
	Interrupted,
}
impl RefreshFailure {
	/// Whether this failure ended the session, purging the stored pair and notifying the session
	/// watcher.
	///
	/// [`Store`](Self::Store) and [`Interrupted`](Self::Interrupted) failures keep the stored
	/// pair in place; a later dispatch may still refresh successfully.
	pub fn ends_session(&self) -> bool {
		!matches!(self, Self::Store { .. } | Self::Interrupted)
	}
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum NetworkError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the API.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the API.")]
	Io(#[from] std::io::Error),
}
impl NetworkError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for NetworkError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}
