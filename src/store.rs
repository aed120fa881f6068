//! Storage contracts and built-in token-store implementations.

pub mod file;
pub mod memory;

pub use file::FileTokenStore;
pub use memory::MemoryTokenStore;

// self
use crate::{_prelude::*, auth::TokenSecret};

/// Persistence contract future for token-store operations.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + 'a + Send>>;

/// Storage backend contract for the session's token pair.
///
/// The client reads the access token fresh from the store at every dispatch; nothing above this
/// trait caches credentials across requests.
pub trait TokenStore
where
	Self: Send + Sync,
{
	/// Reads the access token of the stored session, if one exists.
	fn access(&self) -> StoreFuture<'_, Option<TokenSecret>>;

	/// Reads the refresh token of the stored session, if one exists.
	fn refresh(&self) -> StoreFuture<'_, Option<TokenSecret>>;

	/// Replaces the stored session with the provided pair.
	fn set_tokens(&self, access: TokenSecret, refresh: TokenSecret) -> StoreFuture<'_, ()>;

	/// Removes the stored session entirely.
	fn clear(&self) -> StoreFuture<'_, ()>;
}

/// Error type produced by [`TokenStore`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum StoreError {
	/// Serialization failures (e.g., serde) surfaced by the backend.
	#[error("Serialization error: {message}.")]
	Serialization {
		/// Human-readable error payload.
		message: String,
	},
	/// Backend-level failure for the storage engine.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}
