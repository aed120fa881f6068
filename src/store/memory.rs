//! Thread-safe in-memory [`TokenStore`] implementation for local development and tests.

// self
use crate::{
	_prelude::*,
	auth::{TokenPair, token::secret::TokenSecret},
	store::{StoreFuture, TokenStore},
};

type StoreCell = Arc<RwLock<Option<TokenPair>>>;

/// Thread-safe store that keeps the session in-process for tests and demos.
#[derive(Clone, Debug, Default)]
pub struct MemoryTokenStore(StoreCell);
impl MemoryTokenStore {
	/// Builds a store seeded with an existing session.
	pub fn with_tokens(tokens: TokenPair) -> Self {
		Self(Arc::new(RwLock::new(Some(tokens))))
	}

	/// Returns a copy of the stored pair, if any; handy for assertions.
	pub fn snapshot(&self) -> Option<TokenPair> {
		self.0.read().clone()
	}

	fn access_now(cell: StoreCell) -> Option<TokenSecret> {
		cell.read().as_ref().map(|pair| pair.access.clone())
	}

	fn refresh_now(cell: StoreCell) -> Option<TokenSecret> {
		cell.read().as_ref().map(|pair| pair.refresh.clone())
	}

	fn set_now(cell: StoreCell, tokens: TokenPair) {
		*cell.write() = Some(tokens);
	}

	fn clear_now(cell: StoreCell) {
		*cell.write() = None;
	}
}
impl TokenStore for MemoryTokenStore {
	fn access(&self) -> StoreFuture<'_, Option<TokenSecret>> {
		let cell = self.0.clone();

		Box::pin(async move { Ok(Self::access_now(cell)) })
	}

	fn refresh(&self) -> StoreFuture<'_, Option<TokenSecret>> {
		let cell = self.0.clone();

		Box::pin(async move { Ok(Self::refresh_now(cell)) })
	}

	fn set_tokens(&self, access: TokenSecret, refresh: TokenSecret) -> StoreFuture<'_, ()> {
		let cell = self.0.clone();

		Box::pin(async move {
			Self::set_now(cell, TokenPair { access, refresh });

			Ok(())
		})
	}

	fn clear(&self) -> StoreFuture<'_, ()> {
		let cell = self.0.clone();

		Box::pin(async move {
			Self::clear_now(cell);

			Ok(())
		})
	}
}
