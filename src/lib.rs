//! Async client for the GreenCare farm-management API: fresh-token dispatch, single-flight token
//! refresh, and a typed endpoint surface built for production.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod client;
pub mod error;
pub mod http;
pub mod obs;
pub mod services;
pub mod store;
#[cfg(all(any(test, feature = "test"), feature = "reqwest"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::{
		client::ApiClient,
		http::ReqwestTransport,
		store::{MemoryTokenStore, TokenStore},
	};

	/// Client type alias used by reqwest-backed integration tests.
	pub type ReqwestTestClient = ApiClient<ReqwestTransport>;

	/// Builds a client pointed at `base_url` and backed by a fresh in-memory token store,
	/// returning the store alongside so tests can seed and inspect tokens directly.
	pub fn build_test_client(base_url: &str) -> (ReqwestTestClient, Arc<MemoryTokenStore>) {
		let store_backend = Arc::new(MemoryTokenStore::default());
		let store: Arc<dyn TokenStore> = store_backend.clone();
		let base_url = Url::parse(base_url).expect("Test base URL should parse.");
		let client =
			ApiClient::new(base_url, store).expect("Failed to build reqwest client for tests.");

		(client, store_backend)
	}
}

mod _prelude {
	pub use std::{
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
		time::Duration,
	};

	pub use async_lock::OnceCell;
	pub use parking_lot::{Mutex, RwLock};
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::OffsetDateTime;
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(all(test, feature = "reqwest"))] use {color_eyre as _, httpmock as _};
