//! The access/refresh pair owned by the token store.

// self
use crate::{_prelude::*, auth::token::secret::TokenSecret};

/// Access and refresh secrets for one authenticated session.
///
/// Stores hold the pair as a unit, so a half-written session is unrepresentable.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
	/// Short-lived secret attached to outbound requests.
	pub access: TokenSecret,
	/// Longer-lived secret exchanged for fresh access tokens.
	pub refresh: TokenSecret,
}
impl TokenPair {
	/// Builds a pair from raw secret values.
	pub fn new(access: impl Into<String>, refresh: impl Into<String>) -> Self {
		Self { access: TokenSecret::new(access), refresh: TokenSecret::new(refresh) }
	}
}
