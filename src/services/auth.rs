//! Account endpoints: login, registration, profile, logout.

// self
use crate::{
	_prelude::*,
	auth::{TokenSecret, UserProfile, UserRole},
	client::ApiClient,
	http::{ApiTransport, RequestDescriptor},
};

/// Login payload for `POST /auth/login/`.
#[derive(Clone, Debug, Serialize)]
pub struct Credentials {
	/// Account email address.
	pub email: String,
	/// Account password.
	pub password: String,
}
impl Credentials {
	/// Creates a login payload.
	pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
		Self { email: email.into(), password: password.into() }
	}
}

/// Registration payload for `POST /auth/register/`.
#[derive(Clone, Debug, Serialize)]
pub struct Registration {
	/// Given name.
	pub first_name: String,
	/// Family name.
	pub last_name: String,
	/// Account email address; doubles as the login identifier.
	pub email: String,
	/// Account password.
	pub password: String,
	/// Optional avatar URL.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub profile_picture: Option<String>,
	/// Requested role; the backend falls back to its default when omitted.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub role: Option<UserRole>,
}

/// Established session returned by login and registration.
#[derive(Clone, Debug)]
pub struct Session {
	/// Server acknowledgement, e.g. `"Login successful"`.
	pub message: String,
	/// Profile of the authenticated account.
	pub user: UserProfile,
}

// Wire payload of the login and registration endpoints.
#[derive(Debug, Deserialize)]
struct AuthPayload {
	message: String,
	access: TokenSecret,
	refresh: TokenSecret,
	user: UserProfile,
}

impl<T> ApiClient<T>
where
	T: ?Sized + ApiTransport,
{
	/// Logs in and persists the returned token pair in the client's store.
	pub async fn login(&self, credentials: &Credentials) -> Result<Session> {
		self.establish_session("/auth/login/", credentials).await
	}

	/// Registers a new account and persists the returned token pair in the client's store.
	pub async fn register(&self, registration: &Registration) -> Result<Session> {
		self.establish_session("/auth/register/", registration).await
	}

	async fn establish_session(&self, path: &str, body: &impl Serialize) -> Result<Session> {
		let payload: AuthPayload = self.post_json(path, body).await?;

		self.store.set_tokens(payload.access, payload.refresh).await?;

		Ok(Session { message: payload.message, user: payload.user })
	}

	/// Fetches the authenticated account's profile.
	pub async fn current_user(&self) -> Result<UserProfile> {
		self.get_json("/auth/me/").await
	}

	/// Ends the session.
	///
	/// The backend is advised with a best-effort `POST /auth/logout/` carrying the stored
	/// refresh token; the local store is cleared whether or not that call succeeds. Any remote
	/// failure is returned afterwards for callers that care.
	pub async fn logout(&self) -> Result<()> {
		let mut request = RequestDescriptor::post("/auth/logout/");

		if let Ok(Some(refresh)) = self.store.refresh().await {
			request = request.with_body(serde_json::json!({ "refresh": refresh.expose() }));
		}

		let farewell = self.dispatch(request).await;

		self.store.clear().await?;

		farewell.map(|_| ())
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn auth_payload_decodes_the_login_response() {
		let raw = r#"{
			"message": "Login successful",
			"access": "acc.jwt.one",
			"refresh": "ref.jwt.one",
			"user": {
				"id": 7,
				"email": "farmer@greencare.app",
				"first_name": "Amina",
				"last_name": "Diallo",
				"role": "farmer"
			}
		}"#;
		let payload: AuthPayload =
			serde_json::from_str(raw).expect("Login payload should decode.");

		assert_eq!(payload.message, "Login successful");
		assert_eq!(payload.access.expose(), "acc.jwt.one");
		assert_eq!(payload.user.role, UserRole::Farmer);
	}

	#[test]
	fn registration_omits_unset_optionals() {
		let registration = Registration {
			first_name: "Amina".into(),
			last_name: "Diallo".into(),
			email: "farmer@greencare.app".into(),
			password: "hunter2hunter2".into(),
			profile_picture: None,
			role: Some(UserRole::Seller),
		};
		let encoded =
			serde_json::to_value(&registration).expect("Registration should serialize.");

		assert_eq!(encoded["role"], "seller");
		assert!(encoded.get("profile_picture").is_none());
	}
}
