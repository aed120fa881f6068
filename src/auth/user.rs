//! User profile and role models served by the auth endpoints.

// self
use crate::_prelude::*;

/// Role assigned to a GreenCare account, controlling which app surfaces it may use.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
	/// Full administrative access.
	Admin,
	/// Farm operator with crop and watering tooling.
	Farmer,
	/// Hobbyist tracking individual plants.
	PlantOwner,
	/// Marketplace vendor listing products for sale.
	Seller,
}
impl UserRole {
	/// Stable wire label for the role.
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Admin => "admin",
			Self::Farmer => "farmer",
			Self::PlantOwner => "plant_owner",
			Self::Seller => "seller",
		}
	}
}
impl Display for UserRole {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Account profile as served by `/auth/me/` and embedded in login/registration responses.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
	/// Server-assigned account identifier.
	pub id: i64,
	/// Login email address.
	pub email: String,
	/// Given name.
	pub first_name: String,
	/// Family name.
	pub last_name: String,
	/// Assigned role.
	pub role: UserRole,
	/// Profile picture URL, when one was uploaded.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub profile_picture: Option<String>,
	/// Account creation timestamp.
	#[serde(default, with = "time::serde::rfc3339::option")]
	pub created_at: Option<OffsetDateTime>,
}
impl UserProfile {
	/// Display name in `First Last` form.
	pub fn full_name(&self) -> String {
		format!("{} {}", self.first_name, self.last_name)
	}
}
