//! Plant inventory endpoints.

// self
use crate::{
	_prelude::*, client::ApiClient, http::ApiTransport, services::watering::WateringRecord,
};

/// A plant in the caller's inventory.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Plant {
	/// Backend identifier.
	pub id: i64,
	/// Display name.
	pub name: String,
	/// Botanical species.
	pub species: String,
	/// Age in years.
	pub age: i32,
	/// Height in centimeters.
	pub height: f64,
	/// Width in centimeters.
	pub width: f64,
	/// Free-form description.
	pub description: String,
	/// Optional photo URL.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub image: Option<String>,
}

/// Writable subset for creating or updating a plant.
#[derive(Clone, Debug, Serialize)]
pub struct PlantDraft {
	/// Display name.
	pub name: String,
	/// Botanical species.
	pub species: String,
	/// Age in years.
	pub age: i32,
	/// Height in centimeters.
	pub height: f64,
	/// Width in centimeters.
	pub width: f64,
	/// Free-form description.
	pub description: String,
	/// Optional photo URL.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub image: Option<String>,
}

impl<T> ApiClient<T>
where
	T: ?Sized + ApiTransport,
{
	/// Lists every plant.
	pub async fn plants(&self) -> Result<Vec<Plant>> {
		self.get_list("/plants/").await
	}

	/// Fetches one plant.
	pub async fn plant(&self, id: i64) -> Result<Plant> {
		self.get_json(format!("/plants/{id}/")).await
	}

	/// Creates a plant.
	pub async fn create_plant(&self, draft: &PlantDraft) -> Result<Plant> {
		self.post_json("/plants/", draft).await
	}

	/// Replaces a plant's attributes.
	pub async fn update_plant(&self, id: i64, draft: &PlantDraft) -> Result<Plant> {
		self.put_json(format!("/plants/{id}/"), draft).await
	}

	/// Deletes a plant.
	pub async fn delete_plant(&self, id: i64) -> Result<()> {
		self.delete_resource(format!("/plants/{id}/")).await
	}

	/// Lists the watering records attached to one plant.
	pub async fn plant_watering_history(&self, id: i64) -> Result<Vec<WateringRecord>> {
		self.get_list(format!("/plants/{id}/watering_record/")).await
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn plant_decodes_without_an_image() {
		let raw = r#"{
			"id": 3,
			"name": "Basil",
			"species": "Ocimum basilicum",
			"age": 1,
			"height": 24.5,
			"width": 12.0,
			"description": "Kitchen window pot"
		}"#;
		let plant: Plant = serde_json::from_str(raw).expect("Plant should decode.");

		assert_eq!(plant.name, "Basil");
		assert_eq!(plant.image, None);
	}

	#[test]
	fn draft_omits_an_unset_image() {
		let draft = PlantDraft {
			name: "Basil".into(),
			species: "Ocimum basilicum".into(),
			age: 1,
			height: 24.5,
			width: 12.0,
			description: "Kitchen window pot".into(),
			image: None,
		};
		let encoded = serde_json::to_value(&draft).expect("Draft should serialize.");

		assert!(encoded.get("image").is_none());
		assert_eq!(encoded["species"], "Ocimum basilicum");
	}
}
