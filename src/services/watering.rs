//! Watering schedule endpoints and the weather forecast proxy.

// self
use crate::{_prelude::*, client::ApiClient, http::ApiTransport};

/// One watering entry, scheduled or completed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WateringRecord {
	/// Backend identifier.
	pub id: i64,
	/// Identifier of the watered plant.
	pub plant: i64,
	/// Plant display name, echoed by the backend for convenience.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub plant_name: Option<String>,
	/// When the watering happened or is due.
	#[serde(with = "time::serde::rfc3339")]
	pub watering_date: OffsetDateTime,
	/// Next planned watering, if any.
	#[serde(default, with = "time::serde::rfc3339::option")]
	pub next_watering_date: Option<OffsetDateTime>,
	/// Water amount in milliliters.
	pub amount_ml: f64,
	/// Free-form notes.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub notes: Option<String>,
	/// Whether the watering has been carried out.
	pub is_completed: bool,
	/// Server-side creation timestamp.
	#[serde(default, with = "time::serde::rfc3339::option")]
	pub created_at: Option<OffsetDateTime>,
	/// Server-side update timestamp.
	#[serde(default, with = "time::serde::rfc3339::option")]
	pub updated_at: Option<OffsetDateTime>,
}

/// Writable subset for logging or rescheduling a watering.
#[derive(Clone, Debug, Serialize)]
pub struct WateringDraft {
	/// Identifier of the plant to water.
	pub plant: i64,
	/// When the watering happened or is due.
	#[serde(with = "time::serde::rfc3339")]
	pub watering_date: OffsetDateTime,
	/// Next planned watering, if any.
	#[serde(with = "time::serde::rfc3339::option")]
	pub next_watering_date: Option<OffsetDateTime>,
	/// Water amount in milliliters.
	pub amount_ml: f64,
	/// Free-form notes.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub notes: Option<String>,
	/// Whether the watering has already been carried out.
	pub is_completed: bool,
}

impl<T> ApiClient<T>
where
	T: ?Sized + ApiTransport,
{
	/// Lists every watering record, newest first.
	pub async fn watering_records(&self) -> Result<Vec<WateringRecord>> {
		self.get_list("/watering/").await
	}

	/// Logs a watering.
	pub async fn create_watering_record(&self, draft: &WateringDraft) -> Result<WateringRecord> {
		self.post_json("/watering/", draft).await
	}

	/// Replaces a watering record.
	pub async fn update_watering_record(
		&self,
		id: i64,
		draft: &WateringDraft,
	) -> Result<WateringRecord> {
		self.put_json(format!("/watering/{id}/"), draft).await
	}

	/// Deletes a watering record.
	pub async fn delete_watering_record(&self, id: i64) -> Result<()> {
		self.delete_resource(format!("/watering/{id}/")).await
	}

	/// Fetches the provider-shaped weather forecast, optionally pinned to coordinates.
	pub async fn weather_forecast(
		&self,
		coordinates: Option<(f64, f64)>,
	) -> Result<serde_json::Value> {
		let path = match coordinates {
			Some((lat, lon)) => format!("/watering/weather_forecast/?lat={lat}&lon={lon}"),
			None => "/watering/weather_forecast/".into(),
		};

		self.get_json(path).await
	}
}
