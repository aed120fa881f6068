//! Walks the everyday session flow: signing in, browsing plants, and logging a watering, with an
//! httpmock stand-in playing the GreenCare backend.

// std
use std::sync::Arc;
// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
use time::OffsetDateTime;
use url::Url;
// self
use greencare_client::{
	client::ApiClient,
	services::{Credentials, WateringDraft},
	store::{MemoryTokenStore, TokenStore},
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;

	server
		.mock_async(|when, then| {
			when.method(POST).path("/auth/login/");
			then.status(200).header("content-type", "application/json").body(
				"{\"message\":\"Login successful\",\"access\":\"demo-access\",\"refresh\":\"demo-refresh\",\"user\":{\"id\":7,\"email\":\"amina@greencare.app\",\"first_name\":\"Amina\",\"last_name\":\"Diallo\",\"role\":\"farmer\"}}",
			);
		})
		.await;
	server
		.mock_async(|when, then| {
			when.method(GET).path("/plants/").header("authorization", "Bearer demo-access");
			then.status(200).header("content-type", "application/json").body(
				"[{\"id\":3,\"name\":\"Basil\",\"species\":\"Ocimum basilicum\",\"age\":1,\"height\":24.5,\"width\":12.0,\"description\":\"Kitchen pot\"}]",
			);
		})
		.await;

	let watering_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/watering/");
			then.status(201).header("content-type", "application/json").body(
				"{\"id\":11,\"plant\":3,\"plant_name\":\"Basil\",\"watering_date\":\"2026-08-25T07:30:00Z\",\"amount_ml\":250.0,\"is_completed\":true}",
			);
		})
		.await;
	let store: Arc<dyn TokenStore> = Arc::new(MemoryTokenStore::default());
	let client = ApiClient::new(Url::parse(&server.base_url())?, store)?;
	let session = client.login(&Credentials::new("amina@greencare.app", "hunter2hunter2")).await?;

	println!("Signed in as {}.", session.user.full_name());

	for plant in client.plants().await? {
		println!("Plant #{}: {} ({}).", plant.id, plant.name, plant.species);
	}

	let draft = WateringDraft {
		plant: 3,
		watering_date: OffsetDateTime::now_utc(),
		next_watering_date: None,
		amount_ml: 250.,
		notes: Some("Morning round".into()),
		is_completed: true,
	};
	let record = client.create_watering_record(&draft).await?;

	println!("Logged watering #{} for {}.", record.id, record.plant_name.as_deref().unwrap_or("?"));

	watering_mock.assert_async().await;

	Ok(())
}
