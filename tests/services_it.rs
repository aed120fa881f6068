#![cfg(all(feature = "reqwest", feature = "test"))]

// crates.io
use httpmock::prelude::*;
// self
use greencare_client::{
	_preludet::*,
	auth::{TokenSecret, UserRole},
	services::{Credentials, OrderDraft, OrderStatus, ProductCategory, Registration},
	store::{MemoryTokenStore, TokenStore},
};

async fn seed_session(store: &MemoryTokenStore) {
	store
		.set_tokens(TokenSecret::new("access.jwt"), TokenSecret::new("refresh.jwt"))
		.await
		.expect("Seeding the token store should succeed.");
}

#[tokio::test]
async fn login_stores_the_issued_pair_and_returns_the_session() {
	let server = MockServer::start_async().await;
	let (client, store) = build_test_client(&server.base_url());
	let mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/auth/login/")
				.json_body_includes("{\"email\":\"farmer@greencare.app\"}");
			then.status(200).header("content-type", "application/json").body(
				"{\"message\":\"Login successful\",\"access\":\"issued.access\",\"refresh\":\"issued.refresh\",\"user\":{\"id\":7,\"email\":\"farmer@greencare.app\",\"first_name\":\"Amina\",\"last_name\":\"Diallo\",\"role\":\"farmer\"}}",
			);
		})
		.await;
	let session = client
		.login(&Credentials::new("farmer@greencare.app", "hunter2hunter2"))
		.await
		.expect("Login should succeed.");

	mock.assert_async().await;

	assert_eq!(session.message, "Login successful");
	assert_eq!(session.user.role, UserRole::Farmer);

	let snapshot = store.snapshot().expect("Login should persist the issued pair.");

	assert_eq!(snapshot.access.expose(), "issued.access");
	assert_eq!(snapshot.refresh.expose(), "issued.refresh");
}

#[tokio::test]
async fn registration_establishes_a_session() {
	let server = MockServer::start_async().await;
	let (client, store) = build_test_client(&server.base_url());
	let mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/auth/register/")
				.json_body_includes("{\"email\":\"seller@greencare.app\",\"role\":\"seller\"}");
			then.status(201).header("content-type", "application/json").body(
				"{\"message\":\"Registration successful\",\"access\":\"new.access\",\"refresh\":\"new.refresh\",\"user\":{\"id\":11,\"email\":\"seller@greencare.app\",\"first_name\":\"Kofi\",\"last_name\":\"Mensah\",\"role\":\"seller\"}}",
			);
		})
		.await;
	let registration = Registration {
		first_name: "Kofi".into(),
		last_name: "Mensah".into(),
		email: "seller@greencare.app".into(),
		password: "hunter2hunter2".into(),
		profile_picture: None,
		role: Some(UserRole::Seller),
	};
	let session =
		client.register(&registration).await.expect("Registration should succeed.");

	mock.assert_async().await;

	assert_eq!(session.user.full_name(), "Kofi Mensah");
	assert!(store.snapshot().is_some());
}

#[tokio::test]
async fn logout_clears_locally_even_when_the_backend_rejects() {
	let server = MockServer::start_async().await;
	let (client, store) = build_test_client(&server.base_url());

	seed_session(&store).await;

	let mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/auth/logout/")
				.json_body_includes("{\"refresh\":\"refresh.jwt\"}");
			then.status(500)
				.header("content-type", "application/json")
				.body("{\"error\":\"blacklist unavailable\"}");
		})
		.await;
	let farewell = client.logout().await;

	mock.assert_async().await;

	// The local session is gone regardless of what the backend said.
	assert_eq!(store.snapshot(), None);
	assert_eq!(
		farewell.expect_err("The remote rejection should still be reported.").status(),
		Some(500)
	);
}

#[tokio::test]
async fn current_user_decodes_the_profile() {
	let server = MockServer::start_async().await;
	let (client, store) = build_test_client(&server.base_url());

	seed_session(&store).await;

	server
		.mock_async(|when, then| {
			when.method(GET).path("/auth/me/").header("authorization", "Bearer access.jwt");
			then.status(200).header("content-type", "application/json").body(
				"{\"id\":11,\"email\":\"owner@greencare.app\",\"first_name\":\"Kofi\",\"last_name\":\"Mensah\",\"role\":\"plant_owner\",\"profile_picture\":\"https://cdn.greencare.app/kofi.png\",\"created_at\":\"2026-01-15T10:00:00Z\"}",
			);
		})
		.await;

	let profile = client.current_user().await.expect("Profile fetch should succeed.");

	assert_eq!(profile.role, UserRole::PlantOwner);
	assert_eq!(profile.full_name(), "Kofi Mensah");
	assert_eq!(profile.profile_picture.as_deref(), Some("https://cdn.greencare.app/kofi.png"));
	assert!(profile.created_at.is_some());
}

#[tokio::test]
async fn product_listings_filter_by_category() {
	let server = MockServer::start_async().await;
	let (client, store) = build_test_client(&server.base_url());

	seed_session(&store).await;

	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/products/").query_param("category", "tools");
			then.status(200).header("content-type", "application/json").body(
				"[{\"id\":42,\"name\":\"Pruning shears\",\"description\":\"Bypass blades\",\"price\":\"18.50\",\"category\":\"tools\",\"owner\":7,\"owner_name\":\"Amina Diallo\",\"owner_email\":\"farmer@greencare.app\",\"created_at\":\"2026-08-01T09:00:00Z\",\"updated_at\":\"2026-08-02T10:15:00Z\"}]",
			);
		})
		.await;
	let products = client
		.products(Some(ProductCategory::Tools))
		.await
		.expect("Filtered product listing should succeed.");

	mock.assert_async().await;

	assert_eq!(products.len(), 1);
	assert_eq!(products[0].price_amount(), Some(18.5));
}

#[tokio::test]
async fn plant_listings_accept_the_data_envelope() {
	let server = MockServer::start_async().await;
	let (client, store) = build_test_client(&server.base_url());

	seed_session(&store).await;

	server
		.mock_async(|when, then| {
			when.method(GET).path("/plants/");
			then.status(200).header("content-type", "application/json").body(
				"{\"data\":[{\"id\":1,\"name\":\"Basil\",\"species\":\"Ocimum basilicum\",\"age\":1,\"height\":24.5,\"width\":12.0,\"description\":\"Kitchen pot\"}]}",
			);
		})
		.await;

	let plants = client.plants().await.expect("Enveloped plant listing should decode.");

	assert_eq!(plants.len(), 1);
	assert_eq!(plants[0].species, "Ocimum basilicum");
}

#[tokio::test]
async fn undecodable_success_payload_reports_its_status() {
	let server = MockServer::start_async().await;
	let (client, store) = build_test_client(&server.base_url());

	seed_session(&store).await;

	// Neither a bare array nor the `{"data": [...]}` envelope.
	server
		.mock_async(|when, then| {
			when.method(GET).path("/plants/");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"items\":[]}");
		})
		.await;

	let error = client.plants().await.expect_err("An unrecognized listing shape should fail.");

	match error {
		Error::UnexpectedPayload { status, .. } => assert_eq!(status, 200),
		other => panic!("Expected UnexpectedPayload, got {other:?}."),
	}
}

#[tokio::test]
async fn order_placement_and_status_updates_hit_the_nested_router() {
	let server = MockServer::start_async().await;
	let (client, store) = build_test_client(&server.base_url());

	seed_session(&store).await;

	let placed = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/products/orders/")
				.json_body_includes("{\"product\":42,\"quantity\":2}");
			then.status(201).header("content-type", "application/json").body(
				"{\"id\":5,\"product\":42,\"product_name\":\"Pruning shears\",\"product_price\":\"18.50\",\"seller_name\":\"Amina Diallo\",\"quantity\":2,\"total_price\":\"37.00\",\"status\":\"pending\",\"shipping_address\":\"12 Garden Way, Freetown\",\"created_at\":\"2026-08-21T14:03:00Z\"}",
			);
		})
		.await;
	let advanced = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/products/orders/5/update_status/")
				.json_body_includes("{\"status\":\"processing\"}");
			then.status(200).header("content-type", "application/json").body(
				"{\"id\":5,\"product\":42,\"product_name\":\"Pruning shears\",\"product_price\":\"18.50\",\"buyer_name\":\"Kofi Mensah\",\"quantity\":2,\"total_price\":\"37.00\",\"status\":\"processing\",\"created_at\":\"2026-08-21T14:03:00Z\"}",
			);
		})
		.await;
	let draft = OrderDraft {
		product: 42,
		quantity: 2,
		shipping_address: Some("12 Garden Way, Freetown".into()),
		phone: None,
		notes: None,
	};
	let order = client.place_order(&draft).await.expect("Placing the order should succeed.");

	placed.assert_async().await;

	assert_eq!(order.status, OrderStatus::Pending);
	assert_eq!(order.total_price, "37.00");

	let order = client
		.update_order_status(5, OrderStatus::Processing)
		.await
		.expect("Advancing the order should succeed.");

	advanced.assert_async().await;

	assert_eq!(order.status, OrderStatus::Processing);
	assert_eq!(order.buyer_name.as_deref(), Some("Kofi Mensah"));
}

#[tokio::test]
async fn weather_forecast_passes_coordinates_through() {
	let server = MockServer::start_async().await;
	let (client, store) = build_test_client(&server.base_url());

	seed_session(&store).await;

	let mock = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/watering/weather_forecast/")
				.query_param("lat", "8.48")
				.query_param("lon", "-13.23");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"city\":{\"name\":\"Freetown\"},\"list\":[]}");
		})
		.await;
	let forecast = client
		.weather_forecast(Some((8.48, -13.23)))
		.await
		.expect("Forecast fetch should succeed.");

	mock.assert_async().await;

	assert_eq!(forecast["city"]["name"], "Freetown");
}
