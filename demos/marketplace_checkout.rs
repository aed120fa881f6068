//! Runs a marketplace checkout against an httpmock backend whose first answer is an access-token
//! expiry, showing the client refresh the session and replay the call on its own.

// std
use std::sync::Arc;
// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
use url::Url;
// self
use greencare_client::{
	auth::TokenPair,
	client::ApiClient,
	services::{OrderDraft, ProductCategory},
	store::{MemoryTokenStore, TokenStore},
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;

	server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/products/")
				.query_param("category", "plants")
				.header("authorization", "Bearer stale-access");
			then.status(401)
				.header("content-type", "application/json")
				.body("{\"detail\":\"Given token not valid for any token type\"}");
		})
		.await;
	server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/products/")
				.query_param("category", "plants")
				.header("authorization", "Bearer fresh-access");
			then.status(200).header("content-type", "application/json").body(
				"[{\"id\":42,\"name\":\"Monstera cutting\",\"description\":\"Rooted in water\",\"price\":\"12.00\",\"category\":\"plants\",\"owner\":7,\"owner_name\":\"Amina Diallo\",\"owner_email\":\"amina@greencare.app\",\"created_at\":\"2026-08-01T09:00:00Z\",\"updated_at\":\"2026-08-02T10:15:00Z\"}]",
			);
		})
		.await;
	server
		.mock_async(|when, then| {
			when.method(POST).path("/products/orders/");
			then.status(201).header("content-type", "application/json").body(
				"{\"id\":5,\"product\":42,\"product_name\":\"Monstera cutting\",\"product_price\":\"12.00\",\"seller_name\":\"Amina Diallo\",\"quantity\":2,\"total_price\":\"24.00\",\"status\":\"pending\",\"shipping_address\":\"12 Garden Way, Freetown\",\"created_at\":\"2026-08-25T14:03:00Z\"}",
			);
		})
		.await;

	let refresh_mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/auth/token/refresh/")
				.json_body_includes("{\"refresh\":\"demo-refresh\"}");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"access\":\"fresh-access\"}");
		})
		.await;
	// The stored access token is already expired; only the refresh token is still good.
	let store: Arc<dyn TokenStore> =
		Arc::new(MemoryTokenStore::with_tokens(TokenPair::new("stale-access", "demo-refresh")));
	let client = ApiClient::new(Url::parse(&server.base_url())?, store)?;
	let listing = client.products(Some(ProductCategory::Plants)).await?;

	println!("Browsing {} plant listing(s).", listing.len());

	let draft = OrderDraft {
		product: listing[0].id,
		quantity: 2,
		shipping_address: Some("12 Garden Way, Freetown".into()),
		phone: None,
		notes: None,
	};
	let order = client.place_order(&draft).await?;

	println!(
		"Placed order #{} for {} x{}, {} total, status {}.",
		order.id, order.product_name, order.quantity, order.total_price, order.status,
	);
	println!(
		"The expired session healed itself underneath: {} refresh attempt(s).",
		client.refresh_metrics.attempts(),
	);

	refresh_mock.assert_async().await;

	Ok(())
}
