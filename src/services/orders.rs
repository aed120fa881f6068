//! Marketplace order endpoints, mounted under `/products/orders/`.

// self
use crate::{_prelude::*, client::ApiClient, http::ApiTransport};

/// Lifecycle state of an order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
	/// Placed, awaiting the seller.
	Pending,
	/// Accepted and being prepared.
	Processing,
	/// Fulfilled.
	Completed,
	/// Cancelled by the buyer or seller.
	Cancelled,
}
impl OrderStatus {
	/// Returns the wire label, e.g. `"processing"`.
	pub const fn as_str(&self) -> &'static str {
		match self {
			Self::Pending => "pending",
			Self::Processing => "processing",
			Self::Completed => "completed",
			Self::Cancelled => "cancelled",
		}
	}
}
impl Display for OrderStatus {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// A marketplace order, as seen by its buyer or seller.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Order {
	/// Backend identifier.
	pub id: i64,
	/// Identifier of the ordered product.
	pub product: i64,
	/// Product title, echoed for display.
	pub product_name: String,
	/// Unit price at order time, as a decimal string.
	pub product_price: String,
	/// Product image URL, echoed for display.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub product_image: Option<String>,
	/// Seller display name; present on buyer-facing listings.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub seller_name: Option<String>,
	/// Buyer display name; present on seller-facing listings.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub buyer_name: Option<String>,
	/// Ordered unit count.
	pub quantity: u32,
	/// Total charged, as a decimal string.
	pub total_price: String,
	/// Lifecycle state.
	pub status: OrderStatus,
	/// Delivery address.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub shipping_address: Option<String>,
	/// Contact phone number.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub phone: Option<String>,
	/// Free-form notes attached by buyer or seller.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub notes: Option<String>,
	/// Placement timestamp.
	#[serde(with = "time::serde::rfc3339")]
	pub created_at: OffsetDateTime,
}

/// Writable subset for placing an order.
#[derive(Clone, Debug, Serialize)]
pub struct OrderDraft {
	/// Identifier of the product to order.
	pub product: i64,
	/// Unit count.
	pub quantity: u32,
	/// Delivery address.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub shipping_address: Option<String>,
	/// Contact phone number.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub phone: Option<String>,
	/// Free-form notes for the seller.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub notes: Option<String>,
}

impl<T> ApiClient<T>
where
	T: ?Sized + ApiTransport,
{
	/// Lists the authenticated buyer's orders.
	pub async fn my_orders(&self) -> Result<Vec<Order>> {
		self.get_list("/products/orders/my_orders/").await
	}

	/// Lists the authenticated seller's sales.
	pub async fn my_sales(&self) -> Result<Vec<Order>> {
		self.get_list("/products/orders/my_sales/").await
	}

	/// Fetches one order.
	pub async fn order(&self, id: i64) -> Result<Order> {
		self.get_json(format!("/products/orders/{id}/")).await
	}

	/// Places an order.
	pub async fn place_order(&self, draft: &OrderDraft) -> Result<Order> {
		self.post_json("/products/orders/", draft).await
	}

	/// Moves an order to `status`; a seller-side operation.
	pub async fn update_order_status(&self, id: i64, status: OrderStatus) -> Result<Order> {
		let body = serde_json::json!({ "status": status });

		self.post_json(format!("/products/orders/{id}/update_status/"), &body).await
	}

	/// Replaces the notes attached to an order.
	pub async fn update_order_notes(&self, id: i64, notes: &str) -> Result<Order> {
		let body = serde_json::json!({ "notes": notes });

		self.put_json(format!("/products/orders/{id}/"), &body).await
	}

	/// Cancels an order; a buyer-side operation.
	pub async fn cancel_order(&self, id: i64) -> Result<()> {
		self.delete_resource(format!("/products/orders/{id}/")).await
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn status_labels_match_the_wire() {
		assert_eq!(OrderStatus::Pending.as_str(), "pending");
		assert_eq!(
			serde_json::from_str::<OrderStatus>("\"cancelled\"")
				.expect("Status should decode."),
			OrderStatus::Cancelled
		);
	}

	#[test]
	fn order_decodes_a_buyer_listing() {
		let raw = r#"{
			"id": 5,
			"product": 42,
			"product_name": "Pruning shears",
			"product_price": "18.50",
			"product_image": null,
			"seller_name": "Amina Diallo",
			"quantity": 2,
			"total_price": "37.00",
			"status": "pending",
			"shipping_address": "12 Garden Way, Freetown",
			"notes": null,
			"created_at": "2026-08-21T14:03:00Z"
		}"#;
		let order: Order = serde_json::from_str(raw).expect("Order should decode.");

		assert_eq!(order.status, OrderStatus::Pending);
		assert_eq!(order.quantity, 2);
		assert_eq!(order.buyer_name, None);
	}

	#[test]
	fn draft_carries_only_set_fields() {
		let draft = OrderDraft {
			product: 42,
			quantity: 2,
			shipping_address: Some("12 Garden Way, Freetown".into()),
			phone: None,
			notes: None,
		};
		let encoded = serde_json::to_value(&draft).expect("Draft should serialize.");

		assert_eq!(encoded["product"], 42);
		assert!(encoded.get("phone").is_none());
		assert!(encoded.get("notes").is_none());
	}
}
