//! Marketplace product endpoints.

// self
use crate::{_prelude::*, client::ApiClient, http::ApiTransport};

/// Marketplace category a product is listed under.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductCategory {
	/// Live plants and seedlings.
	Plants,
	/// Plant treatments and remedies.
	Medicines,
	/// Gardening tools.
	Tools,
	/// Soil and fertilizers.
	Fertilizers,
}
impl ProductCategory {
	/// Returns the wire label, e.g. `"fertilizers"`.
	pub const fn as_str(&self) -> &'static str {
		match self {
			Self::Plants => "plants",
			Self::Medicines => "medicines",
			Self::Tools => "tools",
			Self::Fertilizers => "fertilizers",
		}
	}
}
impl Display for ProductCategory {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// A product listed on the marketplace.
///
/// The backend serializes decimal prices as JSON strings to avoid float drift;
/// [`Product::price_amount`] parses one when arithmetic is needed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Product {
	/// Backend identifier.
	pub id: i64,
	/// Listing title.
	pub name: String,
	/// Listing description.
	pub description: String,
	/// Unit price as a decimal string, e.g. `"49.90"`.
	pub price: String,
	/// Marketplace category.
	pub category: ProductCategory,
	/// Optional primary image URL.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub image: Option<String>,
	/// Identifier of the selling account, if attributed.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub owner: Option<i64>,
	/// Seller display name.
	pub owner_name: String,
	/// Seller contact email.
	pub owner_email: String,
	/// Listing creation timestamp.
	#[serde(with = "time::serde::rfc3339")]
	pub created_at: OffsetDateTime,
	/// Listing update timestamp.
	#[serde(with = "time::serde::rfc3339")]
	pub updated_at: OffsetDateTime,
}
impl Product {
	/// Parses [`Self::price`] into a number, [`None`] when the backend sent something unexpected.
	pub fn price_amount(&self) -> Option<f64> {
		self.price.parse().ok()
	}
}

/// Writable subset for creating or updating a product listing.
#[derive(Clone, Debug, Serialize)]
pub struct ProductDraft {
	/// Listing title.
	pub name: String,
	/// Listing description.
	pub description: String,
	/// Unit price as a decimal string.
	pub price: String,
	/// Marketplace category.
	pub category: ProductCategory,
	/// Optional primary image URL.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub image: Option<String>,
}

impl<T> ApiClient<T>
where
	T: ?Sized + ApiTransport,
{
	/// Lists products, optionally narrowed to one category.
	pub async fn products(&self, category: Option<ProductCategory>) -> Result<Vec<Product>> {
		let path = match category {
			Some(category) => format!("/products/?category={category}"),
			None => "/products/".into(),
		};

		self.get_list(path).await
	}

	/// Lists the authenticated seller's own products.
	pub async fn my_products(&self) -> Result<Vec<Product>> {
		self.get_list("/products/my_products/").await
	}

	/// Fetches one product.
	pub async fn product(&self, id: i64) -> Result<Product> {
		self.get_json(format!("/products/{id}/")).await
	}

	/// Creates a product listing.
	pub async fn create_product(&self, draft: &ProductDraft) -> Result<Product> {
		self.post_json("/products/", draft).await
	}

	/// Replaces a product listing.
	pub async fn update_product(&self, id: i64, draft: &ProductDraft) -> Result<Product> {
		self.put_json(format!("/products/{id}/"), draft).await
	}

	/// Deletes a product listing.
	pub async fn delete_product(&self, id: i64) -> Result<()> {
		self.delete_resource(format!("/products/{id}/")).await
	}
}
