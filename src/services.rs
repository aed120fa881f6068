//! Typed wrappers over the GreenCare REST surface.
//!
//! One module per backend app. Every call goes through [`ApiClient::dispatch`](crate::client::ApiClient::dispatch),
//! so bearer attachment and the shared token refresh apply uniformly.

pub mod auth;
pub mod orders;
pub mod plants;
pub mod products;
pub mod watering;

pub use self::{auth::*, orders::*, plants::*, products::*, watering::*};
