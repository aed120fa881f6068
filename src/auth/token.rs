//! Token material: redacted secrets and the stored access/refresh pair.

pub mod pair;
pub mod secret;
