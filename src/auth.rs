//! Auth-domain user and token models.

pub mod token;
pub mod user;

pub use token::{pair::*, secret::*};
pub use user::*;
