//! Session-stored models for the portal.

pub mod cart;
pub mod session;

pub use cart::{Cart, CartLine};
pub use session::keys as session_keys;
