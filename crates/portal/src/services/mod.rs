//! Business logic services for the portal.
//!
//! # Services
//!
//! - `auth` - Login, password reset, email confirmation and the session token
//! - `catalog` - Consultation packages offered in the cart overlay (cached)

pub mod auth;
pub mod catalog;

pub use auth::{AuthError, AuthService};
pub use catalog::Catalog;
