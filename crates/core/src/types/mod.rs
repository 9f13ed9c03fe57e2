//! Core types for the Verified Plate portal.
//!
//! This module provides the email shape check and type-safe wrappers for
//! money and stored auth tokens.

pub mod email;
pub mod money;
pub mod tokens;

pub use money::{Currency, Money};
pub use tokens::{AuthTokens, TokenError};
