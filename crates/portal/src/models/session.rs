//! Session keys.
//!
//! Values kept in the visitor's cookie session.

/// Session keys for portal state.
pub mod keys {
    /// Raw token blob (`{"accessToken": ..., "refreshToken": ...}`).
    pub const AUTH_TOKENS: &str = "auth_tokens";

    /// In-progress signup wizard.
    pub const SIGNUP_WIZARD: &str = "signup_wizard";

    /// In-progress forgot-password wizard.
    pub const RECOVERY_WIZARD: &str = "recovery_wizard";

    /// Shopping cart of consultation packages.
    pub const CART: &str = "cart";
}
