//! Cart route handlers.
//!
//! The cart lives in the session. Every action redirects back to the page it
//! came from with the overlay open.

use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;

use crate::api::types::{NewPurchase, PurchaseItem};
use crate::error::AppError;
use crate::middleware::RequireSession;
use crate::models::{Cart, session_keys};
use crate::shell::{is_local_path, load_cart};
use crate::state::AppState;

/// Cart form data.
#[derive(Debug, Deserialize)]
pub struct CartForm {
    #[serde(default)]
    pub package_id: String,
    #[serde(default)]
    pub return_to: String,
}

impl CartForm {
    /// Overlay URL on the originating page; foreign targets fall back to `/`.
    fn back(&self, error: Option<&str>) -> Redirect {
        let path = if is_local_path(&self.return_to) {
            self.return_to.as_str()
        } else {
            "/"
        };
        match error {
            Some(code) => Redirect::to(&format!("{path}?cart=open&error={code}")),
            None => Redirect::to(&format!("{path}?cart=open")),
        }
    }
}

async fn save_cart(session: &Session, cart: &Cart) -> Result<(), AppError> {
    session.insert(session_keys::CART, cart).await?;
    Ok(())
}

/// Add one unit of a package to the cart.
pub async fn add(
    State(state): State<AppState>,
    RequireSession(token): RequireSession,
    session: Session,
    Form(form): Form<CartForm>,
) -> Result<Response, AppError> {
    let Some(package) = state
        .catalog()
        .find(&form.package_id, token.credentials())
        .await?
    else {
        tracing::warn!(package_id = %form.package_id, "Unknown package");
        return Ok(form.back(Some("unknown_package")).into_response());
    };

    let mut cart = load_cart(&session).await;
    cart.add(&package);
    save_cart(&session, &cart).await?;

    Ok(form.back(None).into_response())
}

/// Remove a package from the cart.
pub async fn remove(
    RequireSession(_token): RequireSession,
    session: Session,
    Form(form): Form<CartForm>,
) -> Result<Response, AppError> {
    let mut cart = load_cart(&session).await;
    if cart.remove(&form.package_id) {
        save_cart(&session, &cart).await?;
    }

    Ok(form.back(None).into_response())
}

/// Purchase everything in the cart.
///
/// On success the cart is emptied and the visitor lands on the purchase
/// history.
pub async fn checkout(
    State(state): State<AppState>,
    RequireSession(token): RequireSession,
    session: Session,
    Form(form): Form<CartForm>,
) -> Result<Response, AppError> {
    let cart = load_cart(&session).await;
    if cart.is_empty() {
        return Ok(form.back(Some("cart_empty")).into_response());
    }

    let purchase = NewPurchase {
        items: cart
            .lines()
            .iter()
            .map(|line| PurchaseItem {
                package_id: &line.package_id,
                quantity: line.quantity,
            })
            .collect(),
    };

    if let Err(e) = state
        .api()
        .post_no_content("purchases", &purchase, token.credentials())
        .await
    {
        tracing::warn!(error = %e, "Checkout failed");
        return Ok(form.back(Some("checkout_failed")).into_response());
    }

    tracing::info!(items = cart.item_count(), "Checkout completed");
    session.remove::<Cart>(session_keys::CART).await?;

    Ok(Redirect::to("/purchases?success=purchase_completed").into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn location(redirect: Redirect) -> String {
        redirect
            .into_response()
            .headers()
            .get("location")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string()
    }

    fn form(return_to: &str) -> CartForm {
        CartForm {
            package_id: "p10".to_string(),
            return_to: return_to.to_string(),
        }
    }

    #[test]
    fn test_back_to_local_page() {
        assert_eq!(location(form("/history").back(None)), "/history?cart=open");
        assert_eq!(
            location(form("/history").back(Some("cart_empty"))),
            "/history?cart=open&error=cart_empty"
        );
    }

    #[test]
    fn test_foreign_return_path_falls_back_to_home() {
        assert_eq!(
            location(form("https://evil.example").back(None)),
            "/?cart=open"
        );
        assert_eq!(location(form("//evil.example").back(None)), "/?cart=open");
    }
}
