//! Private layout: sidebar navigation, top bar and cart overlay.
//!
//! Every private page embeds a [`Shell`], which is also the route guard: the
//! extractor first requires a session token (redirecting to `/login`
//! otherwise), then loads what the layout shows.
//!
//! ```text
//! +-----------+---------------------------------------------+
//! | sidebar   | top bar: name, balance, cart, Buy           |
//! |           +---------------------------------------------+
//! |  items    | page content                                |
//! |  logout   |                                             |
//! +-----------+---------------------------------------------+
//!                                   cart overlay (?cart=open)
//! ```

use axum::{
    extract::FromRequestParts,
    http::request::Parts,
    response::{IntoResponse, Response},
};
use tower_sessions::Session;

use crate::api::types::{Account, Package};
use crate::middleware::{RequireSession, SessionToken};
use crate::models::{Cart, CartLine, session_keys};
use crate::state::AppState;

/// Name shown when the account cannot be loaded.
pub const FALLBACK_NAME: &str = "My account";

/// Notice shown when backend data could not be loaded.
pub const LOAD_FAILED_MESSAGE: &str = "We couldn't load this data right now.";

// =============================================================================
// Navigation
// =============================================================================

/// A sidebar entry.
#[derive(Debug, Clone, Copy)]
pub struct NavItem {
    pub label: &'static str,
    /// Target path; empty for dropdown headers.
    pub path: &'static str,
    pub icon: &'static str,
    pub children: &'static [NavItem],
}

const fn link(label: &'static str, path: &'static str, icon: &'static str) -> NavItem {
    NavItem {
        label,
        path,
        icon,
        children: &[],
    }
}

/// Sidebar entries, in display order.
pub const NAVIGATION: &[NavItem] = &[
    link("New consultation", "/new-consultation", "search"),
    link("History", "/history", "history"),
    link("My recommendations", "/my-recommendations", "star"),
    NavItem {
        label: "My data",
        path: "",
        icon: "user",
        children: &[
            link("Profile", "/profile", "id-card"),
            link("Purchases Made", "/purchases", "receipt"),
            link("Always Connected", "/always-connected", "bell"),
            link("Delete Account", "/delete-account", "trash"),
        ],
    },
    link("Blogs", "/blogs", "book"),
    link("Contact", "/contact", "mail"),
];

/// A sidebar entry resolved against the current path.
#[derive(Debug, Clone)]
pub struct NavLink {
    pub label: &'static str,
    pub path: &'static str,
    pub icon: &'static str,
    pub active: bool,
    /// Dropdowns only: rendered open because a child is active.
    pub expanded: bool,
    pub children: Vec<NavLink>,
}

impl NavLink {
    #[must_use]
    pub fn is_dropdown(&self) -> bool {
        !self.children.is_empty()
    }
}

/// Resolve the sidebar for `current_path`.
///
/// A link is active when the current path contains its path; a dropdown is
/// expanded (and marked active) when one of its children is.
#[must_use]
pub fn navigation(current_path: &str) -> Vec<NavLink> {
    NAVIGATION.iter().map(|item| resolve(item, current_path)).collect()
}

fn resolve(item: &NavItem, current_path: &str) -> NavLink {
    let children: Vec<NavLink> = item
        .children
        .iter()
        .map(|child| resolve(child, current_path))
        .collect();
    let expanded = children.iter().any(|c| c.active);
    let active = if children.is_empty() {
        !item.path.is_empty() && current_path.contains(item.path)
    } else {
        expanded
    };

    NavLink {
        label: item.label,
        path: item.path,
        icon: item.icon,
        active,
        expanded,
        children,
    }
}

// =============================================================================
// Top Bar & Cart
// =============================================================================

/// Account summary in the top bar.
#[derive(Debug, Clone)]
pub struct TopBar {
    pub name: String,
    /// Formatted balance, absent when unknown.
    pub balance: Option<String>,
    pub cart_count: u32,
}

impl TopBar {
    fn new(account: Option<&Account>, cart: &Cart) -> Self {
        Self {
            name: account.map_or_else(|| FALLBACK_NAME.to_string(), |a| a.full_name.clone()),
            balance: account.and_then(|a| a.balance).map(|b| b.to_string()),
            cart_count: cart.item_count(),
        }
    }
}

/// Cart overlay contents.
#[derive(Debug, Clone)]
pub struct CartOverlay {
    pub open: bool,
    pub packages: Vec<Package>,
    pub lines: Vec<CartLine>,
    pub total: String,
    /// Where cart forms send the visitor back to.
    pub return_to: String,
    pub notice: Option<&'static str>,
}

/// Whether `path` is safe to redirect to: a local absolute path.
#[must_use]
pub fn is_local_path(path: &str) -> bool {
    path.starts_with('/') && !path.starts_with("//") && !path.contains('\\')
}

/// Whether the query string asks for the cart overlay (`cart=open`).
fn cart_requested(query: Option<&str>) -> bool {
    query_pairs(query).any(|(k, v)| k == "cart" && v == "open")
}

/// Overlay notice for an `error` code left by a cart action.
fn cart_error(query: Option<&str>) -> Option<&'static str> {
    query_pairs(query)
        .find(|(k, _)| k == "error")
        .and_then(|(_, code)| match code.as_ref() {
            "unknown_package" => Some("That package is no longer available."),
            "cart_empty" => Some("Your cart is empty."),
            "checkout_failed" => Some("Checkout failed. Please try again."),
            _ => None,
        })
}

fn query_pairs(
    query: Option<&str>,
) -> impl Iterator<Item = (std::borrow::Cow<'_, str>, std::borrow::Cow<'_, str>)> {
    url::form_urlencoded::parse(query.unwrap_or_default().as_bytes())
}

// =============================================================================
// Shell
// =============================================================================

/// Everything the private layout needs, plus the visitor's token.
pub struct Shell {
    pub token: SessionToken,
    pub current_path: String,
    pub nav: Vec<NavLink>,
    pub top_bar: TopBar,
    pub cart: CartOverlay,
    /// The account, when `GET /me` succeeded.
    pub account: Option<Account>,
}

impl Shell {
    /// Credentials argument for `ApiClient` calls.
    #[must_use]
    pub fn credentials(&self) -> Option<&str> {
        self.token.credentials()
    }
}

impl FromRequestParts<AppState> for Shell {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let RequireSession(token) = RequireSession::from_request_parts(parts, state)
            .await
            .map_err(IntoResponse::into_response)?;

        let current_path = parts.uri.path().to_string();
        let open = cart_requested(parts.uri.query());
        let cart_notice = cart_error(parts.uri.query());

        let cart = match parts.extensions.get::<Session>() {
            Some(session) => load_cart(session).await,
            None => Cart::default(),
        };

        let account = match state.api().get::<Account>("me", token.credentials()).await {
            Ok(account) => Some(account),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load account for top bar");
                None
            }
        };

        // Packages are only needed when the overlay is shown.
        let (packages, notice) = if open {
            match state.catalog().packages(token.credentials()).await {
                Ok(packages) => (packages.as_ref().clone(), None),
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to load packages");
                    (Vec::new(), Some(LOAD_FAILED_MESSAGE))
                }
            }
        } else {
            (Vec::new(), None)
        };

        Ok(Self {
            top_bar: TopBar::new(account.as_ref(), &cart),
            cart: CartOverlay {
                open,
                packages,
                lines: cart.lines().to_vec(),
                total: cart.total().to_string(),
                return_to: current_path.clone(),
                notice: notice.or(cart_notice),
            },
            nav: navigation(&current_path),
            current_path,
            account,
            token,
        })
    }
}

/// Read the cart from the session; unreadable carts are treated as empty.
pub async fn load_cart(session: &Session) -> Cart {
    match session.get::<Cart>(session_keys::CART).await {
        Ok(cart) => cart.unwrap_or_default(),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to read cart from session");
            Cart::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn find<'a>(nav: &'a [NavLink], label: &str) -> &'a NavLink {
        nav.iter()
            .flat_map(|l| std::iter::once(l).chain(l.children.iter()))
            .find(|l| l.label == label)
            .unwrap_or_else(|| panic!("no nav item {label}"))
    }

    #[test]
    fn test_navigation_order() {
        let labels: Vec<_> = navigation("/").iter().map(|l| l.label).collect();
        assert_eq!(
            labels,
            [
                "New consultation",
                "History",
                "My recommendations",
                "My data",
                "Blogs",
                "Contact"
            ]
        );
    }

    #[test]
    fn test_active_link() {
        let nav = navigation("/history");
        assert!(find(&nav, "History").active);
        assert!(!find(&nav, "New consultation").active);
        assert!(!find(&nav, "My data").expanded);
    }

    #[test]
    fn test_nested_path_keeps_parent_link_active() {
        let nav = navigation("/blogs/choosing-a-used-car");
        assert!(find(&nav, "Blogs").active);
    }

    #[test]
    fn test_dropdown_expands_for_active_child() {
        let nav = navigation("/purchases");
        let my_data = find(&nav, "My data");
        assert!(my_data.is_dropdown());
        assert!(my_data.expanded);
        assert!(my_data.active);
        assert!(find(&nav, "Purchases Made").active);
        assert!(!find(&nav, "Profile").active);
    }

    #[test]
    fn test_home_activates_nothing() {
        let nav = navigation("/");
        assert!(nav.iter().all(|l| !l.active && !l.expanded));
    }

    #[test]
    fn test_local_paths() {
        assert!(is_local_path("/history"));
        assert!(!is_local_path("//evil.example"));
        assert!(!is_local_path("https://evil.example"));
        assert!(!is_local_path("/\\evil.example"));
        assert!(!is_local_path(""));
    }

    #[test]
    fn test_cart_query() {
        assert!(cart_requested(Some("cart=open")));
        assert!(cart_requested(Some("success=added&cart=open")));
        assert!(!cart_requested(Some("cart=closed")));
        assert!(!cart_requested(None));
    }

    #[test]
    fn test_cart_error_notice() {
        assert_eq!(
            cart_error(Some("cart=open&error=cart_empty")),
            Some("Your cart is empty.")
        );
        assert_eq!(cart_error(Some("cart=open&error=%3Cscript%3E")), None);
        assert_eq!(cart_error(None), None);
    }

    #[test]
    fn test_top_bar_fallback() {
        let bar = TopBar::new(None, &Cart::default());
        assert_eq!(bar.name, FALLBACK_NAME);
        assert!(bar.balance.is_none());
        assert_eq!(bar.cart_count, 0);
    }
}
