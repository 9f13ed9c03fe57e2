//! Dashboard route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::response::IntoResponse;

use crate::filters;
use crate::shell::Shell;

/// Shortcut card on the dashboard.
pub struct Shortcut {
    pub title: &'static str,
    pub description: &'static str,
    pub path: &'static str,
}

const SHORTCUTS: &[Shortcut] = &[
    Shortcut {
        title: "New consultation",
        description: "Check a vehicle by its plate before you buy.",
        path: "/new-consultation",
    },
    Shortcut {
        title: "History",
        description: "Review the consultations you already ran.",
        path: "/history",
    },
    Shortcut {
        title: "Always Connected",
        description: "Get notified when something changes on your plates.",
        path: "/always-connected",
    },
];

/// Dashboard page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/dashboard.html")]
pub struct DashboardTemplate {
    pub shell: Shell,
    pub greeting: String,
    pub shortcuts: &'static [Shortcut],
}

/// Display the dashboard.
pub async fn dashboard(shell: Shell) -> impl IntoResponse {
    let greeting = shell
        .account
        .as_ref()
        .map_or_else(|| "Welcome back".to_string(), |a| format!("Welcome back, {}", a.first_name()));

    DashboardTemplate {
        shell,
        greeting,
        shortcuts: SHORTCUTS,
    }
}
