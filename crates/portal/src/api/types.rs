//! Request and response bodies exchanged with the backend API.
//!
//! Field names follow the backend's camelCase JSON.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use verified_plate_core::Money;

/// `dd/mm/yyyy`, as dates are shown to visitors.
const DATE_FORMAT: &str = "%d/%m/%Y";

// =============================================================================
// Auth
// =============================================================================

/// `POST /auth/login` body.
#[derive(Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// `POST /auth/login` response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

/// `POST /auth/reset-password` body.
#[derive(Serialize)]
pub struct ResetPasswordRequest<'a> {
    pub token: &'a str,
    pub password: &'a str,
}

/// `POST /auth/confirm-email` body.
#[derive(Serialize)]
pub struct ConfirmEmailRequest<'a> {
    pub token: &'a str,
}

// =============================================================================
// Account
// =============================================================================

/// The signed-in account (`GET /me`).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub full_name: String,
    pub email: String,
    #[serde(default)]
    pub telephone: Option<String>,
    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default)]
    pub zip_code: Option<String>,
    #[serde(default)]
    pub balance: Option<Money>,
}

impl Account {
    /// Date of birth as shown on the profile page.
    #[must_use]
    pub fn born_on(&self) -> String {
        self.date_of_birth
            .map(|d| d.format(DATE_FORMAT).to_string())
            .unwrap_or_default()
    }

    /// First word of the full name, for greetings.
    #[must_use]
    pub fn first_name(&self) -> &str {
        self.full_name
            .split_whitespace()
            .next()
            .unwrap_or(&self.full_name)
    }
}

// =============================================================================
// Consultations
// =============================================================================

/// A plate consultation the visitor requested (`GET /consultations`).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Consultation {
    pub id: String,
    pub plate: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub summary: Option<String>,
}

impl Consultation {
    #[must_use]
    pub fn created_on(&self) -> String {
        self.created_at.format(DATE_FORMAT).to_string()
    }
}

/// `POST /consultations` body.
#[derive(Serialize)]
pub struct NewConsultation<'a> {
    pub plate: &'a str,
}

/// A recommendation derived from past consultations.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub plate: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Recommendation {
    #[must_use]
    pub fn created_on(&self) -> String {
        self.created_at.format(DATE_FORMAT).to_string()
    }
}

// =============================================================================
// Purchases
// =============================================================================

/// A consultation package offered for sale (`GET /packages`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Package {
    pub id: String,
    pub title: String,
    /// Number of consultations included.
    pub consultations: u32,
    pub price: Money,
}

/// A completed purchase (`GET /purchases`).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Purchase {
    pub id: String,
    pub description: String,
    pub total: Money,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl Purchase {
    #[must_use]
    pub fn created_on(&self) -> String {
        self.created_at.format(DATE_FORMAT).to_string()
    }
}

/// One line of a `POST /purchases` body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseItem<'a> {
    pub package_id: &'a str,
    pub quantity: u32,
}

/// `POST /purchases` body.
#[derive(Debug, Serialize)]
pub struct NewPurchase<'a> {
    pub items: Vec<PurchaseItem<'a>>,
}

// =============================================================================
// Blog & contact
// =============================================================================

/// A blog article (`GET /blogs`, `GET /blogs/{slug}`).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPost {
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub excerpt: String,
    /// Plain-text body; paragraphs are separated by blank lines.
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
}

impl BlogPost {
    /// Publication date, or an empty string for drafts.
    #[must_use]
    pub fn published_on(&self) -> String {
        self.published_at
            .map(|d| d.format(DATE_FORMAT).to_string())
            .unwrap_or_default()
    }

    /// Body split into non-empty paragraphs.
    #[must_use]
    pub fn paragraphs(&self) -> Vec<&str> {
        self.body
            .split("\n\n")
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect()
    }
}

/// `POST /contact` body.
#[derive(Serialize)]
pub struct ContactMessage<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub message: &'a str,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_account_without_balance() {
        let account: Account =
            serde_json::from_str(r#"{"fullName":"Ana Souza","email":"ana@example.com"}"#).unwrap();
        assert_eq!(account.first_name(), "Ana");
        assert!(account.balance.is_none());
    }

    #[test]
    fn test_account_balance_defaults_to_brl() {
        let account: Account = serde_json::from_str(
            r#"{"fullName":"Ana","email":"a@b.co","balance":{"amount":"123.52"}}"#,
        )
        .unwrap();
        assert_eq!(account.balance.unwrap().to_string(), "R$ 123.52");
    }

    #[test]
    fn test_login_response_without_refresh() {
        let response: LoginResponse = serde_json::from_str(r#"{"accessToken":"t"}"#).unwrap();
        assert_eq!(response.access_token.as_deref(), Some("t"));
        assert!(response.refresh_token.is_none());
    }

    #[test]
    fn test_purchase_body_shape() {
        let body = NewPurchase {
            items: vec![PurchaseItem {
                package_id: "p10",
                quantity: 2,
            }],
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({"items": [{"packageId": "p10", "quantity": 2}]})
        );
    }

    #[test]
    fn test_dates_are_day_first() {
        let purchase: Purchase = serde_json::from_str(
            r#"{"id":"1","description":"10 consultations","total":{"amount":"29.90"},
                "status":"paid","createdAt":"2024-03-05T12:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(purchase.created_on(), "05/03/2024");
    }

    #[test]
    fn test_blog_paragraphs() {
        let post = BlogPost {
            slug: "s".to_string(),
            title: "t".to_string(),
            excerpt: String::new(),
            body: "First.\n\n\n\nSecond.\n\n  ".to_string(),
            published_at: None,
        };
        assert_eq!(post.paragraphs(), ["First.", "Second."]);
    }
}
