//! Integration tests for the private pages and the cart.

use reqwest::StatusCode;

use verified_plate_integration_tests::{ACCESS_TOKEN, BLOG_SLUG, TestContext, location};

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let ctx = TestContext::new().await;

    let resp = ctx.get("/no-such-page").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert!(resp.text().await.unwrap().contains("Page not found"));
}

#[tokio::test]
async fn test_sidebar_marks_active_dropdown() {
    let ctx = TestContext::new().await;
    ctx.login().await;

    let body = ctx.get("/profile").await.text().await.unwrap();
    assert!(body.contains("<details open>"));
    assert!(body.contains(r#"href="/profile" aria-current="page""#));
    assert!(body.contains("01310-100"));
    assert!(body.contains("01/04/1990"));
}

#[tokio::test]
async fn test_history_lists_consultations() {
    let ctx = TestContext::new().await;
    ctx.login().await;

    let body = ctx.get("/history").await.text().await.unwrap();
    assert!(body.contains("ABC1D23"));
    assert!(body.contains("05/03/2024"));
}

#[tokio::test]
async fn test_failed_list_degrades_to_notice() {
    let ctx = TestContext::new().await;
    ctx.login().await;

    let resp = ctx.get("/my-recommendations").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.text().await.unwrap().contains("load this data right now"));
}

#[tokio::test]
async fn test_new_consultation_normalizes_plate() {
    let ctx = TestContext::new().await;
    ctx.login().await;

    let invalid = ctx
        .post_form("/new-consultation", &[("plate", "12")])
        .await
        .text()
        .await
        .unwrap();
    assert!(invalid.contains("Enter a valid plate"));

    let resp = ctx
        .post_form("/new-consultation", &[("plate", "abc-1d23")])
        .await;
    assert_eq!(location(&resp), "/history?success=consultation_requested");

    let calls = ctx.backend.calls_to("POST", "/consultations");
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].body["plate"], "ABC1D23");
    assert_eq!(
        calls[0].authorization.as_deref(),
        Some(format!("Bearer {ACCESS_TOKEN}").as_str())
    );
}

#[tokio::test]
async fn test_blog_post_and_missing_post() {
    let ctx = TestContext::new().await;
    ctx.login().await;

    let index = ctx.get("/blogs").await.text().await.unwrap();
    assert!(index.contains(&format!("/blogs/{BLOG_SLUG}")));

    let post = ctx.get(&format!("/blogs/{BLOG_SLUG}")).await;
    assert_eq!(post.status(), StatusCode::OK);
    assert!(post.text().await.unwrap().contains("<p>Then book an inspection.</p>"));

    let missing = ctx.get("/blogs/not-a-post").await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_cart_add_and_checkout() {
    let ctx = TestContext::new().await;
    ctx.login().await;

    let overlay = ctx.get("/history?cart=open").await.text().await.unwrap();
    assert!(overlay.contains("10 consultations"));
    assert!(overlay.contains("Your cart is empty."));

    for _ in 0..2 {
        let resp = ctx
            .post_form("/cart/add", &[("package_id", "p10"), ("return_to", "/history")])
            .await;
        assert_eq!(location(&resp), "/history?cart=open");
    }

    let cart = ctx.get("/history?cart=open").await.text().await.unwrap();
    assert!(cart.contains("R$ 59.80"));

    let resp = ctx
        .post_form("/cart/checkout", &[("return_to", "/history")])
        .await;
    assert_eq!(location(&resp), "/purchases?success=purchase_completed");

    let purchases = ctx.backend.calls_to("POST", "/purchases");
    assert_eq!(purchases.len(), 1);
    assert_eq!(
        purchases[0].body,
        serde_json::json!({"items": [{"packageId": "p10", "quantity": 2}]})
    );

    // Cart is emptied after checkout
    let resp = ctx
        .post_form("/cart/checkout", &[("return_to", "/history")])
        .await;
    assert_eq!(location(&resp), "/history?cart=open&error=cart_empty");
}

#[tokio::test]
async fn test_cart_rejects_foreign_return_target() {
    let ctx = TestContext::new().await;
    ctx.login().await;

    let resp = ctx
        .post_form(
            "/cart/add",
            &[("package_id", "p10"), ("return_to", "//evil.example")],
        )
        .await;
    assert_eq!(location(&resp), "/?cart=open");

    let unknown = ctx
        .post_form("/cart/add", &[("package_id", "nope"), ("return_to", "/")])
        .await;
    assert_eq!(location(&unknown), "/?cart=open&error=unknown_package");
}

#[tokio::test]
async fn test_delete_account_logs_out() {
    let ctx = TestContext::new().await;
    ctx.login().await;

    let wrong = ctx
        .post_form("/delete-account", &[("confirmation", "delete")])
        .await
        .text()
        .await
        .unwrap();
    assert!(wrong.contains("Type DELETE to confirm"));
    assert!(ctx.backend.calls_to("DELETE", "/me").is_empty());

    let resp = ctx
        .post_form("/delete-account", &[("confirmation", "DELETE")])
        .await;
    assert_eq!(location(&resp), "/login?success=account_deleted");
    assert_eq!(location(&ctx.get("/").await), "/login");
}

#[tokio::test]
async fn test_contact_prefills_and_sends() {
    let ctx = TestContext::new().await;
    ctx.login().await;

    let page = ctx.get("/contact").await.text().await.unwrap();
    assert!(page.contains(r#"value="Ana Souza""#));

    let resp = ctx
        .post_form(
            "/contact",
            &[
                ("name", "Ana Souza"),
                ("email", "ana@example.com"),
                ("message", "Is monitoring included in every package?"),
            ],
        )
        .await;
    assert_eq!(location(&resp), "/contact?success=message_sent");
    assert_eq!(ctx.backend.calls_to("POST", "/contact").len(), 1);
}
