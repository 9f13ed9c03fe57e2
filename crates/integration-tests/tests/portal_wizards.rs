//! Integration tests for the signup and forgot-password wizards.

use reqwest::StatusCode;

use verified_plate_integration_tests::{TestContext, location};

const IDENTITY: &[(&str, &str)] = &[
    ("id", "12345-67"),
    ("fullName", "Ana Souza"),
    ("dateOfBirth", "1990-04-01"),
    ("email", "ana@example.com"),
    ("telephone", "(11) 98765-4321"),
    ("action", "next"),
];

#[tokio::test]
async fn test_signup_wizard_flow() {
    let ctx = TestContext::new().await;

    let start = ctx.get("/signup").await.text().await.unwrap();
    assert!(start.contains("Step 1 of 3"));

    let step2 = ctx.post_form("/signup", IDENTITY).await;
    assert_eq!(step2.status(), StatusCode::OK);
    let step2 = step2.text().await.unwrap();
    assert!(step2.contains("Step 2 of 3"));
    assert!(step2.contains("Must have at least one number"));

    // Back keeps step 1 values
    let back = ctx
        .post_form("/signup", &[("zipCode", "01310-100"), ("action", "back")])
        .await
        .text()
        .await
        .unwrap();
    assert!(back.contains("Step 1 of 3"));
    assert!(back.contains("Ana Souza"));

    ctx.post_form("/signup", IDENTITY).await;
    let done = ctx
        .post_form(
            "/signup",
            &[
                ("zipCode", "01310-100"),
                ("houseNumber", "42"),
                ("password", "Str0ng!pass"),
                ("confirmPassword", "Str0ng!pass"),
                ("action", "next"),
            ],
        )
        .await
        .text()
        .await
        .unwrap();
    assert!(done.contains("Step 3 of 3"));
    assert!(done.contains("We have sent email to ana@example.com"));
}

#[tokio::test]
async fn test_signup_step_errors_block_progress() {
    let ctx = TestContext::new().await;
    ctx.get("/signup").await;

    let body = ctx
        .post_form("/signup", &[("email", "nope"), ("action", "next")])
        .await
        .text()
        .await
        .unwrap();
    assert!(body.contains("Step 1 of 3"));
    assert!(body.contains("Invalid email address"));
    assert!(body.contains("ID is required"));
}

#[tokio::test]
async fn test_forgot_password_wizard_flow() {
    let ctx = TestContext::new().await;

    let start = ctx.get("/forgot-password").await.text().await.unwrap();
    assert!(start.contains("Step 1 of 3"));

    let otp = ctx
        .post_form(
            "/forgot-password",
            &[("email", "ana@example.com"), ("action", "next")],
        )
        .await
        .text()
        .await
        .unwrap();
    assert!(otp.contains("Step 2 of 3"));

    let short = ctx
        .post_form("/forgot-password", &[("otp", "12"), ("action", "next")])
        .await
        .text()
        .await
        .unwrap();
    assert!(short.contains("OTP must be at least 4 digits"));

    let password = ctx
        .post_form("/forgot-password", &[("otp", "1234"), ("action", "next")])
        .await
        .text()
        .await
        .unwrap();
    assert!(password.contains("Step 3 of 3"));
    assert!(password.contains("Contains at least one number"));

    let resp = ctx
        .post_form(
            "/forgot-password",
            &[
                ("password", "Str0ng!pass"),
                ("confirmPassword", "Str0ng!pass"),
                ("action", "next"),
            ],
        )
        .await;
    assert_eq!(location(&resp), "/login?success=password_reset");
}
