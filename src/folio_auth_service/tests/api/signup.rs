use folio_core::TokenPurpose;
use serde_json::json;

use crate::helpers::{TestApp, error_message};

#[tokio::test]
async fn signup_creates_account_and_sends_verification_link() {
    let app = TestApp::spawn().await;

    let response = app.post_signup("reader@folio.dev", "P@ssw0rd1").await;
    assert_eq!(response.status().as_u16(), 201);

    let sent = app.email_client.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].purpose, TokenPurpose::VerifyEmail);
    assert_eq!(sent[0].recipient, "reader@folio.dev");
}

#[tokio::test]
async fn duplicate_email_is_a_conflict() {
    let app = TestApp::spawn().await;

    assert_eq!(
        app.post_signup("reader@folio.dev", "P@ssw0rd1")
            .await
            .status()
            .as_u16(),
        201
    );

    let response = app.post_signup("reader@folio.dev", "0therP@ssw0rd").await;
    assert_eq!(response.status().as_u16(), 409);
}

#[tokio::test]
async fn malformed_email_is_rejected() {
    let app = TestApp::spawn().await;

    let response = app.post_signup("not-an-email", "P@ssw0rd1").await;
    assert_eq!(response.status().as_u16(), 400);
}

#[tokio::test]
async fn short_password_is_rejected() {
    let app = TestApp::spawn().await;

    let response = app.post_signup("reader@folio.dev", "short").await;
    assert_eq!(response.status().as_u16(), 400);
}

#[tokio::test]
async fn missing_full_name_is_rejected() {
    let app = TestApp::spawn().await;

    let response = app
        .post_json(
            "/signup",
            &json!({ "email": "reader@folio.dev", "password": "P@ssw0rd1" }),
        )
        .await;
    assert_eq!(response.status().as_u16(), 422);
}

#[tokio::test]
async fn failed_email_dispatch_fails_the_signup() {
    let app = TestApp::spawn().await;
    app.email_client.set_failing(true);

    let response = app.post_signup("reader@folio.dev", "P@ssw0rd1").await;
    assert_eq!(response.status().as_u16(), 500);
    assert_eq!(
        error_message(response).await,
        "There was an error sending the email. Try again later!"
    );
}
