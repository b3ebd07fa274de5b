use folio_core::TokenPurpose;
use serde_json::json;

use crate::helpers::{TestApp, error_message};

#[tokio::test]
async fn forgot_password_never_reveals_account_existence() {
    let app = TestApp::spawn().await;

    let response = app
        .post_json("/forgot-password", &json!({ "email": "nobody@folio.dev" }))
        .await;
    assert_eq!(response.status().as_u16(), 200);
    assert!(app.email_client.sent().is_empty());
}

#[tokio::test]
async fn reset_flow_replaces_password_and_revokes_sessions() {
    let app = TestApp::spawn().await;
    app.signup_verified("reader@folio.dev", "P@ssw0rd1").await;
    let (_, refresh_token) = app.login_tokens("reader@folio.dev", "P@ssw0rd1").await;

    let response = app
        .post_json("/forgot-password", &json!({ "email": "reader@folio.dev" }))
        .await;
    assert_eq!(response.status().as_u16(), 200);

    let reset_token = app
        .email_client
        .last_token_for(TokenPurpose::ResetPassword)
        .expect("no reset email recorded");

    let response = app
        .post_json(
            "/reset-password",
            &json!({ "token": reset_token, "newPassword": "N3w-Passw0rd" }),
        )
        .await;
    assert_eq!(response.status().as_u16(), 200);

    // Old password dead, new password live.
    assert_eq!(
        app.post_login("reader@folio.dev", "P@ssw0rd1")
            .await
            .status()
            .as_u16(),
        401
    );
    assert_eq!(
        app.post_login("reader@folio.dev", "N3w-Passw0rd")
            .await
            .status()
            .as_u16(),
        200
    );

    // Every pre-reset session was revoked.
    assert_eq!(app.post_refresh(&refresh_token).await.status().as_u16(), 401);
}

#[tokio::test]
async fn reset_token_is_single_use() {
    let app = TestApp::spawn().await;
    app.signup_verified("reader@folio.dev", "P@ssw0rd1").await;

    app.post_json("/forgot-password", &json!({ "email": "reader@folio.dev" }))
        .await;
    let reset_token = app
        .email_client
        .last_token_for(TokenPurpose::ResetPassword)
        .unwrap();

    assert_eq!(
        app.post_json(
            "/reset-password",
            &json!({ "token": reset_token, "newPassword": "N3w-Passw0rd" }),
        )
        .await
        .status()
        .as_u16(),
        200
    );

    let response = app
        .post_json(
            "/reset-password",
            &json!({ "token": reset_token, "newPassword": "An0ther-Passw0rd" }),
        )
        .await;
    assert_eq!(response.status().as_u16(), 400);
    assert!(
        error_message(response)
            .await
            .contains("already been used")
    );
}

#[tokio::test]
async fn reset_token_cannot_verify_an_email() {
    let app = TestApp::spawn().await;
    app.signup_verified("reader@folio.dev", "P@ssw0rd1").await;

    app.post_json("/forgot-password", &json!({ "email": "reader@folio.dev" }))
        .await;
    let reset_token = app
        .email_client
        .last_token_for(TokenPurpose::ResetPassword)
        .unwrap();

    let response = app.get_verify_email(&reset_token).await;
    assert_eq!(response.status().as_u16(), 400);
    assert!(error_message(response).await.contains("purpose mismatch"));
}

#[tokio::test]
async fn resend_verification_issues_a_fresh_link() {
    let app = TestApp::spawn().await;
    assert_eq!(
        app.post_signup("reader@folio.dev", "P@ssw0rd1")
            .await
            .status()
            .as_u16(),
        201
    );
    let first_token = app
        .email_client
        .last_token_for(TokenPurpose::VerifyEmail)
        .unwrap();

    let response = app
        .post_json(
            "/resend-verification",
            &json!({ "email": "reader@folio.dev" }),
        )
        .await;
    assert_eq!(response.status().as_u16(), 200);

    let second_token = app
        .email_client
        .last_token_for(TokenPurpose::VerifyEmail)
        .unwrap();
    assert_ne!(first_token, second_token);

    // The superseded link no longer works, the fresh one does.
    assert_eq!(app.get_verify_email(&first_token).await.status().as_u16(), 400);
    assert_eq!(app.get_verify_email(&second_token).await.status().as_u16(), 200);
}
