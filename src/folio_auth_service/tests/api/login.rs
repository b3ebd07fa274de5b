use serde_json::Value;

use crate::helpers::{TestApp, error_message};

#[tokio::test]
async fn unverified_account_cannot_log_in() {
    let app = TestApp::spawn().await;
    assert_eq!(
        app.post_signup("reader@folio.dev", "P@ssw0rd1")
            .await
            .status()
            .as_u16(),
        201
    );

    let response = app.post_login("reader@folio.dev", "P@ssw0rd1").await;
    assert_eq!(response.status().as_u16(), 401);
    assert!(
        error_message(response)
            .await
            .contains("Please verify your email before logging in")
    );
}

#[tokio::test]
async fn verified_account_gets_a_token_pair() {
    let app = TestApp::spawn().await;
    app.signup_verified("reader@folio.dev", "P@ssw0rd1").await;

    let response = app.post_login("reader@folio.dev", "P@ssw0rd1").await;
    assert_eq!(response.status().as_u16(), 200);

    let body: Value = response.json().await.unwrap();
    assert!(!body["accessToken"].as_str().unwrap().is_empty());
    assert!(!body["refreshToken"].as_str().unwrap().is_empty());
    assert_eq!(body["tokenType"], "Bearer");
    assert_eq!(body["email"], "reader@folio.dev");
    assert_eq!(body["role"], "USER");
    assert_eq!(body["expiresIn"].as_i64().unwrap(), 900_000);
}

#[tokio::test]
async fn wrong_password_is_indistinguishable_from_unknown_email() {
    let app = TestApp::spawn().await;
    app.signup_verified("reader@folio.dev", "P@ssw0rd1").await;

    let wrong_password = app.post_login("reader@folio.dev", "WrongP@ssw0rd").await;
    assert_eq!(wrong_password.status().as_u16(), 401);
    let wrong_password_message = error_message(wrong_password).await;

    let unknown_email = app.post_login("stranger@folio.dev", "P@ssw0rd1").await;
    assert_eq!(unknown_email.status().as_u16(), 401);
    let unknown_email_message = error_message(unknown_email).await;

    assert_eq!(wrong_password_message, unknown_email_message);
    assert!(wrong_password_message.contains("Invalid email or password"));
}

#[tokio::test]
async fn fresh_access_token_passes_verification() {
    let app = TestApp::spawn().await;
    app.signup_verified("reader@folio.dev", "P@ssw0rd1").await;
    let (access_token, _) = app.login_tokens("reader@folio.dev", "P@ssw0rd1").await;

    let response = app.post_verify_token(&access_token).await;
    assert_eq!(response.status().as_u16(), 200);
}

#[tokio::test]
async fn forged_access_token_fails_verification() {
    let app = TestApp::spawn().await;

    let response = app.post_verify_token("not-a-real-token").await;
    assert_eq!(response.status().as_u16(), 401);
}
