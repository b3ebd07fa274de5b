use serde_json::{Value, json};

use crate::helpers::TestApp;

#[tokio::test]
async fn refresh_rotates_the_token_pair() {
    let app = TestApp::spawn().await;
    app.signup_verified("reader@folio.dev", "P@ssw0rd1").await;
    let (_, refresh_token) = app.login_tokens("reader@folio.dev", "P@ssw0rd1").await;

    let response = app.post_refresh(&refresh_token).await;
    assert_eq!(response.status().as_u16(), 200);

    let body: Value = response.json().await.unwrap();
    let new_refresh = body["refreshToken"].as_str().unwrap();
    assert_ne!(new_refresh, refresh_token);
    assert!(!body["accessToken"].as_str().unwrap().is_empty());

    // The successor keeps working.
    let response = app.post_refresh(new_refresh).await;
    assert_eq!(response.status().as_u16(), 200);
}

#[tokio::test]
async fn replayed_refresh_token_is_rejected() {
    let app = TestApp::spawn().await;
    app.signup_verified("reader@folio.dev", "P@ssw0rd1").await;
    let (_, refresh_token) = app.login_tokens("reader@folio.dev", "P@ssw0rd1").await;

    assert_eq!(app.post_refresh(&refresh_token).await.status().as_u16(), 200);

    // Second presentation of the same token observes the rotation.
    assert_eq!(app.post_refresh(&refresh_token).await.status().as_u16(), 401);
}

#[tokio::test]
async fn access_token_cannot_stand_in_for_a_refresh_token() {
    let app = TestApp::spawn().await;
    app.signup_verified("reader@folio.dev", "P@ssw0rd1").await;
    let (access_token, _) = app.login_tokens("reader@folio.dev", "P@ssw0rd1").await;

    assert_eq!(app.post_refresh(&access_token).await.status().as_u16(), 401);
}

#[tokio::test]
async fn refresh_without_a_token_is_a_bad_request() {
    let app = TestApp::spawn().await;

    let response = app
        .http_client
        .post(format!("{}/refresh", app.address))
        .json(&json!({}))
        .send()
        .await
        .unwrap();
    // An empty body deserializes to no token at all.
    assert_eq!(response.status().as_u16(), 422);

    let response = app
        .http_client
        .post(format!("{}/refresh", app.address))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 400);
}
