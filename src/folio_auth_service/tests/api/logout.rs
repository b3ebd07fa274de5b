use serde_json::json;

use crate::helpers::TestApp;

#[tokio::test]
async fn logout_kills_both_tokens() {
    let app = TestApp::spawn().await;
    app.signup_verified("reader@folio.dev", "P@ssw0rd1").await;
    let (access_token, refresh_token) =
        app.login_tokens("reader@folio.dev", "P@ssw0rd1").await;

    assert_eq!(
        app.post_verify_token(&access_token).await.status().as_u16(),
        200
    );

    let response = app.post_logout(&access_token, &refresh_token).await;
    assert_eq!(response.status().as_u16(), 200);

    // The access token is signature-valid but denylisted until expiry.
    assert_eq!(
        app.post_verify_token(&access_token).await.status().as_u16(),
        401
    );
    // The refresh token is revoked.
    assert_eq!(app.post_refresh(&refresh_token).await.status().as_u16(), 401);
}

#[tokio::test]
async fn logout_without_bearer_token_is_a_bad_request() {
    let app = TestApp::spawn().await;

    let response = app
        .http_client
        .post(format!("{}/logout", app.address))
        .json(&json!({ "refreshToken": "whatever" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 400);
}

#[tokio::test]
async fn logout_with_garbage_access_token_is_unauthorized() {
    let app = TestApp::spawn().await;

    let response = app.post_logout("garbage", "also-garbage").await;
    assert_eq!(response.status().as_u16(), 401);
}

#[tokio::test]
async fn sessions_are_independent() {
    let app = TestApp::spawn().await;
    app.signup_verified("reader@folio.dev", "P@ssw0rd1").await;

    let (first_access, first_refresh) =
        app.login_tokens("reader@folio.dev", "P@ssw0rd1").await;
    let (second_access, second_refresh) =
        app.login_tokens("reader@folio.dev", "P@ssw0rd1").await;

    assert_eq!(
        app.post_logout(&first_access, &first_refresh)
            .await
            .status()
            .as_u16(),
        200
    );

    // The other session is untouched.
    assert_eq!(
        app.post_verify_token(&second_access).await.status().as_u16(),
        200
    );
    assert_eq!(
        app.post_refresh(&second_refresh).await.status().as_u16(),
        200
    );
}
