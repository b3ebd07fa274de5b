use std::sync::Arc;

use chrono::Duration;
use folio_adapters::{
    Argon2PasswordHasher, JwtSignerConfig, JwtTokenSigner, MockEmailClient,
    MemJwtBlacklistStore, MemRefreshTokenStore, MemUserStore, MemVerificationTokenStore,
    VerificationTtls,
};
use folio_auth_service::AuthService;
use folio_core::{Clock, SystemClock, TokenPurpose};
use secrecy::Secret;
use serde_json::{Value, json};
use tokio::net::TcpListener;

pub struct TestApp {
    pub address: String,
    pub http_client: reqwest::Client,
    pub email_client: MockEmailClient,
}

impl TestApp {
    pub async fn spawn() -> TestApp {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);

        let user_store = Arc::new(MemUserStore::new());
        let refresh_token_store = Arc::new(MemRefreshTokenStore::new(clock.clone()));
        let jwt_blacklist = Arc::new(MemJwtBlacklistStore::new(clock.clone()));
        let verification_tokens = Arc::new(MemVerificationTokenStore::new(
            VerificationTtls {
                verify_email: Duration::hours(24),
                change_email: Duration::hours(24),
                reset_password: Duration::hours(1),
            },
            clock.clone(),
        ));

        let token_signer = JwtTokenSigner::new(
            JwtSignerConfig {
                access_secret: Secret::from("api-test-access-secret".to_string()),
                refresh_secret: Secret::from("api-test-refresh-secret".to_string()),
                access_ttl_seconds: 900,
                refresh_ttl_seconds: 604_800,
            },
            clock.clone(),
        );

        let email_client = MockEmailClient::new();

        let service = AuthService::new(
            user_store,
            Argon2PasswordHasher,
            token_signer,
            verification_tokens,
            refresh_token_store,
            jwt_blacklist,
            email_client.clone(),
            clock,
        );

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let address = format!("http://{}", listener.local_addr().unwrap());

        tokio::spawn(service.run_standalone(listener, None));

        TestApp {
            address,
            http_client: reqwest::Client::new(),
            email_client,
        }
    }

    pub async fn post_json(&self, path: &str, body: &Value) -> reqwest::Response {
        self.http_client
            .post(format!("{}{}", self.address, path))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn post_signup(&self, email: &str, password: &str) -> reqwest::Response {
        self.post_json(
            "/signup",
            &json!({ "email": email, "password": password, "fullName": "Test Reader" }),
        )
        .await
    }

    pub async fn post_login(&self, email: &str, password: &str) -> reqwest::Response {
        self.post_json("/login", &json!({ "email": email, "password": password }))
            .await
    }

    pub async fn get_verify_email(&self, token: &str) -> reqwest::Response {
        self.http_client
            .get(format!("{}/verify-email?token={}", self.address, token))
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn post_refresh(&self, refresh_token: &str) -> reqwest::Response {
        self.post_json("/refresh", &json!({ "refreshToken": refresh_token }))
            .await
    }

    pub async fn post_logout(&self, access_token: &str, refresh_token: &str) -> reqwest::Response {
        self.http_client
            .post(format!("{}/logout", self.address))
            .bearer_auth(access_token)
            .json(&json!({ "refreshToken": refresh_token }))
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn post_verify_token(&self, token: &str) -> reqwest::Response {
        self.post_json("/verify-token", &json!({ "token": token }))
            .await
    }

    /// Signup plus email-link verification, leaving the account able to
    /// log in.
    pub async fn signup_verified(&self, email: &str, password: &str) {
        let response = self.post_signup(email, password).await;
        assert_eq!(response.status().as_u16(), 201);

        let token = self
            .email_client
            .last_token_for(TokenPurpose::VerifyEmail)
            .expect("no verification email recorded");
        let response = self.get_verify_email(&token).await;
        assert_eq!(response.status().as_u16(), 200);
    }

    /// Full login, returning (access token, refresh token).
    pub async fn login_tokens(&self, email: &str, password: &str) -> (String, String) {
        let response = self.post_login(email, password).await;
        assert_eq!(response.status().as_u16(), 200);
        let body: Value = response.json().await.expect("login response is not json");
        (
            body["accessToken"].as_str().unwrap().to_string(),
            body["refreshToken"].as_str().unwrap().to_string(),
        )
    }
}

pub async fn error_message(response: reqwest::Response) -> String {
    let body: Value = response.json().await.expect("error response is not json");
    body["error"].as_str().unwrap_or_default().to_string()
}
