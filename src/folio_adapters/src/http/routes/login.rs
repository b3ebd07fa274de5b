use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use axum_extra::extract::CookieJar;
use folio_application::{AuthenticatedSession, LoginUseCase};
use folio_core::{Email, Password, PasswordHasher, RefreshTokenStore, TokenSigner, UserStore};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};

use crate::http::cookies::create_refresh_cookie;

use super::error::AuthApiError;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Secret<String>,
    pub password: Secret<String>,
}

/// Token pair response. The refresh token is also duplicated into an
/// HTTP-only cookie for browser clients.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JwtResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub email: String,
    pub role: String,
}

impl From<AuthenticatedSession> for JwtResponse {
    fn from(session: AuthenticatedSession) -> Self {
        JwtResponse {
            access_token: session.access_token,
            refresh_token: session.refresh_token,
            token_type: "Bearer".to_string(),
            expires_in: session.expires_in_ms,
            email: session.email.as_ref().expose_secret().clone(),
            role: session.role.as_str().to_string(),
        }
    }
}

#[tracing::instrument(name = "Login", skip_all)]
pub async fn login<U, P, S, R>(
    State((user_store, password_hasher, token_signer, refresh_token_store)): State<(U, P, S, R)>,
    jar: CookieJar,
    Json(request): Json<LoginRequest>,
) -> Result<impl IntoResponse, AuthApiError>
where
    U: UserStore + Clone + 'static,
    P: PasswordHasher + Clone + 'static,
    S: TokenSigner + Clone + 'static,
    R: RefreshTokenStore + Clone + 'static,
{
    let use_case = LoginUseCase::new(user_store, password_hasher, token_signer, refresh_token_store);

    let email = Email::try_from(request.email)?;
    let password = Password::try_from(request.password)?;

    let session = use_case.execute(email, password).await?;

    let jar = jar.add(create_refresh_cookie(session.refresh_token.clone()));

    Ok((jar, (StatusCode::OK, Json(JwtResponse::from(session)))))
}
