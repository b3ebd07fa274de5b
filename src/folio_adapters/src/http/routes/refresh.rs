use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use axum_extra::extract::CookieJar;
use folio_application::RefreshUseCase;
use folio_core::{Clock, RefreshTokenStore, TokenSigner, UserStore};
use serde::Deserialize;

use crate::config::REFRESH_COOKIE_NAME;
use crate::http::cookies::create_refresh_cookie;

use super::error::AuthApiError;
use super::login::JwtResponse;

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    #[serde(rename = "refreshToken")]
    pub refresh_token: String,
}

/// Rotates the presented refresh token into a fresh pair. The old token is
/// dead after this call whether it came from the cookie or the body.
#[tracing::instrument(name = "Refresh", skip_all)]
pub async fn refresh<S, R, U>(
    State((token_signer, refresh_token_store, user_store, clock)): State<(
        S,
        R,
        U,
        Arc<dyn Clock>,
    )>,
    jar: CookieJar,
    body: Option<Json<RefreshRequest>>,
) -> Result<impl IntoResponse, AuthApiError>
where
    S: TokenSigner + Clone + 'static,
    R: RefreshTokenStore + Clone + 'static,
    U: UserStore + Clone + 'static,
{
    let raw_refresh_token = jar
        .get(*REFRESH_COOKIE_NAME)
        .map(|cookie| cookie.value().to_owned())
        .or(body.map(|Json(request)| request.refresh_token))
        .ok_or(AuthApiError::MissingToken)?;

    let use_case = RefreshUseCase::new(token_signer, refresh_token_store, user_store, clock);
    let session = use_case.execute(&raw_refresh_token).await?;

    let jar = jar.add(create_refresh_cookie(session.refresh_token.clone()));

    Ok((jar, (StatusCode::OK, Json(JwtResponse::from(session)))))
}
