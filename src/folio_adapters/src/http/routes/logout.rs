use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};
use axum_extra::extract::CookieJar;
use folio_application::LogoutUseCase;
use folio_core::{JwtBlacklistStore, RefreshTokenStore, TokenSigner};
use serde::Deserialize;

use crate::config::REFRESH_COOKIE_NAME;
use crate::http::cookies::create_refresh_removal_cookie;

use super::error::AuthApiError;
use super::bearer_token;

#[derive(Debug, Deserialize)]
pub struct LogoutRequest {
    #[serde(rename = "refreshToken")]
    pub refresh_token: String,
}

/// Terminates the session: denylists the access token's jti and revokes the
/// refresh token, taken from the cookie or from the body for non-browser
/// clients.
#[tracing::instrument(name = "Logout", skip_all)]
pub async fn logout<S, B, R>(
    State((token_signer, jwt_blacklist, refresh_token_store)): State<(S, B, R)>,
    headers: HeaderMap,
    jar: CookieJar,
    body: Option<Json<LogoutRequest>>,
) -> Result<impl IntoResponse, AuthApiError>
where
    S: TokenSigner + Clone + 'static,
    B: JwtBlacklistStore + Clone + 'static,
    R: RefreshTokenStore + Clone + 'static,
{
    let access_token = bearer_token(&headers)?.to_owned();

    let refresh_token = jar
        .get(*REFRESH_COOKIE_NAME)
        .map(|cookie| cookie.value().to_owned())
        .or(body.map(|Json(request)| request.refresh_token))
        .ok_or(AuthApiError::MissingToken)?;

    let use_case = LogoutUseCase::new(token_signer, jwt_blacklist, refresh_token_store);
    use_case.execute(&access_token, &refresh_token).await?;

    let jar = jar.add(create_refresh_removal_cookie());

    Ok((jar, StatusCode::OK))
}
