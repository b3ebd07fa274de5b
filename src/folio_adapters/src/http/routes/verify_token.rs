use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use folio_core::{JwtBlacklistStore, TokenSigner};
use serde::Deserialize;

use crate::auth::validate_access_token;

use super::error::AuthApiError;

#[derive(Debug, Deserialize)]
pub struct VerifyTokenRequest {
    pub token: String,
}

/// Resource servers call this to check an access token: signature, expiry,
/// and the logout denylist.
#[tracing::instrument(name = "Verify token", skip_all)]
pub async fn verify_token<S, B>(
    State((token_signer, jwt_blacklist)): State<(S, B)>,
    Json(request): Json<VerifyTokenRequest>,
) -> Result<impl IntoResponse, AuthApiError>
where
    S: TokenSigner + Clone + 'static,
    B: JwtBlacklistStore + Clone + 'static,
{
    let _claims = validate_access_token(&token_signer, &jwt_blacklist, &request.token).await?;

    Ok(StatusCode::OK)
}
