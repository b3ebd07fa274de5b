use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use folio_application::ResetPasswordUseCase;
use folio_core::{Password, PasswordHasher, RefreshTokenStore, UserStore, VerificationTokenStore};
use secrecy::Secret;
use serde::Deserialize;

use super::error::AuthApiError;

#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    pub token: String,
    #[serde(rename = "newPassword")]
    pub new_password: Secret<String>,
}

#[tracing::instrument(name = "Reset password", skip_all)]
pub async fn reset_password<V, U, P, R>(
    State((verification_tokens, user_store, password_hasher, refresh_token_store)): State<(
        V,
        U,
        P,
        R,
    )>,
    Json(request): Json<ResetPasswordRequest>,
) -> Result<impl IntoResponse, AuthApiError>
where
    V: VerificationTokenStore + Clone + 'static,
    U: UserStore + Clone + 'static,
    P: PasswordHasher + Clone + 'static,
    R: RefreshTokenStore + Clone + 'static,
{
    let use_case = ResetPasswordUseCase::new(
        verification_tokens,
        user_store,
        password_hasher,
        refresh_token_store,
    );

    let new_password = Password::try_from(request.new_password)?;
    use_case.execute(&request.token, new_password).await?;

    Ok((
        StatusCode::OK,
        String::from("Password has been reset successfully!"),
    ))
}
