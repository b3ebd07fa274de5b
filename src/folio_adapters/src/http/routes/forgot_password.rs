use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use folio_application::ForgotPasswordUseCase;
use folio_core::{Email, EmailClient, UserStore, VerificationTokenStore};
use secrecy::Secret;
use serde::Deserialize;

use super::error::AuthApiError;

#[derive(Debug, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: Secret<String>,
}

/// Starts the reset flow. Responds identically whether or not the email
/// maps to an account.
#[tracing::instrument(name = "Forgot password", skip_all)]
pub async fn forgot_password<U, V, E>(
    State((user_store, verification_tokens, email_client)): State<(U, V, E)>,
    Json(request): Json<ForgotPasswordRequest>,
) -> Result<impl IntoResponse, AuthApiError>
where
    U: UserStore + Clone + 'static,
    V: VerificationTokenStore + Clone + 'static,
    E: EmailClient + Clone + 'static,
{
    let use_case = ForgotPasswordUseCase::new(user_store, verification_tokens, email_client);

    let email = Email::try_from(request.email)?;
    use_case.execute(email).await?;

    Ok((
        StatusCode::OK,
        String::from("If the address is registered, a reset link is on its way."),
    ))
}
