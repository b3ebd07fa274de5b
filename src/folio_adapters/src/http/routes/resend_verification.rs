use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use folio_application::ResendVerificationUseCase;
use folio_core::{Email, EmailClient, UserStore, VerificationTokenStore};
use secrecy::Secret;
use serde::Deserialize;

use super::error::AuthApiError;

#[derive(Debug, Deserialize)]
pub struct ResendVerificationRequest {
    pub email: Secret<String>,
}

/// Re-sends the verification link. Responds identically whether or not the
/// email maps to an unverified account.
#[tracing::instrument(name = "Resend verification", skip_all)]
pub async fn resend_verification<U, V, E>(
    State((user_store, verification_tokens, email_client)): State<(U, V, E)>,
    Json(request): Json<ResendVerificationRequest>,
) -> Result<impl IntoResponse, AuthApiError>
where
    U: UserStore + Clone + 'static,
    V: VerificationTokenStore + Clone + 'static,
    E: EmailClient + Clone + 'static,
{
    let use_case = ResendVerificationUseCase::new(user_store, verification_tokens, email_client);

    let email = Email::try_from(request.email)?;
    use_case.execute(email).await?;

    Ok((
        StatusCode::OK,
        String::from("If the address is registered, a verification link is on its way."),
    ))
}
