use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use folio_application::SignupUseCase;
use folio_core::{Email, EmailClient, Password, PasswordHasher, UserStore, VerificationTokenStore};
use secrecy::Secret;
use serde::Deserialize;

use super::error::AuthApiError;

#[derive(Deserialize)]
pub struct SignupRequest {
    pub email: Secret<String>,
    pub password: Secret<String>,
    #[serde(rename = "fullName")]
    pub full_name: String,
}

#[tracing::instrument(name = "Signup", skip_all)]
pub async fn signup<U, P, V, E>(
    State((user_store, password_hasher, verification_tokens, email_client)): State<(U, P, V, E)>,
    Json(request): Json<SignupRequest>,
) -> Result<impl IntoResponse, AuthApiError>
where
    U: UserStore + Clone + 'static,
    P: PasswordHasher + Clone + 'static,
    V: VerificationTokenStore + Clone + 'static,
    E: EmailClient + Clone + 'static,
{
    let use_case = SignupUseCase::new(user_store, password_hasher, verification_tokens, email_client);

    let email = Email::try_from(request.email)?;
    let password = Password::try_from(request.password)?;

    use_case.execute(email, password, request.full_name).await?;

    Ok((
        StatusCode::CREATED,
        String::from("User created successfully! Check your email for the verification link."),
    ))
}
