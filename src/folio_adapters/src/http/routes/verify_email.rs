use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use folio_application::VerifyEmailUseCase;
use folio_core::{UserStore, VerificationTokenStore};
use serde::Deserialize;

use super::error::AuthApiError;

#[derive(Debug, Deserialize)]
pub struct VerifyEmailQuery {
    pub token: String,
}

/// Redeems the emailed VERIFY_EMAIL link. Reached by GET because the link
/// lands straight from the mail client.
#[tracing::instrument(name = "Verify email", skip_all)]
pub async fn verify_email<V, U>(
    State((verification_tokens, user_store)): State<(V, U)>,
    Query(query): Query<VerifyEmailQuery>,
) -> Result<impl IntoResponse, AuthApiError>
where
    V: VerificationTokenStore + Clone + 'static,
    U: UserStore + Clone + 'static,
{
    let use_case = VerifyEmailUseCase::new(verification_tokens, user_store);
    use_case.execute(&query.token).await?;

    Ok((StatusCode::OK, String::from("Email verified successfully!")))
}
