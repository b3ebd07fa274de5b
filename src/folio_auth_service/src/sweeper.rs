use std::sync::Arc;
use std::time::Duration;

use folio_core::{JwtBlacklistStore, RefreshTokenStore, VerificationTokenStore};
use tokio::task::JoinHandle;

/// Periodically deletes rows whose tokens have passed their natural expiry:
/// revoked-or-live refresh tokens, blacklist entries, and verification
/// tokens. Runs until the handle is dropped or aborted.
pub fn spawn_expiry_sweeper(
    refresh_token_store: Arc<dyn RefreshTokenStore>,
    jwt_blacklist: Arc<dyn JwtBlacklistStore>,
    verification_tokens: Arc<dyn VerificationTokenStore>,
    period: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        // First tick fires immediately; skip it so startup is not a sweep.
        interval.tick().await;

        loop {
            interval.tick().await;

            match refresh_token_store.sweep_expired().await {
                Ok(swept) if swept > 0 => {
                    tracing::info!(swept, "swept expired refresh tokens")
                }
                Ok(_) => {}
                Err(e) => tracing::warn!(error = %e, "refresh token sweep failed"),
            }

            match jwt_blacklist.sweep_expired().await {
                Ok(swept) if swept > 0 => {
                    tracing::info!(swept, "swept expired blacklist entries")
                }
                Ok(_) => {}
                Err(e) => tracing::warn!(error = %e, "blacklist sweep failed"),
            }

            match verification_tokens.sweep_expired().await {
                Ok(swept) if swept > 0 => {
                    tracing::info!(swept, "swept expired verification tokens")
                }
                Ok(_) => {}
                Err(e) => tracing::warn!(error = %e, "verification token sweep failed"),
            }
        }
    })
}
