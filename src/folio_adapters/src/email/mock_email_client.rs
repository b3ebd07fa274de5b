use std::sync::{
    Arc, Mutex,
    atomic::{AtomicBool, Ordering},
};

use folio_core::{Email, EmailClient, EmailClientError, TokenPurpose};
use secrecy::ExposeSecret;

#[derive(Debug, Clone)]
pub struct SentLink {
    pub recipient: String,
    pub purpose: TokenPurpose,
    pub raw_token: String,
}

/// Records every link instead of sending it, so black-box tests can fish
/// the raw token out of the "outbox".
#[derive(Debug, Clone, Default)]
pub struct MockEmailClient {
    sent: Arc<Mutex<Vec<SentLink>>>,
    failing: Arc<AtomicBool>,
}

impl MockEmailClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<SentLink> {
        self.sent.lock().expect("outbox lock poisoned").clone()
    }

    pub fn last_token_for(&self, purpose: TokenPurpose) -> Option<String> {
        self.sent()
            .into_iter()
            .rev()
            .find(|link| link.purpose == purpose)
            .map(|link| link.raw_token)
    }

    /// Makes every subsequent send fail with a delivery error.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

#[async_trait::async_trait]
impl EmailClient for MockEmailClient {
    async fn send_verification_link(
        &self,
        recipient: &Email,
        purpose: TokenPurpose,
        raw_token: &str,
    ) -> Result<(), EmailClientError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(EmailClientError::DeliveryError(
                "mock delivery failure".to_string(),
            ));
        }
        self.sent
            .lock()
            .expect("outbox lock poisoned")
            .push(SentLink {
                recipient: recipient.as_ref().expose_secret().clone(),
                purpose,
                raw_token: raw_token.to_string(),
            });
        Ok(())
    }
}
