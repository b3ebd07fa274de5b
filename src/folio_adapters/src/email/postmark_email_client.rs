use folio_core::{Email, EmailClient, EmailClientError, TokenPurpose};
use reqwest::{Client, Url};
use secrecy::{ExposeSecret, Secret};

pub struct PostmarkEmailClient {
    http_client: Client,
    base_url: String,
    sender: Email,
    authorization_token: Secret<String>,
    /// Frontend base URL the verification links point at.
    public_base_url: String,
}

impl PostmarkEmailClient {
    pub fn new(
        base_url: String,
        sender: Email,
        authorization_token: Secret<String>,
        public_base_url: String,
        http_client: Client,
    ) -> Self {
        Self {
            http_client,
            base_url,
            sender,
            authorization_token,
            public_base_url,
        }
    }

    fn subject(purpose: TokenPurpose) -> &'static str {
        match purpose {
            TokenPurpose::VerifyEmail => "Verify your email address",
            TokenPurpose::ChangeEmail => "Confirm your new email address",
            TokenPurpose::ResetPassword => "Reset your password",
        }
    }

    fn link(&self, purpose: TokenPurpose, raw_token: &str) -> String {
        let path = match purpose {
            TokenPurpose::VerifyEmail => "verify-email",
            TokenPurpose::ChangeEmail => "confirm-email-change",
            TokenPurpose::ResetPassword => "reset-password",
        };
        format!(
            "{}/{}?token={}",
            self.public_base_url.trim_end_matches('/'),
            path,
            raw_token
        )
    }
}

#[async_trait::async_trait]
impl EmailClient for PostmarkEmailClient {
    #[tracing::instrument(name = "Sending verification email", skip_all, fields(purpose = %purpose))]
    async fn send_verification_link(
        &self,
        recipient: &Email,
        purpose: TokenPurpose,
        raw_token: &str,
    ) -> Result<(), EmailClientError> {
        let base =
            Url::parse(&self.base_url).map_err(|e| EmailClientError::DeliveryError(e.to_string()))?;
        let url = base
            .join("/email")
            .map_err(|e| EmailClientError::DeliveryError(e.to_string()))?;

        let link = self.link(purpose, raw_token);
        let content = format!("Follow this link to continue: {link}");

        let request_body = SendEmailRequest {
            from: self.sender.as_ref().expose_secret(),
            to: recipient.as_ref().expose_secret(),
            subject: Self::subject(purpose),
            html_body: &content,
            text_body: &content,
            message_stream: MESSAGE_STREAM,
        };

        let request = self
            .http_client
            .post(url)
            .header(
                POSTMARK_AUTH_HEADER,
                self.authorization_token.expose_secret(),
            )
            .json(&request_body);

        request
            .send()
            .await
            .map_err(|e| EmailClientError::DeliveryError(e.to_string()))?
            .error_for_status()
            .map_err(|e| EmailClientError::DeliveryError(e.to_string()))?;

        Ok(())
    }
}

const MESSAGE_STREAM: &str = "outbound";
const POSTMARK_AUTH_HEADER: &str = "X-Postmark-Server-Token";

#[derive(serde::Serialize, Debug)]
#[serde(rename_all = "PascalCase")]
struct SendEmailRequest<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    html_body: &'a str,
    text_body: &'a str,
    message_stream: &'a str,
}
