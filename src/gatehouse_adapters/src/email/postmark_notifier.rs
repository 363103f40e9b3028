use gatehouse_core::{Notifier, NotifierError, User};
use reqwest::{Client, Url};
use secrecy::{ExposeSecret, Secret};

const MESSAGE_STREAM: &str = "outbound";
const POSTMARK_AUTH_HEADER: &str = "X-Postmark-Server-Token";

/// Notifier delivering over the Postmark transactional email API.
///
/// The HTTP client is injected so the caller controls the timeout; store
/// and notifier calls are the only suspending operations in the core and
/// must be bounded by the collaborator.
#[derive(Clone)]
pub struct PostmarkNotifier {
    http_client: Client,
    base_url: String,
    sender: String,
    authorization_token: Secret<String>,
}

impl PostmarkNotifier {
    pub fn new(
        base_url: String,
        sender: String,
        authorization_token: Secret<String>,
        http_client: Client,
    ) -> Self {
        Self {
            http_client,
            base_url,
            sender,
            authorization_token,
        }
    }

    async fn send(
        &self,
        recipient: &str,
        subject: &str,
        content: &str,
    ) -> Result<(), NotifierError> {
        let base = Url::parse(&self.base_url)
            .map_err(|e| NotifierError::SendFailed(e.to_string()))?;
        let url = base
            .join("/email")
            .map_err(|e| NotifierError::SendFailed(e.to_string()))?;

        let request_body = SendEmailRequest {
            from: &self.sender,
            to: recipient,
            subject,
            html_body: content,
            text_body: content,
            message_stream: MESSAGE_STREAM,
        };

        self.http_client
            .post(url)
            .header(
                POSTMARK_AUTH_HEADER,
                self.authorization_token.expose_secret(),
            )
            .json(&request_body)
            .send()
            .await
            .map_err(|e| NotifierError::SendFailed(e.to_string()))?
            .error_for_status()
            .map_err(|e| NotifierError::SendFailed(e.to_string()))?;

        Ok(())
    }
}

#[async_trait::async_trait]
impl Notifier for PostmarkNotifier {
    #[tracing::instrument(name = "Sending welcome email", skip_all)]
    async fn send_welcome(&self, user: &User, context_url: &str) -> Result<(), NotifierError> {
        let content = format!(
            "Hi {}, welcome! Your account page: {context_url}",
            user.name()
        );
        self.send(user.email().as_str(), "Welcome to Gatehouse", &content)
            .await
    }

    #[tracing::instrument(name = "Sending password reset email", skip_all)]
    async fn send_password_reset(
        &self,
        user: &User,
        reset_url: &str,
    ) -> Result<(), NotifierError> {
        let content = format!(
            "Hi {}, submit a PATCH request with your new password to {reset_url}. \
             The link is valid for a limited time and can be used once. \
             If you did not request a password reset, ignore this email.",
            user.name()
        );
        self.send(
            user.email().as_str(),
            "Your password reset token",
            &content,
        )
        .await
    }
}

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
