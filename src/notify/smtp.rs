//! SMTP delivery over an implicit-TLS relay.

use async_trait::async_trait;
use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::error::{AppError, Result};
use crate::models::NotifyConfig;
use crate::notify::{Digest, Notifier};

pub const USER_VAR: &str = "GMAIL_USER";
pub const PASS_VAR: &str = "GMAIL_PASS";
pub const TO_VAR: &str = "TO_EMAIL";

/// Mail account and recipient.
#[derive(Clone)]
pub struct EmailCredentials {
    pub user: String,
    pub pass: String,
    pub to: String,
}

impl std::fmt::Debug for EmailCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmailCredentials")
            .field("user", &self.user)
            .field("pass", &"***")
            .field("to", &self.to)
            .finish()
    }
}

impl EmailCredentials {
    /// Read credentials from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read credentials through `lookup`; the recipient defaults to the sender.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let user = var(USER_VAR).ok_or_else(|| AppError::config(format!("{USER_VAR} is not set")))?;
        let pass = var(PASS_VAR).ok_or_else(|| AppError::config(format!("{PASS_VAR} is not set")))?;
        let to = var(TO_VAR).unwrap_or_else(|| user.clone());

        Ok(Self { user, pass, to })
    }
}

/// Sends digests as multipart (plain text + HTML) mail.
pub struct SmtpNotifier {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    to: Mailbox,
}

impl SmtpNotifier {
    pub fn new(config: &NotifyConfig, credentials: EmailCredentials) -> Result<Self> {
        let from: Mailbox = credentials
            .user
            .parse()
            .map_err(|e| AppError::email(format!("invalid sender address: {e}")))?;
        let to: Mailbox = credentials
            .to
            .parse()
            .map_err(|e| AppError::email(format!("invalid recipient address: {e}")))?;

        let mailer = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)
            .map_err(AppError::email)?
            .credentials(Credentials::new(credentials.user, credentials.pass))
            .build();

        Ok(Self { mailer, from, to })
    }

    fn message(&self, digest: &Digest) -> Result<Message> {
        Message::builder()
            .from(self.from.clone())
            .to(self.to.clone())
            .subject(digest.subject.clone())
            .multipart(MultiPart::alternative_plain_html(
                digest.text.clone(),
                digest.html.clone(),
            ))
            .map_err(AppError::email)
    }
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn send(&self, digest: &Digest) -> Result<()> {
        let message = self.message(digest)?;
        self.mailer.send(message).await.map_err(AppError::email)?;
        log::info!("Sent digest to {}: {}", self.to, digest.subject);
        Ok(())
    }
}
