//! SMTP delivery behind a trait seam so staging flows can be exercised
//! without a live server.

use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use thiserror::Error;
use tracing::debug;

use crate::config::SmtpSettings;

#[derive(Debug, Error)]
pub enum RelayError {
    /// Transport-level failure: connect, TLS, auth, protocol.
    #[error(transparent)]
    Smtp(#[from] lettre::transport::smtp::Error),
    /// The server answered with a non-positive completion code.
    #[error("server refused the message: {0}")]
    Refused(String),
}

/// Hands a finished message to a mail server.
#[tonic::async_trait]
pub trait MailRelay: Send + Sync {
    async fn submit(&self, message: Message) -> Result<(), RelayError>;
}

/// Production relay speaking SMTP over TLS with the configured server.
pub struct SmtpRelay {
    settings: SmtpSettings,
}

impl SmtpRelay {
    pub fn new(settings: SmtpSettings) -> Self {
        Self { settings }
    }

    fn transport(&self) -> Result<AsyncSmtpTransport<Tokio1Executor>, RelayError> {
        let cfg = &self.settings;
        // Gmail-style accounts leave username empty and log in as the
        // sending address
        let username = if cfg.username.is_empty() {
            cfg.from_address.clone()
        } else {
            cfg.username.clone()
        };
        let creds = Credentials::new(username, cfg.password.clone());

        let builder = if cfg.ssl && cfg.port == 465 {
            // Implicit TLS (SMTPS on port 465)
            AsyncSmtpTransport::<Tokio1Executor>::relay(&cfg.host)?
        } else {
            // STARTTLS (port 587)
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&cfg.host)?
        };
        Ok(builder.port(cfg.port).credentials(creds).build())
    }
}

#[tonic::async_trait]
impl MailRelay for SmtpRelay {
    async fn submit(&self, message: Message) -> Result<(), RelayError> {
        let transport = self.transport()?;
        let response = transport.send(message).await?;
        if !response.is_positive() {
            return Err(RelayError::Refused(
                response.message().collect::<Vec<&str>>().join(" "),
            ));
        }
        debug!("SMTP server accepted the message");
        Ok(())
    }
}
