//! Contact Form Relay
//!
//! Validates a message from the public contact form and hands a composed
//! mail to an SMTP provider. The provider itself is behind `MailTransport`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::MailSettings;
use crate::domain::{DomainError, DomainResult};

/// Body of a contact form submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactMessage {
    pub name: String,
    pub email: String,
    pub message: String,
}

impl ContactMessage {
    /// All three fields are required
    pub fn validate(&self) -> DomainResult<()> {
        let missing: Vec<&str> = [
            ("name", &self.name),
            ("email", &self.email),
            ("message", &self.message),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| field)
        .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(DomainError::Validation(format!(
                "missing field(s): {}",
                missing.join(", ")
            )))
        }
    }
}

/// A mail ready for the transport
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutgoingMail {
    pub from: String,
    pub to: String,
    pub reply_to: String,
    pub subject: String,
    pub body: String,
}

impl OutgoingMail {
    pub fn compose(msg: &ContactMessage, settings: &MailSettings) -> Self {
        Self {
            from: format!("\"{}\" <{}>", settings.sender_name, settings.user),
            to: settings.to.clone(),
            reply_to: msg.email.trim().to_string(),
            subject: format!("New message from the website from {}", msg.name.trim()),
            body: format!(
                "Name: {}\nEmail: {}\n\nMessage:\n{}",
                msg.name.trim(),
                msg.email.trim(),
                msg.message
            ),
        }
    }
}

/// SMTP provider boundary
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send(&self, mail: &OutgoingMail) -> Result<(), String>;
}

/// Validates, composes and sends contact form submissions
pub struct ContactRelay<T: MailTransport> {
    transport: T,
    settings: MailSettings,
}

impl<T: MailTransport> ContactRelay<T> {
    pub fn new(transport: T, settings: MailSettings) -> Self {
        Self { transport, settings }
    }

    pub async fn submit(&self, msg: &ContactMessage) -> DomainResult<()> {
        msg.validate()?;
        let mail = OutgoingMail::compose(msg, &self.settings);
        self.transport.send(&mail).await.map_err(|e| {
            log::error!("Failed to relay contact message: {}", e);
            DomainError::Internal(format!("Failed to send e-mail: {}", e))
        })?;
        log::info!("Relayed contact message from {}", mail.reply_to);
        Ok(())
    }
}
