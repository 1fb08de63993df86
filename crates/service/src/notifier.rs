//! Email notifications sent after provider/service mutations.

use std::sync::Arc;

use async_trait::async_trait;
use mail_builder::MessageBuilder;
use mail_send::SmtpClientBuilder;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("send failed: {0}")]
    SendFailed(String),
}

/// A plain-text message to one recipient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub to: String,
    pub subject: String,
    pub body: String,
}

impl Notification {
    pub fn new(to: &str, subject: &str, body: &str) -> Self {
        Self { to: to.to_string(), subject: subject.to_string(), body: body.to_string() }
    }

    pub fn provider_created(to: &str) -> Self {
        Self::new(to, "Provider Created", "Your provider has been successfully created!")
    }

    pub fn provider_updated(to: &str) -> Self {
        Self::new(to, "Provider Updated", "Your provider has been successfully updated!")
    }

    pub fn service_created(to: &str) -> Self {
        Self::new(to, "Service Created", "A new service has been successfully created!")
    }

    pub fn service_updated(to: &str) -> Self {
        Self::new(to, "Service Updated", "The service has been successfully updated!")
    }
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, notification: &Notification) -> Result<(), NotifyError>;
}

/// Send and log the outcome; a failed delivery never fails the caller.
pub async fn send_best_effort(notifier: &dyn Notifier, notification: Notification) {
    match notifier.send(&notification).await {
        Ok(()) => debug!(to = %notification.to, subject = %notification.subject, "notification sent"),
        Err(e) => warn!(to = %notification.to, subject = %notification.subject, error = %e, "notification failed"),
    }
}

/// Used when mail is disabled: the message only goes to the log.
#[derive(Debug, Default, Clone)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, notification: &Notification) -> Result<(), NotifyError> {
        info!(to = %notification.to, subject = %notification.subject, "mail disabled, notification logged");
        Ok(())
    }
}

/// SMTP delivery; one connection per message.
pub struct SmtpNotifier {
    cfg: configs::MailConfig,
}

impl SmtpNotifier {
    pub fn new(cfg: configs::MailConfig) -> Self {
        Self { cfg }
    }
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn send(&self, notification: &Notification) -> Result<(), NotifyError> {
        let message = MessageBuilder::new()
            .from(self.cfg.from.as_str())
            .to(notification.to.as_str())
            .subject(notification.subject.as_str())
            .text_body(notification.body.as_str());

        let mut smtp_client = SmtpClientBuilder::new(self.cfg.smtp_host.as_str(), self.cfg.smtp_port)
            .implicit_tls(self.cfg.implicit_tls);
        if let (Some(user), Some(pass)) = (&self.cfg.username, &self.cfg.password) {
            smtp_client = smtp_client.credentials((user.as_str(), pass.as_str()));
        }

        let mut client = smtp_client
            .connect()
            .await
            .map_err(|e| NotifyError::SendFailed(format!("SMTP connection failed: {}", e)))?;
        client
            .send(message)
            .await
            .map_err(|e| NotifyError::SendFailed(format!("Failed to send email: {}", e)))?;
        Ok(())
    }
}

/// SMTP when mail is enabled, log-only otherwise.
pub fn from_config(cfg: &configs::MailConfig) -> Arc<dyn Notifier> {
    if cfg.enabled {
        info!(host = %cfg.smtp_host, port = cfg.smtp_port, "smtp notifier enabled");
        Arc::new(SmtpNotifier::new(cfg.clone()))
    } else {
        Arc::new(LogNotifier)
    }
}
