//! Outbound customer notifications (email)
//!
//! Fire-and-forget send of `{from, to, subject, text}`; the caller only
//! sees success or failure of the send itself. Send failures propagate as
//! `NotificationFailed`: no silent drop, no retry.

use std::time::Duration;

use async_trait::async_trait;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::debug;

use crate::config::EmailConfig;
use crate::error::OrderError;
use crate::models::OrderStatus;

/// Notification seam: the status handler only depends on this trait.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), OrderError>;
}

/// Subject and body for a status-change notification.
///
/// The body always carries the new status and the order identifier.
pub fn status_notification(order_id: i64, status: OrderStatus) -> (String, String) {
    (
        "Order Status Update".to_string(),
        format!("Your order #{} is now {}.", order_id, status),
    )
}

/// SMTP mailer over lettre's async transport.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn new(cfg: &EmailConfig) -> anyhow::Result<Self> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&cfg.smtp_host)?
            .port(cfg.smtp_port)
            .credentials(Credentials::new(cfg.username.clone(), cfg.password.clone()))
            .timeout(Some(Duration::from_secs(cfg.timeout_secs)))
            .build();
        let from = cfg.from.parse()?;
        Ok(Self { transport, from })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), OrderError> {
        let to: Mailbox = to
            .parse()
            .map_err(|e| OrderError::NotificationFailed(format!("invalid recipient: {}", e)))?;

        let message = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(subject)
            .body(body.to_string())
            .map_err(|e| OrderError::NotificationFailed(e.to_string()))?;

        self.transport
            .send(message)
            .await
            .map_err(|e| OrderError::NotificationFailed(e.to_string()))?;

        debug!("Notification sent: {}", subject);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notification_contract() {
        let (subject, body) = status_notification(42, OrderStatus::Confirmed);
        assert_eq!(subject, "Order Status Update");
        assert!(body.contains("Confirmed"));
        assert!(body.contains("42"));
    }

    #[test]
    fn test_notification_per_status() {
        let (_, body) = status_notification(7, OrderStatus::Cancelled);
        assert!(body.contains("Cancelled"));
        assert!(!body.contains("Confirmed"));
    }
}
