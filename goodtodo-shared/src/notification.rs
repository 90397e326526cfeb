/// Verification notifications
///
/// Registration renders a [`VerificationEmail`] and hands it to a
/// [`NotificationSender`]. Delivery is best-effort: the caller logs a failure
/// and carries on.
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Duration;
use tracing::info;

use crate::models::user::VERIFICATION_TOKEN_TTL_HOURS;

pub const DEFAULT_FROM_ADDRESS: &str = "noreply@good-todo-go.local";
pub const DEFAULT_APP_BASE_URL: &str = "http://localhost:3000";
pub const VERIFICATION_SUBJECT: &str = "Please verify your email";

#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    #[error("Failed to deliver notification: {0}")]
    Delivery(String),
}

/// A rendered verification message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationEmail {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub link: String,
    pub body: String,
}

/// Renders verification emails for a given frontend
#[derive(Debug, Clone)]
pub struct VerificationTemplate {
    from: String,
    app_base_url: String,
}

impl Default for VerificationTemplate {
    fn default() -> Self {
        Self::new(DEFAULT_FROM_ADDRESS, DEFAULT_APP_BASE_URL)
    }
}

impl VerificationTemplate {
    pub fn new(from: impl Into<String>, app_base_url: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            app_base_url: app_base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn render(&self, to: &str, token: &str) -> VerificationEmail {
        let link = format!("{}/verify-email?token={}", self.app_base_url, token);
        let hours = Duration::hours(VERIFICATION_TOKEN_TTL_HOURS).num_hours();
        let body = format!(
            "Welcome to Good Todo!\n\n\
             Please verify your email address by opening the link below:\n\n\
             {link}\n\n\
             This link expires in {hours} hours.\n"
        );

        VerificationEmail {
            from: self.from.clone(),
            to: to.to_string(),
            subject: VERIFICATION_SUBJECT.to_string(),
            link,
            body,
        }
    }
}

#[async_trait]
pub trait NotificationSender: Send + Sync {
    async fn send_verification(&self, email: &VerificationEmail) -> Result<(), NotificationError>;
}

/// Writes verification messages to the log instead of a mail transport
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotificationSender;

#[async_trait]
impl NotificationSender for LogNotificationSender {
    async fn send_verification(&self, email: &VerificationEmail) -> Result<(), NotificationError> {
        info!(
            from = %email.from,
            to = %email.to,
            subject = %email.subject,
            link = %email.link,
            "Verification email"
        );
        Ok(())
    }
}

/// Keeps every message in memory; optionally fails every send
#[derive(Debug, Default)]
pub struct RecordingNotificationSender {
    sent: Mutex<Vec<VerificationEmail>>,
    fail: bool,
}

impl RecordingNotificationSender {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sender whose every delivery fails
    pub fn failing() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn sent(&self) -> Vec<VerificationEmail> {
        self.sent.lock().map(|s| s.clone()).unwrap_or_default()
    }

    /// Token carried by the most recent message sent to `to`
    pub fn last_token_for(&self, to: &str) -> Option<String> {
        self.sent()
            .iter()
            .rev()
            .find(|m| m.to == to)
            .and_then(|m| m.link.split("token=").nth(1).map(str::to_string))
    }
}

#[async_trait]
impl NotificationSender for RecordingNotificationSender {
    async fn send_verification(&self, email: &VerificationEmail) -> Result<(), NotificationError> {
        if self.fail {
            return Err(NotificationError::Delivery("mail relay unavailable".to_string()));
        }
        if let Ok(mut sent) = self.sent.lock() {
            sent.push(email.clone());
        }
        Ok(())
    }
}
