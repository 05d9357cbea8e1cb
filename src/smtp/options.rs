use std::time::Duration;

#[cfg(feature = "with-serde")]
use serde::{Deserialize, Serialize};

pub const SMTP_PORT: u16 = 25;
pub const DEFAULT_STAGE_TIMEOUT: Duration = Duration::from_secs(7);

/// Configuration knobs for [`probe_mailbox`](crate::smtp::probe_mailbox).
#[cfg_attr(feature = "with-serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeOptions {
    /// Name announced in `HELO`.
    pub helo_name: String,
    /// Envelope sender used in `MAIL FROM`.
    pub mail_from: String,
    /// Always 25 in production; loopback tests point it elsewhere.
    pub port: u16,
    /// Budget for each protocol state, counted from entering it.
    pub stage_timeout: Duration,
}

impl Default for ProbeOptions {
    fn default() -> Self {
        Self {
            helo_name: "localhost".to_string(),
            mail_from: "verifier@example.org".to_string(),
            port: SMTP_PORT,
            stage_timeout: DEFAULT_STAGE_TIMEOUT,
        }
    }
}

impl ProbeOptions {
    pub fn with_helo_name(mut self, helo_name: impl Into<String>) -> Self {
        let value = helo_name.into();
        if !value.trim().is_empty() {
            self.helo_name = value.trim().to_string();
        }
        self
    }

    pub fn with_mail_from(mut self, mail_from: impl Into<String>) -> Self {
        let value = mail_from.into();
        if !value.trim().is_empty() {
            self.mail_from = value.trim().to_string();
        }
        self
    }

    /// A zero duration is ignored.
    pub fn with_stage_timeout(mut self, timeout: Duration) -> Self {
        if !timeout.is_zero() {
            self.stage_timeout = timeout;
        }
        self
    }

    pub(crate) fn helo_command(&self) -> String {
        format!("HELO {}", self.helo_name)
    }

    pub(crate) fn mail_from_command(&self) -> String {
        format!("MAIL FROM:<{}>", self.mail_from)
    }
}
