//! SMTP mailbox probing without sending mail.
//!
//! [`probe_mailbox`] connects to port 25 of an exchange host and walks
//! `CONNECTING → GREETED → HELO_OK → MAIL_OK → RCPT_DONE → CLOSED`, reading
//! exactly one reply per state under its own timer. The `RCPT TO` reply
//! decides the outcome; every other failure (timeout, reset, odd reply) is
//! reported as undetermined rather than as an error.

mod error;
mod machine;
mod options;
mod session;
mod types;

pub use options::{DEFAULT_STAGE_TIMEOUT, ProbeOptions, SMTP_PORT};
pub use types::{ProbeOutcome, ProbeStage, SmtpEvent, SmtpReply};

use std::future::Future;
use std::time::{SystemTime, UNIX_EPOCH};

use machine::ProbeMachine;

/// Anything able to answer "does `address` exist on `mx_host`?".
pub trait MailboxProber: Sync {
    fn probe(&self, address: &str, mx_host: &str) -> impl Future<Output = ProbeOutcome> + Send;
}

/// The real prober: one SMTP dialogue per call.
#[derive(Debug, Clone, Default)]
pub struct SmtpProber {
    options: ProbeOptions,
}

impl SmtpProber {
    pub fn new(options: ProbeOptions) -> Self {
        Self { options }
    }
}

impl MailboxProber for SmtpProber {
    async fn probe(&self, address: &str, mx_host: &str) -> ProbeOutcome {
        probe_mailbox(address, mx_host, &self.options).await
    }
}

/// Runs one probe of `address` against `mx_host`. The socket is closed
/// before this returns, whatever the outcome.
pub async fn probe_mailbox(address: &str, mx_host: &str, options: &ProbeOptions) -> ProbeOutcome {
    if let Some(reason) = unusable_target(address, mx_host) {
        return ProbeOutcome {
            accepted: None,
            reason_code: None,
            reason_text: reason.to_string(),
            stage: ProbeStage::Connecting,
            transcript: Vec::new(),
        };
    }
    tracing::debug!(address, mx = mx_host, "probing mailbox");
    ProbeMachine::new(address, mx_host, options).run().await
}

fn unusable_target(address: &str, mx_host: &str) -> Option<&'static str> {
    if mx_host.trim().is_empty() {
        Some("No mail exchange host")
    } else if address.contains(['\r', '\n', '<', '>']) || !address.contains('@') {
        Some("Address not usable in RCPT TO")
    } else {
        None
    }
}

/// `test<unix-epoch-millis>@domain`: a local part nobody owns.
pub fn catch_all_address(domain: &str) -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis())
        .unwrap_or_default();
    format!("test{millis}@{domain}")
}

/// Probes a synthetic address on `domain`. `Some(true)` means the server
/// accepts arbitrary recipients. Only meaningful after the real address was
/// accepted.
pub async fn detect_catch_all<P>(prober: &P, domain: &str, mx_host: &str) -> Option<bool>
where
    P: MailboxProber,
{
    let synthetic = catch_all_address(domain);
    let outcome = prober.probe(&synthetic, mx_host).await;
    tracing::debug!(address = %synthetic, accepted = ?outcome.accepted, "catch-all probe");
    outcome.accepted
}

#[cfg(test)]
mod tests;
