use std::future::Future;

use tokio::time::timeout;

use super::error::SessionError;
use super::options::ProbeOptions;
use super::session::SmtpSession;
use super::types::{ProbeOutcome, ProbeStage, SmtpEvent, SmtpReply};

/// Why a state did not produce a reply.
enum Interrupt {
    TimedOut,
    Failed(SessionError),
}

/// One probe, driven state by state. Each state performs its entry action
/// and a single read, both bounded by `stage_timeout`.
pub(crate) struct ProbeMachine<'a> {
    address: &'a str,
    mx_host: &'a str,
    options: &'a ProbeOptions,
    state: ProbeStage,
    last_code: Option<u16>,
    transcript: Vec<SmtpEvent>,
}

impl<'a> ProbeMachine<'a> {
    pub(crate) fn new(address: &'a str, mx_host: &'a str, options: &'a ProbeOptions) -> Self {
        Self {
            address,
            mx_host,
            options,
            state: ProbeStage::Connecting,
            last_code: None,
            transcript: Vec::new(),
        }
    }

    pub(crate) async fn run(mut self) -> ProbeOutcome {
        let options = self.options;
        let (host, port) = (self.mx_host, options.port);

        let connected = self
            .bounded(async move {
                let mut session = SmtpSession::connect(host, port).await?;
                let greeting = session.read_reply().await?;
                Ok((session, greeting))
            })
            .await;
        let (mut session, greeting) = match connected {
            Ok(pair) => pair,
            Err(interrupt) => return self.interrupted(interrupt),
        };
        tracing::debug!(mx = host, peer = %session.peer(), "connected");
        self.received(&greeting);
        if greeting.code != 220 {
            return self
                .refused(session, &greeting, "Unexpected connection response")
                .await;
        }

        let helo = options.helo_command();
        let reply = match self.step(&mut session, ProbeStage::Greeted, &helo).await {
            Ok(reply) => reply,
            Err(interrupt) => return self.interrupted(interrupt),
        };
        if reply.code != 250 {
            return self.refused(session, &reply, "HELO failed").await;
        }

        let mail_from = options.mail_from_command();
        let reply = match self.step(&mut session, ProbeStage::HeloOk, &mail_from).await {
            Ok(reply) => reply,
            Err(interrupt) => return self.interrupted(interrupt),
        };
        if reply.code != 250 {
            return self.refused(session, &reply, "MAIL FROM failed").await;
        }

        let rcpt = format!("RCPT TO:<{}>", self.address);
        let reply = match self.step(&mut session, ProbeStage::MailOk, &rcpt).await {
            Ok(reply) => reply,
            Err(interrupt) => return self.interrupted(interrupt),
        };
        let (accepted, reason) = classify_rcpt(&reply);

        self.enter(ProbeStage::RcptDone);
        self.quit(session).await;
        self.finish(accepted, reason)
    }

    async fn step(
        &mut self,
        session: &mut SmtpSession,
        next: ProbeStage,
        command: &str,
    ) -> Result<SmtpReply, Interrupt> {
        self.enter(next);
        self.sent(command);
        let reply = self
            .bounded(async {
                session.send_command(command).await?;
                session.read_reply().await
            })
            .await?;
        self.received(&reply);
        Ok(reply)
    }

    async fn bounded<T, F>(&self, fut: F) -> Result<T, Interrupt>
    where
        F: Future<Output = Result<T, SessionError>>,
    {
        match timeout(self.options.stage_timeout, fut).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(err)) => Err(Interrupt::Failed(err)),
            Err(_) => Err(Interrupt::TimedOut),
        }
    }

    /// Best-effort `QUIT`, then close. Never changes the outcome.
    async fn quit(&mut self, mut session: SmtpSession) {
        self.sent("QUIT");
        let stage = self.state;
        let result = self
            .bounded(async {
                session.send_command("QUIT").await?;
                session.read_reply().await
            })
            .await;
        match result {
            Ok(reply) => self.transcript.push(SmtpEvent::Received { stage, reply }),
            Err(Interrupt::TimedOut) => self.error("QUIT reply timed out".to_string()),
            Err(Interrupt::Failed(err)) => self.error(err.to_string()),
        }
        session.close().await;
        self.state = ProbeStage::Closed;
    }

    async fn refused(mut self, session: SmtpSession, reply: &SmtpReply, what: &str) -> ProbeOutcome {
        let reason = format!("{what} {reply}");
        tracing::debug!(mx = self.mx_host, stage = %self.state, "{reason}");
        self.quit(session).await;
        self.finish(None, reason)
    }

    fn interrupted(mut self, interrupt: Interrupt) -> ProbeOutcome {
        let reason = match interrupt {
            Interrupt::TimedOut => format!(
                "Timeout at {} waiting for {}",
                self.state,
                self.state.awaiting()
            ),
            Interrupt::Failed(err) => err.to_string(),
        };
        tracing::warn!(mx = self.mx_host, address = self.address, "{reason}");
        self.error(reason.clone());
        self.finish(None, reason)
    }

    fn finish(self, accepted: Option<bool>, reason_text: String) -> ProbeOutcome {
        ProbeOutcome {
            accepted,
            reason_code: self.last_code,
            reason_text,
            stage: self.state,
            transcript: self.transcript,
        }
    }

    fn enter(&mut self, next: ProbeStage) {
        debug_assert!(next > self.state, "probe states only move forward");
        self.state = next;
    }

    fn sent(&mut self, command: &str) {
        tracing::debug!(mx = self.mx_host, stage = %self.state, "C: {command}");
        self.transcript.push(SmtpEvent::Sent {
            stage: self.state,
            command: command.to_string(),
        });
    }

    fn received(&mut self, reply: &SmtpReply) {
        for line in &reply.lines {
            tracing::debug!(mx = self.mx_host, stage = %self.state, "S: {} {line}", reply.code);
        }
        self.last_code = Some(reply.code);
        self.transcript.push(SmtpEvent::Received {
            stage: self.state,
            reply: reply.clone(),
        });
    }

    fn error(&mut self, message: String) {
        self.transcript.push(SmtpEvent::Error {
            stage: self.state,
            message,
        });
    }
}

/// Maps the `RCPT TO` reply onto the tri-state acceptance signal.
pub(crate) fn classify_rcpt(reply: &SmtpReply) -> (Option<bool>, String) {
    match reply.code {
        250 => (Some(true), "Mailbox exists".to_string()),
        550 | 553 | 501 | 554 => (
            Some(false),
            format!("Invalid mailbox or recipient rejected {reply}"),
        ),
        551 | 571 => (Some(false), format!("Invalid mailbox {reply}")),
        _ if reply.is_transient_failure() => (Some(false), format!("Invalid mailbox {reply}")),
        _ => (None, format!("Unexpected response {reply}")),
    }
}
