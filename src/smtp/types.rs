use std::fmt;

/// Probe states, in the only order they can be visited.
#[cfg_attr(
    feature = "with-serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "SCREAMING_SNAKE_CASE")
)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ProbeStage {
    /// TCP connect, awaiting the `220` greeting.
    Connecting,
    /// `HELO` sent, awaiting `250`.
    Greeted,
    /// `MAIL FROM` sent, awaiting `250`.
    HeloOk,
    /// `RCPT TO` sent, awaiting the decisive reply.
    MailOk,
    /// `QUIT` sent.
    RcptDone,
    Closed,
}

impl ProbeStage {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Connecting => "CONNECTING",
            Self::Greeted => "GREETED",
            Self::HeloOk => "HELO_OK",
            Self::MailOk => "MAIL_OK",
            Self::RcptDone => "RCPT_DONE",
            Self::Closed => "CLOSED",
        }
    }

    /// What the server owes us while in this state.
    pub(crate) fn awaiting(self) -> &'static str {
        match self {
            Self::Connecting => "greeting",
            Self::Greeted => "HELO reply",
            Self::HeloOk => "MAIL FROM reply",
            Self::MailOk => "RCPT TO reply",
            Self::RcptDone => "QUIT reply",
            Self::Closed => "nothing",
        }
    }
}

impl fmt::Display for ProbeStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A complete (possibly multi-line) SMTP reply. `code` comes from the final
/// line.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmtpReply {
    pub code: u16,
    pub lines: Vec<String>,
}

impl SmtpReply {
    pub fn is_transient_failure(&self) -> bool {
        (400..500).contains(&self.code)
    }

    /// Text of the final line.
    pub fn text(&self) -> &str {
        self.lines.last().map(String::as_str).unwrap_or("")
    }
}

impl fmt::Display for SmtpReply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}): {}", self.code, self.text())
    }
}

/// A recorded transcript event used for diagnostics.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SmtpEvent {
    Sent { stage: ProbeStage, command: String },
    Received { stage: ProbeStage, reply: SmtpReply },
    Error { stage: ProbeStage, message: String },
}

/// Result of one probe. Always populated: transport trouble shows up as
/// `accepted: None`, never as an error.
#[cfg_attr(
    feature = "with-serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeOutcome {
    /// `Some(true)` accepted, `Some(false)` rejected, `None` undetermined.
    pub accepted: Option<bool>,
    /// The reply code that decided the outcome, or the last one seen before
    /// the probe stalled.
    pub reason_code: Option<u16>,
    pub reason_text: String,
    /// Furthest state reached.
    pub stage: ProbeStage,
    #[cfg_attr(
        feature = "with-serde",
        serde(default, skip_serializing_if = "Vec::is_empty")
    )]
    pub transcript: Vec<SmtpEvent>,
}

impl ProbeOutcome {
    pub fn is_accepted(&self) -> bool {
        self.accepted == Some(true)
    }
}
