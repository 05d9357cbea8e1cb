use thiserror::Error;

/// Transport-level failures inside one SMTP session. These never leave the
/// `smtp` module: the probe folds them into an inconclusive outcome.
#[derive(Debug, Error)]
pub(crate) enum SessionError {
    #[error("Connection error: {source}")]
    Io {
        #[source]
        source: std::io::Error,
    },
    #[error("Unexpected connection end")]
    Closed,
    #[error("Malformed reply: {line}")]
    Malformed { line: String },
}

impl From<std::io::Error> for SessionError {
    fn from(source: std::io::Error) -> Self {
        Self::Io { source }
    }
}

impl SessionError {
    pub(crate) fn malformed(line: impl Into<String>) -> Self {
        Self::Malformed { line: line.into() }
    }
}
