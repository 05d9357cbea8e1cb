use std::net::SocketAddr;

use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};

use super::error::SessionError;
use super::types::SmtpReply;

/// RFC 5321 caps reply lines at 512 octets; leave generous slack.
const MAX_LINE_LEN: u64 = 4096;

pub(crate) struct SmtpSession {
    reader: BufReader<OwnedReadHalf>,
    writer: OwnedWriteHalf,
    peer: SocketAddr,
}

impl SmtpSession {
    pub(crate) async fn connect(host: &str, port: u16) -> Result<Self, SessionError> {
        let stream = TcpStream::connect((host, port)).await?;
        let peer = stream.peer_addr()?;
        let (read_half, writer) = stream.into_split();
        Ok(Self {
            reader: BufReader::new(read_half),
            writer,
            peer,
        })
    }

    pub(crate) fn peer(&self) -> SocketAddr {
        self.peer
    }

    pub(crate) async fn send_command(&mut self, command: &str) -> Result<(), SessionError> {
        let mut line = command.as_bytes().to_vec();
        line.extend_from_slice(b"\r\n");
        self.writer.write_all(&line).await?;
        self.writer.flush().await?;
        Ok(())
    }

    /// Reads one full reply. Continuation lines (`250-...`) are collected
    /// until a line whose fourth character is a space (or a bare code);
    /// only that final line's code is kept.
    pub(crate) async fn read_reply(&mut self) -> Result<SmtpReply, SessionError> {
        let mut lines = Vec::new();
        loop {
            let raw = self.read_line().await?;
            if raw.len() < 3 || !raw.is_char_boundary(3) {
                return Err(SessionError::malformed(raw));
            }
            let code = raw[..3]
                .parse::<u16>()
                .map_err(|_| SessionError::malformed(raw.as_str()))?;
            let separator = raw.as_bytes().get(3).copied();
            let is_final = match separator {
                None | Some(b' ') => true,
                Some(b'-') => false,
                Some(_) => return Err(SessionError::malformed(raw)),
            };
            lines.push(raw.get(4..).unwrap_or("").to_string());
            if is_final {
                return Ok(SmtpReply { code, lines });
            }
        }
    }

    async fn read_line(&mut self) -> Result<String, SessionError> {
        let mut raw = Vec::new();
        let read = (&mut self.reader)
            .take(MAX_LINE_LEN)
            .read_until(b'\n', &mut raw)
            .await?;
        if read == 0 {
            return Err(SessionError::Closed);
        }
        if raw.last() != Some(&b'\n') {
            if raw.len() as u64 >= MAX_LINE_LEN {
                return Err(SessionError::malformed("reply line too long"));
            }
            // peer closed mid-line
            return Err(SessionError::Closed);
        }
        raw.pop();
        if raw.last() == Some(&b'\r') {
            raw.pop();
        }
        Ok(String::from_utf8_lossy(&raw).into_owned())
    }

    /// Half-closes the write side; dropping `self` releases the socket.
    pub(crate) async fn close(mut self) {
        let _ = self.writer.shutdown().await;
    }
}
