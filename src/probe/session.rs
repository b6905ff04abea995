use std::io;

use thiserror::Error;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};

use super::types::SmtpReply;

/// Longest reply line accepted, CRLF excluded.
const MAX_LINE_LEN: usize = 4096;
/// Most lines accepted in one multi-line reply.
const MAX_REPLY_LINES: usize = 100;
/// The transcript stops growing past this many lines.
const MAX_TRANSCRIPT_LINES: usize = 256;

#[derive(Debug, Error)]
pub(crate) enum SessionError {
    #[error("connection closed by peer")]
    Closed,
    #[error("reply line longer than 4096 bytes")]
    LineTooLong,
    #[error("reply longer than 100 lines")]
    ReplyTooLong,
    #[error("I/O error: {source}")]
    Io {
        #[source]
        source: io::Error,
    },
}

impl SessionError {
    /// True when the socket can no longer carry a `QUIT`.
    pub(crate) fn is_fatal(&self) -> bool {
        matches!(self, Self::Closed | Self::Io { .. })
    }
}

impl From<io::Error> for SessionError {
    fn from(source: io::Error) -> Self {
        Self::Io { source }
    }
}

/// Line-oriented SMTP client connection with a diagnostic transcript.
pub(crate) struct SmtpSession {
    reader: BufReader<OwnedReadHalf>,
    writer: OwnedWriteHalf,
    pub transcript: Vec<String>,
}

impl SmtpSession {
    /// Resolves `host` and connects to the first reachable address.
    pub(crate) async fn connect(host: &str, port: u16) -> io::Result<Self> {
        let stream = TcpStream::connect((host, port)).await?;
        let (read_half, writer) = stream.into_split();
        Ok(Self {
            reader: BufReader::new(read_half),
            writer,
            transcript: Vec::new(),
        })
    }

    pub(crate) async fn send_command(&mut self, command: &str) -> Result<(), SessionError> {
        self.record(format!("C: {command}"));
        let mut line = Vec::with_capacity(command.len() + 2);
        line.extend_from_slice(command.as_bytes());
        line.extend_from_slice(b"\r\n");
        self.writer.write_all(&line).await?;
        self.writer.flush().await?;
        Ok(())
    }

    /// Reads one complete (possibly multi-line) reply. A line without a
    /// numeric code, or a continuation with a different code, yields
    /// [`SmtpReply::unparsable`]. Replies are bounded in line length and
    /// line count.
    pub(crate) async fn read_reply(&mut self) -> Result<SmtpReply, SessionError> {
        let mut code = None;
        let mut message_lines = Vec::new();
        loop {
            if message_lines.len() == MAX_REPLY_LINES {
                return Err(SessionError::ReplyTooLong);
            }
            let raw = self.read_line().await?;
            self.record(format!("S: {raw}"));

            let Some(parsed_code) = reply_code(&raw) else {
                return Ok(SmtpReply::unparsable(raw));
            };
            match code {
                Some(existing) if existing != parsed_code => {
                    return Ok(SmtpReply::unparsable(raw));
                }
                Some(_) => {}
                None => code = Some(parsed_code),
            }

            let continuation = raw.as_bytes().get(3).copied() == Some(b'-');
            message_lines.push(raw.get(4..).unwrap_or_default().to_string());
            if !continuation {
                break;
            }
        }
        Ok(SmtpReply::new(
            code.unwrap_or_default(),
            message_lines.join("\n"),
        ))
    }

    /// Best-effort `QUIT`; the reply, if any, is read and ignored.
    pub(crate) async fn quit(mut self) {
        if self.send_command("QUIT").await.is_ok() {
            let _ = self.read_reply().await;
        }
        let _ = self.writer.shutdown().await;
    }

    fn record(&mut self, line: String) {
        if self.transcript.len() < MAX_TRANSCRIPT_LINES {
            self.transcript.push(line);
        }
    }

    /// One line without its line ending. Never buffers more than
    /// `MAX_LINE_LEN` bytes plus CRLF.
    async fn read_line(&mut self) -> Result<String, SessionError> {
        let limit = MAX_LINE_LEN + 2;
        let mut raw = Vec::new();
        let bytes = (&mut self.reader)
            .take(limit as u64)
            .read_until(b'\n', &mut raw)
            .await?;
        if bytes == 0 {
            return Err(SessionError::Closed);
        }
        if !raw.ends_with(b"\n") && bytes == limit {
            return Err(SessionError::LineTooLong);
        }
        let line = String::from_utf8_lossy(&raw);
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }
}

fn reply_code(line: &str) -> Option<u16> {
    let digits = line.get(..3)?;
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    match line.as_bytes().get(3) {
        None | Some(b' ') | Some(b'-') => digits.parse().ok(),
        Some(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::reply_code;

    #[test]
    fn reply_code_requires_three_digits_and_separator() {
        assert_eq!(reply_code("250 OK"), Some(250));
        assert_eq!(reply_code("250-PIPELINING"), Some(250));
        assert_eq!(reply_code("354"), Some(354));
        assert_eq!(reply_code("25O OK"), None);
        assert_eq!(reply_code("2500 OK"), None);
        assert_eq!(reply_code("hello"), None);
        assert_eq!(reply_code(""), None);
    }
}
