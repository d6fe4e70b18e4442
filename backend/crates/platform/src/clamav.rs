//! ClamAV daemon client
//!
//! Speaks the `clamd` TCP protocol:
//! - `zINSTREAM\0`, then `<u32 big-endian length><bytes>` chunks, then a
//!   zero-length chunk; the daemon answers with one `\0`-terminated line
//!   such as `stream: OK` or `stream: Eicar-Test-Signature FOUND`.
//! - `zPING\0` → `PONG`

use std::io;
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::time::timeout;

use crate::config::{ConfigError, env_or, env_parse_or};

/// Replies longer than this are cut; a real verdict line is far shorter.
const MAX_REPLY_LEN: usize = 4096;

/// Connection settings for `clamd`
#[derive(Debug, Clone)]
pub struct ClamdConfig {
    pub host: String,
    pub port: u16,
    /// Timeout for establishing the TCP connection
    pub connect_timeout: Duration,
    /// Timeout for the whole request/response exchange
    pub io_timeout: Duration,
    /// Maximum payload size per INSTREAM chunk
    pub chunk_size: usize,
}

impl Default for ClamdConfig {
    fn default() -> Self {
        Self {
            host: "clamav".to_string(),
            port: 3310,
            connect_timeout: Duration::from_secs(5),
            io_timeout: Duration::from_secs(5),
            chunk_size: 2048,
        }
    }
}

impl ClamdConfig {
    /// Load from `CLAMAV_HOST`, `CLAMAV_PORT` and `CLAMAV_TIMEOUT_MS`
    pub fn from_env() -> Result<Self, ConfigError> {
        let timeout = Duration::from_millis(env_parse_or("CLAMAV_TIMEOUT_MS", 5000u64)?);
        Ok(Self {
            host: env_or("CLAMAV_HOST", "clamav"),
            port: env_parse_or("CLAMAV_PORT", 3310u16)?,
            connect_timeout: timeout,
            io_timeout: timeout,
            ..Self::default()
        })
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Result of a completed scan
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanVerdict {
    /// No signature matched
    Clean,
    /// A signature matched; `signature` is the name reported by clamd
    Infected { signature: String },
    /// clamd answered but could not scan (size limit, internal error, garbage)
    Error(String),
}

impl ScanVerdict {
    /// Parse a clamd reply line
    ///
    /// ```
    /// use platform::clamav::ScanVerdict;
    ///
    /// assert_eq!(ScanVerdict::parse("stream: OK"), ScanVerdict::Clean);
    /// assert_eq!(
    ///     ScanVerdict::parse("stream: Eicar-Test-Signature FOUND"),
    ///     ScanVerdict::Infected { signature: "Eicar-Test-Signature".into() }
    /// );
    /// ```
    pub fn parse(reply: &str) -> Self {
        let reply = reply.trim_matches(|c: char| c == '\0' || c.is_whitespace());

        // "stream: <body>" / "1: <body>" (session ids) / "<body>"
        let body = reply
            .split_once(':')
            .map(|(_, rest)| rest.trim())
            .unwrap_or(reply);

        if let Some(signature) = body.strip_suffix("FOUND") {
            let signature = signature.trim();
            return ScanVerdict::Infected {
                signature: if signature.is_empty() {
                    "unknown".to_string()
                } else {
                    signature.to_string()
                },
            };
        }

        if body == "OK" {
            return ScanVerdict::Clean;
        }

        if let Some(detail) = body.strip_suffix("ERROR") {
            return ScanVerdict::Error(detail.trim().trim_end_matches('.').to_string());
        }

        ScanVerdict::Error(if reply.is_empty() {
            "empty reply".to_string()
        } else {
            reply.to_string()
        })
    }

    pub fn is_clean(&self) -> bool {
        matches!(self, ScanVerdict::Clean)
    }
}

/// Transport-level failures talking to clamd
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("failed to connect to clamd at {addr}: {source}")]
    Connect {
        addr: String,
        #[source]
        source: io::Error,
    },

    #[error("clamd did not answer within {0:?}")]
    Timeout(Duration),

    #[error("clamd I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("unexpected clamd reply: {0}")]
    UnexpectedReply(String),
}

/// Anything that can scan a byte payload for malware
#[trait_variant::make(VirusScanner: Send)]
pub trait LocalVirusScanner {
    async fn scan(&self, data: &[u8]) -> Result<ScanVerdict, ScanError>;
}

/// `clamd` TCP client
#[derive(Debug, Clone)]
pub struct ClamdClient {
    config: Arc<ClamdConfig>,
}

impl ClamdClient {
    pub fn new(config: ClamdConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &ClamdConfig {
        &self.config
    }

    /// Stream `data` to clamd with `zINSTREAM` and parse the verdict
    pub async fn instream(&self, data: &[u8]) -> Result<ScanVerdict, ScanError> {
        let mut stream = self.connect().await?;

        let exchange = async {
            let written = write_instream(&mut stream, data, self.config.chunk_size).await;
            let reply = read_reply(&mut stream).await;

            // clamd may hang up mid-upload (e.g. "INSTREAM size limit exceeded. ERROR");
            // its reply is more useful than the broken pipe.
            match (written, reply) {
                (_, Ok(reply)) if !reply.is_empty() => Ok(reply),
                (Err(e), _) => Err(ScanError::Io(e)),
                (Ok(()), reply) => reply.map_err(ScanError::Io),
            }
        };

        let reply = timeout(self.config.io_timeout, exchange)
            .await
            .map_err(|_| ScanError::Timeout(self.config.io_timeout))??;

        let verdict = ScanVerdict::parse(&reply);
        tracing::debug!(bytes = data.len(), reply = %reply, "clamd scan finished");
        Ok(verdict)
    }

    /// Liveness check used by the health endpoint
    pub async fn ping(&self) -> Result<(), ScanError> {
        let mut stream = self.connect().await?;

        let exchange = async {
            stream.write_all(b"zPING\0").await?;
            stream.flush().await?;
            read_reply(&mut stream).await
        };

        let reply = timeout(self.config.io_timeout, exchange)
            .await
            .map_err(|_| ScanError::Timeout(self.config.io_timeout))??;

        if reply == "PONG" {
            Ok(())
        } else {
            Err(ScanError::UnexpectedReply(reply))
        }
    }

    async fn connect(&self) -> Result<TcpStream, ScanError> {
        let addr = self.config.address();
        let connect = TcpStream::connect((self.config.host.as_str(), self.config.port));

        match timeout(self.config.connect_timeout, connect).await {
            Ok(Ok(stream)) => Ok(stream),
            Ok(Err(source)) => Err(ScanError::Connect { addr, source }),
            Err(_) => Err(ScanError::Timeout(self.config.connect_timeout)),
        }
    }
}

impl VirusScanner for ClamdClient {
    async fn scan(&self, data: &[u8]) -> Result<ScanVerdict, ScanError> {
        self.instream(data).await
    }
}

/// Write the INSTREAM command, the length-prefixed chunks and the terminator
async fn write_instream<W>(writer: &mut W, data: &[u8], chunk_size: usize) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    writer.write_all(b"zINSTREAM\0").await?;

    for chunk in data.chunks(chunk_size.max(1)) {
        let len = u32::try_from(chunk.len())
            .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "chunk too large"))?;
        writer.write_all(&len.to_be_bytes()).await?;
        writer.write_all(chunk).await?;
    }

    writer.write_all(&0u32.to_be_bytes()).await?;
    writer.flush().await
}

/// Read one reply terminated by `\0`, `\n` or EOF
async fn read_reply<R>(reader: &mut R) -> io::Result<String>
where
    R: AsyncRead + Unpin,
{
    let mut reader = BufReader::new(reader);
    let mut buf = Vec::with_capacity(64);

    loop {
        let available = reader.fill_buf().await?;
        if available.is_empty() {
            break;
        }

        if let Some(pos) = available.iter().position(|&b| b == 0 || b == b'\n') {
            buf.extend_from_slice(&available[..pos]);
            reader.consume(pos + 1);
            break;
        }

        let len = available.len();
        buf.extend_from_slice(available);
        reader.consume(len);

        if buf.len() >= MAX_REPLY_LEN {
            buf.truncate(MAX_REPLY_LEN);
            break;
        }
    }

    Ok(String::from_utf8_lossy(&buf).trim().to_string())
}
