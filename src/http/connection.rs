use std::sync::Arc;
use std::time::Duration;

use bytes::{BufMut, Bytes, BytesMut};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::config::ServerConfig;
use crate::http::framing::{FrameEnd, FrameStatus, frame_status};
use crate::http::parser::{ParseError, parse_http_request};
use crate::http::writer::ResponseWriter;
use crate::routing::Router;

/// Read limits applied to every connection.
#[derive(Debug, Clone, Copy)]
pub struct ConnectionSettings {
    pub read_buffer_size: usize,
    pub max_request_bytes: usize,
    pub read_timeout: Duration,
}

impl From<&ServerConfig> for ConnectionSettings {
    fn from(cfg: &ServerConfig) -> Self {
        Self {
            read_buffer_size: cfg.read_buffer_size,
            max_request_bytes: cfg.max_request_bytes,
            read_timeout: cfg.read_timeout(),
        }
    }
}

impl Default for ConnectionSettings {
    fn default() -> Self {
        (&ServerConfig::default()).into()
    }
}

/// One accepted socket, serving exactly one request.
pub struct Connection {
    stream: TcpStream,
    buffer: BytesMut,
    router: Arc<Router>,
    settings: ConnectionSettings,
    state: ConnectionState,
}

pub enum ConnectionState {
    /// Waiting for request bytes.
    Registered,
    /// Accumulation stopped; the buffer and the reason it stopped.
    Readable(Bytes, FrameEnd),
    /// Response built, not yet written.
    Handled(ResponseWriter),
    Closed,
}

impl Connection {
    pub fn new(stream: TcpStream, router: Arc<Router>, settings: ConnectionSettings) -> Self {
        Self {
            stream,
            buffer: BytesMut::with_capacity(settings.read_buffer_size),
            router,
            settings,
            state: ConnectionState::Registered,
        }
    }

    pub async fn run(&mut self) -> anyhow::Result<()> {
        loop {
            match &mut self.state {
                ConnectionState::Registered => {
                    self.state = match self.read_frame().await? {
                        Some((frame, end)) => ConnectionState::Readable(frame, end),
                        None => ConnectionState::Closed,
                    };
                }

                ConnectionState::Readable(frame, end) => {
                    let parsed = match end {
                        // A cut-off request must never reach a handler.
                        FrameEnd::CapReached => Err(ParseError::TooLarge(frame.len())),
                        _ => parse_http_request(frame),
                    };
                    let summary = parsed
                        .as_ref()
                        .map(|req| (req.method.to_string(), req.target.clone()))
                        .ok();
                    let response = self.router.handle(parsed);

                    match summary {
                        Some((method, target)) => info!(
                            method = %method,
                            target = %target,
                            status = response.status.as_u16(),
                            "Request handled"
                        ),
                        None => info!(
                            status = response.status.as_u16(),
                            "Malformed request rejected"
                        ),
                    }

                    self.state = ConnectionState::Handled(ResponseWriter::new(&response));
                }

                ConnectionState::Handled(writer) => {
                    debug!(bytes = writer.remaining(), "Writing response");
                    writer.write_to_stream(&mut self.stream).await?;
                    self.state = ConnectionState::Closed;
                }

                ConnectionState::Closed => {
                    // Nothing left to say; a failed shutdown changes nothing.
                    let _ = self.stream.shutdown().await;
                    break;
                }
            }
        }

        Ok(())
    }

    /// Accumulates bytes until the request is complete, the peer stops
    /// sending, the size cap is hit, or the read deadline passes.
    ///
    /// The deadline covers the whole request, not each read. Returns `None`
    /// if the connection produced no bytes at all.
    pub async fn read_frame(&mut self) -> anyhow::Result<Option<(Bytes, FrameEnd)>> {
        let deadline = Instant::now() + self.settings.read_timeout;

        let end = loop {
            if frame_status(&self.buffer) == FrameStatus::Complete {
                break FrameEnd::Complete;
            }
            if self.buffer.len() >= self.settings.max_request_bytes {
                debug!(bytes = self.buffer.len(), "Request size cap reached");
                break FrameEnd::CapReached;
            }

            let room = self.settings.max_request_bytes - self.buffer.len();
            let want = self.settings.read_buffer_size.min(room);
            self.buffer.reserve(want);
            let mut chunk = (&mut self.buffer).limit(want);

            let read = tokio::time::timeout_at(deadline, self.stream.read_buf(&mut chunk));
            let n = match read.await {
                Ok(read) => read?,
                Err(_) => {
                    debug!(bytes = self.buffer.len(), "Read deadline passed");
                    break FrameEnd::TimedOut;
                }
            };

            if n == 0 {
                // Client closed its side
                break FrameEnd::PeerClosed;
            }
            debug!(read = n, buffered = self.buffer.len(), "Bytes read");
        };

        if self.buffer.is_empty() {
            return Ok(None);
        }
        Ok(Some((self.buffer.split().freeze(), end)))
    }
}

/// Drives a connection to completion, logging instead of propagating
/// failures so one bad socket never affects another.
pub async fn serve(stream: TcpStream, router: Arc<Router>, settings: ConnectionSettings) {
    let mut conn = Connection::new(stream, router, settings);
    if let Err(e) = conn.run().await {
        warn!(error = %e, "Connection failed");
    }
}
