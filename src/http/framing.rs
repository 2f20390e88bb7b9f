//! Line framing over a raw request buffer.
//!
//! The buffer is never modified. Every line handed out is a `Bytes` slice of
//! the original buffer, so the same bytes can be inspected again after parsing
//! (for logging, for instance).

use bytes::Bytes;

const CRLF: &[u8] = b"\r\n";
const HEADERS_END: &[u8] = b"\r\n\r\n";

/// Cursor that walks a buffer one CRLF-terminated line at a time.
#[derive(Debug, Clone)]
pub struct Framer {
    buf: Bytes,
    pos: usize,
}

impl Framer {
    pub fn new(buf: Bytes) -> Self {
        Self { buf, pos: 0 }
    }

    /// Returns the next line without its CRLF and advances past it.
    ///
    /// Returns `None` when no CRLF remains. Bytes after the last CRLF are left
    /// for [`Framer::remainder`].
    pub fn next_line(&mut self) -> Option<Bytes> {
        let rest = &self.buf[self.pos..];
        let len = find(rest, CRLF)?;
        let line = self.buf.slice(self.pos..self.pos + len);
        self.pos += len + CRLF.len();
        Some(line)
    }

    /// Current offset into the buffer.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Moves the cursor back to an offset previously returned by `position`.
    pub fn rewind(&mut self, pos: usize) {
        self.pos = pos.min(self.buf.len());
    }

    /// Everything from the cursor to the end of the buffer.
    pub fn remainder(&self) -> Bytes {
        self.buf.slice(self.pos..)
    }
}

/// Whether an accumulated buffer holds everything a request needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameStatus {
    /// Header terminator seen and the declared body (if any) fully buffered.
    Complete,
    /// More bytes are needed.
    Partial,
}

/// Why accumulation stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameEnd {
    /// `frame_status` reported `Complete`.
    Complete,
    /// The peer closed its write side.
    PeerClosed,
    /// The read deadline passed.
    TimedOut,
    /// The buffer reached `max_request_bytes` before the frame completed.
    CapReached,
}

/// Checks an accumulation buffer for a complete request frame.
///
/// Only the `Content-Length` header is looked at here; full header parsing
/// happens once, after accumulation stops.
pub fn frame_status(buf: &[u8]) -> FrameStatus {
    let Some(headers_end) = find(buf, HEADERS_END) else {
        return FrameStatus::Partial;
    };
    let body_len = buf.len() - headers_end - HEADERS_END.len();

    match declared_length(&buf[..headers_end]) {
        Some(expected) if body_len < expected => FrameStatus::Partial,
        _ => FrameStatus::Complete,
    }
}

fn declared_length(head: &[u8]) -> Option<usize> {
    let value = head.split(|b| *b == b'\n').skip(1).find_map(|line| {
        let line = line.strip_suffix(b"\r").unwrap_or(line);
        let colon = line.iter().position(|b| *b == b':')?;
        let (name, value) = line.split_at(colon);
        (name == b"Content-Length").then_some(&value[1..])
    })?;
    std::str::from_utf8(value).ok().and_then(parse_content_length)
}

/// Reads a `Content-Length` value, ignoring surrounding whitespace.
pub fn parse_content_length(value: &str) -> Option<usize> {
    value.trim().parse().ok()
}

pub(crate) fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|w| w == needle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lines_are_slices_of_the_buffer() {
        let mut framer = Framer::new(Bytes::from_static(b"GET / HTTP/1.1\r\nHost: a\r\n\r\nbody"));

        assert_eq!(framer.next_line().unwrap(), "GET / HTTP/1.1");
        assert_eq!(framer.next_line().unwrap(), "Host: a");
        assert_eq!(framer.next_line().unwrap(), "");
        assert!(framer.next_line().is_none());
        assert_eq!(framer.remainder(), "body");
    }

    #[test]
    fn declared_length_waits_for_body() {
        assert_eq!(
            frame_status(b"POST /x HTTP/1.1\r\nContent-Length: 4\r\n\r\nab"),
            FrameStatus::Partial
        );
        assert_eq!(
            frame_status(b"POST /x HTTP/1.1\r\nContent-Length: 4\r\n\r\nabcd"),
            FrameStatus::Complete
        );
    }
}
