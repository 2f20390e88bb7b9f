use bytes::Bytes;
use thiserror::Error;

use crate::http::framing::{Framer, parse_content_length};
use crate::http::request::{Method, Request};

/// Structural problems that make a request unusable.
///
/// Each one is answered with 400 Bad Request by the router.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("request line is not terminated by CRLF")]
    Incomplete,
    #[error("request line is not valid UTF-8")]
    InvalidEncoding,
    #[error("request line has no method")]
    MissingMethod,
    #[error("request line has no target")]
    MissingTarget,
    #[error("request line has no protocol version")]
    MissingVersion,
    #[error("malformed protocol version: {0}")]
    InvalidVersion(String),
    #[error("invalid Content-Length: {0}")]
    InvalidContentLength(String),
    #[error("request exceeds {0} bytes")]
    TooLarge(usize),
}

/// Method, target and version taken from the first line of a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestLine {
    pub method: Method,
    pub target: String,
    pub version: String,
}

/// Outcome of looking at a single line in the header section.
#[derive(Debug, PartialEq, Eq)]
pub enum HeaderLine {
    Header(String, String),
    /// Not a header; the header section is over.
    End,
}

/// Parses a complete request out of an accumulated buffer.
///
/// The buffer is not modified and the returned body is a slice of it.
pub fn parse_http_request(buf: &Bytes) -> Result<Request, ParseError> {
    let mut framer = Framer::new(buf.clone());

    let line = framer.next_line().ok_or(ParseError::Incomplete)?;
    let RequestLine { method, target, version } = parse_request_line(&line)?;

    let mut headers = Vec::new();
    loop {
        let start = framer.position();
        let Some(line) = framer.next_line() else {
            break;
        };
        if line.is_empty() {
            break;
        }
        match parse_header_line(&line) {
            HeaderLine::Header(name, value) => headers.push((name, value)),
            HeaderLine::End => {
                // The line belongs to the body.
                framer.rewind(start);
                break;
            }
        }
    }

    let declared = headers
        .iter()
        .find(|(name, _)| name == "Content-Length")
        .map(|(_, value)| {
            parse_content_length(value)
                .ok_or_else(|| ParseError::InvalidContentLength(value.clone()))
        })
        .transpose()?;

    let body = parse_body(framer.remainder(), declared);

    Ok(Request {
        method,
        target,
        version,
        headers,
        content_length: declared.unwrap_or(body.len()),
        body,
    })
}

/// Splits `METHOD SP target SP HTTP/version`.
pub fn parse_request_line(line: &[u8]) -> Result<RequestLine, ParseError> {
    let line = std::str::from_utf8(line).map_err(|_| ParseError::InvalidEncoding)?;
    let mut parts = line.splitn(3, ' ');

    let method = parts
        .next()
        .filter(|m| !m.is_empty())
        .ok_or(ParseError::MissingMethod)?;
    let target = parts
        .next()
        .filter(|t| !t.is_empty())
        .ok_or(ParseError::MissingTarget)?;
    let clause = parts
        .next()
        .filter(|v| !v.is_empty())
        .ok_or(ParseError::MissingVersion)?;

    let version = match clause.split_once('/') {
        Some(("HTTP", version)) if !version.is_empty() && !version.contains(' ') => version,
        _ => return Err(ParseError::InvalidVersion(clause.to_string())),
    };

    Ok(RequestLine {
        method: Method::from_token(method),
        target: target.to_string(),
        version: version.to_string(),
    })
}

/// Splits a `Name: value` line on its first colon.
///
/// Only one leading space is removed from the value. A line without a colon,
/// or one that is not UTF-8, ends the header section.
pub fn parse_header_line(line: &[u8]) -> HeaderLine {
    let Ok(line) = std::str::from_utf8(line) else {
        return HeaderLine::End;
    };
    match line.split_once(':') {
        Some((name, value)) => {
            let value = value.strip_prefix(' ').unwrap_or(value);
            HeaderLine::Header(name.to_string(), value.to_string())
        }
        None => HeaderLine::End,
    }
}

/// Cuts the body to the declared length when enough bytes are present.
pub fn parse_body(rest: Bytes, content_length: Option<usize>) -> Bytes {
    match content_length {
        Some(len) if rest.len() >= len => rest.slice(..len),
        _ => rest,
    }
}
