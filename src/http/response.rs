use bytes::Bytes;

/// HTTP status codes produced by the router.
///
/// - `Ok` (200): Request successful
/// - `Created` (201): Resource stored
/// - `BadRequest` (400): Malformed request or unusable route arguments
/// - `NotFound` (404): No route or no such resource
/// - `InternalServerError` (500): Storage failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    /// 200 OK
    Ok,
    /// 201 Created
    Created,
    /// 400 Bad Request
    BadRequest,
    /// 404 Not Found
    NotFound,
    /// 500 Internal Server Error
    InternalServerError,
}

impl StatusCode {
    /// Returns the numeric HTTP status code.
    ///
    /// # Example
    ///
    /// ```
    /// # use minihttpd::http::response::StatusCode;
    /// assert_eq!(StatusCode::Ok.as_u16(), 200);
    /// assert_eq!(StatusCode::NotFound.as_u16(), 404);
    /// ```
    pub fn as_u16(&self) -> u16 {
        match self {
            StatusCode::Ok => 200,
            StatusCode::Created => 201,
            StatusCode::BadRequest => 400,
            StatusCode::NotFound => 404,
            StatusCode::InternalServerError => 500,
        }
    }

    /// Returns the standard HTTP reason phrase for this status code.
    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::Created => "Created",
            StatusCode::BadRequest => "Bad Request",
            StatusCode::NotFound => "Not Found",
            StatusCode::InternalServerError => "Internal Server Error",
        }
    }
}

/// A complete HTTP response ready to be serialized.
///
/// Headers keep the order they were added in.
#[derive(Debug)]
pub struct Response {
    /// The HTTP status code
    pub status: StatusCode,
    /// Header name/value pairs, in write order
    pub headers: Vec<(String, String)>,
    /// Response body
    pub body: Bytes,
}

/// Builder for constructing HTTP responses in a fluent style.
///
/// # Example
///
/// ```
/// # use minihttpd::http::response::{ResponseBuilder, StatusCode};
/// let response = ResponseBuilder::new(StatusCode::Ok)
///     .header("Content-Type", "text/plain")
///     .body("hi")
///     .build();
/// assert_eq!(response.header("Content-Length"), Some("2"));
/// ```
pub struct ResponseBuilder {
    status: StatusCode,
    headers: Vec<(String, String)>,
    body: Bytes,
}

impl ResponseBuilder {
    /// Creates a new response builder with the specified status code.
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: Bytes::new(),
        }
    }

    /// Adds a header, or replaces the value of one already set under the
    /// same name without moving it.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        let value = value.into();
        match self.headers.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.headers.push((name, value)),
        }
        self
    }

    /// Sets the response body.
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Builds the final Response.
    ///
    /// A non-empty body gets a `Content-Length` header appended unless one
    /// was set explicitly. Empty responses stay header-free.
    pub fn build(mut self) -> Response {
        let has_length = self.headers.iter().any(|(n, _)| n == "Content-Length");
        if !self.body.is_empty() && !has_length {
            self.headers
                .push(("Content-Length".to_string(), self.body.len().to_string()));
        }

        Response {
            status: self.status,
            headers: self.headers,
            body: self.body,
        }
    }
}

impl Response {
    /// A response with a status line and nothing else.
    pub fn empty(status: StatusCode) -> Self {
        ResponseBuilder::new(status).build()
    }

    /// 200 OK with a `text/plain` body. The length is always sent, even
    /// for an empty body.
    pub fn text(body: impl Into<Bytes>) -> Self {
        Self::typed("text/plain", body.into())
    }

    /// 200 OK with an `application/octet-stream` body.
    pub fn octet_stream(body: impl Into<Bytes>) -> Self {
        Self::typed("application/octet-stream", body.into())
    }

    /// 201 Created.
    pub fn created() -> Self {
        Self::empty(StatusCode::Created)
    }

    /// 400 Bad Request.
    pub fn bad_request() -> Self {
        Self::empty(StatusCode::BadRequest)
    }

    /// 404 Not Found.
    pub fn not_found() -> Self {
        Self::empty(StatusCode::NotFound)
    }

    /// 500 Internal Server Error.
    pub fn internal_error() -> Self {
        Self::empty(StatusCode::InternalServerError)
    }

    /// Looks up a header by exact name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    fn typed(content_type: &str, body: Bytes) -> Self {
        ResponseBuilder::new(StatusCode::Ok)
            .header("Content-Type", content_type)
            .header("Content-Length", body.len().to_string())
            .body(body)
            .build()
    }
}
