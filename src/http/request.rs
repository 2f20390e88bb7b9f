use bytes::Bytes;

use crate::http::framing::parse_content_length;

/// HTTP request methods.
///
/// The set is fixed. A token outside of it is kept as `Unknown` so the
/// request still reaches dispatch, where each route decides whether to
/// accept it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Method {
    /// GET - Retrieve a resource
    GET,
    /// POST - Create or submit data
    POST,
    /// PUT - Replace a resource
    PUT,
    /// PATCH - Partial modification of a resource
    PATCH,
    /// DELETE - Delete a resource
    DELETE,
    /// UPDATE - Non-standard update verb
    UPDATE,
    /// OPTIONS - Describe communication options
    OPTIONS,
    /// Any other token, as sent
    Unknown(String),
}

/// A parsed HTTP request.
///
/// Built once by the parser and only read afterwards. The body is a slice of
/// the connection's read buffer.
#[derive(Debug, Clone)]
pub struct Request {
    /// The HTTP method (GET, POST, etc.)
    pub method: Method,
    /// The request target as sent (e.g., "/echo/abc"), never empty
    pub target: String,
    /// Protocol version without the "HTTP/" prefix (e.g., "1.1")
    pub version: String,
    /// Header name/value pairs in the order they were received
    pub headers: Vec<(String, String)>,
    /// Request body, possibly empty
    pub body: Bytes,
    /// Declared `Content-Length` if present, otherwise the body length
    pub content_length: usize,
}

/// Builder for constructing Request objects.
pub struct RequestBuilder {
    method: Option<Method>,
    target: Option<String>,
    version: Option<String>,
    headers: Vec<(String, String)>,
    body: Bytes,
}

impl Method {
    /// Maps a request-line token to a method.
    ///
    /// # Example
    ///
    /// ```
    /// # use minihttpd::http::request::Method;
    /// assert_eq!(Method::from_token("GET"), Method::GET);
    /// assert_eq!(Method::from_token("get"), Method::Unknown("get".to_string()));
    /// ```
    pub fn from_token(s: &str) -> Self {
        match s {
            "GET" => Method::GET,
            "POST" => Method::POST,
            "PUT" => Method::PUT,
            "PATCH" => Method::PATCH,
            "DELETE" => Method::DELETE,
            "UPDATE" => Method::UPDATE,
            "OPTIONS" => Method::OPTIONS,
            other => Method::Unknown(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Method::GET => "GET",
            Method::POST => "POST",
            Method::PUT => "PUT",
            Method::PATCH => "PATCH",
            Method::DELETE => "DELETE",
            Method::UPDATE => "UPDATE",
            Method::OPTIONS => "OPTIONS",
            Method::Unknown(token) => token,
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Default for RequestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestBuilder {
    pub fn new() -> Self {
        Self {
            method: None,
            target: None,
            version: None,
            headers: Vec::new(),
            body: Bytes::new(),
        }
    }

    pub fn method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    pub fn target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    pub fn build(self) -> Result<Request, &'static str> {
        let target = self.target.ok_or("target missing")?;
        if target.is_empty() {
            return Err("target empty");
        }

        let declared = self
            .headers
            .iter()
            .find(|(name, _)| name == "Content-Length")
            .and_then(|(_, value)| parse_content_length(value));

        Ok(Request {
            method: self.method.ok_or("method missing")?,
            target,
            version: self.version.unwrap_or_else(|| "1.1".to_string()),
            content_length: declared.unwrap_or(self.body.len()),
            headers: self.headers,
            body: self.body,
        })
    }
}

impl Request {
    /// Retrieves a header value by name.
    ///
    /// Names are compared exactly as received. With duplicate headers the
    /// first one wins.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// The `Content-Length` header as sent, if present and numeric.
    pub fn declared_content_length(&self) -> Option<usize> {
        self.header("Content-Length").and_then(parse_content_length)
    }

    /// Non-empty `/`-separated segments of the target.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.target.split('/').filter(|s| !s.is_empty())
    }
}
