use std::sync::Arc;

use bytes::Bytes;
use minihttpd::http::parser::{ParseError, parse_http_request};
use minihttpd::http::request::{Method, Request, RequestBuilder};
use minihttpd::http::response::{Response, StatusCode};
use minihttpd::routing::{MethodFilter, PathPattern, RouteContext, Router};
use minihttpd::store::{MemoryStore, ResourceStore, StoreError};

fn router() -> (Router, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    (Router::with_default_routes(store.clone()), store)
}

fn get(target: &str) -> Request {
    RequestBuilder::new()
        .method(Method::GET)
        .target(target)
        .build()
        .unwrap()
}

fn raw(router: &Router, bytes: &'static [u8]) -> Response {
    router.handle(parse_http_request(&Bytes::from_static(bytes)))
}

#[test]
fn test_root_ok_for_any_method() {
    let (router, _) = router();

    for method in [Method::GET, Method::POST, Method::Unknown("BREW".to_string())] {
        let req = RequestBuilder::new().method(method).target("/").build().unwrap();
        let resp = router.dispatch(&req);
        assert_eq!(resp.status, StatusCode::Ok);
        assert!(resp.headers.is_empty());
        assert!(resp.body.is_empty());
    }
}

#[test]
fn test_echo_returns_segment() {
    let (router, _) = router();

    for text in ["abc", "hello-world", "x", "caf%C3%A9"] {
        let resp = router.dispatch(&get(&format!("/echo/{text}")));
        assert_eq!(resp.status, StatusCode::Ok);
        assert_eq!(resp.body, text);
        assert_eq!(resp.header("Content-Type"), Some("text/plain"));
        assert_eq!(resp.header("Content-Length"), Some(text.len().to_string().as_str()));
    }
}

#[test]
fn test_echo_without_text() {
    let (router, _) = router();

    let resp = router.dispatch(&get("/echo"));

    assert_eq!(resp.status, StatusCode::Ok);
    assert!(resp.body.is_empty());
    assert_eq!(resp.header("Content-Length"), Some("0"));
}

#[test]
fn test_echo_uses_second_segment_only() {
    let (router, _) = router();

    let resp = router.dispatch(&get("/echo/a/b"));

    assert_eq!(resp.body, "a");
}

#[test]
fn test_user_agent_echoed() {
    let (router, _) = router();
    let req = RequestBuilder::new()
        .method(Method::GET)
        .target("/user-agent")
        .header("User-Agent", "foobar/1.2.3")
        .build()
        .unwrap();

    let resp = router.dispatch(&req);

    assert_eq!(resp.status, StatusCode::Ok);
    assert_eq!(resp.body, "foobar/1.2.3");
    assert_eq!(resp.header("Content-Length"), Some("12"));
}

#[test]
fn test_user_agent_missing_is_bad_request() {
    let (router, _) = router();

    let resp = router.dispatch(&get("/user-agent"));

    assert_eq!(resp.status, StatusCode::BadRequest);
}

#[test]
fn test_unknown_route_not_found() {
    let (router, _) = router();

    assert_eq!(router.dispatch(&get("/nope")).status, StatusCode::NotFound);
    assert_eq!(router.dispatch(&get("//")).status, StatusCode::NotFound);
    assert_eq!(router.dispatch(&get("/Echo/abc")).status, StatusCode::NotFound);
}

#[test]
fn test_malformed_request_is_bad_request() {
    let (router, _) = router();

    assert_eq!(raw(&router, b"GET /\r\n\r\n").status, StatusCode::BadRequest);
    assert_eq!(raw(&router, b"garbage").status, StatusCode::BadRequest);
    assert_eq!(raw(&router, b"GET / HTTP1.1\r\n\r\n").status, StatusCode::BadRequest);
}

#[test]
fn test_too_large_never_reaches_store() {
    let (router, store) = router();

    let resp = router.handle(Err(ParseError::TooLarge(64)));

    assert_eq!(resp.status, StatusCode::BadRequest);
    assert!(store.is_empty());
}

#[test]
fn test_file_round_trip() {
    let (router, store) = router();

    let created = raw(&router, b"POST /files/notes HTTP/1.1\r\nContent-Length: 5\r\n\r\nhello");
    assert_eq!(created.status, StatusCode::Created);
    assert!(created.headers.is_empty());
    assert_eq!(store.len(), 1);

    let fetched = router.dispatch(&get("/files/notes"));
    assert_eq!(fetched.status, StatusCode::Ok);
    assert_eq!(fetched.body, "hello");
    assert_eq!(fetched.header("Content-Type"), Some("application/octet-stream"));
    assert_eq!(fetched.header("Content-Length"), Some("5"));
}

#[test]
fn test_file_post_truncates_to_declared_length() {
    let (router, store) = router();

    let resp = raw(&router, b"POST /files/short HTTP/1.1\r\nContent-Length: 3\r\n\r\nabcdef");

    assert_eq!(resp.status, StatusCode::Created);
    assert_eq!(store.read("short").unwrap(), "abc");
}

#[test]
fn test_file_post_requires_content_length() {
    let (router, store) = router();

    let resp = raw(&router, b"POST /files/a HTTP/1.1\r\nHost: x\r\n\r\nabc");

    assert_eq!(resp.status, StatusCode::BadRequest);
    assert!(store.is_empty());
}

#[test]
fn test_file_get_missing_is_not_found() {
    let (router, _) = router();

    let resp = router.dispatch(&get("/files/never-written"));

    assert_eq!(resp.status, StatusCode::NotFound);
    assert!(resp.body.is_empty());
}

#[test]
fn test_files_without_name_is_bad_request() {
    let (router, _) = router();

    assert_eq!(router.dispatch(&get("/files")).status, StatusCode::BadRequest);
    assert_eq!(router.dispatch(&get("/files/")).status, StatusCode::BadRequest);
}

#[test]
fn test_files_other_method_is_bad_request() {
    let (router, _) = router();

    for method in [Method::PUT, Method::DELETE, Method::Unknown("FETCH".to_string())] {
        let req = RequestBuilder::new()
            .method(method)
            .target("/files/a")
            .build()
            .unwrap();
        assert_eq!(router.dispatch(&req).status, StatusCode::BadRequest);
    }
}

#[test]
fn test_files_rejects_parent_directory() {
    let (router, _) = router();

    assert_eq!(router.dispatch(&get("/files/..")).status, StatusCode::BadRequest);
}

struct BrokenStore;

impl ResourceStore for BrokenStore {
    fn read(&self, _name: &str) -> Result<Bytes, StoreError> {
        Err(StoreError::Io(std::io::Error::other("disk on fire")))
    }

    fn write(&self, _name: &str, _bytes: &[u8]) -> Result<(), StoreError> {
        Err(StoreError::Io(std::io::Error::other("disk on fire")))
    }
}

#[test]
fn test_store_failure_is_internal_error() {
    let router = Router::with_default_routes(Arc::new(BrokenStore));

    let post = raw(&router, b"POST /files/a HTTP/1.1\r\nContent-Length: 1\r\n\r\nx");
    assert_eq!(post.status, StatusCode::InternalServerError);

    assert_eq!(router.dispatch(&get("/files/a")).status, StatusCode::InternalServerError);
}

fn teapot(_ctx: &RouteContext<'_>) -> Response {
    Response::text("short and stout")
}

#[test]
fn test_custom_route_and_first_match_wins() {
    let router = Router::new(Arc::new(MemoryStore::new()))
        .route(MethodFilter::Only(Method::GET), PathPattern::Segment("pot"), teapot)
        .route(MethodFilter::Any, PathPattern::Segment("pot"), |_| Response::not_found());

    assert_eq!(router.routes().len(), 2);
    assert_eq!(router.dispatch(&get("/pot")).body, "short and stout");

    let post = RequestBuilder::new().method(Method::POST).target("/pot").build().unwrap();
    assert_eq!(router.dispatch(&post).status, StatusCode::NotFound);
}

#[test]
fn test_empty_router() {
    let router = Router::new(Arc::new(MemoryStore::new()));

    assert_eq!(router.dispatch(&get("/")).status, StatusCode::NotFound);
    assert_eq!(router.dispatch(&get("/echo/x")).status, StatusCode::NotFound);
}
