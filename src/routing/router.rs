use std::sync::Arc;

use tracing::debug;

use crate::http::parser::ParseError;
use crate::http::request::{Method, Request};
use crate::http::response::Response;
use crate::routing::handlers;
use crate::store::ResourceStore;

/// Everything a handler gets to look at.
pub struct RouteContext<'a> {
    pub request: &'a Request,
    /// Non-empty target segments; the first one selected the route.
    pub segments: &'a [&'a str],
    pub store: &'a dyn ResourceStore,
}

pub type Handler = fn(&RouteContext<'_>) -> Response;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MethodFilter {
    Any,
    Only(Method),
}

impl MethodFilter {
    pub fn matches(&self, method: &Method) -> bool {
        match self {
            MethodFilter::Any => true,
            MethodFilter::Only(m) => m == method,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathPattern {
    /// Exactly `/`.
    Root,
    /// First target segment, e.g. `echo` for `/echo/abc`.
    Segment(&'static str),
}

pub struct RouteEntry {
    pub method: MethodFilter,
    pub pattern: PathPattern,
    pub handler: Handler,
}

/// Immutable route table plus the store the `/files` handlers use.
pub struct Router {
    routes: Vec<RouteEntry>,
    store: Arc<dyn ResourceStore>,
}

impl Router {
    /// A router with no routes. Every request gets 404.
    pub fn new(store: Arc<dyn ResourceStore>) -> Self {
        Self {
            routes: Vec::new(),
            store,
        }
    }

    /// The built-in routes: `/`, `/echo`, `/user-agent` and `/files`.
    pub fn with_default_routes(store: Arc<dyn ResourceStore>) -> Self {
        Self::new(store)
            .route(MethodFilter::Any, PathPattern::Root, handlers::root)
            .route(MethodFilter::Any, PathPattern::Segment("echo"), handlers::echo)
            .route(
                MethodFilter::Any,
                PathPattern::Segment("user-agent"),
                handlers::user_agent,
            )
            .route(
                MethodFilter::Only(Method::GET),
                PathPattern::Segment("files"),
                handlers::read_file,
            )
            .route(
                MethodFilter::Only(Method::POST),
                PathPattern::Segment("files"),
                handlers::write_file,
            )
    }

    pub fn route(mut self, method: MethodFilter, pattern: PathPattern, handler: Handler) -> Self {
        self.routes.push(RouteEntry { method, pattern, handler });
        self
    }

    pub fn routes(&self) -> &[RouteEntry] {
        &self.routes
    }

    /// Turns a parse outcome into a response. Parse failures never reach a
    /// handler.
    pub fn handle(&self, parsed: Result<Request, ParseError>) -> Response {
        match parsed {
            Ok(request) => self.dispatch(&request),
            Err(e) => {
                debug!(error = %e, "Rejecting malformed request");
                Response::bad_request()
            }
        }
    }

    /// Picks the first matching route and runs it.
    ///
    /// `/` is checked first. Otherwise the first target segment selects the
    /// route; a known segment with no entry for the method gets 400, an
    /// unknown one 404.
    pub fn dispatch(&self, request: &Request) -> Response {
        let segments: Vec<&str> = request.segments().collect();
        let ctx = RouteContext {
            request,
            segments: &segments,
            store: self.store.as_ref(),
        };

        if request.target == "/" {
            return match self.find(PathPattern::Root, &request.method) {
                Some(entry) => (entry.handler)(&ctx),
                None => Response::not_found(),
            };
        }

        let Some(first) = segments.first() else {
            return Response::not_found();
        };

        let mut segment_known = false;
        for entry in &self.routes {
            if !matches!(entry.pattern, PathPattern::Segment(s) if s == *first) {
                continue;
            }
            segment_known = true;
            if entry.method.matches(&request.method) {
                return (entry.handler)(&ctx);
            }
        }

        if segment_known {
            debug!(
                method = %request.method,
                target = %request.target,
                "Method not accepted by route"
            );
            Response::bad_request()
        } else {
            Response::not_found()
        }
    }

    fn find(&self, pattern: PathPattern, method: &Method) -> Option<&RouteEntry> {
        self.routes
            .iter()
            .find(|e| e.pattern == pattern && e.method.matches(method))
    }
}
