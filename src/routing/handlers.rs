//! Built-in route handlers.

use bytes::Bytes;
use tracing::{error, warn};

use crate::http::response::{Response, StatusCode};
use crate::routing::router::RouteContext;
use crate::store::StoreError;

/// `/` health check.
pub fn root(_ctx: &RouteContext<'_>) -> Response {
    Response::empty(StatusCode::Ok)
}

/// `/echo/<text>` answers with `<text>`.
pub fn echo(ctx: &RouteContext<'_>) -> Response {
    let text = ctx.segments.get(1).copied().unwrap_or("");
    Response::text(Bytes::copy_from_slice(text.as_bytes()))
}

/// `/user-agent` answers with the request's `User-Agent` header.
pub fn user_agent(ctx: &RouteContext<'_>) -> Response {
    match ctx.request.header("User-Agent") {
        Some(agent) => Response::text(Bytes::copy_from_slice(agent.as_bytes())),
        None => Response::bad_request(),
    }
}

/// `GET /files/<name>`
pub fn read_file(ctx: &RouteContext<'_>) -> Response {
    let Some(name) = ctx.segments.get(1) else {
        return Response::bad_request();
    };

    match ctx.store.read(name) {
        Ok(contents) => Response::octet_stream(contents),
        Err(StoreError::NotFound(_)) => Response::not_found(),
        Err(StoreError::InvalidName(name)) => {
            warn!(name = %name, "Refusing resource name");
            Response::bad_request()
        }
        Err(e) => {
            error!(name = %name, error = %e, "Failed to read resource");
            Response::internal_error()
        }
    }
}

/// `POST /files/<name>` stores at most `Content-Length` bytes of the body.
pub fn write_file(ctx: &RouteContext<'_>) -> Response {
    let Some(name) = ctx.segments.get(1) else {
        return Response::bad_request();
    };
    let Some(declared) = ctx.request.declared_content_length() else {
        return Response::bad_request();
    };

    let body = &ctx.request.body;
    let contents = &body[..declared.min(body.len())];

    match ctx.store.write(name, contents) {
        Ok(()) => Response::created(),
        Err(StoreError::InvalidName(name)) => {
            warn!(name = %name, "Refusing resource name");
            Response::bad_request()
        }
        Err(e) => {
            error!(name = %name, error = %e, "Failed to write resource");
            Response::internal_error()
        }
    }
}
