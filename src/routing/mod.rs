//! Route table and dispatch.
//!
//! The table is built once at startup and only read afterwards, so it is
//! shared between connections behind an `Arc` without any locking.

pub mod handlers;
pub mod router;

pub use router::{Handler, MethodFilter, PathPattern, RouteContext, RouteEntry, Router};
