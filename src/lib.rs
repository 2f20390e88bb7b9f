//! minihttpd - single-threaded HTTP/1.1 server
//!
//! One request per connection, answered by a small fixed route table:
//! `/`, `/echo/<text>`, `/user-agent` and `/files/<name>`.

pub mod config;
pub mod http;
pub mod routing;
pub mod server;
pub mod store;
