//! HTTP/1.1 request handling.
//!
//! One request per connection: bytes are accumulated, parsed once, routed,
//! answered, and the socket is closed.
//!
//! - **`framing`**: CRLF line slicing over the read buffer
//! - **`parser`**: request line, headers and body
//! - **`request`**: parsed request and method enumeration
//! - **`response`**: response type with builder
//! - **`writer`**: response serialization and socket writes
//! - **`connection`**: per-connection state machine
//!
//! # Connection State Machine
//!
//! ```text
//!        ┌─────────────┐
//!        │ Registered  │ ← Accumulate request bytes
//!        └──────┬──────┘
//!               │ Frame complete / EOF / cap / timeout
//!               ▼
//!        ┌──────────────────┐
//!        │    Readable      │ ← Parse and dispatch
//!        └──────┬───────────┘
//!               │ Response ready
//!               ▼
//!        ┌──────────────────┐
//!        │    Handled       │ ← Send response to client
//!        └──────┬───────────┘
//!               │
//!               ▼
//!            Closed
//! ```

pub mod connection;
pub mod framing;
pub mod parser;
pub mod request;
pub mod response;
pub mod writer;
