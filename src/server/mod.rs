//! Listening socket and connection set.

pub mod multiplexer;

pub use multiplexer::Multiplexer;
