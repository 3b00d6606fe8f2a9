//! Error types for the stream adapter.
//!
//! Malformed ANSI input is never an error anywhere in this workspace; it
//! is dropped by the scanner. Errors here are about the host boundary:
//! backlog pressure, downstream I/O, and use after teardown.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StreamError {
    #[error("pending line backlog full; dropped {dropped} oldest line(s)")]
    BacklogOverflow { dropped: usize },

    #[error("downstream write failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("stream already finished")]
    Disposed,

    #[error("invalid options: {0}")]
    InvalidOptions(String),
}
