//! Soba Stream Adapter
//!
//! Drives a [`soba_core::LineTerminal`] over chunked input and decides when
//! a logically complete line should be flushed downstream.
//!
//! Emission timing is pluggable: flush only on newline ([`Immediate`]), a
//! flat inactivity window ([`FixedTimeout`]), or an adaptive window that
//! tells progress-bar-like volatile lines from stable text
//! ([`StatefulTimeout`]). Timing is deadline-based and host-polled; nothing
//! here spawns threads or sleeps.
//!
//! # Example
//!
//! ```
//! use soba_stream::LineStream;
//!
//! let mut stream = LineStream::new();
//! stream.feed(b"Progress: 10%\r").unwrap();
//! stream.feed(b"Progress: 100%\n").unwrap();
//! stream.finish().unwrap();
//!
//! assert_eq!(stream.consume_pending_lines(), vec!["Progress: 100%"]);
//! ```

pub mod error;
pub mod options;
pub mod strategy;
pub mod stream;

pub use error::StreamError;
pub use options::{StreamOptions, MAX_PENDING};
pub use strategy::{
    EmitStrategy, EmitStrategyKind, FixedTimeout, Immediate, StatefulTimeout,
};
pub use stream::LineStream;
