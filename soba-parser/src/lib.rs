//! Soba ANSI Scanner
//!
//! This crate splits a stream of decoded text into terminal tokens:
//! printable characters, line-editing control characters, CSI sequences,
//! and other ESC-introduced sequences.
//!
//! The scanner is:
//! - Stateful: a trailing incomplete sequence is carried across chunks
//! - Streaming: accepts arbitrary chunk sizes
//! - Deterministic: the same input always produces the same tokens
//!
//! It deliberately recognizes only the subset of ANSI that matters for
//! reconstructing single lines of output. OSC/DCS-family sequences are
//! consumed opaquely, and unsupported escapes are skipped rather than
//! rejected, so malformed input can never fail the stream.

pub mod csi;
pub mod token;
pub mod tokenizer;

pub use csi::{Affects, CsiAction};
pub use token::{CsiToken, Token};
pub use tokenizer::{scan_token, Scan, Tokenizer};
