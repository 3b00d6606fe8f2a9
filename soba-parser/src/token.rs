//! Tokens produced by the scanner.
//!
//! These represent the semantic meaning of scanned input as far as a
//! single-line terminal cares: glyphs, line-editing controls, CSI
//! sequences, and opaque escapes.

use serde::{Deserialize, Serialize};

/// Control characters the scanner treats specially.
pub mod ctrl {
    pub const BEL: char = '\x07';
    pub const BS: char = '\x08';
    pub const HT: char = '\t';
    pub const LF: char = '\n';
    pub const CR: char = '\r';
    pub const ESC: char = '\x1b';
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Token {
    /// A visible character: U+0020 and above, high-bit passthrough included.
    Printable(char),

    /// One of LF, CR, HT, BS.
    Control(char),

    /// A complete CSI sequence.
    Csi(CsiToken),

    /// Any other ESC-introduced sequence, held opaquely. The payload is the
    /// text after the ESC: a single character for two-byte escapes, the raw
    /// body for OSC-family sequences, or `""` for a skipped bare ESC.
    Esc(String),

    /// A C0 control with no line semantics; consumed and dropped.
    Ignored(char),
}

/// An unclassified CSI sequence: the raw parameter text between `ESC [`
/// and the final command character.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CsiToken {
    pub params: String,
    pub cmd: char,
}

impl Token {
    pub fn is_printable(&self) -> bool {
        matches!(self, Token::Printable(_))
    }

    pub fn is_csi(&self) -> bool {
        matches!(self, Token::Csi(_))
    }
}
