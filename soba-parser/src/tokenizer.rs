//! Streaming ANSI scanner.
//!
//! The scanner is designed to:
//! - Handle arbitrary chunk boundaries (streaming)
//! - Be deterministic
//! - Never fail on malformed input
//!
//! A sequence split across chunks is carried as a trailing fragment and
//! prepended to the next chunk. Only two shapes suspend: a lone trailing
//! ESC, and a CSI still reading its parameters. An OSC-family body without
//! a terminator is treated as complete at chunk end; downstream ignores it
//! either way.

use crate::token::{ctrl, CsiToken, Token};

/// Result of scanning one position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scan {
    /// A token and the number of characters consumed.
    Token(Token, usize),
    /// The buffer ends inside a sequence; the remainder must be carried.
    Incomplete,
}

const OSC_INTRODUCERS: [char; 4] = [']', 'P', '^', '_'];
const SINGLE_ESCAPES: [char; 6] = ['7', '8', '=', '>', 'H', 'M'];

fn is_csi_param(ch: char) -> bool {
    ch.is_ascii_digit() || ch == ';'
}

fn is_csi_final(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '@' || ch == '`'
}

/// Scan one token starting at `pos`.
///
/// # Panics
///
/// Panics if `pos` is out of bounds.
pub fn scan_token(chars: &[char], pos: usize) -> Scan {
    let ch = chars[pos];
    match ch {
        ctrl::LF | ctrl::CR | ctrl::HT | ctrl::BS => Scan::Token(Token::Control(ch), 1),
        ctrl::ESC => scan_escape(&chars[pos + 1..]),
        _ if ch >= ' ' => Scan::Token(Token::Printable(ch), 1),
        _ => Scan::Token(Token::Ignored(ch), 1),
    }
}

/// Scan the remainder of an ESC-introduced sequence. `rest` starts at the
/// character after the ESC. CSI is tested before the generic escapes.
fn scan_escape(rest: &[char]) -> Scan {
    let Some(&next) = rest.first() else {
        return Scan::Incomplete;
    };
    if next == '[' {
        return scan_csi(rest);
    }
    if OSC_INTRODUCERS.contains(&next) {
        return scan_osc(rest);
    }
    if SINGLE_ESCAPES.contains(&next) {
        return Scan::Token(Token::Esc(next.to_string()), 2);
    }
    // Unsupported escape: skip the ESC alone and rescan from the next char.
    Scan::Token(Token::Esc(String::new()), 1)
}

/// CSI: `[`, zero or more of `[0-9;]`, one final char in `[A-Za-z@`]`.
/// No intermediate bytes are supported.
fn scan_csi(rest: &[char]) -> Scan {
    let mut i = 1;
    while let Some(&c) = rest.get(i) {
        if is_csi_param(c) {
            i += 1;
        } else if is_csi_final(c) {
            let params = rest[1..i].iter().collect();
            return Scan::Token(Token::Csi(CsiToken { params, cmd: c }), i + 2);
        } else {
            // Not a CSI after all (private markers, intermediates). Skip
            // the ESC alone; the rest rescans as ordinary characters.
            return Scan::Token(Token::Esc(String::new()), 1);
        }
    }
    Scan::Incomplete
}

/// OSC-family body: introducer, then anything except BEL/ESC/LF/CR,
/// optionally closed by BEL or `ESC \` (the terminator is consumed).
fn scan_osc(rest: &[char]) -> Scan {
    let mut i = 1;
    while let Some(&c) = rest.get(i) {
        match c {
            ctrl::BEL => {
                let data = rest[..=i].iter().collect();
                return Scan::Token(Token::Esc(data), i + 2);
            }
            ctrl::ESC => {
                if rest.get(i + 1) == Some(&'\\') {
                    let data = rest[..i + 2].iter().collect();
                    return Scan::Token(Token::Esc(data), i + 3);
                }
                // An ESC that does not open ST ends the body; it is left in
                // place to start its own sequence.
                let data = rest[..i].iter().collect();
                return Scan::Token(Token::Esc(data), i + 1);
            }
            ctrl::LF | ctrl::CR => {
                let data = rest[..i].iter().collect();
                return Scan::Token(Token::Esc(data), i + 1);
            }
            _ => i += 1,
        }
    }
    let data = rest.iter().collect();
    Scan::Token(Token::Esc(data), rest.len() + 1)
}

/// Stateful scanner that owns the split-chunk carry.
#[derive(Debug, Default)]
pub struct Tokenizer {
    pending: String,
}

impl Tokenizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tokenize a chunk, prepending any fragment held from the previous
    /// call. A new trailing incomplete sequence is held for the next call.
    pub fn feed(&mut self, chunk: &str) -> Vec<Token> {
        let mut input = std::mem::take(&mut self.pending);
        input.push_str(chunk);

        let chars: Vec<char> = input.chars().collect();
        let mut tokens = Vec::new();
        let mut pos = 0;
        while pos < chars.len() {
            match scan_token(&chars, pos) {
                Scan::Token(token, len) => {
                    tokens.push(token);
                    pos += len;
                }
                Scan::Incomplete => {
                    self.pending = chars[pos..].iter().collect();
                    break;
                }
            }
        }
        tokens
    }

    /// The fragment carried into the next `feed`, if any.
    pub fn pending(&self) -> &str {
        &self.pending
    }

    pub fn reset(&mut self) {
        self.pending.clear();
    }
}
