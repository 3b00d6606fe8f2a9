//! Soba Line Terminal Core
//!
//! This crate provides the single-line terminal model:
//! - Color and SGR attribute records with parse / compose / minimal emission
//! - Cell representation preserving the attributes each glyph was written with
//! - A streaming terminal that applies scanned tokens to one line of cells
//!   and renders it back as a minimal ANSI string
//!
//! There is no screen here. Vertical cursor motion, scroll regions, and
//! full-screen erase are ignored: the model reconstructs finalized lines
//! from streamed output (progress bars, overwrites, partial chunks), it
//! does not emulate a display.

pub mod cell;
pub mod color;
pub mod sgr;
pub mod terminal;

pub use cell::Cell;
pub use color::Color;
pub use sgr::SgrAttributes;
pub use terminal::{LineTerminal, WriteOutcome, MAX_COLUMNS};
