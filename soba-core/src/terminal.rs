//! Single-line streaming terminal.
//!
//! Applies scanned tokens to one horizontal line of styled cells under
//! cursor movement, erasure, insertion, deletion, save/restore, and SGR
//! state, and renders the line back as a minimal ANSI string. Vertical
//! motion and full-screen commands are ignored rather than errors.
//!
//! The terminal never panics on well-formed input; anything it does not
//! recognize is dropped silently.

use log::debug;

use soba_parser::{CsiAction, Token, Tokenizer};

use crate::cell::Cell;
use crate::sgr::SgrAttributes;

/// Columns beyond this are dropped silently to bound allocation on
/// hostile input (e.g. `ESC [ 2000000000 G`).
pub const MAX_COLUMNS: usize = 1_000_000;

const RESET: &str = "\x1b[0m";
const TAB_STOP: usize = 8;

/// Invoked from within `write` at each newline, before the rest of the
/// chunk is processed. The callback may render and reset the terminal; it
/// must not call `write` on it.
pub type LineReadyCallback = Box<dyn FnMut(&mut LineTerminal)>;

/// What one `write` call did to the line. Flags are cleared at the start
/// of every `write` and OR-ed across all tokens of that call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteOutcome {
    pub had_newline: bool,
    pub had_carriage_return: bool,
    pub had_cursor_movement: bool,
    pub had_erasure: bool,
    /// Cursor column after the write.
    pub cursor_position: usize,
    /// Number of cells after the write.
    pub cell_count: usize,
}

#[derive(Debug, Clone, Copy, Default)]
struct Flags {
    newline: bool,
    carriage_return: bool,
    cursor_movement: bool,
    erasure: bool,
}

pub struct LineTerminal {
    cells: Vec<Cell>,
    cursor: usize,
    active_sgr: SgrAttributes,
    saved_cursor: usize,
    tokenizer: Tokenizer,
    on_line_ready: Option<LineReadyCallback>,
    flags: Flags,
}

impl Default for LineTerminal {
    fn default() -> Self {
        Self::new()
    }
}

impl LineTerminal {
    pub fn new() -> Self {
        LineTerminal {
            cells: Vec::new(),
            cursor: 0,
            active_sgr: SgrAttributes::default(),
            saved_cursor: 0,
            tokenizer: Tokenizer::new(),
            on_line_ready: None,
            flags: Flags::default(),
        }
    }

    /// Process one chunk of decoded text. Incomplete trailing sequences
    /// are carried into the next call.
    pub fn write(&mut self, chunk: &str) -> WriteOutcome {
        self.flags = Flags::default();
        // Scan first, then dispatch: the line-ready callback needs the
        // terminal mutable mid-chunk.
        let tokens = self.tokenizer.feed(chunk);
        for token in tokens {
            self.apply(token);
        }
        WriteOutcome {
            had_newline: self.flags.newline,
            had_carriage_return: self.flags.carriage_return,
            had_cursor_movement: self.flags.cursor_movement,
            had_erasure: self.flags.erasure,
            cursor_position: self.cursor,
            cell_count: self.cells.len(),
        }
    }

    /// Clear cells and cursor for the next line. The active SGR, the saved
    /// cursor, and any carried partial sequence survive: they belong to
    /// the stream, not to the line.
    pub fn reset(&mut self) {
        self.cells.clear();
        self.cursor = 0;
    }

    /// Tear down everything, including stream-level state.
    pub fn dispose(&mut self) {
        self.cells.clear();
        self.cursor = 0;
        self.active_sgr = SgrAttributes::default();
        self.saved_cursor = 0;
        self.tokenizer.reset();
        self.on_line_ready = None;
    }

    pub fn has_content(&self) -> bool {
        !self.cells.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn active_sgr(&self) -> &SgrAttributes {
        &self.active_sgr
    }

    pub fn saved_cursor(&self) -> usize {
        self.saved_cursor
    }

    pub fn set_line_ready_callback(&mut self, callback: LineReadyCallback) {
        self.on_line_ready = Some(callback);
    }

    fn apply(&mut self, token: Token) {
        match token {
            Token::Printable(ch) => self.put_glyph(ch),
            Token::Control('\r') => {
                self.cursor = 0;
                self.flags.carriage_return = true;
            }
            Token::Control('\n') => {
                self.flags.newline = true;
                self.notify_line_ready();
            }
            Token::Control('\x08') => {
                self.cursor = self.cursor.saturating_sub(1);
                self.flags.cursor_movement = true;
            }
            Token::Control('\t') => self.tab(),
            Token::Control(other) => debug!("unhandled control {:?}", other),
            Token::Csi(csi) => self.apply_csi(&csi.classify()),
            Token::Esc(data) => self.apply_escape(&data),
            Token::Ignored(_) => {}
        }
    }

    fn apply_csi(&mut self, action: &CsiAction) {
        match action.cmd {
            'm' => {
                let overlay = SgrAttributes::parse(&action.params);
                // An empty overlay is a reset (SGR 0 discards the whole
                // list); anything else layers onto the current state.
                self.active_sgr = if overlay.is_empty() {
                    overlay
                } else {
                    self.active_sgr.compose(&overlay)
                };
            }
            'G' | '`' => {
                let col = action.param_nonzero_or(0, 1).max(1) as usize - 1;
                self.move_cursor_to(col);
            }
            'C' => {
                let n = action.param_nonzero_or(0, 1) as usize;
                self.move_cursor_to(self.cursor.saturating_add(n));
            }
            'D' => {
                let n = action.param_nonzero_or(0, 1) as usize;
                self.move_cursor_to(self.cursor.saturating_sub(n));
            }
            'K' => self.erase_in_line(action.param_or(0, 0)),
            'X' => self.erase_chars(action.param_nonzero_or(0, 1) as usize),
            'P' => self.delete_chars(action.param_nonzero_or(0, 1) as usize),
            '@' => self.insert_chars(action.param_nonzero_or(0, 1) as usize),
            's' => {
                self.saved_cursor = self.cursor;
                self.flags.cursor_movement = true;
            }
            'u' => self.move_cursor_to(self.saved_cursor),
            'A' | 'B' | 'H' | 'f' | 'J' | 'S' | 'T' | 'L' | 'M' => {
                // Vertical or full-screen; no single-line meaning.
            }
            other => {
                debug!("ignoring CSI {:?} {}", action.params, other);
            }
        }
    }

    fn apply_escape(&mut self, data: &str) {
        match data {
            "7" => {
                self.saved_cursor = self.cursor;
                self.flags.cursor_movement = true;
            }
            "8" => self.move_cursor_to(self.saved_cursor),
            _ => {}
        }
    }

    fn put_glyph(&mut self, ch: char) {
        if self.cursor >= MAX_COLUMNS {
            return;
        }
        if self.cursor >= self.cells.len() {
            self.cells.resize(self.cursor + 1, Cell::Empty);
        }
        self.cells[self.cursor] = Cell::glyph(ch, self.active_sgr.clone());
        self.cursor += 1;
    }

    fn tab(&mut self) {
        let next = (self.cursor / TAB_STOP + 1) * TAB_STOP;
        let next = next.min(MAX_COLUMNS);
        while self.cursor < next {
            self.put_glyph(' ');
        }
    }

    /// Move the cursor, materializing `Empty` cells so the cursor never
    /// points past the end of the line.
    fn move_cursor_to(&mut self, col: usize) {
        self.cursor = col.min(MAX_COLUMNS);
        if self.cursor > self.cells.len() {
            self.cells.resize(self.cursor, Cell::Empty);
        }
        self.flags.cursor_movement = true;
    }

    fn erase_in_line(&mut self, mode: i32) {
        match mode {
            0 => self.cells.truncate(self.cursor),
            1 => {
                // Erases through the cursor cell inclusive; the cursor
                // itself stays put.
                for cell in self.cells.iter_mut().take(self.cursor + 1) {
                    *cell = Cell::Empty;
                }
            }
            2 => {
                self.cells.clear();
                self.cursor = 0;
            }
            _ => {}
        }
        self.flags.erasure = true;
    }

    fn erase_chars(&mut self, n: usize) {
        let end = self.cursor.saturating_add(n).min(MAX_COLUMNS);
        if end > self.cells.len() {
            self.cells.resize(end, Cell::Empty);
        }
        for cell in &mut self.cells[self.cursor..end] {
            *cell = Cell::Empty;
        }
        self.flags.erasure = true;
    }

    fn delete_chars(&mut self, n: usize) {
        if self.cursor < self.cells.len() {
            let end = self.cursor.saturating_add(n).min(self.cells.len());
            self.cells.drain(self.cursor..end);
        }
        self.flags.erasure = true;
    }

    fn insert_chars(&mut self, n: usize) {
        let room = MAX_COLUMNS.saturating_sub(self.cells.len());
        for _ in 0..n.min(room) {
            self.cells.insert(self.cursor, Cell::Empty);
        }
        self.flags.erasure = true;
    }

    fn notify_line_ready(&mut self) {
        if let Some(mut callback) = self.on_line_ready.take() {
            callback(self);
            if self.on_line_ready.is_none() {
                self.on_line_ready = Some(callback);
            }
        }
    }

    /// Render the current line as a minimal ANSI string: only the SGR
    /// transitions needed, erased cells as plain spaces, trailing filler
    /// trimmed.
    pub fn render_line(&self) -> String {
        let last = match self.cells.iter().rposition(|cell| !cell.is_empty()) {
            Some(last) => last,
            None => return String::new(),
        };

        let mut out = String::new();
        let mut last_sgr = SgrAttributes::default();
        for cell in &self.cells[..=last] {
            match cell {
                Cell::Glyph { ch, sgr } => {
                    if *sgr != last_sgr {
                        if sgr.is_empty() {
                            out.push_str(RESET);
                        } else if !last_sgr.is_empty() {
                            out.push_str(RESET);
                            out.push_str(&sgr.to_sequence());
                        } else {
                            out.push_str(&sgr.to_sequence());
                        }
                        last_sgr = sgr.clone();
                    }
                    out.push(*ch);
                }
                Cell::Empty => {
                    if !last_sgr.is_empty() {
                        out.push_str(RESET);
                        last_sgr = SgrAttributes::default();
                    }
                    out.push(' ');
                }
            }
        }
        if !last_sgr.is_empty() {
            out.push_str(RESET);
        }
        trim_trailing(&out)
    }
}

/// Spaces only appear in a rendered line because of erasure or past-end
/// cursor motion; the visible result should not carry trailing filler.
/// Inner spaces are never touched.
fn trim_trailing(line: &str) -> String {
    if let Some(body) = line.strip_suffix(RESET) {
        format!("{}{}", body.trim_end_matches(' '), RESET)
    } else {
        line.trim_end_matches(' ').to_string()
    }
}
