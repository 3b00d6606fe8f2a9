//! Chunk-driven stream adapter.
//!
//! `LineStream` owns a line terminal and an emission strategy, feeds input
//! chunks through them, and multiplexes finalized lines onto the active
//! output surfaces:
//!
//! - a push callback (when set, nothing is buffered),
//! - an optional downstream writer (each line followed by `\n`),
//! - a bounded pending queue for polling hosts.
//!
//! Everything runs on the caller's thread. Deadline-based flushes happen
//! when the host calls [`LineStream::poll`]; the host must not feed the
//! stream from inside a line callback.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::io::Write;
use std::rc::Rc;
use std::time::Instant;

use log::debug;

use soba_core::{LineTerminal, WriteOutcome};

use crate::error::StreamError;
use crate::options::StreamOptions;
use crate::strategy::EmitStrategy;

type LineCallback = Box<dyn FnMut(&str)>;

struct SinkState {
    callback: Option<LineCallback>,
    downstream: Option<Box<dyn Write>>,
    pending: VecDeque<String>,
    max_pending: usize,
    dropped: usize,
    io_error: Option<std::io::Error>,
}

impl SinkState {
    fn deliver(&mut self, line: &str) {
        if let Some(callback) = self.callback.as_mut() {
            callback(line);
            return;
        }
        if let Some(writer) = self.downstream.as_mut() {
            if let Err(err) = writeln!(writer, "{}", line) {
                if self.io_error.is_none() {
                    self.io_error = Some(err);
                }
            }
        }
        if self.pending.len() == self.max_pending {
            self.pending.pop_front();
            self.dropped += 1;
        }
        self.pending.push_back(line.to_string());
    }
}

pub struct LineStream {
    terminal: LineTerminal,
    strategy: Box<dyn EmitStrategy>,
    sink: Rc<RefCell<SinkState>>,
    finished: bool,
}

impl Default for LineStream {
    fn default() -> Self {
        Self::new()
    }
}

impl LineStream {
    pub fn new() -> Self {
        Self::build(StreamOptions::default())
    }

    pub fn with_options(options: StreamOptions) -> Result<Self, StreamError> {
        options.validate()?;
        Ok(Self::build(options))
    }

    fn build(options: StreamOptions) -> Self {
        let sink = Rc::new(RefCell::new(SinkState {
            callback: None,
            downstream: None,
            pending: VecDeque::new(),
            max_pending: options.max_pending,
            dropped: 0,
            io_error: None,
        }));

        let mut terminal = LineTerminal::new();
        let line_sink = Rc::clone(&sink);
        terminal.set_line_ready_callback(Box::new(move |term| {
            let line = term.render_line();
            term.reset();
            line_sink.borrow_mut().deliver(&line);
        }));

        LineStream {
            terminal,
            strategy: options.strategy.build(),
            sink,
            finished: false,
        }
    }

    /// Feed one chunk of bytes. Non-UTF-8 bytes pass through the lossy
    /// decoder; completed lines are delivered before this returns.
    ///
    /// An error reports a delivery problem (backlog overflow, downstream
    /// I/O); the chunk itself has still been fully processed and the
    /// stream remains usable.
    pub fn feed(&mut self, chunk: &[u8]) -> Result<WriteOutcome, StreamError> {
        self.feed_str(&String::from_utf8_lossy(chunk))
    }

    /// [`feed`](Self::feed) for already-decoded text.
    pub fn feed_str(&mut self, chunk: &str) -> Result<WriteOutcome, StreamError> {
        if self.finished {
            return Err(StreamError::Disposed);
        }
        let outcome = self.terminal.write(chunk);
        if self.strategy.on_write(&self.terminal, &outcome) && self.terminal.has_content() {
            self.flush_line();
        }
        self.take_delivery_error()?;
        Ok(outcome)
    }

    /// Drive the strategy's deadline. Returns `true` when a deadline fired
    /// (whether or not there was a line to flush).
    pub fn poll(&mut self, now: Instant) -> Result<bool, StreamError> {
        if self.finished {
            return Err(StreamError::Disposed);
        }
        let fired = self.strategy.poll(now);
        if fired && self.terminal.has_content() {
            self.flush_line();
        }
        self.take_delivery_error()?;
        Ok(fired)
    }

    /// When the host should next call [`poll`](Self::poll).
    pub fn next_deadline(&self) -> Option<Instant> {
        self.strategy.next_deadline()
    }

    /// End of input: flush any unterminated tail and tear down. The
    /// stream rejects further use afterwards, error or not.
    pub fn finish(&mut self) -> Result<(), StreamError> {
        if self.finished {
            return Err(StreamError::Disposed);
        }
        self.finished = true;
        if self.strategy.flush() && self.terminal.has_content() {
            self.flush_line();
        }
        self.strategy.dispose();
        self.terminal.dispose();
        self.take_delivery_error()
    }

    /// Install the push surface. While set, lines bypass the queue and
    /// the downstream writer entirely.
    pub fn set_line_callback(&mut self, callback: impl FnMut(&str) + 'static) {
        self.sink.borrow_mut().callback = Some(Box::new(callback));
    }

    pub fn clear_line_callback(&mut self) {
        self.sink.borrow_mut().callback = None;
    }

    /// Attach a downstream writer; each flushed line is written with a
    /// trailing newline when no push callback is set.
    pub fn set_downstream(&mut self, writer: impl Write + 'static) {
        self.sink.borrow_mut().downstream = Some(Box::new(writer));
    }

    /// Snapshot of the queued lines.
    pub fn get_pending_lines(&self) -> Vec<String> {
        self.sink.borrow().pending.iter().cloned().collect()
    }

    /// Take and clear the queued lines.
    pub fn consume_pending_lines(&mut self) -> Vec<String> {
        self.sink.borrow_mut().pending.drain(..).collect()
    }

    /// Discard the queued lines.
    pub fn clear_pending_lines(&mut self) {
        self.sink.borrow_mut().pending.clear();
    }

    pub fn terminal(&self) -> &LineTerminal {
        &self.terminal
    }

    fn flush_line(&mut self) {
        let line = self.terminal.render_line();
        self.terminal.reset();
        self.sink.borrow_mut().deliver(&line);
    }

    fn take_delivery_error(&mut self) -> Result<(), StreamError> {
        let mut sink = self.sink.borrow_mut();
        if let Some(err) = sink.io_error.take() {
            return Err(StreamError::Io(err));
        }
        if sink.dropped > 0 {
            let dropped = std::mem::take(&mut sink.dropped);
            debug!("pending backlog overflow, dropped {} line(s)", dropped);
            return Err(StreamError::BacklogOverflow { dropped });
        }
        Ok(())
    }
}
