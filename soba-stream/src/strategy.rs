//! Emission strategies: when should the current line be flushed?
//!
//! A strategy sees the outcome of every terminal write and answers two
//! questions: flush right now (synchronously, after the write), and flush
//! later (a deadline the host drives by calling `poll`).
//!
//! Deadlines are monotonic `Instant`s rather than host timers. The host
//! polls at or after `next_deadline()`; a `true` return from `poll` is the
//! emit signal. Arming always replaces the previous deadline, and a fired
//! or cancelled deadline is gone, so each logical line is emitted at most
//! once — either on its newline or on its deadline, never both.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use soba_core::{LineTerminal, WriteOutcome};

pub const DEFAULT_TIMEOUT_MS: u64 = 100;
pub const DEFAULT_VOLATILE_TIMEOUT_MS: u64 = 50;
pub const DEFAULT_STABLE_TIMEOUT_MS: u64 = 200;

pub trait EmitStrategy {
    /// Called after every terminal write. `true` means the caller should
    /// flush immediately. Always cancels a previously armed deadline.
    fn on_write(&mut self, terminal: &LineTerminal, outcome: &WriteOutcome) -> bool;

    /// Drive the pending deadline. Fires at most once per armed deadline:
    /// returns `true` when `now` has reached it, and clears it.
    fn poll(&mut self, now: Instant) -> bool;

    /// The instant at which `poll` will fire, if a deadline is armed.
    fn next_deadline(&self) -> Option<Instant>;

    /// Stream end. Cancels any deadline; `true` requests one final flush.
    fn flush(&mut self) -> bool;

    /// Cancel timing state and drop the strategy's resources.
    fn dispose(&mut self);
}

/// A line whose visible state may still change: it was built with
/// carriage-return overwrite, intra-line cursor motion, or erasure.
fn is_volatile(outcome: &WriteOutcome) -> bool {
    outcome.had_carriage_return || outcome.had_cursor_movement || outcome.had_erasure
}

/// Emit strictly on newlines (the terminal's line-ready path) plus one
/// final flush at stream end. Never arms a deadline.
#[derive(Debug, Clone, Copy, Default)]
pub struct Immediate;

impl EmitStrategy for Immediate {
    fn on_write(&mut self, _terminal: &LineTerminal, _outcome: &WriteOutcome) -> bool {
        false
    }

    fn poll(&mut self, _now: Instant) -> bool {
        false
    }

    fn next_deadline(&self) -> Option<Instant> {
        None
    }

    fn flush(&mut self) -> bool {
        true
    }

    fn dispose(&mut self) {}
}

/// Flush a newline-less line after a flat inactivity window.
#[derive(Debug, Clone)]
pub struct FixedTimeout {
    timeout: Duration,
    deadline: Option<Instant>,
}

impl FixedTimeout {
    pub fn new(timeout: Duration) -> Self {
        FixedTimeout {
            timeout,
            deadline: None,
        }
    }

    /// Deterministic seam for tests: `on_write` with an explicit clock.
    pub fn on_write_at(
        &mut self,
        terminal: &LineTerminal,
        outcome: &WriteOutcome,
        now: Instant,
    ) -> bool {
        self.deadline = None;
        if outcome.had_newline {
            return true;
        }
        if terminal.has_content() {
            self.deadline = Some(now + self.timeout);
        }
        false
    }
}

impl Default for FixedTimeout {
    fn default() -> Self {
        FixedTimeout::new(Duration::from_millis(DEFAULT_TIMEOUT_MS))
    }
}

impl EmitStrategy for FixedTimeout {
    fn on_write(&mut self, terminal: &LineTerminal, outcome: &WriteOutcome) -> bool {
        self.on_write_at(terminal, outcome, Instant::now())
    }

    fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    fn next_deadline(&self) -> Option<Instant> {
        self.deadline
    }

    fn flush(&mut self) -> bool {
        self.deadline = None;
        true
    }

    fn dispose(&mut self) {
        self.deadline = None;
    }
}

/// Adaptive inactivity window. Volatile lines (progress bars rewriting
/// themselves) get a short window so transient states are not emitted;
/// stable text gets a longer window that collects late arrivals from the
/// producer.
#[derive(Debug, Clone)]
pub struct StatefulTimeout {
    volatile_timeout: Duration,
    stable_timeout: Duration,
    deadline: Option<Instant>,
}

impl StatefulTimeout {
    pub fn new(volatile_timeout: Duration, stable_timeout: Duration) -> Self {
        StatefulTimeout {
            volatile_timeout,
            stable_timeout,
            deadline: None,
        }
    }

    /// Deterministic seam for tests: `on_write` with an explicit clock.
    pub fn on_write_at(
        &mut self,
        terminal: &LineTerminal,
        outcome: &WriteOutcome,
        now: Instant,
    ) -> bool {
        self.deadline = None;
        if outcome.had_newline {
            return true;
        }
        if terminal.has_content() {
            let timeout = if is_volatile(outcome) {
                self.volatile_timeout
            } else {
                self.stable_timeout
            };
            self.deadline = Some(now + timeout);
        }
        false
    }
}

impl Default for StatefulTimeout {
    fn default() -> Self {
        StatefulTimeout::new(
            Duration::from_millis(DEFAULT_VOLATILE_TIMEOUT_MS),
            Duration::from_millis(DEFAULT_STABLE_TIMEOUT_MS),
        )
    }
}

impl EmitStrategy for StatefulTimeout {
    fn on_write(&mut self, terminal: &LineTerminal, outcome: &WriteOutcome) -> bool {
        self.on_write_at(terminal, outcome, Instant::now())
    }

    fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    fn next_deadline(&self) -> Option<Instant> {
        self.deadline
    }

    fn flush(&mut self) -> bool {
        self.deadline = None;
        true
    }

    fn dispose(&mut self) {
        self.deadline = None;
    }
}

/// Strategy selection, serde-friendly for host configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum EmitStrategyKind {
    Immediate,
    FixedTimeout {
        timeout_ms: u64,
    },
    StatefulTimeout {
        volatile_timeout_ms: u64,
        stable_timeout_ms: u64,
    },
}

impl Default for EmitStrategyKind {
    fn default() -> Self {
        EmitStrategyKind::StatefulTimeout {
            volatile_timeout_ms: DEFAULT_VOLATILE_TIMEOUT_MS,
            stable_timeout_ms: DEFAULT_STABLE_TIMEOUT_MS,
        }
    }
}

impl EmitStrategyKind {
    pub fn build(&self) -> Box<dyn EmitStrategy> {
        match *self {
            EmitStrategyKind::Immediate => Box::new(Immediate),
            EmitStrategyKind::FixedTimeout { timeout_ms } => {
                Box::new(FixedTimeout::new(Duration::from_millis(timeout_ms)))
            }
            EmitStrategyKind::StatefulTimeout {
                volatile_timeout_ms,
                stable_timeout_ms,
            } => Box::new(StatefulTimeout::new(
                Duration::from_millis(volatile_timeout_ms),
                Duration::from_millis(stable_timeout_ms),
            )),
        }
    }
}
