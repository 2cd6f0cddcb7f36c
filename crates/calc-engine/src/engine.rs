//! Editing/evaluation facade.
//!
//! [`Engine`] owns the symbol buffer exclusively; the rendering layer drives
//! it through the edit API and reads back two projections: the display line
//! (expression or timed error message) and the live preview. Everything is
//! synchronous; the only time-dependent behavior is the error-display revert,
//! and the clock for it is supplied by the caller on every call that needs
//! one.

use crate::display::DisplayValue;
use crate::editing::{Direction, SymbolBuffer};
use crate::error::EvalError;
use crate::evaluate_symbols;
use calc_model::Symbol;
use std::time::{Duration, Instant};

/// How long a commit failure's message stays on screen before the expression
/// is restored.
pub const ERROR_DISPLAY_DURATION: Duration = Duration::from_millis(2000);

#[derive(Debug, Clone)]
struct PendingError {
    message: String,
    raised_at: Instant,
}

/// What the primary display line should show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayLine<'a> {
    Expression { symbols: &'a [Symbol], cursor: usize },
    /// A commit failure message; the cursor is parked at the end of the text.
    Message { text: &'a str },
}

/// One expression editor: buffer, undo history, preview cache and the timed
/// error state.
#[derive(Debug, Default)]
pub struct Engine {
    buffer: SymbolBuffer,
    pending_error: Option<PendingError>,
    preview: Option<DisplayValue>,
}

impl Engine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // ---- Edit API -------------------------------------------------------
    //
    // Every edit dismisses a pending error display first (the buffer was
    // kept intact underneath it), then mutates, then refreshes the preview.

    pub fn insert(&mut self, symbol: Symbol) -> bool {
        self.dismiss_error();
        let applied = self.buffer.insert(symbol);
        self.refresh_preview();
        applied
    }

    pub fn delete(&mut self, direction: Direction) -> bool {
        self.dismiss_error();
        let applied = self.buffer.delete(direction);
        self.refresh_preview();
        applied
    }

    pub fn move_cursor(&mut self, delta: isize) {
        self.dismiss_error();
        self.buffer.move_cursor(delta);
    }

    pub fn undo(&mut self) -> bool {
        self.dismiss_error();
        let applied = self.buffer.undo();
        self.refresh_preview();
        applied
    }

    pub fn clear(&mut self) {
        self.dismiss_error();
        self.buffer.clear();
        self.refresh_preview();
    }

    // ---- Read API -------------------------------------------------------

    #[must_use]
    pub fn symbols(&self) -> &[Symbol] {
        self.buffer.symbols()
    }

    #[must_use]
    pub fn cursor(&self) -> usize {
        self.buffer.cursor()
    }

    /// Current expression text (what the display line shows while editing).
    #[must_use]
    pub fn text(&self) -> String {
        calc_model::symbols_to_string(self.buffer.symbols())
    }

    #[must_use]
    pub fn display_line(&self) -> DisplayLine<'_> {
        match &self.pending_error {
            Some(pending) => DisplayLine::Message {
                text: &pending.message,
            },
            None => DisplayLine::Expression {
                symbols: self.buffer.symbols(),
                cursor: self.buffer.cursor(),
            },
        }
    }

    // ---- Evaluation API -------------------------------------------------

    /// Cached preview of the current expression's value, refreshed after
    /// every mutation. Absent while the expression does not evaluate, while
    /// an error message is being displayed, and for non-finite results.
    #[must_use]
    pub fn live_preview(&self) -> Option<DisplayValue> {
        self.preview
    }

    /// Evaluate and commit: on success the buffer is replaced with the
    /// result's own symbols (undoably), cursor at the end. On failure the
    /// buffer is kept and the display line switches to the error message
    /// until [`Engine::tick`] times it out or the next edit dismisses it.
    pub fn commit(&mut self, now: Instant) -> Result<DisplayValue, EvalError> {
        self.dismiss_error();
        match evaluate_symbols(self.buffer.symbols()) {
            Ok(value) => {
                let display = DisplayValue::from_f64(value);
                self.buffer.replace(display.to_symbols());
                self.refresh_preview();
                Ok(display)
            }
            Err(err) => {
                self.pending_error = Some(PendingError {
                    message: err.to_string(),
                    raised_at: now,
                });
                self.preview = None;
                Err(err)
            }
        }
    }

    // ---- Timed-error API ------------------------------------------------

    #[must_use]
    pub fn is_showing_error(&self) -> bool {
        self.pending_error.is_some()
    }

    /// Time since the currently displayed error was raised.
    #[must_use]
    pub fn error_elapsed(&self, now: Instant) -> Option<Duration> {
        self.pending_error
            .as_ref()
            .map(|pending| now.saturating_duration_since(pending.raised_at))
    }

    /// Caller-driven revert check: once the error has been displayed longer
    /// than [`ERROR_DISPLAY_DURATION`], drop it and show the expression
    /// again. Intended to be called once per frame.
    pub fn tick(&mut self, now: Instant) {
        let timed_out = self
            .error_elapsed(now)
            .is_some_and(|elapsed| elapsed > ERROR_DISPLAY_DURATION);
        if timed_out {
            self.pending_error = None;
            self.refresh_preview();
        }
    }

    // ---- Internals ------------------------------------------------------

    fn dismiss_error(&mut self) {
        self.pending_error = None;
    }

    fn refresh_preview(&mut self) {
        self.preview = if self.pending_error.is_some() {
            None
        } else {
            evaluate_symbols(self.buffer.symbols())
                .ok()
                .map(DisplayValue::from_f64)
        };
    }
}
