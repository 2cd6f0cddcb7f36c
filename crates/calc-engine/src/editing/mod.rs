//! Cursor-addressed symbol buffer with bounded undo.
//!
//! The buffer is the single source of truth for what the user is editing. All
//! edits are gated here: structurally invalid insertions (adjacent operators,
//! a leading non-minus operator, a doubled decimal point) are refused as
//! silent no-ops rather than surfaced as errors.

use calc_model::{BinaryOp, Symbol};
use std::collections::VecDeque;

/// Maximum number of undo snapshots retained; the oldest entry is evicted
/// first once the history is full.
pub const UNDO_CAPACITY: usize = 50;

/// Which side of the cursor a delete removes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Remove the symbol immediately left of the cursor (backspace).
    Backward,
    /// Remove the symbol at the cursor (delete).
    Forward,
}

#[derive(Debug, Clone, PartialEq)]
struct UndoEntry {
    symbols: Vec<Symbol>,
    cursor: usize,
}

/// Ordered symbol sequence plus an insertion cursor in `[0, len]`.
#[derive(Debug, Clone, Default)]
pub struct SymbolBuffer {
    symbols: Vec<Symbol>,
    cursor: usize,
    history: VecDeque<UndoEntry>,
}

impl SymbolBuffer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    #[must_use]
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    fn snapshot(&mut self) {
        if self.history.len() == UNDO_CAPACITY {
            self.history.pop_front();
        }
        self.history.push_back(UndoEntry {
            symbols: self.symbols.clone(),
            cursor: self.cursor,
        });
    }

    /// Insert `symbol` at the cursor. Returns `false` and leaves the buffer
    /// untouched (no snapshot) when the insertion is structurally invalid:
    /// an operator next to another operator, a non-`-` operator at position
    /// 0, or a decimal point directly after a decimal point.
    pub fn insert(&mut self, symbol: Symbol) -> bool {
        if symbol.is_operator() {
            let prev_is_op = self.cursor > 0 && self.symbols[self.cursor - 1].is_operator();
            let next_is_op =
                self.cursor < self.symbols.len() && self.symbols[self.cursor].is_operator();
            if prev_is_op || next_is_op {
                return false;
            }
            if self.cursor == 0 && symbol != Symbol::Op(BinaryOp::Sub) {
                return false;
            }
        }
        if symbol == Symbol::DecimalPoint
            && self.cursor > 0
            && self.symbols[self.cursor - 1] == Symbol::DecimalPoint
        {
            return false;
        }
        self.snapshot();
        self.symbols.insert(self.cursor, symbol);
        self.cursor += 1;
        true
    }

    /// Delete one symbol next to the cursor; a no-op at the buffer boundary.
    pub fn delete(&mut self, direction: Direction) -> bool {
        match direction {
            Direction::Backward => {
                if self.cursor == 0 {
                    return false;
                }
                self.snapshot();
                self.symbols.remove(self.cursor - 1);
                self.cursor -= 1;
            }
            Direction::Forward => {
                if self.cursor >= self.symbols.len() {
                    return false;
                }
                self.snapshot();
                self.symbols.remove(self.cursor);
            }
        }
        true
    }

    /// Move the cursor by `delta`, clamped to `[0, len]`. Cursor motion is
    /// not undoable.
    pub fn move_cursor(&mut self, delta: isize) {
        let target = self.cursor as isize + delta;
        self.cursor = target.clamp(0, self.symbols.len() as isize) as usize;
    }

    /// Pop the most recent snapshot and restore it. Returns `false` when the
    /// history is empty.
    pub fn undo(&mut self) -> bool {
        let Some(entry) = self.history.pop_back() else {
            return false;
        };
        self.symbols = entry.symbols;
        self.cursor = entry.cursor;
        true
    }

    /// Empty the buffer (snapshotting first) and reset the cursor.
    pub fn clear(&mut self) {
        self.snapshot();
        self.symbols.clear();
        self.cursor = 0;
    }

    /// Replace the whole contents, snapshotting first. Used by the facade
    /// when a commit succeeds and the result text becomes the new buffer.
    pub fn replace(&mut self, symbols: Vec<Symbol>) {
        self.snapshot();
        self.cursor = symbols.len();
        self.symbols = symbols;
    }
}
