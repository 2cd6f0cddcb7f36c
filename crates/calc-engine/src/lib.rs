#![forbid(unsafe_code)]
#![deny(unreachable_patterns)]

//! Expression buffer and evaluation engine for an interactive calculator.
//!
//! The user builds a symbolic expression one [`Symbol`](calc_model::Symbol)
//! at a time; every edit re-parses the buffer so a live preview can be shown,
//! and an explicit commit replaces the buffer with the evaluated result (or a
//! timed error message).
//!
//! The pipeline is [`editing::SymbolBuffer`] → [`parser::to_rpn`] (shunting
//! yard with implicit-multiplication synthesis and unary-sign normalization)
//! → [`eval::evaluate`] → [`display::DisplayValue`] normalization, all
//! orchestrated by the [`Engine`] facade. Rendering, key mapping, and frame
//! timing live in the host; the host hands the engine a clock reading
//! whenever one is needed.

pub mod display;
pub mod editing;
pub mod error;
pub mod eval;
pub mod parser;

mod engine;

pub use display::{round_decimals, DisplayValue};
pub use editing::{Direction, SymbolBuffer, UNDO_CAPACITY};
pub use engine::{DisplayLine, Engine, ERROR_DISPLAY_DURATION};
pub use error::{DomainError, EvalError, MalformedExpression};
pub use eval::evaluate;
pub use parser::{to_rpn, RpnToken};

use calc_model::Symbol;

/// Convert and evaluate a symbol sequence in one step.
pub fn evaluate_symbols(symbols: &[Symbol]) -> Result<f64, EvalError> {
    let tokens = to_rpn(symbols)?;
    evaluate(&tokens)
}
