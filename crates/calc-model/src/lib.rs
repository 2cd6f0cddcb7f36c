#![forbid(unsafe_code)]
#![deny(unreachable_patterns)]

//! Symbol vocabulary for the calc expression editor.
//!
//! A [`Symbol`] is one cursor-addressable editing unit. Most symbols print as a
//! single character, but function and constant names (`sin`, `pi`, ...) print
//! as several while still occupying a single buffer position, so deleting
//! `arcsin` removes the whole keyword in one step.
//!
//! The operator table ([`BinaryOp`]) is a closed set with static precedence and
//! associativity; the engine crate dispatches on it by matching rather than
//! through function pointers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Binary infix operator.
///
/// Precedence is an integer where higher binds tighter; `^` is the only
/// right-associative operator (`2^3^2` groups as `2^(3^2)`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

impl BinaryOp {
    pub const ALL: [BinaryOp; 5] = [
        BinaryOp::Add,
        BinaryOp::Sub,
        BinaryOp::Mul,
        BinaryOp::Div,
        BinaryOp::Pow,
    ];

    #[must_use]
    pub fn precedence(self) -> u8 {
        match self {
            BinaryOp::Add | BinaryOp::Sub => 1,
            BinaryOp::Mul | BinaryOp::Div => 2,
            BinaryOp::Pow => 3,
        }
    }

    #[must_use]
    pub fn is_left_associative(self) -> bool {
        !matches!(self, BinaryOp::Pow)
    }

    /// Raw arithmetic application. Domain checks (zero divisors, non-finite
    /// results) are the evaluator's responsibility, not the table's.
    #[must_use]
    pub fn apply(self, lhs: f64, rhs: f64) -> f64 {
        match self {
            BinaryOp::Add => lhs + rhs,
            BinaryOp::Sub => lhs - rhs,
            BinaryOp::Mul => lhs * rhs,
            BinaryOp::Div => lhs / rhs,
            BinaryOp::Pow => libm::pow(lhs, rhs),
        }
    }

    #[must_use]
    pub fn glyph(self) -> char {
        match self {
            BinaryOp::Add => '+',
            BinaryOp::Sub => '-',
            BinaryOp::Mul => '*',
            BinaryOp::Div => '/',
            BinaryOp::Pow => '^',
        }
    }

    #[must_use]
    pub fn from_glyph(c: char) -> Option<BinaryOp> {
        match c {
            '+' => Some(BinaryOp::Add),
            '-' => Some(BinaryOp::Sub),
            '*' => Some(BinaryOp::Mul),
            '/' => Some(BinaryOp::Div),
            '^' => Some(BinaryOp::Pow),
            _ => None,
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.glyph())
    }
}

/// Unary transcendental function. Applied by the evaluator via `libm` so
/// results are identical across platforms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Function {
    ArcCos,
    ArcSin,
    Sin,
    Cos,
    Ln,
}

impl Function {
    pub const ALL: [Function; 5] = [
        Function::ArcCos,
        Function::ArcSin,
        Function::Sin,
        Function::Cos,
        Function::Ln,
    ];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Function::ArcCos => "arccos",
            Function::ArcSin => "arcsin",
            Function::Sin => "sin",
            Function::Cos => "cos",
            Function::Ln => "ln",
        }
    }

}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Named numeric constant. Zero-arity: the converter substitutes the value
/// directly into the output with no operator-stack interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Constant {
    E,
    Pi,
}

impl Constant {
    pub const ALL: [Constant; 2] = [Constant::E, Constant::Pi];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Constant::E => "e",
            Constant::Pi => "pi",
        }
    }

    #[must_use]
    pub fn value(self) -> f64 {
        match self {
            Constant::E => std::f64::consts::E,
            Constant::Pi => std::f64::consts::PI,
        }
    }

}

impl fmt::Display for Constant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One cursor-addressable editing unit of an expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Symbol {
    /// A single decimal digit, `0..=9`.
    Digit(u8),
    DecimalPoint,
    /// The scientific-notation `e` inside a number literal (`2e-3`). Distinct
    /// from [`Constant::E`], which is a standalone operand.
    ExponentMarker,
    Op(BinaryOp),
    OpenParen,
    CloseParen,
    Func(Function),
    Const(Constant),
}

impl Symbol {
    #[must_use]
    pub fn is_operator(&self) -> bool {
        matches!(self, Symbol::Op(_))
    }

    #[must_use]
    pub fn is_digit(&self) -> bool {
        matches!(self, Symbol::Digit(_))
    }

    /// Whether this symbol can begin a number literal.
    #[must_use]
    pub fn starts_number(&self) -> bool {
        matches!(self, Symbol::Digit(_) | Symbol::DecimalPoint)
    }

    /// Map a single character to a symbol. Used to re-symbolize formatted
    /// results (digits, signs, `.`, `e`) back into an editable buffer;
    /// multi-character names are not reachable from here.
    #[must_use]
    pub fn from_char(c: char) -> Option<Symbol> {
        match c {
            '0'..='9' => Some(Symbol::Digit(c as u8 - b'0')),
            '.' => Some(Symbol::DecimalPoint),
            'e' => Some(Symbol::ExponentMarker),
            '(' => Some(Symbol::OpenParen),
            ')' => Some(Symbol::CloseParen),
            _ => BinaryOp::from_glyph(c).map(Symbol::Op),
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Symbol::Digit(d) => write!(f, "{d}"),
            Symbol::DecimalPoint => f.write_str("."),
            Symbol::ExponentMarker => f.write_str("e"),
            Symbol::Op(op) => write!(f, "{op}"),
            Symbol::OpenParen => f.write_str("("),
            Symbol::CloseParen => f.write_str(")"),
            Symbol::Func(func) => write!(f, "{func}"),
            Symbol::Const(c) => write!(f, "{c}"),
        }
    }
}

/// Concatenated display text of a symbol sequence.
#[must_use]
pub fn symbols_to_string(symbols: &[Symbol]) -> String {
    use fmt::Write as _;
    let mut out = String::with_capacity(symbols.len());
    for sym in symbols {
        // Writing to a String cannot fail.
        let _ = write!(out, "{sym}");
    }
    out
}

/// Parse a display string back into symbols, longest keyword first, so tests
/// and host tooling can write expressions as text. Returns `None` on any
/// character that is not part of the alphabet.
#[must_use]
pub fn symbols_from_str(text: &str) -> Option<Vec<Symbol>> {
    let mut out = Vec::new();
    let mut rest = text;
    'outer: while !rest.is_empty() {
        for func in Function::ALL {
            if let Some(tail) = rest.strip_prefix(func.name()) {
                out.push(Symbol::Func(func));
                rest = tail;
                continue 'outer;
            }
        }
        // `pi` before single chars; `e` only matches as a constant when it is
        // not directly continuing a digit run (there it is the exponent
        // marker, which `Symbol::from_char` already yields).
        if let Some(tail) = rest.strip_prefix("pi") {
            out.push(Symbol::Const(Constant::Pi));
            rest = tail;
            continue;
        }
        let c = rest.chars().next()?;
        if c == 'e' && !matches!(out.last(), Some(s) if s.starts_number()) {
            out.push(Symbol::Const(Constant::E));
        } else {
            out.push(Symbol::from_char(c)?);
        }
        rest = &rest[c.len_utf8()..];
    }
    Some(out)
}
