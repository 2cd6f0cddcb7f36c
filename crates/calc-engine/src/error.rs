use calc_model::{Function, Symbol};
use thiserror::Error;

/// Structural failure while converting the symbol sequence to RPN.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MalformedExpression {
    #[error("parentheses out of order")]
    UnbalancedParens,
    #[error("parentheses after {0} absent")]
    FunctionWithoutParens(Function),
    #[error("malformed number literal")]
    MalformedNumber,
    #[error("unexpected symbol {0}")]
    UnexpectedSymbol(Symbol),
}

/// Arithmetic failure during RPN evaluation. These are runtime properties of
/// the operands, not of the expression's shape.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum DomainError {
    #[error("division by zero")]
    DivisionByZero,
    #[error("{function} argument out of domain")]
    OutOfDomain { function: Function },
    #[error("number is too big")]
    Overflow,
    #[error("result is undefined")]
    Undefined,
}

/// Any failure an evaluation attempt can end with. Raised during `commit`
/// these become the timed on-screen error message; during preview they are
/// swallowed and the preview line simply stays empty.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EvalError {
    #[error(transparent)]
    Malformed(#[from] MalformedExpression),
    /// Operand/operator arity mismatch detected by the evaluator's stack
    /// discipline.
    #[error("invalid expression")]
    Invalid,
    #[error(transparent)]
    Domain(#[from] DomainError),
}
