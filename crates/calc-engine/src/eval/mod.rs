//! Stack-based RPN evaluation.
//!
//! Transcendental functions go through `libm` so results do not vary between
//! platform math libraries. Domain violations (zero divisors, out-of-range
//! `arcsin`/`arccos`, non-positive `ln`, non-finite results) are reported as
//! [`DomainError`]s rather than silently coerced.

use crate::error::{DomainError, EvalError};
use crate::parser::RpnToken;
use calc_model::{BinaryOp, Function};
use smallvec::SmallVec;

/// Evaluate an RPN token sequence to a single number.
///
/// The stack discipline doubles as the arity check: operand underflow while
/// applying an operator or function, or anything other than exactly one value
/// left at the end, is [`EvalError::Invalid`].
pub fn evaluate(tokens: &[RpnToken]) -> Result<f64, EvalError> {
    let mut stack: SmallVec<[f64; 16]> = SmallVec::new();
    for token in tokens {
        match *token {
            RpnToken::Number(n) => stack.push(n),
            RpnToken::Func(function) => {
                let arg = stack.pop().ok_or(EvalError::Invalid)?;
                stack.push(apply_function(function, arg)?);
            }
            RpnToken::Op(op) => {
                // The right operand was pushed last.
                let rhs = stack.pop().ok_or(EvalError::Invalid)?;
                let lhs = stack.pop().ok_or(EvalError::Invalid)?;
                stack.push(apply_operator(op, lhs, rhs)?);
            }
        }
    }
    if stack.len() != 1 {
        return Err(EvalError::Invalid);
    }
    let result = stack[0];
    if result.is_nan() {
        return Err(DomainError::Undefined.into());
    }
    if result.is_infinite() {
        return Err(DomainError::Overflow.into());
    }
    Ok(result)
}

fn apply_operator(op: BinaryOp, lhs: f64, rhs: f64) -> Result<f64, DomainError> {
    if op == BinaryOp::Div && rhs == 0.0 {
        return Err(DomainError::DivisionByZero);
    }
    Ok(op.apply(lhs, rhs))
}

fn apply_function(function: Function, arg: f64) -> Result<f64, DomainError> {
    let out_of_domain = DomainError::OutOfDomain { function };
    match function {
        Function::Sin => Ok(libm::sin(arg)),
        Function::Cos => Ok(libm::cos(arg)),
        Function::ArcSin => {
            if !(-1.0..=1.0).contains(&arg) {
                return Err(out_of_domain);
            }
            Ok(libm::asin(arg))
        }
        Function::ArcCos => {
            if !(-1.0..=1.0).contains(&arg) {
                return Err(out_of_domain);
            }
            Ok(libm::acos(arg))
        }
        Function::Ln => {
            if arg <= 0.0 {
                return Err(out_of_domain);
            }
            Ok(libm::log(arg))
        }
    }
}
