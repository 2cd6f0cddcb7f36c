//! Infix symbol sequence to RPN conversion.
//!
//! A single left-to-right shunting-yard pass with an explicit operator stack.
//! Two pre-normalizations happen inside the same pass: implicit
//! multiplication symbols are spliced in between adjacent operand-like
//! symbols (`2(3)`, `2pi`, `2sin(1)`), and unary signs are rewritten as
//! `0 ± x` (a literal zero is emitted ahead of a leading `-` and ahead of a
//! `+`/`-` directly inside an opening paren). A post-pass folds the leftover
//! `Number, ±` prefix pairs back into one signed literal.

use crate::error::MalformedExpression;
use calc_model::{BinaryOp, Function, Symbol};
use smallvec::SmallVec;

/// Postfix token. Produced transiently per evaluation attempt and consumed
/// immediately by the evaluator; never persisted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RpnToken {
    Number(f64),
    Op(BinaryOp),
    Func(Function),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StackEntry {
    Op(BinaryOp),
    OpenParen,
    Func(Function),
}

/// Convert a symbol sequence to RPN.
pub fn to_rpn(symbols: &[Symbol]) -> Result<Vec<RpnToken>, MalformedExpression> {
    // Implicit-multiplication synthesis splices symbols into the scan, so
    // work on a local copy of the sequence.
    let mut syms: Vec<Symbol> = symbols.to_vec();
    let mut output: Vec<RpnToken> = Vec::new();
    let mut stack: SmallVec<[StackEntry; 8]> = SmallVec::new();

    // `-5` parses as `0 - 5`.
    if syms.first() == Some(&Symbol::Op(BinaryOp::Sub)) {
        output.push(RpnToken::Number(0.0));
    }

    let mut i = 0;
    while i < syms.len() {
        if i > 0 && needs_implicit_mul(syms[i - 1], syms[i]) {
            syms.insert(i, Symbol::Op(BinaryOp::Mul));
            continue;
        }
        match syms[i] {
            Symbol::Digit(_) | Symbol::DecimalPoint => {
                let (value, next) = scan_number(&syms, i)?;
                output.push(RpnToken::Number(value));
                i = next;
                continue;
            }
            Symbol::Const(constant) => output.push(RpnToken::Number(constant.value())),
            Symbol::Func(function) => {
                if syms.get(i + 1) != Some(&Symbol::OpenParen) {
                    return Err(MalformedExpression::FunctionWithoutParens(function));
                }
                stack.push(StackEntry::Func(function));
            }
            Symbol::Op(op) => {
                while let Some(&StackEntry::Op(top)) = stack.last() {
                    let wins = top.precedence() > op.precedence()
                        || (top.precedence() == op.precedence() && op.is_left_associative());
                    if !wins {
                        break;
                    }
                    output.push(RpnToken::Op(top));
                    stack.pop();
                }
                stack.push(StackEntry::Op(op));
            }
            Symbol::OpenParen => {
                // `(-3)` parses as `(0-3)`; same for a redundant leading `+`.
                if matches!(
                    syms.get(i + 1),
                    Some(Symbol::Op(BinaryOp::Add | BinaryOp::Sub))
                ) {
                    output.push(RpnToken::Number(0.0));
                }
                stack.push(StackEntry::OpenParen);
            }
            Symbol::CloseParen => {
                loop {
                    match stack.pop() {
                        Some(StackEntry::Op(op)) => output.push(RpnToken::Op(op)),
                        Some(StackEntry::OpenParen) => break,
                        // A function is always covered by its own `(`; finding
                        // one here means the parens never matched up.
                        Some(StackEntry::Func(_)) | None => {
                            return Err(MalformedExpression::UnbalancedParens)
                        }
                    }
                }
                // A function is flushed as soon as its argument group closes.
                if let Some(&StackEntry::Func(function)) = stack.last() {
                    output.push(RpnToken::Func(function));
                    stack.pop();
                }
            }
            Symbol::ExponentMarker => {
                // Only reachable as part of a number literal scan.
                return Err(MalformedExpression::UnexpectedSymbol(syms[i]));
            }
        }
        i += 1;
    }

    while let Some(entry) = stack.pop() {
        match entry {
            StackEntry::Op(op) => output.push(RpnToken::Op(op)),
            StackEntry::OpenParen | StackEntry::Func(_) => {
                return Err(MalformedExpression::UnbalancedParens)
            }
        }
    }

    collapse_leading_sign(&mut output);
    Ok(output)
}

/// Whether a synthetic `*` belongs between `prev` and `cur`.
fn needs_implicit_mul(prev: Symbol, cur: Symbol) -> bool {
    if prev.is_operator() || prev == Symbol::OpenParen {
        return false;
    }
    if cur.is_operator() || cur == Symbol::CloseParen {
        return false;
    }
    // `sin(` is a call, not `sin * (`.
    if cur == Symbol::OpenParen && matches!(prev, Symbol::Func(_)) {
        return false;
    }
    // A decimal point continuing a number stays inside its literal.
    if cur == Symbol::DecimalPoint && prev.starts_number() {
        return false;
    }
    true
}

/// Scan a number literal starting at `start` (a digit or decimal point) and
/// return its value plus the index one past the literal.
///
/// Grammar: digits with at most one decimal point, optionally followed by the
/// exponent marker, an optional sign, and exponent digits. The value is
/// `mantissa * 10^exponent`, mirroring how the editor's keypad builds
/// scientific notation.
fn scan_number(syms: &[Symbol], start: usize) -> Result<(f64, usize), MalformedExpression> {
    let starts_with_point = syms[start] == Symbol::DecimalPoint;
    let mut text = String::new();
    push_symbol_char(&mut text, syms[start]);

    let mut i = start + 1;
    while i < syms.len() && syms[i].is_digit() {
        push_symbol_char(&mut text, syms[i]);
        i += 1;
    }
    if i < syms.len() && syms[i] == Symbol::DecimalPoint {
        // A second decimal point inside one literal.
        if starts_with_point {
            return Err(MalformedExpression::MalformedNumber);
        }
        push_symbol_char(&mut text, syms[i]);
        i += 1;
        while i < syms.len() && syms[i].is_digit() {
            push_symbol_char(&mut text, syms[i]);
            i += 1;
        }
    }
    let mantissa: f64 = text
        .parse()
        .map_err(|_| MalformedExpression::MalformedNumber)?;

    if i < syms.len() && syms[i] == Symbol::ExponentMarker {
        i += 1;
        let mut exp_text = String::new();
        if let Some(&Symbol::Op(op @ (BinaryOp::Add | BinaryOp::Sub))) = syms.get(i) {
            exp_text.push(op.glyph());
            i += 1;
        }
        let digits_start = i;
        while i < syms.len() && syms[i].is_digit() {
            push_symbol_char(&mut exp_text, syms[i]);
            i += 1;
        }
        if i == digits_start {
            // `2e` or `2e-` with nothing after the sign.
            return Err(MalformedExpression::MalformedNumber);
        }
        let exponent: f64 = exp_text
            .parse()
            .map_err(|_| MalformedExpression::MalformedNumber)?;
        return Ok((mantissa * libm::pow(10.0, exponent), i));
    }

    Ok((mantissa, i))
}

fn push_symbol_char(text: &mut String, sym: Symbol) {
    match sym {
        Symbol::Digit(d) => text.push((b'0' + d) as char),
        Symbol::DecimalPoint => text.push('.'),
        _ => unreachable!("number scan only feeds digits and decimal points"),
    }
}

/// Fold a `Number, ±` prefix left over from unary-sign normalization into a
/// single signed literal, repeating while the pattern holds.
fn collapse_leading_sign(output: &mut Vec<RpnToken>) {
    while output.len() > 1 {
        let (RpnToken::Number(n), RpnToken::Op(op @ (BinaryOp::Add | BinaryOp::Sub))) =
            (output[0], output[1])
        else {
            break;
        };
        let signed = if op == BinaryOp::Sub { -n } else { n };
        output.remove(0);
        output[0] = RpnToken::Number(signed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calc_model::symbols_from_str;
    use pretty_assertions::assert_eq;

    fn rpn(text: &str) -> Result<Vec<RpnToken>, MalformedExpression> {
        to_rpn(&symbols_from_str(text).unwrap())
    }

    #[test]
    fn precedence_orders_the_output() {
        assert_eq!(
            rpn("2+3*4").unwrap(),
            vec![
                RpnToken::Number(2.0),
                RpnToken::Number(3.0),
                RpnToken::Number(4.0),
                RpnToken::Op(BinaryOp::Mul),
                RpnToken::Op(BinaryOp::Add),
            ]
        );
    }

    #[test]
    fn parens_override_precedence() {
        assert_eq!(
            rpn("(2+3)*4").unwrap(),
            vec![
                RpnToken::Number(2.0),
                RpnToken::Number(3.0),
                RpnToken::Op(BinaryOp::Add),
                RpnToken::Number(4.0),
                RpnToken::Op(BinaryOp::Mul),
            ]
        );
    }

    #[test]
    fn pow_is_right_associative() {
        // 2^3^2 groups as 2^(3^2): neither `^` is flushed before the scan ends.
        assert_eq!(
            rpn("2^3^2").unwrap(),
            vec![
                RpnToken::Number(2.0),
                RpnToken::Number(3.0),
                RpnToken::Number(2.0),
                RpnToken::Op(BinaryOp::Pow),
                RpnToken::Op(BinaryOp::Pow),
            ]
        );
    }

    #[test]
    fn equal_precedence_left_associative_flushes() {
        assert_eq!(
            rpn("8-3-2").unwrap(),
            vec![
                RpnToken::Number(8.0),
                RpnToken::Number(3.0),
                RpnToken::Op(BinaryOp::Sub),
                RpnToken::Number(2.0),
                RpnToken::Op(BinaryOp::Sub),
            ]
        );
    }

    #[test]
    fn implicit_multiplication_before_paren_and_constant() {
        assert_eq!(
            rpn("2(3)").unwrap(),
            vec![
                RpnToken::Number(2.0),
                RpnToken::Number(3.0),
                RpnToken::Op(BinaryOp::Mul),
            ]
        );
        assert_eq!(
            rpn("2pi").unwrap(),
            vec![
                RpnToken::Number(2.0),
                RpnToken::Number(std::f64::consts::PI),
                RpnToken::Op(BinaryOp::Mul),
            ]
        );
        assert_eq!(
            rpn("(2)(3)").unwrap(),
            vec![
                RpnToken::Number(2.0),
                RpnToken::Number(3.0),
                RpnToken::Op(BinaryOp::Mul),
            ]
        );
    }

    #[test]
    fn function_call_gets_no_implicit_multiplication() {
        use calc_model::Function;
        assert_eq!(
            rpn("2sin(1)").unwrap(),
            vec![
                RpnToken::Number(2.0),
                RpnToken::Number(1.0),
                RpnToken::Func(Function::Sin),
                RpnToken::Op(BinaryOp::Mul),
            ]
        );
    }

    #[test]
    fn leading_minus_becomes_zero_minus() {
        assert_eq!(
            rpn("-5+2").unwrap(),
            vec![
                RpnToken::Number(0.0),
                RpnToken::Number(5.0),
                RpnToken::Op(BinaryOp::Sub),
                RpnToken::Number(2.0),
                RpnToken::Op(BinaryOp::Add),
            ]
        );
    }

    #[test]
    fn parenthesized_unary_sign_gets_a_zero() {
        assert_eq!(
            rpn("(-3)").unwrap(),
            vec![
                RpnToken::Number(0.0),
                RpnToken::Number(3.0),
                RpnToken::Op(BinaryOp::Sub),
            ]
        );
    }

    #[test]
    fn trailing_sign_prefix_collapses_into_one_literal() {
        // `5-` leaves `[5, -]` after the flush; the post-pass folds it.
        assert_eq!(rpn("5-").unwrap(), vec![RpnToken::Number(-5.0)]);
    }

    #[test]
    fn scientific_notation_literals() {
        assert_eq!(rpn("2e3").unwrap(), vec![RpnToken::Number(2000.0)]);
        assert_eq!(rpn("1.5e+2").unwrap(), vec![RpnToken::Number(150.0)]);
        // Negative exponents go through `powf`; allow for its rounding.
        let tokens = rpn("2e-3").unwrap();
        let [RpnToken::Number(value)] = tokens.as_slice() else {
            panic!("expected one literal, got {tokens:?}");
        };
        assert!((value - 0.002).abs() < 1e-15);
    }

    #[test]
    fn empty_exponent_is_malformed() {
        assert_eq!(rpn("2e"), Err(MalformedExpression::MalformedNumber));
        assert_eq!(rpn("2e-"), Err(MalformedExpression::MalformedNumber));
    }

    #[test]
    fn lone_decimal_point_is_malformed() {
        assert_eq!(rpn("."), Err(MalformedExpression::MalformedNumber));
    }

    #[test]
    fn second_point_in_a_point_led_literal_is_malformed() {
        assert_eq!(rpn(".5."), Err(MalformedExpression::MalformedNumber));
    }

    #[test]
    fn unbalanced_parens_error_both_ways() {
        assert_eq!(rpn("(2+3"), Err(MalformedExpression::UnbalancedParens));
        assert_eq!(rpn("2+3)"), Err(MalformedExpression::UnbalancedParens));
    }

    #[test]
    fn function_requires_an_opening_paren() {
        use calc_model::Function;
        assert_eq!(
            rpn("sin2"),
            Err(MalformedExpression::FunctionWithoutParens(Function::Sin))
        );
        assert_eq!(
            rpn("sin"),
            Err(MalformedExpression::FunctionWithoutParens(Function::Sin))
        );
    }

    #[test]
    fn constants_emit_their_value_directly() {
        assert_eq!(
            rpn("e").unwrap(),
            vec![RpnToken::Number(std::f64::consts::E)]
        );
    }

    #[test]
    fn stray_exponent_marker_is_rejected() {
        use calc_model::{Constant, Symbol};
        let syms = vec![Symbol::Const(Constant::Pi), Symbol::ExponentMarker];
        assert!(matches!(
            to_rpn(&syms),
            Err(MalformedExpression::UnexpectedSymbol(_))
        ));
    }

    #[test]
    fn adjacent_literals_stay_separate() {
        // `1.2.3` is two literals (`1.2` and `.3`) with no operator between
        // them; the converter does not reject it, the evaluator's arity
        // check does.
        assert_eq!(
            rpn("1.2.3").unwrap(),
            vec![RpnToken::Number(1.2), RpnToken::Number(0.3)]
        );
    }
}
