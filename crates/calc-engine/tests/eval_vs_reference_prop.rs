//! Randomized cross-check of the shunting-yard pipeline against a direct
//! recursive evaluator.
//!
//! Expressions are generated as trees, rendered to symbols (fully
//! parenthesized, with occasional unary-minus groups and implicit
//! multiplication), and both evaluators must agree exactly: same finite value
//! or failure on both sides. The tree walker applies the identical sequence
//! of `f64` operations, so agreement is bit-for-bit, not approximate.

use calc_engine::evaluate_symbols;
use calc_model::{symbols_from_str, BinaryOp, Constant, Function};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Expr {
    /// Digit/decimal-point literal text, e.g. `"12.5"`.
    Num(String),
    Const(Constant),
    /// `(-x)` group.
    Neg(Box<Expr>),
    Call(Function, Box<Expr>),
    Binary(BinaryOp, Box<Expr>, Box<Expr>),
    /// `((a)(b))` — adjacent groups with no operator symbol between them.
    ImplicitMul(Box<Expr>, Box<Expr>),
}

fn literal() -> impl Strategy<Value = Expr> {
    (0u32..10_000, proptest::option::of(0u32..10_000)).prop_map(|(int, frac)| {
        let text = match frac {
            Some(frac) => format!("{int}.{frac}"),
            None => int.to_string(),
        };
        Expr::Num(text)
    })
}

fn expr_tree() -> impl Strategy<Value = Expr> {
    let leaf = prop_oneof![
        4 => literal(),
        1 => Just(Expr::Const(Constant::Pi)),
        1 => Just(Expr::Const(Constant::E)),
    ];
    leaf.prop_recursive(6, 48, 4, |inner| {
        prop_oneof![
            (any::<u8>(), inner.clone(), inner.clone()).prop_map(|(op, lhs, rhs)| {
                let op = BinaryOp::ALL[op as usize % BinaryOp::ALL.len()];
                Expr::Binary(op, Box::new(lhs), Box::new(rhs))
            }),
            (any::<u8>(), inner.clone()).prop_map(|(f, arg)| {
                let f = Function::ALL[f as usize % Function::ALL.len()];
                Expr::Call(f, Box::new(arg))
            }),
            inner.clone().prop_map(|e| Expr::Neg(Box::new(e))),
            (inner.clone(), inner).prop_map(|(lhs, rhs)| {
                Expr::ImplicitMul(Box::new(lhs), Box::new(rhs))
            }),
        ]
    })
}

fn render(expr: &Expr, out: &mut String) {
    match expr {
        Expr::Num(text) => out.push_str(text),
        Expr::Const(c) => out.push_str(c.name()),
        Expr::Neg(inner) => {
            out.push_str("(-");
            render(inner, out);
            out.push(')');
        }
        Expr::Call(f, arg) => {
            out.push_str(f.name());
            out.push('(');
            render(arg, out);
            out.push(')');
        }
        Expr::Binary(op, lhs, rhs) => {
            out.push('(');
            render(lhs, out);
            out.push(op.glyph());
            render(rhs, out);
            out.push(')');
        }
        Expr::ImplicitMul(lhs, rhs) => {
            // The outer parens keep the pair a single operand: without them,
            // `x*(a)(b)` would regroup as `(x*a)*b` and drift from the tree
            // by an ulp.
            out.push_str("((");
            render(lhs, out);
            out.push_str(")(");
            render(rhs, out);
            out.push_str("))");
        }
    }
}

/// Direct tree-walking evaluation with the same domain rules as the engine.
/// `Err(())` stands for any domain failure.
fn reference_eval(expr: &Expr) -> Result<f64, ()> {
    match expr {
        Expr::Num(text) => text.parse::<f64>().map_err(|_| ()),
        Expr::Const(c) => Ok(c.value()),
        Expr::Neg(inner) => Ok(0.0 - reference_eval(inner)?),
        Expr::Call(f, arg) => {
            let arg = reference_eval(arg)?;
            match f {
                Function::Sin => Ok(libm::sin(arg)),
                Function::Cos => Ok(libm::cos(arg)),
                Function::ArcSin if (-1.0..=1.0).contains(&arg) => Ok(libm::asin(arg)),
                Function::ArcCos if (-1.0..=1.0).contains(&arg) => Ok(libm::acos(arg)),
                Function::Ln if arg > 0.0 => Ok(libm::log(arg)),
                Function::ArcSin | Function::ArcCos | Function::Ln => Err(()),
            }
        }
        Expr::Binary(op, lhs, rhs) => {
            let lhs = reference_eval(lhs)?;
            let rhs = reference_eval(rhs)?;
            if *op == BinaryOp::Div && rhs == 0.0 {
                return Err(());
            }
            Ok(op.apply(lhs, rhs))
        }
        Expr::ImplicitMul(lhs, rhs) => {
            Ok(reference_eval(lhs)? * reference_eval(rhs)?)
        }
    }
}

proptest! {
    #[test]
    fn pipeline_agrees_with_tree_walker(expr in expr_tree()) {
        let mut text = String::new();
        render(&expr, &mut text);
        let symbols = symbols_from_str(&text)
            .unwrap_or_else(|| panic!("render produced non-alphabet text: {text}"));

        let got = evaluate_symbols(&symbols);
        match reference_eval(&expr) {
            Ok(want) if want.is_finite() => {
                let got = got.unwrap_or_else(|e| panic!("pipeline failed on {text}: {e}"));
                prop_assert_eq!(got.to_bits(), want.to_bits(), "{}", text);
            }
            // Domain failure or a non-finite result: the pipeline must fail
            // too, never crash or return a number.
            _ => prop_assert!(got.is_err(), "expected failure on {}", text),
        }
    }
}
