// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Renders expression nodes to Evy text.
//!
//! Composite literals dispatch on their *resolved static type* from the
//! type table, never on their syntax: slices and arrays render
//! bracketed, maps and structs render braced. Everything is assembled
//! bottom-up as strings.

use crate::context::Ctx;
use crate::diagnostics::Code;
use crate::operators;
use go_model::ast::{CompositeElem, Expr, ExprKind};
use go_model::GoType;
use itertools::Itertools;

/// The fixed substitution table for well-known print names. All other
/// identifiers pass through unchanged.
fn map_ident(name: &str) -> &str {
    match name {
        "Println" | "Print" | "println" => "print",
        "Printf" => "printf",
        _ => name,
    }
}

/// Render an expression.
pub(crate) fn render_expr(expr: &Expr, cx: &mut Ctx) -> String {
    match &expr.kind {
        ExprKind::Ident(name) => map_ident(name).to_string(),
        ExprKind::Lit { text, .. } => text.clone(),
        ExprKind::Binary { op, lhs, rhs } => {
            let op_text = match operators::map_binary(*op) {
                Some(text) => text,
                None => {
                    cx.warning(
                        Code::UnknownOperator,
                        expr.span,
                        format!("operator `{}` has no Evy equivalent", op.go_token()),
                    );
                    operators::ILLEGAL_OPERATOR
                }
            };
            format!(
                "{} {} {}",
                render_operand(lhs, cx),
                op_text,
                render_operand(rhs, cx)
            )
        }
        ExprKind::Unary { op, operand } => match operators::map_unary(*op) {
            Some(prefix) => format!("{}{}", prefix, render_operand(operand, cx)),
            None => {
                let kind = format!("unary `{}`", op.go_token());
                cx.unsupported_expr(&kind, expr.span)
            }
        },
        // Parentheses are dropped; operand wrapping restores grouping
        // wherever precedence could be ambiguous.
        ExprKind::Paren(inner) => render_expr(inner, cx),
        ExprKind::Call { callee, args } => {
            let mut out = render_expr(callee, cx);
            for arg in args {
                out.push(' ');
                out.push_str(&render_operand(arg, cx));
            }
            out
        }
        ExprKind::Selector { base, member } => {
            format!("{}.{}", render_expr(base, cx), map_ident(member))
        }
        ExprKind::Index { base, index } => {
            format!("{}[{}]", render_expr(base, cx), render_expr(index, cx))
        }
        ExprKind::Slice { base, low, high } => {
            let low = low.as_ref().map(|e| render_expr(e, cx)).unwrap_or_default();
            let high = high
                .as_ref()
                .map(|e| render_expr(e, cx))
                .unwrap_or_default();
            format!("{}[{}:{}]", render_expr(base, cx), low, high)
        }
        ExprKind::Composite { elems, .. } => render_composite(expr, elems, cx),
        ExprKind::TypeAssert { base, ty } => {
            format!("{}.({})", render_expr(base, cx), ty.descriptor())
        }
        ExprKind::FuncLit { .. } => cx.unsupported_expr(expr.kind.name(), expr.span),
    }
}

/// Render an operand position: compound operands (binary and unary
/// nesting) are parenthesized so precedence never depends on a
/// precedence-aware printer.
pub(crate) fn render_operand(expr: &Expr, cx: &mut Ctx) -> String {
    let text = render_expr(expr, cx);
    if unwrap_parens(expr).is_compound() {
        format!("({})", text)
    } else {
        text
    }
}

fn unwrap_parens(expr: &Expr) -> &ExprKind {
    match &expr.kind {
        ExprKind::Paren(inner) => unwrap_parens(inner),
        other => other,
    }
}

fn render_composite(expr: &Expr, elems: &[CompositeElem], cx: &mut Ctx) -> String {
    let ty = cx
        .info
        .type_of(expr.id)
        .unwrap_or_else(|| panic!("BUG: no type entry for composite literal {:?}", expr.id))
        .clone();
    match ty {
        GoType::Slice(_) | GoType::Array(_) => {
            let body = elems
                .iter()
                .map(|e| render_operand(&e.value, cx))
                .join(" ");
            format!("[{}]", body)
        }
        GoType::Map(..) => {
            let body = elems
                .iter()
                .map(|e| {
                    let key = e
                        .key
                        .as_ref()
                        .map(|k| render_expr(k, cx))
                        .unwrap_or_default();
                    format!("{}: {}", key, render_operand(&e.value, cx))
                })
                .join(" ");
            format!("{{{}}}", body)
        }
        GoType::Struct { .. } => {
            let body = elems
                .iter()
                .map(|e| {
                    // Struct field keys are bare identifiers.
                    let field = match e.key.as_ref().map(|k| &k.kind) {
                        Some(ExprKind::Ident(name)) => name.clone(),
                        Some(_) | None => String::new(),
                    };
                    format!("{}: {}", field, render_operand(&e.value, cx))
                })
                .join(" ");
            format!("{{{}}}", body)
        }
        other => {
            cx.error(
                Code::UnsupportedType,
                expr.span,
                format!(
                    "composite literal of type `{}` has no Evy rendering",
                    other.descriptor()
                ),
            );
            format!("/* unsupported literal: {} */", other.descriptor())
        }
    }
}
