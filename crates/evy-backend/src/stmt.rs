// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Renders statement nodes to Evy text.
//!
//! Loop shapes are normalized through the classifier before any text is
//! produced; conditionals fold else-if chains into a single terminated
//! construct; both switch flavors fold into one `switch .. end`
//! structure.

use crate::context::Ctx;
use crate::expr::{render_expr, render_operand};
use crate::format::indent_block;
use crate::loops::{classify, LoopShape};
use crate::operators;
use crate::program::render_decl;
use go_model::ast::{
    Block, BranchKind, CaseLabels, ForStmt, IfStmt, RangeStmt, Stmt, StmtKind, SwitchStmt,
};
use itertools::Itertools;

/// Render a statement.
pub(crate) fn render_stmt(stmt: &Stmt, cx: &mut Ctx) -> String {
    match &stmt.kind {
        StmtKind::Expr(e) => render_expr(e, cx),
        StmtKind::Assign { lhs, op, rhs } => {
            if let Some(bin) = op.binary_op() {
                // Compound assignment desugars like inc/dec.
                let target = render_expr(&lhs[0], cx);
                let op_text = operators::map_binary(bin)
                    .expect("compound assignment operators are always mapped");
                let value = render_operand(&rhs[0], cx);
                format!("{} = {} {} {}", target, target, op_text, value)
            } else {
                let targets = lhs.iter().map(|e| render_expr(e, cx)).join(", ");
                let values = rhs.iter().map(|e| render_expr(e, cx)).join(", ");
                let sep = if op.is_define() { ":=" } else { "=" };
                format!("{} {} {}", targets, sep, values)
            }
        }
        StmtKind::IncDec { target, inc } => {
            let target = render_expr(target, cx);
            let op = if *inc { "+" } else { "-" };
            format!("{} = {} {} 1", target, target, op)
        }
        StmtKind::Decl(decl) => render_decl(decl, cx),
        StmtKind::Return(values) => {
            if values.is_empty() {
                "return".to_string()
            } else {
                let values = values.iter().map(|e| render_expr(e, cx)).join(", ");
                format!("return {}", values)
            }
        }
        StmtKind::If(i) => render_if(i, cx),
        StmtKind::For(f) => render_for(f, cx),
        StmtKind::Range(r) => render_range(r, cx),
        StmtKind::Switch(s) => render_switch(s, cx),
        StmtKind::Branch { kind, label } => {
            if label.is_some() {
                return cx.unsupported_stmt("labeled branch", stmt.span);
            }
            match kind {
                BranchKind::Break => "break".to_string(),
                BranchKind::Continue => "continue".to_string(),
                BranchKind::Goto => cx.unsupported_stmt("goto statement", stmt.span),
                BranchKind::Fallthrough => {
                    cx.unsupported_stmt("fallthrough statement", stmt.span)
                }
            }
        }
        // Bare blocks only scope names in the source; their statements
        // render inline.
        StmtKind::Block(b) => render_block(b, cx),
        StmtKind::Labeled { .. } => cx.unsupported_stmt(stmt.kind.name(), stmt.span),
        StmtKind::Go(_) => cx.unsupported_stmt(stmt.kind.name(), stmt.span),
        StmtKind::Defer(_) => cx.unsupported_stmt(stmt.kind.name(), stmt.span),
        StmtKind::Send { .. } => cx.unsupported_stmt(stmt.kind.name(), stmt.span),
        StmtKind::Empty => String::new(),
    }
}

/// Render a block's statements joined by newlines. Indentation is
/// applied by the enclosing construct, not here.
pub(crate) fn render_block(block: &Block, cx: &mut Ctx) -> String {
    block
        .stmts
        .iter()
        .map(|s| render_stmt(s, cx))
        .filter(|text| !text.is_empty())
        .join("\n")
}

fn render_if(stmt: &IfStmt, cx: &mut Ctx) -> String {
    let mut out = String::new();
    // Init statements are hoisted onto their own line; Evy has no
    // statement position inside an if header.
    if let Some(init) = &stmt.init {
        let init = render_stmt(init, cx);
        if !init.is_empty() {
            out.push_str(&init);
            out.push('\n');
        }
    }
    out.push_str(&format!(
        "if {}\n{}\n",
        render_expr(&stmt.cond, cx),
        indent_block(&render_block(&stmt.then, cx))
    ));

    // An else branch that is itself a conditional extends the same
    // chain; only one `end` terminates the whole construct.
    let mut els = stmt.els.as_deref();
    while let Some(branch) = els {
        match &branch.kind {
            StmtKind::If(inner) if inner.init.is_none() => {
                out.push_str(&format!(
                    "else if {}\n{}\n",
                    render_expr(&inner.cond, cx),
                    indent_block(&render_block(&inner.then, cx))
                ));
                els = inner.els.as_deref();
            }
            StmtKind::Block(b) => {
                out.push_str(&format!("else\n{}\n", indent_block(&render_block(b, cx))));
                els = None;
            }
            _ => {
                out.push_str(&format!(
                    "else\n{}\n",
                    indent_block(&render_stmt(branch, cx))
                ));
                els = None;
            }
        }
    }
    out.push_str("end");
    out
}

fn render_for(stmt: &ForStmt, cx: &mut Ctx) -> String {
    match classify(stmt) {
        LoopShape::While { cond } => {
            let cond = cond
                .map(|c| render_expr(c, cx))
                .unwrap_or_else(|| "true".to_string());
            format!(
                "while {}\n{}\nend",
                cond,
                indent_block(&render_block(&stmt.body, cx))
            )
        }
        LoopShape::Counted { var, start, stop } => {
            let stop = render_operand(stop, cx);
            let bounds = if var == "_" {
                // Discarded loop variable: start is omitted.
                format!("{} 1", stop)
            } else {
                format!("{} {} 1", render_operand(start, cx), stop)
            };
            format!(
                "for {}\n{}\nend",
                bounds,
                indent_block(&render_block(&stmt.body, cx))
            )
        }
        LoopShape::Generic => render_generic_for(stmt, cx),
    }
}

/// Best-effort fallback for loops that are neither condition-only nor
/// unit-counted: the initializer is hoisted before the loop and the
/// post statement becomes the last body line. A `continue` in the body
/// would skip the post statement; that fidelity gap is documented, not
/// worked around.
fn render_generic_for(stmt: &ForStmt, cx: &mut Ctx) -> String {
    let mut out = String::new();
    if let Some(init) = &stmt.init {
        let init = render_stmt(init, cx);
        if !init.is_empty() {
            out.push_str(&init);
            out.push('\n');
        }
    }
    let cond = stmt
        .cond
        .as_ref()
        .map(|c| render_expr(c, cx))
        .unwrap_or_else(|| "true".to_string());
    let mut body = render_block(&stmt.body, cx);
    if let Some(post) = &stmt.post {
        let post = render_stmt(post, cx);
        if !post.is_empty() {
            if !body.is_empty() {
                body.push('\n');
            }
            body.push_str(&post);
        }
    }
    out.push_str(&format!("while {}\n{}\nend", cond, indent_block(&body)));
    out
}

fn render_range(stmt: &RangeStmt, cx: &mut Ctx) -> String {
    let mut head = String::from("for ");
    match (&stmt.key, &stmt.value) {
        (Some(key), Some(value)) => {
            head.push_str(&format!(
                "{}, {} := range ",
                render_expr(key, cx),
                render_expr(value, cx)
            ));
        }
        (Some(key), None) => {
            head.push_str(&format!("{} := range ", render_expr(key, cx)));
        }
        (None, _) => head.push_str("range "),
    }
    head.push_str(&render_expr(&stmt.collection, cx));
    format!(
        "{}\n{}\nend",
        head,
        indent_block(&render_block(&stmt.body, cx))
    )
}

fn render_switch(stmt: &SwitchStmt, cx: &mut Ctx) -> String {
    let mut out = String::new();
    if let Some(init) = &stmt.init {
        let init = render_stmt(init, cx);
        if !init.is_empty() {
            out.push_str(&init);
            out.push('\n');
        }
    }
    // A type switch has no discriminant expression; a literal `true`
    // stands in for it. Case types then compare as ordinary values -
    // a textual approximation, not type narrowing.
    let tag = stmt
        .tag
        .as_ref()
        .map(|t| render_expr(t, cx))
        .unwrap_or_else(|| "true".to_string());
    out.push_str(&format!("switch {}\n", tag));

    for case in &stmt.cases {
        match &case.labels {
            CaseLabels::Default => out.push_str("default\n"),
            CaseLabels::Exprs(exprs) => {
                let labels = exprs.iter().map(|e| render_expr(e, cx)).join(", ");
                out.push_str(&format!("case {}\n", labels));
            }
            CaseLabels::Types(types) => {
                let labels = types.iter().map(|t| t.descriptor()).join(", ");
                out.push_str(&format!("case {}\n", labels));
            }
        }
        let body = case
            .body
            .iter()
            .map(|s| render_stmt(s, cx))
            .filter(|text| !text.is_empty())
            .join("\n");
        if !body.is_empty() {
            out.push_str(&indent_block(&body));
            out.push('\n');
        }
    }
    out.push_str("end");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use go_model::ast::*;
    use go_model::TypeInfo;

    fn expr(kind: ExprKind) -> Expr {
        Expr {
            id: NodeId(0),
            span: Span::default(),
            kind,
        }
    }

    fn ident(name: &str) -> Expr {
        expr(ExprKind::Ident(name.to_string()))
    }

    fn int(text: &str) -> Expr {
        expr(ExprKind::Lit {
            kind: LitKind::Int,
            text: text.to_string(),
        })
    }

    fn stmt(kind: StmtKind) -> Stmt {
        Stmt {
            span: Span::default(),
            kind,
        }
    }

    fn counted_loop(var: &str) -> ForStmt {
        ForStmt {
            init: Some(Box::new(stmt(StmtKind::Assign {
                lhs: vec![ident(var)],
                op: AssignOp::Define,
                rhs: vec![int("0")],
            }))),
            cond: Some(expr(ExprKind::Binary {
                op: BinOp::Lt,
                lhs: Box::new(ident(var)),
                rhs: Box::new(int("5")),
            })),
            post: Some(Box::new(stmt(StmtKind::IncDec {
                target: ident(var),
                inc: true,
            }))),
            body: Block {
                span: Span::default(),
                stmts: vec![stmt(StmtKind::Expr(expr(ExprKind::Call {
                    callee: Box::new(ident("print")),
                    args: vec![
                        expr(ExprKind::Lit {
                            kind: LitKind::Str,
                            text: "\"for\"".to_string(),
                        }),
                        ident(var),
                    ],
                })))],
            },
        }
    }

    #[test]
    fn counted_loop_golden() {
        let info = TypeInfo::new();
        let mut cx = Ctx::new(&info);
        let rendered = render_stmt(&stmt(StmtKind::For(counted_loop("i"))), &mut cx);
        assert_eq!(rendered, "for 0 5 1\n    print \"for\" i\nend");
        assert!(cx.into_diagnostics().is_empty());
    }

    #[test]
    fn discarded_loop_variable_omits_start() {
        let info = TypeInfo::new();
        let mut cx = Ctx::new(&info);
        let rendered = render_stmt(&stmt(StmtKind::For(counted_loop("_"))), &mut cx);
        assert!(rendered.starts_with("for 5 1\n"));
    }

    #[test]
    fn increment_desugars_to_self_assignment() {
        let info = TypeInfo::new();
        let mut cx = Ctx::new(&info);
        let inc = stmt(StmtKind::IncDec {
            target: ident("x"),
            inc: true,
        });
        assert_eq!(render_stmt(&inc, &mut cx), "x = x + 1");
        let dec = stmt(StmtKind::IncDec {
            target: ident("count"),
            inc: false,
        });
        assert_eq!(render_stmt(&dec, &mut cx), "count = count - 1");
    }

    #[test]
    fn goto_is_reported_not_rendered_silently() {
        let info = TypeInfo::new();
        let mut cx = Ctx::new(&info);
        let goto = stmt(StmtKind::Branch {
            kind: BranchKind::Goto,
            label: Some("retry".to_string()),
        });
        let text = render_stmt(&goto, &mut cx);
        assert!(text.contains("unsupported"));
        assert!(cx.into_diagnostics().iter().any(|d| d.is_error()));
    }
}
