// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Loop-shape classification, decoupled from rendering so the tie-break
//! rules are independently testable.

use go_model::ast::{AssignOp, BinOp, Expr, ExprKind, ForStmt, StmtKind};

/// The normalized shape of a `for` statement.
#[derive(Debug)]
pub enum LoopShape<'a> {
    /// No initializer and no post statement: a condition-only loop.
    /// `cond` is `None` for the bare infinite `for { }`.
    While { cond: Option<&'a Expr> },
    /// `i := start; i < stop; i++` (or `<=`): a bounded counted loop
    /// with unit step.
    Counted {
        var: &'a str,
        start: &'a Expr,
        stop: &'a Expr,
    },
    /// Anything else; rendered by the documented best-effort fallback.
    Generic,
}

/// Classify a loop. Tie-break order: condition-only first, then the
/// counted shape, then the generic fallback.
pub fn classify(stmt: &ForStmt) -> LoopShape<'_> {
    if stmt.init.is_none() && stmt.post.is_none() {
        return LoopShape::While {
            cond: stmt.cond.as_ref(),
        };
    }

    if let (Some(init), Some(cond), Some(post)) = (&stmt.init, &stmt.cond, &stmt.post) {
        if let Some((var, start)) = define_of(&init.kind) {
            if let Some((cond_var, stop)) = upper_bound_of(&cond.kind) {
                if let Some(inc_var) = unit_increment_of(&post.kind) {
                    if cond_var == var && inc_var == var {
                        return LoopShape::Counted { var, start, stop };
                    }
                }
            }
        }
    }

    LoopShape::Generic
}

/// `i := start` with a single identifier target.
fn define_of(kind: &StmtKind) -> Option<(&str, &Expr)> {
    match kind {
        StmtKind::Assign {
            lhs,
            op: AssignOp::Define,
            rhs,
        } if lhs.len() == 1 && rhs.len() == 1 => match &lhs[0].kind {
            ExprKind::Ident(name) => Some((name, &rhs[0])),
            _ => None,
        },
        _ => None,
    }
}

/// `i < stop` or `i <= stop`.
fn upper_bound_of(kind: &ExprKind) -> Option<(&str, &Expr)> {
    match kind {
        ExprKind::Binary {
            op: BinOp::Lt | BinOp::Le,
            lhs,
            rhs,
        } => match &lhs.kind {
            ExprKind::Ident(name) => Some((name, rhs)),
            _ => None,
        },
        _ => None,
    }
}

/// `i++`.
fn unit_increment_of(kind: &StmtKind) -> Option<&str> {
    match kind {
        StmtKind::IncDec { target, inc: true } => match &target.kind {
            ExprKind::Ident(name) => Some(name),
            _ => None,
        },
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use go_model::ast::{DeclKind, SourceFile, Stmt};
    use go_model::parse;

    fn first_for(file: &SourceFile) -> &ForStmt {
        fn scan(stmts: &[Stmt]) -> Option<&ForStmt> {
            for stmt in stmts {
                if let StmtKind::For(f) = &stmt.kind {
                    return Some(f);
                }
            }
            None
        }
        for decl in &file.decls {
            if let DeclKind::Func(f) = &decl.kind {
                if let Some(found) = scan(&f.body.stmts) {
                    return found;
                }
            }
        }
        panic!("no for statement in fixture");
    }

    fn classify_src(body: &str) -> String {
        let src = format!("package main\n\nfunc main() {{\n\tx := 0\n\t{}\n}}\n", body);
        let file = parse(&src).expect("parse failed");
        match classify(first_for(&file)) {
            LoopShape::While { cond } => {
                format!("while(cond={})", cond.is_some())
            }
            LoopShape::Counted { var, .. } => format!("counted({})", var),
            LoopShape::Generic => "generic".to_string(),
        }
    }

    #[test]
    fn condition_only_loop_is_while() {
        assert_eq!(classify_src("for x < 10 {\n\t\tx++\n\t}"), "while(cond=true)");
    }

    #[test]
    fn bare_loop_is_while_without_condition() {
        assert_eq!(classify_src("for {\n\t\tx++\n\t}"), "while(cond=false)");
    }

    #[test]
    fn canonical_counted_loop_is_counted() {
        assert_eq!(
            classify_src("for i := 0; i < 5; i++ {\n\t\tx++\n\t}"),
            "counted(i)"
        );
    }

    #[test]
    fn less_or_equal_bound_is_still_counted() {
        assert_eq!(
            classify_src("for i := 1; i <= 9; i++ {\n\t\tx++\n\t}"),
            "counted(i)"
        );
    }

    #[test]
    fn decrementing_loop_falls_back_to_generic() {
        assert_eq!(
            classify_src("for i := 9; i > 0; i-- {\n\t\tx++\n\t}"),
            "generic"
        );
    }

    #[test]
    fn mismatched_variables_fall_back_to_generic() {
        assert_eq!(
            classify_src("for i := 0; x < 5; i++ {\n\t\tx++\n\t}"),
            "generic"
        );
    }

    #[test]
    fn while_shape_wins_over_counted_when_clauses_are_absent() {
        // `i < 5` alone could be read as a counted bound, but with no
        // init and no post the condition-only rule applies first.
        assert_eq!(classify_src("for x < 5 {\n\t\tx++\n\t}"), "while(cond=true)");
    }
}
