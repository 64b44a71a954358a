//! Front-end contract tests over small source snippets.

use go_model::ast::{DeclKind, Expr, ExprKind, SourceFile, Stmt, StmtKind};
use go_model::{check, parse, TypeInfo};

fn front_end(src: &str) -> (SourceFile, TypeInfo) {
    let file = parse(src).expect("parse failed");
    let info = check(&file).expect("check failed");
    (file, info)
}

/// Walk every expression reachable from a statement list.
fn collect_exprs<'a>(stmts: &'a [Stmt], out: &mut Vec<&'a Expr>) {
    fn expr<'a>(e: &'a Expr, out: &mut Vec<&'a Expr>) {
        out.push(e);
        match &e.kind {
            ExprKind::Binary { lhs, rhs, .. } => {
                expr(lhs, out);
                expr(rhs, out);
            }
            ExprKind::Unary { operand, .. } => expr(operand, out),
            ExprKind::Paren(inner) => expr(inner, out),
            ExprKind::Call { callee, args } => {
                expr(callee, out);
                for a in args {
                    expr(a, out);
                }
            }
            ExprKind::Selector { base, .. } => expr(base, out),
            ExprKind::Index { base, index } => {
                expr(base, out);
                expr(index, out);
            }
            ExprKind::Slice { base, low, high } => {
                expr(base, out);
                if let Some(low) = low {
                    expr(low, out);
                }
                if let Some(high) = high {
                    expr(high, out);
                }
            }
            ExprKind::Composite { elems, .. } => {
                for elem in elems {
                    if let Some(key) = &elem.key {
                        expr(key, out);
                    }
                    expr(&elem.value, out);
                }
            }
            ExprKind::TypeAssert { base, .. } => expr(base, out),
            ExprKind::FuncLit { body, .. } => collect_exprs(&body.stmts, out),
            ExprKind::Ident(_) | ExprKind::Lit { .. } => {}
        }
    }
    for stmt in stmts {
        match &stmt.kind {
            StmtKind::Expr(e) => expr(e, out),
            StmtKind::Assign { lhs, rhs, .. } => {
                for e in lhs {
                    expr(e, out);
                }
                for e in rhs {
                    expr(e, out);
                }
            }
            StmtKind::IncDec { target, .. } => expr(target, out),
            StmtKind::Return(values) => {
                for e in values {
                    expr(e, out);
                }
            }
            StmtKind::If(i) => {
                expr(&i.cond, out);
                collect_exprs(&i.then.stmts, out);
                if let Some(els) = &i.els {
                    collect_exprs(std::slice::from_ref(els.as_ref()), out);
                }
            }
            StmtKind::For(f) => {
                if let Some(init) = &f.init {
                    collect_exprs(std::slice::from_ref(init.as_ref()), out);
                }
                if let Some(cond) = &f.cond {
                    expr(cond, out);
                }
                if let Some(post) = &f.post {
                    collect_exprs(std::slice::from_ref(post.as_ref()), out);
                }
                collect_exprs(&f.body.stmts, out);
            }
            StmtKind::Range(r) => {
                if let Some(key) = &r.key {
                    expr(key, out);
                }
                if let Some(value) = &r.value {
                    expr(value, out);
                }
                expr(&r.collection, out);
                collect_exprs(&r.body.stmts, out);
            }
            StmtKind::Switch(s) => {
                if let Some(tag) = &s.tag {
                    expr(tag, out);
                }
                if let Some(subject) = &s.subject {
                    expr(subject, out);
                }
                for case in &s.cases {
                    if let go_model::ast::CaseLabels::Exprs(exprs) = &case.labels {
                        for e in exprs {
                            expr(e, out);
                        }
                    }
                    collect_exprs(&case.body, out);
                }
            }
            StmtKind::Block(b) => collect_exprs(&b.stmts, out),
            StmtKind::Labeled { stmt, .. } => {
                collect_exprs(std::slice::from_ref(stmt.as_ref()), out)
            }
            StmtKind::Go(e) | StmtKind::Defer(e) => expr(e, out),
            StmtKind::Send { chan, value } => {
                expr(chan, out);
                expr(value, out);
            }
            StmtKind::Decl(_) | StmtKind::Branch { .. } | StmtKind::Empty => {}
        }
    }
}

#[test]
fn every_reachable_expression_has_a_type_entry() {
    let (file, info) = front_end(
        "package main\n\nfunc classify(n int) string {\n\tif n < 0 {\n\t\treturn \"negative\"\n\t} else if n == 0 {\n\t\treturn \"zero\"\n\t}\n\treturn \"positive\"\n}\n\nfunc main() {\n\tnums := []int{1, -2, 0}\n\tfor _, n := range nums {\n\t\tprint(classify(n))\n\t}\n}\n",
    );
    let mut exprs = Vec::new();
    for decl in &file.decls {
        if let DeclKind::Func(f) = &decl.kind {
            collect_exprs(&f.body.stmts, &mut exprs);
        }
    }
    assert!(!exprs.is_empty());
    for e in exprs {
        assert!(
            info.type_of(e.id).is_some(),
            "missing type entry for {} at {:?}",
            e.kind.name(),
            e.span
        );
    }
}

#[test]
fn parse_then_check_rejects_bad_syntax_and_bad_names_separately() {
    assert!(parse("package main\n\nfunc main() {\n\tif {\n}\n").is_err());

    let file = parse("package main\n\nfunc main() {\n\tprint(missing)\n}\n").unwrap();
    assert!(check(&file).is_err());
}

#[test]
fn semicolon_insertion_lets_statements_end_at_newlines() {
    let (file, _) = front_end(
        "package main\n\nfunc main() {\n\tx := 1\n\ty := 2\n\tprint(x + y)\n}\n",
    );
    if let DeclKind::Func(f) = &file.decls[0].kind {
        assert_eq!(f.body.stmts.len(), 3);
    } else {
        panic!("expected function declaration");
    }
}
