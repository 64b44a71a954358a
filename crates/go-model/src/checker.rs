// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Minimal type checker for the Go subset.
//!
//! Two passes: package-scope collection (imports, named types, function
//! signatures), then a scoped walk of every initializer and function
//! body. The walk records a type for every expression node it visits —
//! that is the contract the translation backend relies on.

use crate::ast::*;
use crate::error::CheckError;
use crate::types::{GoType, TypeInfo};
use log::debug;
use std::collections::{HashMap, HashSet};

/// Type-check a parsed file and produce its expression type table.
pub fn check(file: &SourceFile) -> Result<TypeInfo, CheckError> {
    let mut checker = Checker::new();
    checker.collect(file)?;
    checker.walk(file)?;
    Ok(checker.info)
}

struct Checker {
    info: TypeInfo,
    scopes: Vec<HashMap<String, GoType>>,
    named_types: HashMap<String, GoType>,
    packages: HashSet<String>,
}

type CResult<T> = Result<T, CheckError>;

impl Checker {
    fn new() -> Self {
        Self {
            info: TypeInfo::new(),
            scopes: vec![HashMap::new()],
            named_types: HashMap::new(),
            packages: HashSet::new(),
        }
    }

    // ------------------------------------------------------------------
    // Scopes
    // ------------------------------------------------------------------

    fn push_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    fn pop_scope(&mut self) {
        self.scopes.pop();
    }

    fn bind(&mut self, name: &str, ty: GoType) {
        if name != "_" {
            self.scopes
                .last_mut()
                .expect("scope stack is never empty")
                .insert(name.to_string(), ty);
        }
    }

    fn lookup(&self, name: &str) -> Option<&GoType> {
        self.scopes.iter().rev().find_map(|s| s.get(name))
    }

    // ------------------------------------------------------------------
    // Pass 1: package scope
    // ------------------------------------------------------------------

    fn collect(&mut self, file: &SourceFile) -> CResult<()> {
        for decl in &file.decls {
            if let DeclKind::Gen {
                keyword: GenKeyword::Import,
                specs,
            } = &decl.kind
            {
                for spec in specs {
                    if let Spec::Import(imp) = spec {
                        let name = imp.alias.clone().unwrap_or_else(|| {
                            imp.path.rsplit('/').next().unwrap_or(&imp.path).to_string()
                        });
                        self.packages.insert(name);
                    }
                }
            }
        }
        for decl in &file.decls {
            if let DeclKind::Gen {
                keyword: GenKeyword::Type,
                specs,
            } = &decl.kind
            {
                for spec in specs {
                    if let Spec::Type(ts) = spec {
                        let mut ty = self.resolve_type(&ts.ty)?;
                        if let GoType::Struct { name, .. } = &mut ty {
                            *name = ts.name.clone();
                        }
                        self.named_types.insert(ts.name.clone(), ty);
                    }
                }
            }
        }
        for decl in &file.decls {
            if let DeclKind::Func(f) = &decl.kind {
                if f.recv.is_none() {
                    let ty = self.func_type(f)?;
                    self.bind(&f.name, ty);
                }
            }
        }
        Ok(())
    }

    fn func_type(&mut self, f: &FuncDecl) -> CResult<GoType> {
        let mut params = Vec::new();
        for p in &f.params {
            params.push(self.resolve_type(&p.ty)?);
        }
        let mut results = Vec::new();
        for r in &f.results {
            results.push(self.resolve_type(r)?);
        }
        Ok(GoType::Func { params, results })
    }

    fn resolve_type(&mut self, ty: &TypeExpr) -> CResult<GoType> {
        match &ty.kind {
            TypeExprKind::Named(name) => match name.as_str() {
                "int" | "int8" | "int16" | "int32" | "int64" | "uint" | "uint8" | "uint16"
                | "uint32" | "uint64" | "byte" | "rune" => Ok(GoType::Int),
                "float32" | "float64" => Ok(GoType::Float),
                "string" => Ok(GoType::Str),
                "bool" => Ok(GoType::Bool),
                "any" => Ok(GoType::Any),
                _ => self
                    .named_types
                    .get(name)
                    .cloned()
                    .ok_or_else(|| CheckError::new(ty.span, format!("unknown type `{}`", name))),
            },
            TypeExprKind::Slice(elem) => {
                Ok(GoType::Slice(Box::new(self.resolve_type(elem)?)))
            }
            TypeExprKind::Array { elem, .. } => {
                Ok(GoType::Array(Box::new(self.resolve_type(elem)?)))
            }
            TypeExprKind::Map { key, value } => Ok(GoType::Map(
                Box::new(self.resolve_type(key)?),
                Box::new(self.resolve_type(value)?),
            )),
            TypeExprKind::Struct { fields } => {
                let mut resolved = Vec::new();
                for f in fields {
                    resolved.push((f.name.clone(), self.resolve_type(&f.ty)?));
                }
                Ok(GoType::Struct {
                    name: String::new(),
                    fields: resolved,
                })
            }
            TypeExprKind::Interface => Ok(GoType::Any),
            // References are value types once translated.
            TypeExprKind::Pointer(inner) => self.resolve_type(inner),
            TypeExprKind::Func { params, results } => {
                let mut ps = Vec::new();
                for p in params {
                    ps.push(self.resolve_type(p)?);
                }
                let mut rs = Vec::new();
                for r in results {
                    rs.push(self.resolve_type(r)?);
                }
                Ok(GoType::Func {
                    params: ps,
                    results: rs,
                })
            }
            TypeExprKind::Chan(_) => Err(CheckError::new(
                ty.span,
                "channel types are not supported",
            )),
        }
    }

    // ------------------------------------------------------------------
    // Pass 2: bodies
    // ------------------------------------------------------------------

    fn walk(&mut self, file: &SourceFile) -> CResult<()> {
        for decl in &file.decls {
            match &decl.kind {
                DeclKind::Gen {
                    keyword: GenKeyword::Var | GenKeyword::Const,
                    specs,
                } => {
                    for spec in specs {
                        if let Spec::Value(vs) = spec {
                            self.check_value_spec(vs)?;
                        }
                    }
                }
                DeclKind::Gen { .. } => {}
                DeclKind::Func(f) => {
                    debug!("checking function `{}`", f.name);
                    self.push_scope();
                    if let Some(recv) = &f.recv {
                        let ty = self.resolve_type(&recv.ty)?;
                        self.bind(&recv.name, ty);
                    }
                    for p in &f.params {
                        let ty = self.resolve_type(&p.ty)?;
                        self.bind(&p.name, ty);
                    }
                    self.check_block(&f.body)?;
                    self.pop_scope();
                }
            }
        }
        Ok(())
    }

    fn check_value_spec(&mut self, spec: &ValueSpec) -> CResult<()> {
        let declared = match &spec.ty {
            Some(ty) => Some(self.resolve_type(ty)?),
            None => None,
        };
        let mut value_types = Vec::new();
        for value in &spec.values {
            value_types.push(self.check_expr(value)?);
        }
        for (i, name) in spec.names.iter().enumerate() {
            let ty = declared
                .clone()
                .or_else(|| value_types.get(i).cloned())
                .unwrap_or(GoType::Any);
            self.bind(name, ty);
        }
        Ok(())
    }

    fn check_block(&mut self, block: &Block) -> CResult<()> {
        self.push_scope();
        for stmt in &block.stmts {
            self.check_stmt(stmt)?;
        }
        self.pop_scope();
        Ok(())
    }

    fn check_stmt(&mut self, stmt: &Stmt) -> CResult<()> {
        match &stmt.kind {
            StmtKind::Expr(e) => {
                self.check_expr(e)?;
            }
            StmtKind::Assign { lhs, op, rhs } => {
                let mut rhs_types = Vec::new();
                for r in rhs {
                    rhs_types.push(self.check_expr(r)?);
                }
                if op.is_define() {
                    for (i, l) in lhs.iter().enumerate() {
                        let ty = rhs_types.get(i).cloned().unwrap_or(GoType::Any);
                        match &l.kind {
                            ExprKind::Ident(name) => {
                                self.bind(name, ty.clone());
                                self.info.record(l.id, ty);
                            }
                            _ => {
                                return Err(CheckError::new(
                                    l.span,
                                    "left side of := must be an identifier",
                                ))
                            }
                        }
                    }
                } else {
                    for l in lhs {
                        self.check_expr(l)?;
                    }
                }
            }
            StmtKind::IncDec { target, .. } => {
                self.check_expr(target)?;
            }
            StmtKind::Decl(decl) => match &decl.kind {
                DeclKind::Gen {
                    keyword: GenKeyword::Var | GenKeyword::Const,
                    specs,
                } => {
                    for spec in specs {
                        if let Spec::Value(vs) = spec {
                            self.check_value_spec(vs)?;
                        }
                    }
                }
                DeclKind::Gen {
                    keyword: GenKeyword::Type,
                    specs,
                } => {
                    for spec in specs {
                        if let Spec::Type(ts) = spec {
                            let mut ty = self.resolve_type(&ts.ty)?;
                            if let GoType::Struct { name, .. } = &mut ty {
                                *name = ts.name.clone();
                            }
                            self.named_types.insert(ts.name.clone(), ty);
                        }
                    }
                }
                DeclKind::Gen { .. } | DeclKind::Func(_) => {}
            },
            StmtKind::Return(values) => {
                for v in values {
                    self.check_expr(v)?;
                }
            }
            StmtKind::If(i) => {
                self.push_scope();
                if let Some(init) = &i.init {
                    self.check_stmt(init)?;
                }
                self.check_expr(&i.cond)?;
                self.check_block(&i.then)?;
                if let Some(els) = &i.els {
                    self.check_stmt(els)?;
                }
                self.pop_scope();
            }
            StmtKind::For(f) => {
                self.push_scope();
                if let Some(init) = &f.init {
                    self.check_stmt(init)?;
                }
                if let Some(cond) = &f.cond {
                    self.check_expr(cond)?;
                }
                if let Some(post) = &f.post {
                    self.check_stmt(post)?;
                }
                self.check_block(&f.body)?;
                self.pop_scope();
            }
            StmtKind::Range(r) => {
                self.push_scope();
                let coll = self.check_expr(&r.collection)?;
                let (key_ty, value_ty) = match coll {
                    GoType::Slice(elem) | GoType::Array(elem) => (GoType::Int, *elem),
                    GoType::Map(key, value) => (*key, *value),
                    GoType::Str => (GoType::Int, GoType::Str),
                    GoType::Any => (GoType::Any, GoType::Any),
                    other => {
                        return Err(CheckError::new(
                            r.collection.span,
                            format!("cannot range over `{}`", other.descriptor()),
                        ))
                    }
                };
                if let Some(key) = &r.key {
                    if let ExprKind::Ident(name) = &key.kind {
                        if r.define {
                            self.bind(name, key_ty.clone());
                        }
                    }
                    self.info.record(key.id, key_ty);
                }
                if let Some(value) = &r.value {
                    if let ExprKind::Ident(name) = &value.kind {
                        if r.define {
                            self.bind(name, value_ty.clone());
                        }
                    }
                    self.info.record(value.id, value_ty);
                }
                self.check_block(&r.body)?;
                self.pop_scope();
            }
            StmtKind::Switch(s) => {
                self.push_scope();
                if let Some(init) = &s.init {
                    self.check_stmt(init)?;
                }
                if let Some(tag) = &s.tag {
                    self.check_expr(tag)?;
                }
                if let Some(subject) = &s.subject {
                    self.check_expr(subject)?;
                }
                for case in &s.cases {
                    match &case.labels {
                        CaseLabels::Exprs(exprs) => {
                            for e in exprs {
                                self.check_expr(e)?;
                            }
                        }
                        CaseLabels::Types(types) => {
                            for t in types {
                                self.resolve_type(t)?;
                            }
                        }
                        CaseLabels::Default => {}
                    }
                    self.push_scope();
                    for stmt in &case.body {
                        self.check_stmt(stmt)?;
                    }
                    self.pop_scope();
                }
                self.pop_scope();
            }
            StmtKind::Branch { .. } | StmtKind::Empty => {}
            StmtKind::Block(b) => self.check_block(b)?,
            StmtKind::Labeled { stmt, .. } => self.check_stmt(stmt)?,
            StmtKind::Go(e) | StmtKind::Defer(e) => {
                self.check_expr(e)?;
            }
            StmtKind::Send { chan, value } => {
                self.check_expr(chan)?;
                self.check_expr(value)?;
            }
        }
        Ok(())
    }

    fn check_expr(&mut self, expr: &Expr) -> CResult<GoType> {
        let ty = self.expr_type(expr)?;
        self.info.record(expr.id, ty.clone());
        Ok(ty)
    }

    fn expr_type(&mut self, expr: &Expr) -> CResult<GoType> {
        match &expr.kind {
            ExprKind::Ident(name) => match name.as_str() {
                "true" | "false" => Ok(GoType::Bool),
                "nil" => Ok(GoType::Any),
                "print" | "println" | "printf" => Ok(GoType::Func {
                    params: Vec::new(),
                    results: Vec::new(),
                }),
                "len" | "cap" => Ok(GoType::Func {
                    params: Vec::new(),
                    results: vec![GoType::Int],
                }),
                "append" => Ok(GoType::Func {
                    params: Vec::new(),
                    results: Vec::new(),
                }),
                _ => {
                    if let Some(ty) = self.lookup(name) {
                        Ok(ty.clone())
                    } else if self.packages.contains(name) {
                        Ok(GoType::Package(name.clone()))
                    } else {
                        Err(CheckError::new(
                            expr.span,
                            format!("undefined identifier `{}`", name),
                        ))
                    }
                }
            },
            ExprKind::Lit { kind, .. } => Ok(match kind {
                LitKind::Int | LitKind::Char => GoType::Int,
                LitKind::Float => GoType::Float,
                LitKind::Str => GoType::Str,
            }),
            ExprKind::Binary { op, lhs, rhs } => {
                let lt = self.check_expr(lhs)?;
                let rt = self.check_expr(rhs)?;
                Ok(match op {
                    BinOp::Eq
                    | BinOp::Ne
                    | BinOp::Lt
                    | BinOp::Gt
                    | BinOp::Le
                    | BinOp::Ge
                    | BinOp::And
                    | BinOp::Or => GoType::Bool,
                    _ => {
                        if lt == GoType::Any {
                            rt
                        } else {
                            lt
                        }
                    }
                })
            }
            ExprKind::Unary { op, operand } => {
                let ot = self.check_expr(operand)?;
                Ok(match op {
                    UnOp::Not => GoType::Bool,
                    UnOp::Neg | UnOp::Plus => ot,
                    UnOp::Addr | UnOp::Deref | UnOp::Recv => GoType::Any,
                })
            }
            ExprKind::Paren(inner) => self.check_expr(inner),
            ExprKind::Call { callee, args } => {
                // Builtins whose result depends on their arguments.
                if let ExprKind::Ident(name) = &callee.kind {
                    if name == "append" {
                        self.check_expr(callee)?;
                        let mut first = GoType::Any;
                        for (i, arg) in args.iter().enumerate() {
                            let ty = self.check_expr(arg)?;
                            if i == 0 {
                                first = ty;
                            }
                        }
                        return Ok(first);
                    }
                }
                let callee_ty = self.check_expr(callee)?;
                for arg in args {
                    self.check_expr(arg)?;
                }
                Ok(match callee_ty {
                    GoType::Func { results, .. } => match results.len() {
                        0 => GoType::Unit,
                        _ => results[0].clone(),
                    },
                    _ => GoType::Any,
                })
            }
            ExprKind::Selector { base, member } => {
                let base_ty = self.check_expr(base)?;
                if let GoType::Package(pkg) = &base_ty {
                    return Ok(self.package_member(pkg, member));
                }
                if matches!(base_ty, GoType::Struct { .. }) {
                    return base_ty.field(member).cloned().ok_or_else(|| {
                        CheckError::new(
                            expr.span,
                            format!("unknown field `{}` on `{}`", member, base_ty.descriptor()),
                        )
                    });
                }
                Ok(GoType::Any)
            }
            ExprKind::Index { base, index } => {
                let base_ty = self.check_expr(base)?;
                self.check_expr(index)?;
                match base_ty {
                    GoType::Slice(elem) | GoType::Array(elem) => Ok(*elem),
                    GoType::Map(_, value) => Ok(*value),
                    GoType::Str => Ok(GoType::Str),
                    GoType::Any => Ok(GoType::Any),
                    other => Err(CheckError::new(
                        expr.span,
                        format!("cannot index `{}`", other.descriptor()),
                    )),
                }
            }
            ExprKind::Slice { base, low, high } => {
                let base_ty = self.check_expr(base)?;
                if let Some(low) = low {
                    self.check_expr(low)?;
                }
                if let Some(high) = high {
                    self.check_expr(high)?;
                }
                Ok(base_ty)
            }
            ExprKind::Composite { ty, elems } => {
                let resolved = self.resolve_type(ty)?;
                for elem in elems {
                    if let Some(key) = &elem.key {
                        match &resolved {
                            GoType::Struct { .. } => {
                                // Struct keys are field names, not value
                                // expressions; record the field's type.
                                let field_ty = match &key.kind {
                                    ExprKind::Ident(name) => {
                                        resolved.field(name).cloned().unwrap_or(GoType::Any)
                                    }
                                    _ => GoType::Any,
                                };
                                self.info.record(key.id, field_ty);
                            }
                            _ => {
                                self.check_expr(key)?;
                            }
                        }
                    }
                    self.check_expr(&elem.value)?;
                }
                Ok(resolved)
            }
            ExprKind::TypeAssert { base, ty } => {
                self.check_expr(base)?;
                self.resolve_type(ty)
            }
            ExprKind::FuncLit {
                params,
                results,
                body,
            } => {
                let mut param_tys = Vec::new();
                self.push_scope();
                for p in params {
                    let ty = self.resolve_type(&p.ty)?;
                    self.bind(&p.name, ty.clone());
                    param_tys.push(ty);
                }
                let mut result_tys = Vec::new();
                for r in results {
                    result_tys.push(self.resolve_type(r)?);
                }
                self.check_block(body)?;
                self.pop_scope();
                Ok(GoType::Func {
                    params: param_tys,
                    results: result_tys,
                })
            }
        }
    }

    fn package_member(&self, pkg: &str, member: &str) -> GoType {
        if pkg == "fmt" {
            match member {
                "Sprintf" | "Sprint" | "Sprintln" => {
                    return GoType::Func {
                        params: Vec::new(),
                        results: vec![GoType::Str],
                    }
                }
                _ => {}
            }
        }
        GoType::Func {
            params: Vec::new(),
            results: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    fn checked(src: &str) -> (SourceFile, TypeInfo) {
        let file = parse(src).expect("parse failed");
        let info = check(&file).expect("check failed");
        (file, info)
    }

    fn find_composite(stmts: &[Stmt]) -> &Expr {
        for stmt in stmts {
            if let StmtKind::Assign { rhs, .. } = &stmt.kind {
                if matches!(rhs[0].kind, ExprKind::Composite { .. }) {
                    return &rhs[0];
                }
            }
        }
        panic!("no composite literal found");
    }

    fn body_of<'a>(file: &'a SourceFile, name: &str) -> &'a Vec<Stmt> {
        for decl in &file.decls {
            if let DeclKind::Func(f) = &decl.kind {
                if f.name == name {
                    return &f.body.stmts;
                }
            }
        }
        panic!("function `{}` not found", name);
    }

    #[test]
    fn slice_literal_resolves_to_slice_type() {
        let (file, info) = checked(
            "package main\n\nfunc main() {\n\tnums := []int{1, 2, 3}\n\tprint(nums)\n}\n",
        );
        let lit = find_composite(body_of(&file, "main"));
        assert_eq!(
            info.type_of(lit.id),
            Some(&GoType::Slice(Box::new(GoType::Int)))
        );
    }

    #[test]
    fn named_struct_literal_resolves_structurally() {
        let (file, info) = checked(
            "package main\n\ntype point struct {\n\tx, y int\n}\n\nfunc main() {\n\tp := point{x: 1, y: 2}\n\tprint(p.x)\n}\n",
        );
        let lit = find_composite(body_of(&file, "main"));
        match info.type_of(lit.id) {
            Some(GoType::Struct { name, fields }) => {
                assert_eq!(name, "point");
                assert_eq!(fields.len(), 2);
            }
            other => panic!("expected struct type, got {:?}", other),
        }
    }

    #[test]
    fn undefined_identifier_is_a_check_error() {
        let file = parse("package main\n\nfunc main() {\n\tprint(missing)\n}\n").unwrap();
        assert!(check(&file).is_err());
    }

    #[test]
    fn range_binds_key_and_value() {
        let (_, info) = checked(
            "package main\n\nfunc main() {\n\tm := map[string]int{\"a\": 1}\n\tfor k, v := range m {\n\t\tprint(k, v)\n\t}\n}\n",
        );
        // Both loop variables and the prints they feed were typed.
        assert!(!info.is_empty());
    }

    #[test]
    fn function_results_flow_into_calls() {
        let (file, info) = checked(
            "package main\n\nfunc add(a, b int) int {\n\treturn a + b\n}\n\nfunc main() {\n\tx := add(1, 2)\n\tprint(x)\n}\n",
        );
        // The call expression itself carries the result type.
        let body = body_of(&file, "main");
        if let StmtKind::Assign { rhs, .. } = &body[0].kind {
            assert_eq!(info.type_of(rhs[0].id), Some(&GoType::Int));
        } else {
            panic!("expected assignment");
        }
    }
}
