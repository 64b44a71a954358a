// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Assembles translated top-level declarations into one Evy program.
//!
//! Declarations keep their source order, separated by a blank line.
//! Evy has no implicit entry point, so a declared `main` function gets
//! one explicit invocation line appended after all declarations.

use crate::context::Ctx;
use crate::diagnostics::{Code, Diagnostic};
use crate::expr::render_expr;
use crate::format::{indent_block, normalize};
use crate::stmt::render_block;
use crate::types::map_type;
use go_model::ast::{Decl, DeclKind, FuncDecl, GenKeyword, SourceFile, Span, Spec, TypeExpr, ValueSpec};
use go_model::TypeInfo;
use itertools::Itertools;
use log::debug;

/// The rendered program plus every diagnostic the walk produced. The
/// caller decides whether any of them is fatal.
#[derive(Debug, Clone)]
pub struct Translation {
    pub output: String,
    pub diagnostics: Vec<Diagnostic>,
}

impl Translation {
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(|d| d.is_error())
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| !d.is_error())
    }
}

/// Translate one checked source file. Deterministic: the same input
/// produces byte-identical output.
pub fn translate(file: &SourceFile, info: &TypeInfo) -> Translation {
    debug!(
        "translating package `{}` ({} top-level declarations)",
        file.package,
        file.decls.len()
    );
    let mut cx = Ctx::new(info);
    let mut parts = Vec::new();
    let mut has_main = false;
    for decl in &file.decls {
        if let DeclKind::Func(f) = &decl.kind {
            if f.recv.is_none() && f.name == "main" {
                has_main = true;
            }
        }
        let text = render_decl(decl, &mut cx);
        if !text.is_empty() {
            parts.push(text);
        }
    }
    if has_main {
        parts.push("main".to_string());
    }
    Translation {
        output: normalize(&parts.join("\n\n")),
        diagnostics: cx.into_diagnostics(),
    }
}

/// Render one declaration, top-level or statement-level.
pub(crate) fn render_decl(decl: &Decl, cx: &mut Ctx) -> String {
    match &decl.kind {
        DeclKind::Func(f) => render_func(f, decl.span, cx),
        DeclKind::Gen { keyword, specs } => match keyword {
            // Imports have no target counterpart; type declarations
            // live on only through the type table.
            GenKeyword::Import | GenKeyword::Type => String::new(),
            GenKeyword::Var | GenKeyword::Const => specs
                .iter()
                .filter_map(|s| match s {
                    Spec::Value(v) => Some(render_value_spec(v, cx)),
                    _ => None,
                })
                .filter(|text| !text.is_empty())
                .join("\n"),
        },
    }
}

fn render_func(f: &FuncDecl, span: Span, cx: &mut Ctx) -> String {
    if f.recv.is_some() {
        return cx.unsupported_decl("method declaration", span);
    }

    let mut head = format!("func {}", f.name);
    match f.results.len() {
        0 => {}
        1 => head.push_str(&format!(":{}", evy_type_text(&f.results[0], cx))),
        _ => {
            cx.warning(
                Code::UnsupportedConstruct,
                span,
                format!(
                    "function `{}` declares {} results; only the first is rendered",
                    f.name,
                    f.results.len()
                ),
            );
            head.push_str(&format!(":{}", evy_type_text(&f.results[0], cx)));
        }
    }
    for param in &f.params {
        head.push_str(&format!(" {}:{}", param.name, evy_type_text(&param.ty, cx)));
    }

    let body = render_block(&f.body, cx);
    if body.is_empty() {
        format!("{}\nend", head)
    } else {
        format!("{}\n{}\nend", head, indent_block(&body))
    }
}

/// `var`/`const` specs. With an explicit type each name gets a typed
/// declaration line, followed by plain assignments for any values;
/// without one the values turn into inferred `:=` lines.
fn render_value_spec(spec: &ValueSpec, cx: &mut Ctx) -> String {
    let mut lines = Vec::new();
    match &spec.ty {
        Some(ty) => {
            let evy = evy_type_text(ty, cx);
            for name in &spec.names {
                lines.push(format!("{}:{}", name, evy));
            }
            for (name, value) in spec.names.iter().zip(&spec.values) {
                lines.push(format!("{} = {}", name, render_expr(value, cx)));
            }
        }
        None => {
            for (name, value) in spec.names.iter().zip(&spec.values) {
                lines.push(format!("{} := {}", name, render_expr(value, cx)));
            }
        }
    }
    lines.join("\n")
}

/// Map a declared type through the type mapper; descriptors outside the
/// representable set are reported and rendered as `any`.
fn evy_type_text(ty: &TypeExpr, cx: &mut Ctx) -> String {
    let descriptor = ty.descriptor();
    match map_type(&descriptor) {
        Ok(evy) => evy.to_string(),
        Err(err) => {
            cx.error(Code::UnsupportedType, ty.span, err.to_string());
            "any".to_string()
        }
    }
}
