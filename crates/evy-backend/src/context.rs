// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Shared rendering state: the read-only type table plus the diagnostic
//! sink. The renderers never mutate anything else.

use crate::diagnostics::{Code, Diagnostic};
use go_model::ast::Span;
use go_model::TypeInfo;
use log::warn;

pub struct Ctx<'a> {
    pub(crate) info: &'a TypeInfo,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> Ctx<'a> {
    pub fn new(info: &'a TypeInfo) -> Self {
        Self {
            info,
            diagnostics: Vec::new(),
        }
    }

    pub(crate) fn error(&mut self, code: Code, span: Span, message: impl Into<String>) {
        self.diagnostics.push(Diagnostic::error(code, span, message));
    }

    pub(crate) fn warning(&mut self, code: Code, span: Span, message: impl Into<String>) {
        let diagnostic = Diagnostic::warning(code, span, message);
        warn!("{}", diagnostic);
        self.diagnostics.push(diagnostic);
    }

    /// Record an unsupported statement or declaration kind and return
    /// its inline marker text.
    pub(crate) fn unsupported_stmt(&mut self, kind: &str, span: Span) -> String {
        self.error(
            Code::UnsupportedConstruct,
            span,
            format!("no translation rule for {}", kind),
        );
        format!("/* unsupported statement: {} */", kind)
    }

    /// Record an unsupported expression kind and return its inline
    /// marker text.
    pub(crate) fn unsupported_expr(&mut self, kind: &str, span: Span) -> String {
        self.error(
            Code::UnsupportedConstruct,
            span,
            format!("no translation rule for {}", kind),
        );
        format!("/* unsupported expression: {} */", kind)
    }

    /// Record an unsupported declaration kind and return its inline
    /// marker text.
    pub(crate) fn unsupported_decl(&mut self, kind: &str, span: Span) -> String {
        self.error(
            Code::UnsupportedConstruct,
            span,
            format!("no translation rule for {}", kind),
        );
        format!("/* unsupported declaration: {} */", kind)
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}
