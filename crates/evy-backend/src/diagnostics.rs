// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Structured diagnostics attached to a translation.
//!
//! Every unsupported-input condition is reported this way; none of them
//! abort the walk. The caller decides fatality — the CLI driver treats
//! any `Error` as fatal for the file and discards the artifact, which
//! keeps one file's failure isolated from the rest of a batch.

use codespan_reporting::diagnostic as cs;
use go_model::ast::Span;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Error,
}

/// What went wrong, independent of the message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Code {
    /// A node kind with no translation rule.
    UnsupportedConstruct,
    /// A type descriptor outside the representable set.
    UnsupportedType,
    /// An operator outside the mapping table; output carries the
    /// sentinel token.
    UnknownOperator,
}

impl Code {
    pub fn as_str(self) -> &'static str {
        match self {
            Code::UnsupportedConstruct => "unsupported-construct",
            Code::UnsupportedType => "unsupported-type",
            Code::UnknownOperator => "unknown-operator",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub code: Code,
    pub message: String,
    pub span: Span,
}

impl Diagnostic {
    pub fn error(code: Code, span: Span, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code,
            message: message.into(),
            span,
        }
    }

    pub fn warning(code: Code, span: Span, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            message: message.into(),
            span,
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    /// Convert for rendering with codespan-reporting against a
    /// `SimpleFile`.
    pub fn to_codespan(&self) -> cs::Diagnostic<()> {
        let base = match self.severity {
            Severity::Error => cs::Diagnostic::error(),
            Severity::Warning => cs::Diagnostic::warning(),
        };
        base.with_message(self.message.clone())
            .with_code(self.code.as_str())
            .with_labels(vec![cs::Label::primary(
                (),
                self.span.start as usize..self.span.end as usize,
            )])
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let severity = match self.severity {
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        write!(f, "{} [{}]: {}", severity, self.code.as_str(), self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_carries_code_and_severity() {
        let d = Diagnostic::warning(
            Code::UnknownOperator,
            Span::default(),
            "operator `<<` has no Evy equivalent",
        );
        assert_eq!(
            d.to_string(),
            "warning [unknown-operator]: operator `<<` has no Evy equivalent"
        );
        assert!(!d.is_error());
    }
}
