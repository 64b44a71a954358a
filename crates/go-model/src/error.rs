// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Front-end failure types. Both carry a byte span into the offending
//! source so callers can render them with a source snippet.

use crate::ast::Span;
use thiserror::Error;

/// Lexical or syntactic failure. Skips translation for the file.
#[derive(Debug, Clone, Error)]
#[error("parse error: {message}")]
pub struct ParseError {
    pub span: Span,
    pub message: String,
}

impl ParseError {
    pub fn new(span: Span, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
        }
    }
}

/// Type-checking failure. Skips translation for the file.
#[derive(Debug, Clone, Error)]
#[error("check error: {message}")]
pub struct CheckError {
    pub span: Span,
    pub message: String,
}

impl CheckError {
    pub fn new(span: Span, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
        }
    }
}
