// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Front end for the Go subset consumed by the Evy backend.
//!
//! The external contract has two halves:
//! [`parse`] turns source text into a [`SourceFile`](ast::SourceFile) or
//! a [`ParseError`](error::ParseError); [`check`] turns a parsed file
//! into the read-only [`TypeInfo`](types::TypeInfo) table or a
//! [`CheckError`](error::CheckError). Every expression node reachable
//! from a well-formed file has an entry in the table.

pub mod ast;
pub mod checker;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod types;

pub use checker::check;
pub use error::{CheckError, ParseError};
pub use parser::parse;
pub use types::{GoType, TypeInfo};
