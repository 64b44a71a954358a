// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Evy rendering backend - pure translation with minimal logic.
//!
//! This crate takes the checked syntax tree and type table produced by
//! `go-model` and renders Evy text. The renderers are intentionally
//! "dumb": they pattern match node kinds and emit corresponding Evy
//! text, consulting the type table only where a construct is
//! polymorphic (composite literals) and never performing inference of
//! their own.
//!
//! Unsupported input never aborts the walk; it surfaces as structured
//! [`Diagnostic`]s attached to the [`Translation`], and the caller
//! decides what is fatal.

mod context;
mod expr;
mod stmt;

pub mod diagnostics;
pub mod format;
pub mod loops;
pub mod operators;
pub mod program;
pub mod types;

pub use diagnostics::{Code, Diagnostic, Severity};
pub use program::{translate, Translation};
pub use types::{map_type, EvyType, UnsupportedType};
