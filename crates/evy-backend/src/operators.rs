// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Table-driven operator mapping.
//!
//! The table is total over the translatable operator set; anything
//! outside it yields the [`ILLEGAL_OPERATOR`] sentinel so translation
//! degrades instead of aborting. The caller is responsible for
//! recording the accompanying diagnostic.

use go_model::ast::{BinOp, UnOp};
use once_cell::sync::Lazy;
use std::collections::BTreeMap;

/// Sentinel token emitted in place of an operator with no Evy
/// counterpart.
pub const ILLEGAL_OPERATOR: &str = "ILLEGAL";

static BINARY_OPS: Lazy<BTreeMap<BinOp, &'static str>> = Lazy::new(|| {
    BTreeMap::from([
        (BinOp::Add, "+"),
        (BinOp::Sub, "-"),
        (BinOp::Mul, "*"),
        (BinOp::Div, "/"),
        (BinOp::Rem, "%"),
        (BinOp::Eq, "=="),
        (BinOp::Ne, "!="),
        (BinOp::Lt, "<"),
        (BinOp::Gt, ">"),
        (BinOp::Le, "<="),
        (BinOp::Ge, ">="),
        (BinOp::And, "&&"),
        (BinOp::Or, "||"),
    ])
});

/// Map a binary operator; `None` means the sentinel applies.
pub fn map_binary(op: BinOp) -> Option<&'static str> {
    BINARY_OPS.get(&op).copied()
}

/// Map a unary operator; `None` means the operator has no rendering at
/// all (the caller emits an unsupported-expression marker instead).
/// Unary plus maps to the empty prefix.
pub fn map_unary(op: UnOp) -> Option<&'static str> {
    match op {
        UnOp::Neg => Some("-"),
        UnOp::Not => Some("!"),
        UnOp::Plus => Some(""),
        UnOp::Addr | UnOp::Deref | UnOp::Recv => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRANSLATABLE: [(BinOp, &str); 13] = [
        (BinOp::Add, "+"),
        (BinOp::Sub, "-"),
        (BinOp::Mul, "*"),
        (BinOp::Div, "/"),
        (BinOp::Rem, "%"),
        (BinOp::Eq, "=="),
        (BinOp::Ne, "!="),
        (BinOp::Lt, "<"),
        (BinOp::Gt, ">"),
        (BinOp::Le, "<="),
        (BinOp::Ge, ">="),
        (BinOp::And, "&&"),
        (BinOp::Or, "||"),
    ];

    #[test]
    fn table_is_total_over_the_translatable_set() {
        for (op, expected) in TRANSLATABLE {
            assert_eq!(map_binary(op), Some(expected), "{:?}", op);
        }
    }

    #[test]
    fn operators_outside_the_set_hit_the_sentinel() {
        for op in [BinOp::BitAnd, BinOp::BitOr, BinOp::BitXor, BinOp::Shl, BinOp::Shr] {
            assert_eq!(map_binary(op), None, "{:?}", op);
        }
    }

    #[test]
    fn unary_minus_and_not_are_mapped() {
        assert_eq!(map_unary(UnOp::Neg), Some("-"));
        assert_eq!(map_unary(UnOp::Not), Some("!"));
        assert_eq!(map_unary(UnOp::Addr), None);
    }
}
