// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Structural types and the expression → type table.
//!
//! [`TypeInfo`] is the read-only half of the front-end contract: the
//! checker records a type for every expression node it walks, and the
//! translation backend only ever reads it.

use crate::ast::NodeId;
use std::collections::HashMap;

/// Resolved static type of an expression.
#[derive(Debug, Clone, PartialEq)]
pub enum GoType {
    Int,
    Float,
    Str,
    Bool,
    /// The empty interface / `any`.
    Any,
    Slice(Box<GoType>),
    Array(Box<GoType>),
    Map(Box<GoType>, Box<GoType>),
    Struct {
        /// Declared name; empty for anonymous struct types.
        name: String,
        fields: Vec<(String, GoType)>,
    },
    Func {
        params: Vec<GoType>,
        results: Vec<GoType>,
    },
    /// The "type" of an expression with no value (e.g. a call to a
    /// function without results).
    Unit,
    /// An imported package name used as a selector qualifier.
    Package(String),
}

impl GoType {
    /// Go textual descriptor of this type, in the shape the backend's
    /// type mapper consumes (`[]int`, `map[string]bool`, ...). Named
    /// struct types render as their bare name; the mapper rejects those
    /// and callers fall back to the structural variant instead.
    pub fn descriptor(&self) -> String {
        match self {
            GoType::Int => "int".to_string(),
            GoType::Float => "float64".to_string(),
            GoType::Str => "string".to_string(),
            GoType::Bool => "bool".to_string(),
            GoType::Any => "interface{}".to_string(),
            GoType::Slice(elem) => format!("[]{}", elem.descriptor()),
            GoType::Array(elem) => format!("[]{}", elem.descriptor()),
            GoType::Map(key, value) => {
                format!("map[{}]{}", key.descriptor(), value.descriptor())
            }
            GoType::Struct { name, fields } => {
                if !name.is_empty() {
                    name.clone()
                } else {
                    let fields = fields
                        .iter()
                        .map(|(n, t)| format!("{} {}", n, t.descriptor()))
                        .collect::<Vec<_>>()
                        .join("; ");
                    format!("struct{{{}}}", fields)
                }
            }
            GoType::Func { .. } => "func".to_string(),
            GoType::Unit => "()".to_string(),
            GoType::Package(name) => format!("package {}", name),
        }
    }

    /// Field type lookup for struct types.
    pub fn field(&self, name: &str) -> Option<&GoType> {
        match self {
            GoType::Struct { fields, .. } => {
                fields.iter().find(|(n, _)| n == name).map(|(_, t)| t)
            }
            _ => None,
        }
    }
}

/// Read-only expression → type table supplied to the backend.
///
/// Every expression node reachable from a well-formed input has an
/// entry; a missing entry on a path the backend actually exercises is a
/// front-end contract violation, not a translation bug.
#[derive(Debug, Default)]
pub struct TypeInfo {
    types: HashMap<NodeId, GoType>,
}

impl TypeInfo {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record(&mut self, id: NodeId, ty: GoType) {
        self.types.insert(id, ty);
    }

    pub fn type_of(&self, id: NodeId) -> Option<&GoType> {
        self.types.get(&id)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}
