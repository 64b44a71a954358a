// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Maps Go textual type descriptors into the closed Evy type
//! vocabulary. Pure translation - no inference, just priority rules
//! over the descriptor text.

use std::fmt;
use thiserror::Error;

/// The closed type vocabulary of the output language. Maps are
/// string-keyed by construction; the value type is the only parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EvyType {
    Num,
    Str,
    Bool,
    Any,
    Array(Box<EvyType>),
    Map(Box<EvyType>),
}

impl fmt::Display for EvyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvyType::Num => write!(f, "num"),
            EvyType::Str => write!(f, "string"),
            EvyType::Bool => write!(f, "bool"),
            EvyType::Any => write!(f, "any"),
            EvyType::Array(elem) => write!(f, "[]{}", elem),
            EvyType::Map(value) => write!(f, "{{}}{}", value),
        }
    }
}

/// A descriptor outside the representable set. Fatal for the file under
/// the driver's policy.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported type descriptor `{0}`")]
pub struct UnsupportedType(pub String);

/// Map a Go type descriptor (`[]int`, `map[string]bool`, ...) to an Evy
/// type.
///
/// Structured shapes are peeled first so that e.g. `map[int]string` is
/// rejected for its key rather than accepted for the `int` in its
/// element text. Named and struct descriptors are out of scope here;
/// those are resolved structurally through the type table instead.
pub fn map_type(descriptor: &str) -> Result<EvyType, UnsupportedType> {
    let desc = descriptor.trim();
    if let Some(rest) = desc.strip_prefix("[]") {
        return Ok(EvyType::Array(Box::new(map_type(rest)?)));
    }
    if let Some(rest) = desc.strip_prefix("map[string]") {
        return Ok(EvyType::Map(Box::new(map_type(rest)?)));
    }
    if desc.starts_with("map[") {
        // Non-string map keys have no Evy counterpart.
        return Err(UnsupportedType(descriptor.to_string()));
    }
    match desc {
        "string" => return Ok(EvyType::Str),
        "bool" => return Ok(EvyType::Bool),
        "any" | "interface{}" => return Ok(EvyType::Any),
        _ => {}
    }
    if desc.contains("int") || desc.contains("float") {
        return Ok(EvyType::Num);
    }
    Err(UnsupportedType(descriptor.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_descriptors_map_to_num() {
        for d in ["int", "int64", "uint8", "float32", "float64"] {
            assert_eq!(map_type(d), Ok(EvyType::Num));
        }
    }

    #[test]
    fn slice_of_int_maps_to_array_of_num() {
        assert_eq!(
            map_type("[]int"),
            Ok(EvyType::Array(Box::new(EvyType::Num)))
        );
    }

    #[test]
    fn string_keyed_map_maps_recursively() {
        assert_eq!(
            map_type("map[string]string"),
            Ok(EvyType::Map(Box::new(EvyType::Str)))
        );
        assert_eq!(
            map_type("map[string][]bool"),
            Ok(EvyType::Map(Box::new(EvyType::Array(Box::new(
                EvyType::Bool
            )))))
        );
    }

    #[test]
    fn non_string_map_key_is_unsupported() {
        assert!(map_type("map[int]string").is_err());
    }

    #[test]
    fn empty_interface_maps_to_any() {
        assert_eq!(map_type("any"), Ok(EvyType::Any));
        assert_eq!(map_type("interface{}"), Ok(EvyType::Any));
    }

    #[test]
    fn named_types_are_unsupported_by_descriptor() {
        assert!(map_type("point").is_err());
        assert!(map_type("struct{x int}").is_err());
    }

    #[test]
    fn display_matches_evy_syntax() {
        assert_eq!(
            EvyType::Map(Box::new(EvyType::Array(Box::new(EvyType::Num)))).to_string(),
            "{}[]num"
        );
    }
}
