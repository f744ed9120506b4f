//! Serialization boundary.
//!
//! Every map-shaped structure is written as an ordered array of
//! `[key, value]` pairs, so insertion order survives formats and consumers
//! that do not preserve object key order. Branch children recurse.

use crate::edit::{EditRecord, EditRecorder};
use crate::error::ThemeError;
use crate::resolve::{ResolvedNode, ResolvedTree};
use crate::symbols::SymbolTable;
use crate::tree::TemplateTree;
use crate::validate::ValidationError;
use serde::ser::{SerializeStruct, Serializer};
use serde::Serialize;

/// JSON formatting style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonStyle {
    /// Compact: no whitespace between tokens.
    Compact,
    /// Pretty: 2-space indented, one entry per line.
    #[default]
    Pretty,
}

/// Serialize any boundary structure to a JSON string.
pub fn to_json<S: Serialize + ?Sized>(value: &S, style: JsonStyle) -> Result<String, ThemeError> {
    let out = match style {
        JsonStyle::Compact => serde_json::to_string(value)?,
        JsonStyle::Pretty => serde_json::to_string_pretty(value)?,
    };
    Ok(out)
}

pub fn to_json_pretty<S: Serialize + ?Sized>(value: &S) -> Result<String, ThemeError> {
    to_json(value, JsonStyle::Pretty)
}

/// Serialize a list of lint findings as a JSON array of
/// `{"code", "message", "path"}` objects.
pub fn validation_errors_to_json(errors: &[ValidationError]) -> Result<String, ThemeError> {
    to_json(errors, JsonStyle::Compact)
}

// ── Pair-array impls ────────────────────────────────────────────────

impl<T: Serialize> Serialize for SymbolTable<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

impl Serialize for TemplateTree {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

impl<V, E> Serialize for EditRecorder<V, E>
where
    EditRecord<V, E>: Serialize,
{
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

impl<T: Serialize> Serialize for ResolvedTree<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

impl<T: Serialize> Serialize for ResolvedNode<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut node = serializer.serialize_struct("ResolvedNode", 2)?;
        match self {
            ResolvedNode::Property { desc, value } => {
                node.serialize_field("desc", desc)?;
                node.serialize_field("value", value)?;
            }
            ResolvedNode::Branch { desc, children } => {
                node.serialize_field("desc", desc)?;
                node.serialize_field("children", children)?;
            }
        }
        node.end()
    }
}

impl Serialize for ValidationError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut err = serializer.serialize_struct("ValidationError", 3)?;
        err.serialize_field("code", self.code)?;
        err.serialize_field("message", &self.message)?;
        err.serialize_field("path", &self.path)?;
        err.end()
    }
}
