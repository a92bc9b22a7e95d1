//! String-to-string conversions between CSG text and CSGJS (JSON) text.
//!
//! CSGJS is the document tree serialized with `serde_json`; object key order
//! is preserved (`preserve_order`), so argument order survives the trip.

use crate::error::{Result, WriteError};
use crate::parser::parse;
use crate::writer::write;
use serde_json::Value;

/// CSG text → compact CSGJS text.
pub fn csg_to_json(source: &str) -> Result<String> {
    let document = parse(source)?;
    Ok(serde_json::to_string(&document)?)
}

/// CSG text → pretty-printed CSGJS text.
pub fn csg_to_json_pretty(source: &str) -> Result<String> {
    let document = parse(source)?;
    Ok(serde_json::to_string_pretty(&document)?)
}

/// CSGJS text → canonical CSG text.
pub fn json_to_csg(json: &str) -> Result<String> {
    let document = parse_json(json)?;
    write(&document)
}

/// Read CSGJS text into a document tree.
///
/// Checks the generic node shape: the root is a node or an array of nodes,
/// every node is an object with a string `type`, and `objects`, when present,
/// is an array of nodes. Type-specific rules are left to the writer.
pub fn parse_json(json: &str) -> Result<Value> {
    let document: Value = serde_json::from_str(json)?;
    check_shape(&document)?;
    Ok(document)
}

fn check_shape(value: &Value) -> std::result::Result<(), WriteError> {
    match value {
        Value::Array(nodes) => nodes.iter().try_for_each(check_node),
        _ => check_node(value),
    }
}

fn check_node(value: &Value) -> std::result::Result<(), WriteError> {
    let node = value.as_object().ok_or_else(|| WriteError::Malformed {
        found: format!("{value}"),
    })?;
    let type_name = match node.get("type") {
        Some(Value::String(s)) => s,
        _ => {
            return Err(WriteError::Malformed {
                found: format!("{value}"),
            })
        }
    };
    match node.get("objects") {
        None => Ok(()),
        Some(Value::Array(children)) => children.iter().try_for_each(check_node),
        Some(_) => Err(WriteError::InvalidObjects {
            type_name: type_name.clone(),
        }),
    }
}
