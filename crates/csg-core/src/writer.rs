//! Canonical writer: document tree → indented CSG text.
//!
//! The writer is the inverse of [`crate::parser`], but it also enforces rules
//! the grammar cannot express. Every node's `type` resolves to a
//! [`NodeKind`], and that kind's [`Contract`] decides the surface syntax:
//!
//! - leaves (`cube`, `sphere`, `cylinder`): `cube(size = 10);`
//! - boolean operators (`union`, `difference`, `intersection`): a block with
//!   at least two children
//! - `group`: a block, or `group();` when it has no children
//! - `multmatrix`: a block whose properties may be a bare matrix,
//!   `multmatrix([1,0,0,0,...]) {`
//!
//! Each nesting level indents by two spaces. Every node ends with a newline.
//!
//! # Example
//! ```
//! use csg_core::write;
//! use serde_json::json;
//!
//! let doc = json!([
//!     {"type": "union", "properties": {}, "objects": [
//!         {"type": "cube", "properties": {"size": 10}},
//!         {"type": "sphere", "properties": {"r": 6.5}},
//!     ]},
//! ]);
//! let csg = write(&doc).unwrap();
//! assert_eq!(csg, "union() {\n  cube(size = 10);\n  sphere(r = 6.5);\n}\n");
//! ```

use crate::error::{Result, WriteError};
use crate::types::{is_valid_name, Contract, Form, NodeKind};
use log::{debug, trace};
use serde_json::{Map, Value};

const INDENT_UNIT: &str = "  ";

/// Write a document (array of nodes) or a single node as CSG text.
pub fn write(document: &Value) -> Result<String> {
    let mut out = String::new();
    write_indented(document, "", &mut out)?;
    debug!("wrote CSG document: {} bytes", out.len());
    Ok(out)
}

/// Write `value` at the given starting indent, appending to `out`.
///
/// Arrays are written element by element at the same indent. On error, `out`
/// may hold the output of siblings written before the failing node.
pub fn write_indented(value: &Value, indent: &str, out: &mut String) -> Result<()> {
    write_value(value, indent, out)?;
    Ok(())
}

fn write_value(value: &Value, indent: &str, out: &mut String) -> std::result::Result<(), WriteError> {
    match value {
        Value::Array(nodes) => {
            for node in nodes {
                write_value(node, indent, out)?;
            }
            Ok(())
        }
        Value::Object(node) => write_node(node, indent, out),
        other => Err(malformed(other)),
    }
}

fn write_node(
    node: &Map<String, Value>,
    indent: &str,
    out: &mut String,
) -> std::result::Result<(), WriteError> {
    let type_name = match node.get("type") {
        Some(Value::String(s)) => s.as_str(),
        Some(other) => return Err(malformed(other)),
        None => {
            return Err(WriteError::Malformed {
                found: "an object without a \"type\"".to_string(),
            })
        }
    };
    let kind = NodeKind::from_type(type_name).ok_or_else(|| WriteError::UnknownType {
        type_name: type_name.to_string(),
    })?;
    trace!("writing {kind} at depth {}", indent.len() / INDENT_UNIT.len());

    let contract = kind.contract();
    match contract.form {
        Form::Leaf => {
            let head = node_head(kind, node, contract)?;
            out.push_str(indent);
            out.push_str(&head);
            out.push_str(";\n");
            Ok(())
        }
        Form::Block => write_block(kind, node, contract, indent, out),
    }
}

fn write_block(
    kind: NodeKind,
    node: &Map<String, Value>,
    contract: Contract,
    indent: &str,
    out: &mut String,
) -> std::result::Result<(), WriteError> {
    let children: &[Value] = match node.get("objects") {
        Some(Value::Array(children)) => children,
        None => &[],
        Some(_) => {
            return Err(WriteError::InvalidObjects {
                type_name: kind.to_string(),
            })
        }
    };

    if children.len() < contract.min_children {
        return Err(WriteError::TooFewChildren {
            type_name: kind.to_string(),
            required: contract.min_children,
            found: children.len(),
        });
    }

    let head = node_head(kind, node, contract)?;

    if children.is_empty() && contract.empty_shorthand {
        out.push_str(indent);
        out.push_str(&head);
        out.push_str(";\n");
        return Ok(());
    }

    // Children go to a scratch buffer; `out` only ever receives whole blocks.
    let child_indent = format!("{indent}{INDENT_UNIT}");
    let mut body = String::new();
    for child in children {
        write_value(child, &child_indent, &mut body)?;
    }

    out.push_str(indent);
    out.push_str(&head);
    out.push_str(" {\n");
    out.push_str(&body);
    out.push_str(indent);
    out.push_str("}\n");
    Ok(())
}

/// `type(props)` with no terminator.
fn node_head(
    kind: NodeKind,
    node: &Map<String, Value>,
    contract: Contract,
) -> std::result::Result<String, WriteError> {
    let mut head = String::from(kind.as_str());
    head.push('(');
    match node.get("properties") {
        None => {}
        Some(Value::Object(props)) => write_properties(props, &mut head)?,
        Some(Value::Array(matrix)) if contract.matrix_form => {
            write_array(matrix, &mut head)?;
        }
        Some(_) => {
            return Err(WriteError::InvalidProperties {
                type_name: kind.to_string(),
            })
        }
    }
    head.push(')');
    Ok(head)
}

/// Comma-joined `name = value` pairs, in insertion order.
fn write_properties(
    props: &Map<String, Value>,
    out: &mut String,
) -> std::result::Result<(), WriteError> {
    for (i, (name, value)) in props.iter().enumerate() {
        if !is_valid_name(name) {
            return Err(WriteError::InvalidName { name: name.clone() });
        }
        if i > 0 {
            out.push_str(", ");
        }
        out.push_str(name);
        out.push_str(" = ");
        write_property_value(value, out)?;
    }
    Ok(())
}

fn write_property_value(value: &Value, out: &mut String) -> std::result::Result<(), WriteError> {
    match value {
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Number(n) => out.push_str(&format_number(n)?),
        Value::String(s) => {
            if s.contains('"') {
                return Err(WriteError::UnsupportedValue {
                    found: format!("string {s:?} contains a double quote"),
                });
            }
            out.push('"');
            out.push_str(s);
            out.push('"');
        }
        Value::Array(items) => write_array(items, out)?,
        Value::Null | Value::Object(_) => {
            return Err(WriteError::UnsupportedValue {
                found: describe(value).to_string(),
            })
        }
    }
    Ok(())
}

/// `[a,b,c]`, recursively, without spaces.
fn write_array(items: &[Value], out: &mut String) -> std::result::Result<(), WriteError> {
    out.push('[');
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        write_property_value(item, out)?;
    }
    out.push(']');
    Ok(())
}

/// Format a number so the grammar reads it back as the same value:
/// - no exponent (the grammar has none)
/// - integral values without a fractional part (`5.0` → `5`)
/// - negative zero normalizes to `0`
fn format_number(n: &serde_json::Number) -> std::result::Result<String, WriteError> {
    if let Some(i) = n.as_i64() {
        return Ok(i.to_string());
    }
    if let Some(u) = n.as_u64() {
        return Ok(u.to_string());
    }
    let f = n.as_f64().filter(|f| f.is_finite()).ok_or_else(|| {
        WriteError::UnsupportedValue {
            found: format!("number {n}"),
        }
    })?;
    let f = if f == 0.0 { 0.0 } else { f };
    if f.fract() == 0.0 && f.abs() < (i64::MAX as f64) {
        return Ok((f as i64).to_string());
    }
    // f64's Display is the shortest round-trip decimal and never uses an exponent.
    Ok(format!("{f}"))
}

fn malformed(value: &Value) -> WriteError {
    WriteError::Malformed {
        found: describe(value).to_string(),
    }
}

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
