//! Tuple-encoded stream decoder
//!
//! Decodes the JSON tuple form produced by the upstream IR pipeline:
//!
//! ```text
//! [["function", "add", 2], ["param", 0], ["param", 1], ["begin"],
//!  ["var", 2], ["+", 0, 1, 2], ["return", 2]]
//! ```
//!
//! Structural problems are `MalformedInstruction`; an unknown tag is
//! `InvalidOperation`; an unknown constant tag is `InvalidConstantType`.

use serde_json::Value;

use super::{CalleeKind, InstructionStream, StreamHeader};
use crate::error::{JitError, JitResult};
use crate::graph::{BinaryOp, ConstantType, LabelId, UnaryOp, Variable, Vertex};

pub(crate) const RECEIVER_TOKEN: &str = "$this";

/// Decode a complete stream (header, parameters, `begin`, body)
pub fn decode(value: &Value) -> JitResult<InstructionStream> {
    let (header, items, body_start) = decode_header(value)?;
    let body = decode_body(items, body_start)?;
    Ok(InstructionStream { header, body })
}

/// Read only the declared callable name from a tuple-encoded stream
pub fn header_name(value: &Value) -> JitResult<&str> {
    let items = stream_items(value)?;
    text(tuple(&items[0], 0)?, 1, 0)
}

/// Decode the header tuple, parameters and `begin` without touching the
/// body. Returns the header, the raw items and the index of the first body
/// item.
pub fn decode_header(value: &Value) -> JitResult<(StreamHeader, &[Value], usize)> {
    let items = stream_items(value)?;
    let fields = tuple(&items[0], 0)?;

    let kind_tag = text(fields, 0, 0)?;
    let kind = CalleeKind::from_tag(kind_tag)
        .ok_or_else(|| JitError::malformed(0, format!("unknown callee kind '{}'", kind_tag)))?;
    let name = text(fields, 1, 0)?.to_string();
    let param_count = count(fields, 2, 0)?;

    let (header, body_start) = decode_prologue(kind, name, param_count, items, 1)?;
    Ok((header, items, body_start))
}

/// Decode parameter entries, the `begin` sentinel and the body, starting at
/// `start`. Shared with the class descriptor decoder, whose method headers
/// carry modifiers in front of name and count.
pub(crate) fn decode_after_header(
    kind: CalleeKind,
    name: String,
    param_count: usize,
    items: &[Value],
    start: usize,
) -> JitResult<InstructionStream> {
    let (header, body_start) = decode_prologue(kind, name, param_count, items, start)?;
    let body = decode_body(items, body_start)?;
    Ok(InstructionStream { header, body })
}

fn decode_prologue(
    kind: CalleeKind,
    name: String,
    param_count: usize,
    items: &[Value],
    start: usize,
) -> JitResult<(StreamHeader, usize)> {
    let mut params = Vec::with_capacity(param_count);
    let mut index = start;

    loop {
        let item = items
            .get(index)
            .ok_or_else(|| JitError::malformed(index, "missing 'begin' sentinel"))?;
        let fields = tuple(item, index)?;
        match text(fields, 0, index)? {
            "begin" => break,
            "param" => params.push(variable(fields, 1, index)?),
            other => {
                return Err(JitError::malformed(
                    index,
                    format!("expected 'param' or 'begin' before the body, found '{}'", other),
                ))
            }
        }
        index += 1;
    }

    if params.len() != param_count {
        return Err(JitError::malformed(
            index,
            format!("header declares {} parameters, found {}", param_count, params.len()),
        ));
    }

    Ok((StreamHeader { kind, name, params }, index + 1))
}

/// Decode body items from `start`. Errors are reported in stream order, so a
/// `recurse` ahead of a malformed item is reported as unsupported recursion.
fn decode_body(items: &[Value], start: usize) -> JitResult<Vec<Vertex>> {
    let mut body = Vec::with_capacity(items.len().saturating_sub(start));
    for (index, item) in items.iter().enumerate().skip(start) {
        match decode_vertex(item, index) {
            Ok(vertex) => body.push(vertex),
            Err(_) if body.contains(&Vertex::Recurse) => return Err(JitError::recursion()),
            Err(err) => return Err(err),
        }
    }
    Ok(body)
}

/// Decode one body tuple
pub fn decode_vertex(item: &Value, index: usize) -> JitResult<Vertex> {
    let fields = tuple(item, index)?;
    let tag = text(fields, 0, index)?;

    let vertex = match tag {
        "free" => Vertex::Free { variable: variable(fields, 1, index)? },
        "const" => Vertex::Constant {
            result: variable(fields, 1, index)?,
            ty: ConstantType::from_tag(text(fields, 2, index)?)?,
            value: payload(fields, 3, index)?,
        },
        "var" => Vertex::VarDecl { result: variable(fields, 1, index)? },
        "assign" => Vertex::Assign {
            source: variable(fields, 1, index)?,
            result: variable(fields, 2, index)?,
        },
        "propertyfetch" => Vertex::PropertyFetch {
            property: text(fields, 1, index)?.to_string(),
            object: variable(fields, 2, index)?,
            result: variable(fields, 3, index)?,
        },
        "label" => Vertex::Label { id: label(fields, 1, index)? },
        "jump" => Vertex::Jump { target: label(fields, 1, index)? },
        "jumpz" => Vertex::JumpIfFalse {
            condition: variable(fields, 1, index)?,
            target: label(fields, 2, index)?,
        },
        "return" => match fields.get(1) {
            None | Some(Value::Null) => Vertex::Return { value: None },
            Some(_) => Vertex::Return { value: Some(variable(fields, 1, index)?) },
        },
        "recurse" => Vertex::Recurse,
        "functioncall" => {
            if fields.len() < 3 {
                return Err(JitError::malformed(index, "function call without a result variable"));
            }
            let last = fields.len() - 1;
            let args = (2..last)
                .map(|pos| variable(fields, pos, index))
                .collect::<JitResult<Vec<_>>>()?;
            Vertex::Call {
                callee: text(fields, 1, index)?.to_string(),
                args,
                result: variable(fields, last, index)?,
            }
        }
        _ => {
            if let Some(op) = UnaryOp::from_symbol(tag) {
                Vertex::Unary {
                    op,
                    operand: variable(fields, 1, index)?,
                    result: variable(fields, 2, index)?,
                }
            } else if let Some(op) = BinaryOp::from_symbol(tag) {
                Vertex::Binary {
                    op,
                    left: variable(fields, 1, index)?,
                    right: variable(fields, 2, index)?,
                    result: variable(fields, 3, index)?,
                }
            } else {
                return Err(JitError::InvalidOperation { op: tag.to_string() });
            }
        }
    };

    Ok(vertex)
}

fn stream_items(value: &Value) -> JitResult<&[Value]> {
    let items = value
        .as_array()
        .ok_or_else(|| JitError::malformed(0, "instruction stream is not an array"))?;
    if items.is_empty() {
        return Err(JitError::malformed(0, "instruction stream has no header"));
    }
    Ok(items)
}

fn tuple(item: &Value, index: usize) -> JitResult<&[Value]> {
    match item.as_array() {
        Some(fields) if !fields.is_empty() => Ok(fields),
        Some(_) => Err(JitError::malformed(index, "empty instruction tuple")),
        None => Err(JitError::malformed(index, "instruction is not a tuple")),
    }
}

fn field(fields: &[Value], pos: usize, index: usize) -> JitResult<&Value> {
    fields
        .get(pos)
        .ok_or_else(|| JitError::malformed(index, format!("missing field {}", pos)))
}

pub(crate) fn text(fields: &[Value], pos: usize, index: usize) -> JitResult<&str> {
    field(fields, pos, index)?
        .as_str()
        .ok_or_else(|| JitError::malformed(index, format!("field {} is not a string", pos)))
}

pub(crate) fn count(fields: &[Value], pos: usize, index: usize) -> JitResult<usize> {
    field(fields, pos, index)?
        .as_u64()
        .and_then(|n| usize::try_from(n).ok())
        .ok_or_else(|| JitError::malformed(index, format!("field {} is not a count", pos)))
}

/// Ids are non-negative integers; digit strings are accepted too
fn id(fields: &[Value], pos: usize, index: usize) -> JitResult<u32> {
    let value = field(fields, pos, index)?;
    let parsed = match value {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s.parse::<u32>().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| JitError::malformed(index, format!("field {} is not an id: {}", pos, value)))
}

/// The receiver is spelled `$this`; every other variable is an id
fn variable(fields: &[Value], pos: usize, index: usize) -> JitResult<Variable> {
    if field(fields, pos, index)?.as_str() == Some(RECEIVER_TOKEN) {
        return Ok(Variable::RECEIVER);
    }
    let id = id(fields, pos, index)?;
    if id == Variable::RECEIVER.as_u32() {
        return Err(JitError::malformed(
            index,
            format!("field {} uses the id reserved for the receiver", pos),
        ));
    }
    Ok(Variable(id))
}

fn label(fields: &[Value], pos: usize, index: usize) -> JitResult<LabelId> {
    id(fields, pos, index).map(LabelId)
}

/// Constant payloads arrive as strings, or as bare JSON scalars for numbers
fn payload(fields: &[Value], pos: usize, index: usize) -> JitResult<String> {
    match field(fields, pos, index)? {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(if *b { "1".to_string() } else { String::new() }),
        Value::Null => Ok(String::new()),
        other => Err(JitError::malformed(index, format!("field {} is not a scalar: {}", pos, other))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_simple_function() {
        let value = json!([
            ["function", "add", 2],
            ["param", 0],
            ["param", 1],
            ["begin"],
            ["var", 2],
            ["+", 0, 1, 2],
            ["return", 2]
        ]);
        let stream = decode(&value).unwrap();

        assert_eq!(stream.name(), "add");
        assert_eq!(stream.params(), &[Variable(0), Variable(1)]);
        assert_eq!(stream.body.len(), 3);
        assert_eq!(
            stream.body[1],
            Vertex::Binary { op: BinaryOp::Add, left: Variable(0), right: Variable(1), result: Variable(2) }
        );
        assert_eq!(stream.body[2], Vertex::Return { value: Some(Variable(2)) });
    }

    #[test]
    fn test_decode_call_result_is_last() {
        let vertex = decode_vertex(&json!(["functioncall", "max", 1, 2, 3, 7]), 4).unwrap();
        assert_eq!(
            vertex,
            Vertex::Call {
                callee: "max".to_string(),
                args: vec![Variable(1), Variable(2), Variable(3)],
                result: Variable(7),
            }
        );

        let no_args = decode_vertex(&json!(["functioncall", "time", 5]), 4).unwrap();
        assert_eq!(no_args, Vertex::Call { callee: "time".to_string(), args: vec![], result: Variable(5) });
    }

    #[test]
    fn test_decode_property_fetch_and_jumps() {
        assert_eq!(
            decode_vertex(&json!(["propertyfetch", "name", 1, 2]), 0).unwrap(),
            Vertex::PropertyFetch { object: Variable(1), property: "name".to_string(), result: Variable(2) }
        );
        assert_eq!(
            decode_vertex(&json!(["jumpz", 3, 9]), 0).unwrap(),
            Vertex::JumpIfFalse { condition: Variable(3), target: LabelId(9) }
        );
        assert_eq!(decode_vertex(&json!(["return"]), 0).unwrap(), Vertex::Return { value: None });
        assert_eq!(decode_vertex(&json!(["recurse", 1, 2]), 0).unwrap(), Vertex::Recurse);
        assert_eq!(
            decode_vertex(&json!(["propertyfetch", "id", "$this", 2]), 0).unwrap(),
            Vertex::PropertyFetch { object: Variable::RECEIVER, property: "id".to_string(), result: Variable(2) }
        );
        assert_eq!(
            decode_vertex(&json!(["~", "4", "5"]), 0).unwrap(),
            Vertex::Unary { op: UnaryOp::BitNot, operand: Variable(4), result: Variable(5) }
        );
    }

    #[test]
    fn test_decode_constant_payloads() {
        assert_eq!(
            decode_vertex(&json!(["const", 1, "long", 42]), 0).unwrap(),
            Vertex::Constant { result: Variable(1), ty: ConstantType::Long, value: "42".to_string() }
        );
        let err = decode_vertex(&json!(["const", 1, "resource", "x"]), 0).unwrap_err();
        assert!(matches!(err, JitError::InvalidConstantType { .. }));
    }

    #[test]
    fn test_unknown_operator() {
        let err = decode_vertex(&json!(["**", 1, 2, 3]), 6).unwrap_err();
        assert!(matches!(err, JitError::InvalidOperation { ref op } if op == "**"));
    }

    #[test]
    fn test_malformed_streams() {
        let missing_begin = json!([["function", "f", 0], ["var", 1]]);
        assert!(matches!(decode(&missing_begin), Err(JitError::MalformedInstruction { index: 1, .. })));

        let wrong_count = json!([["function", "f", 2], ["param", 0], ["begin"]]);
        assert!(matches!(decode(&wrong_count), Err(JitError::MalformedInstruction { .. })));

        let bad_id = json!([["function", "f", 0], ["begin"], ["var", -1]]);
        assert!(matches!(decode(&bad_id), Err(JitError::MalformedInstruction { index: 2, .. })));

        let bad_count = json!([["function", "f", -1], ["begin"]]);
        assert!(matches!(decode(&bad_count), Err(JitError::MalformedInstruction { index: 0, .. })));

        assert!(matches!(decode(&json!({})), Err(JitError::MalformedInstruction { .. })));
        assert!(matches!(decode(&json!([])), Err(JitError::MalformedInstruction { .. })));
    }

    #[test]
    fn test_receiver_id_is_reserved() {
        let reserved = json!([["function", "a", 0], ["begin"], ["return", 4294967295u64]]);
        assert!(matches!(decode(&reserved), Err(JitError::MalformedInstruction { index: 2, .. })));

        let spelled = json!([["function", "a", 0], ["begin"], ["return", "$this"]]);
        assert_eq!(decode(&spelled).unwrap().body, vec![Vertex::Return { value: Some(Variable::RECEIVER) }]);
    }

    #[test]
    fn test_recursion_reported_before_later_errors() {
        let unknown_op = json!([["function", "r", 0], ["begin"], ["recurse"], ["<=>", 0, 0, 0]]);
        assert!(matches!(decode(&unknown_op), Err(JitError::UnsupportedFeature { .. })));

        let bad_const = json!([["function", "r", 0], ["begin"], ["recurse"], ["const", 0, "resource", "x"]]);
        assert!(matches!(decode(&bad_const), Err(JitError::UnsupportedFeature { .. })));

        let before = json!([["function", "r", 0], ["begin"], ["<=>", 0, 0, 0], ["recurse"]]);
        assert!(matches!(decode(&before), Err(JitError::InvalidOperation { .. })));
    }

    #[test]
    fn test_header_name() {
        let value = json!([["function", "cached", 0], ["bogus"]]);
        assert_eq!(header_name(&value).unwrap(), "cached");
    }
}
