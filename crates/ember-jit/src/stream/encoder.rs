//! Tuple-encoded stream encoder
//!
//! Produces the same positional JSON form that `decoder` reads, so a graph
//! built in-process can be handed to any consumer of the wire format.

use serde_json::{json, Value};

use super::decoder::RECEIVER_TOKEN;
use super::InstructionStream;
use crate::graph::{Variable, Vertex};

/// Encode a stream as a JSON array of tuples
pub fn encode(stream: &InstructionStream) -> Value {
    let header = &stream.header;
    let mut items = Vec::with_capacity(header.params.len() + stream.body.len() + 2);

    items.push(json!([header.kind.tag(), header.name, header.params.len()]));
    for param in &header.params {
        items.push(json!(["param", var(*param)]));
    }
    items.push(json!(["begin"]));
    items.extend(stream.body.iter().map(encode_vertex));

    Value::Array(items)
}

/// Encode a single body vertex
pub fn encode_vertex(vertex: &Vertex) -> Value {
    match vertex {
        Vertex::Constant { result, ty, value } => json!(["const", var(*result), ty.tag(), value]),
        Vertex::VarDecl { result } => json!(["var", var(*result)]),
        Vertex::Assign { source, result } => json!(["assign", var(*source), var(*result)]),
        Vertex::PropertyFetch { object, property, result } => {
            json!(["propertyfetch", property, var(*object), var(*result)])
        }
        Vertex::Unary { op, operand, result } => json!([op.symbol(), var(*operand), var(*result)]),
        Vertex::Binary { op, left, right, result } => {
            json!([op.symbol(), var(*left), var(*right), var(*result)])
        }
        Vertex::Label { id } => json!(["label", id.0]),
        Vertex::Jump { target } => json!(["jump", target.0]),
        Vertex::JumpIfFalse { condition, target } => json!(["jumpz", var(*condition), target.0]),
        Vertex::Return { value: Some(value) } => json!(["return", var(*value)]),
        Vertex::Return { value: None } => json!(["return"]),
        Vertex::Call { callee, args, result } => {
            let mut fields = vec![json!("functioncall"), json!(callee)];
            fields.extend(args.iter().map(|arg| var(*arg)));
            fields.push(var(*result));
            Value::Array(fields)
        }
        Vertex::Free { variable } => json!(["free", var(*variable)]),
        Vertex::Recurse => json!(["recurse"]),
    }
}

fn var(variable: Variable) -> Value {
    if variable.is_receiver() {
        json!(RECEIVER_TOKEN)
    } else {
        json!(variable.0)
    }
}
