//! Debug rendering for vertices
//!
//! `result = expression` form, for diagnostics and `ember dump` only. The
//! lowering compiler never goes through these impls.

use std::fmt;
use super::container::Graph;
use super::vertex::Vertex;
use super::variable::Variable;

impl fmt::Display for Vertex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Vertex::Constant { result, ty, value } => write!(f, "{} = const.{} {}", result, ty, value),
            Vertex::VarDecl { result } => write!(f, "var {}", result),
            Vertex::Assign { source, result } => write!(f, "{} = {}", result, source),
            Vertex::PropertyFetch { object, property, result } => {
                write!(f, "{} = {}->{}", result, object, property)
            }
            Vertex::Unary { op, operand, result } => write!(f, "{} = {}{}", result, op, operand),
            Vertex::Binary { op, left, right, result } => {
                write!(f, "{} = {} {} {}", result, left, op, right)
            }
            Vertex::Label { id } => write!(f, "{}:", id),
            Vertex::Jump { target } => write!(f, "jump {}", target),
            Vertex::JumpIfFalse { condition, target } => write!(f, "jumpz {}, {}", condition, target),
            Vertex::Return { value: Some(value) } => write!(f, "return {}", value),
            Vertex::Return { value: None } => write!(f, "return"),
            Vertex::Call { callee, args, result } => {
                write!(f, "{} = {}(", result, callee)?;
                format_args_list(f, args)?;
                write!(f, ")")
            }
            Vertex::Free { variable } => write!(f, "free {}", variable),
            Vertex::Recurse => write!(f, "recurse"),
        }
    }
}

impl fmt::Display for Graph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for vertex in self.vertices() {
            writeln!(f, "  {}", vertex)?;
        }
        Ok(())
    }
}

fn format_args_list(f: &mut fmt::Formatter<'_>, args: &[Variable]) -> fmt::Result {
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", arg)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{BinaryOp, ConstantType, LabelId, UnaryOp};

    #[test]
    fn test_assignment_forms() {
        let fetch = Vertex::PropertyFetch {
            object: Variable(1),
            property: "name".to_string(),
            result: Variable(2),
        };
        assert_eq!(fetch.to_string(), "v2 = v1->name");

        let add = Vertex::Binary {
            op: BinaryOp::Add,
            left: Variable(1),
            right: Variable(2),
            result: Variable(3),
        };
        assert_eq!(add.to_string(), "v3 = v1 + v2");

        let not = Vertex::Unary { op: UnaryOp::Not, operand: Variable(1), result: Variable(2) };
        assert_eq!(not.to_string(), "v2 = !v1");

        let c = Vertex::Constant {
            result: Variable(4),
            ty: ConstantType::Long,
            value: "42".to_string(),
        };
        assert_eq!(c.to_string(), "v4 = const.long 42");
    }

    #[test]
    fn test_control_forms() {
        assert_eq!(Vertex::Label { id: LabelId(1) }.to_string(), "L1:");
        assert_eq!(
            Vertex::JumpIfFalse { condition: Variable(3), target: LabelId(1) }.to_string(),
            "jumpz v3, L1"
        );
        assert_eq!(Vertex::Return { value: None }.to_string(), "return");

        let call = Vertex::Call {
            callee: "strlen".to_string(),
            args: vec![Variable(1), Variable(2)],
            result: Variable(3),
        };
        assert_eq!(call.to_string(), "v3 = strlen(v1, v2)");
    }
}
