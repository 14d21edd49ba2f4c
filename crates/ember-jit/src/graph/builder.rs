//! Graph builder helpers
//!
//! Utilities for constructing vertex graphs by hand (tests, tools). Every
//! value-producing helper declares its result first so the lowered stream
//! never reads a variable before it is introduced.

use base64::Engine;

use super::container::Graph;
use super::variable::{LabelId, Variable};
use super::vertex::{BinaryOp, ConstantType, UnaryOp, Vertex};

/// Builder that simplifies graph construction
pub struct GraphBuilder<'a> {
    graph: &'a mut Graph,
}

impl<'a> GraphBuilder<'a> {
    pub fn new(graph: &'a mut Graph) -> Self {
        GraphBuilder { graph }
    }

    /// Allocate a parameter variable (no vertex is emitted)
    pub fn param(&mut self) -> Variable {
        self.graph.new_variable()
    }

    /// Emit a constant with an already-encoded payload
    pub fn constant(&mut self, ty: ConstantType, value: impl Into<String>) -> Variable {
        let result = self.graph.new_variable();
        self.graph.push(Vertex::Constant { result, ty, value: value.into() });
        result
    }

    /// Emit a string constant, base64-encoding the payload
    pub fn string(&mut self, value: &str) -> Variable {
        let encoded = base64::engine::general_purpose::STANDARD.encode(value.as_bytes());
        self.constant(ConstantType::String, encoded)
    }

    pub fn long(&mut self, value: i64) -> Variable {
        self.constant(ConstantType::Long, value.to_string())
    }

    pub fn double(&mut self, value: f64) -> Variable {
        self.constant(ConstantType::Double, value.to_string())
    }

    /// Declare a fresh variable slot
    pub fn declare(&mut self) -> Variable {
        let result = self.graph.new_variable();
        self.graph.push(Vertex::VarDecl { result });
        result
    }

    pub fn assign(&mut self, source: Variable, result: Variable) {
        self.graph.push(Vertex::Assign { source, result });
    }

    pub fn property_fetch(&mut self, object: Variable, property: impl Into<String>) -> Variable {
        let result = self.declare();
        self.graph.push(Vertex::PropertyFetch { object, property: property.into(), result });
        result
    }

    pub fn unary(&mut self, op: UnaryOp, operand: Variable) -> Variable {
        let result = self.declare();
        self.graph.push(Vertex::Unary { op, operand, result });
        result
    }

    pub fn binary(&mut self, op: BinaryOp, left: Variable, right: Variable) -> Variable {
        let result = self.declare();
        self.graph.push(Vertex::Binary { op, left, right, result });
        result
    }

    pub fn call(&mut self, callee: impl Into<String>, args: Vec<Variable>) -> Variable {
        let result = self.declare();
        self.graph.push(Vertex::Call { callee: callee.into(), args, result });
        result
    }

    /// Allocate a label without placing it
    pub fn new_label(&mut self) -> LabelId {
        self.graph.new_label()
    }

    /// Place a label definition at the current position
    pub fn label(&mut self, id: LabelId) {
        self.graph.push(Vertex::Label { id });
    }

    pub fn jump(&mut self, target: LabelId) {
        self.graph.push(Vertex::Jump { target });
    }

    pub fn jump_if_false(&mut self, condition: Variable, target: LabelId) {
        self.graph.push(Vertex::JumpIfFalse { condition, target });
    }

    pub fn ret(&mut self, value: Option<Variable>) {
        self.graph.push(Vertex::Return { value });
    }

    pub fn free(&mut self, variable: Variable) {
        self.graph.push(Vertex::Free { variable });
    }

    /// Access the underlying graph
    pub fn graph(&self) -> &Graph {
        self.graph
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_helpers_declare_first() {
        let mut graph = Graph::new();
        let mut b = GraphBuilder::new(&mut graph);
        let x = b.param();
        let y = b.long(2);
        let sum = b.binary(BinaryOp::Add, x, y);
        b.ret(Some(sum));

        let vertices = graph.vertices();
        assert_eq!(vertices.len(), 4);
        assert_eq!(vertices[1], Vertex::VarDecl { result: sum });
        assert_eq!(
            vertices[2],
            Vertex::Binary { op: BinaryOp::Add, left: x, right: y, result: sum }
        );
    }

    #[test]
    fn test_string_constant_is_encoded() {
        let mut graph = Graph::new();
        let mut b = GraphBuilder::new(&mut graph);
        let s = b.string("it's");
        assert_eq!(
            b.graph().vertices()[0],
            Vertex::Constant { result: s, ty: ConstantType::String, value: "aXQncw==".to_string() }
        );
    }
}
