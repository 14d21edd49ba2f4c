//! Vertex container
//!
//! Owns the vertices of one callable in program order together with the
//! variable and label allocators.

use super::variable::{LabelId, Variable};
use super::vertex::Vertex;
use crate::stream::{CalleeKind, InstructionStream, StreamHeader};

/// Ordered vertex list for a single callable
#[derive(Debug, Clone, Default)]
pub struct Graph {
    vertices: Vec<Vertex>,
    next_variable: u32,
    next_label: u32,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a fresh variable identity
    pub fn new_variable(&mut self) -> Variable {
        let var = Variable(self.next_variable);
        self.next_variable += 1;
        var
    }

    /// Allocate a fresh label identity
    pub fn new_label(&mut self) -> LabelId {
        let label = LabelId(self.next_label);
        self.next_label += 1;
        label
    }

    /// Append a vertex in program order
    pub fn push(&mut self, vertex: Vertex) {
        self.vertices.push(vertex);
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Rewrite `from` to `to` in every operand slot of the graph.
    ///
    /// Returns the number of vertices that changed.
    pub fn replace_variable(&mut self, from: Variable, to: Variable) -> usize {
        self.vertices
            .iter_mut()
            .map(|vertex| vertex.replace_variable(from, to))
            .filter(|changed| *changed)
            .count()
    }

    /// Indices of the vertices that read `var`
    pub fn uses_of(&self, var: Variable) -> Vec<usize> {
        self.vertices
            .iter()
            .enumerate()
            .filter(|(_, vertex)| vertex.uses(var))
            .map(|(idx, _)| idx)
            .collect()
    }

    /// Flatten into an instruction stream for a plain function
    pub fn flatten(&self, name: impl Into<String>, params: Vec<Variable>) -> InstructionStream {
        InstructionStream {
            header: StreamHeader {
                kind: CalleeKind::Function,
                name: name.into(),
                params,
            },
            body: self.vertices.clone(),
        }
    }
}
