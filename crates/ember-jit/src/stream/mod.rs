//! Instruction streams
//!
//! A stream is the flattened form of one callable: a header naming the
//! callable and its parameters, then the body vertices in execution order.
//! On the wire it is a JSON array of positional tuples (see `decoder`).

pub mod decoder;
pub mod encoder;

pub use decoder::{decode, header_name};
pub use encoder::encode;

use crate::graph::{Variable, Vertex};

/// What kind of callable a stream header declares
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CalleeKind {
    Function,
    Method,
}

impl CalleeKind {
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "function" => Some(CalleeKind::Function),
            "method" => Some(CalleeKind::Method),
            _ => None,
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            CalleeKind::Function => "function",
            CalleeKind::Method => "method",
        }
    }
}

/// Stream header: callable name and declared parameters, in order
#[derive(Debug, Clone, PartialEq)]
pub struct StreamHeader {
    pub kind: CalleeKind,
    pub name: String,
    pub params: Vec<Variable>,
}

/// Read-only input to the lowering compiler
#[derive(Debug, Clone, PartialEq)]
pub struct InstructionStream {
    pub header: StreamHeader,
    pub body: Vec<Vertex>,
}

impl InstructionStream {
    pub fn new(header: StreamHeader, body: Vec<Vertex>) -> Self {
        InstructionStream { header, body }
    }

    /// Declared callable name (the compile cache key)
    pub fn name(&self) -> &str {
        &self.header.name
    }

    pub fn params(&self) -> &[Variable] {
        &self.header.params
    }

    /// Rewrite the header to a plain function header, keeping name and params
    pub fn into_function(mut self) -> Self {
        self.header.kind = CalleeKind::Function;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_callee_kind_tags() {
        assert_eq!(CalleeKind::from_tag("function"), Some(CalleeKind::Function));
        assert_eq!(CalleeKind::from_tag("method"), Some(CalleeKind::Method));
        assert_eq!(CalleeKind::from_tag("closure"), None);
        assert_eq!(CalleeKind::Method.tag(), "method");
    }

    #[test]
    fn test_into_function() {
        let stream = InstructionStream::new(
            StreamHeader { kind: CalleeKind::Method, name: "getName".to_string(), params: vec![Variable(1)] },
            vec![Vertex::Return { value: None }],
        );
        let plain = stream.into_function();
        assert_eq!(plain.header.kind, CalleeKind::Function);
        assert_eq!(plain.name(), "getName");
        assert_eq!(plain.params(), &[Variable(1)]);
    }
}
