//! IR graph model: variables, vertices and operand rewriting

pub mod builder;
pub mod container;
pub mod display;
pub mod variable;
pub mod vertex;

pub use builder::GraphBuilder;
pub use container::Graph;
pub use variable::{LabelId, Variable};
pub use vertex::{Assignment, BinaryOp, ConstantType, UnaryOp, Vertex};
