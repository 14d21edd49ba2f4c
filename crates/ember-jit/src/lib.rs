//! Ember JIT backend
//!
//! This crate lowers the typed IR produced by the upstream optimizer into
//! target source text, one callable (or one class) at a time:
//! - **Graph**: variables, vertices and in-place operand rewriting (`graph` module)
//! - **Stream**: the flattened, tuple-encoded instruction stream (`stream` module)
//! - **Compiler**: scope/label resolution, constant inlining and the compile cache (`compiler` module)
//! - **Class**: composition of lowered methods into a class declaration (`class` module)
//!
//! # Example
//!
//! ```rust,ignore
//! use ember_jit::{BinaryOp, Compiler, Graph, GraphBuilder};
//!
//! let mut graph = Graph::new();
//! let (a, b) = {
//!     let mut builder = GraphBuilder::new(&mut graph);
//!     let a = builder.param();
//!     let b = builder.param();
//!     let sum = builder.binary(BinaryOp::Add, a, b);
//!     builder.ret(Some(sum));
//!     (a, b)
//! };
//!
//! let stream = graph.flatten("add", vec![a, b]);
//! let text = Compiler::new().lower(&stream)?;
//! ```

#![warn(rust_2018_idioms)]

pub mod class;
pub mod compiler;
pub mod config;
pub mod error;
pub mod graph;
pub mod stream;

pub use class::{ClassConverter, ClassDescriptor, MethodDescriptor, MethodModifiers, PropertyDecl, Visibility};
pub use compiler::{CompileCache, Compiler, MemoryCache, ScriptTarget, SharedCache, Target};
pub use config::{CompilerConfig, ConfigError};
pub use error::{JitError, JitResult};
pub use graph::{
    Assignment, BinaryOp, ConstantType, Graph, GraphBuilder, LabelId, UnaryOp, Variable, Vertex,
};
pub use stream::{CalleeKind, InstructionStream, StreamHeader};
