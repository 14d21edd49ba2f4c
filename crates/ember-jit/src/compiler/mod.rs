//! Lowering compiler: instruction stream → target text
//!
//! Lowering one callable runs in three steps:
//! 1. Return the cached text if the declared name was lowered before
//! 2. Bind each declared parameter to a fresh symbolic name
//! 3. Walk the body in order, resolving scope and labels and emitting one
//!    statement per vertex (constants are inlined, not emitted)
//!
//! The result is stored in the compile cache under the declared name.

pub mod cache;
pub mod context;
pub mod literal;
pub mod target;

pub use cache::{CompileCache, MemoryCache, SharedCache};
pub use context::{Binding, LoweringState};
pub use literal::Literal;
pub use target::{ScriptTarget, Target};

use std::borrow::Borrow;

use serde_json::Value;

use crate::class::{ClassConverter, ClassDescriptor};
use crate::config::CompilerConfig;
use crate::error::{JitError, JitResult};
use crate::graph::Vertex;
use crate::stream::{self, InstructionStream, StreamHeader};

/// Lowers instruction streams through a target, memoizing by callable name
pub struct Compiler<T: Target = ScriptTarget, C: CompileCache = MemoryCache> {
    target: T,
    cache: C,
}

impl Compiler<ScriptTarget, MemoryCache> {
    /// Create a compiler with the script target and a private cache
    pub fn new() -> Self {
        Self::with_config(CompilerConfig::default())
    }

    pub fn with_config(config: CompilerConfig) -> Self {
        Compiler {
            target: ScriptTarget::new(config),
            cache: MemoryCache::new(),
        }
    }
}

impl Default for Compiler<ScriptTarget, MemoryCache> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Target, C: CompileCache> Compiler<T, C> {
    /// Create a compiler from an explicit target and cache
    pub fn with_parts(target: T, cache: C) -> Self {
        Compiler { target, cache }
    }

    /// Lower one callable.
    ///
    /// A name that is already cached short-circuits: the cached text is
    /// returned even if `stream` differs from what produced it.
    pub fn lower(&mut self, stream: &InstructionStream) -> JitResult<String> {
        let name = stream.name();
        if let Some(code) = self.cache.get(name) {
            log::trace!("[lower] cache hit for {}", name);
            return Ok(code);
        }

        log::debug!(
            "[lower] {} via {} ({} params, {} vertices)",
            name,
            self.target.name(),
            stream.params().len(),
            stream.body.len()
        );

        let code = self.lower_body(&stream.header, stream.body.iter().map(Ok))?;
        self.cache.insert(name.to_string(), code.clone());
        Ok(code)
    }

    /// Lower a tuple-encoded stream.
    ///
    /// Only the header is read before the cache lookup, so a cached name
    /// never decodes its body. Body tuples are decoded one at a time as they
    /// are lowered, so the first failure in stream order is the one reported.
    pub fn lower_json(&mut self, value: &Value) -> JitResult<String> {
        let name = stream::header_name(value)?;
        if let Some(code) = self.cache.get(name) {
            log::trace!("[lower] cache hit for {}", name);
            return Ok(code);
        }

        let (header, items, body_start) = stream::decoder::decode_header(value)?;
        log::debug!(
            "[lower] {} via {} ({} params, {} tuples)",
            header.name,
            self.target.name(),
            header.params.len(),
            items.len() - body_start
        );

        let body = items[body_start..]
            .iter()
            .enumerate()
            .map(|(offset, item)| stream::decoder::decode_vertex(item, body_start + offset));
        let code = self.lower_body(&header, body)?;
        self.cache.insert(header.name, code.clone());
        Ok(code)
    }

    /// Lower every method of a class and compose the declaration
    pub fn lower_class(&mut self, class: &ClassDescriptor) -> JitResult<String> {
        ClassConverter::new(self).convert(class)
    }

    fn lower_body<I, V>(&self, header: &StreamHeader, body: I) -> JitResult<String>
    where
        I: IntoIterator<Item = JitResult<V>>,
        V: Borrow<Vertex>,
    {
        let mut state = LoweringState::new(&self.target);

        let params: Vec<String> = header
            .params
            .iter()
            .map(|param| state.declare(*param, &self.target))
            .collect();

        for vertex in body {
            self.lower_vertex(vertex?.borrow(), &mut state)?;
        }

        Ok(self.target.function(&header.name, &params, state.output()))
    }

    fn lower_vertex(&self, vertex: &Vertex, state: &mut LoweringState) -> JitResult<()> {
        let target = &self.target;

        let statement = match vertex {
            Vertex::Free { .. } => return Ok(()),
            Vertex::Constant { result, ty, value } => {
                let literal = literal::decode(*ty, value)?;
                state.bind_literal(*result, target.literal(&literal));
                return Ok(());
            }
            Vertex::VarDecl { result } => {
                state.declare(*result, target);
                return Ok(());
            }
            Vertex::Assign { source, result } => {
                target.assign(state.lookup(*result)?, state.lookup(*source)?)
            }
            Vertex::PropertyFetch { object, property, result } => {
                target.property_fetch(state.lookup(*result)?, state.lookup(*object)?, property)
            }
            Vertex::Unary { op, operand, result } => {
                target.unary(state.lookup(*result)?, *op, state.lookup(*operand)?)
            }
            Vertex::Binary { op, left, right, result } => target.binary(
                state.lookup(*result)?,
                state.lookup(*left)?,
                *op,
                state.lookup(*right)?,
            ),
            Vertex::Label { id } => {
                let label = state.label(*id, target);
                target.label(&label)
            }
            Vertex::Jump { target: id } => {
                let label = state.label(*id, target);
                target.jump(&label)
            }
            Vertex::JumpIfFalse { condition, target: id } => {
                let condition = state.lookup(*condition)?.to_string();
                let label = state.label(*id, target);
                target.jump_if_false(&condition, &label)
            }
            Vertex::Return { value: Some(value) } => target.ret(Some(state.lookup(*value)?)),
            Vertex::Return { value: None } => target.ret(None),
            Vertex::Call { callee, args, result } => {
                let args = args
                    .iter()
                    .map(|arg| state.lookup(*arg))
                    .collect::<JitResult<Vec<_>>>()?;
                target.call(state.lookup(*result)?, callee, &args)
            }
            Vertex::Recurse => return Err(JitError::recursion()),
        };

        state.emit(&statement);
        Ok(())
    }

    pub fn target(&self) -> &T {
        &self.target
    }

    pub fn cache(&self) -> &C {
        &self.cache
    }
}
