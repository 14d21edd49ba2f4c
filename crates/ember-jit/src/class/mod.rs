//! Class conversion
//!
//! A class declaration becomes one target class definition: property
//! lines first, then each method body lowered through the compiler and
//! prefixed with its modifiers. Method bodies go through the same compile
//! cache as free functions, keyed by method name.

pub mod descriptor;

pub use descriptor::{ClassDescriptor, MethodDescriptor, MethodModifiers, PropertyDecl, Visibility};

use crate::compiler::literal::{self, Literal};
use crate::compiler::{CompileCache, Compiler, Target};
use crate::error::JitResult;

/// Converts class descriptors using a borrowed compiler
pub struct ClassConverter<'c, T: Target, C: CompileCache> {
    compiler: &'c mut Compiler<T, C>,
}

impl<'c, T: Target, C: CompileCache> ClassConverter<'c, T, C> {
    pub fn new(compiler: &'c mut Compiler<T, C>) -> Self {
        Self { compiler }
    }

    /// Produce the full class definition text
    pub fn convert(&mut self, class: &ClassDescriptor) -> JitResult<String> {
        log::debug!(
            "[class] converting {} ({} properties, {} methods)",
            class.name,
            class.properties.len(),
            class.methods.len()
        );

        let mut members = String::new();
        for property in &class.properties {
            members.push_str(&self.property(property)?);
        }
        for method in &class.methods {
            members.push_str(&self.method(method)?);
        }

        Ok(self.compiler.target().class(
            &class.name,
            class.extends.as_deref(),
            &class.implements,
            &members,
        ))
    }

    fn property(&self, property: &PropertyDecl) -> JitResult<String> {
        let mut modifiers = property.visibility.keyword().to_string();
        if property.is_static {
            modifiers.push_str(" static");
        }

        let target = self.compiler.target();
        let default = match property.default.as_deref() {
            Some(encoded) if property.ty == "string" => {
                Some(target.literal(&Literal::Str(literal::decode_string(encoded)?)))
            }
            Some(raw) => Some(raw.to_string()),
            None => None,
        };

        Ok(target.property(&modifiers, &property.name, default.as_deref()))
    }

    fn method(&mut self, method: &MethodDescriptor) -> JitResult<String> {
        let stream = method.stream.clone().into_function();
        let code = self.compiler.lower(&stream)?;
        Ok(self.compiler.target().method(&method.modifiers.render(), &code))
    }
}
