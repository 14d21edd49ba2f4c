//! Pluggable textual targets
//!
//! The lowering protocol is target-agnostic: the compiler resolves scope,
//! labels and constants, then asks a `Target` to spell each statement.
//! `ScriptTarget` is the stock implementation; it produces dynamic-script
//! source (`$var2 = $var3 + 1;`, `goto label_1;`) suitable for `eval`.

use super::literal::{self, Literal};
use crate::config::CompilerConfig;
use crate::graph::{BinaryOp, UnaryOp};

/// Spelling of every construct the lowering compiler emits.
///
/// Statement methods return complete lines including the trailing newline.
pub trait Target {
    /// Target name (for diagnostics)
    fn name(&self) -> &str;

    /// Spelling of the implicit receiver, bound before any parameter
    fn receiver(&self) -> &str;

    /// Symbolic name for the `slot`-th scope binding
    fn variable_name(&self, slot: usize) -> String;

    /// Name of the `index`-th allocated label (1-based)
    fn label_name(&self, index: usize) -> String;

    fn literal(&self, literal: &Literal) -> String;

    fn assign(&self, result: &str, source: &str) -> String;

    fn property_fetch(&self, result: &str, object: &str, property: &str) -> String;

    fn unary(&self, result: &str, op: UnaryOp, operand: &str) -> String;

    fn binary(&self, result: &str, left: &str, op: BinaryOp, right: &str) -> String;

    fn label(&self, label: &str) -> String;

    fn jump(&self, label: &str) -> String;

    fn jump_if_false(&self, condition: &str, label: &str) -> String;

    fn ret(&self, value: Option<&str>) -> String;

    fn call(&self, result: &str, callee: &str, args: &[&str]) -> String;

    /// Wrap a lowered body into a callable declaration
    fn function(&self, name: &str, params: &[String], body: &str) -> String;

    /// One property declaration line; `default` is already rendered
    fn property(&self, modifiers: &str, name: &str, default: Option<&str>) -> String;

    /// One method: modifier prefix plus the lowered callable
    fn method(&self, modifiers: &str, code: &str) -> String;

    fn class(&self, name: &str, extends: Option<&str>, implements: &[String], members: &str) -> String;
}

/// Dynamic-script target
#[derive(Debug, Clone, Default)]
pub struct ScriptTarget {
    config: CompilerConfig,
}

impl ScriptTarget {
    pub fn new(config: CompilerConfig) -> Self {
        ScriptTarget { config }
    }

    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }
}

impl Target for ScriptTarget {
    fn name(&self) -> &str {
        "script"
    }

    fn receiver(&self) -> &str {
        &self.config.receiver
    }

    fn variable_name(&self, slot: usize) -> String {
        format!("{}{}", self.config.variable_prefix, slot)
    }

    fn label_name(&self, index: usize) -> String {
        format!("{}{}", self.config.label_prefix, index)
    }

    fn literal(&self, literal: &Literal) -> String {
        match literal {
            Literal::Int(v) => v.to_string(),
            Literal::Float(v) if v.is_nan() => "NAN".to_string(),
            Literal::Float(v) if v.is_infinite() => {
                if *v > 0.0 { "INF".to_string() } else { "-INF".to_string() }
            }
            // Debug keeps a fractional part (`1.0`), so the literal stays a float
            Literal::Float(v) => format!("{:?}", v),
            Literal::Str(s) => format!("'{}'", literal::escape(s)),
        }
    }

    fn assign(&self, result: &str, source: &str) -> String {
        format!("{} = {};\n", result, source)
    }

    fn property_fetch(&self, result: &str, object: &str, property: &str) -> String {
        format!("{} = {}->{};\n", result, object, property)
    }

    fn unary(&self, result: &str, op: UnaryOp, operand: &str) -> String {
        format!("{} = {}{};\n", result, op.symbol(), operand)
    }

    fn binary(&self, result: &str, left: &str, op: BinaryOp, right: &str) -> String {
        format!("{} = {} {} {};\n", result, left, op.symbol(), right)
    }

    fn label(&self, label: &str) -> String {
        format!("{}:\n", label)
    }

    fn jump(&self, label: &str) -> String {
        format!("goto {};\n", label)
    }

    fn jump_if_false(&self, condition: &str, label: &str) -> String {
        format!("if (!{}) {{ goto {}; }}\n", condition, label)
    }

    fn ret(&self, value: Option<&str>) -> String {
        match value {
            Some(value) => format!("return {};\n", value),
            None => "return;\n".to_string(),
        }
    }

    fn call(&self, result: &str, callee: &str, args: &[&str]) -> String {
        format!("{} = {}({});\n", result, callee, args.join(", "))
    }

    fn function(&self, name: &str, params: &[String], body: &str) -> String {
        format!("function {}({}) {{\n{}}}", name, params.join(", "), body)
    }

    fn property(&self, modifiers: &str, name: &str, default: Option<&str>) -> String {
        match default {
            Some(default) => format!("{} ${} = {};\n", modifiers, name, default),
            None => format!("{} ${};\n", modifiers, name),
        }
    }

    fn method(&self, modifiers: &str, code: &str) -> String {
        format!("{} {}\n", modifiers, code)
    }

    fn class(&self, name: &str, extends: Option<&str>, implements: &[String], members: &str) -> String {
        let mut header = format!("class {}", name);
        if let Some(parent) = extends {
            header.push_str(" extends ");
            header.push_str(parent);
        }
        if !implements.is_empty() {
            header.push_str(" implements ");
            header.push_str(&implements.join(", "));
        }
        format!("{} {{\n{}\n}}", header, members)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_naming() {
        let target = ScriptTarget::default();
        assert_eq!(target.name(), "script");
        assert_eq!(target.receiver(), "$this");
        assert_eq!(target.variable_name(2), "$var2");
        assert_eq!(target.label_name(1), "label_1");
    }

    #[test]
    fn test_configured_naming() {
        let config = CompilerConfig {
            variable_prefix: "$t".to_string(),
            label_prefix: "L".to_string(),
            ..CompilerConfig::default()
        };
        let target = ScriptTarget::new(config);
        assert_eq!(target.variable_name(5), "$t5");
        assert_eq!(target.label_name(3), "L3");
    }

    #[test]
    fn test_literals() {
        let target = ScriptTarget::default();
        assert_eq!(target.literal(&Literal::Int(-3)), "-3");
        assert_eq!(target.literal(&Literal::Float(1.5)), "1.5");
        assert_eq!(target.literal(&Literal::Float(1.0)), "1.0");
        assert_eq!(target.literal(&Literal::Float(-0.25)), "-0.25");
        assert_eq!(target.literal(&Literal::Float(1e20)), "1e20");
        assert_eq!(target.literal(&Literal::Float(f64::INFINITY)), "INF");
        assert_eq!(target.literal(&Literal::Str("it's".to_string())), "'it\\'s'");
    }

    #[test]
    fn test_statements() {
        let target = ScriptTarget::default();
        assert_eq!(target.binary("$var4", "$var2", BinaryOp::NotIdentical, "$var3"), "$var4 = $var2 !== $var3;\n");
        assert_eq!(target.unary("$var3", UnaryOp::BitNot, "$var2"), "$var3 = ~$var2;\n");
        assert_eq!(target.jump_if_false("$var2", "label_1"), "if (!$var2) { goto label_1; }\n");
        assert_eq!(target.call("$var3", "max", &["$var2", "1"]), "$var3 = max($var2, 1);\n");
        assert_eq!(target.ret(None), "return;\n");
    }

    #[test]
    fn test_class_wrapper() {
        let target = ScriptTarget::default();
        let text = target.class("Foo", Some("Bar"), &["A".to_string(), "B".to_string()], "");
        assert_eq!(text, "class Foo extends Bar implements A, B {\n\n}");
        assert_eq!(target.class("Foo", None, &[], ""), "class Foo {\n\n}");
    }
}
