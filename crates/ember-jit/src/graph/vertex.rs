//! IR vertices
//!
//! One closed enum covers every operation the lowering compiler understands.
//! Optimization passes work through `operands()`, `result()` and
//! `replace_variable()` without knowing the layout of each variant.

use super::variable::{LabelId, Variable};
use crate::error::{JitError, JitResult};

/// Type tag of an encoded constant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstantType {
    Bool,
    Long,
    /// Numeric string, lowered as an integer
    Numeric,
    Double,
    /// Base64-encoded string payload
    String,
}

impl ConstantType {
    /// Parse a constant type tag as it appears in the instruction stream
    pub fn from_tag(tag: &str) -> JitResult<Self> {
        match tag {
            "bool" => Ok(ConstantType::Bool),
            "long" | "int" => Ok(ConstantType::Long),
            "numeric" => Ok(ConstantType::Numeric),
            "double" => Ok(ConstantType::Double),
            "string" => Ok(ConstantType::String),
            _ => Err(JitError::InvalidConstantType { tag: tag.to_string() }),
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            ConstantType::Bool => "bool",
            ConstantType::Long => "long",
            ConstantType::Numeric => "numeric",
            ConstantType::Double => "double",
            ConstantType::String => "string",
        }
    }

    /// Whether the constant lowers to an integer literal
    pub fn is_integral(&self) -> bool {
        matches!(self, ConstantType::Bool | ConstantType::Long | ConstantType::Numeric)
    }
}

impl std::fmt::Display for ConstantType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.tag())
    }
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    /// Logical not (!)
    Not,
    /// Bitwise not (~)
    BitNot,
}

impl UnaryOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            UnaryOp::Not => "!",
            UnaryOp::BitNot => "~",
        }
    }

    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "!" => Some(UnaryOp::Not),
            "~" => Some(UnaryOp::BitNot),
            _ => None,
        }
    }
}

impl std::fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Mod,

    // Comparison
    Equal,
    Identical,
    NotEqual,
    NotIdentical,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,

    // Bitwise
    BitAnd,
    BitOr,
    BitXor,
    ShiftLeft,
    ShiftRight,
}

impl BinaryOp {
    /// The fixed operator set, in stream-symbol order
    pub const ALL: [BinaryOp; 18] = [
        BinaryOp::Add,
        BinaryOp::Sub,
        BinaryOp::Mul,
        BinaryOp::Div,
        BinaryOp::Mod,
        BinaryOp::Equal,
        BinaryOp::Identical,
        BinaryOp::NotEqual,
        BinaryOp::NotIdentical,
        BinaryOp::Less,
        BinaryOp::LessEqual,
        BinaryOp::Greater,
        BinaryOp::GreaterEqual,
        BinaryOp::BitAnd,
        BinaryOp::BitOr,
        BinaryOp::BitXor,
        BinaryOp::ShiftLeft,
        BinaryOp::ShiftRight,
    ];

    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
            BinaryOp::Equal => "==",
            BinaryOp::Identical => "===",
            BinaryOp::NotEqual => "!=",
            BinaryOp::NotIdentical => "!==",
            BinaryOp::Less => "<",
            BinaryOp::LessEqual => "<=",
            BinaryOp::Greater => ">",
            BinaryOp::GreaterEqual => ">=",
            BinaryOp::BitAnd => "&",
            BinaryOp::BitOr => "|",
            BinaryOp::BitXor => "^",
            BinaryOp::ShiftLeft => "<<",
            BinaryOp::ShiftRight => ">>",
        }
    }

    pub fn from_symbol(symbol: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|op| op.symbol() == symbol)
    }
}

impl std::fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// A single IR operation
#[derive(Debug, Clone, PartialEq)]
pub enum Vertex {
    /// `result = <decoded value>`; `value` keeps the stream encoding
    Constant { result: Variable, ty: ConstantType, value: String },
    /// Introduces a variable slot without a value
    VarDecl { result: Variable },
    Assign { source: Variable, result: Variable },
    PropertyFetch { object: Variable, property: String, result: Variable },
    Unary { op: UnaryOp, operand: Variable, result: Variable },
    Binary { op: BinaryOp, left: Variable, right: Variable, result: Variable },
    Label { id: LabelId },
    Jump { target: LabelId },
    /// Jump to `target` when `condition` is falsy
    JumpIfFalse { condition: Variable, target: LabelId },
    Return { value: Option<Variable> },
    Call { callee: String, args: Vec<Variable>, result: Variable },
    /// End of lifetime for `variable`; no code effect
    Free { variable: Variable },
    /// Self-recursive call marker; always rejected at lowering
    Recurse,
}

/// Vertices that produce a value expose it through this capability.
pub trait Assignment {
    /// The variable written by this vertex, fixed at construction
    fn result(&self) -> Option<Variable>;

    fn produces_value(&self) -> bool {
        self.result().is_some()
    }
}

impl Assignment for Vertex {
    fn result(&self) -> Option<Variable> {
        match self {
            Vertex::Constant { result, .. }
            | Vertex::VarDecl { result }
            | Vertex::Assign { result, .. }
            | Vertex::PropertyFetch { result, .. }
            | Vertex::Unary { result, .. }
            | Vertex::Binary { result, .. }
            | Vertex::Call { result, .. } => Some(*result),
            Vertex::Label { .. }
            | Vertex::Jump { .. }
            | Vertex::JumpIfFalse { .. }
            | Vertex::Return { .. }
            | Vertex::Free { .. }
            | Vertex::Recurse => None,
        }
    }
}

impl Vertex {
    /// Variables read by this vertex, in operand order
    pub fn operands(&self) -> Vec<Variable> {
        match self {
            Vertex::Assign { source, .. } => vec![*source],
            Vertex::PropertyFetch { object, .. } => vec![*object],
            Vertex::Unary { operand, .. } => vec![*operand],
            Vertex::Binary { left, right, .. } => vec![*left, *right],
            Vertex::JumpIfFalse { condition, .. } => vec![*condition],
            Vertex::Return { value } => value.iter().copied().collect(),
            Vertex::Call { args, .. } => args.clone(),
            Vertex::Constant { .. }
            | Vertex::VarDecl { .. }
            | Vertex::Label { .. }
            | Vertex::Jump { .. }
            | Vertex::Free { .. }
            | Vertex::Recurse => vec![],
        }
    }

    /// Every variable mentioned by this vertex: operands first, then the result
    pub fn variables(&self) -> Vec<Variable> {
        let mut vars = self.operands();
        match self {
            Vertex::Free { variable } => vars.push(*variable),
            _ => vars.extend(self.result()),
        }
        vars
    }

    /// Whether `var` is read by this vertex
    pub fn uses(&self, var: Variable) -> bool {
        self.operands().contains(&var)
    }

    /// Rewrite every operand slot holding `from` to `to`.
    ///
    /// The result slot and `Free` markers are never rewritten. Returns true if
    /// anything changed.
    pub fn replace_variable(&mut self, from: Variable, to: Variable) -> bool {
        fn sub(slot: &mut Variable, from: Variable, to: Variable) -> bool {
            if *slot == from {
                *slot = to;
                true
            } else {
                false
            }
        }

        match self {
            Vertex::Assign { source, .. } => sub(source, from, to),
            Vertex::PropertyFetch { object, .. } => sub(object, from, to),
            Vertex::Unary { operand, .. } => sub(operand, from, to),
            Vertex::Binary { left, right, .. } => {
                let l = sub(left, from, to);
                let r = sub(right, from, to);
                l || r
            }
            Vertex::JumpIfFalse { condition, .. } => sub(condition, from, to),
            Vertex::Return { value: Some(value) } => sub(value, from, to),
            Vertex::Call { args, .. } => {
                let mut changed = false;
                for arg in args.iter_mut() {
                    changed |= sub(arg, from, to);
                }
                changed
            }
            Vertex::Return { value: None }
            | Vertex::Constant { .. }
            | Vertex::VarDecl { .. }
            | Vertex::Label { .. }
            | Vertex::Jump { .. }
            | Vertex::Free { .. }
            | Vertex::Recurse => false,
        }
    }

    /// Label referenced by a label definition or a jump
    pub fn label(&self) -> Option<LabelId> {
        match self {
            Vertex::Label { id } => Some(*id),
            Vertex::Jump { target } | Vertex::JumpIfFalse { target, .. } => Some(*target),
            _ => None,
        }
    }
}
