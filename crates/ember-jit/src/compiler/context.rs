//! Per-callable lowering state
//!
//! Holds the scope map, label table and output buffer for one callable.
//! A fresh state is built for every lowering, so naming never leaks between
//! callables.

use rustc_hash::FxHashMap;

use super::target::Target;
use crate::error::{JitError, JitResult};
use crate::graph::{LabelId, Variable};

/// What a variable resolves to inside the emitted body
#[derive(Debug, Clone, PartialEq)]
pub enum Binding {
    /// Generated symbolic name (`$var3`)
    Name(String),
    /// Inlined constant literal (`'it\'s'`, `42`)
    Literal(String),
}

impl Binding {
    pub fn as_str(&self) -> &str {
        match self {
            Binding::Name(s) | Binding::Literal(s) => s,
        }
    }
}

/// State maintained during lowering of a single callable
pub struct LoweringState {
    scope: FxHashMap<Variable, Binding>,
    labels: FxHashMap<LabelId, String>,
    output: String,
    /// Next scope slot. Slot 1 is the implicit receiver binding, so the
    /// counter starts at 2. Every binding (literals included) takes a slot.
    next_slot: usize,
}

impl LoweringState {
    pub const RECEIVER_SLOT: usize = 1;

    /// Fresh state with the receiver already in scope
    pub fn new<T: Target + ?Sized>(target: &T) -> Self {
        let mut scope = FxHashMap::default();
        scope.insert(Variable::RECEIVER, Binding::Name(target.receiver().to_string()));
        LoweringState {
            scope,
            labels: FxHashMap::default(),
            output: String::new(),
            next_slot: Self::RECEIVER_SLOT + 1,
        }
    }

    /// Bind `var` to a fresh symbolic name and return it
    pub fn declare<T: Target + ?Sized>(&mut self, var: Variable, target: &T) -> String {
        let name = target.variable_name(self.next_slot);
        self.next_slot += 1;
        self.scope.insert(var, Binding::Name(name.clone()));
        name
    }

    /// Bind `var` directly to an inlined literal
    pub fn bind_literal(&mut self, var: Variable, literal: String) {
        self.next_slot += 1;
        self.scope.insert(var, Binding::Literal(literal));
    }

    /// Resolve `var`, failing if it was never introduced
    pub fn lookup(&self, var: Variable) -> JitResult<&str> {
        self.scope
            .get(&var)
            .map(Binding::as_str)
            .ok_or_else(|| JitError::UnboundVariable { variable: var.to_string() })
    }

    pub fn binding(&self, var: Variable) -> Option<&Binding> {
        self.scope.get(&var)
    }

    /// Resolve a label, allocating its name on first reference
    pub fn label<T: Target + ?Sized>(&mut self, id: LabelId, target: &T) -> String {
        let next = self.labels.len() + 1;
        self.labels
            .entry(id)
            .or_insert_with(|| target.label_name(next))
            .clone()
    }

    /// Append a lowered statement
    pub fn emit(&mut self, statement: &str) {
        self.output.push_str(statement);
    }

    pub fn output(&self) -> &str {
        &self.output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::target::ScriptTarget;

    #[test]
    fn test_slots_start_after_receiver() {
        let target = ScriptTarget::default();
        let mut state = LoweringState::new(&target);
        assert_eq!(state.lookup(Variable::RECEIVER).unwrap(), "$this");
        assert_eq!(state.declare(Variable(10), &target), "$var2");
        state.bind_literal(Variable(11), "42".to_string());
        assert_eq!(state.declare(Variable(12), &target), "$var4");

        assert_eq!(state.lookup(Variable(11)).unwrap(), "42");
        assert_eq!(state.binding(Variable(10)), Some(&Binding::Name("$var2".to_string())));
    }

    #[test]
    fn test_redeclare_never_reuses_names() {
        let target = ScriptTarget::default();
        let mut state = LoweringState::new(&target);
        assert_eq!(state.declare(Variable(1), &target), "$var2");
        assert_eq!(state.declare(Variable(1), &target), "$var3");
        assert_eq!(state.lookup(Variable(1)).unwrap(), "$var3");
    }

    #[test]
    fn test_unbound_lookup() {
        let state = LoweringState::new(&ScriptTarget::default());
        let err = state.lookup(Variable(3)).unwrap_err();
        assert!(matches!(err, JitError::UnboundVariable { ref variable } if variable == "v3"));
    }

    #[test]
    fn test_labels_in_first_reference_order() {
        let target = ScriptTarget::default();
        let mut state = LoweringState::new(&target);
        assert_eq!(state.label(LabelId(7), &target), "label_1");
        assert_eq!(state.label(LabelId(3), &target), "label_2");
        assert_eq!(state.label(LabelId(7), &target), "label_1");
        assert_eq!(state.label(LabelId(9), &target), "label_3");
    }
}
