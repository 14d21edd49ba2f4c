//! Variable and label identities
//!
//! Both are plain indices handed out by a [`Graph`](super::Graph). Equality
//! is identity: two variables are the same slot only if their indices match.

/// SSA-style value slot in the IR
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Variable(pub u32);

impl Variable {
    /// The implicit receiver of a method body (`$this` in the tuple form)
    pub const RECEIVER: Variable = Variable(u32::MAX);

    pub fn new(id: u32) -> Self {
        Self(id)
    }

    pub fn as_u32(&self) -> u32 {
        self.0
    }

    pub fn is_receiver(&self) -> bool {
        *self == Self::RECEIVER
    }
}

impl std::fmt::Display for Variable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_receiver() {
            write!(f, "this")
        } else {
            write!(f, "v{}", self.0)
        }
    }
}

/// Control-flow label identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LabelId(pub u32);

impl LabelId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    pub fn as_u32(&self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for LabelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "L{}", self.0)
    }
}
