//! Block definitions placed at grid cells.

use crate::model::Value;

/// A tile definition: a numeric id plus an ordered argument list.
///
/// Two blocks are equal iff their ids match and their argument lists are
/// equal element by element, including nested lists and maps. Blocks are
/// immutable once constructed.
///
/// The default block `{id: 0, args: []}` is the implicit value of any grid
/// cell never explicitly set, and is the one block the palette codec never
/// persists by reference.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Block {
    id: u32,
    args: Vec<Value>,
}

impl Block {
    /// Creates a block with no arguments.
    pub fn new(id: u32) -> Self {
        Self { id, args: Vec::new() }
    }

    /// Creates a block with the given arguments.
    pub fn with_args(id: u32, args: Vec<Value>) -> Self {
        Self { id, args }
    }

    /// The block's numeric id.
    pub fn id(&self) -> u32 {
        self.id
    }

    /// The block's arguments, possibly empty, never null.
    pub fn args(&self) -> &[Value] {
        &self.args
    }

    /// Returns true for the implicit empty block `{id: 0, args: []}`.
    pub fn is_default(&self) -> bool {
        self.id == 0 && self.args.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_block() {
        assert!(Block::default().is_default());
        assert!(Block::new(0).is_default());
        assert!(!Block::new(1).is_default());
        assert!(!Block::with_args(0, vec![Value::Null]).is_default());
        assert_eq!(Block::default(), Block::new(0));
    }

    #[test]
    fn test_value_equality() {
        let a = Block::with_args(5, vec![Value::Text("x".into()), Value::Int(3)]);
        let b = Block::with_args(5, vec![Value::Text("x".into()), Value::Int(3)]);
        assert_eq!(a, b);

        assert_ne!(a, Block::with_args(6, vec![Value::Text("x".into()), Value::Int(3)]));
        assert_ne!(a, Block::with_args(5, vec![Value::Text("x".into())]));
        assert_ne!(a, Block::with_args(5, vec![Value::Int(3), Value::Text("x".into())]));
    }

    #[test]
    fn test_nested_arg_equality() {
        let nested = |n: i64| Block::with_args(9, vec![Value::List(vec![Value::Int(n)])]);
        assert_eq!(nested(1), nested(1));
        assert_ne!(nested(1), nested(2));
    }
}
