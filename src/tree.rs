use generational_arena::{Arena, Index};

use crate::{Count, Symbol};

/// Which branch to take below an internal node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    Left,
    Right,
}

impl From<bool> for Step {
    fn from(bit: bool) -> Step {
        if bit {
            Step::Right
        } else {
            Step::Left
        }
    }
}

/// A leaf (one symbol) or an internal merge point.
///
/// Weights are only known for trees produced by the builder; nodes created
/// while replaying a table carry `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeNode {
    weight: Option<Count>,
    symbol: Option<Symbol>,
    left: Option<Index>,
    right: Option<Index>,
}

impl CodeNode {
    pub(crate) fn leaf(symbol: Symbol, weight: Option<Count>) -> Self {
        CodeNode {
            weight,
            symbol: Some(symbol),
            left: None,
            right: None,
        }
    }

    pub(crate) fn internal(weight: Count, left: Index, right: Index) -> Self {
        CodeNode {
            weight: Some(weight),
            symbol: None,
            left: Some(left),
            right: Some(right),
        }
    }

    /// An internal node whose children have not been attached yet.
    pub(crate) fn branch() -> Self {
        CodeNode {
            weight: None,
            symbol: None,
            left: None,
            right: None,
        }
    }

    pub fn weight(&self) -> Option<Count> {
        self.weight
    }

    pub fn symbol(&self) -> Option<Symbol> {
        self.symbol
    }

    pub fn left(&self) -> Option<Index> {
        self.left
    }

    pub fn right(&self) -> Option<Index> {
        self.right
    }

    pub fn child(&self, step: Step) -> Option<Index> {
        match step {
            Step::Left => self.left,
            Step::Right => self.right,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.symbol.is_some() && self.left.is_none() && self.right.is_none()
    }
}

/// Arena-backed binary code tree.
///
/// Nodes reference their children by arena index; there are no parent links.
/// Dropping the tree drops every node.
#[derive(Debug, Clone)]
pub struct CodeTree {
    arena: Arena<CodeNode>,
    root: Index,
}

impl CodeTree {
    /// A tree holding a single childless internal node as its root.
    pub(crate) fn with_branch_root() -> Self {
        let mut arena = Arena::new();
        let root = arena.insert(CodeNode::branch());
        CodeTree { arena, root }
    }

    pub(crate) fn from_parts(arena: Arena<CodeNode>, root: Index) -> Self {
        CodeTree { arena, root }
    }

    pub(crate) fn attach(&mut self, parent: Index, step: Step, node: CodeNode) -> Index {
        let idx = self.arena.insert(node);
        if let Some(parent) = self.arena.get_mut(parent) {
            match step {
                Step::Left => parent.left = Some(idx),
                Step::Right => parent.right = Some(idx),
            }
        }
        idx
    }

    pub fn root(&self) -> Index {
        self.root
    }

    pub fn node(&self, idx: Index) -> Option<&CodeNode> {
        self.arena.get(idx)
    }

    pub fn root_node(&self) -> Option<&CodeNode> {
        self.node(self.root)
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    pub fn leaf_count(&self) -> usize {
        self.arena.iter().filter(|(_, node)| node.is_leaf()).count()
    }

    /// True when no node has exactly one child attached.
    pub fn is_full(&self) -> bool {
        self.arena
            .iter()
            .all(|(_, node)| node.left.is_some() == node.right.is_some())
    }

    /// Symbols of all leaves, in no particular order.
    pub fn symbols(&self) -> impl Iterator<Item = Symbol> + '_ {
        self.arena.iter().filter_map(|(_, node)| node.symbol)
    }

    pub(crate) fn nodes(&self) -> impl Iterator<Item = (Index, &CodeNode)> + '_ {
        self.arena.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attach_links_children() {
        let mut tree = CodeTree::with_branch_root();
        let root = tree.root();
        assert!(!tree.root_node().unwrap().is_leaf());
        assert!(tree.is_full());

        let left = tree.attach(root, Step::Left, CodeNode::leaf(7, None));
        assert!(!tree.is_full());
        let right = tree.attach(root, Step::Right, CodeNode::leaf(9, None));
        assert!(tree.is_full());

        let node = tree.root_node().unwrap();
        assert_eq!(node.child(Step::Left), Some(left));
        assert_eq!(node.child(Step::Right), Some(right));
        assert_eq!(tree.node(left).unwrap().symbol(), Some(7));
        assert_eq!(tree.leaf_count(), 2);
        assert_eq!(tree.len(), 3);
    }

    #[test]
    fn internal_nodes_are_not_leaves() {
        let mut arena = Arena::new();
        let a = arena.insert(CodeNode::leaf(1, Some(2)));
        let b = arena.insert(CodeNode::leaf(2, Some(3)));
        let root = arena.insert(CodeNode::internal(5, a, b));
        let tree = CodeTree::from_parts(arena, root);

        let root = tree.root_node().unwrap();
        assert!(!root.is_leaf());
        assert_eq!(root.weight(), Some(5));
        assert_eq!(root.symbol(), None);
        let mut symbols: Vec<Symbol> = tree.symbols().collect();
        symbols.sort_unstable();
        assert_eq!(symbols, vec![1, 2]);
    }

    #[test]
    fn step_from_bit() {
        assert_eq!(Step::from(false), Step::Left);
        assert_eq!(Step::from(true), Step::Right);
    }
}
