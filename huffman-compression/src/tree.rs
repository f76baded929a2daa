use std::fmt;

use itertools::Itertools;

use crate::merge_list::MergeList;

/// A strict binary prefix-code tree. Every branch owns exactly two children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tree {
    Leaf { symbol: u8, count: u64 },
    Branch {
        weight: u64,
        left: Box<Tree>,
        right: Box<Tree>,
    },
}

impl From<(u8, u64)> for Tree {
    fn from((symbol, count): (u8, u64)) -> Self {
        Tree::Leaf { symbol, count }
    }
}

impl Tree {
    /// Builds the tree from `(symbol, count)` pairs given in symbol order.
    /// Returns `None` when there is nothing to build from.
    pub fn new(values: impl IntoIterator<Item = (u8, u64)>) -> Option<Self> {
        let list = MergeList::from_iter(values.into_iter().map_into());
        list.merge()
    }

    pub(crate) fn join(left: Tree, right: Tree) -> Self {
        Tree::Branch {
            weight: left.weight() + right.weight(),
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn weight(&self) -> u64 {
        match self {
            Tree::Leaf { count, .. } => *count,
            Tree::Branch { weight, .. } => *weight,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Tree::Leaf { .. })
    }

    pub fn leaves(&self) -> usize {
        match self {
            Tree::Leaf { .. } => 1,
            Tree::Branch { left, right, .. } => left.leaves() + right.leaves(),
        }
    }

    pub fn depth(&self) -> usize {
        match self {
            Tree::Leaf { .. } => 0,
            Tree::Branch { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }
}

/// Preorder shape: `1` for a branch, `0[symbol]` for a leaf.
impl fmt::Display for Tree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tree::Leaf { symbol, .. } => write!(f, "0[{symbol}]"),
            Tree::Branch { left, right, .. } => write!(f, "1{left}{right}"),
        }
    }
}
