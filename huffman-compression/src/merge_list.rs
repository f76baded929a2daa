use std::collections::VecDeque;

use itertools::Itertools;

use crate::tree::Tree;

/// Trees waiting to be merged, ascending by weight.
///
/// Leaves of equal weight keep the order they were supplied in, so feeding
/// them in symbol order makes the lower symbol value come first. A merged
/// parent goes in front of every existing tree whose weight is equal to or
/// greater than its own. Both rules decide the final code lengths and must
/// not change, otherwise the same input compresses to different bytes.
#[derive(Debug, Default)]
pub struct MergeList(VecDeque<Tree>);

impl FromIterator<Tree> for MergeList {
    fn from_iter<T: IntoIterator<Item = Tree>>(iter: T) -> Self {
        // sorted_by_key is stable, ties stay in supply order
        let sorted_trees = iter.into_iter().sorted_by_key(Tree::weight).collect();
        Self(sorted_trees)
    }
}

impl MergeList {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn weights(&self) -> impl Iterator<Item = u64> + '_ {
        self.0.iter().map(Tree::weight)
    }

    pub fn merge(mut self) -> Option<Tree> {
        loop {
            match self.pop_lowest()? {
                PopResult::TreesToMerge { lowest, second } => {
                    self.insert(Tree::join(lowest, second));
                }
                PopResult::Single(tree) => return Some(tree),
            }
        }
    }

    fn pop_lowest(&mut self) -> Option<PopResult> {
        let lowest = self.0.pop_front()?;

        let item_result = match self.0.pop_front() {
            Some(second) => PopResult::TreesToMerge { lowest, second },
            None => PopResult::Single(lowest),
        };

        Some(item_result)
    }

    fn insert(&mut self, tree: Tree) {
        let weight = tree.weight();
        let position = self
            .0
            .iter()
            .position(|existing| weight <= existing.weight())
            .unwrap_or(self.0.len());
        self.0.insert(position, tree);
    }
}

enum PopResult {
    TreesToMerge { lowest: Tree, second: Tree },
    Single(Tree),
}

#[cfg(test)]
mod tests {
    use itertools::Itertools;

    use super::MergeList;
    use crate::tree::Tree;

    fn list(values: &[(u8, u64)]) -> MergeList {
        MergeList::from_iter(values.iter().copied().map_into::<Tree>())
    }

    #[test]
    fn test_initial_order_is_ascending_and_stable() {
        let list = list(&[(b'a', 5), (b'b', 1), (b'c', 5), (b'd', 1)]);
        let symbols = list
            .0
            .iter()
            .map(|tree| match tree {
                Tree::Leaf { symbol, .. } => *symbol,
                Tree::Branch { .. } => unreachable!(),
            })
            .collect_vec();

        assert_eq!(symbols, vec![b'b', b'd', b'a', b'c']);
        assert_eq!(list.weights().collect_vec(), vec![1, 1, 5, 5]);
    }

    #[test]
    fn test_parent_goes_before_equal_weights() {
        let mut list = list(&[(b'a', 1), (b'b', 1), (b'c', 2), (b'd', 3)]);
        let merged = match list.pop_lowest().unwrap() {
            super::PopResult::TreesToMerge { lowest, second } => Tree::join(lowest, second),
            super::PopResult::Single(_) => unreachable!(),
        };
        list.insert(merged);

        // the merged (a, b) weighs 2 and lands ahead of leaf c
        assert!(!list.0[0].is_leaf());
        assert!(list.0[1].is_leaf());
        assert_eq!(list.weights().collect_vec(), vec![2, 2, 3]);
    }

    #[test]
    fn test_parent_goes_to_the_back_when_heaviest() {
        let mut list = list(&[(b'a', 4), (b'b', 4), (b'c', 5)]);
        let merged = match list.pop_lowest().unwrap() {
            super::PopResult::TreesToMerge { lowest, second } => Tree::join(lowest, second),
            super::PopResult::Single(_) => unreachable!(),
        };
        list.insert(merged);

        assert_eq!(list.weights().collect_vec(), vec![5, 8]);
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn test_merge_leaves_one_root() {
        let root = list(&[(b'a', 1), (b'b', 2), (b'c', 3), (b'd', 4)])
            .merge()
            .unwrap();

        assert_eq!(root.weight(), 10);
        assert_eq!(root.leaves(), 4);
        assert!(MergeList::default().merge().is_none());
        assert!(MergeList::default().is_empty());
    }
}
