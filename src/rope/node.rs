use std::cmp::max;
use std::sync::Arc;

use crate::config::RopeConfig;

use super::balance;
use super::chunk::Chunk;

pub(crate) enum Node {
    Leaf(Chunk),
    Branch {
        left: Arc<Node>,
        right: Arc<Node>,
        weight: usize,
        len: usize,
        height: usize,
    },
}

impl Node {
    pub(crate) fn empty() -> Arc<Self> {
        Node::new_leaf(Chunk::empty())
    }

    pub(crate) fn new_leaf(chunk: Chunk) -> Arc<Self> {
        Arc::new(Node::Leaf(chunk))
    }

    /// Joins two subtrees as-is. Callers that hand the result out go through `balance::join`.
    pub(crate) fn new_branch(left: Arc<Self>, right: Arc<Self>) -> Arc<Self> {
        Arc::new(Node::Branch {
            weight: left.len(),
            len: left.len() + right.len(),
            height: 1 + max(left.height(), right.height()),
            left,
            right,
        })
    }

    pub(crate) fn len(&self) -> usize {
        match self {
            Node::Leaf(chunk) => chunk.len(),
            Node::Branch { len, .. } => *len,
        }
    }

    pub(crate) fn height(&self) -> usize {
        match self {
            Node::Leaf(_) => 0,
            Node::Branch { height, .. } => *height,
        }
    }

    /// Caller guarantees `index < self.len()`.
    pub(crate) fn char_at(&self, mut index: usize) -> char {
        let mut node = self;
        loop {
            match node {
                Node::Leaf(chunk) => return chunk[index],
                Node::Branch { left, right, weight, .. } => {
                    if index < *weight {
                        node = left.as_ref();
                    } else {
                        index -= weight;
                        node = right.as_ref();
                    }
                }
            }
        }
    }

    /// Appends the characters of `[start, end)` to `out`, skipping subtrees outside the range.
    pub(crate) fn collect_range(&self, start: usize, end: usize, out: &mut String) {
        if start >= end {
            return;
        }

        match self {
            Node::Leaf(chunk) => out.extend(&chunk[start..end]),
            Node::Branch { left, right, weight, .. } => {
                if start < *weight {
                    left.collect_range(start, end.min(*weight), out);
                }
                if end > *weight {
                    right.collect_range(start.saturating_sub(*weight), end - weight, out);
                }
            }
        }
    }
}

/// Splits into `[0, index)` and `[index, len)`. Subtrees lying entirely on one side are reused.
///
/// Caller guarantees `index <= node.len()`.
pub(crate) fn split(node: &Arc<Node>, index: usize, config: &RopeConfig) -> (Arc<Node>, Arc<Node>) {
    if index == 0 {
        return (Node::empty(), node.clone());
    }
    if index == node.len() {
        return (node.clone(), Node::empty());
    }

    match node.as_ref() {
        Node::Leaf(chunk) => {
            let (left, right) = chunk.split_at(index);
            (Node::new_leaf(left), Node::new_leaf(right))
        }
        Node::Branch { left, right, weight, .. } => {
            if index <= *weight {
                let (left_left, left_right) = split(left, index, config);
                (left_left, balance::join(&left_right, right, config))
            } else {
                let (right_left, right_right) = split(right, index - weight, config);
                (balance::join(left, &right_left, config), right_right)
            }
        }
    }
}

#[cfg(test)]
pub(crate) fn assert_invariants(node: &Node, config: &RopeConfig) {
    if let Node::Branch { left, right, weight, len, height } = node {
        assert_eq!(*weight, left.len(), "stale weight");
        assert_eq!(*len, left.len() + right.len(), "stale length");
        assert_eq!(*height, 1 + max(left.height(), right.height()), "stale height");
        assert!(left.len() > 0 && right.len() > 0, "branch over an empty child");
        assert!(*height <= config.max_height(*len), "height {} over bound for length {}", height, len);
        assert_invariants(left, config);
        assert_invariants(right, config);
    } else if let Node::Leaf(chunk) = node {
        assert!(chunk.len() <= config.max_leaf_size(), "oversized leaf of {}", chunk.len());
    }
}
