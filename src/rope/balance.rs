use std::mem::take;
use std::sync::Arc;

use tracing::{debug, trace};

use crate::config::RopeConfig;

use super::chunk::Chunk;
use super::node::Node;

/// Concatenates two subtrees, keeping the height bound for every new node.
///
/// Empty sides are dropped. When either leaf meeting at the junction is undersized, the pair is
/// merged into one leaf if it fits, or re-cut into two halves if it does not, rewriting only the
/// two edge paths. A node that comes out too tall is rebuilt.
pub(crate) fn join(left: &Arc<Node>, right: &Arc<Node>, config: &RopeConfig) -> Arc<Node> {
    if left.len() == 0 {
        return right.clone();
    }
    if right.len() == 0 {
        return left.clone();
    }

    let (tail, head) = (edge_leaf(left, true), edge_leaf(right, false));
    let min = config.min_leaf_size();
    if tail.len() < min || head.len() < min {
        trace!(left = tail.len(), right = head.len(), "merging leaves at join");
        let chars = [tail.as_slice(), head.as_slice()].concat();

        if chars.len() <= config.max_leaf_size() {
            let left = replace_edge(left, Node::new_leaf(Chunk::from_chars(chars)), true, config);
            return match remove_leftmost(right, config) {
                Some(right) => checked(Node::new_branch(left, right), config),
                None => left,
            };
        }

        let mid = chars.len() / 2;
        let (first, second) = Chunk::from_chars(chars).split_at(mid);
        let left = replace_edge(left, Node::new_leaf(first), true, config);
        let right = replace_edge(right, Node::new_leaf(second), false, config);
        return checked(Node::new_branch(left, right), config);
    }

    checked(Node::new_branch(left.clone(), right.clone()), config)
}

fn checked(node: Arc<Node>, config: &RopeConfig) -> Arc<Node> {
    if node.height() > config.max_height(node.len()) {
        rebuild(&node, config)
    } else {
        node
    }
}

fn edge_leaf(node: &Node, rightmost: bool) -> &Chunk {
    let mut node = node;
    loop {
        match node {
            Node::Leaf(chunk) => return chunk,
            Node::Branch { left, right, .. } => node = if rightmost { right.as_ref() } else { left.as_ref() },
        }
    }
}

/// Swaps the leftmost or rightmost leaf for `leaf`, copying only the nodes on that edge.
fn replace_edge(node: &Arc<Node>, leaf: Arc<Node>, rightmost: bool, config: &RopeConfig) -> Arc<Node> {
    match node.as_ref() {
        Node::Leaf(_) => leaf,
        Node::Branch { left, right, .. } if rightmost => {
            checked(Node::new_branch(left.clone(), replace_edge(right, leaf, true, config)), config)
        }
        Node::Branch { left, right, .. } => {
            checked(Node::new_branch(replace_edge(left, leaf, false, config), right.clone()), config)
        }
    }
}

/// The subtree without its leftmost leaf, or `None` when the subtree is that leaf.
fn remove_leftmost(node: &Arc<Node>, config: &RopeConfig) -> Option<Arc<Node>> {
    match node.as_ref() {
        Node::Leaf(_) => None,
        Node::Branch { left, right, .. } => match remove_leftmost(left, config) {
            Some(left) => Some(checked(Node::new_branch(left, right.clone()), config)),
            None => Some(right.clone()),
        },
    }
}

/// Rebuilds a subtree into a balanced tree over normalized leaves. The text is unchanged.
pub(crate) fn rebuild(node: &Arc<Node>, config: &RopeConfig) -> Arc<Node> {
    let leaves = collect_leaves(node);
    let before = leaves.len();

    let rebuilt = build(normalize(leaves, config));
    debug!(
        len = node.len(),
        old_height = node.height(),
        new_height = rebuilt.height(),
        old_leaves = before,
        "rebalanced rope"
    );

    rebuilt
}

/// Builds a balanced tree from text, cut into leaves of at most `max_leaf_size` characters.
pub(crate) fn from_text(text: &str, config: &RopeConfig) -> Arc<Node> {
    let chunk = Chunk::from_chars(text.chars().collect());
    build(chunk.split_even(config.max_leaf_size()))
}

/// In-order leaves of a subtree. Only the shared chunk handles are cloned, never the text.
pub(crate) fn collect_leaves(node: &Arc<Node>) -> Vec<Chunk> {
    let mut leaves = Vec::new();
    let mut stack = vec![node.as_ref()];

    while let Some(node) = stack.pop() {
        match node {
            Node::Leaf(chunk) => leaves.push(chunk.clone()),
            Node::Branch { left, right, .. } => {
                stack.push(right);
                stack.push(left);
            }
        }
    }

    leaves
}

/// Drops empty leaves, splits oversized ones and merges runs of undersized ones.
///
/// Every output leaf holds at most `max_leaf_size` characters. Leaves already within bounds and
/// not next to an undersized run are passed through without copying.
pub(crate) fn normalize(leaves: Vec<Chunk>, config: &RopeConfig) -> Vec<Chunk> {
    let (min, max) = (config.min_leaf_size(), config.max_leaf_size());

    let mut out: Vec<Chunk> = Vec::with_capacity(leaves.len());
    let mut pending: Vec<char> = Vec::new();

    for leaf in leaves.iter().filter(|leaf| !leaf.is_empty()) {
        for piece in leaf.split_even(max) {
            if pending.is_empty() {
                if piece.len() >= min {
                    out.push(piece);
                } else {
                    pending.extend_from_slice(&piece);
                }
                continue;
            }

            if pending.len() + piece.len() <= max {
                pending.extend_from_slice(&piece);
                if pending.len() >= min {
                    out.push(Chunk::from_chars(take(&mut pending)));
                }
            } else {
                pending.extend_from_slice(&piece);
                push_halves(&mut out, take(&mut pending));
            }
        }
    }

    if !pending.is_empty() {
        match out.pop() {
            Some(last) if last.len() + pending.len() <= max => {
                out.push(Chunk::from_chars([last.as_slice(), pending.as_slice()].concat()));
            }
            Some(last) => push_halves(&mut out, [last.as_slice(), pending.as_slice()].concat()),
            None => out.push(Chunk::from_chars(pending)),
        }
    }

    trace!(leaves = out.len(), "normalized leaves");
    out
}

fn push_halves(out: &mut Vec<Chunk>, chars: Vec<char>) {
    let mid = chars.len() / 2;
    let (left, right) = Chunk::from_chars(chars).split_at(mid);
    out.push(left);
    out.push(right);
}

/// Pairs nodes level by level, so `k` leaves give a tree of height `ceil(log2 k)`.
pub(crate) fn build(leaves: Vec<Chunk>) -> Arc<Node> {
    let mut level: Vec<Arc<Node>> = leaves.into_iter().filter(|c| !c.is_empty()).map(Node::new_leaf).collect();
    if level.is_empty() {
        return Node::empty();
    }

    while level.len() > 1 {
        let mut next = Vec::with_capacity(level.len().div_ceil(2));
        let mut nodes = level.into_iter();
        while let Some(left) = nodes.next() {
            match nodes.next() {
                Some(right) => next.push(Node::new_branch(left, right)),
                None => next.push(left),
            }
        }
        level = next;
    }

    level.pop().unwrap_or_else(Node::empty)
}

/// Whether every node in the subtree is within the height bound for its length.
pub(crate) fn is_balanced(node: &Node, config: &RopeConfig) -> bool {
    let mut stack = vec![node];

    while let Some(node) = stack.pop() {
        if let Node::Branch { left, right, len, height, .. } = node {
            if *height > config.max_height(*len) {
                return false;
            }
            stack.push(left);
            stack.push(right);
        }
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rope::node::assert_invariants;

    fn chunk(s: &str) -> Chunk {
        Chunk::from_chars(s.chars().collect())
    }

    fn text(node: &Node) -> String {
        let mut out = String::new();
        node.collect_range(0, node.len(), &mut out);
        out
    }

    fn lens(leaves: &[Chunk]) -> Vec<usize> {
        leaves.iter().map(Chunk::len).collect()
    }

    #[test]
    fn build_is_logarithmic() {
        let leaves: Vec<Chunk> = (0..9).map(|i| chunk(&i.to_string())).collect();
        let node = build(leaves);
        assert_eq!(node.height(), 4);
        assert_eq!(text(&node), "012345678");

        assert_eq!(build(Vec::new()).len(), 0);
        assert_eq!(build(vec![chunk("solo")]).height(), 0);
    }

    #[test]
    fn from_text_respects_max_leaf() {
        let config = RopeConfig::new(8, 2, 1.5).unwrap();
        let node = from_text(&"abcdefghij".repeat(10), &config);
        assert_eq!(node.len(), 100);
        assert!(collect_leaves(&node).iter().all(|leaf| leaf.len() <= 8));
        assert_invariants(&node, &config);
    }

    #[test]
    fn normalize_merges_small_leaves() {
        let config = RopeConfig::new(8, 3, 1.5).unwrap();
        let leaves = vec![chunk("a"), chunk("b"), chunk(""), chunk("c"), chunk("defg"), chunk("h")];
        let out = normalize(leaves, &config);
        assert_eq!(lens(&out), vec![3, 5]);
        assert_eq!(out.iter().flat_map(|c| c.iter()).collect::<String>(), "abcdefgh");
    }

    #[test]
    fn normalize_splits_overflowing_runs() {
        let config = RopeConfig::new(8, 3, 1.5).unwrap();
        let leaves = vec![chunk("ab"), chunk("cdefgh1"), chunk("ijklmnopqrst")];
        let out = normalize(leaves, &config);
        assert!(out.iter().all(|c| c.len() <= 8 && c.len() >= 3));
        assert_eq!(out.iter().flat_map(|c| c.iter()).collect::<String>(), "abcdefgh1ijklmnopqrst");
    }

    #[test]
    fn normalize_keeps_a_lone_small_leaf() {
        let config = RopeConfig::default();
        let out = normalize(vec![chunk("tiny")], &config);
        assert_eq!(lens(&out), vec![4]);
        assert!(normalize(vec![chunk("")], &config).is_empty());
    }

    #[test]
    fn join_merges_small_leaves() {
        let config = RopeConfig::new(8, 3, 1.5).unwrap();
        let node = join(&Node::new_leaf(chunk("ab")), &Node::new_leaf(chunk("cd")), &config);
        assert_eq!(node.height(), 0);
        assert_eq!(text(&node), "abcd");
    }

    #[test]
    fn join_merges_small_leaf_into_branch_edge() {
        let config = RopeConfig::new(8, 3, 1.5).unwrap();
        let branch = build(vec![chunk("abcd"), chunk("efg")]);

        let node = join(&branch, &Node::new_leaf(chunk("h")), &config);
        assert_eq!(text(&node), "abcdefgh");
        assert_eq!(lens(&collect_leaves(&node)), vec![4, 4]);

        let node = join(&Node::new_leaf(chunk("_")), &branch, &config);
        assert_eq!(text(&node), "_abcdefg");
        assert_eq!(lens(&collect_leaves(&node)), vec![5, 3]);
        assert_invariants(&node, &config);
    }

    #[test]
    fn join_recuts_small_leaf_next_to_full_leaf() {
        let config = RopeConfig::new(8, 3, 1.5).unwrap();
        let left = build(vec![chunk("abcdefgh"), chunk("ij")]);
        let right = build(vec![chunk("klmnopqr"), chunk("stuvwxyz")]);

        let node = join(&left, &right, &config);
        assert_eq!(text(&node), "abcdefghijklmnopqrstuvwxyz");
        assert_eq!(lens(&collect_leaves(&node)), vec![8, 5, 5, 8]);
        assert_invariants(&node, &config);
    }

    #[test]
    fn join_rebuilds_skewed_chains() {
        let config = RopeConfig::new(4, 1, 1.5).unwrap();
        let mut node = Node::empty();
        for c in "abcdefghijklmnopqrstuvwxyz".chars().rev() {
            node = join(&Node::new_leaf(chunk("xyz")), &node, &config);
            node = join(&Node::new_leaf(chunk(&c.to_string())), &node, &config);
        }
        assert_eq!(node.len(), 26 * 4);
        assert!(is_balanced(&node, &config));
        assert_invariants(&node, &config);
    }

    #[test]
    fn skewed_chain_is_detected() {
        let config = RopeConfig::default();
        let mut node = Node::new_leaf(chunk("a"));
        for _ in 0..10 {
            node = Node::new_branch(Node::new_leaf(chunk("b")), node);
        }
        assert!(!is_balanced(&node, &config));

        let rebuilt = rebuild(&node, &config);
        assert!(is_balanced(&rebuilt, &config));
        assert_eq!(text(&rebuilt), text(&node));
    }
}
