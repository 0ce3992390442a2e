use std::iter::FusedIterator;
use std::slice;

use super::node::Node;

/// The leaves of a rope in order, as slices of code points. Empty leaves are skipped.
pub struct Chunks<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> Chunks<'a> {
    pub(crate) fn new(root: &'a Node) -> Self {
        let mut stack = Vec::with_capacity(root.height() + 1);
        stack.push(root);
        Self { stack }
    }
}

impl<'a> Iterator for Chunks<'a> {
    type Item = &'a [char];

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(node) = self.stack.pop() {
            match node {
                Node::Leaf(chunk) if chunk.is_empty() => continue,
                Node::Leaf(chunk) => return Some(chunk.as_slice()),
                Node::Branch { left, right, .. } => {
                    self.stack.push(right);
                    self.stack.push(left);
                }
            }
        }

        None
    }
}

impl FusedIterator for Chunks<'_> {}

pub struct Chars<'a> {
    chunks: Chunks<'a>,
    current: slice::Iter<'a, char>,
    remaining: usize,
}

impl<'a> Chars<'a> {
    pub(crate) fn new(root: &'a Node) -> Self {
        Self { chunks: Chunks::new(root), current: <&[char]>::default().iter(), remaining: root.len() }
    }
}

impl Iterator for Chars<'_> {
    type Item = char;

    fn next(&mut self) -> Option<char> {
        loop {
            if let Some(&c) = self.current.next() {
                self.remaining -= 1;
                return Some(c);
            }
            self.current = self.chunks.next()?.iter();
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Chars<'_> {}

impl FusedIterator for Chars<'_> {}
