use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::config::RopeConfig;
use crate::error::{check_index, check_range, RopeError};

use super::balance;
use super::iter::{Chars, Chunks};
use super::node::{self, Node};

/// A persistent string made of shared, immutable tree nodes.
///
/// Every edit returns a new rope; the receiver keeps denoting its old text. Positions count
/// Unicode scalar values (`char`s), so indexing inside a leaf is constant time.
///
/// ```
/// use text_rope::Rope;
///
/// let rope = Rope::from_text("hello world");
/// let edited = rope.insert(6, "beautiful ").unwrap();
///
/// assert_eq!(edited.to_string(), "hello beautiful world");
/// assert_eq!(rope.to_string(), "hello world");
/// ```
#[derive(Clone)]
pub struct Rope {
    root: Arc<Node>,
    config: RopeConfig,
}

impl Rope {
    pub fn new() -> Self {
        Self::with_config(RopeConfig::default())
    }

    pub fn with_config(config: RopeConfig) -> Self {
        Self { root: Node::empty(), config }
    }

    pub fn from_text(text: &str) -> Self {
        Self::from_text_with_config(text, RopeConfig::default())
    }

    pub fn from_text_with_config(text: &str, config: RopeConfig) -> Self {
        Self { root: balance::from_text(text, &config), config }
    }

    fn derive(&self, root: Arc<Node>) -> Self {
        Self { root, config: self.config }
    }

    pub fn config(&self) -> &RopeConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.root.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn height(&self) -> usize {
        self.root.height()
    }

    /// Number of non-empty leaves.
    pub fn leaf_count(&self) -> usize {
        self.chunks().count()
    }

    /// Whether every node is within `ceil(c * log2(len + 1))` of height. Walks the whole tree.
    pub fn is_balanced(&self) -> bool {
        balance::is_balanced(&self.root, &self.config)
    }

    pub fn char_at(&self, index: usize) -> Result<char, RopeError> {
        if index >= self.len() {
            return Err(RopeError::IndexOutOfRange { index, len: self.len() });
        }

        Ok(self.root.char_at(index))
    }

    /// Concatenates two ropes. An empty operand gives back the other one unchanged; otherwise the
    /// result keeps this rope's configuration, and `other` is re-cut to its leaf bounds first when
    /// the two configurations differ.
    pub fn concat(&self, other: &Rope) -> Rope {
        if self.is_empty() {
            return other.clone();
        }
        if other.is_empty() {
            return self.clone();
        }

        let right = if other.config == self.config {
            other.root.clone()
        } else {
            balance::rebuild(&other.root, &self.config)
        };
        self.derive(balance::join(&self.root, &right, &self.config))
    }

    pub fn split(&self, index: usize) -> Result<(Rope, Rope), RopeError> {
        check_index(index, self.len())?;

        let (left, right) = node::split(&self.root, index, &self.config);
        Ok((self.derive(left), self.derive(right)))
    }

    pub fn insert(&self, index: usize, text: &str) -> Result<Rope, RopeError> {
        check_index(index, self.len())?;
        if text.is_empty() {
            return Ok(self.clone());
        }

        let (left, right) = node::split(&self.root, index, &self.config);
        let middle = balance::from_text(text, &self.config);
        let root = balance::join(&balance::join(&left, &middle, &self.config), &right, &self.config);
        Ok(self.derive(root))
    }

    pub fn append(&self, text: &str) -> Rope {
        self.derive(balance::join(&self.root, &balance::from_text(text, &self.config), &self.config))
    }

    pub fn prepend(&self, text: &str) -> Rope {
        self.derive(balance::join(&balance::from_text(text, &self.config), &self.root, &self.config))
    }

    /// Removes `[start, end)`.
    pub fn delete(&self, start: usize, end: usize) -> Result<Rope, RopeError> {
        check_range(start, end, self.len())?;
        if start == end {
            return Ok(self.clone());
        }

        let (left, rest) = node::split(&self.root, start, &self.config);
        let (_, right) = node::split(&rest, end - start, &self.config);
        Ok(self.derive(balance::join(&left, &right, &self.config)))
    }

    /// The sub-rope `[start, end)`, sharing structure with this one.
    pub fn slice(&self, start: usize, end: usize) -> Result<Rope, RopeError> {
        check_range(start, end, self.len())?;

        let (_, rest) = node::split(&self.root, start, &self.config);
        let (middle, _) = node::split(&rest, end - start, &self.config);
        Ok(self.derive(middle))
    }

    /// Copies `[start, end)` out as a `String`, visiting only the leaves that overlap the range.
    pub fn substring(&self, start: usize, end: usize) -> Result<String, RopeError> {
        check_range(start, end, self.len())?;

        let mut out = String::with_capacity(end - start);
        self.root.collect_range(start, end, &mut out);
        Ok(out)
    }

    /// Rebuilds the whole tree balanced, with leaf sizes brought back within the configured bounds.
    pub fn rebalance(&self) -> Rope {
        self.derive(balance::rebuild(&self.root, &self.config))
    }

    pub fn chars(&self) -> Chars<'_> {
        Chars::new(&self.root)
    }

    pub fn chunks(&self) -> Chunks<'_> {
        Chunks::new(&self.root)
    }
}

impl Default for Rope {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&str> for Rope {
    fn from(text: &str) -> Self {
        Self::from_text(text)
    }
}

impl From<String> for Rope {
    fn from(text: String) -> Self {
        Self::from_text(&text)
    }
}

impl FromStr for Rope {
    type Err = Infallible;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_text(text))
    }
}

/// Writes the whole text. O(n); meant for output, not for building other operations on.
impl fmt::Display for Rope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut buf = String::new();
        for chunk in self.chunks() {
            buf.clear();
            buf.extend(chunk);
            f.write_str(&buf)?;
        }

        Ok(())
    }
}

impl fmt::Debug for Rope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rope")
            .field("len", &self.len())
            .field("height", &self.height())
            .field("leaves", &self.leaf_count())
            .finish()
    }
}

impl PartialEq for Rope {
    fn eq(&self, other: &Rope) -> bool {
        Arc::ptr_eq(&self.root, &other.root) || (self.len() == other.len() && self.chars().eq(other.chars()))
    }
}

impl Eq for Rope {}

impl PartialEq<str> for Rope {
    fn eq(&self, other: &str) -> bool {
        self.chars().eq(other.chars())
    }
}

impl PartialEq<&str> for Rope {
    fn eq(&self, other: &&str) -> bool {
        self.chars().eq(other.chars())
    }
}
