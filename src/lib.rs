//! A persistent rope: an immutable binary tree of text chunks with cheap splicing.
//!
//! Edits (`concat`, `split`, `insert`, `delete`) return new ropes that share every untouched
//! subtree with the rope they came from. Nodes are reference counted with `Arc`, so ropes can be
//! read from several threads at once.

mod config;
mod error;
mod rope;

pub use self::config::{RopeConfig, DEFAULT_BALANCE_FACTOR, DEFAULT_MAX_LEAF_SIZE, DEFAULT_MIN_LEAF_SIZE};
pub use self::error::RopeError;
pub use self::rope::{Chars, Chunks, Rope};
