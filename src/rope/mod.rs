mod balance;
mod chunk;
mod iter;
mod node;
#[allow(clippy::module_inception)]
mod rope;

pub use self::iter::{Chars, Chunks};
pub use self::rope::Rope;
