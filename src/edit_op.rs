use std::str::FromStr;

use text_rope::{Rope, RopeError};

/// One step of an `edit` command: `insert:<INDEX>:<TEXT>` or `delete:<START>:<END>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOp {
    Insert { index: usize, text: String },
    Delete { start: usize, end: usize },
}

impl EditOp {
    pub fn apply(&self, rope: &Rope) -> Result<Rope, RopeError> {
        match self {
            EditOp::Insert { index, text } => rope.insert(*index, text),
            EditOp::Delete { start, end } => rope.delete(*start, *end),
        }
    }
}

impl FromStr for EditOp {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parse_index = |field: &str| field.parse::<usize>().map_err(|e| format!("bad index '{}': {}", field, e));

        match s.split_once(':') {
            Some(("insert" | "i", rest)) => {
                // the text may itself contain ':'
                let (index, text) = rest.split_once(':').ok_or("expected insert:<INDEX>:<TEXT>")?;
                Ok(EditOp::Insert { index: parse_index(index)?, text: text.to_string() })
            }
            Some(("delete" | "d", rest)) => {
                let (start, end) = rest.split_once(':').ok_or("expected delete:<START>:<END>")?;
                Ok(EditOp::Delete { start: parse_index(start)?, end: parse_index(end)? })
            }
            _ => Err(format!("unknown edit '{}', expected insert:<INDEX>:<TEXT> or delete:<START>:<END>", s)),
        }
    }
}
