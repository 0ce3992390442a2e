use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RopeError {
    /// A single position past the end of the rope.
    #[error("index {index} out of range for rope of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    /// A reversed range, or one reaching past the end of the rope.
    #[error("range {start}..{end} out of range for rope of length {len}")]
    RangeOutOfRange { start: usize, end: usize, len: usize },

    /// Leaf bounds or balance factor rejected by `RopeConfig::new`.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
}

impl RopeError {
    /// True for both the single-index and the ranged bounds failures.
    pub fn is_out_of_range(&self) -> bool {
        matches!(self, RopeError::IndexOutOfRange { .. } | RopeError::RangeOutOfRange { .. })
    }
}

pub(crate) fn check_index(index: usize, len: usize) -> Result<(), RopeError> {
    if index > len {
        return Err(RopeError::IndexOutOfRange { index, len });
    }

    Ok(())
}

pub(crate) fn check_range(start: usize, end: usize, len: usize) -> Result<(), RopeError> {
    if start > end || end > len {
        return Err(RopeError::RangeOutOfRange { start, end, len });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_checks() {
        assert!(check_index(3, 3).is_ok());
        assert_eq!(check_index(4, 3), Err(RopeError::IndexOutOfRange { index: 4, len: 3 }));

        assert!(check_range(0, 0, 0).is_ok());
        assert!(check_range(1, 3, 3).is_ok());
        assert!(check_range(2, 1, 3).unwrap_err().is_out_of_range());
        assert!(check_range(0, 4, 3).unwrap_err().is_out_of_range());
    }

    #[test]
    fn messages_carry_context() {
        let err = RopeError::RangeOutOfRange { start: 2, end: 9, len: 5 };
        assert_eq!(err.to_string(), "range 2..9 out of range for rope of length 5");
        assert!(!RopeError::InvalidConfiguration("x".into()).is_out_of_range());
    }
}
