use std::env;

use crate::error::RopeError;

pub const DEFAULT_MAX_LEAF_SIZE: usize = 1024;
pub const DEFAULT_MIN_LEAF_SIZE: usize = 256;
pub const DEFAULT_BALANCE_FACTOR: f64 = 1.5;

/// Tuning for leaf sizes and the height bound. Every rope carries its own copy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RopeConfig {
    max_leaf_size: usize,
    min_leaf_size: usize,
    balance_factor: f64,
}

impl Default for RopeConfig {
    fn default() -> Self {
        Self {
            max_leaf_size: DEFAULT_MAX_LEAF_SIZE,
            min_leaf_size: DEFAULT_MIN_LEAF_SIZE,
            balance_factor: DEFAULT_BALANCE_FACTOR,
        }
    }
}

impl RopeConfig {
    pub fn new(max_leaf_size: usize, min_leaf_size: usize, balance_factor: f64) -> Result<Self, RopeError> {
        if max_leaf_size == 0 || min_leaf_size == 0 {
            return Err(RopeError::InvalidConfiguration(format!(
                "leaf sizes must be positive (max {}, min {})",
                max_leaf_size, min_leaf_size
            )));
        }

        if min_leaf_size >= max_leaf_size {
            return Err(RopeError::InvalidConfiguration(format!(
                "min leaf size {} must be below max leaf size {}",
                min_leaf_size, max_leaf_size
            )));
        }

        // a balanced build of k leaves is ceil(log2 k) high, which only fits when c >= 1
        if !balance_factor.is_finite() || balance_factor < 1.0 {
            return Err(RopeError::InvalidConfiguration(format!(
                "balance factor {} must be a finite number of at least 1.0",
                balance_factor
            )));
        }

        Ok(Self { max_leaf_size, min_leaf_size, balance_factor })
    }

    /// Reads `ROPE_MAX_LEAF_SIZE`, `ROPE_MIN_LEAF_SIZE` and `ROPE_BALANCE_FACTOR`,
    /// using the defaults for anything unset or unparsable.
    pub fn from_env() -> Result<Self, RopeError> {
        Self::new(
            env::var("ROPE_MAX_LEAF_SIZE").ok().and_then(|s| s.parse().ok()).unwrap_or(DEFAULT_MAX_LEAF_SIZE),
            env::var("ROPE_MIN_LEAF_SIZE").ok().and_then(|s| s.parse().ok()).unwrap_or(DEFAULT_MIN_LEAF_SIZE),
            env::var("ROPE_BALANCE_FACTOR").ok().and_then(|s| s.parse().ok()).unwrap_or(DEFAULT_BALANCE_FACTOR),
        )
    }

    pub fn max_leaf_size(&self) -> usize {
        self.max_leaf_size
    }

    pub fn min_leaf_size(&self) -> usize {
        self.min_leaf_size
    }

    pub fn balance_factor(&self) -> f64 {
        self.balance_factor
    }

    /// Largest height a node holding `len` characters may have: `ceil(c * log2(len + 1))`.
    pub fn max_height(&self, len: usize) -> usize {
        (self.balance_factor * ((len as f64) + 1.0).log2()).ceil() as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = RopeConfig::default();
        assert_eq!(RopeConfig::new(1024, 256, 1.5), Ok(config));
        assert_eq!(config.max_leaf_size(), 1024);
        assert_eq!(config.min_leaf_size(), 256);
    }

    #[test]
    fn rejects_bad_leaf_sizes() {
        assert!(matches!(RopeConfig::new(0, 0, 1.5), Err(RopeError::InvalidConfiguration(_))));
        assert!(matches!(RopeConfig::new(16, 0, 1.5), Err(RopeError::InvalidConfiguration(_))));
        assert!(matches!(RopeConfig::new(16, 16, 1.5), Err(RopeError::InvalidConfiguration(_))));
        assert!(matches!(RopeConfig::new(8, 16, 1.5), Err(RopeError::InvalidConfiguration(_))));
    }

    #[test]
    fn rejects_bad_balance_factor() {
        assert!(RopeConfig::new(16, 4, 0.5).is_err());
        assert!(RopeConfig::new(16, 4, f64::NAN).is_err());
        assert!(RopeConfig::new(16, 4, f64::INFINITY).is_err());
        assert!(RopeConfig::new(16, 4, 1.0).is_ok());
    }

    #[test]
    fn max_height_grows_logarithmically() {
        let config = RopeConfig::default();
        assert_eq!(config.max_height(0), 0);
        assert_eq!(config.max_height(1), 2);
        assert_eq!(config.max_height(3), 3);
        // log2(10_001) ~ 13.29
        assert_eq!(config.max_height(10_000), 20);
    }
}
